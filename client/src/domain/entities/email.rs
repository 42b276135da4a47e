//! SMTP settings singleton.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::null_as_empty;

/// SMTP transport security.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Encryption {
    /// Plain SMTP.
    None,
    /// Upgrade with STARTTLS.
    #[default]
    #[serde(rename = "STARTTLS")]
    StartTls,
    /// Implicit TLS.
    #[serde(rename = "SSL/TLS")]
    SslTls,
}

/// Recipient list selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecipientKind {
    /// `To:`.
    To,
    /// `Cc:`.
    Cc,
    /// `Bcc:`.
    Bcc,
}

/// Default recipients for automatic emails.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Recipients {
    /// Primary recipients.
    #[serde(default)]
    pub to: Vec<String>,
    /// Carbon copy.
    #[serde(default)]
    pub cc: Vec<String>,
    /// Blind carbon copy.
    #[serde(default)]
    pub bcc: Vec<String>,
}

impl Recipients {
    fn list_mut(&mut self, kind: RecipientKind) -> &mut Vec<String> {
        match kind {
            RecipientKind::To => &mut self.to,
            RecipientKind::Cc => &mut self.cc,
            RecipientKind::Bcc => &mut self.bcc,
        }
    }

    /// Recipients of one kind.
    pub fn list(&self, kind: RecipientKind) -> &[String] {
        match kind {
            RecipientKind::To => &self.to,
            RecipientKind::Cc => &self.cc,
            RecipientKind::Bcc => &self.bcc,
        }
    }

    /// Append `email` unless it is blank or already listed; returns whether
    /// the list changed.
    pub fn add(&mut self, kind: RecipientKind, email: &str) -> bool {
        let email = email.trim();
        if email.is_empty() {
            return false;
        }
        let list = self.list_mut(kind);
        if list.iter().any(|existing| existing == email) {
            return false;
        }
        list.push(email.to_owned());
        true
    }

    /// Remove every occurrence of `email`; returns whether the list changed.
    pub fn remove(&mut self, kind: RecipientKind, email: &str) -> bool {
        let list = self.list_mut(kind);
        let before = list.len();
        list.retain(|existing| existing != email.trim());
        list.len() != before
    }
}

/// SMTP settings as returned by the API. The password is write-only.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EmailSettings {
    /// SMTP host.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub host: String,
    /// SMTP port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Transport security.
    #[serde(default)]
    pub encryption: Encryption,
    /// SMTP login.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub username: String,
    /// Sender display name.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub from_name: String,
    /// Sender address.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub from_address: String,
    /// Default recipients.
    #[serde(default)]
    pub recipients: Recipients,
}

/// Replacement payload for [`EmailSettings`].
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct EmailSettingsDraft {
    /// SMTP host.
    pub host: String,
    /// SMTP port.
    pub port: u16,
    /// Transport security.
    pub encryption: Encryption,
    /// SMTP login.
    pub username: String,
    /// New password; empty keeps the stored one.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub password: String,
    /// Sender display name.
    pub from_name: String,
    /// Sender address.
    pub from_address: String,
    /// Default recipients.
    pub recipients: Recipients,
}

impl From<&EmailSettings> for EmailSettingsDraft {
    fn from(settings: &EmailSettings) -> Self {
        Self {
            host: settings.host.clone(),
            port: settings.port,
            encryption: settings.encryption,
            username: settings.username.clone(),
            password: String::new(),
            from_name: settings.from_name.clone(),
            from_address: settings.from_address.clone(),
            recipients: settings.recipients.clone(),
        }
    }
}

impl fmt::Debug for EmailSettingsDraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailSettingsDraft")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("encryption", &self.encryption)
            .field("username", &self.username)
            .field("from_address", &self.from_address)
            .finish_non_exhaustive()
    }
}

const fn default_port() -> u16 {
    587
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("ops@example.com", false)]
    #[case("  ", false)]
    #[case("noc@example.com", true)]
    fn adding_recipients_deduplicates(#[case] email: &str, #[case] changed: bool) {
        let mut recipients = Recipients {
            to: vec!["ops@example.com".to_owned()],
            ..Recipients::default()
        };
        assert_eq!(recipients.add(RecipientKind::To, email), changed);
        assert_eq!(recipients.to.len(), if changed { 2 } else { 1 });
    }

    #[test]
    fn removing_recipients_only_touches_one_list() {
        let mut recipients = Recipients {
            to: vec!["a@example.com".to_owned()],
            cc: vec!["a@example.com".to_owned()],
            bcc: Vec::new(),
        };
        assert!(recipients.remove(RecipientKind::Cc, "a@example.com"));
        assert!(!recipients.remove(RecipientKind::Bcc, "a@example.com"));
        assert_eq!(recipients.list(RecipientKind::To), ["a@example.com".to_owned()]);
    }

    #[test]
    fn encryption_uses_wire_labels() {
        let value = serde_json::to_value(Encryption::SslTls).expect("serialises");
        assert_eq!(value, serde_json::json!("SSL/TLS"));
    }
}

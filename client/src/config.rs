//! Client configuration loaded via OrthoConfig.
//!
//! Values come from `RFMS_*` environment variables or a config file; every
//! field is optional and the accessors supply the defaults.

use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use crate::outbound::HttpSettings;

const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/v1/";
const DEFAULT_TIMEOUT_SECS: u64 = 35;
const DEFAULT_CSRF_COOKIE: &str = "csrftoken";
const DEFAULT_CSRF_HEADER: &str = "X-CSRFToken";
const DEFAULT_NOTICE_TTL_MS: u64 = 4_000;
const DEFAULT_WARNING_TTL_MS: u64 = 10_000;
const DEFAULT_SESSION_FILE: &str = ".rfms/session.json";
const DEFAULT_EXPORT_DIR: &str = "exports";

/// Errors raised while interpreting loaded settings.
#[derive(Debug, thiserror::Error)]
pub enum ClientConfigError {
    /// `base_url` is not an absolute URL.
    #[error("invalid base URL `{value}`: {source}")]
    BaseUrl {
        /// Configured value.
        value: String,
        /// Parse failure.
        #[source]
        source: url::ParseError,
    },
    /// `base_url` parsed but cannot carry paths (e.g. `mailto:`).
    #[error("base URL `{value}` cannot be used as an API root")]
    NotHierarchical {
        /// Configured value.
        value: String,
    },
}

/// Settings for the API client and CLI.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "RFMS")]
pub struct ClientSettings {
    /// API root, e.g. `https://rfms.example.org/api/v1/`.
    pub base_url: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// Send cookies and mirror the CSRF cookie into a header.
    pub with_credentials: Option<bool>,
    /// Cookie holding the CSRF token.
    pub csrf_cookie_name: Option<String>,
    /// Header receiving the CSRF token.
    pub csrf_header_name: Option<String>,
    /// Default notice lifetime in milliseconds.
    pub notice_ttl_ms: Option<u64>,
    /// Lifetime of partial-import warnings in milliseconds.
    pub warning_ttl_ms: Option<u64>,
    /// Where the signed-in session is remembered.
    pub session_file: Option<PathBuf>,
    /// Directory receiving spreadsheet exports.
    pub export_dir: Option<PathBuf>,
}

impl ClientSettings {
    /// API root, always ending in `/` so relative paths nest beneath it.
    ///
    /// # Errors
    ///
    /// Returns [`ClientConfigError`] when the value is not a usable URL.
    pub fn base_url(&self) -> Result<Url, ClientConfigError> {
        let raw = self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL).trim();
        let mut url = Url::parse(raw).map_err(|source| ClientConfigError::BaseUrl {
            value: raw.to_owned(),
            source,
        })?;
        if url.cannot_be_a_base() {
            return Err(ClientConfigError::NotHierarchical {
                value: raw.to_owned(),
            });
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }

    /// Per-request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    /// Whether requests carry cookies and the CSRF header; on unless
    /// explicitly disabled.
    pub fn with_credentials(&self) -> bool {
        self.with_credentials.unwrap_or(true)
    }

    /// Name of the CSRF cookie.
    pub fn csrf_cookie_name(&self) -> &str {
        self.csrf_cookie_name
            .as_deref()
            .unwrap_or(DEFAULT_CSRF_COOKIE)
    }

    /// Name of the CSRF header.
    pub fn csrf_header_name(&self) -> &str {
        self.csrf_header_name
            .as_deref()
            .unwrap_or(DEFAULT_CSRF_HEADER)
    }

    /// Default notice lifetime.
    pub fn notice_ttl(&self) -> Duration {
        Duration::from_millis(self.notice_ttl_ms.unwrap_or(DEFAULT_NOTICE_TTL_MS))
    }

    /// Lifetime of partial-import warnings.
    pub fn warning_ttl(&self) -> Duration {
        Duration::from_millis(self.warning_ttl_ms.unwrap_or(DEFAULT_WARNING_TTL_MS))
    }

    /// Session file path.
    pub fn session_file(&self) -> PathBuf {
        self.session_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE))
    }

    /// Export directory.
    pub fn export_dir(&self) -> PathBuf {
        self.export_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_DIR))
    }

    /// Transport settings derived from this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientConfigError`] when the base URL is invalid.
    pub fn http_settings(&self) -> Result<HttpSettings, ClientConfigError> {
        Ok(HttpSettings {
            base_url: self.base_url()?,
            timeout: self.timeout(),
            with_credentials: self.with_credentials(),
            csrf_cookie_name: self.csrf_cookie_name().to_owned(),
            csrf_header_name: self.csrf_header_name().to_owned(),
        })
    }
}

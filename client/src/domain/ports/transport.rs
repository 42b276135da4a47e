//! Driven port for issuing requests against the REST API.
//!
//! The domain owns the request and response shapes so stores stay
//! adapter-agnostic: the reqwest adapter, scripted test doubles and mockall
//! mocks all speak the same contract. Paths are relative to the configured
//! API base and keep their trailing slash (`depots/`, `failures/logs/7/`).

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use super::define_port_error;
use crate::domain::UploadFile;

/// HTTP verbs used by the stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// Read a collection or a single entity.
    Get,
    /// Create an entity or trigger an action.
    Post,
    /// Partially update an entity.
    Patch,
    /// Replace a singleton resource.
    Put,
    /// Remove an entity.
    Delete,
}

impl HttpMethod {
    /// Upper-case verb as sent on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request payload variants.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// No body.
    Empty,
    /// JSON document.
    Json(Value),
    /// `multipart/form-data` with one file part and optional text parts.
    Multipart {
        /// Form field name carrying the file.
        field: String,
        /// File attached under `field`.
        file: UploadFile,
        /// Text parts sent ahead of the file, in order.
        fields: Vec<(String, String)>,
    },
}

/// How the adapter should treat a successful response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    /// Decode the body as JSON; an empty body decodes to [`ResponseBody::Empty`].
    Json,
    /// Return the raw bytes untouched.
    Binary,
}

/// One outbound API call.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP verb.
    pub method: HttpMethod,
    /// Path relative to the API base.
    pub path: String,
    /// Query parameters in insertion order; keys may repeat.
    pub query: Vec<(String, String)>,
    /// Request payload.
    pub body: RequestBody,
    /// Expected response handling.
    pub format: ResponseFormat,
}

impl ApiRequest {
    fn new(method: HttpMethod, path: impl Into<String>, body: RequestBody) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body,
            format: ResponseFormat::Json,
        }
    }

    /// `GET path`.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path, RequestBody::Empty)
    }

    /// `POST path` with a JSON body.
    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Post, path, RequestBody::Json(body))
    }

    /// `PATCH path` with a JSON body.
    pub fn patch(path: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Patch, path, RequestBody::Json(body))
    }

    /// `PUT path` with a JSON body.
    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Put, path, RequestBody::Json(body))
    }

    /// `DELETE path`.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path, RequestBody::Empty)
    }

    /// `POST path` as `multipart/form-data` with one file part.
    pub fn multipart(path: impl Into<String>, field: impl Into<String>, file: UploadFile) -> Self {
        Self::new(
            HttpMethod::Post,
            path,
            RequestBody::Multipart {
                field: field.into(),
                file,
                fields: Vec::new(),
            },
        )
    }

    /// Add a text part to a multipart body; other bodies are left as is.
    #[must_use]
    pub fn with_form_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let RequestBody::Multipart { fields, .. } = &mut self.body {
            fields.push((key.into(), value.into()));
        }
        self
    }

    /// Append a query parameter.
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Ask for the raw response bytes instead of JSON.
    #[must_use]
    pub fn binary(mut self) -> Self {
        self.format = ResponseFormat::Binary;
        self
    }
}

/// Body of a successful response.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// No content (e.g. `204`).
    Empty,
    /// Decoded JSON document.
    Json(Value),
    /// Raw bytes for binary downloads.
    Binary(Vec<u8>),
}

/// Successful (2xx) response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response payload.
    pub body: ResponseBody,
}

impl ApiResponse {
    /// `200` with a JSON body.
    pub fn json(body: Value) -> Self {
        Self {
            status: 200,
            body: ResponseBody::Json(body),
        }
    }

    /// `200` with raw bytes.
    pub fn binary(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            body: ResponseBody::Binary(bytes.into()),
        }
    }

    /// `204` without content.
    pub fn no_content() -> Self {
        Self {
            status: 204,
            body: ResponseBody::Empty,
        }
    }

    /// Override the status code.
    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// JSON payload, with empty bodies mapped to `null`.
    pub fn into_json(self) -> Value {
        match self.body {
            ResponseBody::Json(value) => value,
            ResponseBody::Empty | ResponseBody::Binary(_) => Value::Null,
        }
    }

    /// Raw bytes; JSON payloads are re-serialised.
    pub fn into_bytes(self) -> Vec<u8> {
        match self.body {
            ResponseBody::Binary(bytes) => bytes,
            ResponseBody::Json(value) => value.to_string().into_bytes(),
            ResponseBody::Empty => Vec::new(),
        }
    }
}

define_port_error! {
    /// Errors surfaced by transport adapters.
    pub enum TransportError {
        /// No response was received.
        Network { message: String } =>
            "request failed before a response arrived: {message}",
        /// The fixed request timeout elapsed.
        Timeout { message: String } =>
            "request timed out: {message}",
        /// The server answered with a non-2xx status.
        Status { status: u16, body: String } =>
            "server responded with status {status}",
        /// The response body could not be decoded.
        Decode { message: String } =>
            "response decode failed: {message}",
    }
}

impl TransportError {
    /// HTTP status for [`TransportError::Status`].
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Port for sending a single API request.
///
/// Implementations make exactly one attempt; retries are the caller's
/// decision.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one request and return the successful response.
    ///
    /// # Errors
    ///
    /// Non-2xx statuses are reported as [`TransportError::Status`] carrying
    /// the raw response body so callers can parse validation payloads.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builders_default_to_json_responses() {
        let request = ApiRequest::get("stations/").with_query("depot", "4");
        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.format, ResponseFormat::Json);
        assert_eq!(request.query, vec![("depot".to_owned(), "4".to_owned())]);
    }

    #[test]
    fn binary_switches_response_format() {
        let request = ApiRequest::get("circuits/export_to_excel/").binary();
        assert_eq!(request.format, ResponseFormat::Binary);
    }

    #[test]
    fn form_fields_only_attach_to_multipart_bodies() {
        let upload = ApiRequest::multipart(
            "failures/attachments/",
            "file",
            UploadFile::new("photo.jpg", b"\xff\xd8".to_vec()),
        )
        .with_form_field("failure", "9");
        assert!(matches!(&upload.body, RequestBody::Multipart { fields, .. }
            if fields == &vec![("failure".to_owned(), "9".to_owned())]));

        let plain = ApiRequest::get("stations/").with_form_field("failure", "9");
        assert_eq!(plain.body, RequestBody::Empty);
    }

    #[test]
    fn empty_bodies_read_as_null() {
        assert_eq!(ApiResponse::no_content().into_json(), Value::Null);
        assert_eq!(ApiResponse::json(json!([1])).into_json(), json!([1]));
    }

    #[test]
    fn status_code_is_only_reported_for_status_errors() {
        assert_eq!(TransportError::status(404_u16, "").status_code(), Some(404));
        assert_eq!(TransportError::timeout("35s").status_code(), None);
    }
}

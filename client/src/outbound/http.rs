//! Reqwest-backed API transport.
//!
//! This adapter owns transport details only: URL resolution against the API
//! base, cookie credentials with the CSRF header pair, bearer tokens,
//! multipart encoding, the fixed timeout, and mapping of HTTP failures into
//! [`TransportError`]. It makes exactly one attempt per request.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderName, InvalidHeaderName};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, StatusCode, Url};
use tokio::sync::watch;
use tracing::debug;

use crate::domain::error_shape::body_preview;
use crate::domain::ports::{
    ApiRequest, ApiResponse, HttpMethod, RequestBody, ResponseBody, ResponseFormat, Transport,
    TransportError,
};

/// Connection settings for [`HttpTransport`].
#[derive(Debug, Clone)]
pub struct HttpSettings {
    /// API base, ending with `/`.
    pub base_url: Url,
    /// Fixed per-request timeout.
    pub timeout: Duration,
    /// Keep cookies and mirror the CSRF cookie into a header.
    pub with_credentials: bool,
    /// Cookie holding the CSRF token.
    pub csrf_cookie_name: String,
    /// Header receiving the CSRF token.
    pub csrf_header_name: String,
}

/// Errors raised while building the transport.
#[derive(Debug, thiserror::Error)]
pub enum HttpTransportBuildError {
    /// The reqwest client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
    /// The configured CSRF header is not a valid header name.
    #[error("invalid CSRF header name `{name}`: {source}")]
    HeaderName {
        /// Configured name.
        name: String,
        /// Parse failure.
        source: InvalidHeaderName,
    },
}

/// Transport adapter issuing requests against one API base.
pub struct HttpTransport {
    client: Client,
    jar: Arc<Jar>,
    base_url: Url,
    with_credentials: bool,
    csrf_cookie_name: String,
    csrf_header: HeaderName,
    bearer: Option<watch::Receiver<Option<String>>>,
}

impl HttpTransport {
    /// Build the adapter.
    ///
    /// # Errors
    ///
    /// Returns [`HttpTransportBuildError`] when the client cannot be built or
    /// the CSRF header name is invalid.
    pub fn new(settings: HttpSettings) -> Result<Self, HttpTransportBuildError> {
        let csrf_header = HeaderName::from_bytes(settings.csrf_header_name.as_bytes())
            .map_err(|source| HttpTransportBuildError::HeaderName {
                name: settings.csrf_header_name.clone(),
                source,
            })?;
        let jar = Arc::new(Jar::default());
        let mut builder = Client::builder().timeout(settings.timeout);
        if settings.with_credentials {
            builder = builder.cookie_provider(Arc::clone(&jar));
        }
        let client = builder.build()?;
        Ok(Self {
            client,
            jar,
            base_url: settings.base_url,
            with_credentials: settings.with_credentials,
            csrf_cookie_name: settings.csrf_cookie_name,
            csrf_header,
            bearer: None,
        })
    }

    /// Attach `Authorization: Bearer <token>` whenever `tokens` holds one.
    #[must_use]
    pub fn with_bearer(mut self, tokens: watch::Receiver<Option<String>>) -> Self {
        self.bearer = Some(tokens);
        self
    }

    /// API base every path is resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn csrf_token(&self, url: &Url) -> Option<String> {
        if !self.with_credentials {
            return None;
        }
        let header = self.jar.cookies(url)?;
        let cookies = header.to_str().ok()?;
        cookie_value(cookies, &self.csrf_cookie_name)
    }

    fn bearer_token(&self) -> Option<String> {
        self.bearer
            .as_ref()
            .and_then(|tokens| tokens.borrow().clone())
            .filter(|token| !token.is_empty())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = resolve(&self.base_url, &request.path)?;
        let mut builder = self
            .client
            .request(method(request.method), url.clone())
            .header(ACCEPT, accept(request.format));
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = self.csrf_token(&url) {
            builder = builder.header(self.csrf_header.clone(), token);
        }
        if let Some(token) = self.bearer_token() {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(body) => builder.json(&body),
            RequestBody::Multipart {
                field,
                file,
                fields,
            } => {
                let (file_name, bytes) = file.into_parts();
                let form = fields
                    .into_iter()
                    .fold(Form::new(), |form, (key, value)| form.text(key, value));
                let part = Part::bytes(bytes).file_name(file_name);
                builder.multipart(form.part(field, part))
            }
        };

        debug!(method = %request.method, %url, "sending request");
        let response = builder.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        Ok(ApiResponse {
            status: status.as_u16(),
            body: decode_body(request.format, body.as_ref())?,
        })
    }
}

fn resolve(base_url: &Url, path: &str) -> Result<Url, TransportError> {
    base_url
        .join(path.trim_start_matches('/'))
        .map_err(|error| TransportError::network(format!("invalid request path `{path}`: {error}")))
}

fn method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
    }
}

fn accept(format: ResponseFormat) -> &'static str {
    match format {
        ResponseFormat::Json => "application/json",
        ResponseFormat::Binary => "*/*",
    }
}

fn cookie_value(cookies: &str, name: &str) -> Option<String> {
    cookies
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_owned())
        .filter(|value| !value.is_empty())
}

fn decode_body(format: ResponseFormat, body: &[u8]) -> Result<ResponseBody, TransportError> {
    match format {
        ResponseFormat::Binary => Ok(ResponseBody::Binary(body.to_vec())),
        ResponseFormat::Json if body.iter().all(u8::is_ascii_whitespace) => {
            Ok(ResponseBody::Empty)
        }
        ResponseFormat::Json => serde_json::from_slice(body)
            .map(ResponseBody::Json)
            .map_err(|error| TransportError::decode(format!("invalid JSON payload: {error}"))),
    }
}

fn map_transport_error(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::timeout(error.to_string())
    } else {
        TransportError::network(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> TransportError {
    let text = String::from_utf8_lossy(body).into_owned();
    debug!(
        status = status.as_u16(),
        body = %body_preview(&text),
        "server rejected request"
    );
    TransportError::status(status.as_u16(), text)
}

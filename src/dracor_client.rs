//! Outbound HTTP access to the DraCor corpus API
//!
//! Every operation in this crate ends up as one or more [`Endpoint`] calls
//! through the [`CorpusApi`] trait. [`DracorClient`] is the reqwest-backed
//! implementation used at runtime.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::ACCEPT, Client, StatusCode, Url};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_API_BASE_URL: &str = "https://dracor.org/api/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const MAX_ERROR_BODY_CHARS: usize = 512;
const RETRY_BACKOFF_MS: u64 = 250;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Json,
    Csv,
    Text,
    Xml,
}

impl ResponseFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Text => "text",
            Self::Xml => "xml",
        }
    }

    pub fn accept_header(self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Csv => "text/csv",
            Self::Text => "text/plain",
            Self::Xml => "application/xml",
        }
    }
}

/// Path segments, query pairs and expected media type of one remote call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub segments: Vec<String>,
    pub query: Vec<(String, String)>,
    pub format: ResponseFormat,
}

impl Endpoint {
    pub fn new<I, S>(segments: I, format: ResponseFormat) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
            query: Vec::new(),
            format,
        }
    }

    pub fn with_query(mut self, name: &str, value: impl Into<String>) -> Self {
        self.query.push((name.to_string(), value.into()));
        self
    }

    pub fn path(&self) -> String {
        self.segments.join("/")
    }

    /// Path plus query string, used for logging and error context.
    pub fn describe(&self) -> String {
        if self.query.is_empty() {
            return self.path();
        }

        let query = self
            .query
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{query}", self.path())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Json(Value),
    Text(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("transport error for {path}: {message}")]
    Transport { path: String, message: String },
    #[error("remote returned HTTP {status} for {path}: {message}")]
    Http {
        status: u16,
        path: String,
        message: String,
    },
    #[error("not found: {path}")]
    NotFound { path: String, message: String },
    #[error("unexpected {format} response for {path}: {message}")]
    Parse {
        path: String,
        format: &'static str,
        message: String,
    },
    #[error("invalid endpoint: {message}")]
    InvalidEndpoint { message: String },
}

impl ApiError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::NotFound { .. } => Some(404),
            Self::Transport { .. } | Self::Parse { .. } | Self::InvalidEndpoint { .. } => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "transport_error",
            Self::Http { .. } => "http_error",
            Self::NotFound { .. } => "not_found",
            Self::Parse { .. } => "parse_error",
            Self::InvalidEndpoint { .. } => "invalid_endpoint",
        }
    }

    fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { .. } => true,
            Self::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }

    fn parse(endpoint: &Endpoint, message: impl Into<String>) -> Self {
        Self::Parse {
            path: endpoint.describe(),
            format: endpoint.format.as_str(),
            message: message.into(),
        }
    }
}

#[async_trait]
pub trait CorpusApi: Send + Sync {
    async fn call(&self, endpoint: &Endpoint) -> Result<Body, ApiError>;
}

/// Calls `endpoint` and requires a decoded JSON body.
pub async fn fetch_json(api: &dyn CorpusApi, endpoint: &Endpoint) -> Result<Value, ApiError> {
    match api.call(endpoint).await? {
        Body::Json(value) => Ok(value),
        Body::Text(text) => serde_json::from_str(&text)
            .map_err(|err| ApiError::parse(endpoint, format!("body is not valid json: {err}"))),
    }
}

/// Calls `endpoint` and returns the body as a string.
pub async fn fetch_text(api: &dyn CorpusApi, endpoint: &Endpoint) -> Result<String, ApiError> {
    match api.call(endpoint).await? {
        Body::Text(text) => Ok(text),
        Body::Json(value) => Ok(value.to_string()),
    }
}

#[derive(Debug, Clone)]
pub struct DracorClient {
    client: Client,
    base_url: Url,
    max_retries: u32,
}

impl DracorClient {
    pub fn new(base_url: &str, timeout: Duration, max_retries: u32) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url).map_err(|err| ApiError::InvalidEndpoint {
            message: format!("invalid base url {base_url}: {err}"),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidEndpoint {
                message: format!("base url {base_url} cannot carry path segments"),
            });
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| ApiError::Transport {
                path: base_url.to_string(),
                message: format!("failed to build http client: {err}"),
            })?;

        Ok(Self {
            client,
            base_url,
            max_retries,
        })
    }

    pub fn build_url(&self, endpoint: &Endpoint) -> Result<Url, ApiError> {
        if endpoint.segments.is_empty() {
            return Err(ApiError::InvalidEndpoint {
                message: "endpoint has no path segments".to_string(),
            });
        }

        if endpoint
            .segments
            .iter()
            .any(|segment| segment.trim().is_empty())
        {
            return Err(ApiError::InvalidEndpoint {
                message: format!("empty path segment in {}", endpoint.path()),
            });
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidEndpoint {
                message: "base url cannot carry path segments".to_string(),
            })?
            .pop_if_empty()
            .extend(&endpoint.segments);

        if !endpoint.query.is_empty() {
            url.query_pairs_mut().extend_pairs(endpoint.query.iter());
        }

        Ok(url)
    }

    async fn send_once(&self, url: &Url, endpoint: &Endpoint) -> Result<Body, ApiError> {
        let path = endpoint.describe();
        let response = self
            .client
            .get(url.clone())
            .header(ACCEPT, endpoint.format.accept_header())
            .send()
            .await
            .map_err(|err| transport_error(&path, &err))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            let message = summarize_body(response.text().await.unwrap_or_default());
            warn!(path = %path, "dracor resource not found");
            return Err(ApiError::NotFound { path, message });
        }

        if !status.is_success() {
            let status = status.as_u16();
            let message = summarize_body(response.text().await.unwrap_or_default());
            warn!(path = %path, status, message = %message, "dracor request failed");
            return Err(ApiError::Http {
                status,
                path,
                message,
            });
        }

        let text = response
            .text()
            .await
            .map_err(|err| transport_error(&path, &err))?;

        match endpoint.format {
            ResponseFormat::Json => serde_json::from_str(&text)
                .map(Body::Json)
                .map_err(|err| ApiError::parse(endpoint, format!("body is not valid json: {err}"))),
            ResponseFormat::Csv | ResponseFormat::Text | ResponseFormat::Xml => Ok(Body::Text(text)),
        }
    }
}

#[async_trait]
impl CorpusApi for DracorClient {
    async fn call(&self, endpoint: &Endpoint) -> Result<Body, ApiError> {
        let url = self.build_url(endpoint)?;
        let mut attempt: u32 = 0;

        loop {
            debug!(url = %url, attempt, format = endpoint.format.as_str(), "dracor request");

            match self.send_once(&url, endpoint).await {
                Err(err) if attempt < self.max_retries && err.is_retryable() => {
                    attempt += 1;
                    warn!(url = %url, attempt, error = %err, "retrying dracor request");
                    tokio::time::sleep(Duration::from_millis(
                        RETRY_BACKOFF_MS * u64::from(attempt),
                    ))
                    .await;
                }
                result => return result,
            }
        }
    }
}

fn transport_error(path: &str, err: &reqwest::Error) -> ApiError {
    let message = if err.is_timeout() {
        "request timed out".to_string()
    } else if err.is_connect() {
        format!("connection failed: {err}")
    } else {
        err.to_string()
    };

    warn!(path = %path, error = %message, "dracor transport failure");
    ApiError::Transport {
        path: path.to_string(),
        message,
    }
}

fn summarize_body(body: String) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= MAX_ERROR_BODY_CHARS {
        return trimmed.to_string();
    }

    trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect()
}

use std::{borrow::Cow, fmt};

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Details of a failed HTTP exchange with Spotify: a human-readable message, the response status code and the parsed
/// response body, where available.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiErrorDetail {
    pub message: String,
    pub status: Option<u16>,
    pub body: Option<Value>,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The given construction arguments are invalid or contradict each other.
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// The access token was rejected, an OAuth exchange failed, or the authorization callback was invalid.
    #[error("Authentication failed: {0}")]
    Authentication(ApiErrorDetail),
    #[error("Bad request: {0}")]
    BadRequest(ApiErrorDetail),
    #[error("Forbidden: {0}")]
    Forbidden(ApiErrorDetail),
    #[error("Not found: {0}")]
    NotFound(ApiErrorDetail),
    #[error("Request rate limit hit: {detail}")]
    RateLimit {
        detail: ApiErrorDetail,
        /// Seconds to wait before retrying, from the response's `Retry-After` header.
        retry_after: Option<u64>,
    },
    #[error("Spotify server error: {0}")]
    Server(ApiErrorDetail),
    /// An error response with a status code that doesn't map onto any of the other variants.
    #[error("Unhandled API error: {0}")]
    Api(ApiErrorDetail),

    /// The connection failed or timed out. Returned once all retries are exhausted.
    #[error("Connection error: {0}")]
    Connection(#[source] reqwest::Error),

    #[error("Invalid response from Spotify: {0}")]
    InvalidResponse(String),
    #[error("Failed to deserialize response: {0}")]
    Deserialize(#[from] serde_json::Error),

    #[error("Token cache error: {0}")]
    TokenCache(#[source] std::io::Error),

    #[error(transparent)]
    HttpError(#[from] reqwest::Error),
}

impl ApiErrorDetail {
    pub fn new<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            status: None,
            body: None,
        }
    }

    pub(crate) fn from_response(message: String, status: StatusCode, body: Option<Value>) -> Self {
        Self {
            message,
            status: Some(status.as_u16()),
            body,
        }
    }
}

impl fmt::Display for ApiErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl Error {
    /// Maps an unsuccessful response status onto an error kind.
    pub(crate) fn from_status(status: StatusCode, detail: ApiErrorDetail, retry_after: Option<u64>) -> Self {
        match status {
            StatusCode::BAD_REQUEST => Self::BadRequest(detail),
            StatusCode::UNAUTHORIZED => Self::Authentication(detail),
            StatusCode::FORBIDDEN => Self::Forbidden(detail),
            StatusCode::NOT_FOUND => Self::NotFound(detail),
            StatusCode::TOO_MANY_REQUESTS => Self::RateLimit { detail, retry_after },
            status if status.is_server_error() => Self::Server(detail),
            _ => Self::Api(detail),
        }
    }

    /// Classifies an error from sending a request or reading its response. Connection failures and timeouts become
    /// [Connection](Error::Connection) errors, which are retried.
    pub(crate) fn from_send_error(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() || err.is_request() || err.is_body() {
            Self::Connection(err)
        } else {
            Self::HttpError(err)
        }
    }

    pub(crate) fn authentication<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self::Authentication(ApiErrorDetail::new(message))
    }

    fn detail(&self) -> Option<&ApiErrorDetail> {
        match self {
            Self::Authentication(detail)
            | Self::BadRequest(detail)
            | Self::Forbidden(detail)
            | Self::NotFound(detail)
            | Self::RateLimit { detail, .. }
            | Self::Server(detail)
            | Self::Api(detail) => Some(detail),
            _ => None,
        }
    }

    /// Returns the human-readable message of this error.
    pub fn message(&self) -> Cow<'_, str> {
        match self.detail() {
            Some(detail) => Cow::Borrowed(&detail.message),
            None => Cow::Owned(self.to_string()),
        }
    }

    /// Returns the HTTP status code of the response that caused this error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Connection(err) | Self::HttpError(err) => err.status().map(|status| status.as_u16()),
            other => other.detail().and_then(|detail| detail.status),
        }
    }

    /// Returns the parsed body of the response that caused this error, if it was JSON.
    pub fn response_body(&self) -> Option<&Value> {
        self.detail().and_then(|detail| detail.body.as_ref())
    }

    /// Returns the amount of seconds Spotify asked to wait before retrying, if this is a rate limit error.
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            Self::RateLimit { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    /// Whether a request that failed with this error may succeed if sent again: connection failures, rate limiting
    /// and server errors.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::RateLimit { .. } | Self::Server(_))
    }
}

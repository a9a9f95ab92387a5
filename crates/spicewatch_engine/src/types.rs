use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ServiceError {
    pub kind: ServiceErrorKind,
    pub message: String,
}

impl ServiceError {
    pub fn new(kind: ServiceErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceErrorKind {
    InvalidUrl,
    Network,
    Timeout,
    HttpStatus(u16),
    Decode,
    /// The body carried an `error` payload despite a success status.
    Rejected,
}

impl fmt::Display for ServiceErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceErrorKind::InvalidUrl => write!(f, "invalid url"),
            ServiceErrorKind::Network => write!(f, "network error"),
            ServiceErrorKind::Timeout => write!(f, "timeout"),
            ServiceErrorKind::HttpStatus(code) => write!(f, "http status {code}"),
            ServiceErrorKind::Decode => write!(f, "malformed response"),
            ServiceErrorKind::Rejected => write!(f, "rejected"),
        }
    }
}

/// A single provider call failed. Always a chain-continue signal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("provider {0} is not configured")]
    NotConfigured(&'static str),
    #[error("invalid provider url: {0}")]
    InvalidUrl(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("provider request timed out")]
    Timeout,
    #[error("http status {status}: {message}")]
    HttpStatus { status: u16, message: String },
    #[error("malformed provider response: {0}")]
    Decode(String),
    #[error("provider returned an error payload: {0}")]
    ErrorPayload(String),
    #[error("provider response had no usable fields")]
    Unusable,
}

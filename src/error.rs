//! Error types for place-distance

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for place-distance operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Server error: {0}")]
    Server(String),

    #[error("No map link: {0}")]
    NoMapLink(String),

    #[error(transparent)]
    Geocode(#[from] GeocodeError),
}

/// Result type alias for place-distance operations
pub type Result<T> = std::result::Result<T, Error>;

/// Classification of an unrecoverable geocoding failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ErrorKind {
    /// HTTP 429, retries exhausted
    RateLimited,
    /// HTTP 403
    Blocked,
    /// Connection, DNS or timeout failure, retries exhausted
    NetworkError,
    /// Any other non-success status
    HttpError { status: u16 },
    /// The provider answered with something we could not read
    InvalidResponse,
}

impl ErrorKind {
    /// Whether the retry policy should try again after this failure
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited | Self::NetworkError)
    }

    /// HTTP status attached to this failure, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::RateLimited => Some(429),
            Self::Blocked => Some(403),
            Self::HttpError { status } => Some(*status),
            Self::NetworkError | Self::InvalidResponse => None,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RateLimited => write!(f, "rate_limited"),
            Self::Blocked => write!(f, "blocked"),
            Self::NetworkError => write!(f, "network_error"),
            Self::HttpError { status } => write!(f, "http_error({})", status),
            Self::InvalidResponse => write!(f, "invalid_response"),
        }
    }
}

/// A classified geocoding failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Geocoding failed ({kind}): {message}")]
pub struct GeocodeError {
    pub kind: ErrorKind,
    pub message: String,
}

impl GeocodeError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

//! HTTP transport used by geocoding clients
//!
//! A transport performs one GET and hands back the parsed JSON body, or a
//! transport error carrying the HTTP status when the server answered.

use crate::constants::api::USER_AGENT;
use crate::error::{ErrorKind, GeocodeError, Result};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// A single failed GET
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("server returned status {0}")]
    Status(u16),

    #[error("request failed: {0}")]
    Network(String),

    #[error("request timed out")]
    Timeout,

    #[error("invalid response body: {0}")]
    Decode(String),
}

impl From<TransportError> for GeocodeError {
    fn from(err: TransportError) -> Self {
        let kind = match &err {
            TransportError::Status(429) => ErrorKind::RateLimited,
            TransportError::Status(403) => ErrorKind::Blocked,
            TransportError::Status(status) => ErrorKind::HttpError { status: *status },
            TransportError::Network(_) | TransportError::Timeout => ErrorKind::NetworkError,
            TransportError::Decode(_) => ErrorKind::InvalidResponse,
        };
        GeocodeError::new(kind, err.to_string())
    }
}

/// Performs HTTP GET requests returning JSON
pub trait Transport: Send + Sync {
    /// GET `url` with the given query parameters and parse the body as JSON
    fn get_json(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> impl Future<Output = std::result::Result<serde_json::Value, TransportError>> + Send;
}

/// reqwest-backed transport with a per-request timeout
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport whose requests give up after `timeout`
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }
}

fn classify(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_decode() {
        TransportError::Decode(err.to_string())
    } else {
        TransportError::Network(err.to_string())
    }
}

impl Transport for HttpTransport {
    async fn get_json(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> std::result::Result<serde_json::Value, TransportError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        response.json().await.map_err(classify)
    }
}

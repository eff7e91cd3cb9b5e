//! Error types for fetch operations

use thiserror::Error;

/// Fetch operation errors
#[derive(Debug, Error)]
pub enum FetchError {
    // ============ Configuration Errors ============
    #[error("Invalid source URL: {url} - {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Invalid sources configuration: {message}")]
    InvalidConfig { message: String },

    // ============ Network Errors ============
    #[error("HTTP error: {status} - {message}")]
    HttpError { status: u16, message: String },

    #[error("Network error: {message}")]
    NetworkError { message: String },

    #[error("Request timeout after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("Rate limited by server. Retry after {retry_after} seconds")]
    RateLimited { retry_after: u64 },

    // ============ Content Errors ============
    #[error("Invalid document in {source_url}: {message}")]
    InvalidDocument { source_url: String, message: String },

    // ============ IO Errors ============
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for fetch operations
pub type Result<T> = std::result::Result<T, FetchError>;

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout {
                seconds: crate::http::TIMEOUT_SECS,
            }
        } else if e.is_connect() {
            FetchError::NetworkError {
                message: format!("Connection failed: {}", e),
            }
        } else if let Some(status) = e.status() {
            FetchError::HttpError {
                status: status.as_u16(),
                message: e.to_string(),
            }
        } else {
            FetchError::NetworkError {
                message: e.to_string(),
            }
        }
    }
}

impl From<serde_yaml::Error> for FetchError {
    fn from(e: serde_yaml::Error) -> Self {
        FetchError::Serialization(e.to_string())
    }
}

impl From<url::ParseError> for FetchError {
    fn from(e: url::ParseError) -> Self {
        FetchError::InvalidUrl {
            url: String::new(),
            reason: e.to_string(),
        }
    }
}

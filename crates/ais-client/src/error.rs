//! Error types for AIS client operations

use thiserror::Error;

use crate::streaming::StreamError;
use crate::types::ApiProblem;

/// Result type alias for AIS client operations
pub type Result<T> = std::result::Result<T, AisClientError>;

/// Errors that can occur during AIS client operations
#[derive(Error, Debug)]
pub enum AisClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Server returned an error response
    #[error("API error {status}: {}", .problem.as_ref().map(|p| p.title.as_str()).unwrap_or("no details"))]
    Api {
        status: u16,
        problem: Option<ApiProblem>,
    },

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Stream session error
    #[error("Stream error: {0}")]
    StreamError(#[from] StreamError),
}

impl AisClientError {
    /// Create an API error from a status code and optional problem document
    pub fn api(status: u16, problem: Option<ApiProblem>) -> Self {
        Self::Api { status, problem }
    }

    /// HTTP status of an API error
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::HttpError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

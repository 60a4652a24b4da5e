//! Client configuration with YAML and TOML support

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AisClientError, Result};
use crate::streaming::DEFAULT_MAX_FRAME_LEN;

/// Documented base URL of the live AIS API
pub const DEFAULT_API_BASE: &str = "https://live.ais.barentswatch.no";

/// AIS client configuration
///
/// Can be loaded from YAML, TOML, or constructed programmatically.
/// Every section except `api_base` falls back to documented defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL for all API requests
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Bearer token sent with every request (obtained out of band)
    #[serde(default)]
    pub token: Option<String>,

    /// Endpoint paths relative to `api_base`
    #[serde(default)]
    pub endpoints: EndpointsConfig,

    /// Timeout settings
    #[serde(default)]
    pub timeouts: TimeoutsConfig,

    /// Stream decoding settings
    #[serde(default)]
    pub stream: StreamConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            token: None,
            endpoints: EndpointsConfig::default(),
            timeouts: TimeoutsConfig::default(),
            stream: StreamConfig::default(),
        }
    }
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

/// Endpoint paths
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointsConfig {
    /// Position-class messages, one JSON object per line
    pub ais: String,
    /// Position-class messages as Server-Sent Events
    pub sse_ais: String,
    /// Combined messages, one JSON object per line
    pub combined: String,
    /// Combined messages as Server-Sent Events
    pub sse_combined: String,
    /// Latest position-class message per vessel
    pub latest_ais: String,
    /// Latest combined message per vessel
    pub latest_combined: String,
    /// Area covered by the open data set
    pub open_ais_area: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            ais: "/v1/ais".to_string(),
            sse_ais: "/v1/sse/ais".to_string(),
            combined: "/v1/combined".to_string(),
            sse_combined: "/v1/sse/combined".to_string(),
            latest_ais: "/v1/latest/ais".to_string(),
            latest_combined: "/v1/latest/combined".to_string(),
            open_ais_area: "/v1/openaisarea".to_string(),
        }
    }
}

/// Timeout configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeoutsConfig {
    /// Timeout for non-streaming requests in milliseconds (default: 30s)
    #[serde(default = "default_request_timeout")]
    pub request_ms: u64,

    /// Connect timeout in milliseconds (default: 10s)
    #[serde(default = "default_connect_timeout")]
    pub connect_ms: u64,

    /// Cancel streams after this many milliseconds (default: never)
    #[serde(default)]
    pub stream_ms: Option<u64>,
}

impl Default for TimeoutsConfig {
    fn default() -> Self {
        Self {
            request_ms: default_request_timeout(),
            connect_ms: default_connect_timeout(),
            stream_ms: None,
        }
    }
}

impl TimeoutsConfig {
    pub fn request(&self) -> Duration {
        Duration::from_millis(self.request_ms)
    }

    pub fn connect(&self) -> Duration {
        Duration::from_millis(self.connect_ms)
    }

    pub fn stream(&self) -> Option<Duration> {
        self.stream_ms.map(Duration::from_millis)
    }
}

fn default_request_timeout() -> u64 {
    30_000 // 30 seconds
}

fn default_connect_timeout() -> u64 {
    10_000 // 10 seconds
}

/// Stream decoding configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Largest accepted line in bytes
    #[serde(default = "default_max_frame_len")]
    pub max_frame_len: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            max_frame_len: default_max_frame_len(),
        }
    }
}

fn default_max_frame_len() -> usize {
    DEFAULT_MAX_FRAME_LEN
}

impl ClientConfig {
    /// Configuration pointing at a different server, other settings default
    pub fn with_api_base(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            ..Default::default()
        }
    }

    /// Load configuration from a file, picking the format by extension
    ///
    /// `.yaml`/`.yml` are parsed as YAML, everything else as TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&content),
            _ => Self::from_toml(&content),
        }
    }

    /// Parse configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| AisClientError::ConfigError(e.to_string()))
    }

    /// Parse configuration from TOML string
    pub fn from_toml(toml: &str) -> Result<Self> {
        toml::from_str(toml).map_err(|e| AisClientError::ConfigError(e.to_string()))
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| AisClientError::ConfigError(e.to_string()))
    }
}

//! Configuration file handling for ais-cli

use ais_client::ClientConfig;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::output::OutputFormat;

/// Configuration for the CLI tool
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Default API base URL
    pub server: Option<String>,
    /// Bearer token for the API
    pub token: Option<String>,
    /// Default output format
    pub output: Option<String>,
    /// Disable colored output
    pub no_color: Option<bool>,
    /// Full client configuration file (YAML or TOML)
    pub client_config: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the default config file
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Get the default config file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("ais-cli");

        Ok(config_dir.join("config.toml"))
    }

    /// Merge CLI arguments over config file values
    pub fn merge_with_args(&self, args: &ArgOverrides) -> Result<MergedConfig> {
        let output = match args.output {
            Some(format) => format,
            None => match self.output.as_deref() {
                Some(name) => name
                    .parse()
                    .map_err(|e| anyhow!("Invalid output format in config: {}", e))?,
                None => OutputFormat::default(),
            },
        };

        let client_path = args.client_config.as_ref().or(self.client_config.as_ref());
        let mut client = match client_path {
            Some(path) => ClientConfig::load(path).with_context(|| {
                format!("Failed to load client config: {}", path.display())
            })?,
            None => ClientConfig::default(),
        };

        // Flags and the CLI config file win over the client config file
        if let Some(server) = args.server.as_ref().or(self.server.as_ref()) {
            client.api_base = server.clone();
        }
        if let Some(token) = args.token.as_ref().or(self.token.as_ref()) {
            client.token = Some(token.clone());
        }

        Ok(MergedConfig {
            client,
            output,
            no_color: args.no_color || self.no_color.unwrap_or(false),
        })
    }
}

/// Values given on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct ArgOverrides {
    pub server: Option<String>,
    pub token: Option<String>,
    pub output: Option<OutputFormat>,
    pub no_color: bool,
    pub client_config: Option<PathBuf>,
}

/// Fully resolved configuration after merging CLI args
#[derive(Debug, Clone)]
pub struct MergedConfig {
    pub client: ClientConfig,
    pub output: OutputFormat,
    pub no_color: bool,
}

//! AIS CLI - Command-line tool for the live AIS vessel-tracking feed
//!
//! Streams, snapshots and offline decoding of captured feeds.

mod commands;
mod config;
mod output;

use ais_client::{AisClient, Framing};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::commands::StreamArgs;
use crate::config::{ArgOverrides, Config};
use crate::output::{OutputContext, OutputFormat};

#[derive(Parser)]
#[command(name = "ais-cli")]
#[command(author, version, about = "Live AIS vessel-tracking CLI")]
#[command(propagate_version = true)]
struct Cli {
    /// API base URL
    #[arg(short, long, env = "AIS_SERVER")]
    server: Option<String>,

    /// Bearer token for the API
    #[arg(long, env = "AIS_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Configuration file path
    #[arg(short, long, env = "AIS_CONFIG")]
    config: Option<PathBuf>,

    /// Client configuration file (YAML or TOML) with endpoints and timeouts
    #[arg(long, env = "AIS_CLIENT_CONFIG")]
    client_config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Minimal output (for scripting)
    #[arg(short, long)]
    quiet: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Which family of records to read
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Feed {
    /// Position, aid-to-navigation and static data messages
    Ais,
    /// Merged per-vessel records
    Combined,
}

/// Record family of a captured file
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DecodeKind {
    Ais,
    Combined,
    /// Untyped JSON objects
    Raw,
}

#[derive(Subcommand)]
enum Commands {
    /// Follow a live feed until interrupted
    Stream {
        /// Feed to follow
        #[arg(value_enum)]
        feed: Feed,

        /// Use the Server-Sent Events endpoint
        #[arg(long)]
        sse: bool,

        #[command(flatten)]
        args: StreamArgs,
    },

    /// Latest message per vessel
    Latest {
        /// Feed to query
        #[arg(value_enum)]
        feed: Feed,

        /// Only vessels heard from after this time (RFC 3339)
        #[arg(long)]
        since: Option<DateTime<Utc>>,
    },

    /// Show the area covered by open AIS data
    Area,

    /// Decode a captured feed from a file ("-" for stdin)
    Decode {
        /// Captured body
        file: PathBuf,

        /// Line framing: plain or sse
        #[arg(long, default_value = "plain")]
        framing: Framing,

        /// Record family
        #[arg(long, value_enum, default_value = "combined")]
        kind: DecodeKind,

        /// Stop after this many messages
        #[arg(long)]
        limit: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();

    // Load config file
    let config = if let Some(config_path) = &cli.config {
        Config::load_from(config_path)?
    } else {
        Config::load().unwrap_or_default()
    };

    // Merge CLI args with config
    let merged = config.merge_with_args(&ArgOverrides {
        server: cli.server.clone(),
        token: cli.token.clone(),
        output: cli.output,
        no_color: cli.no_color,
        client_config: cli.client_config.clone(),
    })?;

    // Create output context
    let ctx = OutputContext::new(merged.output, merged.no_color, cli.quiet);

    // Ctrl+C cancels whatever is in flight
    let shutdown = CancellationToken::new();
    let on_interrupt = shutdown.clone();
    ctrlc::set_handler(move || on_interrupt.cancel())
        .context("Failed to install Ctrl+C handler")?;

    // Execute command
    match cli.command {
        Commands::Stream { feed, sse, args } => {
            let client = create_client(merged.client)?;
            commands::stream(&client, feed, sse, &args, &shutdown, &ctx).await?;
        }

        Commands::Latest { feed, since } => {
            let client = create_client(merged.client)?;
            commands::latest(&client, feed, since, &shutdown, &ctx).await?;
        }

        Commands::Area => {
            let client = create_client(merged.client)?;
            commands::area(&client, &shutdown, &ctx).await?;
        }

        Commands::Decode {
            file,
            framing,
            kind,
            limit,
        } => {
            let max_frame_len = merged.client.stream.max_frame_len;
            commands::decode(&file, framing, kind, limit, max_frame_len, &shutdown, &ctx).await?;
        }
    }

    Ok(())
}

/// Create an AIS client from the merged configuration
fn create_client(config: ais_client::ClientConfig) -> Result<AisClient> {
    AisClient::from_config(config).context("Failed to create AIS client")
}

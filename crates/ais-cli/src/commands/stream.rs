//! Stream command - follow a live feed

use std::time::Duration;

use ais_client::{AisClient, CombinedFilterInput, FilterInput, ModelFormat, ModelType};
use anyhow::{bail, Context, Result};
use clap::Args;
use tokio_util::sync::CancellationToken;

use super::consume;
use crate::output::OutputContext;
use crate::Feed;

/// Filters and limits shared by the stream variants
#[derive(Debug, Clone, Default, Args)]
pub struct StreamArgs {
    /// Only these vessels (repeatable; the combined feed takes one)
    #[arg(long)]
    pub mmsi: Vec<u32>,

    /// Request the full record model (combined feed)
    #[arg(long)]
    pub full: bool,

    /// Request GeoJSON records (combined feed)
    #[arg(long)]
    pub geojson: bool,

    /// Ask the server to downsample positions
    #[arg(long)]
    pub downsample: bool,

    /// Stop after this many messages
    #[arg(long)]
    pub limit: Option<usize>,

    /// Stop after this many seconds
    #[arg(long)]
    pub timeout: Option<u64>,
}

impl StreamArgs {
    /// True when a filter body has to be posted
    pub fn has_filter(&self) -> bool {
        !self.mmsi.is_empty() || self.full || self.geojson || self.downsample
    }

    pub fn ais_filter(&self) -> FilterInput {
        FilterInput {
            mmsi: self.mmsi.clone(),
            downsample: self.downsample,
            ..FilterInput::all_messages()
        }
    }

    pub fn combined_filter(&self) -> Result<CombinedFilterInput> {
        if self.mmsi.len() > 1 {
            bail!("the combined feed filters on a single MMSI");
        }
        Ok(CombinedFilterInput {
            mmsi: self.mmsi.first().copied(),
            model_type: if self.full {
                ModelType::Full
            } else {
                ModelType::Simple
            },
            model_format: if self.geojson {
                ModelFormat::Geojson
            } else {
                ModelFormat::Json
            },
            downsample: self.downsample,
            ..Default::default()
        })
    }
}

/// Follow a feed, printing each message as it arrives
pub async fn stream(
    client: &AisClient,
    feed: Feed,
    sse: bool,
    args: &StreamArgs,
    shutdown: &CancellationToken,
    ctx: &OutputContext,
) -> Result<()> {
    ctx.info(&format!(
        "Following the {} feed{}...",
        match feed {
            Feed::Ais => "ais",
            Feed::Combined => "combined",
        },
        if sse { " (event stream)" } else { "" }
    ));
    ctx.info("Press Ctrl+C to stop");

    let timeout = args.timeout.map(Duration::from_secs);

    match feed {
        Feed::Ais => {
            let response = match (sse, args.has_filter()) {
                (false, false) => client.get_ais().await,
                (false, true) => client.post_ais(&args.ais_filter()).await,
                (true, false) => client.get_sse_ais().await,
                (true, true) => client.post_sse_ais(&args.ais_filter()).await,
            }
            .context("Failed to open the ais feed")?;
            let session = response.open_with_cancel(shutdown.clone())?;
            if let Some(timeout) = timeout {
                session.cancel_after(timeout);
            }
            consume(session, args.limit, ctx).await?;
        }
        Feed::Combined => {
            let filter = args.combined_filter()?;
            let response = match (sse, args.has_filter()) {
                (false, false) => client.get_combined().await,
                (false, true) => client.post_combined(&filter).await,
                (true, false) => client.get_sse_combined().await,
                (true, true) => client.post_sse_combined(&filter).await,
            }
            .context("Failed to open the combined feed")?;
            let session = response.open_with_cancel(shutdown.clone())?;
            if let Some(timeout) = timeout {
                session.cancel_after(timeout);
            }
            consume(session, args.limit, ctx).await?;
        }
    }

    Ok(())
}

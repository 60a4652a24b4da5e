//! Latest command - one message per vessel

use ais_client::AisClient;
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;

use crate::output::OutputContext;
use crate::Feed;

/// Fetch and print the latest message of every vessel
pub async fn latest(
    client: &AisClient,
    feed: Feed,
    since: Option<DateTime<Utc>>,
    shutdown: &CancellationToken,
    ctx: &OutputContext,
) -> Result<()> {
    match feed {
        Feed::Ais => {
            let messages = tokio::select! {
                result = client.latest_ais(since) => result.context("Failed to fetch latest ais")?,
                _ = shutdown.cancelled() => bail!("Interrupted"),
            };
            ctx.print_records(&messages);
        }
        Feed::Combined => {
            let messages = tokio::select! {
                result = client.latest_combined(since) => result.context("Failed to fetch latest combined")?,
                _ = shutdown.cancelled() => bail!("Interrupted"),
            };
            ctx.print_records(&messages);
        }
    }

    Ok(())
}

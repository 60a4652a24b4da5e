//! Area command - coverage of the open data set

use ais_client::AisClient;
use anyhow::{bail, Context, Result};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::output::{OutputContext, OutputFormat};

/// Print the area covered by open AIS data
pub async fn area(client: &AisClient, shutdown: &CancellationToken, ctx: &OutputContext) -> Result<()> {
    let geometry = tokio::select! {
        result = client.open_ais_area() => result.context("Failed to fetch open AIS area")?,
        _ = shutdown.cancelled() => bail!("Interrupted"),
    };

    if ctx.format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&geometry)?);
        return Ok(());
    }

    let points = points(&geometry.coordinates);
    let mut pairs = vec![
        ("Type", geometry.kind.clone()),
        ("Points", points.len().to_string()),
    ];
    if let Some((min, max)) = bounds(&points) {
        pairs.push(("South-west", format!("{:.4}, {:.4}", min.1, min.0)));
        pairs.push(("North-east", format!("{:.4}, {:.4}", max.1, max.0)));
    }
    ctx.print_kv(&pairs);
    Ok(())
}

/// All `[lon, lat]` positions in a GeoJSON coordinate tree
fn points(coordinates: &Value) -> Vec<(f64, f64)> {
    match coordinates.as_array() {
        Some(items) => match items.as_slice() {
            [Value::Number(lon), Value::Number(lat), ..] => {
                lon.as_f64().zip(lat.as_f64()).into_iter().collect()
            }
            nested => nested.iter().flat_map(points).collect(),
        },
        None => Vec::new(),
    }
}

/// South-west and north-east corners, as `(lon, lat)`
fn bounds(points: &[(f64, f64)]) -> Option<((f64, f64), (f64, f64))> {
    let (first, rest) = points.split_first()?;
    Some(rest.iter().fold((*first, *first), |(min, max), &(lon, lat)| {
        ((min.0.min(lon), min.1.min(lat)), (max.0.max(lon), max.1.max(lat)))
    }))
}

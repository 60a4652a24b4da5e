//! Request and response types for the AIS client

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Error Responses
// =============================================================================

/// Problem document returned with non-2xx responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiProblem {
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub status: u16,
    #[serde(default)]
    pub trace_id: Option<String>,
}

// =============================================================================
// Filter Types
// =============================================================================

/// Level of detail for combined messages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelType {
    #[default]
    Simple,
    Full,
}

/// Encoding of combined messages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelFormat {
    #[default]
    Json,
    Geojson,
}

/// GeoJSON geometry used to restrict a query to an area
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: serde_json::Value,
}

impl Geometry {
    /// Closed polygon from `(longitude, latitude)` corners
    pub fn polygon(corners: &[(f64, f64)]) -> Self {
        let mut ring: Vec<[f64; 2]> = corners.iter().map(|&(lon, lat)| [lon, lat]).collect();
        if let (Some(first), Some(last)) = (ring.first().copied(), ring.last().copied()) {
            if first != last {
                ring.push(first);
            }
        }
        Self {
            kind: "Polygon".to_string(),
            coordinates: serde_json::json!([ring]),
        }
    }
}

/// Filter for the `ais` streaming endpoints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Geometry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mmsi: Vec<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ship_types: Vec<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub country_codes: Vec<String>,
    #[serde(default)]
    pub include_position: bool,
    #[serde(default)]
    pub include_static: bool,
    #[serde(default)]
    pub include_aton: bool,
    #[serde(default)]
    pub include_safety_related: bool,
    #[serde(default)]
    pub include_binary_broadcast_met_hyd: bool,
    #[serde(default)]
    pub downsample: bool,
}

impl FilterInput {
    /// Filter that requests position, static and aid-to-navigation messages
    pub fn all_messages() -> Self {
        Self {
            include_position: true,
            include_static: true,
            include_aton: true,
            ..Default::default()
        }
    }
}

/// Filter for the `combined` streaming endpoints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedFilterInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Geometry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mmsi: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ship_types: Vec<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub country_codes: Vec<String>,
    #[serde(default)]
    pub model_type: ModelType,
    #[serde(default)]
    pub model_format: ModelFormat,
    #[serde(default)]
    pub downsample: bool,
}

/// Filter for the `latest/ais` endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestAisFilterInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Geometry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mmsi: Vec<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ship_types: Vec<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub country_codes: Vec<String>,
    #[serde(default)]
    pub include_position: bool,
    #[serde(default)]
    pub include_static: bool,
    #[serde(default)]
    pub include_aton: bool,
    #[serde(default)]
    pub include_safety_related: bool,
    #[serde(default)]
    pub include_binary_broadcast_met_hyd: bool,
}

//! Combined position + static messages from the `combined` endpoints
//!
//! The upstream API does not tag these messages. The shape a client receives
//! depends on the requested model type and format, so the variant is
//! recovered from which keys are present:
//!
//! | top-level `properties` | `eta` | variant |
//! |---|---|---|
//! | no  | no  | [`CombinedMessage::SimpleJson`] |
//! | no  | yes | [`CombinedMessage::FullJson`] |
//! | yes | no  | [`CombinedMessage::SimpleGeojson`] |
//! | yes | yes | [`CombinedMessage::FullGeojson`] |
//!
//! For GeoJSON, `eta` is looked up inside `properties`.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::value::RawValue;

use crate::streaming::{DecodeError, StreamMessage};

/// Flat record for model type `Simple`, format `Json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleJson {
    pub mmsi: u32,
    pub msgtime: DateTime<Utc>,
    pub name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub course_over_ground: Option<f64>,
    pub speed_over_ground: Option<f64>,
    pub rate_of_turn: Option<f64>,
    pub true_heading: Option<i32>,
    pub ship_type: Option<i32>,
}

/// Voyage and hull details present only on `Full` records
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoyageDetails {
    pub imo_number: Option<i32>,
    pub call_sign: Option<String>,
    pub destination: Option<String>,
    pub eta: Option<String>,
    pub draught: Option<i32>,
    pub ship_length: Option<i32>,
    pub ship_width: Option<i32>,
    pub dimension_a: Option<i32>,
    pub dimension_b: Option<i32>,
    pub dimension_c: Option<i32>,
    pub dimension_d: Option<i32>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub position_fixing_device_type: i32,
    pub report_class: Option<String>,
}

/// Flat record for model type `Full`, format `Json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullJson {
    #[serde(flatten)]
    pub simple: SimpleJson,
    pub altitude: Option<i32>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub navigational_status: i32,
    #[serde(flatten)]
    pub voyage: VoyageDetails,
}

/// GeoJSON point geometry, coordinates as `[longitude, latitude]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointGeometry {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub coordinates: Vec<f64>,
}

/// GeoJSON feature envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature<P> {
    #[serde(rename = "type")]
    pub kind: String,
    pub geometry: PointGeometry,
    pub properties: P,
}

/// Feature properties for model type `Simple`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleProperties {
    pub mmsi: u32,
    pub msgtime: DateTime<Utc>,
    pub name: Option<String>,
    pub course_over_ground: Option<f64>,
    pub speed_over_ground: Option<f64>,
    pub rate_of_turn: Option<f64>,
    pub true_heading: Option<i32>,
    pub ship_type: Option<i32>,
}

/// Feature properties for model type `Full`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullProperties {
    #[serde(flatten)]
    pub simple: SimpleProperties,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub navigational_status: i32,
    #[serde(flatten)]
    pub voyage: VoyageDetails,
}

/// GeoJSON record for model type `Simple`
pub type SimpleGeojson = Feature<SimpleProperties>;

/// GeoJSON record for model type `Full`
pub type FullGeojson = Feature<FullProperties>;

/// Variant tag of a [`CombinedMessage`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CombinedKind {
    SimpleJson,
    FullJson,
    SimpleGeojson,
    FullGeojson,
}

impl CombinedKind {
    /// Combine the two shape checks into a variant
    pub fn from_shape(geojson: bool, full: bool) -> Self {
        match (geojson, full) {
            (false, false) => Self::SimpleJson,
            (false, true) => Self::FullJson,
            (true, false) => Self::SimpleGeojson,
            (true, true) => Self::FullGeojson,
        }
    }

    pub fn is_geojson(&self) -> bool {
        matches!(self, Self::SimpleGeojson | Self::FullGeojson)
    }

    pub fn is_full(&self) -> bool {
        matches!(self, Self::FullJson | Self::FullGeojson)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SimpleJson => "SimpleJson",
            Self::FullJson => "FullJson",
            Self::SimpleGeojson => "SimpleGeojson",
            Self::FullGeojson => "FullGeojson",
        }
    }
}

impl fmt::Display for CombinedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Determine the variant of an untagged combined message
///
/// Only the key sets are inspected; values are left unparsed.
pub fn classify(bytes: &[u8]) -> Result<CombinedKind, DecodeError> {
    let keys: HashMap<String, &RawValue> = serde_json::from_slice(bytes)?;

    let (geojson, full) = match keys.get("properties") {
        Some(properties) => {
            // `null` properties still mean GeoJSON, just without `eta`
            let nested: Option<HashMap<String, &RawValue>> = serde_json::from_str(properties.get())?;
            (true, nested.is_some_and(|p| p.contains_key("eta")))
        }
        None => (false, keys.contains_key("eta")),
    };

    Ok(CombinedKind::from_shape(geojson, full))
}

/// A message from the `combined` endpoints
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CombinedMessage {
    SimpleJson(SimpleJson),
    FullJson(FullJson),
    SimpleGeojson(SimpleGeojson),
    FullGeojson(FullGeojson),
}

impl CombinedMessage {
    /// Classify, then decode into the selected shape
    pub fn from_slice(bytes: &[u8]) -> Result<Self, DecodeError> {
        let message = match classify(bytes)? {
            CombinedKind::SimpleJson => Self::SimpleJson(serde_json::from_slice(bytes)?),
            CombinedKind::FullJson => Self::FullJson(serde_json::from_slice(bytes)?),
            CombinedKind::SimpleGeojson => Self::SimpleGeojson(serde_json::from_slice(bytes)?),
            CombinedKind::FullGeojson => Self::FullGeojson(serde_json::from_slice(bytes)?),
        };
        Ok(message)
    }

    pub fn kind(&self) -> CombinedKind {
        match self {
            Self::SimpleJson(_) => CombinedKind::SimpleJson,
            Self::FullJson(_) => CombinedKind::FullJson,
            Self::SimpleGeojson(_) => CombinedKind::SimpleGeojson,
            Self::FullGeojson(_) => CombinedKind::FullGeojson,
        }
    }

    pub fn mmsi(&self) -> u32 {
        match self {
            Self::SimpleJson(m) => m.mmsi,
            Self::FullJson(m) => m.simple.mmsi,
            Self::SimpleGeojson(m) => m.properties.mmsi,
            Self::FullGeojson(m) => m.properties.simple.mmsi,
        }
    }

    pub fn msgtime(&self) -> DateTime<Utc> {
        match self {
            Self::SimpleJson(m) => m.msgtime,
            Self::FullJson(m) => m.simple.msgtime,
            Self::SimpleGeojson(m) => m.properties.msgtime,
            Self::FullGeojson(m) => m.properties.simple.msgtime,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Self::SimpleJson(m) => m.name.as_deref(),
            Self::FullJson(m) => m.simple.name.as_deref(),
            Self::SimpleGeojson(m) => m.properties.name.as_deref(),
            Self::FullGeojson(m) => m.properties.simple.name.as_deref(),
        }
    }

    /// `(longitude, latitude)` when the record carries a position
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match self {
            Self::SimpleJson(m) => m.longitude.zip(m.latitude),
            Self::FullJson(m) => m.simple.longitude.zip(m.simple.latitude),
            Self::SimpleGeojson(Feature { geometry, .. })
            | Self::FullGeojson(Feature { geometry, .. }) => match geometry.coordinates[..] {
                [lon, lat, ..] => Some((lon, lat)),
                _ => None,
            },
        }
    }

    /// Voyage details, present on `Full` variants only
    pub fn voyage(&self) -> Option<&VoyageDetails> {
        match self {
            Self::FullJson(m) => Some(&m.voyage),
            Self::FullGeojson(m) => Some(&m.properties.voyage),
            _ => None,
        }
    }

    pub fn as_simple_json(&self) -> Option<&SimpleJson> {
        match self {
            Self::SimpleJson(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_full_json(&self) -> Option<&FullJson> {
        match self {
            Self::FullJson(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_simple_geojson(&self) -> Option<&SimpleGeojson> {
        match self {
            Self::SimpleGeojson(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_full_geojson(&self) -> Option<&FullGeojson> {
        match self {
            Self::FullGeojson(m) => Some(m),
            _ => None,
        }
    }
}

impl StreamMessage for CombinedMessage {
    fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        Self::from_slice(bytes)
    }
}

impl<'de> Deserialize<'de> for CombinedMessage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Box::<RawValue>::deserialize(deserializer)?;
        Self::from_slice(raw.get().as_bytes()).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const SIMPLE_JSON: &str = r#"{"mmsi":257347700,"name":"HAVILA","msgtime":"2023-01-24T10:15:00+00:00"}"#;
    const FULL_JSON: &str = r#"{"mmsi":257347700,"name":"HAVILA","msgtime":"2023-01-24T10:15:00+00:00","latitude":69.6,"longitude":18.9,"navigationalStatus":0,"eta":"01241800","destination":"TROMSO","shipLength":124}"#;
    const SIMPLE_GEOJSON: &str = r#"{"type":"Feature","geometry":{"type":"Point","coordinates":[18.9,69.6]},"properties":{"mmsi":257347700,"name":"HAVILA","msgtime":"2023-01-24T10:15:00+00:00","speedOverGround":12.3}}"#;
    const FULL_GEOJSON: &str = r#"{"type":"Feature","geometry":{"type":"Point","coordinates":[18.9,69.6]},"properties":{"mmsi":257347700,"name":"HAVILA","msgtime":"2023-01-24T10:15:00+00:00","eta":"01241800","callSign":"LAXY","navigationalStatus":5,"shipWidth":21}}"#;

    #[rstest]
    #[case(SIMPLE_JSON, CombinedKind::SimpleJson)]
    #[case(FULL_JSON, CombinedKind::FullJson)]
    #[case(SIMPLE_GEOJSON, CombinedKind::SimpleGeojson)]
    #[case(FULL_GEOJSON, CombinedKind::FullGeojson)]
    fn test_classify(#[case] json: &str, #[case] expected: CombinedKind) {
        assert_eq!(classify(json.as_bytes()).unwrap(), expected);
        assert_eq!(CombinedMessage::from_slice(json.as_bytes()).unwrap().kind(), expected);
    }

    #[test]
    fn test_shape_table() {
        assert_eq!(CombinedKind::from_shape(false, false), CombinedKind::SimpleJson);
        assert_eq!(CombinedKind::from_shape(false, true), CombinedKind::FullJson);
        assert_eq!(CombinedKind::from_shape(true, false), CombinedKind::SimpleGeojson);
        assert_eq!(CombinedKind::from_shape(true, true), CombinedKind::FullGeojson);
    }

    #[test]
    fn test_top_level_eta_ignored_for_geojson() {
        let json = r#"{"type":"Feature","eta":"x","geometry":{"type":"Point","coordinates":[1,2]},"properties":{"mmsi":1,"msgtime":"2023-01-24T10:15:00Z"}}"#;
        assert_eq!(classify(json.as_bytes()).unwrap(), CombinedKind::SimpleGeojson);
    }

    #[test]
    fn test_null_properties_is_simple_geojson() {
        let json = r#"{"type":"Feature","properties":null}"#;
        assert_eq!(classify(json.as_bytes()).unwrap(), CombinedKind::SimpleGeojson);
        // ...but the typed decode still needs a real properties object
        assert!(CombinedMessage::from_slice(json.as_bytes()).is_err());
    }

    #[test]
    fn test_eta_heuristic_is_key_presence_only() {
        // A simple record that happens to carry `eta` (even null) is tagged Full.
        // This pins the upstream heuristic; if the API ever adds `eta` to
        // simple records this test documents the mis-tag.
        let json = r#"{"mmsi":1,"msgtime":"2023-01-24T10:15:00Z","eta":null}"#;
        let msg = CombinedMessage::from_slice(json.as_bytes()).unwrap();
        assert_eq!(msg.kind(), CombinedKind::FullJson);
        assert_eq!(msg.voyage().unwrap().eta, None);
    }

    #[test]
    fn test_classify_rejects_non_objects() {
        assert!(matches!(classify(b"[1,2]"), Err(DecodeError::Json(_))));
        assert!(matches!(classify(b"{\"mmsi\":"), Err(DecodeError::Json(_))));
        let bad_props = br#"{"properties":[1]}"#;
        assert!(matches!(classify(bad_props), Err(DecodeError::Json(_))));
    }

    #[test]
    fn test_full_json_fields() {
        let msg = CombinedMessage::from_slice(FULL_JSON.as_bytes()).unwrap();
        let full = msg.as_full_json().unwrap();

        assert_eq!(full.simple.mmsi, 257347700);
        assert_eq!(full.navigational_status, 0);
        assert_eq!(full.voyage.destination.as_deref(), Some("TROMSO"));
        assert_eq!(full.voyage.ship_length, Some(124));
        assert_eq!(full.voyage.draught, None);
        assert_eq!(msg.coordinates(), Some((18.9, 69.6)));
    }

    #[test]
    fn test_full_geojson_fields() {
        let msg = CombinedMessage::from_slice(FULL_GEOJSON.as_bytes()).unwrap();
        let feature = msg.as_full_geojson().unwrap();

        assert_eq!(feature.kind, "Feature");
        assert_eq!(feature.geometry.kind, "Point");
        assert_eq!(feature.properties.navigational_status, 5);
        assert_eq!(feature.properties.voyage.call_sign.as_deref(), Some("LAXY"));
        assert_eq!(feature.properties.voyage.ship_width, Some(21));
        assert_eq!(msg.name(), Some("HAVILA"));
        assert_eq!(msg.coordinates(), Some((18.9, 69.6)));
    }

    #[test]
    fn test_null_integers_read_as_zero() {
        let json = r#"{"mmsi":1,"msgtime":"2023-01-24T10:15:00Z","eta":"01241800","navigationalStatus":null,"positionFixingDeviceType":null}"#;
        let msg = CombinedMessage::from_slice(json.as_bytes()).unwrap();
        let full = msg.as_full_json().unwrap();
        assert_eq!(full.navigational_status, 0);
        assert_eq!(full.voyage.position_fixing_device_type, 0);

        let json = r#"{"type":"Feature","geometry":{"type":"Point","coordinates":null},"properties":{"mmsi":2,"msgtime":"2023-01-24T10:15:00Z","eta":null,"navigationalStatus":null,"positionFixingDeviceType":null}}"#;
        let msg = CombinedMessage::from_slice(json.as_bytes()).unwrap();
        let feature = msg.as_full_geojson().unwrap();
        assert_eq!(feature.properties.navigational_status, 0);
        assert_eq!(feature.properties.voyage.position_fixing_device_type, 0);
        assert_eq!(msg.coordinates(), None);
    }

    #[test]
    fn test_mmsi_and_msgtime_are_mandatory() {
        let json = r#"{"name":"NO IDENTITY","msgtime":"2023-01-24T10:15:00Z"}"#;
        assert!(matches!(CombinedMessage::from_slice(json.as_bytes()), Err(DecodeError::Json(_))));

        let json = r#"{"type":"Feature","geometry":{"type":"Point","coordinates":[1,2]},"properties":{"mmsi":1}}"#;
        assert!(matches!(CombinedMessage::from_slice(json.as_bytes()), Err(DecodeError::Json(_))));
    }

    #[test]
    fn test_simple_json_absent_vs_zero() {
        let json = r#"{"mmsi":1,"msgtime":"2023-01-24T10:15:00Z","trueHeading":0,"speedOverGround":null}"#;
        let msg = CombinedMessage::from_slice(json.as_bytes()).unwrap();
        let simple = msg.as_simple_json().unwrap();

        assert_eq!(simple.true_heading, Some(0));
        assert_eq!(simple.speed_over_ground, None);
        assert_eq!(simple.course_over_ground, None);
        assert_eq!(msg.coordinates(), None);
        assert!(msg.voyage().is_none());
    }

    #[test]
    fn test_serialize_preserves_shape() {
        let msg = CombinedMessage::from_slice(SIMPLE_GEOJSON.as_bytes()).unwrap();
        let bytes = serde_json::to_vec(&msg).unwrap();
        assert_eq!(classify(&bytes).unwrap(), CombinedKind::SimpleGeojson);
    }

    #[test]
    fn test_deserialize_array() {
        let json = format!("[{},{}]", SIMPLE_JSON, FULL_GEOJSON);
        let messages: Vec<CombinedMessage> = serde_json::from_str(&json).unwrap();
        assert_eq!(messages[0].kind(), CombinedKind::SimpleJson);
        assert_eq!(messages[1].kind(), CombinedKind::FullGeojson);
    }
}

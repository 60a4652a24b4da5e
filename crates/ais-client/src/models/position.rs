//! Position-class messages from the `ais` endpoints
//!
//! Every message carries an explicit `type` discriminator.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::value::RawValue;

use crate::streaming::{DecodeError, StreamMessage};

/// Position report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub message_type: i32,
    pub mmsi: u32,
    pub msgtime: DateTime<Utc>,
    pub altitude: Option<i32>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub course_over_ground: Option<f64>,
    pub ais_class: Option<String>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub navigational_status: i32,
    pub rate_of_turn: Option<f64>,
    pub speed_over_ground: Option<f64>,
    pub true_heading: Option<i32>,
}

/// Aid-to-navigation report (buoys, beacons, virtual marks)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AidToNavigation {
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub message_type: i32,
    pub mmsi: u32,
    pub msgtime: DateTime<Utc>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub name: Option<String>,
    pub dimension_a: Option<i32>,
    pub dimension_b: Option<i32>,
    pub dimension_c: Option<i32>,
    pub dimension_d: Option<i32>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub type_of_aids_to_navigation: i32,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub type_of_electronic_fixing_device: i32,
}

/// Static and voyage-related vessel data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticData {
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub message_type: i32,
    pub mmsi: u32,
    pub msgtime: DateTime<Utc>,
    pub name: Option<String>,
    pub dimension_a: Option<i32>,
    pub dimension_b: Option<i32>,
    pub dimension_c: Option<i32>,
    pub dimension_d: Option<i32>,
    pub imo_number: Option<i32>,
    pub call_sign: Option<String>,
    pub destination: Option<String>,
    pub eta: Option<String>,
    pub draught: Option<i32>,
    pub ship_length: Option<i32>,
    pub ship_width: Option<i32>,
    pub ship_type: Option<i32>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub position_fixing_device_type: i32,
    pub report_class: Option<String>,
}

/// Discriminator values of [`AisMessage`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AisMessageKind {
    Position,
    AidToNavigation,
    StaticData,
}

impl AisMessageKind {
    /// Wire value of the `type` field
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Position => "Position",
            Self::AidToNavigation => "Aton",
            Self::StaticData => "Staticdata",
        }
    }

    /// Look up a wire value
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "Position" => Some(Self::Position),
            "Aton" => Some(Self::AidToNavigation),
            "Staticdata" => Some(Self::StaticData),
            _ => None,
        }
    }
}

impl fmt::Display for AisMessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A message from the `ais` endpoints
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum AisMessage {
    Position(Position),
    #[serde(rename = "Aton")]
    AidToNavigation(AidToNavigation),
    #[serde(rename = "Staticdata")]
    StaticData(StaticData),
}

#[derive(Deserialize)]
struct Discriminator {
    #[serde(rename = "type")]
    kind: Option<String>,
}

impl AisMessage {
    /// Decode one JSON object, dispatching on its `type` field
    pub fn from_slice(bytes: &[u8]) -> Result<Self, DecodeError> {
        let discriminator: Discriminator = serde_json::from_slice(bytes)?;
        let kind = match discriminator.kind {
            Some(kind) => kind,
            None => {
                return Err(<serde_json::Error as serde::de::Error>::missing_field("type").into())
            }
        };

        match AisMessageKind::from_wire(&kind) {
            Some(AisMessageKind::Position) => Ok(Self::Position(serde_json::from_slice(bytes)?)),
            Some(AisMessageKind::AidToNavigation) => {
                Ok(Self::AidToNavigation(serde_json::from_slice(bytes)?))
            }
            Some(AisMessageKind::StaticData) => {
                Ok(Self::StaticData(serde_json::from_slice(bytes)?))
            }
            None => Err(DecodeError::UnknownVariant(kind)),
        }
    }

    /// Which variant this is
    pub fn kind(&self) -> AisMessageKind {
        match self {
            Self::Position(_) => AisMessageKind::Position,
            Self::AidToNavigation(_) => AisMessageKind::AidToNavigation,
            Self::StaticData(_) => AisMessageKind::StaticData,
        }
    }

    pub fn mmsi(&self) -> u32 {
        match self {
            Self::Position(m) => m.mmsi,
            Self::AidToNavigation(m) => m.mmsi,
            Self::StaticData(m) => m.mmsi,
        }
    }

    pub fn msgtime(&self) -> DateTime<Utc> {
        match self {
            Self::Position(m) => m.msgtime,
            Self::AidToNavigation(m) => m.msgtime,
            Self::StaticData(m) => m.msgtime,
        }
    }

    pub fn as_position(&self) -> Option<&Position> {
        match self {
            Self::Position(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_aid_to_navigation(&self) -> Option<&AidToNavigation> {
        match self {
            Self::AidToNavigation(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_static_data(&self) -> Option<&StaticData> {
        match self {
            Self::StaticData(m) => Some(m),
            _ => None,
        }
    }
}

impl StreamMessage for AisMessage {
    fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        Self::from_slice(bytes)
    }
}

impl<'de> Deserialize<'de> for AisMessage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Box::<RawValue>::deserialize(deserializer)?;
        Self::from_slice(raw.get().as_bytes()).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const POSITION: &str = r#"{"type":"Position","messageType":1,"mmsi":257347700,"msgtime":"2023-01-24T10:15:00+00:00","altitude":null,"longitude":10.7,"latitude":59.9,"courseOverGround":0,"aisClass":"A","navigationalStatus":5,"speedOverGround":0.1}"#;

    #[test]
    fn test_decode_position() {
        let msg = AisMessage::from_slice(POSITION.as_bytes()).unwrap();
        assert_eq!(msg.kind(), AisMessageKind::Position);
        assert_eq!(msg.mmsi(), 257347700);

        let pos = msg.as_position().unwrap();
        assert_eq!(pos.navigational_status, 5);
        assert_eq!(pos.ais_class.as_deref(), Some("A"));
        // Present zero vs absent vs explicit null
        assert_eq!(pos.course_over_ground, Some(0.0));
        assert_eq!(pos.true_heading, None);
        assert_eq!(pos.altitude, None);
        assert!(msg.as_static_data().is_none());
    }

    #[test]
    fn test_decode_aton() {
        let json = r#"{"type":"Aton","messageType":21,"mmsi":992576001,"msgtime":"2023-01-24T10:15:00Z","name":"LIGHT BUOY","dimensionA":0,"typeOfAidsToNavigation":22}"#;
        let msg = AisMessage::from_slice(json.as_bytes()).unwrap();

        let aton = msg.as_aid_to_navigation().unwrap();
        assert_eq!(aton.name.as_deref(), Some("LIGHT BUOY"));
        assert_eq!(aton.dimension_a, Some(0));
        assert_eq!(aton.dimension_b, None);
        assert_eq!(aton.type_of_aids_to_navigation, 22);
    }

    #[test]
    fn test_decode_static_data() {
        let json = r#"{"type":"Staticdata","messageType":5,"mmsi":258000000,"msgtime":"2023-01-24T10:15:00Z","callSign":"LAXY","destination":"OSLO","eta":"01240800","shipType":70,"imoNumber":9000000}"#;
        let msg = AisMessage::from_slice(json.as_bytes()).unwrap();

        assert_eq!(msg.kind(), AisMessageKind::StaticData);
        let data = msg.as_static_data().unwrap();
        assert_eq!(data.ship_type, Some(70));
        assert_eq!(data.eta.as_deref(), Some("01240800"));
        assert_eq!(data.draught, None);
    }

    #[test]
    fn test_null_integers_read_as_zero() {
        let position = r#"{"type":"Position","messageType":null,"mmsi":1,"msgtime":"2023-01-24T10:15:00Z","navigationalStatus":null}"#;
        let msg = AisMessage::from_slice(position.as_bytes()).unwrap();
        let pos = msg.as_position().unwrap();
        assert_eq!(pos.message_type, 0);
        assert_eq!(pos.navigational_status, 0);

        let aton = r#"{"type":"Aton","messageType":null,"mmsi":2,"msgtime":"2023-01-24T10:15:00Z","typeOfAidsToNavigation":null,"typeOfElectronicFixingDevice":null}"#;
        let msg = AisMessage::from_slice(aton.as_bytes()).unwrap();
        let aton = msg.as_aid_to_navigation().unwrap();
        assert_eq!(aton.type_of_aids_to_navigation, 0);
        assert_eq!(aton.type_of_electronic_fixing_device, 0);

        let data = r#"{"type":"Staticdata","messageType":null,"mmsi":3,"msgtime":"2023-01-24T10:15:00Z","positionFixingDeviceType":null}"#;
        let msg = AisMessage::from_slice(data.as_bytes()).unwrap();
        let data = msg.as_static_data().unwrap();
        assert_eq!(data.message_type, 0);
        assert_eq!(data.position_fixing_device_type, 0);
    }

    #[test]
    fn test_mmsi_and_msgtime_are_mandatory() {
        let no_mmsi = r#"{"type":"Position","msgtime":"2023-01-24T10:15:00Z"}"#;
        assert!(matches!(AisMessage::from_slice(no_mmsi.as_bytes()), Err(DecodeError::Json(_))));

        let null_time = r#"{"type":"Position","mmsi":1,"msgtime":null}"#;
        assert!(matches!(AisMessage::from_slice(null_time.as_bytes()), Err(DecodeError::Json(_))));
    }

    #[test]
    fn test_unknown_discriminator() {
        let json = r#"{"type":"SafetyRelated","mmsi":1,"msgtime":"2023-01-24T10:15:00Z"}"#;
        let err = AisMessage::from_slice(json.as_bytes()).unwrap_err();
        assert!(matches!(err, DecodeError::UnknownVariant(ref t) if t == "SafetyRelated"));
    }

    #[test]
    fn test_missing_discriminator() {
        let json = r#"{"mmsi":1,"msgtime":"2023-01-24T10:15:00Z"}"#;
        let err = AisMessage::from_slice(json.as_bytes()).unwrap_err();
        assert!(matches!(err, DecodeError::Json(_)));
    }

    #[test]
    fn test_serialize_keeps_wire_tag() {
        let json = r#"{"type":"Aton","mmsi":992576001,"msgtime":"2023-01-24T10:15:00Z"}"#;
        let msg = AisMessage::from_slice(json.as_bytes()).unwrap();

        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["type"], "Aton");
        assert_eq!(value["mmsi"], 992576001);
    }

    #[test]
    fn test_deserialize_array_uses_dispatch() {
        let json = format!(
            "[{},{}]",
            POSITION, r#"{"type":"Staticdata","mmsi":2,"msgtime":"2023-01-24T10:15:00Z"}"#
        );
        let messages: Vec<AisMessage> = serde_json::from_str(&json).unwrap();
        let kinds: Vec<_> = messages.iter().map(AisMessage::kind).collect();
        assert_eq!(kinds, vec![AisMessageKind::Position, AisMessageKind::StaticData]);

        let err = serde_json::from_str::<Vec<AisMessage>>(r#"[{"type":"Nope"}]"#).unwrap_err();
        assert!(err.to_string().contains("unknown message type: Nope"));
    }
}

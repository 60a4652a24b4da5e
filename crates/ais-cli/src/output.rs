//! Output formatting for ais-cli (table, json)

use ais_client::{AisMessage, CombinedMessage};
use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use tabled::{Table, Tabled};

/// Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// ASCII table format (default); one line per message when streaming
    #[default]
    Table,
    /// JSON format; one object per line when streaming
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Self as ValueEnum>::from_str(s, true)
    }
}

/// Context for output rendering
pub struct OutputContext {
    pub format: OutputFormat,
    pub quiet: bool,
}

impl OutputContext {
    pub fn new(format: OutputFormat, no_color: bool, quiet: bool) -> Self {
        if no_color {
            colored::control::set_override(false);
        }
        Self { format, quiet }
    }

    /// Print a success message (unless in quiet mode)
    pub fn success(&self, msg: &str) {
        if !self.quiet {
            eprintln!("{}", msg.green());
        }
    }

    /// Print an info message (unless in quiet mode)
    ///
    /// Goes to stderr so that streamed records on stdout stay parseable.
    pub fn info(&self, msg: &str) {
        if !self.quiet {
            eprintln!("{}", msg);
        }
    }

    /// Print an error message
    pub fn error(&self, msg: &str) {
        eprintln!("{}", msg.red());
    }

    /// Print a finished set of records in the configured format
    pub fn print_records<R: Record>(&self, records: &[R]) {
        match self.format {
            OutputFormat::Table => {
                if records.is_empty() {
                    if !self.quiet {
                        println!("No data");
                    }
                } else {
                    let rows: Vec<VesselRow> = records.iter().map(Record::row).collect();
                    println!("{}", Table::new(rows));
                }
            }
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::to_string_pretty(records).unwrap_or_else(|_| "[]".to_string())
                );
            }
        }
    }

    /// Print one record as it arrives from a stream
    pub fn print_streamed<R: Record>(&self, record: &R) {
        match self.format {
            OutputFormat::Table => println!("{}", record.row().inline()),
            OutputFormat::Json => {
                if let Ok(json) = serde_json::to_string(record) {
                    println!("{}", json);
                }
            }
        }
    }

    /// Print key-value pairs
    pub fn print_kv(&self, pairs: &[(&str, String)]) {
        match self.format {
            OutputFormat::Table => {
                for (key, value) in pairs {
                    println!("{}: {}", key.bold(), value);
                }
            }
            OutputFormat::Json => {
                let map: serde_json::Map<String, serde_json::Value> = pairs
                    .iter()
                    .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.clone())))
                    .collect();
                println!(
                    "{}",
                    serde_json::to_string_pretty(&map).unwrap_or_else(|_| "{}".to_string())
                );
            }
        }
    }
}

// =============================================================================
// Display rows
// =============================================================================

/// Vessel summary shown for every record type
#[derive(Debug, Clone, PartialEq, Tabled, Serialize)]
pub struct VesselRow {
    #[tabled(rename = "Time")]
    pub time: String,
    #[tabled(rename = "MMSI")]
    pub mmsi: String,
    #[tabled(rename = "Kind")]
    pub kind: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Position")]
    pub position: String,
    #[tabled(rename = "SOG")]
    pub speed: String,
}

impl VesselRow {
    /// Single-line rendering for streams
    pub fn inline(&self) -> String {
        format!(
            "[{}] {} {} {} {} {}",
            self.time,
            self.mmsi.bold(),
            self.kind.cyan(),
            self.name,
            self.position,
            self.speed
        )
    }
}

/// A record that can be shown as a [`VesselRow`]
pub trait Record: Serialize {
    fn row(&self) -> VesselRow;
}

impl Record for AisMessage {
    fn row(&self) -> VesselRow {
        let (name, position, speed) = match self {
            AisMessage::Position(p) => (
                None,
                p.longitude.zip(p.latitude),
                p.speed_over_ground,
            ),
            AisMessage::AidToNavigation(a) => {
                (a.name.as_deref(), a.longitude.zip(a.latitude), None)
            }
            AisMessage::StaticData(s) => (s.name.as_deref(), None, None),
        };
        VesselRow {
            time: self.msgtime().format("%Y-%m-%d %H:%M:%S").to_string(),
            mmsi: self.mmsi().to_string(),
            kind: self.kind().to_string(),
            name: name.unwrap_or("-").to_string(),
            position: format_position(position),
            speed: format_speed(speed),
        }
    }
}

impl Record for CombinedMessage {
    fn row(&self) -> VesselRow {
        let speed = match self {
            CombinedMessage::SimpleJson(m) => m.speed_over_ground,
            CombinedMessage::FullJson(m) => m.simple.speed_over_ground,
            CombinedMessage::SimpleGeojson(m) => m.properties.speed_over_ground,
            CombinedMessage::FullGeojson(m) => m.properties.simple.speed_over_ground,
        };
        VesselRow {
            time: self.msgtime().format("%Y-%m-%d %H:%M:%S").to_string(),
            mmsi: self.mmsi().to_string(),
            kind: self.kind().as_str().to_string(),
            name: self.name().unwrap_or("-").to_string(),
            position: format_position(self.coordinates()),
            speed: format_speed(speed),
        }
    }
}

/// Untyped records from `decode --kind raw`
impl Record for serde_json::Value {
    fn row(&self) -> VesselRow {
        let field = |key: &str| match self.get(key) {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(serde_json::Value::Null) | None => "-".to_string(),
            Some(other) => other.to_string(),
        };
        let position = self
            .get("longitude")
            .and_then(serde_json::Value::as_f64)
            .zip(self.get("latitude").and_then(serde_json::Value::as_f64));
        VesselRow {
            time: field("msgtime"),
            mmsi: field("mmsi"),
            kind: field("type"),
            name: field("name"),
            position: format_position(position),
            speed: format_speed(self.get("speedOverGround").and_then(serde_json::Value::as_f64)),
        }
    }
}

fn format_position(position: Option<(f64, f64)>) -> String {
    match position {
        Some((lon, lat)) => format!("{:.5}, {:.5}", lat, lon),
        None => "-".to_string(),
    }
}

fn format_speed(speed: Option<f64>) -> String {
    match speed {
        Some(knots) => format!("{:.1} kn", knots),
        None => "-".to_string(),
    }
}

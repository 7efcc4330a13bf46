//! Common types used throughout the rating engine

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Unique identifier for a team (e.g. `frc3620`)
pub type TeamKey = String;

/// Unique identifier for an event (e.g. `2024misjo`)
pub type EventKey = String;

/// Number of teams on one alliance
pub const ALLIANCE_SIZE: usize = 3;

/// A single entry in a participant's metrics map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Number(f64),
    Text(String),
}

impl MetricValue {
    /// Numeric value, if this entry holds one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetricValue::Number(value) => Some(*value),
            MetricValue::Text(_) => None,
        }
    }

    /// Text value, if this entry holds one
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetricValue::Number(_) => None,
            MetricValue::Text(text) => Some(text),
        }
    }
}

impl From<f64> for MetricValue {
    fn from(value: f64) -> Self {
        MetricValue::Number(value)
    }
}

impl From<String> for MetricValue {
    fn from(value: String) -> Self {
        MetricValue::Text(value)
    }
}

impl From<&str> for MetricValue {
    fn from(value: &str) -> Self {
        MetricValue::Text(value.to_string())
    }
}

/// Metric name to value, ordered so serialized reports are stable
pub type MetricsMap = BTreeMap<String, MetricValue>;

/// A team taking part in a competition, plus the metrics computed for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub key: TeamKey,
    #[serde(default)]
    pub team_number: Option<u32>,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub metrics: MetricsMap,
}

impl Participant {
    /// Create a participant with an empty metrics map
    pub fn new(key: impl Into<TeamKey>) -> Self {
        Self {
            key: key.into(),
            team_number: None,
            nickname: None,
            metrics: MetricsMap::new(),
        }
    }

    /// Numeric value of a metric, if present
    pub fn metric(&self, name: &str) -> Option<f64> {
        self.metrics.get(name).and_then(MetricValue::as_f64)
    }

    /// Store a metric value, replacing any previous one
    pub fn set_metric(&mut self, name: &str, value: impl Into<MetricValue>) {
        self.metrics.insert(name.to_string(), value.into());
    }
}

/// Side of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AllianceColor {
    Red,
    Blue,
}

impl AllianceColor {
    pub const ALL: [AllianceColor; 2] = [AllianceColor::Red, AllianceColor::Blue];

    /// Key used for this side in match records
    pub fn as_str(&self) -> &'static str {
        match self {
            AllianceColor::Red => "red",
            AllianceColor::Blue => "blue",
        }
    }
}

impl std::fmt::Display for AllianceColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One alliance as it appears in a match record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alliance {
    pub team_keys: Vec<TeamKey>,
    #[serde(default)]
    pub score: Option<f64>,
}

impl Alliance {
    pub fn new(team_keys: &[&str]) -> Self {
        Self {
            team_keys: team_keys.iter().map(|key| key.to_string()).collect(),
            score: None,
        }
    }
}

/// Both alliances of a match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alliances {
    pub red: Alliance,
    pub blue: Alliance,
}

impl Alliances {
    pub fn get(&self, color: AllianceColor) -> &Alliance {
        match color {
            AllianceColor::Red => &self.red,
            AllianceColor::Blue => &self.blue,
        }
    }
}

/// A played (or scheduled) match between two alliances
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub key: String,
    #[serde(default = "default_comp_level")]
    pub comp_level: String,
    #[serde(default)]
    pub match_number: u32,
    /// Unix time the match was actually played, absent until it is
    #[serde(default)]
    pub actual_time: Option<i64>,
    pub alliances: Alliances,
    /// Per-side breakdown keyed by `red`/`blue`; null for unscored matches
    #[serde(default)]
    pub score_breakdown: Option<serde_json::Value>,
}

fn default_comp_level() -> String {
    "qm".to_string()
}

impl Match {
    /// Team keys for one side
    pub fn team_keys(&self, color: AllianceColor) -> &[TeamKey] {
        &self.alliances.get(color).team_keys
    }

    /// The breakdown object for one side, if the match has been scored
    pub fn breakdown(&self, color: AllianceColor) -> Option<&serde_json::Value> {
        self.score_breakdown.as_ref()?.get(color.as_str())
    }
}

/// Competition event metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub key: EventKey,
    #[serde(default)]
    pub name: String,
    pub year: i32,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub event_type: Option<i32>,
}

/// Status summary of one team at one event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamStatus {
    #[serde(default)]
    pub overall_status_str: Option<String>,
    #[serde(default)]
    pub alliance_status_str: Option<String>,
    #[serde(default)]
    pub playoff_status_str: Option<String>,
}

//! Metric extraction from match records
//!
//! An extractor pulls one scalar for one side of a match. A missing or
//! unreadable value is `None`, which the incidence builder treats as
//! "skip this match" rather than an error.

use crate::types::{AllianceColor, Match};
use serde_json::Value;

/// Breakdown field holding an alliance's total score
pub const TOTAL_POINTS: &str = "totalPoints";

/// Trait for reading a single statistic out of a match record
pub trait MetricExtractor: Send + Sync {
    /// Name of the statistic this extractor reads
    fn name(&self) -> &str;

    /// Value of the statistic for one side, or `None` when unavailable
    fn extract(&self, record: &Match, color: AllianceColor) -> Option<f64>;
}

/// Reads a named field from the per-side score breakdown
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BreakdownField {
    field: String,
}

impl BreakdownField {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Alliance total score
    pub fn total_points() -> Self {
        Self::new(TOTAL_POINTS)
    }
}

impl Default for BreakdownField {
    fn default() -> Self {
        Self::total_points()
    }
}

impl MetricExtractor for BreakdownField {
    fn name(&self) -> &str {
        &self.field
    }

    fn extract(&self, record: &Match, color: AllianceColor) -> Option<f64> {
        record
            .breakdown(color)
            .and_then(|side| side.get(&self.field))
            .and_then(scalar)
    }
}

/// Reads the alliance's headline score, for records without a breakdown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllianceScore;

impl MetricExtractor for AllianceScore {
    fn name(&self) -> &str {
        "score"
    }

    fn extract(&self, record: &Match, color: AllianceColor) -> Option<f64> {
        // Unplayed matches carry -1
        record
            .alliances
            .get(color)
            .score
            .filter(|score| *score >= 0.0)
    }
}

/// Numeric view of a JSON scalar; booleans count as 1/0
fn scalar(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
        _ => None,
    }
}

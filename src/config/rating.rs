//! Rating engine configuration

use crate::rating::extractor::{AllianceScore, BreakdownField, MetricExtractor};
use crate::rating::ranker::RankOrder;
use serde::{Deserialize, Serialize};

/// Where a statistic's per-side value is read from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricSource {
    /// The named field of the per-side score breakdown
    #[default]
    Breakdown,
    /// The alliance's headline score; `field` only labels the statistic
    AllianceScore,
}

/// One statistic to rate: which breakdown field, and where to store results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticSpec {
    /// Breakdown field read for each side
    pub field: String,
    #[serde(default)]
    pub source: MetricSource,
    /// Metric name for the offense-side rating
    #[serde(default)]
    pub offense: Option<String>,
    /// Metric name for the defense-side rating
    #[serde(default)]
    pub defense: Option<String>,
    /// Rank the offense metric in this order
    #[serde(default)]
    pub rank_order: Option<RankOrder>,
    /// Seasons the field exists in; empty means every season
    #[serde(default)]
    pub years: Vec<i32>,
}

impl StatisticSpec {
    /// Offense-only statistic for every season
    pub fn offense(field: &str, name: &str) -> Self {
        Self {
            field: field.to_string(),
            source: MetricSource::Breakdown,
            offense: Some(name.to_string()),
            defense: None,
            rank_order: None,
            years: Vec::new(),
        }
    }

    pub fn with_defense(mut self, name: &str) -> Self {
        self.defense = Some(name.to_string());
        self
    }

    /// Read the alliance's headline score instead of a breakdown field
    pub fn from_alliance_score(mut self) -> Self {
        self.source = MetricSource::AllianceScore;
        self
    }

    pub fn ranked(mut self, order: RankOrder) -> Self {
        self.rank_order = Some(order);
        self
    }

    pub fn for_years(mut self, years: &[i32]) -> Self {
        self.years = years.to_vec();
        self
    }

    pub fn applies_to(&self, year: i32) -> bool {
        self.years.is_empty() || self.years.contains(&year)
    }

    pub fn extractor(&self) -> Box<dyn MetricExtractor> {
        match self.source {
            MetricSource::Breakdown => Box::new(BreakdownField::new(self.field.clone())),
            MetricSource::AllianceScore => Box::new(AllianceScore),
        }
    }
}

/// Rating engine and statistic selection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingConfig {
    /// Squared pivots at or below this value fail factorization
    pub min_pivot: f64,
    /// Match level to rate (`qm` = qualification matches)
    pub comp_level: String,
    /// Only rate matches that have actually been played
    pub require_played: bool,
    /// Statistics computed per event
    pub statistics: Vec<StatisticSpec>,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            min_pivot: 0.0,
            comp_level: "qm".to_string(),
            require_played: true,
            statistics: default_statistics(),
        }
    }
}

/// Ratings computed when no statistics are configured
pub fn default_statistics() -> Vec<StatisticSpec> {
    vec![
        StatisticSpec::offense("totalPoints", "opr")
            .with_defense("dpr")
            .ranked(RankOrder::Descending),
        StatisticSpec::offense("rp", "rankingPoints_pr"),
        StatisticSpec::offense("linkPoints", "linkPoints_pr").for_years(&[2023]),
        StatisticSpec::offense("autoChargeStationPoints", "autoChargeStationPoints_pr")
            .for_years(&[2023]),
        StatisticSpec::offense("teleopAmpNotePoints", "teleopAmpNotePoints_pr").for_years(&[2024]),
        StatisticSpec::offense("foulPoints", "foulPoints_pr").for_years(&[2024]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statistic_year_filter() {
        let stats = default_statistics();
        let for_2023: Vec<&str> = stats
            .iter()
            .filter(|s| s.applies_to(2023))
            .map(|s| s.field.as_str())
            .collect();
        assert_eq!(
            for_2023,
            vec!["totalPoints", "rp", "linkPoints", "autoChargeStationPoints"]
        );

        let for_2024 = stats.iter().filter(|s| s.applies_to(2024)).count();
        assert_eq!(for_2024, 4);
    }

    #[test]
    fn test_statistic_from_toml() {
        let statistic: StatisticSpec = toml::from_str(
            r#"
            field = "foulPoints"
            defense = "foulPoints_allowed"
            rank_order = "ascending"
            "#,
        )
        .unwrap();

        assert_eq!(statistic.offense, None);
        assert_eq!(statistic.defense.as_deref(), Some("foulPoints_allowed"));
        assert_eq!(statistic.rank_order, Some(RankOrder::Ascending));
        assert!(statistic.applies_to(1999));
        assert_eq!(statistic.source, MetricSource::Breakdown);
        assert_eq!(statistic.extractor().name(), "foulPoints");
    }

    #[test]
    fn test_alliance_score_source_from_toml() {
        let statistic: StatisticSpec = toml::from_str(
            r#"
            field = "score"
            source = "alliance_score"
            offense = "score_pr"
            "#,
        )
        .unwrap();

        assert_eq!(
            statistic,
            StatisticSpec::offense("score", "score_pr").from_alliance_score()
        );
        assert_eq!(statistic.extractor().name(), "score");
    }
}

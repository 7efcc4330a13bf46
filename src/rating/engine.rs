//! Rating engine: incidence system, factorization and solving
//!
//! One `calc` call rates one statistic over one set of matches. The matrix,
//! right-hand sides and factor live only for that call; the results are
//! copied into the participants' metrics maps.

use crate::config::RatingConfig;
use crate::error::{RatingError, RatingResult};
use crate::rating::extractor::MetricExtractor;
use crate::rating::incidence::{IncidenceBuilder, NormalEquations};
use crate::rating::linalg::CholeskyFactor;
use crate::types::{AllianceColor, Match, Participant, TeamKey};
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

/// Sorted, de-duplicated keys of every team on any alliance in `matches`
pub fn participant_keys(matches: &[Match]) -> Vec<TeamKey> {
    matches
        .iter()
        .flat_map(|record| {
            AllianceColor::ALL
                .into_iter()
                .flat_map(move |color| record.team_keys(color).iter())
        })
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Least-squares offense/defense rating calculator
#[derive(Debug, Clone, Default)]
pub struct RatingEngine {
    min_pivot: f64,
}

impl RatingEngine {
    /// Create an engine that only rejects exactly singular systems
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine from configuration
    pub fn from_config(config: &RatingConfig) -> Self {
        Self {
            min_pivot: config.min_pivot,
        }
    }

    /// Reject systems whose squared pivots fall to `min_pivot` or below
    pub fn with_min_pivot(mut self, min_pivot: f64) -> Self {
        self.min_pivot = min_pivot;
        self
    }

    /// Rate the statistic read by `extractor` over `matches`.
    ///
    /// Ratings are stored in each participant's metrics map under
    /// `offense_metric` and `defense_metric`; a `None` name skips that side.
    /// Participants that appear in no match are left untouched. An empty
    /// match list is a no-op.
    ///
    /// Fails with an insufficient-data error when the system cannot be
    /// factored, e.g. a team has no counted matches yet; no metrics are
    /// written in that case.
    pub fn calc(
        &self,
        participants: &mut [Participant],
        matches: &[Match],
        offense_metric: Option<&str>,
        defense_metric: Option<&str>,
        extractor: &dyn MetricExtractor,
    ) -> RatingResult<()> {
        if matches.is_empty() || (offense_metric.is_none() && defense_metric.is_none()) {
            return Ok(());
        }

        let keys = participant_keys(matches);
        let builder = IncidenceBuilder::new(&keys);
        let system = builder.build(matches, extractor)?;

        let factor = CholeskyFactor::factor_with_min_pivot(&system.matrix, self.min_pivot)
            .map_err(|err| insufficient_data(err, &keys, &system))?;

        // One factorization serves both sides
        let offense = offense_metric
            .map(|name| factor.solve(&system.offense).map(|x| (name, x)))
            .transpose()?;
        let defense = defense_metric
            .map(|name| factor.solve(&system.defense).map(|x| (name, x)))
            .transpose()?;

        let index: HashMap<&str, usize> = keys
            .iter()
            .enumerate()
            .map(|(i, key)| (key.as_str(), i))
            .collect();

        let mut rated = 0;
        for participant in participants.iter_mut() {
            let Some(&i) = index.get(participant.key.as_str()) else {
                continue;
            };
            for (name, values) in offense.iter().chain(defense.iter()) {
                participant.set_metric(name, values[i]);
            }
            rated += 1;
        }

        debug!(
            "Rated {} of {} teams on {} ({} matches)",
            rated,
            keys.len(),
            extractor.name(),
            system.matches_used
        );

        Ok(())
    }
}

/// Name the participant whose pivot failed
fn insufficient_data(err: RatingError, keys: &[TeamKey], system: &NormalEquations) -> RatingError {
    match err {
        RatingError::NotPositiveDefinite { index, pivot } => RatingError::InsufficientData {
            participant: keys[index].clone(),
            reason: format!(
                "{} counted matches, pivot {} at index {}",
                system.matches_played(index),
                pivot,
                index
            ),
        },
        other => other,
    }
}

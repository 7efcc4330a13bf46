//! Normal-equations construction from alliance membership
//!
//! For every counted match, each alliance contributes the outer product of
//! its membership indicator to `A`, and its own/opposing score to the
//! offense/defense right-hand sides of its members.

use crate::error::{RatingError, RatingResult};
use crate::rating::extractor::MetricExtractor;
use crate::rating::linalg::Matrix;
use crate::types::{AllianceColor, Match, TeamKey, ALLIANCE_SIZE};
use std::collections::HashMap;
use tracing::debug;

/// The least-squares system for one statistic over one set of matches
#[derive(Debug, Clone, PartialEq)]
pub struct NormalEquations {
    /// Shared-alliance counts, symmetric
    pub matrix: Matrix,
    /// Sum of own-alliance values per participant
    pub offense: Vec<f64>,
    /// Sum of opposing-alliance values per participant
    pub defense: Vec<f64>,
    /// Matches that contributed
    pub matches_used: usize,
    /// Matches skipped because a side had no value
    pub matches_skipped: usize,
}

impl NormalEquations {
    /// Number of counted matches participant `index` appeared in
    pub fn matches_played(&self, index: usize) -> usize {
        self.matrix.get(index, index) as usize
    }
}

/// Maps participant keys to matrix indices and accumulates the system
#[derive(Debug, Clone)]
pub struct IncidenceBuilder<'a> {
    keys: &'a [TeamKey],
    index: HashMap<&'a str, usize>,
}

impl<'a> IncidenceBuilder<'a> {
    /// `keys` must be unique; their order fixes the matrix indices
    pub fn new(keys: &'a [TeamKey]) -> Self {
        let index = keys
            .iter()
            .enumerate()
            .map(|(i, key)| (key.as_str(), i))
            .collect();
        Self { keys, index }
    }

    pub fn keys(&self) -> &[TeamKey] {
        self.keys
    }

    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    /// Build `A`, `b_offense` and `b_defense` for `extractor` over `matches`.
    ///
    /// A match where either side has no value is left out of both the
    /// matrix and the right-hand sides, so `A` always describes exactly the
    /// matches that produced `b`.
    pub fn build(
        &self,
        matches: &[Match],
        extractor: &dyn MetricExtractor,
    ) -> RatingResult<NormalEquations> {
        let n = self.keys.len();
        let mut system = NormalEquations {
            matrix: Matrix::zeros(n),
            offense: vec![0.0; n],
            defense: vec![0.0; n],
            matches_used: 0,
            matches_skipped: 0,
        };

        for record in matches {
            let red = self.alliance_indices(record, AllianceColor::Red)?;
            let blue = self.alliance_indices(record, AllianceColor::Blue)?;

            let (red_value, blue_value) = match (
                extractor.extract(record, AllianceColor::Red),
                extractor.extract(record, AllianceColor::Blue),
            ) {
                (Some(red_value), Some(blue_value)) => (red_value, blue_value),
                _ => {
                    system.matches_skipped += 1;
                    continue;
                }
            };

            for (members, own, opposing) in [(&red, red_value, blue_value), (&blue, blue_value, red_value)]
            {
                for &i in members.iter() {
                    for &j in members.iter() {
                        system.matrix.add(i, j, 1.0);
                    }
                    system.offense[i] += own;
                    system.defense[i] += opposing;
                }
            }
            system.matches_used += 1;
        }

        debug!(
            "Built {}x{} system for {}: {} matches used, {} skipped",
            n,
            n,
            extractor.name(),
            system.matches_used,
            system.matches_skipped
        );

        Ok(system)
    }

    fn alliance_indices(
        &self,
        record: &Match,
        color: AllianceColor,
    ) -> RatingResult<[usize; ALLIANCE_SIZE]> {
        let team_keys = record.team_keys(color);
        if team_keys.len() != ALLIANCE_SIZE {
            return Err(RatingError::InvalidMatchStructure {
                match_key: record.key.clone(),
                reason: format!(
                    "{} alliance has {} teams, expected {}",
                    color,
                    team_keys.len(),
                    ALLIANCE_SIZE
                ),
            });
        }

        let mut indices = [0; ALLIANCE_SIZE];
        for (slot, key) in indices.iter_mut().zip(team_keys) {
            *slot = self
                .index_of(key)
                .ok_or_else(|| RatingError::InvalidMatchStructure {
                    match_key: record.key.clone(),
                    reason: format!("team {} is not in the participant index", key),
                })?;
        }

        for (position, i) in indices.iter().enumerate() {
            if indices[..position].contains(i) {
                return Err(RatingError::InvalidMatchStructure {
                    match_key: record.key.clone(),
                    reason: format!("{} alliance lists {} twice", color, self.keys[*i]),
                });
            }
        }
        Ok(indices)
    }
}

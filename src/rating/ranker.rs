//! Dense positional ranking of a computed metric

use crate::types::Participant;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Suffix appended to a metric name to store its ranking
pub const RANKING_SUFFIX: &str = "_ranking";

/// Which end of the metric ranks first
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankOrder {
    /// Higher values rank first
    #[default]
    Descending,
    Ascending,
}

/// Key under which the ranking for `metric` is stored
pub fn ranking_key(metric: &str) -> String {
    format!("{}{}", metric, RANKING_SUFFIX)
}

/// Write `"<position>/<total>"` under `<metric>_ranking` for every participant
/// holding a numeric `metric`.
///
/// Participants without the metric are left untouched and do not count
/// towards the total. Ties keep their input order. Returns the number ranked.
pub fn rank(participants: &mut [Participant], metric: &str, order: RankOrder) -> usize {
    let mut ranked: Vec<(usize, f64)> = participants
        .iter()
        .enumerate()
        .filter_map(|(i, participant)| participant.metric(metric).map(|value| (i, value)))
        .collect();

    // sort_by is stable
    ranked.sort_by(|(_, a), (_, b)| match order {
        RankOrder::Descending => b.total_cmp(a),
        RankOrder::Ascending => a.total_cmp(b),
    });

    let total = ranked.len();
    let key = ranking_key(metric);
    for (position, (i, _)) in ranked.into_iter().enumerate() {
        participants[i].set_metric(&key, format!("{}/{}", position + 1, total));
    }

    total
}

/// Compare two participants by a metric, missing values last
pub fn compare_by_metric(a: &Participant, b: &Participant, metric: &str, order: RankOrder) -> Ordering {
    match (a.metric(metric), b.metric(metric)) {
        (Some(x), Some(y)) => match order {
            RankOrder::Descending => y.total_cmp(&x),
            RankOrder::Ascending => x.total_cmp(&y),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

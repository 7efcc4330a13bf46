//! Rating every configured statistic for a single event
//!
//! Statistics are independent: one that cannot be solved yet is logged and
//! recorded, and the remaining ones still run.

use crate::config::{RatingConfig, StatisticSpec};
use crate::error::RatingResult;
use crate::rating::{rank, RatingEngine};
use crate::types::{AllianceColor, Event, Match, MetricValue, Participant, TeamKey, TeamStatus};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{info, warn};

/// Metric key holding a team's overall status string at an event
pub const OVERALL_STATUS: &str = "overall_status_str";

/// Metric key holding a team's autonomous charge station codes, one per match
pub const AUTO_CHARGE: &str = "autoCharge";

/// Metric key holding a team's end-game charge station codes, one per match
pub const END_GAME_CHARGE: &str = "endGameCharge";

/// Season whose breakdowns report per-robot charge station states
pub const CHARGE_STATION_YEAR: i32 = 2023;

/// Ratings for all teams at one event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRatings {
    pub event: Event,
    pub teams: Vec<Participant>,
    /// Matches that passed the level/played filter
    pub matches_rated: usize,
    /// Statistics that could not be solved with the data so far
    pub insufficient: Vec<String>,
}

impl EventRatings {
    pub fn team(&self, key: &str) -> Option<&Participant> {
        self.teams.iter().find(|team| team.key == key)
    }
}

/// Matches at the configured level (and played, if required), by match number
pub fn qualifying_matches(mut matches: Vec<Match>, config: &RatingConfig) -> Vec<Match> {
    matches.retain(|record| {
        record.comp_level == config.comp_level
            && (!config.require_played || record.actual_time.is_some())
    });
    matches.sort_by_key(|record| record.match_number);
    matches
}

/// Run every statistic that applies to `year`, ranking where configured.
///
/// Returns the fields of statistics that were infeasible. Malformed match
/// records abort with an error.
pub fn rate_statistics(
    engine: &RatingEngine,
    statistics: &[StatisticSpec],
    year: i32,
    teams: &mut [Participant],
    matches: &[Match],
) -> RatingResult<Vec<String>> {
    let mut insufficient = Vec::new();

    for statistic in statistics.iter().filter(|s| s.applies_to(year)) {
        let extractor = statistic.extractor();
        let result = engine.calc(
            teams,
            matches,
            statistic.offense.as_deref(),
            statistic.defense.as_deref(),
            extractor.as_ref(),
        );

        match result {
            Ok(()) => {
                if let (Some(order), Some(name)) = (statistic.rank_order, &statistic.offense) {
                    rank(teams, name, order);
                }
            }
            Err(err) if err.is_insufficient_data() => {
                warn!("{}: not enough data yet ({})", statistic.field, err);
                insufficient.push(statistic.field.clone());
            }
            Err(err) => return Err(err),
        }
    }

    Ok(insufficient)
}

/// One team's charge station codes for a single match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargeStationStates {
    pub team_key: TeamKey,
    pub auto: Option<char>,
    pub end_game: Option<char>,
}

/// Docked, parked and none map to `X`, `x` and `.`
fn charge_station_code(state: &str) -> Option<char> {
    state.chars().next().map(|first| match first {
        'D' => 'X',
        'P' => 'x',
        'N' => '.',
        other => other,
    })
}

/// Per-team charge station codes for both sides of `record`, by alliance slot
pub fn charge_station_states(record: &Match) -> Vec<ChargeStationStates> {
    let mut states = Vec::new();
    for color in AllianceColor::ALL {
        let Some(side) = record.breakdown(color) else {
            continue;
        };
        for (slot, team_key) in record.team_keys(color).iter().enumerate() {
            let code = |prefix: &str| {
                let field = format!("{}{}", prefix, slot + 1);
                side.get(field.as_str())
                    .and_then(Value::as_str)
                    .and_then(charge_station_code)
            };
            states.push(ChargeStationStates {
                team_key: team_key.clone(),
                auto: code("autoChargeStationRobot"),
                end_game: code("endGameChargeStationRobot"),
            });
        }
    }
    states
}

/// Append each match's charge station codes to the teams' history strings
pub fn fill_charge_station(teams: &mut [Participant], matches: &[Match]) {
    let index: HashMap<TeamKey, usize> = teams
        .iter()
        .enumerate()
        .map(|(i, team)| (team.key.clone(), i))
        .collect();

    for record in matches {
        for states in charge_station_states(record) {
            let Some(&i) = index.get(&states.team_key) else {
                continue;
            };
            for (name, code) in [(AUTO_CHARGE, states.auto), (END_GAME_CHARGE, states.end_game)] {
                if let Some(code) = code {
                    append_code(&mut teams[i], name, code);
                }
            }
        }
    }
}

fn append_code(team: &mut Participant, name: &str, code: char) {
    let mut history = team
        .metrics
        .get(name)
        .and_then(MetricValue::as_str)
        .unwrap_or_default()
        .to_string();
    history.push(code);
    team.set_metric(name, history);
}

/// Rate one event from its fully loaded records
pub fn compute_event(
    engine: &RatingEngine,
    config: &RatingConfig,
    event: Event,
    mut teams: Vec<Participant>,
    matches: Vec<Match>,
    statuses: &HashMap<TeamKey, Option<TeamStatus>>,
) -> crate::error::Result<EventRatings> {
    let matches = qualifying_matches(matches, config);
    info!(
        "processing metrics for {}, {} teams, {} matches",
        event.key,
        teams.len(),
        matches.len()
    );

    for team in teams.iter_mut() {
        team.metrics.clear();
    }

    let insufficient = rate_statistics(engine, &config.statistics, event.year, &mut teams, &matches)
        .with_context(|| format!("Failed to rate event {}", event.key))?;

    if event.year == CHARGE_STATION_YEAR {
        fill_charge_station(&mut teams, &matches);
    }

    for team in teams.iter_mut() {
        let overall = statuses
            .get(&team.key)
            .and_then(|status| status.as_ref())
            .and_then(|status| status.overall_status_str.clone());
        if let Some(overall) = overall {
            team.set_metric(OVERALL_STATUS, overall);
        }
    }

    Ok(EventRatings {
        event,
        teams,
        matches_rated: matches.len(),
        insufficient,
    })
}

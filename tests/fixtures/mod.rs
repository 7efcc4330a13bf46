//! Test fixtures and an in-memory record source for integration testing

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use power_rating::error::Result;
use power_rating::source::RecordSource;
use power_rating::types::{
    Alliance, Alliances, Event, Match, Participant, TeamKey, TeamStatus,
};
use serde_json::json;
use std::collections::HashMap;

/// Record source holding everything in maps
#[derive(Debug, Default)]
pub struct FixtureSource {
    events: HashMap<String, Event>,
    teams: HashMap<String, Vec<Participant>>,
    matches: HashMap<String, Vec<Match>>,
    team_events: HashMap<(TeamKey, i32), Vec<Event>>,
    statuses: HashMap<String, HashMap<TeamKey, Option<TeamStatus>>>,
}

impl FixtureSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an event with its teams and matches; every team is marked as
    /// attending it
    pub fn add_event(&mut self, event: Event, teams: Vec<Participant>, matches: Vec<Match>) {
        for team in &teams {
            self.team_events
                .entry((team.key.clone(), event.year))
                .or_default()
                .push(event.clone());
        }
        self.teams.insert(event.key.clone(), teams);
        self.matches.insert(event.key.clone(), matches);
        self.events.insert(event.key.clone(), event);
    }

    pub fn set_status(&mut self, event_key: &str, team_key: &str, overall: Option<&str>) {
        self.statuses
            .entry(event_key.to_string())
            .or_default()
            .insert(
                team_key.to_string(),
                overall.map(|text| TeamStatus {
                    overall_status_str: Some(text.to_string()),
                    ..TeamStatus::default()
                }),
            );
    }
}

#[async_trait]
impl RecordSource for FixtureSource {
    async fn event(&self, event_key: &str) -> Result<Option<Event>> {
        Ok(self.events.get(event_key).cloned())
    }

    async fn teams_at_event(&self, event_key: &str) -> Result<Vec<Participant>> {
        Ok(self.teams.get(event_key).cloned().unwrap_or_default())
    }

    async fn matches_for_event(&self, event_key: &str) -> Result<Vec<Match>> {
        Ok(self.matches.get(event_key).cloned().unwrap_or_default())
    }

    async fn events_for_team(&self, team_key: &str, year: i32) -> Result<Vec<Event>> {
        Ok(self
            .team_events
            .get(&(team_key.to_string(), year))
            .cloned()
            .unwrap_or_default())
    }

    async fn team_statuses_at_event(
        &self,
        event_key: &str,
    ) -> Result<HashMap<TeamKey, Option<TeamStatus>>> {
        Ok(self.statuses.get(event_key).cloned().unwrap_or_default())
    }
}

pub fn event(key: &str, year: i32, month: u32, day: u32) -> Event {
    Event {
        key: key.to_string(),
        name: format!("{} event", key),
        year,
        start_date: NaiveDate::from_ymd_opt(year, month, day).unwrap(),
        event_type: Some(1),
    }
}

pub fn team(number: u32) -> Participant {
    let mut participant = Participant::new(format!("frc{}", number));
    participant.team_number = Some(number);
    participant.nickname = Some(format!("Team {}", number));
    participant
}

pub fn teams(numbers: &[u32]) -> Vec<Participant> {
    numbers.iter().map(|n| team(*n)).collect()
}

/// A played qualification match with total points and ranking points
pub fn qual(event_key: &str, number: u32, red: [u32; 3], blue: [u32; 3], scores: (f64, f64)) -> Match {
    let key = |n: &u32| format!("frc{}", n);
    let (red_score, blue_score) = scores;
    let rp = |own: f64, other: f64| if own > other { 2 } else { 0 };

    Match {
        key: format!("{}_qm{}", event_key, number),
        comp_level: "qm".to_string(),
        match_number: number,
        actual_time: Some(1_700_000_000 + number as i64 * 600),
        alliances: Alliances {
            red: Alliance {
                team_keys: red.iter().map(key).collect(),
                score: Some(red_score),
            },
            blue: Alliance {
                team_keys: blue.iter().map(key).collect(),
                score: Some(blue_score),
            },
        },
        score_breakdown: Some(json!({
            "red": {"totalPoints": red_score, "rp": rp(red_score, blue_score)},
            "blue": {"totalPoints": blue_score, "rp": rp(blue_score, red_score)}
        })),
    }
}

/// Contribution of team `n` in the additive fixture
pub fn contribution(n: u32) -> f64 {
    5.0 * n as f64
}

/// Five matches over frc1..frc6 whose alliance totals are exactly the sum
/// of 5/10/15/20/25/30, arranged so the system has full rank
pub fn additive_event_matches(event_key: &str) -> Vec<Match> {
    let splits: [([u32; 3], [u32; 3]); 5] = [
        ([1, 2, 3], [4, 5, 6]),
        ([1, 2, 4], [3, 5, 6]),
        ([1, 2, 5], [3, 4, 6]),
        ([1, 2, 6], [3, 4, 5]),
        ([1, 3, 4], [2, 5, 6]),
    ];

    splits
        .iter()
        .enumerate()
        .map(|(i, (red, blue))| {
            let total = |side: &[u32; 3]| side.iter().map(|n| contribution(*n)).sum::<f64>();
            qual(event_key, i as u32 + 1, *red, *blue, (total(red), total(blue)))
        })
        .collect()
}

/// Season fixture: two earlier events, the target, and one later event
pub fn season() -> FixtureSource {
    let mut source = FixtureSource::new();

    let mut misjo_matches = additive_event_matches("2024misjo");
    let mut playoff = qual("2024misjo", 1, [1, 2, 3], [4, 5, 6], (300.0, 0.0));
    playoff.key = "2024misjo_qf1m1".to_string();
    playoff.comp_level = "qf".to_string();
    misjo_matches.push(playoff);
    let mut unplayed = qual("2024misjo", 6, [1, 5, 6], [2, 3, 4], (0.0, 0.0));
    unplayed.actual_time = None;
    unplayed.score_breakdown = None;
    misjo_matches.push(unplayed);

    source.add_event(
        event("2024misjo", 2024, 3, 7),
        teams(&[1, 2, 3, 4, 5, 6]),
        misjo_matches,
    );
    source.set_status("2024misjo", "frc1", Some("Rank 6 of 6"));

    source.add_event(
        event("2024miket", 2024, 3, 14),
        teams(&[1, 2, 3, 4, 5, 6]),
        vec![qual("2024miket", 1, [1, 2, 3], [4, 5, 6], (40.0, 50.0))],
    );
    source.set_status("2024miket", "frc1", Some("Rank 4 of 6"));
    source.set_status("2024miket", "frc2", None);

    source.add_event(
        event("2024micmp", 2024, 4, 4),
        teams(&[7, 3, 1, 2, 6, 5, 4]),
        Vec::new(),
    );

    source.add_event(
        event("2024cmptx", 2024, 4, 17),
        teams(&[1, 2, 3, 4, 5, 6]),
        additive_event_matches("2024cmptx"),
    );

    source
}

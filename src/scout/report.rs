//! Scouting report: each team's ratings at the events it played before a
//! target event
//!
//! Every prior event is rated once, however many teams attended it, and
//! events are rated in parallel on the blocking pool since they share no
//! state.

use crate::config::RatingConfig;
use crate::error::Result;
use crate::rating::RatingEngine;
use crate::scout::event::{compute_event, EventRatings};
use crate::source::RecordSource;
use crate::types::{Event, EventKey, MetricsMap, Participant, TeamKey};
use anyhow::{anyhow, Context};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::info;

/// One team's metrics at one event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventMetrics {
    pub event_key: EventKey,
    pub event_name: String,
    pub start_date: NaiveDate,
    pub metrics: MetricsMap,
}

/// A team at the target event and its history that season
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamReport {
    pub key: TeamKey,
    pub team_number: Option<u32>,
    pub nickname: Option<String>,
    pub events: Vec<EventMetrics>,
}

/// Drives rating computations over records from a [`RecordSource`]
pub struct Scout<S: RecordSource> {
    source: Arc<S>,
    config: RatingConfig,
    engine: RatingEngine,
}

impl<S: RecordSource + 'static> Scout<S> {
    pub fn new(source: Arc<S>, config: RatingConfig) -> Self {
        let engine = RatingEngine::from_config(&config);
        Self {
            source,
            config,
            engine,
        }
    }

    /// Look up an event or fail
    async fn require_event(&self, event_key: &str) -> Result<Event> {
        self.source
            .event(event_key)
            .await?
            .ok_or_else(|| anyhow!("Event {} not found", event_key))
    }

    /// Rate a single event by key
    pub async fn rate_event(&self, event_key: &str) -> Result<EventRatings> {
        let event = self.require_event(event_key).await?;
        let mut rated = self.rate_events(vec![event]).await?;
        rated
            .remove(event_key)
            .ok_or_else(|| anyhow!("Event {} was not rated", event_key))
    }

    /// Build the scouting report for every team at `main_event_key`
    pub async fn process(&self, main_event_key: &str) -> Result<Vec<TeamReport>> {
        let main_event = self.require_event(main_event_key).await?;

        let mut teams = self.source.teams_at_event(main_event_key).await?;
        teams.sort_by(|a, b| {
            let number = |team: &Participant| team.team_number.unwrap_or(u32::MAX);
            number(a).cmp(&number(b)).then_with(|| a.key.cmp(&b.key))
        });

        // Season events before the target, per team, by start date
        let mut prior_events: Vec<Vec<Event>> = Vec::with_capacity(teams.len());
        let mut distinct: BTreeMap<EventKey, Event> = BTreeMap::new();
        for team in &teams {
            let mut events: Vec<Event> = self
                .source
                .events_for_team(&team.key, main_event.year)
                .await?
                .into_iter()
                .filter(|event| event.start_date < main_event.start_date)
                .collect();
            events.sort_by_key(|event| event.start_date);

            for event in &events {
                distinct
                    .entry(event.key.clone())
                    .or_insert_with(|| event.clone());
            }
            prior_events.push(events);
        }

        info!(
            "Scouting {}: {} teams, {} prior events",
            main_event_key,
            teams.len(),
            distinct.len()
        );

        let rated = self.rate_events(distinct.into_values().collect()).await?;

        let reports = teams
            .into_iter()
            .zip(prior_events)
            .map(|(team, events)| {
                let events = events
                    .iter()
                    .filter_map(|event| {
                        let ratings = rated.get(&event.key)?;
                        let participant = ratings.team(&team.key)?;
                        Some(EventMetrics {
                            event_key: event.key.clone(),
                            event_name: event.name.clone(),
                            start_date: event.start_date,
                            metrics: participant.metrics.clone(),
                        })
                    })
                    .collect();

                TeamReport {
                    key: team.key,
                    team_number: team.team_number,
                    nickname: team.nickname,
                    events,
                }
            })
            .collect();

        Ok(reports)
    }

    /// Load each event's records, then rate all events concurrently
    async fn rate_events(&self, events: Vec<Event>) -> Result<HashMap<EventKey, EventRatings>> {
        let mut tasks = JoinSet::new();

        for event in events {
            let teams = self.source.teams_at_event(&event.key).await?;
            let matches = self.source.matches_for_event(&event.key).await?;
            let statuses = self.source.team_statuses_at_event(&event.key).await?;

            let engine = self.engine.clone();
            let config = self.config.clone();
            tasks.spawn_blocking(move || {
                compute_event(&engine, &config, event, teams, matches, &statuses)
            });
        }

        let mut rated = HashMap::new();
        while let Some(joined) = tasks.join_next().await {
            let ratings = joined.context("Rating task failed")??;
            rated.insert(ratings.event.key.clone(), ratings);
        }

        Ok(rated)
    }
}

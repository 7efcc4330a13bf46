//! Record source interface
//!
//! The rating engine never fetches anything itself; callers resolve teams,
//! matches and events through a [`RecordSource`] and hand the materialized
//! records to the engine.

use crate::types::{Event, Match, Participant, TeamKey, TeamStatus};
use async_trait::async_trait;
use std::collections::HashMap;

/// Logical resource paths, as used by the competition data service
pub mod paths {
    pub fn event(event_key: &str) -> String {
        format!("/api/v3/event/{}", event_key)
    }

    pub fn teams_at_event(event_key: &str) -> String {
        format!("/api/v3/event/{}/teams", event_key)
    }

    pub fn team_statuses_at_event(event_key: &str) -> String {
        format!("/api/v3/event/{}/teams/statuses", event_key)
    }

    pub fn matches_for_event(event_key: &str) -> String {
        format!("/api/v3/event/{}/matches", event_key)
    }

    pub fn events_for_team(team_key: &str, year: i32) -> String {
        format!("/api/v3/team/{}/events/{}", team_key, year)
    }
}

/// Trait for resolving competition records
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Event metadata, `None` if unknown
    async fn event(&self, event_key: &str) -> crate::error::Result<Option<Event>>;

    /// Teams registered at an event
    async fn teams_at_event(&self, event_key: &str) -> crate::error::Result<Vec<Participant>>;

    /// All matches of an event, every competition level
    async fn matches_for_event(&self, event_key: &str) -> crate::error::Result<Vec<Match>>;

    /// Events a team attended in one season
    async fn events_for_team(&self, team_key: &str, year: i32)
        -> crate::error::Result<Vec<Event>>;

    /// Status of every team at an event; a team may have no status yet
    async fn team_statuses_at_event(
        &self,
        event_key: &str,
    ) -> crate::error::Result<HashMap<TeamKey, Option<TeamStatus>>>;
}

//! Offline record source backed by a JSON cache file
//!
//! The cache is one JSON object keyed by resource path; each value holds the
//! response body plus the date and ETag it was fetched with. Lookups never
//! go to the network: a missing resource is logged and treated as absent.

use crate::error::Result;
use crate::source::provider::{paths, RecordSource};
use crate::types::{Event, Match, Participant, TeamKey, TeamStatus};
use anyhow::Context;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

/// One cached response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub data: serde_json::Value,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub etag: Option<String>,
}

/// Read-only record source over a loaded cache
#[derive(Debug, Default)]
pub struct CachedRecordSource {
    entries: HashMap<String, CacheEntry>,
}

impl CachedRecordSource {
    /// Load the cache file at `path`
    pub async fn load(path: &Path) -> Result<Self> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read record cache {}", path.display()))?;
        let source = Self::from_json(&contents)
            .with_context(|| format!("Failed to parse record cache {}", path.display()))?;
        info!(
            "Loaded {} cached resources from {}",
            source.len(),
            path.display()
        );
        Ok(source)
    }

    /// Parse cache contents
    pub fn from_json(contents: &str) -> Result<Self> {
        let entries: HashMap<String, CacheEntry> = serde_json::from_str(contents)?;
        Ok(Self { entries })
    }

    /// Insert or replace the response for a resource path
    pub fn insert(&mut self, path: impl Into<String>, data: serde_json::Value) {
        self.entries.insert(
            path.into(),
            CacheEntry {
                data,
                date: None,
                etag: None,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Decode a cached resource; `None` when missing or null
    fn resource<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        let Some(entry) = self.entries.get(path) else {
            warn!("{} not in cache", path);
            return Ok(None);
        };

        let value = serde_json::from_value::<Option<T>>(entry.data.clone())
            .with_context(|| format!("Malformed cached resource {}", path))?;
        Ok(value)
    }
}

#[async_trait]
impl RecordSource for CachedRecordSource {
    async fn event(&self, event_key: &str) -> Result<Option<Event>> {
        self.resource(&paths::event(event_key))
    }

    async fn teams_at_event(&self, event_key: &str) -> Result<Vec<Participant>> {
        Ok(self
            .resource(&paths::teams_at_event(event_key))?
            .unwrap_or_default())
    }

    async fn matches_for_event(&self, event_key: &str) -> Result<Vec<Match>> {
        Ok(self
            .resource(&paths::matches_for_event(event_key))?
            .unwrap_or_default())
    }

    async fn events_for_team(&self, team_key: &str, year: i32) -> Result<Vec<Event>> {
        Ok(self
            .resource(&paths::events_for_team(team_key, year))?
            .unwrap_or_default())
    }

    async fn team_statuses_at_event(
        &self,
        event_key: &str,
    ) -> Result<HashMap<TeamKey, Option<TeamStatus>>> {
        Ok(self
            .resource(&paths::team_statuses_at_event(event_key))?
            .unwrap_or_default())
    }
}

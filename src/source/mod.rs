//! Record sources for teams, matches and events
//!
//! This module defines the seam to the competition data service and an
//! offline implementation reading a local response cache.

pub mod cache;
pub mod provider;

// Re-export commonly used types
pub use cache::{CacheEntry, CachedRecordSource};
pub use provider::{paths, RecordSource};

//! Power Rating - offensive and defensive ratings for alliance competitions
//!
//! This crate estimates each team's contribution to its three-team alliance's
//! score by least squares over alliance membership, and ranks the results.

pub mod config;
pub mod error;
pub mod rating;
pub mod scout;
pub mod source;
pub mod types;

// Re-export commonly used types and traits
pub use error::{RatingError, RatingResult, Result};
pub use types::*;

// Re-export key components
pub use rating::{BreakdownField, MetricExtractor, RankOrder, RatingEngine};
pub use scout::Scout;
pub use source::{CachedRecordSource, RecordSource};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

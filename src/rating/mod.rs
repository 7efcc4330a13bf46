//! Offensive/defensive power ratings from alliance match results
//!
//! This module builds the least-squares normal equations from alliance
//! membership, solves them by Cholesky factorization, and ranks the results.

pub mod engine;
pub mod extractor;
pub mod incidence;
pub mod linalg;
pub mod ranker;

// Re-export commonly used types
pub use engine::{participant_keys, RatingEngine};
pub use extractor::{AllianceScore, BreakdownField, MetricExtractor};
pub use incidence::{IncidenceBuilder, NormalEquations};
pub use linalg::{CholeskyFactor, Matrix};
pub use ranker::{rank, RankOrder};

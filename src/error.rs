//! Error types for the rating engine
//!
//! The numeric core reports failures through the typed [`RatingError`] so callers
//! can tell an infeasible rating system apart from malformed input. Everything
//! around it (configuration, record loading, reporting) uses anyhow.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Result type used by the extraction, incidence, solver and ranking layers
pub type RatingResult<T> = std::result::Result<T, RatingError>;

/// Custom error types for specific rating scenarios
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RatingError {
    #[error("Matrix is not positive definite: pivot {pivot} at index {index}")]
    NotPositiveDefinite { index: usize, pivot: f64 },

    #[error("Not enough data to rate {participant}: {reason}")]
    InsufficientData { participant: String, reason: String },

    #[error("Invalid match structure in {match_key}: {reason}")]
    InvalidMatchStructure { match_key: String, reason: String },

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

impl RatingError {
    /// True when the rating system could not be solved with the data supplied.
    ///
    /// Batch callers treat this as "not enough data yet" and move on to the
    /// next independent computation.
    pub fn is_insufficient_data(&self) -> bool {
        matches!(
            self,
            RatingError::NotPositiveDefinite { .. } | RatingError::InsufficientData { .. }
        )
    }
}

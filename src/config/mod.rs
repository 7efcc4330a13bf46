//! Configuration management for the power-rating tool
//!
//! This module handles configuration loading from TOML files and environment
//! variables, validation, and default values.

pub mod app;
pub mod rating;

// Re-export commonly used types
pub use app::{validate_config, AppConfig, ServiceSettings, SourceSettings};
pub use rating::{default_statistics, MetricSource, RatingConfig, StatisticSpec};

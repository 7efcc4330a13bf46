//! Main application configuration
//!
//! This module defines the primary configuration structures for the
//! power-rating tool, including TOML and environment variable loading and
//! validation.

use crate::config::rating::RatingConfig;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub source: SourceSettings,
    pub rating: RatingConfig,
}

/// Service-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Name used in log output
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

/// Record source settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    /// JSON record cache to read matches, teams and events from
    pub cache_file: PathBuf,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "power-rating".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            cache_file: PathBuf::from("tba_cache.json"),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file, then apply environment overrides
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config = Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Parse configuration from TOML text; missing sections use defaults
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            self.service.log_level = log_level;
        }
        if let Ok(cache_file) = env::var("POWER_RATING_CACHE_FILE") {
            self.source.cache_file = PathBuf::from(cache_file);
        }
        if let Ok(min_pivot) = env::var("POWER_RATING_MIN_PIVOT") {
            self.rating.min_pivot = min_pivot
                .parse()
                .map_err(|_| anyhow!("Invalid POWER_RATING_MIN_PIVOT value: {}", min_pivot))?;
        }
        if let Ok(comp_level) = env::var("POWER_RATING_COMP_LEVEL") {
            self.rating.comp_level = comp_level;
        }
        Ok(())
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    if config.source.cache_file.as_os_str().is_empty() {
        return Err(anyhow!("Cache file path cannot be empty"));
    }

    let rating = &config.rating;
    if !rating.min_pivot.is_finite() || rating.min_pivot < 0.0 {
        return Err(anyhow!("Minimum pivot must be finite and non-negative"));
    }
    if rating.comp_level.is_empty() {
        return Err(anyhow!("Comp level cannot be empty"));
    }
    for statistic in &rating.statistics {
        if statistic.field.is_empty() {
            return Err(anyhow!("Statistic field cannot be empty"));
        }
        if statistic.offense.is_none() && statistic.defense.is_none() {
            return Err(anyhow!(
                "Statistic {} must name an offense or defense metric",
                statistic.field
            ));
        }
        if statistic.rank_order.is_some() && statistic.offense.is_none() {
            return Err(anyhow!(
                "Statistic {} is ranked but has no offense metric",
                statistic.field
            ));
        }
    }

    Ok(())
}

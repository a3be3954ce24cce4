//! Configuration management for Policy Atlas.
//!
//! Configuration lives in `~/.policy-atlas/config.json`. Every field has a
//! default, so a missing file or a partial file is always valid input.
//!
//! # Configuration Priority
//!
//! 1. Environment variables (ATLAS_* prefix)
//! 2. Explicit config file values
//! 3. Default values
//!
//! # Environment Variable Mapping
//!
//! - `ATLAS_LOG_LEVEL` → observability.log_level
//! - `ATLAS_LOG_FORMAT` → observability.log_format
//! - `ATLAS_DATASET` → dataset.path

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Get the configuration directory path.
pub fn config_dir() -> PathBuf {
    directories::UserDirs::new().map_or_else(
        || PathBuf::from(".policy-atlas"),
        |dirs| dirs.home_dir().join(".policy-atlas"),
    )
}

/// Get the configuration file path.
pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

// ============================================================================
// Observability
// ============================================================================

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level", alias = "level")]
    pub log_level: String,

    /// Log format (json, pretty)
    #[serde(default = "default_log_format", alias = "format")]
    pub log_format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "warn".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

// ============================================================================
// Dataset
// ============================================================================

/// Where the policy payload is read from.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DatasetConfig {
    /// Path to the JSON payload. The CLI `--dataset` flag takes precedence.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

// ============================================================================
// Momentum thresholds
// ============================================================================

/// Tuning constants of the momentum classifier.
///
/// The defaults are the values the dashboard has always shipped with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MomentumConfig {
    /// Entries dated in or after this year count as recent.
    #[serde(default = "default_recent_from_year")]
    pub recent_from_year: i32,

    /// `accelerating` needs at least this many recent entries...
    #[serde(default = "default_accelerating_min_recent")]
    pub accelerating_min_recent: usize,

    /// ...and a recent share strictly above this rate.
    #[serde(default = "default_accelerating_min_rate")]
    pub accelerating_min_rate: f64,

    /// `steady` needs at least this many entries in total...
    #[serde(default = "default_steady_min_total")]
    pub steady_min_total: usize,

    /// ...and a recent share of at least this rate.
    #[serde(default = "default_steady_min_rate")]
    pub steady_min_rate: f64,

    /// `emerging` needs at least this many recent entries...
    #[serde(default = "default_emerging_min_recent")]
    pub emerging_min_recent: usize,

    /// ...and strictly fewer than this many entries in total.
    #[serde(default = "default_emerging_max_total")]
    pub emerging_max_total: usize,
}

impl Default for MomentumConfig {
    fn default() -> Self {
        Self {
            recent_from_year: default_recent_from_year(),
            accelerating_min_recent: default_accelerating_min_recent(),
            accelerating_min_rate: default_accelerating_min_rate(),
            steady_min_total: default_steady_min_total(),
            steady_min_rate: default_steady_min_rate(),
            emerging_min_recent: default_emerging_min_recent(),
            emerging_max_total: default_emerging_max_total(),
        }
    }
}

fn default_recent_from_year() -> i32 {
    2023
}

fn default_accelerating_min_recent() -> usize {
    5
}

fn default_accelerating_min_rate() -> f64 {
    0.5
}

fn default_steady_min_total() -> usize {
    5
}

fn default_steady_min_rate() -> f64 {
    0.3
}

fn default_emerging_min_recent() -> usize {
    2
}

fn default_emerging_max_total() -> usize {
    8
}

// ============================================================================
// Similarity weights
// ============================================================================

/// Blend weights of the pairwise similarity index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarityConfig {
    /// Weight of presence agreement when both sides share scored dimensions.
    #[serde(default = "default_presence_weight")]
    pub presence_weight: f64,

    /// Weight of substance agreement when both sides share scored dimensions.
    #[serde(default = "default_substance_weight")]
    pub substance_weight: f64,

    /// Weight of presence agreement when no dimension is scored on both sides.
    #[serde(default = "default_presence_only_weight")]
    pub presence_only_weight: f64,

    /// Width of the score scale (scores run from 0 to this value).
    #[serde(default = "default_score_scale")]
    pub score_scale: f64,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            presence_weight: default_presence_weight(),
            substance_weight: default_substance_weight(),
            presence_only_weight: default_presence_only_weight(),
            score_scale: default_score_scale(),
        }
    }
}

fn default_presence_weight() -> f64 {
    0.2
}

fn default_substance_weight() -> f64 {
    0.8
}

fn default_presence_only_weight() -> f64 {
    0.3
}

fn default_score_scale() -> f64 {
    4.0
}

// ============================================================================
// Root
// ============================================================================

/// Root configuration for Atlas binaries.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AtlasConfig {
    /// Logging configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,

    /// Dataset location
    #[serde(default)]
    pub dataset: DatasetConfig,

    /// Momentum classifier thresholds
    #[serde(default)]
    pub momentum: MomentumConfig,

    /// Similarity blend weights
    #[serde(default)]
    pub similarity: SimilarityConfig,
}

impl AtlasConfig {
    /// Load configuration from the default path.
    pub fn load() -> Result<Self> {
        let path = config_path();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Load configuration (explicit path or default location) and apply
    /// environment overrides.
    pub fn load_with_env(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load_from(path)?,
            None => Self::load()?,
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides to the configuration.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(level) = std::env::var("ATLAS_LOG_LEVEL") {
            self.observability.log_level = level;
        }
        if let Ok(format) = std::env::var("ATLAS_LOG_FORMAT") {
            self.observability.log_format = format;
        }
        if let Ok(path) = std::env::var("ATLAS_DATASET") {
            if !path.trim().is_empty() {
                self.dataset.path = Some(PathBuf::from(path));
            }
        }
    }
}

//! Configuration validation for Atlas.
//!
//! Provides validation logic for configuration fields to ensure
//! all values are within valid ranges before the engine is built.

use thiserror::Error;

use crate::config::{AtlasConfig, MomentumConfig, ObservabilityConfig, SimilarityConfig};
use crate::logging::{LOG_FORMATS, LOG_LEVELS};

/// Configuration validation error.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Configuration conflict: {reason}")]
    Conflict { reason: String },

    #[error("Multiple validation errors: {0:?}")]
    Multiple(Vec<ValidationError>),
}

impl ValidationError {
    /// Collapse a list of errors into a single result.
    pub fn from_errors(mut errors: Vec<ValidationError>) -> ValidationResult<()> {
        if errors.is_empty() {
            Ok(())
        } else if errors.len() == 1 {
            Err(errors.remove(0))
        } else {
            Err(ValidationError::Multiple(errors))
        }
    }
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Trait for validatable configuration sections.
pub trait Validate {
    /// Validate this configuration section.
    fn validate(&self) -> ValidationResult<()>;
}

impl Validate for AtlasConfig {
    fn validate(&self) -> ValidationResult<()> {
        let mut errors = Vec::new();

        if let Err(e) = self.observability.validate() {
            errors.push(e);
        }
        if let Err(e) = self.momentum.validate() {
            errors.push(e);
        }
        if let Err(e) = self.similarity.validate() {
            errors.push(e);
        }

        ValidationError::from_errors(errors)
    }
}

impl AtlasConfig {
    /// Load and validate configuration.
    pub fn load_and_validate(path: Option<&std::path::Path>) -> anyhow::Result<Self> {
        let config = Self::load_with_env(path)?;
        config
            .validate()
            .map_err(|e| crate::Error::Config(e.to_string()))?;
        Ok(config)
    }
}

impl Validate for ObservabilityConfig {
    fn validate(&self) -> ValidationResult<()> {
        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(ValidationError::InvalidValue {
                field: "observability.log_level".into(),
                reason: format!("must be one of: {}", LOG_LEVELS.join(", ")),
            });
        }

        if !LOG_FORMATS.contains(&self.log_format.to_lowercase().as_str()) {
            return Err(ValidationError::InvalidValue {
                field: "observability.log_format".into(),
                reason: format!("must be one of: {}", LOG_FORMATS.join(", ")),
            });
        }

        Ok(())
    }
}

fn check_rate(field: &str, value: f64) -> ValidationResult<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ValidationError::InvalidValue {
            field: field.into(),
            reason: format!("must be between 0 and 1, got {value}"),
        });
    }
    Ok(())
}

impl Validate for MomentumConfig {
    fn validate(&self) -> ValidationResult<()> {
        check_rate("momentum.accelerating_min_rate", self.accelerating_min_rate)?;
        check_rate("momentum.steady_min_rate", self.steady_min_rate)?;

        if self.emerging_max_total == 0 {
            return Err(ValidationError::InvalidValue {
                field: "momentum.emerging_max_total".into(),
                reason: "must be greater than 0".into(),
            });
        }

        Ok(())
    }
}

impl Validate for SimilarityConfig {
    fn validate(&self) -> ValidationResult<()> {
        let weights = [
            ("similarity.presence_weight", self.presence_weight),
            ("similarity.substance_weight", self.substance_weight),
            ("similarity.presence_only_weight", self.presence_only_weight),
        ];
        for (field, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(ValidationError::InvalidValue {
                    field: field.into(),
                    reason: format!("must be a non-negative number, got {value}"),
                });
            }
        }

        if (self.presence_weight + self.substance_weight - 1.0).abs() > 1e-9 {
            return Err(ValidationError::Conflict {
                reason: format!(
                    "similarity.presence_weight + similarity.substance_weight must equal 1, got {}",
                    self.presence_weight + self.substance_weight
                ),
            });
        }

        if !self.score_scale.is_finite() || self.score_scale <= 0.0 {
            return Err(ValidationError::InvalidValue {
                field: "similarity.score_scale".into(),
                reason: "must be greater than 0".into(),
            });
        }

        Ok(())
    }
}

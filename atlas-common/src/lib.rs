//! Atlas Common - Shared types and utilities for the Policy Atlas workspace.
//!
//! This crate provides:
//! - Configuration types and loading
//! - Configuration validation
//! - Error types and handling utilities
//! - Logging setup
//! - Small string helpers shared by the engine and the CLI

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod logging;
pub mod util;
pub mod validation;

pub use config::{
    AtlasConfig, DatasetConfig, MomentumConfig, ObservabilityConfig, SimilarityConfig,
};
pub use error::{Error, Result, ResultExt};
pub use validation::{Validate, ValidationError, ValidationResult};

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::config::AtlasConfig;
    pub use crate::error::{Error, Result, ResultExt};
    pub use crate::logging::init_logging;
    pub use crate::validation::{Validate, ValidationError};
}

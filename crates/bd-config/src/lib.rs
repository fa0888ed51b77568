//! Bayes Dice configuration loading and validation.
//!
//! This crate provides:
//! - Typed settings for `settings.json` (hypotheses, guess threshold, roll rule)
//! - Config resolution (CLI → env → XDG → defaults)
//! - Semantic validation

pub mod resolve;
pub mod settings;
pub mod validate;

pub use resolve::{load_settings, resolve_settings_path, ConfigSource, LoadedSettings};
pub use settings::{
    RollRange, Settings, DEFAULT_GUESS_THRESHOLD, DEFAULT_HYPOTHESES, DEFAULT_MAX_ROLLS,
};
pub use validate::{
    check_hypotheses, validate_settings, HypothesisIssue, ValidationError, ValidationResult,
};

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";

//! Configuration validation errors and semantic validation.

use std::collections::HashSet;

use thiserror::Error;

use crate::settings::{RollRange, Settings};

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Configuration validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Semantic validation failed: {0}")]
    SemanticError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::IoError(_) => 60,
            ValidationError::ParseError(_) => 61,
            ValidationError::SemanticError(_) => 63,
            ValidationError::InvalidValue { .. } => 65,
            ValidationError::VersionMismatch { .. } => 66,
        }
    }

    fn invalid(field: &str, message: impl Into<String>) -> Self {
        ValidationError::InvalidValue {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Validate settings semantically.
pub fn validate_settings(settings: &Settings) -> ValidationResult<()> {
    if settings.schema_version != crate::CONFIG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: settings.schema_version.clone(),
        });
    }

    validate_hypotheses(&settings.hypotheses)?;

    let t = settings.guess_threshold;
    if !t.is_finite() || t <= 0.0 || t > 1.0 {
        return Err(ValidationError::invalid(
            "guess_threshold",
            format!("must be in (0, 1], got {}", t),
        ));
    }

    if settings.roll_range == RollRange::ExclusiveUpper {
        if let Some(&sides) = settings.hypotheses.iter().find(|&&s| s < 2) {
            return Err(ValidationError::SemanticError(format!(
                "roll_range exclusive-upper cannot roll a {}-sided die",
                sides
            )));
        }
    }

    if settings.max_rolls == 0 {
        return Err(ValidationError::invalid("max_rolls", "must be at least 1"));
    }

    Ok(())
}

/// Reason a list of die side-counts cannot serve as a hypothesis space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HypothesisIssue {
    Empty,
    NonPositive,
    Duplicate(u32),
}

/// Check a hypothesis list is non-empty, positive and distinct.
///
/// Shared by settings validation and the belief engine.
pub fn check_hypotheses(hypotheses: &[u32]) -> Result<(), HypothesisIssue> {
    if hypotheses.is_empty() {
        return Err(HypothesisIssue::Empty);
    }
    let mut seen = HashSet::with_capacity(hypotheses.len());
    for &sides in hypotheses {
        if sides == 0 {
            return Err(HypothesisIssue::NonPositive);
        }
        if !seen.insert(sides) {
            return Err(HypothesisIssue::Duplicate(sides));
        }
    }
    Ok(())
}

/// Validate a hypothesis list: non-empty, positive, distinct.
pub fn validate_hypotheses(hypotheses: &[u32]) -> ValidationResult<()> {
    check_hypotheses(hypotheses).map_err(|issue| {
        let message = match issue {
            HypothesisIssue::Empty => "must not be empty".to_string(),
            HypothesisIssue::NonPositive => "side counts must be positive".to_string(),
            HypothesisIssue::Duplicate(sides) => format!("duplicate side count {}", sides),
        };
        ValidationError::invalid("hypotheses", message)
    })
}

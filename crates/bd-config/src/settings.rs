//! Settings structure for `settings.json`.

use serde::{Deserialize, Serialize};

use crate::validate::ValidationError;

/// Default die side-counts in the box.
pub const DEFAULT_HYPOTHESES: [u32; 5] = [4, 6, 8, 12, 20];

/// Default posterior probability required before a guess is made.
pub const DEFAULT_GUESS_THRESHOLD: f64 = 0.8;

/// Default cap on rolls for non-interactive sessions.
pub const DEFAULT_MAX_ROLLS: u32 = 1000;

/// Range a simulated roll is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RollRange {
    /// Uniform over `[1, sides]`.
    #[default]
    Inclusive,
    /// Uniform over `[1, sides)`. A d6 never shows a 6.
    ExclusiveUpper,
}

impl RollRange {
    /// Largest face this rule can produce for a die with `sides` sides.
    pub fn max_face(self, sides: u32) -> u32 {
        match self {
            RollRange::Inclusive => sides,
            RollRange::ExclusiveUpper => sides.saturating_sub(1),
        }
    }
}

impl std::str::FromStr for RollRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "inclusive" | "full" => Ok(RollRange::Inclusive),
            "exclusive-upper" | "exclusive_upper" | "exclusive" | "legacy" => {
                Ok(RollRange::ExclusiveUpper)
            }
            _ => Err(format!("unknown roll range: {}", s)),
        }
    }
}

impl std::fmt::Display for RollRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RollRange::Inclusive => write!(f, "inclusive"),
            RollRange::ExclusiveUpper => write!(f, "exclusive-upper"),
        }
    }
}

/// Session settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version of this file.
    pub schema_version: String,

    /// Die side-counts in the box, in display order.
    #[serde(default = "default_hypotheses")]
    pub hypotheses: Vec<u32>,

    /// Posterior probability at which a die is guessed.
    #[serde(default = "default_guess_threshold")]
    pub guess_threshold: f64,

    /// Roll simulation rule.
    #[serde(default)]
    pub roll_range: RollRange,

    /// Fixed RNG seed for reproducible sessions.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Upper bound on rolls for `simulate`.
    #[serde(default = "default_max_rolls")]
    pub max_rolls: u32,
}

fn default_hypotheses() -> Vec<u32> {
    DEFAULT_HYPOTHESES.to_vec()
}

fn default_guess_threshold() -> f64 {
    DEFAULT_GUESS_THRESHOLD
}

fn default_max_rolls() -> u32 {
    DEFAULT_MAX_ROLLS
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: crate::CONFIG_SCHEMA_VERSION.to_string(),
            hypotheses: default_hypotheses(),
            guess_threshold: DEFAULT_GUESS_THRESHOLD,
            roll_range: RollRange::default(),
            seed: None,
            max_rolls: DEFAULT_MAX_ROLLS,
        }
    }
}

impl Settings {
    /// Parse settings from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ValidationError> {
        serde_json::from_str(json)
            .map_err(|e| ValidationError::ParseError(format!("Invalid JSON: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_box_of_five() {
        let s = Settings::default();
        assert_eq!(s.hypotheses, vec![4, 6, 8, 12, 20]);
        assert_eq!(s.guess_threshold, 0.8);
        assert_eq!(s.roll_range, RollRange::Inclusive);
        assert!(s.seed.is_none());
    }

    #[test]
    fn missing_fields_use_defaults() {
        let s = Settings::from_json(r#"{"schema_version": "1.0.0"}"#).unwrap();
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn parses_all_fields() {
        let s = Settings::from_json(
            r#"{
                "schema_version": "1.0.0",
                "hypotheses": [2, 3],
                "guess_threshold": 0.95,
                "roll_range": "exclusive-upper",
                "seed": 42,
                "max_rolls": 10
            }"#,
        )
        .unwrap();
        assert_eq!(s.hypotheses, vec![2, 3]);
        assert_eq!(s.roll_range, RollRange::ExclusiveUpper);
        assert_eq!(s.seed, Some(42));
        assert_eq!(s.max_rolls, 10);
    }

    #[test]
    fn rejects_malformed_json() {
        let err = Settings::from_json("{not json").unwrap_err();
        assert!(matches!(err, ValidationError::ParseError(_)));
    }

    #[test]
    fn roll_range_parse_and_display() {
        assert_eq!("inclusive".parse::<RollRange>().unwrap(), RollRange::Inclusive);
        assert_eq!("legacy".parse::<RollRange>().unwrap(), RollRange::ExclusiveUpper);
        assert!("sideways".parse::<RollRange>().is_err());
        assert_eq!(RollRange::ExclusiveUpper.to_string(), "exclusive-upper");
    }

    #[test]
    fn roll_range_max_face() {
        assert_eq!(RollRange::Inclusive.max_face(6), 6);
        assert_eq!(RollRange::ExclusiveUpper.max_face(6), 5);
        assert_eq!(RollRange::ExclusiveUpper.max_face(0), 0);
    }
}

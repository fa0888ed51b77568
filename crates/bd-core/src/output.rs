//! Output rendering for CLI commands.
//!
//! Human output mirrors the classic dice demo; JSON output wraps payloads in a
//! small envelope with schema version and timestamp.

use std::fmt::Write as _;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::inference::{BeliefTable, HypothesisSpace};
use crate::session::{RollOutcome, SessionSummary, Verdict};

/// Schema version for JSON payloads.
pub const OUTPUT_SCHEMA_VERSION: &str = "1.0.0";

/// Supported output formats for CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text (default)
    #[default]
    Human,

    /// One pretty-printed JSON document per command
    Json,

    /// Streaming JSON Lines, one object per roll
    Jsonl,
}

impl OutputFormat {
    pub fn is_machine(self) -> bool {
        !matches!(self, OutputFormat::Human)
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Human => write!(f, "human"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Jsonl => write!(f, "jsonl"),
        }
    }
}

/// Wrap a payload with schema version, command name and timestamp.
pub fn envelope<T: Serialize>(command: &str, payload: &T) -> serde_json::Value {
    serde_json::json!({
        "schema_version": OUTPUT_SCHEMA_VERSION,
        "command": command,
        "generated_at": chrono::Utc::now().to_rfc3339(),
        "data": payload,
    })
}

/// Introductory text for an interactive session.
pub fn render_banner(space: &HypothesisSpace) -> String {
    format!(
        "There are {} dice in a box full of multisided dice: {}.\n\
         You have selected one at random.\n\
         This program will attempt to guess which die was picked based on your rolls.",
        space.len(),
        space
    )
}

/// Probability as a percentage rounded to two places.
pub fn format_percent(p: f64) -> String {
    format!("{:.2}", p * 100.0)
}

/// Posterior table with `*` marking every die at or above `threshold`.
pub fn render_posterior(table: &BeliefTable, threshold: f64) -> String {
    let mut out = String::from("Best guess:\n");
    for row in &table.rows {
        let marker = if row.posterior >= threshold { "*" } else { "" };
        let _ = writeln!(
            out,
            "{}{}-sided die: {} percent probability.",
            marker,
            row.sides,
            format_percent(row.posterior)
        );
    }
    out
}

/// Result of one roll: the value followed by the posterior table.
pub fn render_roll(outcome: &RollOutcome, threshold: f64) -> String {
    format!(
        "You rolled a {}.\n\n{}",
        outcome.roll,
        render_posterior(&outcome.table, threshold)
    )
}

/// Full Bayes table: prior, likelihood, product and posterior per die.
pub fn render_ledger(table: &BeliefTable) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>6}  {:>8}  {:>8}  {:>11}  {:>8}",
        "H", "P(H)", "P(D|H)", "P(H)P(D|H)", "P(H|D)"
    );
    for row in &table.rows {
        let _ = writeln!(
            out,
            "{:>6}  {:>8.5}  {:>8.5}  {:>11.5}  {:>8.5}",
            row.sides, row.prior, row.likelihood, row.unnormalized, row.posterior
        );
    }
    let _ = writeln!(
        out,
        "observations: {}  updates: {}",
        table.observations, table.updates
    );
    out
}

/// Closing line for a finished session.
pub fn render_summary(summary: &SessionSummary) -> String {
    let status = match summary.verdict {
        Verdict::Correct => "The program guessed CORRECTLY!".to_string(),
        Verdict::Incorrect => "The program did NOT guess correctly!".to_string(),
        Verdict::Undecided => format!(
            "The program did NOT guess correctly! (no die held {}% when the session ended)",
            format_percent(summary.guess_threshold)
        ),
    };
    format!(
        "The die selected was a {}-sided die! {} {} total rolls",
        summary.hidden_die, status, summary.rolls
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::BeliefEngine;
    use crate::session::{Session, SessionOptions};

    fn after_six() -> BeliefTable {
        let mut engine = BeliefEngine::new(&[4, 6, 8, 12, 20]).unwrap();
        engine.observe(6).unwrap();
        engine.update_belief().unwrap();
        engine.table()
    }

    #[test]
    fn banner_lists_dice() {
        let text = render_banner(&HypothesisSpace::new(&bd_config::DEFAULT_HYPOTHESES).unwrap());
        assert!(text.starts_with("There are 5 dice"));
        assert!(text.contains("[4, 6, 8, 12, 20]"));
    }

    #[test]
    fn posterior_table_lines() {
        let text = render_posterior(&after_six(), 0.8);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Best guess:");
        assert_eq!(lines[1], "4-sided die: 0.00 percent probability.");
        assert_eq!(lines[2], "6-sided die: 39.22 percent probability.");
        assert_eq!(lines.len(), 6);
        assert!(!text.contains('*'));
    }

    #[test]
    fn posterior_table_marks_threshold() {
        let text = render_posterior(&after_six(), 0.3);
        assert!(text.contains("*6-sided die"));
        assert!(!text.contains("*8-sided die"));
    }

    #[test]
    fn ledger_has_header_and_rows() {
        let text = render_ledger(&after_six());
        assert!(text.contains("P(H|D)"));
        assert_eq!(text.lines().count(), 7);
        assert!(text.contains("observations: 1  updates: 1"));
    }

    #[test]
    fn envelope_shape() {
        let v = envelope("posterior", &after_six());
        assert_eq!(v["schema_version"], OUTPUT_SCHEMA_VERSION);
        assert_eq!(v["command"], "posterior");
        assert_eq!(v["data"]["rows"].as_array().unwrap().len(), 5);
    }

    #[test]
    fn undecided_summary_reports_final_state() {
        let session = Session::new(SessionOptions {
            seed: Some(7),
            ..SessionOptions::default()
        })
        .unwrap();
        let summary = session.finish();
        assert_eq!(summary.verdict, Verdict::Undecided);
        let text = render_summary(&summary);
        assert!(text.contains("no die held 80.00% when the session ended"));
        assert!(text.ends_with("0 total rolls"));
    }

    #[test]
    fn percent_formatting() {
        assert_eq!(format_percent(0.8), "80.00");
        assert_eq!(format_percent(0.0), "0.00");
    }

    #[test]
    fn format_is_machine() {
        assert!(!OutputFormat::Human.is_machine());
        assert!(OutputFormat::Json.is_machine());
        assert_eq!(OutputFormat::Jsonl.to_string(), "jsonl");
    }
}

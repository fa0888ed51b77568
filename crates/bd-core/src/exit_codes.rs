//! Exit codes for the bayes-dice CLI.
//!
//! Exit code ranges:
//! - 0-2: Session outcomes (how the final guess scored)
//! - 10-19: User/environment errors (recoverable by user action)
//! - 20-29: Internal errors

use crate::session::Verdict;

/// Exit codes for bayes-dice operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    // ========================================================================
    // Session Outcomes (0-2)
    // ========================================================================
    /// Success, or a session whose confident guess was right
    Correct = 0,

    /// Confident guess named the wrong die
    Incorrect = 1,

    /// No die reached the guess threshold
    Undecided = 2,

    // ========================================================================
    // User / Environment Errors (10-19)
    // ========================================================================
    /// Invalid arguments or observations
    ArgsError = 10,

    /// Settings file missing, malformed or invalid
    ConfigError = 11,

    // ========================================================================
    // Internal Errors (20-29)
    // ========================================================================
    /// Every hypothesis was ruled out
    DegenerateBelief = 20,

    /// I/O error
    IoError = 21,

    /// Internal error (bug - please report)
    InternalError = 22,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Check if this exit code is a user/environment error (codes 10-19).
    pub fn is_user_error(self) -> bool {
        (10..20).contains(&(self as i32))
    }

    /// Check if this exit code is an internal error (codes 20-29).
    pub fn is_internal_error(self) -> bool {
        (self as i32) >= 20
    }

    /// Get the code name as a string constant (for JSON output).
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Correct => "OK_CORRECT",
            ExitCode::Incorrect => "OK_INCORRECT",
            ExitCode::Undecided => "OK_UNDECIDED",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::ConfigError => "ERR_CONFIG",
            ExitCode::DegenerateBelief => "ERR_DEGENERATE_BELIEF",
            ExitCode::IoError => "ERR_IO",
            ExitCode::InternalError => "ERR_INTERNAL",
        }
    }
}

impl From<Verdict> for ExitCode {
    fn from(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Correct => ExitCode::Correct,
            Verdict::Incorrect => ExitCode::Incorrect,
            Verdict::Undecided => ExitCode::Undecided,
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code_name(), self.as_i32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Correct.as_i32(), 0);
        assert_eq!(ExitCode::Incorrect.as_i32(), 1);
        assert_eq!(ExitCode::Undecided.as_i32(), 2);
        assert_eq!(ExitCode::ArgsError.as_i32(), 10);
        assert_eq!(ExitCode::ConfigError.as_i32(), 11);
        assert_eq!(ExitCode::DegenerateBelief.as_i32(), 20);
    }

    #[test]
    fn test_ranges() {
        assert!(!ExitCode::Undecided.is_user_error());
        assert!(!ExitCode::Undecided.is_internal_error());
        assert!(ExitCode::ConfigError.is_user_error());
        assert!(!ExitCode::ConfigError.is_internal_error());
        assert!(ExitCode::DegenerateBelief.is_internal_error());
        assert!(ExitCode::InternalError.is_internal_error());
        assert_eq!(ExitCode::InternalError.code_name(), "ERR_INTERNAL");
    }

    #[test]
    fn test_from_verdict() {
        assert_eq!(ExitCode::from(Verdict::Correct), ExitCode::Correct);
        assert_eq!(ExitCode::from(Verdict::Undecided), ExitCode::Undecided);
    }

    #[test]
    fn test_display() {
        assert_eq!(ExitCode::ArgsError.to_string(), "ERR_ARGS (10)");
    }
}

//! Logging configuration.
//!
//! Supports configuration via:
//! - Environment variables (BAYES_DICE_LOG, RUST_LOG, BAYES_DICE_LOG_FORMAT)
//! - CLI flags (-v, -q)

use serde::{Deserialize, Serialize};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable console format (default).
    #[default]
    Human,
    /// Machine-parseable JSON lines.
    Jsonl,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" | "console" | "pretty" => Ok(LogFormat::Human),
            "jsonl" | "json" | "structured" => Ok(LogFormat::Jsonl),
            _ => Err(format!("unknown log format: {}", s)),
        }
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Human => write!(f, "human"),
            LogFormat::Jsonl => write!(f, "jsonl"),
        }
    }
}

/// Log level filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    /// Default: the CLI talks on stdout, logs stay quiet unless asked.
    #[default]
    Warn,
    Error,
    Off,
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            "off" | "none" | "quiet" => Ok(LogLevel::Off),
            _ => Err(format!("unknown log level: {}", s)),
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
            LogLevel::Off => write!(f, "off"),
        }
    }
}

impl From<LogLevel> for tracing_subscriber::filter::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing_subscriber::filter::LevelFilter::TRACE,
            LogLevel::Debug => tracing_subscriber::filter::LevelFilter::DEBUG,
            LogLevel::Info => tracing_subscriber::filter::LevelFilter::INFO,
            LogLevel::Warn => tracing_subscriber::filter::LevelFilter::WARN,
            LogLevel::Error => tracing_subscriber::filter::LevelFilter::ERROR,
            LogLevel::Off => tracing_subscriber::filter::LevelFilter::OFF,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub format: LogFormat,
    pub level: LogLevel,
    /// Whether to include timestamps in human output.
    pub timestamps: bool,
    /// Raw `RUST_LOG` directives, used only when no explicit level was given.
    pub directives: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            format: LogFormat::Human,
            level: LogLevel::Warn,
            timestamps: true,
            directives: None,
        }
    }
}

impl LogConfig {
    /// Create config from environment and CLI overrides.
    ///
    /// BAYES_DICE_LOG takes precedence over RUST_LOG; CLI values win over both.
    pub fn from_env(cli_level: Option<LogLevel>, cli_format: Option<LogFormat>) -> Self {
        let env_level = std::env::var("BAYES_DICE_LOG").ok();
        let rust_log = std::env::var("RUST_LOG").ok();
        let env_format = std::env::var("BAYES_DICE_LOG_FORMAT").ok();
        Self::resolve(
            env_level.as_deref(),
            rust_log.as_deref(),
            env_format.as_deref(),
            cli_level,
            cli_format,
        )
    }

    fn resolve(
        env_level: Option<&str>,
        rust_log: Option<&str>,
        env_format: Option<&str>,
        cli_level: Option<LogLevel>,
        cli_format: Option<LogFormat>,
    ) -> Self {
        let mut config = LogConfig::default();

        if let Some(level) = env_level.and_then(|v| v.parse::<LogLevel>().ok()) {
            config.level = level;
        } else if let Some(val) = rust_log.map(str::trim).filter(|v| !v.is_empty()) {
            config.directives = Some(val.to_string());
        }

        if let Some(format) = env_format.and_then(|v| v.parse::<LogFormat>().ok()) {
            config.format = format;
        }

        if let Some(level) = cli_level {
            config.level = level;
            config.directives = None;
        }
        if let Some(format) = cli_format {
            config.format = format;
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parse() {
        assert_eq!("debug".parse::<LogLevel>().unwrap(), LogLevel::Debug);
        assert_eq!("WARNING".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!("quiet".parse::<LogLevel>().unwrap(), LogLevel::Off);
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Jsonl);
        assert_eq!("pretty".parse::<LogFormat>().unwrap(), LogFormat::Human);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_resolution_precedence() {
        let c = LogConfig::resolve(None, None, None, None, None);
        assert_eq!(c.level, LogLevel::Warn);
        assert_eq!(c.format, LogFormat::Human);

        let c = LogConfig::resolve(Some("debug"), Some("trace"), None, None, None);
        assert_eq!(c.level, LogLevel::Debug);
        assert_eq!(c.directives, None);

        let c = LogConfig::resolve(None, Some("bd_core=trace"), Some("jsonl"), None, None);
        assert_eq!(c.directives.as_deref(), Some("bd_core=trace"));
        assert_eq!(c.format, LogFormat::Jsonl);

        let c = LogConfig::resolve(None, Some("   "), None, None, None);
        assert_eq!(c.directives, None);

        let c = LogConfig::resolve(
            Some("debug"),
            None,
            Some("jsonl"),
            Some(LogLevel::Error),
            Some(LogFormat::Human),
        );
        assert_eq!(c.level, LogLevel::Error);
        assert_eq!(c.format, LogFormat::Human);
    }

    #[test]
    fn cli_level_discards_rust_log() {
        let c = LogConfig::resolve(None, Some("bd_core=debug"), None, Some(LogLevel::Off), None);
        assert_eq!(c.level, LogLevel::Off);
        assert_eq!(c.directives, None);
    }

    #[test]
    fn env_level_discards_rust_log() {
        let c = LogConfig::resolve(Some("off"), Some("bd_core=debug"), None, None, None);
        assert_eq!(c.level, LogLevel::Off);
        assert_eq!(c.directives, None);
    }
}

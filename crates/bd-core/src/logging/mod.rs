//! Structured logging for bayes-dice.
//!
//! - stdout is reserved for command payloads (tables, JSON)
//! - stderr receives all log output (human or JSONL)
//!
//! Library code only emits `tracing` events; the binary decides where they go
//! by calling [`init_logging`] once at startup.

pub mod config;

pub use config::{LogConfig, LogFormat, LogLevel};

use std::io::IsTerminal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Default filter directives for a level: library and binary targets.
pub fn default_directives(level: LogLevel) -> String {
    format!("bd_core={0},bayes_dice={0}", level)
}

/// Filter for a resolved config.
///
/// Raw `RUST_LOG` directives apply only when the config carries them, which
/// [`LogConfig::from_env`] allows only without `BAYES_DICE_LOG` or a CLI level.
/// Unparseable directives fall back to the level.
pub fn build_filter(config: &LogConfig) -> EnvFilter {
    config
        .directives
        .as_deref()
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(default_directives(config.level)))
}

/// Initialize the logging subsystem.
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init_logging(config: &LogConfig) {
    let filter = build_filter(config);

    let result = match config.format {
        LogFormat::Human => {
            let use_ansi = std::io::stderr().is_terminal();
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_ansi(use_ansi);

            if config.timestamps {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt_layer)
                    .try_init()
            } else {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt_layer.without_time())
                    .try_init()
            }
        }
        LogFormat::Jsonl => {
            let json_layer = fmt::layer()
                .json()
                .flatten_event(true)
                .with_current_span(false)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry()
                .with(filter)
                .with(json_layer)
                .try_init()
        }
    };

    if result.is_err() {
        tracing::debug!("logging already initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn directives_cover_library_and_binary() {
        assert_eq!(
            default_directives(LogLevel::Debug),
            "bd_core=debug,bayes_dice=debug"
        );
    }

    #[test]
    fn filter_follows_level_without_directives() {
        let config = LogConfig {
            level: LogLevel::Info,
            ..LogConfig::default()
        };
        assert_eq!(build_filter(&config).max_level_hint(), Some(LevelFilter::INFO));
    }

    #[test]
    fn filter_uses_directives_when_present() {
        let config = LogConfig {
            directives: Some("bd_core=debug".to_string()),
            ..LogConfig::default()
        };
        assert_eq!(build_filter(&config).max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn bad_directives_fall_back_to_level() {
        let config = LogConfig {
            level: LogLevel::Error,
            directives: Some("bd_core=loudest".to_string()),
            ..LogConfig::default()
        };
        assert_eq!(build_filter(&config).max_level_hint(), Some(LevelFilter::ERROR));
    }

    #[test]
    fn double_init_does_not_panic() {
        init_logging(&LogConfig::default());
        init_logging(&LogConfig {
            format: LogFormat::Jsonl,
            ..LogConfig::default()
        });
    }
}

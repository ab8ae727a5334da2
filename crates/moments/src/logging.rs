//! Logging initialization.
//!
//! Uses `tracing-subscriber` with either human-readable or JSON output.
//! Logs go to stderr; stdout is reserved for command output.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the logging subsystem.
///
/// `level` is used unless `RUST_LOG` is set.
pub fn init(level: &str, json_format: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(true),
            )
            .init();
    }
}

/// Initialize logging from config, with CLI flags taking precedence.
pub fn init_from_config(
    config: &moments_core::Config,
    verbose_override: bool,
    json_logs_override: bool,
) {
    let json_format = json_logs_override || config.logging.format == "json";
    init(effective_level(config, verbose_override), json_format);
}

/// `--verbose` raises the level to debug but never lowers a trace setting.
fn effective_level(config: &moments_core::Config, verbose: bool) -> &str {
    match config.logging.level.as_str() {
        "trace" => "trace",
        _ if verbose => "debug",
        level => level,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_raises_info_to_debug() {
        let config = moments_core::Config::default();
        assert_eq!(effective_level(&config, false), "info");
        assert_eq!(effective_level(&config, true), "debug");
    }

    #[test]
    fn verbose_keeps_trace() {
        let mut config = moments_core::Config::default();
        config.logging.level = "trace".to_string();
        assert_eq!(effective_level(&config, true), "trace");
    }
}

//! Logging setup using `tracing` + `tracing-subscriber`.
//!
//! Level priority:
//! 1. explicit level passed by the caller
//! 2. `GANTT_LOG` environment variable (e.g. "info", "debug")
//! 3. default to `info`
//!
//! The library only emits events; binaries decide whether to install a
//! subscriber.

use tracing::Level;
use tracing_subscriber::fmt;

use crate::error::{EngineError, Result};

/// Install the global subscriber, writing to stderr. Call once at startup.
pub fn init_logging(level: Option<Level>) -> Result<()> {
    let level = level
        .or_else(|| {
            std::env::var("GANTT_LOG")
                .ok()
                .and_then(|s| parse_level(&s))
        })
        .unwrap_or(Level::INFO);

    fmt()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| EngineError::Config(format!("failed to install logger: {}", e)))
}

pub fn parse_level(s: &str) -> Option<Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(Level::ERROR),
        "warn" | "warning" => Some(Level::WARN),
        "info" => Some(Level::INFO),
        "debug" => Some(Level::DEBUG),
        "trace" => Some(Level::TRACE),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_common_spellings() {
        assert_eq!(parse_level(" Debug "), Some(Level::DEBUG));
        assert_eq!(parse_level("warning"), Some(Level::WARN));
        assert_eq!(parse_level("loud"), None);
    }
}

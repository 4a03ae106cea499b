//! Structured logging setup.

use tracing::Level;

/// Parses a level name, falling back to `info` for anything unrecognised.
pub fn parse_level(level: &str) -> Level {
    level.parse().unwrap_or(Level::INFO)
}

/// Initialize tracing subscriber for logging.
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init_logging(level: &str) {
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_max_level(parse_level(level))
            .with_target(false)
            .finish(),
    )
    .ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), Level::DEBUG);
        assert_eq!(parse_level("WARN"), Level::WARN);
        assert_eq!(parse_level("loud"), Level::INFO);
    }

    #[test]
    fn test_init_logging_twice() {
        init_logging("debug");
        init_logging("error");
    }
}

use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

/// Level used when `RUST_LOG` is unset or unparseable.
const DEFAULT_FILTER: &str = "warn";

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, strum::Display)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
}

impl From<LogLevel> for log::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => log::Level::Trace,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Info => log::Level::Info,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Error => log::Level::Error,
        }
    }
}

impl LogLevel {
    /// The least severe level a filter lets through.
    ///
    /// `OFF` maps to `Error`; a filter without a static hint maps to `Trace`.
    pub fn threshold_of(filter: &EnvFilter) -> Self {
        match filter.max_level_hint() {
            None => LogLevel::Trace,
            Some(hint) if hint == LevelFilter::TRACE => LogLevel::Trace,
            Some(hint) if hint == LevelFilter::DEBUG => LogLevel::Debug,
            Some(hint) if hint == LevelFilter::INFO => LogLevel::Info,
            Some(hint) if hint == LevelFilter::WARN => LogLevel::Warn,
            Some(_) => LogLevel::Error,
        }
    }
}

/// `RUST_LOG` as an [`EnvFilter`], or `warn` when it is unset or invalid.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

pub fn should_log(event_level: LogLevel, threshold: LogLevel) -> bool {
    event_level >= threshold
}

pub fn should_log_with_env(event_level: LogLevel) -> bool {
    should_log(event_level, LogLevel::threshold_of(&env_filter()))
}

/// Installs a stderr `tracing` subscriber filtered by `RUST_LOG`.
///
/// `log` records reach it through the `tracing-log` bridge. Not used in TUI mode:
/// anything written to stderr would tear the alternate screen.
pub fn init_console_logger() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_of_filter() {
        let threshold = |directives: &str| LogLevel::threshold_of(&EnvFilter::new(directives));

        assert_eq!(threshold("debug"), LogLevel::Debug);
        assert_eq!(threshold("info"), LogLevel::Info);
        assert_eq!(threshold("warn"), LogLevel::Warn);
        assert_eq!(threshold("error"), LogLevel::Error);
        assert_eq!(threshold("trace"), LogLevel::Trace);
        assert_eq!(threshold("off"), LogLevel::Error);

        // The most verbose directive wins
        assert_eq!(threshold("goaway_dash=debug,hyper=info"), LogLevel::Debug);
    }

    #[test]
    fn test_should_log() {
        assert!(should_log(LogLevel::Error, LogLevel::Debug));
        assert!(should_log(LogLevel::Warn, LogLevel::Warn));
        assert!(!should_log(LogLevel::Debug, LogLevel::Error));
        assert!(!should_log(LogLevel::Info, LogLevel::Error));
    }

    #[test]
    fn test_level_conversion() {
        assert_eq!(log::Level::from(LogLevel::Trace), log::Level::Trace);
        assert_eq!(log::Level::from(LogLevel::Warn), log::Level::Warn);
    }
}

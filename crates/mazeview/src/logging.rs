use clap::ValueEnum;
use mazeview_frame::TOKEN_LOG_TARGET;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::prelude::*;

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_filter(self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

/// `level` for everything; rejected-token warnings follow `token_level`
/// when given. A noisy link can otherwise bury the frame diagnostics.
pub fn log_filter(level: LogLevel, token_level: Option<LogLevel>) -> Targets {
    let filter = Targets::new().with_default(level.as_filter());
    match token_level {
        Some(token_level) => filter.with_target(TOKEN_LOG_TARGET, token_level.as_filter()),
        None => filter,
    }
}

/// Diagnostics go to stderr so stdout carries only maps and status lines.
pub fn init_logging(format: LogFormat, level: LogLevel, token_level: Option<LogLevel>) {
    let filter = log_filter(level, token_level);
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false);

    let _ = match format {
        LogFormat::Text => tracing_subscriber::registry()
            .with(layer.with_filter(filter))
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(layer.json().with_filter(filter))
            .try_init(),
    };
}

#[cfg(test)]
mod tests {
    use tracing::Level;

    use super::*;

    #[test]
    fn token_warnings_follow_the_default_level() {
        let filter = log_filter(LogLevel::Warn, None);

        assert!(filter.would_enable(TOKEN_LOG_TARGET, &Level::WARN));
        assert!(filter.would_enable("mazeview::monitor", &Level::WARN));
        assert!(!filter.would_enable("mazeview::monitor", &Level::INFO));
    }

    #[test]
    fn token_warnings_can_be_silenced_alone() {
        let filter = log_filter(LogLevel::Info, Some(LogLevel::Error));

        assert!(!filter.would_enable(TOKEN_LOG_TARGET, &Level::WARN));
        assert!(filter.would_enable("mazeview_frame::parser", &Level::WARN));
        assert!(filter.would_enable("mazeview::monitor", &Level::INFO));
    }

    #[test]
    fn token_warnings_can_be_kept_under_a_quiet_default() {
        let filter = log_filter(LogLevel::Error, Some(LogLevel::Warn));

        assert!(filter.would_enable(TOKEN_LOG_TARGET, &Level::WARN));
        assert!(!filter.would_enable("mazeview_frame::collector", &Level::WARN));
    }
}

use std::fmt;
use tracing_subscriber::{EnvFilter, fmt as subscriber};

/// Verbosity requested through `--log.level`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Fatal,
    Panic,
}

impl LogLevel {
    /// Parses the level names accepted by Vela plugins. Unknown values fall
    /// back to `Info`.
    pub fn parse(value: &str) -> Self {
        match value {
            "t" | "trace" | "Trace" | "TRACE" => LogLevel::Trace,
            "d" | "debug" | "Debug" | "DEBUG" => LogLevel::Debug,
            "w" | "warn" | "Warn" | "WARN" => LogLevel::Warn,
            "e" | "error" | "Error" | "ERROR" => LogLevel::Error,
            "f" | "fatal" | "Fatal" | "FATAL" => LogLevel::Fatal,
            "p" | "panic" | "Panic" | "PANIC" => LogLevel::Panic,
            _ => LogLevel::Info,
        }
    }

    /// Directive for the tracing filter. `fatal` and `panic` have no tracing
    /// equivalent and only let errors through.
    pub fn directive(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error | LogLevel::Fatal | LogLevel::Panic => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Fatal => "fatal",
            LogLevel::Panic => "panic",
        };
        f.write_str(name)
    }
}

/// Initialize logging to stderr at the given level, keeping stdout free for
/// the summary table.
pub fn init_logging(level: LogLevel) {
    let filter = EnvFilter::new(level.directive());

    subscriber()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_spelling() {
        for value in ["t", "trace", "Trace", "TRACE"] {
            assert_eq!(LogLevel::parse(value), LogLevel::Trace);
        }
        for value in ["e", "error", "Error", "ERROR"] {
            assert_eq!(LogLevel::parse(value), LogLevel::Error);
        }
        assert_eq!(LogLevel::parse("p"), LogLevel::Panic);
        assert_eq!(LogLevel::parse("i"), LogLevel::Info);
    }

    #[test]
    fn unknown_levels_default_to_info() {
        assert_eq!(LogLevel::parse("verbose"), LogLevel::Info);
        assert_eq!(LogLevel::parse("tRaCe"), LogLevel::Info);
        assert_eq!(LogLevel::parse(""), LogLevel::Info);
    }

    #[test]
    fn severe_levels_filter_to_errors() {
        assert_eq!(LogLevel::Fatal.directive(), "error");
        assert_eq!(LogLevel::Panic.directive(), "error");
        assert_eq!(LogLevel::Warn.directive(), "warn");
    }
}

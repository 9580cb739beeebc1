//! Logging configuration from CLI flags and environment variables

use std::env::VarError;
use std::path::PathBuf;

use super::level::LogLevel;

/// Resolved logging settings for one CLI invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Verbosity requested by flags or environment
    pub level: LogLevel,
    /// Suppress everything except errors
    pub quiet: bool,
    /// Append plain log lines to this file as well
    pub log_file: Option<PathBuf>,
    /// Colored terminal output
    pub color: bool,
}

impl LogConfig {
    /// Build the configuration from CLI flags and the process environment
    ///
    /// `SODSCAN_VERBOSE`, `SODSCAN_DEBUG` and `SODSCAN_TRACE` raise the level
    /// the same way the flags do. `NO_COLOR` disables colors.
    pub fn from_args_and_env(
        verbose: bool,
        debug: bool,
        trace: bool,
        quiet: bool,
        log_file: Option<PathBuf>,
    ) -> Self {
        Self::from_args_and_reader(verbose, debug, trace, quiet, log_file, |key| {
            std::env::var(key)
        })
    }

    /// Same as [`LogConfig::from_args_and_env`] with a custom variable reader
    pub fn from_args_and_reader<F>(
        verbose: bool,
        debug: bool,
        trace: bool,
        quiet: bool,
        log_file: Option<PathBuf>,
        reader: F,
    ) -> Self
    where
        F: Fn(&str) -> Result<String, VarError>,
    {
        let flag = |key: &str| reader(key).map(|v| is_truthy(&v)).unwrap_or(false);

        let level = LogLevel::from_flags(
            verbose || flag("SODSCAN_VERBOSE"),
            debug || flag("SODSCAN_DEBUG"),
            trace || flag("SODSCAN_TRACE"),
        );

        Self {
            level,
            quiet,
            log_file,
            color: reader("NO_COLOR").is_err(),
        }
    }

    /// Check if verbose output is enabled
    pub fn is_verbose(&self) -> bool {
        self.should_log(LogLevel::Verbose)
    }

    /// Check if debug output is enabled
    pub fn is_debug(&self) -> bool {
        self.should_log(LogLevel::Debug)
    }

    /// Check if trace output is enabled
    pub fn is_trace(&self) -> bool {
        self.should_log(LogLevel::Trace)
    }

    /// Whether messages at `level` are emitted
    pub fn should_log(&self, level: LogLevel) -> bool {
        !self.quiet && self.level >= level
    }

    /// `EnvFilter` directive used when `RUST_LOG` is not set
    pub fn directive(&self) -> String {
        if self.quiet {
            "error".to_string()
        } else {
            self.level.directive()
        }
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn make_reader(vars: HashMap<&str, &str>) -> impl Fn(&str) -> Result<String, VarError> {
        let owned: HashMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| owned.get(key).cloned().ok_or(VarError::NotPresent)
    }

    fn from_flags(verbose: bool, debug: bool, trace: bool, quiet: bool) -> LogConfig {
        LogConfig::from_args_and_reader(
            verbose,
            debug,
            trace,
            quiet,
            None,
            make_reader(HashMap::new()),
        )
    }

    #[test]
    fn test_flags_select_level() {
        assert_eq!(from_flags(false, false, false, false).level, LogLevel::Normal);
        assert_eq!(from_flags(true, false, false, false).level, LogLevel::Verbose);
        assert_eq!(from_flags(false, true, false, false).level, LogLevel::Debug);
        assert_eq!(from_flags(false, false, true, false).level, LogLevel::Trace);
    }

    #[test]
    fn test_env_raises_level() {
        let config = LogConfig::from_args_and_reader(
            false,
            false,
            false,
            false,
            None,
            make_reader(HashMap::from([("SODSCAN_DEBUG", "1")])),
        );
        assert_eq!(config.level, LogLevel::Debug);
    }

    #[test]
    fn test_env_false_values_are_ignored() {
        let config = LogConfig::from_args_and_reader(
            false,
            false,
            false,
            false,
            None,
            make_reader(HashMap::from([("SODSCAN_VERBOSE", "0"), ("SODSCAN_TRACE", "no")])),
        );
        assert_eq!(config.level, LogLevel::Normal);
    }

    #[test]
    fn test_quiet_overrides_everything() {
        let config = from_flags(true, true, true, true);
        assert!(!config.is_verbose());
        assert!(!config.is_debug());
        assert!(!config.is_trace());
        assert!(!config.should_log(LogLevel::Verbose));
        assert_eq!(config.directive(), "error");
    }

    #[test]
    fn test_should_log_at_correct_levels() {
        let config = from_flags(true, false, false, false);
        assert!(config.should_log(LogLevel::Normal));
        assert!(config.should_log(LogLevel::Verbose));
        assert!(!config.should_log(LogLevel::Debug));
    }

    #[test]
    fn test_no_color() {
        let config = LogConfig::from_args_and_reader(
            false,
            false,
            false,
            false,
            None,
            make_reader(HashMap::from([("NO_COLOR", "1")])),
        );
        assert!(!config.color);
        assert!(from_flags(false, false, false, false).color);
    }
}

//! Verbosity levels for CLI diagnostics
//!
//! Levels are cumulative: Debug includes Verbose, Trace includes Debug.
//! Each level maps to a `tracing` filter directive for the sodscan crates.

use std::fmt;

/// Crates whose events follow the selected level; everything else stays at `warn`.
const OWN_TARGETS: [&str; 2] = ["sodscan_engine", "sodscan_cli"];

/// Verbosity level for CLI diagnostics
///
/// Levels are ordered: Normal < Verbose < Debug < Trace
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogLevel {
    /// Warnings and errors only (default)
    #[default]
    Normal = 0,
    /// Phase summaries: rows read, pairs indexed, violations found
    Verbose = 1,
    /// Every skipped row with its reason
    Debug = 2,
    /// Everything, including third-party crates
    Trace = 3,
}

impl LogLevel {
    /// Create LogLevel from CLI flags
    ///
    /// Order of precedence: trace > debug > verbose > normal
    pub fn from_flags(verbose: bool, debug: bool, trace: bool) -> Self {
        if trace {
            Self::Trace
        } else if debug {
            Self::Debug
        } else if verbose {
            Self::Verbose
        } else {
            Self::Normal
        }
    }

    /// Check if this level enables verbose output
    pub fn is_verbose(&self) -> bool {
        *self >= Self::Verbose
    }

    /// Check if this level enables debug output
    pub fn is_debug(&self) -> bool {
        *self >= Self::Debug
    }

    /// Check if this level enables trace output
    pub fn is_trace(&self) -> bool {
        *self >= Self::Trace
    }

    /// Get the display name for this level
    pub fn name(&self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Verbose => "VERBOSE",
            Self::Debug => "DEBUG",
            Self::Trace => "TRACE",
        }
    }

    /// `EnvFilter` directive for this level
    pub fn directive(&self) -> String {
        let own = match self {
            Self::Normal => return "warn".to_string(),
            Self::Verbose => "info",
            Self::Debug => "debug",
            Self::Trace => return "trace".to_string(),
        };
        let mut directive = String::from("warn");
        for target in OWN_TARGETS {
            directive.push_str(&format!(",{target}={own}"));
        }
        directive
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Normal < LogLevel::Verbose);
        assert!(LogLevel::Verbose < LogLevel::Debug);
        assert!(LogLevel::Debug < LogLevel::Trace);
    }

    #[test]
    fn test_log_level_from_flags() {
        assert_eq!(LogLevel::from_flags(false, false, false), LogLevel::Normal);
        assert_eq!(LogLevel::from_flags(true, false, false), LogLevel::Verbose);
        assert_eq!(LogLevel::from_flags(false, true, false), LogLevel::Debug);
        assert_eq!(LogLevel::from_flags(false, false, true), LogLevel::Trace);
    }

    #[test]
    fn test_log_level_from_flags_highest_wins() {
        assert_eq!(LogLevel::from_flags(true, true, true), LogLevel::Trace);
        assert_eq!(LogLevel::from_flags(true, true, false), LogLevel::Debug);
    }

    #[test]
    fn test_cumulative_checks() {
        assert!(!LogLevel::Normal.is_verbose());
        assert!(LogLevel::Debug.is_verbose());
        assert!(!LogLevel::Verbose.is_debug());
        assert!(LogLevel::Trace.is_debug());
        assert!(!LogLevel::Debug.is_trace());
    }

    #[test]
    fn test_directives() {
        assert_eq!(LogLevel::Normal.directive(), "warn");
        assert_eq!(
            LogLevel::Verbose.directive(),
            "warn,sodscan_engine=info,sodscan_cli=info"
        );
        assert_eq!(
            LogLevel::Debug.directive(),
            "warn,sodscan_engine=debug,sodscan_cli=debug"
        );
        assert_eq!(LogLevel::Trace.directive(), "trace");
    }

    #[test]
    fn test_log_level_display() {
        assert_eq!(format!("{}", LogLevel::Normal), "NORMAL");
        assert_eq!(format!("{}", LogLevel::Trace), "TRACE");
    }
}

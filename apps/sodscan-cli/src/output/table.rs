//! Table display helpers for CLI commands

use crate::error::{CliError, CliResult};

/// Largest ranking length accepted by `--top`
pub const MAX_TOP_N: usize = 1000;

/// Truncate a string for table display, handling Unicode safely.
///
/// If the string exceeds `max_len` characters, it is truncated with "..."
/// appended.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{truncated}...")
    }
}

/// Validate the ranking length: between 1 and [`MAX_TOP_N`] inclusive.
pub fn validate_top_n(top_n: usize) -> CliResult<()> {
    if !(1..=MAX_TOP_N).contains(&top_n) {
        return Err(CliError::Validation(format!(
            "Top N must be between 1 and {MAX_TOP_N}."
        )));
    }
    Ok(())
}

/// Parse a comma-separated string into a list, filtering empty entries.
pub fn parse_comma_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_string() {
        assert_eq!(truncate("Z_BUYER", 10), "Z_BUYER");
    }

    #[test]
    fn test_truncate_long_string() {
        let result = truncate("Z_FINANCE_ACCOUNTS_PAYABLE_CLERK", 12);
        assert_eq!(result, "Z_FINANCE...");
    }

    #[test]
    fn test_truncate_unicode() {
        let result = truncate("JÜRGEN.MÜLLER.EXTERN", 10);
        assert_eq!(result.chars().count(), 10);
        assert!(result.ends_with("..."));
    }

    #[test]
    fn test_validate_top_n() {
        assert!(validate_top_n(1).is_ok());
        assert!(validate_top_n(10).is_ok());
        assert!(validate_top_n(MAX_TOP_N).is_ok());
        assert!(validate_top_n(0).is_err());
        assert!(validate_top_n(MAX_TOP_N + 1).is_err());
    }

    #[test]
    fn test_parse_comma_list() {
        assert_eq!(parse_comma_list("NULL, N/A"), vec!["NULL", "N/A"]);
        assert_eq!(parse_comma_list("a,,b, ,c"), vec!["a", "b", "c"]);
    }
}

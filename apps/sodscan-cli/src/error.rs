//! CLI error types and exit codes

use sodscan_engine::EngineError;
use thiserror::Error;

/// Exit codes for the CLI
/// - 0: Success (with or without violations)
/// - 1: General error (I/O, configuration, output)
/// - 4: Validation error (table schema, bad arguments)
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Invalid input table: {0}")]
    Schema(#[from] EngineError),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Could not read {path}: {message}")]
    Input { path: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Failed to write report: {0}")]
    Output(String),
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Schema(_) | CliError::Validation(_) => 4,
            CliError::Input { .. } => 1,
            CliError::Config(_) => 1,
            CliError::Io(_) => 1,
            CliError::Output(_) => 1,
        }
    }

    /// Print the error to stderr with appropriate formatting
    pub fn print(&self) {
        let use_color = std::env::var("NO_COLOR").is_err();

        if use_color {
            eprintln!("\x1b[31mError:\x1b[0m {}", self);
        } else {
            eprintln!("Error: {}", self);
        }

        if let Some(suggestion) = self.suggestion() {
            if use_color {
                eprintln!("\n\x1b[33mSuggestion:\x1b[0m {}", suggestion);
            } else {
                eprintln!("\nSuggestion: {}", suggestion);
            }
        }
    }

    /// Get a suggested action for this error
    fn suggestion(&self) -> Option<&'static str> {
        match self {
            CliError::Schema(EngineError::Schema { .. }) => Some(
                "Check the header row. Rule books need TCODE1, TCODE2, ASK_RISK; access tables need USER NAME, ROLE, AUTHORIZATION VALUE.",
            ),
            CliError::Schema(EngineError::EmptyTable { .. }) => {
                Some("The file is empty. Export the sheet again with its header row.")
            }
            CliError::Input { .. } => Some("Check that the path exists and is a CSV file."),
            CliError::Config(_) => Some(
                "Check config.json in the sodscan config directory and the SODSCAN_* environment variables.",
            ),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Output(format!("JSON error: {}", e))
    }
}

impl From<csv::Error> for CliError {
    fn from(e: csv::Error) -> Self {
        CliError::Output(format!("CSV error: {}", e))
    }
}

//! Input tables and report files
//!
//! - CSV input: rule book and user access exports, read into engine tables
//! - CSV output: violation reports with the legacy column layout
//! - JSON output: the full analysis report, pretty-printed

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub mod csv;
pub mod json;

/// How the analyze command presents its results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable tables on stdout (default)
    #[default]
    Table,
    /// JSON report on stdout, JSON files in the output directory
    Json,
    /// CSV on stdout, CSV files in the output directory
    Csv,
}

impl OutputFormat {
    /// File extension used for report files
    pub fn extension(&self) -> &'static str {
        match self {
            // Table output still exports CSV files
            OutputFormat::Table | OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

/// Which violation level a report file holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    /// Per user and role
    UserLevel,
    /// Per role, across all holders
    RoleLevel,
}

impl ReportKind {
    fn stem(&self) -> &'static str {
        match self {
            ReportKind::UserLevel => "user_level_violations",
            ReportKind::RoleLevel => "role_level_violations",
        }
    }
}

/// Report file name, e.g. `user_level_violations_20240131.csv`
pub fn report_file_name(kind: ReportKind, date: chrono::NaiveDate, format: OutputFormat) -> String {
    format!(
        "{}_{}.{}",
        kind.stem(),
        date.format("%Y%m%d"),
        format.extension()
    )
}

/// Report file path inside `dir`
pub fn report_path(
    dir: &Path,
    kind: ReportKind,
    date: chrono::NaiveDate,
    format: OutputFormat,
) -> PathBuf {
    dir.join(report_file_name(kind, date, format))
}

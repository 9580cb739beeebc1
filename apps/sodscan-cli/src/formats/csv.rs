//! CSV input tables and violation reports
//!
//! Input files are exports of the rule book and the user access sheet. The
//! header row is kept as-is; the engine matches it case- and
//! whitespace-insensitively. Report files use the legacy column layout:
//! - User level: USER_NAME, ROLE, TCODE_1, TCODE_2, RISK_FACTOR
//! - Role level: ROLE, TCODE_1, TCODE_2, RISK_FACTOR

use crate::error::{CliError, CliResult};
use serde::Serialize;
use sodscan_engine::{RawTable, RoleViolation, TableKind, UserViolation};
use std::io::{Read, Write};
use std::path::Path;
use tracing::debug;

/// Header row of user-level report files
pub const USER_LEVEL_HEADERS: [&str; 5] = ["USER_NAME", "ROLE", "TCODE_1", "TCODE_2", "RISK_FACTOR"];

/// Header row of role-level report files
pub const ROLE_LEVEL_HEADERS: [&str; 4] = ["ROLE", "TCODE_1", "TCODE_2", "RISK_FACTOR"];

/// One user-level violation in report layout
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UserViolationRecord<'a> {
    #[serde(rename = "USER_NAME")]
    pub user: &'a str,
    #[serde(rename = "ROLE")]
    pub role: &'a str,
    #[serde(rename = "TCODE_1")]
    pub code_1: &'a str,
    #[serde(rename = "TCODE_2")]
    pub code_2: &'a str,
    #[serde(rename = "RISK_FACTOR")]
    pub risk_factor: &'a str,
}

impl<'a> From<&'a UserViolation> for UserViolationRecord<'a> {
    fn from(v: &'a UserViolation) -> Self {
        Self {
            user: v.user.as_str(),
            role: v.role.as_str(),
            code_1: v.code_low.as_str(),
            code_2: v.code_high.as_str(),
            risk_factor: v.severity.as_str(),
        }
    }
}

/// One role-level violation in report layout
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RoleViolationRecord<'a> {
    #[serde(rename = "ROLE")]
    pub role: &'a str,
    #[serde(rename = "TCODE_1")]
    pub code_1: &'a str,
    #[serde(rename = "TCODE_2")]
    pub code_2: &'a str,
    #[serde(rename = "RISK_FACTOR")]
    pub risk_factor: &'a str,
}

impl<'a> From<&'a RoleViolation> for RoleViolationRecord<'a> {
    fn from(v: &'a RoleViolation) -> Self {
        Self {
            role: v.role.as_str(),
            code_1: v.code_low.as_str(),
            code_2: v.code_high.as_str(),
            risk_factor: v.severity.as_str(),
        }
    }
}

/// Read an input table from a CSV file
pub fn read_table(path: &Path, kind: TableKind) -> CliResult<RawTable> {
    let file = std::fs::File::open(path).map_err(|e| CliError::Input {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    let table = read_table_from(file, kind, &path.display().to_string())?;
    debug!(path = %path.display(), table = %kind, rows = table.len(), "Read input table");
    Ok(table)
}

/// Read an input table from any reader
///
/// `source` names the input in error messages. Rows may have fewer or more
/// cells than the header; blank cells become empty.
pub fn read_table_from<R: Read>(reader: R, kind: TableKind, source: &str) -> CliResult<RawTable> {
    let input_error = |e: csv::Error| CliError::Input {
        path: source.to_string(),
        message: e.to_string(),
    };

    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()
        .map_err(input_error)?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    // A blank header row is the same as none
    let headers = if headers.iter().all(|h| h.trim().is_empty()) {
        Vec::new()
    } else {
        headers
    };

    let mut table = RawTable::new(kind, headers);
    for record in rdr.records() {
        let record = record.map_err(input_error)?;
        let cells = record
            .iter()
            .map(|cell| {
                if cell.trim().is_empty() {
                    None
                } else {
                    Some(cell.to_string())
                }
            })
            .collect();
        table.push_row(cells);
    }

    Ok(table)
}

/// Write user-level violations as CSV
pub fn write_user_violations<W: Write>(violations: &[UserViolation], writer: W) -> CliResult<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(USER_LEVEL_HEADERS)?;

    for violation in violations {
        wtr.serialize(UserViolationRecord::from(violation))?;
    }

    wtr.flush()
        .map_err(|e| CliError::Io(format!("Failed to flush CSV: {}", e)))?;
    Ok(())
}

/// Write role-level violations as CSV
pub fn write_role_violations<W: Write>(violations: &[RoleViolation], writer: W) -> CliResult<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(ROLE_LEVEL_HEADERS)?;

    for violation in violations {
        wtr.serialize(RoleViolationRecord::from(violation))?;
    }

    wtr.flush()
        .map_err(|e| CliError::Io(format!("Failed to flush CSV: {}", e)))?;
    Ok(())
}

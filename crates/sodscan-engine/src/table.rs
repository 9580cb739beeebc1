//! Header-aware extraction of typed rows from parsed tables.
//!
//! A [`RawTable`] is whatever a reader produced: a header row and a grid of
//! optional cells. Extraction matches headers after trimming, collapsing
//! inner whitespace and uppercasing, and fails with
//! [`EngineError::Schema`] when a required column is absent.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::access::AccessRow;
use crate::error::{EngineError, Result};
use crate::rules::RuleRow;

/// Required column names, in normalized form.
pub mod columns {
    /// First code of a conflict pair.
    pub const TCODE1: &str = "TCODE1";
    /// Second code of a conflict pair.
    pub const TCODE2: &str = "TCODE2";
    /// Risk label of a conflict pair.
    pub const ASK_RISK: &str = "ASK_RISK";
    /// User account name.
    pub const USER_NAME: &str = "USER NAME";
    /// Role name.
    pub const ROLE: &str = "ROLE";
    /// Granted authorization code.
    pub const AUTHORIZATION_VALUE: &str = "AUTHORIZATION VALUE";

    /// Columns of the rule book.
    pub const RULE_BOOK: [&str; 3] = [TCODE1, TCODE2, ASK_RISK];
    /// Columns of the user access table.
    pub const USER_ACCESS: [&str; 3] = [USER_NAME, ROLE, AUTHORIZATION_VALUE];
}

/// Which input table a [`RawTable`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    /// Ground-truth conflict pairs.
    RuleBook,
    /// User, role and authorization code assignments.
    UserAccess,
}

impl TableKind {
    /// Columns this table must provide.
    pub fn required_columns(self) -> [&'static str; 3] {
        match self {
            Self::RuleBook => columns::RULE_BOOK,
            Self::UserAccess => columns::USER_ACCESS,
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RuleBook => write!(f, "rule book"),
            Self::UserAccess => write!(f, "user access"),
        }
    }
}

/// A parsed table: a header row plus rows of optional cells.
///
/// Rows shorter than the header are padded with empty cells on read; extra
/// cells are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    kind: TableKind,
    headers: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    /// Create an empty table with the given header row.
    pub fn new<I, S>(kind: TableKind, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind,
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row of cells.
    pub fn push_row(&mut self, cells: Vec<Option<String>>) {
        self.rows.push(cells);
    }

    /// Which input this table holds.
    pub fn kind(&self) -> TableKind {
        self.kind
    }

    /// The raw header row.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Positions of the required columns, in `required_columns()` order.
    ///
    /// When a header appears more than once the first occurrence wins.
    pub fn resolve_columns(&self) -> Result<[usize; 3]> {
        if self.headers.is_empty() {
            return Err(EngineError::EmptyTable { table: self.kind });
        }

        let mut positions: HashMap<String, usize> = HashMap::new();
        for (idx, header) in self.headers.iter().enumerate() {
            positions.entry(normalize_header(header)).or_insert(idx);
        }

        let required = self.kind.required_columns();
        let missing: Vec<String> = required
            .iter()
            .filter(|column| !positions.contains_key(**column))
            .map(|column| (*column).to_string())
            .collect();
        if !missing.is_empty() {
            return Err(EngineError::Schema {
                table: self.kind,
                missing,
            });
        }

        Ok(required.map(|column| positions[column]))
    }

    fn cell(row: &[Option<String>], idx: usize) -> Option<String> {
        row.get(idx).cloned().flatten()
    }

    /// Extract rule book rows.
    pub fn rule_rows(&self) -> Result<Vec<RuleRow>> {
        let [code1, code2, severity] = self.resolve_columns()?;
        Ok(self
            .rows
            .iter()
            .map(|row| RuleRow {
                code1: Self::cell(row, code1),
                code2: Self::cell(row, code2),
                severity: Self::cell(row, severity),
            })
            .collect())
    }

    /// Extract user access rows.
    pub fn access_rows(&self) -> Result<Vec<AccessRow>> {
        let [user, role, code] = self.resolve_columns()?;
        Ok(self
            .rows
            .iter()
            .map(|row| AccessRow {
                user: Self::cell(row, user),
                role: Self::cell(row, role),
                code: Self::cell(row, code),
            })
            .collect())
    }
}

/// Normalize a header: trim, collapse inner whitespace, uppercase.
pub fn normalize_header(header: &str) -> String {
    header
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(values: &[&str]) -> Vec<Option<String>> {
        values
            .iter()
            .map(|v| if v.is_empty() { None } else { Some((*v).to_string()) })
            .collect()
    }

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("  user   name "), "USER NAME");
        assert_eq!(normalize_header("Ask_Risk"), "ASK_RISK");
        assert_eq!(normalize_header("\tAuthorization\u{a0}Value"), "AUTHORIZATION VALUE");
    }

    #[test]
    fn test_rule_rows_follow_header_positions() {
        let mut table = RawTable::new(TableKind::RuleBook, ["ask_risk", " TCode2", "tcode1 "]);
        table.push_row(cells(&["High", "F110", "FB60"]));

        let rows = table.rule_rows().unwrap();
        assert_eq!(rows, vec![RuleRow::new("FB60", "F110", "High")]);
    }

    #[test]
    fn test_missing_column_is_schema_error() {
        let table = RawTable::new(TableKind::RuleBook, ["TCODE1", "RISK"]);
        let err = table.rule_rows().unwrap_err();
        assert_eq!(
            err,
            EngineError::Schema {
                table: TableKind::RuleBook,
                missing: vec!["TCODE2".to_string(), "ASK_RISK".to_string()],
            }
        );
    }

    #[test]
    fn test_empty_header_is_error() {
        let table = RawTable::new(TableKind::UserAccess, Vec::<String>::new());
        assert_eq!(
            table.access_rows().unwrap_err(),
            EngineError::EmptyTable {
                table: TableKind::UserAccess
            }
        );
    }

    #[test]
    fn test_short_rows_are_padded() {
        let mut table =
            RawTable::new(TableKind::UserAccess, ["USER NAME", "ROLE", "AUTHORIZATION VALUE"]);
        table.push_row(cells(&["alice", "R1"]));

        let rows = table.access_rows().unwrap();
        assert_eq!(rows[0].user.as_deref(), Some("alice"));
        assert_eq!(rows[0].role.as_deref(), Some("R1"));
        assert_eq!(rows[0].code, None);
    }

    #[test]
    fn test_duplicate_headers_use_first() {
        let mut table = RawTable::new(
            TableKind::UserAccess,
            ["ROLE", "USER NAME", "role", "AUTHORIZATION VALUE"],
        );
        table.push_row(cells(&["R1", "alice", "R9", "TX1"]));

        let rows = table.access_rows().unwrap();
        assert_eq!(rows[0].role.as_deref(), Some("R1"));
    }

    #[test]
    fn test_extra_columns_are_ignored() {
        let mut table = RawTable::new(
            TableKind::UserAccess,
            ["DEPARTMENT", "USER NAME", "ROLE", "AUTHORIZATION VALUE", "VALID TO"],
        );
        table.push_row(cells(&["Finance", "bob", "R2", "TX1", "9999-12-31"]));

        let rows = table.access_rows().unwrap();
        assert_eq!(rows, vec![AccessRow::new("bob", "R2", "TX1")]);
        assert_eq!(table.len(), 1);
    }
}

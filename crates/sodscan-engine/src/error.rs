//! Error types for the conflict matching engine.
//!
//! Only table-level failures are errors. Row-level problems (missing
//! fields, self-pairs, duplicate rules) are recovered locally and reported
//! through [`crate::rules::RowIssue`] counters instead.

use thiserror::Error;

use crate::table::TableKind;

/// Errors that abort an analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A required column is absent from an input table.
    #[error("{table} table is missing required column(s): {}", missing.join(", "))]
    Schema {
        /// The table that failed validation.
        table: TableKind,
        /// Normalized names of the absent columns.
        missing: Vec<String>,
    },

    /// An input table has no header row at all.
    #[error("{table} table has no header row")]
    EmptyTable {
        /// The table that failed validation.
        table: TableKind,
    },
}

impl EngineError {
    /// The table this error refers to.
    #[must_use]
    pub fn table(&self) -> TableKind {
        match self {
            Self::Schema { table, .. } | Self::EmptyTable { table } => *table,
        }
    }
}

/// Convenience Result type for the engine.
pub type Result<T> = std::result::Result<T, EngineError>;

//! Segregation-of-Duties (`SoD`) conflict matching.
//!
//! This crate finds every user and every role that holds both halves of a
//! forbidden pair of authorization codes. It works on already-parsed rows
//! and never touches the filesystem.
//!
//! # Pipeline
//!
//! - [`Canonicalizer`] trims and uppercases raw cells and drops placeholders
//! - [`ConflictRuleIndex`] deduplicates rule book rows into unordered pairs
//! - [`AccessGraph`] groups codes per `(user, role)` and per role
//! - [`ViolationDetector`] enumerates code pairs and looks them up
//! - [`analyze`] runs all of the above and returns an [`AnalysisReport`]
//!
//! # Example
//!
//! ```
//! use sodscan_engine::{analyze, AccessRow, RuleRow};
//!
//! let rules = vec![RuleRow::new("TX1", "TX2", "High")];
//! let access = vec![
//!     AccessRow::new("Alice", "R1", "TX1"),
//!     AccessRow::new("Alice", "R1", "TX2"),
//!     AccessRow::new("Bob", "R2", "TX1"),
//! ];
//!
//! let report = analyze(&rules, &access);
//! assert_eq!(report.user_violations.len(), 1);
//! assert_eq!(report.summary.users, 2);
//! ```

pub mod access;
pub mod analysis;
pub mod canonical;
pub mod detector;
pub mod error;
pub mod rules;
pub mod table;
pub mod types;

// Re-export commonly used types
pub use access::{AccessBuildStats, AccessGraph, AccessRow, RoleProfile, UserRoleGrant};
pub use analysis::{
    analyze, analyze_tables, analyze_with, AnalysisOptions, AnalysisReport, EntityCount,
    SeverityCount, Summary,
};
pub use canonical::{Canonicalizer, NO_VALUE_MARKER};
pub use detector::{Conflict, DetectionStrategy, RoleViolation, UserViolation, ViolationDetector};
pub use error::{EngineError, Result};
pub use rules::{ConflictRule, ConflictRuleIndex, RowIssue, RuleBuildStats, RuleRow};
pub use table::{columns, normalize_header, RawTable, TableKind};
pub use types::{AuthCode, CodePair, RoleName, Severity, UserName};

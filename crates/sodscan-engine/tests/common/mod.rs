//! Common test utilities for sodscan-engine integration tests.
//!
//! Tables are built in memory the same way the CLI builds them from CSV, so
//! these tests exercise header resolution as well as detection.

#![allow(dead_code)]

pub mod fixtures;

use sodscan_engine::{
    AnalysisOptions, AnalysisReport, DetectionStrategy, RawTable, RoleViolation, TableKind,
    UserViolation,
};

/// Build a rule book table with the canonical headers.
pub fn rule_table(rows: &[(&str, &str, &str)]) -> RawTable {
    let mut table = RawTable::new(TableKind::RuleBook, ["TCODE1", "TCODE2", "ASK_RISK"]);
    for (code1, code2, risk) in rows {
        table.push_row(vec![cell(code1), cell(code2), cell(risk)]);
    }
    table
}

/// Build a user access table with the canonical headers.
pub fn access_table(rows: &[(&str, &str, &str)]) -> RawTable {
    let mut table =
        RawTable::new(TableKind::UserAccess, ["USER NAME", "ROLE", "AUTHORIZATION VALUE"]);
    for (user, role, code) in rows {
        table.push_row(vec![cell(user), cell(role), cell(code)]);
    }
    table
}

/// An empty string stands for an empty cell.
pub fn cell(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Run an analysis over in-memory tables with one strategy.
pub fn run(rules: &RawTable, access: &RawTable, strategy: DetectionStrategy) -> AnalysisReport {
    let options = AnalysisOptions::new().with_strategy(strategy);
    sodscan_engine::analyze_tables(rules, access, &options).expect("tables should be valid")
}

/// User violations as `(user, role, low, high, severity)` tuples.
pub fn user_tuples(violations: &[UserViolation]) -> Vec<(String, String, String, String, String)> {
    violations
        .iter()
        .map(|v| {
            (
                v.user.to_string(),
                v.role.to_string(),
                v.code_low.to_string(),
                v.code_high.to_string(),
                v.severity.to_string(),
            )
        })
        .collect()
}

/// Role violations as `(role, low, high, severity)` tuples.
pub fn role_tuples(violations: &[RoleViolation]) -> Vec<(String, String, String, String)> {
    violations
        .iter()
        .map(|v| {
            (
                v.role.to_string(),
                v.code_low.to_string(),
                v.code_high.to_string(),
                v.severity.to_string(),
            )
        })
        .collect()
}

/// Owned tuple helper for assertions.
pub fn user_row(
    user: &str,
    role: &str,
    low: &str,
    high: &str,
    severity: &str,
) -> (String, String, String, String, String) {
    (
        user.to_string(),
        role.to_string(),
        low.to_string(),
        high.to_string(),
        severity.to_string(),
    )
}

/// Owned tuple helper for assertions.
pub fn role_row(role: &str, low: &str, high: &str, severity: &str) -> (String, String, String, String) {
    (
        role.to_string(),
        low.to_string(),
        high.to_string(),
        severity.to_string(),
    )
}

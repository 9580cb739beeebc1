//! One-shot analysis: rule rows and access rows in, a report out.
//!
//! Every call builds a fresh index and graph. Nothing is retained between
//! calls, so callers decide what to cache.

use std::collections::HashMap;

use serde::Serialize;
use tracing::info;

use crate::access::{AccessBuildStats, AccessGraph, AccessRow};
use crate::canonical::Canonicalizer;
use crate::detector::{DetectionStrategy, RoleViolation, UserViolation, ViolationDetector};
use crate::error::Result;
use crate::rules::{ConflictRuleIndex, RuleBuildStats, RuleRow};
use crate::table::RawTable;

// ============================================================================
// Options
// ============================================================================

/// Knobs for a single analysis run.
#[derive(Debug, Clone, Default)]
pub struct AnalysisOptions {
    /// Field normalization, including extra missing-value markers.
    pub canonicalizer: Canonicalizer,
    /// Pair enumeration strategy.
    pub strategy: DetectionStrategy,
}

impl AnalysisOptions {
    /// Options with the default canonicalizer and strategy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific canonicalizer.
    #[must_use]
    pub fn with_canonicalizer(mut self, canonicalizer: Canonicalizer) -> Self {
        self.canonicalizer = canonicalizer;
        self
    }

    /// Use a specific detection strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: DetectionStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}

// ============================================================================
// Report
// ============================================================================

/// Headline counts of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Distinct conflict pairs after dedup.
    pub conflict_pairs: usize,
    /// Distinct users in the access table.
    pub users: usize,
    /// Distinct roles in the access table.
    pub roles: usize,
    /// User-level violation records.
    pub user_violations: usize,
    /// Role-level violation records.
    pub role_violations: usize,
}

/// Number of violations carrying one severity label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeverityCount {
    pub severity: String,
    pub count: usize,
}

/// Number of violations attributed to one user or role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityCount {
    pub name: String,
    pub count: usize,
}

/// Everything a run produces.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnalysisReport {
    pub summary: Summary,
    pub user_violations: Vec<UserViolation>,
    pub role_violations: Vec<RoleViolation>,
    pub rule_stats: RuleBuildStats,
    pub access_stats: AccessBuildStats,
}

impl AnalysisReport {
    /// Whether any violation was found at either level.
    pub fn has_violations(&self) -> bool {
        !self.user_violations.is_empty() || !self.role_violations.is_empty()
    }

    /// User-level violations per severity label, most frequent first.
    pub fn severity_distribution(&self) -> Vec<SeverityCount> {
        severities(tally(self.user_violations.iter().map(|v| v.severity.as_str())))
    }

    /// Role-level violations per severity label, most frequent first.
    pub fn role_severity_distribution(&self) -> Vec<SeverityCount> {
        severities(tally(self.role_violations.iter().map(|v| v.severity.as_str())))
    }

    /// Users with the most user-level violations.
    pub fn top_users(&self, n: usize) -> Vec<EntityCount> {
        let counts = tally(self.user_violations.iter().map(|v| v.user.as_str()));
        entities(ranked(counts, n))
    }

    /// Roles with the most role-level violations.
    pub fn top_roles(&self, n: usize) -> Vec<EntityCount> {
        let counts = tally(self.role_violations.iter().map(|v| v.role.as_str()));
        entities(ranked(counts, n))
    }
}

fn tally<'a>(labels: impl Iterator<Item = &'a str>) -> HashMap<&'a str, usize> {
    let mut counts = HashMap::new();
    for label in labels {
        *counts.entry(label).or_insert(0) += 1;
    }
    counts
}

/// Sort by count descending, then label ascending, and keep the first `n`.
fn ranked(counts: HashMap<&str, usize>, n: usize) -> Vec<(String, usize)> {
    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked
        .into_iter()
        .take(n)
        .map(|(label, count)| (label.to_string(), count))
        .collect()
}

fn severities(counts: HashMap<&str, usize>) -> Vec<SeverityCount> {
    ranked(counts, usize::MAX)
        .into_iter()
        .map(|(severity, count)| SeverityCount { severity, count })
        .collect()
}

fn entities(ranked: Vec<(String, usize)>) -> Vec<EntityCount> {
    ranked
        .into_iter()
        .map(|(name, count)| EntityCount { name, count })
        .collect()
}

// ============================================================================
// Entry points
// ============================================================================

/// Run an analysis with default options.
pub fn analyze(rule_rows: &[RuleRow], access_rows: &[AccessRow]) -> AnalysisReport {
    analyze_with(rule_rows, access_rows, &AnalysisOptions::default())
}

/// Run an analysis with explicit options.
pub fn analyze_with(
    rule_rows: &[RuleRow],
    access_rows: &[AccessRow],
    options: &AnalysisOptions,
) -> AnalysisReport {
    let index = ConflictRuleIndex::build(rule_rows, &options.canonicalizer);
    let graph = AccessGraph::build(access_rows, &options.canonicalizer);

    let detector = ViolationDetector::new(&index).with_strategy(options.strategy);
    let user_violations = detector.detect_users(&graph);
    let role_violations = detector.detect_roles(&graph);

    let summary = Summary {
        conflict_pairs: index.len(),
        users: graph.user_count(),
        roles: graph.role_count(),
        user_violations: user_violations.len(),
        role_violations: role_violations.len(),
    };
    info!(
        conflict_pairs = summary.conflict_pairs,
        users = summary.users,
        roles = summary.roles,
        user_violations = summary.user_violations,
        role_violations = summary.role_violations,
        "Analysis complete"
    );

    AnalysisReport {
        summary,
        user_violations,
        role_violations,
        rule_stats: index.stats(),
        access_stats: graph.stats(),
    }
}

/// Extract rows from parsed tables and run an analysis.
///
/// Fails only when a table lacks a required column.
pub fn analyze_tables(
    rules: &RawTable,
    access: &RawTable,
    options: &AnalysisOptions,
) -> Result<AnalysisReport> {
    let rule_rows = rules.rule_rows()?;
    let access_rows = access.access_rows()?;
    Ok(analyze_with(&rule_rows, &access_rows, options))
}

// ============================================================================
// Tests
// ============================================================================

//! Conflict rule index built from the ground-truth rule book.
//!
//! The index maps an unordered pair of authorization codes to the risk
//! label of the first rule book row that named it. Later rows naming the
//! same pair, in either column order, are ignored.

use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::ops::Bound;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::canonical::Canonicalizer;
use crate::table::columns;
use crate::types::{AuthCode, CodePair, Severity};

// ============================================================================
// Domain Types
// ============================================================================

/// One raw row of the rule book, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleRow {
    /// First code of the forbidden pair (`TCODE1`).
    pub code1: Option<String>,
    /// Second code of the forbidden pair (`TCODE2`).
    pub code2: Option<String>,
    /// Risk label (`ASK_RISK`).
    pub severity: Option<String>,
}

impl RuleRow {
    /// Create a fully populated row.
    pub fn new(
        code1: impl Into<String>,
        code2: impl Into<String>,
        severity: impl Into<String>,
    ) -> Self {
        Self {
            code1: Some(code1.into()),
            code2: Some(code2.into()),
            severity: Some(severity.into()),
        }
    }
}

/// Why a single input row contributed nothing.
///
/// These are recovered locally: the row is skipped and counted, never
/// raised to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowIssue {
    /// A required field is absent or blank.
    MissingField(&'static str),
    /// Both codes of a rule row normalize to the same value.
    InvalidPair,
    /// The rule row repeats a pair that is already indexed.
    DuplicateRule,
}

impl fmt::Display for RowIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField(column) => write!(f, "missing {column}"),
            Self::InvalidPair => write!(f, "self-conflicting pair"),
            Self::DuplicateRule => write!(f, "duplicate rule"),
        }
    }
}

/// A deduplicated conflict rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConflictRule {
    /// The forbidden pair.
    pub pair: CodePair,
    /// Risk label of the first row that named the pair.
    pub severity: Severity,
}

/// Row accounting for a rule book load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RuleBuildStats {
    /// Rows offered to the index.
    pub rows_read: usize,
    /// Rows that produced a new rule.
    pub indexed: usize,
    /// Rows skipped for a missing code.
    pub missing_field: usize,
    /// Rows skipped because both codes were identical.
    pub self_pairs: usize,
    /// Rows ignored because the pair was already indexed.
    pub duplicates: usize,
    /// Indexed rules whose risk cell was empty.
    pub unspecified_severity: usize,
}

impl RuleBuildStats {
    /// Total rows that did not produce a rule.
    pub fn skipped(&self) -> usize {
        self.missing_field + self.self_pairs + self.duplicates
    }

    fn record(&mut self, issue: RowIssue) {
        match issue {
            RowIssue::MissingField(_) => self.missing_field += 1,
            RowIssue::InvalidPair => self.self_pairs += 1,
            RowIssue::DuplicateRule => self.duplicates += 1,
        }
    }
}

// ============================================================================
// Index
// ============================================================================

/// Lookup table from unordered code pairs to severities.
#[derive(Debug, Clone, Default)]
pub struct ConflictRuleIndex {
    /// Rules in first-seen order.
    rules: Vec<ConflictRule>,
    /// Both directions of every pair, pointing into `rules`.
    by_code: HashMap<AuthCode, BTreeMap<AuthCode, usize>>,
    stats: RuleBuildStats,
}

impl ConflictRuleIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from rule book rows.
    pub fn build<I>(rows: I, canon: &Canonicalizer) -> Self
    where
        I: IntoIterator,
        I::Item: Borrow<RuleRow>,
    {
        let mut index = Self::new();
        for (idx, row) in rows.into_iter().enumerate() {
            if let Err(issue) = index.insert_row(row.borrow(), canon) {
                debug!(row = idx + 1, %issue, "Skipping rule book row");
            }
        }

        info!(
            pairs = index.len(),
            rows = index.stats.rows_read,
            skipped = index.stats.skipped(),
            "Conflict rule index built"
        );
        index
    }

    /// Normalize and insert a single row.
    ///
    /// Returns the reason when the row produced no rule.
    pub fn insert_row(&mut self, row: &RuleRow, canon: &Canonicalizer) -> Result<(), RowIssue> {
        self.stats.rows_read += 1;
        let result = self.try_insert(row, canon);
        match result {
            Ok(()) => self.stats.indexed += 1,
            Err(issue) => self.stats.record(issue),
        }
        result
    }

    fn try_insert(&mut self, row: &RuleRow, canon: &Canonicalizer) -> Result<(), RowIssue> {
        let first = canon
            .code(row.code1.as_deref())
            .ok_or(RowIssue::MissingField(columns::TCODE1))?;
        let second = canon
            .code(row.code2.as_deref())
            .ok_or(RowIssue::MissingField(columns::TCODE2))?;
        let pair = CodePair::new(first, second).ok_or(RowIssue::InvalidPair)?;

        if self.contains(&pair) {
            return Err(RowIssue::DuplicateRule);
        }

        let severity = match canon.severity(row.severity.as_deref()) {
            Some(severity) => severity,
            None => {
                self.stats.unspecified_severity += 1;
                Severity::unspecified()
            }
        };

        let slot = self.rules.len();
        self.by_code
            .entry(pair.low().clone())
            .or_default()
            .insert(pair.high().clone(), slot);
        self.by_code
            .entry(pair.high().clone())
            .or_default()
            .insert(pair.low().clone(), slot);
        self.rules.push(ConflictRule { pair, severity });
        Ok(())
    }

    /// Whether the pair is indexed.
    pub fn contains(&self, pair: &CodePair) -> bool {
        self.rule_for(pair.low(), pair.high()).is_some()
    }

    /// The rule for two codes, in either order.
    pub fn rule_for(&self, a: &AuthCode, b: &AuthCode) -> Option<&ConflictRule> {
        let slot = *self.by_code.get(a)?.get(b)?;
        self.rules.get(slot)
    }

    /// The severity for two codes, in either order.
    ///
    /// `None` means the codes do not conflict.
    pub fn severity_of(&self, a: &AuthCode, b: &AuthCode) -> Option<&Severity> {
        self.rule_for(a, b).map(|rule| &rule.severity)
    }

    /// Codes that conflict with `code`, ascending.
    pub fn partners<'a>(&'a self, code: &AuthCode) -> impl Iterator<Item = &'a AuthCode> + 'a {
        self.by_code
            .get(code)
            .into_iter()
            .flat_map(|partners| partners.keys())
    }

    /// Number of codes that conflict with `code`.
    pub fn partner_count(&self, code: &AuthCode) -> usize {
        self.by_code.get(code).map_or(0, BTreeMap::len)
    }

    /// Conflicting codes sorting strictly after `code`, with their severity.
    pub(crate) fn partners_above<'a>(
        &'a self,
        code: &'a AuthCode,
    ) -> impl Iterator<Item = (&'a AuthCode, &'a Severity)> + 'a {
        self.by_code
            .get(code)
            .into_iter()
            .flat_map(move |partners| {
                partners.range::<AuthCode, _>((Bound::Excluded(code), Bound::Unbounded))
            })
            .filter_map(move |(partner, slot)| {
                self.rules.get(*slot).map(|rule| (partner, &rule.severity))
            })
    }

    /// Rules in the order they were first seen.
    pub fn iter(&self) -> impl Iterator<Item = &ConflictRule> {
        self.rules.iter()
    }

    /// Number of distinct conflict pairs.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the index holds no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Row accounting for everything offered to this index.
    pub fn stats(&self) -> RuleBuildStats {
        self.stats
    }
}

// ============================================================================
// Tests
// ============================================================================

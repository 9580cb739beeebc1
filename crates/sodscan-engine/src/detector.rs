//! Violation detection over an access graph.
//!
//! For every `(user, role)` grant set and every aggregated role profile, all
//! unordered pairs of distinct codes are tested against the conflict rule
//! index. A code set of size `k` costs `k * (k - 1) / 2` lookups with
//! [`DetectionStrategy::Pairwise`]; [`DetectionStrategy::Adjacency`] walks
//! each code's conflict partners instead, which wins when sets are large and
//! rules are sparse. Both yield the same records in the same order.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::access::AccessGraph;
use crate::rules::ConflictRuleIndex;
use crate::types::{AuthCode, RoleName, Severity, UserName};

// ============================================================================
// Domain Types
// ============================================================================

/// How candidate pairs are enumerated for one code set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionStrategy {
    /// Pick the cheaper of the two per code set.
    #[default]
    Auto,
    /// Test every combination of two codes.
    Pairwise,
    /// Walk the conflict partners of each code.
    Adjacency,
}

impl fmt::Display for DetectionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Pairwise => write!(f, "pairwise"),
            Self::Adjacency => write!(f, "adjacency"),
        }
    }
}

impl FromStr for DetectionStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "pairwise" => Ok(Self::Pairwise),
            "adjacency" => Ok(Self::Adjacency),
            other => Err(format!(
                "Unknown detection strategy '{other}'. Supported: auto, pairwise, adjacency"
            )),
        }
    }
}

/// A user holding both codes of a conflict pair through one role.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct UserViolation {
    /// The user.
    pub user: UserName,
    /// The role granting both codes.
    pub role: RoleName,
    /// Smaller code of the pair.
    pub code_low: AuthCode,
    /// Larger code of the pair.
    pub code_high: AuthCode,
    /// Risk label of the conflict rule.
    pub severity: Severity,
}

/// A role whose aggregated code set contains both codes of a conflict pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RoleViolation {
    /// The role.
    pub role: RoleName,
    /// Smaller code of the pair.
    pub code_low: AuthCode,
    /// Larger code of the pair.
    pub code_high: AuthCode,
    /// Risk label of the conflict rule.
    pub severity: Severity,
}

/// A conflicting pair found inside one code set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conflict<'a> {
    /// Smaller code of the pair.
    pub low: &'a AuthCode,
    /// Larger code of the pair.
    pub high: &'a AuthCode,
    /// Risk label of the conflict rule.
    pub severity: &'a Severity,
}

// ============================================================================
// Detector
// ============================================================================

/// Matches code sets against a conflict rule index.
#[derive(Debug, Clone, Copy)]
pub struct ViolationDetector<'a> {
    index: &'a ConflictRuleIndex,
    strategy: DetectionStrategy,
}

impl<'a> ViolationDetector<'a> {
    /// Create a detector using [`DetectionStrategy::Auto`].
    pub fn new(index: &'a ConflictRuleIndex) -> Self {
        Self {
            index,
            strategy: DetectionStrategy::Auto,
        }
    }

    /// Use a specific enumeration strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: DetectionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// The configured strategy.
    pub fn strategy(&self) -> DetectionStrategy {
        self.strategy
    }

    /// All conflicting pairs within one code set, ascending by `(low, high)`.
    pub fn conflicts_in<'s>(&'s self, codes: &'s BTreeSet<AuthCode>) -> Vec<Conflict<'s>> {
        let mut found = Vec::new();
        if codes.len() < 2 || self.index.is_empty() {
            return found;
        }

        match self.resolve_strategy(codes) {
            DetectionStrategy::Adjacency => self.adjacency(codes, &mut found),
            _ => self.pairwise(codes, &mut found),
        }
        found
    }

    fn resolve_strategy(&self, codes: &BTreeSet<AuthCode>) -> DetectionStrategy {
        match self.strategy {
            DetectionStrategy::Auto => {
                let k = codes.len();
                let pairwise_cost = k * (k - 1) / 2;
                let adjacency_cost: usize =
                    codes.iter().map(|code| self.index.partner_count(code)).sum();
                if adjacency_cost < pairwise_cost {
                    DetectionStrategy::Adjacency
                } else {
                    DetectionStrategy::Pairwise
                }
            }
            fixed => fixed,
        }
    }

    fn pairwise<'s>(&'s self, codes: &'s BTreeSet<AuthCode>, found: &mut Vec<Conflict<'s>>) {
        let ordered: Vec<&AuthCode> = codes.iter().collect();
        for (i, &low) in ordered.iter().enumerate() {
            for &high in &ordered[i + 1..] {
                if let Some(severity) = self.index.severity_of(low, high) {
                    found.push(Conflict {
                        low,
                        high,
                        severity,
                    });
                }
            }
        }
    }

    fn adjacency<'s>(&'s self, codes: &'s BTreeSet<AuthCode>, found: &mut Vec<Conflict<'s>>) {
        for low in codes {
            for (high, severity) in self.index.partners_above(low) {
                if codes.contains(high) {
                    found.push(Conflict {
                        low,
                        high,
                        severity,
                    });
                }
            }
        }
    }

    /// User-level pass: one record per conflicting pair within each
    /// `(user, role)` grant set.
    pub fn detect_users(&self, graph: &AccessGraph) -> Vec<UserViolation> {
        let mut violations = Vec::new();
        for grant in graph.user_role_grants() {
            for conflict in self.conflicts_in(&grant.codes) {
                violations.push(UserViolation {
                    user: grant.user.clone(),
                    role: grant.role.clone(),
                    code_low: conflict.low.clone(),
                    code_high: conflict.high.clone(),
                    severity: conflict.severity.clone(),
                });
            }
        }
        debug!(count = violations.len(), strategy = %self.strategy, "User-level pass complete");
        violations
    }

    /// Role-level pass: one record per conflicting pair within each role's
    /// aggregated code set.
    pub fn detect_roles(&self, graph: &AccessGraph) -> Vec<RoleViolation> {
        let mut violations = Vec::new();
        for profile in graph.role_profiles() {
            for conflict in self.conflicts_in(&profile.codes) {
                violations.push(RoleViolation {
                    role: profile.role.clone(),
                    code_low: conflict.low.clone(),
                    code_high: conflict.high.clone(),
                    severity: conflict.severity.clone(),
                });
            }
        }
        debug!(count = violations.len(), strategy = %self.strategy, "Role-level pass complete");
        violations
    }
}

// ============================================================================
// Tests
// ============================================================================

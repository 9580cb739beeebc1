//! Access graph built from the user access table.
//!
//! Grants are grouped twice: per `(user, role)`, so a user's codes stay
//! separated by the role that granted them, and per role, as the union of
//! everything the role grants across all of its holders.

use std::borrow::Borrow;
use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::canonical::Canonicalizer;
use crate::rules::RowIssue;
use crate::table::columns;
use crate::types::{AuthCode, RoleName, UserName};

// ============================================================================
// Domain Types
// ============================================================================

/// One raw row of the user access table, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRow {
    /// User account (`USER NAME`).
    pub user: Option<String>,
    /// Role held by the user (`ROLE`).
    pub role: Option<String>,
    /// Authorization code granted through the role (`AUTHORIZATION VALUE`).
    pub code: Option<String>,
}

impl AccessRow {
    /// Create a fully populated row.
    pub fn new(user: impl Into<String>, role: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            user: Some(user.into()),
            role: Some(role.into()),
            code: Some(code.into()),
        }
    }
}

/// Codes granted to one user through one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRoleGrant {
    /// The user holding the role.
    pub user: UserName,
    /// The granting role.
    pub role: RoleName,
    /// Distinct codes, ascending.
    pub codes: BTreeSet<AuthCode>,
}

/// Codes a role grants, aggregated over every user holding it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleProfile {
    /// The role.
    pub role: RoleName,
    /// Distinct codes, ascending.
    pub codes: BTreeSet<AuthCode>,
}

/// Row accounting for an access table load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AccessBuildStats {
    /// Rows offered to the graph.
    pub rows_read: usize,
    /// Rows with all three fields present.
    pub accepted: usize,
    /// Rows skipped for a missing field.
    pub missing_field: usize,
    /// Accepted rows that repeated an existing grant.
    pub duplicate_grants: usize,
}

#[derive(Debug, Clone)]
struct UserEntry {
    grants: Vec<UserRoleGrant>,
    grant_slots: HashMap<RoleName, usize>,
}

// ============================================================================
// Graph
// ============================================================================

/// Per-user and per-role grant sets, in first-encountered order.
#[derive(Debug, Clone, Default)]
pub struct AccessGraph {
    users: Vec<UserEntry>,
    user_slots: HashMap<UserName, usize>,
    roles: Vec<RoleProfile>,
    role_slots: HashMap<RoleName, usize>,
    stats: AccessBuildStats,
}

impl AccessGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from access table rows.
    pub fn build<I>(rows: I, canon: &Canonicalizer) -> Self
    where
        I: IntoIterator,
        I::Item: Borrow<AccessRow>,
    {
        let mut graph = Self::new();
        for (idx, row) in rows.into_iter().enumerate() {
            if let Err(issue) = graph.insert_row(row.borrow(), canon) {
                debug!(row = idx + 1, %issue, "Skipping access row");
            }
        }

        info!(
            users = graph.user_count(),
            roles = graph.role_count(),
            rows = graph.stats.rows_read,
            skipped = graph.stats.missing_field,
            "Access graph built"
        );
        graph
    }

    /// Normalize and insert a single row.
    pub fn insert_row(&mut self, row: &AccessRow, canon: &Canonicalizer) -> Result<(), RowIssue> {
        self.stats.rows_read += 1;
        let user = canon.user(row.user.as_deref());
        let role = canon.role(row.role.as_deref());
        let code = canon.code(row.code.as_deref());

        let (user, role, code) = match (user, role, code) {
            (Some(user), Some(role), Some(code)) => (user, role, code),
            (None, _, _) => return Err(self.missing(columns::USER_NAME)),
            (_, None, _) => return Err(self.missing(columns::ROLE)),
            (_, _, None) => return Err(self.missing(columns::AUTHORIZATION_VALUE)),
        };

        self.stats.accepted += 1;
        let fresh = self.grant_mut(user, role.clone()).codes.insert(code.clone());
        self.profile_mut(role).codes.insert(code);
        if !fresh {
            self.stats.duplicate_grants += 1;
        }
        Ok(())
    }

    fn missing(&mut self, column: &'static str) -> RowIssue {
        self.stats.missing_field += 1;
        RowIssue::MissingField(column)
    }

    /// Find or create the grant set for `(user, role)`.
    fn grant_mut(&mut self, user: UserName, role: RoleName) -> &mut UserRoleGrant {
        let user_slot = match self.user_slots.get(&user) {
            Some(&slot) => slot,
            None => {
                let slot = self.users.len();
                self.users.push(UserEntry {
                    grants: Vec::new(),
                    grant_slots: HashMap::new(),
                });
                self.user_slots.insert(user.clone(), slot);
                slot
            }
        };

        let entry = &mut self.users[user_slot];
        let grant_slot = match entry.grant_slots.get(&role) {
            Some(&slot) => slot,
            None => {
                let slot = entry.grants.len();
                entry.grants.push(UserRoleGrant {
                    user,
                    role: role.clone(),
                    codes: BTreeSet::new(),
                });
                entry.grant_slots.insert(role, slot);
                slot
            }
        };
        &mut entry.grants[grant_slot]
    }

    /// Find or create the aggregate profile for `role`.
    fn profile_mut(&mut self, role: RoleName) -> &mut RoleProfile {
        let slot = match self.role_slots.get(&role) {
            Some(&slot) => slot,
            None => {
                let slot = self.roles.len();
                self.roles.push(RoleProfile {
                    role: role.clone(),
                    codes: BTreeSet::new(),
                });
                self.role_slots.insert(role, slot);
                slot
            }
        };
        &mut self.roles[slot]
    }

    /// All `(user, role, codes)` grants: users in first-seen order, then each
    /// user's roles in first-seen order.
    pub fn user_role_grants(&self) -> impl Iterator<Item = &UserRoleGrant> {
        self.users.iter().flat_map(|entry| entry.grants.iter())
    }

    /// All role profiles in first-seen order.
    pub fn role_profiles(&self) -> impl Iterator<Item = &RoleProfile> {
        self.roles.iter()
    }

    /// Grants held by one user.
    pub fn grants_for(&self, user: &UserName) -> &[UserRoleGrant] {
        self.user_slots
            .get(user)
            .and_then(|&slot| self.users.get(slot))
            .map(|entry| entry.grants.as_slice())
            .unwrap_or_default()
    }

    /// Aggregate profile of one role.
    pub fn role_profile(&self, role: &RoleName) -> Option<&RoleProfile> {
        self.role_slots
            .get(role)
            .and_then(|&slot| self.roles.get(slot))
    }

    /// Number of distinct users.
    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// Number of distinct roles.
    pub fn role_count(&self) -> usize {
        self.roles.len()
    }

    /// Whether no row was accepted.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Row accounting for everything offered to this graph.
    pub fn stats(&self) -> AccessBuildStats {
        self.stats
    }
}

// ============================================================================
// Tests
// ============================================================================

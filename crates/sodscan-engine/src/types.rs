//! Type definitions for the conflict matching domain.
//!
//! Identifiers are newtypes over normalized strings. They can only be built
//! through a [`Canonicalizer`], so holding one means the value is trimmed,
//! uppercased and known to be present.

use std::fmt;

use serde::Serialize;

use crate::canonical::Canonicalizer;

// ============================================================================
// Identifier Types (Newtype Pattern)
// ============================================================================

macro_rules! canonical_name {
    ($(#[$meta:meta])* $name:ident, $method:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Normalize `raw` with the default canonicalizer.
            ///
            /// Returns `None` when the value counts as absent.
            pub fn new(raw: &str) -> Option<Self> {
                Canonicalizer::default().$method(Some(raw))
            }

            pub(crate) fn from_canonical(value: String) -> Self {
                Self(value)
            }

            /// Get the normalized value.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Get the inner string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

canonical_name!(
    /// A granted permission, such as a transaction code.
    AuthCode,
    code
);

canonical_name!(
    /// A user account name.
    UserName,
    user
);

canonical_name!(
    /// A role (authorization profile) name.
    RoleName,
    role
);

// ============================================================================
// Severity
// ============================================================================

/// Risk label attached to a conflict pair.
///
/// The label is taken verbatim from the rule book (trimmed, case kept). The
/// taxonomy belongs to whoever maintains the rule book, so no fixed set of
/// values is enforced.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Severity(String);

impl Severity {
    /// Label used when a rule row carries no risk value.
    pub const UNSPECIFIED: &'static str = "Unspecified";

    /// Create a severity from a label, trimming surrounding whitespace.
    ///
    /// Returns `None` for blank labels.
    pub fn new(label: &str) -> Option<Self> {
        Canonicalizer::default().severity(Some(label))
    }

    /// The severity given to rules whose risk cell is empty.
    pub fn unspecified() -> Self {
        Self(Self::UNSPECIFIED.to_string())
    }

    pub(crate) fn from_canonical(value: String) -> Self {
        Self(value)
    }

    /// Get the label.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Code Pairs
// ============================================================================

/// An unordered pair of two distinct authorization codes.
///
/// Stored as `(low, high)` with `low < high` in byte order, so a pair built
/// from `(a, b)` equals the one built from `(b, a)` and always renders the
/// same way.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CodePair {
    low: AuthCode,
    high: AuthCode,
}

impl CodePair {
    /// Build a pair, ordering the codes. Returns `None` for a self-pair.
    pub fn new(a: AuthCode, b: AuthCode) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self { low: a, high: b }),
            std::cmp::Ordering::Greater => Some(Self { low: b, high: a }),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// The lexicographically smaller code.
    pub fn low(&self) -> &AuthCode {
        &self.low
    }

    /// The lexicographically larger code.
    pub fn high(&self) -> &AuthCode {
        &self.high
    }

    /// Whether `code` is one half of this pair.
    pub fn contains(&self, code: &AuthCode) -> bool {
        &self.low == code || &self.high == code
    }

    /// Split into `(low, high)`.
    pub fn into_parts(self) -> (AuthCode, AuthCode) {
        (self.low, self.high)
    }
}

impl fmt::Display for CodePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.low, self.high)
    }
}

// ============================================================================
// Tests
// ============================================================================

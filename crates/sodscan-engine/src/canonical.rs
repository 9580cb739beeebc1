//! Field normalization for rule book and access table cells.
//!
//! Every raw cell passes through a [`Canonicalizer`] before it reaches the
//! rule index or the access graph. Values that are missing, blank, or equal
//! to a "no value" placeholder never become codes, users, or roles.

use crate::types::{AuthCode, RoleName, Severity, UserName};

/// Placeholder a tabular reader emits for a cell with no data.
pub const NO_VALUE_MARKER: &str = "NAN";

/// Normalizes raw cell values into canonical identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canonicalizer {
    /// Uppercased placeholders treated as absent.
    missing_markers: Vec<String>,
}

impl Default for Canonicalizer {
    fn default() -> Self {
        Self {
            missing_markers: vec![NO_VALUE_MARKER.to_string()],
        }
    }
}

impl Canonicalizer {
    /// Create a canonicalizer with the default placeholder set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add placeholders that should also count as absent (e.g. `NULL`, `N/A`).
    ///
    /// Markers are trimmed and compared case-insensitively. Blank markers are
    /// ignored.
    #[must_use]
    pub fn with_missing_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for marker in markers {
            let marker = marker.as_ref().trim().to_uppercase();
            if !marker.is_empty() && !self.missing_markers.contains(&marker) {
                self.missing_markers.push(marker);
            }
        }
        self
    }

    /// The placeholders currently treated as absent.
    pub fn missing_markers(&self) -> &[String] {
        &self.missing_markers
    }

    /// Whether a raw value counts as absent.
    pub fn is_missing(&self, raw: Option<&str>) -> bool {
        self.present(raw).is_none()
    }

    /// Normalize an authorization code.
    pub fn code(&self, raw: Option<&str>) -> Option<AuthCode> {
        self.upper(raw).map(AuthCode::from_canonical)
    }

    /// Normalize a user name.
    pub fn user(&self, raw: Option<&str>) -> Option<UserName> {
        self.upper(raw).map(UserName::from_canonical)
    }

    /// Normalize a role name.
    pub fn role(&self, raw: Option<&str>) -> Option<RoleName> {
        self.upper(raw).map(RoleName::from_canonical)
    }

    /// Normalize a risk label. Case is preserved.
    pub fn severity(&self, raw: Option<&str>) -> Option<Severity> {
        self.present(raw)
            .map(|label| Severity::from_canonical(label.to_string()))
    }

    /// Trim and reject blank or placeholder values.
    fn present<'a>(&self, raw: Option<&'a str>) -> Option<&'a str> {
        let trimmed = raw?.trim();
        if trimmed.is_empty() {
            return None;
        }
        let upper = trimmed.to_uppercase();
        if self.missing_markers.contains(&upper) {
            None
        } else {
            Some(trimmed)
        }
    }

    fn upper(&self, raw: Option<&str>) -> Option<String> {
        self.present(raw).map(str::to_uppercase)
    }
}

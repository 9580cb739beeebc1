//! Test fixtures factory for integration tests.
//!
//! A small finance landscape with overlapping roles, reused across tests.

use super::{access_table, rule_table};
use sodscan_engine::RawTable;

/// Procure-to-pay rule book.
///
/// Includes a reversed duplicate, a self-pair and a row with no second code
/// so the loader accounting can be asserted.
pub fn finance_rules() -> RawTable {
    rule_table(&[
        ("ME21N", "MIGO", "High"),
        ("FB60", "F110", "Critical"),
        ("XK01", "F110", "High"),
        ("MIGO", "me21n", "Low"),
        ("FB60", "FB60", "High"),
        ("ME21N", "", "Medium"),
        ("XK01", "FB60", ""),
    ])
}

/// Access assignments for three users and four roles.
pub fn finance_access() -> RawTable {
    access_table(&[
        ("alice", "Z_BUYER", "ME21N"),
        ("alice", "Z_BUYER", "MIGO"),
        ("alice", "Z_AP_CLERK", "FB60"),
        ("bob", "Z_AP_CLERK", "F110"),
        ("bob", "Z_VENDOR_MAINT", "XK01"),
        ("bob", "Z_VENDOR_MAINT", "F110"),
        ("bob", "Z_VENDOR_MAINT", "FB60"),
        ("carol", "Z_DISPLAY", "FB03"),
        ("carol", "Z_DISPLAY", "ME23N"),
        ("nan", "Z_DISPLAY", "FB60"),
        ("dave", "", "F110"),
    ])
}

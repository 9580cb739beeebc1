//! Command implementations for the sodscan CLI

pub mod analyze;
pub mod check;
pub mod completions;

//! Terminal output helpers

mod printer;
pub mod table;

pub use printer::Printer;
pub use table::{parse_comma_list, truncate, validate_top_n};

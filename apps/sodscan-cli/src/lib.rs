//! sodscan CLI library
//!
//! The binary in `main.rs` only parses arguments, installs logging and maps
//! errors to exit codes. Everything else lives here so integration tests
//! can drive the commands directly.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod formats;
pub mod logging;
pub mod output;

pub use cli::{Cli, Commands, GlobalArgs};
pub use error::{CliError, CliResult};

//! Configuration management for the sodscan CLI

mod paths;
mod settings;

pub use paths::ConfigPaths;
pub use settings::{Settings, DEFAULT_TOP_N};

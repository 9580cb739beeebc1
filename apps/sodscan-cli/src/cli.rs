//! Command-line definition and dispatch

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::warn;

use crate::commands;
use crate::config::{ConfigPaths, Settings};
use crate::error::CliResult;
use crate::logging::LogConfig;

/// sodscan - Segregation-of-Duties conflict analysis
#[derive(Parser, Debug)]
#[command(name = "sodscan")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Flags accepted by every command
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Show phase summaries
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Show every skipped row and its reason
    #[arg(long, global = true)]
    pub debug: bool,

    /// Show all diagnostics, including third-party crates
    #[arg(long, global = true)]
    pub trace: bool,

    /// Only log errors; results are still printed
    #[arg(short, long, global = true, conflicts_with_all = ["verbose", "debug", "trace"])]
    pub quiet: bool,

    /// Also append log lines to this file
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Read settings from this file instead of the default config.json
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl GlobalArgs {
    /// Logging configuration for these flags and the process environment
    pub fn log_config(&self) -> LogConfig {
        LogConfig::from_args_and_env(
            self.verbose,
            self.debug,
            self.trace,
            self.quiet,
            self.log_file.clone(),
        )
    }

    /// Settings from the config file and environment
    pub fn settings(&self) -> CliResult<Settings> {
        let settings = match &self.config {
            Some(path) => Settings::load_existing(path)?,
            None => match ConfigPaths::new() {
                Ok(paths) => Settings::load(&paths.config_file)?,
                Err(e) => {
                    warn!(error = %e, "No config directory, using defaults");
                    Settings::default()
                }
            },
        };
        settings.apply_env()
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Detect user-level and role-level SoD violations
    Analyze(commands::analyze::AnalyzeArgs),

    /// Validate input tables without running detection
    Check(commands::check::CheckArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

/// Run a parsed command line
pub fn run(cli: Cli) -> CliResult<()> {
    match cli.command {
        Commands::Analyze(args) => {
            let settings = cli.global.settings()?;
            commands::analyze::execute(args, &settings)
        }
        Commands::Check(args) => {
            let settings = cli.global.settings()?;
            commands::check::execute(args, &settings)
        }
        Commands::Completions(args) => commands::completions::execute(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_analyze() {
        let cli = Cli::try_parse_from([
            "sodscan",
            "analyze",
            "--rules",
            "rules.csv",
            "--access",
            "access.csv",
            "--format",
            "json",
            "--top",
            "3",
            "--strategy",
            "adjacency",
            "--missing-marker",
            "NULL",
            "--missing-marker",
            "N/A",
            "-v",
        ])
        .unwrap();

        assert!(cli.global.verbose);
        match cli.command {
            Commands::Analyze(args) => {
                assert_eq!(args.rules, PathBuf::from("rules.csv"));
                assert_eq!(args.top, Some(3));
                assert_eq!(args.missing_markers, vec!["NULL", "N/A"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_strategy() {
        let result = Cli::try_parse_from([
            "sodscan",
            "analyze",
            "--rules",
            "r.csv",
            "--access",
            "a.csv",
            "--strategy",
            "fastest",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["sodscan", "-q", "-v", "completions", "bash"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_explicit_config_file_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.json");
        std::fs::write(&path, r#"{"top_n": 4}"#).unwrap();

        let global = GlobalArgs {
            config: Some(path),
            ..GlobalArgs::default()
        };
        // Environment overrides may apply on a developer machine
        if std::env::var("SODSCAN_TOP_N").is_err() {
            assert_eq!(global.settings().unwrap().top_n, 4);
        }
    }

    #[test]
    fn test_missing_explicit_config_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let global = GlobalArgs {
            config: Some(dir.path().join("typo.json")),
            ..GlobalArgs::default()
        };

        let err = global.settings().unwrap_err();
        assert!(matches!(err, crate::error::CliError::Config(_)));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_quiet_help_describes_logging_only() {
        let cmd = Cli::command();
        let quiet = cmd
            .get_arguments()
            .find(|arg| arg.get_id() == "quiet")
            .unwrap();
        let help = quiet.get_help().unwrap().to_string();
        assert!(help.starts_with("Only log errors"), "{help}");
    }
}

//! `sodscan check`: validate input tables without running detection

use clap::Args;
use serde::Serialize;
use sodscan_engine::{
    AccessBuildStats, AccessGraph, Canonicalizer, ConflictRuleIndex, EngineError, RawTable,
    RuleBuildStats, TableKind,
};
use std::io::{self, Write};
use std::path::PathBuf;

use crate::config::Settings;
use crate::error::{CliError, CliResult};
use crate::formats::csv::read_table;
use crate::output::Printer;

/// Validate headers and report how many rows would be used
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Rule book CSV (TCODE1, TCODE2, ASK_RISK)
    #[arg(long, value_name = "CSV")]
    pub rules: PathBuf,

    /// User access CSV (USER NAME, ROLE, AUTHORIZATION VALUE)
    #[arg(long, value_name = "CSV")]
    pub access: PathBuf,

    /// Extra placeholder treated as an empty cell (repeatable)
    #[arg(long = "missing-marker", value_name = "MARKER")]
    pub missing_markers: Vec<String>,
}

/// Load statistics for a pair of valid input tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    pub rule_stats: RuleBuildStats,
    pub access_stats: AccessBuildStats,
    pub conflict_pairs: usize,
    pub users: usize,
    pub roles: usize,
}

/// Execute the check command
pub fn execute(args: CheckArgs, settings: &Settings) -> CliResult<()> {
    let report = inspect(&args, settings)?;

    let printer = Printer::from_env();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_report(&mut out, &printer, &report)?;
    printer.success(&mut out, "Both tables are valid")?;
    printer.next_steps(
        &mut out,
        &[format!(
            "sodscan analyze --rules {} --access {}",
            args.rules.display(),
            args.access.display()
        )],
    )?;
    out.flush()?;
    Ok(())
}

/// Read both tables, check their columns, and build the indexes
///
/// Schema problems in both tables are reported together.
pub fn inspect(args: &CheckArgs, settings: &Settings) -> CliResult<CheckReport> {
    let rules = read_table(&args.rules, TableKind::RuleBook)?;
    let access = read_table(&args.access, TableKind::UserAccess)?;

    let mut errors: Vec<EngineError> = [&rules, &access]
        .into_iter()
        .filter_map(|table| table.resolve_columns().err())
        .collect();

    match errors.len() {
        0 => {}
        1 => return Err(CliError::Schema(errors.remove(0))),
        _ => {
            let details: Vec<String> = errors.iter().map(ToString::to_string).collect();
            return Err(CliError::Validation(format!(
                "neither input table is usable: {}",
                details.join("; ")
            )));
        }
    }

    let canon = Canonicalizer::default()
        .with_missing_markers(&settings.missing_markers)
        .with_missing_markers(&args.missing_markers);
    Ok(build_report(&rules, &access, &canon)?)
}

fn build_report(
    rules: &RawTable,
    access: &RawTable,
    canon: &Canonicalizer,
) -> Result<CheckReport, EngineError> {
    let index = ConflictRuleIndex::build(rules.rule_rows()?, canon);
    let graph = AccessGraph::build(access.access_rows()?, canon);

    Ok(CheckReport {
        rule_stats: index.stats(),
        access_stats: graph.stats(),
        conflict_pairs: index.len(),
        users: graph.user_count(),
        roles: graph.role_count(),
    })
}

fn write_report<W: Write>(
    out: &mut W,
    printer: &Printer,
    report: &CheckReport,
) -> io::Result<()> {
    let rules = &report.rule_stats;
    printer.header(out, "Rule book")?;
    printer.key_value(out, "Rows read", rules.rows_read)?;
    printer.key_value(out, "Conflict pairs", report.conflict_pairs)?;
    printer.key_value(out, "Missing code", rules.missing_field)?;
    printer.key_value(out, "Self-conflicting", rules.self_pairs)?;
    printer.key_value(out, "Duplicates", rules.duplicates)?;
    printer.key_value(out, "No risk label", rules.unspecified_severity)?;

    let access = &report.access_stats;
    printer.header(out, "User access")?;
    printer.key_value(out, "Rows read", access.rows_read)?;
    printer.key_value(out, "Users", report.users)?;
    printer.key_value(out, "Roles", report.roles)?;
    printer.key_value(out, "Missing field", access.missing_field)?;
    printer.key_value(out, "Repeated grants", access.duplicate_grants)?;
    writeln!(out)?;

    if rules.unspecified_severity > 0 {
        printer.info(
            out,
            &format!(
                "{} rule(s) have no risk label; their violations are reported as Unspecified",
                rules.unspecified_severity
            ),
        )?;
    }
    Ok(())
}

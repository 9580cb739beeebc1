//! `sodscan analyze`: run the conflict analysis and report violations

use chrono::NaiveDate;
use clap::Args;
use sodscan_engine::{
    analyze_tables, AnalysisOptions, AnalysisReport, Canonicalizer, DetectionStrategy,
    RoleViolation, TableKind, UserViolation,
};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::Settings;
use crate::error::{CliError, CliResult};
use crate::formats::{self, csv as csv_format, json as json_format, OutputFormat, ReportKind};
use crate::output::{truncate, validate_top_n, Printer};

/// Detect user-level and role-level SoD violations
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Rule book CSV (TCODE1, TCODE2, ASK_RISK)
    #[arg(long, value_name = "CSV")]
    pub rules: PathBuf,

    /// User access CSV (USER NAME, ROLE, AUTHORIZATION VALUE)
    #[arg(long, value_name = "CSV")]
    pub access: PathBuf,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Write dated violation reports into this directory
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Number of users and roles listed in the rankings
    #[arg(long, value_name = "N")]
    pub top: Option<usize>,

    /// Pair enumeration strategy: auto, pairwise, adjacency
    #[arg(long)]
    pub strategy: Option<DetectionStrategy>,

    /// Extra placeholder treated as an empty cell (repeatable)
    #[arg(long = "missing-marker", value_name = "MARKER")]
    pub missing_markers: Vec<String>,
}

/// Fully resolved inputs for one analysis
#[derive(Debug, Clone)]
pub struct AnalyzePlan {
    pub rules: PathBuf,
    pub access: PathBuf,
    pub format: OutputFormat,
    pub output_dir: Option<PathBuf>,
    pub top_n: usize,
    pub options: AnalysisOptions,
}

impl AnalyzeArgs {
    /// Combine flags with settings; flags win
    pub fn resolve(&self, settings: &Settings) -> CliResult<AnalyzePlan> {
        let top_n = self.top.unwrap_or(settings.top_n);
        validate_top_n(top_n)?;

        let canonicalizer = Canonicalizer::default()
            .with_missing_markers(&settings.missing_markers)
            .with_missing_markers(&self.missing_markers);
        let options = AnalysisOptions::new()
            .with_canonicalizer(canonicalizer)
            .with_strategy(self.strategy.unwrap_or(settings.strategy));

        Ok(AnalyzePlan {
            rules: self.rules.clone(),
            access: self.access.clone(),
            format: self.format.unwrap_or(settings.format),
            output_dir: self.output_dir.clone().or_else(|| settings.output_dir.clone()),
            top_n,
            options,
        })
    }
}

/// Execute the analyze command
pub fn execute(args: AnalyzeArgs, settings: &Settings) -> CliResult<()> {
    let plan = args.resolve(settings)?;
    let report = run(&plan)?;

    let printer = Printer::from_env();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match plan.format {
        OutputFormat::Table => write_tables(&mut out, &printer, &report, plan.top_n)?,
        OutputFormat::Json => {
            json_format::write_pretty(&json_format::JsonReport::new(&report, plan.top_n), &mut out)?
        }
        OutputFormat::Csv => {
            csv_format::write_user_violations(&report.user_violations, &mut out)?;
            writeln!(out)?;
            csv_format::write_role_violations(&report.role_violations, &mut out)?;
        }
    }

    if let Some(dir) = &plan.output_dir {
        let today = chrono::Local::now().date_naive();
        let written = export(&report, dir, plan.format, today)?;
        for path in &written {
            // Keep stdout machine-readable for json and csv
            if plan.format == OutputFormat::Table {
                printer.success(&mut out, &format!("Saved {}", path.display()))?;
            } else {
                info!(path = %path.display(), "Saved report");
            }
        }
    }
    out.flush()?;

    Ok(())
}

/// Read both tables and run the analysis
pub fn run(plan: &AnalyzePlan) -> CliResult<AnalysisReport> {
    let rules = csv_format::read_table(&plan.rules, TableKind::RuleBook)?;
    let access = csv_format::read_table(&plan.access, TableKind::UserAccess)?;
    info!(
        rule_rows = rules.len(),
        access_rows = access.len(),
        strategy = %plan.options.strategy,
        "Input tables loaded"
    );

    Ok(analyze_tables(&rules, &access, &plan.options)?)
}

/// Write user-level and role-level report files into `dir`
///
/// Returns the written paths, user level first.
pub fn export(
    report: &AnalysisReport,
    dir: &Path,
    format: OutputFormat,
    date: NaiveDate,
) -> CliResult<Vec<PathBuf>> {
    std::fs::create_dir_all(dir).map_err(|e| {
        CliError::Output(format!("Failed to create {}: {}", dir.display(), e))
    })?;

    let user_path = formats::report_path(dir, ReportKind::UserLevel, date, format);
    let role_path = formats::report_path(dir, ReportKind::RoleLevel, date, format);

    write_user_file(&user_path, &report.user_violations, format)?;
    write_role_file(&role_path, &report.role_violations, format)?;

    Ok(vec![user_path, role_path])
}

fn create(path: &Path) -> CliResult<BufWriter<File>> {
    let file = File::create(path).map_err(|e| {
        CliError::Output(format!("Failed to create {}: {}", path.display(), e))
    })?;
    Ok(BufWriter::new(file))
}

fn write_user_file(path: &Path, violations: &[UserViolation], format: OutputFormat) -> CliResult<()> {
    let writer = create(path)?;
    match format {
        OutputFormat::Json => json_format::write_user_violations(violations, writer),
        OutputFormat::Table | OutputFormat::Csv => {
            csv_format::write_user_violations(violations, writer)
        }
    }
}

fn write_role_file(path: &Path, violations: &[RoleViolation], format: OutputFormat) -> CliResult<()> {
    let writer = create(path)?;
    match format {
        OutputFormat::Json => json_format::write_role_violations(violations, writer),
        OutputFormat::Table | OutputFormat::Csv => {
            csv_format::write_role_violations(violations, writer)
        }
    }
}

// ============================================================================
// Table output
// ============================================================================

fn write_tables<W: Write>(
    out: &mut W,
    printer: &Printer,
    report: &AnalysisReport,
    top_n: usize,
) -> io::Result<()> {
    printer.header(out, "SoD Analysis")?;
    write_summary(out, printer, report)?;

    if !report.has_violations() {
        writeln!(out, "\nNo violations found.")?;
        return Ok(());
    }

    write_distribution(out, report)?;
    write_rankings(out, report, top_n)?;
    write_user_table(out, &report.user_violations)?;
    write_role_table(out, &report.role_violations)?;
    Ok(())
}

fn write_summary<W: Write>(
    out: &mut W,
    printer: &Printer,
    report: &AnalysisReport,
) -> io::Result<()> {
    let summary = &report.summary;
    printer.key_value(out, "Conflict pairs", summary.conflict_pairs)?;
    printer.key_value(out, "Users", summary.users)?;
    printer.key_value(out, "Roles", summary.roles)?;
    printer.key_value(out, "User-level violations", summary.user_violations)?;
    printer.key_value(out, "Role-level violations", summary.role_violations)?;

    let skipped = report.rule_stats.skipped() + report.access_stats.missing_field;
    if skipped > 0 {
        printer.key_value(out, "Skipped rows", skipped)?;
    }
    Ok(())
}

fn write_distribution<W: Write>(out: &mut W, report: &AnalysisReport) -> io::Result<()> {
    let levels = [
        ("User violations by risk", report.severity_distribution()),
        ("Role violations by risk", report.role_severity_distribution()),
    ];
    for (title, distribution) in levels {
        if distribution.is_empty() {
            continue;
        }
        writeln!(out, "\n{title}")?;
        writeln!(out, "{}", "\u{2501}".repeat(50))?;
        for entry in distribution {
            writeln!(out, "{:<30} {:>8}", truncate(&entry.severity, 28), entry.count)?;
        }
    }
    Ok(())
}

fn write_rankings<W: Write>(out: &mut W, report: &AnalysisReport, top_n: usize) -> io::Result<()> {
    let users = report.top_users(top_n);
    if !users.is_empty() {
        writeln!(out, "\nTop {} users", users.len())?;
        writeln!(out, "{}", "\u{2501}".repeat(50))?;
        for entry in users {
            writeln!(out, "{:<30} {:>8}", truncate(&entry.name, 28), entry.count)?;
        }
    }

    let roles = report.top_roles(top_n);
    if !roles.is_empty() {
        writeln!(out, "\nTop {} roles", roles.len())?;
        writeln!(out, "{}", "\u{2501}".repeat(50))?;
        for entry in roles {
            writeln!(out, "{:<30} {:>8}", truncate(&entry.name, 28), entry.count)?;
        }
    }
    Ok(())
}

fn write_user_table<W: Write>(out: &mut W, violations: &[UserViolation]) -> io::Result<()> {
    writeln!(out, "\nUser-level violations")?;
    writeln!(
        out,
        "{:<20} {:<25} {:<12} {:<12} {:<12}",
        "USER", "ROLE", "TCODE 1", "TCODE 2", "RISK"
    )?;
    writeln!(out, "{}", "-".repeat(85))?;
    for v in violations {
        writeln!(
            out,
            "{:<20} {:<25} {:<12} {:<12} {:<12}",
            truncate(v.user.as_str(), 18),
            truncate(v.role.as_str(), 23),
            truncate(v.code_low.as_str(), 12),
            truncate(v.code_high.as_str(), 12),
            truncate(v.severity.as_str(), 12)
        )?;
    }
    Ok(())
}

fn write_role_table<W: Write>(out: &mut W, violations: &[RoleViolation]) -> io::Result<()> {
    writeln!(out, "\nRole-level violations")?;
    writeln!(
        out,
        "{:<25} {:<12} {:<12} {:<12}",
        "ROLE", "TCODE 1", "TCODE 2", "RISK"
    )?;
    writeln!(out, "{}", "-".repeat(64))?;
    for v in violations {
        writeln!(
            out,
            "{:<25} {:<12} {:<12} {:<12}",
            truncate(v.role.as_str(), 23),
            truncate(v.code_low.as_str(), 12),
            truncate(v.code_high.as_str(), 12),
            truncate(v.severity.as_str(), 12)
        )?;
    }
    Ok(())
}

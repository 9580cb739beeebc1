//! JSON report output

use crate::error::CliResult;
use crate::formats::csv::{RoleViolationRecord, UserViolationRecord};
use serde::Serialize;
use sodscan_engine::{AnalysisReport, EntityCount, SeverityCount, RoleViolation, UserViolation};
use std::io::Write;

/// Full analysis output printed by `sodscan analyze --format json`
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    #[serde(flatten)]
    pub report: &'a AnalysisReport,
    pub severity_distribution: Vec<SeverityCount>,
    pub role_severity_distribution: Vec<SeverityCount>,
    pub top_users: Vec<EntityCount>,
    pub top_roles: Vec<EntityCount>,
}

impl<'a> JsonReport<'a> {
    /// Collect the report and its rankings
    pub fn new(report: &'a AnalysisReport, top_n: usize) -> Self {
        Self {
            report,
            severity_distribution: report.severity_distribution(),
            role_severity_distribution: report.role_severity_distribution(),
            top_users: report.top_users(top_n),
            top_roles: report.top_roles(top_n),
        }
    }
}

/// Write any value as pretty-printed JSON followed by a newline
pub fn write_pretty<T: Serialize + ?Sized, W: Write>(value: &T, mut writer: W) -> CliResult<()> {
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Write user-level violations as a JSON array in report layout
pub fn write_user_violations<W: Write>(violations: &[UserViolation], writer: W) -> CliResult<()> {
    let records: Vec<UserViolationRecord<'_>> = violations.iter().map(Into::into).collect();
    write_pretty(&records, writer)
}

/// Write role-level violations as a JSON array in report layout
pub fn write_role_violations<W: Write>(violations: &[RoleViolation], writer: W) -> CliResult<()> {
    let records: Vec<RoleViolationRecord<'_>> = violations.iter().map(Into::into).collect();
    write_pretty(&records, writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sodscan_engine::{analyze, AccessRow, RuleRow};

    fn report() -> AnalysisReport {
        analyze(
            &[RuleRow::new("TX1", "TX2", "High")],
            &[
                AccessRow::new("Alice", "R1", "TX1"),
                AccessRow::new("Alice", "R1", "TX2"),
                AccessRow::new("Bob", "R2", "TX1"),
            ],
        )
    }

    #[test]
    fn test_json_report_shape() {
        let report = report();
        let mut out = Vec::new();
        write_pretty(&JsonReport::new(&report, 5), &mut out).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["summary"]["conflict_pairs"], 1);
        assert_eq!(value["summary"]["users"], 2);
        assert_eq!(value["user_violations"][0]["code_low"], "TX1");
        assert_eq!(value["top_users"][0]["name"], "ALICE");
        assert_eq!(value["severity_distribution"][0]["severity"], "High");
        assert_eq!(value["role_severity_distribution"][0]["count"], 1);
        assert_eq!(value["rule_stats"]["indexed"], 1);
    }

    #[test]
    fn test_violation_files_use_report_columns() {
        let report = report();
        let mut out = Vec::new();
        write_user_violations(&report.user_violations, &mut out).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[0]["USER_NAME"], "ALICE");
        assert_eq!(value[0]["TCODE_2"], "TX2");
        assert_eq!(value[0]["RISK_FACTOR"], "High");

        let mut out = Vec::new();
        write_role_violations(&[], &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap().trim(), "[]");
    }
}

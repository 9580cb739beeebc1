//! Fuzz target for table extraction and detection.
//!
//! Arbitrary headers and cells must either fail the column check or produce
//! a report in which both detection strategies agree.
//!
//! Run with:
//! cargo +nightly fuzz run fuzz_table_analysis -- -max_total_time=600

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use sodscan_engine::{analyze_tables, AnalysisOptions, DetectionStrategy, RawTable, TableKind};

#[derive(Arbitrary, Debug)]
struct TableInput {
    extra_headers: Vec<String>,
    rule_rows: Vec<Vec<Option<String>>>,
    access_rows: Vec<Vec<Option<String>>>,
}

fn table(kind: TableKind, extra: &[String], rows: &[Vec<Option<String>>]) -> RawTable {
    let mut headers: Vec<String> = kind.required_columns().iter().map(|c| c.to_string()).collect();
    headers.extend(extra.iter().cloned());
    let mut table = RawTable::new(kind, headers);
    for row in rows {
        table.push_row(row.clone());
    }
    table
}

fuzz_target!(|input: TableInput| {
    if input.rule_rows.len() > 64 || input.access_rows.len() > 256 || input.extra_headers.len() > 8 {
        return;
    }

    let rules = table(TableKind::RuleBook, &input.extra_headers, &input.rule_rows);
    let access = table(TableKind::UserAccess, &input.extra_headers, &input.access_rows);

    let pairwise = analyze_tables(
        &rules,
        &access,
        &AnalysisOptions::new().with_strategy(DetectionStrategy::Pairwise),
    )
    .unwrap();
    let adjacency = analyze_tables(
        &rules,
        &access,
        &AnalysisOptions::new().with_strategy(DetectionStrategy::Adjacency),
    )
    .unwrap();

    assert_eq!(pairwise.user_violations, adjacency.user_violations);
    assert_eq!(pairwise.role_violations, adjacency.role_violations);
    for v in &pairwise.user_violations {
        assert!(v.code_low < v.code_high);
    }
    assert!(pairwise.summary.conflict_pairs <= rules.len());
});

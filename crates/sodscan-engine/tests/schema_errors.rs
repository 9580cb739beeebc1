//! Integration tests for table-level validation.

mod common;

use sodscan_engine::{
    analyze_tables, AnalysisOptions, Canonicalizer, EngineError, RawTable, TableKind,
};

use common::{access_table, cell, rule_table};

#[test]
fn test_missing_rule_column_names_table_and_column() {
    let rules = RawTable::new(TableKind::RuleBook, ["TCODE1", "TCODE2"]);
    let access = access_table(&[("u1", "R", "A")]);

    let err = analyze_tables(&rules, &access, &AnalysisOptions::default()).unwrap_err();
    assert_eq!(err.table(), TableKind::RuleBook);
    assert_eq!(
        err.to_string(),
        "rule book table is missing required column(s): ASK_RISK"
    );
}

#[test]
fn test_missing_access_columns_are_all_listed() {
    let rules = rule_table(&[("A", "B", "High")]);
    let access = RawTable::new(TableKind::UserAccess, ["USERNAME", "ROLE"]);

    match analyze_tables(&rules, &access, &AnalysisOptions::default()) {
        Err(EngineError::Schema { table, missing }) => {
            assert_eq!(table, TableKind::UserAccess);
            assert_eq!(missing, vec!["USER NAME", "AUTHORIZATION VALUE"]);
        }
        other => panic!("expected schema error, got {other:?}"),
    }
}

#[test]
fn test_schema_error_is_not_an_empty_result() {
    let rules = rule_table(&[]);
    let access = access_table(&[]);
    let report = analyze_tables(&rules, &access, &AnalysisOptions::default()).unwrap();
    assert!(!report.has_violations());

    let headerless = RawTable::new(TableKind::RuleBook, Vec::<String>::new());
    assert!(matches!(
        analyze_tables(&headerless, &access, &AnalysisOptions::default()),
        Err(EngineError::EmptyTable { .. })
    ));
}

#[test]
fn test_header_matching_ignores_case_and_spacing() {
    let mut rules = RawTable::new(TableKind::RuleBook, [" tcode1", "Tcode2 ", "ask_risk"]);
    rules.push_row(vec![cell("a"), cell("b"), cell("High")]);
    let mut access = RawTable::new(
        TableKind::UserAccess,
        ["user  name", " Role", "Authorization Value "],
    );
    access.push_row(vec![cell("u1"), cell("r"), cell("A")]);
    access.push_row(vec![cell("u1"), cell("r"), cell("B")]);

    let report = analyze_tables(&rules, &access, &AnalysisOptions::default()).unwrap();
    assert_eq!(report.user_violations.len(), 1);
    assert_eq!(report.role_violations.len(), 1);
}

#[test]
fn test_custom_markers_apply_to_tables() {
    let rules = rule_table(&[("A", "B", "N/A")]);
    let access = access_table(&[("u1", "R", "A"), ("u1", "R", "B"), ("u1", "N/A", "B")]);
    let options = AnalysisOptions::new()
        .with_canonicalizer(Canonicalizer::default().with_missing_markers(["n/a"]));

    let report = analyze_tables(&rules, &access, &options).unwrap();
    assert_eq!(report.user_violations[0].severity.as_str(), "Unspecified");
    assert_eq!(report.summary.roles, 1);
    assert_eq!(report.access_stats.missing_field, 1);
}

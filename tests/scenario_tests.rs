// Scenario Tests
//
// End-to-end cases over two-record and twelve-record data sets. The twelve
// row fixture reproduces the user profile table the statements were written
// against, with the expected verdicts and averages for each statement.

use sieve_lang::{
    AggregateError, CompileError, EvalError, ParseError, Record, RowError, Value, aggregate,
    compile,
    ingest::{IngestOptions, read_records_path},
    matches, select,
};

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/user_profiles.csv");

fn profiles() -> Vec<Record> {
    read_records_path(FIXTURE, &IngestOptions::default()).expect("fixture loads")
}

fn two_users() -> Vec<Record> {
    [("male", 10, 500), ("female", 25, 1000)]
        .into_iter()
        .map(|(gender, age, balance)| {
            Record::from([
                ("gender".to_string(), Value::from(gender)),
                ("age".to_string(), Value::Integer(age)),
                ("balance".to_string(), Value::Integer(balance)),
            ])
        })
        .collect()
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 0.1,
        "Expected {}, got {}",
        expected,
        actual
    );
}

// ============================================================================
// Two-record scenarios
// ============================================================================

#[test]
fn scenario_balance_gender_age() {
    let records = two_users();
    let stmt =
        compile(r#"user.balance >= 500 && user.gender == "female" && user.age <= 30"#).unwrap();

    assert_eq!(matches(&stmt, &records).unwrap(), vec![false, true]);

    let result = aggregate(&stmt, &records, "balance").unwrap();
    assert_eq!(result.match_count, 1);
    assert_eq!(result.average, 1000.0);
}

#[test]
fn scenario_gender_male() {
    let records = two_users();
    let stmt = compile(r#"user.gender == "male""#).unwrap();
    assert_eq!(matches(&stmt, &records).unwrap(), vec![true, false]);

    let selected = select(&stmt, &records).unwrap();
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0]["age"], Value::Integer(10));
}

#[test]
fn scenario_bare_user_fails_at_compile_time() {
    assert!(matches!(
        compile("user"),
        Err(CompileError::Parse(ParseError::InvalidFieldPath { .. }))
    ));
}

#[test]
fn scenario_non_bool_statement_fails_every_record() {
    let records = two_users();
    let stmt = compile("user.age").unwrap();

    for record in &records {
        assert_eq!(
            stmt.test(record),
            Err(EvalError::NonBoolResult { found: "integer" })
        );
    }
    assert_eq!(
        matches(&stmt, &records),
        Err(RowError {
            row: 0,
            source: EvalError::NonBoolResult { found: "integer" },
        })
    );
}

// ============================================================================
// Fixture scenarios
// ============================================================================

#[test]
fn fixture_always_true() {
    let records = profiles();
    let stmt = compile("true").unwrap();
    assert_eq!(matches(&stmt, &records).unwrap(), vec![true; 12]);
}

#[test]
fn fixture_female_under_thirty_with_id() {
    let records = profiles();
    let stmt = compile(
        r#"user.balance >= 500.0 && user.gender == "female" && user.age <= 30 && user.id == "yf2""#,
    )
    .unwrap();

    let mut expected = vec![false; 12];
    expected[7] = true;
    assert_eq!(matches(&stmt, &records).unwrap(), expected);
    assert_close(aggregate(&stmt, &records, "balance").unwrap().average, 1000.0);
}

#[test]
fn fixture_male() {
    let records = profiles();
    let stmt = compile(r#"user.gender == "male""#).unwrap();

    let expected: Vec<bool> = (0..12).map(|i| i < 6).collect();
    assert_eq!(matches(&stmt, &records).unwrap(), expected);

    let result = aggregate(&stmt, &records, "balance").unwrap();
    assert_eq!(result.match_count, 6);
    assert_close(result.average, 383.333333);
}

#[test]
fn fixture_female_under_thirty() {
    let records = profiles();
    let stmt =
        compile(r#"user.balance >= 500.0 && user.gender == "female" && user.age <= 30"#).unwrap();

    let mut expected = vec![false; 12];
    expected[6] = true;
    expected[7] = true;
    assert_eq!(matches(&stmt, &records).unwrap(), expected);
    assert_close(aggregate(&stmt, &records, "balance").unwrap().average, 950.0);
}

#[test]
fn fixture_non_bool_statement() {
    let records = profiles();
    let stmt = compile("user.gender").unwrap();
    for record in &records {
        assert_eq!(
            stmt.test(record),
            Err(EvalError::NonBoolResult { found: "string" })
        );
    }
}

#[test]
fn fixture_nothing_matches() {
    let records = profiles();
    let stmt = compile("user.age > 100").unwrap();
    assert_eq!(
        aggregate(&stmt, &records, "balance"),
        Err(AggregateError::NoMatches)
    );
}

#[test]
fn fixture_unknown_field_aborts_at_first_row() {
    let records = profiles();
    let stmt = compile("user.accountBalance > 0").unwrap();
    assert_eq!(
        matches(&stmt, &records),
        Err(RowError {
            row: 0,
            source: EvalError::UnknownField {
                field: "accountBalance".to_string()
            },
        })
    );
}

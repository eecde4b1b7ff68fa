mod common;

use assert_cmd::Command;

use common::fixture_path;

const LEDGER_FIXTURE: &str = "sales_data.txt";

fn table_data_lines(rendered: &str) -> Vec<&str> {
    rendered
        .lines()
        .skip(2)
        .filter(|line| !line.trim().is_empty())
        .collect()
}

#[test]
fn preview_limits_to_default_row_count() {
    let input = fixture_path(LEDGER_FIXTURE);
    let assert = Command::cargo_bin("sales-analytics")
        .expect("binary exists")
        .args(["preview", "-i", input.to_str().unwrap()])
        .assert()
        .success();

    let output = String::from_utf8(assert.get_output().stdout.clone()).expect("stdout");
    let data_lines = table_data_lines(&output);
    // The fixture parses to 11 records; the default preview stops at 10.
    assert_eq!(data_lines.len(), 10);
    assert!(output.lines().next().unwrap_or_default().contains("transaction"));
    assert!(data_lines[0].contains("T1001"));
    assert!(!output.contains("T1102"));
}

#[test]
fn preview_respects_rows_argument() {
    let input = fixture_path(LEDGER_FIXTURE);
    let assert = Command::cargo_bin("sales-analytics")
        .expect("binary exists")
        .args(["preview", "-i", input.to_str().unwrap(), "--rows", "3"])
        .assert()
        .success();

    let output = String::from_utf8(assert.get_output().stdout.clone()).expect("stdout");
    let data_lines = table_data_lines(&output);
    assert_eq!(data_lines.len(), 3);
    assert!(data_lines[2].contains("T1003"));
    assert!(data_lines[2].contains("Phone Grip"));
}

#[test]
fn preview_formats_cleaned_numeric_fields() {
    let input = fixture_path(LEDGER_FIXTURE);
    let assert = Command::cargo_bin("sales-analytics")
        .expect("binary exists")
        .args(["preview", "-i", input.to_str().unwrap(), "--rows", "2"])
        .assert()
        .success();

    let output = String::from_utf8(assert.get_output().stdout.clone()).expect("stdout");
    // The ledger carries "1,287.00"; the preview re-renders the parsed value
    // with thousands separators plus the derived amount.
    assert!(output.contains("1,287.00"));
    assert!(output.contains("32,175.00"));
}

#[test]
fn preview_shows_parsed_records_before_validation() {
    let input = fixture_path(LEDGER_FIXTURE);
    let assert = Command::cargo_bin("sales-analytics")
        .expect("binary exists")
        .args(["preview", "-i", input.to_str().unwrap(), "--rows", "11"])
        .assert()
        .success();

    let output = String::from_utf8(assert.get_output().stdout.clone()).expect("stdout");
    let data_lines = table_data_lines(&output);
    // Structurally invalid records still parse and still preview; only the
    // two-field line disappears.
    assert_eq!(data_lines.len(), 11);
    assert!(output.contains("X9999"));
    assert!(data_lines[9].contains("T1101"));
    assert!(data_lines[9].contains("-750.00"));
    assert!(!output.contains("short"));
}

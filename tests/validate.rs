mod common;

use std::fs;

use assert_cmd::Command;
use predicates::str::contains;

use common::{TestWorkspace, fixture_path};

const LEDGER_FIXTURE: &str = "sales_data.txt";

fn metric_line(output: &str, metric: &str) -> String {
    output
        .lines()
        .find(|line| line.starts_with(metric))
        .unwrap_or_else(|| panic!("metric '{metric}' missing from output"))
        .to_string()
}

#[test]
fn counts_cover_parsed_invalid_and_valid_records() {
    let input = fixture_path(LEDGER_FIXTURE);
    let assert = Command::cargo_bin("sales-analytics")
        .expect("binary exists")
        .args(["validate", "-i", input.to_str().unwrap()])
        .assert()
        .success();

    let output = String::from_utf8(assert.get_output().stdout.clone()).expect("stdout");
    assert!(metric_line(&output, "records parsed").ends_with("11"));
    assert!(metric_line(&output, "invalid records").ends_with("3"));
    assert!(metric_line(&output, "excluded by filters").ends_with("0"));
    assert!(metric_line(&output, "valid records").ends_with("8"));
}

#[test]
fn unfiltered_run_lists_the_filter_options() {
    let input = fixture_path(LEDGER_FIXTURE);
    Command::cargo_bin("sales-analytics")
        .expect("binary exists")
        .args(["validate", "-i", input.to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains("Filterable regions: East, North, South, West"))
        .stdout(contains("Amount range: 120.00 to 32,175.00"));
}

#[test]
fn region_filter_moves_records_to_excluded() {
    let input = fixture_path(LEDGER_FIXTURE);
    let assert = Command::cargo_bin("sales-analytics")
        .expect("binary exists")
        .args(["validate", "-i", input.to_str().unwrap(), "--region", "West"])
        .assert()
        .success();

    let output = String::from_utf8(assert.get_output().stdout.clone()).expect("stdout");
    assert!(metric_line(&output, "invalid records").ends_with("3"));
    assert!(metric_line(&output, "excluded by filters").ends_with("6"));
    assert!(metric_line(&output, "valid records").ends_with("2"));
    assert!(!output.contains("Filterable regions"));
}

#[test]
fn zero_minimum_counts_as_an_active_filter() {
    let input = fixture_path(LEDGER_FIXTURE);
    let assert = Command::cargo_bin("sales-analytics")
        .expect("binary exists")
        .args(["validate", "-i", input.to_str().unwrap(), "--min-amount", "0"])
        .assert()
        .success();

    let output = String::from_utf8(assert.get_output().stdout.clone()).expect("stdout");
    // Every amount is positive, so the bound excludes nothing, but it still
    // suppresses the filter-option discovery.
    assert!(metric_line(&output, "valid records").ends_with("8"));
    assert!(!output.contains("Filterable regions"));
}

#[test]
fn dash_input_reads_the_ledger_from_stdin() {
    let ledger = fs::read_to_string(fixture_path(LEDGER_FIXTURE)).expect("fixture");
    let assert = Command::cargo_bin("sales-analytics")
        .expect("binary exists")
        .args(["validate", "-i", "-"])
        .write_stdin(ledger)
        .assert()
        .success();

    let output = String::from_utf8(assert.get_output().stdout.clone()).expect("stdout");
    assert!(metric_line(&output, "records parsed").ends_with("11"));
    assert!(metric_line(&output, "valid records").ends_with("8"));
}

#[test]
fn explicit_encoding_decodes_non_utf8_input() {
    let ws = TestWorkspace::new();
    let path = ws.path().join("latin.txt");
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"TransactionID|Date|ProductID|ProductName|Quantity|UnitPrice|CustomerID|Region\n");
    bytes.extend_from_slice(b"T1|2024-01-01|P1|Caf\xE9 Mug|2|10.00|C1|North\n");
    fs::write(&path, &bytes).expect("write ledger");

    let assert = Command::cargo_bin("sales-analytics")
        .expect("binary exists")
        .args([
            "validate",
            "-i",
            path.to_str().unwrap(),
            "--input-encoding",
            "windows-1252",
        ])
        .assert()
        .success();

    let output = String::from_utf8(assert.get_output().stdout.clone()).expect("stdout");
    assert!(metric_line(&output, "valid records").ends_with("1"));
}

#[test]
fn default_decoding_falls_back_with_a_warning() {
    let ws = TestWorkspace::new();
    let path = ws.path().join("latin.txt");
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"TransactionID|Date|ProductID|ProductName|Quantity|UnitPrice|CustomerID|Region\n");
    bytes.extend_from_slice(b"T1|2024-01-01|P1|Caf\xE9 Mug|2|10.00|C1|North\n");
    fs::write(&path, &bytes).expect("write ledger");

    let assert = Command::cargo_bin("sales-analytics")
        .expect("binary exists")
        .args(["validate", "-i", path.to_str().unwrap()])
        .assert()
        .success()
        .stderr(contains("windows-1252"));

    let output = String::from_utf8(assert.get_output().stdout.clone()).expect("stdout");
    assert!(metric_line(&output, "valid records").ends_with("1"));
}

#[test]
fn unknown_encoding_label_fails() {
    let input = fixture_path(LEDGER_FIXTURE);
    Command::cargo_bin("sales-analytics")
        .expect("binary exists")
        .args([
            "validate",
            "-i",
            input.to_str().unwrap(),
            "--input-encoding",
            "klingon",
        ])
        .assert()
        .failure()
        .stderr(contains("Unknown encoding"));
}

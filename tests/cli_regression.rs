// Regression tests for the topchem binary.
// Requires: assert_cmd, predicates crates in [dev-dependencies]

use std::fs;

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};

fn topchem() -> Command {
    let mut cmd = Command::cargo_bin("topchem").unwrap();
    cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

#[test]
fn cli_check_accepts_valid_topology() {
    topchem()
        .args(["check", "tests/fixtures/topol.top"])
        .assert()
        .success()
        .stdout(contains("ok tests/fixtures/topol.top").and(contains("1 of 1 files parsed")));
}

#[test]
fn cli_check_reports_caret_diagnostic() {
    topchem()
        .args(["check", "tests/fixtures/ff"])
        .assert()
        .failure()
        .code(1)
        .stdout(
            contains("FAILED tests/fixtures/ff/broken.itp")
                .and(contains("ok tests/fixtures/ff/forcefield.itp")),
        )
        .stderr(
            contains(
                "Topology Parser error while reading tests/fixtures/ff/broken.itp at line 1, column 8:",
            )
            .and(contains("1: [ atoms"))
            .and(contains("- Right square bracket: `]`")),
        );
}

#[test]
fn cli_check_fancy_prints_miette_report() {
    topchem()
        .args(["check", "--fancy", "tests/fixtures/ff/broken.itp"])
        .assert()
        .failure()
        .stderr(contains("topchem::parse").and(contains("Right square bracket")));
}

#[test]
fn cli_label_and_span_flags_shape_the_diagnostic() {
    let bad_file = std::env::temp_dir().join(format!("topchem-cli-{}.itp", std::process::id()));
    fs::write(&bad_file, "[ moleculetype\n").unwrap();

    topchem()
        .args(["--label", "Strict Parser", "--span", "3", "check"])
        .arg(&bad_file)
        .assert()
        .failure()
        .stderr(contains("Strict Parser error while reading").and(contains("\n1: ype\n")));

    let _ = fs::remove_file(&bad_file);
}

#[test]
fn cli_options_file_is_loaded() {
    let options = std::env::temp_dir().join(format!("topchem-options-{}.json", std::process::id()));
    fs::write(&options, r#"{"parser_label": "From File"}"#).unwrap();

    topchem()
        .arg("--options")
        .arg(&options)
        .args(["check", "tests/fixtures/ff/broken.itp"])
        .assert()
        .failure()
        .stderr(contains("From File error while reading"));

    let _ = fs::remove_file(&options);
}

#[test]
fn cli_tree_prints_nodes() {
    topchem()
        .args(["tree", "tests/fixtures/topol.top"])
        .assert()
        .success()
        .stdout(
            contains("topology\n")
                .and(contains("  include\t\"ff/forcefield.itp\"\n"))
                .and(contains("  section_header\tatoms\n")),
        );
}

#[test]
fn cli_tree_json() {
    let output = topchem()
        .args(["tree", "--json", "tests/fixtures/topol.top"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["children"][0]["node"], "LineComment");
}

#[test]
fn cli_tokens_lists_positions() {
    topchem()
        .args(["tokens", "tests/fixtures/ff/forcefield.itp"])
        .assert()
        .success()
        .stdout(contains("1:1 _DEFINE \"#define\"").and(contains("1:18 _NEWLINE \"\\n\"")));
}

#[test]
fn cli_explain_terminals() {
    topchem()
        .args(["explain", "SIGNED_INT", "NOPE"])
        .assert()
        .success()
        .stdout(
            contains("SIGNED_INT: Integer with optional sign: `1234`, `-1234`\n")
                .and(contains("NOPE: NOPE\n")),
        );
}

#[test]
fn cli_missing_file_fails() {
    topchem()
        .args(["tree", "tests/fixtures/missing.top"])
        .assert()
        .failure()
        .stderr(contains("failed to read tests/fixtures/missing.top"));
}

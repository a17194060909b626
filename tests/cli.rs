use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};

const OLD_JSON: &str = r#"{"nodes":[{"xname":"x1c0s0b0n0","bmc_mac":"aa:bb","group":"g1"}]}"#;
const OLD_YAML: &str = "nodes:\n- xname: x1c0s0b0n0\n  bmc_mac: aa:bb\n  group: g1\n";

fn old2new() -> Command {
    let mut cmd = Command::cargo_bin("old2new").expect("Binary exists");
    cmd.env_remove("RUST_LOG")
        .env_remove("OLD2NEW_IN_FORMAT")
        .env_remove("OLD2NEW_OUT_FORMAT");
    cmd
}

fn expected() -> Value {
    json!({
        "bmcs": [{"xname": "x1c0s0b0", "mac": "aa:bb"}],
        "nodes": [{"xname": "x1c0s0b0n0", "groups": ["g1"], "bmc": "x1c0s0b0"}]
    })
}

#[test]
fn converts_json_and_matches_output_format() {
    let assert = old2new().write_stdin(OLD_JSON).assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert_eq!(
        stdout,
        "{\n  \"bmcs\": [\n    {\n      \"xname\": \"x1c0s0b0\",\n      \"mac\": \"aa:bb\"\n    }\n  ],\n  \"nodes\": [\n    {\n      \"xname\": \"x1c0s0b0n0\",\n      \"groups\": [\n        \"g1\"\n      ],\n      \"bmc\": \"x1c0s0b0\"\n    }\n  ]\n}\n"
    );
    let parsed: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed, expected());
}

#[test]
fn missing_nodes_exits_with_two_and_writes_nothing() {
    old2new()
        .write_stdin("{}")
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("nodes").and(predicate::function(|s: &str| {
            s.trim_end().lines().count() == 1
        })));
}

#[test]
fn top_level_sequence_is_a_schema_error() {
    old2new()
        .write_stdin("[1, 2, 3]")
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("mapping"));
}

#[test]
fn forced_json_rejects_non_json() {
    old2new()
        .args(["-i", "json"])
        .write_stdin(OLD_YAML)
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::starts_with("Failed to parse input as JSON"));
}

#[test]
fn unknown_format_is_a_usage_error() {
    old2new()
        .args(["--in-format", "xml"])
        .write_stdin(OLD_JSON)
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty());
}

#[test]
fn help_lists_examples() {
    old2new()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Examples:").and(predicate::str::contains("--out-format")));
}

#[test]
fn verbose_logs_stay_off_stdout() {
    let assert = old2new().arg("-vvv").write_stdin(OLD_JSON).assert().success();
    let parsed: Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(parsed, expected());
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).into_owned();
    assert!(stderr.contains("Conversion complete"), "stderr was: {stderr}");
}

#[cfg(feature = "yaml")]
mod yaml {
    use super::*;

    #[test]
    fn detects_yaml_and_writes_yaml() {
        let assert = old2new().write_stdin(OLD_YAML).assert().success();
        let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
        assert!(stdout.starts_with("bmcs:"), "unexpected output:\n{stdout}");
        assert!(!stdout.contains('{'));
        assert!(stdout.contains("bmc: x1c0s0b0"));
    }

    #[test]
    fn yaml_in_json_out() {
        let assert = old2new()
            .args(["-o", "json"])
            .write_stdin(OLD_YAML)
            .assert()
            .success();
        let parsed: Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
        assert_eq!(parsed, expected());
    }

    #[test]
    fn json_in_yaml_out() {
        old2new()
            .args(["--out-format", "yaml"])
            .write_stdin(OLD_JSON)
            .assert()
            .success()
            .stdout(predicate::str::starts_with("bmcs:").and(predicate::str::contains("- g1")));
    }

    #[test]
    fn output_format_can_come_from_environment() {
        let assert = old2new()
            .env("OLD2NEW_OUT_FORMAT", "json")
            .write_stdin(OLD_YAML)
            .assert()
            .success();
        let parsed: Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
        assert_eq!(parsed, expected());
    }

    #[test]
    fn flag_beats_environment() {
        old2new()
            .env("OLD2NEW_OUT_FORMAT", "json")
            .args(["-o", "yaml"])
            .write_stdin(OLD_JSON)
            .assert()
            .success()
            .stdout(predicate::str::starts_with("bmcs:"));
    }

    #[test]
    fn invalid_yaml_exits_with_two() {
        old2new()
            .write_stdin("nodes: [unclosed")
            .assert()
            .code(2)
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::starts_with("Failed to parse input as YAML"));
    }

    #[test]
    fn empty_input_is_a_schema_error() {
        old2new()
            .write_stdin("")
            .assert()
            .code(2)
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains("mapping"));
    }
}

#[cfg(not(feature = "yaml"))]
#[test]
fn yaml_input_without_yaml_support_is_a_capability_error() {
    old2new()
        .write_stdin(OLD_YAML)
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("YAML support is not available"));
}

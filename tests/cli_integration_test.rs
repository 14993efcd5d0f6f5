//! Integration tests for the clustereval binary.

use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

const INSTANCE: &str = r#"{
    "name": "five_transistor_ota",
    "group": "small",
    "ground_truth": [
        ["DiffPair", ["m1", "m2"]],
        ["CM", ["m3", "m4"]]
    ],
    "predicted": [
        ["DiffPair", ["m1", "m2"]],
        ["Inverter", ["m3", "m4"]]
    ]
}"#;

fn clustereval(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("clustereval").unwrap();
    cmd.current_dir(dir.path())
        .env("NO_COLOR", "1")
        .env("CLUSTEREVAL_QUIET", "1")
        .env_remove("CLUSTEREVAL_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

fn bench_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("bench")).unwrap();
    fs::write(dir.path().join("bench").join("ota.json"), INSTANCE).unwrap();
    dir
}

#[test]
fn test_evaluate_json_to_stdout() {
    let dir = bench_dir();

    let output = clustereval(&dir)
        .args(["evaluate", "bench", "--format", "json", "-s", "existence"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: Value = serde_json::from_slice(&output).expect("stdout is JSON");
    assert_eq!(json["strategy"], "existence");
    assert_eq!(json["overall"]["Average Precision"], 1.0);
    assert_eq!(json["instances"][0]["name"], "five_transistor_ota");
}

#[test]
fn test_count_instances_report_average_ace() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("diodes.json"),
        r#"{
            "name": "bandgap_diodes",
            "ground_truth": {"number_of_diode_connected_transistors": 3, "transistor_names": ["M5", "M12", "M15"]},
            "predicted": {"number_of_diode_connected_transistors": 1, "transistor_names": ["M5"]}
        }"#,
    )
    .unwrap();

    let output = clustereval(&dir)
        .args(["evaluate", "diodes.json", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: Value = serde_json::from_slice(&output).expect("stdout is JSON");
    assert_eq!(json["instances"][0]["ACE"], 2);
    assert_eq!(json["overall"]["Average ACE"], 2.0);
    assert_eq!(json["overall"]["Average Precision"], 1.0);
}

#[test]
fn test_evaluate_terminal_table_to_file() {
    let dir = bench_dir();

    clustereval(&dir)
        .args([
            "evaluate",
            "bench",
            "--per-instance",
            "--no-parallel",
            "-o",
            "out/report.txt",
        ])
        .assert()
        .success();

    let report = fs::read_to_string(dir.path().join("out").join("report.txt")).unwrap();
    assert!(report.contains("Cluster Evaluation Report"));
    assert!(report.contains("five_transistor_ota"));
    assert!(report.contains("0.5000"));
}

#[test]
fn test_config_file_selects_strategy() {
    let dir = bench_dir();
    fs::write(
        dir.path().join(".clustereval.toml"),
        "[scoring]\nstrategy = \"label-pairs\"\n[output]\nformat = \"json\"\n",
    )
    .unwrap();

    let output = clustereval(&dir)
        .args(["evaluate", "bench"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["strategy"], "label-pairs");
}

#[test]
fn test_confusion_markdown() {
    let dir = bench_dir();

    let output = clustereval(&dir)
        .args(["confusion", "bench", "-f", "markdown", "--no-merge"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let text = String::from_utf8(output).unwrap();
    assert!(text.contains("# Label Confusion"));
    assert!(text.contains("| **CM** | 0 | 2 |"));
}

#[test]
fn test_missing_input_fails() {
    let dir = TempDir::new().unwrap();
    clustereval(&dir)
        .args(["evaluate", "does-not-exist"])
        .assert()
        .failure();
}

#[test]
fn test_init_writes_config_once() {
    let dir = TempDir::new().unwrap();

    clustereval(&dir).arg("init").assert().success();
    assert!(dir.path().join(".clustereval.toml").is_file());

    clustereval(&dir).arg("init").assert().failure();
    clustereval(&dir).args(["init", "--force"]).assert().success();
}

//! Integration tests for the `trainbox-cli run` command.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn trainbox(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("trainbox-cli").unwrap();
    cmd.current_dir(dir).env_remove("TRAINBOX_ML_ROOT").env_remove("TRAINBOX_TRAINER");
    cmd
}

/// Writes the conventional input layout under `root`.
fn write_inputs(root: &Path, config: Option<&str>, data: Option<&str>) {
    let config_dir = root.join("input").join("config");
    let data_dir = root.join("input").join("data").join("training");
    fs::create_dir_all(&config_dir).unwrap();
    fs::create_dir_all(&data_dir).unwrap();
    if let Some(config) = config {
        fs::write(config_dir.join("hyperparameters.json"), config).unwrap();
    }
    if let Some(data) = data {
        fs::write(data_dir.join("train.csv"), data).unwrap();
    }
}

fn model_path(root: &Path, file: &str) -> PathBuf {
    root.join("model").join(file)
}

#[test]
fn test_run_writes_artifact_and_exits_zero() {
    let temp = TempDir::new().unwrap();
    write_inputs(temp.path(), Some(r#"{"epochs": 1}"#), Some("x,y\n1,2\n3,4\n5,6\n"));

    trainbox(temp.path())
        .arg("run")
        .arg("--ml-root")
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Training complete"));

    let artifact = fs::read(model_path(temp.path(), "model.json")).unwrap();
    assert!(!artifact.is_empty());
}

#[test]
fn test_placeholder_trainer_matches_legacy_output() {
    let temp = TempDir::new().unwrap();
    write_inputs(temp.path(), Some(r#"{"epochs": "1"}"#), Some("x,y\n1,2\n"));

    trainbox(temp.path())
        .args(["run", "--trainer", "placeholder", "--ml-root"])
        .arg(temp.path())
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(model_path(temp.path(), "model.txt")).unwrap(),
        "Trained model artifact"
    );
}

#[test]
fn test_explicit_paths_and_json_report() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("hp.toml");
    let data = temp.path().join("data.tsv");
    let output = temp.path().join("out").join("artifact.json");
    fs::write(&config, "epochs = 2\n").unwrap();
    fs::write(&data, "a\tb\n1\t2\n3\t4\n").unwrap();

    let assert = trainbox(temp.path())
        .arg("run")
        .arg("--config")
        .arg(&config)
        .arg("--data")
        .arg(&data)
        .arg("--output")
        .arg(&output)
        .args(["--delimiter", "\t", "--json"])
        .assert()
        .success();

    let report: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(report["trainer"], "summary");
    assert_eq!(report["dataset_shape"], serde_json::json!([2, 2]));
    assert_eq!(report["artifact"]["sha256"].as_str().unwrap().len(), 64);
    assert!(output.exists());
}

#[test]
fn test_missing_config_reports_config_error() {
    let temp = TempDir::new().unwrap();
    write_inputs(temp.path(), None, Some("x,y\n1,2\n"));

    trainbox(temp.path())
        .arg("run")
        .arg("--ml-root")
        .arg(temp.path())
        .assert()
        .code(3)
        .stderr(predicate::str::contains("ConfigError:"));

    assert!(!model_path(temp.path(), "model.json").exists());
}

#[test]
fn test_malformed_config_exits_non_zero_without_artifact() {
    let temp = TempDir::new().unwrap();
    write_inputs(temp.path(), Some("{\"epochs\": 1"), Some("x,y\n1,2\n"));

    trainbox(temp.path())
        .arg("run")
        .arg("--ml-root")
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("ConfigError:"));

    assert!(!model_path(temp.path(), "model.json").exists());
}

#[test]
fn test_header_only_dataset_reports_data_error() {
    let temp = TempDir::new().unwrap();
    write_inputs(temp.path(), Some("{}"), Some("x,y\n"));

    trainbox(temp.path())
        .arg("run")
        .arg("--ml-root")
        .arg(temp.path())
        .assert()
        .code(4)
        .stderr(predicate::str::contains("DataError:"));

    assert!(!model_path(temp.path(), "model.json").exists());
}

#[test]
fn test_unwritable_output_reports_io_error() {
    let temp = TempDir::new().unwrap();
    write_inputs(temp.path(), Some("{}"), Some("x,y\n1,2\n"));
    fs::write(temp.path().join("model"), "a file, not a directory").unwrap();

    trainbox(temp.path())
        .arg("run")
        .arg("--ml-root")
        .arg(temp.path())
        .assert()
        .code(5)
        .stderr(predicate::str::contains("IOError:"));
}

#[test]
fn test_unknown_trainer_is_usage_error() {
    let temp = TempDir::new().unwrap();
    write_inputs(temp.path(), Some("{}"), Some("x,y\n1,2\n"));

    trainbox(temp.path())
        .args(["run", "--trainer", "xgboost", "--ml-root"])
        .arg(temp.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unknown trainer `xgboost`"));
}

#[test]
fn test_settings_file_and_env_select_trainer() {
    let temp = TempDir::new().unwrap();
    write_inputs(temp.path(), Some("{}"), Some("x;y\n1;2\n"));
    fs::write(
        temp.path().join(".trainboxrc"),
        format!("ml_root = {:?}\ndelimiter = \";\"\ntrainer = \"summary\"\n", temp.path().display().to_string()),
    )
    .unwrap();

    trainbox(temp.path())
        .env("TRAINBOX_TRAINER", "placeholder")
        .arg("run")
        .assert()
        .success();

    assert!(model_path(temp.path(), "model.txt").exists());
    assert!(!model_path(temp.path(), "model.json").exists());
}

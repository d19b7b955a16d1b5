//! Binary-level tests for the simple-sqs command.
//!
//! None of these reach a queue service: each one fails or exits before a
//! session is established.

use assert_cmd::Command;
use predicates::prelude::*;

fn simple_sqs() -> Command {
    let mut cmd = Command::cargo_bin("simple-sqs").unwrap();
    cmd.env_remove("SIMPLE_SQS_CONFIG")
        .env_remove("SIMPLE_SQS__REGION")
        .env_remove("SIMPLE_SQS__QUEUE_NAME")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_commands() {
    simple_sqs()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("send"))
        .stdout(predicate::str::contains("receive"));
}

#[test]
fn test_missing_region_exits_with_configuration_code() {
    simple_sqs()
        .args(["--queue-name", "testQueue", "send", "hello"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("No region specified"));
}

#[test]
fn test_missing_queue_name_exits_with_configuration_code() {
    simple_sqs()
        .args(["--region", "us-east-1", "receive"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No queue_name specified"));
}

#[test]
fn test_invalid_queue_name_exits_with_configuration_code() {
    simple_sqs()
        .args(["--region", "us-east-1", "--queue-name", "bad name", "send", "x"])
        .assert()
        .code(1);
}

#[test]
fn test_config_file_values_are_validated() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("simple-sqs.toml");
    std::fs::write(&path, "region = \"us-east-1\"\n").unwrap();

    simple_sqs()
        .arg("--config")
        .arg(&path)
        .args(["send", "hello"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("queue_name"));
}

#[test]
fn test_malformed_attribute_is_usage_error() {
    simple_sqs()
        .args(["send", "hello", "--attribute", "novalue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no `=` found"));
}

#[test]
fn test_bad_log_level_is_printed() {
    simple_sqs()
        .args(["--log-level", "simple_sqs=loud", "receive"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("log-level"));
}

// ABOUTME: CLI argument handling tests using assert_cmd.
// ABOUTME: Exercises clap-level errors only; no cluster is contacted.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_lists_the_deploy_command() {
    Command::cargo_bin("stolos")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("deploy"));
}

#[test]
fn deploy_requires_a_namespace() {
    Command::cargo_bin("stolos")
        .unwrap()
        .args(["deploy", "-c", "stack.yml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--namespace"));
}

#[test]
fn invalid_timeout_is_rejected() {
    Command::cargo_bin("stolos")
        .unwrap()
        .args(["deploy", "-c", "stack.yml", "-n", "demo", "--timeout", "soon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--timeout"));
}

#[test]
fn quiet_and_json_conflict() {
    Command::cargo_bin("stolos")
        .unwrap()
        .args([
            "deploy", "-c", "stack.yml", "-n", "demo", "--quiet", "--json",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--json"));
}

//! Integration tests for the rdoit binary

mod common;

use assert_cmd::Command;
use common::create_test_config;
use predicates::prelude::*;
use std::fs;

const TASKS: &str = r#"
tasks:
  - name: hello
    title: Say hello
    cmd: [echo, hello]
    dependencies: [input.txt]
  - name: after
    title: After hello
    cmd: [echo, after]
"#;

fn rdoit() -> Command {
    Command::cargo_bin("rdoit").unwrap()
}

#[test]
fn test_run_then_up_to_date() {
    let (temp_dir, config_path) = create_test_config(TASKS);
    fs::write(temp_dir.path().join("input.txt"), "data").unwrap();

    rdoit()
        .arg("-f")
        .arg(&config_path)
        .assert()
        .success()
        .stdout("Say hello\nAfter hello\n");

    rdoit()
        .arg("-f")
        .arg(&config_path)
        .arg("run")
        .arg("hello")
        .assert()
        .success()
        .stdout("--- Say hello\n");

    assert!(temp_dir.path().join(".rdoit.json").exists());
}

#[test]
fn test_failure_exit_code() {
    let (_temp_dir, config_path) = create_test_config(
        r#"
tasks:
  - name: broken
    title: Broken
    cmd: [sh, -c, "echo partial; exit 1"]
  - name: never
    title: Never
    cmd: [echo, never]
"#,
    );

    rdoit()
        .arg("-f")
        .arg(&config_path)
        .assert()
        .code(1)
        .stdout("Broken\npartial\nTask failed\n");
}

#[test]
fn test_error_exit_code() {
    let (_temp_dir, config_path) = create_test_config(
        r#"
tasks:
  - name: missing
    title: Missing
    cmd: [rdoit-no-such-program]
"#,
    );

    rdoit()
        .arg("-f")
        .arg(&config_path)
        .assert()
        .code(2)
        .stdout("Missing\nTask error\n");
}

#[test]
fn test_forget_makes_task_run_again() {
    let (temp_dir, config_path) = create_test_config(TASKS);
    fs::write(temp_dir.path().join("input.txt"), "data").unwrap();

    rdoit().arg("-f").arg(&config_path).assert().success();

    rdoit()
        .arg("-f")
        .arg(&config_path)
        .args(["forget", "hello"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Forgot 'hello'"));

    rdoit()
        .arg("-f")
        .arg(&config_path)
        .args(["run", "hello"])
        .assert()
        .success()
        .stdout("Say hello\n");
}

#[test]
fn test_list_tasks() {
    let (_temp_dir, config_path) = create_test_config(TASKS);

    rdoit()
        .arg("-f")
        .arg(&config_path)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("hello  Say hello"))
        .stdout(predicate::str::contains("after  After hello"));
}

#[test]
fn test_unknown_task() {
    let (_temp_dir, config_path) = create_test_config(TASKS);

    rdoit()
        .arg("-f")
        .arg(&config_path)
        .args(["run", "nope"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Task 'nope' is not defined"));
}

#[test]
fn test_unusable_dep_file() {
    let (temp_dir, config_path) = create_test_config(TASKS);
    let blocker = temp_dir.path().join("file");
    fs::write(&blocker, "").unwrap();

    rdoit()
        .arg("-f")
        .arg(&config_path)
        .arg("--dep-file")
        .arg(blocker.join("db.json"))
        .assert()
        .code(3)
        .stdout("");
}

#[test]
fn test_completions() {
    rdoit()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("rdoit"));
}

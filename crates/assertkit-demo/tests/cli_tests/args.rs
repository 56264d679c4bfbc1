//! CLI argument handling.

use crate::{TestResult, demo};
use predicates::prelude::*;

#[test]
fn test_help_lists_subcommands() -> TestResult {
    demo()?
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("formats"))
        .stdout(predicate::str::contains("deferred"))
        .stdout(predicate::str::contains("--verbose"));
    Ok(())
}

#[test]
fn test_version() -> TestResult {
    demo()?
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("assertkit-demo"));
    Ok(())
}

#[test]
fn test_missing_subcommand() -> TestResult {
    demo()?.assert().failure();
    Ok(())
}

#[test]
fn test_unknown_format_rejected() -> TestResult {
    demo()?
        .args(["basic", "--format", "xml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown format"));
    Ok(())
}

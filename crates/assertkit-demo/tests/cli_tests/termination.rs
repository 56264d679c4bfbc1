//! Termination policies.

use crate::{TestResult, demo};
use predicates::prelude::*;

#[test]
fn test_deferred_batch_exits_once() -> TestResult {
    demo()?
        .arg("deferred")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("queued 2 deferred failures"))
        .stderr(predicate::str::contains("Deferred Nil Assertion"))
        .stderr(predicate::str::contains("Deferred Assert Failure"))
        .stderr(predicate::str::contains("\n---\n"));
    Ok(())
}

#[test]
fn test_custom_exit_does_not_exit() -> TestResult {
    demo()?
        .arg("custom-exit")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Custom exit called with code: 1, but not exiting",
        ))
        .stderr(predicate::str::contains("Custom Exit Assertion Failed"));
    Ok(())
}

#[test]
fn test_crash_on_failure_exits_with_one() -> TestResult {
    demo()?
        .arg("crash")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("This will exit the program"))
        .stdout(predicate::str::contains("unreachable").not());
    Ok(())
}

//! Report formats.

use crate::{TestResult, demo};
use predicates::prelude::*;

#[test]
fn test_basic_reports_to_stderr_and_continues() -> TestResult {
    demo()?
        .arg("basic")
        .assert()
        .success()
        .stderr(predicate::str::contains("ASSERT"))
        .stderr(predicate::str::contains(
            "msg=Basic Assertion Failed: 2 is not equal to 1",
        ))
        .stderr(predicate::str::contains("lhs=2"));
    Ok(())
}

#[test]
fn test_formats_subcommand() -> TestResult {
    demo()?
        .arg("formats")
        .assert()
        .success()
        .stdout(predicate::str::contains("msg=Text Format Assertion Failed"))
        .stdout(predicate::str::contains(
            r#""msg": "JSON Format Assertion Failed""#,
        ))
        .stdout(predicate::str::contains("msg: YAML Format Assertion Failed"));
    Ok(())
}

#[test]
fn test_global_format_flag() -> TestResult {
    demo()?
        .args(["basic", "--format", "json"])
        .assert()
        .success()
        .stderr(predicate::str::contains(r#""assertData": {"#))
        .stderr(predicate::str::contains(r#""area": "Assert""#))
        .stderr(predicate::str::contains(r#""stack""#).not());
    Ok(())
}

#[test]
fn test_ergonomic_failures_do_not_stop_the_process() -> TestResult {
    demo()?
        .arg("ergonomic")
        .assert()
        .success()
        .stdout(predicate::str::contains("Program completed successfully!"))
        .stdout(predicate::str::contains("msg=Custom writer"))
        .stderr(predicate::str::contains("This will fail but program continues"))
        .stderr(predicate::str::contains("Strings should match"))
        .stderr(predicate::str::contains("error=invalid digit found in string"))
        .stderr(predicate::str::contains("Silent assertion").not())
        .stderr(predicate::str::contains("Basic assertion should pass").not());
    Ok(())
}

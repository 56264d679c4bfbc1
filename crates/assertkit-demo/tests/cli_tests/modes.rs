//! Debug, verbose and preset modes.

use crate::{TestResult, demo};
use predicates::prelude::*;

#[test]
fn test_default_mode_has_no_stack() -> TestResult {
    demo()?
        .arg("basic")
        .assert()
        .success()
        .stderr(predicate::str::contains("stack backtrace:").not())
        .stderr(predicate::str::contains("ARGS:").not());
    Ok(())
}

#[test]
fn test_debug_flag_adds_stack() -> TestResult {
    demo()?
        .args(["basic", "--debug"])
        .assert()
        .success()
        .stderr(predicate::str::contains("stack backtrace:"))
        .stderr(predicate::str::contains("ARGS:").not());
    Ok(())
}

#[test]
fn test_verbose_flag_adds_args() -> TestResult {
    demo()?
        .args(["basic", "--verbose"])
        .assert()
        .success()
        .stderr(predicate::str::contains("stack backtrace:"))
        .stderr(predicate::str::contains("ARGS: [lhs 2 rhs 1]"));
    Ok(())
}

#[test]
fn test_modes_subcommand() -> TestResult {
    demo()?
        .arg("modes")
        .assert()
        .success()
        .stdout(predicate::str::contains("=== PRODUCTION DEFAULTS (Clean JSON) ==="))
        .stdout(predicate::str::contains("msg=Custom writer with verbose mode"))
        .stdout(predicate::str::contains("Program completed"))
        .stderr(predicate::str::contains("msg=Default mode - clean output"))
        .stderr(predicate::str::contains("msg=Debug mode - includes stack trace"))
        .stderr(predicate::str::contains(
            r#""msg": "Production defaults are clean""#,
        ));
    Ok(())
}

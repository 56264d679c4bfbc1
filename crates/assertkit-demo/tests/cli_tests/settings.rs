//! YAML settings file.

use crate::{TestResult, demo};
use predicates::prelude::*;
use tempfile::TempDir;

#[test]
fn test_settings_select_yaml_on_stdout() -> TestResult {
    let dir = TempDir::new()?;
    let path = dir.path().join("assertkit.yaml");
    std::fs::write(&path, "format: yaml\noutput: stdout\n")?;

    demo()?
        .arg("basic")
        .arg("--settings")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("assertData:"))
        .stdout(predicate::str::contains("lhs: 2"))
        .stdout(predicate::str::contains(
            "Basic Assertion Failed: 2 is not equal to 1",
        ))
        .stderr(predicate::str::contains("ASSERT").not());
    Ok(())
}

#[test]
fn test_flags_override_settings() -> TestResult {
    let dir = TempDir::new()?;
    let path = dir.path().join("assertkit.yaml");
    std::fs::write(&path, "format: yaml\n")?;

    demo()?
        .args(["basic", "--format", "text", "--settings"])
        .arg(&path)
        .assert()
        .success()
        .stderr(predicate::str::contains("   msg=Basic Assertion Failed"));
    Ok(())
}

#[test]
fn test_invalid_settings_is_config_error() -> TestResult {
    let dir = TempDir::new()?;
    let path = dir.path().join("assertkit.yaml");
    std::fs::write(&path, "on-failure: explode\n")?;

    demo()?
        .arg("basic")
        .arg("--settings")
        .arg(&path)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Failed to load settings"));
    Ok(())
}

//! Settings file loader.
//!
//! A YAML file describing a handler configuration:
//!
//! ```yaml
//! format: json
//! output: stderr
//! on-failure: none
//! defer: false
//! debug: true
//! verbose: false
//! ```

use crate::exit::ExitAction;
use crate::formatter::FormatterKind;
use crate::options::{self, AssertOption};
use crate::sink::Sink;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during settings loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yml::Error),
}

/// Where reports are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Output {
    #[default]
    Stderr,
    Stdout,
    Silent,
}

/// What happens after an immediate failure or a deferred drain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnFailure {
    #[default]
    None,
    Exit,
    Panic,
}

/// Handler configuration as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct Settings {
    pub format: FormatterKind,
    pub output: Output,
    pub on_failure: OnFailure,
    pub defer: bool,
    pub debug: bool,
    pub verbose: bool,
}

impl Settings {
    /// Translate into an ordered option list.
    #[must_use]
    pub fn to_options(&self) -> Vec<AssertOption> {
        let mut opts = vec![
            options::with_format(self.format),
            options::with_writer(match self.output {
                Output::Stderr => Sink::stderr(),
                Output::Stdout => Sink::stdout(),
                Output::Silent => Sink::discard(),
            }),
            options::with_exit_func(match self.on_failure {
                OnFailure::None => ExitAction::noop(),
                OnFailure::Exit => ExitAction::process_exit(),
                OnFailure::Panic => ExitAction::panic(),
            }),
            options::with_defer_mode(self.defer),
            options::with_quiet_mode(),
        ];
        if self.debug {
            opts.push(options::with_debug_mode());
        }
        if self.verbose {
            opts.push(options::with_verbose_mode());
        }
        opts
    }
}

/// Load settings from a YAML file.
///
/// If the file doesn't exist, returns default settings.
///
/// # Errors
/// Returns an error if:
/// - The file exists but cannot be read
/// - The YAML is invalid or contains unknown keys or values
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    if !path.exists() {
        return Ok(Settings::default());
    }

    let content = std::fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(Settings::default());
    }
    Ok(serde_yml::from_str(&content)?)
}

//! Failure report rendering.

use crate::record::{FailureRecord, value_text};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write as _};
use std::sync::Arc;

/// Renders a failure record and optional stack text into a report.
///
/// Implementations must be pure: the same inputs always produce the same
/// output, and empty records or empty stack text must not fail.
pub trait Formatter: Send + Sync + fmt::Debug {
    fn format(&self, record: &FailureRecord, stack: &str) -> String;
}

/// Plain text report: an `ASSERT` header followed by one `   key=value`
/// line per field and the stack text, if any.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextFormatter;

impl Formatter for TextFormatter {
    fn format(&self, record: &FailureRecord, stack: &str) -> String {
        let mut output = String::from("ASSERT\n");
        for (key, value) in record {
            let _ = writeln!(output, "   {key}={}", value_text(value));
        }
        if !stack.is_empty() {
            output.push_str(stack);
            output.push('\n');
        }
        output
    }
}

/// JSON report: `{"assertData": {...}, "stack": "..."}`, pretty-printed.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format(&self, record: &FailureRecord, stack: &str) -> String {
        serde_json::to_string_pretty(&Document::new(record, stack))
            .unwrap_or_else(|_| "{}".to_string())
    }
}

/// YAML report with the same shape as [`JsonFormatter`].
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlFormatter;

impl Formatter for YamlFormatter {
    fn format(&self, record: &FailureRecord, stack: &str) -> String {
        serde_yml::to_string(&Document::new(record, stack)).unwrap_or_else(|_| "{}\n".to_string())
    }
}

/// Serialized shape shared by the structured formatters.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Document<'a> {
    assert_data: &'a FailureRecord,
    #[serde(skip_serializing_if = "str::is_empty")]
    stack: &'a str,
}

impl<'a> Document<'a> {
    const fn new(record: &'a FailureRecord, stack: &'a str) -> Self {
        Self {
            assert_data: record,
            stack,
        }
    }
}

/// Built-in formatter variants, selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatterKind {
    #[default]
    Text,
    Json,
    Yaml,
}

impl FormatterKind {
    /// Instantiate the formatter for this variant.
    #[must_use]
    pub fn formatter(self) -> Arc<dyn Formatter> {
        match self {
            Self::Text => Arc::new(TextFormatter),
            Self::Json => Arc::new(JsonFormatter),
            Self::Yaml => Arc::new(YamlFormatter),
        }
    }
}

impl std::str::FromStr for FormatterKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(format!(
                "unknown format: {s}. Valid formats: text, json, yaml"
            )),
        }
    }
}

impl fmt::Display for FormatterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Json => "json",
            Self::Yaml => "yaml",
        })
    }
}

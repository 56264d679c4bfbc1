//! Failure record assembly.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Area tag stamped on every record produced by the assertion pipeline.
pub const ASSERT_AREA: &str = "Assert";

/// Build a key/value argument list from heterogeneous expressions.
///
/// Each expression is converted through `serde_json::json!`, so anything
/// serializable works. Arguments are read pairwise as `key, value`; a trailing
/// key without a value is dropped when the record is assembled.
///
/// ```
/// let data = assertkit::args!("user", "alice", "attempts", 3);
/// assert_eq!(data.len(), 4);
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::serde_json::Value>::new()
    };
    ($($item:expr),+ $(,)?) => {
        ::std::vec![$($crate::serde_json::json!($item)),+]
    };
}

/// Data describing a single failed assertion.
///
/// Always carries `msg` and `area`. Iteration order is by key; consumers
/// must not rely on it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FailureRecord {
    fields: BTreeMap<String, Value>,
}

impl FailureRecord {
    /// Create a record with the mandatory `msg` and `area` fields.
    #[must_use]
    pub fn new(msg: &str, area: &str) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert("msg".to_string(), Value::String(msg.to_string()));
        fields.insert("area".to_string(), Value::String(area.to_string()));
        Self { fields }
    }

    /// Create a record with no fields at all.
    ///
    /// Only formatters see such records; the pipeline always uses [`FailureRecord::new`].
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            fields: BTreeMap::new(),
        }
    }

    /// Append `key, value` pairs from a flat argument list.
    ///
    /// A trailing unpaired argument is silently dropped.
    pub fn extend_pairs(&mut self, args: &[Value]) {
        for pair in args.chunks_exact(2) {
            self.insert(value_text(&pair[0]), pair[1].clone());
        }
    }

    /// Insert or overwrite a field.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Look up a field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over `(key, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }
}

impl<'a> IntoIterator for &'a FailureRecord {
    type Item = (&'a String, &'a Value);
    type IntoIter = std::collections::btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

/// Render a JSON value the way it reads in a plain text report.
///
/// Strings are shown without quotes; everything else uses its JSON text.
#[must_use]
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Debug rendering of a raw argument list, used by verbose mode.
pub struct ArgsDisplay<'a>(pub &'a [Value]);

impl fmt::Display for ArgsDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, arg) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(&value_text(arg))?;
        }
        f.write_str("]")
    }
}

//! Template filter table.
//!
//! Filters are plain functions registered on every composed template set
//! before any fragment is parsed, so fragments may reference them freely.
//! The table is configuration handed to the builder, not dynamic dispatch.

use std::collections::HashMap;

use chrono::DateTime;
use tera::Value;

/// A registrable template filter function.
pub type FilterFn = fn(&Value, &HashMap<String, Value>) -> tera::Result<Value>;

/// Named filters to register on each composed template set.
#[derive(Debug, Clone, Default)]
pub struct FilterTable {
    entries: Vec<(&'static str, FilterFn)>,
}

impl FilterTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard table used by the application: `human_date`.
    pub fn standard() -> Self {
        let mut table = Self::new();
        table.insert("human_date", human_date);
        table
    }

    pub fn insert(&mut self, name: &'static str, filter: FilterFn) {
        self.entries.push((name, filter));
    }

    pub(crate) fn entries(&self) -> impl Iterator<Item = (&'static str, FilterFn)> + '_ {
        self.entries.iter().copied()
    }
}

/// Formats an RFC 3339 timestamp as a human-readable date,
/// e.g. "17 Mar 2024 at 10:30".
fn human_date(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let raw = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("human_date expects a datetime string"))?;
    let parsed = DateTime::parse_from_rfc3339(raw)
        .map_err(|e| tera::Error::msg(format!("human_date: invalid datetime {raw:?}: {e}")))?;
    Ok(Value::String(parsed.format("%d %b %Y at %H:%M").to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn human_date_formats_rfc3339() {
        let value = Value::String("2024-03-17T10:30:00Z".to_string());
        let formatted = human_date(&value, &HashMap::new()).unwrap();
        assert_eq!(formatted, Value::String("17 Mar 2024 at 10:30".to_string()));
    }

    #[test]
    fn human_date_rejects_non_string_input() {
        let value = Value::Number(42.into());
        assert!(human_date(&value, &HashMap::new()).is_err());
    }

    #[test]
    fn human_date_rejects_unparseable_input() {
        let value = Value::String("yesterday".to_string());
        assert!(human_date(&value, &HashMap::new()).is_err());
    }

    #[test]
    fn standard_table_contains_human_date() {
        let table = FilterTable::standard();
        assert!(table.entries().any(|(name, _)| name == "human_date"));
    }
}

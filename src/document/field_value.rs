//! Field value types for searchable items.
//!
//! This module defines the [`FieldValue`] enum, the value an item hands back
//! when the index asks it for a named attribute. Every variant has a single
//! canonical text form, which is what gets matched, filtered and excerpted.
//!
//! # Supported Types
//!
//! - **Text** - String data for full-text search
//! - **List** - Multi-valued attributes such as tags (joined with a space)
//! - **Integer** / **Float** - Numbers, rendered with their natural display form
//! - **Boolean** - `true` / `false`
//! - **DateTime** - UTC timestamps, rendered as RFC 3339
//! - **Null** - Explicit absence, rendered as an empty string
//!
//! ```
//! use sitesearch::document::field_value::FieldValue;
//!
//! let tags = FieldValue::from(vec!["rust", "search"]);
//! assert_eq!(tags.to_text(), "rust search");
//! assert_eq!(tags.values(), vec!["rust".to_string(), "search".to_string()]);
//!
//! let year = FieldValue::Integer(2024);
//! assert_eq!(year.to_text(), "2024");
//! ```

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Represents the value of an item attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    /// Text value
    Text(String),
    /// Multiple text values
    List(Vec<String>),
    /// Integer value
    Integer(i64),
    /// Floating point value
    Float(f64),
    /// Boolean value
    Boolean(bool),
    /// DateTime value
    DateTime(DateTime<Utc>),
    /// Null value
    Null,
}

impl FieldValue {
    /// Get the text if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the elements if this is a list value.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::List(values) => Some(values),
            _ => None,
        }
    }

    /// Whether the value carries no text at all.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::List(values) => values.iter().all(|v| v.is_empty()),
            FieldValue::Null => true,
            _ => false,
        }
    }

    /// The searchable text form of this value.
    ///
    /// Lists join with a single space; everything else uses its display form.
    pub fn to_text(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::List(values) => values.join(" "),
            FieldValue::Integer(i) => i.to_string(),
            FieldValue::Float(f) => f.to_string(),
            FieldValue::Boolean(b) => b.to_string(),
            FieldValue::DateTime(dt) => dt.to_rfc3339_opts(SecondsFormat::Secs, true),
            FieldValue::Null => String::new(),
        }
    }

    /// The individual values used for exact `field:value` filtering.
    ///
    /// A list contributes each element, a scalar contributes its text form and
    /// null contributes nothing.
    pub fn values(&self) -> Vec<String> {
        match self {
            FieldValue::List(values) => values.clone(),
            FieldValue::Null => Vec::new(),
            other => vec![other.to_text()],
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<&String> for FieldValue {
    fn from(value: &String) -> Self {
        FieldValue::Text(value.clone())
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(values: Vec<String>) -> Self {
        FieldValue::List(values)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(values: Vec<&str>) -> Self {
        FieldValue::List(values.into_iter().map(str::to_string).collect())
    }
}

impl From<&[String]> for FieldValue {
    fn from(values: &[String]) -> Self {
        FieldValue::List(values.to_vec())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::DateTime(value)
    }
}

impl<V: Into<FieldValue>> From<Option<V>> for FieldValue {
    fn from(value: Option<V>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_text_forms() {
        assert_eq!(FieldValue::from("Zero Trust").to_text(), "Zero Trust");
        assert_eq!(FieldValue::from(vec!["api", "auth"]).to_text(), "api auth");
        assert_eq!(FieldValue::Integer(42).to_text(), "42");
        assert_eq!(FieldValue::Float(1.5).to_text(), "1.5");
        assert_eq!(FieldValue::Boolean(true).to_text(), "true");
        assert_eq!(FieldValue::Null.to_text(), "");

        let dt = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(FieldValue::DateTime(dt).to_text(), "2024-03-01T12:00:00Z");
    }

    #[test]
    fn test_filter_values() {
        assert_eq!(
            FieldValue::from(vec!["api", "auth"]).values(),
            vec!["api".to_string(), "auth".to_string()]
        );
        assert_eq!(FieldValue::from("blog").values(), vec!["blog".to_string()]);
        assert!(FieldValue::Null.values().is_empty());
    }

    #[test]
    fn test_option_conversion() {
        let missing: Option<String> = None;
        assert_eq!(FieldValue::from(missing), FieldValue::Null);
        assert_eq!(
            FieldValue::from(Some("x".to_string())),
            FieldValue::Text("x".to_string())
        );
    }

    #[test]
    fn test_is_empty() {
        assert!(FieldValue::Null.is_empty());
        assert!(FieldValue::from("").is_empty());
        assert!(FieldValue::List(vec![]).is_empty());
        assert!(!FieldValue::Boolean(false).is_empty());
    }
}

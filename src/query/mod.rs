//! Query model and surface syntax.
//!
//! A raw query string is parsed once per search into a [`ParsedQuery`]:
//!
//! - free tokens are fuzzy terms: `security`
//! - quoted text is an exact phrase: `"zero trust"`
//! - a leading dash excludes: `-legacy`
//! - `field:value` is an exact filter: `tag:api`

pub mod parser;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub use parser::{QueryParser, parse_query, query_to_string};

/// A parsed search query. All values are lowercase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedQuery {
    /// Fuzzy terms.
    pub terms: Vec<String>,
    /// Exact phrases.
    pub phrases: Vec<String>,
    /// Terms that disqualify an item.
    pub exclude_terms: Vec<String>,
    /// Exact filters, OR within a field and AND across fields.
    pub filters: BTreeMap<String, Vec<String>>,
    /// True when the query has no terms and no phrases.
    pub is_filter_only: bool,
}

impl ParsedQuery {
    /// Create an empty query.
    pub fn new() -> Self {
        ParsedQuery {
            is_filter_only: true,
            ..Default::default()
        }
    }

    /// Whether the query constrains nothing at all.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
            && self.phrases.is_empty()
            && self.exclude_terms.is_empty()
            && self.filters.is_empty()
    }

    /// Whether the query has any free-text component (terms or phrases).
    pub fn has_text(&self) -> bool {
        !self.is_filter_only
    }

    /// Number of scored components (terms plus phrases).
    pub fn text_component_count(&self) -> usize {
        self.terms.len() + self.phrases.len()
    }

    /// Recompute `is_filter_only` after manual edits.
    pub(crate) fn refresh(&mut self) {
        self.is_filter_only = self.terms.is_empty() && self.phrases.is_empty();
    }
}

impl fmt::Display for ParsedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&query_to_string(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_query_is_empty_and_filter_only() {
        let query = ParsedQuery::new();
        assert!(query.is_empty());
        assert!(query.is_filter_only);
        assert!(!query.has_text());
    }

    #[test]
    fn test_refresh_tracks_text_components() {
        let mut query = ParsedQuery::new();
        query.terms.push("rust".to_string());
        query.refresh();
        assert!(!query.is_filter_only);
        assert_eq!(query.text_component_count(), 1);

        query.terms.clear();
        query.filters.insert("tag".to_string(), vec!["api".to_string()]);
        query.refresh();
        assert!(query.is_filter_only);
        assert!(!query.is_empty());
    }

    #[test]
    fn test_display_uses_surface_syntax() {
        let query = parse_query("Rust -java");
        assert_eq!(query.to_string(), "rust -java");
    }
}

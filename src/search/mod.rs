//! Search execution and results.

pub mod config;
pub mod engine;
pub mod scorer;

use serde::Serialize;

pub use self::config::{SearchConfig, SearchConfigBuilder, SearchableField};
pub use self::engine::SearchEngine;
pub use self::scorer::search;

/// A field that contributed to an item's score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchMatch {
    /// Field name.
    pub field: String,
    /// Bounded window of the field text around the first match.
    pub excerpt: String,
    /// Highlighted character ranges within `excerpt`, end exclusive.
    pub positions: Vec<(usize, usize)>,
}

/// A ranked search hit borrowing its item from the searched collection.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult<'a, T> {
    /// The matched item.
    pub item: &'a T,
    /// Position of the item in the searched collection.
    pub index: usize,
    /// Relevance in `[0, 1]`.
    pub score: f32,
    /// Contributing fields, in declaration order.
    pub matches: Vec<SearchMatch>,
    /// Query terms and phrases that matched, deduplicated.
    pub matched_terms: Vec<String>,
}

impl<T> Clone for SearchResult<'_, T> {
    fn clone(&self) -> Self {
        SearchResult {
            item: self.item,
            index: self.index,
            score: self.score,
            matches: self.matches.clone(),
            matched_terms: self.matched_terms.clone(),
        }
    }
}

impl<T> SearchResult<'_, T> {
    /// The match entry for a field, if that field contributed.
    pub fn match_for(&self, field: &str) -> Option<&SearchMatch> {
        self.matches.iter().find(|m| m.field == field)
    }
}

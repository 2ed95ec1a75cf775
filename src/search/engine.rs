//! High-level search engine that owns a collection and its index.

use std::sync::Arc;

use log::debug;

use crate::document::Searchable;
use crate::error::Result;
use crate::history::{HistoryStore, SearchHistory, SearchHistoryItem};
use crate::index::{SearchIndex, build_index};
use crate::query::{ParsedQuery, QueryParser};
use crate::search::config::SearchConfig;
use crate::search::{SearchResult, scorer};

/// A search engine over one content type.
///
/// Owns the items and their index; [`rebuild`](SearchEngine::rebuild)
/// replaces both. The index is held behind an `Arc` so callers can take a
/// snapshot that outlives a rebuild.
#[derive(Debug)]
pub struct SearchEngine<T> {
    config: SearchConfig,
    items: Vec<T>,
    index: Arc<SearchIndex>,
    parser: QueryParser,
    history: Option<Arc<SearchHistory>>,
}

impl<T: Searchable + Sync> SearchEngine<T> {
    /// Index `items` with `config`.
    pub fn new(items: Vec<T>, config: SearchConfig) -> Result<Self> {
        let index = build_index(&items, &config)?;
        Ok(SearchEngine {
            config,
            items,
            index: Arc::new(index),
            parser: QueryParser::new(),
            history: None,
        })
    }

    /// Record submitted searches in `store`, under the config's history key.
    pub fn with_history(mut self, store: Arc<dyn HistoryStore>) -> Self {
        self.history = Some(Arc::new(SearchHistory::from_config(store, &self.config)));
        self
    }

    /// Replace the collection and rebuild the index.
    pub fn rebuild(&mut self, items: Vec<T>) -> Result<()> {
        let index = build_index(&items, &self.config)?;
        self.items = items;
        self.index = Arc::new(index);
        debug!("rebuilt search index with {} items", self.items.len());
        Ok(())
    }

    /// Parse and run a query typed by a user, recording it in history.
    ///
    /// The history write happens in the background. A blank query returns
    /// nothing and is not recorded.
    pub fn search(&self, query_str: &str) -> Vec<SearchResult<'_, T>> {
        let query = self.parser.parse(query_str);
        if query.is_empty() {
            return Vec::new();
        }

        let results = self.search_parsed(&query);
        if let Some(history) = &self.history {
            history.save_in_background(query_str, results.len());
        }
        results
    }

    /// Run an already parsed query. Nothing is recorded.
    pub fn search_parsed(&self, query: &ParsedQuery) -> Vec<SearchResult<'_, T>> {
        scorer::search(&self.items, &self.index, query, &self.config)
    }

    /// Parse a query string with this engine's parser.
    pub fn parse(&self, query_str: &str) -> ParsedQuery {
        self.parser.parse(query_str)
    }

    /// Recent searches, most recent first. Empty when history is disabled.
    ///
    /// Waits for pending history writes first.
    pub fn recent_searches(&self, limit: usize) -> Vec<SearchHistoryItem> {
        self.history
            .as_ref()
            .map(|history| {
                history.flush();
                history.load(limit)
            })
            .unwrap_or_default()
    }

    /// Wait until every recorded search has reached the history store.
    pub fn flush_history(&self) {
        if let Some(history) = &self.history {
            history.flush();
        }
    }
}

impl<T> SearchEngine<T> {
    /// The configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// The indexed items.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// A snapshot of the current index.
    pub fn index(&self) -> Arc<SearchIndex> {
        Arc::clone(&self.index)
    }

    /// The history adapter, if enabled.
    pub fn history(&self) -> Option<&SearchHistory> {
        self.history.as_deref()
    }

    /// Number of indexed items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the engine has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

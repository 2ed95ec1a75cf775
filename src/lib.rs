//! # sitesearch
//!
//! In-process full-text search over small content collections such as blog
//! posts, activities and projects.
//!
//! ## Features
//!
//! - Query syntax with free terms, `"exact phrases"`, `-exclusions` and
//!   `field:value` filters
//! - Weighted multi-field scoring with typo-tolerant term matching
//! - Case-insensitive highlighting and match-centered excerpts
//! - Recent search history behind a pluggable key-value store
//!
//! ## Example
//!
//! ```
//! use serde_json::json;
//! use sitesearch::search::{SearchConfig, SearchEngine};
//!
//! let config = SearchConfig::builder()
//!     .weighted_field("title", 2.0)
//!     .weighted_field("tags", 1.0)
//!     .build()
//!     .unwrap();
//! let items = vec![
//!     json!({ "id": "1", "title": "Zero Trust Guide", "tags": ["security"] }),
//!     json!({ "id": "2", "title": "Cooking with cast iron", "tags": ["food"] }),
//! ];
//!
//! let engine = SearchEngine::new(items, config).unwrap();
//! let results = engine.search("securty");
//! assert_eq!(results.len(), 1);
//! assert_eq!(results[0].item["id"], "1");
//! ```

pub mod cli;
pub mod content;
pub mod document;
pub mod error;
pub mod fuzzy;
pub mod highlight;
pub mod history;
pub mod index;
pub mod query;
pub mod search;

pub mod prelude {
    pub use crate::document::{FieldValue, Searchable};
    pub use crate::error::{Result, SitesearchError};
    pub use crate::highlight::{HighlightSegment, Highlighter, excerpt, highlight};
    pub use crate::history::{
        FileHistoryStore, HistoryStore, MemoryHistoryStore, SearchHistory, SearchHistoryItem,
    };
    pub use crate::index::{SearchIndex, build_index};
    pub use crate::query::{ParsedQuery, parse_query, query_to_string};
    pub use crate::search::{
        SearchConfig, SearchEngine, SearchMatch, SearchResult, SearchableField, search,
    };
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

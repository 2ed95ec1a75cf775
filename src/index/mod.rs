//! Index construction.
//!
//! [`build_index`] reads every configured attribute of every item once and
//! stores it in the normalized forms the scorer needs: display text,
//! lowercase text, lowercase words and lowercase filter values. The index is
//! immutable; when the item collection changes it is rebuilt from scratch.

use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::document::{FieldValue, Searchable};
use crate::error::Result;
use crate::fuzzy::tokenize;
use crate::search::config::{SearchConfig, SearchableField};

/// One attribute of one item, normalized for matching.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexedField {
    /// Text as displayed (lists joined with a space).
    pub text: String,
    /// Lowercase text used for substring tests.
    pub lower: String,
    /// Lowercase word tokens used for fuzzy matching.
    pub words: Vec<String>,
    /// Lowercase individual values used for exact filters.
    pub values: Vec<String>,
}

impl IndexedField {
    /// Normalize a field value.
    pub fn from_value(value: &FieldValue) -> Self {
        let text = value.to_text();
        let lower = text.to_lowercase();
        let words = tokenize(&text);
        let values = value
            .values()
            .into_iter()
            .map(|v| v.trim().to_lowercase())
            .collect();

        IndexedField {
            text,
            lower,
            words,
            values,
        }
    }

    /// Whether the field has no text.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Whether any value equals `value` (already lowercase).
    pub fn has_value(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }
}

/// The normalized view of one item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexedItem {
    /// Text of the id field, if the item has one.
    pub id: Option<String>,
    /// Scored fields, aligned with [`SearchIndex::fields`].
    pub fields: Vec<IndexedField>,
    /// Filter-only fields, aligned with [`SearchIndex::filter_fields`].
    pub filter_values: Vec<IndexedField>,
}

impl IndexedItem {
    fn extract<T: Searchable>(
        item: &T,
        id_field: &str,
        fields: &[SearchableField],
        filter_fields: &[String],
    ) -> Self {
        let read = |name: &str| {
            item.field(name)
                .map(|value| IndexedField::from_value(&value))
                .unwrap_or_default()
        };

        IndexedItem {
            id: item
                .field(id_field)
                .map(|value| value.to_text())
                .filter(|id| !id.is_empty()),
            fields: fields.iter().map(|f| read(&f.name)).collect(),
            filter_values: filter_fields.iter().map(|name| read(name)).collect(),
        }
    }

    /// Whether any scored field contains `needle` (already lowercase).
    pub fn any_field_contains(&self, needle: &str) -> bool {
        self.fields.iter().any(|f| f.lower.contains(needle))
    }

    /// Whether any scored or filter-only field contains `needle` (already
    /// lowercase).
    pub fn any_value_contains(&self, needle: &str) -> bool {
        self.fields
            .iter()
            .chain(&self.filter_values)
            .any(|f| f.lower.contains(needle))
    }
}

/// Where a filter field name points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRef {
    /// A scored field, by position.
    Scored(usize),
    /// A filter-only field, by position.
    Filter(usize),
}

/// Immutable search index over one item collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchIndex {
    fields: Vec<SearchableField>,
    filter_fields: Vec<String>,
    items: Vec<IndexedItem>,
}

impl SearchIndex {
    /// Scored fields in declaration order.
    pub fn fields(&self) -> &[SearchableField] {
        &self.fields
    }

    /// Filter-only field names.
    pub fn filter_fields(&self) -> &[String] {
        &self.filter_fields
    }

    /// Indexed items, in collection order.
    pub fn items(&self) -> &[IndexedItem] {
        &self.items
    }

    /// Number of indexed items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of scored field weights.
    pub fn total_weight(&self) -> f32 {
        self.fields.iter().map(|f| f.weight).sum()
    }

    /// Position of the item with the given id.
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.items
            .iter()
            .position(|item| item.id.as_deref() == Some(id))
    }

    /// Resolve a filter field name.
    ///
    /// The name is tried as given, then in plural form, so `tag:rust`
    /// filters on a `tags` attribute. Scored fields win over filter-only
    /// fields of the same name.
    pub fn resolve_filter_field(&self, name: &str) -> Option<FieldRef> {
        let lookup = |candidate: &str| {
            self.fields
                .iter()
                .position(|f| f.name.eq_ignore_ascii_case(candidate))
                .map(FieldRef::Scored)
                .or_else(|| {
                    self.filter_fields
                        .iter()
                        .position(|f| f.eq_ignore_ascii_case(candidate))
                        .map(FieldRef::Filter)
                })
        };

        lookup(name).or_else(|| lookup(&format!("{name}s")))
    }

    /// The indexed field `field_ref` points to within `item`.
    pub fn field_of<'a>(&self, item: &'a IndexedItem, field_ref: FieldRef) -> Option<&'a IndexedField> {
        match field_ref {
            FieldRef::Scored(i) => item.fields.get(i),
            FieldRef::Filter(i) => item.filter_values.get(i),
        }
    }
}

/// Build an index over `items`.
///
/// Fails only when the configuration is invalid. Item order is preserved.
pub fn build_index<T: Searchable + Sync>(items: &[T], config: &SearchConfig) -> Result<SearchIndex> {
    config.validate()?;
    let fields = config.normalized_fields()?;

    let mut filter_fields: Vec<String> = Vec::new();
    for name in &config.filter_fields {
        if !filter_fields.contains(name) && !fields.iter().any(|f| &f.name == name) {
            filter_fields.push(name.clone());
        }
    }

    let indexed: Vec<IndexedItem> = items
        .par_iter()
        .map(|item| IndexedItem::extract(item, &config.id_field, &fields, &filter_fields))
        .collect();

    debug!(
        "built index: {} items, {} scored fields, {} filter fields",
        indexed.len(),
        fields.len(),
        filter_fields.len()
    );

    Ok(SearchIndex {
        fields,
        filter_fields,
        items: indexed,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    fn config() -> SearchConfig {
        SearchConfig::builder()
            .weighted_field("title", 2.0)
            .weighted_field("tags", 1.0)
            .filter_field("category")
            .id_field("slug")
            .build()
            .unwrap()
    }

    fn items() -> Vec<Value> {
        vec![
            json!({ "slug": "zero-trust", "title": "Zero Trust Guide", "tags": ["API", "Security"], "category": "Blog" }),
            json!({ "slug": "legacy", "title": "Legacy API notes", "category": "Notes" }),
        ]
    }

    #[test]
    fn test_build_index() -> Result<()> {
        let index = build_index(&items(), &config())?;

        assert_eq!(index.len(), 2);
        assert_eq!(index.fields().len(), 2);
        assert_eq!(index.filter_fields(), &["category".to_string()]);

        let first = &index.items()[0];
        assert_eq!(first.id.as_deref(), Some("zero-trust"));
        assert_eq!(first.fields[0].text, "Zero Trust Guide");
        assert_eq!(first.fields[0].lower, "zero trust guide");
        assert_eq!(first.fields[0].words, vec!["zero", "trust", "guide"]);
        assert_eq!(first.fields[1].text, "API Security");
        assert_eq!(first.fields[1].values, vec!["api", "security"]);
        assert_eq!(first.filter_values[0].values, vec!["blog"]);

        // Missing attributes index as empty fields.
        let second = &index.items()[1];
        assert!(second.fields[1].is_empty());
        Ok(())
    }

    #[test]
    fn test_empty_items() -> Result<()> {
        let index = build_index::<Value>(&[], &config())?;
        assert!(index.is_empty());
        Ok(())
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = config();
        config.fields[0].weight = 0.0;
        let err = build_index(&items(), &config).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_resolve_filter_field() -> Result<()> {
        let index = build_index(&items(), &config())?;
        assert_eq!(index.resolve_filter_field("title"), Some(FieldRef::Scored(0)));
        assert_eq!(index.resolve_filter_field("tag"), Some(FieldRef::Scored(1)));
        assert_eq!(index.resolve_filter_field("category"), Some(FieldRef::Filter(0)));
        assert_eq!(index.resolve_filter_field("author"), None);
        Ok(())
    }

    #[test]
    fn test_position_of() -> Result<()> {
        let index = build_index(&items(), &config())?;
        assert_eq!(index.position_of("legacy"), Some(1));
        assert_eq!(index.position_of("missing"), None);
        Ok(())
    }

    #[test]
    fn test_filter_field_overlapping_scored_field_is_dropped() -> Result<()> {
        let config = SearchConfig::builder()
            .weighted_field("title", 1.0)
            .filter_field("title")
            .filter_field("category")
            .filter_field("category")
            .build()?;
        let index = build_index(&items(), &config)?;
        assert_eq!(index.filter_fields(), &["category".to_string()]);
        Ok(())
    }
}

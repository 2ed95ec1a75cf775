//! Configuration for a searchable content type.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SitesearchError};

/// Default fuzzy threshold (normalized distance; lower is stricter).
pub const DEFAULT_FUZZY_THRESHOLD: f32 = 0.2;

/// Default window length for match excerpts, in characters.
pub const DEFAULT_EXCERPT_LENGTH: usize = 200;

/// Default storage key for search history.
pub const DEFAULT_HISTORY_STORAGE_KEY: &str = "search-history";

/// Default number of history entries kept.
pub const DEFAULT_MAX_HISTORY_ITEMS: usize = 10;

/// An item attribute that participates in scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchableField {
    /// Attribute name, as passed to [`Searchable::field`](crate::document::Searchable::field).
    pub name: String,
    /// Relative importance of this field. Must be positive.
    #[serde(default = "default_weight")]
    pub weight: f32,
    /// Whether typo-tolerant matching applies to this field.
    #[serde(default = "default_fuzzy")]
    pub fuzzy: bool,
}

fn default_weight() -> f32 {
    1.0
}

fn default_fuzzy() -> bool {
    true
}

impl SearchableField {
    /// Create a fuzzy field with weight 1.0.
    pub fn new<S: Into<String>>(name: S) -> Self {
        SearchableField {
            name: name.into(),
            weight: default_weight(),
            fuzzy: default_fuzzy(),
        }
    }

    /// Set the field weight.
    pub fn weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }

    /// Set whether fuzzy matching applies.
    pub fn fuzzy(mut self, fuzzy: bool) -> Self {
        self.fuzzy = fuzzy;
        self
    }
}

/// Search configuration for one content type.
///
/// Build it with [`SearchConfig::builder`]; the builder validates before
/// returning. Configs loaded through serde are validated when an index is
/// built from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Fields that are scored, in declaration order.
    pub fields: Vec<SearchableField>,
    /// Attribute that identifies an item.
    pub id_field: String,
    /// Maximum normalized fuzzy distance for a term to match (0.0-1.0).
    pub fuzzy_threshold: f32,
    /// Attributes indexed for exact `field:value` filtering only.
    #[serde(default)]
    pub filter_fields: Vec<String>,
    /// Window length of match excerpts, in characters.
    #[serde(default = "default_excerpt_length")]
    pub excerpt_length: usize,
    /// Optional cap on the number of results returned.
    #[serde(default)]
    pub max_results: Option<usize>,
    /// Key under which search history is stored.
    pub history_storage_key: String,
    /// Maximum number of history entries kept.
    pub max_history_items: usize,
}

fn default_excerpt_length() -> usize {
    DEFAULT_EXCERPT_LENGTH
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            fields: Vec::new(),
            id_field: "id".to_string(),
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
            filter_fields: Vec::new(),
            excerpt_length: DEFAULT_EXCERPT_LENGTH,
            max_results: None,
            history_storage_key: DEFAULT_HISTORY_STORAGE_KEY.to_string(),
            max_history_items: DEFAULT_MAX_HISTORY_ITEMS,
        }
    }
}

impl SearchConfig {
    /// Start building a configuration.
    pub fn builder() -> SearchConfigBuilder {
        SearchConfigBuilder::new()
    }

    /// Look up a scored field by name.
    pub fn field(&self, name: &str) -> Option<&SearchableField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Sum of all scored field weights.
    pub fn total_weight(&self) -> f32 {
        self.fields.iter().map(|f| f.weight).sum()
    }

    /// Check the configuration.
    ///
    /// Rejects an empty field list, non-positive or non-finite weights,
    /// duplicate field names whose declarations disagree, a threshold outside
    /// `[0, 1]`, an empty id field, an empty history key and a zero history
    /// capacity.
    pub fn validate(&self) -> Result<()> {
        self.normalized_fields().map(|_| ())?;

        if !(0.0..=1.0).contains(&self.fuzzy_threshold) {
            return Err(SitesearchError::configuration(format!(
                "fuzzy threshold must be within [0, 1], got {}",
                self.fuzzy_threshold
            )));
        }
        if self.id_field.is_empty() {
            return Err(SitesearchError::configuration("id field must not be empty"));
        }
        if self.history_storage_key.trim().is_empty() {
            return Err(SitesearchError::configuration(
                "history storage key must not be empty",
            ));
        }
        if self.max_history_items == 0 {
            return Err(SitesearchError::configuration(
                "max history items must be at least 1",
            ));
        }
        if self.excerpt_length == 0 {
            return Err(SitesearchError::configuration(
                "excerpt length must be at least 1",
            ));
        }
        Ok(())
    }

    /// Fields with identical duplicate declarations removed.
    pub(crate) fn normalized_fields(&self) -> Result<Vec<SearchableField>> {
        if self.fields.is_empty() {
            return Err(SitesearchError::configuration(
                "at least one searchable field is required",
            ));
        }

        let mut fields: Vec<SearchableField> = Vec::with_capacity(self.fields.len());
        for field in &self.fields {
            if field.name.is_empty() {
                return Err(SitesearchError::configuration("field name must not be empty"));
            }
            if !field.weight.is_finite() || field.weight <= 0.0 {
                return Err(SitesearchError::configuration(format!(
                    "field '{}' must have a positive weight, got {}",
                    field.name, field.weight
                )));
            }
            match fields.iter().find(|f| f.name == field.name) {
                Some(existing) if existing != field => {
                    return Err(SitesearchError::configuration(format!(
                        "field '{}' declared twice with conflicting settings",
                        field.name
                    )));
                }
                Some(_) => {}
                None => fields.push(field.clone()),
            }
        }
        Ok(fields)
    }
}

/// Builder for [`SearchConfig`].
#[derive(Debug, Clone, Default)]
pub struct SearchConfigBuilder {
    config: SearchConfig,
}

impl SearchConfigBuilder {
    /// Create a builder holding the default configuration.
    pub fn new() -> Self {
        SearchConfigBuilder {
            config: SearchConfig::default(),
        }
    }

    /// Add a scored field.
    pub fn field(mut self, field: SearchableField) -> Self {
        self.config.fields.push(field);
        self
    }

    /// Add a fuzzy scored field with the given weight.
    pub fn weighted_field<S: Into<String>>(self, name: S, weight: f32) -> Self {
        self.field(SearchableField::new(name).weight(weight))
    }

    /// Add a filter-only field.
    pub fn filter_field<S: Into<String>>(mut self, name: S) -> Self {
        self.config.filter_fields.push(name.into());
        self
    }

    /// Set the id field.
    pub fn id_field<S: Into<String>>(mut self, id_field: S) -> Self {
        self.config.id_field = id_field.into();
        self
    }

    /// Set the fuzzy threshold.
    pub fn fuzzy_threshold(mut self, threshold: f32) -> Self {
        self.config.fuzzy_threshold = threshold;
        self
    }

    /// Set the excerpt length.
    pub fn excerpt_length(mut self, length: usize) -> Self {
        self.config.excerpt_length = length;
        self
    }

    /// Cap the number of results.
    pub fn max_results(mut self, max_results: usize) -> Self {
        self.config.max_results = Some(max_results);
        self
    }

    /// Set the history storage key.
    pub fn history_storage_key<S: Into<String>>(mut self, key: S) -> Self {
        self.config.history_storage_key = key.into();
        self
    }

    /// Set the history capacity.
    pub fn max_history_items(mut self, max_items: usize) -> Self {
        self.config.max_history_items = max_items;
        self
    }

    /// Validate and return the configuration.
    pub fn build(self) -> Result<SearchConfig> {
        let mut config = self.config;
        config.validate()?;
        config.fields = config.normalized_fields()?;
        Ok(config)
    }
}

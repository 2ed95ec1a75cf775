//! Bundled content types for a personal site.
//!
//! Each type implements [`Searchable`] and ships a default
//! [`SearchConfig`] with its field weights, filter fields and history key.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::document::{FieldValue, Searchable};
use crate::search::config::{SearchConfig, SearchableField};

/// A blog post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

impl BlogPost {
    /// Title 2.0, tags 1.5, excerpt 1.0, content 0.5; filter on category
    /// and slug.
    pub fn default_config() -> SearchConfig {
        SearchConfig {
            fields: vec![
                SearchableField::new("title").weight(2.0),
                SearchableField::new("tags").weight(1.5),
                SearchableField::new("excerpt"),
                SearchableField::new("content").weight(0.5),
            ],
            id_field: "slug".to_string(),
            filter_fields: vec!["category".to_string(), "slug".to_string()],
            history_storage_key: "blog-search-history".to_string(),
            ..SearchConfig::default()
        }
    }
}

impl Searchable for BlogPost {
    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "slug" => Some(FieldValue::from(&self.slug)),
            "title" => Some(FieldValue::from(&self.title)),
            "excerpt" => Some(FieldValue::from(&self.excerpt)),
            "content" => Some(FieldValue::from(&self.content)),
            "tags" => Some(FieldValue::from(self.tags.as_slice())),
            "category" => Some(FieldValue::from(self.category.clone())),
            "publishedAt" | "published_at" => Some(FieldValue::from(self.published_at)),
            _ => None,
        }
    }
}

/// A professional activity: a talk, certification, volunteering, etc.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Activity kind, e.g. `talk` or `certification`.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

impl Activity {
    /// Title 2.0, skills 1.5, organization 1.0, description 0.8; filter on
    /// type.
    pub fn default_config() -> SearchConfig {
        SearchConfig {
            fields: vec![
                SearchableField::new("title").weight(2.0),
                SearchableField::new("skills").weight(1.5),
                SearchableField::new("organization"),
                SearchableField::new("description").weight(0.8),
            ],
            filter_fields: vec!["type".to_string()],
            history_storage_key: "activity-search-history".to_string(),
            ..SearchConfig::default()
        }
    }
}

impl Searchable for Activity {
    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(FieldValue::from(&self.id)),
            "title" => Some(FieldValue::from(&self.title)),
            "description" => Some(FieldValue::from(&self.description)),
            "type" | "kind" => Some(FieldValue::from(&self.kind)),
            "organization" => Some(FieldValue::from(self.organization.clone())),
            "skills" => Some(FieldValue::from(self.skills.as_slice())),
            "date" => Some(FieldValue::from(self.date.map(|d| d.to_string()))),
            _ => None,
        }
    }
}

/// A portfolio project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl Project {
    /// Name 2.0, technologies 1.5, tags 1.2, description 1.0; filter on
    /// status. Technology names are matched without typo tolerance.
    pub fn default_config() -> SearchConfig {
        SearchConfig {
            fields: vec![
                SearchableField::new("name").weight(2.0),
                SearchableField::new("technologies").weight(1.5).fuzzy(false),
                SearchableField::new("tags").weight(1.2),
                SearchableField::new("description"),
            ],
            filter_fields: vec!["status".to_string()],
            history_storage_key: "project-search-history".to_string(),
            ..SearchConfig::default()
        }
    }
}

impl Searchable for Project {
    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(FieldValue::from(&self.id)),
            "name" | "title" => Some(FieldValue::from(&self.name)),
            "description" => Some(FieldValue::from(&self.description)),
            "technologies" | "tech" => Some(FieldValue::from(self.technologies.as_slice())),
            "tags" => Some(FieldValue::from(self.tags.as_slice())),
            "status" => Some(FieldValue::from(self.status.clone())),
            "url" => Some(FieldValue::from(self.url.clone())),
            _ => None,
        }
    }
}

//! Query parser for converting query strings to [`ParsedQuery`] values.
//!
//! Parsing is total: every input, including empty and malformed strings,
//! yields a valid query. An unterminated quote is ordinary text.

use lazy_static::lazy_static;
use regex::Regex;

use crate::query::ParsedQuery;

lazy_static! {
    static ref PHRASE_PATTERN: Regex = Regex::new(r#""([^"]*)""#).unwrap();
}

/// Parser for the search box syntax.
///
/// Supported syntax:
/// - Terms: `security`
/// - Phrases: `"zero trust"`
/// - Exclusions: `-legacy`
/// - Field filters: `tag:api`
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryParser;

impl QueryParser {
    /// Create a new query parser.
    pub fn new() -> Self {
        QueryParser
    }

    /// Parse a query string.
    pub fn parse(&self, query_str: &str) -> ParsedQuery {
        let mut query = ParsedQuery::new();

        // Phrases first; each is replaced by a space so its neighbours stay
        // separate tokens.
        for capture in PHRASE_PATTERN.captures_iter(query_str) {
            let phrase = capture[1].trim().to_lowercase();
            if !phrase.is_empty() {
                push_unique(&mut query.phrases, phrase);
            }
        }
        let remaining = PHRASE_PATTERN.replace_all(query_str, " ");

        for token in remaining.split_whitespace() {
            self.parse_token(token, &mut query);
        }

        query.refresh();
        query
    }

    fn parse_token(&self, token: &str, query: &mut ParsedQuery) {
        if let Some(excluded) = token.strip_prefix('-') {
            if !excluded.is_empty() {
                push_unique(&mut query.exclude_terms, excluded.to_lowercase());
                return;
            }
        }

        if let Some((field, value)) = token.split_once(':') {
            if !field.is_empty() && !value.is_empty() {
                let values = query.filters.entry(field.to_lowercase()).or_default();
                push_unique(values, value.to_lowercase());
                return;
            }
        }

        push_unique(&mut query.terms, token.to_lowercase());
    }

    /// Serialize a query back into surface syntax.
    ///
    /// The output re-parses to an equivalent query. Phrases come first so a
    /// stray unterminated quote in a later token can never pair up with
    /// them.
    pub fn to_query_string(&self, query: &ParsedQuery) -> String {
        let mut parts: Vec<String> = Vec::new();

        parts.extend(query.phrases.iter().map(|phrase| format!("\"{phrase}\"")));
        parts.extend(query.terms.iter().cloned());
        parts.extend(query.exclude_terms.iter().map(|term| format!("-{term}")));
        for (field, values) in &query.filters {
            parts.extend(values.iter().map(|value| format!("{field}:{value}")));
        }

        parts.join(" ")
    }
}

fn push_unique(values: &mut Vec<String>, value: String) {
    if !values.contains(&value) {
        values.push(value);
    }
}

/// Parse a query string with the default parser.
pub fn parse_query(query_str: &str) -> ParsedQuery {
    QueryParser.parse(query_str)
}

/// Serialize a query with the default parser.
pub fn query_to_string(query: &ParsedQuery) -> String {
    QueryParser.to_query_string(query)
}

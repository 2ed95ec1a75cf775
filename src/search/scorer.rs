//! Match and score pipeline.
//!
//! Passes run in order: exact filters, exclusions, phrases, then fuzzy term
//! scoring. Each pass only sees the survivors of the previous one.

use std::ops::Range;

use ahash::AHashSet;
use log::debug;
use unicode_segmentation::UnicodeSegmentation;

use crate::fuzzy::FuzzyMatcher;
use crate::highlight::{Highlighter, excerpt_at};
use crate::index::{FieldRef, IndexedField, IndexedItem, SearchIndex};
use crate::query::ParsedQuery;
use crate::search::config::{SearchConfig, SearchableField};
use crate::search::{SearchMatch, SearchResult};

/// Score assigned to every survivor of a filter-only query.
pub const FILTER_ONLY_SCORE: f32 = 1.0;

/// Run `query` against `items` using their prebuilt `index`.
///
/// Results are sorted by score, highest first; equal scores keep collection
/// order. `index` must have been built from `items`; if the lengths differ
/// only the common prefix is searched.
pub fn search<'a, T>(
    items: &'a [T],
    index: &SearchIndex,
    query: &ParsedQuery,
    config: &SearchConfig,
) -> Vec<SearchResult<'a, T>> {
    if items.len() != index.len() {
        log::warn!(
            "index covers {} items but {} were supplied; searching the first {}",
            index.len(),
            items.len(),
            items.len().min(index.len())
        );
    }

    let Some(filters) = resolve_filters(index, query) else {
        debug!("query filters on an unknown field; nothing can match");
        return Vec::new();
    };

    let candidates: Vec<usize> = index
        .items()
        .iter()
        .take(items.len())
        .enumerate()
        .filter(|(_, entry)| passes_filters(index, entry, &filters))
        .filter(|(_, entry)| !is_excluded(entry, &query.exclude_terms))
        .filter(|(_, entry)| has_all_phrases(entry, &query.phrases))
        .map(|(position, _)| position)
        .collect();

    debug!(
        "{} of {} items survived filters, exclusions and phrases",
        candidates.len(),
        index.len()
    );

    if query.is_filter_only {
        let mut results: Vec<SearchResult<'a, T>> = candidates
            .into_iter()
            .map(|position| SearchResult {
                item: &items[position],
                index: position,
                score: FILTER_ONLY_SCORE,
                matches: Vec::new(),
                matched_terms: Vec::new(),
            })
            .collect();
        truncate(&mut results, config);
        return results;
    }

    let scorer = TermScorer::new(index, query, config);
    let mut results: Vec<SearchResult<'a, T>> = candidates
        .into_iter()
        .filter_map(|position| {
            scorer
                .score(&index.items()[position])
                .map(|scored| SearchResult {
                    item: &items[position],
                    index: position,
                    score: scored.score,
                    matches: scored.matches,
                    matched_terms: scored.matched_terms,
                })
        })
        .collect();

    // Stable: ties keep collection order.
    results.sort_by(|a, b| b.score.total_cmp(&a.score));
    truncate(&mut results, config);
    results
}

fn truncate<T>(results: &mut Vec<SearchResult<'_, T>>, config: &SearchConfig) {
    if let Some(max_results) = config.max_results {
        results.truncate(max_results);
    }
}

/// Resolve every filter field, or `None` if any is unknown.
fn resolve_filters<'q>(
    index: &SearchIndex,
    query: &'q ParsedQuery,
) -> Option<Vec<(FieldRef, &'q [String])>> {
    query
        .filters
        .iter()
        .map(|(field, values)| {
            index
                .resolve_filter_field(field)
                .map(|field_ref| (field_ref, values.as_slice()))
        })
        .collect()
}

fn passes_filters(index: &SearchIndex, entry: &IndexedItem, filters: &[(FieldRef, &[String])]) -> bool {
    filters.iter().all(|(field_ref, values)| {
        index
            .field_of(entry, *field_ref)
            .is_some_and(|field| values.iter().any(|value| field.has_value(value)))
    })
}

fn is_excluded(entry: &IndexedItem, exclude_terms: &[String]) -> bool {
    exclude_terms
        .iter()
        .any(|term| entry.any_value_contains(term))
}

fn has_all_phrases(entry: &IndexedItem, phrases: &[String]) -> bool {
    phrases.iter().all(|phrase| entry.any_field_contains(phrase))
}

struct Scored {
    score: f32,
    matches: Vec<SearchMatch>,
    matched_terms: Vec<String>,
}

/// Weighted fuzzy scoring of one query over indexed items.
struct TermScorer<'q> {
    query: &'q ParsedQuery,
    index: &'q SearchIndex,
    matcher: FuzzyMatcher,
    highlighter: Highlighter,
    excerpt_length: usize,
    denominator: f32,
}

impl<'q> TermScorer<'q> {
    fn new(index: &'q SearchIndex, query: &'q ParsedQuery, config: &SearchConfig) -> Self {
        let components = query.text_component_count().max(1) as f32;
        TermScorer {
            query,
            index,
            matcher: FuzzyMatcher::new(config.fuzzy_threshold),
            highlighter: Highlighter::new(query),
            excerpt_length: config.excerpt_length,
            denominator: index.total_weight() * components,
        }
    }

    /// Score one item; `None` when no term or phrase matched anywhere.
    fn score(&self, entry: &IndexedItem) -> Option<Scored> {
        let mut total = 0.0f32;
        let mut matched: AHashSet<&str> = AHashSet::new();
        let mut contributing = vec![false; entry.fields.len()];

        for (position, (field, spec)) in entry.fields.iter().zip(self.index.fields()).enumerate() {
            if field.is_empty() {
                continue;
            }

            for term in &self.query.terms {
                if let Some(quality) =
                    self.matcher
                        .match_quality(term, &field.lower, &field.words, spec.fuzzy)
                {
                    total += spec.weight * quality;
                    matched.insert(term.as_str());
                    contributing[position] = true;
                }
            }

            for phrase in &self.query.phrases {
                if field.lower.contains(phrase.as_str()) {
                    total += spec.weight;
                    matched.insert(phrase.as_str());
                    contributing[position] = true;
                }
            }
        }

        if total <= 0.0 || self.denominator <= 0.0 {
            return None;
        }

        let score = (total / self.denominator).clamp(0.0, 1.0);
        let score = if score.is_nan() { 0.0 } else { score };
        if score <= 0.0 {
            return None;
        }

        let matches = entry
            .fields
            .iter()
            .zip(self.index.fields())
            .zip(contributing)
            .filter(|(_, contributed)| *contributed)
            .map(|((field, spec), _)| self.field_match(field, spec))
            .collect();

        // Query order, terms before phrases.
        let matched_terms = self
            .query
            .terms
            .iter()
            .chain(self.query.phrases.iter())
            .filter(|term| matched.contains(term.as_str()))
            .cloned()
            .collect();

        Some(Scored {
            score,
            matches,
            matched_terms,
        })
    }

    /// Excerpt and highlight positions of a field that contributed.
    ///
    /// A field hit only by edit distance has no literal match, so its excerpt
    /// is centred on the closest word instead.
    fn field_match(&self, field: &IndexedField, spec: &SearchableField) -> SearchMatch {
        let anchor = if self.highlighter.contains_any(&field.text) {
            None
        } else {
            self.fuzzy_anchor(field, spec.fuzzy)
        };

        let (excerpt, positions) = match anchor {
            Some(range) => {
                let word = &field.text[range.clone()];
                let excerpt = excerpt_at(&field.text, Some(range), self.excerpt_length);
                let positions = excerpt
                    .find(word)
                    .map(|at| {
                        let start = excerpt[..at].chars().count();
                        (start, start + word.chars().count())
                    })
                    .into_iter()
                    .collect();
                (excerpt, positions)
            }
            None => {
                let excerpt = self.highlighter.excerpt(&field.text, self.excerpt_length);
                let positions = self.highlighter.positions(&excerpt);
                (excerpt, positions)
            }
        };

        SearchMatch {
            field: spec.name.clone(),
            excerpt,
            positions,
        }
    }

    /// Byte range in the field text of the word nearest to any query term.
    fn fuzzy_anchor(&self, field: &IndexedField, fuzzy: bool) -> Option<Range<usize>> {
        let (word, _) = self
            .query
            .terms
            .iter()
            .filter_map(|term| self.matcher.closest_word(term, &field.words, fuzzy))
            .min_by(|a, b| a.1.total_cmp(&b.1))?;

        field
            .text
            .unicode_word_indices()
            .find(|(_, candidate)| candidate.to_lowercase() == word)
            .map(|(start, candidate)| start..start + candidate.len())
    }
}

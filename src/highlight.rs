//! Text highlighting and excerpts for search results.
//!
//! The effective highlight terms of a query are its terms, its phrases and
//! the individual words of each phrase. All matching is case-insensitive and
//! literal. Highlighting partitions a text into segments without altering
//! it: concatenating the segment texts always gives back the input.
//!
//! Terms are lowercased with full Unicode rules, so texts are searched in a
//! lowercase copy and match offsets are mapped back onto the original.

use std::ops::Range;

use log::debug;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::query::ParsedQuery;
use crate::search::config::DEFAULT_EXCERPT_LENGTH;

const ELLIPSIS: &str = "...";

/// A contiguous slice of text, flagged when it matched a query term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightSegment {
    /// The slice of the original text.
    pub text: String,
    /// Whether this slice matched a query term.
    pub highlighted: bool,
}

impl HighlightSegment {
    /// Create a new segment.
    pub fn new<S: Into<String>>(text: S, highlighted: bool) -> Self {
        HighlightSegment {
            text: text.into(),
            highlighted,
        }
    }
}

/// Collect the effective highlight terms of a query.
///
/// Returns lowercase, deduplicated terms ordered longest first so a longer
/// term is preferred over a shorter one starting at the same position.
pub fn highlight_terms(query: &ParsedQuery) -> Vec<String> {
    let mut terms: Vec<String> = query
        .terms
        .iter()
        .chain(query.phrases.iter())
        .map(|term| term.to_lowercase())
        .chain(
            query
                .phrases
                .iter()
                .flat_map(|phrase| phrase.split_whitespace().map(str::to_lowercase)),
        )
        .filter(|term| !term.is_empty())
        .collect();

    terms.sort_by(|a, b| {
        b.chars()
            .count()
            .cmp(&a.chars().count())
            .then_with(|| a.cmp(b))
    });
    terms.dedup();
    terms
}

/// Lowercase copy of a text with a map back to the original byte offsets.
struct FoldedText {
    lower: String,
    /// Byte range of the original character behind each byte of `lower`.
    /// Empty when lowering kept every offset in place.
    spans: Vec<(usize, usize)>,
}

impl FoldedText {
    fn new(text: &str) -> Self {
        if text.is_ascii() {
            return FoldedText {
                lower: text.to_ascii_lowercase(),
                spans: Vec::new(),
            };
        }

        let mut lower = String::with_capacity(text.len());
        let mut spans = Vec::with_capacity(text.len());
        for (start, c) in text.char_indices() {
            let before = lower.len();
            lower.extend(c.to_lowercase());
            let span = (start, start + c.len_utf8());
            spans.extend(std::iter::repeat_n(span, lower.len() - before));
        }
        FoldedText { lower, spans }
    }

    /// The original byte range covering `range` of the lowercase copy.
    fn original(&self, range: Range<usize>) -> Range<usize> {
        if self.spans.is_empty() || range.is_empty() {
            return range;
        }
        self.spans[range.start].0..self.spans[range.end - 1].1
    }

    /// Original byte ranges of the non-overlapping matches of `pattern`.
    fn find_iter<'a>(&'a self, pattern: &'a Regex) -> impl Iterator<Item = Range<usize>> + 'a {
        let mut last = 0;
        pattern.find_iter(&self.lower).filter_map(move |found| {
            let range = self.original(found.range());
            let start = range.start.max(last);
            if range.end <= start {
                return None;
            }
            last = range.end;
            Some(start..range.end)
        })
    }
}

/// A compiled highlighter for one query, reusable across many texts.
#[derive(Debug, Clone)]
pub struct Highlighter {
    terms: Vec<String>,
    pattern: Option<Regex>,
}

impl Highlighter {
    /// Compile the highlight pattern for a query.
    pub fn new(query: &ParsedQuery) -> Self {
        let terms = highlight_terms(query);
        let pattern = if terms.is_empty() {
            None
        } else {
            let alternation = terms
                .iter()
                .map(|term| regex::escape(term))
                .collect::<Vec<_>>()
                .join("|");
            match RegexBuilder::new(&alternation).case_insensitive(true).build() {
                Ok(regex) => Some(regex),
                Err(e) => {
                    debug!("highlight pattern for {} terms rejected: {e}", terms.len());
                    None
                }
            }
        };

        Highlighter { terms, pattern }
    }

    /// The effective highlight terms, longest first.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Whether there is nothing to highlight.
    pub fn is_empty(&self) -> bool {
        self.pattern.is_none()
    }

    /// Partition `text` into highlighted and plain segments.
    pub fn highlight(&self, text: &str) -> Vec<HighlightSegment> {
        let Some(pattern) = &self.pattern else {
            return vec![HighlightSegment::new(text, false)];
        };

        let folded = FoldedText::new(text);
        let mut segments = Vec::new();
        let mut last = 0;
        for found in folded.find_iter(pattern) {
            if found.start > last {
                segments.push(HighlightSegment::new(&text[last..found.start], false));
            }
            last = found.end;
            segments.push(HighlightSegment::new(&text[found], true));
        }
        if last < text.len() {
            segments.push(HighlightSegment::new(&text[last..], false));
        }
        segments
    }

    /// Character ranges (end exclusive) of the highlighted segments of `text`.
    pub fn positions(&self, text: &str) -> Vec<(usize, usize)> {
        let mut positions = Vec::new();
        let mut offset = 0;
        for segment in self.highlight(text) {
            let len = segment.text.chars().count();
            if segment.highlighted {
                positions.push((offset, offset + len));
            }
            offset += len;
        }
        positions
    }

    /// Whether any effective term occurs in `text`.
    pub fn contains_any(&self, text: &str) -> bool {
        self.pattern
            .as_ref()
            .is_some_and(|pattern| pattern.is_match(&FoldedText::new(text).lower))
    }

    /// Byte range of the earliest match in `text`; the longer term wins a tie.
    pub fn first_match(&self, text: &str) -> Option<Range<usize>> {
        let pattern = self.pattern.as_ref()?;
        let folded = FoldedText::new(text);
        pattern
            .find(&folded.lower)
            .map(|found| folded.original(found.range()))
    }

    /// A window of at most `max_length` characters centred on the first match.
    ///
    /// `...` marks each truncated side. Without a match the window starts at
    /// the beginning of the text.
    pub fn excerpt(&self, text: &str, max_length: usize) -> String {
        excerpt_at(text, self.first_match(text), max_length)
    }
}

/// A window of at most `max_length` characters of `text` centred on the byte
/// range `anchor`, or starting at 0 without one.
pub fn excerpt_at(text: &str, anchor: Option<Range<usize>>, max_length: usize) -> String {
    if max_length == 0 {
        return String::new();
    }

    let char_count = text.chars().count();
    if char_count <= max_length {
        return text.to_string();
    }

    let start = match anchor {
        Some(range) => {
            let match_start = text[..range.start].chars().count();
            let match_len = text[range].chars().count();
            if match_len >= max_length {
                match_start
            } else {
                let center = match_start + match_len / 2;
                center
                    .saturating_sub(max_length / 2)
                    .min(char_count - max_length)
            }
        }
        None => 0,
    };
    let end = (start + max_length).min(char_count);

    let mut excerpt = String::with_capacity(max_length + 2 * ELLIPSIS.len());
    if start > 0 {
        excerpt.push_str(ELLIPSIS);
    }
    excerpt.extend(text.chars().skip(start).take(end - start));
    if end < char_count {
        excerpt.push_str(ELLIPSIS);
    }
    excerpt
}

/// Partition `text` into segments, flagging matches of the query's terms.
pub fn highlight(text: &str, query: &ParsedQuery) -> Vec<HighlightSegment> {
    Highlighter::new(query).highlight(text)
}

/// Character ranges of the highlighted segments of `text`.
pub fn highlight_positions(text: &str, query: &ParsedQuery) -> Vec<(usize, usize)> {
    Highlighter::new(query).positions(text)
}

/// A bounded excerpt of `text` centred on the first match.
pub fn excerpt(text: &str, query: &ParsedQuery, max_length: usize) -> String {
    Highlighter::new(query).excerpt(text, max_length)
}

/// [`excerpt`] with the default length of 200 characters.
pub fn default_excerpt(text: &str, query: &ParsedQuery) -> String {
    excerpt(text, query, DEFAULT_EXCERPT_LENGTH)
}

/// Whether any effective term is a case-insensitive substring of `text`.
pub fn contains_any(text: &str, query: &ParsedQuery) -> bool {
    Highlighter::new(query).contains_any(text)
}

/// Excerpt the first field, in the given order, that contains a match.
///
/// Falls back to the first non-empty field when nothing matches.
pub fn first_excerpt(fields: &[&str], query: &ParsedQuery, max_length: usize) -> String {
    let highlighter = Highlighter::new(query);
    fields
        .iter()
        .find(|text| highlighter.contains_any(text))
        .or_else(|| fields.iter().find(|text| !text.is_empty()))
        .map(|text| highlighter.excerpt(text, max_length))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::parse_query;

    fn joined(segments: &[HighlightSegment]) -> String {
        segments.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn test_highlight_simple() {
        let segments = highlight("Hello world", &parse_query("hello"));
        assert_eq!(
            segments,
            vec![
                HighlightSegment::new("Hello", true),
                HighlightSegment::new(" world", false),
            ]
        );
    }

    #[test]
    fn test_highlight_without_terms() {
        let query = parse_query("tag:api -legacy");
        assert_eq!(
            highlight("Hello world", &query),
            vec![HighlightSegment::new("Hello world", false)]
        );
        assert_eq!(highlight("", &query), vec![HighlightSegment::new("", false)]);
    }

    #[test]
    fn test_longest_term_wins() {
        let query = parse_query(r#"zero "zero trust""#);
        let segments = highlight("A zero trust model", &query);
        assert_eq!(
            segments,
            vec![
                HighlightSegment::new("A ", false),
                HighlightSegment::new("zero trust", true),
                HighlightSegment::new(" model", false),
            ]
        );
    }

    #[test]
    fn test_phrase_words_highlighted_separately() {
        let query = parse_query(r#""zero trust""#);
        let segments = highlight("Trust nobody, zero exceptions", &query);
        let marked: Vec<&str> = segments
            .iter()
            .filter(|s| s.highlighted)
            .map(|s| s.text.as_str())
            .collect();
        assert_eq!(marked, vec!["Trust", "zero"]);
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        let query = parse_query("c++ (beta)");
        let text = "Learning C++ (beta) today";
        let segments = highlight(text, &query);
        assert_eq!(joined(&segments), text);
        assert!(segments.iter().any(|s| s.highlighted && s.text == "C++"));
        assert!(segments.iter().any(|s| s.highlighted && s.text == "(beta)"));
    }

    #[test]
    fn test_round_trip() {
        let texts = [
            "",
            "Hello world",
            "ünïcödé straße ÜNÏCÖDÉ",
            "aaaa",
            "日本語のテキスト",
            "trailing match hello",
        ];
        let queries = ["hello", "a aa aaa", r#""ünïcödé straße""#, "本語", "", "-x tag:y"];
        for text in texts {
            for raw in queries {
                let segments = highlight(text, &parse_query(raw));
                assert_eq!(joined(&segments), text, "text {text:?} query {raw:?}");
            }
        }
    }

    #[test]
    fn test_positions_are_character_offsets() {
        let query = parse_query("straße");
        assert_eq!(highlight_positions("große straße", &query), vec![(6, 12)]);
    }

    #[test]
    fn test_case_folding_that_changes_length() {
        // "İ" lowercases to two characters.
        let query = parse_query("İstanbul");
        let text = "İstanbul guide";
        assert_eq!(
            highlight(text, &query),
            vec![
                HighlightSegment::new("İstanbul", true),
                HighlightSegment::new(" guide", false),
            ]
        );
        assert!(contains_any(text, &query));
        assert_eq!(highlight_positions(text, &query), vec![(0, 8)]);
        assert_eq!(
            highlight_positions("Visit İSTANBUL and istanbul", &query),
            vec![(6, 14)]
        );

        let long = format!("{}İstanbul{}", "x".repeat(50), "y".repeat(50));
        assert_eq!(excerpt(&long, &query, 10), "...xİstanbuly...");
    }

    #[test]
    fn test_contains_any() {
        let query = parse_query(r#"rust "zero trust""#);
        assert!(contains_any("I like RUST", &query));
        assert!(contains_any("Trust issues", &query));
        assert!(!contains_any("Go and Java", &query));
        assert!(!contains_any("anything", &parse_query("tag:api")));
    }

    #[test]
    fn test_excerpt_centered() {
        let text = format!("{}MATCH{}", "A".repeat(150), "B".repeat(150));
        let result = excerpt(&text, &parse_query("match"), 20);
        assert_eq!(result, format!("...{}MATCH{}...", "A".repeat(8), "B".repeat(7)));
    }

    #[test]
    fn test_excerpt_without_match() {
        let text = "x".repeat(50);
        assert_eq!(
            excerpt(&text, &parse_query("nothing"), 10),
            format!("{}...", "x".repeat(10))
        );
        assert_eq!(excerpt("short", &parse_query("nothing"), 10), "short");
    }

    #[test]
    fn test_excerpt_near_edges() {
        let text = format!("MATCH{}", "b".repeat(100));
        assert_eq!(
            excerpt(&text, &parse_query("match"), 10),
            format!("MATCH{}...", "b".repeat(5))
        );

        let text = format!("{}MATCH", "a".repeat(100));
        assert_eq!(
            excerpt(&text, &parse_query("match"), 10),
            format!("...{}MATCH", "a".repeat(5))
        );
    }

    #[test]
    fn test_excerpt_match_longer_than_window() {
        let text = format!("{} {}", "a".repeat(30), "z".repeat(30));
        let query = parse_query(&"z".repeat(30));
        assert_eq!(excerpt(&text, &query, 10), format!("...{}...", "z".repeat(10)));
    }

    #[test]
    fn test_excerpt_unicode_safe() {
        let text = format!("{}ñandú{}", "é".repeat(40), "ü".repeat(40));
        let result = excerpt(&text, &parse_query("ñandú"), 11);
        assert_eq!(result, format!("...{}ñandú{}...", "é".repeat(3), "ü".repeat(3)));
    }

    #[test]
    fn test_first_excerpt() {
        let query = parse_query("rust");
        assert_eq!(
            first_excerpt(&["Intro", "All about Rust"], &query, 50),
            "All about Rust"
        );
        assert_eq!(first_excerpt(&["", "Fallback"], &query, 50), "Fallback");
        assert_eq!(first_excerpt(&[], &query, 50), "");
    }

    #[test]
    fn test_highlight_terms_dedup_and_order() {
        let query = parse_query(r#"trust "zero trust" ZERO"#);
        assert_eq!(highlight_terms(&query), vec!["zero trust", "trust", "zero"]);
    }
}

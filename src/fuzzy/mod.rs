//! Fuzzy term matching.
//!
//! A term is compared against the words of a field. The distance of a term
//! to a field is the smallest distance to any of its words:
//!
//! - an identical word is distance 0
//! - a word containing the term is `0.1 × (1 - |term| / |word|)`
//! - otherwise the Damerau-Levenshtein distance normalized by the longer length
//!
//! A term matches when its distance is at most the configured threshold; the
//! match quality is `1 - distance`. Fields marked non-fuzzy only accept the
//! first two cases.

pub mod levenshtein;

use unicode_segmentation::UnicodeSegmentation;

pub use levenshtein::{damerau_levenshtein_distance, normalized_distance};

/// Scale applied to partial-word (substring) matches.
pub const CONTAINMENT_PENALTY: f32 = 0.1;

/// Split text into lowercase words using Unicode word boundaries.
pub fn tokenize(text: &str) -> Vec<String> {
    text.unicode_words().map(str::to_lowercase).collect()
}

/// Matches query terms against tokenized field text.
#[derive(Debug, Clone, Copy)]
pub struct FuzzyMatcher {
    threshold: f32,
}

impl FuzzyMatcher {
    /// Create a matcher accepting distances up to `threshold`.
    pub fn new(threshold: f32) -> Self {
        FuzzyMatcher {
            threshold: threshold.clamp(0.0, 1.0),
        }
    }

    /// The maximum accepted distance.
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Distance of a lowercase term to a single lowercase word.
    pub fn word_distance(&self, term: &str, word: &str, fuzzy: bool) -> Option<f32> {
        if term == word {
            return Some(0.0);
        }

        let term_len = term.chars().count();
        let word_len = word.chars().count();
        if term_len == 0 || word_len == 0 {
            return None;
        }

        if word.contains(term) {
            let distance = CONTAINMENT_PENALTY * (1.0 - term_len as f32 / word_len as f32);
            return self.accept(distance);
        }

        if !fuzzy {
            return None;
        }

        // Length difference is a lower bound on the edit distance.
        let max_len = term_len.max(word_len) as f32;
        if term_len.abs_diff(word_len) as f32 / max_len > self.threshold {
            return None;
        }

        self.accept(normalized_distance(term, word))
    }

    /// Smallest distance of a lowercase term to a field.
    ///
    /// `text` is the lowercase field text and `words` its tokens. Terms that
    /// are not a single word (`c++`, `node.js`) also match as a literal
    /// substring of the whole text.
    pub fn field_distance(
        &self,
        term: &str,
        text: &str,
        words: &[String],
        fuzzy: bool,
    ) -> Option<f32> {
        if term.is_empty() {
            return None;
        }

        if !is_single_word(term) && text.contains(term) {
            return Some(0.0);
        }

        self.closest_word(term, words, fuzzy)
            .map(|(_, distance)| distance)
    }

    /// The word of `words` nearest to a lowercase term, with its distance.
    ///
    /// The first word wins a tie.
    pub fn closest_word<'w>(
        &self,
        term: &str,
        words: &'w [String],
        fuzzy: bool,
    ) -> Option<(&'w str, f32)> {
        let mut best: Option<(&'w str, f32)> = None;
        for word in words {
            if let Some(distance) = self.word_distance(term, word, fuzzy) {
                if distance == 0.0 {
                    return Some((word, 0.0));
                }
                if best.is_none_or(|(_, b)| distance < b) {
                    best = Some((word, distance));
                }
            }
        }
        best
    }

    /// Match quality in `(0, 1]` of a term against a field, if it matches.
    pub fn match_quality(
        &self,
        term: &str,
        text: &str,
        words: &[String],
        fuzzy: bool,
    ) -> Option<f32> {
        self.field_distance(term, text, words, fuzzy)
            .map(|distance| 1.0 - distance)
            .filter(|quality| *quality > 0.0)
    }

    fn accept(&self, distance: f32) -> Option<f32> {
        (distance <= self.threshold).then_some(distance)
    }
}

fn is_single_word(term: &str) -> bool {
    let mut words = term.unicode_words();
    matches!((words.next(), words.next()), (Some(word), None) if word == term)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(text: &str) -> Vec<String> {
        tokenize(text)
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(tokenize("Zero-Trust, APIs!"), vec!["zero", "trust", "apis"]);
        assert!(tokenize("  ").is_empty());
    }

    #[test]
    fn test_exact_word() {
        let matcher = FuzzyMatcher::new(0.2);
        let field = words("Zero Trust Guide");
        assert_eq!(
            matcher.field_distance("trust", "zero trust guide", &field, true),
            Some(0.0)
        );
        assert_eq!(
            matcher.match_quality("trust", "zero trust guide", &field, true),
            Some(1.0)
        );
    }

    #[test]
    fn test_typo_within_threshold() {
        let matcher = FuzzyMatcher::new(0.2);
        let field = words("Security best practices");
        let distance = matcher
            .field_distance("secruity", "security best practices", &field, true)
            .unwrap();
        assert!((distance - 0.125).abs() < 1e-6);
    }

    #[test]
    fn test_closest_word() {
        let matcher = FuzzyMatcher::new(0.2);
        let field = words("Cloud security and securities");
        assert_eq!(
            matcher.closest_word("secruity", &field, true),
            Some(("security", 0.125))
        );
        assert_eq!(matcher.closest_word("secruity", &field, false), None);
        assert_eq!(matcher.closest_word("cloud", &field, true), Some(("cloud", 0.0)));
    }

    #[test]
    fn test_typo_rejected_for_non_fuzzy_field() {
        let matcher = FuzzyMatcher::new(0.2);
        let field = words("security");
        assert_eq!(
            matcher.field_distance("secruity", "security", &field, false),
            None
        );
        // Substrings still count.
        assert!(matcher.field_distance("secur", "security", &field, false).is_some());
    }

    #[test]
    fn test_prefix_scores_below_exact() {
        let matcher = FuzzyMatcher::new(0.2);
        let field = words("security");
        let quality = matcher
            .match_quality("sec", "security", &field, true)
            .unwrap();
        assert!(quality < 1.0);
        assert!(quality > 0.9);
    }

    #[test]
    fn test_threshold_controls_strictness() {
        let field = words("kitten");
        assert!(FuzzyMatcher::new(0.2)
            .field_distance("sitting", "kitten", &field, true)
            .is_none());
        assert!(FuzzyMatcher::new(0.5)
            .field_distance("sitting", "kitten", &field, true)
            .is_some());
        // Zero threshold only accepts exact words.
        let strict = FuzzyMatcher::new(0.0);
        assert!(strict.field_distance("kitten", "kitten", &field, true).is_some());
        assert!(strict.field_distance("kitte", "kitten", &field, true).is_none());
    }

    #[test]
    fn test_non_word_terms_match_literally() {
        let matcher = FuzzyMatcher::new(0.2);
        let text = "tips for c++ and node.js";
        assert_eq!(
            matcher.field_distance("c++", text, &words(text), true),
            Some(0.0)
        );
        assert_eq!(
            matcher.field_distance("node.js", text, &words(text), true),
            Some(0.0)
        );
    }

    #[test]
    fn test_unrelated_term() {
        let matcher = FuzzyMatcher::new(0.2);
        let field = words("Zero Trust Guide");
        assert!(matcher
            .field_distance("security", "zero trust guide", &field, true)
            .is_none());
        assert!(matcher.field_distance("", "zero", &words("zero"), true).is_none());
    }
}

//! Profanity vocabulary
//!
//! Two lists live here. `ProfanityMapping` drives aggregation: each canonical
//! term maps to the `query_string` pattern the search service matches against
//! the tweet text. `COLLECTION_WORDS` is the coarser substring list used at
//! ingestion time to decide whether a tweet is worth storing at all.

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::error::{PpiError, Result};

/// Ordered term -> match-pattern mapping. Keys are unique and insertion order
/// is the order terms appear in extracted reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfanityMapping {
    entries: Vec<(String, String)>,
}

impl ProfanityMapping {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Appends a term. Fails if the term is already mapped.
    pub fn with_term(mut self, term: impl Into<String>, pattern: impl Into<String>) -> Result<Self> {
        let term = term.into();
        if self.contains(&term) {
            return Err(PpiError::invalid(
                "profanity_mapping",
                format!("term '{}' is mapped more than once", term),
            ));
        }
        self.entries.push((term, pattern.into()));
        Ok(self)
    }

    pub fn contains(&self, term: &str) -> bool {
        self.entries.iter().any(|(t, _)| t == term)
    }

    pub fn pattern(&self, term: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(t, _)| t == term)
            .map(|(_, p)| p.as_str())
    }

    /// Terms in insertion order
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(t, _)| t.as_str())
    }

    /// `(term, pattern)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(t, p)| (t.as_str(), p.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ProfanityMapping {
    fn default() -> Self {
        DEFAULT_MAPPING.clone()
    }
}

static DEFAULT_MAPPING: Lazy<ProfanityMapping> = Lazy::new(|| ProfanityMapping {
    entries: [
        ("fuck", "text:*fuck*"),
        ("shit", "text:*shit*"),
        ("bitch", "text:bitch*"),
        ("ass", "text:ass*"),
        ("dick", "text:*dick*"),
    ]
    .into_iter()
    .map(|(t, p)| (t.to_string(), p.to_string()))
    .collect(),
});

/// Substrings that mark a tweet as profane during collection. Matched against
/// lower-cased text; `" ass "` keeps its padding so "class" and "pass" don't hit.
pub const COLLECTION_WORDS: &[&str] = &[
    "fuck", "shit", "bitch", "dick", " ass ", "asshole", "asshat", "jackass", "dumbass",
];

/// True if the lower-cased text contains any collection word.
pub fn text_contains_profanity(text: &str) -> bool {
    let lowered = text.to_lowercase();
    COLLECTION_WORDS.iter().any(|word| lowered.contains(word))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mapping_order() {
        let mapping = ProfanityMapping::default();
        let terms: Vec<_> = mapping.terms().collect();
        assert_eq!(terms, vec!["fuck", "shit", "bitch", "ass", "dick"]);
        assert_eq!(mapping.pattern("bitch"), Some("text:bitch*"));
    }

    #[test]
    fn test_duplicate_term_rejected() {
        let result = ProfanityMapping::new()
            .with_term("fuck", "text:*fuck*")
            .and_then(|m| m.with_term("fuck", "text:fuck"));
        assert!(matches!(
            result,
            Err(PpiError::InvalidArgument { name: "profanity_mapping", .. })
        ));
    }

    #[test]
    fn test_padded_ass_does_not_match_inside_words() {
        assert!(!text_contains_profanity("First class pass"));
        assert!(text_contains_profanity("what a pain in the ass today"));
        assert!(text_contains_profanity("Total JACKASS"));
    }
}

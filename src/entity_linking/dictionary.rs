//! Per-kind label dictionary
//!
//! Maps normalized (lowercased) labels to their canonical spelling. The
//! fuzzy matcher walks the labels of a kind in insertion order; aliases map
//! an extra surface form onto an existing canonical label.

use super::mention::spans_overlap;
use super::normalize::normalize_text;
use crate::error::SourceError;
use crate::sources::traits::{EntityRecognizer, RecognizedSpan};
use crate::types::EntityKind;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Default, Clone)]
struct KindIndex {
    /// Normalized keys in insertion order
    keys: Vec<String>,
    /// Normalized key → canonical label
    canonical: HashMap<String, String>,
}

/// Labels known for each [`EntityKind`]
#[derive(Debug, Default, Clone)]
pub struct EntityDictionary {
    kinds: HashMap<EntityKind, KindIndex>,
}

impl EntityDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a canonical label
    pub fn insert(&mut self, kind: EntityKind, label: impl Into<String>) -> &mut Self {
        let label = label.into();
        self.insert_alias(kind, label.clone(), label)
    }

    /// Register `alias` as another spelling of `canonical`
    pub fn insert_alias(
        &mut self,
        kind: EntityKind,
        alias: impl AsRef<str>,
        canonical: impl Into<String>,
    ) -> &mut Self {
        let key = normalize_text(alias.as_ref().trim());
        if key.is_empty() {
            return self;
        }
        let index = self.kinds.entry(kind).or_default();
        if !index.canonical.contains_key(&key) {
            index.keys.push(key.clone());
            index.canonical.insert(key, canonical.into());
        }
        self
    }

    /// Canonical label for any spelling of a known label
    pub fn canonical(&self, kind: EntityKind, text: &str) -> Option<&str> {
        self.kinds
            .get(&kind)?
            .canonical
            .get(&normalize_text(text.trim()))
            .map(String::as_str)
    }

    /// Normalized keys of a kind, in insertion order
    pub fn keys(&self, kind: EntityKind) -> impl Iterator<Item = &str> {
        self.kinds
            .get(&kind)
            .into_iter()
            .flat_map(|index| index.keys.iter().map(String::as_str))
    }

    pub fn len(&self, kind: EntityKind) -> usize {
        self.kinds.get(&kind).map(|i| i.keys.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.values().all(|i| i.keys.is_empty())
    }
}

/// Exact dictionary recognizer.
///
/// Stand-in for a trained NER model: reports case-insensitive, word-bounded
/// occurrences of dictionary keys, longest first at each position, without
/// overlaps.
pub struct DictionaryRecognizer {
    dictionary: Arc<EntityDictionary>,
}

impl DictionaryRecognizer {
    pub fn new(dictionary: Arc<EntityDictionary>) -> Self {
        Self { dictionary }
    }
}

impl EntityRecognizer for DictionaryRecognizer {
    fn recognize(&self, text: &str, kind: EntityKind) -> Result<Vec<RecognizedSpan>, SourceError> {
        let original: Vec<char> = text.chars().collect();
        // One lowercase char per input char keeps offsets aligned
        let folded: Vec<char> = original
            .iter()
            .map(|c| c.to_lowercase().next().unwrap_or(*c))
            .collect();

        let mut found: Vec<(usize, usize)> = Vec::new();
        for key in self.dictionary.keys(kind) {
            let needle: Vec<char> = key.chars().collect();
            if needle.is_empty() || needle.len() > folded.len() {
                continue;
            }
            for start in 0..=(folded.len() - needle.len()) {
                let end = start + needle.len();
                if folded[start..end] != needle[..] {
                    continue;
                }
                let bounded_left = start == 0 || !folded[start - 1].is_alphanumeric();
                let bounded_right = end == folded.len() || !folded[end].is_alphanumeric();
                if bounded_left && bounded_right {
                    found.push((start, end));
                }
            }
        }

        found.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| (b.1 - b.0).cmp(&(a.1 - a.0))));
        found.dedup();

        let mut spans: Vec<RecognizedSpan> = Vec::new();
        for (start, end) in found {
            if spans
                .iter()
                .any(|s| spans_overlap(s.start, s.end, start, end))
            {
                continue;
            }
            let span_text: String = original[start..end].iter().collect();
            spans.push(RecognizedSpan::new(span_text, start, end));
        }

        debug!(kind = %kind, count = spans.len(), "Dictionary recognizer spans");
        Ok(spans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dictionary() -> EntityDictionary {
        let mut dictionary = EntityDictionary::new();
        dictionary
            .insert(EntityKind::Movie, "Alien")
            .insert(EntityKind::Movie, "Alien 3")
            .insert(EntityKind::Movie, "Heat")
            .insert(EntityKind::Relation, "director")
            .insert_alias(EntityKind::Relation, "directed", "director");
        dictionary
    }

    #[test]
    fn test_canonical_lookup_is_case_insensitive() {
        let dictionary = dictionary();
        assert_eq!(dictionary.canonical(EntityKind::Movie, "ALIEN 3"), Some("Alien 3"));
        assert_eq!(dictionary.canonical(EntityKind::Relation, "Directed"), Some("director"));
        assert_eq!(dictionary.canonical(EntityKind::Person, "alien"), None);
    }

    #[test]
    fn test_keys_in_insertion_order() {
        let dictionary = dictionary();
        let keys: Vec<&str> = dictionary.keys(EntityKind::Movie).collect();
        assert_eq!(keys, vec!["alien", "alien 3", "heat"]);
        assert_eq!(dictionary.len(EntityKind::Relation), 2);
        assert_eq!(dictionary.keys(EntityKind::Person).count(), 0);
    }

    #[test]
    fn test_duplicate_insert_keeps_first_canonical() {
        let mut dictionary = EntityDictionary::new();
        dictionary
            .insert(EntityKind::Movie, "Heat")
            .insert(EntityKind::Movie, "HEAT");
        assert_eq!(dictionary.len(EntityKind::Movie), 1);
        assert_eq!(dictionary.canonical(EntityKind::Movie, "heat"), Some("Heat"));
    }

    #[test]
    fn test_recognizer_prefers_longest_at_position() {
        let recognizer = DictionaryRecognizer::new(Arc::new(dictionary()));
        let spans = recognizer
            .recognize("Is Alien 3 better than Heat", EntityKind::Movie)
            .unwrap();
        assert_eq!(
            spans,
            vec![
                RecognizedSpan::new("Alien 3", 3, 10),
                RecognizedSpan::new("Heat", 23, 27),
            ]
        );
    }

    #[test]
    fn test_recognizer_requires_word_boundaries() {
        let recognizer = DictionaryRecognizer::new(Arc::new(dictionary()));
        let spans = recognizer
            .recognize("the aliens overheated", EntityKind::Movie)
            .unwrap();
        assert!(spans.is_empty());
    }
}

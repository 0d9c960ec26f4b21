//! Span resolver
//!
//! Turns a message into the canonical labels it mentions for one kind:
//!
//! 1. Normalize (NFKC + lowercase) and expand hyphen variants
//! 2. Rule spans from the [`EntityRecognizer`], deduplicated, first-come
//!    overlap filtering
//! 3. Fuzzy alignment of every dictionary key, accepted above a threshold
//!    that depends on rule evidence and label length, full words only
//! 4. Fuzzy overlap filtering, then merge with rule spans
//! 5. Noise labels dropped when anything else was found
//! 6. Map each span back to its canonical label

use super::dictionary::EntityDictionary;
use super::fuzzy::{is_bounded, is_boundary, partial_ratio_alignment};
use super::mention::{combine_and_sort, filter_overlapping, MatchSource, Mention};
use super::normalize::{hyphen_variants, normalize_text};
use crate::config::ResolverConfig;
use crate::error::Result;
use crate::sources::traits::EntityRecognizer;
use crate::types::EntityKind;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// Leading articles that allow a match to start inside the previous token
const ARTICLES: [&str; 2] = ["a ", "the "];

pub struct SpanResolver {
    dictionary: Arc<EntityDictionary>,
    recognizer: Option<Arc<dyn EntityRecognizer>>,
    config: ResolverConfig,
}

impl SpanResolver {
    pub fn new(dictionary: Arc<EntityDictionary>, config: ResolverConfig) -> Self {
        Self {
            dictionary,
            recognizer: None,
            config,
        }
    }

    /// Attach a rule-based recognizer
    pub fn with_recognizer(mut self, recognizer: Arc<dyn EntityRecognizer>) -> Self {
        self.recognizer = Some(recognizer);
        self
    }

    pub fn dictionary(&self) -> &EntityDictionary {
        &self.dictionary
    }

    /// Canonical labels of `kind` mentioned in `text`, left to right
    pub fn resolve(&self, text: &str, kind: EntityKind) -> Vec<String> {
        self.resolve_mentions(text, kind)
            .into_iter()
            .filter_map(|m| {
                let canonical = self.dictionary.canonical(kind, &m.label);
                if canonical.is_none() {
                    debug!(label = %m.label, "Span has no dictionary entry, skipping");
                }
                canonical.map(str::to_string)
            })
            .collect()
    }

    /// Same as [`resolve`](Self::resolve) with the kind given by name.
    ///
    /// Fails with `AgentError::InvalidKind` for anything other than
    /// `movie`, `person` or `relation`.
    pub fn resolve_named(&self, text: &str, kind: &str) -> Result<Vec<String>> {
        let kind: EntityKind = kind.parse()?;
        Ok(self.resolve(text, kind))
    }

    /// Reconciled, non-overlapping mentions ordered by start offset
    pub fn resolve_mentions(&self, text: &str, kind: EntityKind) -> Vec<Mention> {
        let normalized = normalize_text(text);
        let variants = hyphen_variants(&normalized);
        debug!(kind = %kind, variants = variants.len(), "Resolving spans");

        let mut rule_all = Vec::new();
        let mut fuzzy_all = Vec::new();

        for variant in &variants {
            let rule = self.rule_matches(variant, kind);
            let threshold = if rule.is_empty() {
                self.config.threshold_without_rules
            } else {
                self.config.threshold_with_rules
            };
            let fuzzy = self.fuzzy_matches(variant, kind, threshold);
            debug!(
                variant = %variant,
                rule = rule.len(),
                fuzzy = fuzzy.len(),
                threshold,
                "Variant matches"
            );
            rule_all.extend(rule);
            fuzzy_all.extend(fuzzy);
        }

        let mut combined = combine_and_sort(rule_all, fuzzy_all);

        if combined.len() > 1 {
            combined.retain(|m| !self.config.noise_labels.iter().any(|n| *n == m.label));
        }

        debug!(
            labels = ?combined.iter().map(|m| m.label.as_str()).collect::<Vec<_>>(),
            "Combined mentions"
        );
        combined
    }

    fn rule_matches(&self, text: &str, kind: EntityKind) -> Vec<Mention> {
        let Some(recognizer) = &self.recognizer else {
            return vec![];
        };

        let spans = match recognizer.recognize(text, kind) {
            Ok(spans) => spans,
            Err(e) => {
                warn!(error = %e, kind = %kind, "Recognizer failed, continuing with fuzzy matches");
                return vec![];
            }
        };

        let text_len = text.chars().count();
        let mut seen = HashSet::new();
        let mentions: Vec<Mention> = spans
            .into_iter()
            .filter(|s| s.start < s.end && s.end <= text_len)
            .filter(|s| seen.insert((s.text.clone(), s.start, s.end)))
            .map(|s| Mention {
                label: normalize_text(&s.text),
                matched_text: s.text,
                kind,
                score: 100.0,
                start: s.start,
                end: s.end,
                is_full_word: true,
                source: MatchSource::Rule,
            })
            .collect();

        filter_overlapping(mentions)
    }

    fn fuzzy_matches(&self, text: &str, kind: EntityKind, threshold: f64) -> Vec<Mention> {
        // Trailing space lets a label at the very end align as a full word
        let haystack: Vec<char> = text.chars().chain(std::iter::once(' ')).collect();
        let mut matches = Vec::new();

        for key in self.dictionary.keys(kind) {
            let needle: Vec<char> = key.chars().collect();
            let cutoff = if needle.len() < self.config.short_label_len {
                threshold.max(self.config.short_label_threshold)
            } else {
                threshold
            };

            let Some(alignment) = partial_ratio_alignment(&needle, &haystack, cutoff) else {
                continue;
            };

            let (start, end) = (alignment.dest_start, alignment.dest_end);
            let window: String = haystack[start..end].iter().collect();
            let matched_text = window.trim().trim_start_matches('"').to_string();
            if matched_text.is_empty() {
                continue;
            }

            let bounded_right = end == haystack.len() || is_boundary(haystack[end]);
            let mut is_full_word = is_bounded(&haystack, start, end);

            // "nightmare on elm street" still finds "a nightmare on elm street"
            // when the alignment borrows the tail of the previous token
            if !is_full_word
                && bounded_right
                && start > 0
                && matched_text.chars().count() > 3
                && ARTICLES.iter().any(|a| key.starts_with(a))
            {
                is_full_word = true;
            }

            if !is_full_word {
                continue;
            }

            matches.push(Mention {
                matched_text,
                label: key.to_string(),
                kind,
                score: alignment.score,
                start,
                end,
                is_full_word,
                source: MatchSource::Fuzzy,
            });
        }

        // Best alignments are seen first, longer labels among equal scores,
        // so "alien 3" is not shadowed by "alien"; dictionary order otherwise
        matches.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| b.label_len().cmp(&a.label_len()))
        });
        filter_overlapping(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity_linking::dictionary::DictionaryRecognizer;
    use crate::error::{AgentError, SourceError};
    use crate::sources::traits::RecognizedSpan;

    fn dictionary() -> Arc<EntityDictionary> {
        let mut dictionary = EntityDictionary::new();
        dictionary
            .insert(EntityKind::Movie, "Alien")
            .insert(EntityKind::Movie, "Alien 3")
            .insert(EntityKind::Movie, "Good Will Hunting")
            .insert(EntityKind::Movie, "Spider-Man: Far From Home")
            .insert(EntityKind::Movie, "A Nightmare on Elm Street")
            .insert(EntityKind::Movie, "Tell")
            .insert(EntityKind::Movie, "Heat")
            .insert(EntityKind::Movie, "Gattaca")
            .insert(EntityKind::Person, "Gus Van Sant")
            .insert(EntityKind::Relation, "director")
            .insert_alias(EntityKind::Relation, "directed", "director");
        Arc::new(dictionary)
    }

    fn resolver() -> SpanResolver {
        SpanResolver::new(dictionary(), ResolverConfig::default())
    }

    struct FailingRecognizer;

    impl EntityRecognizer for FailingRecognizer {
        fn recognize(&self, _: &str, _: EntityKind) -> std::result::Result<Vec<RecognizedSpan>, SourceError> {
            Err(SourceError::unavailable("ner", "model not loaded"))
        }
    }

    struct FixedRecognizer(Vec<RecognizedSpan>);

    impl EntityRecognizer for FixedRecognizer {
        fn recognize(&self, _: &str, _: EntityKind) -> std::result::Result<Vec<RecognizedSpan>, SourceError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_exact_label_found() {
        assert_eq!(
            resolver().resolve("Who directed Good Will Hunting?", EntityKind::Movie),
            vec!["Good Will Hunting"]
        );
    }

    #[test]
    fn test_typo_found_without_rules() {
        assert_eq!(
            resolver().resolve("who directed good wil hunting", EntityKind::Movie),
            vec!["Good Will Hunting"]
        );
    }

    #[test]
    fn test_longer_title_wins() {
        assert_eq!(
            resolver().resolve("when was alien 3 released", EntityKind::Movie),
            vec!["Alien 3"]
        );
    }

    #[test]
    fn test_partial_word_rejected() {
        assert!(resolver()
            .resolve("the aliens are coming", EntityKind::Movie)
            .is_empty());
    }

    #[test]
    fn test_hyphen_glyph_invariance() {
        for text in [
            "Who directed Spider-Man: Far From Home?",
            "Who directed Spider\u{2013}Man: Far From Home?",
            "Who directed Spider\u{2014}Man: Far From Home?",
        ] {
            assert_eq!(
                resolver().resolve(text, EntityKind::Movie),
                vec!["Spider-Man: Far From Home"],
                "failed for {text}"
            );
        }
    }

    #[test]
    fn test_article_fallback() {
        assert_eq!(
            resolver().resolve("who directed nightmare on elm street", EntityKind::Movie),
            vec!["A Nightmare on Elm Street"]
        );
    }

    #[test]
    fn test_noise_label_dropped_with_other_results() {
        assert_eq!(
            resolver().resolve("tell me who directed heat", EntityKind::Movie),
            vec!["Heat"]
        );
        assert_eq!(resolver().resolve("tell", EntityKind::Movie), vec!["Tell"]);
    }

    #[test]
    fn test_multiple_mentions_left_to_right() {
        assert_eq!(
            resolver().resolve("recommend movies like heat and alien 3", EntityKind::Movie),
            vec!["Heat", "Alien 3"]
        );
    }

    #[test]
    fn test_alias_maps_to_canonical() {
        let resolver = SpanResolver::new(dictionary(), ResolverConfig::default())
            .with_recognizer(Arc::new(DictionaryRecognizer::new(dictionary())));
        assert_eq!(
            resolver.resolve("who directed ", EntityKind::Relation),
            vec!["director"]
        );
    }

    #[test]
    fn test_recognizer_failure_falls_back_to_fuzzy() {
        let resolver = resolver().with_recognizer(Arc::new(FailingRecognizer));
        assert_eq!(
            resolver.resolve("is heat any good", EntityKind::Movie),
            vec!["Heat"]
        );
    }

    #[test]
    fn test_rule_spans_deduplicated_and_unknown_skipped() {
        let resolver = resolver().with_recognizer(Arc::new(FixedRecognizer(vec![
            RecognizedSpan::new("gus van sant", 9, 21),
            RecognizedSpan::new("gus van sant", 9, 21),
            RecognizedSpan::new("van", 13, 16),
            RecognizedSpan::new("bogus", 0, 99),
        ])));
        let mentions = resolver.resolve_mentions("pictures gus van sant", EntityKind::Person);
        assert_eq!(mentions.len(), 1);
        assert_eq!(
            resolver.resolve("pictures gus van sant", EntityKind::Person),
            vec!["Gus Van Sant"]
        );
    }

    #[test]
    fn test_invalid_kind_name() {
        assert!(matches!(
            resolver().resolve_named("heat", "studio"),
            Err(AgentError::InvalidKind(_))
        ));
        assert_eq!(resolver().resolve_named("heat", "movie").unwrap(), vec!["Heat"]);
    }

    #[test]
    fn test_rule_evidence_raises_fuzzy_threshold() {
        // "gatacca" aligns with "gattaca" at ~85.7: enough on its own, not
        // when the recognizer already found "heat"
        let text = "is gatacca better than heat";
        assert_eq!(
            resolver().resolve(text, EntityKind::Movie),
            vec!["Gattaca", "Heat"]
        );

        let with_rules = resolver().with_recognizer(Arc::new(DictionaryRecognizer::new(dictionary())));
        assert_eq!(with_rules.resolve(text, EntityKind::Movie), vec!["Heat"]);
    }

    #[test]
    fn test_short_label_needs_near_exact_match() {
        let lenient = ResolverConfig {
            threshold_without_rules: 70.0,
            ..ResolverConfig::default()
        };
        // "heet" scores 75 against "heat"
        let resolver = SpanResolver::new(dictionary(), lenient.clone());
        assert!(resolver.resolve("who directed heet", EntityKind::Movie).is_empty());
        assert!(self::resolver().resolve("who directed heet", EntityKind::Movie).is_empty());

        let no_short_cutoff = ResolverConfig {
            short_label_threshold: 70.0,
            ..lenient
        };
        let resolver = SpanResolver::new(dictionary(), no_short_cutoff);
        assert_eq!(resolver.resolve("who directed heet", EntityKind::Movie), vec!["Heat"]);
    }

    #[test]
    fn test_nothing_found_is_empty() {
        assert!(resolver().resolve("hello there", EntityKind::Person).is_empty());
    }
}

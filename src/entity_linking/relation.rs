//! Relation extraction
//!
//! Three stages, first non-empty result wins:
//! 1. Phrase shortcuts for release-date questions
//! 2. Span resolution for [`EntityKind::Relation`]
//! 3. Optional sentence-similarity lookup on punctuation-stripped text

use super::normalize::strip_punctuation;
use super::resolver::SpanResolver;
use crate::sources::traits::RelationSimilarity;
use crate::types::EntityKind;
use std::sync::Arc;
use tracing::{debug, warn};

/// Relation label returned by the release-date shortcuts
pub const PUBLICATION_DATE: &str = "publication date";

pub struct RelationExtractor {
    resolver: Arc<SpanResolver>,
    similarity: Option<Arc<dyn RelationSimilarity>>,
}

impl RelationExtractor {
    pub fn new(resolver: Arc<SpanResolver>) -> Self {
        Self {
            resolver,
            similarity: None,
        }
    }

    pub fn with_similarity(mut self, similarity: Arc<dyn RelationSimilarity>) -> Self {
        self.similarity = Some(similarity);
        self
    }

    /// Relation labels mentioned in `text`
    pub fn extract(&self, text: &str) -> Vec<String> {
        if let Some(relation) = shortcut(text) {
            debug!(relation, "Relation from phrase shortcut");
            return vec![relation.to_string()];
        }

        let relations = self.resolver.resolve(text, EntityKind::Relation);
        if !relations.is_empty() {
            return relations;
        }

        let Some(similarity) = &self.similarity else {
            return vec![];
        };
        match similarity.most_similar(&strip_punctuation(text)) {
            Ok(Some(relation)) => {
                debug!(relation = %relation, "Relation from sentence similarity");
                vec![relation]
            }
            Ok(None) => vec![],
            Err(e) => {
                warn!(error = %e, "Relation similarity failed");
                vec![]
            }
        }
    }
}

fn shortcut(text: &str) -> Option<&'static str> {
    let lower = text.to_lowercase();
    if !lower.contains("released") {
        return None;
    }
    ["when", "year", "date", "day"]
        .iter()
        .any(|w| lower.contains(w))
        .then_some(PUBLICATION_DATE)
}

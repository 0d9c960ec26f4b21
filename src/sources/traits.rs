//! Capability interfaces for external collaborators
//!
//! Each collaborator is a narrow trait so the orchestration core can run
//! against deterministic stand-ins. All methods are blocking and side-effect
//! free from the core's point of view; failures are reported as
//! [`SourceError`] and handled at the call site.

use crate::error::SourceError;
use crate::types::{CrowdAnnotation, EntityCandidate, EntityId, EntityKind, QuestionCategory, Term};
use std::collections::BTreeMap;

/// A span returned by the rule-based recognizer.
///
/// Offsets are character positions (not bytes) into the text passed to
/// [`EntityRecognizer::recognize`]; `end` is exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecognizedSpan {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

impl RecognizedSpan {
    pub fn new(text: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            text: text.into(),
            start,
            end,
        }
    }
}

/// Rule-based / NER recognizer. Best effort, may return nothing.
pub trait EntityRecognizer: Send + Sync {
    fn recognize(&self, text: &str, kind: EntityKind) -> Result<Vec<RecognizedSpan>, SourceError>;
}

/// One result row: variable name → bound term
pub type Row = BTreeMap<String, Term>;

/// Binding names used in [`Row`]s
pub mod binding {
    pub const VALUE: &str = "value";
    pub const PROPERTY: &str = "property";
    pub const SUBJECT: &str = "subject";
}

/// Query patterns the core issues against the knowledge store
#[derive(Debug, Clone, PartialEq)]
pub enum GraphQuery {
    /// `subject --predicate--> ?value`, rows bind `value`
    Objects { subject: EntityId, predicate: EntityId },

    /// `subject ?property ?value`, optionally restricted to some predicates.
    /// Rows bind `property` and `value`.
    Attributes {
        subject: EntityId,
        predicates: Option<Vec<EntityId>>,
    },

    /// `?subject` having every `(predicate, object)` constraint, not in
    /// `exclude`, ordered by the numeric value of `rank_by` (descending),
    /// at most `limit` rows. Rows bind `subject`.
    SubjectsMatching {
        constraints: Vec<(EntityId, Term)>,
        exclude: Vec<EntityId>,
        rank_by: Option<EntityId>,
        limit: usize,
    },
}

/// Opaque triple store plus label ↔ identifier mappings
pub trait KnowledgeStore: Send + Sync {
    fn query(&self, query: &GraphQuery) -> Result<Vec<Row>, SourceError>;

    /// Human-readable label for an entity or relation identifier
    fn label_for(&self, id: &str) -> Option<String>;

    /// Identifier for a canonical label of the given kind
    fn id_for(&self, kind: EntityKind, label: &str) -> Option<EntityId>;

    /// Every identifier sharing `label`, with a description for each.
    /// More than one entry means the label is ambiguous.
    fn candidates_for(&self, kind: EntityKind, label: &str) -> Vec<EntityCandidate>;
}

/// Knowledge-graph embeddings (TransE style)
pub trait VectorStore: Send + Sync {
    fn entity_vector(&self, entity: &str) -> Result<Vec<f32>, SourceError>;

    fn relation_vector(&self, relation: &str) -> Result<Vec<f32>, SourceError>;

    /// Closest entity to `vector`; ties go to the lower index
    fn nearest(&self, vector: &[f32]) -> Result<Option<EntityId>, SourceError>;
}

/// Pre-aggregated crowd-sourced correction for one `(entity, relation)` pair
#[derive(Debug, Clone, PartialEq)]
pub struct CrowdEntry {
    pub value: String,
    pub annotation: CrowdAnnotation,
}

pub trait CrowdTable: Send + Sync {
    fn lookup(&self, entity: &str, relation: &str) -> Result<Option<CrowdEntry>, SourceError>;
}

pub trait MessageClassifier: Send + Sync {
    fn classify(&self, text: &str) -> Result<QuestionCategory, SourceError>;
}

/// Optional natural-language rewriter (an LLM in the reference deployment)
pub trait Rephraser: Send + Sync {
    fn rewrite(&self, text: &str) -> Result<String, SourceError>;
}

/// Poster / portrait lookup
pub trait ImageLookup: Send + Sync {
    fn image_for(&self, entity: &str, kind: EntityKind) -> Result<Option<String>, SourceError>;
}

/// Sentence-similarity fallback for relation extraction
pub trait RelationSimilarity: Send + Sync {
    /// Most similar relation label, or `None` below the similarity threshold
    fn most_similar(&self, text: &str) -> Result<Option<String>, SourceError>;
}

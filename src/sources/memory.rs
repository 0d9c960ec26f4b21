//! In-memory collaborator implementations
//!
//! Used by the binary (loaded from a JSON dataset) and by tests. The graph
//! keeps triples in insertion order, so "first matching row" is the first
//! triple added.

use super::traits::{
    binding, CrowdEntry, CrowdTable, GraphQuery, ImageLookup, KnowledgeStore, Row, VectorStore,
};
use crate::error::SourceError;
use crate::types::{EntityCandidate, EntityId, EntityKind, Term};
use std::collections::{HashMap, HashSet};

// ============================================================================
// KNOWLEDGE GRAPH
// ============================================================================

/// Triple store with label indexes
#[derive(Debug, Default, Clone)]
pub struct InMemoryGraph {
    labels: HashMap<EntityId, String>,
    by_label: HashMap<(EntityKind, String), Vec<EntityCandidate>>,
    triples: Vec<(EntityId, EntityId, Term)>,
}

impl InMemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a typed entity (movie, person or relation)
    pub fn add_entity(
        &mut self,
        kind: EntityKind,
        id: impl Into<EntityId>,
        label: impl Into<String>,
        description: Option<String>,
    ) -> &mut Self {
        let id = id.into();
        let label = label.into();
        let description = description.unwrap_or_else(|| label.clone());
        self.labels.insert(id.clone(), label.clone());

        let candidates = self.by_label.entry((kind, label)).or_default();
        if !candidates.iter().any(|c| c.id == id) {
            candidates.push(EntityCandidate { id, description });
        }
        self
    }

    /// Register a label for a node that is not a movie, person or relation
    /// (genres, countries, ...)
    pub fn add_label(&mut self, id: impl Into<EntityId>, label: impl Into<String>) -> &mut Self {
        self.labels.insert(id.into(), label.into());
        self
    }

    pub fn add_triple(
        &mut self,
        subject: impl Into<EntityId>,
        predicate: impl Into<EntityId>,
        object: Term,
    ) -> &mut Self {
        self.triples.push((subject.into(), predicate.into(), object));
        self
    }

    pub fn triple_count(&self) -> usize {
        self.triples.len()
    }

    fn has_triple(&self, subject: &str, predicate: &str, object: &Term) -> bool {
        self.triples
            .iter()
            .any(|(s, p, o)| s == subject && p == predicate && o == object)
    }

    fn rank_of(&self, subject: &str, rank_by: &str) -> Option<f64> {
        self.triples
            .iter()
            .filter(|(s, p, _)| s == subject && p == rank_by)
            .filter_map(|(_, _, o)| leading_number(o.as_str()))
            .fold(None, |best, value| match best {
                Some(b) if b >= value => Some(b),
                _ => Some(value),
            })
    }

    fn subjects_matching(
        &self,
        constraints: &[(EntityId, Term)],
        exclude: &[EntityId],
        rank_by: Option<&str>,
        limit: usize,
    ) -> Vec<Row> {
        if constraints.is_empty() {
            return vec![];
        }

        let mut seen = HashSet::new();
        let mut matching: Vec<(EntityId, Option<f64>)> = Vec::new();
        for (subject, _, _) in &self.triples {
            if !seen.insert(subject.as_str()) || exclude.contains(subject) {
                continue;
            }
            if constraints
                .iter()
                .all(|(p, o)| self.has_triple(subject, p, o))
            {
                let rank = rank_by.and_then(|r| self.rank_of(subject, r));
                matching.push((subject.clone(), rank));
            }
        }

        // Stable sort: unrated subjects last, insertion order among equals
        matching.sort_by(|a, b| match (a.1, b.1) {
            (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(std::cmp::Ordering::Equal),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        matching.truncate(limit);

        matching
            .into_iter()
            .map(|(subject, _)| {
                let mut row = Row::new();
                row.insert(binding::SUBJECT.to_string(), Term::Iri(subject));
                row
            })
            .collect()
    }
}

/// Leading numeric part of a literal ("8.3/10" → 8.3)
fn leading_number(s: &str) -> Option<f64> {
    let numeric: String = s
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    numeric.parse().ok()
}

impl KnowledgeStore for InMemoryGraph {
    fn query(&self, query: &GraphQuery) -> Result<Vec<Row>, SourceError> {
        let rows = match query {
            GraphQuery::Objects { subject, predicate } => self
                .triples
                .iter()
                .filter(|(s, p, _)| s == subject && p == predicate)
                .map(|(_, _, o)| {
                    let mut row = Row::new();
                    row.insert(binding::VALUE.to_string(), o.clone());
                    row
                })
                .collect(),
            GraphQuery::Attributes {
                subject,
                predicates,
            } => self
                .triples
                .iter()
                .filter(|(s, p, _)| {
                    s == subject
                        && predicates
                            .as_ref()
                            .map(|allowed| allowed.contains(p))
                            .unwrap_or(true)
                })
                .map(|(_, p, o)| {
                    let mut row = Row::new();
                    row.insert(binding::PROPERTY.to_string(), Term::Iri(p.clone()));
                    row.insert(binding::VALUE.to_string(), o.clone());
                    row
                })
                .collect(),
            GraphQuery::SubjectsMatching {
                constraints,
                exclude,
                rank_by,
                limit,
            } => self.subjects_matching(constraints, exclude, rank_by.as_deref(), *limit),
        };
        Ok(rows)
    }

    fn label_for(&self, id: &str) -> Option<String> {
        self.labels.get(id).cloned()
    }

    fn id_for(&self, kind: EntityKind, label: &str) -> Option<EntityId> {
        self.by_label
            .get(&(kind, label.to_string()))
            .and_then(|candidates| candidates.first())
            .map(|c| c.id.clone())
    }

    fn candidates_for(&self, kind: EntityKind, label: &str) -> Vec<EntityCandidate> {
        self.by_label
            .get(&(kind, label.to_string()))
            .cloned()
            .unwrap_or_default()
    }
}

// ============================================================================
// EMBEDDINGS
// ============================================================================

/// Entity and relation vectors; entity order defines the nearest-neighbour tie-break
#[derive(Debug, Default, Clone)]
pub struct InMemoryVectors {
    entities: Vec<(EntityId, Vec<f32>)>,
    entity_index: HashMap<EntityId, usize>,
    relations: HashMap<EntityId, Vec<f32>>,
}

impl InMemoryVectors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_entity(&mut self, id: impl Into<EntityId>, vector: Vec<f32>) -> &mut Self {
        let id = id.into();
        match self.entity_index.get(&id) {
            Some(&idx) => self.entities[idx].1 = vector,
            None => {
                self.entity_index.insert(id.clone(), self.entities.len());
                self.entities.push((id, vector));
            }
        }
        self
    }

    pub fn add_relation(&mut self, id: impl Into<EntityId>, vector: Vec<f32>) -> &mut Self {
        self.relations.insert(id.into(), vector);
        self
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

fn euclidean(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}

impl VectorStore for InMemoryVectors {
    fn entity_vector(&self, entity: &str) -> Result<Vec<f32>, SourceError> {
        self.entity_index
            .get(entity)
            .map(|&idx| self.entities[idx].1.clone())
            .ok_or_else(|| SourceError::MissingVector(entity.to_string()))
    }

    fn relation_vector(&self, relation: &str) -> Result<Vec<f32>, SourceError> {
        self.relations
            .get(relation)
            .cloned()
            .ok_or_else(|| SourceError::MissingVector(relation.to_string()))
    }

    fn nearest(&self, vector: &[f32]) -> Result<Option<EntityId>, SourceError> {
        let mut best: Option<(usize, f32)> = None;
        for (idx, (_, candidate)) in self.entities.iter().enumerate() {
            if candidate.len() != vector.len() {
                return Err(SourceError::Query(format!(
                    "dimension mismatch: expected {}, found {}",
                    vector.len(),
                    candidate.len()
                )));
            }
            let distance = euclidean(vector, candidate);
            // Strictly smaller keeps the lower index on ties
            if best.map(|(_, d)| distance < d).unwrap_or(true) {
                best = Some((idx, distance));
            }
        }
        Ok(best.map(|(idx, _)| self.entities[idx].0.clone()))
    }
}

// ============================================================================
// CROWD DATA
// ============================================================================

#[derive(Debug, Default, Clone)]
pub struct InMemoryCrowd {
    entries: HashMap<(EntityId, EntityId), CrowdEntry>,
}

impl InMemoryCrowd {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        entity: impl Into<EntityId>,
        relation: impl Into<EntityId>,
        entry: CrowdEntry,
    ) -> &mut Self {
        self.entries.insert((entity.into(), relation.into()), entry);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CrowdTable for InMemoryCrowd {
    fn lookup(&self, entity: &str, relation: &str) -> Result<Option<CrowdEntry>, SourceError> {
        Ok(self
            .entries
            .get(&(entity.to_string(), relation.to_string()))
            .cloned())
    }
}

// ============================================================================
// IMAGES
// ============================================================================

/// Asset references per entity; the first asset is returned
#[derive(Debug, Default, Clone)]
pub struct InMemoryImages {
    assets: HashMap<EntityId, Vec<String>>,
}

impl InMemoryImages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entity: impl Into<EntityId>, asset: impl Into<String>) -> &mut Self {
        self.assets.entry(entity.into()).or_default().push(asset.into());
        self
    }
}

impl ImageLookup for InMemoryImages {
    fn image_for(&self, entity: &str, _kind: EntityKind) -> Result<Option<String>, SourceError> {
        Ok(self
            .assets
            .get(entity)
            .and_then(|assets| assets.first())
            .cloned())
    }
}

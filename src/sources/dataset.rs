//! JSON movie dataset
//!
//! A single document carrying everything the in-memory sources need:
//!
//! ```json
//! {
//!   "entities":  [{"id": "Q1", "label": "Titanic", "kind": "movie", "description": "1997 film"}],
//!   "relations": [{"id": "P57", "label": "director", "aliases": ["directed"]}],
//!   "triples":   [{"subject": "Q1", "predicate": "P57", "object": {"iri": "Q2"}}],
//!   "crowd":     [{"entity": "Q1", "relation": "P57", "value": "Q2",
//!                  "support_votes": 3, "reject_votes": 0, "agreement_score": 0.8}],
//!   "embeddings": {"entities": [{"id": "Q1", "vector": [0.1, 0.2]}], "relations": []},
//!   "images":    [{"entity": "Q1", "assets": ["1234/abcd.jpg"]}]
//! }
//! ```
//!
//! Entities without a `kind` only contribute a label (genres, countries).

use super::memory::{InMemoryCrowd, InMemoryGraph, InMemoryImages, InMemoryVectors};
use super::traits::CrowdEntry;
use crate::entity_linking::EntityDictionary;
use crate::error::{AgentError, Result};
use crate::types::{CrowdAnnotation, EntityId, EntityKind, Term};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MovieDataset {
    pub entities: Vec<EntityRecord>,
    pub relations: Vec<RelationRecord>,
    pub triples: Vec<TripleRecord>,
    pub crowd: Vec<CrowdRecord>,
    pub embeddings: EmbeddingRecords,
    pub images: Vec<ImageRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityRecord {
    pub id: EntityId,
    pub label: String,
    #[serde(default)]
    pub kind: Option<EntityKind>,
    /// Shown in clarification prompts; defaults to the label
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub aliases: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationRecord {
    pub id: EntityId,
    pub label: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripleRecord {
    pub subject: EntityId,
    pub predicate: EntityId,
    pub object: Term,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrowdRecord {
    pub entity: EntityId,
    pub relation: EntityId,
    pub value: String,
    pub support_votes: u32,
    pub reject_votes: u32,
    pub agreement_score: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingRecords {
    pub entities: Vec<VectorRecord>,
    pub relations: Vec<VectorRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorRecord {
    pub id: EntityId,
    pub vector: Vec<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRecord {
    pub entity: EntityId,
    pub assets: Vec<String>,
}

/// In-memory collaborators built from a [`MovieDataset`]
#[derive(Debug, Default, Clone)]
pub struct LoadedSources {
    pub graph: InMemoryGraph,
    pub vectors: InMemoryVectors,
    pub crowd: InMemoryCrowd,
    pub images: InMemoryImages,
    pub dictionary: EntityDictionary,
}

impl MovieDataset {
    /// Load a dataset from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Validate and index the dataset
    pub fn build(&self) -> Result<LoadedSources> {
        self.validate()?;
        let mut sources = LoadedSources::default();

        for entity in &self.entities {
            match entity.kind {
                Some(kind) => {
                    sources.graph.add_entity(
                        kind,
                        entity.id.clone(),
                        entity.label.clone(),
                        entity.description.clone(),
                    );
                    sources.dictionary.insert(kind, entity.label.clone());
                    for alias in &entity.aliases {
                        sources.dictionary.insert_alias(kind, alias, entity.label.clone());
                    }
                }
                None => {
                    sources.graph.add_label(entity.id.clone(), entity.label.clone());
                }
            }
        }

        for relation in &self.relations {
            sources.graph.add_entity(
                EntityKind::Relation,
                relation.id.clone(),
                relation.label.clone(),
                None,
            );
            sources
                .dictionary
                .insert(EntityKind::Relation, relation.label.clone());
            for alias in &relation.aliases {
                sources
                    .dictionary
                    .insert_alias(EntityKind::Relation, alias, relation.label.clone());
            }
        }

        for triple in &self.triples {
            sources.graph.add_triple(
                triple.subject.clone(),
                triple.predicate.clone(),
                triple.object.clone(),
            );
        }

        for record in &self.crowd {
            sources.crowd.insert(
                record.entity.clone(),
                record.relation.clone(),
                CrowdEntry {
                    value: record.value.clone(),
                    annotation: CrowdAnnotation {
                        support_votes: record.support_votes,
                        reject_votes: record.reject_votes,
                        agreement_score: record.agreement_score,
                    },
                },
            );
        }

        for record in &self.embeddings.entities {
            sources
                .vectors
                .add_entity(record.id.clone(), record.vector.clone());
        }
        for record in &self.embeddings.relations {
            sources
                .vectors
                .add_relation(record.id.clone(), record.vector.clone());
        }

        for record in &self.images {
            for asset in &record.assets {
                sources.images.insert(record.entity.clone(), asset.clone());
            }
        }

        info!(
            entities = self.entities.len(),
            relations = self.relations.len(),
            triples = sources.graph.triple_count(),
            crowd = sources.crowd.len(),
            vectors = sources.vectors.len(),
            "Movie dataset indexed"
        );
        Ok(sources)
    }

    fn validate(&self) -> Result<()> {
        let blank_entity = self
            .entities
            .iter()
            .map(|e| (&e.id, &e.label))
            .chain(self.relations.iter().map(|r| (&r.id, &r.label)))
            .find(|(id, label)| id.trim().is_empty() || label.trim().is_empty());
        if let Some((id, label)) = blank_entity {
            return Err(AgentError::Dataset(format!(
                "entity with blank id or label (id: '{}', label: '{}')",
                id, label
            )));
        }

        let mut dimension: Option<usize> = None;
        for record in self
            .embeddings
            .entities
            .iter()
            .chain(&self.embeddings.relations)
        {
            match dimension {
                None => dimension = Some(record.vector.len()),
                Some(d) if d != record.vector.len() => {
                    return Err(AgentError::Dataset(format!(
                        "embedding for '{}' has dimension {}, expected {}",
                        record.id,
                        record.vector.len(),
                        d
                    )));
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}

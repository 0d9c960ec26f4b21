//! Answer fusion
//!
//! Tries each knowledge source in strict precedence and returns the first
//! value found:
//!
//! 1. Crowd corrections for the exact `(entity, relation)` pair
//! 2. A single `entity --relation--> ?value` graph lookup
//! 3. TransE-style embedding completion (`head + relation`, nearest entity)
//!
//! A failing source is logged and treated as empty; it never stops the chain.

use crate::sources::traits::{binding, CrowdTable, GraphQuery, KnowledgeStore, VectorStore};
use crate::types::{Answer, Provenance, Term};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct AnswerFusion {
    graph: Arc<dyn KnowledgeStore>,
    crowd: Option<Arc<dyn CrowdTable>>,
    vectors: Option<Arc<dyn VectorStore>>,
}

impl AnswerFusion {
    pub fn new(graph: Arc<dyn KnowledgeStore>) -> Self {
        Self {
            graph,
            crowd: None,
            vectors: None,
        }
    }

    pub fn with_crowd(mut self, crowd: Arc<dyn CrowdTable>) -> Self {
        self.crowd = Some(crowd);
        self
    }

    pub fn with_vectors(mut self, vectors: Arc<dyn VectorStore>) -> Self {
        self.vectors = Some(vectors);
        self
    }

    /// First answer in precedence order, or `None` when every source is empty
    pub fn answer(&self, entity: &str, relation: &str) -> Option<Answer> {
        let answer = self
            .from_crowd(entity, relation)
            .or_else(|| self.from_graph(entity, relation))
            .or_else(|| self.from_embeddings(entity, relation));

        match &answer {
            Some(a) => info!(
                entity,
                relation,
                provenance = a.provenance.tag(),
                value = %a.value,
                "Answer found"
            ),
            None => info!(entity, relation, "No source produced an answer"),
        }
        answer
    }

    /// Crowd value, shown by label when it names a known node
    pub fn from_crowd(&self, entity: &str, relation: &str) -> Option<Answer> {
        let crowd = self.crowd.as_ref()?;
        let entry = match crowd.lookup(entity, relation) {
            Ok(entry) => entry?,
            Err(e) => {
                warn!(error = %e, entity, relation, "Crowd lookup failed");
                return None;
            }
        };

        let value = self
            .graph
            .label_for(&entry.value)
            .unwrap_or(entry.value);
        Some(Answer {
            value,
            provenance: Provenance::Crowd(entry.annotation),
        })
    }

    /// First row with a displayable value: literals as-is, nodes by label
    pub fn from_graph(&self, entity: &str, relation: &str) -> Option<Answer> {
        let query = GraphQuery::Objects {
            subject: entity.to_string(),
            predicate: relation.to_string(),
        };
        let rows = match self.graph.query(&query) {
            Ok(rows) => rows,
            Err(e) => {
                warn!(error = %e, entity, relation, "Graph query failed");
                return None;
            }
        };

        rows.iter()
            .filter_map(|row| row.get(binding::VALUE))
            .find_map(|term| match term {
                Term::Literal(value) => Some(value.clone()),
                Term::Iri(id) => {
                    let label = self.graph.label_for(id);
                    if label.is_none() {
                        debug!(id = %id, "Graph value has no label, skipping row");
                    }
                    label
                }
            })
            .map(|value| Answer {
                value,
                provenance: Provenance::Graph,
            })
    }

    /// Nearest entity to `head + relation`, by label
    pub fn from_embeddings(&self, entity: &str, relation: &str) -> Option<Answer> {
        let vectors = self.vectors.as_ref()?;

        let nearest = vectors
            .entity_vector(entity)
            .and_then(|head| {
                let offset = vectors.relation_vector(relation)?;
                Ok(head.iter().zip(&offset).map(|(h, r)| h + r).collect::<Vec<f32>>())
            })
            .and_then(|target| vectors.nearest(&target));

        let id = match nearest {
            Ok(id) => id?,
            Err(e) => {
                warn!(error = %e, entity, relation, "Embedding lookup failed");
                return None;
            }
        };

        let value = self.graph.label_for(&id)?;
        Some(Answer {
            value,
            provenance: Provenance::Embeddings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceError;
    use crate::sources::memory::{InMemoryCrowd, InMemoryGraph, InMemoryVectors};
    use crate::sources::traits::{CrowdEntry, Row};
    use crate::types::{CrowdAnnotation, EntityCandidate, EntityId, EntityKind};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn graph() -> InMemoryGraph {
        let mut graph = InMemoryGraph::new();
        graph
            .add_entity(EntityKind::Movie, "Q1", "Good Will Hunting", None)
            .add_entity(EntityKind::Person, "Q2", "Gus Van Sant", None)
            .add_entity(EntityKind::Person, "Q3", "Matt Damon", None)
            .add_triple("Q1", "P57", Term::Iri("Q2".into()))
            .add_triple("Q1", "P577", Term::Literal("1997-12-05".into()))
            .add_triple("Q1", "P161", Term::Iri("Q404".into()))
            .add_triple("Q1", "P161", Term::Iri("Q3".into()));
        graph
    }

    fn crowd() -> InMemoryCrowd {
        let mut crowd = InMemoryCrowd::new();
        crowd.insert(
            "Q1",
            "P57",
            CrowdEntry {
                value: "Q3".into(),
                annotation: CrowdAnnotation {
                    support_votes: 2,
                    reject_votes: 1,
                    agreement_score: 0.263,
                },
            },
        );
        crowd
    }

    /// Counts nearest-neighbour searches
    #[derive(Default)]
    struct CountingVectors {
        inner: InMemoryVectors,
        searches: AtomicUsize,
    }

    impl VectorStore for CountingVectors {
        fn entity_vector(&self, entity: &str) -> Result<Vec<f32>, SourceError> {
            self.inner.entity_vector(entity)
        }

        fn relation_vector(&self, relation: &str) -> Result<Vec<f32>, SourceError> {
            self.inner.relation_vector(relation)
        }

        fn nearest(&self, vector: &[f32]) -> Result<Option<EntityId>, SourceError> {
            self.searches.fetch_add(1, Ordering::SeqCst);
            self.inner.nearest(vector)
        }
    }

    struct FailingGraph;

    impl KnowledgeStore for FailingGraph {
        fn query(&self, _: &GraphQuery) -> Result<Vec<Row>, SourceError> {
            Err(SourceError::Query("endpoint down".into()))
        }

        fn label_for(&self, id: &str) -> Option<String> {
            (id == "Q2").then(|| "Gus Van Sant".to_string())
        }

        fn id_for(&self, _: EntityKind, _: &str) -> Option<EntityId> {
            None
        }

        fn candidates_for(&self, _: EntityKind, _: &str) -> Vec<EntityCandidate> {
            vec![]
        }
    }

    #[test]
    fn test_graph_answer_uses_label() {
        let fusion = AnswerFusion::new(Arc::new(graph()));
        let answer = fusion.answer("Q1", "P57").unwrap();
        assert_eq!(answer.value, "Gus Van Sant");
        assert_eq!(answer.provenance, Provenance::Graph);
    }

    #[test]
    fn test_graph_literal_and_unlabelled_rows() {
        let fusion = AnswerFusion::new(Arc::new(graph()));
        assert_eq!(fusion.answer("Q1", "P577").unwrap().value, "1997-12-05");
        // first row points at an unlabelled node
        assert_eq!(fusion.answer("Q1", "P161").unwrap().value, "Matt Damon");
    }

    #[test]
    fn test_crowd_beats_graph() {
        let fusion = AnswerFusion::new(Arc::new(graph())).with_crowd(Arc::new(crowd()));
        let answer = fusion.answer("Q1", "P57").unwrap();
        assert_eq!(answer.value, "Matt Damon");
        assert!(matches!(answer.provenance, Provenance::Crowd(a) if a.support_votes == 2));
    }

    #[test]
    fn test_embeddings_invoked_once_when_others_empty() {
        let mut inner = InMemoryVectors::new();
        inner
            .add_entity("Q1", vec![0.0, 0.0])
            .add_entity("Q2", vec![1.0, 1.0])
            .add_relation("P58", vec![0.9, 1.1]);
        let vectors = Arc::new(CountingVectors {
            inner,
            searches: AtomicUsize::new(0),
        });

        let fusion = AnswerFusion::new(Arc::new(graph()))
            .with_crowd(Arc::new(crowd()))
            .with_vectors(vectors.clone());
        let answer = fusion.answer("Q1", "P58").unwrap();

        assert_eq!(answer.value, "Gus Van Sant");
        assert_eq!(answer.provenance, Provenance::Embeddings);
        assert_eq!(vectors.searches.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_embeddings_not_touched_when_graph_answers() {
        let vectors = Arc::new(CountingVectors::default());
        let fusion = AnswerFusion::new(Arc::new(graph())).with_vectors(vectors.clone());
        fusion.answer("Q1", "P57").unwrap();
        assert_eq!(vectors.searches.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_failing_graph_falls_through() {
        let mut vectors = InMemoryVectors::new();
        vectors
            .add_entity("Q1", vec![0.0])
            .add_entity("Q2", vec![1.0])
            .add_relation("P57", vec![1.0]);
        let fusion = AnswerFusion::new(Arc::new(FailingGraph)).with_vectors(Arc::new(vectors));

        let answer = fusion.answer("Q1", "P57").unwrap();
        assert_eq!(answer.provenance, Provenance::Embeddings);
    }

    #[test]
    fn test_missing_vectors_is_no_answer() {
        let fusion = AnswerFusion::new(Arc::new(graph())).with_vectors(Arc::new(InMemoryVectors::new()));
        assert!(fusion.answer("Q1", "P999").is_none());
    }
}

//! Factual question flow
//!
//! Extracts exactly one movie and one relation from the message, queues a
//! clarification when the movie label is shared by several identifiers,
//! and otherwise answers through [`AnswerFusion`].

use super::fusion::AnswerFusion;
use super::render::AnswerRenderer;
use crate::clarify::{Ambiguity, ConversationState};
use crate::entity_linking::normalize::{clean_query, remove_label};
use crate::entity_linking::{RelationExtractor, SpanResolver};
use crate::sources::traits::KnowledgeStore;
use crate::types::{EntityKind, QuestionCategory};
use std::sync::Arc;
use tracing::info;

pub const NO_ENTITY: &str =
    "I could not find any entity in your message, please try again and reformulate.";
pub const MULTIPLE_ENTITIES: &str =
    "I found multiple entities in your message, please try again and ask about one movie only!";
pub const NO_RELATION: &str =
    "I could not find any relation in your message, please try again and reformulate.";
pub const MULTIPLE_RELATIONS: &str =
    "I found multiple relations in your message, please try again and ask about one relation only!";
pub const NO_ANSWER: &str = "I could not find an answer to your question or calculate it from the embeddings. Please try rephrasing and ask again.";

pub struct KnowledgeAnswerer {
    resolver: Arc<SpanResolver>,
    relations: RelationExtractor,
    graph: Arc<dyn KnowledgeStore>,
    fusion: AnswerFusion,
    renderer: Arc<AnswerRenderer>,
}

impl KnowledgeAnswerer {
    pub fn new(
        resolver: Arc<SpanResolver>,
        relations: RelationExtractor,
        graph: Arc<dyn KnowledgeStore>,
        fusion: AnswerFusion,
        renderer: Arc<AnswerRenderer>,
    ) -> Self {
        Self {
            resolver,
            relations,
            graph,
            fusion,
            renderer,
        }
    }

    /// Answer a fresh question, possibly queueing a clarification
    pub fn respond(&self, state: &mut ConversationState, message: &str) -> String {
        let cleaned = clean_query(message);

        let movies = self.resolver.resolve(&cleaned, EntityKind::Movie);
        let movie_label = match movies.as_slice() {
            [] => return NO_ENTITY.to_string(),
            [label] => label.clone(),
            _ => return MULTIPLE_ENTITIES.to_string(),
        };

        let remainder = remove_label(&cleaned, &movie_label);
        let relations = self.relations.extract(&remainder);
        let relation_label = match relations.as_slice() {
            [] => return NO_RELATION.to_string(),
            [label] => label.clone(),
            _ => return MULTIPLE_RELATIONS.to_string(),
        };
        info!(movie = %movie_label, relation = %relation_label, "Knowledge question parsed");

        let Some(relation) = self.graph.id_for(EntityKind::Relation, &relation_label) else {
            return format!("I don't know the relation {}. Try something else.", relation_label);
        };

        let mut candidates = self.graph.candidates_for(EntityKind::Movie, &movie_label);
        match candidates.len() {
            0 => format!("I don't know the movie {}. Try something else.", movie_label),
            1 => {
                let entity = candidates.remove(0);
                self.answer_resolved(&entity.id, &relation, &movie_label, &relation_label)
            }
            _ => state.push(
                Ambiguity::new(
                    QuestionCategory::Knowledge,
                    EntityKind::Movie,
                    movie_label,
                    candidates,
                )
                .with_relation(relation, relation_label),
            ),
        }
    }

    /// Answer for an already resolved entity and relation
    pub fn answer_resolved(
        &self,
        entity: &str,
        relation: &str,
        entity_label: &str,
        relation_label: &str,
    ) -> String {
        match self.fusion.answer(entity, relation) {
            Some(answer) => self.renderer.render(entity_label, relation_label, &answer),
            None => NO_ANSWER.to_string(),
        }
    }
}

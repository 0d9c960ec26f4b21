//! Recommendation message flow
//!
//! Every movie named in the message is either approved straight away or,
//! when its label is shared, queued for clarification. The recommendation
//! runs once nothing is left to clarify, over all approved movies.

use super::engine::RecommendationEngine;
use super::render::RecommendationRenderer;
use crate::answer::knowledge::NO_ENTITY;
use crate::clarify::render::MORE_INFORMATION_PREFIX;
use crate::clarify::{Ambiguity, ConversationState};
use crate::entity_linking::normalize::clean_query;
use crate::entity_linking::SpanResolver;
use crate::sources::traits::KnowledgeStore;
use crate::types::{EntityId, EntityKind, QuestionCategory};
use std::sync::Arc;
use tracing::info;

pub struct RecommendationService {
    resolver: Arc<SpanResolver>,
    graph: Arc<dyn KnowledgeStore>,
    engine: RecommendationEngine,
    renderer: RecommendationRenderer,
}

impl RecommendationService {
    pub fn new(
        resolver: Arc<SpanResolver>,
        graph: Arc<dyn KnowledgeStore>,
        engine: RecommendationEngine,
        renderer: RecommendationRenderer,
    ) -> Self {
        Self {
            resolver,
            graph,
            engine,
            renderer,
        }
    }

    pub fn respond(&self, state: &mut ConversationState, message: &str) -> String {
        let labels = self
            .resolver
            .resolve(&clean_query(message), EntityKind::Movie);
        if labels.is_empty() {
            return NO_ENTITY.to_string();
        }

        // Reject unknown titles before touching the conversation state
        let mut resolved = Vec::with_capacity(labels.len());
        for label in labels {
            let candidates = self.graph.candidates_for(EntityKind::Movie, &label);
            if candidates.is_empty() {
                return format!("I don't know the movie {}. Try something else.", label);
            }
            resolved.push((label, candidates));
        }
        info!(movies = resolved.len(), "Recommendation request parsed");

        state.clear_approved();
        for (label, mut candidates) in resolved {
            if candidates.len() == 1 {
                state.approve(candidates.remove(0).id);
            } else {
                state.push(Ambiguity::new(
                    QuestionCategory::Recommendation,
                    EntityKind::Movie,
                    label,
                    candidates,
                ));
            }
        }

        match state.prompt() {
            Some(prompt) => prompt,
            None => self.recommend_approved(state),
        }
    }

    /// Continue after the user picked `entity` for a queued movie
    pub fn respond_resolved(&self, state: &mut ConversationState, entity: EntityId) -> String {
        state.approve(entity);
        match state.prompt() {
            Some(prompt) => format!("{MORE_INFORMATION_PREFIX}{prompt}"),
            None => self.recommend_approved(state),
        }
    }

    fn recommend_approved(&self, state: &mut ConversationState) -> String {
        let movies = state.approved().to_vec();
        state.clear_approved();
        self.recommend(&movies)
    }

    pub fn recommend(&self, movies: &[EntityId]) -> String {
        match self.engine.recommend(movies) {
            Some(recommendation) => self.renderer.render(&recommendation),
            None => self.renderer.render_empty(movies),
        }
    }
}

//! Per-conversation disambiguation state
//!
//! `IDLE` is an empty queue, `AWAITING_CHOICE` a non-empty one. Only the
//! head ambiguity is ever inspected or resolved; later ones wait in line.
//! The approved list is independent of the queue and only used by
//! multi-movie recommendations.

use super::choice::{parse_choice, Choice};
use super::render::render_prompt;
use crate::types::{EntityCandidate, EntityId, EntityKind, QuestionCategory};
use std::collections::VecDeque;

/// A label that maps to several identifiers and needs a user choice
#[derive(Debug, Clone, PartialEq)]
pub struct Ambiguity {
    /// Flow to resume once resolved
    pub question_type: QuestionCategory,
    /// Movie or person
    pub category: EntityKind,
    pub entity_label: String,
    /// Relation identifier of a pending knowledge question
    pub relation: Option<EntityId>,
    pub relation_label: Option<String>,
    /// Options in prompt order
    pub candidates: Vec<EntityCandidate>,
}

impl Ambiguity {
    pub fn new(
        question_type: QuestionCategory,
        category: EntityKind,
        entity_label: impl Into<String>,
        candidates: Vec<EntityCandidate>,
    ) -> Self {
        Self {
            question_type,
            category,
            entity_label: entity_label.into(),
            relation: None,
            relation_label: None,
            candidates,
        }
    }

    pub fn with_relation(mut self, relation: impl Into<EntityId>, label: impl Into<String>) -> Self {
        self.relation = Some(relation.into());
        self.relation_label = Some(label.into());
        self
    }

    fn descriptions(&self) -> Vec<String> {
        self.candidates.iter().map(|c| c.description.clone()).collect()
    }
}

/// Result of [`ConversationState::resolve`]
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// The head ambiguity resolved to this candidate; call `pop` next
    Selected {
        index: usize,
        candidate: EntityCandidate,
    },
    /// User asked to stop disambiguating
    Abort,
    /// Nothing matched; state unchanged
    Unresolved,
}

#[derive(Debug, Clone, Default)]
pub struct ConversationState {
    queue: VecDeque<Ambiguity>,
    approved: Vec<EntityId>,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an ambiguity and return the prompt for the active one
    pub fn push(&mut self, ambiguity: Ambiguity) -> String {
        self.queue.push_back(ambiguity);
        self.prompt().unwrap_or_default()
    }

    /// Interpret a reply against the head ambiguity. Never mutates state.
    pub fn resolve(&self, message: &str) -> Resolution {
        let Some(head) = self.queue.front() else {
            return Resolution::Unresolved;
        };

        match parse_choice(message, &head.descriptions()) {
            Choice::Selected(index) => Resolution::Selected {
                index,
                candidate: head.candidates[index].clone(),
            },
            Choice::Exit => Resolution::Abort,
            Choice::Unresolved => Resolution::Unresolved,
        }
    }

    pub fn head(&self) -> Option<&Ambiguity> {
        self.queue.front()
    }

    pub fn pop(&mut self) -> Option<Ambiguity> {
        self.queue.pop_front()
    }

    /// Drop every pending ambiguity and any approvals collected so far
    pub fn abort(&mut self) {
        self.queue.clear();
        self.approved.clear();
    }

    pub fn is_awaiting(&self) -> bool {
        !self.queue.is_empty()
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Prompt for the head ambiguity
    pub fn prompt(&self) -> Option<String> {
        self.queue.front().map(render_prompt)
    }

    pub fn approve(&mut self, entity: impl Into<EntityId>) {
        self.approved.push(entity.into());
    }

    pub fn approved(&self) -> &[EntityId] {
        &self.approved
    }

    pub fn clear_approved(&mut self) {
        self.approved.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn candidates(n: usize) -> Vec<EntityCandidate> {
        (0..n)
            .map(|i| EntityCandidate {
                id: format!("Q{}", i + 1),
                description: format!("{} film", 1950 + i),
            })
            .collect()
    }

    fn ambiguity(label: &str, n: usize) -> Ambiguity {
        Ambiguity::new(QuestionCategory::Knowledge, EntityKind::Movie, label, candidates(n))
    }

    // ========================================================================
    // Queue transitions
    // ========================================================================

    #[test]
    fn test_push_returns_prompt_for_head() {
        let mut state = ConversationState::new();
        let first = state.push(ambiguity("Titanic", 2));
        let second = state.push(ambiguity("Heat", 3));

        assert!(first.contains("Titanic"));
        // the active clarification is not interrupted
        assert!(second.contains("Titanic"));
        assert_eq!(state.pending(), 2);
    }

    #[test]
    fn test_pop_advances_fifo() {
        let mut state = ConversationState::new();
        state.push(ambiguity("Titanic", 2));
        state.push(ambiguity("Heat", 2));

        assert_eq!(state.pop().unwrap().entity_label, "Titanic");
        assert_eq!(state.head().unwrap().entity_label, "Heat");
        state.pop();
        assert!(!state.is_awaiting());
    }

    #[test]
    fn test_last_selects_final_candidate() {
        let mut state = ConversationState::new();
        state.push(ambiguity("Titanic", 4));
        match state.resolve("the last one") {
            Resolution::Selected { index, candidate } => {
                assert_eq!(index, 3);
                assert_eq!(candidate.id, "Q4");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_abort_resets_everything() {
        let mut state = ConversationState::new();
        for label in ["A", "B", "C"] {
            state.push(ambiguity(label, 2));
        }
        state.approve("Q9");
        assert_eq!(state.resolve("stop it"), Resolution::Abort);

        state.abort();
        assert!(!state.is_awaiting());
        assert!(state.approved().is_empty());
    }

    #[test]
    fn test_resolve_when_idle() {
        assert_eq!(ConversationState::new().resolve("1"), Resolution::Unresolved);
    }

    #[test]
    fn test_approved_accumulator() {
        let mut state = ConversationState::new();
        state.approve("Q1");
        state.approve("Q2");
        assert_eq!(state.approved(), ["Q1", "Q2"]);
        state.clear_approved();
        assert!(state.approved().is_empty());
    }

    // ========================================================================
    // Properties
    // ========================================================================

    proptest! {
        #[test]
        fn prop_out_of_range_never_mutates(n in 1usize..6, pick in 1usize..=10) {
            prop_assume!(pick > n);
            let mut state = ConversationState::new();
            state.push(ambiguity("Titanic", n));
            let before = state.head().cloned();

            prop_assert_eq!(state.resolve(&pick.to_string()), Resolution::Unresolved);
            prop_assert_eq!(state.head().cloned(), before);
            prop_assert_eq!(state.pending(), 1);
        }

        #[test]
        fn prop_abort_always_idle(depth in 0usize..8) {
            let mut state = ConversationState::new();
            for i in 0..depth {
                state.push(ambiguity(&format!("Movie {}", i), 2));
            }
            state.abort();
            prop_assert!(!state.is_awaiting());
        }
    }
}

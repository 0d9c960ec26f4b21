//! Conversation state registry
//!
//! One [`ConversationState`] per conversation id, created on first access.
//! Conversations never share state. The registry lock is only held to find
//! or create an entry; each conversation then has its own lock, so a slow
//! message in one conversation never holds up another.

use super::state::ConversationState;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

type SharedState = Arc<Mutex<ConversationState>>;

#[derive(Debug, Default)]
pub struct ConversationStore {
    states: Mutex<HashMap<String, SharedState>>,
}

/// A panic while holding a lock leaves plain data behind; keep using it
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self, conversation_id: &str) -> SharedState {
        lock(&self.states)
            .entry(conversation_id.to_string())
            .or_default()
            .clone()
    }

    fn existing(&self, conversation_id: &str) -> Option<SharedState> {
        lock(&self.states).get(conversation_id).cloned()
    }

    /// Run `f` against the state of `conversation_id`.
    ///
    /// Calls for the same conversation are serialized; calls for different
    /// conversations run concurrently.
    pub fn with_state<R>(
        &self,
        conversation_id: &str,
        f: impl FnOnce(&mut ConversationState) -> R,
    ) -> R {
        let state = self.state(conversation_id);
        let mut guard = lock(&state);
        f(&mut guard)
    }

    pub fn is_awaiting(&self, conversation_id: &str) -> bool {
        self.existing(conversation_id)
            .map(|state| lock(&state).is_awaiting())
            .unwrap_or(false)
    }

    /// Forget a conversation entirely
    pub fn reset(&self, conversation_id: &str) {
        lock(&self.states).remove(conversation_id);
    }

    pub fn len(&self) -> usize {
        lock(&self.states).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.states).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clarify::state::Ambiguity;
    use crate::types::{EntityCandidate, EntityKind, QuestionCategory};

    fn ambiguity() -> Ambiguity {
        Ambiguity::new(
            QuestionCategory::Knowledge,
            EntityKind::Movie,
            "Titanic",
            vec![
                EntityCandidate {
                    id: "Q1".into(),
                    description: "1997 film".into(),
                },
                EntityCandidate {
                    id: "Q2".into(),
                    description: "1953 film".into(),
                },
            ],
        )
    }

    #[test]
    fn test_conversations_are_isolated() {
        let store = ConversationStore::new();
        store.with_state("room-a", |s| s.push(ambiguity()));
        store.with_state("room-b", |s| s.approve("Q7"));

        assert!(store.is_awaiting("room-a"));
        assert!(!store.is_awaiting("room-b"));
        assert!(store.with_state("room-a", |s| s.approved().is_empty()));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_reset_drops_state() {
        let store = ConversationStore::new();
        store.with_state("room-a", |s| s.push(ambiguity()));
        store.reset("room-a");

        assert!(!store.is_awaiting("room-a"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_busy_conversation_does_not_block_others() {
        use std::sync::mpsc;
        use std::time::Duration;

        let store = ConversationStore::new();
        let (entered_tx, entered_rx) = mpsc::channel();
        let (done_tx, done_rx) = mpsc::channel::<()>();

        let store = &store;
        std::thread::scope(|scope| {
            let busy = scope.spawn(move || {
                store.with_state("room-a", |s| {
                    s.push(ambiguity());
                    entered_tx.send(()).unwrap();
                    // room-b must finish while room-a is still inside its closure
                    done_rx.recv_timeout(Duration::from_secs(5)).is_ok()
                })
            });

            entered_rx.recv().unwrap();
            store.with_state("room-b", |s| s.approve("Q7"));
            assert!(!store.is_awaiting("room-b"));
            done_tx.send(()).unwrap();

            assert!(busy.join().unwrap());
        });
        assert!(store.is_awaiting("room-a"));
    }

    #[test]
    fn test_unknown_conversation_is_idle() {
        assert!(!ConversationStore::new().is_awaiting("nobody"));
    }
}

//! Clarification dialogue
//!
//! When a label maps to several identifiers the conversation queues an
//! [`Ambiguity`] and asks the user to pick one. Replies are parsed by
//! [`choice`], prompts rendered by [`render`].

pub mod choice;
pub mod render;
pub mod state;
pub mod store;

pub use choice::Choice;
pub use state::{Ambiguity, ConversationState, Resolution};
pub use store::ConversationStore;

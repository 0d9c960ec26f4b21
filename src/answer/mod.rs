//! Answering factual questions
//!
//! - [`fusion`]: crowd → graph → embeddings, first success wins
//! - [`render`]: templated sentences with provenance clauses
//! - [`knowledge`]: the message-level question flow
//! - [`phrases`]: injectable template selection

pub mod fusion;
pub mod knowledge;
pub mod phrases;
pub mod render;

pub use fusion::AnswerFusion;
pub use knowledge::KnowledgeAnswerer;
pub use phrases::{FixedChooser, PhraseChooser, SeededChooser};
pub use render::AnswerRenderer;

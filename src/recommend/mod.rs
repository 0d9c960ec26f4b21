//! Movie recommendations
//!
//! - [`engine`]: shared-attribute passes over the knowledge graph
//! - [`render`]: sentences, reasoning and poster token
//! - [`service`]: the message-level flow with clarification

pub mod engine;
pub mod render;
pub mod service;

pub use engine::{Recommendation, RecommendationEngine};
pub use render::RecommendationRenderer;
pub use service::RecommendationService;

//! Movie Agent - conversational question answering about movies
//!
//! Turns chat messages into answers drawn from a knowledge graph, crowd
//! corrections and graph embeddings, asking the user to pick when a title
//! or name is ambiguous.
//!
//! ## Architecture
//! Every message flows through the orchestrator:
//! Message -> Clarification or Classification -> Span Resolution -> Fusion / Recommendation / Images -> Reply
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use movie_agent::agent::{Collaborators, KeywordClassifier, MovieAgent};
//! use movie_agent::entity_linking::EntityDictionary;
//! use movie_agent::sources::InMemoryGraph;
//! use movie_agent::{AgentConfig, EntityKind, Term};
//!
//! let mut graph = InMemoryGraph::new();
//! graph
//!     .add_entity(EntityKind::Movie, "Q1", "Heat", None)
//!     .add_entity(EntityKind::Person, "Q2", "Michael Mann", None)
//!     .add_entity(EntityKind::Relation, "P57", "director", None)
//!     .add_triple("Q1", "P57", Term::Iri("Q2".into()));
//!
//! let mut dictionary = EntityDictionary::new();
//! dictionary
//!     .insert(EntityKind::Movie, "Heat")
//!     .insert(EntityKind::Relation, "director")
//!     .insert_alias(EntityKind::Relation, "directed", "director");
//!
//! let agent = MovieAgent::new(
//!     Collaborators::new(
//!         Arc::new(graph),
//!         Arc::new(dictionary),
//!         Arc::new(KeywordClassifier::default()),
//!     ),
//!     &AgentConfig::default(),
//! );
//! let reply = agent.handle_message("room-1", "Who directed Heat?");
//! assert!(reply.contains("Michael Mann"));
//! ```

// Core error handling
pub mod error;

// Shared domain types and configuration
pub mod config;
pub mod types;

// Collaborator interfaces and in-memory implementations
pub mod sources;

// Mention detection and relation extraction
pub mod entity_linking;

// Clarification dialogue state
pub mod clarify;

// Answer flows
pub mod answer;
pub mod multimedia;
pub mod recommend;

// Host-facing orchestrator
pub mod agent;

pub use agent::{Collaborators, MovieAgent};
pub use config::AgentConfig;
pub use error::{AgentError, Result, SourceError};
pub use types::{Answer, EntityCandidate, EntityId, EntityKind, Provenance, QuestionCategory, Term};

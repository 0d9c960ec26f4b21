//! Entity linking for chat messages
//!
//! Resolves movie, person and relation mentions in free text by fusing a
//! rule-based recognizer with fuzzy dictionary alignment.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use movie_agent::config::ResolverConfig;
//! use movie_agent::entity_linking::{EntityDictionary, SpanResolver};
//! use movie_agent::EntityKind;
//!
//! let mut dictionary = EntityDictionary::new();
//! dictionary.insert(EntityKind::Movie, "Good Will Hunting");
//!
//! let resolver = SpanResolver::new(Arc::new(dictionary), ResolverConfig::default());
//! assert_eq!(
//!     resolver.resolve("Who directed Good Will Hunting?", EntityKind::Movie),
//!     vec!["Good Will Hunting"]
//! );
//! ```

pub mod dictionary;
pub mod fuzzy;
pub mod mention;
pub mod normalize;
pub mod relation;
pub mod resolver;

pub use dictionary::{DictionaryRecognizer, EntityDictionary};
pub use mention::{MatchSource, Mention};
pub use relation::RelationExtractor;
pub use resolver::SpanResolver;

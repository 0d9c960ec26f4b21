//! Knowledge sources and other external collaborators

pub mod dataset;
pub mod memory;
pub mod traits;

pub use dataset::{LoadedSources, MovieDataset};
pub use memory::{InMemoryCrowd, InMemoryGraph, InMemoryImages, InMemoryVectors};
pub use traits::{
    CrowdEntry, CrowdTable, EntityRecognizer, GraphQuery, ImageLookup, KnowledgeStore,
    MessageClassifier, RecognizedSpan, RelationSimilarity, Rephraser, Row, VectorStore,
};

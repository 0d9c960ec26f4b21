//! Shared fixture for integration tests
//!
//! A small movie world with shared titles (Titanic, Chris Evans), a hyphenated
//! title, a franchise, crowd corrections and embeddings.

#![allow(dead_code)]

use movie_agent::agent::{Collaborators, KeywordClassifier, MovieAgent};
use movie_agent::answer::FixedChooser;
use movie_agent::entity_linking::EntityDictionary;
use movie_agent::error::SourceError;
use movie_agent::sources::{
    CrowdEntry, InMemoryCrowd, InMemoryGraph, InMemoryImages, InMemoryVectors, VectorStore,
};
use movie_agent::types::CrowdAnnotation;
use movie_agent::{AgentConfig, EntityId, EntityKind, Term};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub const TITANIC_1997: &str = "1997 film by James Cameron";
pub const TITANIC_1953: &str = "1953 film by Jean Negulesco";

/// Vector store that counts nearest-neighbour searches
pub struct CountingVectors {
    inner: InMemoryVectors,
    searches: AtomicUsize,
}

impl CountingVectors {
    pub fn new(inner: InMemoryVectors) -> Self {
        Self {
            inner,
            searches: AtomicUsize::new(0),
        }
    }

    pub fn searches(&self) -> usize {
        self.searches.load(Ordering::SeqCst)
    }
}

impl VectorStore for CountingVectors {
    fn entity_vector(&self, entity: &str) -> Result<Vec<f32>, SourceError> {
        self.inner.entity_vector(entity)
    }

    fn relation_vector(&self, relation: &str) -> Result<Vec<f32>, SourceError> {
        self.inner.relation_vector(relation)
    }

    fn nearest(&self, vector: &[f32]) -> Result<Option<EntityId>, SourceError> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        self.inner.nearest(vector)
    }
}

pub fn graph() -> InMemoryGraph {
    let mut graph = InMemoryGraph::new();
    graph
        // movies
        .add_entity(EntityKind::Movie, "Q1", "Good Will Hunting", None)
        .add_entity(EntityKind::Movie, "Q10", "Titanic", Some(TITANIC_1997.into()))
        .add_entity(EntityKind::Movie, "Q11", "Titanic", Some(TITANIC_1953.into()))
        .add_entity(EntityKind::Movie, "Q20", "Spider-Man: Far From Home", None)
        .add_entity(EntityKind::Movie, "Q30", "Alien", None)
        .add_entity(EntityKind::Movie, "Q31", "Aliens", None)
        .add_entity(EntityKind::Movie, "Q32", "Alien 3", None)
        .add_entity(EntityKind::Movie, "Q40", "Heat", None)
        .add_entity(EntityKind::Movie, "Q50", "Solaris", Some("1972 film".into()))
        .add_entity(EntityKind::Movie, "Q51", "Solaris", Some("2002 film".into()))
        // people
        .add_entity(EntityKind::Person, "Q2", "Gus Van Sant", None)
        .add_entity(EntityKind::Person, "Q3", "Matt Damon", None)
        .add_entity(EntityKind::Person, "Q4", "Julia Roberts", None)
        .add_entity(EntityKind::Person, "Q5", "Chris Evans", Some("American actor".into()))
        .add_entity(EntityKind::Person, "Q6", "Chris Evans", Some("English presenter".into()))
        .add_entity(EntityKind::Person, "Q7", "Jon Watts", None)
        .add_entity(EntityKind::Person, "Q8", "Michael Mann", None)
        .add_entity(EntityKind::Person, "Q9", "Michael Kenneth Mann", None)
        // relations
        .add_entity(EntityKind::Relation, "P57", "director", None)
        .add_entity(EntityKind::Relation, "P58", "screenwriter", None)
        .add_entity(EntityKind::Relation, "P577", "publication date", None)
        .add_entity(EntityKind::Relation, "P179", "part of the series", None)
        .add_entity(EntityKind::Relation, "P136", "genre", None)
        .add_label("F1", "Alien")
        .add_label("G1", "science fiction film")
        // facts
        .add_triple("Q1", "P57", Term::Iri("Q2".into()))
        .add_triple("Q10", "P577", Term::Literal("1997-12-19".into()))
        .add_triple("Q11", "P577", Term::Literal("1953-04-11".into()))
        .add_triple("Q20", "P57", Term::Iri("Q7".into()))
        .add_triple("Q40", "P57", Term::Iri("Q8".into()))
        .add_triple("Q30", "P179", Term::Iri("F1".into()))
        .add_triple("Q31", "P179", Term::Iri("F1".into()))
        .add_triple("Q32", "P179", Term::Iri("F1".into()))
        .add_triple("Q30", "P136", Term::Iri("G1".into()))
        .add_triple("Q31", "P136", Term::Iri("G1".into()))
        .add_triple("Q32", "P136", Term::Iri("G1".into()));
    graph
}

pub fn dictionary() -> EntityDictionary {
    let mut dictionary = EntityDictionary::new();
    for movie in [
        "Good Will Hunting",
        "Titanic",
        "Spider-Man: Far From Home",
        "Alien",
        "Aliens",
        "Alien 3",
        "Heat",
        "Solaris",
    ] {
        dictionary.insert(EntityKind::Movie, movie);
    }
    for person in [
        "Gus Van Sant",
        "Matt Damon",
        "Julia Roberts",
        "Chris Evans",
        "Jon Watts",
        "Michael Mann",
    ] {
        dictionary.insert(EntityKind::Person, person);
    }
    dictionary
        .insert(EntityKind::Relation, "director")
        .insert_alias(EntityKind::Relation, "directed", "director")
        .insert(EntityKind::Relation, "screenwriter")
        .insert(EntityKind::Relation, "publication date")
        .insert(EntityKind::Relation, "genre");
    dictionary
}

pub fn crowd() -> InMemoryCrowd {
    let mut crowd = InMemoryCrowd::new();
    crowd.insert(
        "Q40",
        "P57",
        CrowdEntry {
            value: "Q9".into(),
            annotation: CrowdAnnotation {
                support_votes: 3,
                reject_votes: 1,
                agreement_score: 0.5,
            },
        },
    );
    crowd
}

pub fn vectors() -> InMemoryVectors {
    let mut vectors = InMemoryVectors::new();
    vectors
        .add_entity("Q1", vec![0.0, 0.0])
        .add_entity("Q2", vec![5.0, 5.0])
        .add_entity("Q3", vec![1.0, 1.0])
        .add_relation("P58", vec![0.9, 1.1]);
    vectors
}

pub fn images() -> InMemoryImages {
    let mut images = InMemoryImages::new();
    images
        .insert("Q4", "0031/rm1234.jpg")
        .insert("Q5", "0042/rm5678.jpg")
        .insert("Q32", "0099/poster.jpg");
    images
}

pub fn collaborators() -> Collaborators {
    Collaborators::new(
        Arc::new(graph()),
        Arc::new(dictionary()),
        Arc::new(KeywordClassifier::default()),
    )
    .with_crowd(Arc::new(crowd()))
    .with_images(Arc::new(images()))
}

/// Agent over the fixture that always picks the first phrasing
pub fn agent_with(collaborators: Collaborators) -> MovieAgent {
    MovieAgent::with_chooser(
        collaborators,
        &AgentConfig::default(),
        Arc::new(FixedChooser(0)),
    )
}

pub fn agent() -> MovieAgent {
    agent_with(collaborators().with_vectors(Arc::new(vectors())))
}

//! Shared domain types

use crate::error::AgentError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Type alias for opaque knowledge identifiers (URIs in the reference deployment)
pub type EntityId = String;

/// Kind of mention the span resolver can look for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Movie,
    Person,
    Relation,
}

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [EntityKind::Movie, EntityKind::Person, EntityKind::Relation];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Movie => "movie",
            EntityKind::Person => "person",
            EntityKind::Relation => "relation",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "movie" => Ok(EntityKind::Movie),
            "person" => Ok(EntityKind::Person),
            "relation" => Ok(EntityKind::Relation),
            _ => Err(AgentError::InvalidKind(s.to_string())),
        }
    }
}

/// Intent of an incoming message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionCategory {
    Knowledge,
    Multimedia,
    Recommendation,
    SmallTalk,
}

impl fmt::Display for QuestionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QuestionCategory::Knowledge => "KNOWLEDGE",
            QuestionCategory::Multimedia => "MULTIMEDIA",
            QuestionCategory::Recommendation => "RECOMMENDATION",
            QuestionCategory::SmallTalk => "SMALLTALK",
        };
        f.write_str(name)
    }
}

impl FromStr for QuestionCategory {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "KNOWLEDGE" => Ok(QuestionCategory::Knowledge),
            "MULTIMEDIA" => Ok(QuestionCategory::Multimedia),
            "RECOMMENDATION" => Ok(QuestionCategory::Recommendation),
            "SMALLTALK" | "SMALL_TALK" => Ok(QuestionCategory::SmallTalk),
            _ => Err(AgentError::InvalidCategory(s.to_string())),
        }
    }
}

/// Object position of a triple: either another node or a literal value
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Term {
    Iri(String),
    Literal(String),
}

impl Term {
    pub fn as_str(&self) -> &str {
        match self {
            Term::Iri(s) | Term::Literal(s) => s,
        }
    }

    pub fn is_iri(&self) -> bool {
        matches!(self, Term::Iri(_))
    }
}

/// Crowd-sourcing statistics attached to a crowd answer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrowdAnnotation {
    pub support_votes: u32,
    pub reject_votes: u32,
    /// Inter-rater agreement (Fleiss' kappa in the reference data)
    pub agreement_score: f64,
}

/// Which knowledge source produced an answer
#[derive(Debug, Clone, PartialEq)]
pub enum Provenance {
    Crowd(CrowdAnnotation),
    Graph,
    Embeddings,
}

impl Provenance {
    pub fn tag(&self) -> &'static str {
        match self {
            Provenance::Crowd(_) => "crowd",
            Provenance::Graph => "graph",
            Provenance::Embeddings => "embeddings",
        }
    }
}

/// A resolved value plus where it came from
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    pub value: String,
    pub provenance: Provenance,
}

/// One of several identifiers sharing a label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityCandidate {
    pub id: EntityId,
    pub description: String,
}

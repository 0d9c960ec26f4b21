//! Attribute-based movie recommendation
//!
//! Passes, first non-empty wins:
//! 1. Shared designated attributes (genre, director, franchise) of 2+ movies.
//!    Needs `designated_min_shared` attributes, or the franchise alone.
//! 2. Shared attributes of any predicate, `unrestricted_min_shared` needed.
//! 3. The first genre of the first movie.
//!
//! Matching movies exclude the inputs, are ordered by rating (highest first)
//! and capped at `count`.

use crate::config::RecommendationConfig;
use crate::sources::traits::{binding, GraphQuery, KnowledgeStore};
use crate::types::{EntityId, Term};
use std::sync::Arc;
use tracing::{debug, warn};

/// Recommended movies plus the attributes that justify them
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub movies: Vec<EntityId>,
    /// `(predicate, value)` pairs every input movie has
    pub shared: Vec<(EntityId, Term)>,
}

pub struct RecommendationEngine {
    graph: Arc<dyn KnowledgeStore>,
    config: RecommendationConfig,
}

impl RecommendationEngine {
    pub fn new(graph: Arc<dyn KnowledgeStore>, config: RecommendationConfig) -> Self {
        Self { graph, config }
    }

    pub fn config(&self) -> &RecommendationConfig {
        &self.config
    }

    pub fn recommend(&self, movies: &[EntityId]) -> Option<Recommendation> {
        if movies.is_empty() {
            return None;
        }

        self.attribute_pass(movies, true)
            .or_else(|| self.attribute_pass(movies, false))
            .or_else(|| self.genre_pass(movies))
    }

    fn attribute_pass(&self, movies: &[EntityId], designated: bool) -> Option<Recommendation> {
        if movies.len() < 2 {
            return None;
        }

        let restrict = designated.then(|| self.config.designated_relations());
        let shared = self.shared_attributes(movies, restrict)?;

        let has_franchise = shared
            .iter()
            .any(|(p, _)| *p == self.config.franchise_relation);
        let needed = if designated {
            self.config.designated_min_shared
        } else {
            self.config.unrestricted_min_shared
        };
        debug!(
            designated,
            shared = shared.len(),
            has_franchise,
            "Shared attributes"
        );
        if shared.is_empty() || (!has_franchise && shared.len() < needed) {
            return None;
        }

        let found = self.movies_matching(shared.clone(), movies)?;
        Some(Recommendation {
            movies: found,
            shared,
        })
    }

    fn genre_pass(&self, movies: &[EntityId]) -> Option<Recommendation> {
        let query = GraphQuery::Objects {
            subject: movies[0].clone(),
            predicate: self.config.genre_relation.clone(),
        };
        let rows = self
            .graph
            .query(&query)
            .map_err(|e| warn!(error = %e, "Genre lookup failed"))
            .ok()?;
        let genre = rows.into_iter().find_map(|mut row| row.remove(binding::VALUE))?;

        let shared = vec![(self.config.genre_relation.clone(), genre)];
        let found = self.movies_matching(shared.clone(), movies)?;
        Some(Recommendation {
            movies: found,
            shared,
        })
    }

    /// Node-valued attributes common to all movies, in first-movie order,
    /// at most one value per property. `None` when a lookup fails.
    fn shared_attributes(
        &self,
        movies: &[EntityId],
        restrict: Option<Vec<EntityId>>,
    ) -> Option<Vec<(EntityId, Term)>> {
        let mut per_movie: Vec<Vec<(EntityId, Term)>> = Vec::with_capacity(movies.len());
        for movie in movies {
            let query = GraphQuery::Attributes {
                subject: movie.clone(),
                predicates: restrict.clone(),
            };
            let rows = match self.graph.query(&query) {
                Ok(rows) => rows,
                Err(e) => {
                    warn!(error = %e, movie = %movie, "Attribute lookup failed");
                    return None;
                }
            };
            let attributes = rows
                .into_iter()
                .filter_map(|mut row| {
                    let property = row.remove(binding::PROPERTY)?;
                    let value = row.remove(binding::VALUE)?;
                    value
                        .is_iri()
                        .then(|| (property.as_str().to_string(), value))
                })
                .collect();
            per_movie.push(attributes);
        }

        let (first, rest) = per_movie.split_first()?;
        let mut shared: Vec<(EntityId, Term)> = Vec::new();
        for attribute in first {
            let property_taken = shared.iter().any(|(p, _)| *p == attribute.0);
            if !property_taken && rest.iter().all(|attrs| attrs.contains(attribute)) {
                shared.push(attribute.clone());
            }
        }
        Some(shared)
    }

    fn movies_matching(
        &self,
        constraints: Vec<(EntityId, Term)>,
        exclude: &[EntityId],
    ) -> Option<Vec<EntityId>> {
        let query = GraphQuery::SubjectsMatching {
            constraints,
            exclude: exclude.to_vec(),
            rank_by: Some(self.config.rating_relation.clone()),
            limit: self.config.count,
        };
        let rows = self
            .graph
            .query(&query)
            .map_err(|e| warn!(error = %e, "Recommendation query failed"))
            .ok()?;

        let found: Vec<EntityId> = rows
            .into_iter()
            .filter_map(|mut row| row.remove(binding::SUBJECT))
            .map(|term| term.as_str().to_string())
            .collect();
        (!found.is_empty()).then_some(found)
    }
}

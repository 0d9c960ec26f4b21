//! Recommendation sentences

use super::engine::Recommendation;
use crate::answer::phrases::{pick, PhraseChooser};
use crate::sources::traits::{ImageLookup, KnowledgeStore};
use crate::types::EntityKind;
use std::sync::Arc;
use tracing::warn;

/// "A", "A and B", "A, B and C"
pub fn join_titles(titles: &[String]) -> String {
    match titles {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}

/// Host image token: the asset reference up to its first '.'
pub fn image_token(asset: &str) -> String {
    let stem = asset.split('.').next().unwrap_or(asset);
    format!("image:{stem}")
}

fn templates(titles: &str) -> Vec<String> {
    vec![
        format!("You should definitely check out {titles}!"),
        format!("I think you'd enjoy watching {titles}."),
        format!("Have you considered watching {titles}? I recommend it!"),
        format!("You might really like {titles}, give it a watch!"),
        format!("How about watching {titles}? It's worth your time."),
        format!("I’d suggest you take a look at {titles}!"),
        format!("If you’re looking for something good, try {titles}."),
        format!("You can't go wrong with {titles}, I highly recommend it."),
        format!("I think {titles} would be a great pick for you to watch!"),
        format!("Why not give {titles} a try? I think you'd enjoy it!"),
    ]
}

pub struct RecommendationRenderer {
    graph: Arc<dyn KnowledgeStore>,
    images: Option<Arc<dyn ImageLookup>>,
    chooser: Arc<dyn PhraseChooser>,
}

impl RecommendationRenderer {
    pub fn new(graph: Arc<dyn KnowledgeStore>, chooser: Arc<dyn PhraseChooser>) -> Self {
        Self {
            graph,
            images: None,
            chooser,
        }
    }

    pub fn with_images(mut self, images: Arc<dyn ImageLookup>) -> Self {
        self.images = Some(images);
        self
    }

    /// Template sentence, shared attributes, and a poster of the first
    /// recommended movie that has one
    pub fn render(&self, recommendation: &Recommendation) -> String {
        let titles: Vec<String> = recommendation
            .movies
            .iter()
            .map(|id| self.label(id))
            .collect();
        let mut answer = pick(self.chooser.as_ref(), &templates(&join_titles(&titles)));

        if !recommendation.shared.is_empty() {
            let attributes: Vec<String> = recommendation
                .shared
                .iter()
                .map(|(property, value)| {
                    format!("{}: {}", self.label(property), self.label(value.as_str()))
                })
                .collect();
            answer.push_str("\n\nYou wonder why? They share the following attributes:\n - ");
            answer.push_str(&attributes.join("\n - "));
        }

        match self.poster(&recommendation.movies) {
            Some(token) => format!("{token}\n{answer}"),
            None => answer,
        }
    }

    /// Reply when no pass found anything
    pub fn render_empty(&self, movies: &[String]) -> String {
        let names: Vec<String> = movies.iter().map(|id| self.label(id)).collect();
        format!(
            "There is no movie worthy of {} to be recommended.",
            names.join(", ")
        )
    }

    fn label(&self, id: &str) -> String {
        self.graph.label_for(id).unwrap_or_else(|| id.to_string())
    }

    fn poster(&self, movies: &[String]) -> Option<String> {
        let images = self.images.as_ref()?;
        movies.iter().find_map(|movie| {
            match images.image_for(movie, EntityKind::Movie) {
                Ok(asset) => asset.map(|a| image_token(&a)),
                Err(e) => {
                    warn!(error = %e, movie = %movie, "Poster lookup failed");
                    None
                }
            }
        })
    }
}

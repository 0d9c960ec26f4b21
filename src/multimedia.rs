//! Image requests
//!
//! A single person mention is tried first (portrait), then a single movie
//! mention (poster). Shared labels queue a MULTIMEDIA clarification.
//! Responses start with an `image:{stem}` token the host turns into a
//! picture.

use crate::answer::phrases::{pick, PhraseChooser};
use crate::clarify::{Ambiguity, ConversationState};
use crate::entity_linking::normalize::clean_query;
use crate::entity_linking::SpanResolver;
use crate::recommend::render::image_token;
use crate::sources::traits::{ImageLookup, KnowledgeStore};
use crate::types::{EntityKind, QuestionCategory};
use std::sync::Arc;
use tracing::{debug, warn};

pub const NO_IMAGE: &str = "I'm sorry, but I can only show images of actors or movie posters. Please try rephrasing your query!";

const PERSON_TEMPLATES: [&str; 16] = [
    "There is an image of {}, enjoy!",
    "Here is an image of {} for you!",
    "This is a picture of {}.",
    "Enjoy this image of {}.",
    "Here is a picture of {}.",
    "This is a photo of {}.",
    "Take a look at this wonderful image of {}!",
    "Feast your eyes on this picture of {}.",
    "Here's a fantastic shot of {}, just for you!",
    "Behold this captivating image of {}!",
    "Hope you enjoy this striking photo of {}.",
    "Check out this amazing picture of {}.",
    "Here's a stunning photo of {} to enjoy!",
    "Here's an impressive snapshot of {}.",
    "Take a moment to appreciate this photo of {}.",
    "Look at this beautiful picture of {}!",
];

const POSTER_TEMPLATES: [&str; 16] = [
    "There is a poster of the movie {}, enjoy!",
    "Here is a poster of the movie {} for you!",
    "This is a poster of the movie {}.",
    "Enjoy this poster of the movie {}.",
    "Here is a poster of the movie {}.",
    "This is a poster of the movie {}.",
    "Take a look at this wonderful poster of the movie {}!",
    "Feast your eyes on this poster of the movie {}.",
    "Here's a fantastic poster of the movie {}, just for you!",
    "Behold this captivating poster of the movie {}!",
    "Hope you enjoy this striking poster of the movie {}.",
    "Check out this amazing poster of the movie {}.",
    "Here's a stunning poster of the movie {} to enjoy!",
    "Here's an impressive poster of the movie {}.",
    "Take a moment to appreciate this poster of the movie {}.",
    "Look at this beautiful poster of the movie {}!",
];

fn templates(token: &str, label: &str, kind: EntityKind) -> Vec<String> {
    let phrasings = match kind {
        EntityKind::Movie => &POSTER_TEMPLATES,
        _ => &PERSON_TEMPLATES,
    };
    phrasings
        .iter()
        .map(|t| format!("{} {}", token, t.replace("{}", label)))
        .collect()
}

pub struct ImageFinder {
    resolver: Arc<SpanResolver>,
    graph: Arc<dyn KnowledgeStore>,
    images: Option<Arc<dyn ImageLookup>>,
    chooser: Arc<dyn PhraseChooser>,
}

impl ImageFinder {
    pub fn new(
        resolver: Arc<SpanResolver>,
        graph: Arc<dyn KnowledgeStore>,
        chooser: Arc<dyn PhraseChooser>,
    ) -> Self {
        Self {
            resolver,
            graph,
            images: None,
            chooser,
        }
    }

    pub fn with_images(mut self, images: Arc<dyn ImageLookup>) -> Self {
        self.images = Some(images);
        self
    }

    pub fn respond(&self, state: &mut ConversationState, message: &str) -> String {
        let cleaned = clean_query(message);
        [EntityKind::Person, EntityKind::Movie]
            .into_iter()
            .find_map(|kind| self.try_kind(state, &cleaned, kind))
            .unwrap_or_else(|| NO_IMAGE.to_string())
    }

    /// Image for an entity picked during clarification
    pub fn respond_resolved(&self, entity: &str, label: &str, kind: EntityKind) -> String {
        self.image_response(entity, label, kind)
            .unwrap_or_else(|| NO_IMAGE.to_string())
    }

    fn try_kind(
        &self,
        state: &mut ConversationState,
        message: &str,
        kind: EntityKind,
    ) -> Option<String> {
        let labels = self.resolver.resolve(message, kind);
        let [label] = labels.as_slice() else {
            debug!(kind = %kind, found = labels.len(), "Need exactly one mention for an image");
            return None;
        };

        let mut candidates = self.graph.candidates_for(kind, label);
        match candidates.len() {
            0 => None,
            1 => {
                let entity = candidates.remove(0);
                self.image_response(&entity.id, label, kind)
            }
            _ => Some(state.push(Ambiguity::new(
                QuestionCategory::Multimedia,
                kind,
                label.clone(),
                candidates,
            ))),
        }
    }

    fn image_response(&self, entity: &str, label: &str, kind: EntityKind) -> Option<String> {
        let images = self.images.as_ref()?;
        let asset = match images.image_for(entity, kind) {
            Ok(asset) => asset?,
            Err(e) => {
                warn!(error = %e, entity, "Image lookup failed");
                return None;
            }
        };

        Some(pick(
            self.chooser.as_ref(),
            &templates(&image_token(&asset), label, kind),
        ))
    }
}

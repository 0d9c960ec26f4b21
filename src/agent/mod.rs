//! Conversation orchestrator
//!
//! [`MovieAgent`] is the host-facing surface: one call per inbound message,
//! one reply string back. A pending clarification always takes precedence
//! over classification; otherwise the classifier picks the flow.
//!
//! ```text
//! message ─┬─ awaiting choice? ── resolve ── pop ── resume flow
//!          └─ classify ──┬─ SMALLTALK ────── fixed replies
//!                        ├─ KNOWLEDGE ────── KnowledgeAnswerer
//!                        ├─ MULTIMEDIA ───── ImageFinder
//!                        └─ RECOMMENDATION ─ RecommendationService
//! ```

pub mod classifier;
pub mod smalltalk;

pub use classifier::{KeywordClassifier, KeywordRouting};

use crate::answer::phrases::{pick, PhraseChooser, SeededChooser};
use crate::answer::{AnswerFusion, AnswerRenderer, KnowledgeAnswerer};
use crate::clarify::render::{render_acknowledgement, EXIT_REPLY, UNRESOLVED_REPLY};
use crate::clarify::{ConversationState, ConversationStore, Resolution};
use crate::config::AgentConfig;
use crate::entity_linking::{DictionaryRecognizer, EntityDictionary, RelationExtractor, SpanResolver};
use crate::multimedia::ImageFinder;
use crate::recommend::{RecommendationEngine, RecommendationRenderer, RecommendationService};
use crate::sources::traits::{
    CrowdTable, EntityRecognizer, ImageLookup, KnowledgeStore, MessageClassifier,
    RelationSimilarity, Rephraser, VectorStore,
};
use crate::sources::LoadedSources;
use crate::types::QuestionCategory;
use smalltalk::REPHRASE_REPLY;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Interim replies for hosts that post something while the answer is built
pub const RECEIVED_TEMPLATES: [&str; 24] = [
    "Good question, let's see.",
    "I hear you, let me quickly have a look.",
    "Interesting query, I'm on it!",
    "Hmm, checking now.",
    "Great question! Let me find out for you.",
    "Got it! Let me dive into that.",
    "Okay, give me a moment to explore this for you.",
    "I’m on it! Just a second.",
    "Let me see what I can find for you.",
    "Interesting thought! Let me check.",
    "One moment while I work on that.",
    "I’ll take a closer look at this for you.",
    "Checking now, hold tight!",
    "Let me dig into that for you.",
    "On it! This won’t take long.",
    "Let me explore this for you.",
    "Thanks for your patience! I’m checking now.",
    "Hang on while I gather some details.",
    "Let’s figure this out together. One sec!",
    "Great topic! Let me do a quick search.",
    "This is intriguing! Let me find the answer.",
    "Give me a moment to uncover the details.",
    "I’ll have some info for you shortly.",
    "Let me fetch the details for you.",
];

/// External capabilities the agent is wired to
///
/// Only the graph, the dictionary and the classifier are required; every
/// other collaborator degrades gracefully when absent.
pub struct Collaborators {
    pub graph: Arc<dyn KnowledgeStore>,
    pub dictionary: Arc<EntityDictionary>,
    pub classifier: Arc<dyn MessageClassifier>,
    /// Defaults to exact dictionary matching
    pub recognizer: Option<Arc<dyn EntityRecognizer>>,
    pub vectors: Option<Arc<dyn VectorStore>>,
    pub crowd: Option<Arc<dyn CrowdTable>>,
    pub rephraser: Option<Arc<dyn Rephraser>>,
    pub images: Option<Arc<dyn ImageLookup>>,
    pub similarity: Option<Arc<dyn RelationSimilarity>>,
}

impl Collaborators {
    pub fn new(
        graph: Arc<dyn KnowledgeStore>,
        dictionary: Arc<EntityDictionary>,
        classifier: Arc<dyn MessageClassifier>,
    ) -> Self {
        Self {
            graph,
            dictionary,
            classifier,
            recognizer: None,
            vectors: None,
            crowd: None,
            rephraser: None,
            images: None,
            similarity: None,
        }
    }

    /// Wire every in-memory source from a loaded dataset
    pub fn from_sources(sources: LoadedSources, classifier: Arc<dyn MessageClassifier>) -> Self {
        Self::new(
            Arc::new(sources.graph),
            Arc::new(sources.dictionary),
            classifier,
        )
        .with_vectors(Arc::new(sources.vectors))
        .with_crowd(Arc::new(sources.crowd))
        .with_images(Arc::new(sources.images))
    }

    pub fn with_recognizer(mut self, recognizer: Arc<dyn EntityRecognizer>) -> Self {
        self.recognizer = Some(recognizer);
        self
    }

    pub fn with_vectors(mut self, vectors: Arc<dyn VectorStore>) -> Self {
        self.vectors = Some(vectors);
        self
    }

    pub fn with_crowd(mut self, crowd: Arc<dyn CrowdTable>) -> Self {
        self.crowd = Some(crowd);
        self
    }

    pub fn with_rephraser(mut self, rephraser: Arc<dyn Rephraser>) -> Self {
        self.rephraser = Some(rephraser);
        self
    }

    pub fn with_images(mut self, images: Arc<dyn ImageLookup>) -> Self {
        self.images = Some(images);
        self
    }

    pub fn with_similarity(mut self, similarity: Arc<dyn RelationSimilarity>) -> Self {
        self.similarity = Some(similarity);
        self
    }
}

pub struct MovieAgent {
    classifier: Arc<dyn MessageClassifier>,
    store: ConversationStore,
    knowledge: KnowledgeAnswerer,
    recommendations: RecommendationService,
    images: ImageFinder,
    chooser: Arc<dyn PhraseChooser>,
}

impl MovieAgent {
    /// Build an agent choosing phrasings from a generator seeded by `config.seed`
    pub fn new(collaborators: Collaborators, config: &AgentConfig) -> Self {
        let chooser = Arc::new(SeededChooser::new(config.seed));
        Self::with_chooser(collaborators, config, chooser)
    }

    /// Build an agent with an explicit phrase chooser
    pub fn with_chooser(
        collaborators: Collaborators,
        config: &AgentConfig,
        chooser: Arc<dyn PhraseChooser>,
    ) -> Self {
        let Collaborators {
            graph,
            dictionary,
            classifier,
            recognizer,
            vectors,
            crowd,
            rephraser,
            images,
            similarity,
        } = collaborators;

        let recognizer: Arc<dyn EntityRecognizer> = match recognizer {
            Some(recognizer) => recognizer,
            None => Arc::new(DictionaryRecognizer::new(dictionary.clone())),
        };
        let resolver = Arc::new(
            SpanResolver::new(dictionary, config.resolver.clone()).with_recognizer(recognizer),
        );

        let mut relations = RelationExtractor::new(resolver.clone());
        if let Some(similarity) = similarity {
            relations = relations.with_similarity(similarity);
        }

        let mut fusion = AnswerFusion::new(graph.clone());
        if let Some(crowd) = crowd {
            fusion = fusion.with_crowd(crowd);
        }
        if let Some(vectors) = vectors {
            fusion = fusion.with_vectors(vectors);
        }

        let mut renderer = AnswerRenderer::new(chooser.clone());
        match rephraser {
            Some(rephraser) if config.use_rephraser => {
                renderer = renderer.with_rephraser(rephraser);
            }
            Some(_) => debug!("Rephraser configured but disabled"),
            None => {}
        }

        let knowledge = KnowledgeAnswerer::new(
            resolver.clone(),
            relations,
            graph.clone(),
            fusion,
            Arc::new(renderer),
        );

        let mut poster_renderer = RecommendationRenderer::new(graph.clone(), chooser.clone());
        let mut image_finder = ImageFinder::new(resolver.clone(), graph.clone(), chooser.clone());
        if let Some(images) = images {
            poster_renderer = poster_renderer.with_images(images.clone());
            image_finder = image_finder.with_images(images);
        }
        let recommendations = RecommendationService::new(
            resolver,
            graph.clone(),
            RecommendationEngine::new(graph, config.recommendation.clone()),
            poster_renderer,
        );

        Self {
            classifier,
            store: ConversationStore::new(),
            knowledge,
            recommendations,
            images: image_finder,
            chooser,
        }
    }

    /// Answer one message of a conversation. Never fails: collaborator
    /// errors end up as a generic reply.
    pub fn handle_message(&self, conversation_id: &str, text: &str) -> String {
        info!(conversation = conversation_id, "Message received");

        let reply = self.store.with_state(conversation_id, |state| {
            if state.is_awaiting() {
                self.continue_clarification(state, text)
            } else {
                self.dispatch(state, text)
            }
        });

        debug!(conversation = conversation_id, reply = %reply, "Reply ready");
        reply
    }

    /// Forget everything pending for a conversation
    pub fn reset(&self, conversation_id: &str) {
        info!(conversation = conversation_id, "Conversation reset");
        self.store.reset(conversation_id);
    }

    /// Whether the next message of the conversation is read as a choice
    pub fn is_awaiting_choice(&self, conversation_id: &str) -> bool {
        self.store.is_awaiting(conversation_id)
    }

    /// An interim "let me check" phrase, or `None` for small talk and for
    /// replies to a pending clarification
    pub fn acknowledgement(&self, conversation_id: &str, text: &str) -> Option<String> {
        if self.store.is_awaiting(conversation_id) {
            return None;
        }
        match self.classifier.classify(text) {
            Ok(QuestionCategory::SmallTalk) | Err(_) => None,
            Ok(_) => {
                let phrasings: Vec<String> =
                    RECEIVED_TEMPLATES.iter().map(|t| t.to_string()).collect();
                Some(pick(self.chooser.as_ref(), &phrasings))
            }
        }
    }

    fn dispatch(&self, state: &mut ConversationState, text: &str) -> String {
        let category = match self.classifier.classify(text) {
            Ok(category) => category,
            Err(e) => {
                warn!(error = %e, "Classification failed");
                return REPHRASE_REPLY.to_string();
            }
        };
        debug!(category = %category, "Message classified");

        match category {
            QuestionCategory::SmallTalk => smalltalk::reply(text).to_string(),
            QuestionCategory::Knowledge => self.knowledge.respond(state, text),
            QuestionCategory::Multimedia => self.images.respond(state, text),
            QuestionCategory::Recommendation => self.recommendations.respond(state, text),
        }
    }

    fn continue_clarification(&self, state: &mut ConversationState, text: &str) -> String {
        let candidate = match state.resolve(text) {
            Resolution::Unresolved => return UNRESOLVED_REPLY.to_string(),
            Resolution::Abort => {
                state.abort();
                return EXIT_REPLY.to_string();
            }
            Resolution::Selected { candidate, .. } => candidate,
        };
        let Some(ambiguity) = state.pop() else {
            return UNRESOLVED_REPLY.to_string();
        };
        info!(
            question_type = %ambiguity.question_type,
            entity = %candidate.id,
            "Clarification resolved"
        );

        let answer = match ambiguity.question_type {
            QuestionCategory::Knowledge => match (&ambiguity.relation, &ambiguity.relation_label) {
                (Some(relation), Some(relation_label)) => self.knowledge.answer_resolved(
                    &candidate.id,
                    relation,
                    &ambiguity.entity_label,
                    relation_label,
                ),
                _ => REPHRASE_REPLY.to_string(),
            },
            QuestionCategory::Multimedia => self.images.respond_resolved(
                &candidate.id,
                &ambiguity.entity_label,
                ambiguity.category,
            ),
            QuestionCategory::Recommendation => {
                self.recommendations.respond_resolved(state, candidate.id.clone())
            }
            QuestionCategory::SmallTalk => REPHRASE_REPLY.to_string(),
        };

        format!("{}\n{}", render_acknowledgement(&candidate.description), answer)
    }
}

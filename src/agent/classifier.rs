//! Keyword-based intent classification
//!
//! A deterministic [`MessageClassifier`] used by the CLI and in tests where
//! no trained model is available. Checked in order: small talk phrases,
//! recommendation keywords, multimedia keywords; everything else is a
//! knowledge question.

use super::smalltalk::{is_farewell, is_greeting};
use crate::error::SourceError;
use crate::sources::traits::MessageClassifier;
use crate::types::QuestionCategory;
use serde::{Deserialize, Serialize};

/// Keywords that route a message to a category
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordRouting {
    /// Keywords that trigger recommendations
    pub recommendation_keywords: Vec<String>,
    /// Keywords that trigger image lookups
    pub multimedia_keywords: Vec<String>,
    /// Category when no keyword matches
    pub default_category: QuestionCategory,
}

impl Default for KeywordRouting {
    fn default() -> Self {
        let owned = |words: &[&str]| words.iter().map(|w| w.to_string()).collect();
        Self {
            recommendation_keywords: owned(&[
                "recommend",
                "suggest",
                "similar to",
                "movies like",
                "films like",
                "something like",
            ]),
            multimedia_keywords: owned(&[
                "picture",
                "image",
                "photo",
                "poster",
                "look like",
                "looks like",
                "show me",
            ]),
            default_category: QuestionCategory::Knowledge,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct KeywordClassifier {
    routing: KeywordRouting,
}

impl KeywordClassifier {
    pub fn new(routing: KeywordRouting) -> Self {
        Self { routing }
    }
}

impl MessageClassifier for KeywordClassifier {
    fn classify(&self, text: &str) -> Result<QuestionCategory, SourceError> {
        if is_greeting(text) || is_farewell(text) {
            return Ok(QuestionCategory::SmallTalk);
        }

        let lowered = text.to_lowercase();
        let mentions = |keywords: &[String]| keywords.iter().any(|k| lowered.contains(k.as_str()));

        if mentions(&self.routing.recommendation_keywords) {
            Ok(QuestionCategory::Recommendation)
        } else if mentions(&self.routing.multimedia_keywords) {
            Ok(QuestionCategory::Multimedia)
        } else {
            Ok(self.routing.default_category)
        }
    }
}

//! Response sentences for fused answers

use super::phrases::{pick, PhraseChooser};
use crate::sources::traits::Rephraser;
use crate::types::{Answer, CrowdAnnotation, Provenance};
use std::sync::Arc;
use tracing::warn;

pub const EMBEDDING_CLAUSE: &str = " (Embedding Answer)";

/// `YYYY-MM-DD` becomes `YYYY`; anything else is returned unchanged
pub fn truncate_date(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    let date_shaped = chars.len() == 10
        && chars[4] == '-'
        && chars[7] == '-'
        && chars
            .iter()
            .enumerate()
            .all(|(i, c)| i == 4 || i == 7 || c.is_ascii_digit());
    if date_shaped {
        chars[..4].iter().collect()
    } else {
        value.to_string()
    }
}

/// Agreement score cut (not rounded) to three decimals
pub fn truncate_score(score: f64) -> f64 {
    (score * 1000.0).trunc() / 1000.0
}

pub fn crowd_clause(annotation: &CrowdAnnotation) -> String {
    format!(
        " (This response was populated using crowd-sourced data, which shows an inter-rater agreement of {} and an answer distribution of {} supporting and {} rejecting votes.)",
        truncate_score(annotation.agreement_score),
        annotation.support_votes,
        annotation.reject_votes
    )
}

/// Suffix naming where the answer came from; empty for the graph
pub fn provenance_clause(provenance: &Provenance) -> String {
    match provenance {
        Provenance::Crowd(annotation) => crowd_clause(annotation),
        Provenance::Graph => String::new(),
        Provenance::Embeddings => EMBEDDING_CLAUSE.to_string(),
    }
}

fn answer_templates(value: &str, relation: &str, entity: &str) -> Vec<String> {
    vec![
        format!("I think it is {value}."),
        format!("That is a good question, I think that the answer is {value}."),
        format!("As far as I know, it is {value}."),
        format!("I would say that it is {value}."),
        format!("According to my knowledge, it is {value}."),
        format!("I'm almost certain that it is {value}."),
        format!("The {relation} is {value} for {entity}."),
        format!("I think that the {relation} is {value} for {entity}."),
        format!("I would say that the {relation} of {entity} is {value}."),
    ]
}

/// Turns answers into chat sentences
pub struct AnswerRenderer {
    chooser: Arc<dyn PhraseChooser>,
    rephraser: Option<Arc<dyn Rephraser>>,
}

impl AnswerRenderer {
    pub fn new(chooser: Arc<dyn PhraseChooser>) -> Self {
        Self {
            chooser,
            rephraser: None,
        }
    }

    /// Rewrite sentences through `rephraser` before adding the provenance clause
    pub fn with_rephraser(mut self, rephraser: Arc<dyn Rephraser>) -> Self {
        self.rephraser = Some(rephraser);
        self
    }

    pub fn chooser(&self) -> &dyn PhraseChooser {
        self.chooser.as_ref()
    }

    pub fn render(&self, entity_label: &str, relation_label: &str, answer: &Answer) -> String {
        let value = truncate_date(&answer.value);

        let sentence = self
            .rephrase(&format!("The {relation_label} of {entity_label} is {value}."))
            .unwrap_or_else(|| {
                pick(
                    self.chooser.as_ref(),
                    &answer_templates(&value, relation_label, entity_label),
                )
            });

        format!("{}{}", sentence, provenance_clause(&answer.provenance))
    }

    fn rephrase(&self, plain: &str) -> Option<String> {
        let rephraser = self.rephraser.as_ref()?;
        match rephraser.rewrite(plain) {
            Ok(text) if !text.trim().is_empty() => Some(text),
            Ok(_) => None,
            Err(e) => {
                warn!(error = %e, "Rephraser failed, using template");
                None
            }
        }
    }
}

//! Clarification texts
//!
//! Prompts list every candidate description numbered from 1, in the order
//! the candidates were stored on the ambiguity.

use super::state::Ambiguity;

pub const UNRESOLVED_REPLY: &str = "I'm not sure which one you meant. Please specify using the list number or the full description.\nLet me know if I should stop the disambiguation.";

pub const EXIT_REPLY: &str = "Okay, on your demand the process has been interrupted. I'm happy to answer any other questions :)";

/// Prefix used when a recommendation still has unresolved movies queued
pub const MORE_INFORMATION_PREFIX: &str = "Unfortunately, I need more information still. ";

/// Numbered prompt for an ambiguity
pub fn render_prompt(ambiguity: &Ambiguity) -> String {
    let mut lines = vec![format!(
        "It seems there are several entries for {}:",
        ambiguity.entity_label
    )];

    for (i, candidate) in ambiguity.candidates.iter().enumerate() {
        lines.push(format!("{}. {}", i + 1, candidate.description));
    }

    lines.push(
        "Let me know which one you're asking about or whether you'd like to stop.".to_string(),
    );
    lines.join("\n")
}

/// Opening sentence once a candidate has been chosen
pub fn render_acknowledgement(description: &str) -> String {
    format!("I understand you're asking about the {}.", description)
}

//! Mention spans and overlap reconciliation
//!
//! Rule-based and fuzzy matches are both expressed as [`Mention`]s so they
//! can be merged into a single non-overlapping span set per message.

use crate::types::EntityKind;

/// Where a mention came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchSource {
    /// External recognizer span
    Rule,
    /// Dictionary label aligned against the text
    Fuzzy,
}

/// A typed occurrence of a label inside a message
#[derive(Debug, Clone, PartialEq)]
pub struct Mention {
    /// Substring of the (normalized) message
    pub matched_text: String,
    /// Lowercased dictionary key the span stands for
    pub label: String,
    pub kind: EntityKind,
    /// 0..=100; recognizer spans score 100
    pub score: f64,
    /// Start character position (inclusive)
    pub start: usize,
    /// End character position (exclusive)
    pub end: usize,
    pub is_full_word: bool,
    pub source: MatchSource,
}

impl Mention {
    /// Label length in characters, used for tie-breaking
    pub fn label_len(&self) -> usize {
        self.label.chars().count()
    }

    pub fn overlaps(&self, other: &Mention) -> bool {
        spans_overlap(self.start, self.end, other.start, other.end)
    }
}

/// Half-open ranges `[start1, end1)` and `[start2, end2)` intersect
pub fn spans_overlap(start1: usize, end1: usize, start2: usize, end2: usize) -> bool {
    start1.max(start2) < end1.min(end2)
}

/// Keep every mention that does not overlap an earlier kept one
pub fn filter_overlapping(mentions: Vec<Mention>) -> Vec<Mention> {
    let mut kept: Vec<Mention> = Vec::with_capacity(mentions.len());
    for mention in mentions {
        if !kept.iter().any(|k| k.overlaps(&mention)) {
            kept.push(mention);
        }
    }
    kept
}

/// Merge rule and fuzzy mentions into one non-overlapping set.
///
/// Candidates are walked in `(start asc, label length desc, score desc)`
/// order. A challenger that overlaps a kept mention replaces it only with a
/// strictly longer label, or an equal-length label and a strictly higher
/// score. Output is ordered by start position.
pub fn combine_and_sort(rule: Vec<Mention>, fuzzy: Vec<Mention>) -> Vec<Mention> {
    let mut combined: Vec<Mention> = rule.into_iter().chain(fuzzy).collect();
    combined.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then_with(|| b.label_len().cmp(&a.label_len()))
            .then_with(|| {
                b.score
                    .partial_cmp(&a.score)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    });

    let mut kept: Vec<Mention> = Vec::new();
    for challenger in combined {
        let overlapping: Vec<usize> = kept
            .iter()
            .enumerate()
            .filter(|(_, k)| k.overlaps(&challenger))
            .map(|(idx, _)| idx)
            .collect();

        if overlapping.is_empty() {
            kept.push(challenger);
            continue;
        }

        // Only replace when the challenger beats every kept mention it
        // touches, so no two survivors can ever intersect.
        let wins = overlapping.iter().all(|&idx| {
            let incumbent = &kept[idx];
            challenger.label_len() > incumbent.label_len()
                || (challenger.label_len() == incumbent.label_len()
                    && challenger.score > incumbent.score)
        });
        if wins {
            for idx in overlapping.into_iter().rev() {
                kept.remove(idx);
            }
            kept.push(challenger);
        }
    }

    kept.sort_by_key(|m| m.start);
    kept
}

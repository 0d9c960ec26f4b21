//! Text normalization for span matching
//!
//! Provides:
//! - Unicode NFKC fold + lowercase (positions stay character based)
//! - Hyphen variants: entity dictionaries mix `-`, `–` and `—`
//! - Query cleaning (whitespace collapse, trailing punctuation)

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Hyphen glyphs used interchangeably in labels: ASCII hyphen, en-dash, em-dash
pub const HYPHEN_VARIANTS: [char; 3] = ['-', '\u{2013}', '\u{2014}'];

/// Trailing characters dropped by [`clean_query`]
const TRAILING_NOISE: [char; 6] = ['?', '.', ',', '!', '"', '\''];

/// Characters removed before sentence-similarity relation matching
const SIMILARITY_NOISE: [char; 12] = ['?', '!', '.', ',', ':', ';', '(', ')', '[', ']', '{', '}'];

/// Normalize text for matching: NFKC fold, then lowercase.
///
/// # Examples
///
/// ```
/// use movie_agent::entity_linking::normalize::normalize_text;
///
/// assert_eq!(normalize_text("Good Will Hunting"), "good will hunting");
/// assert_eq!(normalize_text("Ｔｉｔａｎｉｃ"), "titanic");
/// ```
pub fn normalize_text(s: &str) -> String {
    s.nfkc().collect::<String>().to_lowercase()
}

pub fn is_hyphen(c: char) -> bool {
    HYPHEN_VARIANTS.contains(&c)
}

/// All versions of `text` with every hyphen replaced by each glyph.
///
/// Text without hyphens yields a single variant. Character offsets are
/// identical across variants since every glyph is one `char`.
pub fn hyphen_variants(text: &str) -> Vec<String> {
    if !text.chars().any(is_hyphen) {
        return vec![text.to_string()];
    }

    HYPHEN_VARIANTS
        .iter()
        .map(|&glyph| {
            text.chars()
                .map(|c| if is_hyphen(c) { glyph } else { c })
                .collect()
        })
        .collect()
}

/// Collapse whitespace, trim, and drop one trailing punctuation mark.
///
/// ```
/// use movie_agent::entity_linking::normalize::clean_query;
///
/// assert_eq!(clean_query("  Who directed   Heat? "), "Who directed Heat");
/// ```
pub fn clean_query(query: &str) -> String {
    let mut cleaned = query.split_whitespace().collect::<Vec<_>>().join(" ");
    if cleaned.ends_with(TRAILING_NOISE) {
        cleaned.pop();
    }
    cleaned
}

/// Remove every case-insensitive occurrence of `label` from `text`.
/// Hyphen glyphs in `label` match any hyphen glyph in `text`.
pub fn remove_label(text: &str, label: &str) -> String {
    if label.is_empty() {
        return text.to_string();
    }
    let pattern: String = label
        .chars()
        .map(|c| {
            if is_hyphen(c) {
                "[-\u{2013}\u{2014}]".to_string()
            } else {
                regex::escape(c.encode_utf8(&mut [0; 4]))
            }
        })
        .collect();
    match Regex::new(&format!("(?i){}", pattern)) {
        Ok(re) => re.replace_all(text, "").into_owned(),
        Err(_) => text.to_string(),
    }
}

/// Strip punctuation before handing text to a sentence encoder
pub fn strip_punctuation(text: &str) -> String {
    text.chars().filter(|c| !SIMILARITY_NOISE.contains(c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_hyphen_single_variant() {
        assert_eq!(hyphen_variants("heat"), vec!["heat"]);
    }

    #[test]
    fn test_hyphen_variants_replace_all_glyphs() {
        let variants = hyphen_variants("spider-man: far\u{2014}from home");
        assert_eq!(variants.len(), 3);
        assert_eq!(variants[0], "spider-man: far-from home");
        assert_eq!(variants[1], "spider\u{2013}man: far\u{2013}from home");
        assert_eq!(variants[2], "spider\u{2014}man: far\u{2014}from home");
        for v in &variants {
            assert_eq!(v.chars().count(), "spider-man: far-from home".chars().count());
        }
    }

    #[test]
    fn test_clean_query() {
        assert_eq!(clean_query("When was Alien released?"), "When was Alien released");
        assert_eq!(clean_query("\"Heat\""), "\"Heat");
        assert_eq!(clean_query("Heat"), "Heat");
        assert_eq!(clean_query("   "), "");
    }

    #[test]
    fn test_remove_label_case_insensitive() {
        assert_eq!(
            remove_label("who directed good will hunting", "Good Will Hunting"),
            "who directed "
        );
        assert_eq!(remove_label("a (b) c", "(b)"), "a  c");
    }

    #[test]
    fn test_remove_label_any_hyphen() {
        assert_eq!(
            remove_label("Who directed Spider\u{2013}Man?", "Spider-Man"),
            "Who directed ?"
        );
    }

    #[test]
    fn test_strip_punctuation() {
        assert_eq!(strip_punctuation("who (really) wrote it?!"), "who really wrote it");
    }
}

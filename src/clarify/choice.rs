//! Parsing of clarification replies
//!
//! A reply is checked in order for:
//! 1. the word "last"
//! 2. the first word that is an exit word or a list position
//!    ("2", "2nd", "two", "second")
//! 3. a case-insensitive substring of a candidate description, bare or
//!    rendered as `"{n}. {description}"`

/// Words that end the clarification dialogue
pub const EXIT_WORDS: [&str; 10] = [
    "exit",
    "done",
    "stop",
    "not",
    "no",
    "interrupt",
    "good",
    "anymore",
    "already",
    "enough",
];

const CARDINALS: [&str; 10] = [
    "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
];

const ORDINALS: [&str; 10] = [
    "first", "second", "third", "fourth", "fifth", "sixth", "seventh", "eighth", "ninth", "tenth",
];

const NUMERAL_ORDINALS: [&str; 10] = [
    "1st", "2nd", "3rd", "4th", "5th", "6th", "7th", "8th", "9th", "10th",
];

/// Outcome of parsing a reply against `n` candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    /// Zero-based candidate index, always `< n`
    Selected(usize),
    Exit,
    Unresolved,
}

/// Zero-based position named by a single word
fn position(word: &str) -> Option<usize> {
    if let Ok(n) = word.parse::<usize>() {
        return (1..=10).contains(&n).then(|| n - 1);
    }
    CARDINALS
        .iter()
        .position(|w| *w == word)
        .or_else(|| ORDINALS.iter().position(|w| *w == word))
        .or_else(|| NUMERAL_ORDINALS.iter().position(|w| *w == word))
}

/// Parse `message` against the candidate descriptions
pub fn parse_choice(message: &str, descriptions: &[String]) -> Choice {
    let count = descriptions.len();
    if count == 0 {
        return Choice::Unresolved;
    }

    let cleaned = message.to_lowercase().replace('.', "");
    let words: Vec<&str> = cleaned
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|w| !w.is_empty())
        .collect();

    if words.contains(&"last") {
        return Choice::Selected(count - 1);
    }

    for word in &words {
        if EXIT_WORDS.contains(word) {
            return Choice::Exit;
        }
        if let Some(index) = position(word) {
            return if index < count {
                Choice::Selected(index)
            } else {
                Choice::Unresolved
            };
        }
    }

    let needle = message.trim().to_lowercase();
    if needle.is_empty() {
        return Choice::Unresolved;
    }
    descriptions
        .iter()
        .enumerate()
        .find(|(idx, description)| {
            let description = description.to_lowercase();
            description.contains(&needle)
                || format!("{}. {}", idx + 1, description).contains(&needle)
        })
        .map(|(idx, _)| Choice::Selected(idx))
        .unwrap_or(Choice::Unresolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titanic() -> Vec<String> {
        vec![
            "1997 film by James Cameron".to_string(),
            "1953 film by Jean Negulesco".to_string(),
        ]
    }

    #[test]
    fn test_numerals_and_ordinals() {
        assert_eq!(parse_choice("2", &titanic()), Choice::Selected(1));
        assert_eq!(parse_choice("The 2nd one.", &titanic()), Choice::Selected(1));
        assert_eq!(parse_choice("first please", &titanic()), Choice::Selected(0));
        assert_eq!(parse_choice("number two!", &titanic()), Choice::Selected(1));
        assert_eq!(parse_choice("the one with the iceberg", &titanic()), Choice::Selected(0));
    }

    #[test]
    fn test_last_wins_over_other_words() {
        assert_eq!(parse_choice("not the first, the last", &titanic()), Choice::Selected(1));
    }

    #[test]
    fn test_exit_words() {
        assert_eq!(parse_choice("stop", &titanic()), Choice::Exit);
        assert_eq!(parse_choice("No thanks", &titanic()), Choice::Exit);
        assert_eq!(parse_choice("enough.", &titanic()), Choice::Exit);
    }

    #[test]
    fn test_out_of_range_is_unresolved() {
        assert_eq!(parse_choice("5", &titanic()), Choice::Unresolved);
        assert_eq!(parse_choice("the fourth", &titanic()), Choice::Unresolved);
    }

    #[test]
    fn test_description_match() {
        assert_eq!(parse_choice("Jean Negulesco", &titanic()), Choice::Selected(1));
        assert_eq!(parse_choice("1997 film", &titanic()), Choice::Selected(0));
        assert_eq!(parse_choice("2. 1953 film", &titanic()), Choice::Selected(1));
    }

    #[test]
    fn test_unresolved() {
        assert_eq!(parse_choice("hmm, what?", &titanic()), Choice::Unresolved);
        assert_eq!(parse_choice("   ", &titanic()), Choice::Unresolved);
        assert_eq!(parse_choice("2", &[]), Choice::Unresolved);
    }
}

//! Partial-substring alignment
//!
//! Slides the needle over the haystack and keeps the best scoring window of
//! the same length. Scores are Indel similarity scaled to 0..=100:
//! `2 * lcs / (len_a + len_b)`, so an inserted or dropped letter costs less
//! than a substitution. Positions are character offsets into the haystack.

/// Punctuation accepted around a full-word match (besides whitespace)
pub const BOUNDARY_PUNCTUATION: [char; 10] = ['\'', '"', '.', ',', '?', '!', ';', ':', '(', ')'];

/// Best window of a needle inside a haystack
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Alignment {
    pub score: f64,
    pub dest_start: usize,
    pub dest_end: usize,
}

pub fn is_boundary(c: char) -> bool {
    c.is_whitespace() || BOUNDARY_PUNCTUATION.contains(&c)
}

/// Whether `haystack[start..end]` sits between word boundaries
pub fn is_bounded(haystack: &[char], start: usize, end: usize) -> bool {
    let left = start == 0 || is_boundary(haystack[start - 1]);
    let right = end == haystack.len() || is_boundary(haystack[end]);
    left && right
}

/// Align `needle` against every window of `haystack` of the same length.
///
/// Returns `None` when the best score is below `score_cutoff`. On equal
/// scores a word-bounded window beats an unbounded one, then the leftmost
/// wins. A needle longer than the haystack is compared against the whole
/// haystack.
pub fn partial_ratio_alignment(
    needle: &[char],
    haystack: &[char],
    score_cutoff: f64,
) -> Option<Alignment> {
    if needle.is_empty() || haystack.is_empty() {
        return None;
    }

    if needle.len() >= haystack.len() {
        let score = indel_similarity(needle, haystack);
        return (score >= score_cutoff).then_some(Alignment {
            score,
            dest_start: 0,
            dest_end: haystack.len(),
        });
    }

    let window = needle.len();
    let mut best: Option<(Alignment, bool)> = None;

    for start in 0..=(haystack.len() - window) {
        let end = start + window;
        // Windows must share a boundary character with the needle
        if !needle.contains(&haystack[start]) && !needle.contains(&haystack[end - 1]) {
            continue;
        }

        let score = indel_similarity(needle, &haystack[start..end]);
        let bounded = is_bounded(haystack, start, end);
        let better = match best {
            None => true,
            Some((b, b_bounded)) => score > b.score || (score == b.score && bounded && !b_bounded),
        };

        if better {
            best = Some((
                Alignment {
                    score,
                    dest_start: start,
                    dest_end: end,
                },
                bounded,
            ));
            if score >= 100.0 && bounded {
                break;
            }
        }
    }

    best.map(|(alignment, _)| alignment)
        .filter(|b| b.score >= score_cutoff)
}

/// Indel similarity in 0..=100
pub fn indel_similarity(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }
    200.0 * longest_common_subsequence(a, b) as f64 / total as f64
}

fn longest_common_subsequence(a: &[char], b: &[char]) -> usize {
    let mut previous = vec![0usize; b.len() + 1];
    let mut current = vec![0usize; b.len() + 1];
    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            current[j + 1] = if ca == cb {
                previous[j] + 1
            } else {
                current[j].max(previous[j + 1])
            };
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[b.len()]
}

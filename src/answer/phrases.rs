//! Template selection
//!
//! Responses pick one of several equivalent phrasings. The choice is
//! injected so tests can pin it.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// Picks an index into a non-empty list of phrasings
pub trait PhraseChooser: Send + Sync {
    /// Index in `0..len`; `len` is never zero
    fn choose(&self, len: usize) -> usize;
}

/// Uniform choice from a seedable RNG
pub struct SeededChooser {
    rng: Mutex<StdRng>,
}

impl SeededChooser {
    /// `None` seeds from OS entropy
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng: Mutex::new(rng),
        }
    }
}

impl PhraseChooser for SeededChooser {
    fn choose(&self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        rng.gen_range(0..len)
    }
}

/// Always the same position, clamped to the list
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedChooser(pub usize);

impl PhraseChooser for FixedChooser {
    fn choose(&self, len: usize) -> usize {
        self.0.min(len.saturating_sub(1))
    }
}

/// Pick one phrasing
pub fn pick(chooser: &dyn PhraseChooser, options: &[String]) -> String {
    if options.is_empty() {
        return String::new();
    }
    let idx = chooser.choose(options.len()).min(options.len() - 1);
    options[idx].clone()
}

//! Randomized construction of word sets.
//!
//! A stem of `n - 1` characters is fetched first. Then `n - 1` distinct stem
//! positions are drawn and each receives a leaf containing the stem character
//! at that position. A stem attempt is abandoned when the word service runs
//! out of leaves or keeps handing back words that cannot be used; the
//! generator then starts over with a fresh stem.
//!
//! When the stem is shorter than `n - 1` only as many positions as the stem
//! has characters can be drawn, and the set ends up smaller than requested.

use crate::dictionary::WordSource;
use crate::error::GenerateError;
use log::{debug, info, warn};
use rand::seq::index;
use rand::Rng;
use shared::WordSet;

/// Consecutive unusable leaves tolerated for one position before the stem
/// attempt is abandoned. The sixth rejection aborts.
pub const MAX_LEAF_REJECTIONS: u32 = 5;

/// Default bound on fresh stems fetched for one puzzle.
pub const DEFAULT_MAX_STEM_ATTEMPTS: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub max_stem_attempts: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_stem_attempts: DEFAULT_MAX_STEM_ATTEMPTS,
        }
    }
}

pub struct PuzzleGenerator<'a> {
    words: &'a dyn WordSource,
    config: GeneratorConfig,
}

impl<'a> PuzzleGenerator<'a> {
    pub fn new(words: &'a dyn WordSource, config: GeneratorConfig) -> Self {
        Self { words, config }
    }

    /// Builds a word set of (up to) `word_count` words.
    pub async fn generate<R>(&self, word_count: usize, rng: &mut R) -> Result<WordSet, GenerateError>
    where
        R: Rng + Send,
    {
        if word_count == 0 {
            return Err(GenerateError::EmptyPuzzle);
        }

        for attempt in 1..=self.config.max_stem_attempts {
            if let Some(words) = self.try_stem(word_count, rng).await? {
                info!(
                    "Built {}-word puzzle on stem {:?} after {} attempt(s)",
                    words.len(),
                    words.stem(),
                    attempt
                );
                return Ok(words);
            }
            debug!("Stem attempt {} failed, fetching a new stem", attempt);
        }

        warn!(
            "Giving up on a {}-word puzzle after {} stem attempts",
            word_count, self.config.max_stem_attempts
        );
        Err(GenerateError::StemAttemptsExhausted(
            self.config.max_stem_attempts,
        ))
    }

    /// One stem attempt. `Ok(None)` means start over with a new stem.
    async fn try_stem<R>(&self, word_count: usize, rng: &mut R) -> Result<Option<WordSet>, GenerateError>
    where
        R: Rng + Send,
    {
        let leaf_count = word_count - 1;
        let stem = self.words.fetch_stem(leaf_count).await?;
        if stem.is_empty() {
            return Ok(None);
        }

        let mut words = WordSet::new(stem);
        for stem_index in leaf_indices(words.stem(), leaf_count, rng) {
            if !self.populate_leaf(&mut words, stem_index).await? {
                return Ok(None);
            }
        }
        Ok(Some(words))
    }

    /// Fetches leaves for `stem_index` until one fits. Returns false when the
    /// word service is out of candidates or too many fetched leaves were
    /// unusable in a row.
    async fn populate_leaf(&self, words: &mut WordSet, stem_index: usize) -> Result<bool, GenerateError> {
        let Some(shared) = words.stem_char(stem_index) else {
            return Ok(false);
        };

        let mut rejections = 0;
        loop {
            let leaf = self.words.fetch_leaf(shared).await?;
            if leaf.is_empty() {
                debug!("No leaf available for {:?}", shared);
                return Ok(false);
            }
            if words.add_leaf(&leaf, stem_index) {
                return Ok(true);
            }

            rejections += 1;
            if rejections > MAX_LEAF_REJECTIONS {
                debug!("Too many unusable leaves for {:?}", shared);
                return Ok(false);
            }
        }
    }
}

/// Draws `count` distinct character positions of `stem`, collapsing to every
/// position when the stem is too short.
pub fn leaf_indices<R: Rng + ?Sized>(stem: &str, count: usize, rng: &mut R) -> Vec<usize> {
    let len = stem.chars().count();
    index::sample(rng, len, count.min(len)).into_vec()
}

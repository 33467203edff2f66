//! Word pools consumed by the spawn scheduler.

use std::collections::{BTreeMap, BTreeSet};

use rand::{seq::SliceRandom, Rng};
use thiserror::Error;
use word_defence_core::{Level, WordText};

/// Patterns that mark a word as a level five tongue twister.
const HARD_PATTERNS: [&str; 5] = ["th", "qu", "gh", "ph", "rh"];

/// Reasons a provider could not supply words for a level.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum WordPoolError {
    /// The provider holds no vocabulary for the level.
    #[error("no vocabulary configured for level {0}")]
    MissingLevel(Level),
    /// The provider failed to read the level's vocabulary.
    #[error("vocabulary for level {level} is unavailable: {reason}")]
    Unavailable {
        /// Level that was requested.
        level: Level,
        /// Human readable cause reported by the provider.
        reason: String,
    },
}

/// Supplies the candidate vocabulary for each level.
pub trait WordPoolProvider {
    /// Returns the candidate words for the provided level.
    fn words_for_level(&self, level: Level) -> Result<Vec<String>, WordPoolError>;
}

/// Filtered vocabulary the scheduler draws words from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordPool {
    level: Level,
    words: Vec<WordText>,
}

impl WordPool {
    /// Builds a pool, dropping single-letter and malformed candidates.
    #[must_use]
    pub fn new<I, S>(level: Level, candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut rejected = 0usize;
        let words = candidates
            .into_iter()
            .filter_map(|candidate| match WordText::new(candidate) {
                Ok(word) if word.len() > 1 => Some(word),
                _ => {
                    rejected += 1;
                    None
                }
            })
            .collect();

        if rejected > 0 {
            log::debug!("dropped {rejected} unusable words from the level {level} pool");
        }

        Self { level, words }
    }

    /// Pool that never yields a word.
    #[must_use]
    pub fn empty(level: Level) -> Self {
        Self {
            level,
            words: Vec::new(),
        }
    }

    /// Level the pool was fetched for.
    #[must_use]
    pub fn level(&self) -> Level {
        self.level
    }

    /// Number of usable words.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Reports whether the pool holds no usable words.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Usable words in provider order.
    #[must_use]
    pub fn words(&self) -> &[WordText] {
        &self.words
    }

    /// Picks a word uniformly at random.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&WordText> {
        self.words.choose(rng)
    }
}

/// In-memory provider holding a fixed vocabulary per level.
#[derive(Clone, Debug, Default)]
pub struct StaticWordPools {
    levels: BTreeMap<Level, Vec<String>>,
}

impl StaticWordPools {
    /// Creates a provider without any vocabulary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the vocabulary of a single level.
    #[must_use]
    pub fn with_level<I, S>(mut self, level: Level, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let _ = self
            .levels
            .insert(level, words.into_iter().map(Into::into).collect());
        self
    }

    /// Splits a flat vocabulary into levels by word length and letter patterns.
    ///
    /// Level 1 takes three or four letters, level 2 four or five, level 3
    /// five to seven, level 4 eight or more, and level 5 any word containing
    /// one of `th`, `qu`, `gh`, `ph` or `rh`. A word may land in several
    /// levels. Entries are trimmed, lowercased, deduplicated and sorted.
    #[must_use]
    pub fn partitioned<I, S>(vocabulary: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let unique: BTreeSet<String> = vocabulary
            .into_iter()
            .map(|word| word.as_ref().trim().to_ascii_lowercase())
            .filter(|word| !word.is_empty() && word.bytes().all(|byte| byte.is_ascii_lowercase()))
            .collect();

        let mut pools = Self::new();
        for level in Level::all() {
            let words: Vec<String> = unique
                .iter()
                .filter(|word| belongs_to_level(level, word))
                .cloned()
                .collect();
            pools = pools.with_level(level, words);
        }
        pools
    }

    /// Provider backed by the vocabulary bundled with the crate.
    #[must_use]
    pub fn builtin() -> Self {
        Self::partitioned(BUILTIN_VOCABULARY.iter())
    }
}

impl WordPoolProvider for StaticWordPools {
    fn words_for_level(&self, level: Level) -> Result<Vec<String>, WordPoolError> {
        self.levels
            .get(&level)
            .cloned()
            .ok_or(WordPoolError::MissingLevel(level))
    }
}

fn belongs_to_level(level: Level, word: &str) -> bool {
    let letters = word.len();
    match level.get() {
        1 => (3..=4).contains(&letters),
        2 => (4..=5).contains(&letters),
        3 => (5..=7).contains(&letters),
        4 => letters >= 8,
        _ => HARD_PATTERNS.iter().any(|pattern| word.contains(pattern)),
    }
}

const BUILTIN_VOCABULARY: &[&str] = &[
    "ace", "act", "aim", "air", "arc", "arm", "art", "ash", "bay", "bed", "bow", "cab", "cat",
    "cog", "cup", "den", "dew", "dig", "dog", "dot", "ear", "elm", "fan", "fig", "fin", "fog",
    "fox", "gem", "gum", "hat", "hen", "hog", "ice", "ink", "jar", "jet", "key", "kit", "lab",
    "log", "map", "mud", "net", "oak", "owl", "pen", "pig", "ram", "ray", "rod", "sun", "tap",
    "tin", "van", "web", "yak", "zip", "beam", "bolt", "cape", "city", "dome", "dust", "fire",
    "flag", "gate", "glow", "hawk", "iron", "jump", "kite", "lamp", "moon", "nest", "palm",
    "pulse", "rain", "rock", "sand", "ship", "star", "tide", "wave", "wind", "wolf", "zone",
    "amber", "blaze", "cabin", "cloud", "delta", "eagle", "flame", "frost", "giant", "horse",
    "laser", "lemon", "metal", "night", "ocean", "orbit", "plane", "radar", "river", "shell",
    "spark", "stone", "storm", "tiger", "tower", "vapor", "beacon", "bridge", "canyon",
    "castle", "comet", "engine", "falcon", "forest", "garden", "harbor", "island", "jungle",
    "meteor", "planet", "rocket", "shield", "signal", "silver", "sprint", "anchor", "capture",
    "citadel", "crystal", "defense", "fortune", "gallery", "harvest", "journey", "lantern",
    "mission", "outpost", "rampart", "shelter", "station", "thunder", "volcano", "aircraft",
    "asteroid", "backbone", "barricade", "cascade", "commander", "darkness", "endurance",
    "fireworks", "frontier", "guardian", "highland", "keyboard", "landmark", "lighthouse",
    "midnight", "mountain", "overture", "perimeter", "resistance", "satellite", "skyline",
    "starlight", "sentinel", "territory", "velocity", "watchtower", "another", "breath",
    "brother", "earth", "either", "father", "gather", "growth", "health", "method", "north",
    "panther", "rhythm", "smooth", "theory", "thistle", "weather", "within", "quake",
    "quarter", "queen", "quest", "quick", "quiet", "quiver", "quota", "request", "squad",
    "squire", "bright", "daughter", "fight", "flight", "freight", "highway", "knight",
    "laughter", "might", "neighbor", "rough", "slaughter", "thought", "tough", "alphabet",
    "dolphin", "elephant", "graph", "nephew", "orphan", "phantom", "phase", "phoenix",
    "phone", "photon", "sphere", "trophy", "rhino", "rhombus", "rhubarb", "rhyme",
];

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn pool_drops_single_letters_and_malformed_entries() {
        let pool = WordPool::new(
            Level::FIRST,
            vec!["a", "at", "Cat", "", "dog", "x1"],
        );
        let words: Vec<_> = pool.words().iter().map(WordText::as_str).collect();
        assert_eq!(words, vec!["at", "dog"]);
    }

    #[test]
    fn empty_pool_never_chooses() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        assert!(WordPool::empty(Level::FIRST).choose(&mut rng).is_none());
    }

    #[test]
    fn partition_follows_length_and_pattern_rules() {
        let pools = StaticWordPools::partitioned([
            "cat", "Moon", "lemon", "rocket", "aircraft", "thistle", "queen", "cat", " sun ",
        ]);

        let level = |value| pools.words_for_level(Level::new(value)).expect("level");
        assert_eq!(level(1), vec!["cat", "moon", "sun"]);
        assert_eq!(level(2), vec!["lemon", "moon", "queen"]);
        assert_eq!(level(3), vec!["lemon", "queen", "rocket", "thistle"]);
        assert_eq!(level(4), vec!["aircraft"]);
        assert_eq!(level(5), vec!["queen", "thistle"]);
    }

    #[test]
    fn builtin_pools_are_populated_for_every_level() {
        let pools = StaticWordPools::builtin();
        for level in Level::all() {
            let pool = WordPool::new(level, pools.words_for_level(level).expect("level"));
            assert!(pool.len() >= 10, "level {level} has only {} words", pool.len());
        }
    }

    #[test]
    fn missing_level_is_reported() {
        let pools = StaticWordPools::new().with_level(Level::FIRST, ["cat"]);
        assert_eq!(
            pools.words_for_level(Level::new(3)),
            Err(WordPoolError::MissingLevel(Level::new(3)))
        );
    }
}

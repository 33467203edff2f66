#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Word Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems and
//! presentation layers to react to. Systems consume event streams, query
//! immutable snapshots, and respond exclusively with new command batches.

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Word Defence.";

/// Width of the playfield measured in pixels.
pub const PLAYFIELD_WIDTH: f32 = 800.0;

/// Height of the playfield measured in pixels.
pub const PLAYFIELD_HEIGHT: f32 = 600.0;

/// Vertical pixel threshold at which a falling word lands.
pub const STRIKE_LINE: f32 = 580.0;

/// Number of cities defended by the player.
pub const CITY_COUNT: usize = 6;

/// Completed words required to clear a wave.
pub const WORDS_PER_WAVE: u32 = 10;

/// Waves contained in a single level.
pub const WAVES_PER_LEVEL: u32 = 5;

/// Baseline typing rate assumed when no personal best has been stored.
pub const DEFAULT_BASELINE_WPM: f64 = 40.0;

/// Delay between a wave threshold crossing and the transition landing.
pub const TRANSITION_DELAY: Duration = Duration::from_millis(500);

/// Duration a completed word stays in the visual log.
pub const COMPLETED_WORD_DISPLAY: Duration = Duration::from_millis(1_000);

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Appends a freshly generated word to the active set.
    SpawnWord {
        /// Description of the word that should start falling.
        word: WordSpawn,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Resolves a single keystroke against every active word.
    TypeChar {
        /// Letter typed by the player.
        letter: Letter,
        /// Clock reading at the moment the key was pressed.
        at: Timestamp,
    },
    /// Stores the player-controlled challenge multiplier.
    SetChallengeMultiplier {
        /// Requested multiplier, clamped by the world.
        value: f64,
    },
    /// Installs a new baseline typing rate used to normalise scoring.
    SetBaselineWpm {
        /// Personal best expressed in words per minute.
        wpm: f64,
    },
    /// Advances to the next wave within the current level.
    NextWave,
    /// Advances to the next level, restarting the wave count.
    LevelUp,
    /// Restores the initial game state while keeping the baseline.
    ResetGame,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a word entered the playfield.
    WordSpawned {
        /// Identifier assigned to the word by the world.
        word: WordId,
    },
    /// Reports that a word crossed the strike line.
    WordLanded {
        /// Identifier of the word that landed.
        word: WordId,
    },
    /// Reports that a landing destroyed a city.
    CityDestroyed {
        /// Identifier of the city that fell.
        city: CityId,
    },
    /// Announces that every city has fallen.
    GameOver,
    /// Reports how a keystroke was classified.
    KeystrokeResolved {
        /// Whether any active word expected the typed letter.
        correct: bool,
    },
    /// Reports that a keystroke streak adjusted the difficulty multiplier.
    DifficultyChanged {
        /// Multiplier after the adjustment, scaled by 1000 and rounded.
        per_mille: u32,
    },
    /// Confirms that a word was fully typed and scored.
    WordCompleted {
        /// Identifier of the completed word.
        word: WordId,
        /// Points awarded for the completion.
        score: u64,
    },
    /// Requests that a transition be applied after the provided delay.
    AdvanceScheduled {
        /// Transition that should be applied.
        transition: Transition,
        /// Delay before the transition command is submitted.
        delay: Duration,
    },
    /// Announces that a new wave started.
    WaveAdvanced {
        /// Wave that became active.
        wave: u32,
    },
    /// Announces that a new level started.
    LevelAdvanced {
        /// Level that became active.
        level: Level,
    },
    /// Confirms that the challenge multiplier was stored.
    ChallengeChanged {
        /// Stored multiplier scaled by 1000 and rounded.
        per_mille: u32,
    },
    /// Confirms that the game returned to its initial state.
    GameReset,
}

/// Deferred progression step produced when a wave threshold is crossed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Transition {
    /// Advance to the next wave of the current level.
    NextWave,
    /// Advance to the next level.
    LevelUp,
}

impl Transition {
    /// Command that applies the transition to the world.
    #[must_use]
    pub const fn command(self) -> Command {
        match self {
            Self::NextWave => Command::NextWave,
            Self::LevelUp => Command::LevelUp,
        }
    }
}

/// Descriptive label for how the player is coping.
///
/// Carried in the game state for presentation only; no gameplay rule reads it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlowState {
    /// The player is falling behind.
    Struggling,
    /// The player is keeping up.
    #[default]
    Normal,
    /// The player is typing fluently.
    InFlow,
}

/// Parameters describing a word that should enter the playfield.
#[derive(Clone, Debug, PartialEq)]
pub struct WordSpawn {
    /// Letters the player must type.
    pub text: WordText,
    /// Horizontal position of the word's left edge in pixels.
    pub x: f32,
    /// Vertical position of the word in pixels.
    pub y: f32,
    /// Falling speed in pixels per second.
    pub speed: f32,
}

/// Horizontal extent of an active word used when placing new words.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WordFootprint {
    /// Horizontal position of the word's left edge in pixels.
    pub x: f32,
    /// Number of letters in the word.
    pub letters: usize,
}

/// Read-only snapshot of the game state consumed by the spawn scheduler.
#[derive(Clone, Debug, PartialEq)]
pub struct SpawnInputs {
    /// Level currently being played.
    pub level: Level,
    /// Whether every city has fallen.
    pub game_over: bool,
    /// Words per minute over the trailing window.
    pub current_wpm: f64,
    /// Player's stored personal best.
    pub baseline_wpm: f64,
    /// Heat-up/cool-down multiplier.
    pub difficulty_multiplier: f64,
    /// Player-selected challenge multiplier.
    pub challenge_multiplier: f64,
    /// Footprints of the words currently falling, in spawn order.
    pub active_words: Vec<WordFootprint>,
}

/// Unique identifier assigned to a word.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WordId(u32);

impl WordId {
    /// Creates a new word identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a city.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CityId(u32);

impl CityId {
    /// Creates a new city identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Single lowercase ASCII letter accepted by the reducer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Letter(u8);

impl Letter {
    /// Accepts a letter regardless of case, rejecting anything outside `a..=z`.
    #[must_use]
    pub fn from_char(value: char) -> Option<Self> {
        if value.is_ascii_alphabetic() {
            Some(Self(value.to_ascii_lowercase() as u8))
        } else {
            None
        }
    }

    /// Lowercase character represented by the letter.
    #[must_use]
    pub const fn as_char(self) -> char {
        self.0 as char
    }

    /// Raw ASCII byte of the letter.
    #[must_use]
    pub const fn as_byte(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Reasons a candidate string cannot become a falling word.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum WordTextError {
    /// The candidate contained no characters.
    #[error("word text is empty")]
    Empty,
    /// The candidate contained a character outside `a..=z`.
    #[error("word text {text:?} contains {found:?}, expected lowercase letters")]
    InvalidCharacter {
        /// Candidate that was rejected.
        text: String,
        /// First offending character.
        found: char,
    },
}

/// Non-empty sequence of lowercase ASCII letters.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WordText(String);

impl WordText {
    /// Validates the candidate text.
    pub fn new(text: impl Into<String>) -> Result<Self, WordTextError> {
        let text = text.into();
        if text.is_empty() {
            return Err(WordTextError::Empty);
        }
        if let Some(found) = text.chars().find(|c| !c.is_ascii_lowercase()) {
            return Err(WordTextError::InvalidCharacter { text, found });
        }
        Ok(Self(text))
    }

    /// Letters of the word.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of letters in the word.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Letter expected after `typed` letters have been matched.
    #[must_use]
    pub fn letter_at(&self, typed: usize) -> Option<Letter> {
        self.0.as_bytes().get(typed).copied().map(Letter)
    }
}

impl TryFrom<String> for WordText {
    type Error = WordTextError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<WordText> for String {
    fn from(value: WordText) -> Self {
        value.0
    }
}

impl fmt::Display for WordText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Difficulty level in the range `1..=5`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Level(u8);

impl Level {
    /// First level of a fresh game.
    pub const FIRST: Self = Self(1);
    /// Highest reachable level.
    pub const MAX: Self = Self(5);

    /// Creates a level, saturating into the valid range.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        if value < Self::FIRST.0 {
            Self::FIRST
        } else if value > Self::MAX.0 {
            Self::MAX
        } else {
            Self(value)
        }
    }

    /// Retrieves the numeric level.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// Following level, capped at [`Level::MAX`].
    #[must_use]
    pub const fn next(self) -> Self {
        Self::new(self.0.saturating_add(1))
    }

    /// Iterates every level from first to last.
    pub fn all() -> impl Iterator<Item = Level> {
        (Self::FIRST.0..=Self::MAX.0).map(Level)
    }
}

impl Default for Level {
    fn default() -> Self {
        Self::FIRST
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic clock reading measured in milliseconds since the session began.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Start of the session clock.
    pub const ZERO: Self = Self(0);

    /// Creates a timestamp from milliseconds.
    #[must_use]
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// Reading taken after `elapsed` has passed since the session began.
    ///
    /// Sub-millisecond remainders are truncated from the total, so callers
    /// should keep the exact elapsed time and convert it on demand.
    #[must_use]
    pub fn from_elapsed(elapsed: Duration) -> Self {
        Self(u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
    }

    /// Milliseconds since the session began.
    #[must_use]
    pub const fn as_millis(&self) -> u64 {
        self.0
    }

    /// Reading advanced by the provided duration, saturating on overflow.
    #[must_use]
    pub fn saturating_add(self, duration: Duration) -> Self {
        let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        Self(self.0.saturating_add(millis))
    }

    /// Time elapsed since `earlier`, zero when `earlier` lies in the future.
    #[must_use]
    pub fn saturating_since(self, earlier: Timestamp) -> Duration {
        Duration::from_millis(self.0.saturating_sub(earlier.0))
    }
}

/// Scales a multiplier into the per-mille integer carried by events.
#[must_use]
pub fn per_mille(value: f64) -> u32 {
    let scaled = (value * 1_000.0).round();
    if scaled <= 0.0 {
        0
    } else if scaled >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        scaled as u32
    }
}

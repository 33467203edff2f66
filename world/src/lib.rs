#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative game state management for Word Defence.
//!
//! The [`World`] is mutated exclusively through [`apply`], which processes a
//! single [`Command`] atomically and reports what changed as a list of
//! [`Event`] values. Wave and level transitions are never applied inline:
//! the world announces them with [`Event::AdvanceScheduled`] and leaves the
//! timing to the driver.

mod scoring;
mod stats;

use std::time::Duration;

use word_defence_core::{
    per_mille, CityId, Command, Event, FlowState, Level, Letter, Timestamp, Transition, WordId,
    WordSpawn, WordText, CITY_COUNT, COMPLETED_WORD_DISPLAY, DEFAULT_BASELINE_WPM,
    PLAYFIELD_WIDTH, STRIKE_LINE, TRANSITION_DELAY, WAVES_PER_LEVEL, WELCOME_BANNER,
    WORDS_PER_WAVE,
};

pub use scoring::MultiplierBreakdown;

use stats::TypingStats;

const HEAT_UP_STREAK: u32 = 4;
const COOL_DOWN_STREAK: u32 = 4;
const HEAT_UP_FACTOR: f64 = 1.1;
const COOL_DOWN_FACTOR: f64 = 0.85;
const MIN_DIFFICULTY: f64 = 0.7;
const MAX_DIFFICULTY: f64 = 1.5;
const MIN_CHALLENGE: f64 = 0.8;
const MAX_CHALLENGE: f64 = 1.2;
const MIN_BASELINE_WPM: f64 = 1.0;

/// Represents the authoritative Word Defence game state.
#[derive(Clone, Debug)]
pub struct World {
    banner: &'static str,
    words: Vec<Word>,
    cities: Vec<City>,
    next_word_id: u32,
    game_over: bool,
    score: u64,
    stats: TypingStats,
    level: Level,
    wave: u32,
    consecutive_successes: u32,
    consecutive_failures: u32,
    baseline_wpm: f64,
    flow_state: FlowState,
    difficulty_multiplier: f64,
    challenge_multiplier: f64,
    words_completed_in_wave: u32,
    completed_words: Vec<CompletedWord>,
}

impl World {
    /// Creates a new game using the default baseline typing rate.
    #[must_use]
    pub fn new() -> Self {
        Self::with_baseline(DEFAULT_BASELINE_WPM)
    }

    /// Creates a new game normalising scores against the provided baseline.
    #[must_use]
    pub fn with_baseline(baseline_wpm: f64) -> Self {
        Self {
            banner: WELCOME_BANNER,
            words: Vec::new(),
            cities: build_cities(),
            next_word_id: 1,
            game_over: false,
            score: 0,
            stats: TypingStats::default(),
            level: Level::FIRST,
            wave: 1,
            consecutive_successes: 0,
            consecutive_failures: 0,
            baseline_wpm: sanitize_baseline(baseline_wpm).unwrap_or(DEFAULT_BASELINE_WPM),
            flow_state: FlowState::default(),
            difficulty_multiplier: 1.0,
            challenge_multiplier: 1.0,
            words_completed_in_wave: 0,
            completed_words: Vec::new(),
        }
    }

    fn alive_cities(&self) -> usize {
        self.cities.iter().filter(|city| city.alive).count()
    }

    fn land_word(&mut self, word: WordId, out_events: &mut Vec<Event>) {
        out_events.push(Event::WordLanded { word });

        let Some(city) = self.cities.iter_mut().find(|city| city.alive) else {
            return;
        };
        city.alive = false;
        out_events.push(Event::CityDestroyed { city: city.id });

        if !self.game_over && self.cities.iter().all(|city| !city.alive) {
            self.game_over = true;
            out_events.push(Event::GameOver);
        }
    }

    fn advance_words(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let seconds = dt.as_secs_f32();
        let mut landed = Vec::new();
        self.words.retain_mut(|word| {
            word.y += word.speed * seconds;
            if word.y >= STRIKE_LINE {
                landed.push(word.id);
                false
            } else {
                true
            }
        });

        for word in landed {
            self.land_word(word, out_events);
        }
    }

    fn resolve_keystroke(&mut self, letter: Letter, at: Timestamp, out_events: &mut Vec<Event>) {
        let streak_before = self.consecutive_successes;
        let correct = self
            .words
            .iter()
            .any(|word| word.expects() == Some(letter));

        self.stats.record_keystroke(correct);
        out_events.push(Event::KeystrokeResolved { correct });
        self.update_streaks(correct, out_events);

        for word in &mut self.words {
            if word.expects() == Some(letter) {
                word.typed += 1;
            } else {
                word.typed = 0;
            }
        }

        let (finished, falling): (Vec<Word>, Vec<Word>) = std::mem::take(&mut self.words)
            .into_iter()
            .partition(Word::is_complete);
        self.words = falling;

        for word in finished {
            self.complete_word(word, streak_before, at, out_events);
        }

        self.completed_words
            .retain(|record| at.saturating_since(record.timestamp) <= COMPLETED_WORD_DISPLAY);

        // Completions past the threshold on the same keystroke do not carry
        // into the next wave; NEXT_WAVE zeroes the counter again on arrival.
        if self.words_completed_in_wave >= WORDS_PER_WAVE {
            self.words_completed_in_wave = 0;
            let transition = if self.wave >= WAVES_PER_LEVEL {
                Transition::LevelUp
            } else {
                Transition::NextWave
            };
            out_events.push(Event::AdvanceScheduled {
                transition,
                delay: TRANSITION_DELAY,
            });
        }
    }

    fn update_streaks(&mut self, correct: bool, out_events: &mut Vec<Event>) {
        if correct {
            self.consecutive_successes += 1;
            self.consecutive_failures = 0;
        } else {
            self.consecutive_failures += 1;
            self.consecutive_successes = 0;
        }

        if self.consecutive_successes >= HEAT_UP_STREAK {
            self.consecutive_successes = 0;
            self.difficulty_multiplier =
                (self.difficulty_multiplier * HEAT_UP_FACTOR).min(MAX_DIFFICULTY);
            out_events.push(Event::DifficultyChanged {
                per_mille: per_mille(self.difficulty_multiplier),
            });
        } else if self.consecutive_failures >= COOL_DOWN_STREAK {
            self.consecutive_failures = 0;
            self.difficulty_multiplier =
                (self.difficulty_multiplier * COOL_DOWN_FACTOR).max(MIN_DIFFICULTY);
            out_events.push(Event::DifficultyChanged {
                per_mille: per_mille(self.difficulty_multiplier),
            });
        }
    }

    fn complete_word(
        &mut self,
        word: Word,
        streak: u32,
        at: Timestamp,
        out_events: &mut Vec<Event>,
    ) {
        let breakdown = MultiplierBreakdown::new(
            self.stats.wpm_at(at),
            self.baseline_wpm,
            streak,
            self.alive_cities(),
            self.difficulty_multiplier,
        );
        let score = breakdown.score_for(word.text.len());
        self.score = self.score.saturating_add(score);
        self.completed_words.push(CompletedWord {
            id: word.id,
            text: word.text,
            x: word.x,
            y: word.y,
            timestamp: at,
            score,
        });
        self.stats.record_completion(at);
        self.words_completed_in_wave += 1;
        out_events.push(Event::WordCompleted {
            word: word.id,
            score,
        });
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::SpawnWord { word } => {
            let WordSpawn { text, x, y, speed } = word;
            let id = WordId::new(world.next_word_id);
            world.next_word_id = world.next_word_id.saturating_add(1);
            world.words.push(Word {
                id,
                text,
                x,
                y,
                speed,
                typed: 0,
            });
            out_events.push(Event::WordSpawned { word: id });
        }
        Command::Tick { dt } => {
            out_events.push(Event::TimeAdvanced { dt });
            world.advance_words(dt, out_events);
        }
        Command::TypeChar { letter, at } => {
            world.resolve_keystroke(letter, at, out_events);
        }
        Command::SetChallengeMultiplier { value } => {
            if value.is_finite() {
                world.challenge_multiplier = value.clamp(MIN_CHALLENGE, MAX_CHALLENGE);
            }
            out_events.push(Event::ChallengeChanged {
                per_mille: per_mille(world.challenge_multiplier),
            });
        }
        Command::SetBaselineWpm { wpm } => {
            if let Some(baseline) = sanitize_baseline(wpm) {
                world.baseline_wpm = baseline;
            }
        }
        Command::NextWave => {
            world.wave = world.wave.saturating_add(1);
            world.words_completed_in_wave = 0;
            out_events.push(Event::WaveAdvanced { wave: world.wave });
        }
        Command::LevelUp => {
            world.level = world.level.next();
            world.wave = 1;
            world.words_completed_in_wave = 0;
            world.difficulty_multiplier = 1.0;
            out_events.push(Event::LevelAdvanced { level: world.level });
        }
        Command::ResetGame => {
            *world = World::with_baseline(world.baseline_wpm);
            out_events.push(Event::GameReset);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use word_defence_core::{
        CityId, FlowState, Level, SpawnInputs, Timestamp, WordFootprint, WordId, WordText,
        WORDS_PER_WAVE,
    };

    use super::{CompletedWord, MultiplierBreakdown, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Captures a read-only view of the words currently falling.
    #[must_use]
    pub fn word_view(world: &World) -> WordView {
        let snapshots = world
            .words
            .iter()
            .map(|word| WordSnapshot {
                id: word.id,
                text: word.text.clone(),
                x: word.x,
                y: word.y,
                speed: word.speed,
                typed: word.typed,
            })
            .collect();
        WordView { snapshots }
    }

    /// Captures the cities in their fixed order.
    #[must_use]
    pub fn city_view(world: &World) -> Vec<CitySnapshot> {
        world
            .cities
            .iter()
            .map(|city| CitySnapshot {
                id: city.id,
                x: city.x,
                alive: city.alive,
            })
            .collect()
    }

    /// Number of cities still standing.
    #[must_use]
    pub fn alive_cities(world: &World) -> usize {
        world.alive_cities()
    }

    /// Reports whether every city has fallen.
    #[must_use]
    pub fn is_game_over(world: &World) -> bool {
        world.game_over
    }

    /// Accumulated score.
    #[must_use]
    pub fn score(world: &World) -> u64 {
        world.score
    }

    /// Identifier the next spawned word will receive.
    #[must_use]
    pub fn next_word_id(world: &World) -> WordId {
        WordId::new(world.next_word_id)
    }

    /// Level, wave and progress toward the next wave.
    #[must_use]
    pub fn wave_progress(world: &World) -> WaveProgress {
        WaveProgress {
            level: world.level,
            wave: world.wave,
            completed: world.words_completed_in_wave,
            required: WORDS_PER_WAVE,
        }
    }

    /// Keystroke counters and streaks.
    #[must_use]
    pub fn keystrokes(world: &World) -> KeystrokeStats {
        KeystrokeStats {
            total: world.stats.total_keystrokes,
            correct: world.stats.correct_keystrokes,
            consecutive_successes: world.consecutive_successes,
            consecutive_failures: world.consecutive_failures,
            accuracy_percent: world.stats.accuracy_percent(),
        }
    }

    /// Completion timestamps retained for typing-rate measurement.
    #[must_use]
    pub fn completion_log(world: &World) -> &[Timestamp] {
        world.stats.completions()
    }

    /// Words per minute measured over the trailing ten seconds.
    #[must_use]
    pub fn current_wpm(world: &World, now: Timestamp) -> f64 {
        world.stats.wpm_at(now)
    }

    /// Stored personal best used to normalise scoring.
    #[must_use]
    pub fn baseline_wpm(world: &World) -> f64 {
        world.baseline_wpm
    }

    /// Heat-up/cool-down multiplier in `[0.7, 1.5]`.
    #[must_use]
    pub fn difficulty_multiplier(world: &World) -> f64 {
        world.difficulty_multiplier
    }

    /// Player-selected multiplier in `[0.8, 1.2]`.
    #[must_use]
    pub fn challenge_multiplier(world: &World) -> f64 {
        world.challenge_multiplier
    }

    /// Descriptive flow label.
    #[must_use]
    pub fn flow_state(world: &World) -> FlowState {
        world.flow_state
    }

    /// Multipliers that would apply to a word completed at `now`.
    #[must_use]
    pub fn multipliers(world: &World, now: Timestamp) -> MultiplierBreakdown {
        MultiplierBreakdown::new(
            world.stats.wpm_at(now),
            world.baseline_wpm,
            world.consecutive_successes,
            world.alive_cities(),
            world.difficulty_multiplier,
        )
    }

    /// Recently completed words retained for visual feedback.
    #[must_use]
    pub fn completed_words(world: &World) -> &[CompletedWord] {
        &world.completed_words
    }

    /// Snapshot consumed by the spawn scheduler.
    #[must_use]
    pub fn spawn_inputs(world: &World, now: Timestamp) -> SpawnInputs {
        SpawnInputs {
            level: world.level,
            game_over: world.game_over,
            current_wpm: world.stats.wpm_at(now),
            baseline_wpm: world.baseline_wpm,
            difficulty_multiplier: world.difficulty_multiplier,
            challenge_multiplier: world.challenge_multiplier,
            active_words: world
                .words
                .iter()
                .map(|word| WordFootprint {
                    x: word.x,
                    letters: word.text.len(),
                })
                .collect(),
        }
    }

    /// Read-only snapshot describing all falling words in spawn order.
    #[derive(Clone, Debug, Default)]
    pub struct WordView {
        snapshots: Vec<WordSnapshot>,
    }

    impl WordView {
        /// Iterator over the captured word snapshots in spawn order.
        pub fn iter(&self) -> impl Iterator<Item = &WordSnapshot> {
            self.snapshots.iter()
        }

        /// Number of falling words.
        #[must_use]
        pub fn len(&self) -> usize {
            self.snapshots.len()
        }

        /// Reports whether no words are falling.
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.snapshots.is_empty()
        }

        /// Consumes the view, yielding the underlying snapshots.
        pub fn into_vec(self) -> Vec<WordSnapshot> {
            self.snapshots
        }
    }

    /// Immutable representation of a single falling word.
    #[derive(Clone, Debug, PartialEq)]
    pub struct WordSnapshot {
        /// Identifier assigned to the word.
        pub id: WordId,
        /// Letters the player must type.
        pub text: WordText,
        /// Horizontal position of the left edge in pixels.
        pub x: f32,
        /// Vertical position in pixels.
        pub y: f32,
        /// Falling speed in pixels per second.
        pub speed: f32,
        /// Number of leading letters already matched.
        pub typed: usize,
    }

    /// Immutable representation of a single city.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct CitySnapshot {
        /// Identifier assigned to the city.
        pub id: CityId,
        /// Horizontal centre of the city in pixels.
        pub x: f32,
        /// Whether the city is still standing.
        pub alive: bool,
    }

    /// Progress through the current level.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct WaveProgress {
        /// Level currently being played.
        pub level: Level,
        /// Wave within the level.
        pub wave: u32,
        /// Words completed in the current wave.
        pub completed: u32,
        /// Words required to clear a wave.
        pub required: u32,
    }

    /// Keystroke counters used by the heads-up display.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct KeystrokeStats {
        /// Every keystroke processed.
        pub total: u64,
        /// Keystrokes that matched at least one word.
        pub correct: u64,
        /// Current run of correct keystrokes.
        pub consecutive_successes: u32,
        /// Current run of incorrect keystrokes.
        pub consecutive_failures: u32,
        /// Rounded share of correct keystrokes.
        pub accuracy_percent: u32,
    }
}

/// Transient record of a completed word kept for visual feedback.
#[derive(Clone, Debug, PartialEq)]
pub struct CompletedWord {
    /// Identifier the word carried while falling.
    pub id: WordId,
    /// Letters of the completed word.
    pub text: WordText,
    /// Horizontal position at completion.
    pub x: f32,
    /// Vertical position at completion.
    pub y: f32,
    /// Clock reading when the final letter was typed.
    pub timestamp: Timestamp,
    /// Points awarded for the word.
    pub score: u64,
}

#[derive(Clone, Debug)]
struct Word {
    id: WordId,
    text: WordText,
    x: f32,
    y: f32,
    speed: f32,
    typed: usize,
}

impl Word {
    fn expects(&self) -> Option<Letter> {
        self.text.letter_at(self.typed)
    }

    fn is_complete(&self) -> bool {
        self.typed >= self.text.len()
    }
}

#[derive(Clone, Copy, Debug)]
struct City {
    id: CityId,
    x: f32,
    alive: bool,
}

fn build_cities() -> Vec<City> {
    let spacing = PLAYFIELD_WIDTH / (CITY_COUNT as f32 + 1.0);
    (0..CITY_COUNT)
        .map(|index| City {
            id: CityId::new(index as u32),
            x: (index as f32 + 1.0) * spacing,
            alive: true,
        })
        .collect()
}

fn sanitize_baseline(wpm: f64) -> Option<f64> {
    if wpm.is_finite() {
        Some(wpm.max(MIN_BASELINE_WPM))
    } else {
        None
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Adaptive spawning system responsible for emitting word spawn commands.
//!
//! The scheduler measures cadence on the simulated clock carried by
//! [`Event::TimeAdvanced`], recomputes the spawn rate from a fresh
//! [`SpawnInputs`] snapshot every cycle, and never mutates game state
//! directly: it only appends [`Command::SpawnWord`] values to its output.

mod vocabulary;

use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;
use word_defence_core::{
    Command, Event, Level, SpawnInputs, WordFootprint, WordSpawn, WordText, PLAYFIELD_WIDTH,
};

pub use vocabulary::{StaticWordPools, WordPool, WordPoolError, WordPoolProvider};

/// Tuning knobs controlling spawn cadence, population and word placement.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    /// Words per second before any scaling is applied.
    pub base_rate: f64,
    /// Hard ceiling on the scaled spawn rate.
    pub max_rate: f64,
    /// Lower clamp applied to the current/baseline typing-rate ratio.
    pub wpm_factor_floor: f64,
    /// Upper clamp applied to the current/baseline typing-rate ratio.
    pub wpm_factor_ceiling: f64,
    /// Rate growth per level; the level factor is `1 + level * coefficient`.
    pub level_rate_coefficient: f64,
    /// Active words tolerated regardless of level.
    pub min_active_words: usize,
    /// Additional active words tolerated per level.
    pub active_words_per_level: usize,
    /// Falling speed of every word in pixels per second.
    pub base_speed: f32,
    /// Falling speed added per level.
    pub speed_per_level: f32,
    /// Upper bound of the random speed component.
    pub speed_variation: f32,
    /// Horizontal space a single letter occupies in pixels.
    pub glyph_width: f32,
    /// Minimum horizontal gap kept between neighbouring words.
    pub safety_margin: f32,
    /// Placement samples drawn before overlap is tolerated.
    pub placement_attempts: u32,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            base_rate: 0.5,
            max_rate: 3.0,
            wpm_factor_floor: 0.8,
            wpm_factor_ceiling: 2.0,
            level_rate_coefficient: 0.2,
            min_active_words: 3,
            active_words_per_level: 2,
            base_speed: 40.0,
            speed_per_level: 10.0,
            speed_variation: 40.0,
            glyph_width: 12.0,
            safety_margin: 20.0,
            placement_attempts: 10,
        }
    }
}

impl SpawnTuning {
    /// Words per second for the provided snapshot.
    #[must_use]
    pub fn spawn_rate(&self, inputs: &SpawnInputs) -> f64 {
        let wpm_factor = if inputs.baseline_wpm > 0.0 {
            (inputs.current_wpm / inputs.baseline_wpm)
                .clamp(self.wpm_factor_floor, self.wpm_factor_ceiling)
        } else {
            self.wpm_factor_floor
        };
        let level_factor = 1.0 + f64::from(inputs.level.get()) * self.level_rate_coefficient;
        let rate = self.base_rate
            * wpm_factor
            * level_factor
            * inputs.difficulty_multiplier
            * inputs.challenge_multiplier;
        rate.min(self.max_rate)
    }

    /// Delay between spawn cycles, `None` when the rate is not positive.
    #[must_use]
    pub fn spawn_interval(&self, inputs: &SpawnInputs) -> Option<Duration> {
        let rate = self.spawn_rate(inputs);
        if rate.is_finite() && rate > 0.0 {
            Some(Duration::from_secs_f64(1.0 / rate))
        } else {
            None
        }
    }

    /// Largest number of simultaneously falling words for a level.
    #[must_use]
    pub fn active_word_cap(&self, level: Level) -> usize {
        self.min_active_words + usize::from(level.get()) * self.active_words_per_level
    }

    fn word_width(&self, letters: usize) -> f32 {
        letters as f32 * self.glyph_width
    }
}

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Debug)]
pub struct Config {
    tuning: SpawnTuning,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided tuning and seed.
    #[must_use]
    pub const fn new(tuning: SpawnTuning, rng_seed: u64) -> Self {
        Self { tuning, rng_seed }
    }
}

/// Pure system that emits spawn commands at an adaptive cadence.
#[derive(Debug)]
pub struct Spawning {
    tuning: SpawnTuning,
    rng: ChaCha8Rng,
    pool: Option<WordPool>,
    schedule: Option<Schedule>,
    generation: u64,
}

#[derive(Clone, Copy, Debug)]
struct Schedule {
    generation: u64,
    level: Level,
    until_next: Duration,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            tuning: config.tuning,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            pool: None,
            schedule: None,
            generation: 0,
        }
    }

    /// Tuning currently applied.
    #[must_use]
    pub fn tuning(&self) -> &SpawnTuning {
        &self.tuning
    }

    /// Number of schedules started so far.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Reports whether a spawn schedule is currently running.
    #[must_use]
    pub fn is_scheduled(&self) -> bool {
        self.schedule.is_some()
    }

    /// Pool the scheduler is drawing from, if one has been fetched.
    #[must_use]
    pub fn pool(&self) -> Option<&WordPool> {
        self.pool.as_ref()
    }

    /// Stops the running schedule, if any.
    pub fn cancel(&mut self) {
        if let Some(schedule) = self.schedule.take() {
            log::debug!(
                "spawn schedule {} for level {} cancelled",
                schedule.generation,
                schedule.level
            );
        }
    }

    /// Consumes world events and the latest snapshot to emit spawn commands.
    pub fn handle<P>(
        &mut self,
        events: &[Event],
        inputs: &SpawnInputs,
        provider: &P,
        out: &mut Vec<Command>,
    ) where
        P: WordPoolProvider + ?Sized,
    {
        let mut elapsed = Duration::ZERO;
        for event in events {
            match event {
                Event::TimeAdvanced { dt } => elapsed = elapsed.saturating_add(*dt),
                Event::GameOver | Event::GameReset | Event::LevelAdvanced { .. } => {
                    self.cancel();
                }
                _ => {}
            }
        }

        if inputs.game_over {
            self.cancel();
            return;
        }

        if self.pool.as_ref().map(WordPool::level) != Some(inputs.level) {
            self.cancel();
            self.pool = Some(fetch_pool(provider, inputs.level));
        }

        if self.schedule.is_none() && !self.start(inputs) {
            return;
        }

        if elapsed.is_zero() {
            return;
        }

        let mut active = inputs.active_words.clone();
        while let Some(schedule) = self.schedule.as_mut() {
            if elapsed < schedule.until_next {
                schedule.until_next -= elapsed;
                break;
            }
            elapsed -= schedule.until_next;

            self.run_cycle(inputs, &mut active, out);

            let Some(interval) = self.tuning.spawn_interval(inputs) else {
                self.cancel();
                break;
            };
            if let Some(schedule) = self.schedule.as_mut() {
                schedule.until_next = interval;
            }
        }
    }

    fn start(&mut self, inputs: &SpawnInputs) -> bool {
        let Some(interval) = self.tuning.spawn_interval(inputs) else {
            return false;
        };
        self.generation += 1;
        self.schedule = Some(Schedule {
            generation: self.generation,
            level: inputs.level,
            until_next: interval,
        });
        log::debug!(
            "spawn schedule {} started for level {} every {:?}",
            self.generation,
            inputs.level,
            interval
        );
        true
    }

    fn run_cycle(
        &mut self,
        inputs: &SpawnInputs,
        active: &mut Vec<WordFootprint>,
        out: &mut Vec<Command>,
    ) {
        if active.len() >= self.tuning.active_word_cap(inputs.level) {
            return;
        }

        let rng = &mut self.rng;
        let Some(text) = self
            .pool
            .as_ref()
            .and_then(|pool| pool.choose(rng))
            .cloned()
        else {
            return;
        };

        let x = self.place(&text, active);
        let speed = self.sample_speed(inputs);
        active.push(WordFootprint {
            x,
            letters: text.len(),
        });
        out.push(Command::SpawnWord {
            word: WordSpawn {
                text,
                x,
                y: 0.0,
                speed,
            },
        });
    }

    fn place(&mut self, text: &WordText, active: &[WordFootprint]) -> f32 {
        let width = self.tuning.word_width(text.len());
        let max_x = (PLAYFIELD_WIDTH - width).max(0.0);
        let mut x = 0.0;

        for _ in 0..self.tuning.placement_attempts.max(1) {
            x = self.rng.gen::<f32>() * max_x;
            if active.iter().all(|other| self.clear_of(x, width, other)) {
                break;
            }
        }
        x
    }

    fn clear_of(&self, x: f32, width: f32, other: &WordFootprint) -> bool {
        let margin = self.tuning.safety_margin;
        let other_width = self.tuning.word_width(other.letters);
        x + width + margin <= other.x || other.x + other_width + margin <= x
    }

    fn sample_speed(&mut self, inputs: &SpawnInputs) -> f32 {
        let level = f32::from(inputs.level.get());
        let variation = self.rng.gen::<f32>() * self.tuning.speed_variation;
        let scaling = (inputs.difficulty_multiplier * inputs.challenge_multiplier) as f32;
        self.tuning.base_speed + level * self.tuning.speed_per_level + variation * scaling
    }
}

fn fetch_pool<P>(provider: &P, level: Level) -> WordPool
where
    P: WordPoolProvider + ?Sized,
{
    match provider.words_for_level(level) {
        Ok(words) => {
            let pool = WordPool::new(level, words);
            if pool.is_empty() {
                log::warn!("word pool for level {level} is empty; spawning paused");
            }
            pool
        }
        Err(error) => {
            log::warn!("{error}; spawning paused");
            WordPool::empty(level)
        }
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Single-consumer driver that wires the world to its systems.
//!
//! Every producer (the frame clock, the keyboard, the spawn scheduler and
//! the transition timer) feeds one FIFO command queue. Commands are
//! applied to the [`World`] strictly in order; the resulting events are
//! handed to the systems, whose follow-up commands join the back of the
//! same queue. Nothing is applied out of band, so a deferred transition
//! can never overtake a tick that was enqueued before it fell due.

mod baseline;
mod config;
mod cues;

use std::{collections::VecDeque, time::Duration};

use anyhow::{Context, Result};
use word_defence_core::{Command, Event, Letter, Level, Timestamp};
use word_defence_system_spawning::{Config, Spawning, WordPoolProvider};
use word_defence_system_transitions::Transitions;
use word_defence_world::{self as world, query, World};

pub use baseline::{BaselineStore, MemoryBaseline};
pub use config::SessionConfig;
pub use cues::{Cue, Tone, Waveform};

/// Undrained events kept before the oldest ones are discarded.
pub const EVENT_BACKLOG: usize = 4_096;

/// A running game together with its scheduling systems.
#[derive(Debug)]
pub struct Session<P, B> {
    world: World,
    spawning: Spawning,
    transitions: Transitions,
    pools: P,
    store: B,
    elapsed: Duration,
    queue: VecDeque<Command>,
    events: Vec<Event>,
    dropped_events: usize,
    best_wpm: f64,
}

impl<P, B> Session<P, B>
where
    P: WordPoolProvider,
    B: BaselineStore,
{
    /// Starts a session, loading the baseline typing rate from `store`.
    pub fn new(config: SessionConfig, pools: P, mut store: B) -> Result<Self> {
        let stored = store
            .load()
            .context("failed to load the baseline typing rate")?;
        let world = match stored {
            Some(wpm) => World::with_baseline(wpm),
            None => World::new(),
        };
        let best_wpm = query::baseline_wpm(&world);
        log::info!("session starting with a baseline of {best_wpm:.0} wpm");

        let transitions = match config.transition_delay() {
            Some(delay) => Transitions::with_delay(delay),
            None => Transitions::new(),
        };

        let mut session = Self {
            world,
            spawning: Spawning::new(Config::new(config.spawn, config.seed)),
            transitions,
            pools,
            store,
            elapsed: Duration::ZERO,
            queue: VecDeque::new(),
            events: Vec::new(),
            dropped_events: 0,
            best_wpm,
        };
        session.dispatch(&[]);
        session.pump();
        Ok(session)
    }

    /// Advances the simulated clock by `dt` and runs everything that fell due.
    pub fn advance(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
        self.submit(Command::Tick { dt });
    }

    /// Feeds a raw key press; anything other than an ASCII letter is ignored.
    pub fn key(&mut self, value: char) {
        if query::is_game_over(&self.world) {
            return;
        }
        let Some(letter) = Letter::from_char(value) else {
            log::trace!("ignoring non-letter key {value:?}");
            return;
        };
        self.submit(Command::TypeChar {
            letter,
            at: self.now(),
        });
    }

    /// Types every character of `text` at the current instant.
    pub fn type_text(&mut self, text: &str) {
        for value in text.chars() {
            self.key(value);
        }
    }

    /// Sets the player-selected challenge multiplier.
    pub fn set_challenge(&mut self, value: f64) {
        self.submit(Command::SetChallengeMultiplier { value });
    }

    /// Restarts the game while keeping the baseline typing rate.
    pub fn reset(&mut self) {
        self.submit(Command::ResetGame);
    }

    /// Returns the events produced since the previous drain, in order.
    ///
    /// Callers are expected to drain once per frame. At most
    /// [`EVENT_BACKLOG`] events are retained; older ones are discarded.
    pub fn drain_events(&mut self) -> Vec<Event> {
        self.dropped_events = 0;
        std::mem::take(&mut self.events)
    }

    /// Read-only access to the game state.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Current reading of the simulated clock.
    #[must_use]
    pub fn now(&self) -> Timestamp {
        Timestamp::from_elapsed(self.elapsed)
    }

    /// Best typing rate known to the session, as last loaded or stored.
    #[must_use]
    pub fn best_wpm(&self) -> f64 {
        self.best_wpm
    }

    /// Reports whether every city has fallen.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        query::is_game_over(&self.world)
    }

    /// Spawn scheduler driving the session.
    #[must_use]
    pub fn spawning(&self) -> &Spawning {
        &self.spawning
    }

    /// Baseline store backing the session.
    #[must_use]
    pub fn store(&self) -> &B {
        &self.store
    }

    /// Heads-up display figures at the current instant.
    #[must_use]
    pub fn hud(&self) -> Hud {
        let progress = query::wave_progress(&self.world);
        let multipliers = query::multipliers(&self.world, self.now());
        Hud {
            score: query::score(&self.world),
            level: progress.level,
            wave: progress.wave,
            wave_completed: progress.completed,
            wpm: query::current_wpm(&self.world, self.now()),
            accuracy_percent: query::keystrokes(&self.world).accuracy_percent,
            cities_remaining: query::alive_cities(&self.world),
            multiplier: multipliers.speed * multipliers.streak * multipliers.survival,
            game_over: query::is_game_over(&self.world),
        }
    }

    fn submit(&mut self, command: Command) {
        self.queue.push_back(command);
        self.pump();
    }

    fn pump(&mut self) {
        while let Some(command) = self.queue.pop_front() {
            let mut events = Vec::new();
            world::apply(&mut self.world, command, &mut events);
            if events.contains(&Event::GameOver) {
                self.record_final_wpm();
            }
            self.dispatch(&events);
            self.retain_events(events);
        }
    }

    fn retain_events(&mut self, mut events: Vec<Event>) {
        self.events.append(&mut events);
        let excess = self.events.len().saturating_sub(EVENT_BACKLOG);
        if excess == 0 {
            return;
        }
        if self.dropped_events == 0 {
            log::warn!("event backlog full; discarding the oldest undrained events");
        }
        self.dropped_events += excess;
        let _ = self.events.drain(..excess);
    }

    fn dispatch(&mut self, events: &[Event]) {
        let inputs = query::spawn_inputs(&self.world, self.now());
        let mut follow_ups = Vec::new();
        self.transitions.handle(events, &mut follow_ups);
        self.spawning
            .handle(events, &inputs, &self.pools, &mut follow_ups);
        self.queue.extend(follow_ups);
    }

    fn record_final_wpm(&mut self) {
        let final_wpm = query::current_wpm(&self.world, self.now());
        log::info!(
            "game over with {} points at {final_wpm:.0} wpm",
            query::score(&self.world)
        );
        if final_wpm <= self.best_wpm {
            return;
        }

        match self.store.save(final_wpm) {
            Ok(()) => log::info!("new baseline of {final_wpm:.0} wpm stored"),
            Err(error) => log::warn!("failed to store the new baseline: {error:#}"),
        }
        self.best_wpm = final_wpm;
        self.queue.push_back(Command::SetBaselineWpm { wpm: final_wpm });
    }
}

/// Figures shown on the heads-up display.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hud {
    /// Accumulated score.
    pub score: u64,
    /// Level being played.
    pub level: Level,
    /// Wave within the level.
    pub wave: u32,
    /// Words completed in the current wave.
    pub wave_completed: u32,
    /// Typing rate over the trailing ten seconds.
    pub wpm: f64,
    /// Rounded share of correct keystrokes.
    pub accuracy_percent: u32,
    /// Cities still standing.
    pub cities_remaining: usize,
    /// Product of the speed, streak and survival multipliers.
    pub multiplier: f64,
    /// Whether the game has ended.
    pub game_over: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use word_defence_system_spawning::StaticWordPools;

    #[test]
    fn config_parses_from_toml() {
        let config: SessionConfig = toml::from_str(
            r#"
            seed = 42
            transition_delay_ms = 250

            [spawn]
            base_rate = 1.0
            safety_margin = 30.0
            "#,
        )
        .expect("valid config");

        assert_eq!(config.seed, 42);
        assert_eq!(config.transition_delay(), Some(Duration::from_millis(250)));
        assert_eq!(config.spawn.base_rate, 1.0);
        assert_eq!(config.spawn.safety_margin, 30.0);
        assert_eq!(config.spawn.max_rate, 3.0);
    }

    #[test]
    fn unknown_config_keys_are_rejected() {
        let parsed: Result<SessionConfig, _> = toml::from_str("sed = 1");
        assert!(parsed.is_err());
    }

    #[test]
    fn missing_baseline_defaults_to_forty() {
        let session = Session::new(
            SessionConfig::default(),
            StaticWordPools::builtin(),
            MemoryBaseline::default(),
        )
        .expect("session");
        assert_eq!(session.best_wpm(), 40.0);
        assert!(session.spawning().is_scheduled());
    }

    #[test]
    fn hud_starts_clean() {
        let session = Session::new(
            SessionConfig::default(),
            StaticWordPools::builtin(),
            MemoryBaseline::with_value(55.0),
        )
        .expect("session");
        let hud = session.hud();
        assert_eq!(hud.score, 0);
        assert_eq!(hud.level, Level::FIRST);
        assert_eq!(hud.wave, 1);
        assert_eq!(hud.accuracy_percent, 100);
        assert_eq!(hud.cities_remaining, 6);
        assert!(!hud.game_over);
    }
}

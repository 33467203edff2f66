#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Delays wave and level transitions announced by the world.
//!
//! The world never advances itself when a wave threshold is crossed. It
//! emits [`Event::AdvanceScheduled`] instead, and this system turns each
//! announcement into the matching command once the simulated clock has
//! covered the requested delay.

use std::{collections::VecDeque, time::Duration};

use word_defence_core::{Command, Event, Transition};

/// Pure system that releases scheduled transitions on time.
#[derive(Debug, Default)]
pub struct Transitions {
    pending: VecDeque<Pending>,
    fixed_delay: Option<Duration>,
}

#[derive(Clone, Copy, Debug)]
struct Pending {
    transition: Transition,
    remaining: Duration,
}

impl Transitions {
    /// Creates a system with nothing scheduled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a system that ignores announced delays and waits `delay` instead.
    #[must_use]
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            pending: VecDeque::new(),
            fixed_delay: Some(delay),
        }
    }

    /// Number of transitions waiting for their delay to elapse.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Consumes world events and emits transition commands that fell due.
    ///
    /// Events are processed in order, so time that advanced before an
    /// announcement in the same batch does not count towards its delay.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::AdvanceScheduled { transition, delay } => {
                    let delay = self.fixed_delay.unwrap_or(*delay);
                    log::debug!("{transition:?} scheduled in {delay:?}");
                    self.pending.push_back(Pending {
                        transition: *transition,
                        remaining: delay,
                    });
                }
                Event::TimeAdvanced { dt } => self.elapse(*dt),
                Event::GameReset => self.pending.clear(),
                _ => {}
            }
        }

        while let Some(due) = self.pending.front() {
            if !due.remaining.is_zero() {
                break;
            }
            if let Some(due) = self.pending.pop_front() {
                out.push(due.transition.command());
            }
        }
    }

    fn elapse(&mut self, dt: Duration) {
        for pending in &mut self.pending {
            pending.remaining = pending.remaining.saturating_sub(dt);
        }
    }
}

//! Simulated player that types falling words at a fixed pace.

use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use word_defence_core::WordId;
use word_defence_world::{query, World};

const LETTERS_PER_WORD: f64 = 5.0;

/// Types the word closest to the strike line, occasionally fumbling a key.
#[derive(Debug)]
pub(crate) struct Typist {
    keys_per_second: f64,
    accuracy: f64,
    budget: f64,
    target: Option<WordId>,
    rng: ChaCha8Rng,
}

impl Typist {
    pub(crate) fn new(wpm: f64, accuracy: f64, seed: u64) -> Self {
        Self {
            keys_per_second: (wpm.max(0.0) * LETTERS_PER_WORD) / 60.0,
            accuracy: if accuracy.is_nan() {
                1.0
            } else {
                accuracy.clamp(0.0, 1.0)
            },
            budget: 0.0,
            target: None,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Keys the typist presses during the next `dt` of play.
    ///
    /// The world only sees the keys once the caller feeds them, so the
    /// typist stops for the frame after finishing a word and resumes from
    /// the refreshed state next time.
    pub(crate) fn keys(&mut self, world: &World, dt: Duration) -> Vec<char> {
        self.budget += self.keys_per_second * dt.as_secs_f64();
        let mut keys = Vec::new();
        let mut typed_ahead = None;
        while self.budget >= 1.0 {
            let Some(stroke) = self.next_stroke(world, &mut typed_ahead) else {
                self.budget = 0.0;
                break;
            };
            self.budget -= 1.0;
            keys.push(stroke.key);
            if stroke.finishes_word {
                break;
            }
        }
        keys
    }

    fn next_stroke(&mut self, world: &World, typed_ahead: &mut Option<usize>) -> Option<Stroke> {
        let words = query::word_view(world);
        let target = self
            .target
            .and_then(|id| words.iter().find(|word| word.id == id))
            .or_else(|| {
                words
                    .iter()
                    .max_by(|left, right| left.y.total_cmp(&right.y))
            })?;
        self.target = Some(target.id);

        if !self.rng.gen_bool(self.accuracy) {
            // A stray key resets every partially typed word.
            *typed_ahead = Some(0);
            return Some(Stroke {
                key: char::from(self.rng.gen_range(b'a'..=b'z')),
                finishes_word: false,
            });
        }

        let typed = typed_ahead.unwrap_or(target.typed);
        let letter = target.text.letter_at(typed)?;
        *typed_ahead = Some(typed + 1);
        let finishes_word = typed + 1 == target.text.len();
        if finishes_word {
            self.target = None;
        }
        Some(Stroke {
            key: letter.as_char(),
            finishes_word,
        })
    }
}

struct Stroke {
    key: char,
    finishes_word: bool,
}

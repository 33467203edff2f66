//! Score formula applied to each completed word.

use word_defence_core::CITY_COUNT;

const POINTS_PER_LETTER: f64 = 10.0;
const MAX_SPEED_MULTIPLIER: f64 = 3.0;
const STREAK_BASE: f64 = 1.1;
const SURVIVAL_SCALE: f64 = 1.5;

/// Multipliers feeding the score of the next completed word.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MultiplierBreakdown {
    /// Current typing rate relative to the baseline, capped at 3.
    pub speed: f64,
    /// Compounding bonus for the running keystroke streak.
    pub streak: f64,
    /// Bonus proportional to the share of cities still standing.
    pub survival: f64,
    /// Heat-up/cool-down multiplier applied to spawning.
    pub difficulty: f64,
}

impl MultiplierBreakdown {
    pub(crate) fn new(
        current_wpm: f64,
        baseline_wpm: f64,
        streak: u32,
        alive_cities: usize,
        difficulty: f64,
    ) -> Self {
        Self {
            speed: speed_multiplier(current_wpm, baseline_wpm),
            streak: STREAK_BASE.powi(i32::try_from(streak).unwrap_or(i32::MAX)),
            survival: SURVIVAL_SCALE * (alive_cities as f64 / CITY_COUNT as f64),
            difficulty,
        }
    }

    /// Points awarded for a word with the provided number of letters.
    #[must_use]
    pub fn score_for(&self, letters: usize) -> u64 {
        let base = POINTS_PER_LETTER * letters as f64;
        let raw = (base * self.speed * self.streak * self.survival).round();
        if raw.is_finite() && raw > 0.0 {
            raw as u64
        } else {
            0
        }
    }
}

fn speed_multiplier(current_wpm: f64, baseline_wpm: f64) -> f64 {
    if baseline_wpm <= 0.0 {
        return MAX_SPEED_MULTIPLIER;
    }
    (current_wpm / baseline_wpm).min(MAX_SPEED_MULTIPLIER)
}

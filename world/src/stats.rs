//! Keystroke counters and the completion log used for words-per-minute.

use std::time::Duration;

use word_defence_core::Timestamp;

/// Trailing window used when converting completions into a typing rate.
pub(crate) const WPM_WINDOW: Duration = Duration::from_secs(10);

/// Completions older than this are never read again.
const LOG_RETENTION: Duration = Duration::from_secs(30);

/// Completions inside the window are scaled to a per-minute rate.
const WINDOWS_PER_MINUTE: f64 = 60.0 / 10.0;

#[derive(Clone, Debug, Default)]
pub(crate) struct TypingStats {
    pub(crate) total_keystrokes: u64,
    pub(crate) correct_keystrokes: u64,
    completions: Vec<Timestamp>,
}

impl TypingStats {
    pub(crate) fn record_keystroke(&mut self, correct: bool) {
        self.total_keystrokes = self.total_keystrokes.saturating_add(1);
        if correct {
            self.correct_keystrokes = self.correct_keystrokes.saturating_add(1);
        }
    }

    pub(crate) fn record_completion(&mut self, at: Timestamp) {
        self.completions
            .retain(|stamp| at.saturating_since(*stamp) <= LOG_RETENTION);
        self.completions.push(at);
    }

    pub(crate) fn completions(&self) -> &[Timestamp] {
        &self.completions
    }

    /// Words per minute measured over the trailing window ending at `now`.
    pub(crate) fn wpm_at(&self, now: Timestamp) -> f64 {
        let recent = self
            .completions
            .iter()
            .filter(|stamp| **stamp <= now && now.saturating_since(**stamp) <= WPM_WINDOW)
            .count();
        recent as f64 * WINDOWS_PER_MINUTE
    }

    /// Percentage of keystrokes that matched a word, 100 before any typing.
    pub(crate) fn accuracy_percent(&self) -> u32 {
        if self.total_keystrokes == 0 {
            return 100;
        }
        let ratio = self.correct_keystrokes as f64 / self.total_keystrokes as f64;
        (ratio * 100.0).round() as u32
    }
}

//! Presentation cues derived from world events.

use std::time::Duration;

use word_defence_core::{Event, Level};

/// Notification a renderer or audio sink reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    /// A new level started.
    LevelUp {
        /// Level that was entered.
        level: Level,
    },
    /// A new wave started within the current level.
    WaveUp {
        /// Wave that was entered.
        wave: u32,
    },
    /// A word was typed to completion.
    WordComplete {
        /// Points awarded for the word.
        score: u64,
    },
    /// The last city fell.
    GameOver,
}

impl Cue {
    /// Cue announced by an event, if any.
    #[must_use]
    pub fn from_event(event: &Event) -> Option<Self> {
        match event {
            Event::LevelAdvanced { level } => Some(Self::LevelUp { level: *level }),
            Event::WaveAdvanced { wave } => Some(Self::WaveUp { wave: *wave }),
            Event::WordCompleted { score, .. } => Some(Self::WordComplete { score: *score }),
            Event::GameOver => Some(Self::GameOver),
            _ => None,
        }
    }

    /// Synthesised sound accompanying the cue.
    #[must_use]
    pub const fn tone(&self) -> Tone {
        match self {
            Self::LevelUp { .. } => Tone {
                waveform: Waveform::Sine,
                start_hz: 330.0,
                end_hz: 660.0,
                gain: 0.3,
                duration: Duration::from_millis(300),
            },
            Self::WaveUp { .. } => Tone {
                waveform: Waveform::Triangle,
                start_hz: 440.0,
                end_hz: 550.0,
                gain: 0.2,
                duration: Duration::from_millis(200),
            },
            Self::WordComplete { .. } => Tone {
                waveform: Waveform::Sine,
                start_hz: 880.0,
                end_hz: 880.0,
                gain: 0.1,
                duration: Duration::from_millis(100),
            },
            Self::GameOver => Tone {
                waveform: Waveform::Sawtooth,
                start_hz: 440.0,
                end_hz: 220.0,
                gain: 0.3,
                duration: Duration::from_millis(600),
            },
        }
    }
}

/// Oscillator shape used by a [`Tone`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Waveform {
    /// Pure sine wave.
    Sine,
    /// Triangle wave.
    Triangle,
    /// Sawtooth wave.
    Sawtooth,
}

/// Frequency sweep played for a cue, fading linearly to silence.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tone {
    /// Oscillator shape.
    pub waveform: Waveform,
    /// Frequency at the start of the sweep.
    pub start_hz: f32,
    /// Frequency reached at the end of the sweep.
    pub end_hz: f32,
    /// Initial gain before the fade.
    pub gain: f32,
    /// Time until the tone is silent.
    pub duration: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;
    use word_defence_core::WordId;

    #[test]
    fn only_transitions_produce_cues() {
        assert_eq!(
            Cue::from_event(&Event::WordCompleted {
                word: WordId::new(3),
                score: 12,
            }),
            Some(Cue::WordComplete { score: 12 })
        );
        assert_eq!(Cue::from_event(&Event::GameOver), Some(Cue::GameOver));
        assert_eq!(
            Cue::from_event(&Event::KeystrokeResolved { correct: true }),
            None
        );
    }

    #[test]
    fn game_over_sweeps_downwards() {
        let tone = Cue::GameOver.tone();
        assert_eq!(tone.waveform, Waveform::Sawtooth);
        assert!(tone.end_hz < tone.start_hz);
    }
}

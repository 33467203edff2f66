//! Persistence seam for the player's baseline typing rate.

use anyhow::Result;

/// Stores the personal-best words-per-minute across sessions.
pub trait BaselineStore {
    /// Reads the stored baseline, `None` when nothing was saved yet.
    fn load(&mut self) -> Result<Option<f64>>;

    /// Replaces the stored baseline.
    fn save(&mut self, wpm: f64) -> Result<()>;
}

/// Baseline store kept in memory for the lifetime of the value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemoryBaseline {
    value: Option<f64>,
    saves: usize,
}

impl MemoryBaseline {
    /// Creates a store that already holds `wpm`.
    #[must_use]
    pub fn with_value(wpm: f64) -> Self {
        Self {
            value: Some(wpm),
            saves: 0,
        }
    }

    /// Currently stored baseline.
    #[must_use]
    pub fn value(&self) -> Option<f64> {
        self.value
    }

    /// Number of writes performed so far.
    #[must_use]
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl BaselineStore for MemoryBaseline {
    fn load(&mut self) -> Result<Option<f64>> {
        Ok(self.value)
    }

    fn save(&mut self, wpm: f64) -> Result<()> {
        self.value = Some(wpm);
        self.saves += 1;
        Ok(())
    }
}

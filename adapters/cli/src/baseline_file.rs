//! Baseline typing rate persisted as a small JSON document.

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use word_defence_session::BaselineStore;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
struct BaselineRecord {
    baseline_wpm: f64,
}

/// Stores the baseline in a JSON file, treating a missing file as unset.
#[derive(Clone, Debug)]
pub(crate) struct FileBaseline {
    path: PathBuf,
}

impl FileBaseline {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl BaselineStore for FileBaseline {
    fn load(&mut self) -> Result<Option<f64>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read baseline file {}", self.path.display()))?;
        let record: BaselineRecord = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse baseline file {}", self.path.display()))?;
        Ok(Some(record.baseline_wpm))
    }

    fn save(&mut self, wpm: f64) -> Result<()> {
        let record = BaselineRecord { baseline_wpm: wpm };
        let json =
            serde_json::to_string_pretty(&record).context("failed to encode baseline record")?;
        fs::write(&self.path, json)
            .with_context(|| format!("failed to write baseline file {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("word-defence-{}-{name}.json", std::process::id()))
    }

    #[test]
    fn missing_file_is_unset() {
        let mut store = FileBaseline::new(scratch("missing"));
        assert_eq!(store.load().expect("load"), None);
    }

    #[test]
    fn saved_baseline_is_reloaded() {
        let path = scratch("saved");
        let mut store = FileBaseline::new(&path);
        store.save(62.5).expect("save");

        let mut reopened = FileBaseline::new(&path);
        assert_eq!(reopened.load().expect("load"), Some(62.5));
        fs::remove_file(&path).expect("cleanup");
    }

    #[test]
    fn corrupt_file_reports_its_path() {
        let path = scratch("corrupt");
        fs::write(&path, "not json").expect("write");

        let error = FileBaseline::new(&path).load().expect_err("corrupt");
        assert!(format!("{error:#}").contains("failed to parse baseline file"));
        fs::remove_file(&path).expect("cleanup");
    }
}

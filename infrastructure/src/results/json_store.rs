//! JSON file writer for the run artifact.
//!
//! Each save serializes the full outcome list as a pretty JSON array and
//! replaces the file atomically (write to a sibling temp file, then rename),
//! so a reader never sees a half-written array.

use docquorum_application::ports::result_store::{ResultStore, StoreError};
use docquorum_domain::QuestionOutcome;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Result store writing `<dir>/<model>_<dataset>_<repetition>.json`
pub struct JsonResultStore {
    dir: PathBuf,
    model: String,
    dataset: String,
}

impl JsonResultStore {
    pub fn new(dir: impl Into<PathBuf>, model: impl Into<String>, dataset: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            model: model.into(),
            dataset: dataset.into(),
        }
    }

    /// Artifact path for one repetition
    pub fn path_for(&self, repetition: usize) -> PathBuf {
        self.dir
            .join(format!("{}_{}_{}.json", self.model, self.dataset, repetition))
    }

    fn io_error(path: &Path, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

impl ResultStore for JsonResultStore {
    fn save(&self, repetition: usize, outcomes: &[QuestionOutcome]) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| Self::io_error(&self.dir, e))?;

        let mut buf = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        outcomes.serialize(&mut serializer)?;

        let path = self.path_for(repetition);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &buf).map_err(|e| Self::io_error(&tmp, e))?;
        std::fs::rename(&tmp, &path).map_err(|e| Self::io_error(&path, e))?;

        debug!("Saved {} outcomes to {}", outcomes.len(), path.display());
        Ok(())
    }
}

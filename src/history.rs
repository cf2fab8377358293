//! Append-only log of finished import jobs, newest first.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ExportError;
use crate::models::ImportJob;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportHistory {
    jobs: Vec<ImportJob>,
}

impl ImportHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend a finished job. Entries are immutable afterwards.
    pub fn prepend(&mut self, job: ImportJob) {
        self.jobs.insert(0, job);
    }

    pub fn jobs(&self) -> &[ImportJob] {
        &self.jobs
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Load from a JSON file; a missing file is an empty history.
    pub fn load(path: &Path) -> Result<Self, ExportError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| ExportError::History(e.to_string()))
    }

    /// Persist as JSON, atomically: write to a tmp file then rename.
    pub fn save(&self, path: &Path) -> Result<(), ExportError> {
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        let json =
            serde_json::to_string_pretty(self).map_err(|e| ExportError::History(e.to_string()))?;
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, json.as_bytes())?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

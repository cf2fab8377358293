use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct IntakeConfig {
    /// Maximum accepted file size in MiB.
    pub max_file_mb: u64,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self { max_file_mb: 20 }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct ProcessingConfig {
    /// Ticker interval in milliseconds.
    pub tick_ms: u64,
    /// Data rows handed to the sink per tick.
    pub rows_per_tick: usize,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            tick_ms: 500,
            rows_per_tick: 100,
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, Default)]
pub struct ExportConfig {
    pub out_path: Option<String>,
    pub issues_path: Option<String>,
    pub history_path: Option<String>,
}

#[derive(Clone, Serialize, Deserialize, Debug, Default)]
pub struct ImporterConfig {
    #[serde(default)]
    pub intake: IntakeConfig,
    #[serde(default)]
    pub processing: ProcessingConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

impl ImporterConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.intake.max_file_mb == 0 {
            return Err(ConfigError::InvalidValue {
                field: "intake.max_file_mb",
                reason: "must be > 0".into(),
            });
        }
        if self.processing.tick_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "processing.tick_ms",
                reason: "must be > 0".into(),
            });
        }
        if self.processing.rows_per_tick == 0 {
            return Err(ConfigError::InvalidValue {
                field: "processing.rows_per_tick",
                reason: "must be > 0".into(),
            });
        }
        Ok(())
    }

    /// Apply `IMPORTER_*` environment overrides on top of the current values.
    pub fn apply_env(&mut self) {
        if let Some(v) = env_u64("IMPORTER_MAX_FILE_MB") {
            self.intake.max_file_mb = v;
        }
        if let Some(v) = env_u64("IMPORTER_TICK_MS") {
            self.processing.tick_ms = v;
        }
        if let Some(v) = env_u64("IMPORTER_ROWS_PER_TICK") {
            self.processing.rows_per_tick = v as usize;
        }
        if let Ok(v) = std::env::var("IMPORTER_OUT") {
            self.export.out_path = Some(v);
        }
        if let Ok(v) = std::env::var("IMPORTER_HISTORY") {
            self.export.history_path = Some(v);
        }
    }
}

fn env_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok().and_then(|s| s.parse().ok())
}

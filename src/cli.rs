//! Command line surface: the import run, template generation and history
//! listing. Every knob can also come from `IMPORTER_*` environment variables.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{ImporterConfig, ProcessingConfig};
use crate::error::ConfigError;

#[derive(Parser, Debug)]
#[command(
    name = "product_importer",
    version,
    about = "Bulk product import from CSV/XLSX files",
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse, validate and import a product file
    Run(RunArgs),
    /// Write the import template CSV
    Template {
        /// Target file or directory (default: current directory)
        path: Option<PathBuf>,
    },
    /// List past import jobs, newest first
    History {
        /// History JSON file (env: IMPORTER_HISTORY)
        #[arg(long, env = "IMPORTER_HISTORY", default_value = "import_history.json")]
        history: PathBuf,
    },
}

#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Input file (.csv, .xlsx or .xls)
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,
    /// Output CSV of accepted products (env: IMPORTER_OUT)
    #[arg(long, env = "IMPORTER_OUT", default_value = "productos_importados.csv")]
    pub out: PathBuf,
    /// Optional CSV of validation issues
    #[arg(long)]
    pub issues: Option<PathBuf>,
    /// History JSON file (env: IMPORTER_HISTORY)
    #[arg(long, env = "IMPORTER_HISTORY", default_value = "import_history.json")]
    pub history: PathBuf,
    /// Override a column mapping, COLUMN=FIELD (repeatable)
    #[arg(long = "map", value_name = "COLUMN=FIELD")]
    pub map: Vec<String>,
    /// Drop the mapping of a column (repeatable)
    #[arg(long = "unmap", value_name = "COLUMN")]
    pub unmap: Vec<String>,
    /// Ticker interval in milliseconds (env: IMPORTER_TICK_MS)
    #[arg(long = "tick-ms", env = "IMPORTER_TICK_MS", default_value_t = 500)]
    pub tick_ms: u64,
    /// Rows handed to the sink per tick (env: IMPORTER_ROWS_PER_TICK)
    #[arg(
        long = "rows-per-tick",
        env = "IMPORTER_ROWS_PER_TICK",
        default_value_t = 100
    )]
    pub rows_per_tick: usize,
    /// Maximum accepted file size in MiB (env: IMPORTER_MAX_FILE_MB)
    #[arg(long = "max-file-mb", env = "IMPORTER_MAX_FILE_MB", default_value_t = 20)]
    pub max_file_mb: u64,
    /// MIME type hint for the input, as a browser would send it
    #[arg(long)]
    pub mime: Option<String>,
}

impl RunArgs {
    pub fn to_config(&self) -> Result<ImporterConfig, ConfigError> {
        let mut cfg = ImporterConfig::default();
        cfg.intake.max_file_mb = self.max_file_mb;
        cfg.processing = ProcessingConfig {
            tick_ms: self.tick_ms,
            rows_per_tick: self.rows_per_tick,
        };
        cfg.export.out_path = Some(self.out.to_string_lossy().into_owned());
        cfg.export.issues_path = self
            .issues
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned());
        cfg.export.history_path = Some(self.history.to_string_lossy().into_owned());
        cfg.validate()?;
        Ok(cfg)
    }
}

/// Split a `COLUMN=FIELD` override into its parts.
pub fn parse_map_override(raw: &str) -> Result<(&str, &str), ConfigError> {
    match raw.split_once('=') {
        Some((column, field)) if !column.is_empty() && !field.is_empty() => Ok((column, field)),
        _ => Err(ConfigError::InvalidValue {
            field: "map",
            reason: format!("expected COLUMN=FIELD, got {raw:?}"),
        }),
    }
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("file not found: {0}")]
    NotFound(String),
    #[error("unsupported file type: {0} (expected .csv, .xlsx or .xls)")]
    UnsupportedType(String),
    #[error("file exceeds {limit_mb} MB limit ({size_bytes} bytes)")]
    TooLarge { size_bytes: u64, limit_mb: u64 },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("csv parse error: {0}")]
    Csv(#[from] csv::Error),
    #[error("xlsx parse error: {0}")]
    Xlsx(String),
    #[error("file has no header row")]
    Empty,
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("no mapping targets a required field")]
    NoRequiredMapping,
    #[error("unknown source column: {0}")]
    UnknownColumn(String),
    #[error("unknown target field: {0}")]
    UnknownField(String),
    #[error("validation reported {0} blocking errors")]
    BlockingErrors(usize),
    #[error("{action} not permitted in step {step}")]
    InvalidStep {
        step: &'static str,
        action: &'static str,
    },
    #[error("row sink error: {0}")]
    Sink(String),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv export error: {0}")]
    Csv(String),
    #[error("history serialization error: {0}")]
    History(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

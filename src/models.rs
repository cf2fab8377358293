use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Declared data type of a target field. Validation branches exhaustively on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Text,
    Number,
    Boolean,
    Url,
    Email,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// Lifecycle status of an import job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Uploading,
    Mapping,
    Validating,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uploading => "uploading",
            Self::Mapping => "mapping",
            Self::Validating => "validating",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Csv,
    Xlsx,
}

/// The user-selected spreadsheet, accepted by intake checks.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub size_bytes: u64,
    pub kind: FileKind,
    pub path: PathBuf,
}

/// Tabular content of a source file. Row 0 of the file is the header;
/// `rows` holds only data rows. Immutable once parsed.
#[derive(Debug, Clone)]
pub struct ParsedTable {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl ParsedTable {
    pub fn new(header: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { header, rows }
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of data rows (header excluded).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Cell value, empty string when the row is shorter than the header.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// Binds one source column to one target field (or leaves it unmapped).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub source_column: String,
    pub target_field: Option<String>,
    pub required: bool,
    pub data_type: DataType,
}

impl ColumnMapping {
    pub fn unmapped(source_column: String) -> Self {
        Self {
            source_column,
            target_field: None,
            required: false,
            data_type: DataType::Text,
        }
    }
}

/// One detected problem in one cell. `row` is reported with the header
/// counted as row 1, so the first data row is row 2.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub row: usize,
    pub column: String,
    pub value: String,
    pub message: String,
    pub severity: Severity,
}

/// Opaque caller identity, carried for contextual display/logging only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Vendor,
    Admin,
    Staff,
}

/// One run of the pipeline from processing-start to a terminal status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportJob {
    pub id: String,
    pub file_name: String,
    pub status: JobStatus,
    pub progress: u8,
    pub total_rows: usize,
    pub processed_rows: usize,
    pub success_rows: usize,
    pub error_rows: usize,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub issues: Vec<ValidationIssue>,
}

impl ImportJob {
    /// New job entering the processing phase. `error_rows` is fixed here from
    /// the error-severity issue count and never changes for this job.
    pub fn new(file_name: String, total_rows: usize, issues: Vec<ValidationIssue>) -> Self {
        let error_rows = issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .count();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            file_name,
            status: JobStatus::Processing,
            progress: 0,
            total_rows,
            processed_rows: 0,
            success_rows: 0,
            error_rows,
            created_at: Utc::now(),
            completed_at: None,
            issues,
        }
    }
}

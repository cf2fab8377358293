//! File acceptance checks for the upload step.

use std::path::Path;

use crate::config::IntakeConfig;
use crate::error::IntakeError;
use crate::models::{FileKind, SourceFile};

/// MIME types the original upload control accepted alongside the extensions.
const CSV_MIME: &str = "text/csv";
const XLS_MIME: &str = "application/vnd.ms-excel";
const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Classify a file by extension, falling back to the declared MIME type.
/// Returns `None` when neither identifies a CSV or Excel spreadsheet.
pub fn detect_kind(name: &str, mime: Option<&str>) -> Option<FileKind> {
    let lower = name.to_ascii_lowercase();
    if lower.ends_with(".csv") {
        return Some(FileKind::Csv);
    }
    if lower.ends_with(".xlsx") || lower.ends_with(".xls") {
        return Some(FileKind::Xlsx);
    }
    match mime {
        Some(CSV_MIME) => Some(FileKind::Csv),
        Some(XLS_MIME) | Some(XLSX_MIME) => Some(FileKind::Xlsx),
        _ => None,
    }
}

/// Accept a file for import: type allowlist plus size cap. Rejections carry
/// the reason; nothing about the pipeline state changes on rejection.
pub fn accept_file(
    path: &Path,
    mime: Option<&str>,
    cfg: &IntakeConfig,
) -> Result<SourceFile, IntakeError> {
    let name = path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    if !path.exists() {
        return Err(IntakeError::NotFound(path.display().to_string()));
    }
    let kind = detect_kind(&name, mime).ok_or_else(|| IntakeError::UnsupportedType(name.clone()))?;
    let size_bytes = std::fs::metadata(path)?.len();
    let limit = cfg.max_file_mb * 1024 * 1024;
    if size_bytes > limit {
        return Err(IntakeError::TooLarge {
            size_bytes,
            limit_mb: cfg.max_file_mb,
        });
    }
    Ok(SourceFile {
        name,
        size_bytes,
        kind,
        path: path.to_path_buf(),
    })
}

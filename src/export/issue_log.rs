//! CSV export of validation issues for offline remediation.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use csv::WriterBuilder;

use crate::error::ExportError;
use crate::models::{Severity, ValidationIssue};

pub fn export_issues_csv(path: &Path, issues: &[ValidationIssue]) -> Result<(), ExportError> {
    let file = File::create(path)?;
    let mut w = WriterBuilder::new().from_writer(BufWriter::new(file));
    w.write_record(["Fila", "Columna", "Valor", "Error", "Tipo"])
        .map_err(|e| ExportError::Csv(e.to_string()))?;
    for issue in issues {
        let severity = match issue.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        w.write_record([
            issue.row.to_string().as_str(),
            &issue.column,
            &issue.value,
            &issue.message,
            severity,
        ])
        .map_err(|e| ExportError::Csv(e.to_string()))?;
    }
    w.flush()?;
    Ok(())
}

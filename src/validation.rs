//! Per-cell validation of a parsed table against its column mappings.

use url::Url;

use crate::models::{ColumnMapping, DataType, ParsedTable, Severity, ValidationIssue};

pub const MSG_REQUIRED: &str = "Campo requerido";
pub const MSG_NUMBER: &str = "Debe ser un número válido mayor o igual a 0";
pub const MSG_BOOLEAN: &str = "Debe ser true/false o sí/no";
pub const MSG_URL: &str = "Debe ser una URL válida";

/// Accepted boolean tokens, matched case-insensitively.
const BOOLEAN_TOKENS: &[&str] = &[
    "true",
    "false",
    "verdadero",
    "falso",
    "1",
    "0",
    "sí",
    "si",
    "no",
];

/// Single pass over every data row crossed with every mapped column.
/// Reported row numbers count the header as row 1, so the first data row is
/// row 2; existing reports depend on that offset.
pub fn validate_table(table: &ParsedTable, mappings: &[ColumnMapping]) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    for (row_idx, _) in table.rows().iter().enumerate() {
        let report_row = row_idx + 2;
        for (col_idx, mapping) in mappings.iter().enumerate() {
            if mapping.target_field.is_none() {
                continue;
            }
            let value = table.cell(row_idx, col_idx);

            if mapping.required && value.trim().is_empty() {
                issues.push(issue(
                    report_row,
                    mapping,
                    value,
                    MSG_REQUIRED,
                    Severity::Error,
                ));
            }
            if value.trim().is_empty() {
                continue;
            }
            match mapping.data_type {
                DataType::Number => {
                    if !is_valid_number(value) {
                        issues.push(issue(
                            report_row,
                            mapping,
                            value,
                            MSG_NUMBER,
                            Severity::Error,
                        ));
                    }
                }
                DataType::Boolean => {
                    let lower = value.to_lowercase();
                    if !BOOLEAN_TOKENS.contains(&lower.as_str()) {
                        issues.push(issue(
                            report_row,
                            mapping,
                            value,
                            MSG_BOOLEAN,
                            Severity::Error,
                        ));
                    }
                }
                DataType::Url => {
                    // Malformed URLs are non-fatal.
                    if Url::parse(value).is_err() {
                        issues.push(issue(
                            report_row,
                            mapping,
                            value,
                            MSG_URL,
                            Severity::Warning,
                        ));
                    }
                }
                DataType::Text | DataType::Email => {}
            }
        }
    }
    issues
}

fn is_valid_number(value: &str) -> bool {
    value
        .trim()
        .parse::<f64>()
        .is_ok_and(|v| v.is_finite() && v >= 0.0)
}

pub fn error_count(issues: &[ValidationIssue]) -> usize {
    issues
        .iter()
        .filter(|i| i.severity == Severity::Error)
        .count()
}

pub fn warning_count(issues: &[ValidationIssue]) -> usize {
    issues
        .iter()
        .filter(|i| i.severity == Severity::Warning)
        .count()
}

fn issue(
    row: usize,
    mapping: &ColumnMapping,
    value: &str,
    message: &str,
    severity: Severity,
) -> ValidationIssue {
    ValidationIssue {
        row,
        column: mapping.source_column.clone(),
        value: value.to_string(),
        message: message.to_string(),
        severity,
    }
}

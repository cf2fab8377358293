//! Column-to-field mapping: auto-detection heuristics and user edits.

use crate::catalog;
use crate::error::ImportError;
use crate::models::ColumnMapping;

/// Ordered synonym table for auto-mapping. First hit wins, so precedence
/// follows the original heuristics (name before price before description).
const AUTO_MAP_RULES: &[(&str, &str)] = &[
    ("nombre", "name"),
    ("name", "name"),
    ("sku", "sku"),
    ("precio", "price"),
    ("price", "price"),
    ("stock", "stock"),
    ("inventario", "stock"),
    ("categoría", "category"),
    ("category", "category"),
    ("descripción", "description"),
    ("description", "description"),
];

/// Best-guess target field for a source column name, by case-insensitive
/// substring match. Pure function; unmatched columns get `None`.
pub fn auto_map_column(column: &str) -> Option<&'static str> {
    let lower = column.to_lowercase();
    AUTO_MAP_RULES
        .iter()
        .find(|(pattern, _)| lower.contains(pattern))
        .map(|(_, field)| *field)
}

/// Derive one mapping per header column, pre-filled with auto-detected
/// guesses against the target field catalog.
pub fn build_mappings(header: &[String]) -> Vec<ColumnMapping> {
    header
        .iter()
        .map(|column| {
            match auto_map_column(column).and_then(catalog::find_field) {
                Some(field) => ColumnMapping {
                    source_column: column.clone(),
                    target_field: Some(field.key.to_string()),
                    required: field.required,
                    data_type: field.data_type,
                },
                None => ColumnMapping::unmapped(column.clone()),
            }
        })
        .collect()
}

/// Whether at least one mapping targets a field the catalog flags required.
/// This gates the validate action.
pub fn has_required_mapping(mappings: &[ColumnMapping]) -> bool {
    mappings.iter().any(|m| {
        m.target_field
            .as_deref()
            .and_then(catalog::find_field)
            .is_some_and(|f| f.required)
    })
}

/// Bind a source column to a catalog field, replacing any previous binding.
pub fn bind(
    mappings: &mut [ColumnMapping],
    column: &str,
    field_key: &str,
) -> Result<(), ImportError> {
    let field =
        catalog::find_field(field_key).ok_or_else(|| ImportError::UnknownField(field_key.into()))?;
    let mapping = mappings
        .iter_mut()
        .find(|m| m.source_column == column)
        .ok_or_else(|| ImportError::UnknownColumn(column.into()))?;
    mapping.target_field = Some(field.key.to_string());
    mapping.required = field.required;
    mapping.data_type = field.data_type;
    Ok(())
}

/// Leave a source column unmapped.
pub fn unbind(mappings: &mut [ColumnMapping], column: &str) -> Result<(), ImportError> {
    let mapping = mappings
        .iter_mut()
        .find(|m| m.source_column == column)
        .ok_or_else(|| ImportError::UnknownColumn(column.into()))?;
    *mapping = ColumnMapping::unmapped(mapping.source_column.clone());
    Ok(())
}

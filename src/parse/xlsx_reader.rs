use std::path::Path;

use calamine::{DataType, Reader, open_workbook_auto};

use crate::error::ParseError;
use crate::models::ParsedTable;

/// Read the first worksheet of an XLSX/XLS workbook into a table.
/// Cells are rendered to strings; numeric cells keep their display form.
pub fn read_xlsx(path: &Path) -> Result<ParsedTable, ParseError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| ParseError::Xlsx(e.to_string()))?;
    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(ParseError::Empty)?;
    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| ParseError::Xlsx(e.to_string()))?;

    let mut iter = range.rows();
    let header: Vec<String> = iter
        .next()
        .ok_or(ParseError::Empty)?
        .iter()
        .map(cell_to_string)
        .collect();
    let rows: Vec<Vec<String>> = iter
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();
    Ok(ParsedTable::new(header, rows))
}

fn cell_to_string<C: DataType>(cell: &C) -> String {
    if let Some(s) = cell.as_string() {
        s
    } else if let Some(b) = cell.get_bool() {
        b.to_string()
    } else {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;

    #[test]
    fn reads_first_sheet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("productos.xlsx");
        let mut wb = Workbook::new();
        let ws = wb.add_worksheet();
        ws.write_string(0, 0, "Nombre").unwrap();
        ws.write_string(0, 1, "SKU").unwrap();
        ws.write_string(0, 2, "Precio").unwrap();
        ws.write_string(1, 0, "Smartphone Galaxy").unwrap();
        ws.write_string(1, 1, "SGX-001").unwrap();
        ws.write_number(1, 2, 799.99).unwrap();
        wb.save(&path).unwrap();

        let table = read_xlsx(&path).unwrap();
        assert_eq!(table.header(), ["Nombre", "SKU", "Precio"]);
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.cell(0, 0), "Smartphone Galaxy");
        assert_eq!(table.cell(0, 2), "799.99");
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = read_xlsx(Path::new("./no_such_file.xlsx")).unwrap_err();
        assert!(matches!(err, ParseError::Xlsx(_)));
    }
}

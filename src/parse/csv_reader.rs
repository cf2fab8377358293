use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use csv::ReaderBuilder;

use crate::error::ParseError;
use crate::models::ParsedTable;

/// Read a CSV file into a table. The first record is the header; records may
/// be shorter or longer than the header (real-world exports often are).
pub fn read_csv(path: &Path) -> Result<ParsedTable, ParseError> {
    let file = File::open(path).map_err(csv::Error::from)?;
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(BufReader::with_capacity(512 * 1024, file));

    let mut header: Option<Vec<String>> = None;
    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record?;
        let cells: Vec<String> = record.iter().map(|s| s.to_string()).collect();
        if header.is_none() {
            header = Some(cells);
        } else {
            rows.push(cells);
        }
    }
    let header = header.ok_or(ParseError::Empty)?;
    Ok(ParsedTable::new(header, rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_csv(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("datos.csv");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn reads_header_and_rows() {
        let (_dir, path) = write_csv(
            "Nombre,SKU,Precio,Stock\nSmartphone Galaxy,SGX-001,799.99,25\nCamiseta,CVT-003,29.99,100\n",
        );
        let table = read_csv(&path).unwrap();
        assert_eq!(table.header(), ["Nombre", "SKU", "Precio", "Stock"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.cell(0, 2), "799.99");
    }

    #[test]
    fn tolerates_short_rows() {
        let (_dir, path) = write_csv("a,b,c\n1,2\n");
        let table = read_csv(&path).unwrap();
        assert_eq!(table.cell(0, 2), "");
    }

    #[test]
    fn empty_file_is_an_error() {
        let (_dir, path) = write_csv("");
        assert!(matches!(read_csv(&path), Err(ParseError::Empty)));
    }

    #[test]
    fn quoted_cells_keep_commas() {
        let (_dir, path) = write_csv("a,b\n\"uno, dos\",3\n");
        let table = read_csv(&path).unwrap();
        assert_eq!(table.cell(0, 0), "uno, dos");
    }
}

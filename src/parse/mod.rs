//! Spreadsheet readers producing an immutable [`ParsedTable`].

pub mod csv_reader;
pub mod xlsx_reader;

use crate::error::ParseError;
use crate::models::{FileKind, ParsedTable, SourceFile};

pub fn parse_source(file: &SourceFile) -> Result<ParsedTable, ParseError> {
    match file.kind {
        FileKind::Csv => csv_reader::read_csv(&file.path),
        FileKind::Xlsx => xlsx_reader::read_xlsx(&file.path),
    }
}

//! Row sink writing accepted products to a CSV file.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use csv::{Writer, WriterBuilder};

use crate::error::{ExportError, ImportError};
use crate::runner::{ProductRecord, RowSink};

pub struct CsvRowSink {
    writer: Writer<BufWriter<File>>,
    field_keys: Vec<String>,
}

impl CsvRowSink {
    /// Create the output file and write the header of mapped field keys.
    pub fn create(path: &Path, field_keys: Vec<String>) -> Result<Self, ExportError> {
        let file = File::create(path)?;
        let mut writer = WriterBuilder::new().from_writer(BufWriter::with_capacity(512 * 1024, file));
        writer
            .write_record(&field_keys)
            .map_err(|e| ExportError::Csv(e.to_string()))?;
        Ok(Self { writer, field_keys })
    }
}

impl RowSink for CsvRowSink {
    fn write(&mut self, record: &ProductRecord) -> Result<(), ImportError> {
        let row: Vec<&str> = self
            .field_keys
            .iter()
            .map(|key| {
                record
                    .values
                    .iter()
                    .find(|(k, _)| k == key)
                    .map(|(_, v)| v.as_str())
                    .unwrap_or("")
            })
            .collect();
        self.writer
            .write_record(&row)
            .map_err(|e| ImportError::Sink(e.to_string()))
    }

    fn flush(&mut self) -> Result<(), ImportError> {
        self.writer
            .flush()
            .map_err(|e| ImportError::Sink(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_header_and_rows_in_key_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("productos.csv");
        let mut sink =
            CsvRowSink::create(&path, vec!["name".into(), "sku".into(), "price".into()]).unwrap();
        sink.write(&ProductRecord {
            values: vec![
                ("name".into(), "Camiseta Vintage".into()),
                ("sku".into(), "CVT-003".into()),
                ("price".into(), "29.99".into()),
            ],
        })
        .unwrap();
        sink.flush().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "name,sku,price");
        assert_eq!(lines[1], "Camiseta Vintage,CVT-003,29.99");
    }
}

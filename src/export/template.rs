//! Import template generation: required field labels plus two example rows.

use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog;
use crate::error::ExportError;

pub const TEMPLATE_FILE_NAME: &str = "plantilla_productos.csv";

/// Fixed example data lines shipped with the template (name, sku, price, stock).
const EXAMPLE_ROWS: &[&[&str]] = &[
    &["Smartphone Galaxy Pro", "SGP-001", "799.99", "25"],
    &["Auriculares Bluetooth", "ABT-002", "199.99", "50"],
];

/// Template content: comma-joined labels of every required catalog field, in
/// catalog order, followed by the example rows. Independent of any upload.
pub fn template_csv() -> String {
    let mut writer = csv::Writer::from_writer(Vec::new());
    let labels: Vec<&str> = catalog::required_fields().map(|f| f.label).collect();
    // Static content; writing to a Vec cannot fail.
    writer.write_record(&labels).expect("in-memory csv write");
    for row in EXAMPLE_ROWS {
        writer.write_record(*row).expect("in-memory csv write");
    }
    let bytes = writer.into_inner().expect("in-memory csv flush");
    String::from_utf8(bytes).expect("csv output is utf-8")
}

/// Write the template to `path`; when `path` is a directory the fixed
/// filename is appended. Returns the resolved path.
pub fn write_template(path: &Path) -> Result<PathBuf, ExportError> {
    let target = if path.is_dir() {
        path.join(TEMPLATE_FILE_NAME)
    } else {
        path.to_path_buf()
    };
    fs::write(&target, template_csv())?;
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_required_labels_in_catalog_order() {
        let content = template_csv();
        let first_line = content.lines().next().unwrap();
        assert_eq!(first_line, "Nombre del producto,SKU,Precio,Stock");
    }

    #[test]
    fn carries_two_example_rows() {
        let content = template_csv();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("Smartphone Galaxy Pro,SGP-001"));
        assert!(lines[2].starts_with("Auriculares Bluetooth,ABT-002"));
    }

    #[test]
    fn directory_target_gets_fixed_filename() {
        let dir = tempfile::tempdir().unwrap();
        let written = write_template(dir.path()).unwrap();
        assert_eq!(
            written.file_name().unwrap().to_str().unwrap(),
            TEMPLATE_FILE_NAME
        );
        assert!(written.exists());
    }
}

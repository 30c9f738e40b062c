//! Spreadsheet codec adapters
//!
//! Bridges files and the mapping engine:
//! - Import: .xls/.xlsx (calamine) or .csv (csv) → [`Grid`](crate::types::Grid)
//! - Export: [`Sheet`](crate::types::Sheet) → .xlsx (rust_xlsxwriter) or .csv

mod exporter;
mod importer;

pub use exporter::ExcelExporter;
pub use importer::ExcelImporter;

use crate::error::{MapperError, MapperResult};
use std::path::Path;

/// File formats recognised by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SheetFormat {
    Xls,
    Xlsx,
    Csv,
}

impl SheetFormat {
    pub const fn extension(&self) -> &'static str {
        match self {
            SheetFormat::Xls => "xls",
            SheetFormat::Xlsx => "xlsx",
            SheetFormat::Csv => "csv",
        }
    }

    /// Pick the format from a file extension (case-insensitive)
    pub fn from_path(path: &Path) -> MapperResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        match ext.as_deref() {
            Some("xls") => Ok(SheetFormat::Xls),
            Some("xlsx") => Ok(SheetFormat::Xlsx),
            Some("csv") => Ok(SheetFormat::Csv),
            Some(other) => Err(MapperError::UnsupportedFormat(format!(".{}", other))),
            None => Err(MapperError::UnsupportedFormat(format!(
                "{} has no extension",
                path.display()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            SheetFormat::from_path(Path::new("people.xlsx")).unwrap(),
            SheetFormat::Xlsx
        );
        assert_eq!(
            SheetFormat::from_path(Path::new("OLD.XLS")).unwrap(),
            SheetFormat::Xls
        );
        assert_eq!(
            SheetFormat::from_path(Path::new("dir/data.Csv")).unwrap(),
            SheetFormat::Csv
        );
        assert_eq!(SheetFormat::Csv.extension(), "csv");
    }

    #[test]
    fn test_unsupported_format() {
        for name in ["report.ods", "notes.txt", "noext"] {
            let err = SheetFormat::from_path(Path::new(name)).unwrap_err();
            assert!(matches!(err, MapperError::UnsupportedFormat(_)), "{name}");
            assert_eq!(err.code(), -3);
        }
    }
}

//! Excel Mapper - spreadsheet rows ↔ typed records
//!
//! This library maps tabular data (xls, xlsx, csv) to records whose fields
//! carry column tags, and back.
//!
//! # Features
//!
//! - Column tags of the form `[*]Display Name`, `*` marking a required column
//! - Import: header matching, required-column and required-cell checks,
//!   integer/float/boolean/text/timestamp coercion
//! - Export: styled header row (required columns stand out) and formatted rows
//! - Records declared statically ([`record!`]) or at runtime from YAML templates
//! - Excel import/export adapters (calamine, rust_xlsxwriter, csv)
//!
//! # Example
//!
//! ```no_run
//! use excel_mapper::excel::{ExcelExporter, ExcelImporter};
//! use excel_mapper::{decode, encode, record, Record};
//! use std::collections::HashSet;
//! use std::path::Path;
//!
//! #[derive(Debug, Default)]
//! struct Employee {
//!     id: i64,
//!     name: String,
//!     salary: f64,
//! }
//!
//! record!(Employee {
//!     id => "*ID",
//!     name => "*Name",
//!     salary => "Salary",
//! });
//!
//! let grid = ExcelImporter::new("staff.xlsx").read_grid()?;
//! let staff: Vec<Employee> = decode(Employee::schema(), &grid)?;
//!
//! let sheet = encode("staff", &staff, Employee::schema(), &HashSet::new())?;
//! ExcelExporter::new(&sheet).export(Path::new("staff-copy.xlsx"))?;
//! # Ok::<(), excel_mapper::MapperError>(())
//! ```

pub mod cli;
pub mod core;
pub mod error;
pub mod excel;
pub mod template;
pub mod types;

// Re-export commonly used types
pub use crate::core::{
    decode, encode, extract, ColumnDescriptor, Columns, ExportMapper, Field, ImportMapper, Mapper,
    Record, Schema, SchemaBuilder, Source,
};
pub use error::{ErrorKind, MapperError, MapperResult};
pub use types::{Cell, CellKind, CellStyle, CellValue, Grid, Opaque, Sheet};

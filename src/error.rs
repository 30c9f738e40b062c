use crate::types::{CellKind, CoerceError};
use thiserror::Error;

pub type MapperResult<T> = Result<T, MapperError>;

/// Code reported for file stream failures in the codec layer
pub const OPERATION_ERROR_CODE: i32 = -1;
/// Code reported when cell data does not fit the record type
pub const DATA_MISMATCH_CODE: i32 = -2;
/// Code reported for caller misuse
pub const PARAMETER_ERROR_CODE: i32 = -3;

/// Broad class of a [`MapperError`], one per numeric code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Operation,
    DataMismatch,
    Parameter,
}

#[derive(Error, Debug)]
pub enum MapperError {
    #[error("file stream operation failed: {0}")]
    FileStream(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parameter type error, expected {kind}, at [{row},{col}], please check")]
    ParameterType { row: usize, col: usize, kind: CellKind },

    #[error("missing required column [{0}], please check")]
    MissingRequiredColumn(String),

    #[error("missing required parameter at row {row} col {col}, please check")]
    MissingRequiredParameter { row: usize, col: usize },

    #[error("type not supported: field `{field}` has type {type_name}")]
    TypeNotSupported { field: String, type_name: String },

    #[error("field `{0}` does not exist on the record type")]
    UnknownField(String),

    #[error("parameter cannot be nil")]
    NilParameter,

    #[error("target type not supported: {0}")]
    TargetTypeNotSupported(String),

    #[error("source type not supported: expected a record or a sequence of records, got {0}")]
    SourceTypeNotSupported(String),

    #[error("tag not found: no field carries a column tag")]
    TagNotFound,

    #[error("column [{0}] does not match any field tag")]
    ColumnNotMatched(String),

    #[error("duplicate column [{0}]: more than one field maps to it, please check")]
    DuplicateColumn(String),

    #[error("unsupported format: {0} (only xls, xlsx and csv are supported)")]
    UnsupportedFormat(String),

    #[error("template error: {0}")]
    Template(String),
}

impl MapperError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MapperError::FileStream(_) | MapperError::Io(_) => ErrorKind::Operation,
            MapperError::ParameterType { .. }
            | MapperError::MissingRequiredColumn(_)
            | MapperError::MissingRequiredParameter { .. }
            | MapperError::TypeNotSupported { .. }
            | MapperError::UnknownField(_) => ErrorKind::DataMismatch,
            MapperError::NilParameter
            | MapperError::TargetTypeNotSupported(_)
            | MapperError::SourceTypeNotSupported(_)
            | MapperError::TagNotFound
            | MapperError::ColumnNotMatched(_)
            | MapperError::DuplicateColumn(_)
            | MapperError::UnsupportedFormat(_)
            | MapperError::Template(_) => ErrorKind::Parameter,
        }
    }

    /// Numeric code surfaced to callers alongside the message
    pub fn code(&self) -> i32 {
        match self.kind() {
            ErrorKind::Operation => OPERATION_ERROR_CODE,
            ErrorKind::DataMismatch => DATA_MISMATCH_CODE,
            ErrorKind::Parameter => PARAMETER_ERROR_CODE,
        }
    }

    /// Place a cell coercion failure of field `field` at `[row, col]`
    pub fn coerce(err: CoerceError, field: &str, row: usize, col: usize) -> Self {
        match err {
            CoerceError::Mismatch(kind) => MapperError::ParameterType { row, col, kind },
            CoerceError::Unsupported(type_name) => MapperError::TypeNotSupported {
                field: field.to_string(),
                type_name,
            },
        }
    }

    /// Wrap a codec failure (calamine, csv, rust_xlsxwriter) as a file stream error
    pub fn file_stream(err: impl std::fmt::Display) -> Self {
        MapperError::FileStream(err.to_string())
    }
}

impl From<serde_yaml::Error> for MapperError {
    fn from(err: serde_yaml::Error) -> Self {
        MapperError::Template(err.to_string())
    }
}

impl From<serde_json::Error> for MapperError {
    fn from(err: serde_json::Error) -> Self {
        MapperError::Template(err.to_string())
    }
}

use chrono::NaiveDateTime;
use std::fmt;

/// The one timestamp pattern used for both import and export
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Leading character of a column tag that marks the column as required
pub const REQUIRED_MARKER: char = '*';

/// Tag value that explicitly keeps a field out of spreadsheet I/O
pub const SKIP_TAG: &str = "-";

/// Row-major text cells as produced by a spreadsheet or CSV decoder.
/// Row 0 is the header row.
pub type Grid = Vec<Vec<String>>;

//==============================================================================
// Cell kinds and value coercion
//==============================================================================

/// Semantic type of a mapped field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellKind {
    Integer,
    Float,
    Boolean,
    Text,
    Time,
    /// A field type the decoder cannot build from text (type name attached)
    Unsupported(String),
}

impl CellKind {
    /// Parse a kind name as written in YAML templates
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "integer" | "int" => CellKind::Integer,
            "float" | "number" => CellKind::Float,
            "boolean" | "bool" => CellKind::Boolean,
            "text" | "string" => CellKind::Text,
            "time" | "timestamp" | "datetime" => CellKind::Time,
            other => CellKind::Unsupported(other.to_string()),
        }
    }
}

impl fmt::Display for CellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellKind::Integer => write!(f, "integer"),
            CellKind::Float => write!(f, "float"),
            CellKind::Boolean => write!(f, "boolean"),
            CellKind::Text => write!(f, "text"),
            CellKind::Time => write!(f, "time"),
            CellKind::Unsupported(name) => write!(f, "{}", name),
        }
    }
}

/// Why a cell's text could not become a field value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoerceError {
    /// The text does not parse as the expected kind
    Mismatch(CellKind),
    /// The field type has no text parser at all
    Unsupported(String),
}

/// A field type that can be read from and written to a single cell.
///
/// Supporting a new field type means implementing this trait; the decoder
/// and encoder never branch on concrete types.
pub trait CellValue: Sized {
    fn kind() -> CellKind;

    /// Cell text for this value, `None` for an empty cell
    fn to_cell(&self) -> Option<String>;

    /// Build a value from non-empty cell text
    fn from_cell(text: &str) -> Result<Self, CoerceError>;
}

macro_rules! impl_integer_cell {
    ($($ty:ty),*) => {
        $(
            impl CellValue for $ty {
                fn kind() -> CellKind {
                    CellKind::Integer
                }

                fn to_cell(&self) -> Option<String> {
                    Some(self.to_string())
                }

                fn from_cell(text: &str) -> Result<Self, CoerceError> {
                    text.parse::<$ty>()
                        .map_err(|_| CoerceError::Mismatch(CellKind::Integer))
                }
            }
        )*
    };
}

impl_integer_cell!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

macro_rules! impl_float_cell {
    ($($ty:ty),*) => {
        $(
            impl CellValue for $ty {
                fn kind() -> CellKind {
                    CellKind::Float
                }

                // Scientific notation, shortest mantissa that round-trips
                fn to_cell(&self) -> Option<String> {
                    Some(format!("{:E}", self))
                }

                fn from_cell(text: &str) -> Result<Self, CoerceError> {
                    text.parse::<$ty>()
                        .map_err(|_| CoerceError::Mismatch(CellKind::Float))
                }
            }
        )*
    };
}

impl_float_cell!(f32, f64);

impl CellValue for bool {
    fn kind() -> CellKind {
        CellKind::Boolean
    }

    fn to_cell(&self) -> Option<String> {
        Some(self.to_string())
    }

    fn from_cell(text: &str) -> Result<Self, CoerceError> {
        parse_bool(text).ok_or(CoerceError::Mismatch(CellKind::Boolean))
    }
}

impl CellValue for String {
    fn kind() -> CellKind {
        CellKind::Text
    }

    fn to_cell(&self) -> Option<String> {
        if self.is_empty() {
            None
        } else {
            Some(self.clone())
        }
    }

    fn from_cell(text: &str) -> Result<Self, CoerceError> {
        Ok(text.to_string())
    }
}

impl CellValue for NaiveDateTime {
    fn kind() -> CellKind {
        CellKind::Time
    }

    // The default timestamp is the "unset" value and renders as an empty cell
    fn to_cell(&self) -> Option<String> {
        if *self == NaiveDateTime::default() {
            None
        } else {
            Some(format_time(self))
        }
    }

    fn from_cell(text: &str) -> Result<Self, CoerceError> {
        parse_time(text).ok_or(CoerceError::Mismatch(CellKind::Time))
    }
}

impl<T: CellValue> CellValue for Option<T> {
    fn kind() -> CellKind {
        T::kind()
    }

    fn to_cell(&self) -> Option<String> {
        self.as_ref().and_then(CellValue::to_cell)
    }

    fn from_cell(text: &str) -> Result<Self, CoerceError> {
        T::from_cell(text).map(Some)
    }
}

/// Wrapper for field types that export through `Display` but cannot be imported
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Opaque<T>(pub T);

impl<T: fmt::Display> CellValue for Opaque<T> {
    fn kind() -> CellKind {
        CellKind::Unsupported(std::any::type_name::<T>().to_string())
    }

    fn to_cell(&self) -> Option<String> {
        let text = self.0.to_string();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    fn from_cell(_text: &str) -> Result<Self, CoerceError> {
        Err(CoerceError::Unsupported(
            std::any::type_name::<T>().to_string(),
        ))
    }
}

/// Accepts the usual spellings: 1/0, t/f, true/false in lower, title and upper case
pub fn parse_bool(text: &str) -> Option<bool> {
    match text {
        "1" | "t" | "T" | "true" | "True" | "TRUE" => Some(true),
        "0" | "f" | "F" | "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}

pub fn parse_time(text: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, TIME_FORMAT).ok()
}

pub fn format_time(value: &NaiveDateTime) -> String {
    value.format(TIME_FORMAT).to_string()
}

//==============================================================================
// Encoded sheet
//==============================================================================

/// Style class of an encoded cell; the codec decides what each looks like
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellStyle {
    RequiredHeader,
    NormalHeader,
    Body,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub value: String,
    pub style: CellStyle,
}

impl Cell {
    pub fn new(value: impl Into<String>, style: CellStyle) -> Self {
        Self {
            value: value.into(),
            style,
        }
    }

    pub fn body(value: impl Into<String>) -> Self {
        Self::new(value, CellStyle::Body)
    }
}

/// One encoded worksheet: a header row followed by data rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    pub fn add_row(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    pub fn header(&self) -> Option<&[Cell]> {
        self.rows.first().map(Vec::as_slice)
    }

    /// Number of data rows (header excluded)
    pub fn record_count(&self) -> usize {
        self.rows.len().saturating_sub(1)
    }

    /// Drop styles and keep the text, the shape the decoder consumes
    pub fn to_grid(&self) -> Grid {
        self.rows
            .iter()
            .map(|row| row.iter().map(|cell| cell.value.clone()).collect())
            .collect()
    }
}

//! Row encoder: records → styled sheet

use crate::core::extractor::extract;
use crate::core::schema::{Field, Schema};
use crate::core::Mapper;
use crate::error::{MapperError, MapperResult};
use crate::types::{Cell, CellStyle, Sheet};
use std::collections::HashSet;
use tracing::debug;

/// What to export: nothing, one record, or a sequence of records
#[derive(Debug)]
pub enum Source<'a, R> {
    Nil,
    One(&'a R),
    Many(Vec<&'a R>),
    /// A value that is neither a record nor a sequence of records
    Unsupported(String),
}

impl<R> Clone for Source<'_, R> {
    fn clone(&self) -> Self {
        match self {
            Source::Nil => Source::Nil,
            Source::One(record) => Source::One(*record),
            Source::Many(records) => Source::Many(records.clone()),
            Source::Unsupported(shape) => Source::Unsupported(shape.clone()),
        }
    }
}

impl<'a, R> Source<'a, R> {
    fn records(&self) -> MapperResult<Vec<&'a R>> {
        match self {
            Source::Nil => Err(MapperError::NilParameter),
            Source::One(record) => Ok(vec![*record]),
            Source::Many(records) => Ok(records.clone()),
            Source::Unsupported(shape) => Err(MapperError::SourceTypeNotSupported(shape.clone())),
        }
    }
}

impl<'a, R> From<&'a R> for Source<'a, R> {
    fn from(record: &'a R) -> Self {
        Source::One(record)
    }
}

impl<'a, R> From<&'a [R]> for Source<'a, R> {
    fn from(records: &'a [R]) -> Self {
        Source::Many(records.iter().collect())
    }
}

impl<'a, R> From<&'a Vec<R>> for Source<'a, R> {
    fn from(records: &'a Vec<R>) -> Self {
        Source::Many(records.iter().collect())
    }
}

impl<'a, R> From<&'a [&'a R]> for Source<'a, R> {
    fn from(records: &'a [&'a R]) -> Self {
        Source::Many(records.to_vec())
    }
}

impl<'a, R> From<Vec<&'a R>> for Source<'a, R> {
    fn from(records: Vec<&'a R>) -> Self {
        Source::Many(records)
    }
}

impl<'a, R> From<Option<&'a R>> for Source<'a, R> {
    fn from(record: Option<&'a R>) -> Self {
        record.map_or(Source::Nil, Source::One)
    }
}

/// Exports records of one schema into a sheet
pub struct ExportMapper<'a, R> {
    sheet_name: String,
    schema: &'a Schema<R>,
    source: Source<'a, R>,
    excluded: HashSet<String>,
}

impl<'a, R> ExportMapper<'a, R> {
    pub fn new(
        sheet_name: impl Into<String>,
        schema: &'a Schema<R>,
        source: impl Into<Source<'a, R>>,
    ) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            schema,
            source: source.into(),
            excluded: HashSet::new(),
        }
    }

    /// Leave these display names out of the header and the rows
    pub fn filter<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded.extend(names.into_iter().map(Into::into));
        self
    }
}

impl<R> Mapper for ExportMapper<'_, R> {
    type Output = Sheet;

    fn run(&self) -> MapperResult<Sheet> {
        if matches!(self.source, Source::Nil) {
            return Err(MapperError::NilParameter);
        }
        let columns = extract(self.schema, &self.excluded)?;

        let mut sheet = Sheet::new(self.sheet_name.clone());
        let mut fields: Vec<&Field<R>> = Vec::with_capacity(columns.len());
        let mut header = Vec::with_capacity(columns.len());
        for descriptor in &columns {
            fields.push(self.schema.field(&descriptor.field_key)?);
            let style = if descriptor.required {
                CellStyle::RequiredHeader
            } else {
                CellStyle::NormalHeader
            };
            header.push(Cell::new(descriptor.display_name.clone(), style));
        }
        sheet.add_row(header);

        // Data rows start at sheet row 2
        for (idx, record) in self.source.records()?.into_iter().enumerate() {
            let mut row = Vec::with_capacity(fields.len());
            for (col, field) in fields.iter().enumerate() {
                let text = field
                    .read(record)
                    .map_err(|err| MapperError::coerce(err, field.key(), idx + 2, col + 1))?;
                row.push(Cell::body(text.unwrap_or_default()));
            }
            sheet.add_row(row);
        }

        debug!(
            sheet = %sheet.name,
            columns = fields.len(),
            records = sheet.record_count(),
            "encoded sheet"
        );
        Ok(sheet)
    }
}

/// Encode `source` into a sheet named `sheet_name`, skipping `excluded` display names
pub fn encode<'a, R>(
    sheet_name: &str,
    source: impl Into<Source<'a, R>>,
    schema: &'a Schema<R>,
    excluded: &HashSet<String>,
) -> MapperResult<Sheet> {
    ExportMapper::new(sheet_name, schema, source)
        .filter(excluded.iter().cloned())
        .run()
}

//! Field-mapping engine: column extraction, row decoding and row encoding

pub mod decoder;
pub mod encoder;
pub mod extractor;
pub mod schema;

pub use decoder::{decode, ImportMapper};
pub use encoder::{encode, ExportMapper, Source};
pub use extractor::{extract, ColumnDescriptor, Columns};
pub use schema::{Field, Record, Schema, SchemaBuilder};

use crate::error::MapperResult;

/// A configured import or export, executed in one call
pub trait Mapper {
    type Output;

    fn run(&self) -> MapperResult<Self::Output>;
}

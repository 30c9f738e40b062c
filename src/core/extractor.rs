//! Column discovery: which fields take part in spreadsheet I/O, under which
//! header, and whether they are required

use crate::core::schema::Schema;
use crate::error::{MapperError, MapperResult};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// One mapped column of a record type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    /// Tag as declared, required marker included
    pub tag: String,
    /// Header text with the marker stripped
    pub display_name: String,
    pub required: bool,
    pub field_key: String,
}

/// Ordered column descriptors plus a lookup by display name
#[derive(Debug, Clone, Default)]
pub struct Columns {
    descriptors: Vec<ColumnDescriptor>,
    by_name: HashMap<String, usize>,
}

impl Columns {
    /// Raw tags in declaration order, required markers kept
    pub fn ordered_names(&self) -> Vec<&str> {
        self.descriptors.iter().map(|d| d.tag.as_str()).collect()
    }

    pub fn get(&self, display_name: &str) -> Option<&ColumnDescriptor> {
        self.by_name
            .get(display_name)
            .map(|&idx| &self.descriptors[idx])
    }

    /// Field key bound to a display name
    pub fn field_key(&self, display_name: &str) -> Option<&str> {
        self.get(display_name).map(|d| d.field_key.as_str())
    }

    pub fn descriptors(&self) -> &[ColumnDescriptor] {
        &self.descriptors
    }

    pub fn required_names(&self) -> impl Iterator<Item = &str> {
        self.descriptors
            .iter()
            .filter(|d| d.required)
            .map(|d| d.display_name.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ColumnDescriptor> {
        self.descriptors.iter()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl<'a> IntoIterator for &'a Columns {
    type Item = &'a ColumnDescriptor;
    type IntoIter = std::slice::Iter<'a, ColumnDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.descriptors.iter()
    }
}

/// Extract the mapped columns of `schema`, skipping display names in `excluded`.
///
/// Fails with [`MapperError::TagNotFound`] when nothing is left, and with
/// [`MapperError::DuplicateColumn`] when two fields share a display name.
pub fn extract<R>(schema: &Schema<R>, excluded: &HashSet<String>) -> MapperResult<Columns> {
    let mut columns = Columns::default();

    for field in schema.fields() {
        let (Some(tag), Some(display_name)) = (field.tag(), field.display_name()) else {
            continue;
        };
        if excluded.contains(display_name) {
            continue;
        }
        if columns.by_name.contains_key(display_name) {
            return Err(MapperError::DuplicateColumn(display_name.to_string()));
        }

        columns
            .by_name
            .insert(display_name.to_string(), columns.descriptors.len());
        columns.descriptors.push(ColumnDescriptor {
            tag: tag.to_string(),
            display_name: display_name.to_string(),
            required: field.is_required(),
            field_key: field.key().to_string(),
        });
    }

    if columns.is_empty() {
        return Err(MapperError::TagNotFound);
    }

    debug!(
        record = schema.type_name(),
        columns = columns.len(),
        excluded = excluded.len(),
        "extracted columns"
    );
    Ok(columns)
}

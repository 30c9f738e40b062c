//! Explicit per-type schema tables
//!
//! A [`Schema`] lists the fields of a record type in declaration order. Each
//! [`Field`] carries its column tag, its [`CellKind`], and a pair of accessors
//! that read the field as cell text and write it back from cell text.
//! Statically typed records build their table once through [`Record::schema`]
//! (usually via the [`record!`](crate::record) macro); runtime templates build
//! one from YAML.

use crate::error::{MapperError, MapperResult};
use crate::types::{CellKind, CellValue, CoerceError, REQUIRED_MARKER, SKIP_TAG};

type ReadFn<R> = Box<dyn Fn(&R) -> Result<Option<String>, CoerceError> + Send + Sync>;
type WriteFn<R> = Box<dyn Fn(&mut R, &str) -> Result<(), CoerceError> + Send + Sync>;
type ConstructFn<R> = Box<dyn Fn() -> R + Send + Sync>;

/// A record type that knows its own spreadsheet schema
pub trait Record: Sized + 'static {
    fn schema() -> &'static Schema<Self>;
}

/// One field of a record type
pub struct Field<R> {
    key: String,
    tag: Option<String>,
    kind: CellKind,
    read: ReadFn<R>,
    write: WriteFn<R>,
}

impl<R: 'static> Field<R> {
    /// Field backed by a struct member of a [`CellValue`] type
    pub fn typed<T: CellValue + 'static>(
        key: impl Into<String>,
        tag: Option<&str>,
        get: fn(&R) -> &T,
        get_mut: fn(&mut R) -> &mut T,
    ) -> Self {
        Self {
            key: key.into(),
            tag: tag.map(str::to_string),
            kind: T::kind(),
            read: Box::new(move |record: &R| Ok(get(record).to_cell())),
            write: Box::new(move |record: &mut R, text: &str| {
                *get_mut(record) = T::from_cell(text)?;
                Ok(())
            }),
        }
    }
}

impl<R> Field<R> {
    /// Field with hand-written accessors. `read` fails when the stored value
    /// does not fit `kind`.
    pub fn custom(
        key: impl Into<String>,
        tag: Option<&str>,
        kind: CellKind,
        read: impl Fn(&R) -> Result<Option<String>, CoerceError> + Send + Sync + 'static,
        write: impl Fn(&mut R, &str) -> Result<(), CoerceError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            key: key.into(),
            tag: tag.map(str::to_string),
            kind,
            read: Box::new(read),
            write: Box::new(write),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Raw column tag, required marker included
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn kind(&self) -> &CellKind {
        &self.kind
    }

    /// Whether the field takes part in spreadsheet I/O at all. A tag that is
    /// only the required marker leaves no header text, so it counts as unmapped.
    pub fn is_mapped(&self) -> bool {
        matches!(
            self.tag.as_deref(),
            Some(tag) if tag != SKIP_TAG && !strip_marker(tag).is_empty()
        )
    }

    pub fn is_required(&self) -> bool {
        self.is_mapped()
            && self
                .tag
                .as_deref()
                .is_some_and(|tag| tag.starts_with(REQUIRED_MARKER))
    }

    /// Column header text: the tag with the required marker stripped
    pub fn display_name(&self) -> Option<&str> {
        if !self.is_mapped() {
            return None;
        }
        self.tag
            .as_deref()
            .map(strip_marker)
    }

    pub fn read(&self, record: &R) -> Result<Option<String>, CoerceError> {
        (self.read)(record)
    }

    pub fn write(&self, record: &mut R, text: &str) -> Result<(), CoerceError> {
        (self.write)(record, text)
    }
}

fn strip_marker(tag: &str) -> &str {
    tag.strip_prefix(REQUIRED_MARKER).unwrap_or(tag)
}

impl<R> std::fmt::Debug for Field<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field")
            .field("key", &self.key)
            .field("tag", &self.tag)
            .field("kind", &self.kind)
            .finish()
    }
}

/// Ordered field table of a record type
pub struct Schema<R> {
    type_name: String,
    fields: Vec<Field<R>>,
    constructor: ConstructFn<R>,
}

impl<R: Default + 'static> Schema<R> {
    /// Builder for a `Default`-constructible record type
    pub fn builder() -> SchemaBuilder<R> {
        SchemaBuilder::with_constructor(std::any::type_name::<R>(), R::default)
    }
}

impl<R> Schema<R> {
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn fields(&self) -> &[Field<R>] {
        &self.fields
    }

    /// Look a field up by key
    pub fn field(&self, key: &str) -> MapperResult<&Field<R>> {
        self.fields
            .iter()
            .find(|field| field.key == key)
            .ok_or_else(|| MapperError::UnknownField(key.to_string()))
    }

    /// A fresh record with every field at its zero value
    pub fn new_record(&self) -> R {
        (self.constructor)()
    }
}

impl<R> std::fmt::Debug for Schema<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Schema")
            .field("type_name", &self.type_name)
            .field("fields", &self.fields)
            .finish()
    }
}

pub struct SchemaBuilder<R> {
    type_name: String,
    fields: Vec<Field<R>>,
    constructor: ConstructFn<R>,
}

impl<R: 'static> SchemaBuilder<R> {
    pub fn with_constructor(
        type_name: impl Into<String>,
        constructor: impl Fn() -> R + Send + Sync + 'static,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            fields: Vec::new(),
            constructor: Box::new(constructor),
        }
    }

    /// Add a tagged struct member. A tag of `"-"` or `""` keeps it unmapped.
    pub fn field<T: CellValue + 'static>(
        mut self,
        key: &str,
        tag: &str,
        get: fn(&R) -> &T,
        get_mut: fn(&mut R) -> &mut T,
    ) -> Self {
        self.fields.push(Field::typed(key, Some(tag), get, get_mut));
        self
    }

    /// Add a struct member without a tag
    pub fn untagged<T: CellValue + 'static>(
        mut self,
        key: &str,
        get: fn(&R) -> &T,
        get_mut: fn(&mut R) -> &mut T,
    ) -> Self {
        self.fields.push(Field::typed(key, None, get, get_mut));
        self
    }

    pub fn push(mut self, field: Field<R>) -> Self {
        self.fields.push(field);
        self
    }

    pub fn build(self) -> Schema<R> {
        Schema {
            type_name: self.type_name,
            fields: self.fields,
            constructor: self.constructor,
        }
    }
}

/// Implement [`Record`] for a `Default` struct by listing its tagged fields
/// in declaration order.
///
/// ```
/// use excel_mapper::record;
///
/// #[derive(Debug, Default)]
/// struct Employee {
///     id: i64,
///     name: String,
///     salary: f64,
///     internal_note: String,
/// }
///
/// record!(Employee {
///     id => "*ID",
///     name => "Name",
///     salary => "Salary",
///     internal_note => "-",
/// });
/// ```
#[macro_export]
macro_rules! record {
    ($ty:ty { $($field:ident => $tag:expr),* $(,)? }) => {
        impl $crate::Record for $ty {
            fn schema() -> &'static $crate::Schema<Self> {
                static SCHEMA: ::std::sync::OnceLock<$crate::Schema<$ty>> =
                    ::std::sync::OnceLock::new();
                SCHEMA.get_or_init(|| {
                    $crate::Schema::<$ty>::builder()
                        $(
                            .field(
                                stringify!($field),
                                $tag,
                                |record| &record.$field,
                                |record| &mut record.$field,
                            )
                        )*
                        .build()
                })
            }
        }
    };
}

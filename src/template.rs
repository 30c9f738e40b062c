//! Record types described at runtime by a YAML template
//!
//! ```yaml
//! name: employee
//! fields:
//!   - key: id
//!     tag: "*ID"
//!     type: integer
//!   - key: name
//!     tag: Name
//!     type: text
//!   - key: note        # no tag: kept on the record, never mapped
//!     type: text
//! ```
//!
//! Records are JSON objects ([`DynRecord`]) keyed by field key.

use crate::core::{Field, Schema, SchemaBuilder, Source};
use crate::error::{MapperError, MapperResult};
use crate::types::{format_time, parse_time, CellKind, CellValue, CoerceError};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::path::Path;

pub type DynRecord = Map<String, Value>;

fn default_kind() -> String {
    "text".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub fields: Vec<FieldSpec>,
}

impl Template {
    pub fn load(path: &Path) -> MapperResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse a template. Anything other than a mapping with a `fields` list
    /// is not a record type.
    pub fn from_yaml(content: &str) -> MapperResult<Self> {
        let yaml: serde_yaml::Value = serde_yaml::from_str(content)?;
        let has_fields = yaml
            .get("fields")
            .is_some_and(serde_yaml::Value::is_sequence);
        if !yaml.is_mapping() || !has_fields {
            return Err(MapperError::TargetTypeNotSupported(format!(
                "template must be a mapping with a `fields` list, got {}",
                yaml_shape(&yaml)
            )));
        }
        let template: Template = serde_yaml::from_value(yaml)?;

        let mut keys = HashSet::new();
        if let Some(dup) = template.fields.iter().find(|spec| !keys.insert(&spec.key)) {
            return Err(MapperError::Template(format!(
                "duplicate field key `{}`",
                dup.key
            )));
        }
        Ok(template)
    }

    pub fn type_name(&self) -> &str {
        self.name.as_deref().unwrap_or("record")
    }

    /// Build the field table for records of this template
    pub fn schema(&self) -> Schema<DynRecord> {
        let specs: Vec<(String, CellKind)> = self
            .fields
            .iter()
            .map(|spec| (spec.key.clone(), CellKind::from_name(&spec.kind)))
            .collect();

        let constructor = move || {
            specs
                .iter()
                .map(|(key, kind)| (key.clone(), zero_value(kind)))
                .collect::<DynRecord>()
        };

        self.fields
            .iter()
            .fold(
                SchemaBuilder::with_constructor(self.type_name(), constructor),
                |builder, spec| builder.push(dyn_field(spec)),
            )
            .build()
    }
}

fn dyn_field(spec: &FieldSpec) -> Field<DynRecord> {
    let kind = CellKind::from_name(&spec.kind);
    let read_key = spec.key.clone();
    let read_kind = kind.clone();
    let write_key = spec.key.clone();
    let write_kind = kind.clone();

    Field::custom(
        spec.key.clone(),
        spec.tag.as_deref(),
        kind,
        move |record: &DynRecord| match record.get(&read_key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => render(&read_kind, value),
        },
        move |record: &mut DynRecord, text: &str| {
            let value = coerce(&write_kind, text)?;
            record.insert(write_key.clone(), value);
            Ok(())
        },
    )
}

fn zero_value(kind: &CellKind) -> Value {
    match kind {
        CellKind::Integer => Value::from(0),
        CellKind::Float => Value::from(0.0),
        CellKind::Boolean => Value::Bool(false),
        CellKind::Text => Value::String(String::new()),
        CellKind::Time | CellKind::Unsupported(_) => Value::Null,
    }
}

fn coerce(kind: &CellKind, text: &str) -> Result<Value, CoerceError> {
    Ok(match kind {
        CellKind::Integer => Value::from(i64::from_cell(text)?),
        CellKind::Float => Value::from(f64::from_cell(text)?),
        CellKind::Boolean => Value::Bool(bool::from_cell(text)?),
        CellKind::Text => Value::String(text.to_string()),
        CellKind::Time => Value::String(format_time(&NaiveDateTime::from_cell(text)?)),
        CellKind::Unsupported(name) => return Err(CoerceError::Unsupported(name.clone())),
    })
}

/// Cell text for a JSON value, rendered the way the matching Rust type would be.
/// Values of unsupported kinds export their JSON text.
fn render(kind: &CellKind, value: &Value) -> Result<Option<String>, CoerceError> {
    let mismatch = || CoerceError::Mismatch(kind.clone());
    match kind {
        CellKind::Integer => value.as_i64().map(|n| n.to_cell()).ok_or_else(mismatch),
        CellKind::Float => value.as_f64().map(|n| n.to_cell()).ok_or_else(mismatch),
        CellKind::Boolean => value.as_bool().map(|b| b.to_cell()).ok_or_else(mismatch),
        CellKind::Text => value
            .as_str()
            .map(|text| text.to_string().to_cell())
            .ok_or_else(mismatch),
        CellKind::Time => value
            .as_str()
            .and_then(parse_time)
            .map(|t| t.to_cell())
            .ok_or_else(mismatch),
        CellKind::Unsupported(_) => Ok(match value {
            Value::String(text) if text.is_empty() => None,
            Value::String(text) => Some(text.clone()),
            other => Some(other.to_string()),
        }),
    }
}

fn yaml_shape(value: &serde_yaml::Value) -> &'static str {
    match value {
        serde_yaml::Value::Null => "null",
        serde_yaml::Value::Bool(_) => "a boolean",
        serde_yaml::Value::Number(_) => "a number",
        serde_yaml::Value::String(_) => "a string",
        serde_yaml::Value::Sequence(_) => "a sequence",
        serde_yaml::Value::Mapping(_) => "a mapping without `fields`",
        serde_yaml::Value::Tagged(_) => "a tagged value",
    }
}

fn json_shape(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Interpret a JSON document as an export source: `null` is nil, an object is
/// one record, an array of objects is a sequence. Anything else is unsupported.
pub fn source_from_json(value: &Value) -> Source<'_, DynRecord> {
    match value {
        Value::Null => Source::Nil,
        Value::Object(record) => Source::One(record),
        Value::Array(items) => {
            let mut records = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::Object(record) => records.push(record),
                    other => {
                        return Source::Unsupported(format!("array of {}", json_shape(other)))
                    }
                }
            }
            Source::Many(records)
        }
        other => Source::Unsupported(json_shape(other).to_string()),
    }
}

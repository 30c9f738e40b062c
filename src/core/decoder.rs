//! Row decoder: raw grid → records

use crate::core::extractor::{extract, Columns};
use crate::core::schema::{Field, Schema};
use crate::core::Mapper;
use crate::error::{MapperError, MapperResult};
use std::collections::HashSet;
use tracing::debug;

/// A header column bound to a record field
struct Binding<'s, R> {
    col: usize,
    required: bool,
    field: &'s Field<R>,
}

/// Imports a grid into records of one schema.
///
/// Header cells that match no column are ignored. Required columns missing
/// from the header fail the whole import before any data row is read.
pub struct ImportMapper<'a, R> {
    grid: &'a [Vec<String>],
    schema: &'a Schema<R>,
    excluded: HashSet<String>,
}

impl<'a, R> ImportMapper<'a, R> {
    pub fn new(grid: &'a [Vec<String>], schema: &'a Schema<R>) -> Self {
        Self {
            grid,
            schema,
            excluded: HashSet::new(),
        }
    }

    /// Leave these display names out of the import entirely
    pub fn filter<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded.extend(names.into_iter().map(Into::into));
        self
    }

    fn bind_header(&self, columns: &Columns, header: &[String]) -> MapperResult<Vec<Binding<'a, R>>> {
        let mut pending: Vec<&str> = columns.required_names().collect();
        let mut bindings = Vec::new();

        for (col, name) in header.iter().enumerate() {
            if name.is_empty() {
                continue;
            }
            let Some(descriptor) = columns.get(name) else {
                continue;
            };
            let field = self.schema.field(&descriptor.field_key)?;
            pending.retain(|required| *required != name.as_str());
            bindings.push(Binding {
                col,
                required: descriptor.required,
                field,
            });
        }

        if let Some(missing) = pending.first() {
            return Err(MapperError::MissingRequiredColumn(missing.to_string()));
        }
        Ok(bindings)
    }

    /// `row_number` and the reported column are 1-based, as a spreadsheet shows them
    fn decode_row(
        &self,
        row_number: usize,
        row: &[String],
        bindings: &[Binding<'a, R>],
    ) -> MapperResult<R> {
        let mut record = self.schema.new_record();

        for binding in bindings {
            let text = row.get(binding.col).map(String::as_str).unwrap_or("");
            if text.is_empty() {
                if binding.required {
                    return Err(MapperError::MissingRequiredParameter {
                        row: row_number,
                        col: binding.col + 1,
                    });
                }
                continue;
            }

            binding
                .field
                .write(&mut record, text)
                .map_err(|err| {
                    MapperError::coerce(err, binding.field.key(), row_number, binding.col + 1)
                })?;
        }

        Ok(record)
    }
}

impl<R> Mapper for ImportMapper<'_, R> {
    type Output = Vec<R>;

    fn run(&self) -> MapperResult<Vec<R>> {
        let columns = extract(self.schema, &self.excluded)?;

        let mut rows = self.grid.iter().enumerate();
        let Some((_, header)) = rows.next() else {
            return Ok(Vec::new());
        };
        let bindings = self.bind_header(&columns, header)?;
        debug!(
            record = self.schema.type_name(),
            bound = bindings.len(),
            header_cells = header.len(),
            "bound header columns"
        );

        let mut records = Vec::with_capacity(self.grid.len() - 1);
        for (idx, row) in rows {
            records.push(self.decode_row(idx + 1, row, &bindings)?);
        }

        debug!(records = records.len(), "decoded rows");
        Ok(records)
    }
}

/// Decode every data row of `grid` into a record of `schema`
pub fn decode<R>(schema: &Schema<R>, grid: &[Vec<String>]) -> MapperResult<Vec<R>> {
    ImportMapper::new(grid, schema).run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CellKind, Opaque};
    use chrono::{NaiveDate, NaiveDateTime};
    use pretty_assertions::assert_eq;

    #[derive(Debug, Default, PartialEq)]
    struct Visit {
        id: i64,
        guest: String,
        score: f64,
        vip: bool,
        arrived: Option<NaiveDateTime>,
    }

    fn visit_schema() -> Schema<Visit> {
        Schema::<Visit>::builder()
            .field("id", "*ID", |v| &v.id, |v| &mut v.id)
            .field("guest", "*Guest", |v| &v.guest, |v| &mut v.guest)
            .field("score", "Score", |v| &v.score, |v| &mut v.score)
            .field("vip", "VIP", |v| &v.vip, |v| &mut v.vip)
            .field("arrived", "Arrived", |v| &v.arrived, |v| &mut v.arrived)
            .build()
    }

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_decode_all_kinds() {
        let data = grid(&[
            &["ID", "Guest", "Score", "VIP", "Arrived"],
            &["1", "Ada", "9.5", "true", "2022-07-30 14:48:00"],
            &["2", "Grace", "7", "F", ""],
        ]);
        let visits = decode(&visit_schema(), &data).unwrap();
        assert_eq!(
            visits,
            vec![
                Visit {
                    id: 1,
                    guest: "Ada".into(),
                    score: 9.5,
                    vip: true,
                    arrived: Some(
                        NaiveDate::from_ymd_opt(2022, 7, 30)
                            .unwrap()
                            .and_hms_opt(14, 48, 0)
                            .unwrap()
                    ),
                },
                Visit {
                    id: 2,
                    guest: "Grace".into(),
                    score: 7.0,
                    vip: false,
                    arrived: None,
                },
            ]
        );
    }

    #[test]
    fn test_header_order_and_extra_columns() {
        let data = grid(&[
            &["Unknown", "Guest", "", "ID"],
            &["ignored", "Linus", "x", "3"],
        ]);
        let visits = decode(&visit_schema(), &data).unwrap();
        assert_eq!(visits.len(), 1);
        assert_eq!(visits[0].id, 3);
        assert_eq!(visits[0].guest, "Linus");
        assert_eq!(visits[0].score, 0.0);
    }

    #[test]
    fn test_missing_required_column() {
        let data = grid(&[&["ID", "Score"], &["1", "2.0"]]);
        let err = decode(&visit_schema(), &data).unwrap_err();
        assert!(matches!(err, MapperError::MissingRequiredColumn(ref name) if name == "Guest"));
        assert_eq!(err.code(), -2);
    }

    #[test]
    fn test_missing_required_column_without_data_rows() {
        let data = grid(&[&["Score"]]);
        assert!(matches!(
            decode(&visit_schema(), &data),
            Err(MapperError::MissingRequiredColumn(_))
        ));
    }

    #[test]
    fn test_missing_required_cell() {
        let data = grid(&[&["ID", "Guest"], &["1", "Ada"], &["2", ""]]);
        let err = decode(&visit_schema(), &data).unwrap_err();
        assert!(matches!(
            err,
            MapperError::MissingRequiredParameter { row: 3, col: 2 }
        ));
    }

    #[test]
    fn test_short_row_counts_as_empty() {
        let data = grid(&[&["Guest", "ID", "Score"], &["Ada", "1"]]);
        let visits = decode(&visit_schema(), &data).unwrap();
        assert_eq!(visits[0].score, 0.0);

        let data = grid(&[&["Score", "Guest", "ID"], &["1.0", "Ada"]]);
        let err = decode(&visit_schema(), &data).unwrap_err();
        assert!(matches!(
            err,
            MapperError::MissingRequiredParameter { row: 2, col: 3 }
        ));
    }

    #[test]
    fn test_type_mismatch_names_kind() {
        let data = grid(&[&["ID", "Guest"], &["abc", "Ada"]]);
        let err = decode(&visit_schema(), &data).unwrap_err();
        match &err {
            MapperError::ParameterType { row, col, kind } => {
                assert_eq!((*row, *col), (2, 1));
                assert_eq!(*kind, CellKind::Integer);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains("integer"));

        let data = grid(&[&["ID", "Guest", "Arrived"], &["1", "Ada", "30/07/2022"]]);
        let err = decode(&visit_schema(), &data).unwrap_err();
        assert!(err.to_string().contains("time"));

        let data = grid(&[&["ID", "Guest", "VIP"], &["1", "Ada", "maybe"]]);
        let err = decode(&visit_schema(), &data).unwrap_err();
        assert!(err.to_string().contains("boolean"));

        let data = grid(&[
            &["Guest", "ID", "Score"],
            &["Ada", "1", "9.5"],
            &["Bob", "2", "high"],
        ]);
        let err = decode(&visit_schema(), &data).unwrap_err();
        assert!(matches!(
            err,
            MapperError::ParameterType { row: 3, col: 3, kind: CellKind::Float }
        ));
        assert!(err.to_string().contains("expected float, at [3,3]"));
    }

    #[test]
    fn test_fail_fast_returns_no_partial_result() {
        let data = grid(&[&["ID", "Guest"], &["1", "Ada"], &["oops", "Bob"], &["3", "Cy"]]);
        assert!(decode(&visit_schema(), &data).is_err());
    }

    #[test]
    fn test_empty_grid_and_header_only() {
        assert!(decode(&visit_schema(), &[]).unwrap().is_empty());
        let data = grid(&[&["ID", "Guest"]]);
        assert!(decode(&visit_schema(), &data).unwrap().is_empty());
    }

    #[test]
    fn test_filter_drops_required_column() {
        let data = grid(&[&["ID", "Score"], &["1", "2.5"]]);
        let visits = ImportMapper::new(&data, &visit_schema())
            .filter(["Guest"])
            .run()
            .unwrap();
        assert_eq!(visits[0].score, 2.5);
        assert_eq!(visits[0].guest, "");
    }

    #[test]
    fn test_unsupported_field_type() {
        #[derive(Debug, Default)]
        struct Tagged {
            code: Opaque<char>,
        }
        let schema = Schema::<Tagged>::builder()
            .field("code", "Code", |t| &t.code, |t| &mut t.code)
            .build();

        let data = grid(&[&["Code"], &["Z"]]);
        let err = decode(&schema, &data).unwrap_err();
        assert!(matches!(
            err,
            MapperError::TypeNotSupported { ref field, .. } if field == "code"
        ));

        // Empty cells never reach the parser
        let data = grid(&[&["Code"], &[""]]);
        assert_eq!(decode(&schema, &data).unwrap().len(), 1);
    }
}

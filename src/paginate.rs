//! Row-by-row access to raw trips for paging through a selection.

use serde::{Serialize, Serializer};
use std::iter::FusedIterator;

use crate::table::{Column, TripTable, Value};

/// Columns shown for every trip, in display order. Gender and Birth Year are
/// inserted before User Type when the table carries them.
const BASE_COLUMNS: [Column; 5] = [
    Column::StartTime,
    Column::EndTime,
    Column::TripDuration,
    Column::StartStation,
    Column::EndStation,
];

/// One trip restricted to the raw-data columns.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub index: usize,
    pub fields: Vec<(Column, Option<Value>)>,
}

impl RawRow {
    pub fn get(&self, column: Column) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(c, _)| *c == column)
            .and_then(|(_, v)| v.as_ref())
    }

    pub fn has(&self, column: Column) -> bool {
        self.fields.iter().any(|(c, _)| *c == column)
    }
}

impl Serialize for RawRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.fields.iter().map(|(c, v)| (c.header(), v)))
    }
}

/// Lazily yields [`RawRow`]s from a starting index until the table ends.
pub struct RawRows<'a> {
    table: &'a TripTable,
    columns: Vec<Column>,
    next: usize,
}

impl Iterator for RawRows<'_> {
    type Item = RawRow;

    fn next(&mut self) -> Option<RawRow> {
        let record = self.table.row(self.next)?;
        let row = RawRow {
            index: self.next,
            fields: self
                .columns
                .iter()
                .map(|&c| (c, record.value(c)))
                .collect(),
        };
        self.next += 1;
        Some(row)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.table.len().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for RawRows<'_> {}

impl FusedIterator for RawRows<'_> {}

/// The raw-data columns available for `table`.
pub fn raw_columns(table: &TripTable) -> Vec<Column> {
    let mut columns = BASE_COLUMNS.to_vec();
    for optional in [Column::Gender, Column::BirthYear] {
        if table.has_column(optional) {
            columns.push(optional);
        }
    }
    columns.push(Column::UserType);
    columns
}

/// Rows of `table` from `start` onwards. Holds no state between calls, so
/// callers resume by passing the index after the last row they saw. A start
/// at or past the end yields nothing.
pub fn rows(table: &TripTable, start: usize) -> RawRows<'_> {
    RawRows {
        table,
        columns: raw_columns(table),
        next: start,
    }
}

/// At most `size` rows starting at `start`.
pub fn page(table: &TripTable, start: usize, size: usize) -> Vec<RawRow> {
    rows(table, start).take(size).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Schema;
    use crate::table::tests::{at, trip};

    fn three_rows(schema: Schema) -> TripTable {
        TripTable::new(
            schema,
            vec![
                trip(at(2017, 1, 2, 8), "A", "B", 60.0),
                trip(at(2017, 1, 2, 9), "B", "C", 120.0),
                trip(at(2017, 1, 3, 10), "C", "A", 180.0).with_birth_year(Some(1990)),
            ],
        )
    }

    #[test]
    fn test_rows_from_middle() {
        let table = three_rows(Schema::default());
        let mut it = rows(&table, 2);
        assert_eq!(it.len(), 1);
        let last = it.next().unwrap();
        assert_eq!(last.index, 2);
        assert_eq!(last.get(Column::StartStation), Some(&Value::Text("C".into())));
        assert!(it.next().is_none());
        assert!(it.next().is_none());
    }

    #[test]
    fn test_rows_past_end() {
        let table = three_rows(Schema::default());
        assert_eq!(rows(&table, 5).count(), 0);
        assert_eq!(rows(&table, 3).count(), 0);
    }

    #[test]
    fn test_restartable_from_any_index() {
        let table = three_rows(Schema::default());
        let first: Vec<_> = rows(&table, 1).collect();
        let again: Vec<_> = rows(&table, 1).collect();
        assert_eq!(first, again);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_projection_without_optional_columns() {
        let table = three_rows(Schema::default());
        let row = rows(&table, 0).next().unwrap();
        assert_eq!(row.fields.len(), 6);
        assert!(!row.has(Column::Gender));
        assert!(!row.has(Column::BirthYear));
        assert!(row.has(Column::UserType));
    }

    #[test]
    fn test_projection_with_optional_columns() {
        let table = three_rows(Schema {
            has_gender: true,
            has_birth_year: true,
        });
        let columns = raw_columns(&table);
        assert_eq!(columns.len(), 8);
        assert_eq!(columns.last(), Some(&Column::UserType));

        let all: Vec<_> = rows(&table, 0).collect();
        // Present in the schema but missing in this row
        assert!(all[0].has(Column::Gender));
        assert_eq!(all[0].get(Column::Gender), None);
        assert_eq!(all[2].get(Column::BirthYear), Some(&Value::Int(1990)));
    }

    #[test]
    fn test_page_sizes() {
        let table = three_rows(Schema::default());
        assert_eq!(page(&table, 0, 5).len(), 3);
        assert_eq!(page(&table, 1, 1).len(), 1);
        assert!(page(&table, 3, 5).is_empty());
    }

    #[test]
    fn test_serialize_uses_headers() {
        let table = three_rows(Schema::default());
        let row = rows(&table, 0).next().unwrap();
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["Start Station"], "A");
        assert_eq!(json["Trip Duration"], 60.0);
        assert_eq!(json["Start Time"], "2017-01-02 08:00:00");
    }
}

//! Frequency and numeric reductions over a [`TripTable`].
//!
//! Missing cells are skipped. Ties in any frequency ranking are broken by
//! first-seen order: among values with the same count, the one whose first
//! occurrence comes earliest in the table wins.

use serde::Serialize;
use std::collections::HashMap;
use std::hash::Hash;

use crate::error::{BikeshareError, Result};
use crate::table::{Column, TripRecord, TripTable, Value};

/// Most frequent value of one or two columns and how many rows hold it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModeResult<T> {
    pub value: T,
    pub count: usize,
}

/// Distinct keys with their counts, kept in first-seen order.
struct Tally<K> {
    index: HashMap<K, usize>,
    counts: Vec<(K, usize)>,
}

impl<K: Eq + Hash + Clone> Tally<K> {
    fn from_keys(keys: impl Iterator<Item = K>) -> Self {
        let mut tally = Tally {
            index: HashMap::new(),
            counts: Vec::new(),
        };
        for key in keys {
            match tally.index.get(&key) {
                Some(&i) => tally.counts[i].1 += 1,
                None => {
                    tally.index.insert(key.clone(), tally.counts.len());
                    tally.counts.push((key, 1));
                }
            }
        }
        tally
    }

    fn into_mode(self) -> Option<ModeResult<K>> {
        let mut best: Option<(K, usize)> = None;
        for (key, count) in self.counts {
            // Strictly greater keeps the earliest of tied keys
            if best.as_ref().is_none_or(|(_, c)| count > *c) {
                best = Some((key, count));
            }
        }
        best.map(|(value, count)| ModeResult { value, count })
    }

    fn into_ranked(self) -> Vec<(K, usize)> {
        let mut counts = self.counts;
        // Stable sort preserves first-seen order among equal counts
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts
    }
}

fn ensure_column(table: &TripTable, column: Column) -> Result<()> {
    if table.has_column(column) {
        Ok(())
    } else {
        Err(BikeshareError::ColumnNotFound(column))
    }
}

fn present(table: &TripTable, column: Column) -> impl Iterator<Item = Value> + '_ {
    table.rows().iter().filter_map(move |r: &TripRecord| r.value(column))
}

/// Most frequent value in `column`.
///
/// # Errors
///
/// [`BikeshareError::EmptyColumn`] when the table has no rows (or the column
/// holds only missing values), [`BikeshareError::ColumnNotFound`] when the
/// table's schema lacks the column.
pub fn mode(table: &TripTable, column: Column) -> Result<ModeResult<Value>> {
    ensure_column(table, column)?;
    Tally::from_keys(present(table, column))
        .into_mode()
        .ok_or(BikeshareError::EmptyColumn(column))
}

/// Most frequent `(a, b)` pair, counting each row's two values as one key.
/// Rows missing either value are skipped.
pub fn joint_mode(table: &TripTable, a: Column, b: Column) -> Result<ModeResult<(Value, Value)>> {
    ensure_column(table, a)?;
    ensure_column(table, b)?;
    let pairs = table
        .rows()
        .iter()
        .filter_map(|r| Some((r.value(a)?, r.value(b)?)));
    Tally::from_keys(pairs)
        .into_mode()
        .ok_or(BikeshareError::EmptyColumn(a))
}

/// Every distinct value of `column` with its count, most frequent first.
/// An empty table yields an empty list.
pub fn value_counts(table: &TripTable, column: Column) -> Result<Vec<(Value, usize)>> {
    ensure_column(table, column)?;
    Ok(Tally::from_keys(present(table, column)).into_ranked())
}

fn numeric(table: &TripTable, column: Column) -> Result<Vec<f64>> {
    ensure_column(table, column)?;
    if !column.is_numeric() {
        return Err(BikeshareError::NotNumeric(column));
    }
    let values: Vec<f64> = present(table, column).filter_map(|v| v.as_f64()).collect();
    if values.is_empty() {
        return Err(BikeshareError::EmptyColumn(column));
    }
    Ok(values)
}

pub fn sum(table: &TripTable, column: Column) -> Result<f64> {
    Ok(numeric(table, column)?.iter().sum())
}

/// Arithmetic mean over the column's present values.
pub fn mean(table: &TripTable, column: Column) -> Result<f64> {
    let values = numeric(table, column)?;
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

pub fn min(table: &TripTable, column: Column) -> Result<f64> {
    Ok(numeric(table, column)?.into_iter().fold(f64::INFINITY, f64::min))
}

pub fn max(table: &TripTable, column: Column) -> Result<f64> {
    Ok(numeric(table, column)?
        .into_iter()
        .fold(f64::NEG_INFINITY, f64::max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::filter;
    use crate::table::Schema;
    use crate::table::tests::{at, trip};
    use chrono::Weekday;

    fn table(rows: Vec<TripRecord>) -> TripTable {
        TripTable::new(Schema::default(), rows)
    }

    // Two Monday trips in January and a Tuesday trip in February
    fn calendar() -> TripTable {
        table(vec![
            trip(at(2017, 1, 2, 8), "A", "B", 60.0),
            trip(at(2017, 1, 2, 9), "A", "C", 120.0),
            trip(at(2017, 2, 7, 9), "B", "C", 300.0),
        ])
    }

    #[test]
    fn test_mode_month() {
        let result = mode(&calendar(), Column::Month).unwrap();
        assert_eq!(result.value, Value::Int(1));
        assert_eq!(result.count, 2);
    }

    #[test]
    fn test_filter_then_mode_on_empty_selection() {
        let january = filter(&calendar(), Some(1), None);
        assert_eq!(january.len(), 2);

        let tuesday = filter(&january, None, Some(Weekday::Tue));
        assert_eq!(tuesday.len(), 0);

        let err = mode(&tuesday, Column::Month).unwrap_err();
        assert!(matches!(err, BikeshareError::EmptyColumn(Column::Month)));
    }

    #[test]
    fn test_mode_count_dominates_other_values() {
        let t = calendar();
        for column in [Column::StartStation, Column::EndStation, Column::Hour, Column::DayOfWeek] {
            let m = mode(&t, column).unwrap();
            let counts = value_counts(&t, column).unwrap();
            let own = counts.iter().find(|(v, _)| *v == m.value).unwrap().1;
            assert_eq!(own, m.count);
            assert!(counts.iter().all(|(_, c)| *c <= m.count));
        }
    }

    #[test]
    fn test_mode_tie_breaks_first_seen() {
        let t = table(vec![
            trip(at(2017, 1, 2, 8), "Z", "B", 60.0),
            trip(at(2017, 1, 2, 9), "A", "B", 60.0),
            trip(at(2017, 1, 2, 9), "A", "B", 60.0),
            trip(at(2017, 1, 2, 8), "Z", "B", 60.0),
        ]);
        let m = mode(&t, Column::StartStation).unwrap();
        assert_eq!(m.value, Value::Text("Z".into()));
        assert_eq!(m.count, 2);

        // hour 8 and hour 9 tie; 8 comes first
        assert_eq!(mode(&t, Column::Hour).unwrap().value, Value::Int(8));
    }

    #[test]
    fn test_joint_mode_not_above_marginals() {
        let t = table(vec![
            trip(at(2017, 1, 2, 8), "A", "B", 60.0),
            trip(at(2017, 1, 2, 9), "A", "C", 60.0),
            trip(at(2017, 1, 2, 9), "A", "B", 60.0),
            trip(at(2017, 1, 2, 9), "D", "B", 60.0),
        ]);
        let joint = joint_mode(&t, Column::StartStation, Column::EndStation).unwrap();
        assert_eq!(joint.value, (Value::Text("A".into()), Value::Text("B".into())));
        assert_eq!(joint.count, 2);

        let start = mode(&t, Column::StartStation).unwrap();
        let end = mode(&t, Column::EndStation).unwrap();
        assert!(joint.count <= start.count);
        assert!(joint.count <= end.count);
    }

    #[test]
    fn test_value_counts_ranked() {
        let t = table(vec![
            trip(at(2017, 1, 2, 8), "A", "B", 60.0).with_user_type(Some("Customer".into())),
            trip(at(2017, 1, 2, 9), "A", "B", 60.0),
            trip(at(2017, 1, 2, 9), "A", "B", 60.0),
            trip(at(2017, 1, 2, 9), "A", "B", 60.0).with_user_type(None),
        ]);
        let counts = value_counts(&t, Column::UserType).unwrap();
        assert_eq!(
            counts,
            vec![
                (Value::Text("Subscriber".into()), 2),
                (Value::Text("Customer".into()), 1),
            ]
        );
    }

    #[test]
    fn test_numeric_reductions() {
        let t = calendar();
        assert_eq!(sum(&t, Column::TripDuration).unwrap(), 480.0);
        assert_eq!(mean(&t, Column::TripDuration).unwrap(), 160.0);
        assert_eq!(min(&t, Column::TripDuration).unwrap(), 60.0);
        assert_eq!(max(&t, Column::TripDuration).unwrap(), 300.0);
        assert_eq!(
            mean(&t, Column::TripDuration).unwrap(),
            sum(&t, Column::TripDuration).unwrap() / t.len() as f64
        );
    }

    #[test]
    fn test_reductions_on_empty_table_fail() {
        let empty = table(vec![]);
        for result in [
            sum(&empty, Column::TripDuration),
            mean(&empty, Column::TripDuration),
            min(&empty, Column::TripDuration),
            max(&empty, Column::TripDuration),
        ] {
            assert!(matches!(result, Err(BikeshareError::EmptyColumn(Column::TripDuration))));
        }
        assert!(matches!(
            mode(&empty, Column::DayOfWeek),
            Err(BikeshareError::EmptyColumn(_))
        ));
        assert!(matches!(
            joint_mode(&empty, Column::StartStation, Column::EndStation),
            Err(BikeshareError::EmptyColumn(_))
        ));
    }

    #[test]
    fn test_missing_and_non_numeric_columns() {
        let t = calendar();
        assert!(matches!(
            mode(&t, Column::Gender),
            Err(BikeshareError::ColumnNotFound(Column::Gender))
        ));
        assert!(matches!(
            mean(&t, Column::StartStation),
            Err(BikeshareError::NotNumeric(Column::StartStation))
        ));
    }
}

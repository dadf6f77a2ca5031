use crate::error::{BikeshareError, Result};
use crate::reports::types::{BirthYearStats, GenderBreakdown, UserReport, UserTypeCount};
use crate::stats::{max, min, mode, value_counts};
use crate::table::{Column, TripTable, Value};

/// User type breakdown plus gender and birth year statistics.
///
/// Gender and Birth Year are not published for every city. A table whose
/// schema lacks them, or a selection holding no values for them, produces
/// the `NoData` variants rather than an error.
#[tracing::instrument(skip(table), fields(rows = table.len()))]
pub fn user_report(table: &TripTable) -> Result<UserReport> {
    if table.is_empty() {
        return Err(BikeshareError::EmptyColumn(Column::UserType));
    }

    let user_types = value_counts(table, Column::UserType)?
        .into_iter()
        .map(|(value, count)| UserTypeCount {
            user_type: value.to_string(),
            count,
        })
        .collect();

    Ok(UserReport {
        user_types,
        gender: gender_breakdown(table)?,
        birth_years: birth_year_stats(table)?,
    })
}

fn gender_breakdown(table: &TripTable) -> Result<GenderBreakdown> {
    if !table.has_column(Column::Gender) {
        return Ok(GenderBreakdown::NoData);
    }

    let counts = value_counts(table, Column::Gender)?;
    if counts.is_empty() {
        return Ok(GenderBreakdown::NoData);
    }

    let count_of = |label: &str| {
        counts
            .iter()
            .find(|(v, _)| v.as_str() == Some(label))
            .map_or(0, |(_, c)| *c)
    };

    Ok(GenderBreakdown::Counts {
        male: count_of("Male"),
        female: count_of("Female"),
    })
}

fn birth_year_stats(table: &TripTable) -> Result<BirthYearStats> {
    if !table.has_column(Column::BirthYear) {
        return Ok(BirthYearStats::NoData);
    }

    let earliest = match min(table, Column::BirthYear) {
        Ok(year) => year,
        Err(BikeshareError::EmptyColumn(_)) => return Ok(BirthYearStats::NoData),
        Err(e) => return Err(e),
    };
    let most_recent = max(table, Column::BirthYear)?;
    let common = mode(table, Column::BirthYear)?;

    let most_common = match common.value {
        Value::Int(year) => year as i32,
        _ => return Err(BikeshareError::NotNumeric(Column::BirthYear)),
    };

    Ok(BirthYearStats::Stats {
        earliest: earliest as i32,
        most_recent: most_recent as i32,
        most_common,
        most_common_count: common.count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::tests::{at, trip};
    use crate::table::{Schema, TripRecord};

    fn with_demographics(gender: Option<&str>, year: Option<i32>) -> TripRecord {
        trip(at(2017, 3, 6, 17), "A", "B", 60.0)
            .with_gender(gender.map(String::from))
            .with_birth_year(year)
    }

    fn full_schema() -> Schema {
        Schema {
            has_gender: true,
            has_birth_year: true,
        }
    }

    #[test]
    fn test_user_report_with_demographics() {
        let table = TripTable::new(
            full_schema(),
            vec![
                with_demographics(Some("Male"), Some(1985)),
                with_demographics(Some("Female"), Some(1992)),
                with_demographics(Some("Male"), Some(1992)),
                with_demographics(None, None)
                    .with_user_type(Some("Customer".into())),
            ],
        );

        let report = user_report(&table).unwrap();
        assert_eq!(
            report.user_types,
            vec![
                UserTypeCount {
                    user_type: "Subscriber".into(),
                    count: 3
                },
                UserTypeCount {
                    user_type: "Customer".into(),
                    count: 1
                },
            ]
        );
        assert_eq!(report.gender, GenderBreakdown::Counts { male: 2, female: 1 });
        assert_eq!(
            report.birth_years,
            BirthYearStats::Stats {
                earliest: 1985,
                most_recent: 1992,
                most_common: 1992,
                most_common_count: 2,
            }
        );
    }

    #[test]
    fn test_user_report_without_optional_columns() {
        let table = TripTable::new(
            Schema::default(),
            vec![trip(at(2017, 3, 6, 17), "A", "B", 60.0)],
        );
        let report = user_report(&table).unwrap();
        assert_eq!(report.gender, GenderBreakdown::NoData);
        assert_eq!(report.birth_years, BirthYearStats::NoData);
        assert_eq!(report.user_types.len(), 1);
    }

    #[test]
    fn test_user_report_all_missing_values() {
        let table = TripTable::new(full_schema(), vec![with_demographics(None, None)]);
        let report = user_report(&table).unwrap();
        assert_eq!(report.gender, GenderBreakdown::NoData);
        assert_eq!(report.birth_years, BirthYearStats::NoData);
    }

    #[test]
    fn test_user_report_empty_table() {
        let table = TripTable::new(full_schema(), vec![]);
        assert!(matches!(
            user_report(&table),
            Err(BikeshareError::EmptyColumn(_))
        ));
    }
}

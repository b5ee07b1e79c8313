//! Spreadsheet serial dates
//!
//! Spreadsheet formulas see timestamps as fractional day counts since 1899-12-30. Timestamps
//! before 1900-01-01 have no serial and read as null.

use crate::series::{ColumnData, ColumnKind, Series};
use crate::table::Table;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::borrow::Cow;

const SECONDS_PER_DAY: f64 = 86_400.0;
const NANOS_PER_DAY: f64 = 86_400_000_000_000.0;

/// Largest serial accepted when converting back (9999-12-31)
const MAX_SERIAL: f64 = 2_958_465.0;

fn midnight(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

/// Day zero of the serial scale
pub fn serial_epoch() -> NaiveDateTime {
    midnight(1899, 12, 30)
}

/// Earliest timestamp with a serial
pub fn first_serial_date() -> NaiveDateTime {
    midnight(1900, 1, 1)
}

/// Fractional days since [`serial_epoch`], or `None` before 1900-01-01
pub fn datetime_to_serial(dt: NaiveDateTime) -> Option<f64> {
    if dt < first_serial_date() {
        return None;
    }
    let delta = dt - serial_epoch();
    let seconds = delta.num_seconds();
    let nanos = (delta - Duration::seconds(seconds))
        .num_nanoseconds()
        .unwrap_or(0);
    Some(seconds as f64 / SECONDS_PER_DAY + nanos as f64 / NANOS_PER_DAY)
}

/// Timestamp for a serial, or `None` outside the supported range
pub fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || !(0.0..=MAX_SERIAL).contains(&serial) {
        return None;
    }
    let days = serial.floor();
    let nanos = ((serial - days) * NANOS_PER_DAY).round() as i64;
    serial_epoch()
        .checked_add_signed(Duration::days(days as i64))?
        .checked_add_signed(Duration::nanoseconds(nanos))
}

/// Replace every datetime column with its serial numbers
///
/// Tables without datetime columns are returned as they are, without copying.
pub fn prepare_for_spreadsheet(table: &Table) -> Cow<'_, Table> {
    let has_datetimes = table
        .columns()
        .any(|(_, series)| series.kind() == ColumnKind::Datetime);
    if !has_datetimes {
        return Cow::Borrowed(table);
    }

    Cow::Owned(table.map_columns(|series| match series.data() {
        ColumnData::Datetime(values) => {
            Series::numeric(values.iter().map(|v| v.and_then(datetime_to_serial)))
        }
        _ => series.clone(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;
    use pretty_assertions::assert_eq;

    fn dt(year: i32, month: u32, day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_serial_values() {
        assert_eq!(datetime_to_serial(dt(1900, 1, 1)), Some(2.0));
        assert_eq!(datetime_to_serial(dt(1900, 2, 27)), Some(59.0));
        assert_eq!(datetime_to_serial(dt(2020, 3, 1)), Some(43891.0));
        assert_eq!(datetime_to_serial(dt(2019, 6, 1)), Some(43617.0));
    }

    #[test]
    fn test_time_of_day_is_fractional() {
        let noon = dt(2020, 3, 1) + Duration::hours(12);
        assert_eq!(datetime_to_serial(noon), Some(43891.5));
    }

    #[test]
    fn test_before_1900_has_no_serial() {
        assert_eq!(datetime_to_serial(dt(1899, 12, 31)), None);
    }

    #[test]
    fn test_serial_to_datetime() {
        assert_eq!(serial_to_datetime(43891.0), Some(dt(2020, 3, 1)));
        assert_eq!(
            serial_to_datetime(43891.25),
            Some(dt(2020, 3, 1) + Duration::hours(6))
        );
        assert_eq!(serial_to_datetime(-1.0), None);
        assert_eq!(serial_to_datetime(f64::NAN), None);
    }

    #[test]
    fn test_prepare_without_datetimes_borrows() {
        let table =
            Table::from_columns(vec![("A", Series::numeric(vec![Some(1.0)]))]).unwrap();
        assert!(matches!(prepare_for_spreadsheet(&table), Cow::Borrowed(_)));
    }

    #[test]
    fn test_prepare_converts_in_place() {
        let table = Table::from_columns(vec![
            ("A", Series::strings(vec![Some("x"), Some("y")])),
            (
                "B",
                Series::datetimes(vec![Some(dt(2020, 3, 1)), Some(dt(1850, 1, 1))]),
            ),
        ])
        .unwrap();

        let prepared = prepare_for_spreadsheet(&table);
        assert_eq!(
            prepared.column_names().collect::<Vec<_>>(),
            vec!["A", "B"]
        );
        assert_eq!(
            prepared.column("B").unwrap().values(),
            vec![Value::Number(43891.0), Value::Null]
        );
        assert_eq!(prepared.column("A"), table.column("A"));
    }
}

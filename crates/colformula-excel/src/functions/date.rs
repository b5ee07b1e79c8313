//! Date functions
//!
//! Dates are serial numbers: days since 1899-12-30, so 1900-01-01 is 2. This is the calendar
//! LibreOffice and Google Sheets use, and it is the one tables are converted to before a
//! formula sees them.

use super::arg;
use crate::error::FormulaResult;
use crate::value::{CellError, FormulaValue};
use chrono::{Datelike, Months, NaiveDate};
use colformula_core::serial::{serial_epoch, serial_to_datetime};

fn to_i64_trunc(v: &FormulaValue) -> Result<i64, FormulaValue> {
    match v {
        FormulaValue::Error(e) => Err(FormulaValue::Error(*e)),
        v => v
            .as_number()
            .map(|n| n.trunc() as i64)
            .ok_or(FormulaValue::Error(CellError::Value)),
    }
}

/// Serial of year/month/day, letting months and days overflow into the next unit
fn serial_from_parts(year: i64, month: i64, day: i64) -> Option<f64> {
    // Two-digit style years count from 1900
    let year = if (0..1900).contains(&year) {
        year + 1900
    } else {
        year
    };

    let months_from_jan = (month - 1).checked_add(year.checked_mul(12)?)?;
    let year = i32::try_from(months_from_jan.div_euclid(12)).ok()?;
    let month0 = months_from_jan.rem_euclid(12) as u32;

    let first = NaiveDate::from_ymd_opt(year, 1, 1)?.checked_add_months(Months::new(month0))?;
    let date = first.checked_add_signed(chrono::Duration::try_days(day - 1)?)?;

    let serial = (date - serial_epoch().date()).num_days();
    (serial >= 0).then_some(serial as f64)
}

fn date_from_serial(value: &FormulaValue) -> Result<NaiveDate, FormulaValue> {
    let serial = match value {
        FormulaValue::Error(e) => return Err(FormulaValue::Error(*e)),
        v => v.as_number().ok_or(FormulaValue::Error(CellError::Value))?,
    };
    serial_to_datetime(serial.floor())
        .map(|dt| dt.date())
        .ok_or(FormulaValue::Error(CellError::Num))
}

/// DATE(year, month, day)
pub fn fn_date(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    let parts = [arg(args, 0)?, arg(args, 1)?, arg(args, 2)?].map(to_i64_trunc);
    let [year, month, day] = match parts {
        [Ok(y), Ok(m), Ok(d)] => [y, m, d],
        [Err(e), _, _] | [_, Err(e), _] | [_, _, Err(e)] => return Ok(e),
    };
    Ok(serial_from_parts(year, month, day)
        .map(FormulaValue::Number)
        .unwrap_or(FormulaValue::Error(CellError::Num)))
}

fn date_part(args: &[FormulaValue], part: fn(&NaiveDate) -> i64) -> FormulaResult<FormulaValue> {
    Ok(match date_from_serial(arg(args, 0)?) {
        Ok(date) => FormulaValue::Number(part(&date) as f64),
        Err(e) => e,
    })
}

/// YEAR(serial)
pub fn fn_year(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    date_part(args, |d| i64::from(d.year()))
}

/// MONTH(serial)
pub fn fn_month(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    date_part(args, |d| i64::from(d.month()))
}

/// DAY(serial)
pub fn fn_day(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    date_part(args, |d| i64::from(d.day()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(v: f64) -> FormulaValue {
        FormulaValue::Number(v)
    }

    #[test]
    fn test_date() {
        assert_eq!(fn_date(&[n(2019.0), n(6.0), n(1.0)]).unwrap(), n(43617.0));
        assert_eq!(fn_date(&[n(2019.0), n(6.0), n(3.0)]).unwrap(), n(43619.0));
        assert_eq!(fn_date(&[n(1900.0), n(1.0), n(1.0)]).unwrap(), n(2.0));
    }

    #[test]
    fn test_date_overflow() {
        // Month 13 is January of the next year, day 0 is the last day of the previous month
        assert_eq!(
            fn_date(&[n(2019.0), n(13.0), n(1.0)]).unwrap(),
            fn_date(&[n(2020.0), n(1.0), n(1.0)]).unwrap()
        );
        assert_eq!(
            fn_date(&[n(2020.0), n(3.0), n(0.0)]).unwrap(),
            fn_date(&[n(2020.0), n(2.0), n(29.0)]).unwrap()
        );
    }

    #[test]
    fn test_date_two_digit_year() {
        assert_eq!(
            fn_date(&[n(119.0), n(6.0), n(1.0)]).unwrap(),
            n(43617.0)
        );
    }

    #[test]
    fn test_date_errors() {
        assert_eq!(
            fn_date(&[FormulaValue::String("x".into()), n(1.0), n(1.0)]).unwrap(),
            FormulaValue::Error(CellError::Value)
        );
        assert_eq!(
            fn_date(&[n(-5.0), n(1.0), n(1.0)]).unwrap(),
            FormulaValue::Error(CellError::Num)
        );
    }

    #[test]
    fn test_date_parts() {
        let serial = [n(43891.75)];
        assert_eq!(fn_year(&serial).unwrap(), n(2020.0));
        assert_eq!(fn_month(&serial).unwrap(), n(3.0));
        assert_eq!(fn_day(&serial).unwrap(), n(1.0));
        assert_eq!(
            fn_year(&[n(-1.0)]).unwrap(),
            FormulaValue::Error(CellError::Num)
        );
    }
}

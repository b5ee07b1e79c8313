//! Math and aggregate functions

use super::{arg, collect_numbers};
use crate::error::FormulaResult;
use crate::value::{CellError, FormulaValue};

/// Single numeric argument, or the error value to return instead
fn number_arg(args: &[FormulaValue], index: usize) -> FormulaResult<Result<f64, FormulaValue>> {
    Ok(match arg(args, index)? {
        FormulaValue::Error(e) => Err(FormulaValue::Error(*e)),
        v => v.as_number().ok_or(FormulaValue::Error(CellError::Value)),
    })
}

/// Unwrap a `Result<f64, FormulaValue>` or return the error value from the function
macro_rules! try_number {
    ($e:expr) => {
        match $e {
            Ok(n) => n,
            Err(v) => return Ok(v),
        }
    };
}

/// Finite numbers only; everything else is `#NUM!`
fn finite(n: f64) -> FormulaValue {
    if n.is_finite() {
        FormulaValue::Number(n)
    } else {
        FormulaValue::Error(CellError::Num)
    }
}

/// SUM function
pub fn fn_sum(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    let numbers = try_number!(collect_numbers(args));
    // `Iterator::sum` starts from -0.0
    Ok(FormulaValue::Number(numbers.iter().fold(0.0, |acc, n| acc + n)))
}

/// AVERAGE function
pub fn fn_average(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    let numbers = try_number!(collect_numbers(args));
    if numbers.is_empty() {
        return Ok(FormulaValue::Error(CellError::Div0));
    }
    Ok(FormulaValue::Number(
        numbers.iter().sum::<f64>() / numbers.len() as f64,
    ))
}

/// MIN function
pub fn fn_min(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    let numbers = try_number!(collect_numbers(args));
    let min = numbers.into_iter().reduce(f64::min).unwrap_or(0.0);
    Ok(FormulaValue::Number(min))
}

/// MAX function
pub fn fn_max(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    let numbers = try_number!(collect_numbers(args));
    let max = numbers.into_iter().reduce(f64::max).unwrap_or(0.0);
    Ok(FormulaValue::Number(max))
}

/// PRODUCT function
pub fn fn_product(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    let numbers = try_number!(collect_numbers(args));
    if numbers.is_empty() {
        return Ok(FormulaValue::Number(0.0));
    }
    Ok(finite(numbers.iter().product()))
}

/// COUNT function (numbers only)
pub fn fn_count(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    let count = args
        .iter()
        .flat_map(|arg| arg.scalars())
        .filter(|v| matches!(v, FormulaValue::Number(_)))
        .count();
    Ok(FormulaValue::Number(count as f64))
}

/// COUNTA function (anything that is not blank)
pub fn fn_counta(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    let count = args
        .iter()
        .flat_map(|arg| arg.scalars())
        .filter(|v| !matches!(v, FormulaValue::Empty))
        .count();
    Ok(FormulaValue::Number(count as f64))
}

/// ABS function
pub fn fn_abs(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    let n = try_number!(number_arg(args, 0)?);
    Ok(FormulaValue::Number(n.abs()))
}

/// ROUND(number, [num_digits])
///
/// Halves round away from zero.
pub fn fn_round(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    let n = try_number!(number_arg(args, 0)?);
    let digits = if args.len() > 1 {
        try_number!(number_arg(args, 1)?).trunc() as i32
    } else {
        0
    };

    let factor = 10f64.powi(digits.abs());
    let rounded = if digits >= 0 {
        (n * factor).round() / factor
    } else {
        (n / factor).round() * factor
    };
    Ok(finite(rounded))
}

/// INT function (round down to the nearest integer)
pub fn fn_int(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    let n = try_number!(number_arg(args, 0)?);
    Ok(FormulaValue::Number(n.floor()))
}

/// MOD(number, divisor)
///
/// The result has the sign of the divisor.
pub fn fn_mod(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    let n = try_number!(number_arg(args, 0)?);
    let d = try_number!(number_arg(args, 1)?);
    if d == 0.0 {
        return Ok(FormulaValue::Error(CellError::Div0));
    }
    Ok(FormulaValue::Number(n - d * (n / d).floor()))
}

/// SQRT function
pub fn fn_sqrt(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    let n = try_number!(number_arg(args, 0)?);
    if n < 0.0 {
        return Ok(FormulaValue::Error(CellError::Num));
    }
    Ok(FormulaValue::Number(n.sqrt()))
}

/// POWER(number, power)
pub fn fn_power(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    let base = try_number!(number_arg(args, 0)?);
    let exp = try_number!(number_arg(args, 1)?);
    if base == 0.0 && exp < 0.0 {
        return Ok(FormulaValue::Error(CellError::Div0));
    }
    Ok(finite(base.powf(exp)))
}

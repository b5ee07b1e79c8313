//! Text functions

use super::arg;
use crate::error::FormulaResult;
use crate::value::{CellError, FormulaValue};

/// Text of a scalar argument, or the error value to return instead
fn text_arg(args: &[FormulaValue], index: usize) -> FormulaResult<Result<String, FormulaValue>> {
    Ok(match arg(args, index)? {
        FormulaValue::Error(e) => Err(FormulaValue::Error(*e)),
        FormulaValue::Array(_) => Err(FormulaValue::Error(CellError::Value)),
        v => Ok(v.as_string()),
    })
}

/// Character count argument (truncated), or the error value to return instead
fn count_arg(args: &[FormulaValue], index: usize, default: i64) -> Result<i64, FormulaValue> {
    match args.get(index) {
        None => Ok(default),
        Some(FormulaValue::Error(e)) => Err(FormulaValue::Error(*e)),
        Some(v) => v
            .as_number()
            .map(|n| n.trunc() as i64)
            .ok_or(FormulaValue::Error(CellError::Value)),
    }
}

macro_rules! try_value {
    ($e:expr) => {
        match $e {
            Ok(v) => v,
            Err(v) => return Ok(v),
        }
    };
}

fn take_left(s: &str, n: usize) -> String {
    s.chars().take(n).collect()
}

fn take_right(s: &str, n: usize) -> String {
    let len = s.chars().count();
    s.chars().skip(len.saturating_sub(n)).collect()
}

/// LEN(text)
pub fn fn_len(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    let s = try_value!(text_arg(args, 0)?);
    Ok(FormulaValue::Number(s.chars().count() as f64))
}

/// LEFT(text, [num_chars])
pub fn fn_left(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    let s = try_value!(text_arg(args, 0)?);
    let n = try_value!(count_arg(args, 1, 1));
    if n < 0 {
        return Ok(FormulaValue::Error(CellError::Value));
    }
    Ok(FormulaValue::String(take_left(&s, n as usize)))
}

/// RIGHT(text, [num_chars])
pub fn fn_right(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    let s = try_value!(text_arg(args, 0)?);
    let n = try_value!(count_arg(args, 1, 1));
    if n < 0 {
        return Ok(FormulaValue::Error(CellError::Value));
    }
    Ok(FormulaValue::String(take_right(&s, n as usize)))
}

/// MID(text, start_num, num_chars)
pub fn fn_mid(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    let s = try_value!(text_arg(args, 0)?);
    let start = try_value!(count_arg(args, 1, 1));
    let n = try_value!(count_arg(args, 2, 0));
    if start < 1 || n < 0 {
        return Ok(FormulaValue::Error(CellError::Value));
    }
    Ok(FormulaValue::String(
        s.chars().skip(start as usize - 1).take(n as usize).collect(),
    ))
}

/// LOWER(text)
pub fn fn_lower(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    let s = try_value!(text_arg(args, 0)?);
    Ok(FormulaValue::String(s.to_lowercase()))
}

/// UPPER(text)
pub fn fn_upper(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    let s = try_value!(text_arg(args, 0)?);
    Ok(FormulaValue::String(s.to_uppercase()))
}

/// TRIM(text): strip the ends and collapse inner runs of spaces
pub fn fn_trim(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    let s = try_value!(text_arg(args, 0)?);
    Ok(FormulaValue::String(
        s.split_whitespace().collect::<Vec<_>>().join(" "),
    ))
}

/// CONCAT(text1, [text2], ...)
///
/// Also used for legacy CONCATENATE. Ranges contribute every cell in row order.
pub fn fn_concat(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    let mut out = String::new();
    for value in args.iter().flat_map(|arg| arg.scalars()) {
        if let FormulaValue::Error(e) = value {
            return Ok(FormulaValue::Error(*e));
        }
        out.push_str(&value.as_string());
    }
    Ok(FormulaValue::String(out))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> FormulaValue {
        FormulaValue::String(v.into())
    }

    fn n(v: f64) -> FormulaValue {
        FormulaValue::Number(v)
    }

    #[test]
    fn test_len() {
        assert_eq!(fn_len(&[s("héllo")]).unwrap(), n(5.0));
        assert_eq!(fn_len(&[n(123.0)]).unwrap(), n(3.0));
    }

    #[test]
    fn test_left_right_mid() {
        assert_eq!(fn_left(&[s("foo"), n(2.0)]).unwrap(), s("fo"));
        assert_eq!(fn_left(&[s("foo")]).unwrap(), s("f"));
        assert_eq!(fn_right(&[s("foo"), n(2.0)]).unwrap(), s("oo"));
        assert_eq!(fn_right(&[s("foo"), n(10.0)]).unwrap(), s("foo"));
        assert_eq!(fn_mid(&[s("abcdef"), n(2.0), n(3.0)]).unwrap(), s("bcd"));
        assert_eq!(
            fn_mid(&[s("abc"), n(0.0), n(1.0)]).unwrap(),
            FormulaValue::Error(CellError::Value)
        );
        assert_eq!(
            fn_left(&[s("abc"), n(-1.0)]).unwrap(),
            FormulaValue::Error(CellError::Value)
        );
    }

    #[test]
    fn test_case_and_trim() {
        assert_eq!(fn_lower(&[s("AbC")]).unwrap(), s("abc"));
        assert_eq!(fn_upper(&[s("AbC")]).unwrap(), s("ABC"));
        assert_eq!(fn_trim(&[s("  a   b ")]).unwrap(), s("a b"));
    }

    #[test]
    fn test_concat() {
        let range = FormulaValue::row(vec![s("a"), n(1.0), FormulaValue::Empty]);
        assert_eq!(fn_concat(&[range, s("-"), n(2.5)]).unwrap(), s("a1-2.5"));
        assert_eq!(
            fn_concat(&[s("a"), FormulaValue::Error(CellError::Ref)]).unwrap(),
            FormulaValue::Error(CellError::Ref)
        );
    }

    #[test]
    fn test_range_argument_is_value_error() {
        assert_eq!(
            fn_upper(&[FormulaValue::row(vec![s("a"), s("b")])]).unwrap(),
            FormulaValue::Error(CellError::Value)
        );
    }
}

//! Logical functions

use super::arg;
use crate::error::FormulaResult;
use crate::value::{CellError, FormulaValue};

/// Truth value of a condition argument
fn condition(value: &FormulaValue) -> Result<bool, FormulaValue> {
    match value {
        FormulaValue::Error(e) => Err(FormulaValue::Error(*e)),
        FormulaValue::Array(_) => Err(FormulaValue::Error(CellError::Value)),
        v => v.as_bool().ok_or(FormulaValue::Error(CellError::Value)),
    }
}

/// IF(condition, value_if_true, [value_if_false])
pub fn fn_if(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    let condition = match condition(arg(args, 0)?) {
        Ok(b) => b,
        Err(e) => return Ok(e),
    };

    if condition {
        Ok(arg(args, 1)?.clone())
    } else {
        Ok(args.get(2).cloned().unwrap_or(FormulaValue::Boolean(false)))
    }
}

/// Fold the truth values of every argument, skipping blanks and text inside ranges
fn fold_truth(
    args: &[FormulaValue],
    init: bool,
    combine: fn(bool, bool) -> bool,
) -> FormulaValue {
    let mut acc = init;
    for arg in args {
        let in_range = matches!(arg, FormulaValue::Array(_));
        for value in arg.scalars() {
            match value {
                FormulaValue::Error(e) => return FormulaValue::Error(*e),
                FormulaValue::Empty | FormulaValue::String(_) if in_range => {}
                v => match v.as_bool() {
                    Some(b) => acc = combine(acc, b),
                    None => return FormulaValue::Error(CellError::Value),
                },
            }
        }
    }
    FormulaValue::Boolean(acc)
}

/// AND function
pub fn fn_and(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    Ok(fold_truth(args, true, |a, b| a && b))
}

/// OR function
pub fn fn_or(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    Ok(fold_truth(args, false, |a, b| a || b))
}

/// NOT function
pub fn fn_not(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    Ok(match condition(arg(args, 0)?) {
        Ok(b) => FormulaValue::Boolean(!b),
        Err(e) => e,
    })
}

/// IFERROR(value, value_if_error)
pub fn fn_iferror(args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    let value = arg(args, 0)?;
    match value {
        FormulaValue::Error(_) => Ok(arg(args, 1)?.clone()),
        _ => Ok(value.clone()),
    }
}

/// TRUE()
pub fn fn_true(_args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    Ok(FormulaValue::Boolean(true))
}

/// FALSE()
pub fn fn_false(_args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
    Ok(FormulaValue::Boolean(false))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn b(v: bool) -> FormulaValue {
        FormulaValue::Boolean(v)
    }

    #[test]
    fn test_if() {
        let yes = FormulaValue::String("yes".into());
        let no = FormulaValue::String("no".into());
        assert_eq!(fn_if(&[b(true), yes.clone(), no.clone()]).unwrap(), yes);
        assert_eq!(
            fn_if(&[FormulaValue::Number(0.0), yes.clone(), no.clone()]).unwrap(),
            no
        );
        assert_eq!(fn_if(&[b(false), yes.clone()]).unwrap(), b(false));
        assert_eq!(
            fn_if(&[FormulaValue::String("x".into()), yes, no]).unwrap(),
            FormulaValue::Error(CellError::Value)
        );
    }

    #[test]
    fn test_if_blank_condition_is_false() {
        assert_eq!(
            fn_if(&[FormulaValue::Empty, b(true), FormulaValue::Number(3.0)]).unwrap(),
            FormulaValue::Number(3.0)
        );
    }

    #[test]
    fn test_and_or() {
        assert_eq!(fn_and(&[b(true), b(true)]).unwrap(), b(true));
        assert_eq!(fn_and(&[b(true), FormulaValue::Number(0.0)]).unwrap(), b(false));
        assert_eq!(fn_or(&[b(false), b(true)]).unwrap(), b(true));
        assert_eq!(fn_or(&[b(false), b(false)]).unwrap(), b(false));

        let range = FormulaValue::row(vec![b(true), FormulaValue::String("x".into())]);
        assert_eq!(fn_and(&[range]).unwrap(), b(true));
    }

    #[test]
    fn test_not() {
        assert_eq!(fn_not(&[b(true)]).unwrap(), b(false));
        assert_eq!(fn_not(&[FormulaValue::Number(0.0)]).unwrap(), b(true));
    }

    #[test]
    fn test_iferror() {
        let fallback = FormulaValue::String("oops".into());
        assert_eq!(
            fn_iferror(&[FormulaValue::Error(CellError::Div0), fallback.clone()]).unwrap(),
            fallback
        );
        assert_eq!(
            fn_iferror(&[FormulaValue::Number(1.0), fallback]).unwrap(),
            FormulaValue::Number(1.0)
        );
    }
}

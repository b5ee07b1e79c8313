//! Conversion between cell values and script values

use colformula_core::{format_datetime, Value};
use rhai::{Array, Dynamic, FLOAT};

/// Script value a cell is bound as
///
/// Numbers are floats, timestamps are ISO-8601 text and nulls are `()`.
pub fn to_dynamic(value: &Value) -> Dynamic {
    match value {
        Value::Null => Dynamic::UNIT,
        Value::Number(n) => Dynamic::from_float(*n as FLOAT),
        Value::Bool(b) => Dynamic::from_bool(*b),
        Value::Text(s) => Dynamic::from(s.clone()),
        Value::Datetime(dt) => Dynamic::from(format_datetime(dt)),
        Value::List(items) => Dynamic::from_array(items.iter().map(to_dynamic).collect()),
        Value::Opaque(o) => Dynamic::from(o.to_string()),
    }
}

/// Cell value for a script result
///
/// Values the column model has no variant for are kept as their display text.
pub fn from_dynamic(value: Dynamic) -> Value {
    if value.is_unit() {
        return Value::Null;
    }
    if let Ok(n) = value.as_float() {
        return Value::Number(n);
    }
    if let Ok(i) = value.as_int() {
        return Value::Number(i as f64);
    }
    if let Ok(b) = value.as_bool() {
        return Value::Bool(b);
    }
    if let Ok(c) = value.as_char() {
        return Value::Text(c.to_string());
    }
    if value.is_string() {
        return value.into_string().map(Value::Text).unwrap_or_default();
    }
    if value.is_array() {
        return value
            .into_array()
            .map(|items| Value::List(items.into_iter().map(from_dynamic).collect()))
            .unwrap_or_default();
    }
    Value::Text(value.to_string())
}

/// Numbers in an array, for the aggregate helpers
pub(crate) fn numbers(array: &Array) -> Result<Vec<f64>, String> {
    array
        .iter()
        .map(|item| {
            item.as_float()
                .or_else(|_| item.as_int().map(|i| i as FLOAT))
                .map_err(|type_name| format!("cannot aggregate a value of type {}", type_name))
        })
        .collect()
}

/// `str(x)`: text form of a script value
///
/// Whole floats print without a fractional part and booleans print as `True`/`False`, the
/// same way column values are displayed.
pub(crate) fn display(value: &Dynamic) -> String {
    if let Ok(n) = value.as_float() {
        return format!("{}", n);
    }
    if let Ok(b) = value.as_bool() {
        let text = if b { "True" } else { "False" };
        return text.to_string();
    }
    if value.is_unit() {
        return String::new();
    }
    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_round_trip_scalars() {
        for value in [
            Value::Null,
            Value::Number(1.5),
            Value::Bool(true),
            Value::from("x"),
        ] {
            assert_eq!(from_dynamic(to_dynamic(&value)), value);
        }
    }

    #[test]
    fn test_int_result_is_number() {
        assert_eq!(from_dynamic(Dynamic::from_int(4)), Value::Number(4.0));
    }

    #[test]
    fn test_array_result_is_list() {
        let array = Dynamic::from_array(vec![Dynamic::from_float(1.0), Dynamic::UNIT]);
        assert_eq!(
            from_dynamic(array),
            Value::List(vec![Value::Number(1.0), Value::Null])
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(display(&Dynamic::from_float(10.0)), "10");
        assert_eq!(display(&Dynamic::from_float(2.5)), "2.5");
        assert_eq!(display(&Dynamic::from_bool(false)), "False");
        assert_eq!(display(&Dynamic::from("a".to_string())), "a");
    }
}

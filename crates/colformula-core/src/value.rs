//! Raw cell values
//!
//! A [`Value`] is what a single cell holds before it is stored in a typed column, and what
//! formula evaluation produces for each row.

use chrono::NaiveDateTime;
use std::fmt;
use std::sync::Arc;

/// A single cell payload
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Missing value
    #[default]
    Null,
    /// Floating point number
    Number(f64),
    /// Boolean
    Bool(bool),
    /// Text
    Text(String),
    /// Timezone-naive timestamp
    Datetime(NaiveDateTime),
    /// Ordered collection (multi-cell results)
    List(Vec<Value>),
    /// Any other object that knows how to display itself
    Opaque(Opaque),
}

impl Value {
    /// Wrap an arbitrary displayable object
    pub fn opaque<T>(value: T) -> Self
    where
        T: fmt::Display + Send + Sync + 'static,
    {
        Value::Opaque(Opaque(Arc::new(value)))
    }

    /// Check for [`Value::Null`]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The number, if this is a [`Value::Number`]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The text, if this is a [`Value::Text`]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// String form of the value; nulls stay null
    pub fn display_string(&self) -> Option<String> {
        match self {
            Value::Null => None,
            Value::Text(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Short type name for diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Number(_) => "number",
            Value::Bool(_) => "bool",
            Value::Text(_) => "text",
            Value::Datetime(_) => "datetime",
            Value::List(_) => "list",
            Value::Opaque(_) => "object",
        }
    }
}

/// Format a number the way columns display it: integral values keep a trailing `.0`
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "nan".to_string()
    } else if n == f64::INFINITY {
        "inf".to_string()
    } else if n == f64::NEG_INFINITY {
        "-inf".to_string()
    } else {
        format!("{:?}", n)
    }
}

/// Format a timestamp as ISO-8601 (fractional seconds only when present)
pub fn format_datetime(dt: &NaiveDateTime) -> String {
    dt.format("%Y-%m-%d %H:%M:%S%.f").to_string()
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::Bool(true) => f.write_str("True"),
            Value::Bool(false) => f.write_str("False"),
            Value::Text(s) => f.write_str(s),
            Value::Datetime(dt) => f.write_str(&format_datetime(dt)),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    match item {
                        Value::Text(s) => write!(f, "'{}'", s)?,
                        Value::Null => f.write_str("null")?,
                        other => write!(f, "{}", other)?,
                    }
                }
                f.write_str("]")
            }
            Value::Opaque(o) => write!(f, "{}", o),
        }
    }
}

/// Shared handle to a displayable object of unknown type
#[derive(Clone)]
pub struct Opaque(Arc<dyn fmt::Display + Send + Sync>);

impl fmt::Display for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Debug for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Opaque({})", self.0)
    }
}

impl PartialEq for Opaque {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Value::Datetime(dt)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_number_display() {
        assert_eq!(Value::Number(1.0).to_string(), "1.0");
        assert_eq!(Value::Number(0.5).to_string(), "0.5");
        assert_eq!(Value::Number(-3.0).to_string(), "-3.0");
        assert_eq!(Value::Number(f64::INFINITY).to_string(), "inf");
    }

    #[test]
    fn test_display_string() {
        assert_eq!(Value::Null.display_string(), None);
        assert_eq!(Value::Bool(true).display_string().as_deref(), Some("True"));
        assert_eq!(Value::from("x").display_string().as_deref(), Some("x"));

        let dt = NaiveDate::from_ymd_opt(2020, 3, 1)
            .unwrap()
            .and_hms_opt(12, 30, 0)
            .unwrap();
        assert_eq!(
            Value::Datetime(dt).display_string().as_deref(),
            Some("2020-03-01 12:30:00")
        );
    }

    #[test]
    fn test_list_display() {
        let list = Value::List(vec![Value::Number(1.0), Value::from("a"), Value::Null]);
        assert_eq!(list.to_string(), "[1.0, 'a', null]");
    }

    #[test]
    fn test_opaque_uses_own_display() {
        struct Point(i32, i32);
        impl fmt::Display for Point {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "<{},{}>", self.0, self.1)
            }
        }

        let v = Value::opaque(Point(1, 2));
        assert_eq!(v.display_string().as_deref(), Some("<1,2>"));
        assert_eq!(v, Value::opaque(Point(1, 2)));
    }

    #[test]
    fn test_from_option() {
        assert_eq!(Value::from(None::<f64>), Value::Null);
        assert_eq!(Value::from(Some(2.0)), Value::Number(2.0));
    }
}

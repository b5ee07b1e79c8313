//! Messages shown to the user in place of a result table
//!
//! Most failures carry a translation key plus named arguments, so a host application can render
//! them in the user's language. [`I18nMessage::default_text`] renders the built-in English text.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// A translatable message: a catalog key plus named arguments
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct I18nMessage {
    pub key: String,
    pub arguments: BTreeMap<String, String>,
}

impl I18nMessage {
    /// Message without arguments
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            arguments: BTreeMap::new(),
        }
    }

    /// Add a named argument
    pub fn with_arg(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.arguments.insert(name.into(), value.into());
        self
    }

    /// Argument by name
    pub fn arg(&self, name: &str) -> Option<&str> {
        self.arguments.get(name).map(String::as_str)
    }

    /// English text for this message
    ///
    /// `{name}` placeholders are replaced with the argument of that name. Keys missing from the
    /// catalog render as the key itself.
    pub fn default_text(&self) -> String {
        let Some(template) = default_template(&self.key) else {
            return self.key.clone();
        };

        let mut out = String::with_capacity(template.len());
        let mut rest = template;
        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            match after.find('}') {
                Some(close) => {
                    let name = &after[..close];
                    match self.arguments.get(name) {
                        Some(value) => out.push_str(value),
                        None => {
                            out.push('{');
                            out.push_str(name);
                            out.push('}');
                        }
                    }
                    rest = &after[close + 1..];
                }
                None => {
                    out.push_str(&rest[open..]);
                    rest = "";
                }
            }
        }
        out.push_str(rest);
        out
    }
}

impl fmt::Display for I18nMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.default_text())
    }
}

/// English templates for the message keys this crate emits
fn default_template(key: &str) -> Option<&'static str> {
    Some(match key {
        "excel.invalidFormula" => "Couldn't parse formula: {error}",
        "excel.one_row.invalidCellRange" => "Invalid cell range: {token}",
        "excel.one_row.cellRangeNotRectangular" => {
            "Excel range must be a rectangular block of values"
        }
        "excel.one_row.badRef" => "Excel range \"{ref}\" is out of bounds",
        "excel.badCellReference" => "Bad cell reference {token}",
        "excel.formulaFirstRowReference" => {
            "Excel formulas can only reference the first row when applied to all rows"
        }
        "excel.all_rows.badColumnRef" => "Excel range \"{ref}\" is out of bounds",
        "excel.functionNotImplemented" => "Function {name} not implemented",
        "python.disabledFunction" => "{name} is disabled",
        _ => return None,
    })
}

/// What the user sees when a formula cannot produce a column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum UserMessage {
    /// Translatable message
    I18n(I18nMessage),
    /// Plain text, passed through as it came from the evaluator
    Text(String),
}

impl UserMessage {
    /// The translatable message, if this is one
    pub fn as_i18n(&self) -> Option<&I18nMessage> {
        match self {
            UserMessage::I18n(message) => Some(message),
            UserMessage::Text(_) => None,
        }
    }
}

impl fmt::Display for UserMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserMessage::I18n(message) => write!(f, "{}", message),
            UserMessage::Text(text) => f.write_str(text),
        }
    }
}

impl From<I18nMessage> for UserMessage {
    fn from(message: I18nMessage) -> Self {
        UserMessage::I18n(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_text_substitutes_arguments() {
        let message = I18nMessage::new("excel.one_row.badRef").with_arg("ref", "A1:B2");
        assert_eq!(
            message.default_text(),
            "Excel range \"A1:B2\" is out of bounds"
        );
    }

    #[test]
    fn test_missing_argument_keeps_placeholder() {
        let message = I18nMessage::new("python.disabledFunction");
        assert_eq!(message.default_text(), "{name} is disabled");
    }

    #[test]
    fn test_unknown_key_renders_as_key() {
        assert_eq!(I18nMessage::new("nope").default_text(), "nope");
    }

    #[test]
    fn test_user_message_display() {
        let text = UserMessage::Text("name 'B' is not defined".into());
        assert_eq!(text.to_string(), "name 'B' is not defined");

        let i18n: UserMessage = I18nMessage::new("excel.functionNotImplemented")
            .with_arg("name", "DATEX")
            .into();
        assert_eq!(i18n.to_string(), "Function DATEX not implemented");
    }

    #[test]
    fn test_serialize() {
        let message: UserMessage = I18nMessage::new("excel.badCellReference")
            .with_arg("token", "A")
            .into();
        assert_eq!(
            serde_json::to_string(&message).unwrap(),
            r#"{"key":"excel.badCellReference","arguments":{"token":"A"}}"#
        );
    }
}

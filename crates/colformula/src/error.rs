//! Error types for colformula

use crate::message::{I18nMessage, UserMessage};
use crate::range::EvaluationMode;
use thiserror::Error;

/// Result type alias using [`RenderError`]
pub type RenderResult<T> = std::result::Result<T, RenderError>;

/// Reasons a formula produced no column
///
/// Every variant has a user-facing form; see [`RenderError::to_user_message`].
#[derive(Debug, Error, PartialEq)]
pub enum RenderError {
    /// The spreadsheet formula does not parse
    #[error("Couldn't parse formula: {0}")]
    InvalidFormula(String),

    /// A reference that addresses no cells
    #[error("Invalid cell reference: {token}")]
    InvalidReference {
        token: String,
        mode: EvaluationMode,
    },

    /// A reference made of more than one block
    #[error("Cell range is not a rectangular block")]
    NonRectangularRange,

    /// An all-rows formula reading a row other than the first
    #[error("Formulas applied to all rows can only reference the first row")]
    FirstRowOnlyViolation,

    /// An all-rows reference outside the table's columns
    #[error("Column range out of bounds: {reference}")]
    ColumnOutOfRange { reference: String },

    /// A single-row reference outside the table
    #[error("Cell range out of bounds: {reference}")]
    RangeOutOfBounds { reference: String },

    /// The formula calls a function the engine does not provide
    #[error("Function {name} not implemented")]
    FunctionNotImplemented { name: String },

    /// The expression called a disabled operation
    #[error("{name} is disabled")]
    DisabledCapability { name: String },

    /// Any other expression failure, as the expression engine described it
    #[error("{0}")]
    ExpressionRuntime(String),

    /// Any other spreadsheet failure, as the spreadsheet engine described it
    #[error("{0}")]
    Evaluation(String),

    /// The result column does not fit the table
    #[error(transparent)]
    Table(#[from] colformula_core::Error),
}

impl RenderError {
    /// The message shown to the user for this failure
    pub fn to_user_message(&self) -> UserMessage {
        let message = match self {
            RenderError::InvalidFormula(error) => {
                I18nMessage::new("excel.invalidFormula").with_arg("error", error)
            }
            RenderError::InvalidReference {
                token,
                mode: EvaluationMode::SingleRow,
            } => I18nMessage::new("excel.one_row.invalidCellRange").with_arg("token", token),
            RenderError::InvalidReference {
                token,
                mode: EvaluationMode::AllRows,
            } => I18nMessage::new("excel.badCellReference").with_arg("token", token),
            RenderError::NonRectangularRange => {
                I18nMessage::new("excel.one_row.cellRangeNotRectangular")
            }
            RenderError::FirstRowOnlyViolation => {
                I18nMessage::new("excel.formulaFirstRowReference")
            }
            RenderError::ColumnOutOfRange { reference } => {
                I18nMessage::new("excel.all_rows.badColumnRef").with_arg("ref", reference)
            }
            RenderError::RangeOutOfBounds { reference } => {
                I18nMessage::new("excel.one_row.badRef").with_arg("ref", reference)
            }
            RenderError::FunctionNotImplemented { name } => {
                I18nMessage::new("excel.functionNotImplemented").with_arg("name", name)
            }
            RenderError::DisabledCapability { name } => {
                I18nMessage::new("python.disabledFunction").with_arg("name", name)
            }
            RenderError::ExpressionRuntime(text) | RenderError::Evaluation(text) => {
                return UserMessage::Text(text.clone())
            }
            RenderError::Table(err) => return UserMessage::Text(err.to_string()),
        };
        UserMessage::I18n(message)
    }
}

/// Errors reading or migrating parameters
#[derive(Debug, Error)]
pub enum ParamsError {
    /// Parameters are not a JSON object
    #[error("Parameters must be a JSON object")]
    NotAnObject,

    /// Numeric syntax with no known meaning
    #[error("Unknown syntax version: {0}")]
    UnknownSyntax(i64),

    /// JSON that does not describe parameters
    #[error("Invalid parameters: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn i18n(err: RenderError) -> I18nMessage {
        err.to_user_message()
            .as_i18n()
            .cloned()
            .expect("translatable message")
    }

    #[test]
    fn test_reference_message_depends_on_mode() {
        let single = i18n(RenderError::InvalidReference {
            token: "A0".into(),
            mode: EvaluationMode::SingleRow,
        });
        assert_eq!(single.key, "excel.one_row.invalidCellRange");
        assert_eq!(single.arg("token"), Some("A0"));

        let all = i18n(RenderError::InvalidReference {
            token: "A".into(),
            mode: EvaluationMode::AllRows,
        });
        assert_eq!(all.key, "excel.badCellReference");
        assert_eq!(all.arg("token"), Some("A"));
    }

    #[test]
    fn test_bounds_messages_carry_reference() {
        let message = i18n(RenderError::ColumnOutOfRange {
            reference: "A1:B1".into(),
        });
        assert_eq!(message.key, "excel.all_rows.badColumnRef");
        assert_eq!(message.arg("ref"), Some("A1:B1"));

        let message = i18n(RenderError::RangeOutOfBounds {
            reference: "C1".into(),
        });
        assert_eq!(message.key, "excel.one_row.badRef");
    }

    #[test]
    fn test_runtime_failures_are_plain_text() {
        assert_eq!(
            RenderError::ExpressionRuntime("boom".into()).to_user_message(),
            UserMessage::Text("boom".into())
        );
        assert_eq!(
            RenderError::Evaluation("bad".into()).to_user_message(),
            UserMessage::Text("bad".into())
        );
    }

    #[test]
    fn test_disabled_capability_message() {
        let message = i18n(RenderError::DisabledCapability {
            name: "builtins.open".into(),
        });
        assert_eq!(message.default_text(), "builtins.open is disabled");
    }
}

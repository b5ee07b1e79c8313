//! Expression error types

use thiserror::Error;

/// Result type for expression operations
pub type ScriptResult<T> = std::result::Result<T, ScriptError>;

/// Errors from compiling or evaluating an expression
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ScriptError {
    /// The text is not a valid expression
    #[error("{0}")]
    Compile(String),

    /// The expression called an operation the environment does not allow
    #[error("{name} is disabled")]
    Disabled { name: String },

    /// Evaluation failed; the text is the engine's own description
    #[error("{0}")]
    Runtime(String),
}

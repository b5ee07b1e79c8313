//! # colformula-script
//!
//! Restricted expression language for colformula, built on [`rhai`].
//!
//! Expressions see one row at a time: each column is bound to a variable. Module loading,
//! re-entrant evaluation and host access are disabled, console output is discarded and every
//! evaluation runs under an operation budget.
//!
//! ## Example
//!
//! ```rust
//! use colformula_core::Value;
//! use colformula_script::{compile_expression, ScriptError};
//!
//! let expr = compile_expression("str(A) + \"x\"").unwrap();
//! assert_eq!(expr.eval(&[("A", Value::Number(1.0))]).unwrap(), Value::from("1x"));
//!
//! let expr = compile_expression("open(\"data.csv\")").unwrap();
//! assert_eq!(
//!     expr.eval::<&str>(&[]),
//!     Err(ScriptError::Disabled { name: "open".into() })
//! );
//! ```

pub mod convert;
pub mod environment;
pub mod error;

pub use environment::{compile_expression, restricted_engine, CompiledExpression, DISABLED_FUNCTIONS};
pub use error::{ScriptError, ScriptResult};

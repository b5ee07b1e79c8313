//! # colformula-excel
//!
//! Spreadsheet formula engine for colformula.
//!
//! This crate provides:
//! - Formula parsing (text → AST)
//! - Compilation: references become numbered inputs with A1 range descriptors
//! - Evaluation with spreadsheet semantics (`#DIV/0!` and friends are values)
//! - A small library of built-in functions (math, logical, text, date)
//!
//! ## Example
//!
//! ```rust
//! use colformula_excel::{compile_formula, FormulaValue};
//!
//! let formula = compile_formula("=A1/B1").unwrap();
//! assert_eq!(formula.inputs().len(), 2);
//!
//! let result = formula
//!     .invoke(&[FormulaValue::Number(1.0), FormulaValue::Number(0.0)])
//!     .unwrap();
//! assert_eq!(result.as_string(), "#DIV/0!");
//! ```

pub mod address;
pub mod ast;
pub mod compile;
pub mod error;
pub mod evaluator;
pub mod functions;
pub mod parser;
pub mod value;

pub use address::{CellAddress, CellRange};
pub use ast::{BinaryOperator, FormulaExpr, Reference, ReferenceTarget, UnaryOperator};
pub use compile::{compile_formula, CompiledFormula, FormulaInput, RangeDescriptor};
pub use error::{FormulaError, FormulaResult};
pub use evaluator::{evaluate, EvaluationContext};
pub use parser::parse_formula;
pub use value::{CellError, FormulaValue};

//! Pluggable formula engines
//!
//! Rendering only needs a few things from an engine. A spreadsheet program must list its inputs
//! and be invoked with one value per input. An expression program must evaluate with named
//! bindings. The default engines are [`ExcelCompiler`] and [`ScriptCompiler`].

use colformula_core::Value;
use colformula_excel::{compile_formula, CompiledFormula, FormulaError, FormulaInput, FormulaValue};
use colformula_script::{compile_expression, CompiledExpression, ScriptError};
use thiserror::Error;

/// Failure invoking a spreadsheet program
#[derive(Debug, Clone, Error, PartialEq)]
pub enum InvokeError {
    /// The formula calls a function the engine does not provide
    #[error("Function {0} not implemented")]
    NotImplemented(String),
    /// Anything else
    #[error("{0}")]
    Failed(String),
}

/// A compiled spreadsheet formula
pub trait SpreadsheetProgram {
    /// References the formula reads, in declaration order
    fn inputs(&self) -> &[FormulaInput];

    /// Evaluate with one value per input
    fn invoke(&self, args: &[FormulaValue]) -> Result<FormulaValue, InvokeError>;
}

/// Compiles spreadsheet formula text
pub trait SpreadsheetCompiler {
    type Program: SpreadsheetProgram;

    /// Compile formula text; the error is a description of what is wrong
    fn compile(&self, formula: &str) -> Result<Self::Program, String>;
}

/// Failure compiling or evaluating an expression
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ExpressionError {
    /// The expression called a disabled operation
    #[error("{name} is disabled")]
    Disabled { name: String },
    /// Anything else, as the engine described it
    #[error("{0}")]
    Failed(String),
}

/// A compiled expression
pub trait ExpressionProgram {
    /// Evaluate with each name bound to its value
    fn eval(&self, bindings: &[(&str, Value)]) -> Result<Value, ExpressionError>;
}

/// Compiles expression text
pub trait ExpressionCompiler {
    type Program: ExpressionProgram;

    fn compile(&self, expression: &str) -> Result<Self::Program, ExpressionError>;
}

/// The built-in spreadsheet engine
#[derive(Debug, Clone, Copy, Default)]
pub struct ExcelCompiler;

impl SpreadsheetCompiler for ExcelCompiler {
    type Program = CompiledFormula;

    fn compile(&self, formula: &str) -> Result<CompiledFormula, String> {
        compile_formula(formula).map_err(|err| err.to_string())
    }
}

impl SpreadsheetProgram for CompiledFormula {
    fn inputs(&self) -> &[FormulaInput] {
        CompiledFormula::inputs(self)
    }

    fn invoke(&self, args: &[FormulaValue]) -> Result<FormulaValue, InvokeError> {
        CompiledFormula::invoke(self, args).map_err(|err| match err {
            FormulaError::UnknownFunction(name) => InvokeError::NotImplemented(name),
            other => InvokeError::Failed(other.to_string()),
        })
    }
}

/// The built-in expression engine
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptCompiler;

impl From<ScriptError> for ExpressionError {
    fn from(err: ScriptError) -> Self {
        match err {
            ScriptError::Disabled { name } => ExpressionError::Disabled { name },
            other => ExpressionError::Failed(other.to_string()),
        }
    }
}

impl ExpressionCompiler for ScriptCompiler {
    type Program = CompiledExpression;

    fn compile(&self, expression: &str) -> Result<CompiledExpression, ExpressionError> {
        Ok(compile_expression(expression)?)
    }
}

impl ExpressionProgram for CompiledExpression {
    fn eval(&self, bindings: &[(&str, Value)]) -> Result<Value, ExpressionError> {
        Ok(CompiledExpression::eval(self, bindings)?)
    }
}

//! Compiled formulas
//!
//! Compiling a formula replaces every reference with a numbered input. The caller decides what
//! each input means for its data and passes one value per input to [`CompiledFormula::invoke`].

use crate::address::CellRange;
use crate::ast::{FormulaExpr, Reference};
use crate::error::{FormulaError, FormulaResult};
use crate::evaluator::{evaluate, EvaluationContext};
use crate::parser::parse_formula;
use crate::value::FormulaValue;

/// Block of cells addressed by an input, in 1-based inclusive coordinates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeDescriptor {
    /// A1-style text of the block
    pub reference: String,
    pub row_start: u32,
    pub row_end: u32,
    pub col_start: u32,
    pub col_end: u32,
}

impl From<&CellRange> for RangeDescriptor {
    fn from(range: &CellRange) -> Self {
        Self {
            reference: range.to_a1_string(),
            row_start: range.start.row + 1,
            row_end: range.end.row + 1,
            col_start: u32::from(range.start.col) + 1,
            col_end: u32::from(range.end.col) + 1,
        }
    }
}

/// A reference the formula reads
#[derive(Debug, Clone, PartialEq)]
pub struct FormulaInput {
    /// The reference as written
    pub token: String,
    /// Blocks the reference covers, `None` when it addresses nothing
    pub ranges: Option<Vec<RangeDescriptor>>,
}

impl FormulaInput {
    fn from_reference(reference: &Reference) -> Self {
        let ranges = reference.ranges().map(|ranges| match ranges.as_slice() {
            // A single block keeps the token's spelling (`$A$1`, `A:B`)
            [range] => vec![RangeDescriptor {
                reference: reference.token.clone(),
                ..RangeDescriptor::from(range)
            }],
            _ => ranges.iter().map(RangeDescriptor::from).collect(),
        });
        Self {
            token: reference.token.clone(),
            ranges,
        }
    }
}

/// A parsed formula whose references have been replaced by inputs
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledFormula {
    expr: FormulaExpr,
    inputs: Vec<FormulaInput>,
}

/// Parse and compile a formula
///
/// # Example
/// ```rust
/// use colformula_excel::{compile_formula, FormulaValue};
///
/// let formula = compile_formula("=SUM(A1:B1)*2").unwrap();
/// assert_eq!(formula.inputs()[0].token, "A1:B1");
///
/// let args = [FormulaValue::row(vec![FormulaValue::Number(1.0), FormulaValue::Number(2.0)])];
/// assert_eq!(formula.invoke(&args).unwrap(), FormulaValue::Number(6.0));
/// ```
pub fn compile_formula(formula: &str) -> FormulaResult<CompiledFormula> {
    let ast = parse_formula(formula)?;
    let mut inputs = Vec::new();
    let expr = bind_inputs(ast, &mut inputs);
    Ok(CompiledFormula { expr, inputs })
}

/// Replace references with input slots, reusing the slot of a token seen before
fn bind_inputs(expr: FormulaExpr, inputs: &mut Vec<FormulaInput>) -> FormulaExpr {
    match expr {
        FormulaExpr::Reference(reference) => {
            let slot = match inputs.iter().position(|i| i.token == reference.token) {
                Some(slot) => slot,
                None => {
                    inputs.push(FormulaInput::from_reference(&reference));
                    inputs.len() - 1
                }
            };
            FormulaExpr::Input(slot)
        }
        FormulaExpr::BinaryOp { op, left, right } => FormulaExpr::BinaryOp {
            op,
            left: Box::new(bind_inputs(*left, inputs)),
            right: Box::new(bind_inputs(*right, inputs)),
        },
        FormulaExpr::UnaryOp { op, operand } => FormulaExpr::UnaryOp {
            op,
            operand: Box::new(bind_inputs(*operand, inputs)),
        },
        FormulaExpr::Function { name, args } => FormulaExpr::Function {
            name,
            args: args.into_iter().map(|a| bind_inputs(a, inputs)).collect(),
        },
        FormulaExpr::Array(rows) => FormulaExpr::Array(
            rows.into_iter()
                .map(|row| row.into_iter().map(|e| bind_inputs(e, inputs)).collect())
                .collect(),
        ),
        other => other,
    }
}

impl CompiledFormula {
    /// Inputs in order of first appearance
    pub fn inputs(&self) -> &[FormulaInput] {
        &self.inputs
    }

    /// The compiled expression tree
    pub fn expr(&self) -> &FormulaExpr {
        &self.expr
    }

    /// Evaluate with one value per input
    pub fn invoke(&self, args: &[FormulaValue]) -> FormulaResult<FormulaValue> {
        if args.len() != self.inputs.len() {
            return Err(FormulaError::Argument(format!(
                "formula has {} inputs, got {} values",
                self.inputs.len(),
                args.len()
            )));
        }
        let ctx = EvaluationContext::new(args);
        evaluate(&self.expr, &ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_inputs_in_first_appearance_order() {
        let formula = compile_formula("=B1*2+A1:A3+B1").unwrap();
        let tokens: Vec<_> = formula.inputs().iter().map(|i| i.token.as_str()).collect();
        assert_eq!(tokens, vec!["B1", "A1:A3"]);
    }

    #[test]
    fn test_range_descriptor() {
        let formula = compile_formula("=SUM($A$1:C2)").unwrap();
        assert_eq!(
            formula.inputs()[0].ranges,
            Some(vec![RangeDescriptor {
                reference: "$A$1:C2".into(),
                row_start: 1,
                row_end: 2,
                col_start: 1,
                col_end: 3,
            }])
        );
    }

    #[test]
    fn test_union_has_one_descriptor_per_block() {
        let formula = compile_formula("=SUM((A1:A2,C1))").unwrap();
        let ranges = formula.inputs()[0].ranges.clone().unwrap();
        assert_eq!(
            ranges.iter().map(|r| r.reference.as_str()).collect::<Vec<_>>(),
            vec!["A1:A2", "C1"]
        );
    }

    #[test]
    fn test_unresolved_input() {
        let formula = compile_formula("=A0+1").unwrap();
        assert_eq!(formula.inputs()[0].token, "A0");
        assert_eq!(formula.inputs()[0].ranges, None);
    }

    #[test]
    fn test_invoke_binds_inputs() {
        let formula = compile_formula("=A1&\"-\"&B1").unwrap();
        let result = formula
            .invoke(&[FormulaValue::String("a".into()), FormulaValue::Number(2.0)])
            .unwrap();
        assert_eq!(result, FormulaValue::String("a-2".into()));
    }

    #[test]
    fn test_invoke_checks_arity() {
        let formula = compile_formula("=A1").unwrap();
        assert!(matches!(formula.invoke(&[]), Err(FormulaError::Argument(_))));
    }

    #[test]
    fn test_unknown_function_fails_on_invoke() {
        let formula = compile_formula("=DATEX(A1)").unwrap();
        assert_eq!(
            formula.invoke(&[FormulaValue::Number(1.0)]),
            Err(FormulaError::UnknownFunction("DATEX".into()))
        );
    }
}

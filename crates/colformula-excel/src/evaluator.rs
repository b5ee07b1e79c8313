//! Formula evaluator
//!
//! Evaluates compiled formula ASTs to produce values.

use crate::ast::{BinaryOperator, FormulaExpr, UnaryOperator};
use crate::error::{FormulaError, FormulaResult};
use crate::functions::FunctionRegistry;
use crate::value::{CellError, FormulaValue};
use std::cmp::Ordering;
use std::sync::OnceLock;

/// Global function registry (lazily initialized)
static FUNCTION_REGISTRY: OnceLock<FunctionRegistry> = OnceLock::new();

fn get_function_registry() -> &'static FunctionRegistry {
    FUNCTION_REGISTRY.get_or_init(FunctionRegistry::new)
}

/// Values bound to the inputs of a compiled formula
pub struct EvaluationContext<'a> {
    inputs: &'a [FormulaValue],
}

impl<'a> EvaluationContext<'a> {
    /// Context for a formula whose input `i` evaluates to `inputs[i]`
    pub fn new(inputs: &'a [FormulaValue]) -> Self {
        Self { inputs }
    }

    /// Context for formulas without references
    pub fn simple() -> Self {
        Self { inputs: &[] }
    }

    /// Value bound to an input slot
    pub fn input(&self, slot: usize) -> FormulaResult<&FormulaValue> {
        self.inputs
            .get(slot)
            .ok_or_else(|| FormulaError::Evaluation(format!("no value bound to input {}", slot)))
    }
}

/// Evaluate a formula expression
pub fn evaluate(expr: &FormulaExpr, ctx: &EvaluationContext) -> FormulaResult<FormulaValue> {
    match expr {
        FormulaExpr::Number(n) => Ok(FormulaValue::Number(*n)),
        FormulaExpr::String(s) => Ok(FormulaValue::String(s.clone())),
        FormulaExpr::Boolean(b) => Ok(FormulaValue::Boolean(*b)),
        FormulaExpr::Error(e) => Ok(FormulaValue::Error(*e)),

        FormulaExpr::Input(slot) => ctx.input(*slot).cloned(),
        FormulaExpr::Reference(reference) => Err(FormulaError::Evaluation(format!(
            "reference '{}' was not compiled",
            reference.token
        ))),

        FormulaExpr::BinaryOp { op, left, right } => evaluate_binary_op(*op, left, right, ctx),
        FormulaExpr::UnaryOp { op, operand } => evaluate_unary_op(*op, operand, ctx),
        FormulaExpr::Function { name, args } => evaluate_function(name, args, ctx),

        FormulaExpr::Array(rows) => rows
            .iter()
            .map(|row| row.iter().map(|e| evaluate(e, ctx)).collect())
            .collect::<FormulaResult<Vec<Vec<_>>>>()
            .map(FormulaValue::Array),
    }
}

/// Operands of an arithmetic operator, or the error value the operation yields
fn numeric_operands(left: &FormulaValue, right: &FormulaValue) -> Result<(f64, f64), CellError> {
    match (left.as_number(), right.as_number()) {
        (Some(l), Some(r)) => Ok((l, r)),
        _ => Err(CellError::Value),
    }
}

/// Evaluate a binary operation
fn evaluate_binary_op(
    op: BinaryOperator,
    left: &FormulaExpr,
    right: &FormulaExpr,
    ctx: &EvaluationContext,
) -> FormulaResult<FormulaValue> {
    let left_val = evaluate(left, ctx)?;
    let right_val = evaluate(right, ctx)?;

    // Propagate errors
    if let Some(e) = left_val.get_error() {
        return Ok(FormulaValue::Error(e));
    }
    if let Some(e) = right_val.get_error() {
        return Ok(FormulaValue::Error(e));
    }

    let arithmetic = |f: fn(f64, f64) -> FormulaValue| -> FormulaResult<FormulaValue> {
        Ok(match numeric_operands(&left_val, &right_val) {
            Ok((l, r)) => f(l, r),
            Err(e) => FormulaValue::Error(e),
        })
    };

    match op {
        BinaryOperator::Add => arithmetic(|l, r| FormulaValue::Number(l + r)),
        BinaryOperator::Subtract => arithmetic(|l, r| FormulaValue::Number(l - r)),
        BinaryOperator::Multiply => arithmetic(|l, r| FormulaValue::Number(l * r)),
        BinaryOperator::Divide => arithmetic(|l, r| {
            if r == 0.0 {
                FormulaValue::Error(CellError::Div0)
            } else {
                FormulaValue::Number(l / r)
            }
        }),
        BinaryOperator::Power => arithmetic(|l, r| {
            let result = l.powf(r);
            if result.is_finite() {
                FormulaValue::Number(result)
            } else {
                FormulaValue::Error(CellError::Num)
            }
        }),

        BinaryOperator::Equal
        | BinaryOperator::NotEqual
        | BinaryOperator::LessThan
        | BinaryOperator::LessEqual
        | BinaryOperator::GreaterThan
        | BinaryOperator::GreaterEqual => {
            let ordering = compare_values(&left_val, &right_val);
            Ok(FormulaValue::Boolean(comparison_holds(op, ordering)))
        }

        // Concatenation
        BinaryOperator::Concat => Ok(FormulaValue::String(
            left_val.as_string() + &right_val.as_string(),
        )),
    }
}

fn comparison_holds(op: BinaryOperator, ordering: Ordering) -> bool {
    match op {
        BinaryOperator::Equal => ordering.is_eq(),
        BinaryOperator::NotEqual => ordering.is_ne(),
        BinaryOperator::LessThan => ordering.is_lt(),
        BinaryOperator::LessEqual => ordering.is_le(),
        BinaryOperator::GreaterThan => ordering.is_gt(),
        BinaryOperator::GreaterEqual => ordering.is_ge(),
        _ => false,
    }
}

/// Spreadsheet ordering: blanks are zero, text ignores case, numbers < text < booleans
fn compare_values(left: &FormulaValue, right: &FormulaValue) -> Ordering {
    // Empty compares like zero
    let left = match left {
        FormulaValue::Empty => &FormulaValue::Number(0.0),
        v => v,
    };
    let right = match right {
        FormulaValue::Empty => &FormulaValue::Number(0.0),
        v => v,
    };

    match (left, right) {
        (FormulaValue::Number(l), FormulaValue::Number(r)) => {
            l.partial_cmp(r).unwrap_or(Ordering::Equal)
        }

        // Strings compare case-insensitively
        (FormulaValue::String(l), FormulaValue::String(r)) => {
            l.to_lowercase().cmp(&r.to_lowercase())
        }

        // FALSE < TRUE
        (FormulaValue::Boolean(l), FormulaValue::Boolean(r)) => l.cmp(r),

        // Mixed types: number < string < boolean
        (FormulaValue::Number(_), FormulaValue::String(_) | FormulaValue::Boolean(_)) => {
            Ordering::Less
        }
        (FormulaValue::String(_), FormulaValue::Number(_)) => Ordering::Greater,
        (FormulaValue::String(_), FormulaValue::Boolean(_)) => Ordering::Less,
        (FormulaValue::Boolean(_), FormulaValue::Number(_) | FormulaValue::String(_)) => {
            Ordering::Greater
        }

        (FormulaValue::Error(l), FormulaValue::Error(r)) => l.cmp(r),

        _ => Ordering::Equal,
    }
}

/// Evaluate a unary operation
fn evaluate_unary_op(
    op: UnaryOperator,
    operand: &FormulaExpr,
    ctx: &EvaluationContext,
) -> FormulaResult<FormulaValue> {
    let val = evaluate(operand, ctx)?;

    if let Some(e) = val.get_error() {
        return Ok(FormulaValue::Error(e));
    }

    let Some(n) = val.as_number() else {
        return Ok(FormulaValue::Error(CellError::Value));
    };

    Ok(match op {
        UnaryOperator::Negate => FormulaValue::Number(-n),
        UnaryOperator::Percent => FormulaValue::Number(n / 100.0),
    })
}

/// Evaluate a function call
fn evaluate_function(
    name: &str,
    args: &[FormulaExpr],
    ctx: &EvaluationContext,
) -> FormulaResult<FormulaValue> {
    let registry = get_function_registry();

    let func = registry
        .get(name)
        .ok_or_else(|| FormulaError::UnknownFunction(name.to_string()))?;

    if args.len() < func.min_args {
        return Err(FormulaError::ArgumentCount {
            function: name.to_string(),
            expected: format!("at least {}", func.min_args),
            actual: args.len(),
        });
    }

    if let Some(max) = func.max_args {
        if args.len() > max {
            return Err(FormulaError::ArgumentCount {
                function: name.to_string(),
                expected: format!("at most {}", max),
                actual: args.len(),
            });
        }
    }

    let values = args
        .iter()
        .map(|arg| evaluate(arg, ctx))
        .collect::<FormulaResult<Vec<_>>>()?;
    (func.implementation)(&values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_formula;

    fn eval(formula: &str) -> FormulaResult<FormulaValue> {
        let ast = parse_formula(formula)?;
        let ctx = EvaluationContext::simple();
        evaluate(&ast, &ctx)
    }

    #[test]
    fn test_evaluate_literals() {
        assert_eq!(eval("=42").unwrap(), FormulaValue::Number(42.0));
        assert_eq!(
            eval("=\"Hello\"").unwrap(),
            FormulaValue::String("Hello".into())
        );
        assert_eq!(eval("=TRUE").unwrap(), FormulaValue::Boolean(true));
    }

    #[test]
    fn test_evaluate_arithmetic() {
        assert_eq!(eval("=1+2").unwrap(), FormulaValue::Number(3.0));
        assert_eq!(eval("=10-3").unwrap(), FormulaValue::Number(7.0));
        assert_eq!(eval("=4*5").unwrap(), FormulaValue::Number(20.0));
        assert_eq!(eval("=20/4").unwrap(), FormulaValue::Number(5.0));
        assert_eq!(eval("=2^10").unwrap(), FormulaValue::Number(1024.0));
    }

    #[test]
    fn test_evaluate_precedence() {
        assert_eq!(eval("=1+2*3").unwrap(), FormulaValue::Number(7.0));
        assert_eq!(eval("=(1+2)*3").unwrap(), FormulaValue::Number(9.0));
        assert_eq!(eval("=2^3^2").unwrap(), FormulaValue::Number(512.0));
    }

    #[test]
    fn test_evaluate_unary() {
        assert_eq!(eval("=-5").unwrap(), FormulaValue::Number(-5.0));
        assert_eq!(eval("=50%").unwrap(), FormulaValue::Number(0.5));
        assert_eq!(
            eval("=-\"x\"").unwrap(),
            FormulaValue::Error(CellError::Value)
        );
    }

    #[test]
    fn test_evaluate_comparison() {
        assert_eq!(eval("=1<2").unwrap(), FormulaValue::Boolean(true));
        assert_eq!(eval("=1>2").unwrap(), FormulaValue::Boolean(false));
        assert_eq!(eval("=1=1").unwrap(), FormulaValue::Boolean(true));
        assert_eq!(eval("=1<>1").unwrap(), FormulaValue::Boolean(false));
        assert_eq!(eval("=\"a\"=\"A\"").unwrap(), FormulaValue::Boolean(true));
        assert_eq!(eval("=1<\"a\"").unwrap(), FormulaValue::Boolean(true));
    }

    #[test]
    fn test_evaluate_concatenation() {
        assert_eq!(
            eval("=\"Hello\"&\" \"&\"World\"").unwrap(),
            FormulaValue::String("Hello World".into())
        );
        assert_eq!(
            eval("=\"N\"&1").unwrap(),
            FormulaValue::String("N1".into())
        );
    }

    #[test]
    fn test_evaluate_errors_are_values() {
        assert_eq!(eval("=1/0").unwrap(), FormulaValue::Error(CellError::Div0));
        assert_eq!(
            eval("=\"a\"+1").unwrap(),
            FormulaValue::Error(CellError::Value)
        );
        assert_eq!(
            eval("=#N/A+1").unwrap(),
            FormulaValue::Error(CellError::Na)
        );
    }

    #[test]
    fn test_evaluate_array() {
        assert_eq!(
            eval("={1,2;3,4}").unwrap(),
            FormulaValue::Array(vec![
                vec![FormulaValue::Number(1.0), FormulaValue::Number(2.0)],
                vec![FormulaValue::Number(3.0), FormulaValue::Number(4.0)],
            ])
        );
    }

    #[test]
    fn test_evaluate_nested_functions() {
        assert_eq!(
            eval("=IF(SUM(1,2)>2,ROUND(2.567,1),0)").unwrap(),
            FormulaValue::Number(2.6)
        );
    }

    #[test]
    fn test_unknown_function() {
        assert_eq!(
            eval("=NOPE(1)"),
            Err(FormulaError::UnknownFunction("NOPE".into()))
        );
    }

    #[test]
    fn test_argument_count() {
        assert!(matches!(
            eval("=ABS(1,2)"),
            Err(FormulaError::ArgumentCount { .. })
        ));
    }

    #[test]
    fn test_uncompiled_reference_fails() {
        assert!(matches!(eval("=A1"), Err(FormulaError::Evaluation(_))));
    }
}

//! Restricted evaluation environment
//!
//! Every compiled expression gets its own engine. The engine cannot load modules, its output
//! functions print nothing, and operations that would evaluate other code or reach the host are
//! replaced by functions that fail with [`ScriptError::Disabled`].

use crate::convert::{display, from_dynamic, numbers, to_dynamic};
use crate::error::{ScriptError, ScriptResult};
use colformula_core::Value;
use rhai::module_resolvers::DummyModuleResolver;
use rhai::{
    Array, Dynamic, Engine, EvalAltResult, LexError, ParseErrorType, Position, Scope, AST, FLOAT,
};
use tracing::debug;

/// Operations that raise [`ScriptError::Disabled`] when called
pub const DISABLED_FUNCTIONS: [&str; 5] = ["breakpoint", "compile", "eval", "exec", "open"];

/// Operation budget for one evaluation
const MAX_OPERATIONS: u64 = 1_000_000;

/// Expression nesting limits (global, inside functions)
const MAX_EXPR_DEPTH: (usize, usize) = (64, 32);

/// Payload of the runtime error raised by a disabled operation
#[derive(Debug, Clone)]
struct DisabledCall {
    name: &'static str,
}

fn disabled(name: &'static str) -> Box<EvalAltResult> {
    Box::new(EvalAltResult::ErrorRuntime(
        Dynamic::from(DisabledCall { name }),
        Position::NONE,
    ))
}

/// Build a fresh restricted engine
pub fn restricted_engine() -> Engine {
    let mut engine = Engine::new();

    engine
        .set_module_resolver(DummyModuleResolver::new())
        .set_max_operations(MAX_OPERATIONS)
        .set_max_expr_depths(MAX_EXPR_DEPTH.0, MAX_EXPR_DEPTH.1);

    engine.on_print(|_| {});
    engine.on_debug(|_, _, _| {});

    // `eval` is a language keyword; disabling it turns calls into compile errors, see
    // `disabled_symbol`
    engine.disable_symbol("eval");

    for name in DISABLED_FUNCTIONS {
        engine
            .register_fn(name, move || -> Result<Dynamic, Box<EvalAltResult>> {
                Err(disabled(name))
            })
            .register_fn(name, move |_: Dynamic| -> Result<Dynamic, Box<EvalAltResult>> {
                Err(disabled(name))
            })
            .register_fn(
                name,
                move |_: Dynamic, _: Dynamic| -> Result<Dynamic, Box<EvalAltResult>> {
                    Err(disabled(name))
                },
            );
    }

    engine
        .register_fn("str", |x: Dynamic| display(&x))
        .register_fn("sum", |values: Array| -> Result<FLOAT, Box<EvalAltResult>> {
            Ok(numbers(&values)?.iter().fold(0.0, |acc, n| acc + n))
        })
        .register_fn("mean", |values: Array| -> Result<FLOAT, Box<EvalAltResult>> {
            let values = numbers(&values)?;
            if values.is_empty() {
                return Err("mean of an empty array".into());
            }
            Ok(values.iter().sum::<FLOAT>() / values.len() as FLOAT)
        });

    engine
}

/// An expression compiled in its own restricted engine
pub struct CompiledExpression {
    engine: Engine,
    ast: AST,
}

/// Compile expression text
///
/// # Example
/// ```rust
/// use colformula_core::Value;
/// use colformula_script::compile_expression;
///
/// let expr = compile_expression("A * 2").unwrap();
/// let result = expr.eval(&[("A", Value::Number(21.0))]).unwrap();
/// assert_eq!(result, Value::Number(42.0));
/// ```
pub fn compile_expression(text: &str) -> ScriptResult<CompiledExpression> {
    let engine = restricted_engine();
    let ast = engine
        .compile_expression(text)
        .map_err(|err| match disabled_symbol(err.err_type()) {
            Some(name) => ScriptError::Disabled { name: name.to_string() },
            None => ScriptError::Compile(err.to_string()),
        })?;
    debug!(expression = text, "compiled expression");
    Ok(CompiledExpression { engine, ast })
}

/// Name of the disabled operation a parse error rejects, if any
///
/// The tokenizer reports a disabled keyword as an improper symbol; a disabled non-keyword
/// surfaces as a reserved word.
fn disabled_symbol(err: &ParseErrorType) -> Option<&'static str> {
    let name = match err {
        ParseErrorType::BadInput(LexError::ImproperSymbol(symbol, _)) => symbol.as_str(),
        ParseErrorType::Reserved(name) => name.as_str(),
        _ => return None,
    };
    DISABLED_FUNCTIONS.iter().copied().find(|&f| f == name)
}

impl CompiledExpression {
    /// Evaluate with each name bound to its value
    pub fn eval<S: AsRef<str>>(&self, bindings: &[(S, Value)]) -> ScriptResult<Value> {
        let mut scope = Scope::new();
        for (name, value) in bindings {
            scope.push_dynamic(name.as_ref(), to_dynamic(value));
        }
        self.engine
            .eval_ast_with_scope::<Dynamic>(&mut scope, &self.ast)
            .map(from_dynamic)
            .map_err(runtime_error)
    }
}

/// Map an evaluation failure, looking through the frames of nested function calls
fn runtime_error(err: Box<EvalAltResult>) -> ScriptError {
    let err = *err;
    match err {
        EvalAltResult::ErrorInFunctionCall(_, _, inner, _) => runtime_error(inner),
        EvalAltResult::ErrorRuntime(ref value, _) if value.is::<DisabledCall>() => {
            let name = value
                .clone()
                .try_cast::<DisabledCall>()
                .map_or("", |call| call.name);
            ScriptError::Disabled {
                name: name.to_string(),
            }
        }
        mut other => {
            other.clear_position();
            ScriptError::Runtime(other.to_string())
        }
    }
}

//! Built-in spreadsheet functions

pub mod date;
pub mod logical;
pub mod math;
pub mod text;

use crate::error::{FormulaError, FormulaResult};
use crate::value::{CellError, FormulaValue};
use std::collections::HashMap;

/// Function implementation signature
///
/// Arguments arrive evaluated. Ranges arrive as [`FormulaValue::Array`], single cells as scalars.
pub type FunctionImpl = fn(&[FormulaValue]) -> FormulaResult<FormulaValue>;

/// Function definition
pub struct FunctionDef {
    /// Function name (uppercase)
    pub name: &'static str,
    /// Minimum arguments
    pub min_args: usize,
    /// Maximum arguments (None = unlimited)
    pub max_args: Option<usize>,
    /// Implementation
    pub implementation: FunctionImpl,
}

impl FunctionDef {
    const fn new(
        name: &'static str,
        min_args: usize,
        max_args: Option<usize>,
        implementation: FunctionImpl,
    ) -> Self {
        Self {
            name,
            min_args,
            max_args,
            implementation,
        }
    }
}

/// Function registry
pub struct FunctionRegistry {
    functions: HashMap<String, FunctionDef>,
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FunctionRegistry {
    /// Create a new registry with all built-in functions
    pub fn new() -> Self {
        let mut registry = Self {
            functions: HashMap::new(),
        };

        registry.register_math_functions();
        registry.register_logical_functions();
        registry.register_text_functions();
        registry.register_date_functions();

        registry
    }

    /// Look up a function by name
    pub fn get(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.get(&name.to_uppercase())
    }

    /// Whether a function with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Register a function
    pub fn register(&mut self, def: FunctionDef) {
        self.functions.insert(def.name.to_uppercase(), def);
    }

    fn register_all(&mut self, defs: impl IntoIterator<Item = FunctionDef>) {
        for def in defs {
            self.register(def);
        }
    }

    fn register_math_functions(&mut self) {
        self.register_all([
            FunctionDef::new("SUM", 1, None, math::fn_sum),
            FunctionDef::new("AVERAGE", 1, None, math::fn_average),
            FunctionDef::new("MIN", 1, None, math::fn_min),
            FunctionDef::new("MAX", 1, None, math::fn_max),
            FunctionDef::new("COUNT", 1, None, math::fn_count),
            FunctionDef::new("COUNTA", 1, None, math::fn_counta),
            FunctionDef::new("PRODUCT", 1, None, math::fn_product),
            FunctionDef::new("ABS", 1, Some(1), math::fn_abs),
            FunctionDef::new("ROUND", 1, Some(2), math::fn_round),
            FunctionDef::new("INT", 1, Some(1), math::fn_int),
            FunctionDef::new("MOD", 2, Some(2), math::fn_mod),
            FunctionDef::new("SQRT", 1, Some(1), math::fn_sqrt),
            FunctionDef::new("POWER", 2, Some(2), math::fn_power),
        ]);
    }

    fn register_logical_functions(&mut self) {
        self.register_all([
            FunctionDef::new("IF", 2, Some(3), logical::fn_if),
            FunctionDef::new("AND", 1, None, logical::fn_and),
            FunctionDef::new("OR", 1, None, logical::fn_or),
            FunctionDef::new("NOT", 1, Some(1), logical::fn_not),
            FunctionDef::new("IFERROR", 2, Some(2), logical::fn_iferror),
            FunctionDef::new("TRUE", 0, Some(0), logical::fn_true),
            FunctionDef::new("FALSE", 0, Some(0), logical::fn_false),
        ]);
    }

    fn register_text_functions(&mut self) {
        self.register_all([
            FunctionDef::new("LEN", 1, Some(1), text::fn_len),
            FunctionDef::new("LEFT", 1, Some(2), text::fn_left),
            FunctionDef::new("RIGHT", 1, Some(2), text::fn_right),
            FunctionDef::new("MID", 3, Some(3), text::fn_mid),
            FunctionDef::new("LOWER", 1, Some(1), text::fn_lower),
            FunctionDef::new("UPPER", 1, Some(1), text::fn_upper),
            FunctionDef::new("TRIM", 1, Some(1), text::fn_trim),
            FunctionDef::new("CONCAT", 1, None, text::fn_concat),
            FunctionDef::new("CONCATENATE", 1, None, text::fn_concat),
        ]);
    }

    fn register_date_functions(&mut self) {
        self.register_all([
            FunctionDef::new("DATE", 3, Some(3), date::fn_date),
            FunctionDef::new("YEAR", 1, Some(1), date::fn_year),
            FunctionDef::new("MONTH", 1, Some(1), date::fn_month),
            FunctionDef::new("DAY", 1, Some(1), date::fn_day),
        ]);
    }
}

/// Argument `index`, which the registry guarantees is present
pub(crate) fn arg(args: &[FormulaValue], index: usize) -> FormulaResult<&FormulaValue> {
    args.get(index)
        .ok_or_else(|| FormulaError::Argument(format!("missing argument {}", index + 1)))
}

/// Numbers among the arguments
///
/// Inside ranges, blanks and booleans are skipped and text counts only when it reads as a number.
/// Anything else that does not convert is `#VALUE!`. The first error value found is returned
/// instead of the numbers.
pub(crate) fn collect_numbers(args: &[FormulaValue]) -> Result<Vec<f64>, FormulaValue> {
    let mut numbers = Vec::new();
    for arg in args {
        match arg {
            FormulaValue::Error(e) => return Err(FormulaValue::Error(*e)),
            FormulaValue::Array(_) => {
                for cell in arg.scalars() {
                    match cell {
                        FormulaValue::Number(n) => numbers.push(*n),
                        FormulaValue::Error(e) => return Err(FormulaValue::Error(*e)),
                        FormulaValue::String(s) => match s.trim().parse() {
                            Ok(n) => numbers.push(n),
                            Err(_) => return Err(FormulaValue::Error(CellError::Value)),
                        },
                        _ => {}
                    }
                }
            }
            FormulaValue::Empty => {}
            scalar => match scalar.as_number() {
                Some(n) => numbers.push(n),
                None => return Err(FormulaValue::Error(CellError::Value)),
            },
        }
    }
    Ok(numbers)
}

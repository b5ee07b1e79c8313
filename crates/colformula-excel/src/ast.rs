//! Formula Abstract Syntax Tree types

use crate::address::{CellAddress, CellRange};
use crate::value::CellError;

/// Formula expression AST
#[derive(Debug, Clone, PartialEq)]
pub enum FormulaExpr {
    // === Literals ===
    /// Numeric literal
    Number(f64),
    /// String literal
    String(String),
    /// Boolean literal
    Boolean(bool),
    /// Error literal
    Error(CellError),

    // === References ===
    /// Reference as written in the formula
    Reference(Reference),
    /// Reference replaced by the slot of a compiled formula's input
    Input(usize),

    // === Operators ===
    /// Binary operation
    BinaryOp {
        op: BinaryOperator,
        left: Box<FormulaExpr>,
        right: Box<FormulaExpr>,
    },
    /// Unary operation
    UnaryOp {
        op: UnaryOperator,
        operand: Box<FormulaExpr>,
    },

    // === Function call ===
    Function {
        name: String,
        args: Vec<FormulaExpr>,
    },

    // === Array ===
    Array(Vec<Vec<FormulaExpr>>),
}

/// A reference token and what it points at
#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
    /// Text of the reference as written (e.g. `A1:B2`)
    pub token: String,
    pub target: ReferenceTarget,
}

/// Target of a reference
#[derive(Debug, Clone, PartialEq)]
pub enum ReferenceTarget {
    /// Single cell (`A1`)
    Cell(CellAddress),
    /// Rectangular block (`A1:B2`, `A:B`)
    Range(CellRange),
    /// Bare column letters (`A`); only meaningful as one end of a column range
    Column(u16),
    /// Several blocks (`(A1:A2,C1:C2)`)
    Union(Vec<CellRange>),
    /// Text that looked like a reference but addresses nothing (`A0`, names)
    Unresolved,
}

impl Reference {
    /// Create a reference
    pub fn new(token: impl Into<String>, target: ReferenceTarget) -> Self {
        Self {
            token: token.into(),
            target,
        }
    }

    /// The blocks this reference covers, or `None` when it does not resolve
    pub fn ranges(&self) -> Option<Vec<CellRange>> {
        match &self.target {
            ReferenceTarget::Cell(addr) => Some(vec![CellRange::single(*addr)]),
            ReferenceTarget::Range(range) => Some(vec![*range]),
            ReferenceTarget::Union(ranges) => Some(ranges.clone()),
            ReferenceTarget::Column(_) | ReferenceTarget::Unresolved => None,
        }
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    // Arithmetic
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,

    // Comparison
    Equal,
    NotEqual,
    LessThan,
    LessEqual,
    GreaterThan,
    GreaterEqual,

    // Text
    Concat,
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Negate,
    Percent,
}

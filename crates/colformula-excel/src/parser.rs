//! Formula parser
//!
//! A recursive descent parser for spreadsheet formulas with proper operator precedence.
//! References are kept as written; whether they address anything is decided when the
//! formula is compiled against a table.

use crate::address::{CellAddress, CellRange};
use crate::ast::{BinaryOperator, FormulaExpr, Reference, ReferenceTarget, UnaryOperator};
use crate::error::{FormulaError, FormulaResult};
use crate::value::CellError;

/// Parse formula text (with its leading `=`) into an expression tree
///
/// # Example
/// ```rust
/// use colformula_excel::{parse_formula, FormulaExpr};
///
/// assert!(matches!(parse_formula("=SUM(A1:C1)*2"), Ok(FormulaExpr::BinaryOp { .. })));
/// assert!(parse_formula("=SUM B>").is_err());
/// ```
pub fn parse_formula(formula: &str) -> FormulaResult<FormulaExpr> {
    let body = formula
        .trim()
        .strip_prefix('=')
        .ok_or_else(|| FormulaError::Parse("Not a valid formula: missing leading '='".into()))?;

    let mut parser = FormulaParser::new(body);
    let expr = parser.parse_expression()?;

    if !matches!(parser.current_token(), Token::Eof) {
        return Err(FormulaError::Parse(format!(
            "Unexpected {:?} after expression",
            parser.current_token()
        )));
    }

    Ok(expr)
}

/// Token types
#[derive(Debug, Clone, PartialEq)]
enum Token {
    // Literals
    Number(f64),
    String(String),
    Boolean(bool),
    Error(CellError),

    // Names: functions and anything that is not an address
    Identifier(String),
    // `A1`, `$A$1`
    CellRef(String),
    // `A`, `$B`
    ColumnRef(String),

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    Percent,
    Ampersand,
    Equal,
    NotEqual,
    LessThan,
    LessEqual,
    GreaterThan,
    GreaterEqual,
    Colon,
    Comma,
    Semicolon,

    // Delimiters
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,

    // Character that starts no token
    Invalid(char),

    // End of input
    Eof,
}

/// Formula parser
struct FormulaParser<'a> {
    input: &'a str,
    pos: usize,
    current_token: Option<Token>,
}

impl<'a> FormulaParser<'a> {
    fn new(input: &'a str) -> Self {
        let mut parser = Self {
            input,
            pos: 0,
            current_token: None,
        };
        parser.advance_token();
        parser
    }

    fn advance_token(&mut self) {
        self.skip_whitespace();
        self.current_token = Some(self.scan_token());
    }

    fn scan_token(&mut self) -> Token {
        self.skip_whitespace();
        let Some(c) = self.peek_char() else {
            return Token::Eof;
        };

        if c == '"' {
            return self.scan_string();
        }
        let digit_next = self.peek_char_at(1).map_or(false, |d| d.is_ascii_digit());
        if c.is_ascii_digit() || (c == '.' && digit_next) {
            return self.scan_number();
        }
        if c.is_ascii_alphabetic() || matches!(c, '_' | '$' | '#') {
            return self.scan_identifier_or_ref();
        }

        self.advance();
        match c {
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '^' => Token::Caret,
            '%' => Token::Percent,
            '&' => Token::Ampersand,
            ':' => Token::Colon,
            ',' => Token::Comma,
            ';' => Token::Semicolon,
            '(' => Token::LeftParen,
            ')' => Token::RightParen,
            '{' => Token::LeftBrace,
            '}' => Token::RightBrace,
            '=' => Token::Equal,
            '<' if self.eat('=') => Token::LessEqual,
            '<' if self.eat('>') => Token::NotEqual,
            '<' => Token::LessThan,
            '>' if self.eat('=') => Token::GreaterEqual,
            '>' => Token::GreaterThan,
            other => Token::Invalid(other),
        }
    }

    fn scan_string(&mut self) -> Token {
        self.advance(); // Skip opening quote

        let mut s = String::new();
        while let Some(c) = self.peek_char() {
            if c == '"' {
                // Escaped quote ("")
                if self.peek_char_at(1) == Some('"') {
                    s.push('"');
                    self.advance();
                    self.advance();
                } else {
                    self.advance();
                    return Token::String(s);
                }
            } else {
                s.push(c);
                self.advance();
            }
        }

        Token::Invalid('"')
    }

    fn scan_number(&mut self) -> Token {
        let start = self.pos;

        // Integer part
        while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
            self.advance();
        }

        // Decimal part
        if self.peek_char() == Some('.') {
            self.advance();
            while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        // Exponent part
        if self.peek_char().map_or(false, |c| c == 'e' || c == 'E') {
            self.advance();
            if self.peek_char().map_or(false, |c| c == '+' || c == '-') {
                self.advance();
            }
            while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        match self.input[start..self.pos].parse() {
            Ok(n) => Token::Number(n),
            Err(_) => Token::Invalid('e'),
        }
    }

    fn scan_identifier_or_ref(&mut self) -> Token {
        // Error values (#VALUE!, #REF!, etc.)
        if self.peek_char() == Some('#') {
            let start = self.pos;
            self.advance();
            while self.peek_char().map_or(false, |c| {
                c.is_ascii_alphanumeric() || c == '!' || c == '/' || c == '?'
            }) {
                self.advance();
            }
            let error_str = &self.input[start..self.pos];
            if let Some(err) = CellError::parse(error_str) {
                return Token::Error(err);
            }
            return Token::Identifier(error_str.to_string());
        }

        let start = self.pos;
        while self.peek_char().map_or(false, |c| {
            c.is_ascii_alphanumeric() || c == '_' || c == '$' || c == '.'
        }) {
            self.advance();
        }

        let text = &self.input[start..self.pos];
        let is_call = self.peek_char() == Some('(');

        // Boolean literals (but not if followed by '(' - then it's a function call)
        let upper = text.to_uppercase();
        if upper == "TRUE" && !is_call {
            return Token::Boolean(true);
        }
        if upper == "FALSE" && !is_call {
            return Token::Boolean(false);
        }

        // Letters followed by digits is a cell reference, unless it is called
        // (LOG10(100) is a function)
        if !is_call && Self::is_cell_reference(text) {
            return Token::CellRef(text.to_string());
        }

        if !is_call && Self::is_column_reference(text) {
            return Token::ColumnRef(text.to_string());
        }

        Token::Identifier(text.to_string())
    }

    fn is_cell_reference(text: &str) -> bool {
        // [$]letters[$]digits
        let chars: Vec<char> = text.chars().collect();
        let mut i = 0;

        if chars.get(i) == Some(&'$') {
            i += 1;
        }

        let letter_start = i;
        while i < chars.len() && chars[i].is_ascii_alphabetic() {
            i += 1;
        }
        if i == letter_start {
            return false;
        }

        if chars.get(i) == Some(&'$') {
            i += 1;
        }

        let digit_start = i;
        while i < chars.len() && chars[i].is_ascii_digit() {
            i += 1;
        }
        if i == digit_start {
            return false;
        }

        i == chars.len()
    }

    fn is_column_reference(text: &str) -> bool {
        let letters = text.strip_prefix('$').unwrap_or(text);
        letters.chars().all(|c| c.is_ascii_alphabetic())
            && CellAddress::letters_to_column(letters).is_ok()
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_char_at(&self, offset: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(offset)
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
        }
    }

    /// Consume `expected` if it is the next character
    fn eat(&mut self, expected: char) -> bool {
        let found = self.peek_char() == Some(expected);
        if found {
            self.advance();
        }
        found
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().map_or(false, |c| c.is_whitespace()) {
            self.advance();
        }
    }

    fn current_token(&self) -> &Token {
        self.current_token.as_ref().unwrap_or(&Token::Eof)
    }

    fn consume(&mut self) -> Token {
        let token = self.current_token.take().unwrap_or(Token::Eof);
        self.advance_token();
        token
    }

    fn expect(&mut self, expected: &Token) -> FormulaResult<()> {
        if self.current_token() == expected {
            self.consume();
            Ok(())
        } else {
            Err(FormulaError::Parse(format!(
                "Expected {:?}, got {:?}",
                expected,
                self.current_token()
            )))
        }
    }

    // Binary operators, loosest first: comparison, `&`, `+ -`, `* /`. `^` binds tighter and
    // is right associative; below it come unary `-`/`+`, postfix `%`, then `:`.

    /// Infix operator at the current token with its binding level
    fn infix_operator(&self) -> Option<(BinaryOperator, u8)> {
        Some(match self.current_token() {
            Token::Equal => (BinaryOperator::Equal, 1),
            Token::NotEqual => (BinaryOperator::NotEqual, 1),
            Token::LessThan => (BinaryOperator::LessThan, 1),
            Token::LessEqual => (BinaryOperator::LessEqual, 1),
            Token::GreaterThan => (BinaryOperator::GreaterThan, 1),
            Token::GreaterEqual => (BinaryOperator::GreaterEqual, 1),
            Token::Ampersand => (BinaryOperator::Concat, 2),
            Token::Plus => (BinaryOperator::Add, 3),
            Token::Minus => (BinaryOperator::Subtract, 3),
            Token::Star => (BinaryOperator::Multiply, 4),
            Token::Slash => (BinaryOperator::Divide, 4),
            _ => return None,
        })
    }

    fn parse_expression(&mut self) -> FormulaResult<FormulaExpr> {
        self.parse_binary(1)
    }

    /// Left-associative chain of operators binding at `min_level` or tighter
    fn parse_binary(&mut self, min_level: u8) -> FormulaResult<FormulaExpr> {
        let mut left = self.parse_exponent()?;
        while let Some((op, level)) = self.infix_operator().filter(|&(_, l)| l >= min_level) {
            self.consume();
            let right = self.parse_binary(level + 1)?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_exponent(&mut self) -> FormulaResult<FormulaExpr> {
        let left = self.parse_unary()?;

        if matches!(self.current_token(), Token::Caret) {
            self.consume();
            let right = self.parse_exponent()?; // Right associative
            return Ok(binary(BinaryOperator::Power, left, right));
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> FormulaResult<FormulaExpr> {
        if matches!(self.current_token(), Token::Minus) {
            self.consume();
            let operand = self.parse_unary()?;
            return Ok(FormulaExpr::UnaryOp {
                op: UnaryOperator::Negate,
                operand: Box::new(operand),
            });
        }

        // `+x` is `x`
        if matches!(self.current_token(), Token::Plus) {
            self.consume();
            return self.parse_unary();
        }

        let mut expr = self.parse_range()?;

        while matches!(self.current_token(), Token::Percent) {
            self.consume();
            expr = FormulaExpr::UnaryOp {
                op: UnaryOperator::Percent,
                operand: Box::new(expr),
            };
        }

        Ok(expr)
    }

    fn parse_range(&mut self) -> FormulaResult<FormulaExpr> {
        let left = self.parse_primary()?;

        if !matches!(self.current_token(), Token::Colon) {
            return Ok(left);
        }
        self.consume();
        let right = self.parse_primary()?;

        match (left, right) {
            (FormulaExpr::Reference(start), FormulaExpr::Reference(end)) => {
                Ok(FormulaExpr::Reference(join_range(start, end)))
            }
            _ => Err(FormulaError::Parse(
                "Range operator ':' needs references on both sides".into(),
            )),
        }
    }

    fn parse_primary(&mut self) -> FormulaResult<FormulaExpr> {
        match self.current_token().clone() {
            Token::Number(n) => {
                self.consume();
                Ok(FormulaExpr::Number(n))
            }

            Token::String(s) => {
                self.consume();
                Ok(FormulaExpr::String(s))
            }

            Token::Boolean(b) => {
                self.consume();
                Ok(FormulaExpr::Boolean(b))
            }

            Token::Error(e) => {
                self.consume();
                Ok(FormulaExpr::Error(e))
            }

            Token::LeftParen => {
                self.consume();
                let first = self.parse_expression()?;
                if !matches!(self.current_token(), Token::Comma) {
                    self.expect(&Token::RightParen)?;
                    return Ok(first);
                }

                // (A1:A2,C1:C2) - union of references
                let mut parts = vec![first];
                while matches!(self.current_token(), Token::Comma) {
                    self.consume();
                    parts.push(self.parse_expression()?);
                }
                self.expect(&Token::RightParen)?;
                union_of(parts)
            }

            Token::LeftBrace => self.parse_array(),

            Token::CellRef(text) => {
                self.consume();
                let target = match CellAddress::parse(&text) {
                    Ok(address) => ReferenceTarget::Cell(address),
                    Err(_) => ReferenceTarget::Unresolved,
                };
                Ok(FormulaExpr::Reference(Reference::new(text, target)))
            }

            Token::ColumnRef(text) => {
                self.consume();
                let letters = text.strip_prefix('$').unwrap_or(&text);
                let target = match CellAddress::letters_to_column(letters) {
                    Ok(col) => ReferenceTarget::Column(col),
                    Err(_) => ReferenceTarget::Unresolved,
                };
                Ok(FormulaExpr::Reference(Reference::new(text, target)))
            }

            Token::Identifier(name) => {
                self.consume();
                if matches!(self.current_token(), Token::LeftParen) {
                    self.parse_function_call(name)
                } else {
                    Ok(FormulaExpr::Reference(Reference::new(
                        name,
                        ReferenceTarget::Unresolved,
                    )))
                }
            }

            token => Err(FormulaError::Parse(format!("Unexpected token: {:?}", token))),
        }
    }

    fn parse_array(&mut self) -> FormulaResult<FormulaExpr> {
        self.expect(&Token::LeftBrace)?;

        let mut rows = Vec::new();
        let mut current_row = Vec::new();

        if !matches!(self.current_token(), Token::RightBrace) {
            current_row.push(self.parse_expression()?);

            loop {
                match self.current_token() {
                    Token::Comma => {
                        self.consume();
                        current_row.push(self.parse_expression()?);
                    }
                    Token::Semicolon => {
                        self.consume();
                        rows.push(std::mem::take(&mut current_row));
                        current_row.push(self.parse_expression()?);
                    }
                    Token::RightBrace => break,
                    _ => {
                        return Err(FormulaError::Parse(
                            "Expected ',' ';' or '}' in array".into(),
                        ))
                    }
                }
            }
        }

        if !current_row.is_empty() {
            rows.push(current_row);
        }

        self.expect(&Token::RightBrace)?;
        Ok(FormulaExpr::Array(rows))
    }

    fn parse_function_call(&mut self, name: String) -> FormulaResult<FormulaExpr> {
        self.expect(&Token::LeftParen)?;

        let mut args = Vec::new();

        if !matches!(self.current_token(), Token::RightParen) {
            args.push(self.parse_expression()?);

            while matches!(self.current_token(), Token::Comma) {
                self.consume();
                args.push(self.parse_expression()?);
            }
        }

        self.expect(&Token::RightParen)?;

        Ok(FormulaExpr::Function {
            name: name.to_uppercase(),
            args,
        })
    }
}

fn binary(op: BinaryOperator, left: FormulaExpr, right: FormulaExpr) -> FormulaExpr {
    FormulaExpr::BinaryOp {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

/// `start:end`; cell-to-cell and column-to-column pairs resolve, anything else does not
fn join_range(start: Reference, end: Reference) -> Reference {
    let token = format!("{}:{}", start.token, end.token);
    let target = match (start.target, end.target) {
        (ReferenceTarget::Cell(a), ReferenceTarget::Cell(b)) => {
            ReferenceTarget::Range(CellRange::new(a, b))
        }
        (ReferenceTarget::Column(a), ReferenceTarget::Column(b)) => {
            ReferenceTarget::Range(CellRange::columns(a, b))
        }
        _ => ReferenceTarget::Unresolved,
    };
    Reference::new(token, target)
}

fn union_of(parts: Vec<FormulaExpr>) -> FormulaResult<FormulaExpr> {
    let mut tokens = Vec::with_capacity(parts.len());
    let mut ranges = Some(Vec::new());

    for part in parts {
        let FormulaExpr::Reference(reference) = part else {
            return Err(FormulaError::Parse(
                "Only references can be combined with ','".into(),
            ));
        };
        ranges = match (ranges, reference.ranges()) {
            (Some(mut acc), Some(more)) => {
                acc.extend(more);
                Some(acc)
            }
            _ => None,
        };
        tokens.push(reference.token);
    }

    let target = ranges.map_or(ReferenceTarget::Unresolved, ReferenceTarget::Union);
    Ok(FormulaExpr::Reference(Reference::new(
        tokens.join(","),
        target,
    )))
}

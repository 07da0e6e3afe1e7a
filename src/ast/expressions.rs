use std::fmt;

use crate::{
    ast::{CompareOp, LogicalOp},
    value::FloatLiteral,
};

/// Abstract Syntax Tree node representing a parsed statement.
///
/// Built once by the parser and never mutated afterwards, so one tree can
/// be evaluated against any number of records.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    // Literals
    /// Literal floating point number
    ///
    /// # Example
    /// ```text
    /// 500.0
    /// ```
    Float(f64),

    /// Literal integer
    ///
    /// # Example
    /// ```text
    /// 30
    /// ```
    Integer(i64),

    /// String literal
    ///
    /// # Example
    /// ```text
    /// "female"
    /// ```
    String(String),

    /// Boolean literal
    Boolean(bool),

    // Access
    /// Field of the bound `user` record.
    ///
    /// Holds the flattened key: everything after `user.`, so `user.balance`
    /// becomes `Field("balance")` and `user.a.b` becomes `Field("a.b")`.
    Field(String),

    // Operations
    /// Logical negation (`!`)
    Not(Box<Expr>),

    /// Comparison (`==`, `!=`, `<`, `<=`, `>`, `>=`)
    Compare {
        op: CompareOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Logical combination (`&&`, `||`)
    Logical {
        op: LogicalOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

/// Prints the canonical, fully parenthesised form.
///
/// ```
/// use sieve_lang::compile;
///
/// let stmt = compile("user.a || user.b && !user.c").unwrap();
/// assert_eq!(stmt.expr().to_string(), "(user.a || (user.b && !user.c))");
/// ```
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Float(n) => write!(f, "{}", FloatLiteral(*n)),
            Expr::Integer(n) => write!(f, "{}", n),
            Expr::String(s) => write!(f, "\"{}\"", s),
            Expr::Boolean(b) => write!(f, "{}", b),
            Expr::Field(key) => write!(f, "user.{}", key),
            Expr::Not(inner) => write!(f, "!{}", inner),
            Expr::Compare { op, left, right } => write!(f, "({} {} {})", left, op, right),
            Expr::Logical { op, left, right } => write!(f, "({} {} {})", left, op, right),
        }
    }
}

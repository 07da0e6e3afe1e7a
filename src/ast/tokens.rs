use std::fmt;

use crate::{lexer::Position, value::FloatLiteral};

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    /// Floating-point number (a digit run containing one `.`)
    ///
    /// # Examples
    /// ```text
    /// 500.0
    /// 3.14
    /// ```
    Float(f64),

    /// Integer
    ///
    /// # Examples
    /// ```text
    /// 42
    /// 500
    /// ```
    Integer(i64),

    /// String literal enclosed in double quotes, taken verbatim
    ///
    /// # Examples
    /// ```text
    /// "female"
    /// "yf2"
    /// ```
    String(String),

    /// Boolean values (`true`, `false`)
    Boolean(bool),

    // Identifiers
    /// Identifier or dotted path, kept whole
    ///
    /// The lexer does not check the shape of the path; the parser does.
    ///
    /// # Examples
    /// ```text
    /// user.balance
    /// user
    /// account.id
    /// ```
    Identifier(String),

    // Comparison
    /// Equality operator (`==`)
    EqEq,

    /// Inequality operator (`!=`)
    NotEq,

    /// Less than (`<`)
    Lt,

    /// Less than or equal (`<=`)
    LtEq,

    /// Greater than (`>`)
    Gt,

    /// Greater than or equal (`>=`)
    GtEq,

    // Logical
    /// Logical AND (`&&`)
    AndAnd,

    /// Logical OR (`||`)
    OrOr,

    /// Logical NOT (`!`)
    Bang,

    // Delimiters
    /// Left parenthesis
    LParen,

    /// Right parenthesis
    RParen,

    /// End of input
    Eof,
}

/// A token together with the offset it started at.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub position: Position,
}

impl Spanned {
    pub fn new(token: Token, position: Position) -> Self {
        Spanned { token, position }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Float(n) => write!(f, "{}", FloatLiteral(*n)),
            Token::Integer(n) => write!(f, "{}", n),
            Token::String(s) => write!(f, "\"{}\"", s),
            Token::Boolean(b) => write!(f, "{}", b),
            Token::Identifier(name) => write!(f, "{}", name),
            Token::EqEq => f.write_str("'=='"),
            Token::NotEq => f.write_str("'!='"),
            Token::Lt => f.write_str("'<'"),
            Token::LtEq => f.write_str("'<='"),
            Token::Gt => f.write_str("'>'"),
            Token::GtEq => f.write_str("'>='"),
            Token::AndAnd => f.write_str("'&&'"),
            Token::OrOr => f.write_str("'||'"),
            Token::Bang => f.write_str("'!'"),
            Token::LParen => f.write_str("'('"),
            Token::RParen => f.write_str("')'"),
            Token::Eof => f.write_str("end of input"),
        }
    }
}

//! Compile-once, evaluate-many predicates.
//!
//! A [`CompiledStatement`] owns its AST and nothing else. It is `Send + Sync`
//! and can be shared across threads; each [`CompiledStatement::test`] call
//! only reads the tree and the caller's record.

use std::{fmt, str::FromStr};

use log::{debug, trace};
use thiserror::Error;

use crate::{
    ast::Expr,
    evaluator::{EvalError, evaluate},
    lexer::{LexError, tokenize},
    parser::{ParseError, parse},
    value::{Record, Value},
};

/// A statement that could not be turned into an AST.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    #[error("Lex error: {0}")]
    Lex(#[from] LexError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
}

/// A parsed statement, ready to be tested against records.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledStatement {
    source: String,
    expr: Expr,
}

impl CompiledStatement {
    /// The statement text this was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Evaluates the statement without the boolean-result contract.
    pub fn evaluate(&self, record: &Record) -> Result<Value, EvalError> {
        evaluate(&self.expr, record)
    }

    /// Tests the record. Any non-boolean result is an error, never `false`.
    pub fn test(&self, record: &Record) -> Result<bool, EvalError> {
        let value = self.evaluate(record)?;
        trace!("{} => {}", self.source, value);
        match value {
            Value::Boolean(b) => Ok(b),
            other => Err(EvalError::NonBoolResult {
                found: other.type_name(),
            }),
        }
    }
}

impl fmt::Display for CompiledStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl FromStr for CompiledStatement {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        compile(s)
    }
}

/// Lexes and parses `text`.
///
/// # Examples
///
/// ```
/// use sieve_lang::{Record, Value, compile};
///
/// let stmt = compile(r#"user.gender == "male""#).unwrap();
///
/// let mut record = Record::new();
/// record.insert("gender".to_string(), Value::from("male"));
/// assert_eq!(stmt.test(&record), Ok(true));
///
/// assert!(compile("user").is_err());
/// ```
pub fn compile(text: &str) -> Result<CompiledStatement, CompileError> {
    let tokens = tokenize(text)?;
    let expr = parse(tokens)?;
    debug!("compiled statement {:?} as {}", text, expr);

    Ok(CompiledStatement {
        source: text.to_string(),
        expr,
    })
}

/// Free-function form of [`CompiledStatement::test`].
pub fn test(compiled: &CompiledStatement, record: &Record) -> Result<bool, EvalError> {
    compiled.test(record)
}

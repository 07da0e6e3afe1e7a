use std::cmp::Ordering;

use thiserror::Error;

use crate::{
    ast::{CompareOp, Expr, LogicalOp},
    value::{Record, Value},
};

/// Errors that can occur while evaluating a statement against a record.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// The record has no such field
    #[error("Unknown field: user.{field} is not present in the record")]
    UnknownField { field: String },

    /// Operand types are not valid for the operator
    #[error("Type error: cannot apply '{op}' to {}", operands(.left, .right))]
    TypeMismatch {
        op: &'static str,
        left: &'static str,
        right: Option<&'static str>,
    },

    /// A filter statement produced something other than a boolean
    #[error("Statement must evaluate to a boolean, got {found}")]
    NonBoolResult { found: &'static str },
}

fn operands(left: &str, right: &Option<&'static str>) -> String {
    match right {
        Some(right) => format!("{} and {}", left, right),
        None => left.to_string(),
    }
}

fn mismatch(op: &'static str, left: &Value, right: &Value) -> EvalError {
    EvalError::TypeMismatch {
        op,
        left: left.type_name(),
        right: Some(right.type_name()),
    }
}

/// Walks an AST against one record.
///
/// Holds nothing but a borrow of the record, so evaluation has no state
/// that outlives a call.
pub struct Evaluator<'r> {
    record: &'r Record,
}

impl<'r> Evaluator<'r> {
    pub fn new(record: &'r Record) -> Self {
        Evaluator { record }
    }

    pub fn eval(&self, expr: &Expr) -> Result<Value, EvalError> {
        match expr {
            Expr::Float(n) => Ok(Value::Float(*n)),
            Expr::Integer(n) => Ok(Value::Integer(*n)),
            Expr::String(s) => Ok(Value::String(s.clone())),
            Expr::Boolean(b) => Ok(Value::Boolean(*b)),
            Expr::Field(key) => self
                .record
                .get(key)
                .cloned()
                .ok_or_else(|| EvalError::UnknownField { field: key.clone() }),
            Expr::Not(inner) => match self.eval(inner)? {
                Value::Boolean(b) => Ok(Value::Boolean(!b)),
                other => Err(EvalError::TypeMismatch {
                    op: "!",
                    left: other.type_name(),
                    right: None,
                }),
            },
            Expr::Compare { op, left, right } => {
                let left = self.eval(left)?;
                let right = self.eval(right)?;
                apply_compare(*op, &left, &right).map(Value::Boolean)
            }
            Expr::Logical { op, left, right } => {
                // Both sides are always evaluated so errors never depend on
                // the other operand's value.
                let left = self.eval(left)?;
                let right = self.eval(right)?;
                apply_logical(*op, &left, &right).map(Value::Boolean)
            }
        }
    }
}

/// Evaluates `expr` against `record`.
///
/// # Examples
///
/// ```
/// use sieve_lang::{Record, Value, compile, evaluate};
///
/// let mut record = Record::new();
/// record.insert("age".to_string(), Value::Integer(25));
///
/// let stmt = compile("user.age <= 30").unwrap();
/// assert_eq!(evaluate(stmt.expr(), &record), Ok(Value::Boolean(true)));
/// ```
pub fn evaluate(expr: &Expr, record: &Record) -> Result<Value, EvalError> {
    Evaluator::new(record).eval(expr)
}

/// Numeric ordering. Integer pairs compare exactly; anything involving a
/// float promotes both sides to f64.
fn numeric_cmp(left: &Value, right: &Value) -> Option<Option<Ordering>> {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => Some(Some(a.cmp(b))),
        (a, b) => {
            let (a, b) = (a.as_float()?, b.as_float()?);
            Some(a.partial_cmp(&b))
        }
    }
}

fn apply_compare(op: CompareOp, left: &Value, right: &Value) -> Result<bool, EvalError> {
    let symbol = op.symbol();

    if let Some(ordering) = numeric_cmp(left, right) {
        // `None` means a NaN was involved: only `!=` holds.
        return Ok(match (op, ordering) {
            (CompareOp::Equal, o) => o == Some(Ordering::Equal),
            (CompareOp::NotEqual, o) => o != Some(Ordering::Equal),
            (_, None) => false,
            (CompareOp::LessThan, Some(o)) => o == Ordering::Less,
            (CompareOp::LessEqual, Some(o)) => o != Ordering::Greater,
            (CompareOp::GreaterThan, Some(o)) => o == Ordering::Greater,
            (CompareOp::GreaterEqual, Some(o)) => o != Ordering::Less,
        });
    }

    if op.is_ordering() {
        return Err(mismatch(symbol, left, right));
    }

    let equal = match (left, right) {
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Boolean(a), Value::Boolean(b)) => a == b,
        (a, b) => return Err(mismatch(symbol, a, b)),
    };

    Ok(if op == CompareOp::Equal { equal } else { !equal })
}

fn apply_logical(op: LogicalOp, left: &Value, right: &Value) -> Result<bool, EvalError> {
    match (left, right) {
        (Value::Boolean(a), Value::Boolean(b)) => Ok(match op {
            LogicalOp::And => *a && *b,
            LogicalOp::Or => *a || *b,
        }),
        (a, b) => Err(mismatch(op.symbol(), a, b)),
    }
}

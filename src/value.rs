use std::{collections::HashMap, fmt};

/// A scalar value produced by a record field, a literal, or an evaluation.
///
/// The set of variants is closed. There is no implicit coercion between
/// strings and numbers; integers and floats only meet through numeric
/// promotion inside the evaluator.
///
/// # Examples
///
/// ```
/// use sieve_lang::Value;
///
/// let name = Value::String("yf2".to_string());
/// let age = Value::Integer(27);
/// let ratio = Value::Float(0.5);
/// let active = Value::Boolean(true);
///
/// assert_eq!(age.as_float(), Some(27.0));
/// assert_eq!(name.as_float(), None);
/// assert_eq!(ratio.type_name(), "float");
/// assert_eq!(active.as_bool(), Some(true));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// UTF-8 string
    String(String),

    /// Integer number (kept apart from floats)
    Integer(i64),

    /// Double-precision floating-point number
    Float(f64),

    /// Boolean (true/false)
    Boolean(bool),
}

/// One row of input: field name to value.
///
/// Built once by the ingestion layer and only read during evaluation.
pub type Record = HashMap<String, Value>;

impl Value {
    /// Human-readable variant name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Boolean(_) => "boolean",
        }
    }

    /// Get as float, promoting integers.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::Float(_))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", FloatLiteral(*n)),
            Value::Boolean(b) => write!(f, "{}", b),
        }
    }
}

/// Prints a float the way the lexer reads it back: plain digits, never an
/// exponent, always with a `.`.
pub(crate) struct FloatLiteral(pub(crate) f64);

impl fmt::Display for FloatLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.0.to_string();
        if self.0.is_finite() && !text.contains('.') {
            write!(f, "{}.0", text)
        } else {
            f.write_str(&text)
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

#[test]
fn test_display() {
    assert_eq!(Value::from("male").to_string(), "\"male\"");
    assert_eq!(Value::Integer(500).to_string(), "500");
    assert_eq!(Value::Float(500.0).to_string(), "500.0");
    assert_eq!(Value::Boolean(false).to_string(), "false");
    assert_eq!(Value::Float(1e20).to_string(), "100000000000000000000.0");
    assert_eq!(Value::Float(1e-8).to_string(), "0.00000001");
    assert_eq!(Value::Float(2.5).to_string(), "2.5");
}

//! Count and average a numeric field over the records a statement selects.
//!
//! Integer values are summed exactly as [`Decimal`]; Float values are
//! summed as `f64` in row order. The two parts are combined once, when the
//! average is taken.

use log::debug;
use rayon::prelude::*;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use thiserror::Error;

use crate::{
    evaluator::EvalError,
    predicate::CompiledStatement,
    value::{Record, Value},
};

/// Result of an aggregation over the matching records.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aggregate {
    pub match_count: usize,
    pub sum: f64,
    pub average: f64,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AggregateError {
    /// Evaluating the statement, or reading the field, failed on a row
    #[error("row {row}: {source}")]
    Row { row: usize, source: EvalError },

    /// No record matched, so there is nothing to average
    #[error("No records matched the statement; average is undefined")]
    NoMatches,

    /// Finite values added up to a sum outside the representable range
    #[error("Sum of user.{field} overflowed")]
    Overflow { field: String },
}

#[derive(Debug, Clone, Copy, Default)]
struct Partial {
    integers: Decimal,
    floats: f64,
    count: usize,
}

/// Adds two float sums, failing only when finite operands leave the range.
/// Non-finite inputs propagate as IEEE arithmetic does.
fn add_floats(a: f64, b: f64, field: &str) -> Result<f64, AggregateError> {
    let sum = a + b;
    if sum.is_infinite() && a.is_finite() && b.is_finite() {
        return Err(AggregateError::Overflow {
            field: field.to_string(),
        });
    }
    Ok(sum)
}

impl Partial {
    fn merge(self, other: Partial, field: &str) -> Result<Partial, AggregateError> {
        let integers = self
            .integers
            .checked_add(other.integers)
            .ok_or_else(|| AggregateError::Overflow {
                field: field.to_string(),
            })?;
        Ok(Partial {
            integers,
            floats: add_floats(self.floats, other.floats, field)?,
            count: self.count + other.count,
        })
    }

    fn finish(self, field: &str) -> Result<Aggregate, AggregateError> {
        if self.count == 0 {
            return Err(AggregateError::NoMatches);
        }

        let integers = self
            .integers
            .to_f64()
            .ok_or_else(|| AggregateError::Overflow {
                field: field.to_string(),
            })?;
        let sum = add_floats(integers, self.floats, field)?;

        Ok(Aggregate {
            match_count: self.count,
            sum,
            average: sum / self.count as f64,
        })
    }
}

/// What a single row adds: nothing when it does not match, otherwise its
/// field value.
fn contribution(
    compiled: &CompiledStatement,
    row: usize,
    record: &Record,
    field: &str,
) -> Result<Partial, AggregateError> {
    let row_error = |source| AggregateError::Row { row, source };

    if !compiled.test(record).map_err(row_error)? {
        return Ok(Partial::default());
    }

    let value = record.get(field).ok_or_else(|| {
        row_error(EvalError::UnknownField {
            field: field.to_string(),
        })
    })?;

    match value {
        Value::Integer(n) => Ok(Partial {
            integers: Decimal::from(*n),
            floats: 0.0,
            count: 1,
        }),
        Value::Float(n) => Ok(Partial {
            integers: Decimal::ZERO,
            floats: *n,
            count: 1,
        }),
        other => Err(row_error(EvalError::TypeMismatch {
            op: "average",
            left: other.type_name(),
            right: None,
        })),
    }
}

/// Folds contributions in row order, stopping at the first failure.
fn fold<I>(parts: I, field: &str) -> Result<Partial, AggregateError>
where
    I: IntoIterator<Item = Result<Partial, AggregateError>>,
{
    parts
        .into_iter()
        .try_fold(Partial::default(), |total, part| total.merge(part?, field))
}

/// Averages `field` over the records `compiled` selects, in input order.
///
/// The first failing row aborts the whole aggregation.
///
/// # Examples
///
/// ```
/// use sieve_lang::{Record, Value, aggregate::aggregate, compile};
///
/// let records: Vec<Record> = [(10, 500), (25, 1000), (28, 900)]
///     .into_iter()
///     .map(|(age, balance)| {
///         Record::from([
///             ("age".to_string(), Value::Integer(age)),
///             ("balance".to_string(), Value::Integer(balance)),
///         ])
///     })
///     .collect();
///
/// let stmt = compile("user.age > 20").unwrap();
/// let result = aggregate(&stmt, &records, "balance").unwrap();
/// assert_eq!(result.match_count, 2);
/// assert_eq!(result.average, 950.0);
/// ```
pub fn aggregate(
    compiled: &CompiledStatement,
    records: &[Record],
    field: &str,
) -> Result<Aggregate, AggregateError> {
    let parts = records
        .iter()
        .enumerate()
        .map(|(row, record)| contribution(compiled, row, record, field));

    let result = fold(parts, field)?.finish(field)?;
    debug!(
        "aggregated user.{} over {} of {} records",
        field,
        result.match_count,
        records.len()
    );
    Ok(result)
}

/// Same result as [`aggregate`], with rows tested on the rayon pool.
///
/// Contributions are folded in row order afterwards, so the float sum and
/// any reported failure are identical to the sequential version.
pub fn aggregate_parallel(
    compiled: &CompiledStatement,
    records: &[Record],
    field: &str,
) -> Result<Aggregate, AggregateError> {
    let parts: Vec<Result<Partial, AggregateError>> = records
        .par_iter()
        .enumerate()
        .map(|(row, record)| contribution(compiled, row, record, field))
        .collect();

    let result = fold(parts, field)?.finish(field)?;
    debug!(
        "aggregated user.{} over {} of {} records on {} threads",
        field,
        result.match_count,
        records.len(),
        rayon::current_num_threads()
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile;

    fn record(balance: Value) -> Record {
        Record::from([("balance".to_string(), balance)])
    }

    #[test]
    fn test_no_matches() {
        let stmt = compile("false").unwrap();
        let records = vec![record(Value::Integer(1))];
        assert_eq!(aggregate(&stmt, &records, "balance"), Err(AggregateError::NoMatches));
        assert_eq!(aggregate(&stmt, &[], "balance"), Err(AggregateError::NoMatches));
    }

    #[test]
    fn test_mixed_numeric_field() {
        let stmt = compile("true").unwrap();
        let records = vec![record(Value::Integer(1)), record(Value::Float(2.5))];
        let result = aggregate(&stmt, &records, "balance").unwrap();
        assert_eq!(result.sum, 3.5);
        assert_eq!(result.average, 1.75);
    }

    #[test]
    fn test_non_finite_field_propagates() {
        let stmt = compile("true").unwrap();
        let records = vec![record(Value::Integer(1)), record(Value::Float(f64::INFINITY))];
        assert_eq!(aggregate(&stmt, &records, "balance").unwrap().average, f64::INFINITY);

        let records = vec![record(Value::Float(f64::NAN)), record(Value::Integer(1))];
        assert!(aggregate(&stmt, &records, "balance").unwrap().average.is_nan());
    }

    #[test]
    fn test_float_overflow() {
        let stmt = compile("true").unwrap();
        let records = vec![record(Value::Float(f64::MAX)), record(Value::Float(f64::MAX))];
        let expected = Err(AggregateError::Overflow {
            field: "balance".to_string(),
        });
        assert_eq!(aggregate(&stmt, &records, "balance"), expected);
        assert_eq!(aggregate_parallel(&stmt, &records, "balance"), expected);
    }
}

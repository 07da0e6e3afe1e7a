//! Row filtering: one predicate, many records, input order preserved.

use thiserror::Error;

use crate::{evaluator::EvalError, predicate::CompiledStatement, value::Record};

/// An evaluation failure attributed to the row that caused it.
///
/// Rows are numbered from 0 in input order.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("row {row}: {source}")]
pub struct RowError {
    pub row: usize,
    pub source: EvalError,
}

/// Tests every record, stopping at the first failure.
///
/// # Examples
///
/// ```
/// use sieve_lang::{Record, Value, compile, filter::matches};
///
/// let records: Vec<Record> = [10, 40]
///     .into_iter()
///     .map(|age| Record::from([("age".to_string(), Value::Integer(age))]))
///     .collect();
///
/// let stmt = compile("user.age <= 30").unwrap();
/// assert_eq!(matches(&stmt, &records).unwrap(), vec![true, false]);
/// ```
pub fn matches(compiled: &CompiledStatement, records: &[Record]) -> Result<Vec<bool>, RowError> {
    records
        .iter()
        .enumerate()
        .map(|(row, record)| compiled.test(record).map_err(|source| RowError { row, source }))
        .collect()
}

/// Returns the records the statement selects, in input order.
pub fn select<'a>(
    compiled: &CompiledStatement,
    records: &'a [Record],
) -> Result<Vec<&'a Record>, RowError> {
    let flags = matches(compiled, records)?;
    Ok(records
        .iter()
        .zip(flags)
        .filter_map(|(record, matched)| matched.then_some(record))
        .collect())
}

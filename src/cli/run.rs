//! Execute sieve statements against CSV input

use log::info;

use super::CliError;
use crate::{
    Aggregate, Expr, IngestOptions, Record, aggregate, aggregate_parallel, compile,
    ingest::read_records, matches,
};

/// What to do with the compiled statement
#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    /// Only compile, don't touch any records
    Check,
    /// Test every record
    Filter,
    /// Average a numeric field over the matching records
    Average { field: String, parallel: bool },
}

/// Options for a run
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// The statement to compile
    pub statement: String,
    /// CSV input text
    pub input: Option<String>,
    pub mode: Mode,
    pub ingest: IngestOptions,
}

/// Result of a run
#[derive(Debug)]
pub enum RunResult {
    /// The statement compiled to this AST
    Compiled(Expr),
    /// Every record with its verdict, in input order
    Matches(Vec<(Record, bool)>),
    Average(Aggregate),
}

/// Parses a `FROM=TO` header rename.
pub fn parse_rename(s: &str) -> Result<(String, String), CliError> {
    match s.split_once('=') {
        Some((from, to)) if !from.is_empty() && !to.is_empty() => {
            Ok((from.to_string(), to.to_string()))
        }
        _ => Err(CliError::InvalidRename(s.to_string())),
    }
}

/// Execute a run.
///
/// Records are read before the statement is compiled, so bad input fails
/// the run even when the statement is also bad.
pub fn execute(options: &RunOptions) -> Result<RunResult, CliError> {
    let (field, parallel) = match &options.mode {
        Mode::Check => {
            let compiled = compile(&options.statement)?;
            return Ok(RunResult::Compiled(compiled.expr().clone()));
        }
        Mode::Filter => (None, false),
        Mode::Average { field, parallel } => (Some(field), *parallel),
    };

    let csv = options.input.as_ref().ok_or(CliError::NoInput)?;
    let records = read_records(csv.as_bytes(), &options.ingest)?;
    info!("loaded {} records", records.len());

    let compiled = compile(&options.statement)?;

    match field {
        None => {
            let flags = matches(&compiled, &records)?;
            Ok(RunResult::Matches(records.into_iter().zip(flags).collect()))
        }
        Some(field) => {
            let result = if parallel {
                aggregate_parallel(&compiled, &records, field)?
            } else {
                aggregate(&compiled, &records, field)?
            };
            Ok(RunResult::Average(result))
        }
    }
}

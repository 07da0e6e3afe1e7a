//! CLI support for sieve-lang
//!
//! Runs statements against CSV input and renders the results. The binary
//! is a thin clap wrapper around [`execute`].

mod convert;
mod docs;
mod run;

pub use convert::{aggregate_to_json, format_record, record_to_json};
pub use docs::{describe_fields, get_statement_reference};
pub use run::{Mode, RunOptions, RunResult, execute, parse_rename};

use std::io;

use thiserror::Error;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Invalid statement: {0}")]
    Compile(#[from] crate::CompileError),

    #[error("Evaluation error: {0}")]
    Eval(#[from] crate::RowError),

    #[error("Aggregation error: {0}")]
    Aggregate(#[from] crate::AggregateError),

    #[error("Failed reading records: {0}")]
    Ingest(#[from] crate::IngestError),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("No input provided. Use --data or pipe CSV to stdin.")]
    NoInput,

    #[error("Invalid rename '{0}': expected FROM=TO")]
    InvalidRename(String),
}

//! CSV ingestion: turns a header-led CSV file into typed [`Record`]s.
//!
//! Header names are renamed first, then cells under the configured numeric
//! fields are decoded as integers. Every other cell stays a string. Any
//! decode failure aborts the whole read.

use std::{fs::File, io::Read, path::Path};

use csv::{ReaderBuilder, Trim};
use log::debug;
use thiserror::Error;

use crate::value::{Record, Value};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("row {row}: field '{field}' is not an integer: {value:?}")]
    InvalidNumber {
        row: usize,
        field: String,
        value: String,
    },
}

/// How raw CSV columns become record fields.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestOptions {
    /// Header renames, applied before anything else (`from`, `to`).
    pub renames: Vec<(String, String)>,
    /// Fields (after renaming) decoded as integers.
    pub numeric_fields: Vec<String>,
}

impl Default for IngestOptions {
    fn default() -> Self {
        IngestOptions {
            renames: vec![
                ("accountBalance".to_string(), "balance".to_string()),
                ("userId".to_string(), "id".to_string()),
            ],
            numeric_fields: vec!["age".to_string(), "balance".to_string()],
        }
    }
}

impl IngestOptions {
    fn field_name(&self, header: &str) -> String {
        self.renames
            .iter()
            .find(|(from, _)| from == header)
            .map(|(_, to)| to.clone())
            .unwrap_or_else(|| header.to_string())
    }

    fn is_numeric(&self, field: &str) -> bool {
        self.numeric_fields.iter().any(|f| f == field)
    }
}

/// Reads all records from CSV text with a header row.
///
/// Data rows are numbered from 1 in errors.
///
/// # Examples
///
/// ```
/// use sieve_lang::{Value, ingest::{IngestOptions, read_records}};
///
/// let csv = "userId,gender,age,accountBalance\nyf2,female,27,1000\n";
/// let records = read_records(csv.as_bytes(), &IngestOptions::default()).unwrap();
///
/// assert_eq!(records[0]["id"], Value::from("yf2"));
/// assert_eq!(records[0]["balance"], Value::Integer(1000));
/// ```
pub fn read_records<R: Read>(reader: R, options: &IngestOptions) -> Result<Vec<Record>, IngestError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let fields: Vec<String> = rdr
        .headers()?
        .iter()
        .map(|h| options.field_name(h))
        .collect();

    let mut records = Vec::new();
    for (index, result) in rdr.records().enumerate() {
        let row = index + 1;
        let line = result?;

        let mut record = Record::with_capacity(fields.len());
        for (field, cell) in fields.iter().zip(line.iter()) {
            let value = if options.is_numeric(field) {
                let n = cell.parse::<i64>().map_err(|_| IngestError::InvalidNumber {
                    row,
                    field: field.clone(),
                    value: cell.to_string(),
                })?;
                Value::Integer(n)
            } else {
                Value::String(cell.to_string())
            };
            record.insert(field.clone(), value);
        }
        records.push(record);
    }

    debug!("ingested {} records with fields {:?}", records.len(), fields);
    Ok(records)
}

/// Reads all records from a CSV file on disk.
pub fn read_records_path<P: AsRef<Path>>(
    path: P,
    options: &IngestOptions,
) -> Result<Vec<Record>, IngestError> {
    let file = File::open(path.as_ref())?;
    read_records(file, options)
}

//! Record and result rendering

use serde_json::{Map, json};

use crate::{Aggregate, Record, Value};

fn value_to_json(v: &Value) -> serde_json::Value {
    match v {
        Value::Boolean(b) => serde_json::Value::Bool(*b),
        Value::Integer(i) => serde_json::Value::Number((*i).into()),
        Value::Float(f) => serde_json::Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::String(s) => serde_json::Value::String(s.clone()),
    }
}

/// Convert a record to a JSON object (keys sorted)
pub fn record_to_json(record: &Record) -> serde_json::Value {
    let map: Map<String, serde_json::Value> = record
        .iter()
        .map(|(k, v)| (k.clone(), value_to_json(v)))
        .collect();
    serde_json::Value::Object(map)
}

pub fn aggregate_to_json(result: &Aggregate) -> serde_json::Value {
    json!({
        "match_count": result.match_count,
        "sum": result.sum,
        "average": result.average,
    })
}

/// One-line text form of a record, fields sorted by name.
///
/// ```
/// use sieve_lang::{Record, Value, cli::format_record};
///
/// let record = Record::from([
///     ("gender".to_string(), Value::from("male")),
///     ("age".to_string(), Value::Integer(10)),
/// ]);
/// assert_eq!(format_record(&record), r#"{age: 10, gender: "male"}"#);
/// ```
pub fn format_record(record: &Record) -> String {
    let mut keys: Vec<&String> = record.keys().collect();
    keys.sort();

    let fields: Vec<String> = keys
        .into_iter()
        .map(|k| format!("{}: {}", k, record[k]))
        .collect();
    format!("{{{}}}", fields.join(", "))
}

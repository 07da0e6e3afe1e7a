//! Statement reference and field listing for the sieve CLI

use std::collections::BTreeMap;

use crate::Record;

/// Get the statement language reference
pub fn get_statement_reference() -> &'static str {
    r#"SIEVE STATEMENTS

A statement is a boolean expression evaluated once per record. The record is
bound to the name `user`; fields are read as user.<field>. Records for which
the statement is true are selected. A statement that yields anything other
than a boolean is an error, never a silent `false`.

  user.balance >= 500 && user.gender == "female" && user.age <= 30

LITERALS
  "text"            String (no escapes; characters taken verbatim)
  42                Integer
  500.0             Float
  true  false       Boolean

OPERATORS (loosest first)
  ||                Logical OR         both sides must be booleans
  &&                Logical AND        both sides must be booleans
  !                 Logical NOT        applies to the comparison on its right
  == !=             Equality           numbers, strings, booleans (same kind)
  < <= > >=         Ordering           numbers only
  ( ... )           Grouping

  Integers and floats compare numerically with each other.
  Comparisons do not chain: write a < b && b < c, not a < b < c.

EXAMPLES
  sieve filter 'user.gender == "male"'
  sieve average 'user.age <= 30' --field balance
  sieve check '!(user.age < 18) || user.id == "yf2"'
"#
}

/// List the fields of the given records with their types, as usable keys.
///
/// ```
/// use sieve_lang::{Record, Value, cli::describe_fields};
///
/// let record = Record::from([
///     ("id".to_string(), Value::from("xm1")),
///     ("age".to_string(), Value::Integer(10)),
/// ]);
/// assert_eq!(
///     describe_fields(&[record]),
///     "  user.age        (integer)\n  user.id         (string)\n"
/// );
/// ```
pub fn describe_fields(records: &[Record]) -> String {
    let mut fields: BTreeMap<&str, &'static str> = BTreeMap::new();
    for record in records {
        for (name, value) in record {
            fields.entry(name.as_str()).or_insert(value.type_name());
        }
    }

    fields
        .into_iter()
        .map(|(name, kind)| format!("  {:<15} ({})\n", format!("user.{}", name), kind))
        .collect()
}

pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Lift nested objects (a row's `breakdown`) into the row itself so each
/// figure gets its own column.
pub fn flatten_row(map: &Map<String, Value>) -> Vec<(String, Value)> {
    let mut out = Vec::with_capacity(map.len());
    for (key, val) in map {
        match val {
            Value::Object(inner) => out.extend(flatten_row(inner)),
            _ => out.push((key.clone(), val.clone())),
        }
    }
    out
}

/// Arrays of row objects inside a result, e.g. `rows` and `periods`.
pub fn row_sections(result: &Map<String, Value>) -> Vec<(&str, &[Value])> {
    result
        .iter()
        .filter_map(|(key, val)| match val {
            Value::Array(items) if items.iter().all(Value::is_object) && !items.is_empty() => {
                Some((key.as_str(), items.as_slice()))
            }
            _ => None,
        })
        .collect()
}

use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{cell, is_record_list};

/// Format output as tables using the tabled crate.
///
/// Scalar result fields go in one Field/Value table; every list of records
/// (mitigation options, sensitivity rows, suite runs) gets its own table.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result_table(result, map);
            } else {
                print_object(map);
            }
        }
        Value::Array(arr) => print_records(arr),
        _ => println!("{}", value),
    }
}

fn print_result_table(result: &Value, envelope: &Map<String, Value>) {
    match result {
        Value::Object(res_map) => print_object(res_map),
        _ => println!("{}", cell(result)),
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_object(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        if !is_record_list(val) {
            builder.push_record([key.clone(), summarise(val)]);
        }
    }
    println!("{}", Table::from(builder));

    for (key, val) in map {
        if let Value::Array(records) = val {
            if is_record_list(val) {
                println!("\n{}:", key);
                print_records(records);
            }
        }
    }
}

fn print_records(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if !arr.iter().all(Value::is_object) {
        for item in arr {
            println!("{}", summarise(item));
        }
        return;
    }

    // Rows may carry different keys (e.g. template parameters), so take
    // the union of columns in first-seen order.
    let rows: Vec<Vec<(String, String)>> = arr.iter().map(shallow_row).collect();
    let mut headers: Vec<String> = Vec::new();
    for row in &rows {
        for (key, _) in row {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    let mut builder = Builder::default();
    builder.push_record(headers.clone());
    for row in &rows {
        let record: Vec<String> = headers
            .iter()
            .map(|h| {
                row.iter()
                    .find(|(k, _)| k == h)
                    .map(|(_, v)| v.clone())
                    .unwrap_or_default()
            })
            .collect();
        builder.push_record(record);
    }
    println!("{}", Table::from(builder));
}

/// One level of nested objects becomes dotted columns; deeper lists are
/// summarised rather than expanded.
fn shallow_row(item: &Value) -> Vec<(String, String)> {
    let mut row = Vec::new();
    if let Value::Object(map) = item {
        for (key, val) in map {
            match val {
                Value::Object(inner) => {
                    for (inner_key, inner_val) in inner {
                        row.push((format!("{key}.{inner_key}"), summarise(inner_val)));
                    }
                }
                _ => row.push((key.clone(), summarise(val))),
            }
        }
    }
    row
}

fn summarise(value: &Value) -> String {
    match value {
        Value::Array(items) if is_record_list(value) => format!("{} rows", items.len()),
        Value::Array(items) => items.iter().map(cell).collect::<Vec<_>>().join(", "),
        Value::Null => "null".to_string(),
        _ => cell(value),
    }
}

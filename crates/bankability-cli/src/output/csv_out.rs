use serde_json::Value;
use std::io;

use super::flatten_into;

/// Write output as CSV to stdout.
///
/// A result envelope becomes two-column `field,value` rows with nested
/// lists flattened to indexed paths; a top-level array becomes one row per
/// element.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Array(arr) => write_rows(&mut wtr, arr),
        Value::Object(map) => {
            let body = map.get("result").unwrap_or(value);
            let mut fields = Vec::new();
            flatten_into("", body, &mut fields);
            let _ = wtr.write_record(["field", "value"]);
            for (key, val) in &fields {
                let _ = wtr.write_record([key.as_str(), val.as_str()]);
            }
        }
        _ => {
            let _ = wtr.write_record([super::cell(value)]);
        }
    }

    let _ = wtr.flush();
}

fn write_rows(wtr: &mut csv::Writer<io::StdoutLock<'_>>, arr: &[Value]) {
    let rows: Vec<Vec<(String, String)>> = arr
        .iter()
        .map(|item| {
            let mut row = Vec::new();
            flatten_into("", item, &mut row);
            row
        })
        .collect();

    let mut headers: Vec<String> = Vec::new();
    for row in &rows {
        for (key, _) in row {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }
    if headers.is_empty() {
        return;
    }

    let _ = wtr.write_record(&headers);
    for row in &rows {
        let record: Vec<&str> = headers
            .iter()
            .map(|h| {
                row.iter()
                    .find(|(k, _)| k == h)
                    .map(|(_, v)| v.as_str())
                    .unwrap_or("")
            })
            .collect();
        let _ = wtr.write_record(&record);
    }
}

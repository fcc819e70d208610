use serde_json::Value;

use super::cell;

/// Print just the headline value from the output.
///
/// Looks for well-known result fields in priority order, then falls back
/// to the first field in the result object.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let priority_keys = [
        "financial_impact",
        "worst_case",
        "covenant_status",
        "annual_volume_required",
    ];

    if let Value::Object(map) = result_obj {
        for key in &priority_keys {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    println!("{}", cell(val));
                    return;
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, cell(val));
            return;
        }
    }

    // Template listings: one name per line
    if let Value::Array(items) = result_obj {
        for item in items {
            match item.get("name") {
                Some(name) => println!("{}", cell(name)),
                None => println!("{}", cell(item)),
            }
        }
        return;
    }

    println!("{}", cell(result_obj));
}

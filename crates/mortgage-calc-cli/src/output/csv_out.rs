use serde_json::Value;
use std::io;

use super::{as_entries, entry_highlighted, entry_label, plain_value, render_entry};

/// Write output as CSV to stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Object(map) => match map.get("result") {
            Some(result) if as_entries(result).is_some() => {
                let _ = wtr.write_record(["label", "value", "display", "format", "highlight"]);
                for entry in as_entries(result).into_iter().flatten().filter_map(Value::as_object) {
                    let _ = wtr.write_record([
                        entry_label(entry),
                        &entry.get("value").map(plain_value).unwrap_or_default(),
                        &render_entry(entry),
                        entry.get("format").and_then(Value::as_str).unwrap_or_default(),
                        if entry_highlighted(entry) { "true" } else { "false" },
                    ]);
                }
            }
            Some(Value::Object(result)) => {
                // Schedule output: emit whichever row set is present
                match result.get("months").or_else(|| result.get("years")) {
                    Some(Value::Array(rows)) => write_array_csv(&mut wtr, rows),
                    _ => write_fields(&mut wtr, result),
                }
            }
            _ => write_fields(&mut wtr, map),
        },
        Value::Array(arr) => write_array_csv(&mut wtr, arr),
        _ => {
            let _ = wtr.write_record([&plain_value(value)]);
        }
    }

    let _ = wtr.flush();
}

fn write_fields(wtr: &mut csv::Writer<io::StdoutLock<'_>>, map: &serde_json::Map<String, Value>) {
    let _ = wtr.write_record(["field", "value"]);
    for (key, val) in map {
        let _ = wtr.write_record([key.as_str(), &plain_value(val)]);
    }
}

fn write_array_csv(wtr: &mut csv::Writer<io::StdoutLock<'_>>, arr: &[Value]) {
    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        let _ = wtr.write_record(&headers);

        for map in arr.iter().filter_map(Value::as_object) {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(plain_value).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&row);
        }
    } else {
        for item in arr {
            let _ = wtr.write_record([&plain_value(item)]);
        }
    }
}

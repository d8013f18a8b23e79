use serde_json::Value;

use super::{as_entries, entry_highlighted, plain_value, render_entry};

/// Print just the headline answer.
///
/// For calculator output that is the first highlighted entry (or the first
/// entry when none is highlighted); for a schedule it is the monthly payment.
pub fn print_minimal(value: &Value) {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Some(entries) = as_entries(result) {
        let headline = entries
            .iter()
            .filter_map(Value::as_object)
            .find(|e| entry_highlighted(e))
            .or_else(|| entries.first().and_then(Value::as_object));
        if let Some(entry) = headline {
            println!("{}", render_entry(entry));
        }
        return;
    }

    if let Some(payment) = result.get("monthly_payment") {
        println!("{}", plain_value(payment));
        return;
    }

    if let Value::Object(map) = result {
        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, plain_value(val));
            return;
        }
    }

    println!("{}", plain_value(result));
}

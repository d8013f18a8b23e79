pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use mortgage_calc_core::render::{format_currency, format_number, format_percentage};
use mortgage_calc_core::Recommendation;
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::str::FromStr;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Result entries serialise as `{ label, value, format, description, highlight }`.
pub(crate) fn as_entries(result: &Value) -> Option<&Vec<Value>> {
    let entries = result.as_array()?;
    let all_labeled = entries
        .iter()
        .all(|e| e.get("label").is_some() && e.get("format").is_some());
    all_labeled.then_some(entries)
}

pub(crate) fn entry_label(entry: &Map<String, Value>) -> &str {
    entry.get("label").and_then(Value::as_str).unwrap_or_default()
}

pub(crate) fn entry_highlighted(entry: &Map<String, Value>) -> bool {
    entry.get("highlight").and_then(Value::as_bool).unwrap_or(false)
}

/// Display text for one serialised entry, matching the results panel.
pub(crate) fn render_entry(entry: &Map<String, Value>) -> String {
    let format = entry.get("format").and_then(Value::as_str).unwrap_or("number");
    let raw = match entry.get("value") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => return other.to_string(),
        None => return String::new(),
    };

    if raw == "Infinity" {
        return "Never".to_string();
    }
    if format == "text" {
        return match raw.as_str() {
            "buy" => Recommendation::Buy.verdict().to_string(),
            "rent" => Recommendation::Rent.verdict().to_string(),
            "neutral" => Recommendation::Neutral.verdict().to_string(),
            _ => raw,
        };
    }

    match Decimal::from_str(&raw) {
        Ok(v) => match format {
            "currency" => format_currency(v),
            "percentage" => format_percentage(v),
            _ => format_number(v),
        },
        Err(_) => raw,
    }
}

pub(crate) fn plain_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

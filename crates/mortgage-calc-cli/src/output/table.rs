use colored::Colorize;
use mortgage_calc_core::render::format_currency;
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::str::FromStr;
use tabled::{builder::Builder, Table};

use super::{as_entries, entry_highlighted, entry_label, plain_value, render_entry};

/// Schedule columns as (field, header, is money).
const MONTH_COLUMNS: [(&str, &str, bool); 5] = [
    ("month", "Month", false),
    ("payment", "Payment", true),
    ("principal", "Principal", true),
    ("interest", "Interest", true),
    ("balance", "Balance", true),
];

const YEAR_COLUMNS: [(&str, &str, bool); 4] = [
    ("year", "Year", false),
    ("principal_paid", "Principal Paid", true),
    ("interest_paid", "Interest Paid", true),
    ("ending_balance", "Ending Balance", true),
];

/// Render calculator results, schedules or validation outcomes as tables.
pub fn print_table(value: &Value) {
    let Some(envelope) = value.as_object() else {
        println!("{}", plain_value(value));
        return;
    };

    match envelope.get("result") {
        Some(result) => {
            if let Some(entries) = as_entries(result) {
                print_entries(entries);
            } else if let Some(schedule) = result.as_object() {
                print_schedule(schedule);
            } else {
                println!("{}", plain_value(result));
            }
            print_notes(envelope);
        }
        None => print_outcome(envelope),
    }
}

fn print_entries(entries: &[Value]) {
    let mut builder = Builder::default();
    builder.push_record(["Result", "Value"]);
    for entry in entries.iter().filter_map(Value::as_object) {
        let label = entry_label(entry);
        let shown = render_entry(entry);
        if entry_highlighted(entry) {
            builder.push_record([label.bold().to_string(), shown.bold().to_string()]);
        } else {
            builder.push_record([label.to_string(), shown]);
        }
    }
    println!("{}", Table::from(builder));
}

fn print_schedule(schedule: &Map<String, Value>) {
    for (field, title) in [("monthly_payment", "Monthly Payment"), ("total_interest", "Total Interest")] {
        if let Some(v) = schedule.get(field) {
            println!("{title}: {}", money(v));
        }
    }
    if let Some(Value::Array(rows)) = schedule.get("months") {
        println!();
        print_rows(rows, &MONTH_COLUMNS);
    }
    if let Some(Value::Array(rows)) = schedule.get("years") {
        println!();
        print_rows(rows, &YEAR_COLUMNS);
    }
}

fn print_rows(rows: &[Value], columns: &[(&str, &str, bool)]) {
    let mut builder = Builder::default();
    builder.push_record(columns.iter().map(|(_, header, _)| *header));
    for row in rows.iter().filter_map(Value::as_object) {
        builder.push_record(columns.iter().map(|(field, _, is_money)| {
            match row.get(*field) {
                Some(v) if *is_money => money(v),
                Some(v) => plain_value(v),
                None => String::new(),
            }
        }));
    }
    println!("{}", Table::from(builder));
}

/// `--validate-only` output: `{ success, data?, errors? }`.
fn print_outcome(outcome: &Map<String, Value>) {
    let success = outcome.get("success").and_then(Value::as_bool).unwrap_or(false);
    let (title, fields) = if success {
        ("Valid".green().bold(), outcome.get("data"))
    } else {
        ("Invalid".red().bold(), outcome.get("errors"))
    };
    println!("{title}");

    if let Some(Value::Object(fields)) = fields {
        let mut builder = Builder::default();
        builder.push_record(["Field", if success { "Value" } else { "Problem" }]);
        for (key, val) in fields {
            builder.push_record([key.clone(), plain_value(val)]);
        }
        println!("{}", Table::from(builder));
    }
}

fn print_notes(envelope: &Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\n{}", "Warnings:".yellow().bold());
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn money(value: &Value) -> String {
    let text = plain_value(value);
    Decimal::from_str(&text).map(format_currency).unwrap_or(text)
}

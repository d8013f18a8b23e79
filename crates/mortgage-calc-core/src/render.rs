//! Display formatting for result entries.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::types::{CalculatorResult, MetricValue, ResultFormat};

fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped.chars().rev().collect()
}

/// `$1,234.56`, with a leading minus for negative amounts.
pub fn format_currency(value: Decimal) -> String {
    let rounded = round2(value);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    format!("{sign}${}.{cents}", group_thousands(whole))
}

/// A stored fraction rendered as a percent: 0.4312 -> `43.12%`.
pub fn format_percentage(fraction: Decimal) -> String {
    format!("{:.2}%", round2(fraction * dec!(100)))
}

pub fn format_number(value: Decimal) -> String {
    format!("{:.2}", round2(value))
}

/// Render an entry's value the way a results panel shows it.
pub fn render_value(result: &CalculatorResult) -> String {
    match (result.value, result.format) {
        (MetricValue::Never, _) => "Never".to_string(),
        (MetricValue::Verdict(r), _) => r.verdict().to_string(),
        (MetricValue::Amount(v), ResultFormat::Currency) => format_currency(v),
        (MetricValue::Amount(v), ResultFormat::Percentage) => format_percentage(v),
        (MetricValue::Amount(v), ResultFormat::Number | ResultFormat::Text) => format_number(v),
    }
}

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates as entered by borrowers, in percent (6.5 = 6.5%), unless stated otherwise.
pub type Rate = Decimal;

/// Whole years (loan terms, holding periods).
pub type Years = u32;

/// How a renderer should present a result value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultFormat {
    Currency,
    /// Stored as a fraction (0.43 renders as 43%).
    Percentage,
    Number,
    Text,
}

/// Rent-vs-buy verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recommendation {
    Buy,
    Rent,
    Neutral,
}

impl Recommendation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Recommendation::Buy => "buy",
            Recommendation::Rent => "rent",
            Recommendation::Neutral => "neutral",
        }
    }

    pub fn verdict(&self) -> &'static str {
        match self {
            Recommendation::Buy => "Buying is more cost-effective",
            Recommendation::Rent => "Renting is more cost-effective",
            Recommendation::Neutral => "Buying and renting cost the same",
        }
    }
}

/// The value carried by a single result entry.
///
/// Amounts serialise as decimal strings (`"1516.96"`), not JSON numbers, so
/// JSON consumers receive the exact value without float rounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricValue {
    Amount(Decimal),
    /// A break-even that is never reached. Serialised as `"Infinity"`.
    Never,
    Verdict(Recommendation),
}

impl Serialize for MetricValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MetricValue::Amount(v) => Serialize::serialize(v, serializer),
            MetricValue::Never => serializer.serialize_str("Infinity"),
            MetricValue::Verdict(r) => serializer.serialize_str(r.as_str()),
        }
    }
}

/// One labeled output of a calculator. Labels are unique within a
/// calculator's output and stable across releases.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculatorResult {
    pub label: &'static str,
    pub value: MetricValue,
    pub format: ResultFormat,
    pub description: String,
    pub highlight: bool,
}

impl CalculatorResult {
    pub fn currency(label: &'static str, value: Money, description: &str) -> Self {
        Self::entry(label, value, ResultFormat::Currency, description)
    }

    pub fn percentage(label: &'static str, fraction: Decimal, description: &str) -> Self {
        Self::entry(label, fraction, ResultFormat::Percentage, description)
    }

    pub fn number(label: &'static str, value: Decimal, description: &str) -> Self {
        Self::entry(label, value, ResultFormat::Number, description)
    }

    fn entry(
        label: &'static str,
        value: Decimal,
        format: ResultFormat,
        description: &str,
    ) -> Self {
        CalculatorResult {
            label,
            value: MetricValue::Amount(value),
            format,
            description: description.to_string(),
            highlight: false,
        }
    }

    pub fn never(label: &'static str, description: &str) -> Self {
        CalculatorResult {
            label,
            value: MetricValue::Never,
            format: ResultFormat::Number,
            description: description.to_string(),
            highlight: false,
        }
    }

    pub fn verdict(label: &'static str, recommendation: Recommendation) -> Self {
        CalculatorResult {
            label,
            value: MetricValue::Verdict(recommendation),
            format: ResultFormat::Text,
            description: recommendation.verdict().to_string(),
            highlight: false,
        }
    }

    pub fn highlighted(mut self) -> Self {
        self.highlight = true;
        self
    }

    /// Numeric value, if this entry carries one.
    pub fn amount(&self) -> Option<Decimal> {
        match self.value {
            MetricValue::Amount(v) => Some(v),
            _ => None,
        }
    }
}

/// Look up a result entry by its label.
pub fn find_result<'a>(results: &'a [CalculatorResult], label: &str) -> Option<&'a CalculatorResult> {
    results.iter().find(|r| r.label == label)
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

//! Schema-style validation of raw calculator input.
//!
//! Raw input is a JSON object keyed by the camelCase names a web form
//! submits. Every field is checked in one pass and every violation is
//! collected, so a caller can show all problems at once.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::types::Years;

/// Field name -> message, ordered by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation. The first message for a field wins.
    pub fn insert(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{field} {message}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// JSON shape of a validation call: `{ success, data?, errors? }`.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationOutcome<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<ValidationErrors>,
}

impl<T: Serialize> From<Result<T, ValidationErrors>> for ValidationOutcome<T> {
    fn from(result: Result<T, ValidationErrors>) -> Self {
        match result {
            Ok(data) => ValidationOutcome {
                success: true,
                data: Some(data),
                errors: None,
            },
            Err(errors) => ValidationOutcome {
                success: false,
                data: None,
                errors: Some(errors),
            },
        }
    }
}

/// Ceiling for money fields with no natural limit (prices, balances, fees).
pub const MAX_AMOUNT: Decimal = dec!(1_000_000_000_000);

/// Ceiling for annual percentage fields such as property tax.
pub const MAX_PERCENT: Decimal = dec!(100);

/// Declared bounds for one raw field. Bounds are inclusive.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub min: Option<Decimal>,
    pub max: Option<Decimal>,
}

impl FieldSpec {
    pub const fn new(name: &'static str, min: Option<Decimal>, max: Option<Decimal>) -> Self {
        FieldSpec { name, min, max }
    }

    fn check_range(&self, value: Decimal) -> Result<Decimal, String> {
        if let Some(min) = self.min {
            if value < min {
                return Err(format!("must be at least {min}"));
            }
        }
        if let Some(max) = self.max {
            if value > max {
                return Err(format!("must be at most {max}"));
            }
        }
        Ok(value)
    }
}

/// Reads typed fields out of a raw JSON object, accumulating errors.
pub struct FieldReader<'a> {
    object: Option<&'a Map<String, Value>>,
    errors: ValidationErrors,
}

impl<'a> FieldReader<'a> {
    pub fn new(raw: &'a Value) -> Self {
        let mut errors = ValidationErrors::new();
        let object = raw.as_object();
        if object.is_none() {
            errors.insert("input", "must be an object");
        }
        FieldReader { object, errors }
    }

    /// A range-checked decimal field.
    pub fn decimal(&mut self, spec: &FieldSpec) -> Option<Decimal> {
        let object = self.object?;
        let parsed = match object.get(spec.name) {
            None | Some(Value::Null) => Err("is required".to_string()),
            Some(Value::Number(n)) => parse_decimal(&n.to_string())
                .ok_or_else(|| "is out of range".to_string()),
            Some(Value::String(s)) => parse_text(s),
            Some(_) => Err("must be a number".to_string()),
        };
        match parsed.and_then(|v| spec.check_range(v)) {
            Ok(value) => Some(value),
            Err(message) => {
                self.errors.insert(spec.name, message);
                None
            }
        }
    }

    /// A range-checked whole number of years.
    pub fn years(&mut self, spec: &FieldSpec) -> Option<Years> {
        let value = self.decimal(spec)?;
        if !value.fract().is_zero() {
            self.errors.insert(spec.name, "must be a whole number of years");
            return None;
        }
        match value.to_u32() {
            Some(years) => Some(years),
            None => {
                self.errors.insert(spec.name, "is out of range");
                None
            }
        }
    }

    /// Record a cross-field violation against `field`.
    pub fn reject(&mut self, field: &str, message: &str) {
        self.errors.insert(field, message);
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_errors(self) -> ValidationErrors {
        tracing::debug!(fields = self.errors.len(), "input validation failed");
        self.errors
    }
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

fn parse_text(raw: &str) -> Result<Decimal, String> {
    let text = raw.trim();
    let lowered = text.to_ascii_lowercase();
    let unsigned = lowered.trim_start_matches(['+', '-']);
    if matches!(unsigned, "nan" | "inf" | "infinity") {
        return Err("must be a finite number".to_string());
    }
    if text.is_empty() {
        return Err("is required".to_string());
    }
    parse_decimal(text).ok_or_else(|| "must be a number".to_string())
}

//! The four borrower-facing calculators and a dispatcher over them.
//!
//! Each calculator exposes the same surface:
//! - `validate_*_inputs(&Value)` checks a raw form record and returns the typed input
//!   or every field-level problem at once;
//! - a typed function (`purchase(&PurchaseInput)`, …) that runs the arithmetic;
//! - `calculate_*(&Value)` which validates and computes;
//! - `run_*(&Value)` which additionally wraps the results in a [`ComputationOutput`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CalcError;
use crate::types::{CalculatorResult, ComputationOutput};
use crate::CalcResult;

#[cfg(feature = "affordability")]
pub mod affordability;

#[cfg(feature = "purchase")]
pub mod purchase;

#[cfg(feature = "refinance")]
pub mod refinance;

#[cfg(feature = "rent_vs_buy")]
pub mod rent_vs_buy;

/// Selects one of the calculators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CalculatorKind {
    Affordability,
    Purchase,
    Refinance,
    RentVsBuy,
}

impl CalculatorKind {
    pub const ALL: [CalculatorKind; 4] = [
        CalculatorKind::Affordability,
        CalculatorKind::Purchase,
        CalculatorKind::Refinance,
        CalculatorKind::RentVsBuy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CalculatorKind::Affordability => "affordability",
            CalculatorKind::Purchase => "purchase",
            CalculatorKind::Refinance => "refinance",
            CalculatorKind::RentVsBuy => "rent-vs-buy",
        }
    }
}

impl fmt::Display for CalculatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CalculatorKind {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        CalculatorKind::ALL
            .into_iter()
            .find(|k| k.as_str() == normalized)
            .ok_or_else(|| CalcError::InvalidInput {
                field: "calculator".into(),
                reason: format!("unknown calculator '{s}'"),
            })
    }
}

fn not_enabled(kind: CalculatorKind) -> CalcError {
    CalcError::InvalidInput {
        field: "calculator".into(),
        reason: format!("{kind} is not enabled in this build"),
    }
}

/// Validate and compute any calculator from a raw input record.
pub fn calculate(kind: CalculatorKind, raw: &Value) -> CalcResult<Vec<CalculatorResult>> {
    match kind {
        #[cfg(feature = "affordability")]
        CalculatorKind::Affordability => affordability::calculate_affordability(raw),
        #[cfg(feature = "purchase")]
        CalculatorKind::Purchase => purchase::calculate_purchase(raw),
        #[cfg(feature = "refinance")]
        CalculatorKind::Refinance => refinance::calculate_refinance(raw),
        #[cfg(feature = "rent_vs_buy")]
        CalculatorKind::RentVsBuy => rent_vs_buy::calculate_rent_vs_buy(raw),
        #[allow(unreachable_patterns)]
        _ => Err(not_enabled(kind)),
    }
}

/// Like [`calculate`], wrapped with methodology, assumptions and warnings.
pub fn run(
    kind: CalculatorKind,
    raw: &Value,
) -> CalcResult<ComputationOutput<Vec<CalculatorResult>>> {
    match kind {
        #[cfg(feature = "affordability")]
        CalculatorKind::Affordability => affordability::run_affordability(raw),
        #[cfg(feature = "purchase")]
        CalculatorKind::Purchase => purchase::run_purchase(raw),
        #[cfg(feature = "refinance")]
        CalculatorKind::Refinance => refinance::run_refinance(raw),
        #[cfg(feature = "rent_vs_buy")]
        CalculatorKind::RentVsBuy => rent_vs_buy::run_rent_vs_buy(raw),
        #[allow(unreachable_patterns)]
        _ => Err(not_enabled(kind)),
    }
}

/// Validate only, returning the `{ success, data?, errors? }` JSON shape.
pub fn validate(kind: CalculatorKind, raw: &Value) -> CalcResult<Value> {
    use crate::validation::ValidationOutcome;

    let outcome = match kind {
        #[cfg(feature = "affordability")]
        CalculatorKind::Affordability => serde_json::to_value(ValidationOutcome::from(
            affordability::validate_affordability_inputs(raw),
        ))?,
        #[cfg(feature = "purchase")]
        CalculatorKind::Purchase => serde_json::to_value(ValidationOutcome::from(
            purchase::validate_purchase_inputs(raw),
        ))?,
        #[cfg(feature = "refinance")]
        CalculatorKind::Refinance => serde_json::to_value(ValidationOutcome::from(
            refinance::validate_refinance_inputs(raw),
        ))?,
        #[cfg(feature = "rent_vs_buy")]
        CalculatorKind::RentVsBuy => serde_json::to_value(ValidationOutcome::from(
            rent_vs_buy::validate_rent_vs_buy_inputs(raw),
        ))?,
        #[allow(unreachable_patterns)]
        _ => return Err(not_enabled(kind)),
    };
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_round_trips_through_strings() {
        for kind in CalculatorKind::ALL {
            assert_eq!(kind.as_str().parse::<CalculatorKind>().unwrap(), kind);
        }
        assert_eq!(
            "rent_vs_buy".parse::<CalculatorKind>().unwrap(),
            CalculatorKind::RentVsBuy
        );
        assert!("mortgage".parse::<CalculatorKind>().is_err());
    }

    #[cfg(feature = "full")]
    #[test]
    fn test_dispatch_reaches_every_calculator() {
        let inputs = [
            (
                CalculatorKind::Affordability,
                json!({ "annualIncome": 80000, "monthlyDebts": 500, "downPayment": 20000, "interestRate": 7 }),
                6,
            ),
            (
                CalculatorKind::Purchase,
                json!({ "homePrice": 300000, "downPayment": 60000, "interestRate": 6.5, "loanTerm": 30,
                        "propertyTaxRate": 1.2, "insurance": 1200, "hoa": 100 }),
                10,
            ),
            (
                CalculatorKind::Refinance,
                json!({ "currentBalance": 250000, "currentRate": 7, "newRate": 5.5, "remainingTerm": 25,
                        "newTerm": 30, "closingCosts": 5000 }),
                10,
            ),
            (
                CalculatorKind::RentVsBuy,
                json!({ "homePrice": 400000, "downPayment": 80000, "interestRate": 6.5, "rentAmount": 2200,
                        "yearsToStay": 7, "appreciationRate": 3 }),
                12,
            ),
        ];

        for (kind, raw, count) in inputs {
            assert_eq!(calculate(kind, &raw).unwrap().len(), count, "{kind}");
            assert_eq!(run(kind, &raw).unwrap().result.len(), count, "{kind}");
            assert_eq!(validate(kind, &raw).unwrap()["success"], true, "{kind}");
        }
    }

    #[cfg(feature = "full")]
    #[test]
    fn test_validate_reports_errors_without_failing() {
        let outcome = validate(CalculatorKind::Purchase, &json!({ "homePrice": 10 })).unwrap();
        assert_eq!(outcome["success"], false);
        assert_eq!(outcome["errors"]["homePrice"], "must be at least 1000");
        assert_eq!(outcome["errors"]["loanTerm"], "is required");
    }
}

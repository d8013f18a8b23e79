use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::amortization::monthly_payment;
use crate::types::{with_metadata, CalculatorResult, ComputationOutput, Money, Rate, Years};
use crate::validation::{FieldReader, FieldSpec, ValidationErrors, MAX_AMOUNT};
use crate::CalcResult;

const CURRENT_BALANCE: FieldSpec = FieldSpec::new("currentBalance", Some(dec!(1_000)), Some(MAX_AMOUNT));
const CURRENT_RATE: FieldSpec = FieldSpec::new("currentRate", Some(dec!(0)), Some(dec!(20)));
const NEW_RATE: FieldSpec = FieldSpec::new("newRate", Some(dec!(0)), Some(dec!(20)));
const REMAINING_TERM: FieldSpec = FieldSpec::new("remainingTerm", Some(dec!(1)), Some(dec!(30)));
const NEW_TERM: FieldSpec = FieldSpec::new("newTerm", Some(dec!(1)), Some(dec!(30)));
const CLOSING_COSTS: FieldSpec = FieldSpec::new("closingCosts", Some(dec!(0)), Some(MAX_AMOUNT));

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefinanceInput {
    pub current_balance: Money,
    pub current_rate: Rate,
    pub new_rate: Rate,
    pub remaining_term: Years,
    pub new_term: Years,
    /// Financed into the new loan.
    pub closing_costs: Money,
}

/// Months until closing costs are recovered by the lower payment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakEvenMonths {
    After(Decimal),
    /// The new payment is not lower, so costs are never recovered.
    Never,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefinanceBreakdown {
    pub current_monthly_payment: Money,
    pub new_loan_amount: Money,
    pub new_monthly_payment: Money,
    pub monthly_savings: Money,
    pub break_even: BreakEvenMonths,
    pub lifetime_savings: Money,
    pub current_total_interest: Money,
    pub new_total_interest: Money,
    pub closing_costs: Money,
    /// Fraction: (current rate - new rate) / 100.
    pub rate_reduction: Decimal,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

pub fn analyze_refinance(input: &RefinanceInput) -> CalcResult<RefinanceBreakdown> {
    let current_n = input.remaining_term * 12;
    let new_n = input.new_term * 12;
    let current_months = Decimal::from(current_n);
    let new_months = Decimal::from(new_n);

    let current_monthly_payment =
        monthly_payment(input.current_balance, input.current_rate, current_n)?;
    let new_loan_amount = input.current_balance + input.closing_costs;
    let new_monthly_payment = monthly_payment(new_loan_amount, input.new_rate, new_n)?;
    let monthly_savings = current_monthly_payment - new_monthly_payment;

    let break_even = if monthly_savings > Decimal::ZERO {
        BreakEvenMonths::After(input.closing_costs / monthly_savings)
    } else {
        BreakEvenMonths::Never
    };

    let current_total_paid = current_monthly_payment * current_months;
    let new_total_paid = new_monthly_payment * new_months;

    Ok(RefinanceBreakdown {
        current_monthly_payment,
        new_loan_amount,
        new_monthly_payment,
        monthly_savings,
        break_even,
        lifetime_savings: current_total_paid - new_total_paid,
        current_total_interest: current_total_paid - input.current_balance,
        new_total_interest: new_total_paid - new_loan_amount,
        closing_costs: input.closing_costs,
        rate_reduction: (input.current_rate - input.new_rate) / dec!(100),
    })
}

impl RefinanceBreakdown {
    pub fn to_results(&self) -> Vec<CalculatorResult> {
        let break_even_desc = "Months of savings needed to recover closing costs";
        let break_even = match self.break_even {
            BreakEvenMonths::After(months) => {
                CalculatorResult::number("Break-Even Point", months, break_even_desc)
            }
            BreakEvenMonths::Never => CalculatorResult::never("Break-Even Point", break_even_desc),
        };

        vec![
            CalculatorResult::currency(
                "Current Monthly Payment",
                self.current_monthly_payment,
                "Principal and interest on your existing loan",
            ),
            CalculatorResult::currency(
                "New Monthly Payment",
                self.new_monthly_payment,
                "Principal and interest after refinancing",
            )
            .highlighted(),
            CalculatorResult::currency(
                "Monthly Savings",
                self.monthly_savings,
                "Current payment less new payment; negative means the payment rises",
            )
            .highlighted(),
            break_even.highlighted(),
            CalculatorResult::currency(
                "Lifetime Savings",
                self.lifetime_savings,
                "Total remaining payments on the current loan less total payments on the new loan",
            ),
            CalculatorResult::currency(
                "New Loan Amount",
                self.new_loan_amount,
                "Current balance plus financed closing costs",
            ),
            CalculatorResult::currency(
                "Closing Costs",
                self.closing_costs,
                "Fees rolled into the new loan",
            ),
            CalculatorResult::currency(
                "Current Loan Interest",
                self.current_total_interest,
                "Interest remaining on the existing loan",
            ),
            CalculatorResult::currency(
                "New Loan Interest",
                self.new_total_interest,
                "Interest over the full term of the new loan",
            ),
            CalculatorResult::percentage(
                "Rate Reduction",
                self.rate_reduction,
                "Drop in annual interest rate",
            ),
        ]
    }

    fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.break_even == BreakEvenMonths::Never {
            warnings.push("New payment is not lower; closing costs are never recovered".into());
        }
        if self.lifetime_savings < Decimal::ZERO {
            warnings.push("Refinancing costs more over the life of the loan".into());
        }
        warnings
    }
}

pub fn refinance(input: &RefinanceInput) -> CalcResult<Vec<CalculatorResult>> {
    Ok(analyze_refinance(input)?.to_results())
}

// ---------------------------------------------------------------------------
// Raw entry points
// ---------------------------------------------------------------------------

pub fn validate_refinance_inputs(raw: &Value) -> Result<RefinanceInput, ValidationErrors> {
    let mut reader = FieldReader::new(raw);
    let current_balance = reader.decimal(&CURRENT_BALANCE);
    let current_rate = reader.decimal(&CURRENT_RATE);
    let new_rate = reader.decimal(&NEW_RATE);
    let remaining_term = reader.years(&REMAINING_TERM);
    let new_term = reader.years(&NEW_TERM);
    let closing_costs = reader.decimal(&CLOSING_COSTS);

    match (
        current_balance,
        current_rate,
        new_rate,
        remaining_term,
        new_term,
        closing_costs,
    ) {
        (
            Some(current_balance),
            Some(current_rate),
            Some(new_rate),
            Some(remaining_term),
            Some(new_term),
            Some(closing_costs),
        ) if reader.is_clean() => Ok(RefinanceInput {
            current_balance,
            current_rate,
            new_rate,
            remaining_term,
            new_term,
            closing_costs,
        }),
        _ => Err(reader.into_errors()),
    }
}

pub fn calculate_refinance(raw: &Value) -> CalcResult<Vec<CalculatorResult>> {
    let input = validate_refinance_inputs(raw)?;
    let results = refinance(&input)?;
    tracing::debug!(calculator = "refinance", results = results.len(), "calculated");
    Ok(results)
}

pub fn run_refinance(raw: &Value) -> CalcResult<ComputationOutput<Vec<CalculatorResult>>> {
    let input = validate_refinance_inputs(raw)?;
    let breakdown = analyze_refinance(&input)?;
    let assumptions = json!({ "closing_costs_financed": true, "input": input });
    Ok(with_metadata(
        "Current vs new level-payment loan with closing costs financed",
        &assumptions,
        breakdown.warnings(),
        breakdown.to_results(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{find_result, MetricValue};
    use rust_decimal_macros::dec;

    fn default_input() -> RefinanceInput {
        RefinanceInput {
            current_balance: dec!(250_000),
            current_rate: dec!(7.0),
            new_rate: dec!(5.5),
            remaining_term: 25,
            new_term: 25,
            closing_costs: dec!(5_000),
        }
    }

    #[test]
    fn test_rate_drop_saves_money() {
        let b = analyze_refinance(&default_input()).unwrap();
        assert_eq!(b.new_loan_amount, dec!(255_000));
        assert_eq!(b.monthly_savings, b.current_monthly_payment - b.new_monthly_payment);
        assert!(b.monthly_savings > Decimal::ZERO);
        match b.break_even {
            BreakEvenMonths::After(months) => {
                assert_eq!(months, dec!(5_000) / b.monthly_savings);
            }
            BreakEvenMonths::Never => panic!("expected a break-even"),
        }
        assert!(b.lifetime_savings > Decimal::ZERO);
        assert_eq!(b.rate_reduction, dec!(0.015));
    }

    #[test]
    fn test_zero_closing_costs_break_even_immediately() {
        let mut input = default_input();
        input.closing_costs = Decimal::ZERO;
        let b = analyze_refinance(&input).unwrap();
        assert_eq!(b.break_even, BreakEvenMonths::After(Decimal::ZERO));
    }

    #[test]
    fn test_higher_rate_never_breaks_even() {
        let mut input = default_input();
        input.new_rate = dec!(9.0);
        let b = analyze_refinance(&input).unwrap();
        assert_eq!(b.break_even, BreakEvenMonths::Never);

        let results = b.to_results();
        let entry = find_result(&results, "Break-Even Point").unwrap();
        assert_eq!(entry.value, MetricValue::Never);
        assert!(entry.highlight);
        assert_eq!(b.warnings().len(), 2);
    }

    #[test]
    fn test_total_interest_per_loan() {
        let b = analyze_refinance(&default_input()).unwrap();
        let current = b.current_monthly_payment * dec!(300) - dec!(250_000);
        let new = b.new_monthly_payment * dec!(300) - dec!(255_000);
        assert_eq!(b.current_total_interest, current);
        assert_eq!(b.new_total_interest, new);
    }

    #[test]
    fn test_zero_rates() {
        let mut input = default_input();
        input.current_rate = Decimal::ZERO;
        input.new_rate = Decimal::ZERO;
        input.closing_costs = Decimal::ZERO;
        input.new_term = 30;
        let b = analyze_refinance(&input).unwrap();
        assert_eq!(b.current_monthly_payment, dec!(250_000) / dec!(300));
        assert_eq!(b.new_monthly_payment, dec!(250_000) / dec!(360));
        assert!(b.current_total_interest.abs() < dec!(0.01));
    }

    #[test]
    fn test_three_headline_results() {
        let results = refinance(&default_input()).unwrap();
        assert_eq!(results.len(), 10);
        let headlines: Vec<&str> = results.iter().filter(|r| r.highlight).map(|r| r.label).collect();
        assert_eq!(
            headlines,
            vec!["New Monthly Payment", "Monthly Savings", "Break-Even Point"]
        );
    }

    #[test]
    fn test_term_validation() {
        let raw = json!({ "currentBalance": 500, "currentRate": 7, "newRate": 5, "remainingTerm": 31,
                          "newTerm": 0, "closingCosts": -1 });
        let errors = validate_refinance_inputs(&raw).unwrap_err();
        let fields: Vec<&str> = errors.fields().collect();
        assert_eq!(
            fields,
            vec!["closingCosts", "currentBalance", "newTerm", "remainingTerm"]
        );
    }
}

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::amortization::{max_principal, monthly_payment};
use crate::types::{with_metadata, CalculatorResult, ComputationOutput, Money, Rate};
use crate::validation::{FieldReader, FieldSpec, ValidationErrors};
use crate::CalcResult;

/// Share of gross monthly income that housing plus other debt may consume.
pub const DTI_LIMIT: Decimal = dec!(0.43);

/// Affordability always assumes a 30-year loan.
pub const AFFORDABILITY_PAYMENTS: u32 = 360;

const ANNUAL_INCOME: FieldSpec =
    FieldSpec::new("annualIncome", Some(dec!(0)), Some(dec!(10_000_000)));
const MONTHLY_DEBTS: FieldSpec = FieldSpec::new("monthlyDebts", Some(dec!(0)), Some(dec!(100_000)));
const DOWN_PAYMENT: FieldSpec =
    FieldSpec::new("downPayment", Some(dec!(0)), Some(dec!(10_000_000)));
const INTEREST_RATE: FieldSpec = FieldSpec::new("interestRate", Some(dec!(0)), Some(dec!(20)));

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffordabilityInput {
    pub annual_income: Money,
    pub monthly_debts: Money,
    pub down_payment: Money,
    /// Annual rate in percent.
    pub interest_rate: Rate,
}

/// Every intermediate figure of an affordability calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffordabilityBreakdown {
    pub monthly_income: Money,
    /// May be negative when existing debts exceed the DTI limit.
    pub max_monthly_payment: Money,
    pub max_loan_amount: Money,
    pub max_home_price: Money,
    pub down_payment: Money,
    pub estimated_monthly_payment: Money,
    /// Fraction, 0 when the home price is not positive.
    pub loan_to_value: Decimal,
    /// Fraction, 0 when there is no income.
    pub dti_ratio: Decimal,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

pub fn analyze_affordability(input: &AffordabilityInput) -> CalcResult<AffordabilityBreakdown> {
    let monthly_income = input.annual_income / dec!(12);
    let max_monthly_payment = monthly_income * DTI_LIMIT - input.monthly_debts;

    let max_loan_amount =
        max_principal(max_monthly_payment, input.interest_rate, AFFORDABILITY_PAYMENTS)?;
    let max_home_price = max_loan_amount + input.down_payment;
    let estimated_monthly_payment =
        monthly_payment(max_loan_amount, input.interest_rate, AFFORDABILITY_PAYMENTS)?;

    let loan_to_value = if max_home_price > Decimal::ZERO {
        max_loan_amount / max_home_price
    } else {
        Decimal::ZERO
    };

    let dti_ratio = if monthly_income.is_zero() {
        Decimal::ZERO
    } else {
        (estimated_monthly_payment + input.monthly_debts) / monthly_income
    };

    Ok(AffordabilityBreakdown {
        monthly_income,
        max_monthly_payment,
        max_loan_amount,
        max_home_price,
        down_payment: input.down_payment,
        estimated_monthly_payment,
        loan_to_value,
        dti_ratio,
    })
}

impl AffordabilityBreakdown {
    pub fn to_results(&self) -> Vec<CalculatorResult> {
        vec![
            CalculatorResult::currency(
                "Maximum Home Price",
                self.max_home_price,
                "The most expensive home you can likely afford",
            )
            .highlighted(),
            CalculatorResult::currency(
                "Maximum Loan Amount",
                self.max_loan_amount,
                "Largest 30-year mortgage your income supports",
            ),
            CalculatorResult::currency(
                "Down Payment",
                self.down_payment,
                "Cash you put toward the purchase",
            ),
            CalculatorResult::currency(
                "Estimated Monthly Payment",
                self.estimated_monthly_payment,
                "Principal and interest on the maximum loan",
            ),
            CalculatorResult::percentage(
                "Loan-to-Value Ratio",
                self.loan_to_value,
                "Loan amount as a share of the home price",
            ),
            CalculatorResult::percentage(
                "Debt-to-Income Ratio",
                self.dti_ratio,
                "Monthly debt payments as a share of gross monthly income",
            ),
        ]
    }

    fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.monthly_income.is_zero() {
            warnings.push("Annual income is zero; debt-to-income ratio reported as 0".into());
        }
        if self.max_monthly_payment < Decimal::ZERO {
            warnings.push(format!(
                "Existing monthly debts exceed {}% of income; no mortgage payment is affordable",
                (DTI_LIMIT * dec!(100)).normalize()
            ));
        }
        warnings
    }
}

pub fn affordability(input: &AffordabilityInput) -> CalcResult<Vec<CalculatorResult>> {
    Ok(analyze_affordability(input)?.to_results())
}

// ---------------------------------------------------------------------------
// Raw entry points
// ---------------------------------------------------------------------------

pub fn validate_affordability_inputs(raw: &Value) -> Result<AffordabilityInput, ValidationErrors> {
    let mut reader = FieldReader::new(raw);
    let annual_income = reader.decimal(&ANNUAL_INCOME);
    let monthly_debts = reader.decimal(&MONTHLY_DEBTS);
    let down_payment = reader.decimal(&DOWN_PAYMENT);
    let interest_rate = reader.decimal(&INTEREST_RATE);

    match (annual_income, monthly_debts, down_payment, interest_rate) {
        (Some(annual_income), Some(monthly_debts), Some(down_payment), Some(interest_rate))
            if reader.is_clean() =>
        {
            Ok(AffordabilityInput {
                annual_income,
                monthly_debts,
                down_payment,
                interest_rate,
            })
        }
        _ => Err(reader.into_errors()),
    }
}

pub fn calculate_affordability(raw: &Value) -> CalcResult<Vec<CalculatorResult>> {
    let input = validate_affordability_inputs(raw)?;
    let results = affordability(&input)?;
    tracing::debug!(calculator = "affordability", results = results.len(), "calculated");
    Ok(results)
}

pub fn run_affordability(raw: &Value) -> CalcResult<ComputationOutput<Vec<CalculatorResult>>> {
    let input = validate_affordability_inputs(raw)?;
    let breakdown = analyze_affordability(&input)?;
    let assumptions = json!({
        "dti_limit": DTI_LIMIT,
        "loan_term_months": AFFORDABILITY_PAYMENTS,
        "input": input,
    });
    Ok(with_metadata(
        "Maximum price from a 43% debt-to-income cap over a 30-year level-payment loan",
        &assumptions,
        breakdown.warnings(),
        breakdown.to_results(),
    ))
}

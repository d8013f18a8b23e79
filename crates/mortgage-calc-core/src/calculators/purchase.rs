use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::amortization::monthly_payment;
use crate::error::CalcError;
use crate::types::{with_metadata, CalculatorResult, ComputationOutput, Money, Rate, Years};
use crate::validation::{FieldReader, FieldSpec, ValidationErrors, MAX_AMOUNT, MAX_PERCENT};
use crate::CalcResult;

const HOME_PRICE: FieldSpec = FieldSpec::new("homePrice", Some(dec!(1_000)), Some(MAX_AMOUNT));
const DOWN_PAYMENT: FieldSpec = FieldSpec::new("downPayment", Some(dec!(0)), Some(MAX_AMOUNT));
const INTEREST_RATE: FieldSpec = FieldSpec::new("interestRate", Some(dec!(0)), Some(dec!(20)));
const LOAN_TERM: FieldSpec = FieldSpec::new("loanTerm", Some(dec!(1)), Some(dec!(40)));
const PROPERTY_TAX_RATE: FieldSpec = FieldSpec::new("propertyTaxRate", Some(dec!(0)), Some(MAX_PERCENT));
const INSURANCE: FieldSpec = FieldSpec::new("insurance", Some(dec!(0)), Some(MAX_AMOUNT));
const HOA: FieldSpec = FieldSpec::new("hoa", Some(dec!(0)), Some(MAX_AMOUNT));

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseInput {
    pub home_price: Money,
    pub down_payment: Money,
    /// Annual rate in percent.
    pub interest_rate: Rate,
    pub loan_term: Years,
    /// Annual property tax as a percent of the home price.
    pub property_tax_rate: Rate,
    /// Annual homeowner's insurance premium.
    pub insurance: Money,
    /// Monthly HOA dues.
    pub hoa: Money,
}

/// Monthly and lifetime cost of a purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseBreakdown {
    pub loan_amount: Money,
    pub down_payment: Money,
    pub principal_interest: Money,
    pub property_tax: Money,
    pub insurance: Money,
    pub hoa: Money,
    pub total_monthly_payment: Money,
    pub total_interest: Money,
    pub total_cost: Money,
    pub loan_to_value: Decimal,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

pub fn analyze_purchase(input: &PurchaseInput) -> CalcResult<PurchaseBreakdown> {
    if input.down_payment > input.home_price {
        return Err(CalcError::DownPaymentExceedsHomePrice {
            down_payment: input.down_payment,
            home_price: input.home_price,
        });
    }

    let n = input.loan_term * 12;
    let months = Decimal::from(n);
    let loan_amount = input.home_price - input.down_payment;

    let principal_interest = monthly_payment(loan_amount, input.interest_rate, n)?;
    let property_tax = input.home_price * input.property_tax_rate / dec!(100) / dec!(12);
    let insurance = input.insurance / dec!(12);
    let hoa = input.hoa;
    let escrow = property_tax + insurance + hoa;
    let total_monthly_payment = principal_interest + escrow;

    let total_interest = principal_interest * months - loan_amount;
    let total_cost = input.down_payment + loan_amount + total_interest + escrow * months;

    let loan_to_value = if input.home_price.is_zero() {
        Decimal::ZERO
    } else {
        loan_amount / input.home_price
    };

    Ok(PurchaseBreakdown {
        loan_amount,
        down_payment: input.down_payment,
        principal_interest,
        property_tax,
        insurance,
        hoa,
        total_monthly_payment,
        total_interest,
        total_cost,
        loan_to_value,
    })
}

impl PurchaseBreakdown {
    pub fn to_results(&self) -> Vec<CalculatorResult> {
        vec![
            CalculatorResult::currency(
                "Total Monthly Payment",
                self.total_monthly_payment,
                "Principal, interest, taxes, insurance and HOA",
            )
            .highlighted(),
            CalculatorResult::currency(
                "Principal & Interest",
                self.principal_interest,
                "Monthly mortgage payment before escrow",
            ),
            CalculatorResult::currency(
                "Property Tax",
                self.property_tax,
                "Monthly share of annual property tax",
            ),
            CalculatorResult::currency(
                "Home Insurance",
                self.insurance,
                "Monthly share of the annual insurance premium",
            ),
            CalculatorResult::currency("HOA Fees", self.hoa, "Monthly homeowners association dues"),
            CalculatorResult::currency(
                "Loan Amount",
                self.loan_amount,
                "Home price less down payment",
            ),
            CalculatorResult::currency(
                "Down Payment",
                self.down_payment,
                "Cash paid at closing toward the price",
            ),
            CalculatorResult::currency(
                "Total Interest",
                self.total_interest,
                "Interest paid over the life of the loan",
            ),
            CalculatorResult::currency(
                "Total Cost",
                self.total_cost,
                "Everything paid over the life of the loan, including the down payment",
            ),
            CalculatorResult::percentage(
                "Loan-to-Value Ratio",
                self.loan_to_value,
                "Loan amount as a share of the home price",
            ),
        ]
    }

    fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.loan_amount.is_zero() {
            warnings.push("Down payment covers the full price; no mortgage is needed".into());
        } else if self.loan_to_value > dec!(0.8) {
            warnings.push(
                "Loan-to-value above 80%; lenders typically require mortgage insurance".into(),
            );
        }
        warnings
    }
}

pub fn purchase(input: &PurchaseInput) -> CalcResult<Vec<CalculatorResult>> {
    Ok(analyze_purchase(input)?.to_results())
}

// ---------------------------------------------------------------------------
// Raw entry points
// ---------------------------------------------------------------------------

pub fn validate_purchase_inputs(raw: &Value) -> Result<PurchaseInput, ValidationErrors> {
    let mut reader = FieldReader::new(raw);
    let home_price = reader.decimal(&HOME_PRICE);
    let down_payment = reader.decimal(&DOWN_PAYMENT);
    let interest_rate = reader.decimal(&INTEREST_RATE);
    let loan_term = reader.years(&LOAN_TERM);
    let property_tax_rate = reader.decimal(&PROPERTY_TAX_RATE);
    let insurance = reader.decimal(&INSURANCE);
    let hoa = reader.decimal(&HOA);

    if let (Some(price), Some(down)) = (home_price, down_payment) {
        if down > price {
            reader.reject(DOWN_PAYMENT.name, "must not exceed homePrice");
        }
    }

    match (
        home_price,
        down_payment,
        interest_rate,
        loan_term,
        property_tax_rate,
        insurance,
        hoa,
    ) {
        (
            Some(home_price),
            Some(down_payment),
            Some(interest_rate),
            Some(loan_term),
            Some(property_tax_rate),
            Some(insurance),
            Some(hoa),
        ) if reader.is_clean() => Ok(PurchaseInput {
            home_price,
            down_payment,
            interest_rate,
            loan_term,
            property_tax_rate,
            insurance,
            hoa,
        }),
        _ => Err(reader.into_errors()),
    }
}

pub fn calculate_purchase(raw: &Value) -> CalcResult<Vec<CalculatorResult>> {
    let input = validate_purchase_inputs(raw)?;
    let results = purchase(&input)?;
    tracing::debug!(calculator = "purchase", results = results.len(), "calculated");
    Ok(results)
}

pub fn run_purchase(raw: &Value) -> CalcResult<ComputationOutput<Vec<CalculatorResult>>> {
    let input = validate_purchase_inputs(raw)?;
    let breakdown = analyze_purchase(&input)?;
    let assumptions = json!({ "input": input });
    Ok(with_metadata(
        "Level-payment mortgage plus monthly property tax, insurance and HOA escrow",
        &assumptions,
        breakdown.warnings(),
        breakdown.to_results(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn default_input() -> PurchaseInput {
        PurchaseInput {
            home_price: dec!(300_000),
            down_payment: dec!(60_000),
            interest_rate: dec!(6.5),
            loan_term: 30,
            property_tax_rate: dec!(1.2),
            insurance: dec!(1200),
            hoa: dec!(100),
        }
    }

    fn close(a: Decimal, b: Decimal) -> bool {
        (a - b).abs() < dec!(0.01)
    }

    #[test]
    fn test_example_scenario() {
        let b = analyze_purchase(&default_input()).unwrap();
        assert_eq!(b.loan_amount, dec!(240_000));
        assert!(close(b.principal_interest, dec!(1516.96)), "{}", b.principal_interest);
        assert!(close(b.property_tax, dec!(300)));
        assert_eq!(b.insurance, dec!(100));
        assert_eq!(b.hoa, dec!(100));
        assert!(close(b.total_monthly_payment, dec!(2016.96)));
    }

    #[test]
    fn test_total_monthly_is_sum_of_components() {
        let b = analyze_purchase(&default_input()).unwrap();
        let sum = b.principal_interest + b.property_tax + b.insurance + b.hoa;
        assert_eq!(b.total_monthly_payment, sum);
    }

    #[test]
    fn test_total_cost_is_every_dollar_paid() {
        let b = analyze_purchase(&default_input()).unwrap();
        let paid = b.down_payment + b.total_monthly_payment * dec!(360);
        assert!(close(b.total_cost, paid));
    }

    #[test]
    fn test_full_down_payment() {
        let mut input = default_input();
        input.down_payment = input.home_price;
        let b = analyze_purchase(&input).unwrap();
        assert_eq!(b.loan_amount, Decimal::ZERO);
        assert_eq!(b.principal_interest, Decimal::ZERO);
        assert_eq!(b.total_interest, Decimal::ZERO);
        assert_eq!(b.loan_to_value, Decimal::ZERO);
        assert_eq!(b.warnings().len(), 1);
    }

    #[test]
    fn test_zero_rate() {
        let mut input = default_input();
        input.interest_rate = Decimal::ZERO;
        let b = analyze_purchase(&input).unwrap();
        assert_eq!(b.principal_interest, dec!(240_000) / dec!(360));
        assert!(close(b.total_interest, Decimal::ZERO));
    }

    #[test]
    fn test_down_payment_above_price_is_domain_error() {
        let mut input = default_input();
        input.down_payment = dec!(400_000);
        let err = analyze_purchase(&input).unwrap_err();
        assert!(matches!(err, CalcError::DownPaymentExceedsHomePrice { .. }));
    }

    #[test]
    fn test_raw_down_payment_above_price_is_field_error() {
        let raw = json!({ "homePrice": 300000, "downPayment": 400000, "interestRate": 6.5, "loanTerm": 30,
                          "propertyTaxRate": 1.2, "insurance": 1200, "hoa": 100 });
        let errors = validate_purchase_inputs(&raw).unwrap_err();
        assert_eq!(errors.get("downPayment"), Some("must not exceed homePrice"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_ten_results_with_headline() {
        let results = purchase(&default_input()).unwrap();
        assert_eq!(results.len(), 10);
        assert_eq!(results[0].label, "Total Monthly Payment");
        assert!(results[0].highlight);
        assert_eq!(results.iter().filter(|r| r.highlight).count(), 1);
    }
}

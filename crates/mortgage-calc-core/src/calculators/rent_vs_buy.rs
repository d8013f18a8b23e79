use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::amortization::{compound, monthly_payment, remaining_balance};
use crate::error::CalcError;
use crate::types::{
    with_metadata, CalculatorResult, ComputationOutput, Money, Rate, Recommendation, Years,
};
use crate::validation::{FieldReader, FieldSpec, ValidationErrors, MAX_AMOUNT};
use crate::CalcResult;

/// The mortgage is always a 30-year loan, whatever the holding period.
pub const MORTGAGE_PAYMENTS: u32 = 360;
/// Annual property tax as a fraction of the home price.
pub const PROPERTY_TAX_RATE: Decimal = dec!(0.012);
/// Annual insurance as a fraction of the home price.
pub const INSURANCE_RATE: Decimal = dec!(0.005);
/// Annual maintenance as a fraction of the home price.
pub const MAINTENANCE_RATE: Decimal = dec!(0.01);
/// One-off buyer closing costs as a fraction of the home price.
pub const CLOSING_COST_RATE: Decimal = dec!(0.03);
/// Annual rent growth.
pub const RENT_INFLATION: Decimal = dec!(0.03);
/// Last year examined by the break-even search.
pub const BREAK_EVEN_HORIZON: Years = 30;

const HOME_PRICE: FieldSpec = FieldSpec::new("homePrice", Some(dec!(1_000)), Some(MAX_AMOUNT));
const DOWN_PAYMENT: FieldSpec = FieldSpec::new("downPayment", Some(dec!(0)), Some(MAX_AMOUNT));
const INTEREST_RATE: FieldSpec = FieldSpec::new("interestRate", Some(dec!(0)), Some(dec!(20)));
const RENT_AMOUNT: FieldSpec = FieldSpec::new("rentAmount", Some(dec!(0)), Some(MAX_AMOUNT));
const YEARS_TO_STAY: FieldSpec = FieldSpec::new("yearsToStay", Some(dec!(1)), Some(dec!(30)));
const APPRECIATION_RATE: FieldSpec =
    FieldSpec::new("appreciationRate", Some(dec!(-10)), Some(dec!(20)));

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentVsBuyInput {
    pub home_price: Money,
    pub down_payment: Money,
    /// Annual mortgage rate in percent.
    pub interest_rate: Rate,
    /// Current monthly rent.
    pub rent_amount: Money,
    pub years_to_stay: Years,
    /// Annual home price change in percent; may be negative.
    pub appreciation_rate: Rate,
}

/// When buying starts to beat renting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakEven {
    /// Buying is not more expensive over the chosen stay.
    AlreadyFavorable,
    /// First holding period, in years, where renting costs at least as much.
    Year(Years),
    /// Renting stays cheaper for every holding period up to the horizon.
    BeyondHorizon,
}

/// Buy-side and rent-side totals for one holding period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoldingPeriodCosts {
    pub total_buying_cost: Money,
    pub future_home_value: Money,
    pub appreciation: Money,
    pub remaining_balance: Money,
    pub equity_built: Money,
    pub net_buying_cost: Money,
    pub total_renting_cost: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentVsBuyBreakdown {
    pub loan_amount: Money,
    pub monthly_mortgage: Money,
    pub monthly_owning_cost: Money,
    pub down_payment: Money,
    pub closing_costs: Money,
    pub costs: HoldingPeriodCosts,
    /// `|total renting cost - net buying cost|`.
    pub net_difference: Money,
    pub recommendation: Recommendation,
    pub break_even: BreakEven,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Fixed monthly ownership figures that do not depend on the holding period.
struct Ownership {
    loan_amount: Money,
    monthly_mortgage: Money,
    monthly_owning_cost: Money,
    closing_costs: Money,
}

impl Ownership {
    fn new(input: &RentVsBuyInput) -> CalcResult<Self> {
        let loan_amount = input.home_price - input.down_payment;
        let monthly_mortgage = monthly_payment(loan_amount, input.interest_rate, MORTGAGE_PAYMENTS)?;
        let annual_carry = input.home_price * (PROPERTY_TAX_RATE + INSURANCE_RATE + MAINTENANCE_RATE);
        Ok(Ownership {
            loan_amount,
            monthly_mortgage,
            monthly_owning_cost: monthly_mortgage + annual_carry / dec!(12),
            closing_costs: input.home_price * CLOSING_COST_RATE,
        })
    }

    fn costs_over(&self, input: &RentVsBuyInput, years: Years) -> CalcResult<HoldingPeriodCosts> {
        let months = years * 12;
        let total_buying_cost = input.down_payment
            + self.closing_costs
            + self.monthly_owning_cost * Decimal::from(months);

        let growth = input.appreciation_rate / dec!(100);
        let future_home_value = input.home_price * compound(growth, years);
        let appreciation = future_home_value - input.home_price;

        let remaining = remaining_balance(
            self.loan_amount,
            input.interest_rate,
            MORTGAGE_PAYMENTS,
            months,
        )?;
        let equity_built = input.down_payment + (self.loan_amount - remaining) + appreciation;

        Ok(HoldingPeriodCosts {
            total_buying_cost,
            future_home_value,
            appreciation,
            remaining_balance: remaining,
            equity_built,
            net_buying_cost: total_buying_cost - equity_built,
            total_renting_cost: total_rent(input.rent_amount, years),
        })
    }
}

/// Rent paid over `years`, growing by [`RENT_INFLATION`] each year.
fn total_rent(monthly_rent: Money, years: Years) -> Money {
    let mut total = Decimal::ZERO;
    let mut annual = monthly_rent * dec!(12);
    for _ in 0..years {
        total += annual;
        annual *= Decimal::ONE + RENT_INFLATION;
    }
    total
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

pub fn analyze_rent_vs_buy(input: &RentVsBuyInput) -> CalcResult<RentVsBuyBreakdown> {
    if input.down_payment > input.home_price {
        return Err(CalcError::DownPaymentExceedsHomePrice {
            down_payment: input.down_payment,
            home_price: input.home_price,
        });
    }

    let ownership = Ownership::new(input)?;
    let costs = ownership.costs_over(input, input.years_to_stay)?;
    let difference = costs.total_renting_cost - costs.net_buying_cost;

    let recommendation = if difference > Decimal::ZERO {
        Recommendation::Buy
    } else if difference < Decimal::ZERO {
        Recommendation::Rent
    } else {
        Recommendation::Neutral
    };

    let mut break_even = BreakEven::AlreadyFavorable;
    if recommendation == Recommendation::Rent {
        break_even = BreakEven::BeyondHorizon;
        for year in 1..=BREAK_EVEN_HORIZON {
            let period = ownership.costs_over(input, year)?;
            if period.total_renting_cost >= period.net_buying_cost {
                break_even = BreakEven::Year(year);
                break;
            }
        }
    }

    Ok(RentVsBuyBreakdown {
        loan_amount: ownership.loan_amount,
        monthly_mortgage: ownership.monthly_mortgage,
        monthly_owning_cost: ownership.monthly_owning_cost,
        down_payment: input.down_payment,
        closing_costs: ownership.closing_costs,
        costs,
        net_difference: difference.abs(),
        recommendation,
        break_even,
    })
}

impl RentVsBuyBreakdown {
    pub fn to_results(&self) -> Vec<CalculatorResult> {
        let break_even = match self.break_even {
            BreakEven::AlreadyFavorable => CalculatorResult::number(
                "Break-Even Year",
                Decimal::ZERO,
                "Buying is already cost-effective",
            ),
            BreakEven::Year(year) => CalculatorResult::number(
                "Break-Even Year",
                Decimal::from(year),
                "Years of ownership before buying beats renting",
            ),
            BreakEven::BeyondHorizon => CalculatorResult::never(
                "Break-Even Year",
                "Renting stays cheaper for at least 30 years",
            ),
        };

        vec![
            CalculatorResult::verdict("Recommendation", self.recommendation).highlighted(),
            CalculatorResult::currency(
                "Net Difference",
                self.net_difference,
                "Gap between the cost of renting and the net cost of buying",
            )
            .highlighted(),
            CalculatorResult::currency(
                "Net Cost of Buying",
                self.costs.net_buying_cost,
                "Everything paid to own, less the equity you keep",
            ),
            CalculatorResult::currency(
                "Total Cost of Renting",
                self.costs.total_renting_cost,
                "Rent paid over the stay, rising 3% a year",
            ),
            CalculatorResult::currency(
                "Monthly Mortgage Payment",
                self.monthly_mortgage,
                "Principal and interest on a 30-year loan",
            ),
            CalculatorResult::currency(
                "Total Monthly Owning Cost",
                self.monthly_owning_cost,
                "Mortgage plus estimated tax, insurance and maintenance",
            ),
            CalculatorResult::currency(
                "Down Payment",
                self.down_payment,
                "Cash paid at purchase",
            ),
            CalculatorResult::currency(
                "Closing Costs",
                self.closing_costs,
                "Estimated at 3% of the home price",
            ),
            CalculatorResult::currency(
                "Future Home Value",
                self.costs.future_home_value,
                "Home value at the end of your stay",
            ),
            CalculatorResult::currency(
                "Home Appreciation",
                self.costs.appreciation,
                "Change in home value over your stay",
            ),
            CalculatorResult::currency(
                "Equity Built",
                self.costs.equity_built,
                "Down payment, principal repaid and appreciation",
            ),
            break_even,
        ]
    }

    fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.break_even == BreakEven::BeyondHorizon {
            warnings.push(format!(
                "Buying does not break even within {BREAK_EVEN_HORIZON} years"
            ));
        }
        if self.costs.appreciation < Decimal::ZERO {
            warnings.push("Home value is projected to fall".into());
        }
        warnings
    }
}

pub fn rent_vs_buy(input: &RentVsBuyInput) -> CalcResult<Vec<CalculatorResult>> {
    Ok(analyze_rent_vs_buy(input)?.to_results())
}

// ---------------------------------------------------------------------------
// Raw entry points
// ---------------------------------------------------------------------------

pub fn validate_rent_vs_buy_inputs(raw: &Value) -> Result<RentVsBuyInput, ValidationErrors> {
    let mut reader = FieldReader::new(raw);
    let home_price = reader.decimal(&HOME_PRICE);
    let down_payment = reader.decimal(&DOWN_PAYMENT);
    let interest_rate = reader.decimal(&INTEREST_RATE);
    let rent_amount = reader.decimal(&RENT_AMOUNT);
    let years_to_stay = reader.years(&YEARS_TO_STAY);
    let appreciation_rate = reader.decimal(&APPRECIATION_RATE);

    if let (Some(price), Some(down)) = (home_price, down_payment) {
        if down > price {
            reader.reject(DOWN_PAYMENT.name, "must not exceed homePrice");
        }
    }

    match (
        home_price,
        down_payment,
        interest_rate,
        rent_amount,
        years_to_stay,
        appreciation_rate,
    ) {
        (
            Some(home_price),
            Some(down_payment),
            Some(interest_rate),
            Some(rent_amount),
            Some(years_to_stay),
            Some(appreciation_rate),
        ) if reader.is_clean() => Ok(RentVsBuyInput {
            home_price,
            down_payment,
            interest_rate,
            rent_amount,
            years_to_stay,
            appreciation_rate,
        }),
        _ => Err(reader.into_errors()),
    }
}

pub fn calculate_rent_vs_buy(raw: &Value) -> CalcResult<Vec<CalculatorResult>> {
    let input = validate_rent_vs_buy_inputs(raw)?;
    let results = rent_vs_buy(&input)?;
    tracing::debug!(calculator = "rent-vs-buy", results = results.len(), "calculated");
    Ok(results)
}

pub fn run_rent_vs_buy(raw: &Value) -> CalcResult<ComputationOutput<Vec<CalculatorResult>>> {
    let input = validate_rent_vs_buy_inputs(raw)?;
    let breakdown = analyze_rent_vs_buy(&input)?;
    let assumptions = json!({
        "mortgage_term_months": MORTGAGE_PAYMENTS,
        "property_tax_rate": PROPERTY_TAX_RATE,
        "insurance_rate": INSURANCE_RATE,
        "maintenance_rate": MAINTENANCE_RATE,
        "closing_cost_rate": CLOSING_COST_RATE,
        "rent_inflation": RENT_INFLATION,
        "break_even_horizon_years": BREAK_EVEN_HORIZON,
        "input": input,
    });
    Ok(with_metadata(
        "Net cost of owning (payments less equity) vs inflating rent over the stay",
        &assumptions,
        breakdown.warnings(),
        breakdown.to_results(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{find_result, MetricValue, ResultFormat};
    use rust_decimal_macros::dec;

    fn default_input() -> RentVsBuyInput {
        RentVsBuyInput {
            home_price: dec!(400_000),
            down_payment: dec!(80_000),
            interest_rate: dec!(6.5),
            rent_amount: dec!(2_200),
            years_to_stay: 7,
            appreciation_rate: dec!(3),
        }
    }

    #[test]
    fn test_closing_costs_are_three_percent() {
        let b = analyze_rent_vs_buy(&default_input()).unwrap();
        assert_eq!(b.closing_costs, dec!(12_000));
    }

    #[test]
    fn test_net_difference_is_absolute_gap() {
        let b = analyze_rent_vs_buy(&default_input()).unwrap();
        let gap = (b.costs.total_renting_cost - b.costs.net_buying_cost).abs();
        assert_eq!(b.net_difference, gap);
    }

    #[test]
    fn test_rent_compounds_three_percent() {
        let total = total_rent(dec!(1000), 3);
        // 12000 + 12360 + 12730.8
        assert_eq!(total, dec!(37090.8));
    }

    #[test]
    fn test_negative_appreciation() {
        let mut input = default_input();
        input.appreciation_rate = dec!(-5);
        let b = analyze_rent_vs_buy(&input).unwrap();
        assert!(b.costs.future_home_value < input.home_price);
        assert!(b.costs.appreciation < Decimal::ZERO);
    }

    #[test]
    fn test_expensive_rent_recommends_buying() {
        let mut input = default_input();
        input.rent_amount = dec!(6_000);
        let b = analyze_rent_vs_buy(&input).unwrap();
        assert_eq!(b.recommendation, Recommendation::Buy);
        assert_eq!(b.break_even, BreakEven::AlreadyFavorable);

        let results = b.to_results();
        let entry = find_result(&results, "Break-Even Year").unwrap();
        assert_eq!(entry.amount(), Some(Decimal::ZERO));
        assert_eq!(entry.description, "Buying is already cost-effective");
    }

    #[test]
    fn test_cheap_rent_short_stay_finds_break_even_later() {
        let input = RentVsBuyInput {
            home_price: dec!(300_000),
            down_payment: dec!(60_000),
            interest_rate: dec!(6),
            rent_amount: dec!(1_500),
            years_to_stay: 2,
            appreciation_rate: dec!(1),
        };
        let b = analyze_rent_vs_buy(&input).unwrap();
        assert_eq!(b.recommendation, Recommendation::Rent);
        match b.break_even {
            BreakEven::Year(year) => {
                assert_eq!(year, 8);
                let ownership = Ownership::new(&input).unwrap();
                let at = ownership.costs_over(&input, year).unwrap();
                assert!(at.total_renting_cost >= at.net_buying_cost);
                let before = ownership.costs_over(&input, year - 1).unwrap();
                assert!(before.total_renting_cost < before.net_buying_cost);
            }
            other => panic!("expected a break-even year, got {other:?}"),
        }
    }

    #[test]
    fn test_tiny_rent_never_breaks_even() {
        let input = RentVsBuyInput {
            home_price: dec!(500_000),
            down_payment: dec!(100_000),
            interest_rate: dec!(8),
            rent_amount: dec!(100),
            years_to_stay: 5,
            appreciation_rate: dec!(-10),
        };
        let b = analyze_rent_vs_buy(&input).unwrap();
        assert_eq!(b.recommendation, Recommendation::Rent);
        assert_eq!(b.break_even, BreakEven::BeyondHorizon);
        let results = b.to_results();
        assert_eq!(
            find_result(&results, "Break-Even Year").unwrap().value,
            MetricValue::Never
        );
    }

    #[test]
    fn test_zero_rate_and_full_down_payment() {
        let mut input = default_input();
        input.interest_rate = Decimal::ZERO;
        let b = analyze_rent_vs_buy(&input).unwrap();
        assert_eq!(b.monthly_mortgage, dec!(320_000) / dec!(360));

        input.down_payment = input.home_price;
        let b = analyze_rent_vs_buy(&input).unwrap();
        assert_eq!(b.loan_amount, Decimal::ZERO);
        assert_eq!(b.monthly_mortgage, Decimal::ZERO);
        assert_eq!(b.costs.remaining_balance, Decimal::ZERO);
    }

    #[test]
    fn test_down_payment_above_price_is_domain_error() {
        let mut input = default_input();
        input.down_payment = dec!(500_000);
        assert!(matches!(
            analyze_rent_vs_buy(&input),
            Err(CalcError::DownPaymentExceedsHomePrice { .. })
        ));
    }

    #[test]
    fn test_twelve_results_with_text_verdict() {
        let results = rent_vs_buy(&default_input()).unwrap();
        assert_eq!(results.len(), 12);
        assert_eq!(results[0].label, "Recommendation");
        assert_eq!(results[0].format, ResultFormat::Text);
        assert!(matches!(results[0].value, MetricValue::Verdict(_)));
        assert_eq!(results[11].label, "Break-Even Year");
    }

    #[test]
    fn test_validation_bounds() {
        let raw = json!({ "homePrice": 300000, "downPayment": 60000, "interestRate": 6, "rentAmount": 1500,
                          "yearsToStay": 31, "appreciationRate": -11 });
        let errors = validate_rent_vs_buy_inputs(&raw).unwrap_err();
        assert_eq!(errors.get("yearsToStay"), Some("must be at most 30"));
        assert_eq!(errors.get("appreciationRate"), Some("must be at least -10"));
    }
}

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CalcError;
use crate::types::{with_metadata, ComputationOutput, Money, Rate, Years};
use crate::validation::{FieldReader, FieldSpec, ValidationErrors};
use crate::CalcResult;

/// Monthly rates below this magnitude are treated as zero.
pub const ZERO_RATE_EPSILON: Decimal = dec!(0.000001);

const MONTHS_PER_YEAR: u32 = 12;

/// Convert an annual percentage rate (6.5 = 6.5%) into a monthly decimal rate.
pub fn monthly_rate(annual_rate_pct: Rate) -> Decimal {
    annual_rate_pct / dec!(100) / Decimal::from(MONTHS_PER_YEAR)
}

fn is_zero_rate(r: Decimal) -> bool {
    r.abs() < ZERO_RATE_EPSILON
}

/// Compute (1 + r)^n via iterative multiplication (avoids Decimal::powd drift).
pub fn compound(rate: Decimal, n: u32) -> Decimal {
    let mut result = Decimal::ONE;
    let factor = Decimal::ONE + rate;
    for _ in 0..n {
        result *= factor;
    }
    result
}

fn require_payments(n: u32) -> CalcResult<()> {
    if n == 0 {
        return Err(CalcError::InvalidInput {
            field: "number_of_payments".into(),
            reason: "Number of payments must be > 0".into(),
        });
    }
    Ok(())
}

/// Level monthly payment that fully amortizes `principal` over `n` months.
pub fn monthly_payment(principal: Money, annual_rate_pct: Rate, n: u32) -> CalcResult<Money> {
    require_payments(n)?;

    if principal.is_zero() {
        return Ok(Decimal::ZERO);
    }

    let r = monthly_rate(annual_rate_pct);
    if is_zero_rate(r) {
        return Ok(principal / Decimal::from(n));
    }

    let factor = compound(r, n);
    Ok(principal * (r * factor) / (factor - Decimal::ONE))
}

/// Largest principal a level `payment` can amortize over `n` months.
pub fn max_principal(payment: Money, annual_rate_pct: Rate, n: u32) -> CalcResult<Money> {
    require_payments(n)?;

    let r = monthly_rate(annual_rate_pct);
    if is_zero_rate(r) {
        return Ok(payment * Decimal::from(n));
    }

    let factor = compound(r, n);
    Ok(payment * (factor - Decimal::ONE) / (r * factor))
}

/// Outstanding balance after `payments_made` level payments.
pub fn remaining_balance(
    principal: Money,
    annual_rate_pct: Rate,
    n: u32,
    payments_made: u32,
) -> CalcResult<Money> {
    require_payments(n)?;

    let k = payments_made.min(n);
    let r = monthly_rate(annual_rate_pct);
    if is_zero_rate(r) {
        let paid = principal / Decimal::from(n) * Decimal::from(k);
        return Ok(principal - paid);
    }

    let total = compound(r, n);
    let elapsed = compound(r, k);
    Ok(principal * (total - elapsed) / (total - Decimal::ONE))
}

/// One month of an amortization schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    pub month: u32,
    pub payment: Money,
    pub principal: Money,
    pub interest: Money,
    pub balance: Money,
}

/// One loan year of an amortization schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationYear {
    pub year: u32,
    pub principal_paid: Money,
    pub interest_paid: Money,
    pub ending_balance: Money,
}

/// Month-by-month schedule. The final payment absorbs any rounding residue
/// so the balance closes at exactly zero.
pub fn amortization_schedule(
    principal: Money,
    annual_rate_pct: Rate,
    n: u32,
) -> CalcResult<Vec<AmortizationRow>> {
    let payment = monthly_payment(principal, annual_rate_pct, n)?;
    let r = monthly_rate(annual_rate_pct);
    let zero_rate = is_zero_rate(r);

    let mut rows = Vec::with_capacity(n as usize);
    let mut balance = principal;

    for month in 1..=n {
        let interest = if zero_rate { Decimal::ZERO } else { balance * r };
        let mut principal_part = payment - interest;
        if month == n {
            principal_part = balance;
        }
        balance -= principal_part;

        rows.push(AmortizationRow {
            month,
            payment: principal_part + interest,
            principal: principal_part,
            interest,
            balance,
        });
    }

    Ok(rows)
}

/// Aggregate a monthly schedule into loan years.
pub fn yearly_summary(rows: &[AmortizationRow]) -> Vec<AmortizationYear> {
    rows.chunks(MONTHS_PER_YEAR as usize)
        .enumerate()
        .map(|(i, chunk)| AmortizationYear {
            year: i as u32 + 1,
            principal_paid: chunk.iter().map(|r| r.principal).sum(),
            interest_paid: chunk.iter().map(|r| r.interest).sum(),
            ending_balance: chunk.last().map(|r| r.balance).unwrap_or_default(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Raw entry point
// ---------------------------------------------------------------------------

const PRINCIPAL: FieldSpec = FieldSpec::new("principal", Some(dec!(0)), Some(dec!(100_000_000)));
const INTEREST_RATE: FieldSpec = FieldSpec::new("interestRate", Some(dec!(0)), Some(dec!(20)));
const LOAN_TERM: FieldSpec = FieldSpec::new("loanTerm", Some(dec!(1)), Some(dec!(40)));

/// Validated schedule request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleInput {
    pub principal: Money,
    pub interest_rate: Rate,
    pub loan_term: Years,
}

/// Full schedule with monthly and yearly views.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleOutput {
    pub monthly_payment: Money,
    pub total_interest: Money,
    pub months: Vec<AmortizationRow>,
    pub years: Vec<AmortizationYear>,
}

pub fn validate_schedule_inputs(raw: &Value) -> Result<ScheduleInput, ValidationErrors> {
    let mut reader = FieldReader::new(raw);
    let principal = reader.decimal(&PRINCIPAL);
    let interest_rate = reader.decimal(&INTEREST_RATE);
    let loan_term = reader.years(&LOAN_TERM);

    match (principal, interest_rate, loan_term) {
        (Some(principal), Some(interest_rate), Some(loan_term)) if reader.is_clean() => {
            Ok(ScheduleInput {
                principal,
                interest_rate,
                loan_term,
            })
        }
        _ => Err(reader.into_errors()),
    }
}

pub fn schedule(input: &ScheduleInput) -> CalcResult<ScheduleOutput> {
    let n = input.loan_term * MONTHS_PER_YEAR;
    let monthly_payment = monthly_payment(input.principal, input.interest_rate, n)?;
    let months = amortization_schedule(input.principal, input.interest_rate, n)?;
    let total_interest = months.iter().map(|r| r.interest).sum();
    let years = yearly_summary(&months);

    Ok(ScheduleOutput {
        monthly_payment,
        total_interest,
        months,
        years,
    })
}

pub fn run_schedule(raw: &Value) -> CalcResult<ComputationOutput<ScheduleOutput>> {
    let input = validate_schedule_inputs(raw)?;
    let output = schedule(&input)?;
    tracing::debug!(months = output.months.len(), "amortization schedule built");
    Ok(with_metadata(
        "Level-payment amortization, monthly compounding",
        &input,
        Vec::new(),
        output,
    ))
}

use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use mortgage_calc_core::{CalcError, CalculatorKind};

use crate::input;

/// Flags shared by every calculator subcommand
#[derive(Args)]
pub struct SourceArgs {
    /// JSON input file (`-` reads stdin); its fields win, flags fill in the rest
    #[arg(long)]
    pub input: Option<String>,

    /// Only validate the input and print `{ success, data?, errors? }`
    #[arg(long)]
    pub validate_only: bool,
}

/// Arguments for the affordability calculator
#[derive(Args)]
pub struct AffordabilityArgs {
    /// Gross annual household income
    #[arg(long)]
    pub annual_income: Option<Decimal>,

    /// Existing monthly debt payments (cards, auto, student loans)
    #[arg(long)]
    pub monthly_debts: Option<Decimal>,

    /// Cash available for the down payment
    #[arg(long)]
    pub down_payment: Option<Decimal>,

    /// Annual interest rate in percent (e.g. 7 for 7%)
    #[arg(long)]
    pub interest_rate: Option<Decimal>,

    #[command(flatten)]
    pub source: SourceArgs,
}

/// Arguments for the purchase calculator
#[derive(Args)]
pub struct PurchaseArgs {
    /// Purchase price of the home
    #[arg(long)]
    pub home_price: Option<Decimal>,

    /// Cash paid toward the price at closing
    #[arg(long)]
    pub down_payment: Option<Decimal>,

    /// Annual interest rate in percent
    #[arg(long)]
    pub interest_rate: Option<Decimal>,

    /// Loan term in years
    #[arg(long, default_value = "30")]
    pub loan_term: Decimal,

    /// Annual property tax in percent of the price
    #[arg(long)]
    pub property_tax_rate: Option<Decimal>,

    /// Annual homeowner's insurance premium
    #[arg(long)]
    pub insurance: Option<Decimal>,

    /// Monthly HOA dues
    #[arg(long, default_value = "0")]
    pub hoa: Decimal,

    #[command(flatten)]
    pub source: SourceArgs,
}

/// Arguments for the refinance calculator
#[derive(Args)]
pub struct RefinanceArgs {
    /// Outstanding balance on the current loan
    #[arg(long)]
    pub current_balance: Option<Decimal>,

    /// Current annual rate in percent
    #[arg(long)]
    pub current_rate: Option<Decimal>,

    /// Offered annual rate in percent
    #[arg(long)]
    pub new_rate: Option<Decimal>,

    /// Years left on the current loan
    #[arg(long)]
    pub remaining_term: Option<Decimal>,

    /// Term of the new loan in years
    #[arg(long, default_value = "30")]
    pub new_term: Decimal,

    /// Closing costs, financed into the new loan
    #[arg(long, default_value = "0")]
    pub closing_costs: Decimal,

    #[command(flatten)]
    pub source: SourceArgs,
}

/// Arguments for the rent-vs-buy calculator
#[derive(Args)]
pub struct RentVsBuyArgs {
    /// Purchase price of the home
    #[arg(long)]
    pub home_price: Option<Decimal>,

    /// Cash paid toward the price at closing
    #[arg(long)]
    pub down_payment: Option<Decimal>,

    /// Annual interest rate in percent
    #[arg(long)]
    pub interest_rate: Option<Decimal>,

    /// Current monthly rent
    #[arg(long)]
    pub rent_amount: Option<Decimal>,

    /// Planned years in the home
    #[arg(long)]
    pub years_to_stay: Option<Decimal>,

    /// Expected annual home price change in percent (may be negative)
    #[arg(long, default_value = "3", allow_hyphen_values = true)]
    pub appreciation_rate: Decimal,

    #[command(flatten)]
    pub source: SourceArgs,
}

fn flag(value: Option<Decimal>) -> Value {
    value.map_or(Value::Null, |v| Value::String(v.to_string()))
}

fn execute(
    kind: CalculatorKind,
    source: &SourceArgs,
    from_flags: Value,
) -> Result<Value, Box<dyn std::error::Error>> {
    let raw = input::resolve(source.input.as_deref(), from_flags)?;

    if source.validate_only {
        return Ok(mortgage_calc_core::validate(kind, &raw)?);
    }

    match mortgage_calc_core::run(kind, &raw) {
        Ok(output) => Ok(serde_json::to_value(output)?),
        Err(CalcError::Validation(errors)) => {
            let detail: Vec<String> = errors
                .iter()
                .map(|(field, message)| format!("  {field}: {message}"))
                .collect();
            Err(format!("invalid {kind} input\n{}", detail.join("\n")).into())
        }
        Err(e) => Err(e.into()),
    }
}

pub fn run_affordability(args: AffordabilityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let from_flags = json!({
        "annualIncome": flag(args.annual_income),
        "monthlyDebts": flag(args.monthly_debts),
        "downPayment": flag(args.down_payment),
        "interestRate": flag(args.interest_rate),
    });
    execute(CalculatorKind::Affordability, &args.source, from_flags)
}

pub fn run_purchase(args: PurchaseArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let from_flags = json!({
        "homePrice": flag(args.home_price),
        "downPayment": flag(args.down_payment),
        "interestRate": flag(args.interest_rate),
        "loanTerm": flag(Some(args.loan_term)),
        "propertyTaxRate": flag(args.property_tax_rate),
        "insurance": flag(args.insurance),
        "hoa": flag(Some(args.hoa)),
    });
    execute(CalculatorKind::Purchase, &args.source, from_flags)
}

pub fn run_refinance(args: RefinanceArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let from_flags = json!({
        "currentBalance": flag(args.current_balance),
        "currentRate": flag(args.current_rate),
        "newRate": flag(args.new_rate),
        "remainingTerm": flag(args.remaining_term),
        "newTerm": flag(Some(args.new_term)),
        "closingCosts": flag(Some(args.closing_costs)),
    });
    execute(CalculatorKind::Refinance, &args.source, from_flags)
}

pub fn run_rent_vs_buy(args: RentVsBuyArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let from_flags = json!({
        "homePrice": flag(args.home_price),
        "downPayment": flag(args.down_payment),
        "interestRate": flag(args.interest_rate),
        "rentAmount": flag(args.rent_amount),
        "yearsToStay": flag(args.years_to_stay),
        "appreciationRate": flag(Some(args.appreciation_rate)),
    });
    execute(CalculatorKind::RentVsBuy, &args.source, from_flags)
}

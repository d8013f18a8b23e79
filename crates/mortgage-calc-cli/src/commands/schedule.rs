use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use mortgage_calc_core::amortization;

use crate::input;

/// Arguments for an amortization schedule
#[derive(Args)]
pub struct ScheduleArgs {
    /// Amount borrowed
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent
    #[arg(long)]
    pub interest_rate: Option<Decimal>,

    /// Loan term in years
    #[arg(long, default_value = "30")]
    pub loan_term: Decimal,

    /// Show one row per loan year instead of per month
    #[arg(long)]
    pub yearly: bool,

    /// JSON input file (`-` reads stdin); its fields win, flags fill in the rest
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let from_flags = json!({
        "principal": args.principal.map(|v| v.to_string()),
        "interestRate": args.interest_rate.map(|v| v.to_string()),
        "loanTerm": args.loan_term.to_string(),
    });
    let raw = input::resolve(args.input.as_deref(), from_flags)?;
    let output = amortization::run_schedule(&raw)?;

    let mut value = serde_json::to_value(&output)?;
    if let Some(result) = value.get_mut("result").and_then(Value::as_object_mut) {
        let drop = if args.yearly { "months" } else { "years" };
        result.remove(drop);
    }
    Ok(value)
}

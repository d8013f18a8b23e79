mod commands;
mod input;
mod logging;
mod output;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::calculators::{AffordabilityArgs, PurchaseArgs, RefinanceArgs, RentVsBuyArgs};
use commands::schedule::ScheduleArgs;

/// Mortgage brokerage calculators
#[derive(Parser)]
#[command(
    name = "mcalc",
    version,
    about = "Mortgage affordability, purchase, refinance and rent-vs-buy calculators",
    long_about = "A CLI for the brokerage's mortgage calculators with decimal precision. \
                  Inputs come from flags, a JSON file (--input) or piped stdin, using the \
                  same camelCase field names the website forms submit."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Maximum home price from income, debts and down payment
    Affordability(AffordabilityArgs),
    /// Monthly payment breakdown and lifetime cost of a purchase
    Purchase(PurchaseArgs),
    /// Compare an existing loan with a refinance
    Refinance(RefinanceArgs),
    /// Compare owning with renting over a planned stay
    RentVsBuy(RentVsBuyArgs),
    /// Month-by-month amortization schedule
    Schedule(ScheduleArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Affordability(args) => commands::calculators::run_affordability(args),
        Commands::Purchase(args) => commands::calculators::run_purchase(args),
        Commands::Refinance(args) => commands::calculators::run_refinance(args),
        Commands::RentVsBuy(args) => commands::calculators::run_rent_vs_buy(args),
        Commands::Schedule(args) => commands::schedule::run_schedule(args),
        Commands::Version => {
            println!("mcalc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}

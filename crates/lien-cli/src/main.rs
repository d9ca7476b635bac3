mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::debt::{ChargesArgs, ComputeDebtArgs};
use commands::distribute::DistributeArgs;
use commands::pay::PayArgs;

/// Lien accounting: interest accrual and payment waterfall
#[derive(Parser)]
#[command(
    name = "lien",
    version,
    about = "Lien accounting: interest accrual and payment waterfall",
    long_about = "Computes how much a borrower owes under continuously-compounding, \
                  fixed-installment or pro-rated installment accrual, and allocates \
                  payments across principal, interest and fee claims. All arithmetic \
                  is deterministic integer fixed-point."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the balance owed at an instant under an interest model
    ComputeDebt(ComputeDebtArgs),
    /// Break an instant down into past/current interest and fee charges
    Charges(ChargesArgs),
    /// Allocate a payment across the three claim tranches
    Distribute(DistributeArgs),
    /// Run a full payment checkpoint from a loan JSON file
    Pay(PayArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::ComputeDebt(args) => commands::debt::run_compute_debt(args),
        Commands::Charges(args) => commands::debt::run_charges(args),
        Commands::Distribute(args) => commands::distribute::run_distribute(args),
        Commands::Pay(args) => commands::pay::run_pay(args),
        Commands::Version => {
            println!("lien {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}

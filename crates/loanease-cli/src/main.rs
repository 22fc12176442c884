mod commands;
mod input;
mod output;
mod telemetry;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::eligibility::EligibilityArgs;
use commands::explain::{ExplainArgs, PredictArgs};
use commands::loan::EmiArgs;
use commands::risk::RiskArgs;

/// Loan affordability, eligibility and risk calculations
#[derive(Parser)]
#[command(
    name = "loanease",
    version,
    about = "Loan affordability, eligibility and risk calculations",
    long_about = "A CLI for EMI and amortization, DTI-based eligibility checks, \
                  heuristic risk scoring and approval attribution, computed with \
                  decimal precision."
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
    /// Calculate the EMI, total interest and a quarterly amortization summary
    Emi(EmiArgs),
    /// Check loan eligibility against DTI and credit-score thresholds
    Eligibility(EligibilityArgs),
    /// Score financial risk on a 0-100 scale
    Risk(RiskArgs),
    /// Explain an approval probability through per-feature contributions
    Explain(ExplainArgs),
    /// Predict approval probability with a persisted or heuristic model
    Predict(PredictArgs),
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
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Err(e) = telemetry::init() {
        eprintln!("{}: {}", "warning".yellow().bold(), e);
    }

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Emi(args) => commands::loan::run_emi(args),
        Commands::Eligibility(args) => commands::eligibility::run_eligibility(args),
        Commands::Risk(args) => commands::risk::run_risk(args),
        Commands::Explain(args) => commands::explain::run_explain(args),
        Commands::Predict(args) => commands::explain::run_predict(args),
        Commands::Version => {
            println!("loanease {}", env!("CARGO_PKG_VERSION"));
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

mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use commands::amortization::{CompareArgs, EmiArgs, ScheduleArgs, SimulateArgs};

/// Loan amortisation and prepayment simulation
#[derive(Parser)]
#[command(
    name = "loansim",
    version,
    about = "Loan amortisation and prepayment simulation",
    long_about = "Compute EMIs, expand month-by-month amortisation schedules, and measure \
                  how prepayments and interest-rate changes shorten a loan and cut its \
                  interest cost. All amounts use decimal precision."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log filter for diagnostics on stderr (e.g. "debug", "loan_sim_core=debug")
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Equated monthly instalment for a principal, rate and tenure
    Emi(EmiArgs),
    /// Month-by-month schedule with optional prepayments and rate changes
    Schedule(ScheduleArgs),
    /// Compare a schedule with events against the no-event baseline
    Simulate(SimulateArgs),
    /// Compare several named event scenarios on one loan
    Compare(CompareArgs),
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

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Emi(args) => commands::amortization::run_emi(args),
        Commands::Schedule(args) => commands::amortization::run_schedule(args),
        Commands::Simulate(args) => commands::amortization::run_simulate(args),
        Commands::Compare(args) => commands::amortization::run_compare(args),
        Commands::Version => {
            println!("loansim {}", env!("CARGO_PKG_VERSION"));
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

mod commands;
mod config;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use commands::config::ConfigArgs;
use commands::schedule::ScheduleArgs;

/// Bond amortization schedules and yield metrics
#[derive(Parser)]
#[command(
    name = "bamort",
    version,
    about = "Bond amortization schedules and yield metrics",
    long_about = "A CLI for building bond amortization schedules with decimal precision. \
                  Supports equal-principal, French and American methods, recurring \
                  insurance and fee charges, upfront issuance costs, present values, \
                  and investor / issuer internal rates."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (defaults to the configured format, then json)
    #[arg(long, global = true)]
    output: Option<OutputFormat>,

    /// Log debug diagnostics to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the period-by-period amortization schedule
    Schedule(ScheduleArgs),
    /// Print schedule totals, approximate yield and present value
    Summary(ScheduleArgs),
    /// Full calculation: schedule, summary, upfront costs and solved yields
    Calculate(ScheduleArgs),
    /// Manage stored defaults
    Config(ConfigArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = match config::CliConfig::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };
    let format = cli.output.or(settings.output).unwrap_or(OutputFormat::Json);
    debug!(?format, "resolved output format");

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Schedule(args) => commands::schedule::run_schedule(args, &settings),
        Commands::Summary(args) => commands::schedule::run_summary(args, &settings),
        Commands::Calculate(args) => commands::schedule::run_calculate(args, &settings),
        Commands::Config(args) => commands::config::run_config(args, settings),
        Commands::Version => {
            println!("bamort {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&format, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}

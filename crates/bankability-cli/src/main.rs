mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use bankability_core::StressConfig;
use commands::baseline::BaselineArgs;
use commands::stress_testing::{RunArgs, SuiteArgs};

/// Bankability stress testing for biomass feedstock supply chains
#[derive(Parser)]
#[command(
    name = "bstress",
    version,
    about = "Bankability stress testing for biomass feedstock supply chains",
    long_about = "Projects the financial and covenant impact of feedstock price shocks, \
                  supply disruptions, covenant pressure and regulatory or carbon price \
                  changes on a buyer's supply chain, with decimal precision."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Engine configuration file (JSON or YAML); defaults apply when omitted
    #[arg(long, global = true)]
    config: Option<String>,

    /// Log evaluation details to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one stress scenario against a baseline
    Run(RunArgs),
    /// Build a baseline from partial buyer data
    Baseline(BaselineArgs),
    /// List the canned scenario templates
    Templates,
    /// Run every template against one baseline
    Suite(SuiteArgs),
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

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&str>) -> Result<StressConfig, Box<dyn std::error::Error>> {
    let config = match path {
        Some(p) => input::file::read_config(p)?,
        None => StressConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match load_config(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Run(args) => commands::stress_testing::run_scenario(args, &config),
        Commands::Baseline(args) => commands::baseline::run_baseline(args, &config),
        Commands::Templates => commands::templates::run_templates(),
        Commands::Suite(args) => commands::stress_testing::run_suite(args, &config),
        Commands::Version => {
            println!("bstress {}", env!("CARGO_PKG_VERSION"));
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

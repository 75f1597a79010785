//! fdc2csv
//!
//! Processes USDA FDC data and outputs a CSV of simplified nutrition facts.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use fdc2csv::build_info;
use fdc2csv::nutrition::PortionBasis;
use fdc2csv::{Destination, PipelineConfig};

#[derive(Parser)]
#[command(name = "fdc2csv")]
#[command(version = build_info::VERSION)]
#[command(about = "Processes USDA FDC data and outputs a CSV of simplified nutrition facts. \
Only Foundation and SR Legacy JSON data sets are supported.", long_about = None)]
struct Cli {
    /// USDA FDC JSON data set(s) to process
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output file for CSV data (default: stdout)
    #[arg(short, long)]
    output_file: Option<PathBuf>,

    /// JSON file mapping FDC ids to alternate names (or FDC2CSV_ALT_NAMES)
    #[arg(short, long)]
    alt_names: Option<PathBuf>,

    /// Amount of food each row describes: "portion" or "per-100g"
    #[arg(long, default_value = "portion", value_parser = parse_basis)]
    basis: PortionBasis,

    /// Fail on a file that is not a Foundation or SR Legacy data set
    #[arg(long)]
    strict: bool,

    /// Print the build banner and every skipped entry
    #[arg(short, long)]
    verbose: bool,
}

fn parse_basis(s: &str) -> Result<PortionBasis, String> {
    PortionBasis::from_str(s).ok_or_else(|| format!("unknown basis '{}', expected portion or per-100g", s))
}

/// Get the alt-names path from the command line or environment
fn get_alt_names_path(cli_value: Option<PathBuf>) -> Option<PathBuf> {
    cli_value.or_else(|| {
        std::env::var("FDC2CSV_ALT_NAMES")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
    })
}

/// Line printed to stderr when the run fails
fn failure_message(e: &fdc2csv::Error) -> String {
    format!("fdc2csv: {}", e)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logging goes to stderr so stdout stays clean for CSV
    let default_directive = if cli.verbose { "fdc2csv=debug" } else { "fdc2csv=info" };
    let filter = match default_directive.parse() {
        Ok(directive) => EnvFilter::from_default_env().add_directive(directive),
        Err(_) => EnvFilter::from_default_env(),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if cli.verbose {
        build_info::print_startup_banner();
    }

    let alt_names_path = get_alt_names_path(cli.alt_names);
    let destination = Destination::from_option(cli.output_file);
    let config = PipelineConfig {
        basis: cli.basis,
        strict: cli.strict,
    };

    match fdc2csv::run(cli.inputs.as_slice(), alt_names_path.as_deref(), &destination, config) {
        Ok(summary) => {
            if cli.verbose {
                for warning in &summary.report.warnings {
                    eprintln!("  skipped {}", warning);
                }
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", failure_message(&e));
            ExitCode::FAILURE
        }
    }
}

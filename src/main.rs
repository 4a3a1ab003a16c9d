//! rainmap: classify monthly district rainfall for the configured states.
//!
//! Usage:
//!   rainmap [--config rainmap.toml] [--month "June 2025"] [--output-dir out]

use clap::Parser;
use rainmap::config::{self, DEFAULT_CONFIG_PATH};
use rainmap::logging;
use rainmap::{pipeline, report};
use std::error::Error;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "rainmap", about = "Reconcile and classify district rainfall for map rendering")]
struct Args {
    /// Path to the TOML configuration. Falls back to RAINMAP_CONFIG, then ./rainmap.toml.
    #[arg(short, long)]
    config: Option<String>,

    /// Month to process, overriding the config file (e.g. "2025-06" or "June 2025").
    #[arg(short, long)]
    month: Option<String>,

    /// Output directory, overriding the config file.
    #[arg(short, long)]
    output_dir: Option<String>,

    /// Reconcile and print the report without writing output files.
    #[arg(long)]
    dry_run: bool,
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let config_path = args
        .config
        .or_else(|| std::env::var("RAINMAP_CONFIG").ok())
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    let mut config = config::load_config(&config_path)?;
    if let Some(month) = args.month {
        config.month = month.parse()?;
    }
    if let Some(dir) = args.output_dir {
        config.output.dir = dir;
    }

    logging::init_logger(
        config.log_level()?,
        config.logging.file.as_deref(),
        config.logging.timestamps,
    );

    if args.dry_run {
        let records = pipeline::load_rainfall(&config)?;
        let features = pipeline::load_boundaries(&config)?;
        let reconciliation = pipeline::reconcile(&config, &features, &records)?;
        report::print_report(&reconciliation);
        return Ok(());
    }

    let output = pipeline::run(&config)?;
    report::print_report(&output.reconciliation);
    for path in &output.written {
        println!("Saved {}", path);
    }
    Ok(())
}

fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

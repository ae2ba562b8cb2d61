//! `dronedrop` – batch delivery simulator for the drone fleet.
//!
//! Reads one command file per drone from the input folder, flies every
//! drone's deliveries in capacity-bounded trips and writes one report per
//! drone to the output folder.

mod app;
mod config;
mod discovery;
mod error;
mod logging;
mod report;

use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use dronedrop_fleet::FlightStatus;
use tracing::debug;

use crate::config::{Config, DEFAULT_CONFIG_FILE};
use crate::error::CliError;

#[derive(Parser)]
#[command(name = "dronedrop")]
#[command(
    about = "Simulate a fleet of delivery drones and report where each package landed",
    long_about = None
)]
struct Args {
    /// Configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Input folder (overrides config and DRONEDROP_INPUT_DIR)
    #[arg(long)]
    input_dir: Option<PathBuf>,

    /// Output folder (overrides config and DRONEDROP_OUTPUT_DIR)
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

impl Args {
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(dir) = &self.input_dir {
            config.input.folder = dir.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output.folder = dir.clone();
        }
    }
}

fn main() {
    logging::init();
    let args = Args::parse();

    print_banner();
    if let Err(e) = execute(&args) {
        e.exit();
    }
}

fn execute(args: &Args) -> Result<(), CliError> {
    let mut config = Config::load_from(&args.config)?;
    args.apply_overrides(&mut config);
    debug!(?config, "configuration loaded");
    println!(
        "  Config loaded from {}",
        args.config.display().to_string().bold()
    );

    let outcome = app::run(&config)?;

    println!();
    for drone in outcome.fleet.drones() {
        let status = match drone.status() {
            FlightStatus::Completed => "completed".green(),
            other => format!("{other:?}").to_lowercase().yellow(),
        };
        println!(
            "  Drone {}  {} deliveries in {} trip(s)  [{}]",
            drone.code().bold(),
            drone.history().len(),
            drone.trips_completed(),
            status
        );
    }
    for code in outcome.fleet.unreadable() {
        println!("  {} drone {} had an unreadable input file", "!".yellow(), code);
    }

    println!();
    println!(
        "  {} {} deliveries, {} report(s) written to {}",
        "✓".green().bold(),
        outcome.dispatch.deliveries,
        outcome.reports.written.len(),
        config.output.folder.display()
    );
    if outcome.reports.failed > 0 {
        println!(
            "  {} {} report(s) could not be written",
            "!".yellow(),
            outcome.reports.failed
        );
    }
    println!("  {}", format!("run {}", outcome.dispatch.run_id).dimmed());
    Ok(())
}

fn print_banner() {
    println!();
    println!(
        "  {} {}",
        "dronedrop".bold().cyan(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
    println!("  Fleet delivery simulator");
    println!();
}

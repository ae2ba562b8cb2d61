//! CLI error handling with user-friendly messages.

use std::process;

use colored::Colorize;
use dronedrop_fleet::FleetError;
use thiserror::Error;

use crate::config::ConfigError;
use crate::discovery::DiscoveryError;
use crate::report::ReportError;

/// Every way a run can fail.  All of them end the process with status 1.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Input error: {0}")]
    Discovery(#[from] DiscoveryError),
    #[error("Delivery aborted: {0}")]
    Fleet(#[from] FleetError),
    #[error("Report error: {0}")]
    Report(#[from] ReportError),
}

impl CliError {
    /// Print the error (with a hint where one helps) and exit.
    pub fn exit(&self) -> ! {
        eprintln!("{} {}", "Error:".red().bold(), self);
        if let Some(hint) = self.hint() {
            eprintln!("  {}", hint.dimmed());
        }
        process::exit(1)
    }

    fn hint(&self) -> Option<&'static str> {
        match self {
            CliError::Config(ConfigError::NotFound(_)) => {
                Some("Pass --config <PATH> or create dronedrop.toml in the working directory.")
            }
            CliError::Config(ConfigError::Missing(_)) => {
                Some("Add the key to the config file or set the matching DRONEDROP_* variable.")
            }
            CliError::Fleet(FleetError::CapacityExceeded { .. }) => {
                Some("Raise fleet.available_drones or split the input across runs.")
            }
            CliError::Fleet(FleetError::OutOfBounds { .. }) => {
                Some("No reports were written; fix the route or raise fleet.operation_radius.")
            }
            _ => None,
        }
    }
}

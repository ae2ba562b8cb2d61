//! Per-drone command sources.
//!
//! Each input file describes one drone: one line of `A` / `D` / `I` symbols
//! per package, flown from the origin.  Loading turns the lines into
//! [`Delivery`]s with their targets already pinned.
//!
//! A file that cannot be read is not fatal: the drone is still created, with
//! no deliveries, and the failure is reported through
//! [`SourceStatus::Unreadable`].  A malformed line, on the other hand, is a
//! hard error.

use std::fs;
use std::path::PathBuf;

use dronedrop_nav::plot_delivery;
use dronedrop_types::{Commands, Delivery};
use tracing::{debug, error};

use crate::drone::Drone;
use crate::error::FleetError;

/// An input file assigned to a drone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroneSource {
    /// Drone identifier, e.g. `"01"` for `in01.txt`.
    pub code: String,
    pub path: PathBuf,
}

impl DroneSource {
    pub fn new(code: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            code: code.into(),
            path: path.into(),
        }
    }

    /// `true` when the file exists and holds zero bytes.  Files whose
    /// metadata cannot be read count as non-empty so the read failure
    /// surfaces when loading.
    pub fn is_empty(&self) -> bool {
        fs::metadata(&self.path)
            .map(|m| m.len() == 0)
            .unwrap_or(false)
    }
}

/// How reading a source went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceStatus {
    Read,
    /// The file could not be read; the drone was given no deliveries.
    Unreadable(String),
}

/// A drone built from a [`DroneSource`].
#[derive(Debug)]
pub struct LoadedDrone {
    pub drone: Drone,
    pub status: SourceStatus,
}

/// Parse the lines of an input file into deliveries.
///
/// Every line is one package.  A blank line is an empty route and delivers
/// at [`Pose::ORIGIN`][dronedrop_types::Pose::ORIGIN].  Only the line
/// terminator (`\n` or `\r\n`) is stripped; any other character outside
/// `A` / `D` / `I` is an error.  Line numbers in errors are 1-based.
pub fn parse_routes(code: &str, text: &str) -> Result<Vec<Delivery>, FleetError> {
    text.lines()
        .enumerate()
        .map(|(idx, line)| {
            let line_no = idx + 1;
            line.parse::<Commands>()
                .map(plot_delivery)
                .map_err(|source| FleetError::InvalidRoute {
                    code: code.to_string(),
                    line: line_no,
                    source,
                })
        })
        .collect()
}

/// Read `source` and build its drone.
///
/// # Errors
///
/// Returns [`FleetError::InvalidRoute`] when a line contains a symbol
/// outside `A` / `D` / `I`.  I/O failures are absorbed into
/// [`SourceStatus::Unreadable`].
pub fn load_drone(source: &DroneSource) -> Result<LoadedDrone, FleetError> {
    match fs::read_to_string(&source.path) {
        Ok(text) => {
            let deliveries = parse_routes(&source.code, &text)?;
            debug!(
                drone = %source.code,
                deliveries = deliveries.len(),
                path = %source.path.display(),
                "source loaded"
            );
            Ok(LoadedDrone {
                drone: Drone::new(source.code.clone(), deliveries),
                status: SourceStatus::Read,
            })
        }
        Err(e) => {
            error!(
                drone = %source.code,
                path = %source.path.display(),
                error = %e,
                "failed to read source, drone gets no deliveries"
            );
            Ok(LoadedDrone {
                drone: Drone::new(source.code.clone(), Vec::new()),
                status: SourceStatus::Unreadable(e.to_string()),
            })
        }
    }
}

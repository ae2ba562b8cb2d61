//! Fatal errors raised while collecting and dispatching the fleet.

use dronedrop_types::{DroneError, Pose};
use thiserror::Error;

/// Errors that stop a delivery run.
#[derive(Error, Debug)]
pub enum FleetError {
    #[error("No input files to distribute")]
    NoSources,

    #[error("{sources} input files exceed the fleet of {available} available drones")]
    CapacityExceeded { sources: usize, available: usize },

    #[error("Drone {code}: delivery target {target} is outside the operational radius of {radius}")]
    OutOfBounds {
        code: String,
        target: Pose,
        radius: u32,
    },

    #[error("Drone {code}: invalid route on line {line}: {source}")]
    InvalidRoute {
        code: String,
        line: usize,
        #[source]
        source: DroneError,
    },
}

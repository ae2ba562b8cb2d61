//! `dronedrop-fleet` – tour planning and fleet orchestration.
//!
//! # Modules
//!
//! - [`drone`] – [`Drone`]: one delivery unit with its live pose, delivery
//!   history and flight log.
//! - [`verifier`] – [`RouteVerifier`][verifier::RouteVerifier]: rule engine
//!   every delivery target must pass before it is flown, with the built-in
//!   [`RadiusRule`][verifier::RadiusRule] for the operational radius.
//! - [`planner`] – [`TourPlanner`]: splits a drone's deliveries into
//!   capacity-bounded trips and flies them leg by leg.
//! - [`source`] – [`DroneSource`]: loads a drone from its input file;
//!   unreadable files degrade to an empty drone instead of failing the run.
//! - [`fleet`] – [`Fleet`]: collects every drone and dispatches them in
//!   parallel with first-error-wins cancellation.
//! - [`error`] – [`FleetError`]: the fatal outcomes of a run.

pub mod drone;
pub mod error;
pub mod fleet;
pub mod planner;
pub mod source;
pub mod verifier;

pub use drone::{Drone, FlightLeg, FlightStatus};
pub use error::FleetError;
pub use fleet::{DispatchSummary, Fleet};
pub use planner::TourPlanner;
pub use source::{DroneSource, LoadedDrone, SourceStatus, load_drone, parse_routes};
pub use verifier::{RadiusMode, RadiusRule, RouteVerifier, Rule};

//! [`Drone`] – one simulated delivery unit.
//!
//! A drone owns its delivery list, its live pose, the poses it delivered at
//! and the legs it flew.  Only the [`TourPlanner`][crate::planner::TourPlanner]
//! moves it; everything else reads.

use dronedrop_nav::navigate;
use dronedrop_types::{Commands, Delivery, Pose};
use serde::Serialize;

/// One synthesized flight between two stops.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlightLeg {
    /// Trip number (0-based) the leg belongs to.
    pub trip: usize,
    /// Commands actually flown.
    pub commands: Commands,
    /// Pose reached at the end of the leg.
    pub arrival: Pose,
}

/// Where a drone is in its delivery run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlightStatus {
    /// Not dispatched yet.
    Idle,
    /// Every delivery was flown and the drone is back at base.
    Completed,
    /// Stopped between trips because another drone aborted the run.
    Interrupted,
    /// Stopped by its own bounds violation.
    Aborted,
}

/// A delivery drone.
#[derive(Debug, Clone)]
pub struct Drone {
    code: String,
    deliveries: Vec<Delivery>,
    pose: Pose,
    history: Vec<Pose>,
    legs: Vec<FlightLeg>,
    trips: usize,
    status: FlightStatus,
}

impl Drone {
    /// Create a drone parked at [`Pose::ORIGIN`].
    pub fn new(code: impl Into<String>, deliveries: Vec<Delivery>) -> Self {
        Self {
            code: code.into(),
            deliveries,
            pose: Pose::ORIGIN,
            history: Vec::new(),
            legs: Vec::new(),
            trips: 0,
            status: FlightStatus::Idle,
        }
    }

    /// Identifier derived from the input file name (e.g. `"01"`).
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn deliveries(&self) -> &[Delivery] {
        &self.deliveries
    }

    /// Current simulated pose.
    pub fn pose(&self) -> Pose {
        self.pose
    }

    /// Poses at which packages were delivered, in delivery order.
    pub fn history(&self) -> &[Pose] {
        &self.history
    }

    /// Legs flown, in order.
    pub fn legs(&self) -> &[FlightLeg] {
        &self.legs
    }

    /// Number of trips that ended with a return to base.
    pub fn trips_completed(&self) -> usize {
        self.trips
    }

    pub fn status(&self) -> FlightStatus {
        self.status
    }

    /// Fly `commands` from the current pose and record the drop.
    pub(crate) fn deliver(&mut self, commands: Commands) -> Pose {
        self.pose = navigate(&commands, self.pose);
        self.history.push(self.pose);
        self.legs.push(FlightLeg {
            trip: self.trips,
            commands,
            arrival: self.pose,
        });
        self.pose
    }

    /// Put the drone straight back at the distribution centre.
    pub(crate) fn return_to_base(&mut self) {
        self.pose = Pose::ORIGIN;
        self.trips += 1;
    }

    pub(crate) fn set_status(&mut self, status: FlightStatus) {
        self.status = status;
    }
}

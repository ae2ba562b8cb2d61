//! [`TourPlanner`] – capacity-aware trip planning for a single drone.
//!
//! A drone's deliveries are split into consecutive trips of at most
//! `capacity` packages.  Within a trip the drone chains deliveries: each leg
//! is synthesized from wherever the previous drop left it, so it never flies
//! home between packages.  After the last drop of a trip the drone is put
//! back at [`Pose::ORIGIN`] directly (no return leg is flown or recorded).
//!
//! Every target passes through the planner's [`RouteVerifier`] right before
//! its leg is flown.  A violation is fatal for the whole run: the planner
//! raises the shared cancellation flag so sibling drones stop at their next
//! trip boundary.
//!
//! # Example
//!
//! ```
//! use std::num::NonZeroUsize;
//! use dronedrop_fleet::{Drone, TourPlanner, verifier::RouteVerifier};
//! use dronedrop_nav::plot_delivery;
//! use dronedrop_types::Pose;
//!
//! let deliveries = ["AAAAIAA", "DDDAIAD"]
//!     .iter()
//!     .map(|c| plot_delivery(c.parse().unwrap()))
//!     .collect();
//! let mut drone = Drone::new("01", deliveries);
//!
//! let planner = TourPlanner::new(NonZeroUsize::new(3).unwrap(), RouteVerifier::new());
//! planner.fly(&mut drone).unwrap();
//!
//! assert_eq!(drone.history().len(), 2);
//! assert_eq!(drone.pose(), Pose::ORIGIN);
//! ```

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicBool, Ordering};

use dronedrop_nav::synthesize_route;
use dronedrop_types::{Delivery, Pose};
use tracing::{debug, error, info_span, warn};

use crate::drone::{Drone, FlightStatus};
use crate::error::FleetError;
use crate::verifier::RouteVerifier;

/// Plans and flies the trips of one drone at a time.
pub struct TourPlanner {
    capacity: NonZeroUsize,
    verifier: RouteVerifier,
}

impl TourPlanner {
    /// Create a planner carrying at most `capacity` packages per trip.
    pub fn new(capacity: NonZeroUsize, verifier: RouteVerifier) -> Self {
        Self { capacity, verifier }
    }

    /// Maximum number of deliveries per trip.
    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    pub fn verifier(&self) -> &RouteVerifier {
        &self.verifier
    }

    /// Split `deliveries` into trips, preserving order.  All trips are full
    /// except possibly the last.
    pub fn plan_trips<'a>(&self, deliveries: &'a [Delivery]) -> std::slice::Chunks<'a, Delivery> {
        deliveries.chunks(self.capacity.get())
    }

    /// Fly every trip of `drone` to completion.
    ///
    /// # Errors
    ///
    /// Returns [`FleetError::OutOfBounds`] for the first target rejected by the
    /// verifier.  Legs flown before the violation stay recorded on the drone.
    pub fn fly(&self, drone: &mut Drone) -> Result<FlightStatus, FleetError> {
        self.fly_until(drone, &AtomicBool::new(false))
    }

    /// Like [`fly`][Self::fly], but checks `cancel` before every trip and
    /// stops with [`FlightStatus::Interrupted`] once it is set.  A bounds
    /// violation sets `cancel` before returning the error.
    pub fn fly_until(
        &self,
        drone: &mut Drone,
        cancel: &AtomicBool,
    ) -> Result<FlightStatus, FleetError> {
        let span = info_span!("tour", drone = %drone.code());
        let _enter = span.enter();

        let trips: Vec<Vec<Pose>> = self
            .plan_trips(drone.deliveries())
            .map(|trip| trip.iter().map(Delivery::target).collect())
            .collect();
        debug!(
            deliveries = drone.deliveries().len(),
            trips = trips.len(),
            capacity = self.capacity.get(),
            "planned trips"
        );

        for (trip_no, targets) in trips.iter().enumerate() {
            if cancel.load(Ordering::SeqCst) {
                warn!(trip = trip_no, "run cancelled, drone stays on the ground");
                drone.set_status(FlightStatus::Interrupted);
                return Ok(FlightStatus::Interrupted);
            }

            for target in targets {
                if let Err(e) = self.verifier.verify(drone.code(), target) {
                    error!(trip = trip_no, %target, error = %e, "delivery rejected");
                    cancel.store(true, Ordering::SeqCst);
                    drone.set_status(FlightStatus::Aborted);
                    return Err(e);
                }
                let commands = synthesize_route(drone.pose(), *target);
                let arrival = drone.deliver(commands);
                debug!(trip = trip_no, %target, %arrival, "package delivered");
            }

            drone.return_to_base();
            debug!(trip = trip_no, "trip complete, back at base");
        }

        drone.set_status(FlightStatus::Completed);
        Ok(FlightStatus::Completed)
    }
}

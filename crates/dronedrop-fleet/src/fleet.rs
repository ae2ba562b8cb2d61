//! [`Fleet`] – data-parallel orchestration of every drone in a run.
//!
//! Drones are independent: each one is handed to exactly one rayon task as an
//! exclusive `&mut Drone`, so no locking is needed.  The only thing the tasks
//! share is a read-only [`TourPlanner`] and a cancellation flag.
//!
//! # Failure semantics
//!
//! The first bounds violation wins: its error is returned from
//! [`Fleet::dispatch`] and the flag it raises stops the other drones at their
//! next trip boundary ([`FlightStatus::Interrupted`]).  Drones that already
//! finished keep their state; nothing is rolled back.

use std::sync::atomic::AtomicBool;

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, info_span, warn};
use uuid::Uuid;

use crate::drone::{Drone, FlightStatus};
use crate::error::FleetError;
use crate::planner::TourPlanner;
use crate::source::{DroneSource, SourceStatus, load_drone};

/// Outcome of a successful [`Fleet::dispatch`].
#[derive(Debug, Clone, Serialize)]
pub struct DispatchSummary {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub drones: usize,
    pub trips: usize,
    pub deliveries: usize,
}

/// The set of drones taking part in a run.
#[derive(Debug, Default)]
pub struct Fleet {
    drones: Vec<Drone>,
    unreadable: Vec<String>,
}

impl Fleet {
    /// Wrap already-built drones.
    pub fn new(drones: Vec<Drone>) -> Self {
        Self {
            drones,
            unreadable: Vec::new(),
        }
    }

    /// Reject a batch that has no input or more inputs than drones.
    pub fn ensure_capacity(sources: usize, available: usize) -> Result<(), FleetError> {
        if sources == 0 {
            return Err(FleetError::NoSources);
        }
        if sources > available {
            return Err(FleetError::CapacityExceeded { sources, available });
        }
        Ok(())
    }

    /// Build the fleet from its input files.
    ///
    /// Every source counts toward `available`; empty files are then skipped
    /// and produce no drone.  Sources are loaded in parallel and keep their
    /// input order.
    ///
    /// # Errors
    ///
    /// [`FleetError::NoSources`] or [`FleetError::CapacityExceeded`] before
    /// anything is read, or [`FleetError::InvalidRoute`] for a malformed line.
    pub fn collect(sources: &[DroneSource], available: usize) -> Result<Self, FleetError> {
        Self::ensure_capacity(sources.len(), available)?;

        let loaded = sources
            .par_iter()
            .filter(|source| !source.is_empty())
            .map(load_drone)
            .collect::<Result<Vec<_>, _>>()?;

        let mut fleet = Fleet::default();
        for entry in loaded {
            if let SourceStatus::Unreadable(reason) = &entry.status {
                warn!(drone = %entry.drone.code(), %reason, "drone loaded without deliveries");
                fleet.unreadable.push(entry.drone.code().to_string());
            }
            fleet.drones.push(entry.drone);
        }
        info!(
            sources = sources.len(),
            drones = fleet.drones.len(),
            skipped_empty = sources.len() - fleet.drones.len(),
            "fleet collected"
        );
        Ok(fleet)
    }

    /// Fly every drone's deliveries with `planner`, one rayon task per drone.
    ///
    /// # Errors
    ///
    /// Returns the first [`FleetError::OutOfBounds`] raised by any drone.
    pub fn dispatch(&mut self, planner: &TourPlanner) -> Result<DispatchSummary, FleetError> {
        let run_id = Uuid::new_v4();
        let span = info_span!("dispatch", %run_id);
        let _enter = span.enter();
        let started_at = Utc::now();
        info!(drones = self.drones.len(), capacity = planner.capacity(), "dispatching fleet");

        // Rayon workers do not inherit the caller's entered span.
        let cancel = AtomicBool::new(false);
        self.drones.par_iter_mut().try_for_each(|drone| {
            span.in_scope(|| planner.fly_until(drone, &cancel).map(|_| ()))
        })?;

        let summary = DispatchSummary {
            run_id,
            started_at,
            finished_at: Utc::now(),
            drones: self.drones.len(),
            trips: self.drones.iter().map(Drone::trips_completed).sum(),
            deliveries: self.drones.iter().map(|d| d.history().len()).sum(),
        };
        info!(trips = summary.trips, deliveries = summary.deliveries, "fleet dispatched");
        Ok(summary)
    }

    pub fn drones(&self) -> &[Drone] {
        &self.drones
    }

    /// Look a drone up by code.
    pub fn drone(&self, code: &str) -> Option<&Drone> {
        self.drones.iter().find(|d| d.code() == code)
    }

    /// Codes of drones whose source could not be read.
    pub fn unreadable(&self) -> &[String] {
        &self.unreadable
    }

    /// Drones in the given status.
    pub fn with_status(&self, status: FlightStatus) -> impl Iterator<Item = &Drone> {
        self.drones.iter().filter(move |d| d.status() == status)
    }

    pub fn len(&self) -> usize {
        self.drones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drones.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verifier::{RadiusMode, RadiusRule, RouteVerifier};
    use dronedrop_nav::plot_delivery;
    use dronedrop_types::{Heading, Pose};
    use std::num::NonZeroUsize;
    use std::sync::{Arc, Mutex};
    use tracing::span;
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
    use tracing_subscriber::registry::LookupSpan;

    /// Records `(drone, parent span name)` for every `tour` span opened.
    #[derive(Clone, Default)]
    struct TourParents(Arc<Mutex<Vec<(String, Option<String>)>>>);

    struct DroneField(Option<String>);

    impl tracing::field::Visit for DroneField {
        fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
            if field.name() == "drone" {
                self.0 = Some(format!("{value:?}"));
            }
        }
    }

    impl<S> Layer<S> for TourParents
    where
        S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    {
        fn on_new_span(&self, attrs: &span::Attributes<'_>, id: &span::Id, ctx: Context<'_, S>) {
            if attrs.metadata().name() != "tour" {
                return;
            }
            let mut drone = DroneField(None);
            attrs.record(&mut drone);
            let parent = ctx
                .span(id)
                .and_then(|s| s.parent())
                .map(|p| p.name().to_string());
            if let Some(code) = drone.0 {
                self.0.lock().unwrap().push((code, parent));
            }
        }
    }

    fn planner(capacity: usize, radius: u32) -> TourPlanner {
        TourPlanner::new(
            NonZeroUsize::new(capacity).unwrap(),
            RouteVerifier::new().with_rule(RadiusRule::new(radius, RadiusMode::Either)),
        )
    }

    fn drone(code: &str, routes: &[&str]) -> Drone {
        let deliveries = routes
            .iter()
            .map(|r| plot_delivery(r.parse().unwrap()))
            .collect();
        Drone::new(code, deliveries)
    }

    fn write_inputs(dir: &std::path::Path, files: &[(&str, &str)]) -> Vec<DroneSource> {
        files
            .iter()
            .map(|(code, body)| {
                let path = dir.join(format!("in{code}.txt"));
                std::fs::write(&path, body).unwrap();
                DroneSource::new(*code, path)
            })
            .collect()
    }

    #[test]
    fn capacity_check_rejects_more_sources_than_drones() {
        let err = Fleet::ensure_capacity(3, 2).unwrap_err();
        assert!(matches!(
            err,
            FleetError::CapacityExceeded {
                sources: 3,
                available: 2
            }
        ));
        assert!(Fleet::ensure_capacity(2, 2).is_ok());
        assert!(matches!(Fleet::ensure_capacity(0, 5), Err(FleetError::NoSources)));
    }

    #[test]
    fn collect_counts_empty_files_toward_capacity() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let sources = write_inputs(dir.path(), &[("01", "A\n"), ("02", "D\n"), ("03", "")]);

        let err = Fleet::collect(&sources, 2).unwrap_err();
        assert!(matches!(err, FleetError::CapacityExceeded { sources: 3, .. }));
    }

    #[test]
    fn collect_skips_empty_files_and_keeps_order() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let sources = write_inputs(dir.path(), &[("01", "A\n"), ("03", ""), ("02", "DA\n")]);

        let fleet = Fleet::collect(&sources, 20).unwrap();
        let codes: Vec<&str> = fleet.drones().iter().map(Drone::code).collect();
        assert_eq!(codes, vec!["01", "02"]);
        assert!(fleet.unreadable().is_empty());
    }

    #[test]
    fn collect_keeps_unreadable_sources_as_empty_drones() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let mut sources = write_inputs(dir.path(), &[("01", "A\n")]);
        sources.push(DroneSource::new("02", dir.path().join("gone.txt")));

        let fleet = Fleet::collect(&sources, 20).unwrap();
        assert_eq!(fleet.len(), 2);
        assert_eq!(fleet.unreadable(), &["02".to_string()]);
        assert!(fleet.drone("02").unwrap().deliveries().is_empty());
    }

    #[test]
    fn collect_fails_on_invalid_symbol() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let sources = write_inputs(dir.path(), &[("01", "A\n"), ("02", "AQ\n")]);
        let err = Fleet::collect(&sources, 20).unwrap_err();
        assert!(matches!(err, FleetError::InvalidRoute { ref code, line: 1, .. } if code == "02"));
    }

    #[test]
    fn reference_fleet_delivers_expected_poses() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let sources = write_inputs(
            dir.path(),
            &[
                ("01", "AAAAIAA\nDDDAIAD\nAAIADAD\nAAAAAAAAAA\n"),
                ("02", "IAAAAIA\nIAAAAAIAAA\nIAAAIAAAI\n"),
                ("03", ""),
            ],
        );

        let mut fleet = Fleet::collect(&sources, 20).unwrap();
        assert_eq!(fleet.len(), 2);

        let summary = fleet.dispatch(&planner(3, 10)).unwrap();
        assert_eq!(summary.drones, 2);
        assert_eq!(summary.deliveries, 7);
        assert_eq!(summary.trips, 3);

        let d01 = fleet.drone("01").unwrap();
        assert_eq!(
            d01.history(),
            &[
                Pose::new(-2, 4, Heading::North),
                Pose::new(-1, -1, Heading::South),
                Pose::new(-1, 3, Heading::North),
                Pose::new(0, 10, Heading::North),
            ]
        );
        assert_eq!(d01.pose(), Pose::ORIGIN);

        let d02 = fleet.drone("02").unwrap();
        assert_eq!(
            d02.history(),
            &[
                Pose::new(-4, -1, Heading::South),
                Pose::new(-5, -3, Heading::South),
                Pose::new(-3, -3, Heading::East),
            ]
        );
        assert_eq!(d02.pose(), Pose::ORIGIN);
        assert_eq!(fleet.with_status(FlightStatus::Completed).count(), 2);
    }

    #[test]
    fn two_drones_with_capacity_one() {
        let mut fleet = Fleet::new(vec![
            drone("01", &["AAAAIAA", "DDDAIAD", "AAIADAD", "AAAAAAAAAA"]),
            drone("02", &["IAAAAIA"]),
        ]);
        let summary = fleet.dispatch(&planner(1, 10)).unwrap();
        assert_eq!(summary.trips, 5);

        let d01 = fleet.drone("01").unwrap();
        assert_eq!(d01.trips_completed(), 4);
        assert_eq!(d01.pose(), Pose::ORIGIN);
        for (delivered, delivery) in d01.history().iter().zip(d01.deliveries()) {
            assert!(delivered.same_position(&delivery.target()));
        }
        // Every leg departs from the origin.
        assert!(d01.legs().iter().all(|leg| leg.trip < 4));
    }

    #[test]
    fn out_of_bounds_target_aborts_dispatch() {
        let far = format!("D{}I{}", "A".repeat(12), "A".repeat(12));
        let mut fleet = Fleet::new(vec![drone("01", &["AA", "DA"]), drone("02", &[far.as_str()])]);

        let err = fleet.dispatch(&planner(1, 10)).unwrap_err();
        assert!(matches!(err, FleetError::OutOfBounds { ref code, .. } if code == "02"));
        assert_eq!(fleet.drone("02").unwrap().status(), FlightStatus::Aborted);
        // Drone 01 may have finished, been interrupted, or never started.
        assert_ne!(fleet.drone("01").unwrap().status(), FlightStatus::Aborted);
    }

    #[test]
    fn tour_spans_nest_under_dispatch_span() {
        let parents = TourParents::default();
        let subscriber = tracing_subscriber::registry().with(parents.clone());
        // Rayon workers only see a global subscriber.
        tracing::subscriber::set_global_default(subscriber)
            .expect("no other test installs a global subscriber");

        let mut fleet = Fleet::new(vec![
            drone("span-01", &["A"]),
            drone("span-02", &["DA"]),
            drone("span-03", &["IA"]),
        ]);
        fleet.dispatch(&planner(1, 10)).unwrap();

        let seen: Vec<(String, Option<String>)> = parents
            .0
            .lock()
            .unwrap()
            .iter()
            .filter(|(code, _)| code.starts_with("span-"))
            .cloned()
            .collect();
        assert_eq!(seen.len(), 3);
        assert!(seen.iter().all(|(_, parent)| parent.as_deref() == Some("dispatch")));
    }

    #[test]
    fn empty_fleet_dispatches_nothing() {
        let mut fleet = Fleet::new(Vec::new());
        let summary = fleet.dispatch(&planner(3, 10)).unwrap();
        assert_eq!(summary.drones, 0);
        assert_eq!(summary.deliveries, 0);
    }
}

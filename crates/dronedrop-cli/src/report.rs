//! Delivery reports – one file per drone per configured format.
//!
//! The text report is the historical format:
//!
//! ```text
//! == Delivery Report ==
//! (-2, 4) North orientation
//! (-1, -1) South orientation
//! ```
//!
//! The JSON report adds the final pose, status, every leg flown and the
//! summary of the dispatch run that produced it.

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use dronedrop_fleet::{DispatchSummary, Drone, FlightLeg, FlightStatus};
use dronedrop_types::Pose;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::OutputConfig;

pub const TEXT_REPORT_HEADER: &str = "== Delivery Report ==";

/// Report artifacts that can be produced for each drone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Text,
    Json,
}

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Cannot create output folder {path}: {source}")]
    OutputFolder {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// What [`write_reports`] produced.
#[derive(Debug, Default)]
pub struct ReportSummary {
    pub written: Vec<PathBuf>,
    pub failed: usize,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    drone: &'a str,
    generated_at: DateTime<Utc>,
    run: &'a DispatchSummary,
    status: FlightStatus,
    final_pose: Pose,
    trips: usize,
    deliveries: &'a [Pose],
    legs: &'a [FlightLeg],
}

/// Path of the report for drone `code`: `<prefix><code>.<ext>`.
pub fn report_path(output: &OutputConfig, code: &str, format: ReportFormat) -> PathBuf {
    let extension = match format {
        ReportFormat::Text => output.extension.as_str(),
        ReportFormat::Json => "json",
    };
    output
        .folder
        .join(format!("{}{}.{}", output.prefix, code, extension))
}

pub fn render_text(drone: &Drone) -> String {
    let mut out = String::from(TEXT_REPORT_HEADER);
    out.push('\n');
    for pose in drone.history() {
        out.push_str(&pose.description());
        out.push('\n');
    }
    out
}

pub fn render_json(drone: &Drone, run: &DispatchSummary) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport {
        drone: drone.code(),
        generated_at: Utc::now(),
        run,
        status: drone.status(),
        final_pose: drone.pose(),
        trips: drone.trips_completed(),
        deliveries: drone.history(),
        legs: drone.legs(),
    })
}

/// Write every report for every drone, in parallel.
///
/// # Errors
///
/// Only a failure to create the output folder is fatal.  Individual write
/// failures are logged and counted in [`ReportSummary::failed`].
pub fn write_reports(
    drones: &[Drone],
    run: &DispatchSummary,
    output: &OutputConfig,
) -> Result<ReportSummary, ReportError> {
    fs::create_dir_all(&output.folder).map_err(|source| ReportError::OutputFolder {
        path: output.folder.clone(),
        source,
    })?;

    let results: Vec<Result<PathBuf, PathBuf>> = drones
        .par_iter()
        .flat_map_iter(|drone| {
            output
                .formats
                .iter()
                .map(move |format| write_one(drone, run, output, *format))
        })
        .collect();

    let mut summary = ReportSummary::default();
    for result in results {
        match result {
            Ok(path) => summary.written.push(path),
            Err(_) => summary.failed += 1,
        }
    }
    Ok(summary)
}

fn write_one(
    drone: &Drone,
    run: &DispatchSummary,
    output: &OutputConfig,
    format: ReportFormat,
) -> Result<PathBuf, PathBuf> {
    let path = report_path(output, drone.code(), format);
    let body = match format {
        ReportFormat::Text => Ok(render_text(drone)),
        ReportFormat::Json => render_json(drone, run).map_err(|e| e.to_string()),
    };
    match body.and_then(|b| fs::write(&path, b).map_err(|e| e.to_string())) {
        Ok(()) => {
            debug!(drone = %drone.code(), path = %path.display(), "report written");
            Ok(path)
        }
        Err(e) => {
            warn!(
                drone = %drone.code(),
                path = %path.display(),
                error = %e,
                "failed to write report"
            );
            Err(path)
        }
    }
}

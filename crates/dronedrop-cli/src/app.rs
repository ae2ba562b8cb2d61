//! One complete delivery run: discover, collect, dispatch, report.

use dronedrop_fleet::{DispatchSummary, Fleet};
use tracing::info;

use crate::config::Config;
use crate::discovery::discover_sources;
use crate::error::CliError;
use crate::report::{ReportSummary, write_reports};

/// Everything `main` needs to print the run summary.
#[derive(Debug)]
pub struct RunOutcome {
    pub fleet: Fleet,
    pub dispatch: DispatchSummary,
    pub reports: ReportSummary,
}

/// Execute a run against an already validated configuration.
///
/// Nothing is written when the capacity check or any bounds check fails.
pub fn run(config: &Config) -> Result<RunOutcome, CliError> {
    let sources = discover_sources(&config.input)?;
    let mut fleet = Fleet::collect(&sources, config.fleet.available_drones)?;

    let planner = config.fleet.planner();
    info!(
        capacity = planner.capacity(),
        radius = config.fleet.operation_radius,
        mode = ?config.fleet.radius_mode,
        "planner ready"
    );
    let dispatch = fleet.dispatch(&planner)?;

    let reports = write_reports(fleet.drones(), &dispatch, &config.output)?;
    info!(
        written = reports.written.len(),
        failed = reports.failed,
        "reports written"
    );

    Ok(RunOutcome {
        fleet,
        dispatch,
        reports,
    })
}

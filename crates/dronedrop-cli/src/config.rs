//! Run configuration – reads `dronedrop.toml`.
//!
//! ```toml
//! [fleet]
//! available_drones = 20
//! max_load = 3
//! operation_radius = 10
//! radius_mode = "either"   # optional, "either" | "both"
//!
//! [input]
//! folder = "inputs"
//! extension = "txt"
//! prefix = "in"
//!
//! [output]
//! folder = "outputs"
//! extension = "txt"
//! prefix = "out"
//! formats = ["text"]       # optional, any of "text", "json"
//! ```
//!
//! Every key except `radius_mode` and `formats` is required.  A key may be
//! left out of the file when the matching `DRONEDROP_*` environment variable
//! supplies it.

use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use dronedrop_fleet::{RadiusMode, RadiusRule, RouteVerifier, TourPlanner};
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::report::ReportFormat;

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "dronedrop.toml";

/// Errors raised while loading the configuration.  All of them are fatal.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found at {0}")]
    NotFound(PathBuf),
    #[error("Failed to read config at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Missing required config value `{0}`")]
    Missing(&'static str),
    #[error("Invalid config value `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

// ─────────────────────────────────────────────────────────────────────────────
// Validated configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Fleet sizing and safety limits.
#[derive(Debug, Clone, PartialEq)]
pub struct FleetConfig {
    /// Number of drones the distribution centre has.
    pub available_drones: usize,
    /// Maximum packages per trip.
    pub max_load: NonZeroUsize,
    /// Maximum distance per axis from the origin, in grid cells.
    pub operation_radius: u32,
    pub radius_mode: RadiusMode,
}

impl FleetConfig {
    /// Build the tour planner these limits describe.
    pub fn planner(&self) -> TourPlanner {
        let verifier = RouteVerifier::new()
            .with_rule(RadiusRule::new(self.operation_radius, self.radius_mode));
        TourPlanner::new(self.max_load, verifier)
    }
}

/// Where drone input files live.
#[derive(Debug, Clone, PartialEq)]
pub struct InputConfig {
    pub folder: PathBuf,
    /// File extension without the dot, e.g. `"txt"`.
    pub extension: String,
    /// File name prefix stripped to obtain the drone code.
    pub prefix: String,
}

/// Where and how reports are written.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputConfig {
    pub folder: PathBuf,
    /// Extension of text reports, without the dot.
    pub extension: String,
    pub prefix: String,
    pub formats: Vec<ReportFormat>,
}

/// The complete, validated configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub fleet: FleetConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
}

impl Config {
    /// Load `path`, apply `DRONEDROP_*` environment overrides and validate.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut parsed: RawConfig = toml::from_str(&raw)?;
        apply_env_overrides(&mut parsed);
        parsed.validate()
    }

    /// Parse and validate a TOML document without looking at the environment.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let parsed: RawConfig = toml::from_str(raw)?;
        parsed.validate()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// On-disk shape
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawConfig {
    #[serde(default)]
    fleet: RawFleet,
    #[serde(default)]
    input: RawInput,
    #[serde(default)]
    output: RawOutput,
}

#[derive(Debug, Default, Deserialize)]
struct RawFleet {
    available_drones: Option<usize>,
    max_load: Option<usize>,
    operation_radius: Option<u32>,
    #[serde(default)]
    radius_mode: RadiusMode,
}

#[derive(Debug, Default, Deserialize)]
struct RawInput {
    folder: Option<PathBuf>,
    extension: Option<String>,
    prefix: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawOutput {
    folder: Option<PathBuf>,
    extension: Option<String>,
    prefix: Option<String>,
    formats: Option<Vec<ReportFormat>>,
}

fn require<T>(value: Option<T>, key: &'static str) -> Result<T, ConfigError> {
    value.ok_or(ConfigError::Missing(key))
}

impl RawConfig {
    fn validate(self) -> Result<Config, ConfigError> {
        let max_load = require(self.fleet.max_load, "fleet.max_load")?;
        let max_load = NonZeroUsize::new(max_load).ok_or(ConfigError::Invalid {
            key: "fleet.max_load",
            reason: "must be at least 1".to_string(),
        })?;

        let formats = self
            .output
            .formats
            .unwrap_or_else(|| vec![ReportFormat::Text]);
        if formats.is_empty() {
            return Err(ConfigError::Invalid {
                key: "output.formats",
                reason: "at least one report format is required".to_string(),
            });
        }

        Ok(Config {
            fleet: FleetConfig {
                available_drones: require(self.fleet.available_drones, "fleet.available_drones")?,
                max_load,
                operation_radius: require(self.fleet.operation_radius, "fleet.operation_radius")?,
                radius_mode: self.fleet.radius_mode,
            },
            input: InputConfig {
                folder: require(self.input.folder, "input.folder")?,
                extension: require(self.input.extension, "input.extension")?,
                prefix: require(self.input.prefix, "input.prefix")?,
            },
            output: OutputConfig {
                folder: require(self.output.folder, "output.folder")?,
                extension: require(self.output.extension, "output.extension")?,
                prefix: require(self.output.prefix, "output.prefix")?,
                formats,
            },
        })
    }
}

/// Apply `DRONEDROP_*` environment variable overrides to `cfg`.
///
/// | Variable | Config field |
/// |---|---|
/// | `DRONEDROP_INPUT_DIR` | `input.folder` |
/// | `DRONEDROP_OUTPUT_DIR` | `output.folder` |
/// | `DRONEDROP_AVAILABLE_DRONES` | `fleet.available_drones` |
/// | `DRONEDROP_MAX_LOAD` | `fleet.max_load` |
/// | `DRONEDROP_OPERATION_RADIUS` | `fleet.operation_radius` |
///
/// Numeric values that do not parse are ignored with a warning.
pub(crate) fn apply_env_overrides(cfg: &mut RawConfig) {
    if let Ok(v) = std::env::var("DRONEDROP_INPUT_DIR") {
        cfg.input.folder = Some(PathBuf::from(v));
    }
    if let Ok(v) = std::env::var("DRONEDROP_OUTPUT_DIR") {
        cfg.output.folder = Some(PathBuf::from(v));
    }
    if let Some(n) = numeric_override("DRONEDROP_AVAILABLE_DRONES") {
        cfg.fleet.available_drones = Some(n);
    }
    if let Some(n) = numeric_override("DRONEDROP_MAX_LOAD") {
        cfg.fleet.max_load = Some(n);
    }
    if let Some(n) = numeric_override("DRONEDROP_OPERATION_RADIUS") {
        cfg.fleet.operation_radius = Some(n);
    }
}

fn numeric_override<T: std::str::FromStr>(var: &str) -> Option<T> {
    let v = std::env::var(var).ok()?;
    match v.trim().parse() {
        Ok(n) => Some(n),
        Err(_) => {
            warn!(variable = var, value = %v, "ignoring non-numeric override");
            None
        }
    }
}

//! Input discovery – finds the drone files in the configured input folder.

use std::fs;
use std::path::{Path, PathBuf};

use dronedrop_fleet::DroneSource;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::InputConfig;

#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("Cannot list input folder {path}: {source}")]
    Folder {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// List the regular files directly inside `input.folder` whose extension is
/// `input.extension`, sorted by path.
///
/// Empty files are included: they still count toward the fleet capacity.
pub fn discover_sources(input: &InputConfig) -> Result<Vec<DroneSource>, DiscoveryError> {
    let folder_err = |source: std::io::Error| DiscoveryError::Folder {
        path: input.folder.clone(),
        source,
    };

    let mut paths = Vec::new();
    for entry in fs::read_dir(&input.folder).map_err(folder_err)? {
        let path = entry.map_err(folder_err)?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == input.extension.as_str()) {
            paths.push(path);
        }
    }
    paths.sort();

    let sources: Vec<DroneSource> = paths
        .into_iter()
        .map(|path| DroneSource::new(drone_code(&path, &input.prefix), path))
        .collect();
    debug!(folder = %input.folder.display(), files = sources.len(), "input files discovered");
    Ok(sources)
}

/// Drone code for an input file: its stem with `prefix` removed
/// (`in01.txt` → `01`).  Files not starting with the prefix keep their
/// whole stem.
pub fn drone_code(path: &Path, prefix: &str) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    match stem.strip_prefix(prefix) {
        Some(code) => code.to_string(),
        None => {
            warn!(
                file = %path.display(),
                prefix,
                "input file does not start with the configured prefix"
            );
            stem
        }
    }
}

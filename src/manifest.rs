//! Package manifest lookup
//!
//! The version of a package lives in the `version` field of the nearest
//! `package.json`, searching from a start path up to the filesystem root.

use crate::exceptions::{Result, VersionModError};
use log::{debug, trace};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// File name recognised as a package manifest
pub const MANIFEST_FILE: &str = "package.json";

/// The parts of a manifest versionmod cares about
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub name: Option<String>,
    pub version: String,
}

/// Find the nearest manifest at or above `start`.
///
/// A `start` that is not an existing directory (a file, or a target that has
/// not been generated yet) begins the search at its parent. Relative paths
/// are taken from the current directory.
pub fn find_manifest(start: &Path) -> Option<PathBuf> {
    match env::current_dir() {
        Ok(cwd) => find_manifest_from(start, &cwd),
        Err(_) => find_manifest_from(start, Path::new(".")),
    }
}

/// [`find_manifest`] with relative paths taken from `cwd`
pub fn find_manifest_from(start: &Path, cwd: &Path) -> Option<PathBuf> {
    let start = cwd.join(start);
    let first = if start.is_dir() {
        start.as_path()
    } else {
        start.parent().unwrap_or(cwd)
    };
    let first = fs::canonicalize(first).unwrap_or_else(|_| first.to_path_buf());

    for dir in first.ancestors() {
        let candidate = dir.join(MANIFEST_FILE);
        trace!("🔍 Looking for manifest: {:?}", candidate);
        if candidate.is_file() {
            return Some(candidate);
        }
    }
    None
}

/// Read and parse a manifest file
pub fn read_manifest(path: &Path) -> Result<Manifest> {
    let parse_error = |reason: String| VersionModError::ManifestParse {
        path: path.to_path_buf(),
        reason,
    };

    let data = fs::read_to_string(path).map_err(|e| parse_error(e.to_string()))?;
    serde_json::from_str(&data).map_err(|e| parse_error(e.to_string()))
}

/// Resolve the package version for `start`
pub fn resolve_version(start: &Path) -> Result<String> {
    Ok(resolve(start)?.1.version)
}

/// Locate and read the manifest for `start`, returning its path too
fn resolve(start: &Path) -> Result<(PathBuf, Manifest)> {
    let path = find_manifest(start).ok_or_else(|| VersionModError::ManifestNotFound {
        start: start.to_path_buf(),
    })?;
    let manifest = read_manifest(&path)?;
    debug!(
        "📄 Manifest {:?}: name={:?} version={}",
        path, manifest.name, manifest.version
    );
    Ok((path, manifest))
}

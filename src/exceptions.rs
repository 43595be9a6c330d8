//! Error types for versionmod

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for versionmod operations
#[derive(Debug, Error)]
pub enum VersionModError {
    /// No `package.json` in the start directory or any ancestor
    #[error("no package.json found in {} or any parent directory", .start.display())]
    ManifestNotFound { start: PathBuf },

    /// Manifest located but unreadable, not JSON, or without a string `version`
    #[error("invalid manifest {}: {reason}", .path.display())]
    ManifestParse { path: PathBuf, reason: String },

    /// Writing the version module failed
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading an existing version module failed
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Target exists but was not generated by versionmod
    #[error(
        "file {} is not generated by versionmod and therefore will not be replaced. \
         Please ensure that the file can be destroyed and remove it manually before retry.",
        .path.display()
    )]
    ForeignFile { path: PathBuf },

    /// A required CLI argument was not given
    #[error("missing argument: {0}")]
    MissingArgument(&'static str),
}

/// Result type for versionmod operations
pub type Result<T> = std::result::Result<T, VersionModError>;

//! Generate-or-check workflow behind the `versionmod` binary
//!
//! Generate mode refreshes an absent or previously generated module and
//! refuses to touch anything else. Check-only mode never writes.

use crate::api::{self, CheckReport};
use crate::exceptions::{Result, VersionModError};
use crate::exit_codes::{EXIT_ERROR, EXIT_OUTDATED, EXIT_SUCCESS};
use crate::git::GitQuery;
use crate::template::GenerationOptions;
use log::debug;
use std::path::Path;

/// How a successful workflow run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Module did not exist and was written
    Generated { version: String },
    /// Previously generated module was rewritten
    Updated { version: String },
    /// Check-only: module matches a fresh render
    UpToDate,
    /// Check-only: no module at the target
    Missing,
    /// Check-only: module is stale or was not generated by versionmod
    Outdated,
}

impl Outcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Generated { .. } | Outcome::Updated { .. } | Outcome::UpToDate => {
                EXIT_SUCCESS
            }
            Outcome::Missing => EXIT_ERROR,
            Outcome::Outdated => EXIT_OUTDATED,
        }
    }

    /// Console line for this outcome, and whether it belongs on stderr
    pub fn message(&self, target: &Path) -> (String, bool) {
        let name = target
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| target.display().to_string());
        match self {
            Outcome::Generated { version } => (
                format!("Version module {name} was successfully generated with version {version}"),
                false,
            ),
            Outcome::Updated { version } => (
                format!("Version module {name} was successfully updated to {version}"),
                false,
            ),
            Outcome::UpToDate => (format!("The version module {name} is up to date."), false),
            Outcome::Missing => (format!("The version module {name} could not be found."), true),
            Outcome::Outdated => (format!("The version module {name} has outdated content."), true),
        }
    }
}

/// Run the workflow against the real git repository around the manifest
pub fn execute(target: Option<&Path>, options: &GenerationOptions, check_only: bool) -> Result<Outcome> {
    let target = require_target(target)?;
    if check_only {
        classify(api::check(target, options)?)
    } else {
        refresh(target, options, api::generate)
    }
}

/// Run the workflow with an explicit git metadata source
pub fn execute_with(
    target: Option<&Path>,
    options: &GenerationOptions,
    check_only: bool,
    git: &dyn GitQuery,
) -> Result<Outcome> {
    let target = require_target(target)?;
    if check_only {
        classify(api::check_with(target, options, git)?)
    } else {
        refresh(target, options, |t, o| api::generate_with(t, o, git))
    }
}

fn require_target(target: Option<&Path>) -> Result<&Path> {
    target
        .filter(|t| !t.as_os_str().is_empty())
        .ok_or(VersionModError::MissingArgument("target"))
}

fn classify(report: CheckReport) -> Result<Outcome> {
    debug!("📋 Check report: {:?}", report);
    Ok(match report {
        CheckReport { exists: false, .. } => Outcome::Missing,
        CheckReport {
            is_up_to_date: Some(true),
            ..
        } => Outcome::UpToDate,
        _ => Outcome::Outdated,
    })
}

fn refresh<F>(target: &Path, options: &GenerationOptions, generate: F) -> Result<Outcome>
where
    F: FnOnce(&Path, &GenerationOptions) -> Result<String>,
{
    let identity = api::identify_file(target)?;
    debug!("📋 {:?}: {:?}", target, identity);

    match (identity.exists, identity.is_generated) {
        (false, _) => Ok(Outcome::Generated {
            version: generate(target, options)?,
        }),
        (true, true) => Ok(Outcome::Updated {
            version: generate(target, options)?,
        }),
        (true, false) => Err(VersionModError::ForeignFile {
            path: target.to_path_buf(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::NoGit;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_target() {
        let err = execute_with(None, &GenerationOptions::default(), false, &NoGit).unwrap_err();
        assert!(matches!(err, VersionModError::MissingArgument("target")));

        let err = execute_with(
            Some(Path::new("")),
            &GenerationOptions::default(),
            true,
            &NoGit,
        )
        .unwrap_err();
        assert!(matches!(err, VersionModError::MissingArgument(_)));
    }

    #[test]
    fn test_exit_codes() {
        let version = "1.0.0".to_string();
        assert_eq!(Outcome::Generated { version: version.clone() }.exit_code(), 0);
        assert_eq!(Outcome::Updated { version }.exit_code(), 0);
        assert_eq!(Outcome::UpToDate.exit_code(), 0);
        assert_eq!(Outcome::Missing.exit_code(), 1);
        assert_eq!(Outcome::Outdated.exit_code(), 2);
    }

    #[test]
    fn test_messages() {
        let target = Path::new("lib/version.js");
        let (msg, to_stderr) = Outcome::Generated {
            version: "1.2.3".to_string(),
        }
        .message(target);
        assert_eq!(
            msg,
            "Version module version.js was successfully generated with version 1.2.3"
        );
        assert!(!to_stderr);

        let (msg, to_stderr) = Outcome::Outdated.message(target);
        assert_eq!(msg, "The version module version.js has outdated content.");
        assert!(to_stderr);
    }

    #[test]
    fn test_generate_then_update() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("package.json"), r#"{"version": "1.0.0"}"#).unwrap();
        let target = temp.path().join("version.js");
        let options = GenerationOptions::default();

        let first = execute_with(Some(target.as_path()), &options, false, &NoGit).unwrap();
        assert_eq!(
            first,
            Outcome::Generated {
                version: "1.0.0".to_string()
            }
        );

        fs::write(temp.path().join("package.json"), r#"{"version": "1.1.0"}"#).unwrap();
        let second = execute_with(Some(target.as_path()), &options, false, &NoGit).unwrap();
        assert_eq!(
            second,
            Outcome::Updated {
                version: "1.1.0".to_string()
            }
        );
    }
}

//! High-level API for versionmod operations

use crate::exceptions::{Result, VersionModError};
use crate::git::{Git, GitQuery};
use crate::manifest;
use crate::template::{self, GenerationOptions};
use log::{debug, info};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// What is currently at a target path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileIdentity {
    pub exists: bool,
    /// Carries the versionmod signature
    pub is_generated: bool,
}

/// Result of a staleness check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckReport {
    pub exists: bool,
    pub is_generated: bool,
    /// Only computed for existing generated files
    pub is_up_to_date: Option<bool>,
}

/// Generate the version module at `target` and return the version written
pub fn generate(target: &Path, options: &GenerationOptions) -> Result<String> {
    let (source, manifest_dir) = manifest_location(target, options)?;
    generate_inner(target, options, &source, &Git::new(manifest_dir))
}

/// Like [`generate`], with an explicit git metadata source
pub fn generate_with(
    target: &Path,
    options: &GenerationOptions,
    git: &dyn GitQuery,
) -> Result<String> {
    generate_inner(target, options, source_path(target, options), git)
}

fn generate_inner(
    target: &Path,
    options: &GenerationOptions,
    source: &Path,
    git: &dyn GitQuery,
) -> Result<String> {
    let (version, content) = render_for(source, options, git)?;
    write_atomic(target, &content).map_err(|source| VersionModError::Write {
        path: target.to_path_buf(),
        source,
    })?;
    info!("✅ Wrote version {} to {:?}", version, target);
    Ok(version)
}

/// Inspect what is currently at `target`
pub fn identify_file(target: &Path) -> Result<FileIdentity> {
    Ok(match read_existing(target)? {
        None => FileIdentity {
            exists: false,
            is_generated: false,
        },
        Some(content) => FileIdentity {
            exists: true,
            is_generated: content.as_deref().is_some_and(template::is_signed),
        },
    })
}

/// Check whether `target` matches what [`generate`] would write
pub fn check(target: &Path, options: &GenerationOptions) -> Result<CheckReport> {
    let identity = identify_file(target)?;
    if !(identity.exists && identity.is_generated) {
        return Ok(unchecked(identity));
    }
    let (source, manifest_dir) = manifest_location(target, options)?;
    compare(target, options, &source, &Git::new(manifest_dir))
}

/// Like [`check`], with an explicit git metadata source
pub fn check_with(
    target: &Path,
    options: &GenerationOptions,
    git: &dyn GitQuery,
) -> Result<CheckReport> {
    let identity = identify_file(target)?;
    if !(identity.exists && identity.is_generated) {
        return Ok(unchecked(identity));
    }
    compare(target, options, source_path(target, options), git)
}

fn unchecked(identity: FileIdentity) -> CheckReport {
    CheckReport {
        exists: identity.exists,
        is_generated: identity.is_generated,
        is_up_to_date: None,
    }
}

fn compare(
    target: &Path,
    options: &GenerationOptions,
    source: &Path,
    git: &dyn GitQuery,
) -> Result<CheckReport> {
    let (_, expected) = render_for(source, options, git)?;
    let actual = fs::read(target).map_err(|source| VersionModError::Read {
        path: target.to_path_buf(),
        source,
    })?;
    let is_up_to_date = actual == expected.as_bytes();
    debug!("🔍 {:?} up to date: {}", target, is_up_to_date);

    Ok(CheckReport {
        exists: true,
        is_generated: true,
        is_up_to_date: Some(is_up_to_date),
    })
}

fn render_for(
    source: &Path,
    options: &GenerationOptions,
    git: &dyn GitQuery,
) -> Result<(String, String)> {
    let version = manifest::resolve_version(source)?;
    let meta = git.metadata();
    debug!(
        "🏷️  Rendering version={} commit={:?} dirty={:?}",
        version, meta.short_hash, meta.dirty
    );
    let content = template::render(&version, &meta, options);
    Ok((version, content))
}

/// Manifest search start: the configured source, or the target itself
fn source_path<'a>(target: &'a Path, options: &'a GenerationOptions) -> &'a Path {
    match options.source.as_deref() {
        Some(source) if !source.as_os_str().is_empty() => source,
        _ => target,
    }
}

/// Search start plus the directory git should be queried in
fn manifest_location(target: &Path, options: &GenerationOptions) -> Result<(PathBuf, PathBuf)> {
    let source = source_path(target, options).to_path_buf();
    let manifest = manifest::find_manifest(&source).ok_or_else(|| {
        VersionModError::ManifestNotFound {
            start: source.clone(),
        }
    })?;
    let dir = manifest
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    Ok((source, dir))
}

/// `None` when absent, `Some(None)` when present but not UTF-8
fn read_existing(target: &Path) -> Result<Option<Option<String>>> {
    match fs::read(target) {
        Ok(bytes) => Ok(Some(String::from_utf8(bytes).ok())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(VersionModError::Read {
            path: target.to_path_buf(),
            source,
        }),
    }
}

/// Replace `target` with `content` via a temporary file in the same directory
fn write_atomic(target: &Path, content: &str) -> io::Result<()> {
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    // Keep the mode of an existing module; new ones get the umask default
    let existing = fs::metadata(target).ok().map(|m| m.permissions());

    #[cfg_attr(not(unix), allow(unused_mut))]
    let mut builder = tempfile::Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let mut tmp = builder.tempfile_in(dir)?;
    if let Some(permissions) = existing {
        tmp.as_file().set_permissions(permissions)?;
    }
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    tmp.persist(target).map_err(|e| e.error)?;
    Ok(())
}

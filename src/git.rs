//! Best-effort git metadata for generated version modules
//!
//! Nothing in here returns an error. A missing `git`, a directory outside any
//! repository, a failing command or a command that runs past its timeout all
//! degrade to an empty hash and an [`DirtyMarker::Unknown`] tree state.

use log::{debug, trace};
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// Upper bound for a single git invocation
pub const GIT_TIMEOUT: Duration = Duration::from_secs(5);

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Working tree state relative to the last commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DirtyMarker {
    /// No modifications to tracked files
    Clean,
    /// Tracked files have uncommitted modifications
    Dirty,
    /// State could not be determined
    #[default]
    Unknown,
}

impl DirtyMarker {
    /// Marker text appended after the commit hash
    pub fn as_str(self) -> &'static str {
        match self {
            DirtyMarker::Clean => "",
            DirtyMarker::Dirty => "!",
            DirtyMarker::Unknown => "?",
        }
    }
}

impl fmt::Display for DirtyMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Commit hash and tree state embedded into a version module
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GitMetadata {
    /// Abbreviated commit hash, empty when unavailable
    pub short_hash: String,
    pub dirty: DirtyMarker,
}

impl GitMetadata {
    pub fn is_empty(&self) -> bool {
        self.short_hash.is_empty()
    }
}

/// Source of git metadata
pub trait GitQuery {
    /// Abbreviated hash of the current commit, or an empty string
    fn short_hash(&self) -> String;

    /// Working tree state
    fn dirty_marker(&self) -> DirtyMarker;

    fn metadata(&self) -> GitMetadata {
        GitMetadata {
            short_hash: self.short_hash(),
            dirty: self.dirty_marker(),
        }
    }
}

/// Queries the `git` executable found on `PATH`
#[derive(Debug, Clone)]
pub struct Git {
    dir: PathBuf,
    timeout: Duration,
}

impl Git {
    /// Run git commands with `dir` as the working directory
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            timeout: GIT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run git with `args`, returning stdout when it exits successfully
    fn run(&self, args: &[&str]) -> Option<String> {
        let git = match which::which("git") {
            Ok(path) => path,
            Err(e) => {
                debug!("⚠️  git not available: {e}");
                return None;
            }
        };

        trace!("🔧 Running git {:?} in {:?}", args, self.dir);
        let mut child = Command::new(git)
            .args(args)
            .current_dir(&self.dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| debug!("⚠️  Failed to spawn git: {e}"))
            .ok()?;

        // Drain stdout on a helper thread so a large status listing cannot
        // fill the pipe while we poll for exit.
        let mut stdout = child.stdout.take()?;
        let reader = thread::spawn(move || {
            let mut buf = Vec::new();
            stdout.read_to_end(&mut buf).map(|_| buf)
        });

        let start = Instant::now();
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) if start.elapsed() >= self.timeout => {
                    debug!("⏱️  git {:?} timed out after {:?}", args, self.timeout);
                    let _ = child.kill();
                    let _ = child.wait();
                    return None;
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(e) => {
                    debug!("⚠️  Failed to wait for git: {e}");
                    return None;
                }
            }
        };

        let output = reader.join().ok()?.ok()?;
        if !status.success() {
            debug!("⚠️  git {:?} exited with {}", args, status);
            return None;
        }
        String::from_utf8(output).ok()
    }
}

impl GitQuery for Git {
    fn short_hash(&self) -> String {
        self.run(&["log", "--pretty=format:%h", "-n", "1"])
            .map(|s| s.trim().to_string())
            .unwrap_or_default()
    }

    fn dirty_marker(&self) -> DirtyMarker {
        match self.run(&["status", "-uno", "--porcelain"]) {
            Some(status) if status.trim().is_empty() => DirtyMarker::Clean,
            Some(_) => DirtyMarker::Dirty,
            None => DirtyMarker::Unknown,
        }
    }
}

/// Fixed metadata, independent of any repository
#[derive(Debug, Clone, Default)]
pub struct StaticGit(pub GitMetadata);

impl StaticGit {
    pub fn new(short_hash: &str, dirty: DirtyMarker) -> Self {
        StaticGit(GitMetadata {
            short_hash: short_hash.to_string(),
            dirty,
        })
    }
}

impl GitQuery for StaticGit {
    fn short_hash(&self) -> String {
        self.0.short_hash.clone()
    }

    fn dirty_marker(&self) -> DirtyMarker {
        self.0.dirty
    }
}

/// Reports no repository at all
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGit;

impl GitQuery for NoGit {
    fn short_hash(&self) -> String {
        String::new()
    }

    fn dirty_marker(&self) -> DirtyMarker {
        DirtyMarker::Unknown
    }
}

//! Exit codes for the versionmod binary
//!
//! Codes 0-2 are the public contract that build scripts rely on; the
//! remaining codes only appear when something is badly wrong.

/// Successful execution, or the version module is up to date
pub const EXIT_SUCCESS: i32 = 0;

/// Missing argument, generation failure, or module not found in check-only mode
pub const EXIT_ERROR: i32 = 1;

/// Module exists but is stale or was not generated by versionmod (check-only mode)
pub const EXIT_OUTDATED: i32 = 2;

/// Panic or unrecoverable error
pub const EXIT_PANIC: i32 = 101;

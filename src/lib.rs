//! versionmod - generate and verify version modules
//!
//! A version module is a small source file exporting the `version` of the
//! nearest `package.json`, optionally annotated with the current git commit.
//! This crate renders such files, writes them, and checks whether an existing
//! one still matches what would be generated.

// Enforce strict code quality and reliability
#![deny(
    // Safety
    unsafe_code,

    // Correctness
    missing_debug_implementations,
    unreachable_pub,

    // Future compatibility
    future_incompatible,

    // Rust 2018 idioms
    rust_2018_idioms,
)]
#![warn(
    // Error handling best practices
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::unimplemented,
    clippy::todo,

    // Code clarity and maintainability
    clippy::cognitive_complexity,
    clippy::type_complexity,

    // Best practices
    clippy::clone_on_ref_ptr,
    clippy::wildcard_imports,
    clippy::enum_glob_use,
    clippy::if_not_else,
    clippy::needless_continue,
    clippy::explicit_iter_loop,
    clippy::explicit_into_iter_loop,
)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod api;
pub mod cli;
pub mod exceptions;
pub mod exit_codes;
pub mod git;
pub mod logger;
pub mod manifest;
pub mod template;
pub mod version;

// Re-export main API functions
pub use api::{CheckReport, FileIdentity, check, check_with, generate, generate_with, identify_file};
pub use exceptions::{Result, VersionModError};
pub use git::{DirtyMarker, Git, GitMetadata, GitQuery, NoGit, StaticGit};
pub use manifest::resolve_version;
pub use template::{GenerationOptions, SIGNATURE, render};

//! Version module rendering
//!
//! The output is a pure function of its inputs so that a staleness check can
//! compare an existing file against a fresh render byte for byte.

use crate::git::GitMetadata;
use std::path::PathBuf;

/// First line of every generated file. Its presence is what marks a file as
/// safe to overwrite.
pub const SIGNATURE: &str = "// versionmod: generated file, do not edit";

/// Syntax toggles and manifest location for a version module
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationOptions {
    /// Terminate statements with `;`
    pub use_semicolon: bool,
    /// `export const version = ...` instead of `module.exports = ...`
    pub use_es6_syntax: bool,
    /// Emit a `'use strict'` pragma
    pub use_strict: bool,
    /// Where to start looking for `package.json`; defaults to the target
    pub source: Option<PathBuf>,
}

/// Whether `content` carries the generation signature
pub fn is_signed(content: &str) -> bool {
    content.lines().next() == Some(SIGNATURE)
}

/// Render the version module text
pub fn render(version: &str, git: &GitMetadata, options: &GenerationOptions) -> String {
    let end = if options.use_semicolon { ";" } else { "" };
    let literal = quote(version);

    let mut lines = vec![SIGNATURE.to_string()];
    if options.use_strict {
        lines.push(format!("'use strict'{end}"));
    }
    if !git.is_empty() {
        lines.push(format!("// commit: {}{}", git.short_hash, git.dirty));
    }
    if options.use_es6_syntax {
        lines.push(format!("export const version = {literal}{end}"));
    } else {
        lines.push(format!("module.exports = {literal}{end}"));
    }

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

/// Single-quoted string literal
fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

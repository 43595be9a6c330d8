//! Version information for the versionmod binary

/// Current version of versionmod
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build timestamp (set at compile time)
pub const BUILD_TIME: Option<&str> = option_env!("VERSIONMOD_BUILD_TIME");

/// Git commit hash (set at compile time)
pub const GIT_COMMIT: Option<&str> = option_env!("VERSIONMOD_GIT_COMMIT");

/// Get full version string with optional build information
pub fn full_version() -> String {
    format_version(VERSION, GIT_COMMIT, BUILD_TIME)
}

fn format_version(version: &str, commit: Option<&str>, time: Option<&str>) -> String {
    let mut full = version.to_string();

    if let Some(commit) = commit {
        let short: String = commit.chars().take(8).collect();
        full.push_str(&format!(" ({short})"));
    }

    if let Some(time) = time {
        full.push_str(&format!(" built {time}"));
    }

    full
}

#[cfg(test)]
mod tests {
    use super::format_version;

    #[test]
    fn test_plain_version() {
        assert_eq!(format_version("0.3.0", None, None), "0.3.0");
    }

    #[test]
    fn test_commit_is_truncated() {
        assert_eq!(
            format_version("0.3.0", Some("0123456789abcdef"), None),
            "0.3.0 (01234567)"
        );
        assert_eq!(format_version("0.3.0", Some("abc1234"), None), "0.3.0 (abc1234)");
    }

    #[test]
    fn test_commit_with_multibyte_chars() {
        assert_eq!(
            format_version("0.3.0", Some("ééééééééé"), None),
            "0.3.0 (éééééééé)"
        );
    }

    #[test]
    fn test_build_time() {
        assert_eq!(
            format_version("0.3.0", Some("abc1234"), Some("2026-01-01")),
            "0.3.0 (abc1234) built 2026-01-01"
        );
    }
}

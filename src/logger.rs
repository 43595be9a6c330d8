//! Logging setup for versionmod
//!
//! Two output styles share one level syntax: `debug` selects the
//! human-readable `env_logger` format, `json:debug` (or just `json`) selects
//! JSON lines written to stderr or to `VERSIONMOD_LOG_PATH`.

use chrono::{Local, Utc};
use log::{Level, LevelFilter, Log, Metadata, Record};
use serde_json::json;
use std::env;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::sync::Mutex;

/// Environment variable consulted when no level is given on the command line
pub const LOG_LEVEL_ENV: &str = "VERSIONMOD_LOG_LEVEL";

/// Environment variable naming a file for JSON log output
pub const LOG_PATH_ENV: &str = "VERSIONMOD_LOG_PATH";

/// Parsed form of a level specification such as `info` or `json:trace`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogSpec {
    pub json: bool,
    pub level: LevelFilter,
}

impl LogSpec {
    /// Parse a level string. Unknown names fall back to `info`.
    pub fn parse(level_str: &str) -> Self {
        let (json, actual_level) = if let Some(stripped) = level_str.strip_prefix("json:") {
            (true, stripped)
        } else if level_str == "json" {
            (true, "info")
        } else {
            (false, level_str)
        };

        let level = match actual_level.to_ascii_lowercase().as_str() {
            "trace" => LevelFilter::Trace,
            "debug" => LevelFilter::Debug,
            "info" => LevelFilter::Info,
            "warn" => LevelFilter::Warn,
            "error" => LevelFilter::Error,
            "off" => LevelFilter::Off,
            _ => LevelFilter::Info,
        };

        LogSpec { json, level }
    }

    /// Level implied by the `-v` counter when nothing else is configured
    pub fn from_verbosity(verbose: u8) -> Self {
        let level = match verbose {
            0 | 1 => LevelFilter::Warn,
            2 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        };
        LogSpec { json: false, level }
    }
}

/// JSON logger implementation
#[derive(Debug)]
pub struct JsonLogger {
    level: Level,
    target_file: Mutex<Option<std::fs::File>>,
}

impl JsonLogger {
    /// Create a new JSON logger
    pub fn new(level: Level, log_path: Option<String>) -> Self {
        let target_file = if let Some(path) = log_path {
            OpenOptions::new().create(true).append(true).open(path).ok()
        } else {
            None
        };

        JsonLogger {
            level,
            target_file: Mutex::new(target_file),
        }
    }

    /// Install the global logger.
    ///
    /// Resolution order: explicit `level`, then `VERSIONMOD_LOG_LEVEL`, then
    /// the verbosity fallback. Returns the spec that was applied.
    pub fn init(level: Option<&str>, verbose: u8) -> LogSpec {
        let spec = level
            .map(str::to_string)
            .or_else(|| env::var(LOG_LEVEL_ENV).ok())
            .map(|s| LogSpec::parse(&s))
            .unwrap_or_else(|| LogSpec::from_verbosity(verbose));

        if !spec.json {
            let _ = env_logger::Builder::new()
                .filter_level(spec.level)
                .format(|buf, record| {
                    writeln!(
                        buf,
                        "[{} {} {}] {}",
                        Local::now().format("%Y-%m-%dT%H:%M:%S"),
                        record.level(),
                        record.target(),
                        record.args()
                    )
                })
                .try_init();
            return spec;
        }

        let Some(level) = spec.level.to_level() else {
            log::set_max_level(LevelFilter::Off);
            return spec;
        };

        let logger = Box::new(JsonLogger::new(level, env::var(LOG_PATH_ENV).ok()));
        if let Err(e) = log::set_boxed_logger(logger) {
            eprintln!("Failed to initialize JSON logger: {e}");
            return spec;
        }
        log::set_max_level(spec.level);
        spec
    }
}

impl Log for JsonLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let log_entry = json!({
            "@timestamp": Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true),
            "@level": record.level().to_string().to_lowercase(),
            "@message": record.args().to_string(),
            "@module": record.target(),
            "@pid": std::process::id(),
            "@file": record.file().unwrap_or("unknown"),
            "@line": record.line().unwrap_or(0),
        });

        let line = format!("{}\n", serde_json::to_string(&log_entry).unwrap_or_default());

        // Write to file or stderr
        if let Ok(mut file_guard) = self.target_file.lock() {
            if let Some(ref mut file) = *file_guard {
                let _ = file.write_all(line.as_bytes());
                let _ = file.flush();
                return;
            }
        }
        let _ = io::stderr().write_all(line.as_bytes());
        let _ = io::stderr().flush();
    }

    fn flush(&self) {
        if let Ok(mut file_guard) = self.target_file.lock() {
            if let Some(ref mut file) = *file_guard {
                let _ = file.flush();
            }
        }
        let _ = io::stderr().flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_levels() {
        assert_eq!(
            LogSpec::parse("debug"),
            LogSpec { json: false, level: LevelFilter::Debug }
        );
        assert_eq!(LogSpec::parse("OFF").level, LevelFilter::Off);
        assert_eq!(LogSpec::parse("bogus").level, LevelFilter::Info);
    }

    #[test]
    fn test_parse_json_levels() {
        assert_eq!(
            LogSpec::parse("json"),
            LogSpec { json: true, level: LevelFilter::Info }
        );
        assert_eq!(
            LogSpec::parse("json:trace"),
            LogSpec { json: true, level: LevelFilter::Trace }
        );
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(LogSpec::from_verbosity(0).level, LevelFilter::Warn);
        assert_eq!(LogSpec::from_verbosity(1).level, LevelFilter::Warn);
        assert_eq!(LogSpec::from_verbosity(2).level, LevelFilter::Info);
        assert_eq!(LogSpec::from_verbosity(5).level, LevelFilter::Debug);
    }

    #[test]
    fn test_json_logger_filters_by_level() {
        let logger = JsonLogger::new(Level::Info, None);
        let debug = Metadata::builder().level(Level::Debug).build();
        let warn = Metadata::builder().level(Level::Warn).build();
        assert!(!logger.enabled(&debug));
        assert!(logger.enabled(&warn));
    }

    #[test]
    fn test_json_logger_writes_to_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("log.jsonl");
        let logger = JsonLogger::new(Level::Trace, Some(path.to_string_lossy().to_string()));

        logger.log(
            &Record::builder()
                .args(format_args!("hello"))
                .level(Level::Info)
                .target("versionmod::test")
                .build(),
        );
        logger.flush();

        let content = std::fs::read_to_string(&path).unwrap();
        let entry: serde_json::Value = serde_json::from_str(content.trim()).unwrap();
        assert_eq!(entry["@message"], "hello");
        assert_eq!(entry["@level"], "info");
        assert_eq!(entry["@module"], "versionmod::test");
    }
}

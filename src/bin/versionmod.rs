//! versionmod binary

use anyhow::Context;
use clap::{ArgAction, Parser, error::ErrorKind};
use std::{
    env,
    ffi::OsString,
    panic,
    path::{Path, PathBuf},
    process,
};
use versionmod::{GenerationOptions, cli, cli::Outcome, exit_codes::*};

#[derive(Parser, Debug)]
#[command(
    version = versionmod::version::VERSION,
    override_usage = "versionmod [options] <target>",
    about = "Generates a version module at the target filepath."
)]
struct Args {
    /// Increased output verbosity
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Use semicolons in generated code
    #[arg(short, long)]
    semi: bool,

    /// Use es6 syntax in generated code
    #[arg(short, long)]
    es6: bool,

    /// Use "use strict" in generated code
    #[arg(short = 'u', long)]
    strict: bool,

    /// Search for package.json along a custom path
    #[arg(short = 'p', long, value_name = "path")]
    source: Option<PathBuf>,

    /// Check if the version module is up to date
    #[arg(short, long)]
    check_only: bool,

    /// Log level (trace, debug, info, warn, error, off, json[:level])
    #[arg(long)]
    log_level: Option<String>,

    /// Path of the version module
    target: Option<PathBuf>,
}

fn main() {
    panic::set_hook(Box::new(|panic_info| {
        eprintln!("PANIC: {}", panic_info);
        process::exit(EXIT_PANIC);
    }));

    let result = panic::catch_unwind(run);

    match result {
        Ok(exit_code) => process::exit(exit_code),
        Err(_) => {
            eprintln!("Fatal: Unhandled panic in versionmod");
            process::exit(EXIT_PANIC);
        }
    }
}

fn run() -> i32 {
    // Long version carries build metadata, clap only knows the short one
    if env::args().nth(1).as_deref() == Some("--version") {
        println!("versionmod {}", versionmod::version::full_version());
        return EXIT_SUCCESS;
    }

    let args = match parse_args(env::args_os()) {
        Ok(args) => args,
        Err(code) => return code,
    };
    let spec = versionmod::logger::JsonLogger::init(args.log_level.as_deref(), args.verbose);
    log::debug!("🚀 versionmod started: {:?} (log {:?})", args, spec);

    match execute(&args) {
        Ok(outcome) => {
            if args.verbose >= 1 {
                if let Some(target) = args.target.as_deref() {
                    let (message, to_stderr) = outcome.message(target);
                    if to_stderr {
                        eprintln!("{message}");
                    } else {
                        println!("{message}");
                    }
                }
            }
            outcome.exit_code()
        }
        Err(e) => {
            log::debug!("❌ {:?}", e);
            eprintln!("ERROR: {:#}", e);
            EXIT_ERROR
        }
    }
}

/// Parse the command line. Usage errors exit with 1 so they never read as a
/// stale module; help and version output exit with 0.
fn parse_args<I, T>(argv: I) -> Result<Args, i32>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Args::try_parse_from(argv).map_err(|e| {
        let _ = e.print();
        match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => EXIT_SUCCESS,
            _ => EXIT_ERROR,
        }
    })
}

fn execute(args: &Args) -> anyhow::Result<Outcome> {
    let options = GenerationOptions {
        use_semicolon: args.semi,
        use_es6_syntax: args.es6,
        use_strict: args.strict,
        source: args.source.clone(),
    };

    match args.target.as_deref() {
        Some(target) => cli::execute(Some(target), &options, args.check_only)
            .with_context(|| describe(target, args.check_only)),
        None => Ok(cli::execute(None, &options, args.check_only)?),
    }
}

fn describe(target: &Path, check_only: bool) -> String {
    if check_only {
        format!("checking version module {}", target.display())
    } else {
        format!("generating version module {}", target.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags() {
        let args = parse_args(["versionmod", "-vv", "-s", "-e", "-u", "-c", "-p", "pkg", "v.js"])
            .unwrap();
        assert_eq!(args.verbose, 2);
        assert!(args.semi && args.es6 && args.strict && args.check_only);
        assert_eq!(args.source, Some(PathBuf::from("pkg")));
        assert_eq!(args.target, Some(PathBuf::from("v.js")));
    }

    #[test]
    fn test_usage_errors_exit_with_error() {
        assert_eq!(parse_args(["versionmod", "-c", "--bogus", "v.js"]).unwrap_err(), EXIT_ERROR);
        assert_eq!(parse_args(["versionmod", "-c", "-p"]).unwrap_err(), EXIT_ERROR);
    }

    #[test]
    fn test_help_exits_successfully() {
        assert_eq!(parse_args(["versionmod", "--help"]).unwrap_err(), EXIT_SUCCESS);
    }

    #[test]
    fn test_missing_target_message() {
        let args = parse_args(["versionmod", "-c"]).unwrap();
        let err = execute(&args).unwrap_err();
        assert_eq!(format!("{err:#}"), "missing argument: target");
    }

    #[test]
    fn test_error_names_target() {
        let args = parse_args(["versionmod", "-c", "-p", "/nonexistent/dir", "v.js"]).unwrap();
        let message = describe(args.target.as_deref().unwrap(), args.check_only);
        assert_eq!(message, "checking version module v.js");
    }
}

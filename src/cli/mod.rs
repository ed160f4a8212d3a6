//! The vouch command-line entry point.
//!
//! A test binary's `main` hands its registry to [`main_with`] (or relies on
//! the process-wide registry through [`main`]). Everything past argument
//! collection runs inside the outer fault boundary. A bad flag or a broken
//! output stream is printed as a miette diagnostic; anything else escaping
//! the runner is printed as a flattened fault. Both end the process with a
//! failing exit code.

use std::ffi::OsString;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;
use tracing::error;

use crate::cli::args::RunnerArgs;
use crate::config::Config;
use crate::errors::{self, Result, VouchError};
use crate::fault;
use crate::logging;
use crate::runtime::driver;
use crate::runtime::registry::{self, Registry};

pub mod args;
pub mod output;

/// Runs the process-wide registry with the process arguments.
pub fn main() -> ExitCode {
    let registry = registry::snapshot_global();
    run(&registry, std::env::args_os())
}

/// Runs `registry` with the process arguments.
pub fn main_with(registry: &Registry) -> ExitCode {
    run(registry, std::env::args_os())
}

/// Parses `args` (program name first) and runs `registry`.
pub fn run<I, T>(registry: &Registry, args: I) -> ExitCode
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    logging::init();
    fault::install_quiet_panic_hook();

    let outcome = fault::shield(|| -> miette::Result<Result<bool>> {
        Ok(execute(registry, args))
    });

    match outcome {
        Ok(Ok(true)) => ExitCode::SUCCESS,
        Ok(Ok(false)) => ExitCode::FAILURE,
        Ok(Err(error)) => {
            error!(code = error.code_str(), %error, "run aborted");
            errors::print_error(error);
            ExitCode::FAILURE
        }
        Err(fault) => {
            error!(%fault, "run aborted");
            eprintln!("{fault}");
            ExitCode::FAILURE
        }
    }
}

fn execute<I, T>(registry: &Registry, args: I) -> Result<bool>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match parse(args)? {
        Some(config) => Ok(driver::run_all(registry, &config)?.ok),
        None => Ok(true),
    }
}

/// Builds the configuration, or `None` when clap already answered a
/// `--help` or `--version` request.
pub fn parse<I, T>(args: I) -> Result<Option<Config>>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match RunnerArgs::try_parse_from(args) {
        Ok(args) => args.into_config().map(Some),
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = err.print();
            Ok(None)
        }
        Err(err) => Err(VouchError::Usage(err)),
    }
}

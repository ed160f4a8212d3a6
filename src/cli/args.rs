//! Defines the command-line flags accepted by a vouch test binary.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{Parser, ValueEnum};

use crate::cli::output::Sink;
use crate::config::Config;

/// The flags every test binary understands.
#[derive(Debug, Parser)]
#[command(
    name = "vouch",
    version,
    about = "Runs the fixtures registered in this test binary."
)]
pub struct RunnerArgs {
    /// Only run fixtures whose whole name matches this regular expression.
    #[arg(short = 'n', long = "name", value_name = "REGEX", default_value = ".*")]
    pub name: String,

    /// Fail the run unless at least one fixture ran and every fixture passed.
    #[arg(short, long)]
    pub strict: bool,

    /// 0 prints failures only, 1 adds the summary, 2 prints every expectation.
    /// Values outside that range are clamped.
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        default_value_t = 1,
        allow_negative_numbers = true
    )]
    pub verbosity: i64,

    /// When to color the report.
    #[arg(long, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

impl RunnerArgs {
    /// Builds the run configuration, reporting stdout as the sink.
    pub fn into_config(self) -> crate::Result<Config> {
        Ok(Config::default()
            .with_pattern(&self.name)?
            .with_strict(self.strict)
            .with_verbosity(self.verbosity)
            .with_sink(Sink::stdout(self.color)))
    }
}

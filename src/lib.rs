//! Vouch: a minimal in-process unit-test engine.
//!
//! Fixtures are registered into a [`Registry`], run one at a time inside a
//! fault boundary, and checked with `expect_*!` macros whose failures are
//! reported with their source text and operand values:
//!
//! ```no_run
//! use std::process::ExitCode;
//! use vouch::{expect_eq, expect_almost_eq, fixture, Registry};
//!
//! fn main() -> ExitCode {
//!     let mut registry = Registry::new();
//!     fixture!(registry, arithmetic, || {
//!         expect_eq!(2 + 2, 4);
//!         expect_almost_eq!(0.1 + 0.2, 0.3, 4);
//!     });
//!     vouch::main_with(&registry)
//! }
//! ```

pub use crate::cli::output::{Capture, Sink};
pub use crate::cli::{main, main_with};
pub use crate::config::{Config, Verbosity};
pub use crate::errors::{Result, VouchError};
pub use crate::expectation::Expectation;
pub use crate::fault::{shield, Fault, FixtureOutput};
pub use crate::location::Location;
pub use crate::runtime::{run_all, Fixture, Registry, RunReport, Tally};

pub mod cli;
pub mod config;
pub mod errors;
pub mod expectation;
pub mod fault;
pub mod location;
pub mod logging;
pub mod operand;
pub mod predicate;
pub mod runtime;

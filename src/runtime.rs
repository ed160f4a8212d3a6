//! Runtime module for vouch
//!
//! Holds everything that exists while fixtures run: the registry they are
//! drawn from, the per-fixture execution context, and the driver that
//! walks the registry.

pub mod context;
pub mod driver;
pub mod registry;

pub use context::{with_current, ContextGuard, ContextState};
pub use driver::{run_all, RunReport, Tally};
pub use registry::{Fixture, Procedure, Registry};

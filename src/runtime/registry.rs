//! Fixture registration.
//!
//! A [`Registry`] is an append-only list of fixtures kept in registration
//! order. Test binaries either build one explicitly and hand it to
//! [`crate::cli::main_with`], or register into the process-wide registry
//! behind [`global`] and call [`crate::cli::main`].
//!
//! ## Registry Invariant
//! Registration happens before a run starts. The driver only ever reads a
//! registry, and the global one is snapshotted so no lock is held while
//! fixture bodies execute.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use once_cell::sync::Lazy;
use tracing::{debug, warn};

use crate::config::Config;
use crate::errors::Result;
use crate::fault::{self, FixtureOutput};
use crate::location::Location;
use crate::runtime::context::ContextGuard;

/// A type-erased fixture body.
pub type Procedure = Arc<dyn Fn() -> miette::Result<()> + Send + Sync>;

/// A named, located, zero-argument test procedure.
#[derive(Clone)]
pub struct Fixture {
    location: Location,
    name: String,
    procedure: Procedure,
}

impl Fixture {
    pub fn new<F, O>(location: Location, name: impl Into<String>, body: F) -> Self
    where
        F: Fn() -> O + Send + Sync + 'static,
        O: FixtureOutput,
    {
        Self {
            location,
            name: name.into(),
            procedure: Arc::new(move || body().into_outcome()),
        }
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs the fixture in its own context and returns whether it passed.
    ///
    /// A fault escaping the body is reported and fails the fixture no matter
    /// how its expectations went. The only error is trying to run a fixture
    /// from inside another one.
    pub fn invoke(&self, config: &Config) -> Result<bool> {
        let context = ContextGuard::enter(&self.name, self.location, config)?;
        debug!(fixture = %self.name, location = %self.location, "running fixture");
        let passed = match fault::shield(|| (self.procedure)()) {
            Ok(()) => context.is_ok(),
            Err(fault) => {
                warn!(fixture = %self.name, %fault, "fixture faulted");
                context.report_fault(&fault);
                false
            }
        };
        debug!(fixture = %self.name, passed, "fixture finished");
        Ok(passed)
    }
}

impl fmt::Debug for Fixture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fixture")
            .field("location", &self.location)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Fixtures in registration order. Names need not be unique.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    fixtures: Vec<Fixture>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a fixture built from `body`.
    pub fn register<F, O>(
        &mut self,
        location: Location,
        name: impl Into<String>,
        body: F,
    ) -> &mut Self
    where
        F: Fn() -> O + Send + Sync + 'static,
        O: FixtureOutput,
    {
        self.push(Fixture::new(location, name, body))
    }

    pub fn push(&mut self, fixture: Fixture) -> &mut Self {
        self.fixtures.push(fixture);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &Fixture> {
        self.fixtures.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fixtures.iter().map(Fixture::name)
    }

    pub fn len(&self) -> usize {
        self.fixtures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixtures.is_empty()
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a Fixture;
    type IntoIter = std::slice::Iter<'a, Fixture>;

    fn into_iter(self) -> Self::IntoIter {
        self.fixtures.iter()
    }
}

// ============================================================================
// PROCESS-WIDE REGISTRY
// ============================================================================

static GLOBAL: Lazy<Mutex<Registry>> = Lazy::new(|| Mutex::new(Registry::new()));

/// Locks the process-wide registry.
pub fn global() -> MutexGuard<'static, Registry> {
    GLOBAL.lock().unwrap_or_else(PoisonError::into_inner)
}

pub fn register_global<F, O>(location: Location, name: impl Into<String>, body: F)
where
    F: Fn() -> O + Send + Sync + 'static,
    O: FixtureOutput,
{
    global().register(location, name, body);
}

/// A copy of the process-wide registry as it stands now.
pub fn snapshot_global() -> Registry {
    global().clone()
}

/// Registers a fixture named after an identifier, at the call site.
///
/// `fixture!(registry, name, ..)` appends to an explicit [`Registry`];
/// `fixture!(name, ..)` appends to the process-wide one. The body is one of:
///
/// - a block, `{ .. }`, run as a procedure returning `()`;
/// - `-> Type { .. }`, a block returning `Type` (usually `miette::Result<()>`);
/// - any closure expression.
///
/// The block forms fix the return type, so bodies that never return (a bare
/// `todo!()` or one ending in `panic!`) are accepted as they are.
///
/// ```
/// use vouch::{expect_eq, fixture, Registry};
///
/// let mut registry = Registry::new();
/// fixture!(registry, sums, { expect_eq!(2 + 2, 4); });
/// fixture!(registry, unfinished, { todo!() });
/// fixture!(registry, fallible, -> miette::Result<()> {
///     let n: u8 = "7".parse().map_err(|_| miette::miette!("not a number"))?;
///     expect_eq!(n, 7);
///     Ok(())
/// });
/// assert_eq!(registry.len(), 3);
/// ```
#[macro_export]
macro_rules! fixture {
    ($registry:expr, $name:ident, -> $ret:ty $body:block $(,)?) => {
        $registry.register($crate::here!(), stringify!($name), move || -> $ret { $body })
    };
    ($registry:expr, $name:ident, $body:block $(,)?) => {
        $registry.register($crate::here!(), stringify!($name), move || -> () { $body })
    };
    ($registry:expr, $name:ident, $body:expr $(,)?) => {
        $registry.register($crate::here!(), stringify!($name), $body)
    };
    ($name:ident, -> $ret:ty $body:block $(,)?) => {
        $crate::runtime::registry::register_global(
            $crate::here!(),
            stringify!($name),
            move || -> $ret { $body },
        )
    };
    ($name:ident, $body:block $(,)?) => {
        $crate::runtime::registry::register_global(
            $crate::here!(),
            stringify!($name),
            move || -> () { $body },
        )
    };
    ($name:ident, $body:expr $(,)?) => {
        $crate::runtime::registry::register_global($crate::here!(), stringify!($name), $body)
    };
}

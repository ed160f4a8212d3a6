//! The fault boundary.
//!
//! [`shield`] runs an operation and turns anything that escapes it, whether a
//! returned error or a panic, into a [`Fault`]: one primary message plus the
//! chain of underlying causes, outermost first. The boundary itself never
//! fails, which is what lets one broken fixture be reported without taking
//! the rest of the run down with it.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

/// Joins the pieces of every report line, and the message and causes of a
/// flattened fault.
pub const SEPARATOR: &str = "; ";

/// Message used for panic payloads that carry no readable text.
pub const UNRECOGNIZED_FAULT: &str = "unrecognized fault";

/// A normalized, unrecoverable failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    message: String,
    causes: Vec<String>,
}

impl Fault {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            causes: Vec::new(),
        }
    }

    /// Wraps this fault in an outer message; the current message becomes the
    /// first cause.
    pub fn context(self, message: impl Into<String>) -> Self {
        let mut causes = Vec::with_capacity(self.causes.len() + 1);
        causes.push(self.message);
        causes.extend(self.causes);
        Self {
            message: message.into(),
            causes,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Underlying causes, outermost first.
    pub fn causes(&self) -> &[String] {
        &self.causes
    }

    /// Flattens a report and its `source()` chain.
    pub fn from_report(report: &miette::Report) -> Self {
        let mut chain = report.chain().map(|cause| cause.to_string());
        let message = chain.next().unwrap_or_else(|| report.to_string());
        Self {
            message,
            causes: chain.collect(),
        }
    }

    fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let payload = match payload.downcast::<Fault>() {
            Ok(fault) => return *fault,
            Err(payload) => payload,
        };
        if let Some(text) = payload.downcast_ref::<&'static str>() {
            return Self::new(*text);
        }
        match payload.downcast::<String>() {
            Ok(text) => Self::new(*text),
            Err(_) => Self::new(UNRECOGNIZED_FAULT),
        }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        for cause in &self.causes {
            f.write_str(SEPARATOR)?;
            f.write_str(cause)?;
        }
        Ok(())
    }
}

impl From<miette::Report> for Fault {
    fn from(report: miette::Report) -> Self {
        Self::from_report(&report)
    }
}

/// What a fixture body may return.
///
/// Bodies either return nothing or a `Result` whose error converts into a
/// [`miette::Report`], so `?` and `WrapErr::wrap_err` work inside fixtures.
pub trait FixtureOutput {
    fn into_outcome(self) -> miette::Result<()>;
}

impl FixtureOutput for () {
    fn into_outcome(self) -> miette::Result<()> {
        Ok(())
    }
}

impl<E> FixtureOutput for Result<(), E>
where
    E: Into<miette::Report>,
{
    fn into_outcome(self) -> miette::Result<()> {
        self.map_err(Into::into)
    }
}

/// Runs `op`, trapping returned errors and panics alike.
pub fn shield<T, E, F>(op: F) -> Result<T, Fault>
where
    F: FnOnce() -> Result<T, E>,
    E: Into<miette::Report>,
{
    match panic::catch_unwind(AssertUnwindSafe(op)) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(error)) => Err(Fault::from_report(&error.into())),
        Err(payload) => Err(Fault::from_panic(payload)),
    }
}

/// Replaces the default panic hook, which would print a backtrace banner for
/// every trapped fault, with one that only logs.
pub fn install_quiet_panic_hook() {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(|| {
        panic::set_hook(Box::new(|info| {
            tracing::debug!(%info, "panic trapped by fault boundary");
        }));
    });
}

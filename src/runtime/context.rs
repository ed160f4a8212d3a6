//! The execution context of the fixture currently running on this thread.
//!
//! A [`ContextGuard`] installs the context in a thread-local slot for the
//! duration of one fixture invocation. Expectations find it through
//! [`with_current`] instead of taking it as a parameter, which keeps the
//! `expect_*!` macros free of plumbing. The begin banner is printed lazily,
//! on the first line written through the context, and the end banner only
//! when a begin banner was printed.

use std::cell::{Cell, RefCell};
use std::io;
use std::rc::Rc;

use termcolor::WriteColor;

use crate::cli::output::{self, INDENT};
use crate::config::{Config, Verbosity};
use crate::errors::{Result, VouchError};
use crate::fault::{Fault, SEPARATOR};
use crate::location::Location;

thread_local! {
    static CURRENT: RefCell<Option<Rc<ContextState>>> = const { RefCell::new(None) };
}

/// Per-fixture state shared between the guard and live expectations.
#[derive(Debug)]
pub struct ContextState {
    name: String,
    location: Location,
    config: Config,
    showing: Cell<bool>,
    ok: Cell<bool>,
}

impl ContextState {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn verbosity(&self) -> Verbosity {
        self.config.verbosity()
    }

    /// Whether every expectation so far has passed.
    pub fn is_ok(&self) -> bool {
        self.ok.get()
    }

    /// Marks the fixture failed. There is no way back to passing.
    pub fn fail(&self) {
        self.ok.set(false);
    }

    /// Writes one report line, printing the begin banner first if needed.
    pub fn write_line<F>(&self, body: F) -> io::Result<()>
    where
        F: FnOnce(&mut dyn WriteColor) -> io::Result<()>,
    {
        self.show_begin()?;
        self.config.sink().write_line(body)
    }

    fn show_begin(&self) -> io::Result<()> {
        if self.showing.replace(true) {
            return Ok(());
        }
        self.config.sink().write_line(|out| {
            write!(out, "{}{SEPARATOR}begin ", self.location)?;
            output::write_name(out, &self.name)
        })
    }

    fn show_end(&self) -> io::Result<()> {
        if !self.showing.get() {
            return Ok(());
        }
        self.config.sink().write_line(|out| {
            out.write_all(b"end ")?;
            output::write_name(out, &self.name)?;
            out.write_all(SEPARATOR.as_bytes())?;
            output::write_verdict(out, self.ok.get())
        })
    }
}

/// Keeps a fixture's context installed; dropping it prints the end banner
/// (when one is due) and clears the slot.
#[derive(Debug)]
pub struct ContextGuard {
    state: Rc<ContextState>,
}

impl ContextGuard {
    /// Installs a fresh context for `name`.
    ///
    /// Fails with [`VouchError::NestedFixture`] when another fixture is
    /// already running on this thread; the running context is left alone.
    pub fn enter(name: &str, location: Location, config: &Config) -> Result<Self> {
        let state = Rc::new(ContextState {
            name: name.to_string(),
            location,
            config: config.clone(),
            showing: Cell::new(false),
            ok: Cell::new(true),
        });
        CURRENT.with(|slot| {
            let mut slot = slot.borrow_mut();
            if let Some(active) = slot.as_ref() {
                return Err(VouchError::NestedFixture {
                    active: active.name.clone(),
                    requested: name.to_string(),
                });
            }
            *slot = Some(Rc::clone(&state));
            Ok(())
        })?;
        let guard = Self { state };
        if guard.state.verbosity() >= Verbosity::VERBOSE {
            let _ = guard.state.show_begin();
        }
        Ok(guard)
    }

    pub fn state(&self) -> &ContextState {
        &self.state
    }

    pub fn is_ok(&self) -> bool {
        self.state.is_ok()
    }

    /// Reports a trapped fault inside the fixture's frame and fails it.
    pub fn report_fault(&self, fault: &Fault) {
        self.state.fail();
        let _ = self.state.write_line(|out| {
            out.write_all(INDENT.as_bytes())?;
            output::write_alert(out, "exception")?;
            write!(out, "{SEPARATOR}{fault}")
        });
    }
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        let _ = self.state.show_end();
        let _ = CURRENT.try_with(|slot| slot.borrow_mut().take());
    }
}

/// Runs `f` against the current context, if a fixture is running.
pub fn with_current<R>(f: impl FnOnce(&ContextState) -> R) -> Option<R> {
    let state = CURRENT
        .try_with(|slot| slot.borrow().clone())
        .ok()
        .flatten()?;
    Some(f(&state))
}

pub fn is_active() -> bool {
    with_current(|_| ()).is_some()
}

//! Expectations: one checked condition at one source location.
//!
//! An [`Expectation`] is built by the `expect_*!` macros as a temporary and
//! reports when it is dropped, which for the usual statement form
//! `expect_eq!(a, b);` is the end of that statement:
//!
//! - a failing outcome marks the running fixture failed;
//! - the report line is printed on failure, and on success only at
//!   verbosity 2.
//!
//! Extra context can be attached before the drop with [`Expectation::note`]
//! and [`Expectation::with`]:
//!
//! ```no_run
//! use vouch::expect_lt;
//!
//! let attempts = 3;
//! expect_lt!(attempts, 5).note("retry budget ").with(5);
//! ```
//!
//! Dropping an expectation while no fixture is running panics.

use std::fmt::{self, Write as _};
use std::io;

use termcolor::WriteColor;
use tracing::trace;

use crate::cli::output::{self, INDENT};
use crate::config::Verbosity;
use crate::fault::SEPARATOR;
use crate::location::Location;
use crate::predicate::Predicate;
use crate::runtime::context;

pub struct Expectation<'a> {
    location: Location,
    predicate: Predicate<'a>,
    extra: String,
}

impl<'a> Expectation<'a> {
    pub fn new(location: Location, predicate: Predicate<'a>) -> Self {
        Self {
            location,
            predicate,
            extra: String::new(),
        }
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn predicate(&self) -> &Predicate<'a> {
        &self.predicate
    }

    pub fn passed(&self) -> bool {
        self.predicate.holds()
    }

    /// Appends a value to the report line, rendered like an operand.
    pub fn with(mut self, value: impl fmt::Debug) -> Self {
        let _ = write!(self.extra, "{value:?}");
        self
    }

    /// Appends plain text to the report line.
    pub fn note(mut self, text: impl fmt::Display) -> Self {
        let _ = write!(self.extra, "{text}");
        self
    }

    fn render(&self, out: &mut dyn WriteColor) -> io::Result<()> {
        write!(out, "{INDENT}{}{SEPARATOR}", self.location)?;
        output::write_verdict(out, self.passed())?;
        write!(out, "{SEPARATOR}{}", self.predicate)?;
        for operand in self.predicate.operands() {
            if !operand.is_literal() {
                write!(out, "{SEPARATOR}{operand}")?;
            }
        }
        if !self.extra.is_empty() {
            write!(out, "{SEPARATOR}{}", self.extra)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Expectation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Expectation")
            .field("location", &self.location)
            .field("predicate", &self.predicate)
            .field("extra", &self.extra)
            .finish()
    }
}

impl Drop for Expectation<'_> {
    fn drop(&mut self) {
        let passed = self.passed();
        trace!(location = %self.location, call = %self.predicate, passed, "expectation");
        let reported = context::with_current(|ctx| {
            if !passed {
                ctx.fail();
            }
            if !passed || ctx.verbosity() >= Verbosity::VERBOSE {
                let _ = ctx.write_line(|out| self.render(out));
            }
        });
        if reported.is_none() && !std::thread::panicking() {
            panic!(
                "expectation `{}` at {} was evaluated outside of a fixture",
                self.predicate, self.location
            );
        }
    }
}

// ============================================================================
// MACROS
// ============================================================================

#[doc(hidden)]
#[macro_export]
macro_rules! __operand {
    ($value:expr) => {
        $crate::operand::Operand::new(stringify!($value), &$value)
    };
}

/// Expects the operand to be truthy (`true`, `Some`, `Ok`).
#[macro_export]
macro_rules! expect {
    ($operand:expr $(,)?) => {
        $crate::Expectation::new(
            $crate::here!(),
            $crate::predicate::is_true($crate::__operand!($operand)),
        )
    };
}

/// Expects the operand to be falsy.
#[macro_export]
macro_rules! expect_not {
    ($operand:expr $(,)?) => {
        $crate::Expectation::new(
            $crate::here!(),
            $crate::predicate::is_false($crate::__operand!($operand)),
        )
    };
}

/// Same as [`expect!`].
#[macro_export]
macro_rules! expect_true {
    ($operand:expr $(,)?) => {
        $crate::expect!($operand)
    };
}

/// Same as [`expect_not!`].
#[macro_export]
macro_rules! expect_false {
    ($operand:expr $(,)?) => {
        $crate::expect_not!($operand)
    };
}

/// Expects `lhs == rhs`. The left operand's type must implement [`Eq`],
/// which rules out floats (use [`expect_almost_eq!`]) and any type that
/// only implements `PartialEq`.
#[macro_export]
macro_rules! expect_eq {
    ($lhs:expr, $rhs:expr $(,)?) => {
        $crate::Expectation::new(
            $crate::here!(),
            $crate::predicate::eq($crate::__operand!($lhs), $crate::__operand!($rhs)),
        )
    };
}

/// Expects `lhs != rhs`. Same [`Eq`] requirement as [`expect_eq!`]; floats
/// go through [`expect_not_almost_eq!`].
#[macro_export]
macro_rules! expect_ne {
    ($lhs:expr, $rhs:expr $(,)?) => {
        $crate::Expectation::new(
            $crate::here!(),
            $crate::predicate::ne($crate::__operand!($lhs), $crate::__operand!($rhs)),
        )
    };
}

#[macro_export]
macro_rules! expect_lt {
    ($lhs:expr, $rhs:expr $(,)?) => {
        $crate::Expectation::new(
            $crate::here!(),
            $crate::predicate::lt($crate::__operand!($lhs), $crate::__operand!($rhs)),
        )
    };
}

#[macro_export]
macro_rules! expect_le {
    ($lhs:expr, $rhs:expr $(,)?) => {
        $crate::Expectation::new(
            $crate::here!(),
            $crate::predicate::le($crate::__operand!($lhs), $crate::__operand!($rhs)),
        )
    };
}

#[macro_export]
macro_rules! expect_gt {
    ($lhs:expr, $rhs:expr $(,)?) => {
        $crate::Expectation::new(
            $crate::here!(),
            $crate::predicate::gt($crate::__operand!($lhs), $crate::__operand!($rhs)),
        )
    };
}

#[macro_export]
macro_rules! expect_ge {
    ($lhs:expr, $rhs:expr $(,)?) => {
        $crate::Expectation::new(
            $crate::here!(),
            $crate::predicate::ge($crate::__operand!($lhs), $crate::__operand!($rhs)),
        )
    };
}

/// Expects `|rhs - lhs| < EPSILON * coef`, `EPSILON` being that of the
/// type of `lhs`.
#[macro_export]
macro_rules! expect_almost_eq {
    ($lhs:expr, $rhs:expr, $coef:expr $(,)?) => {
        $crate::Expectation::new(
            $crate::here!(),
            $crate::predicate::almost_eq(
                $crate::__operand!($lhs),
                $crate::__operand!($rhs),
                $crate::__operand!($coef),
            ),
        )
    };
}

#[macro_export]
macro_rules! expect_not_almost_eq {
    ($lhs:expr, $rhs:expr, $coef:expr $(,)?) => {
        $crate::Expectation::new(
            $crate::here!(),
            $crate::predicate::not_almost_eq(
                $crate::__operand!($lhs),
                $crate::__operand!($rhs),
                $crate::__operand!($coef),
            ),
        )
    };
}

// Vouch self-test suite: a small registry exercising every outcome the
// runner can report. Driven by tests/cli_regression.rs.
// Usage: cargo run --bin selftest -- [-n REGEX] [-s] [-v LEVEL] [--color WHEN]

use std::process::ExitCode;

use miette::{miette, WrapErr};
use vouch::{
    expect, expect_almost_eq, expect_eq, expect_lt, expect_ne, expect_not_almost_eq, fixture,
    here, Registry,
};

fn main() -> ExitCode {
    let mut registry = Registry::new();

    fixture!(registry, arithmetic, || {
        expect_eq!(2 + 2, 4);
        expect_lt!(1, 2);
    });

    fixture!(registry, strings, || {
        let name = String::from("vouch");
        expect_eq!(name, "vouch");
        expect!(name.starts_with('v'));
        expect_ne!(name, "vouched");
    });

    fixture!(registry, floats, || {
        expect_almost_eq!(0.1 + 0.2, 0.3, 4);
        expect_not_almost_eq!(0.1, 0.2, 4);
    });

    fixture!(registry, silent, || {});

    fixture!(registry, broken_math, || {
        expect_eq!(2 + 2, 4);
        expect_eq!(1 + 1, 3);
    });

    fixture!(registry, panics_midway, {
        let seen = 1;
        expect_eq!(seen, 2);
        panic!("gave up halfway");
    });

    fixture!(registry, chained_error, -> miette::Result<()> {
        Err(miette!("socket closed")).wrap_err("loading config")
    });

    fixture!(registry, after_fault, || {
        expect!(true);
    });

    // Same name as the first fixture; both run.
    registry.register(here!(), "arithmetic", || {
        expect_eq!(3 * 3, 9);
    });

    vouch::main_with(&registry)
}

//! The run driver: filter, invoke in order, tally, summarize.

use tracing::{debug, info};

use crate::cli::output;
use crate::config::{Config, Verbosity};
use crate::errors::Result;
use crate::fault::SEPARATOR;
use crate::runtime::registry::Registry;

/// Fixture counts for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl Tally {
    /// Strict runs also need at least one passing fixture.
    pub fn verdict(&self, strict: bool) -> bool {
        if strict {
            self.passed > 0 && self.failed == 0
        } else {
            self.failed == 0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    pub tally: Tally,
    pub ok: bool,
}

/// Runs every fixture whose name fully matches the configured pattern, in
/// registration order. The rest are counted as skipped and never invoked.
pub fn run_all(registry: &Registry, config: &Config) -> Result<RunReport> {
    let mut tally = Tally::default();
    for fixture in registry {
        if !config.matches(fixture.name()) {
            debug!(fixture = fixture.name(), "skipped by name filter");
            tally.skipped += 1;
            continue;
        }
        if fixture.invoke(config)? {
            tally.passed += 1;
        } else {
            tally.failed += 1;
        }
    }

    let ok = tally.verdict(config.is_strict());
    info!(
        passed = tally.passed,
        failed = tally.failed,
        skipped = tally.skipped,
        ok,
        "run finished"
    );
    if !ok || config.verbosity() >= Verbosity::NORMAL {
        write_summary(config, &tally, ok)?;
    }
    Ok(RunReport { tally, ok })
}

fn write_summary(config: &Config, tally: &Tally, ok: bool) -> Result<()> {
    config.sink().write_line(|out| {
        write!(
            out,
            "passed {}{SEPARATOR}failed {}{SEPARATOR}skipped {}{SEPARATOR}",
            tally.passed, tally.failed, tally.skipped
        )?;
        output::write_verdict(out, ok)
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_mode_only_cares_about_failures() {
        let empty = Tally::default();
        assert!(empty.verdict(false));
        let failed = Tally {
            passed: 3,
            failed: 1,
            skipped: 0,
        };
        assert!(!failed.verdict(false));
    }

    #[test]
    fn strict_mode_needs_a_pass() {
        let empty = Tally {
            passed: 0,
            failed: 0,
            skipped: 4,
        };
        assert!(!empty.verdict(true));
        let one = Tally {
            passed: 1,
            ..empty
        };
        assert!(one.verdict(true));
        let mixed = Tally {
            passed: 1,
            failed: 1,
            skipped: 0,
        };
        assert!(!mixed.verdict(true));
    }
}

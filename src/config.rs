//! Run configuration.
//!
//! A plain value handed to the runtime: which fixtures to run, how much to
//! print, whether an empty run counts as a failure, and where output goes.

use std::fmt;

use regex::Regex;

use crate::cli::output::Sink;
use crate::errors::{Result, VouchError};

/// Report verbosity, always one of 0, 1 or 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Verbosity(u8);

impl Verbosity {
    /// Failures only.
    pub const QUIET: Verbosity = Verbosity(0);
    /// Failures and the run summary.
    pub const NORMAL: Verbosity = Verbosity(1);
    /// Every expectation and both fixture banners.
    pub const VERBOSE: Verbosity = Verbosity(2);

    /// Clamps any integer into the supported range.
    pub fn clamped(level: i64) -> Self {
        Verbosity(level.clamp(0, 2) as u8)
    }

    pub fn level(self) -> u8 {
        self.0
    }
}

impl Default for Verbosity {
    fn default() -> Self {
        Verbosity::NORMAL
    }
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pattern: String,
    /// `None` until a pattern other than the default is set.
    matcher: Option<Regex>,
    verbosity: Verbosity,
    strict: bool,
    sink: Sink,
}

pub const MATCH_ALL: &str = ".*";

impl Default for Config {
    fn default() -> Self {
        Self {
            pattern: MATCH_ALL.to_string(),
            matcher: None,
            verbosity: Verbosity::default(),
            strict: false,
            sink: Sink::default(),
        }
    }
}

impl Config {
    /// Sets the fixture name filter. The pattern has to match the whole name.
    pub fn with_pattern(mut self, pattern: &str) -> Result<Self> {
        self.matcher = Some(full_match(pattern).map_err(|source| VouchError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?);
        self.pattern = pattern.to_string();
        Ok(self)
    }

    pub fn with_verbosity(mut self, level: i64) -> Self {
        self.verbosity = Verbosity::clamped(level);
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_sink(mut self, sink: Sink) -> Self {
        self.sink = sink;
        self
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn matches(&self, name: &str) -> bool {
        self.matcher.as_ref().map_or(true, |matcher| matcher.is_match(name))
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn sink(&self) -> &Sink {
        &self.sink
    }
}

fn full_match(pattern: &str) -> std::result::Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{pattern})$"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet() -> Config {
        let (sink, _) = Sink::capture();
        Config::default().with_sink(sink)
    }

    #[test]
    fn verbosity_is_clamped() {
        assert_eq!(Verbosity::clamped(-5), Verbosity::QUIET);
        assert_eq!(Verbosity::clamped(1), Verbosity::NORMAL);
        assert_eq!(Verbosity::clamped(2), Verbosity::VERBOSE);
        assert_eq!(Verbosity::clamped(i64::MAX).level(), 2);
    }

    #[test]
    fn default_matches_every_name() {
        let config = quiet();
        assert_eq!(config.pattern(), MATCH_ALL);
        assert!(config.matches(""));
        assert!(config.matches("anything at all"));
        assert_eq!(config.verbosity(), Verbosity::NORMAL);
        assert!(!config.is_strict());
    }

    #[test]
    fn pattern_must_match_the_whole_name() {
        let config = quiet().with_pattern("arith").unwrap();
        assert!(config.matches("arith"));
        assert!(!config.matches("arithmetic"));
        assert!(!config.matches("fast_arith"));

        let config = quiet().with_pattern("arith.*|strings").unwrap();
        assert!(config.matches("arithmetic"));
        assert!(config.matches("strings"));
        assert!(!config.matches("strings2"));
    }

    #[test]
    fn invalid_pattern_is_reported() {
        let error = quiet().with_pattern("(unclosed").unwrap_err();
        assert!(matches!(
            error,
            VouchError::InvalidPattern { ref pattern, .. } if pattern == "(unclosed"
        ));
    }
}

//! Vouch error handling.
//!
//! The runner's own failures (bad configuration, misuse of the runtime,
//! broken output) are a single `miette`-aware enum. Failures raised by
//! fixture bodies never take this shape: they are trapped by the fault
//! boundary in [`crate::fault`] and reported as flattened text.

use miette::Diagnostic;
use thiserror::Error;

/// Convenience alias used throughout the runtime.
pub type Result<T> = std::result::Result<T, VouchError>;

/// Every error the runner itself can produce.
#[derive(Error, Diagnostic, Debug)]
pub enum VouchError {
    #[error("invalid fixture name pattern `{pattern}`")]
    #[diagnostic(
        code(vouch::config::pattern),
        help("the pattern is a regular expression matched against the whole fixture name")
    )]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid command line")]
    #[diagnostic(code(vouch::config::usage))]
    Usage(#[source] clap::Error),

    #[error("cannot run fixture `{requested}` while fixture `{active}` is running")]
    #[diagnostic(
        code(vouch::runtime::nested),
        help("fixtures run one at a time per thread; call the run driver from outside any fixture")
    )]
    NestedFixture { active: String, requested: String },

    #[error("failed to write report output")]
    #[diagnostic(code(vouch::output))]
    Output(#[from] std::io::Error),
}

impl VouchError {
    /// Stable diagnostic code, handy for matching in tests.
    pub fn code_str(&self) -> &'static str {
        match self {
            VouchError::InvalidPattern { .. } => "vouch::config::pattern",
            VouchError::Usage(_) => "vouch::config::usage",
            VouchError::NestedFixture { .. } => "vouch::runtime::nested",
            VouchError::Output(_) => "vouch::output",
        }
    }
}

/// Prints a VouchError to stderr through miette's report handler, with its
/// code, help text and cause chain.
pub fn print_error(error: VouchError) {
    eprintln!("{}", render_error(error));
}

fn render_error(error: VouchError) -> String {
    let report = miette::Report::new(error);
    format!("{report:?}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn invalid_pattern_keeps_regex_cause() {
        let source = regex::Regex::new("(").unwrap_err();
        let error = VouchError::InvalidPattern {
            pattern: "(".to_string(),
            source,
        };
        assert_eq!(error.to_string(), "invalid fixture name pattern `(`");
        assert!(error.source().is_some());
        assert_eq!(error.code_str(), "vouch::config::pattern");
    }

    #[test]
    fn rendered_report_carries_code_help_and_cause() {
        let source = regex::Regex::new("(").unwrap_err();
        let cause = source.to_string();
        let text = render_error(VouchError::InvalidPattern {
            pattern: "(".to_string(),
            source,
        });
        assert!(text.contains("invalid fixture name pattern `(`"), "{text}");
        assert!(text.contains("vouch::config::pattern"), "{text}");
        assert!(text.contains("help"), "{text}");
        let first_cause_line = cause.lines().find(|line| !line.trim().is_empty()).unwrap();
        assert!(text.contains(first_cause_line.trim()), "{text}");
    }

    #[test]
    fn nested_fixture_names_both_fixtures() {
        let error = VouchError::NestedFixture {
            active: "outer".to_string(),
            requested: "inner".to_string(),
        };
        let text = error.to_string();
        assert!(text.contains("`outer`"));
        assert!(text.contains("`inner`"));
    }
}

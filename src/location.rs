//! Source positions captured at call sites.

use std::fmt;

/// A `file:line` position in the source of a test binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    file: &'static str,
    line: u32,
}

impl Location {
    pub const fn new(file: &'static str, line: u32) -> Self {
        Self { file, line }
    }

    pub fn file(&self) -> &'static str {
        self.file
    }

    pub fn line(&self) -> u32 {
        self.line
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// Captures the current `file:line` as a [`Location`].
#[macro_export]
macro_rules! here {
    () => {
        $crate::Location::new(file!(), line!())
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_as_file_colon_line() {
        assert_eq!(Location::new("src/lib.rs", 12).to_string(), "src/lib.rs:12");
    }

    #[test]
    fn here_points_at_the_call_site() {
        let loc = crate::here!();
        assert_eq!(loc.file(), file!());
        assert_eq!(loc.line(), line!() - 2);
    }
}

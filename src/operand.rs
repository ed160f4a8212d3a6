//! Operands: a value borrowed for the length of one expectation, together
//! with the source text that produced it.

use std::fmt;

/// A `(source text, borrowed value)` pair.
///
/// The macros build these from `stringify!(expr)` and `&expr`, so the value
/// lives exactly as long as the statement holding the expectation.
pub struct Operand<'a, T: ?Sized> {
    src: &'static str,
    value: &'a T,
}

/// An operand whose type has been erased down to its `Debug` rendering.
pub type Captured<'a> = Operand<'a, dyn fmt::Debug + 'a>;

impl<'a, T: ?Sized> Operand<'a, T> {
    pub fn new(src: &'static str, value: &'a T) -> Self {
        Self { src, value }
    }

    pub fn src(&self) -> &'static str {
        self.src
    }

    pub fn value(&self) -> &'a T {
        self.value
    }

    /// True when the source text already spells out the value: it starts
    /// with a digit or a quote.
    pub fn is_literal(&self) -> bool {
        matches!(
            self.src.chars().next(),
            Some(c) if c.is_ascii_digit() || c == '\'' || c == '"'
        )
    }
}

impl<'a, T: fmt::Debug + 'a> Operand<'a, T> {
    pub fn erase(self) -> Captured<'a> {
        Operand {
            src: self.src,
            value: self.value,
        }
    }
}

impl<T: ?Sized> Clone for Operand<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for Operand<'_, T> {}

/// Renders `src=value`, the field appended to a report line.
impl<'a> fmt::Display for Operand<'a, dyn fmt::Debug + 'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={:?}", self.src, self.value)
    }
}

impl<T: ?Sized> fmt::Debug for Operand<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operand").field("src", &self.src).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literals_are_recognized_by_first_character() {
        assert!(Operand::new("42", &42).is_literal());
        assert!(Operand::new("\"text\"", &"text").is_literal());
        assert!(Operand::new("'c'", &'c').is_literal());
        assert!(!Operand::new("count", &3).is_literal());
        assert!(!Operand::new("-1", &-1).is_literal());
        assert!(!Operand::new("", &0).is_literal());
    }

    #[test]
    fn dump_uses_debug_rendering() {
        let name = String::from("vouch");
        let captured = Operand::new("name", &name).erase();
        assert_eq!(captured.to_string(), "name=\"vouch\"");
    }
}

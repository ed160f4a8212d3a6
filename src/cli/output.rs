//! Handles all report output.
//!
//! Every line the runner prints goes through a [`Sink`]: banners,
//! expectation lines, fault lines and the summary. Styling is centralized
//! here so every line colors PASS, FAIL and fixture names the same way.

// ============================================================================
// OUTPUT SINKS: Sink and Capture implementations
// ============================================================================

use std::cell::RefCell;
use std::fmt;
use std::io::{self, Write};
use std::rc::Rc;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::cli::args::ColorMode;

/// Leading indentation of lines reported inside a fixture.
pub const INDENT: &str = "  ";

/// The output stream shared by every clone of one configuration.
///
/// Runs are single threaded, so the sink is reference counted rather than
/// locked; two runs writing to one sink at once would interleave lines.
#[derive(Clone)]
pub struct Sink(Rc<RefCell<Box<dyn WriteColor>>>);

impl Sink {
    pub fn new(writer: impl WriteColor + 'static) -> Self {
        Self(Rc::new(RefCell::new(Box::new(writer))))
    }

    pub fn stdout(mode: ColorMode) -> Self {
        Self::new(StandardStream::stdout(color_choice(mode)))
    }

    /// An in-memory sink without color, and a handle to read it back.
    pub fn capture() -> (Self, Capture) {
        let capture = Capture::default();
        (Self::new(capture.clone()), capture)
    }

    /// Writes one line: `body` fills it, then a newline is added and the
    /// stream flushed.
    pub fn write_line<F>(&self, body: F) -> io::Result<()>
    where
        F: FnOnce(&mut dyn WriteColor) -> io::Result<()>,
    {
        let mut out = self.0.borrow_mut();
        body(&mut **out)?;
        writeln!(out)?;
        out.flush()
    }
}

impl Default for Sink {
    fn default() -> Self {
        Self::stdout(ColorMode::Auto)
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sink")
            .field("color", &self.0.borrow().supports_color())
            .finish()
    }
}

/// Capture: collects output into a shared buffer for tests or
/// programmatic inspection. Color requests are ignored.
#[derive(Clone, Default)]
pub struct Capture(Rc<RefCell<Vec<u8>>>);

impl Capture {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_owned).collect()
    }
}

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl WriteColor for Capture {
    fn supports_color(&self) -> bool {
        false
    }

    fn set_color(&mut self, _spec: &ColorSpec) -> io::Result<()> {
        Ok(())
    }

    fn reset(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// ============================================================================
// STYLED FRAGMENTS
// ============================================================================

/// Writes `PASS` in green or `FAIL` in red.
pub fn write_verdict(out: &mut dyn WriteColor, ok: bool) -> io::Result<()> {
    let (color, text) = if ok {
        (Color::Green, "PASS")
    } else {
        (Color::Red, "FAIL")
    };
    out.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
    out.write_all(text.as_bytes())?;
    out.reset()
}

/// Writes a fixture name in bold.
pub fn write_name(out: &mut dyn WriteColor, name: &str) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_bold(true))?;
    out.write_all(name.as_bytes())?;
    out.reset()
}

pub fn write_alert(out: &mut dyn WriteColor, text: &str) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
    out.write_all(text.as_bytes())?;
    out.reset()
}

/// `Auto` only colors when stdout is a terminal.
pub fn color_choice(mode: ColorMode) -> ColorChoice {
    match mode {
        ColorMode::Always => ColorChoice::Always,
        ColorMode::Never => ColorChoice::Never,
        ColorMode::Auto if atty::is(atty::Stream::Stdout) => ColorChoice::Auto,
        ColorMode::Auto => ColorChoice::Never,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_collects_lines_without_color() {
        let (sink, capture) = Sink::capture();
        sink.write_line(|out| {
            out.write_all(b"passed 1")?;
            out.write_all(b"; ")?;
            write_verdict(out, true)
        })
        .unwrap();
        sink.write_line(|out| write_name(out, "fixture")).unwrap();
        assert_eq!(capture.contents(), "passed 1; PASS\nfixture\n");
        assert_eq!(capture.lines().len(), 2);
    }

    #[test]
    fn clones_share_one_stream() {
        let (sink, capture) = Sink::capture();
        let other = sink.clone();
        sink.write_line(|out| write_verdict(out, false)).unwrap();
        other.write_line(|out| write_alert(out, "exception")).unwrap();
        assert_eq!(capture.lines(), ["FAIL", "exception"]);
    }

    #[test]
    fn ansi_buffer_receives_color_codes() {
        let mut buffer = termcolor::Buffer::ansi();
        write_verdict(&mut buffer, true).unwrap();
        let text = String::from_utf8(buffer.into_inner()).unwrap();
        assert!(text.contains("PASS"));
        assert!(text.starts_with('\u{1b}'));
    }

    #[test]
    fn explicit_color_modes_are_honored() {
        assert_eq!(color_choice(ColorMode::Always), ColorChoice::Always);
        assert_eq!(color_choice(ColorMode::Never), ColorChoice::Never);
    }
}

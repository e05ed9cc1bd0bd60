//! Terminal output for import progress.
//!
//! Progress lines go to stdout uncoloured, so the per-file ` ** added:` lines
//! stay byte-for-byte stable for scripts, and can be silenced with `--quiet`.
//! The result line is green, warnings yellow and errors red; colour is only
//! used when the stream is a terminal.

use std::io::{self, IsTerminal, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Colour-aware writer for stdout/stderr messages.
#[derive(Debug, Clone)]
pub struct OutputManager {
    quiet: bool,
    stdout_color: ColorChoice,
    stderr_color: ColorChoice,
}

impl OutputManager {
    pub fn new(quiet: bool) -> Self {
        Self {
            quiet,
            stdout_color: color_choice(io::stdout().is_terminal()),
            stderr_color: color_choice(io::stderr().is_terminal()),
        }
    }

    /// Print a progress line unless quiet
    pub fn progress(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let stream = StandardStream::stdout(self.stdout_color);
        let mut out = stream.lock();
        writeln!(out, "{message}")
    }

    /// Print a result line, even when quiet
    pub fn success(&self, message: &str) -> io::Result<()> {
        let stream = StandardStream::stdout(self.stdout_color);
        write_styled(&mut stream.lock(), &spec(Color::Green), None, message)
    }

    /// Print a warning to stderr
    pub fn warn(&self, message: &str) -> io::Result<()> {
        let stream = StandardStream::stderr(self.stderr_color);
        write_styled(&mut stream.lock(), &spec(Color::Yellow), Some("Warning:"), message)
    }

    /// Print an error to stderr
    pub fn error(&self, message: &str) -> io::Result<()> {
        let stream = StandardStream::stderr(self.stderr_color);
        write_styled(&mut stream.lock(), &spec(Color::Red), Some("Error:"), message)
    }
}

fn color_choice(is_terminal: bool) -> ColorChoice {
    if is_terminal {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}

fn spec(color: Color) -> ColorSpec {
    let mut spec = ColorSpec::new();
    spec.set_fg(Some(color)).set_bold(true);
    spec
}

/// Writes `message` with either the whole line or just `label` coloured.
fn write_styled<W: WriteColor>(
    out: &mut W,
    spec: &ColorSpec,
    label: Option<&str>,
    message: &str,
) -> io::Result<()> {
    out.set_color(spec)?;
    match label {
        Some(label) => {
            write!(out, "{label}")?;
            out.reset()?;
            writeln!(out, " {message}")
        }
        None => {
            write!(out, "{message}")?;
            out.reset()?;
            writeln!(out)
        }
    }
}

//! Terminal output for the CLI.
//!
//! Uses `termcolor` for the error line on stderr. Respects `NO_COLOR`.

use std::io::Write;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// `NO_COLOR` disables color, otherwise auto-detect the TTY.
pub fn resolve_color_choice() -> ColorChoice {
    if std::env::var_os("NO_COLOR").is_some() {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    }
}

pub struct StyledOutput {
    stdout: StandardStream,
    stderr: StandardStream,
}

impl StyledOutput {
    pub fn new(choice: ColorChoice) -> Self {
        Self {
            stdout: StandardStream::stdout(choice),
            stderr: StandardStream::stderr(choice),
        }
    }

    /// Uncolored text on stdout.
    pub fn plain(&mut self, text: &str) {
        let _ = write!(self.stdout, "{}", text);
        let _ = self.stdout.flush();
    }

    /// `error: <message and causes>` on stderr, with a red bold label.
    pub fn error(&mut self, err: &anyhow::Error) {
        let mut spec = ColorSpec::new();
        spec.set_fg(Some(Color::Red)).set_bold(true);
        let _ = self.stderr.set_color(&spec);
        let _ = write!(self.stderr, "error:");
        let _ = self.stderr.reset();
        let _ = writeln!(self.stderr, " {:#}", err);
        let _ = self.stderr.flush();
    }
}

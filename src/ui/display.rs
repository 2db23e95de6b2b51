//! Console display for generated commands, prompts and results.
//!
//! Everything the user sees goes through [`Display`], which writes to a pair of
//! sinks (normally stdout and stderr). Prompts are flushed without a trailing
//! newline so the answer is typed on the same line. Labels are styled only on
//! sinks that are terminals; redirected output stays plain text.

use std::fmt;
use std::io::{self, IsTerminal, Stderr, Stdout, Write};

use crossterm::style::{ContentStyle, Stylize};

/// Prompt used for commands that matched a dangerous pattern.
pub const STRICT_PROMPT: &str = "Are you SURE you want to execute this? Type the full word [yes/no]: ";

/// Prompt used for every command before it runs.
pub const STANDARD_PROMPT: &str = "Execute? [Y/n]: ";

/// Notice printed whenever a command is not run.
pub const CANCELLED_NOTICE: &str = "Command execution cancelled.";

pub struct Display<W: Write = Stdout, E: Write = Stderr> {
    out: W,
    err: E,
    styled_out: bool,
    styled_err: bool,
}

impl Default for Display {
    fn default() -> Self {
        Self::new()
    }
}

impl Display {
    pub fn new() -> Self {
        let out = io::stdout();
        let err = io::stderr();
        let (styled_out, styled_err) = (out.is_terminal(), err.is_terminal());
        Self {
            out,
            err,
            styled_out,
            styled_err,
        }
    }
}

impl<W: Write, E: Write> Display<W, E> {
    /// Build a display over arbitrary sinks. Output is unstyled.
    pub fn with_writers(out: W, err: E) -> Self {
        Self {
            out,
            err,
            styled_out: false,
            styled_err: false,
        }
    }

    /// Turn label styling on or off for each sink.
    pub fn with_styling(mut self, out: bool, err: bool) -> Self {
        self.styled_out = out;
        self.styled_err = err;
        self
    }

    pub fn show_command(&mut self, command: &str) -> io::Result<()> {
        let label = paint("Command:", ContentStyle::new().bold(), self.styled_out);
        writeln!(self.out, "{} {}", label, command)?;
        self.out.flush()
    }

    /// Banner for a flagged command, followed by the strict prompt.
    pub fn show_danger_warning(&mut self, reason: &str) -> io::Result<()> {
        let label = paint("WARNING:", ContentStyle::new().red().bold(), self.styled_out);
        writeln!(self.out)?;
        writeln!(self.out, "⚠️  {} Dangerous command detected!", label)?;
        writeln!(self.out, "Reason: {}", reason)?;
        write!(self.out, "{}", STRICT_PROMPT)?;
        self.out.flush()
    }

    pub fn prompt_execute(&mut self) -> io::Result<()> {
        write!(self.out, "{}", STANDARD_PROMPT)?;
        self.out.flush()
    }

    pub fn show_cancelled(&mut self) -> io::Result<()> {
        writeln!(self.out, "{}", CANCELLED_NOTICE)?;
        self.out.flush()
    }

    /// Print the command's combined output byte for byte.
    pub fn show_output(&mut self, output: &[u8]) -> io::Result<()> {
        self.out.write_all(output)?;
        self.out.flush()
    }

    pub fn show_error(&mut self, error: &dyn fmt::Display) -> io::Result<()> {
        let label = paint("Error:", ContentStyle::new().red(), self.styled_err);
        writeln!(self.err, "{} {}", label, error)?;
        self.err.flush()
    }

    /// Consume the display and hand back its sinks.
    pub fn into_writers(self) -> (W, E) {
        (self.out, self.err)
    }
}

fn paint(label: &str, style: ContentStyle, styled: bool) -> String {
    if styled {
        style.apply(label).to_string()
    } else {
        label.to_string()
    }
}

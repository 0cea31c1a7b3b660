// Output formatting helpers for CLI commands
//
// Decorated status lines go to stderr so stdout carries only the case
// commands, their output, and the failure line.

use std::io::{self, Stderr, Stdout, Write};

/// Destination for command output: `out` carries commands and case
/// output, `err` carries decorations and child stderr.
pub struct Console<O: Write, E: Write> {
    out: O,
    err: E,
    quiet: bool,
}

impl Console<Stdout, Stderr> {
    /// Console writing to the process's stdout and stderr
    pub fn stdio(quiet: bool) -> Self {
        Console::new(io::stdout(), io::stderr(), quiet)
    }
}

impl<O: Write, E: Write> Console<O, E> {
    /// Create a console over two sinks; `quiet` drops decorated lines
    pub fn new(out: O, err: E, quiet: bool) -> Self {
        Self { out, err, quiet }
    }

    fn decorated(&mut self, line: std::fmt::Arguments<'_>) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        writeln!(self.err, "{}", line)?;
        self.err.flush()
    }

    /// Print a status message: "  Status message"
    pub fn status(&mut self, action: &str, message: &str) -> io::Result<()> {
        self.decorated(format_args!("\x1b[1;36m{:>12}\x1b[0m {}", action, message))
    }

    /// Print a success message with checkmark
    pub fn success(&mut self, message: &str) -> io::Result<()> {
        self.decorated(format_args!("\x1b[1;32m  \u{2713}\x1b[0m {}", message))
    }

    /// Print a failure message with X
    pub fn failure(&mut self, message: &str) -> io::Result<()> {
        self.decorated(format_args!("\x1b[1;31m  \u{2717}\x1b[0m {}", message))
    }

    /// Print a warning message
    pub fn warning(&mut self, message: &str) -> io::Result<()> {
        self.decorated(format_args!("\x1b[33m  !\x1b[0m {}", message))
    }

    /// Print an info message
    pub fn info(&mut self, message: &str) -> io::Result<()> {
        self.decorated(format_args!("\x1b[36m  i\x1b[0m {}", message))
    }

    /// Print a dim/muted message
    pub fn dim(&mut self, message: &str) -> io::Result<()> {
        self.decorated(format_args!("\x1b[2m{}\x1b[0m", message))
    }

    /// Print a header line
    pub fn header(&mut self, message: &str) -> io::Result<()> {
        self.decorated(format_args!("\x1b[1m==> {}\x1b[0m", message))
    }

    /// Print the command about to run, exactly as it will be executed
    pub fn case_command(&mut self, command: &str) -> io::Result<()> {
        writeln!(self.out, "{}", command)?;
        self.out.flush()
    }

    /// Print case output, keeping the stream it came from
    pub fn case_output(&mut self, line: &str, is_error: bool) -> io::Result<()> {
        if is_error {
            writeln!(self.err, "{}", line)?;
            self.err.flush()
        } else {
            writeln!(self.out, "{}", line)?;
            self.out.flush()
        }
    }

    /// Print the line identifying the case that ended the run
    pub fn regression_failed(&mut self, command: &str) -> io::Result<()> {
        writeln!(self.out, "Regression failed @ {}", command)?;
        self.out.flush()
    }
}

// Shorthands for the read-only commands, which always decorate

pub fn status(action: &str, message: &str) {
    let _ = Console::stdio(false).status(action, message);
}

pub fn warning(message: &str) {
    let _ = Console::stdio(false).warning(message);
}

pub fn info(message: &str) {
    let _ = Console::stdio(false).info(message);
}

pub fn dim(message: &str) {
    let _ = Console::stdio(false).dim(message);
}

pub fn header(message: &str) {
    let _ = Console::stdio(false).header(message);
}

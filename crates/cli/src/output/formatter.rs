//! Output formatter
//!
//! Ensures consistent output formatting across all commands. Results go to
//! stdout one per line; diagnostics go to stderr. Colour support is decided
//! separately for each stream.

use console::{Term, style};

use super::OutputConfig;

/// Formatter for CLI output
#[derive(Debug, Clone)]
pub struct Formatter {
    config: OutputConfig,
    stdout_colors: bool,
    stderr_colors: bool,
    #[cfg(test)]
    capture: Option<Captured>,
}

impl Formatter {
    /// Create a new formatter with the given configuration
    pub fn new(config: OutputConfig) -> Self {
        let enabled = |term: Term| {
            !config.no_color && (config.force_color || term.features().colors_supported())
        };
        Self {
            stdout_colors: enabled(Term::stdout()),
            stderr_colors: enabled(Term::stderr()),
            config,
            #[cfg(test)]
            capture: None,
        }
    }

    /// Check if quiet mode is enabled
    pub fn is_quiet(&self) -> bool {
        self.config.quiet
    }

    /// Check if colors are enabled for stdout and stderr
    pub fn colors_enabled(&self) -> (bool, bool) {
        (self.stdout_colors, self.stderr_colors)
    }

    /// Print a result line such as an object key
    ///
    /// Results are the point of the command and are printed even in quiet mode.
    pub fn result(&self, line: &str) {
        self.write_stdout(line);
    }

    /// Print a status line (respects quiet mode)
    pub fn println(&self, message: &str) {
        if self.config.quiet {
            return;
        }
        self.write_stdout(message);
    }

    /// Print a failure line on stdout that quiet mode does not suppress
    pub fn failure(&self, message: &str) {
        let line = style(message).red().force_styling(self.stdout_colors);
        self.write_stdout(&line.to_string());
    }

    /// Output an error message
    ///
    /// Errors are always printed, even in quiet mode.
    pub fn error(&self, message: &str) {
        let mark = style("✗").red().force_styling(self.stderr_colors);
        self.write_stderr(&format!("{mark} {message}"));
    }

    /// Output a warning message
    pub fn warning(&self, message: &str) {
        if self.config.quiet {
            return;
        }
        let mark = style("⚠").yellow().force_styling(self.stderr_colors);
        self.write_stderr(&format!("{mark} {message}"));
    }

    #[cfg(not(test))]
    fn write_stdout(&self, line: &str) {
        println!("{line}");
    }

    #[cfg(not(test))]
    fn write_stderr(&self, line: &str) {
        eprintln!("{line}");
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new(OutputConfig::default())
    }
}

/// Lines written by a capturing [`Formatter`]
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct Captured {
    stdout: std::sync::Arc<std::sync::Mutex<Vec<String>>>,
    stderr: std::sync::Arc<std::sync::Mutex<Vec<String>>>,
}

#[cfg(test)]
impl Captured {
    pub fn stdout(&self) -> Vec<String> {
        self.stdout.lock().unwrap().clone()
    }

    pub fn stderr(&self) -> Vec<String> {
        self.stderr.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl Formatter {
    /// Formatter that records lines instead of printing them, without colour
    pub fn capturing(config: OutputConfig) -> (Self, Captured) {
        let captured = Captured::default();
        let formatter = Self {
            config,
            stdout_colors: false,
            stderr_colors: false,
            capture: Some(captured.clone()),
        };
        (formatter, captured)
    }

    fn write_stdout(&self, line: &str) {
        match &self.capture {
            Some(captured) => captured.stdout.lock().unwrap().push(line.to_string()),
            None => println!("{line}"),
        }
    }

    fn write_stderr(&self, line: &str) {
        match &self.capture {
            Some(captured) => captured.stderr.lock().unwrap().push(line.to_string()),
            None => eprintln!("{line}"),
        }
    }
}

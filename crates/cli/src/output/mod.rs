//! Output formatting utilities
//!
//! Line-oriented stdout output, stderr diagnostics, and an upload spinner.

mod formatter;
mod progress;

#[cfg(test)]
pub use formatter::Captured;
pub use formatter::Formatter;
pub use progress::ProgressBar;

/// Output configuration derived from CLI flags and the config file
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    /// Disable colored output
    pub no_color: bool,
    /// Emit colors even when not writing to a terminal
    pub force_color: bool,
    /// Disable progress spinner
    pub no_progress: bool,
    /// Suppress status lines and warnings; results still print
    pub quiet: bool,
}

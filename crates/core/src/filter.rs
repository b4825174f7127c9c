//! Key filtering
//!
//! A [`KeyFilter`] wraps a compiled regular expression and tests object keys
//! with search semantics: the pattern may match anywhere in the key. Anchors
//! must be written explicitly (`^`, `$`) when a full-key match is wanted.

use std::fmt;
use std::str::FromStr;

use regex::Regex;

use crate::error::{Error, Result};

/// Compiled key pattern
#[derive(Debug, Clone)]
pub struct KeyFilter {
    regex: Regex,
}

impl KeyFilter {
    /// Compile a pattern, failing with [`Error::InvalidPattern`] on bad syntax
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|e| Error::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason_line(&e.to_string()),
        })?;
        Ok(Self { regex })
    }

    /// Returns true if the pattern is found anywhere in `key`
    pub fn matches(&self, key: &str) -> bool {
        self.regex.is_match(key)
    }

    /// The source pattern
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

impl FromStr for KeyFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl fmt::Display for KeyFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// regex renders syntax errors over several lines with a caret diagram; the
// last line carries the actual reason.
fn reason_line(message: &str) -> String {
    message
        .lines()
        .rev()
        .find(|l| l.trim_start().starts_with("error:"))
        .map(|l| l.trim_start().trim_start_matches("error:").trim().to_string())
        .unwrap_or_else(|| message.trim().to_string())
}

//! `user.js` preference lines.
//!
//! ```text
//! // Load unsigned extensions
//! user_pref("xpinstall.signatures.required", false);
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

// ============================================================================
// PrefValue
// ============================================================================

/// A preference value: boolean, integer or string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrefValue {
    /// `true` / `false`.
    Bool(bool),
    /// Integer literal.
    Int(i32),
    /// Quoted, escaped string.
    Str(String),
}

impl fmt::Display for PrefValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Str(s) => {
                f.write_str("\"")?;
                for c in s.chars() {
                    match c {
                        '\\' => f.write_str("\\\\")?,
                        '"' => f.write_str("\\\"")?,
                        '\n' => f.write_str("\\n")?,
                        '\r' => f.write_str("\\r")?,
                        '\t' => f.write_str("\\t")?,
                        other => write!(f, "{other}")?,
                    }
                }
                f.write_str("\"")
            }
        }
    }
}

impl From<bool> for PrefValue {
    #[inline]
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for PrefValue {
    #[inline]
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for PrefValue {
    #[inline]
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

// ============================================================================
// Pref
// ============================================================================

/// One `user_pref(...)` entry, optionally preceded by a comment line.
#[derive(Debug, Clone)]
pub struct Pref {
    /// Preference name, e.g. `browser.startup.page`.
    pub key: &'static str,
    /// Preference value.
    pub value: PrefValue,
    /// Comment written above the line.
    pub comment: Option<&'static str>,
}

impl Pref {
    /// Creates a preference without a comment.
    #[must_use]
    pub fn new(key: &'static str, value: impl Into<PrefValue>) -> Self {
        Self {
            key,
            value: value.into(),
            comment: None,
        }
    }

    /// Attaches a comment.
    #[must_use]
    pub fn note(mut self, comment: &'static str) -> Self {
        self.comment = Some(comment);
        self
    }
}

impl fmt::Display for Pref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(comment) = self.comment {
            writeln!(f, "// {comment}")?;
        }
        write!(f, "user_pref(\"{}\", {});", self.key, self.value)
    }
}

// ============================================================================
// Tests
// ============================================================================

//! Diagnostics module for chart parse problems
//!
//! Parsing never aborts: every malformed field or misplaced command is
//! recorded here as a line-tagged message and parsing continues with a
//! default value. The host decides how severe each message is and shows
//! the list next to a line-numbered view of the source.

use serde::{Deserialize, Serialize};

/// A problem found at a specific source line
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// Zero-based line index in the source text
    pub line: usize,
    /// Human-readable message
    pub message: String,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self { line, message: message.into() }
    }
}

/// Ordered collection of diagnostics for one parse
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Diagnostics {
    /// All diagnostics in the order they were found
    pub items: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create empty diagnostics
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Record a message for `line`
    pub fn push(&mut self, line: usize, message: impl Into<String>) {
        let diagnostic = Diagnostic::new(line, message);
        log::debug!("line {}: {}", diagnostic.line, diagnostic.message);
        self.items.push(diagnostic);
    }

    /// Extend with multiple diagnostics
    pub fn extend(&mut self, items: impl IntoIterator<Item = Diagnostic>) {
        self.items.extend(items);
    }

    /// Check if there are any diagnostics
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.items.iter()
    }

    /// Diagnostics reported for one line
    pub fn for_line(&self, line: usize) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter().filter(move |d| d.line == line)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

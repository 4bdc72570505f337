//! Shared types used across Jade crates.
//!
//! Jade analyzes one Java compilation unit at a time and reports findings as
//! [`Diagnostic`]s; quick fixes are expressed as [`CodeActionProposal`]s made
//! of plain text edits. Everything here is byte-offset based; conversion to
//! LSP line/character positions happens at the `jade-ide` boundary.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A byte-span into a source string.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    /// True when the two spans share at least one byte, treating zero-length
    /// spans as points (cursor positions from LSP requests).
    pub fn intersects(&self, other: Span) -> bool {
        if self.is_empty() {
            return other.start <= self.start && self.start <= other.end;
        }
        if other.is_empty() {
            return self.start <= other.start && other.start <= self.end;
        }
        self.start < other.end && other.start < self.end
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Span({}..{})", self.start, self.end)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
    Info,
    Hint,
}

/// An immutable analysis finding.
///
/// `source` names the rule set that fired (e.g. `"jakarta-bean-validation"`),
/// `code` identifies the exact rule. `data` is an opaque payload carried to
/// the quick-fix stage; for annotation rules it holds the offending
/// annotation's fully-qualified name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: &'static str,
    pub source: &'static str,
    pub message: String,
    pub span: Option<Span>,
    pub data: Option<String>,
}

impl Diagnostic {
    pub fn error(code: &'static str, message: impl Into<String>, span: Option<Span>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            source: "",
            message: message.into(),
            span,
            data: None,
        }
    }

    pub fn warning(code: &'static str, message: impl Into<String>, span: Option<Span>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            source: "",
            message: message.into(),
            span,
            data: None,
        }
    }

    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }

    pub fn with_source(mut self, source: &'static str) -> Self {
        self.source = source;
        self
    }
}

/// A single replacement within one file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextEdit {
    pub span: Span,
    pub new_text: String,
}

impl TextEdit {
    pub fn replace(span: Span, new_text: impl Into<String>) -> Self {
        Self {
            span,
            new_text: new_text.into(),
        }
    }

    pub fn insert(offset: usize, new_text: impl Into<String>) -> Self {
        Self::replace(Span::new(offset, offset), new_text)
    }

    pub fn delete(span: Span) -> Self {
        Self::replace(span, "")
    }
}

/// A candidate fix for one diagnostic.
///
/// Applying every edit of one proposal must leave the file in a state where
/// the triggering diagnostic no longer fires; alternatives for the same
/// diagnostic are separate proposals.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeActionProposal {
    pub title: String,
    pub edits: Vec<TextEdit>,
    /// The diagnostic code this proposal resolves.
    pub resolves: &'static str,
}

impl CodeActionProposal {
    pub fn new(title: impl Into<String>, edits: Vec<TextEdit>, resolves: &'static str) -> Self {
        Self {
            title: title.into(),
            edits,
            resolves,
        }
    }
}

/// Apply a set of edits to `source`, returning the edited text.
///
/// Edits are applied back-to-front so earlier spans stay valid; overlapping
/// edits are a caller bug and the later-starting edit wins.
pub fn apply_edits(source: &str, edits: &[TextEdit]) -> String {
    let mut sorted: Vec<&TextEdit> = edits.iter().collect();
    sorted.sort_by_key(|e| (e.span.start, e.span.end));

    let mut out = source.to_string();
    for edit in sorted.into_iter().rev() {
        let start = edit.span.start.min(out.len());
        let end = edit.span.end.clamp(start, out.len());
        out.replace_range(start..end, &edit.new_text);
    }
    out
}

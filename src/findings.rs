//! Finding types for theme analysis results.
//!
//! A [`Finding`] is one reported issue: where it is, how bad it is, which
//! rule family produced it, and (when the rule knows one) a suggested
//! replacement. Findings are immutable once created; a rescan of a file
//! replaces that file's findings wholesale.

use std::{cmp::Ordering, fmt};

/// Severity level of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// Rule family identifier, stable across releases so callers can filter
/// and group findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Security,
    Escaping,
    Deprecated,
    TextDomain,
    PluginTerritory,
    Cdn,
    Enqueue,
    BestPractices,
    Licensing,
    Required,
    Recommended,
    I18n,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Security => write!(f, "security"),
            Category::Escaping => write!(f, "escaping"),
            Category::Deprecated => write!(f, "deprecated"),
            Category::TextDomain => write!(f, "text-domain"),
            Category::PluginTerritory => write!(f, "plugin-territory"),
            Category::Cdn => write!(f, "cdn"),
            Category::Enqueue => write!(f, "enqueue"),
            Category::BestPractices => write!(f, "best-practices"),
            Category::Licensing => write!(f, "licensing"),
            Category::Required => write!(f, "required"),
            Category::Recommended => write!(f, "recommended"),
            Category::I18n => write!(f, "i18n"),
        }
    }
}

/// Position of a finding inside the theme.
///
/// Lines are 0-based; a document with `n` lines is indexed `0..n`. The
/// column range is a half-open byte span `[col_start, col_end)` that exactly
/// covers the matched text. Theme-wide findings are anchored at `0:0..0` of
/// their home file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub file_path: String,
    pub line: usize,
    pub col_start: usize,
    pub col_end: usize,
}

impl Location {
    pub fn new(file_path: impl Into<String>, line: usize, col_start: usize, col_end: usize) -> Self {
        Self {
            file_path: file_path.into(),
            line,
            col_start,
            col_end,
        }
    }

    /// Anchor for theme-wide findings: the very start of the file.
    pub fn file_start(file_path: impl Into<String>) -> Self {
        Self::new(file_path, 0, 0, 0)
    }
}

/// One reported issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub location: Location,
    pub message: String,
    pub severity: Severity,
    pub category: Category,
    /// Suggested replacement for the matched construct, when the rule has one.
    pub replacement: Option<String>,
    /// The full source line, kept for caret display in reports. Absent for
    /// theme-wide findings.
    pub source_line: Option<String>,
}

impl Finding {
    pub fn new(
        location: Location,
        message: impl Into<String>,
        severity: Severity,
        category: Category,
    ) -> Self {
        Self {
            location,
            message: message.into(),
            severity,
            category,
            replacement: None,
            source_line: None,
        }
    }

    pub fn with_replacement(mut self, replacement: Option<&str>) -> Self {
        self.replacement = replacement.map(str::to_string);
        self
    }

    pub fn with_source_line(mut self, line: &str) -> Self {
        self.source_line = Some(line.to_string());
        self
    }
}

impl Ord for Finding {
    fn cmp(&self, other: &Self) -> Ordering {
        // Sort by: file_path, line, col, message
        //
        // The message comparison matters for deterministic ordering: several
        // theme-wide findings share the same file-start anchor, and report
        // output must not depend on synthesis order alone.
        self.location
            .file_path
            .cmp(&other.location.file_path)
            .then_with(|| self.location.line.cmp(&other.location.line))
            .then_with(|| self.location.col_start.cmp(&other.location.col_start))
            .then_with(|| self.message.cmp(&other.message))
    }
}

impl PartialOrd for Finding {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

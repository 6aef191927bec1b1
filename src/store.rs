//! The diagnostic store: findings keyed by file.
//!
//! The store is the single shared mutable collection of the checker. All
//! mutation goes through its operations; findings themselves are never
//! mutated after creation. A `BTreeMap` keeps iteration order deterministic
//! so reports and tests never depend on hash order.

use std::collections::BTreeMap;

use crate::findings::{Finding, Severity};

#[derive(Debug, Default)]
pub struct DiagnosticStore {
    entries: BTreeMap<String, Vec<Finding>>,
}

impl DiagnosticStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace a file's findings with the output of a fresh scan.
    ///
    /// Replacing discards anything previously attached to the file,
    /// including theme-wide findings appended by a corpus scan; those come
    /// back on the next full scan.
    pub fn set_for_file(&mut self, file: &str, findings: Vec<Finding>) {
        self.entries.insert(file.to_string(), findings);
    }

    /// Append findings to a file's entry, keeping what is already there.
    /// Used to attach theme-wide findings without dropping the home file's
    /// own local findings.
    pub fn append_for_file(&mut self, file: &str, findings: Vec<Finding>) {
        self.entries.entry(file.to_string()).or_default().extend(findings);
    }

    pub fn clear_file(&mut self, file: &str) {
        self.entries.remove(file);
    }

    pub fn clear_all(&mut self) {
        self.entries.clear();
    }

    /// A file's current findings; empty if the file has no entry.
    pub fn get_for_file(&self, file: &str) -> &[Finding] {
        self.entries.get(file).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains_file(&self, file: &str) -> bool {
        self.entries.contains_key(file)
    }

    /// Visit every entry in file order. Observes whatever has been
    /// committed so far; callers iterating during an in-progress corpus
    /// scan see a consistent-enough snapshot, not a transactional one.
    pub fn for_each(&self, mut f: impl FnMut(&str, &[Finding])) {
        for (file, findings) in &self.entries {
            f(file, findings);
        }
    }

    /// Number of files with an entry.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_findings(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn count_by_severity(&self, severity: Severity) -> usize {
        self.entries
            .values()
            .flatten()
            .filter(|f| f.severity == severity)
            .count()
    }

    /// All findings across all files, flattened in file order.
    pub fn all_findings(&self) -> Vec<Finding> {
        self.entries.values().flatten().cloned().collect()
    }
}

//! Per-file rule evaluation.
//!
//! The scanner is pure computation over in-memory text: it splits a file
//! into lines and evaluates every local rule against every line, producing
//! one finding per non-overlapping match. Rules are evaluated in catalog
//! order, then line order, then match order, so repeated scans of the same
//! text yield byte-identical finding lists. Rules never suppress one
//! another; one line can trigger several unrelated rules.

use std::collections::HashSet;

use crate::catalog::{Catalog, CompiledRule};
use crate::findings::{Category, Finding, Location};

/// Scan one file's text against every local rule.
pub fn scan_file(catalog: &Catalog, file_path: &str, text: &str) -> Vec<Finding> {
    scan_file_filtered(catalog, file_path, text, None)
}

/// Scan one file's text against the local rules in the given categories
/// (all of them when `categories` is `None`).
pub fn scan_file_filtered(
    catalog: &Catalog,
    file_path: &str,
    text: &str,
    categories: Option<&HashSet<Category>>,
) -> Vec<Finding> {
    let mut findings = Vec::new();

    for rule in catalog.local_rules() {
        if let Some(selected) = categories {
            if !selected.contains(&rule.category) {
                continue;
            }
        }
        for (line_idx, line) in text.lines().enumerate() {
            scan_line(rule, file_path, line_idx, line, &mut findings);
        }
    }

    findings
}

/// All non-overlapping matches of one rule within one line.
fn scan_line(
    rule: &CompiledRule,
    file_path: &str,
    line_idx: usize,
    line: &str,
    findings: &mut Vec<Finding>,
) {
    for m in rule.regex.find_iter(line) {
        // An empty match carries no span to report; skip the occurrence
        // rather than aborting the rule.
        if m.start() == m.end() {
            continue;
        }

        let preceding = line[..m.start()].chars().next_back();
        if !rule.guard.allows(preceding) {
            continue;
        }
        if !rule.follow.allows(&line[m.end()..]) {
            continue;
        }

        findings.push(
            Finding::new(
                Location::new(file_path, line_idx, m.start(), m.end()),
                rule.message,
                rule.severity,
                rule.category,
            )
            .with_replacement(rule.replacement)
            .with_source_line(line),
        );
    }
}

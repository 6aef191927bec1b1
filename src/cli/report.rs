//! Report formatting and printing utilities.
//!
//! Findings are displayed in cargo-style format: a severity line, a
//! clickable location, the offending source line with a caret span, and an
//! optional note carrying the suggested replacement. Kept separate from the
//! core so themelint can be used as a library.

use std::io::{self, Write};

use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use super::commands::{CommandResult, CommandSummary, InitSummary};
use crate::config::CONFIG_FILE_NAME;
use crate::findings::{Finding, Severity};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Print findings in cargo-style format to stdout.
pub fn report(findings: &[Finding]) {
    report_to(findings, &mut io::stdout().lock());
}

/// Print findings to a custom writer.
///
/// Useful for testing or redirecting output.
pub fn report_to<W: Write>(findings: &[Finding], writer: &mut W) {
    if findings.is_empty() {
        return;
    }

    let mut sorted = findings.to_vec();
    sorted.sort();

    // Calculate max line number width for alignment
    let max_line_width = calculate_max_line_width(&sorted);

    for finding in &sorted {
        print_finding(finding, writer, max_line_width);
    }

    print_summary(&sorted, writer);
}

/// Print a success message when no findings are reported.
pub fn print_success(files_checked: usize) {
    print_success_to(files_checked, &mut io::stdout().lock());
}

/// Print a success message to a custom writer.
pub fn print_success_to<W: Write>(files_checked: usize, writer: &mut W) {
    let msg = format!(
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "Checked {} theme {} - no issues found",
            files_checked,
            if files_checked == 1 { "file" } else { "files" }
        )
        .green()
    );
    let _ = writeln!(writer, "{}", msg);
}

/// Print a warning about files that could not be read.
pub fn print_read_warning(count: usize, verbose: bool) {
    print_read_warning_to(count, verbose, &mut io::stderr().lock());
}

/// Print a read warning to a custom writer.
pub fn print_read_warning_to<W: Write>(count: usize, verbose: bool, writer: &mut W) {
    if count > 0 && !verbose {
        let _ = writeln!(
            writer,
            "{} {} file(s) could not be read (use {} for details)",
            "warning:".bold().yellow(),
            count,
            "-v".cyan()
        );
    }
}

// ============================================================
// Internal Functions
// ============================================================

fn print_finding<W: Write>(finding: &Finding, writer: &mut W, max_line_width: usize) {
    let severity_str = match finding.severity {
        Severity::Error => "error".bold().red(),
        Severity::Warning => "warning".bold().yellow(),
        Severity::Info => "info".bold().cyan(),
    };

    let _ = writeln!(
        writer,
        "{}: {}  {}",
        severity_str,
        finding.message,
        finding.category.to_string().dimmed().cyan()
    );

    // Clickable location: --> path:line:col (1-based for display)
    let line = finding.location.line + 1;
    let col = finding.location.col_start + 1;
    let _ = writeln!(
        writer,
        "  {} {}:{}:{}",
        "-->".blue(),
        finding.location.file_path,
        line,
        col
    );

    // Print source context if available
    if let Some(source_line) = &finding.source_line {
        let span = source_line
            .get(finding.location.col_start..finding.location.col_end)
            .unwrap_or("");
        let caret_count = UnicodeWidthStr::width(span).max(1);
        let carets = "^".repeat(caret_count);
        let carets = match finding.severity {
            Severity::Error => carets.red(),
            Severity::Warning => carets.yellow(),
            Severity::Info => carets.cyan(),
        };

        let _ = writeln!(
            writer,
            "{:>width$} {}",
            "",
            "|".blue(),
            width = max_line_width
        );
        let _ = writeln!(
            writer,
            "{:>width$} {} {}",
            line.to_string().blue(),
            "|".blue(),
            source_line,
            width = max_line_width
        );

        let prefix = source_line
            .get(..finding.location.col_start)
            .unwrap_or("");
        let caret_padding = UnicodeWidthStr::width(prefix);
        let _ = writeln!(
            writer,
            "{:>width$} {} {:>padding$}{}",
            "",
            "|".blue(),
            "",
            carets,
            width = max_line_width,
            padding = caret_padding
        );
    }

    // Suggested replacement, cargo-style note
    if let Some(replacement) = &finding.replacement {
        let _ = writeln!(
            writer,
            "{:>width$} {} {} suggested replacement: {}",
            "",
            "=".blue(),
            "note:".bold(),
            replacement,
            width = max_line_width
        );
    }

    let _ = writeln!(writer); // Empty line between findings
}

fn print_summary<W: Write>(findings: &[Finding], writer: &mut W) {
    let total_errors = findings
        .iter()
        .filter(|f| f.severity == Severity::Error)
        .count();
    let total_warnings = findings
        .iter()
        .filter(|f| f.severity == Severity::Warning)
        .count();
    let total_infos = findings
        .iter()
        .filter(|f| f.severity == Severity::Info)
        .count();
    let total_problems = total_errors + total_warnings + total_infos;

    if total_problems > 0 {
        let _ = writeln!(
            writer,
            "\n{} {} problems ({} {}, {} {}, {} {})",
            FAILURE_MARK.red(),
            total_problems,
            total_errors,
            if total_errors == 1 { "error" } else { "errors" }.red(),
            total_warnings,
            if total_warnings == 1 {
                "warning"
            } else {
                "warnings"
            }
            .yellow(),
            total_infos,
            if total_infos == 1 { "info" } else { "infos" }.cyan()
        );
    }
}

fn calculate_max_line_width(findings: &[Finding]) -> usize {
    findings
        .iter()
        .filter(|f| f.source_line.is_some())
        .map(|f| f.location.line + 1)
        .max()
        .map(|n| n.to_string().len())
        .unwrap_or(1)
}

pub fn print(result: &CommandResult, verbose: bool) {
    match &result.summary {
        CommandSummary::Check => {
            report(&result.findings);
            if result.findings.is_empty() {
                print_success(result.files_checked);
            }
            print_read_warning(result.read_failures, verbose);
        }
        CommandSummary::Init(summary) => {
            print_init(summary);
        }
    }
}

fn print_init(summary: &InitSummary) {
    if summary.created {
        println!(
            "{} {}",
            SUCCESS_MARK.green(),
            format!("Created {}", CONFIG_FILE_NAME).green()
        );
    }
}

// ============================================================
// Tests
// ============================================================

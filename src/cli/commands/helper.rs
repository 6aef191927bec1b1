use super::{CommandResult, CommandSummary};
use crate::findings::{Finding, Severity};

pub fn finish(
    summary: CommandSummary,
    mut findings: Vec<Finding>,
    files_checked: usize,
    read_failures: usize,
    exit_on_errors: bool,
) -> CommandResult {
    findings.sort();

    let error_count = findings
        .iter()
        .filter(|f| f.severity == Severity::Error)
        .count();

    CommandResult {
        summary,
        findings,
        error_count,
        exit_on_errors,
        files_checked,
        read_failures,
    }
}

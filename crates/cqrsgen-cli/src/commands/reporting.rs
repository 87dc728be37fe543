use std::process::ExitCode;

use colored::Colorize;
use cqrsgen_decl::{Diagnostic, Severity};

/// Applies `--deny-warnings`: every diagnostic is reported as an error.
pub(crate) fn apply_deny_warnings(
    diagnostics: &[Diagnostic],
    deny_warnings: bool,
) -> Vec<Diagnostic> {
    diagnostics
        .iter()
        .cloned()
        .map(|d| if deny_warnings { d.escalate() } else { d })
        .collect()
}

/// Whether any diagnostic is reported at error severity.
pub(crate) fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(|d| d.severity == Severity::Error)
}

/// Exit code after a run that loaded its inputs successfully.
pub(crate) fn exit_code(diagnostics: &[Diagnostic]) -> ExitCode {
    if has_errors(diagnostics) {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}

/// Print extension point diagnostics, errors in red and warnings in yellow.
pub(crate) fn print_diagnostics(diagnostics: &[Diagnostic]) {
    if diagnostics.is_empty() {
        return;
    }

    println!("\n{}", "Diagnostics:".bold());
    for diagnostic in diagnostics {
        let marker = match diagnostic.severity {
            Severity::Error => "x".red(),
            Severity::Warning => "!".yellow(),
        };
        let location = diagnostic
            .location
            .as_ref()
            .map(|l| format!(" at {}", l))
            .unwrap_or_default();
        println!(
            "  {} [{}] {}{}",
            marker,
            diagnostic.code,
            diagnostic.method,
            location.dimmed()
        );
        println!("      {}", diagnostic.message);
    }
}

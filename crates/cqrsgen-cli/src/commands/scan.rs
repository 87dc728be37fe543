//! Scan command implementation
//!
//! Lists the handler registrations a snapshot would produce.

use anyhow::{Context, Result};
use colored::Colorize;
use cqrsgen_decl::scan_types;
use std::path::Path;
use std::process::ExitCode;

use super::json_output::{input_error_to_json, print_json, JsonStub, ScanOutput};
use crate::input::{load_declarations, LoadResult};

/// Run the scan command
///
/// # Arguments
/// * `decls_path` - Path to the declaration snapshot
/// * `json_output` - Whether to output machine-readable JSON
///
/// # Returns
/// Exit code: 0 when the snapshot loads, 1 otherwise
pub fn run(decls_path: &str, json_output: bool) -> Result<ExitCode> {
    if json_output {
        run_json(decls_path)
    } else {
        run_human(decls_path)
    }
}

fn run_human(decls_path: &str) -> Result<ExitCode> {
    println!("{} {}", "Scanning:".cyan().bold(), decls_path);

    let LoadResult { decls, source_hash } = load_declarations(Path::new(decls_path))
        .with_context(|| format!("Failed to load declarations: {}", decls_path))?;
    println!("{} json ({})", "Source:".dimmed(), &source_hash[..16]);

    let stubs = scan_types(&decls.types);
    if stubs.is_empty() {
        println!(
            "\n{} No handler implementations among {} type(s)",
            "EMPTY".yellow().bold(),
            decls.types.len()
        );
        return Ok(ExitCode::SUCCESS);
    }

    println!("\n{}", "Handlers:".bold());
    for stub in &stubs {
        println!(
            "  {} {} {} {}",
            "+".green(),
            stub.service_type(),
            "->".dimmed(),
            stub.implementation
        );
    }

    println!(
        "\n{} {} registration(s) from {} type(s)",
        "FOUND".green().bold(),
        stubs.len(),
        decls.types.len()
    );

    Ok(ExitCode::SUCCESS)
}

fn run_json(decls_path: &str) -> Result<ExitCode> {
    let LoadResult { decls, source_hash } = match load_declarations(Path::new(decls_path)) {
        Ok(result) => result,
        Err(e) => {
            let error = input_error_to_json(&e, decls_path);
            print_json(&ScanOutput::failure(vec![error]))?;
            return Ok(ExitCode::from(1));
        }
    };

    let output = ScanOutput {
        success: true,
        errors: Vec::new(),
        stubs: scan_types(&decls.types)
            .iter()
            .map(JsonStub::from)
            .collect(),
        source_hash: Some(source_hash),
    };
    print_json(&output)?;

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_missing_snapshot() {
        assert!(run("/nonexistent/decls.json", false).is_err());
        // JSON mode reports the failure in the document instead.
        assert!(run("/nonexistent/decls.json", true).is_ok());
    }
}

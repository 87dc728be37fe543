//! Generate command implementation
//!
//! Runs a full pass over a declaration snapshot and writes the unit.

use anyhow::{bail, Context, Result};
use colored::Colorize;
use cqrsgen_csharp::{OutputUnit, PassOutcome};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use super::json_output::{
    error_codes, input_error_to_json, print_json, GenerateOutput, JsonDiagnostic, JsonError,
    JsonStub, JsonUnit,
};
use super::reporting;
use crate::input::{load_declarations, ConfigSources, LoadResult};

/// Options for one `generate` invocation.
#[derive(Debug, Clone)]
pub struct GenerateArgs<'a> {
    /// Path to the declaration snapshot (JSON)
    pub decls_path: &'a str,
    /// Directory the unit is written into
    pub out_dir: &'a str,
    /// Optional local settings file (TOML)
    pub settings: Option<&'a str>,
    /// Build-wide `NAME=VALUE` overrides
    pub properties: &'a [(String, String)],
    /// Report diagnostics as errors and fail the run
    pub deny_warnings: bool,
}

/// Run the generate command
///
/// # Returns
/// Exit code: 0 on success, 1 on input errors or denied warnings
pub fn run(args: &GenerateArgs<'_>, json_output: bool) -> Result<ExitCode> {
    if json_output {
        run_json(args)
    } else {
        run_human(args)
    }
}

/// Loads inputs and runs the pass.
fn run_pass(args: &GenerateArgs<'_>) -> Result<(PassOutcome, String)> {
    let LoadResult { decls, source_hash } = load_declarations(Path::new(args.decls_path))
        .with_context(|| format!("Failed to load declarations: {}", args.decls_path))?;

    let sources = ConfigSources::assemble(
        Some(&decls.options),
        args.settings.map(Path::new),
        args.properties,
    )?;

    let outcome = cqrsgen_csharp::generate(&decls, &sources.build, &sources.local)?;
    Ok((outcome, source_hash))
}

/// Writes `unit` into `out_dir`, creating the directory if needed.
///
/// The hint name must be a bare file name; anything that would resolve
/// outside `out_dir` is refused.
pub fn write_unit(out_dir: &Path, unit: &OutputUnit) -> Result<PathBuf> {
    if unit.hint_name.contains(['/', '\\']) || Path::new(&unit.hint_name).is_absolute() {
        bail!(
            "Refusing to write unit outside the output directory: {}",
            unit.hint_name
        );
    }

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory: {}", out_dir.display()))?;
    let path = out_dir.join(&unit.hint_name);
    std::fs::write(&path, &unit.source)
        .with_context(|| format!("Failed to write generated unit: {}", path.display()))?;
    Ok(path)
}

/// Run generate with human-readable (colored) output
fn run_human(args: &GenerateArgs<'_>) -> Result<ExitCode> {
    let start = Instant::now();

    println!("{} {}", "Generating:".cyan().bold(), args.decls_path);

    let (outcome, source_hash) = run_pass(args)?;

    println!("{} json ({})", "Source:".dimmed(), &source_hash[..16]);
    println!(
        "{} {} handler registration(s)",
        "Found:".dimmed(),
        outcome.stubs.len()
    );

    let diagnostics = reporting::apply_deny_warnings(outcome.diagnostics(), args.deny_warnings);
    reporting::print_diagnostics(&diagnostics);

    let duration_ms = start.elapsed().as_millis() as u64;

    match &outcome.unit {
        Some(unit) => {
            let path = write_unit(Path::new(args.out_dir), unit)?;
            println!(
                "\n{} Wrote {} unit to {} ({}ms)",
                "SUCCESS".green().bold(),
                unit.kind.as_str(),
                path.display(),
                duration_ms
            );
        }
        None => {
            println!(
                "\n{} No handler implementations found; nothing to generate ({}ms)",
                "SKIPPED".yellow().bold(),
                duration_ms
            );
        }
    }

    if reporting::has_errors(&diagnostics) {
        println!(
            "{} {} extension point(s) rejected",
            "FAILED".red().bold(),
            diagnostics.len()
        );
    }

    Ok(reporting::exit_code(&diagnostics))
}

/// Run generate with machine-readable JSON output
fn run_json(args: &GenerateArgs<'_>) -> Result<ExitCode> {
    let load_result = load_declarations(Path::new(args.decls_path));
    let LoadResult { decls, source_hash } = match load_result {
        Ok(result) => result,
        Err(e) => {
            let error = input_error_to_json(&e, args.decls_path);
            print_json(&GenerateOutput::failure(vec![error], None))?;
            return Ok(ExitCode::from(1));
        }
    };

    let sources = match ConfigSources::assemble(
        Some(&decls.options),
        args.settings.map(Path::new),
        args.properties,
    ) {
        Ok(sources) => sources,
        Err(e) => {
            let error = input_error_to_json(&e, args.settings.unwrap_or_default());
            print_json(&GenerateOutput::failure(vec![error], Some(source_hash)))?;
            return Ok(ExitCode::from(1));
        }
    };

    let generated = cqrsgen_csharp::generate(&decls, &sources.build, &sources.local)
        .map_err(anyhow::Error::from)
        .and_then(|outcome| {
            let written = match &outcome.unit {
                Some(unit) => {
                    let path = write_unit(Path::new(args.out_dir), unit)?;
                    Some(JsonUnit::new(unit, path.display().to_string()))
                }
                None => None,
            };
            Ok((outcome, written))
        });

    let (outcome, unit) = match generated {
        Ok(result) => result,
        Err(e) => {
            let error = JsonError::new(error_codes::GENERATION_ERROR, format!("{:#}", e));
            print_json(&GenerateOutput::failure(vec![error], Some(source_hash)))?;
            return Ok(ExitCode::from(1));
        }
    };

    let diagnostics = reporting::apply_deny_warnings(outcome.diagnostics(), args.deny_warnings);
    let output = GenerateOutput {
        success: !reporting::has_errors(&diagnostics),
        errors: Vec::new(),
        diagnostics: diagnostics.iter().map(JsonDiagnostic::from).collect(),
        stubs: outcome.stubs.iter().map(JsonStub::from).collect(),
        unit,
        source_hash: Some(source_hash),
    };
    print_json(&output)?;

    Ok(reporting::exit_code(&diagnostics))
}

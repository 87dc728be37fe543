//! Validate command implementation
//!
//! Runs only the extension point rule chain. Unlike `generate`, it reports on
//! marked methods even when the snapshot contains no handlers.

use anyhow::{Context, Result};
use colored::Colorize;
use cqrsgen_decl::{resolve_validator_options, validate_extension_points, ValidationReport};
use std::path::Path;
use std::process::ExitCode;

use super::json_output::{input_error_to_json, print_json, JsonDiagnostic, ValidateOutput};
use super::reporting;
use crate::input::{load_declarations, ConfigSources, InputError, LoadResult};

fn load_and_validate(
    decls_path: &str,
    settings: Option<&str>,
    properties: &[(String, String)],
) -> Result<(ValidationReport, String), InputError> {
    let LoadResult { decls, source_hash } = load_declarations(Path::new(decls_path))?;
    let sources =
        ConfigSources::assemble(Some(&decls.options), settings.map(Path::new), properties)?;
    let options = resolve_validator_options(&sources.build, &sources.local);
    tracing::debug!(
        require_static = options.require_static,
        parameter_names = %options.parameter_names,
        "validator options"
    );
    Ok((
        validate_extension_points(&decls.methods, &options),
        source_hash,
    ))
}

/// Run the validate command
///
/// # Arguments
/// * `decls_path` - Path to the declaration snapshot
/// * `settings` - Optional local settings file
/// * `properties` - Build-wide `NAME=VALUE` overrides
/// * `deny_warnings` - Fail when any extension point is rejected
/// * `json_output` - Whether to output machine-readable JSON
///
/// # Returns
/// Exit code: 0 if every marked method is valid (or warnings are allowed), 1 otherwise
pub fn run(
    decls_path: &str,
    settings: Option<&str>,
    properties: &[(String, String)],
    deny_warnings: bool,
    json_output: bool,
) -> Result<ExitCode> {
    if json_output {
        run_json(decls_path, settings, properties, deny_warnings)
    } else {
        run_human(decls_path, settings, properties, deny_warnings)
    }
}

/// Run validate with human-readable (colored) output
fn run_human(
    decls_path: &str,
    settings: Option<&str>,
    properties: &[(String, String)],
    deny_warnings: bool,
) -> Result<ExitCode> {
    println!("{} {}", "Validating:".cyan().bold(), decls_path);

    let (report, source_hash) = load_and_validate(decls_path, settings, properties)
        .with_context(|| format!("Failed to validate declarations: {}", decls_path))?;
    println!("{} json ({})", "Source:".dimmed(), &source_hash[..16]);

    if report.extension_points.is_empty() && report.diagnostics.is_empty() {
        println!(
            "\n{} No extension points declared; a method would be synthesized",
            "INFO".blue().bold()
        );
        return Ok(ExitCode::SUCCESS);
    }

    if !report.extension_points.is_empty() {
        println!("\n{}", "Extension points:".bold());
        for point in &report.extension_points {
            println!(
                "  {} {}({}, {})",
                "+".green(),
                point.qualified_name(),
                point.services_parameter,
                point.lifetime_parameter
            );
        }
    }

    let diagnostics = reporting::apply_deny_warnings(&report.diagnostics, deny_warnings);
    reporting::print_diagnostics(&diagnostics);

    if diagnostics.is_empty() {
        println!(
            "\n{} {} extension point(s) valid",
            "SUCCESS".green().bold(),
            report.extension_points.len()
        );
    } else if reporting::has_errors(&diagnostics) {
        println!(
            "\n{} {} extension point(s) rejected",
            "FAILED".red().bold(),
            diagnostics.len()
        );
    } else {
        println!(
            "\n{} {} extension point(s) rejected",
            "WARNING".yellow().bold(),
            diagnostics.len()
        );
    }

    Ok(reporting::exit_code(&diagnostics))
}

/// Run validate with machine-readable JSON output
fn run_json(
    decls_path: &str,
    settings: Option<&str>,
    properties: &[(String, String)],
    deny_warnings: bool,
) -> Result<ExitCode> {
    let (report, source_hash) = match load_and_validate(decls_path, settings, properties) {
        Ok(result) => result,
        Err(e) => {
            let file = match &e {
                InputError::SettingsParse { .. } | InputError::SettingsValue { .. } => {
                    settings.unwrap_or_default()
                }
                _ => decls_path,
            };
            let error = input_error_to_json(&e, file);
            print_json(&ValidateOutput::failure(vec![error]))?;
            return Ok(ExitCode::from(1));
        }
    };

    let diagnostics = reporting::apply_deny_warnings(&report.diagnostics, deny_warnings);
    let output = ValidateOutput {
        success: !reporting::has_errors(&diagnostics),
        errors: Vec::new(),
        diagnostics: diagnostics.iter().map(JsonDiagnostic::from).collect(),
        extension_points: report.extension_points,
        source_hash: Some(source_hash),
    };
    print_json(&output)?;

    Ok(reporting::exit_code(&diagnostics))
}

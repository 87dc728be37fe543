//! One complete generation pass over a declaration snapshot.

use cqrsgen_decl::{
    resolve_validator_options, scan_types, validate_extension_points, ConfigSource, DeclarationSet,
    Diagnostic, InjectionStub, ResolvedConfig, ValidationReport,
};

use crate::emit::{emit, OutputUnit};
use crate::error::EmitResult;

/// Everything a pass produced.
#[derive(Debug, Clone)]
pub struct PassOutcome {
    /// Discovered registrations, in discovery order.
    pub stubs: Vec<InjectionStub>,
    /// Resolved names for the synthesized method.
    pub config: ResolvedConfig,
    /// Accepted extension points and rejection diagnostics.
    ///
    /// Empty when no stubs were found; validation is skipped in that case.
    pub validation: ValidationReport,
    /// The generated unit, if any.
    pub unit: Option<OutputUnit>,
}

impl PassOutcome {
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.validation.diagnostics
    }
}

/// Runs a pass with explicit build-wide and local configuration sources.
///
/// # Arguments
/// * `decls` - The declaration snapshot
/// * `build` - Build-wide source (`build_property.`-prefixed keys)
/// * `local` - Local source (unprefixed keys)
pub fn generate(
    decls: &DeclarationSet,
    build: &dyn ConfigSource,
    local: &dyn ConfigSource,
) -> EmitResult<PassOutcome> {
    let stubs = scan_types(&decls.types);
    let config = ResolvedConfig::resolve(build, local);

    if stubs.is_empty() {
        tracing::info!("no handler implementations found; nothing to generate");
        return Ok(PassOutcome {
            stubs,
            config,
            validation: ValidationReport::default(),
            unit: None,
        });
    }

    let options = resolve_validator_options(build, local);
    let validation = validate_extension_points(&decls.methods, &options);
    let unit = emit(&stubs, &validation.extension_points, &config)?;

    tracing::info!(
        stubs = stubs.len(),
        extension_points = validation.extension_points.len(),
        diagnostics = validation.diagnostics.len(),
        unit = unit.as_ref().map(|u| u.hint_name.as_str()).unwrap_or("-"),
        "generation pass complete"
    );

    Ok(PassOutcome {
        stubs,
        config,
        validation,
        unit,
    })
}

/// Runs a pass reading both sources from the snapshot's own options bag.
pub fn generate_snapshot(decls: &DeclarationSet) -> EmitResult<PassOutcome> {
    generate(decls, &decls.options, &decls.options)
}

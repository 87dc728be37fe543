//! The extension point rule chain.
//!
//! Rules run in [`RULES`] order. Each one assumes every earlier rule passed.

use crate::decl::{Completeness, MethodDecl, Parameter};
use crate::error::{Diagnostic, DiagnosticCode};
use crate::shape::{
    strip_global_alias, MARKER_ATTRIBUTE, SERVICE_COLLECTION_TYPE, SERVICE_LIFETIME_TYPE,
};

use super::{ValidatorOptions, LIFETIME_PARAMETER_NAME, SERVICES_PARAMETER_NAME};

pub(super) type Rule = fn(&MethodDecl, &ValidatorOptions) -> Result<(), Diagnostic>;

pub(super) const RULES: &[Rule] = &[
    must_be_partial,
    must_not_have_implementation,
    must_be_extension_method,
    must_be_static,
    no_unsupported_modifiers,
    two_parameters,
    services_parameter_type,
    lifetime_parameter_type,
    parameter_names,
    returns_service_collection,
    not_protected,
];

fn reject(method: &MethodDecl, code: DiagnosticCode, message: String) -> Diagnostic {
    Diagnostic::new(code, method.qualified_name(), message).at(method.location.as_ref())
}

fn reject_parameter(
    method: &MethodDecl,
    parameter: &Parameter,
    code: DiagnosticCode,
    message: String,
) -> Diagnostic {
    let location = parameter.location.as_ref().or(method.location.as_ref());
    Diagnostic::new(code, method.qualified_name(), message).at(location)
}

/// Compares a declared type against a well-known name, tolerating a
/// `global::` alias qualifier.
fn is_type(declared: &str, expected: &str) -> bool {
    strip_global_alias(declared) == expected
}

pub(super) fn parameter_count_message(method: &MethodDecl) -> String {
    format!(
        "Method {} signature must match (this IServiceCollection, ServiceLifetime) to use {}.",
        method.name, MARKER_ATTRIBUTE
    )
}

fn must_be_partial(method: &MethodDecl, _: &ValidatorOptions) -> Result<(), Diagnostic> {
    if matches!(
        method.completeness,
        Completeness::Implemented | Completeness::NotPartial
    ) {
        return Err(reject(
            method,
            DiagnosticCode::MustBePartial,
            format!(
                "Method {} must be an unimplemented \"partial\" method to use {}.",
                method.name, MARKER_ATTRIBUTE
            ),
        ));
    }
    Ok(())
}

fn must_not_have_implementation(
    method: &MethodDecl,
    _: &ValidatorOptions,
) -> Result<(), Diagnostic> {
    if let Completeness::SeparateImplementation { location } = &method.completeness {
        let message = format!(
            "Method {} must not have an implementation provided to use {}.",
            method.name, MARKER_ATTRIBUTE
        );
        return Err(Diagnostic::new(
            DiagnosticCode::MustNotHaveImplementation,
            method.qualified_name(),
            message,
        )
        .at(location.as_ref().or(method.location.as_ref())));
    }
    Ok(())
}

fn must_be_extension_method(method: &MethodDecl, _: &ValidatorOptions) -> Result<(), Diagnostic> {
    if !method.is_extension {
        return Err(reject(
            method,
            DiagnosticCode::MustBeExtensionMethod,
            format!(
                "Method {} must be an extension method to use {}.",
                method.name, MARKER_ATTRIBUTE
            ),
        ));
    }
    Ok(())
}

fn must_be_static(method: &MethodDecl, options: &ValidatorOptions) -> Result<(), Diagnostic> {
    if options.require_static && !method.is_static {
        return Err(reject(
            method,
            DiagnosticCode::MustBeStatic,
            format!(
                "Method {} must be static to use {}.",
                method.name, MARKER_ATTRIBUTE
            ),
        ));
    }
    Ok(())
}

fn no_unsupported_modifiers(method: &MethodDecl, _: &ValidatorOptions) -> Result<(), Diagnostic> {
    let modifier = if method.is_virtual {
        "virtual"
    } else if method.is_abstract {
        "abstract"
    } else if method.is_async {
        "async"
    } else {
        return Ok(());
    };

    Err(reject(
        method,
        DiagnosticCode::UnsupportedModifier,
        format!(
            "Method {} must not be {} to use {}.",
            method.name, modifier, MARKER_ATTRIBUTE
        ),
    ))
}

fn two_parameters(method: &MethodDecl, _: &ValidatorOptions) -> Result<(), Diagnostic> {
    if method.parameters.len() != 2 {
        return Err(reject(
            method,
            DiagnosticCode::InvalidParameterCount,
            parameter_count_message(method),
        ));
    }
    Ok(())
}

fn services_parameter_type(method: &MethodDecl, _: &ValidatorOptions) -> Result<(), Diagnostic> {
    match method.parameters.first() {
        Some(parameter) if !is_type(&parameter.ty, SERVICE_COLLECTION_TYPE) => {
            Err(reject_parameter(
                method,
                parameter,
                DiagnosticCode::InvalidServicesParameterType,
                format!(
                    "Parameter \"{}\" must be of type \"IServiceCollection\" to use {}.",
                    parameter.name, MARKER_ATTRIBUTE
                ),
            ))
        }
        _ => Ok(()),
    }
}

fn lifetime_parameter_type(method: &MethodDecl, _: &ValidatorOptions) -> Result<(), Diagnostic> {
    match method.parameters.get(1) {
        Some(parameter) if !is_type(&parameter.ty, SERVICE_LIFETIME_TYPE) => {
            Err(reject_parameter(
                method,
                parameter,
                DiagnosticCode::InvalidLifetimeParameterType,
                format!(
                    "Parameter \"{}\" must be of type \"ServiceLifetime\" to use {}.",
                    parameter.name, MARKER_ATTRIBUTE
                ),
            ))
        }
        _ => Ok(()),
    }
}

fn parameter_names(method: &MethodDecl, options: &ValidatorOptions) -> Result<(), Diagnostic> {
    let expected = [SERVICES_PARAMETER_NAME, LIFETIME_PARAMETER_NAME];
    for (parameter, expected) in method.parameters.iter().zip(expected) {
        if !options.parameter_names.accepts(&parameter.name, expected) {
            return Err(reject_parameter(
                method,
                parameter,
                DiagnosticCode::InvalidParameterName,
                format!(
                    "Parameter \"{}\" must be named \"{}\" to use {}.",
                    parameter.name, expected, MARKER_ATTRIBUTE
                ),
            ));
        }
    }
    Ok(())
}

fn returns_service_collection(
    method: &MethodDecl,
    _: &ValidatorOptions,
) -> Result<(), Diagnostic> {
    if !is_type(&method.return_type, SERVICE_COLLECTION_TYPE) {
        return Err(reject(
            method,
            DiagnosticCode::InvalidReturnType,
            format!(
                "Return type must be \"IServiceCollection\" to use {}.",
                MARKER_ATTRIBUTE
            ),
        ));
    }
    Ok(())
}

fn not_protected(method: &MethodDecl, _: &ValidatorOptions) -> Result<(), Diagnostic> {
    if method.accessibility.is_protected() {
        return Err(reject(
            method,
            DiagnosticCode::InvalidAccessibility,
            format!(
                "Method {} must not be {} to use {}.",
                method.name, method.accessibility, MARKER_ATTRIBUTE
            ),
        ));
    }
    Ok(())
}

//! Extension point validation.
//!
//! Every method carrying the extension-point marker runs through an ordered
//! rule chain (see [`rules`]). The first failing rule rejects the method with
//! exactly one [`Diagnostic`]; a method passing every rule becomes an
//! [`ExtensionPoint`] the emitter completes.

mod rules;


use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::decl::{Accessibility, MethodDecl, SourceLocation};
use crate::error::{Diagnostic, DiagnosticCode};

/// Required name of the receiver parameter when names are checked.
pub const SERVICES_PARAMETER_NAME: &str = "services";

/// Required name of the lifetime parameter when names are checked.
pub const LIFETIME_PARAMETER_NAME: &str = "defaultLifetime";

/// How strictly parameter names are compared against
/// [`SERVICES_PARAMETER_NAME`] and [`LIFETIME_PARAMETER_NAME`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameMatching {
    /// Any names are accepted and reused in the completion.
    #[default]
    Off,
    Exact,
    IgnoreCase,
}

impl NameMatching {
    pub fn as_str(&self) -> &'static str {
        match self {
            NameMatching::Off => "off",
            NameMatching::Exact => "exact",
            NameMatching::IgnoreCase => "ignore_case",
        }
    }

    pub fn accepts(&self, actual: &str, expected: &str) -> bool {
        match self {
            NameMatching::Off => true,
            NameMatching::Exact => actual == expected,
            NameMatching::IgnoreCase => actual.eq_ignore_ascii_case(expected),
        }
    }
}

impl FromStr for NameMatching {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" => Ok(NameMatching::Off),
            "exact" => Ok(NameMatching::Exact),
            "ignore_case" | "ignorecase" => Ok(NameMatching::IgnoreCase),
            _ => Err(()),
        }
    }
}

impl fmt::Display for NameMatching {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Strictness knobs for the rule chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorOptions {
    /// Reject non-static methods with [`DiagnosticCode::MustBeStatic`].
    pub require_static: bool,
    pub parameter_names: NameMatching,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            require_static: true,
            parameter_names: NameMatching::Off,
        }
    }
}

/// A validated extension point, carrying everything needed to complete it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionPoint {
    /// Enclosing namespace; empty for the global namespace.
    pub namespace: String,
    pub class_name: String,
    pub class_accessibility: Accessibility,
    pub method_name: String,
    pub method_accessibility: Accessibility,
    /// Name of the receiver (`this IServiceCollection`) parameter.
    pub services_parameter: String,
    /// Name of the `ServiceLifetime` parameter.
    pub lifetime_parameter: String,
    /// Whether the declaration already gives the lifetime a default value.
    pub lifetime_has_default: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceLocation>,
}

impl ExtensionPoint {
    pub fn qualified_name(&self) -> String {
        if self.namespace.is_empty() {
            format!("{}.{}", self.class_name, self.method_name)
        } else {
            format!(
                "{}.{}.{}",
                self.namespace, self.class_name, self.method_name
            )
        }
    }
}

/// Accepted extension points and rejection diagnostics from one validation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub extension_points: Vec<ExtensionPoint>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationReport {
    /// True when no marked method was rejected.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn has_extension_points(&self) -> bool {
        !self.extension_points.is_empty()
    }
}

/// Validates every marked method in `methods`, in order.
///
/// Methods without the marker are ignored.
pub fn validate_extension_points(
    methods: &[MethodDecl],
    options: &ValidatorOptions,
) -> ValidationReport {
    let mut report = ValidationReport::default();

    for method in methods.iter().filter(|m| m.is_extension_point()) {
        match validate_method(method, options) {
            Ok(point) => {
                tracing::debug!(method = %point.qualified_name(), "accepted extension point");
                report.extension_points.push(point);
            }
            Err(diagnostic) => {
                tracing::debug!(
                    method = %diagnostic.method,
                    code = %diagnostic.code,
                    "rejected extension point"
                );
                report.diagnostics.push(diagnostic);
            }
        }
    }

    report
}

/// Runs the rule chain on a single method, stopping at the first failure.
pub fn validate_method(
    method: &MethodDecl,
    options: &ValidatorOptions,
) -> Result<ExtensionPoint, Diagnostic> {
    rules::RULES
        .iter()
        .try_for_each(|rule| rule(method, options))?;

    let [services, lifetime] = method.parameters.as_slice() else {
        return Err(Diagnostic::new(
            DiagnosticCode::InvalidParameterCount,
            method.qualified_name(),
            rules::parameter_count_message(method),
        )
        .at(method.location.as_ref()));
    };

    Ok(ExtensionPoint {
        namespace: method.namespace.clone(),
        class_name: method.containing_type.name.clone(),
        class_accessibility: method.containing_type.accessibility,
        method_name: method.name.clone(),
        method_accessibility: method.accessibility,
        services_parameter: services.name.clone(),
        lifetime_parameter: lifetime.name.clone(),
        lifetime_has_default: lifetime.has_default,
        location: method.location.clone(),
    })
}

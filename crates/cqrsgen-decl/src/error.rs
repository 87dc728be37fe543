//! Diagnostics reported on rejected extension points, and error types for
//! snapshot handling.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decl::SourceLocation;

/// Category shared by every diagnostic this generator reports.
pub const DIAGNOSTIC_CATEGORY: &str = "CQRSToolkit.Generator";

/// Stable diagnostic codes for extension point rejections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    /// CQRSDI0001: Marked fragment is not a bodiless partial declaration
    MustBePartial,
    /// CQRSDI0002: Another fragment supplies an implementation
    MustNotHaveImplementation,
    /// CQRSDI0003: Not an extension method
    MustBeExtensionMethod,
    /// CQRSDI0004: Parameter count is not two
    InvalidParameterCount,
    /// CQRSDI0005: First parameter is not the service collection
    InvalidServicesParameterType,
    /// CQRSDI0006: Second parameter is not the service lifetime
    InvalidLifetimeParameterType,
    /// CQRSDI0007: Return type is not the service collection
    InvalidReturnType,
    /// CQRSDI0008: Virtual, abstract, or async method
    UnsupportedModifier,
    /// CQRSDI0009: Protected accessibility
    InvalidAccessibility,
    /// CQRSDI0010: Not static
    MustBeStatic,
    /// CQRSDI0011: Parameter name does not match the required name
    InvalidParameterName,
}

impl DiagnosticCode {
    pub const ALL: [DiagnosticCode; 11] = [
        DiagnosticCode::MustBePartial,
        DiagnosticCode::MustNotHaveImplementation,
        DiagnosticCode::MustBeExtensionMethod,
        DiagnosticCode::InvalidParameterCount,
        DiagnosticCode::InvalidServicesParameterType,
        DiagnosticCode::InvalidLifetimeParameterType,
        DiagnosticCode::InvalidReturnType,
        DiagnosticCode::UnsupportedModifier,
        DiagnosticCode::InvalidAccessibility,
        DiagnosticCode::MustBeStatic,
        DiagnosticCode::InvalidParameterName,
    ];

    /// Returns the code string (e.g., "CQRSDI0004").
    pub fn code(&self) -> &'static str {
        match self {
            DiagnosticCode::MustBePartial => "CQRSDI0001",
            DiagnosticCode::MustNotHaveImplementation => "CQRSDI0002",
            DiagnosticCode::MustBeExtensionMethod => "CQRSDI0003",
            DiagnosticCode::InvalidParameterCount => "CQRSDI0004",
            DiagnosticCode::InvalidServicesParameterType => "CQRSDI0005",
            DiagnosticCode::InvalidLifetimeParameterType => "CQRSDI0006",
            DiagnosticCode::InvalidReturnType => "CQRSDI0007",
            DiagnosticCode::UnsupportedModifier => "CQRSDI0008",
            DiagnosticCode::InvalidAccessibility => "CQRSDI0009",
            DiagnosticCode::MustBeStatic => "CQRSDI0010",
            DiagnosticCode::InvalidParameterName => "CQRSDI0011",
        }
    }

    /// Short human-readable title.
    pub fn title(&self) -> &'static str {
        match self {
            DiagnosticCode::MustBePartial => "Method must be partial",
            DiagnosticCode::MustNotHaveImplementation => "Method can not have an implementation",
            DiagnosticCode::MustBeExtensionMethod => "Must be an extension method",
            DiagnosticCode::InvalidParameterCount => "Invalid parameter count",
            DiagnosticCode::InvalidServicesParameterType => "Invalid parameter type",
            DiagnosticCode::InvalidLifetimeParameterType => "Invalid parameter type",
            DiagnosticCode::InvalidReturnType => "Invalid return type",
            DiagnosticCode::UnsupportedModifier => "Unsupported method modifier",
            DiagnosticCode::InvalidAccessibility => "Invalid accessibility",
            DiagnosticCode::MustBeStatic => "Method must be static",
            DiagnosticCode::InvalidParameterName => "Invalid parameter name",
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Reported severity of a diagnostic.
///
/// The generator itself only reports warnings; callers that treat warnings as
/// fatal escalate them with [`Diagnostic::escalate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A non-fatal report about one rejected extension point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub severity: Severity,
    /// Rendered message.
    pub message: String,
    /// Qualified name of the offending method.
    pub method: String,
    pub location: Option<SourceLocation>,
}

impl Diagnostic {
    /// Creates a warning with no location.
    pub fn new(
        code: DiagnosticCode,
        method: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code,
            severity: Severity::Warning,
            message: message.into(),
            method: method.into(),
            location: None,
        }
    }

    /// Attaches a location, if one is known.
    pub fn at(mut self, location: Option<&SourceLocation>) -> Self {
        self.location = location.cloned();
        self
    }

    pub fn title(&self) -> &'static str {
        self.code.title()
    }

    pub fn category(&self) -> &'static str {
        DIAGNOSTIC_CATEGORY
    }

    /// Raises the severity to [`Severity::Error`].
    pub fn escalate(mut self) -> Self {
        self.severity = Severity::Error;
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(location) = &self.location {
            write!(f, "{}: ", location)?;
        }
        write!(f, "{} {}: {}", self.severity, self.code, self.message)
    }
}

/// Errors serializing a declaration snapshot.
#[derive(Debug, Error)]
pub enum DeclError {
    /// JSON parsing or serialization error.
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_codes_are_unique() {
        let codes: HashSet<_> = DiagnosticCode::ALL.iter().map(|c| c.code()).collect();
        assert_eq!(codes.len(), DiagnosticCode::ALL.len());
    }

    #[test]
    fn test_display_with_location() {
        let diagnostic = Diagnostic::new(
            DiagnosticCode::InvalidParameterCount,
            "App.Ext.AddCqrs",
            "bad signature",
        )
        .at(Some(&SourceLocation::new("Ext.cs", 4, 9)));
        assert_eq!(
            diagnostic.to_string(),
            "Ext.cs(4,9): warning CQRSDI0004: bad signature"
        );
    }

    #[test]
    fn test_escalate() {
        let diagnostic = Diagnostic::new(DiagnosticCode::MustBePartial, "A.B", "msg").escalate();
        assert_eq!(diagnostic.severity, Severity::Error);
        assert_eq!(diagnostic.to_string(), "error CQRSDI0001: msg");
    }
}

//! JSON output types for machine-readable CLI output.
//!
//! Every command accepts `--json` and prints exactly one of the documents
//! below to stdout.

use serde::{Deserialize, Serialize};

use cqrsgen_csharp::OutputUnit;
use cqrsgen_decl::{Diagnostic, ExtensionPoint, InjectionStub, ResolvedValue};

use crate::input::InputError;

/// Error codes for CLI operations.
///
/// These codes are stable. Extension point diagnostics pass through with
/// their own `CQRSDI` codes.
pub mod error_codes {
    /// File could not be read
    pub const FILE_READ: &str = "CLI_001";
    /// Snapshot JSON parse error
    pub const JSON_PARSE: &str = "CLI_002";
    /// Settings file parse error
    pub const SETTINGS_PARSE: &str = "CLI_003";
    /// Generated unit could not be rendered or written
    pub const GENERATION_ERROR: &str = "CLI_004";
}

/// A structured error in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonError {
    /// Stable error code (e.g., "CLI_001")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Source file path (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl JsonError {
    /// Creates a new error with code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            file: None,
        }
    }

    /// Sets the file path for this error.
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }
}

/// An extension point diagnostic in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonDiagnostic {
    /// Stable diagnostic code (e.g., "CQRSDI0004")
    pub code: String,
    /// "warning", or "error" under `--deny-warnings`
    pub severity: String,
    pub title: String,
    pub message: String,
    /// Qualified name of the rejected method
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub col: Option<u32>,
}

impl From<&Diagnostic> for JsonDiagnostic {
    fn from(diagnostic: &Diagnostic) -> Self {
        Self {
            code: diagnostic.code.code().to_string(),
            severity: diagnostic.severity.as_str().to_string(),
            title: diagnostic.title().to_string(),
            message: diagnostic.message.clone(),
            method: diagnostic.method.clone(),
            file: diagnostic.location.as_ref().map(|l| l.file.clone()),
            line: diagnostic.location.as_ref().map(|l| l.line),
            col: diagnostic.location.as_ref().map(|l| l.column),
        }
    }
}

/// An injection stub in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonStub {
    pub shape: String,
    pub service_type: String,
    pub implementation: String,
}

impl From<&InjectionStub> for JsonStub {
    fn from(stub: &InjectionStub) -> Self {
        Self {
            shape: stub.shape.signature().to_string(),
            service_type: stub.service_type(),
            implementation: stub.implementation.clone(),
        }
    }
}

/// A generated unit in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonUnit {
    pub hint_name: String,
    /// "completion" or "synthesized"
    pub kind: String,
    /// Where the unit was written
    pub path: String,
    /// BLAKE3 hash of the generated source
    pub source_hash: String,
}

impl JsonUnit {
    pub fn new(unit: &OutputUnit, path: impl Into<String>) -> Self {
        Self {
            hint_name: unit.hint_name.clone(),
            kind: unit.kind.as_str().to_string(),
            path: path.into(),
            source_hash: unit.source_hash(),
        }
    }
}

/// JSON output for the `generate` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateOutput {
    /// False on input errors, or on diagnostics under `--deny-warnings`
    pub success: bool,
    pub errors: Vec<JsonError>,
    pub diagnostics: Vec<JsonDiagnostic>,
    pub stubs: Vec<JsonStub>,
    /// The written unit; absent when there was nothing to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<JsonUnit>,
    /// BLAKE3 hash of the snapshot file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_hash: Option<String>,
}

impl GenerateOutput {
    pub fn failure(errors: Vec<JsonError>, source_hash: Option<String>) -> Self {
        Self {
            success: false,
            errors,
            diagnostics: Vec::new(),
            stubs: Vec::new(),
            unit: None,
            source_hash,
        }
    }
}

/// JSON output for the `validate` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateOutput {
    pub success: bool,
    pub errors: Vec<JsonError>,
    pub diagnostics: Vec<JsonDiagnostic>,
    pub extension_points: Vec<ExtensionPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_hash: Option<String>,
}

impl ValidateOutput {
    pub fn failure(errors: Vec<JsonError>) -> Self {
        Self {
            success: false,
            errors,
            diagnostics: Vec::new(),
            extension_points: Vec::new(),
            source_hash: None,
        }
    }
}

/// JSON output for the `scan` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanOutput {
    pub success: bool,
    pub errors: Vec<JsonError>,
    pub stubs: Vec<JsonStub>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_hash: Option<String>,
}

impl ScanOutput {
    pub fn failure(errors: Vec<JsonError>) -> Self {
        Self {
            success: false,
            errors,
            stubs: Vec::new(),
            source_hash: None,
        }
    }
}

/// A resolved setting in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonSetting {
    pub name: String,
    pub value: String,
    /// "default", "build-wide" or "local"
    pub origin: String,
    pub build_key: String,
    pub local_key: String,
}

impl From<&ResolvedValue> for JsonSetting {
    fn from(resolved: &ResolvedValue) -> Self {
        Self {
            name: resolved.setting.name().to_string(),
            value: resolved.value.clone(),
            origin: resolved.origin.as_str().to_string(),
            build_key: resolved.setting.build_key(),
            local_key: resolved.setting.local_key(),
        }
    }
}

/// JSON output for the `config` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigOutput {
    pub success: bool,
    pub errors: Vec<JsonError>,
    pub settings: Vec<JsonSetting>,
}

/// Converts an input error into a JSON error.
pub fn input_error_to_json(error: &InputError, file: &str) -> JsonError {
    let code = match error {
        InputError::FileRead { .. } => error_codes::FILE_READ,
        InputError::JsonParse { .. } => error_codes::JSON_PARSE,
        InputError::SettingsParse { .. } | InputError::SettingsValue { .. } => {
            error_codes::SETTINGS_PARSE
        }
    };
    JsonError::new(code, error.to_string()).with_file(file)
}

/// Serializes `output` and prints it to stdout.
pub fn print_json<T: Serialize>(output: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(output)?);
    Ok(())
}

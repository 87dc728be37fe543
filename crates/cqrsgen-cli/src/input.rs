//! Loading declaration snapshots and assembling configuration sources.
//!
//! The build-wide source is the snapshot's options bag plus any `-p NAME=VALUE`
//! overrides (stored under `build_property.NAME`). The local source is the
//! snapshot's options bag plus the flat key/value table of a TOML settings
//! file.

use std::path::{Path, PathBuf};

use cqrsgen_decl::{AnalyzerOptions, DeclarationSet};

/// Result of loading a declaration snapshot.
#[derive(Debug)]
pub struct LoadResult {
    /// The parsed snapshot.
    pub decls: DeclarationSet,
    /// BLAKE3 hash of the source file content (hex string).
    pub source_hash: String,
}

/// Errors that can occur while loading inputs.
#[derive(Debug)]
pub enum InputError {
    /// File could not be read.
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Snapshot JSON parsing failed.
    JsonParse { message: String },

    /// Settings file is not valid TOML.
    SettingsParse { path: PathBuf, message: String },

    /// Settings file holds a non-scalar value.
    SettingsValue { key: String },
}

impl std::fmt::Display for InputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputError::FileRead { path, source } => {
                write!(f, "failed to read file '{}': {}", path.display(), source)
            }
            InputError::JsonParse { message } => write!(f, "JSON parse error: {}", message),
            InputError::SettingsParse { path, message } => {
                write!(f, "invalid settings file '{}': {}", path.display(), message)
            }
            InputError::SettingsValue { key } => {
                write!(f, "setting '{}' must be a string, number, or boolean", key)
            }
        }
    }
}

impl std::error::Error for InputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InputError::FileRead { source, .. } => Some(source),
            _ => None,
        }
    }
}

fn read(path: &Path) -> Result<String, InputError> {
    std::fs::read_to_string(path).map_err(|e| InputError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load a declaration snapshot from a JSON file.
///
/// # Example
/// ```no_run
/// use std::path::Path;
/// use cqrsgen_cli::input::load_declarations;
///
/// let result = load_declarations(Path::new("decls.json")).unwrap();
/// println!("{} types", result.decls.types.len());
/// ```
pub fn load_declarations(path: &Path) -> Result<LoadResult, InputError> {
    let content = read(path)?;

    let source_hash = blake3::hash(content.as_bytes()).to_hex().to_string();

    let decls = DeclarationSet::from_json(&content).map_err(|e| InputError::JsonParse {
        message: e.to_string(),
    })?;

    tracing::debug!(
        path = %path.display(),
        types = decls.types.len(),
        methods = decls.methods.len(),
        "loaded declaration snapshot"
    );

    Ok(LoadResult { decls, source_hash })
}

/// Load a flat TOML settings file as a local configuration source.
///
/// ```toml
/// CQRSToolkit_DIGen_AccessModifier = "public"
/// CQRSToolkit_DIGen_RequireStatic = false
/// ```
pub fn load_local_settings(path: &Path) -> Result<AnalyzerOptions, InputError> {
    let content = read(path)?;
    parse_local_settings(&content).map_err(|e| match e {
        InputError::SettingsParse { message, .. } => InputError::SettingsParse {
            path: path.to_path_buf(),
            message,
        },
        other => other,
    })
}

fn parse_local_settings(content: &str) -> Result<AnalyzerOptions, InputError> {
    let table: toml::Table = content.parse().map_err(|e: toml::de::Error| {
        InputError::SettingsParse {
            path: PathBuf::new(),
            message: e.message().to_string(),
        }
    })?;

    let mut options = AnalyzerOptions::new();
    for (key, value) in table {
        let value = match value {
            toml::Value::String(s) => s,
            toml::Value::Integer(i) => i.to_string(),
            toml::Value::Float(f) => f.to_string(),
            toml::Value::Boolean(b) => b.to_string(),
            toml::Value::Datetime(d) => d.to_string(),
            toml::Value::Array(_) | toml::Value::Table(_) => {
                return Err(InputError::SettingsValue { key });
            }
        };
        options.insert(key, value);
    }
    Ok(options)
}

/// Parses a `NAME=VALUE` build property override.
pub fn parse_property(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", s))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("property name is empty in '{}'", s));
    }
    Ok((name.to_string(), value.to_string()))
}

/// The two ranked configuration sources for one pass.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    pub build: AnalyzerOptions,
    pub local: AnalyzerOptions,
}

impl ConfigSources {
    /// Assembles both sources.
    ///
    /// # Arguments
    /// * `snapshot` - Options bag exported with the snapshot, if any
    /// * `settings_file` - Optional TOML settings file (local source)
    /// * `properties` - `NAME=VALUE` overrides (build-wide source)
    pub fn assemble(
        snapshot: Option<&AnalyzerOptions>,
        settings_file: Option<&Path>,
        properties: &[(String, String)],
    ) -> Result<Self, InputError> {
        let mut sources = ConfigSources::default();
        if let Some(options) = snapshot {
            sources.build = options.clone();
            sources.local = options.clone();
        }

        for (name, value) in properties {
            sources.build.insert_build_property(name, value.as_str());
        }

        if let Some(path) = settings_file {
            let settings = load_local_settings(path)?;
            sources
                .local
                .extend(settings.iter().map(|(k, v)| (k.to_string(), v.to_string())));
        }

        Ok(sources)
    }
}

//! Config command implementation
//!
//! Prints every recognized setting with its resolved value and where that
//! value came from.

use anyhow::{Context, Result};
use colored::Colorize;
use cqrsgen_decl::{resolve_all, Origin, ResolvedValue};
use std::path::Path;
use std::process::ExitCode;

use super::json_output::{input_error_to_json, print_json, ConfigOutput, JsonSetting};
use crate::input::{load_declarations, ConfigSources, InputError};

fn resolve(
    decls_path: Option<&str>,
    settings: Option<&str>,
    properties: &[(String, String)],
) -> Result<Vec<ResolvedValue>, (InputError, String)> {
    let snapshot = match decls_path {
        Some(path) => Some(
            load_declarations(Path::new(path))
                .map_err(|e| (e, path.to_string()))?
                .decls
                .options,
        ),
        None => None,
    };

    let sources = ConfigSources::assemble(snapshot.as_ref(), settings.map(Path::new), properties)
        .map_err(|e| (e, settings.unwrap_or_default().to_string()))?;

    Ok(resolve_all(&sources.build, &sources.local))
}

/// Run the config command
///
/// # Arguments
/// * `decls_path` - Optional snapshot whose options bag seeds both sources
/// * `settings` - Optional local settings file
/// * `properties` - Build-wide `NAME=VALUE` overrides
/// * `json_output` - Whether to output machine-readable JSON
pub fn run(
    decls_path: Option<&str>,
    settings: Option<&str>,
    properties: &[(String, String)],
    json_output: bool,
) -> Result<ExitCode> {
    if json_output {
        run_json(decls_path, settings, properties)
    } else {
        run_human(decls_path, settings, properties)
    }
}

fn run_human(
    decls_path: Option<&str>,
    settings: Option<&str>,
    properties: &[(String, String)],
) -> Result<ExitCode> {
    let resolved = resolve(decls_path, settings, properties)
        .map_err(|(e, _)| e)
        .context("Failed to resolve settings")?;

    println!("{}", "Settings:".cyan().bold());
    for value in &resolved {
        let origin = match value.origin {
            Origin::Default => value.origin.as_str().dimmed(),
            Origin::BuildWide => value.origin.as_str().blue(),
            Origin::Local => value.origin.as_str().green(),
        };
        println!(
            "  {:<16} {:<40} [{}]",
            value.setting.name(),
            value.value,
            origin
        );
    }

    Ok(ExitCode::SUCCESS)
}

fn run_json(
    decls_path: Option<&str>,
    settings: Option<&str>,
    properties: &[(String, String)],
) -> Result<ExitCode> {
    match resolve(decls_path, settings, properties) {
        Ok(resolved) => {
            print_json(&ConfigOutput {
                success: true,
                errors: Vec::new(),
                settings: resolved.iter().map(JsonSetting::from).collect(),
            })?;
            Ok(ExitCode::SUCCESS)
        }
        Err((e, file)) => {
            print_json(&ConfigOutput {
                success: false,
                errors: vec![input_error_to_json(&e, &file)],
                settings: Vec::new(),
            })?;
            Ok(ExitCode::from(1))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cqrsgen_decl::Setting;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    fn find(resolved: &[ResolvedValue], setting: Setting) -> &ResolvedValue {
        resolved.iter().find(|v| v.setting == setting).unwrap()
    }

    #[test]
    fn test_defaults_without_inputs() {
        let resolved = resolve(None, None, &[]).unwrap();
        assert_eq!(resolved.len(), Setting::ALL.len());
        assert!(resolved.iter().all(|v| v.origin == Origin::Default));
        assert_eq!(
            find(&resolved, Setting::Namespace).value,
            "CQRSToolkit.DependencyInjection"
        );
    }

    #[test]
    fn test_local_file_wins_over_property() {
        let dir = tempdir().unwrap();
        let settings = dir.path().join("cqrsgen.toml");
        fs::write(&settings, "CQRSToolkit_DIGen_ClassName = \"LocalName\"\n").unwrap();
        let properties = vec![
            ("CQRSToolkit_DIGen_ClassName".to_string(), "BuildName".to_string()),
            ("CQRSToolkit_DIGen_AccessModifier".to_string(), "public".to_string()),
        ];

        let resolved = resolve(None, settings.to_str(), &properties).unwrap();

        let class_name = find(&resolved, Setting::ClassName);
        assert_eq!(class_name.value, "LocalName");
        assert_eq!(class_name.origin, Origin::Local);

        let access = find(&resolved, Setting::AccessModifier);
        assert_eq!(access.value, "public");
        assert_eq!(access.origin, Origin::BuildWide);
    }

    #[test]
    fn test_bad_settings_file_names_it() {
        let dir = tempdir().unwrap();
        let settings = dir.path().join("cqrsgen.toml");
        fs::write(&settings, "[nested]\nkey = 1\n").unwrap();

        let (err, file) = resolve(None, settings.to_str(), &[]).unwrap_err();
        assert!(matches!(err, InputError::SettingsValue { .. }));
        assert!(file.ends_with("cqrsgen.toml"));
    }
}

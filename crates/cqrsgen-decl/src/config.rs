//! Generator settings and their resolution from two ranked sources.
//!
//! Every setting starts from a compiled-in default. A non-blank build-wide
//! value (`build_property.CQRSToolkit_DIGen_<Name>`) replaces it, and a
//! non-blank local value (`CQRSToolkit_DIGen_<Name>`) replaces that.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::validation::{NameMatching, ValidatorOptions};

/// Prefix the host puts in front of build-wide properties.
pub const BUILD_PROPERTY_PREFIX: &str = "build_property.";

/// Prefix shared by every generator setting key.
pub const SETTING_PREFIX: &str = "CQRSToolkit_DIGen_";

/// Key/value lookup over one configuration source.
pub trait ConfigSource {
    fn get(&self, key: &str) -> Option<&str>;
}

impl ConfigSource for BTreeMap<String, String> {
    fn get(&self, key: &str) -> Option<&str> {
        BTreeMap::get(self, key).map(String::as_str)
    }
}

/// The host's analyzer options bag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalyzerOptions(BTreeMap<String, String>);

impl AnalyzerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Inserts `value` under the build-wide key for `name`.
    ///
    /// `name` may already carry the `build_property.` prefix.
    pub fn insert_build_property(&mut self, name: &str, value: impl Into<String>) {
        let key = if name.starts_with(BUILD_PROPERTY_PREFIX) {
            name.to_string()
        } else {
            format!("{}{}", BUILD_PROPERTY_PREFIX, name)
        };
        self.0.insert(key, value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl ConfigSource for AnalyzerOptions {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AnalyzerOptions {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for AnalyzerOptions {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

/// A recognized generator setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Setting {
    /// Access modifier of the synthesized class and method.
    AccessModifier,
    /// Name of the synthesized class.
    ClassName,
    /// Namespace of the synthesized class.
    Namespace,
    /// Parameter name matching level for extension points.
    ParameterNames,
    /// Whether extension points must be declared static.
    RequireStatic,
}

impl Setting {
    pub const ALL: [Setting; 5] = [
        Setting::AccessModifier,
        Setting::ClassName,
        Setting::Namespace,
        Setting::ParameterNames,
        Setting::RequireStatic,
    ];

    /// Setting name without any prefix.
    pub fn name(&self) -> &'static str {
        match self {
            Setting::AccessModifier => "AccessModifier",
            Setting::ClassName => "ClassName",
            Setting::Namespace => "Namespace",
            Setting::ParameterNames => "ParameterNames",
            Setting::RequireStatic => "RequireStatic",
        }
    }

    pub fn default_value(&self) -> &'static str {
        match self {
            Setting::AccessModifier => "internal",
            Setting::ClassName => "CQRSServiceExtensions",
            Setting::Namespace => "CQRSToolkit.DependencyInjection",
            Setting::ParameterNames => "off",
            Setting::RequireStatic => "true",
        }
    }

    /// Key read from the local source, e.g. `CQRSToolkit_DIGen_Namespace`.
    pub fn local_key(&self) -> String {
        format!("{}{}", SETTING_PREFIX, self.name())
    }

    /// Key read from the build-wide source.
    pub fn build_key(&self) -> String {
        format!("{}{}{}", BUILD_PROPERTY_PREFIX, SETTING_PREFIX, self.name())
    }

    /// Whether `value` is usable for this setting.
    ///
    /// Names end up in generated C# and in the unit's file name, so they must
    /// be plain identifiers.
    pub fn accepts(&self, value: &str) -> bool {
        match self {
            Setting::AccessModifier => matches!(value, "public" | "internal"),
            Setting::ClassName => is_identifier(value),
            Setting::Namespace => value.split('.').all(is_identifier),
            Setting::ParameterNames => value.parse::<NameMatching>().is_ok(),
            Setting::RequireStatic => {
                value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("false")
            }
        }
    }
}

/// A C# identifier: a letter or underscore, then letters, digits or
/// underscores.
fn is_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {
            chars.all(|c| c.is_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

impl fmt::Display for Setting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Which source supplied a resolved value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    Default,
    BuildWide,
    Local,
}

impl Origin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Origin::Default => "default",
            Origin::BuildWide => "build-wide",
            Origin::Local => "local",
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A resolved setting value together with its provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedValue {
    pub setting: Setting,
    pub value: String,
    pub origin: Origin,
}

/// Trimmed value of `key`, or `None` when blank or unusable.
fn usable<'a>(setting: Setting, source: &'a dyn ConfigSource, key: &str) -> Option<&'a str> {
    let value = source.get(key).map(str::trim).filter(|v| !v.is_empty())?;
    if setting.accepts(value) {
        return Some(value);
    }
    tracing::warn!(
        key,
        value,
        "ignoring unrecognized {} value; keeping {}",
        setting,
        setting.default_value()
    );
    None
}

/// Resolves one setting: default, then build-wide, then local.
///
/// Blank values never overwrite. Values the setting does not accept are
/// logged and skipped the same way.
pub fn resolve_setting(
    setting: Setting,
    build: &dyn ConfigSource,
    local: &dyn ConfigSource,
) -> ResolvedValue {
    let mut resolved = ResolvedValue {
        setting,
        value: setting.default_value().to_string(),
        origin: Origin::Default,
    };

    if let Some(value) = usable(setting, build, &setting.build_key()) {
        resolved.value = value.to_string();
        resolved.origin = Origin::BuildWide;
    }

    if let Some(value) = usable(setting, local, &setting.local_key()) {
        resolved.value = value.to_string();
        resolved.origin = Origin::Local;
    }

    resolved
}

/// Resolves every recognized setting, in [`Setting::ALL`] order.
pub fn resolve_all(build: &dyn ConfigSource, local: &dyn ConfigSource) -> Vec<ResolvedValue> {
    Setting::ALL
        .iter()
        .map(|setting| resolve_setting(*setting, build, local))
        .collect()
}

/// Names used when an extension method has to be synthesized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedConfig {
    pub access_modifier: String,
    pub class_name: String,
    pub namespace: String,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            access_modifier: Setting::AccessModifier.default_value().to_string(),
            class_name: Setting::ClassName.default_value().to_string(),
            namespace: Setting::Namespace.default_value().to_string(),
        }
    }
}

impl ResolvedConfig {
    pub fn resolve(build: &dyn ConfigSource, local: &dyn ConfigSource) -> Self {
        Self {
            access_modifier: resolve_setting(Setting::AccessModifier, build, local).value,
            class_name: resolve_setting(Setting::ClassName, build, local).value,
            namespace: resolve_setting(Setting::Namespace, build, local).value,
        }
    }
}

/// Resolves validator strictness from the same two sources.
pub fn resolve_validator_options(
    build: &dyn ConfigSource,
    local: &dyn ConfigSource,
) -> ValidatorOptions {
    let names = resolve_setting(Setting::ParameterNames, build, local);
    let require_static = resolve_setting(Setting::RequireStatic, build, local);

    ValidatorOptions {
        require_static: require_static.value.eq_ignore_ascii_case("true"),
        parameter_names: names.value.parse().unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn source(pairs: &[(&str, &str)]) -> AnalyzerOptions {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_keys() {
        assert_eq!(
            Setting::AccessModifier.build_key(),
            "build_property.CQRSToolkit_DIGen_AccessModifier"
        );
        assert_eq!(
            Setting::Namespace.local_key(),
            "CQRSToolkit_DIGen_Namespace"
        );
    }

    #[test]
    fn test_defaults_when_sources_empty() {
        let config = ResolvedConfig::resolve(&AnalyzerOptions::new(), &AnalyzerOptions::new());
        assert_eq!(config, ResolvedConfig::default());
        assert_eq!(config.access_modifier, "internal");
        assert_eq!(config.class_name, "CQRSServiceExtensions");
        assert_eq!(config.namespace, "CQRSToolkit.DependencyInjection");
    }

    #[test]
    fn test_local_beats_build_wide() {
        let build = source(&[(
            "build_property.CQRSToolkit_DIGen_AccessModifier",
            "internal",
        )]);
        let local = source(&[("CQRSToolkit_DIGen_AccessModifier", "public")]);
        let resolved = resolve_setting(Setting::AccessModifier, &build, &local);
        assert_eq!(resolved.value, "public");
        assert_eq!(resolved.origin, Origin::Local);
    }

    #[test]
    fn test_blank_local_keeps_build_wide() {
        let build = source(&[(
            "build_property.CQRSToolkit_DIGen_ClassName",
            "Registrations",
        )]);
        let local = source(&[("CQRSToolkit_DIGen_ClassName", "   ")]);
        let resolved = resolve_setting(Setting::ClassName, &build, &local);
        assert_eq!(resolved.value, "Registrations");
        assert_eq!(resolved.origin, Origin::BuildWide);
    }

    #[test]
    fn test_both_blank_keeps_default() {
        let build = source(&[("build_property.CQRSToolkit_DIGen_AccessModifier", "")]);
        let local = source(&[("CQRSToolkit_DIGen_AccessModifier", " \t")]);
        let resolved = resolve_setting(Setting::AccessModifier, &build, &local);
        assert_eq!(resolved.value, "internal");
        assert_eq!(resolved.origin, Origin::Default);
    }

    #[test]
    fn test_values_are_trimmed() {
        let local = source(&[("CQRSToolkit_DIGen_Namespace", "  MyApp.Wiring ")]);
        let config = ResolvedConfig::resolve(&AnalyzerOptions::new(), &local);
        assert_eq!(config.namespace, "MyApp.Wiring");
    }

    #[test]
    fn test_local_namespace_reads_local_key() {
        let build = source(&[(
            "build_property.CQRSToolkit_DIGen_Namespace",
            "FromBuild",
        )]);
        let local = source(&[("CQRSToolkit_DIGen_Namespace", "FromLocal")]);
        let config = ResolvedConfig::resolve(&build, &local);
        assert_eq!(config.namespace, "FromLocal");
    }

    #[test]
    fn test_settings_resolve_independently() {
        let build = source(&[("build_property.CQRSToolkit_DIGen_ClassName", "Wiring")]);
        let local = source(&[("CQRSToolkit_DIGen_AccessModifier", "public")]);
        let origins: Vec<_> = resolve_all(&build, &local)
            .into_iter()
            .map(|r| (r.setting, r.origin))
            .collect();
        assert_eq!(
            origins,
            vec![
                (Setting::AccessModifier, Origin::Local),
                (Setting::ClassName, Origin::BuildWide),
                (Setting::Namespace, Origin::Default),
                (Setting::ParameterNames, Origin::Default),
                (Setting::RequireStatic, Origin::Default),
            ]
        );
    }

    #[test]
    fn test_plain_map_source() {
        let mut local = BTreeMap::new();
        local.insert(
            "CQRSToolkit_DIGen_ClassName".to_string(),
            "Registrations".to_string(),
        );
        let config = ResolvedConfig::resolve(&BTreeMap::<String, String>::new(), &local);
        assert_eq!(config.class_name, "Registrations");
    }

    #[test]
    fn test_insert_build_property() {
        let mut options = AnalyzerOptions::new();
        options.insert_build_property("CQRSToolkit_DIGen_ClassName", "A");
        options.insert_build_property("build_property.CQRSToolkit_DIGen_Namespace", "B");
        assert_eq!(
            options.get("build_property.CQRSToolkit_DIGen_ClassName"),
            Some("A")
        );
        assert_eq!(
            options.get("build_property.CQRSToolkit_DIGen_Namespace"),
            Some("B")
        );
    }

    #[test]
    fn test_validator_options() {
        let build = source(&[(
            "build_property.CQRSToolkit_DIGen_ParameterNames",
            "exact",
        )]);
        let local = source(&[("CQRSToolkit_DIGen_RequireStatic", "False")]);
        let options = resolve_validator_options(&build, &local);
        assert_eq!(options.parameter_names, NameMatching::Exact);
        assert!(!options.require_static);
    }

    #[test]
    fn test_accepts() {
        assert!(Setting::Namespace.accepts("BasicAPI.Wiring"));
        assert!(Setting::Namespace.accepts("_Internal.V2"));
        assert!(!Setting::Namespace.accepts("/tmp/escape/Evil"));
        assert!(!Setting::Namespace.accepts("BasicAPI..Wiring"));
        assert!(!Setting::Namespace.accepts("..\\Wiring"));
        assert!(Setting::ClassName.accepts("Registrations"));
        assert!(!Setting::ClassName.accepts("App.Registrations"));
        assert!(!Setting::ClassName.accepts("2Fast"));
        assert!(Setting::AccessModifier.accepts("public"));
        assert!(!Setting::AccessModifier.accepts("protected"));
        assert!(Setting::RequireStatic.accepts("FALSE"));
    }

    #[test]
    fn test_unusable_names_fall_back() {
        let local = source(&[
            ("CQRSToolkit_DIGen_Namespace", "/tmp/escape/Evil"),
            ("CQRSToolkit_DIGen_ClassName", "Wiring; class X"),
            ("CQRSToolkit_DIGen_AccessModifier", "private"),
        ]);
        let config = ResolvedConfig::resolve(&AnalyzerOptions::new(), &local);
        assert_eq!(config, ResolvedConfig::default());

        let resolved = resolve_setting(Setting::Namespace, &AnalyzerOptions::new(), &local);
        assert_eq!(resolved.origin, Origin::Default);
    }

    #[test]
    fn test_unusable_local_keeps_build_wide() {
        let build = source(&[(
            "build_property.CQRSToolkit_DIGen_Namespace",
            "App.Wiring",
        )]);
        let local = source(&[("CQRSToolkit_DIGen_Namespace", "../Wiring")]);
        let resolved = resolve_setting(Setting::Namespace, &build, &local);
        assert_eq!(resolved.value, "App.Wiring");
        assert_eq!(resolved.origin, Origin::BuildWide);
    }

    #[test]
    fn test_validator_options_ignore_garbage() {
        let local = source(&[
            ("CQRSToolkit_DIGen_ParameterNames", "sometimes"),
            ("CQRSToolkit_DIGen_RequireStatic", "maybe"),
        ]);
        let options = resolve_validator_options(&AnalyzerOptions::new(), &local);
        assert_eq!(options, ValidatorOptions::default());
    }
}

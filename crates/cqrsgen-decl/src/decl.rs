//! Declaration snapshot types.
//!
//! A [`DeclarationSet`] is what the host compiler front end exports for one
//! generation pass: every type declaration that might be a handler, every
//! method declaration that might be an extension point, and the analyzer
//! options bag the configuration resolver reads from.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::AnalyzerOptions;
use crate::shape::strip_global_alias;

fn is_false(value: &bool) -> bool {
    !*value
}

/// Declared accessibility of a type or member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Accessibility {
    Public,
    Internal,
    Protected,
    /// `private protected`: protected and internal.
    PrivateProtected,
    /// `protected internal`: protected or internal.
    ProtectedInternal,
    Private,
}

impl Accessibility {
    /// Returns the source keyword(s) for this accessibility.
    pub fn as_str(&self) -> &'static str {
        match self {
            Accessibility::Public => "public",
            Accessibility::Internal => "internal",
            Accessibility::Protected => "protected",
            Accessibility::PrivateProtected => "private protected",
            Accessibility::ProtectedInternal => "protected internal",
            Accessibility::Private => "private",
        }
    }

    /// Returns true for any of the three protected variants.
    pub fn is_protected(&self) -> bool {
        matches!(
            self,
            Accessibility::Protected
                | Accessibility::PrivateProtected
                | Accessibility::ProtectedInternal
        )
    }

    /// Keyword written in front of a completed method.
    ///
    /// Only `public`, `internal` and `private` are restated; anything else
    /// emits no keyword.
    pub fn method_keyword(&self) -> &'static str {
        match self {
            Accessibility::Public => "public",
            Accessibility::Internal => "internal",
            Accessibility::Private => "private",
            _ => "",
        }
    }

    /// Keyword written in front of a completed class declaration.
    pub fn type_keyword(&self) -> &'static str {
        match self {
            Accessibility::Public => "public",
            Accessibility::Internal => "internal",
            _ => "",
        }
    }
}

impl fmt::Display for Accessibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A position in a host source file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

impl SourceLocation {
    pub fn new(file: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({},{})", self.file, self.line, self.column)
    }
}

/// A closed generic interface a type implements, e.g.
/// `CQRSToolkit.IQueryHandler<GetDudeQuery, Dude>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConstructedInterface {
    /// Fully qualified generic definition name.
    pub definition: String,
    /// Concrete type arguments, in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_arguments: Vec<String>,
}

impl ConstructedInterface {
    pub fn new<I, S>(definition: impl Into<String>, type_arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            definition: definition.into(),
            type_arguments: type_arguments.into_iter().map(Into::into).collect(),
        }
    }

    /// Definition name without any generic suffix or `global::` qualifier.
    ///
    /// Hosts may export the definition as `IQueryHandler`, `IQueryHandler`2`
    /// or `IQueryHandler<TQuery, TResponse>`; all three name the same
    /// definition.
    pub fn definition_name(&self) -> &str {
        let name = strip_global_alias(&self.definition);
        let end = name.find(['<', '`']).unwrap_or(name.len());
        name[..end].trim()
    }

    pub fn arity(&self) -> usize {
        self.type_arguments.len()
    }
}

impl fmt::Display for ConstructedInterface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.definition_name())?;
        if !self.type_arguments.is_empty() {
            write!(f, "<{}>", self.type_arguments.join(", "))?;
        }
        Ok(())
    }
}

/// A type declaration considered by the handler scanner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeCandidate {
    /// Fully qualified type name, as it should appear in emitted code.
    pub name: String,
    pub accessibility: Accessibility,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_value_type: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_abstract: bool,
    /// Open generic definition such as `Handler<T>`.
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_unbound_generic: bool,
    /// All implemented interfaces, in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<ConstructedInterface>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceLocation>,
}

impl TypeCandidate {
    /// A public, concrete, closed class with no interfaces yet.
    pub fn class(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            accessibility: Accessibility::Public,
            is_value_type: false,
            is_abstract: false,
            is_unbound_generic: false,
            interfaces: Vec::new(),
            location: None,
        }
    }

    pub fn with_accessibility(mut self, accessibility: Accessibility) -> Self {
        self.accessibility = accessibility;
        self
    }

    pub fn implementing(mut self, interface: ConstructedInterface) -> Self {
        self.interfaces.push(interface);
        self
    }

    pub fn value_type(mut self) -> Self {
        self.is_value_type = true;
        self
    }

    pub fn abstract_type(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn unbound_generic(mut self) -> Self {
        self.is_unbound_generic = true;
        self
    }

    pub fn at(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// Whether the scanner looks at this type's interfaces at all.
    pub fn is_eligible(&self) -> bool {
        !self.is_value_type
            && !self.is_abstract
            && !self.is_unbound_generic
            && !self.interfaces.is_empty()
    }
}

/// A single method parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Parameter {
    pub name: String,
    /// Fully qualified declared type.
    #[serde(rename = "type")]
    pub ty: String,
    /// Whether the declaration supplies an explicit default value.
    #[serde(default, skip_serializing_if = "is_false")]
    pub has_default: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceLocation>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            has_default: false,
            location: None,
        }
    }

    pub fn with_default(mut self) -> Self {
        self.has_default = true;
        self
    }

    pub fn at(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }
}

/// Completeness of a method declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Completeness {
    /// Partial forward declaration only; no fragment has a body.
    #[default]
    Declaration,
    /// Bodiless but not declared `partial`, e.g. `abstract` or `extern`.
    NotPartial,
    /// The marked fragment itself has a body.
    Implemented,
    /// The marked fragment is bodiless but another fragment supplies a body.
    SeparateImplementation {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        location: Option<SourceLocation>,
    },
}

/// Whether a method carries the extension-point marker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodRole {
    #[default]
    Ordinary,
    ExtensionPoint,
}

impl MethodRole {
    fn is_ordinary(&self) -> bool {
        *self == MethodRole::Ordinary
    }
}

/// The type a method is declared in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContainingType {
    /// Simple (unqualified) type name.
    pub name: String,
    pub accessibility: Accessibility,
}

/// A method declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MethodDecl {
    pub name: String,
    #[serde(default, skip_serializing_if = "MethodRole::is_ordinary")]
    pub role: MethodRole,
    pub accessibility: Accessibility,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_static: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_virtual: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_abstract: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_async: bool,
    /// First parameter carries the `this` modifier.
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_extension: bool,
    #[serde(default)]
    pub completeness: Completeness,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    /// Fully qualified declared return type.
    pub return_type: String,
    pub containing_type: ContainingType,
    /// Enclosing namespace; empty for the global namespace.
    #[serde(default)]
    pub namespace: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceLocation>,
}

impl MethodDecl {
    /// Creates a builder for a method declared in `containing_type`.
    pub fn builder(
        name: impl Into<String>,
        containing_type: impl Into<String>,
    ) -> MethodDeclBuilder {
        MethodDeclBuilder::new(name, containing_type)
    }

    pub fn is_extension_point(&self) -> bool {
        self.role == MethodRole::ExtensionPoint
    }

    /// `Namespace.Type.Method`, dropping the namespace when global.
    pub fn qualified_name(&self) -> String {
        if self.namespace.is_empty() {
            format!("{}.{}", self.containing_type.name, self.name)
        } else {
            format!(
                "{}.{}.{}",
                self.namespace, self.containing_type.name, self.name
            )
        }
    }
}

/// Builder for [`MethodDecl`].
///
/// Starts from a public, non-static, bodiless `void` method in a public type
/// in the global namespace.
#[derive(Debug, Clone)]
pub struct MethodDeclBuilder {
    decl: MethodDecl,
}

impl MethodDeclBuilder {
    pub fn new(name: impl Into<String>, containing_type: impl Into<String>) -> Self {
        Self {
            decl: MethodDecl {
                name: name.into(),
                role: MethodRole::Ordinary,
                accessibility: Accessibility::Public,
                is_static: false,
                is_virtual: false,
                is_abstract: false,
                is_async: false,
                is_extension: false,
                completeness: Completeness::Declaration,
                parameters: Vec::new(),
                return_type: "void".to_string(),
                containing_type: ContainingType {
                    name: containing_type.into(),
                    accessibility: Accessibility::Public,
                },
                namespace: String::new(),
                location: None,
            },
        }
    }

    /// Marks the method as an extension point.
    pub fn extension_point(mut self) -> Self {
        self.decl.role = MethodRole::ExtensionPoint;
        self
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.decl.namespace = namespace.into();
        self
    }

    pub fn accessibility(mut self, accessibility: Accessibility) -> Self {
        self.decl.accessibility = accessibility;
        self
    }

    pub fn containing_accessibility(mut self, accessibility: Accessibility) -> Self {
        self.decl.containing_type.accessibility = accessibility;
        self
    }

    pub fn is_static(mut self, value: bool) -> Self {
        self.decl.is_static = value;
        self
    }

    pub fn is_extension(mut self, value: bool) -> Self {
        self.decl.is_extension = value;
        self
    }

    pub fn is_virtual(mut self, value: bool) -> Self {
        self.decl.is_virtual = value;
        self
    }

    pub fn is_abstract(mut self, value: bool) -> Self {
        self.decl.is_abstract = value;
        self
    }

    pub fn is_async(mut self, value: bool) -> Self {
        self.decl.is_async = value;
        self
    }

    pub fn completeness(mut self, completeness: Completeness) -> Self {
        self.decl.completeness = completeness;
        self
    }

    pub fn parameter(mut self, parameter: Parameter) -> Self {
        self.decl.parameters.push(parameter);
        self
    }

    pub fn return_type(mut self, return_type: impl Into<String>) -> Self {
        self.decl.return_type = return_type.into();
        self
    }

    pub fn location(mut self, location: SourceLocation) -> Self {
        self.decl.location = Some(location);
        self
    }

    pub fn build(self) -> MethodDecl {
        self.decl
    }
}

/// Everything one generation pass reads from the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeclarationSet {
    #[serde(default)]
    pub types: Vec<TypeCandidate>,
    #[serde(default)]
    pub methods: Vec<MethodDecl>,
    /// Analyzer options bag, holding both build-wide and local keys.
    #[serde(default, skip_serializing_if = "AnalyzerOptions::is_empty")]
    pub options: AnalyzerOptions,
}

impl DeclarationSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, candidate: TypeCandidate) -> Self {
        self.types.push(candidate);
        self
    }

    pub fn with_method(mut self, method: MethodDecl) -> Self {
        self.methods.push(method);
        self
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key, value);
        self
    }

    /// Parses a snapshot from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Methods carrying the extension-point marker, in declaration order.
    pub fn extension_points(&self) -> impl Iterator<Item = &MethodDecl> {
        self.methods.iter().filter(|m| m.is_extension_point())
    }
}

//! cqrsgen declaration library
//!
//! This crate holds everything a generation pass needs before any code is
//! written: the declaration snapshot model exported by the host compiler,
//! handler discovery, extension point validation, and settings resolution.
//!
//! # Example
//!
//! ```
//! use cqrsgen_decl::{
//!     scan_types, validate_extension_points, ConstructedInterface, DeclarationSet,
//!     TypeCandidate, ValidatorOptions,
//! };
//!
//! let decls = DeclarationSet::new().with_type(
//!     TypeCandidate::class("BasicAPI.GetDudeQueryHandler").implementing(
//!         ConstructedInterface::new(
//!             "CQRSToolkit.IQueryHandler",
//!             ["BasicAPI.GetDudeQuery", "BasicAPI.Models.Dude"],
//!         ),
//!     ),
//! );
//!
//! let stubs = scan_types(&decls.types);
//! assert_eq!(stubs.len(), 1);
//!
//! let report = validate_extension_points(&decls.methods, &ValidatorOptions::default());
//! assert!(report.extension_points.is_empty());
//! ```
//!
//! # Modules
//!
//! - [`decl`]: Snapshot types (types, methods, parameters, locations)
//! - [`shape`]: The three handler shapes and well-known host names
//! - [`scan`]: Handler discovery
//! - [`validation`]: Extension point rule chain
//! - [`config`]: Settings keys and two-source resolution
//! - [`error`]: Diagnostic codes and error types
//! - [`hash`]: BLAKE3 hashing

pub mod config;
pub mod decl;
pub mod error;
pub mod hash;
pub mod scan;
pub mod shape;
pub mod validation;

pub use config::{
    resolve_all, resolve_setting, resolve_validator_options, AnalyzerOptions, ConfigSource, Origin,
    ResolvedConfig, ResolvedValue, Setting,
};
pub use decl::{
    Accessibility, Completeness, ConstructedInterface, ContainingType, DeclarationSet, MethodDecl,
    MethodDeclBuilder, MethodRole, Parameter, SourceLocation, TypeCandidate,
};
pub use error::{DeclError, Diagnostic, DiagnosticCode, Severity, DIAGNOSTIC_CATEGORY};
pub use hash::{content_hash, declaration_hash};
pub use scan::{scan_types, InjectionStub};
pub use shape::{
    HandlerShape, DEFAULT_LIFETIME, MARKER_ATTRIBUTE, SERVICE_COLLECTION_TYPE,
    SERVICE_DESCRIPTOR_TYPE, SERVICE_LIFETIME_TYPE,
};
pub use validation::{
    validate_extension_points, validate_method, ExtensionPoint, NameMatching, ValidationReport,
    ValidatorOptions, LIFETIME_PARAMETER_NAME, SERVICES_PARAMETER_NAME,
};

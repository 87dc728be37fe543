//! Declaration snapshot fixtures.
//!
//! [`basic_api`] mirrors a small ASP.NET sample: two handlers, three
//! non-handler CQRS types, a model, and a controller.

use std::fs;
use std::path::{Path, PathBuf};

use cqrsgen_decl::{
    Accessibility, ConstructedInterface, DeclarationSet, MethodDecl, Parameter, SourceLocation,
    TypeCandidate, SERVICE_COLLECTION_TYPE, SERVICE_LIFETIME_TYPE,
};
use tempfile::TempDir;

pub const QUERY_HANDLER: &str = "CQRSToolkit.IQueryHandler";
pub const COMMAND_HANDLER: &str = "CQRSToolkit.ICommandHandler";
pub const COMMAND_RESPONSE_HANDLER: &str = "CQRSToolkit.ICommandResponseHandler";

/// Handler and non-handler types of the BasicAPI sample, in source order.
pub fn basic_api_types() -> Vec<TypeCandidate> {
    vec![
        TypeCandidate::class("BasicAPI.Controllers.DudeController")
            .implementing(ConstructedInterface::new(
                "Microsoft.AspNetCore.Mvc.IActionFilter",
                Vec::<String>::new(),
            ))
            .at(SourceLocation::new("Controllers/DudeController.cs", 15, 18)),
        TypeCandidate::class("BasicAPI.Features.Commands.SetDudeCommand")
            .implementing(ConstructedInterface::new(
                "CQRSToolkit.ICommand",
                ["BasicAPI.Models.SetDude"],
            ))
            .at(SourceLocation::new(
                "Features/Commands/SetDudeCommand.cs",
                5,
                18,
            )),
        TypeCandidate::class("BasicAPI.Features.Commands.SetDudeCommandHandler")
            .implementing(ConstructedInterface::new(
                COMMAND_HANDLER,
                ["BasicAPI.Features.Commands.SetDudeCommand"],
            ))
            .at(SourceLocation::new(
                "Features/Commands/SetDudeCommandHandler.cs",
                6,
                18,
            )),
        TypeCandidate::class("BasicAPI.Features.Queries.GetAllDudesQuery")
            .implementing(ConstructedInterface::new(
                "CQRSToolkit.IQuery",
                ["BasicAPI.Models.GetAllDudes", "BasicAPI.Models.Dude"],
            ))
            .at(SourceLocation::new(
                "Features/Queries/GetAllDudesQuery.cs",
                7,
                18,
            )),
        TypeCandidate::class("BasicAPI.Features.Queries.GetDudeQuery")
            .implementing(ConstructedInterface::new(
                "CQRSToolkit.IQuery",
                ["BasicAPI.Models.Dude"],
            ))
            .at(SourceLocation::new(
                "Features/Queries/GetDudeQuery.cs",
                7,
                18,
            )),
        TypeCandidate::class("BasicAPI.Features.Queries.GetDudeQueryHandler")
            .implementing(ConstructedInterface::new(
                QUERY_HANDLER,
                [
                    "BasicAPI.Features.Queries.GetDudeQuery",
                    "BasicAPI.Models.Dude",
                ],
            ))
            .at(SourceLocation::new(
                "Features/Queries/GetDudeQueryHandler.cs",
                7,
                18,
            )),
        TypeCandidate::class("BasicAPI.Models.Dude"),
    ]
}

/// A well-formed extension point: `static partial IServiceCollection
/// {method}(this IServiceCollection services, ServiceLifetime defaultLifetime)`.
pub fn valid_extension_point(namespace: &str, class_name: &str, method: &str) -> MethodDecl {
    MethodDecl::builder(method, class_name)
        .namespace(namespace)
        .extension_point()
        .is_static(true)
        .is_extension(true)
        .parameter(Parameter::new("services", SERVICE_COLLECTION_TYPE))
        .parameter(Parameter::new("defaultLifetime", SERVICE_LIFETIME_TYPE))
        .return_type(SERVICE_COLLECTION_TYPE)
        .location(SourceLocation::new("BasicAPIServiceExtensions.cs", 10, 5))
        .build()
}

/// The BasicAPI sample with no extension point declared.
pub fn basic_api() -> DeclarationSet {
    basic_api_types()
        .into_iter()
        .fold(DeclarationSet::new(), DeclarationSet::with_type)
}

/// The BasicAPI sample declaring `BasicApiServiceExtensions.AddCqrs`.
pub fn basic_api_with_extension_point() -> DeclarationSet {
    basic_api().with_method(valid_extension_point(
        "BasicAPI",
        "BasicApiServiceExtensions",
        "AddCqrs",
    ))
}

/// A non-marked helper method that must never be validated.
pub fn ordinary_method() -> MethodDecl {
    MethodDecl::builder("Configure", "Startup")
        .namespace("BasicAPI")
        .accessibility(Accessibility::Private)
        .build()
}

/// A temporary project directory holding a snapshot and optional settings.
pub struct SnapshotFixture {
    pub root: TempDir,
}

impl SnapshotFixture {
    /// Create a project with `decls` written to `decls.json`.
    pub fn new(decls: &DeclarationSet) -> Self {
        let root = TempDir::new().expect("Failed to create temp dir");
        let fixture = Self { root };
        let json = decls
        .to_json_pretty()
        .expect("Failed to serialize snapshot");
        fs::write(fixture.decls_path(), json).expect("Failed to write snapshot");
        fixture
    }

    /// Get the project root path.
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    pub fn decls_path(&self) -> PathBuf {
        self.path().join("decls.json")
    }

    pub fn out_dir(&self) -> PathBuf {
        self.path().join("generated")
    }

    /// Write a local settings file and return its path.
    pub fn write_settings(&self, content: &str) -> PathBuf {
        let path = self.path().join("cqrsgen.toml");
        fs::write(&path, content).expect("Failed to write settings file");
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cqrsgen_decl::scan_types;

    #[test]
    fn test_basic_api_has_two_handlers() {
        let stubs = scan_types(&basic_api().types);
        assert_eq!(stubs.len(), 2);
        assert_eq!(
            stubs[0].implementation,
            "BasicAPI.Features.Commands.SetDudeCommandHandler"
        );
    }

    #[test]
    fn test_snapshot_fixture_round_trips() {
        let fixture = SnapshotFixture::new(&basic_api_with_extension_point());
        let content = fs::read_to_string(fixture.decls_path()).unwrap();
        let decls = DeclarationSet::from_json(&content).unwrap();
        assert_eq!(decls, basic_api_with_extension_point());
    }
}

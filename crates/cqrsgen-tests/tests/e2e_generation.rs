//! End-to-End Generation Tests for cqrsgen
//!
//! Tests verify:
//! - Golden output for synthesized and completed extension methods
//! - Completion takes precedence over synthesis
//! - Settings precedence between build-wide and local sources
//! - Scanner filtering through a whole pass
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p cqrsgen-tests --test e2e_generation
//! ```

use cqrsgen_csharp::{generate, generate_snapshot, UnitKind, SYNTHESIZED_METHOD_NAME};
use cqrsgen_decl::{
    AnalyzerOptions, ConstructedInterface, DeclarationSet, HandlerShape, Parameter, TypeCandidate,
};
use cqrsgen_tests::fixtures::{
    basic_api, basic_api_with_extension_point, ordinary_method, valid_extension_point,
    COMMAND_HANDLER, COMMAND_RESPONSE_HANDLER, QUERY_HANDLER,
};
use pretty_assertions::assert_eq;

// ============================================================================
// Golden Output
// ============================================================================

const SYNTHESIZED_GOLDEN: &str = "\
// <auto-generated/>
#nullable enable

namespace CQRSToolkit.DependencyInjection
{
    internal static class CQRSServiceExtensions
    {
        internal static global::Microsoft.Extensions.DependencyInjection.IServiceCollection AddGenerated(this global::Microsoft.Extensions.DependencyInjection.IServiceCollection services, global::Microsoft.Extensions.DependencyInjection.ServiceLifetime defaultLifetime = global::Microsoft.Extensions.DependencyInjection.ServiceLifetime.Transient)
        {
            services.Add(new global::Microsoft.Extensions.DependencyInjection.ServiceDescriptor(typeof(CQRSToolkit.ICommandHandler<BasicAPI.Features.Commands.SetDudeCommand>), typeof(BasicAPI.Features.Commands.SetDudeCommandHandler), defaultLifetime));
            services.Add(new global::Microsoft.Extensions.DependencyInjection.ServiceDescriptor(typeof(CQRSToolkit.IQueryHandler<BasicAPI.Features.Queries.GetDudeQuery, BasicAPI.Models.Dude>), typeof(BasicAPI.Features.Queries.GetDudeQueryHandler), defaultLifetime));
            return services;
        }
    }
}
";

const COMPLETION_GOLDEN: &str = "\
// <auto-generated/>
#nullable enable

namespace BasicAPI
{
    public static partial class BasicApiServiceExtensions
    {
        public static partial global::Microsoft.Extensions.DependencyInjection.IServiceCollection AddCqrs(this global::Microsoft.Extensions.DependencyInjection.IServiceCollection services, global::Microsoft.Extensions.DependencyInjection.ServiceLifetime defaultLifetime = global::Microsoft.Extensions.DependencyInjection.ServiceLifetime.Transient)
        {
            services.Add(new global::Microsoft.Extensions.DependencyInjection.ServiceDescriptor(typeof(CQRSToolkit.ICommandHandler<BasicAPI.Features.Commands.SetDudeCommand>), typeof(BasicAPI.Features.Commands.SetDudeCommandHandler), defaultLifetime));
            services.Add(new global::Microsoft.Extensions.DependencyInjection.ServiceDescriptor(typeof(CQRSToolkit.IQueryHandler<BasicAPI.Features.Queries.GetDudeQuery, BasicAPI.Models.Dude>), typeof(BasicAPI.Features.Queries.GetDudeQueryHandler), defaultLifetime));
            return services;
        }
    }
}
";

#[test]
fn test_basic_api_synthesized_golden() {
    let outcome = generate_snapshot(&basic_api()).unwrap();
    assert!(outcome.diagnostics().is_empty());

    let unit = outcome.unit.expect("handlers were found");
    assert_eq!(unit.kind, UnitKind::Synthesized);
    assert_eq!(
        unit.hint_name,
        "CQRSToolkit.DependencyInjection.CQRSServiceExtensions.AddGenerated.g.cs"
    );
    assert_eq!(unit.source, SYNTHESIZED_GOLDEN);
}

#[test]
fn test_basic_api_completion_golden() {
    let outcome = generate_snapshot(&basic_api_with_extension_point()).unwrap();
    assert!(outcome.diagnostics().is_empty());
    assert_eq!(outcome.validation.extension_points.len(), 1);

    let unit = outcome.unit.expect("handlers were found");
    assert_eq!(unit.kind, UnitKind::Completion);
    assert_eq!(
        unit.hint_name,
        "BasicAPI.BasicApiServiceExtensions.AddCqrs.g.cs"
    );
    assert_eq!(unit.source, COMPLETION_GOLDEN);
}

// ============================================================================
// Unit Selection
// ============================================================================

#[test]
fn test_completion_suppresses_synthesis() {
    let decls = basic_api_with_extension_point()
        .with_option("CQRSToolkit_DIGen_ClassName", "NeverUsed")
        .with_option("CQRSToolkit_DIGen_Namespace", "Never.Used");
    let unit = generate_snapshot(&decls).unwrap().unit.unwrap();

    assert_eq!(unit.kind, UnitKind::Completion);
    assert!(!unit.source.contains(SYNTHESIZED_METHOD_NAME));
    assert!(!unit.source.contains("NeverUsed"));
    assert!(!unit.source.contains("Never.Used"));
}

#[test]
fn test_declared_default_is_not_restated() {
    let mut point = valid_extension_point("BasicAPI", "BasicApiServiceExtensions", "AddCqrs");
    point.parameters[1] = point.parameters[1].clone().with_default();
    let unit = generate_snapshot(&basic_api().with_method(point))
        .unwrap()
        .unit
        .unwrap();

    assert!(unit.source.contains(
        "global::Microsoft.Extensions.DependencyInjection.ServiceLifetime defaultLifetime)"
    ));
    assert!(!unit.source.contains(" = global::"));
}

#[test]
fn test_multiple_extension_points_share_one_unit() {
    let decls = basic_api()
        .with_method(valid_extension_point(
            "BasicAPI",
            "ApiExtensions",
            "AddCqrs",
        ))
        .with_method(ordinary_method())
        .with_method(valid_extension_point(
            "BasicAPI.Admin",
            "AdminExtensions",
            "AddAdminCqrs",
        ));
    let outcome = generate_snapshot(&decls).unwrap();
    let unit = outcome.unit.unwrap();

    assert_eq!(unit.kind, UnitKind::Completion);
    assert_eq!(unit.hint_name, "BasicAPI.ApiExtensions.AddCqrs.g.cs");
    assert!(unit.source.contains("namespace BasicAPI\n"));
    assert!(unit.source.contains("namespace BasicAPI.Admin\n"));
    assert_eq!(
        unit.source
            .matches("typeof(BasicAPI.Features.Queries.GetDudeQueryHandler)")
            .count(),
        2
    );
}

#[test]
fn test_no_handlers_is_a_no_op() {
    let decls = DeclarationSet::new()
        .with_type(TypeCandidate::class("BasicAPI.Models.Dude"))
        .with_method(valid_extension_point("BasicAPI", "Ext", "AddCqrs"));
    let outcome = generate_snapshot(&decls).unwrap();

    assert!(outcome.stubs.is_empty());
    assert!(outcome.unit.is_none());
    assert!(outcome.diagnostics().is_empty());
}

// ============================================================================
// Scanner Through The Pass
// ============================================================================

#[test]
fn test_all_three_shapes_registered() {
    let decls = DeclarationSet::new()
        .with_type(
            TypeCandidate::class("App.Combined")
                .implementing(ConstructedInterface::new(QUERY_HANDLER, ["App.Q", "App.R"]))
                .implementing(ConstructedInterface::new(
                    "System.IDisposable",
                    Vec::<String>::new(),
                ))
                .implementing(ConstructedInterface::new(COMMAND_HANDLER, ["App.C"])),
        )
        .with_type(
            TypeCandidate::class("App.CreateHandler").implementing(ConstructedInterface::new(
                COMMAND_RESPONSE_HANDLER,
                ["App.Create", "App.Created"],
            )),
        );
    let outcome = generate_snapshot(&decls).unwrap();

    let shapes: Vec<HandlerShape> = outcome.stubs.iter().map(|s| s.shape).collect();
    assert_eq!(
        shapes,
        vec![
            HandlerShape::QueryHandler,
            HandlerShape::CommandHandler,
            HandlerShape::CommandResponseHandler,
        ]
    );
    let source = outcome.unit.unwrap().source;
    assert!(source.contains(
        "typeof(CQRSToolkit.ICommandResponseHandler<App.Create, App.Created>), typeof(App.CreateHandler)"
    ));
    assert!(!source.contains("IDisposable"));
}

#[test]
fn test_ineligible_types_are_skipped() {
    let handler = |name: &str| {
        TypeCandidate::class(name)
            .implementing(ConstructedInterface::new(COMMAND_HANDLER, ["App.C"]))
    };
    let decls = DeclarationSet::new()
        .with_type(handler("App.AbstractHandler").abstract_type())
        .with_type(handler("App.StructHandler").value_type())
        .with_type(handler("App.GenericHandler<T>").unbound_generic())
        .with_type(handler("App.RealHandler"));
    let outcome = generate_snapshot(&decls).unwrap();

    assert_eq!(outcome.stubs.len(), 1);
    assert_eq!(outcome.stubs[0].implementation, "App.RealHandler");
}

#[test]
fn test_arity_mismatch_is_not_a_handler() {
    let decls = DeclarationSet::new().with_type(
        TypeCandidate::class("App.Odd")
            .implementing(ConstructedInterface::new(QUERY_HANDLER, ["App.OnlyOne"])),
    );
    assert!(generate_snapshot(&decls).unwrap().unit.is_none());
}

// ============================================================================
// Settings Precedence
// ============================================================================

#[test]
fn test_local_settings_override_build_wide() {
    let build: AnalyzerOptions = [
        ("build_property.CQRSToolkit_DIGen_Namespace", "Build.Namespace"),
        ("build_property.CQRSToolkit_DIGen_ClassName", "BuildClass"),
    ]
    .into_iter()
    .collect();
    let local: AnalyzerOptions = [
        ("CQRSToolkit_DIGen_Namespace", "Local.Namespace"),
        ("CQRSToolkit_DIGen_AccessModifier", "public"),
    ]
    .into_iter()
    .collect();

    let outcome = generate(&basic_api(), &build, &local).unwrap();
    assert_eq!(outcome.config.namespace, "Local.Namespace");
    assert_eq!(outcome.config.class_name, "BuildClass");
    assert_eq!(outcome.config.access_modifier, "public");

    let unit = outcome.unit.unwrap();
    assert_eq!(
        unit.hint_name,
        "Local.Namespace.BuildClass.AddGenerated.g.cs"
    );
    assert!(unit.source.contains("namespace Local.Namespace\n"));
    assert!(unit.source.contains("    public static class BuildClass\n"));
    assert!(unit.source.contains("        public static global::"));
}

#[test]
fn test_blank_settings_fall_back() {
    let local: AnalyzerOptions = [("CQRSToolkit_DIGen_ClassName", "   ")].into_iter().collect();
    let outcome = generate(&basic_api(), &AnalyzerOptions::new(), &local).unwrap();
    assert_eq!(outcome.config.class_name, "CQRSServiceExtensions");
}

#[test]
fn test_global_prefixed_extension_point_types() {
    let point = cqrsgen_decl::MethodDecl::builder("AddCqrs", "Ext")
        .namespace("BasicAPI")
        .extension_point()
        .is_static(true)
        .is_extension(true)
        .parameter(Parameter::new(
            "services",
            "global::Microsoft.Extensions.DependencyInjection.IServiceCollection",
        ))
        .parameter(Parameter::new(
            "defaultLifetime",
            "global::Microsoft.Extensions.DependencyInjection.ServiceLifetime",
        ))
        .return_type("global::Microsoft.Extensions.DependencyInjection.IServiceCollection")
        .build();
    let outcome = generate_snapshot(&basic_api().with_method(point)).unwrap();

    assert!(outcome.diagnostics().is_empty());
    assert_eq!(outcome.unit.unwrap().kind, UnitKind::Completion);
}

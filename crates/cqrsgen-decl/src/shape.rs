//! Recognized handler shapes and the host identifiers generated code refers to.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::decl::ConstructedInterface;

/// Registry collection type; receiver and return type of every extension point.
pub const SERVICE_COLLECTION_TYPE: &str =
    "Microsoft.Extensions.DependencyInjection.IServiceCollection";

/// Lifetime enum type; second parameter of every extension point.
pub const SERVICE_LIFETIME_TYPE: &str = "Microsoft.Extensions.DependencyInjection.ServiceLifetime";

/// Registration record added to the collection for each stub.
pub const SERVICE_DESCRIPTOR_TYPE: &str =
    "Microsoft.Extensions.DependencyInjection.ServiceDescriptor";

/// Lifetime used when the caller does not pass one.
pub const DEFAULT_LIFETIME: &str =
    "Microsoft.Extensions.DependencyInjection.ServiceLifetime.Transient";

/// Attribute the host maps to [`MethodRole::ExtensionPoint`](crate::MethodRole).
pub const MARKER_ATTRIBUTE: &str = "ServiceInjectionPointAttribute";

/// Strips surrounding whitespace and a leading `global::` alias qualifier.
pub(crate) fn strip_global_alias(name: &str) -> &str {
    let name = name.trim();
    name.strip_prefix("global::").unwrap_or(name)
}

/// One of the three handler interface contracts the scanner registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandlerShape {
    /// `IQueryHandler<TQuery, TResponse>`
    QueryHandler,
    /// `ICommandHandler<TCommand>`
    CommandHandler,
    /// `ICommandResponseHandler<TCommand, TResponse>`
    CommandResponseHandler,
}

impl HandlerShape {
    pub const ALL: [HandlerShape; 3] = [
        HandlerShape::QueryHandler,
        HandlerShape::CommandHandler,
        HandlerShape::CommandResponseHandler,
    ];

    /// Fully qualified generic definition name.
    pub fn definition(&self) -> &'static str {
        match self {
            HandlerShape::QueryHandler => "CQRSToolkit.IQueryHandler",
            HandlerShape::CommandHandler => "CQRSToolkit.ICommandHandler",
            HandlerShape::CommandResponseHandler => "CQRSToolkit.ICommandResponseHandler",
        }
    }

    /// Number of generic type parameters.
    pub fn arity(&self) -> usize {
        match self {
            HandlerShape::QueryHandler => 2,
            HandlerShape::CommandHandler => 1,
            HandlerShape::CommandResponseHandler => 2,
        }
    }

    /// Open signature, e.g. `CQRSToolkit.ICommandHandler<TCommand>`.
    pub fn signature(&self) -> &'static str {
        match self {
            HandlerShape::QueryHandler => "CQRSToolkit.IQueryHandler<TQuery, TResponse>",
            HandlerShape::CommandHandler => "CQRSToolkit.ICommandHandler<TCommand>",
            HandlerShape::CommandResponseHandler => {
                "CQRSToolkit.ICommandResponseHandler<TCommand, TResponse>"
            }
        }
    }

    /// Matches on definition identity; concrete type arguments are ignored.
    pub fn matches(&self, interface: &ConstructedInterface) -> bool {
        interface.definition_name() == self.definition() && interface.arity() == self.arity()
    }

    /// Returns the shape `interface` is constructed from, if any.
    pub fn of(interface: &ConstructedInterface) -> Option<HandlerShape> {
        Self::ALL.into_iter().find(|shape| shape.matches(interface))
    }
}

impl fmt::Display for HandlerShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.signature())
    }
}

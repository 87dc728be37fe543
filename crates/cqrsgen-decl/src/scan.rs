//! Handler discovery.

use serde::{Deserialize, Serialize};

use crate::decl::{ConstructedInterface, TypeCandidate};
use crate::shape::HandlerShape;

/// One registration to emit: a handler interface bound to its implementation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InjectionStub {
    pub shape: HandlerShape,
    /// The closed interface as declared on the implementation.
    pub interface: ConstructedInterface,
    /// Fully qualified implementation type name.
    pub implementation: String,
}

impl InjectionStub {
    /// Service type as written in `typeof(...)`.
    pub fn service_type(&self) -> String {
        self.interface.to_string()
    }
}

/// Scans `types` for handler implementations.
///
/// Stubs come out in declaration order: types in the order given, and within
/// a type its interfaces in the order declared. A type implementing several
/// handler shapes yields one stub per matching interface.
pub fn scan_types(types: &[TypeCandidate]) -> Vec<InjectionStub> {
    let mut stubs = Vec::new();

    for candidate in types {
        if !candidate.is_eligible() {
            tracing::trace!(ty = %candidate.name, "skipping ineligible type");
            continue;
        }

        for interface in &candidate.interfaces {
            if let Some(shape) = HandlerShape::of(interface) {
                tracing::debug!(
                    implementation = %candidate.name,
                    interface = %interface,
                    "found handler"
                );
                stubs.push(InjectionStub {
                    shape,
                    interface: interface.clone(),
                    implementation: candidate.name.clone(),
                });
            }
        }
    }

    stubs
}

//! Output unit selection.
//!
//! A pass produces at most one unit. With no stubs there is nothing to
//! register and nothing is produced. Otherwise any valid extension point wins
//! outright: every one of them is completed and no method is synthesized.
//! Only when none exist is `AddGenerated` synthesized from the resolved
//! settings.

use serde::{Deserialize, Serialize};

use cqrsgen_decl::{content_hash, ExtensionPoint, InjectionStub, ResolvedConfig};

use crate::error::EmitResult;
use crate::render;

/// Name of the method synthesized when no extension point is declared.
pub const SYNTHESIZED_METHOD_NAME: &str = "AddGenerated";

/// How a unit's method came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    /// Completes user-declared extension points.
    Completion,
    /// Declares a new extension class.
    Synthesized,
}

impl UnitKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitKind::Completion => "completion",
            UnitKind::Synthesized => "synthesized",
        }
    }
}

/// One generated source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputUnit {
    /// File name handed to the host, e.g. `BasicAPI.Ext.AddCqrs.g.cs`.
    pub hint_name: String,
    pub kind: UnitKind,
    pub source: String,
}

impl OutputUnit {
    /// BLAKE3 hash of the rendered source.
    pub fn source_hash(&self) -> String {
        content_hash(self.source.as_bytes())
    }
}

/// `{namespace}.{class}.{method}.g.cs`, without the namespace when global.
pub fn hint_name(namespace: &str, class_name: &str, method_name: &str) -> String {
    if namespace.is_empty() {
        format!("{}.{}.g.cs", class_name, method_name)
    } else {
        format!("{}.{}.{}.g.cs", namespace, class_name, method_name)
    }
}

/// Renders the unit for one pass.
///
/// # Arguments
/// * `stubs` - Registrations in discovery order
/// * `points` - Valid extension points in declaration order
/// * `config` - Names used only when `points` is empty
///
/// # Returns
/// `None` when `stubs` is empty, otherwise exactly one unit
pub fn emit(
    stubs: &[InjectionStub],
    points: &[ExtensionPoint],
    config: &ResolvedConfig,
) -> EmitResult<Option<OutputUnit>> {
    if stubs.is_empty() {
        return Ok(None);
    }

    let unit = match points.first() {
        Some(first) => OutputUnit {
            hint_name: hint_name(&first.namespace, &first.class_name, &first.method_name),
            kind: UnitKind::Completion,
            source: render::completion_unit(points, stubs)?,
        },
        None => OutputUnit {
            hint_name: hint_name(
                &config.namespace,
                &config.class_name,
                SYNTHESIZED_METHOD_NAME,
            ),
            kind: UnitKind::Synthesized,
            source: render::synthesized_unit(config, SYNTHESIZED_METHOD_NAME, stubs)?,
        },
    };

    Ok(Some(unit))
}

//! cqrsgen C# Backend
//!
//! This crate turns a declaration snapshot into the C# source that registers
//! every discovered CQRS handler with `Microsoft.Extensions.DependencyInjection`.
//!
//! # Overview
//!
//! A pass has three stages:
//!
//! - **Scan** handler implementations into injection stubs
//! - **Validate** user-declared extension points
//! - **Emit** one unit: completions for the valid extension points, or a
//!   synthesized `AddGenerated` extension method when there are none
//!
//! # Determinism
//!
//! Rendering is a pure function of the snapshot and the two configuration
//! sources. Stubs keep discovery order, so the same input always produces
//! byte-identical source.
//!
//! # Example
//!
//! ```
//! use cqrsgen_csharp::{generate_snapshot, UnitKind};
//! use cqrsgen_decl::{ConstructedInterface, DeclarationSet, TypeCandidate};
//!
//! let decls = DeclarationSet::new().with_type(
//!     TypeCandidate::class("BasicAPI.SetDudeCommandHandler").implementing(
//!         ConstructedInterface::new("CQRSToolkit.ICommandHandler", ["BasicAPI.SetDudeCommand"]),
//!     ),
//! );
//!
//! let outcome = generate_snapshot(&decls).unwrap();
//! let unit = outcome.unit.unwrap();
//! assert_eq!(unit.kind, UnitKind::Synthesized);
//! assert!(unit.source.contains("AddGenerated"));
//! ```

pub mod emit;
pub mod error;
pub mod pass;
pub mod render;

pub use emit::{emit, hint_name, OutputUnit, UnitKind, SYNTHESIZED_METHOD_NAME};
pub use error::{EmitError, EmitResult};
pub use pass::{generate, generate_snapshot, PassOutcome};

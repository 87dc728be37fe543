//! cqrsgen End-to-End Test Infrastructure
//!
//! This crate provides integration tests for whole generation passes:
//!
//! - Generation: snapshot -> rendered unit (golden text)
//! - Validation: extension point diagnostics through the pass and the CLI
//! - **Determinism**: byte-identical units and equal diagnostics across runs
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p cqrsgen-tests
//! ```

pub mod determinism;
pub mod fixtures;

pub use determinism::{compute_hash, verify_determinism, DeterminismResult, DiffInfo};

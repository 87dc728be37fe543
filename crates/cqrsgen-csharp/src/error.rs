//! Error types for the C# backend.

use thiserror::Error;

/// Result type for emitter operations.
pub type EmitResult<T> = Result<T, EmitError>;

/// Errors that can occur while rendering a unit.
#[derive(Debug, Error)]
pub enum EmitError {
    /// Writing into the output buffer failed.
    #[error("failed to render generated source: {0}")]
    Format(#[from] std::fmt::Error),
}

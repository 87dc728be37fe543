//! BLAKE3 content hashes for snapshots and generated units.

use crate::decl::DeclarationSet;
use crate::error::DeclError;

/// Hashes the canonical JSON form of a declaration set.
///
/// Object keys of the options bag are already ordered, and field order is
/// fixed by the type definitions, so two equal sets always hash the same
/// regardless of how their source files were formatted.
///
/// # Returns
/// * A 64-character lowercase hexadecimal string
pub fn declaration_hash(decls: &DeclarationSet) -> Result<String, DeclError> {
    let canonical = serde_json::to_vec(decls)?;
    Ok(content_hash(&canonical))
}

/// Hashes raw bytes.
pub fn content_hash(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

//! Crate error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The document text was not valid JSON. Structural problems inside
    /// valid JSON never error; fields fall back to their defaults.
    #[error("animation document parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A mainline ref dereferenced a timeline whose payload kind has no
    /// pose composition rule.
    #[error("unsupported payload kind {0:?}")]
    UnsupportedPayloadKind(String),
}

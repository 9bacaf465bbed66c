//! Framework error type.
//!
//! Sub-crates define their own error enums (`RuleError`, `SimError`, …) and
//! either convert `CoreError` via `From` or keep it as one variant.

use thiserror::Error;

/// The top-level error type for `mkr-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("configuration parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for `mkr-core`.
pub type CoreResult<T> = Result<T, CoreError>;

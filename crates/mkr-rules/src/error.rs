//! Error types for mkr-rules.
//!
//! Only table loading can fail; lookups and action parsing never do (a
//! malformed action cell degrades to `idle`/`wait` at load time).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("rule table parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type RuleResult<T> = Result<T, RuleError>;

//! Error types for store operations.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in store operations.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The requested artwork id does not exist. Always surfaced to the
    /// caller, never swallowed.
    #[error("Artwork not found: {0}")]
    NotFound(u64),

    /// The underlying store cannot be opened or reached. Fatal for the
    /// calling view; other views are unaffected.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

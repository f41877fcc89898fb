//! # Error Taxonomy
//!
//! Purpose: Classify every failure the command layer can surface so callers
//! and the executor can route them differently.
//!
//! ## Design Principles
//! 1. **One Public Enum**: Callers match on a single `StoreError` type.
//! 2. **Classification Drives Cleanup**: `ConnectionLost` is the only variant
//!    that sends a connection down the invalidation path.
//! 3. **No Silent Coercion**: Codec failures stay fatal for the call; they are
//!    never downgraded to an absent value.

use thiserror::Error;

/// Result type for every operation in this crate.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by the pooled command layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The pool could not hand out a connection (exhausted or unreachable).
    #[error("connection pool unavailable: {0}")]
    PoolUnavailable(String),

    /// The transport to the store broke mid-command. The borrowed connection
    /// is invalidated rather than released.
    #[error("store connection lost: {0}")]
    ConnectionLost(String),

    /// The store accepted the command and reported an error (for example a
    /// wrong-type operation). The connection itself is still healthy.
    #[error("store command failed: {0}")]
    CommandFailed(String),

    /// A typed member could not be encoded to or decoded from its string
    /// representation. Treated as data corruption, not absence.
    #[error("member codec failure")]
    Codec(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    /// Wraps an arbitrary encode/decode error.
    pub fn codec(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        StoreError::Codec(Box::new(err))
    }

    /// True when the failure means the transport itself is broken.
    #[inline]
    pub fn is_connection_lost(&self) -> bool {
        matches!(self, StoreError::ConnectionLost(_))
    }
}

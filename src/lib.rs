//! # redikit
//!
//! Purpose: A safe, namespaced, typed collection API over a pooled connection
//! to a Redis-style in-memory data-structure store.
//!
//! ## Design Principles
//! 1. **Borrow Discipline**: Every command checks one connection out of the
//!    pool, uses it once, and returns it on every exit path — released when
//!    healthy, invalidated when the transport broke, torn down directly when
//!    the pool itself misbehaves.
//! 2. **Traits At The Seams**: The pool, the connection, and the member codec
//!    are collaborators behind traits; this crate owns the discipline, not
//!    the transport or the format.
//! 3. **Explicit Absence**: Missing keys surface as `None`, never as zero
//!    values; decode failures are fatal for the call, never dropped entries.
//! 4. **Synchronous By Contract**: Calls may block on pool acquisition;
//!    bridging to an event loop is the caller's concern.

mod codec;
mod conn;
mod error;
mod namespace;
mod template;

pub use codec::{Codec, JsonCodec};
pub use conn::{close_direct, Connection, Pool, Rejected};
pub use error::{StoreError, StoreResult};
pub use namespace::NamespacedStore;
pub use template::CommandTemplate;

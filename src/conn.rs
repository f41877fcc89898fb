//! # Connection and Pool Traits
//!
//! Purpose: Describe the two external collaborators this layer borrows from:
//! a single store session and the pool that owns it.
//!
//! ## Design Principles
//! 1. **Borrow, Never Own**: A connection is checked out for exactly one
//!    action and handed back on every exit path.
//! 2. **Primitives Only**: `Connection` mirrors the store's own command set;
//!    boolean/affected-count policies live one layer up.
//! 3. **Recoverable Hand-Back**: `release`/`invalidate` return the connection
//!    inside the error so the caller can still tear it down directly.

use std::collections::HashSet;

use tracing::debug;

use crate::error::StoreResult;

/// One session with the store.
///
/// Implementations report transport breakage as
/// [`StoreError::ConnectionLost`](crate::StoreError::ConnectionLost); every
/// other failure is taken as a store-reported command error on a healthy
/// connection.
pub trait Connection {
    // Scalars.
    fn get(&mut self, key: &str) -> StoreResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> StoreResult<()>;
    fn set_ex(&mut self, key: &str, value: &str, seconds: u64) -> StoreResult<()>;
    /// SETNX. Returns the number of keys set (0 or 1).
    fn set_nx(&mut self, key: &str, value: &str) -> StoreResult<u64>;
    /// SET with NX and EX in one command. Returns the status reply, absent
    /// when the key already existed.
    fn set_nx_ex(&mut self, key: &str, value: &str, seconds: u64) -> StoreResult<Option<String>>;
    fn incr(&mut self, key: &str) -> StoreResult<i64>;
    fn decr(&mut self, key: &str) -> StoreResult<i64>;
    /// Returns the number of keys actually removed.
    fn del(&mut self, keys: &[&str]) -> StoreResult<u64>;
    fn flush_all(&mut self) -> StoreResult<()>;

    // Lists.
    fn lpush(&mut self, key: &str, values: &[&str]) -> StoreResult<u64>;
    fn rpop(&mut self, key: &str) -> StoreResult<Option<String>>;
    fn llen(&mut self, key: &str) -> StoreResult<u64>;
    /// LREM. `count` 0 removes every match, positive removes that many from
    /// the head. Returns the number removed.
    fn lrem(&mut self, key: &str, count: i64, value: &str) -> StoreResult<u64>;

    // Sets.
    fn sadd(&mut self, key: &str, members: &[&str]) -> StoreResult<u64>;
    fn srem(&mut self, key: &str, members: &[&str]) -> StoreResult<u64>;
    fn sismember(&mut self, key: &str, member: &str) -> StoreResult<bool>;
    fn scard(&mut self, key: &str) -> StoreResult<u64>;
    fn smembers(&mut self, key: &str) -> StoreResult<HashSet<String>>;

    // Sorted sets.
    /// ZADD for one member. Returns the number newly inserted (0 when only
    /// the score changed).
    fn zadd(&mut self, key: &str, score: f64, member: &str) -> StoreResult<u64>;
    /// ZRANGE 0 -1: the whole set, ascending by score.
    fn zrange_all(&mut self, key: &str) -> StoreResult<Vec<String>>;
    /// ZREVRANGE 0 -1: the whole set, descending by score.
    fn zrevrange_all(&mut self, key: &str) -> StoreResult<Vec<String>>;
    fn zrem(&mut self, key: &str, member: &str) -> StoreResult<u64>;
    fn zscore(&mut self, key: &str, member: &str) -> StoreResult<Option<f64>>;
    fn zcard(&mut self, key: &str) -> StoreResult<u64>;

    /// EXPIRE. Returns 1 when the timeout was set, 0 when the key is absent.
    fn expire(&mut self, key: &str, seconds: u64) -> StoreResult<u64>;

    // Direct teardown primitives, used only when the pool refuses the
    // connection back.
    fn is_connected(&self) -> bool;
    fn quit(&mut self) -> StoreResult<()>;
    fn disconnect(&mut self) -> StoreResult<()>;
}

/// A connection the pool refused to take back, together with the pool-side
/// failure. The caller owns the connection again and must dispose of it.
pub struct Rejected<C> {
    pub conn: C,
    pub error: crate::StoreError,
}

/// The bounded pool of reusable connections. Implemented by the surrounding
/// application; this crate only consumes it.
pub trait Pool {
    type Conn: Connection;

    /// Checks out a connection. May block until one is free; exhaustion or
    /// store unavailability surfaces as an error and is never retried here.
    fn acquire(&self) -> StoreResult<Self::Conn>;

    /// Returns a healthy connection for reuse.
    fn release(&self, conn: Self::Conn) -> Result<(), Rejected<Self::Conn>>;

    /// Discards a connection suspected broken so it is never handed out again.
    fn invalidate(&self, conn: Self::Conn) -> Result<(), Rejected<Self::Conn>>;
}

/// Best-effort teardown for a connection the pool would not accept back:
/// a graceful quit, then a forced disconnect, both failures ignored.
pub fn close_direct<C: Connection>(mut conn: C) {
    if !conn.is_connected() {
        return;
    }
    if let Err(err) = conn.quit() {
        debug!(%err, "quit failed during direct teardown");
    }
    if let Err(err) = conn.disconnect() {
        debug!(%err, "disconnect failed during direct teardown");
    }
}

/// True for the store's OK status replies, in either inline or multi form.
pub(crate) fn is_status_ok(status: Option<&str>) -> bool {
    matches!(status, Some("OK") | Some("+OK"))
}

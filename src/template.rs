//! # Command Template
//!
//! Purpose: Run exactly one action against exactly one borrowed connection,
//! guaranteeing the connection always goes back to the pool in a well-defined
//! state, and expose the store command surface built on that guarantee.
//!
//! ## Design Principles
//! 1. **One Exit Per Connection**: Every control path ends in exactly one of
//!    healthy release, invalidation, or direct teardown.
//! 2. **Classify, Then Clean Up**: A `ConnectionLost` failure routes the
//!    connection to invalidation; any other failure releases it as healthy.
//!    The original failure reaches the caller either way.
//! 3. **Secondary Failures Stay Secondary**: A pool error while handing the
//!    connection back is logged and absorbed, never allowed to mask the
//!    action's own result.
//! 4. **Counts Become Booleans Up Here**: Affected-count policies (`> 0`,
//!    `== 1`) live in this layer, not in the connection primitives.

use std::collections::HashSet;

use tracing::error;

use crate::conn::{close_direct, is_status_ok, Connection, Pool};
use crate::error::{StoreError, StoreResult};

/// Pooled executor for single-shot store commands.
///
/// Each method checks out a connection, runs one command, and hands the
/// connection back before returning. Nothing is cached between calls, so the
/// template can be shared freely across threads as long as the pool is.
pub struct CommandTemplate<P: Pool> {
    pool: P,
}

impl<P: Pool> CommandTemplate<P> {
    pub fn new(pool: P) -> Self {
        CommandTemplate { pool }
    }

    /// Runs an action that produces a value.
    ///
    /// Pool acquisition failures propagate untouched. An action failure is
    /// re-raised after the connection has been returned; whether it is
    /// released or invalidated depends on
    /// [`StoreError::is_connection_lost`].
    pub fn execute<T, F>(&self, action: F) -> StoreResult<T>
    where
        F: FnOnce(&mut P::Conn) -> StoreResult<T>,
    {
        let mut conn = self.pool.acquire()?;
        let result = action(&mut conn);
        let broken = matches!(&result, Err(err) if err.is_connection_lost());
        if broken {
            error!("store connection lost during command");
        }
        self.close_resource(conn, broken);
        result
    }

    /// Runs an action performed only for its side effect.
    pub fn execute_unit<F>(&self, action: F) -> StoreResult<()>
    where
        F: FnOnce(&mut P::Conn) -> StoreResult<()>,
    {
        self.execute(action)
    }

    /// Hands the connection back through the path `broken` selects. A
    /// pool-side failure here is swallowed after a best-effort direct
    /// teardown of the connection.
    fn close_resource(&self, conn: P::Conn, broken: bool) {
        let outcome = if broken {
            self.pool.invalidate(conn)
        } else {
            self.pool.release(conn)
        };
        if let Err(rejected) = outcome {
            error!(err = %rejected.error, "pool refused connection, closing it directly");
            close_direct(rejected.conn);
        }
    }

    // ---- Scalars -----------------------------------------------------------

    /// Returns `None` when the key does not exist.
    pub fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.execute(|conn| conn.get(key))
    }

    /// `get` parsed as an integer. Absence propagates as `None`, never as
    /// zero; a non-numeric payload is a command failure.
    pub fn get_i64(&self, key: &str) -> StoreResult<Option<i64>> {
        match self.get(key)? {
            Some(raw) => raw
                .parse::<i64>()
                .map(Some)
                .map_err(|_| StoreError::CommandFailed(format!("value at {key:?} is not an integer"))),
            None => Ok(None),
        }
    }

    pub fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.execute_unit(|conn| conn.set(key, value))
    }

    /// Sets the value and an expiry in one command.
    pub fn set_with_expiry(&self, key: &str, value: &str, seconds: u64) -> StoreResult<()> {
        self.execute_unit(|conn| conn.set_ex(key, value, seconds))
    }

    /// Sets the value only when the key does not exist yet. Returns whether
    /// the set actually happened.
    pub fn set_if_absent(&self, key: &str, value: &str) -> StoreResult<bool> {
        self.execute(|conn| Ok(conn.set_nx(key, value)? == 1))
    }

    /// Atomic combination of `set_if_absent` and `set_with_expiry`: one store
    /// command, so no window where the key exists without its expiry.
    pub fn set_if_absent_with_expiry(&self, key: &str, value: &str, seconds: u64) -> StoreResult<bool> {
        self.execute(|conn| {
            let status = conn.set_nx_ex(key, value, seconds)?;
            Ok(is_status_ok(status.as_deref()))
        })
    }

    /// Absent keys start at 0 before the increment is applied.
    pub fn increment(&self, key: &str) -> StoreResult<i64> {
        self.execute(|conn| conn.incr(key))
    }

    pub fn decrement(&self, key: &str) -> StoreResult<i64> {
        self.execute(|conn| conn.decr(key))
    }

    /// Removes keys. True when at least one existed.
    pub fn delete(&self, keys: &[&str]) -> StoreResult<bool> {
        self.execute(|conn| Ok(conn.del(keys)? > 0))
    }

    /// Drops every key in the store.
    pub fn flush_all(&self) -> StoreResult<()> {
        self.execute_unit(|conn| conn.flush_all())
    }

    // ---- Lists -------------------------------------------------------------

    pub fn push_left(&self, key: &str, values: &[&str]) -> StoreResult<()> {
        self.execute_unit(|conn| conn.lpush(key, values).map(|_| ()))
    }

    /// Returns `None` when the list is empty or the key absent.
    pub fn pop_right(&self, key: &str) -> StoreResult<Option<String>> {
        self.execute(|conn| conn.rpop(key))
    }

    /// Zero when the key does not exist.
    pub fn list_len(&self, key: &str) -> StoreResult<u64> {
        self.execute(|conn| conn.llen(key))
    }

    /// Removes the first element equal to `value`. False when neither the
    /// key nor the value exists.
    pub fn remove_first_match(&self, key: &str, value: &str) -> StoreResult<bool> {
        self.execute(|conn| Ok(conn.lrem(key, 1, value)? == 1))
    }

    /// Removes every element equal to `value`. True when at least one went.
    pub fn remove_all_matches(&self, key: &str, value: &str) -> StoreResult<bool> {
        self.execute(|conn| Ok(conn.lrem(key, 0, value)? > 0))
    }

    // ---- Sets --------------------------------------------------------------

    /// True when at least one member was newly added.
    pub fn add_members(&self, key: &str, members: &[&str]) -> StoreResult<bool> {
        self.execute(|conn| Ok(conn.sadd(key, members)? > 0))
    }

    /// True when at least one member was removed; a partially matching
    /// multi-member removal still reports true.
    pub fn remove_members(&self, key: &str, members: &[&str]) -> StoreResult<bool> {
        self.execute(|conn| Ok(conn.srem(key, members)? > 0))
    }

    pub fn contains_member(&self, key: &str, member: &str) -> StoreResult<bool> {
        self.execute(|conn| conn.sismember(key, member))
    }

    pub fn set_len(&self, key: &str) -> StoreResult<u64> {
        self.execute(|conn| conn.scard(key))
    }

    /// All members, in no meaningful order.
    pub fn members(&self, key: &str) -> StoreResult<HashSet<String>> {
        self.execute(|conn| conn.smembers(key))
    }

    // ---- Sorted sets -------------------------------------------------------

    /// Adds a member with a score. False when the member already existed and
    /// only its score was updated.
    pub fn sorted_add(&self, key: &str, member: &str, score: f64) -> StoreResult<bool> {
        self.execute(|conn| Ok(conn.zadd(key, score, member)? == 1))
    }

    /// False when the key or the member does not exist.
    pub fn sorted_remove(&self, key: &str, member: &str) -> StoreResult<bool> {
        self.execute(|conn| Ok(conn.zrem(key, member)? == 1))
    }

    /// Returns `None` when the key or member does not exist.
    pub fn score_of(&self, key: &str, member: &str) -> StoreResult<Option<f64>> {
        self.execute(|conn| conn.zscore(key, member))
    }

    /// Zero when the key does not exist.
    pub fn sorted_len(&self, key: &str) -> StoreResult<u64> {
        self.execute(|conn| conn.zcard(key))
    }

    /// The entire set, ascending by score. Score ties keep the store's own
    /// member ordering.
    pub fn range_ascending(&self, key: &str) -> StoreResult<Vec<String>> {
        self.execute(|conn| conn.zrange_all(key))
    }

    /// The entire set, descending by score.
    pub fn range_descending(&self, key: &str) -> StoreResult<Vec<String>> {
        self.execute(|conn| conn.zrevrange_all(key))
    }

    // ---- Expiry ------------------------------------------------------------

    /// Attaches an expiry in seconds, leaving the value untouched. False when
    /// the key does not exist.
    pub fn expire(&self, key: &str, seconds: u64) -> StoreResult<bool> {
        self.execute(|conn| Ok(conn.expire(key, seconds)? == 1))
    }
}

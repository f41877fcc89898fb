//! # Namespaced Typed Collections
//!
//! Purpose: Present set, sorted-set, and expiry operations over namespaced
//! keys, with optional typed members serialized through a pluggable codec.
//!
//! ## Design Principles
//! 1. **Uniform Key Transform**: Every key becomes `namespace:key` before it
//!    reaches the raw command layer; the namespace is fixed at construction.
//! 2. **Encode Eagerly, Write Once**: Typed multi-member writes serialize
//!    every member first, then issue one store command; the first encode
//!    failure aborts the whole call with nothing written.
//! 3. **Corruption Is Fatal**: A member that fails to decode fails the whole
//!    read; bad entries are never silently dropped.
//! 4. **Order Where It Exists**: Plain-set reads come back as an unordered
//!    `HashSet`; sorted-set reads preserve store order in a `Vec`.

use std::collections::HashSet;
use std::hash::Hash;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::codec::{Codec, JsonCodec};
use crate::conn::Pool;
use crate::error::StoreResult;
use crate::template::CommandTemplate;

/// Typed collection facade over a namespace of store keys.
pub struct NamespacedStore<P: Pool, C: Codec = JsonCodec> {
    template: CommandTemplate<P>,
    namespace: String,
    codec: C,
}

impl<P: Pool> NamespacedStore<P, JsonCodec> {
    /// Builds a facade with the default JSON codec.
    pub fn new(pool: P, namespace: impl Into<String>) -> Self {
        Self::with_codec(pool, namespace, JsonCodec)
    }
}

impl<P: Pool, C: Codec> NamespacedStore<P, C> {
    pub fn with_codec(pool: P, namespace: impl Into<String>, codec: C) -> Self {
        NamespacedStore {
            template: CommandTemplate::new(pool),
            namespace: namespace.into(),
            codec,
        }
    }

    /// The key prefix applied to every operation.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}:{}", self.namespace, key)
    }

    fn encode_all<T: Serialize>(&self, members: &[T]) -> StoreResult<Vec<String>> {
        let mut encoded = Vec::with_capacity(members.len());
        for member in members {
            encoded.push(self.codec.encode(member)?);
        }
        Ok(encoded)
    }

    // ---- Sets --------------------------------------------------------------

    /// Adds raw string members. True when at least one was newly added.
    pub fn add_members_to_set(&self, key: &str, members: &[&str]) -> StoreResult<bool> {
        self.template.add_members(&self.full_key(key), members)
    }

    /// Adds typed members, each serialized independently. Any encode failure
    /// aborts the call before anything is written.
    pub fn add_typed_members_to_set<T: Serialize>(&self, key: &str, members: &[T]) -> StoreResult<bool> {
        let encoded = self.encode_all(members)?;
        let refs: Vec<&str> = encoded.iter().map(String::as_str).collect();
        self.template.add_members(&self.full_key(key), &refs)
    }

    /// All raw members, unordered.
    pub fn members_for_set(&self, key: &str) -> StoreResult<HashSet<String>> {
        self.template.members(&self.full_key(key))
    }

    /// All members decoded to `T`. A member that fails to decode fails the
    /// whole call.
    pub fn typed_members_for_set<T>(&self, key: &str) -> StoreResult<HashSet<T>>
    where
        T: DeserializeOwned + Eq + Hash,
    {
        let raw = self.members_for_set(key)?;
        let mut members = HashSet::with_capacity(raw.len());
        for item in &raw {
            members.insert(self.codec.decode(item)?);
        }
        Ok(members)
    }

    /// True when at least one member was removed, even if others were absent.
    pub fn remove_members_from_set(&self, key: &str, members: &[&str]) -> StoreResult<bool> {
        self.template.remove_members(&self.full_key(key), members)
    }

    pub fn remove_typed_members_from_set<T: Serialize>(&self, key: &str, members: &[T]) -> StoreResult<bool> {
        let encoded = self.encode_all(members)?;
        let refs: Vec<&str> = encoded.iter().map(String::as_str).collect();
        self.template.remove_members(&self.full_key(key), &refs)
    }

    pub fn set_len(&self, key: &str) -> StoreResult<u64> {
        self.template.set_len(&self.full_key(key))
    }

    // ---- Sorted sets -------------------------------------------------------

    /// Adds one member with a score. False when the member already existed
    /// and only its score was updated.
    pub fn add_member_to_sorted_set(&self, key: &str, member: &str, score: f64) -> StoreResult<bool> {
        self.template.sorted_add(&self.full_key(key), member, score)
    }

    pub fn add_typed_member_to_sorted_set<T: Serialize>(&self, key: &str, member: &T, score: f64) -> StoreResult<bool> {
        let encoded = self.codec.encode(member)?;
        self.template.sorted_add(&self.full_key(key), &encoded, score)
    }

    /// The whole sorted set, ascending by score, order preserved.
    pub fn members_for_sorted_set(&self, key: &str) -> StoreResult<Vec<String>> {
        self.template.range_ascending(&self.full_key(key))
    }

    pub fn typed_members_for_sorted_set<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Vec<T>> {
        let raw = self.members_for_sorted_set(key)?;
        self.decode_ordered(raw)
    }

    /// The whole sorted set, descending by score, order preserved.
    pub fn reverse_members_for_sorted_set(&self, key: &str) -> StoreResult<Vec<String>> {
        self.template.range_descending(&self.full_key(key))
    }

    pub fn typed_reverse_members_for_sorted_set<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Vec<T>> {
        let raw = self.reverse_members_for_sorted_set(key)?;
        self.decode_ordered(raw)
    }

    pub fn remove_member_from_sorted_set(&self, key: &str, member: &str) -> StoreResult<bool> {
        self.template.sorted_remove(&self.full_key(key), member)
    }

    pub fn remove_typed_member_from_sorted_set<T: Serialize>(&self, key: &str, member: &T) -> StoreResult<bool> {
        let encoded = self.codec.encode(member)?;
        self.template.sorted_remove(&self.full_key(key), &encoded)
    }

    /// `None` when the key or member does not exist.
    pub fn score_of(&self, key: &str, member: &str) -> StoreResult<Option<f64>> {
        self.template.score_of(&self.full_key(key), member)
    }

    pub fn sorted_set_len(&self, key: &str) -> StoreResult<u64> {
        self.template.sorted_len(&self.full_key(key))
    }

    // ---- Expiry ------------------------------------------------------------

    /// Attaches an expiry to a namespaced key. False when the key is absent.
    pub fn expire(&self, key: &str, seconds: u64) -> StoreResult<bool> {
        self.template.expire(&self.full_key(key), seconds)
    }

    fn decode_ordered<T: DeserializeOwned>(&self, raw: Vec<String>) -> StoreResult<Vec<T>> {
        let mut members = Vec::with_capacity(raw.len());
        for item in &raw {
            members.push(self.codec.decode(item)?);
        }
        Ok(members)
    }
}

//! # Member Codec
//!
//! Purpose: The serialization boundary for typed set and sorted-set members.
//! Kept behind a trait so the storage format can be swapped without touching
//! the facade.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{StoreError, StoreResult};

/// Encodes typed members to the string form the store holds, and back.
///
/// Round-tripping a value through `encode` then `decode` must reproduce a
/// value equal under the caller's equality; that contract belongs to the
/// implementation, not to the facade consuming it.
pub trait Codec {
    fn encode<T: Serialize>(&self, value: &T) -> StoreResult<String>;
    fn decode<T: DeserializeOwned>(&self, raw: &str) -> StoreResult<T>;
}

/// The default codec: JSON via serde_json.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> StoreResult<String> {
        serde_json::to_string(value).map_err(StoreError::codec)
    }

    fn decode<T: DeserializeOwned>(&self, raw: &str) -> StoreResult<T> {
        serde_json::from_str(raw).map_err(StoreError::codec)
    }
}

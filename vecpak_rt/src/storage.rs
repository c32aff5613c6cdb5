//! Typed wrappers over the host key/value store.

use crate::{
    host::{KeyValuePair, with_host},
    payload::{FromKvBytes, Payload},
};

pub fn kv_put(key: impl Payload, value: impl Payload) {
    let key = key.to_payload();
    let value = value.to_payload();
    with_host(|h| h.kv_put(key.as_ref(), value.as_ref()))
}

/// Permissive lookup: `None` when the key does not exist, `Some` of a
/// possibly empty value otherwise.
pub fn kv_get<T: FromKvBytes>(key: impl Payload) -> Option<T> {
    let key = key.to_payload();
    with_host(|h| h.kv_get(key.as_ref())).map(T::from_kv_bytes)
}

pub fn kv_get_or<T: FromKvBytes>(key: impl Payload, default: T) -> T {
    kv_get(key).unwrap_or(default)
}

/// Strict lookup: aborts the execution when the key is missing. For state
/// the program itself must have written earlier.
pub fn kv_get_required(key: impl Payload) -> Vec<u8> {
    match kv_get(key) {
        Some(value) => value,
        None => crate::abort!("kv_key_not_found"),
    }
}

/// Decimal-text arithmetic on the stored value; returns the new value.
pub fn kv_increment(key: impl Payload, delta: impl Payload) -> String {
    let key = key.to_payload();
    let delta = delta.to_payload();
    with_host(|h| h.kv_increment(key.as_ref(), delta.as_ref()))
}

pub fn kv_delete(key: impl Payload) {
    let key = key.to_payload();
    with_host(|h| h.kv_delete(key.as_ref()))
}

pub fn kv_exists(key: impl Payload) -> bool {
    let key = key.to_payload();
    with_host(|h| h.kv_exists(key.as_ref()))
}

/// Steps an ordered scan backwards: the last key before `prefix ‖ key`
/// still carrying `prefix`.
pub fn kv_get_prev(prefix: impl Payload, key: impl Payload) -> KeyValuePair {
    let prefix = prefix.to_payload();
    let key = key.to_payload();
    with_host(|h| h.kv_get_prev(prefix.as_ref(), key.as_ref()))
}

/// Steps an ordered scan forwards: the first key after `prefix ‖ key`
/// still carrying `prefix`. Iterate from an empty `key` to walk a prefix.
pub fn kv_get_next(prefix: impl Payload, key: impl Payload) -> KeyValuePair {
    let prefix = prefix.to_payload();
    let key = key.to_payload();
    with_host(|h| h.kv_get_next(prefix.as_ref(), key.as_ref()))
}

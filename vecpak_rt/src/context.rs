//! Execution-context accessors.
//!
//! The host populates these values before the entrypoint runs; see
//! [`crate::layout`] for where they live on wasm32.

use crate::host::with_host;

pub fn seed() -> Vec<u8> {
    with_host(|h| h.seed())
}

pub fn entry_slot() -> u64 {
    with_host(|h| h.entry_slot())
}

pub fn entry_height() -> u64 {
    with_host(|h| h.entry_height())
}

pub fn entry_epoch() -> u64 {
    with_host(|h| h.entry_epoch())
}

pub fn entry_signer() -> Vec<u8> {
    with_host(|h| h.entry_signer())
}

pub fn entry_prev_hash() -> Vec<u8> {
    with_host(|h| h.entry_prev_hash())
}

pub fn entry_vr() -> Vec<u8> {
    with_host(|h| h.entry_vr())
}

pub fn entry_dr() -> Vec<u8> {
    with_host(|h| h.entry_dr())
}

pub fn tx_nonce() -> u64 {
    with_host(|h| h.tx_nonce())
}

pub fn tx_signer() -> Vec<u8> {
    with_host(|h| h.tx_signer())
}

pub fn account_current() -> Vec<u8> {
    with_host(|h| h.account_current())
}

pub fn account_caller() -> Vec<u8> {
    with_host(|h| h.account_caller())
}

pub fn account_origin() -> Vec<u8> {
    with_host(|h| h.account_origin())
}

/// `(symbol, amount)` attached to the current call, if any.
pub fn attachment() -> Option<(Vec<u8>, Vec<u8>)> {
    with_host(|h| h.attachment())
}

pub fn attached_symbol() -> Vec<u8> {
    attachment().map(|(symbol, _)| symbol).unwrap_or_default()
}

pub fn attached_amount() -> Vec<u8> {
    attachment().map(|(_, amount)| amount).unwrap_or_default()
}

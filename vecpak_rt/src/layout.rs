//! Fixed context memory offsets, agreed with the host by convention.
//!
//! The host writes these slots before the guest entrypoint runs. Numeric
//! slots (slot/height/epoch/nonce) hold raw little-endian u64 with no
//! prefix; everything else follows the 4-byte length-prefix convention.

pub const SEED: i32 = 1100;

pub const ENTRY_SLOT: i32 = 2000;
pub const ENTRY_HEIGHT: i32 = 2010;
pub const ENTRY_EPOCH: i32 = 2020;
pub const ENTRY_SIGNER: i32 = 2100;
pub const ENTRY_PREV_HASH: i32 = 2200;
/// Verifiable-randomness output for the current entry.
pub const ENTRY_VR: i32 = 2300;
/// Deterministic-randomness output for the current entry.
pub const ENTRY_DR: i32 = 2400;

pub const TX_NONCE: i32 = 3000;
pub const TX_SIGNER: i32 = 3100;

pub const ACCOUNT_CURRENT: i32 = 4000;
pub const ACCOUNT_CALLER: i32 = 4100;
pub const ACCOUNT_ORIGIN: i32 = 4200;

pub const ATTACHED_SYMBOL: i32 = 5000;
pub const ATTACHED_AMOUNT: i32 = 5100;

//! Real boundary bindings for wasm32 guests.
//!
//! Every import takes pointer/length pairs into the guest's own linear
//! memory and returns either a plain integer or an address holding a
//! length-prefixed response buffer.

use crate::{
    host::{HostIo, KeyValuePair},
    layout,
    marshal::{ABSENT, ArgTable},
};

extern "C" {
    fn import_log(ptr: *const u8, len: usize);
    fn import_return(ptr: *const u8, len: usize);
    fn import_call(args_ptr: *const u8, extra_args_ptr: *const u8) -> i32;

    fn import_kv_get(key_ptr: *const u8, key_len: usize) -> i32;
    fn import_kv_exists(key_ptr: *const u8, key_len: usize) -> i32;
    fn import_kv_put(key_ptr: *const u8, key_len: usize, val_ptr: *const u8, val_len: usize);
    fn import_kv_increment(key_ptr: *const u8, key_len: usize, val_ptr: *const u8, val_len: usize)
    -> i32;
    fn import_kv_delete(key_ptr: *const u8, key_len: usize);
    fn import_kv_get_prev(
        prefix_ptr: *const u8,
        prefix_len: usize,
        key_ptr: *const u8,
        key_len: usize,
    ) -> i32;
    fn import_kv_get_next(
        prefix_ptr: *const u8,
        prefix_len: usize,
        key_ptr: *const u8,
        key_len: usize,
    ) -> i32;
}

unsafe fn read_len(addr: i32) -> i32 {
    core::ptr::read_unaligned(addr as *const i32)
}

/// Reads a length-prefixed buffer at `addr`; `None` on the absent sentinel.
unsafe fn read_bytes(addr: i32) -> Option<Vec<u8>> {
    let len = read_len(addr);
    if len == ABSENT {
        return None;
    }
    Some(core::slice::from_raw_parts((addr + 4) as *const u8, len as usize).to_vec())
}

unsafe fn read_string(addr: i32) -> String {
    String::from_utf8(read_bytes(addr).unwrap_or_default()).unwrap_or_default()
}

unsafe fn read_u64(addr: i32) -> u64 {
    core::ptr::read_unaligned(addr as *const u64)
}

/// The one real host. Stateless; all state is on the other side of the
/// boundary.
pub(crate) struct WasmHost;

impl HostIo for WasmHost {
    fn kv_get(&self, key: &[u8]) -> Option<Vec<u8>> {
        unsafe { read_bytes(import_kv_get(key.as_ptr(), key.len())) }
    }

    fn kv_exists(&self, key: &[u8]) -> bool {
        unsafe { import_kv_exists(key.as_ptr(), key.len()) == 1 }
    }

    fn kv_put(&self, key: &[u8], value: &[u8]) {
        unsafe { import_kv_put(key.as_ptr(), key.len(), value.as_ptr(), value.len()) }
    }

    fn kv_increment(&self, key: &[u8], delta: &[u8]) -> String {
        unsafe {
            read_string(import_kv_increment(
                key.as_ptr(),
                key.len(),
                delta.as_ptr(),
                delta.len(),
            ))
        }
    }

    fn kv_delete(&self, key: &[u8]) {
        unsafe { import_kv_delete(key.as_ptr(), key.len()) }
    }

    fn kv_get_prev(&self, prefix: &[u8], key: &[u8]) -> KeyValuePair {
        unsafe {
            decode_pair(import_kv_get_prev(
                prefix.as_ptr(),
                prefix.len(),
                key.as_ptr(),
                key.len(),
            ))
        }
    }

    fn kv_get_next(&self, prefix: &[u8], key: &[u8]) -> KeyValuePair {
        unsafe {
            decode_pair(import_kv_get_next(
                prefix.as_ptr(),
                prefix.len(),
                key.as_ptr(),
                key.len(),
            ))
        }
    }

    fn call(&self, contract: &[u8], func: &[u8], args: &[&[u8]], extra: &[&[u8]]) -> Vec<u8> {
        let mut items: Vec<&[u8]> = Vec::with_capacity(2 + args.len());
        items.push(contract);
        items.push(func);
        items.extend_from_slice(args);

        let main = ArgTable::build(&items);
        let extra_table = (!extra.is_empty()).then(|| ArgTable::build(extra));
        let extra_ptr = extra_table
            .as_ref()
            .map_or(core::ptr::null(), ArgTable::as_ptr);

        // Both tables and every buffer they reference outlive the import:
        // the host reads guest memory in place during the call.
        let response = unsafe { import_call(main.as_ptr(), extra_ptr) };
        unsafe { read_bytes(response) }.unwrap_or_default()
    }

    fn log(&self, line: &[u8]) {
        unsafe { import_log(line.as_ptr(), line.len()) }
    }

    fn ret(&self, value: &[u8]) {
        unsafe { import_return(value.as_ptr(), value.len()) }
    }

    fn seed(&self) -> Vec<u8> {
        unsafe { read_bytes(layout::SEED) }.unwrap_or_default()
    }

    fn entry_slot(&self) -> u64 {
        unsafe { read_u64(layout::ENTRY_SLOT) }
    }

    fn entry_height(&self) -> u64 {
        unsafe { read_u64(layout::ENTRY_HEIGHT) }
    }

    fn entry_epoch(&self) -> u64 {
        unsafe { read_u64(layout::ENTRY_EPOCH) }
    }

    fn entry_signer(&self) -> Vec<u8> {
        unsafe { read_bytes(layout::ENTRY_SIGNER) }.unwrap_or_default()
    }

    fn entry_prev_hash(&self) -> Vec<u8> {
        unsafe { read_bytes(layout::ENTRY_PREV_HASH) }.unwrap_or_default()
    }

    fn entry_vr(&self) -> Vec<u8> {
        unsafe { read_bytes(layout::ENTRY_VR) }.unwrap_or_default()
    }

    fn entry_dr(&self) -> Vec<u8> {
        unsafe { read_bytes(layout::ENTRY_DR) }.unwrap_or_default()
    }

    fn tx_nonce(&self) -> u64 {
        unsafe { read_u64(layout::TX_NONCE) }
    }

    fn tx_signer(&self) -> Vec<u8> {
        unsafe { read_bytes(layout::TX_SIGNER) }.unwrap_or_default()
    }

    fn account_current(&self) -> Vec<u8> {
        unsafe { read_bytes(layout::ACCOUNT_CURRENT) }.unwrap_or_default()
    }

    fn account_caller(&self) -> Vec<u8> {
        unsafe { read_bytes(layout::ACCOUNT_CALLER) }.unwrap_or_default()
    }

    fn account_origin(&self) -> Vec<u8> {
        unsafe { read_bytes(layout::ACCOUNT_ORIGIN) }.unwrap_or_default()
    }

    fn attachment(&self) -> Option<(Vec<u8>, Vec<u8>)> {
        unsafe {
            // A zero header at the symbol slot means nothing is attached.
            if read_len(layout::ATTACHED_SYMBOL) == 0 {
                return None;
            }
            Some((
                read_bytes(layout::ATTACHED_SYMBOL)?,
                read_bytes(layout::ATTACHED_AMOUNT)?,
            ))
        }
    }
}

unsafe fn decode_pair(addr: i32) -> KeyValuePair {
    let len = read_len(addr);
    if len == ABSENT {
        return KeyValuePair::absent();
    }
    // Region layout: prefixed key, then the prefixed value right after it.
    match (read_bytes(addr), read_bytes(addr + 4 + len)) {
        (Some(key), Some(value)) => KeyValuePair::new(key, value),
        _ => KeyValuePair::absent(),
    }
}

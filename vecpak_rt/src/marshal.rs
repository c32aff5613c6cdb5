//! Pointer/length marshaling for the sandbox boundary.
//!
//! A host call transports a variable number of byte buffers through one
//! contiguous argument table: a count followed by `(ptr, len)` pairs, all
//! 32-bit little-endian. The host reads the referenced buffers in place,
//! so everything must stay alive until the call returns.

use core::marker::PhantomData;

/// Length-prefix sentinel for "no such entry"; distinct from a 0-length value.
pub const ABSENT: i32 = -1;

/// `[count: i32] (ptr: i32, len: i32)*` over borrowed argument buffers.
///
/// The lifetime parameter pins the table to the buffers it points at: the
/// table cannot outlive them, which is the scoped-acquisition discipline
/// the boundary requires. Dropping the table releases the allocation on
/// every exit path.
pub struct ArgTable<'a> {
    bytes: Vec<u8>,
    count: usize,
    _items: PhantomData<&'a [u8]>,
}

impl<'a> ArgTable<'a> {
    pub fn build(items: &[&'a [u8]]) -> Self {
        let mut bytes = Vec::with_capacity(4 + items.len() * 8);
        bytes.extend_from_slice(&(items.len() as i32).to_le_bytes());
        for item in items {
            bytes.extend_from_slice(&(item.as_ptr() as usize as u32).to_le_bytes());
            bytes.extend_from_slice(&(item.len() as u32).to_le_bytes());
        }
        Self {
            bytes,
            count: items.len(),
            _items: PhantomData,
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// `(ptr, len)` of entry `index`.
    pub fn entry(&self, index: usize) -> (u32, u32) {
        assert!(index < self.count);
        let at = 4 + index * 8;
        let ptr = u32::from_le_bytes(self.bytes[at..at + 4].try_into().unwrap());
        let len = u32::from_le_bytes(self.bytes[at + 4..at + 8].try_into().unwrap());
        (ptr, len)
    }

    pub fn as_ptr(&self) -> *const u8 {
        self.bytes.as_ptr()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Decodes a length-prefixed response region: 4-byte native-endian signed
/// length, then the payload. [`ABSENT`] means no value.
pub fn decode_response(region: &[u8]) -> Option<&[u8]> {
    let len = i32::from_ne_bytes(region.get(..4)?.try_into().ok()?);
    if len == ABSENT {
        return None;
    }
    // Only the sentinel means absent; any other negative length is a
    // corrupt header, not a missing value.
    assert!(len >= 0, "malformed response length {len}");
    region.get(4..4 + len as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn call_table_counts_contract_and_func() {
        let contract = [0x11u8; 48];
        let func: &[u8] = b"transfer";
        let to: &[u8] = b"bob";
        let amount: &[u8] = b"500";
        let symbol: &[u8] = b"GOLD";

        let items: Vec<&[u8]> = vec![&contract, func, to, amount, symbol];
        let table = ArgTable::build(&items);

        assert_eq!(table.count(), 5);
        for (i, item) in items.iter().enumerate() {
            let (ptr, len) = table.entry(i);
            assert_eq!(ptr, item.as_ptr() as usize as u32);
            assert_eq!(len, item.len() as u32);
        }
    }

    #[test]
    fn table_layout_is_count_then_pairs() {
        let a: &[u8] = b"a";
        let table = ArgTable::build(&[a]);
        let bytes = table.as_bytes();
        assert_eq!(bytes.len(), 4 + 8);
        assert_eq!(i32::from_le_bytes(bytes[..4].try_into().unwrap()), 1);
    }

    #[test]
    fn empty_table_is_just_a_count() {
        let table = ArgTable::build(&[]);
        assert_eq!(table.count(), 0);
        assert_eq!(table.as_bytes(), 0i32.to_le_bytes());
    }

    #[test]
    fn response_absent_differs_from_empty() {
        let absent = ABSENT.to_ne_bytes();
        assert_eq!(decode_response(&absent), None);

        let empty = 0i32.to_ne_bytes();
        assert_eq!(decode_response(&empty), Some(&[][..]));

        let mut present = 3i32.to_ne_bytes().to_vec();
        present.extend_from_slice(b"abc");
        assert_eq!(decode_response(&present), Some(&b"abc"[..]));
    }

    #[test]
    fn short_response_region_is_absent() {
        assert_eq!(decode_response(&[0x01]), None);
    }

    #[test]
    #[should_panic(expected = "malformed response length")]
    fn negative_non_sentinel_length_is_rejected() {
        decode_response(&(-2i32).to_ne_bytes());
    }
}

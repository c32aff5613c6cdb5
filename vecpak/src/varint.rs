//! Sign-and-length prefixed variable-length integers.
//!
//! Zero is the single byte `0x00`. Any other value is a header byte
//! `(sign << 7) | magnitude_len` followed by the minimal big-endian
//! magnitude bytes. An i64 magnitude never needs more than 8 bytes.

use crate::error::{Error, Result};

pub fn write_varint(n: i64, out: &mut Vec<u8>) {
    if n == 0 {
        out.push(0);
        return;
    }
    let mag = n.unsigned_abs();
    let len = ((64 - mag.leading_zeros()) as usize).div_ceil(8);
    let sign = if n < 0 { 0x80 } else { 0 };
    out.push(sign | len as u8);
    out.extend_from_slice(&mag.to_be_bytes()[8 - len..]);
}

pub fn read_varint(buf: &[u8], pos: &mut usize) -> Result<i64> {
    let header = *buf.get(*pos).ok_or(Error::Eof)?;
    *pos += 1;
    if header == 0 {
        return Ok(0);
    }
    let len = (header & 0x7f) as usize;
    if len > 8 {
        return Err(Error::VarintTooLong(len));
    }
    let bytes = buf.get(*pos..*pos + len).ok_or(Error::Eof)?;
    *pos += len;
    let mut mag = 0u64;
    for &b in bytes {
        mag = mag << 8 | b as u64;
    }
    // `wrapping_neg` maps a magnitude of 2^63 back onto i64::MIN.
    Ok(if header & 0x80 != 0 {
        (mag as i64).wrapping_neg()
    } else {
        mag as i64
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn roundtrip(n: i64) -> i64 {
        let mut out = Vec::new();
        write_varint(n, &mut out);
        let mut pos = 0;
        let back = read_varint(&out, &mut pos).unwrap();
        assert_eq!(pos, out.len());
        back
    }

    #[test]
    fn roundtrip_edge_values() {
        for n in [
            i64::MIN,
            i64::MIN + 1,
            -1,
            0,
            1,
            127,
            128,
            255,
            i64::MAX,
        ] {
            assert_eq!(roundtrip(n), n);
        }
    }

    #[test]
    fn zero_is_one_byte() {
        let mut out = Vec::new();
        write_varint(0, &mut out);
        assert_eq!(out, [0x00]);
    }

    #[test]
    fn magnitude_is_minimal() {
        let mut out = Vec::new();
        write_varint(255, &mut out);
        assert_eq!(out, [0x01, 0xff]);

        out.clear();
        write_varint(256, &mut out);
        assert_eq!(out, [0x02, 0x01, 0x00]);

        out.clear();
        write_varint(-1, &mut out);
        assert_eq!(out, [0x81, 0x01]);
    }

    #[test]
    fn truncated_magnitude_is_eof() {
        // Header claims 2 bytes, only 1 present.
        let mut pos = 0;
        assert_eq!(read_varint(&[0x02, 0x01], &mut pos), Err(Error::Eof));
    }

    #[test]
    fn empty_buffer_is_eof() {
        let mut pos = 0;
        assert_eq!(read_varint(&[], &mut pos), Err(Error::Eof));
    }

    #[test]
    fn overlong_magnitude_is_rejected() {
        let mut pos = 0;
        let buf = [0x09, 0, 0, 0, 0, 0, 0, 0, 0, 1];
        assert_eq!(read_varint(&buf, &mut pos), Err(Error::VarintTooLong(9)));
    }

    proptest! {
        #[test]
        fn roundtrip_any(n in any::<i64>()) {
            prop_assert_eq!(roundtrip(n), n);
        }
    }
}

//! Byte-payload conversions at the boundary.
//!
//! The host transports raw bytes only. Strings cross as UTF-8, byte
//! buffers as-is, and integers as decimal text, which is also the
//! representation `kv_increment` arithmetic works in.

use std::borrow::Cow;

pub trait Payload {
    fn to_payload(&self) -> Cow<'_, [u8]>;
}

impl Payload for &str {
    fn to_payload(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_bytes())
    }
}

impl Payload for String {
    fn to_payload(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_bytes())
    }
}

impl Payload for &[u8] {
    fn to_payload(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self)
    }
}

impl<const N: usize> Payload for [u8; N] {
    fn to_payload(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_slice())
    }
}

impl<const N: usize> Payload for &[u8; N] {
    fn to_payload(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_slice())
    }
}

impl Payload for Vec<u8> {
    fn to_payload(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_slice())
    }
}

impl Payload for &Vec<u8> {
    fn to_payload(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_slice())
    }
}

macro_rules! impl_payload_for_ints {
    ( $($t:ty),* ) => {
        $(
            impl Payload for $t {
                fn to_payload(&self) -> Cow<'_, [u8]> {
                    Cow::Owned(self.to_string().into_bytes())
                }
            }
        )*
    };
}

impl_payload_for_ints!(u8, u16, u32, u64, u128, usize);
impl_payload_for_ints!(i8, i16, i32, i64, i128, isize);

/// Typed views over raw KV values.
///
/// Numeric conversions abort on malformed data: a balance that no longer
/// parses is corrupted state, not a zero.
pub trait FromKvBytes {
    fn from_kv_bytes(data: Vec<u8>) -> Self;
}

impl FromKvBytes for Vec<u8> {
    fn from_kv_bytes(data: Vec<u8>) -> Self {
        data
    }
}

impl FromKvBytes for String {
    fn from_kv_bytes(data: Vec<u8>) -> Self {
        match String::from_utf8(data) {
            Ok(s) => s,
            Err(_) => crate::abort!("invalid_utf8_string"),
        }
    }
}

macro_rules! impl_from_kv_bytes_for_ints {
    ( $($t:ty),* ) => {
        $(
            impl FromKvBytes for $t {
                fn from_kv_bytes(data: Vec<u8>) -> Self {
                    let text = match std::str::from_utf8(&data) {
                        Ok(s) => s.trim(),
                        Err(_) => crate::abort!("invalid_utf8_string_as_integer"),
                    };
                    match text.parse::<$t>() {
                        Ok(n) => n,
                        Err(_) => crate::abort!("invalid_integer_format"),
                    }
                }
            }
        )*
    };
}

impl_from_kv_bytes_for_ints!(u8, u16, u32, u64, u128, usize);
impl_from_kv_bytes_for_ints!(i8, i16, i32, i64, i128, isize);

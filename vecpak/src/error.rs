use thiserror::Error;

/// Structural decode/encode failures.
///
/// All of these are fatal to the current pass: they mean the buffer is
/// corrupted or was produced by an incompatible writer, and continuing
/// would hand garbage to the caller. The one *expected* miss, a key that
/// is simply absent from storage, is not an `Error` at all; it surfaces
/// as `None` from the storage accessors.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    #[error("unexpected end of buffer")]
    Eof,
    #[error("expected tag {expected:#04x}, found {found:#04x}")]
    TypeMismatch { expected: u8, found: u8 },
    #[error("record does not start with a map header, found {0:#04x}")]
    BadHeader(u8),
    #[error("no decoder for tag {0:#04x}")]
    UnsupportedType(u8),
    #[error("cannot skip over tag {0:#04x}, only flat records are supported")]
    UnsupportedSkip(u8),
    #[error("varint magnitude of {0} bytes does not fit in 64 bits")]
    VarintTooLong(usize),
    #[error("duplicate field key {0:?}")]
    DuplicateKey(String),
    #[error("field key is not valid utf-8")]
    InvalidUtf8,
}

pub type Result<T> = core::result::Result<T, Error>;

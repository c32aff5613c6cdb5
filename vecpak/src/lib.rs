//! The VecPak wire format: a deterministic binary encoding for flat records.
//!
//! A record is a map of named fields. The same set of `(key, value)` pairs
//! always serialises to the same bytes, no matter in which order the fields
//! were added, so encoded records can be hashed or compared byte-for-byte.

mod de;
mod error;
mod ser;
mod term;
mod varint;

pub use de::Cursor;
pub use error::{Error, Result};
pub use ser::Serializer;
pub use term::{
    TAG_BYTES, TAG_FALSE, TAG_INT, TAG_LIST, TAG_MAP, TAG_NULL, TAG_TRUE, Term, write_bool,
    write_bytes, write_int, write_null, write_str,
};
pub use varint::{read_varint, write_varint};

//! Type tags and the `Term` sum type.

use crate::{
    error::{Error, Result},
    varint::{read_varint, write_varint},
};

pub const TAG_NULL: u8 = 0x00;
pub const TAG_TRUE: u8 = 0x01;
pub const TAG_FALSE: u8 = 0x02;
pub const TAG_INT: u8 = 0x03;
// 0x04 is reserved upstream; the gap must be preserved.
pub const TAG_BYTES: u8 = 0x05;
pub const TAG_LIST: u8 = 0x06;
pub const TAG_MAP: u8 = 0x07;

/// A tagged VecPak value.
///
/// Strings and raw byte sequences are both `Bytes` on the wire; narrower
/// integers are widened to i64 before encoding. `List` and `Map` can be
/// constructed and written, but only flat records (a top-level map of
/// scalar fields) are supported by [`crate::Cursor`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Term {
    Null,
    Bool(bool),
    Int(i64),
    Bytes(Vec<u8>),
    List(Vec<Term>),
    Map(Vec<(String, Term)>),
}

pub fn write_null(out: &mut Vec<u8>) {
    out.push(TAG_NULL);
}

pub fn write_bool(v: bool, out: &mut Vec<u8>) {
    out.push(if v { TAG_TRUE } else { TAG_FALSE });
}

pub fn write_int(v: i64, out: &mut Vec<u8>) {
    out.push(TAG_INT);
    write_varint(v, out);
}

pub fn write_bytes(v: &[u8], out: &mut Vec<u8>) {
    out.push(TAG_BYTES);
    write_varint(v.len() as i64, out);
    out.extend_from_slice(v);
}

pub fn write_str(v: &str, out: &mut Vec<u8>) {
    write_bytes(v.as_bytes(), out);
}

impl Term {
    /// Appends the encoded form of this term to `out`.
    ///
    /// Map fields are emitted in canonical order (sorted by encoded key
    /// bytes), the same order [`crate::Serializer`] produces.
    pub fn write(&self, out: &mut Vec<u8>) {
        match self {
            Term::Null => write_null(out),
            Term::Bool(v) => write_bool(*v, out),
            Term::Int(v) => write_int(*v, out),
            Term::Bytes(v) => write_bytes(v, out),
            Term::List(items) => {
                out.push(TAG_LIST);
                write_varint(items.len() as i64, out);
                for item in items {
                    item.write(out);
                }
            }
            Term::Map(fields) => {
                let mut encoded: Vec<(Vec<u8>, &Term)> = fields
                    .iter()
                    .map(|(key, value)| {
                        let mut key_bytes = Vec::new();
                        write_str(key, &mut key_bytes);
                        (key_bytes, value)
                    })
                    .collect();
                encoded.sort_by(|a, b| a.0.cmp(&b.0));
                out.push(TAG_MAP);
                write_varint(encoded.len() as i64, out);
                for (key_bytes, value) in encoded {
                    out.extend_from_slice(&key_bytes);
                    value.write(out);
                }
            }
        }
    }

    /// Reads one scalar term at `pos`.
    ///
    /// `List` and nested `Map` are not decoded; hitting either tag fails
    /// with [`Error::UnsupportedType`] so a corrupt or newer-format buffer
    /// never yields partial data.
    pub fn read(buf: &[u8], pos: &mut usize) -> Result<Term> {
        let tag = *buf.get(*pos).ok_or(Error::Eof)?;
        *pos += 1;
        match tag {
            TAG_NULL => Ok(Term::Null),
            TAG_TRUE => Ok(Term::Bool(true)),
            TAG_FALSE => Ok(Term::Bool(false)),
            TAG_INT => Ok(Term::Int(read_varint(buf, pos)?)),
            TAG_BYTES => {
                let len = usize::try_from(read_varint(buf, pos)?).map_err(|_| Error::Eof)?;
                let end = pos.checked_add(len).ok_or(Error::Eof)?;
                let bytes = buf.get(*pos..end).ok_or(Error::Eof)?;
                *pos = end;
                Ok(Term::Bytes(bytes.to_vec()))
            }
            other => Err(Error::UnsupportedType(other)),
        }
    }
}

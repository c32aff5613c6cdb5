//! Sequential record decoding.

use crate::{
    error::{Error, Result},
    term::{TAG_BYTES, TAG_FALSE, TAG_INT, TAG_LIST, TAG_MAP, TAG_NULL, TAG_TRUE, Term},
    varint::read_varint,
};

/// Walks an encoded record field by field.
///
/// The constructor consumes the map header; callers then alternate
/// [`next_key`] with exactly one typed read (or [`skip`]) per field.
/// A cursor is owned by a single decoding pass and never shared.
///
/// Unrecognised fields can be skipped, so a reader built against an older
/// schema keeps working when a newer writer adds fields:
///
/// ```
/// use vecpak::{Cursor, Serializer};
///
/// let mut ser = Serializer::new();
/// ser.add_int("hp", 20).add_str("title", "the Bold");
/// let bytes = ser.finish().unwrap();
///
/// let mut cursor = Cursor::new(&bytes).unwrap();
/// while cursor.has_next() {
///     match cursor.next_key().unwrap().as_str() {
///         "hp" => assert_eq!(cursor.read_int().unwrap(), 20),
///         _ => cursor.skip().unwrap(),
///     }
/// }
/// ```
///
/// [`next_key`]: Cursor::next_key
/// [`skip`]: Cursor::skip
pub struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
    count: usize,
    consumed: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(buf: &'a [u8]) -> Result<Self> {
        let tag = *buf.first().ok_or(Error::Eof)?;
        if tag != TAG_MAP {
            return Err(Error::BadHeader(tag));
        }
        let mut pos = 1;
        // A negative count is corruption, not an empty record.
        let count = usize::try_from(read_varint(buf, &mut pos)?).map_err(|_| Error::Eof)?;
        Ok(Self {
            buf,
            pos,
            count,
            consumed: 0,
        })
    }

    pub fn has_next(&self) -> bool {
        self.consumed < self.count
    }

    /// Decodes the next field key. Keys are always BYTES terms holding UTF-8.
    pub fn next_key(&mut self) -> Result<String> {
        if !self.has_next() {
            return Err(Error::Eof);
        }
        self.consumed += 1;
        self.read_str()
    }

    fn expect_tag(&mut self, expected: u8) -> Result<()> {
        let found = *self.buf.get(self.pos).ok_or(Error::Eof)?;
        if found != expected {
            return Err(Error::TypeMismatch { expected, found });
        }
        self.pos += 1;
        Ok(())
    }

    pub fn read_int(&mut self) -> Result<i64> {
        self.expect_tag(TAG_INT)?;
        read_varint(self.buf, &mut self.pos)
    }

    /// Narrowing reads truncate, mirroring what the writers produce.
    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(self.read_int()? as u16)
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(self.read_int()? as i16)
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        let found = *self.buf.get(self.pos).ok_or(Error::Eof)?;
        self.pos += 1;
        match found {
            TAG_TRUE => Ok(true),
            TAG_FALSE => Ok(false),
            found => Err(Error::TypeMismatch {
                expected: TAG_TRUE,
                found,
            }),
        }
    }

    fn read_len(&mut self) -> Result<usize> {
        // A negative or absurd length claim means the buffer cannot hold
        // the payload anyway.
        usize::try_from(read_varint(self.buf, &mut self.pos)?).map_err(|_| Error::Eof)
    }

    pub fn read_bytes(&mut self) -> Result<Vec<u8>> {
        self.expect_tag(TAG_BYTES)?;
        let len = self.read_len()?;
        let end = self.pos.checked_add(len).ok_or(Error::Eof)?;
        let bytes = self.buf.get(self.pos..end).ok_or(Error::Eof)?;
        self.pos = end;
        Ok(bytes.to_vec())
    }

    pub fn read_str(&mut self) -> Result<String> {
        String::from_utf8(self.read_bytes()?).map_err(|_| Error::InvalidUtf8)
    }

    /// Decodes whichever scalar term comes next.
    pub fn read_term(&mut self) -> Result<Term> {
        Term::read(self.buf, &mut self.pos)
    }

    /// Advances past the next value without interpreting it.
    ///
    /// Only flat payloads can be skipped; a LIST or nested MAP fails with
    /// [`Error::UnsupportedSkip`] rather than guessing at its extent.
    pub fn skip(&mut self) -> Result<()> {
        let tag = *self.buf.get(self.pos).ok_or(Error::Eof)?;
        self.pos += 1;
        match tag {
            TAG_NULL | TAG_TRUE | TAG_FALSE => Ok(()),
            TAG_INT => read_varint(self.buf, &mut self.pos).map(|_| ()),
            TAG_BYTES => {
                let len = self.read_len()?;
                let end = self.pos.checked_add(len).ok_or(Error::Eof)?;
                if self.buf.len() < end {
                    return Err(Error::Eof);
                }
                self.pos = end;
                Ok(())
            }
            TAG_LIST | TAG_MAP => Err(Error::UnsupportedSkip(tag)),
            other => Err(Error::UnsupportedType(other)),
        }
    }
}

//! The canonical record serializer.

use crate::{
    error::{Error, Result},
    term::{self, TAG_MAP},
    varint::write_varint,
};

struct Field {
    key: String,
    key_bytes: Vec<u8>,
    value_bytes: Vec<u8>,
}

/// Collects named fields and emits one deterministic byte buffer.
///
/// Fields are sorted by their *encoded* key bytes before emission, so the
/// output depends only on the logical field set, never on insertion order.
/// The builder owns its field list exclusively until [`finish`] consumes it.
///
/// [`finish`]: Serializer::finish
///
/// ```
/// use vecpak::Serializer;
///
/// let mut ser = Serializer::new();
/// ser.add_int("hp_cur", 20);
/// ser.add_str("name", "Grognak");
/// let record = ser.finish().unwrap();
/// ```
#[derive(Default)]
pub struct Serializer {
    fields: Vec<Field>,
}

impl Serializer {
    pub fn new() -> Self {
        Self::default()
    }

    fn push_field(&mut self, key: &str, value_bytes: Vec<u8>) {
        let mut key_bytes = Vec::new();
        term::write_str(key, &mut key_bytes);
        self.fields.push(Field {
            key: key.to_owned(),
            key_bytes,
            value_bytes,
        });
    }

    pub fn add_int(&mut self, key: &str, value: i64) -> &mut Self {
        let mut out = Vec::new();
        term::write_int(value, &mut out);
        self.push_field(key, out);
        self
    }

    pub fn add_bytes(&mut self, key: &str, value: &[u8]) -> &mut Self {
        let mut out = Vec::new();
        term::write_bytes(value, &mut out);
        self.push_field(key, out);
        self
    }

    pub fn add_str(&mut self, key: &str, value: &str) -> &mut Self {
        self.add_bytes(key, value.as_bytes())
    }

    pub fn add_bool(&mut self, key: &str, value: bool) -> &mut Self {
        let mut out = Vec::new();
        term::write_bool(value, &mut out);
        self.push_field(key, out);
        self
    }

    pub fn add_null(&mut self, key: &str) -> &mut Self {
        let mut out = Vec::new();
        term::write_null(&mut out);
        self.push_field(key, out);
        self
    }

    /// Sorts, checks for duplicates, and emits the record.
    pub fn finish(mut self) -> Result<Vec<u8>> {
        // Bytewise slice order already puts a shorter key that is a prefix
        // of a longer one first, the tie-break the format requires.
        self.fields.sort_by(|a, b| a.key_bytes.cmp(&b.key_bytes));
        for pair in self.fields.windows(2) {
            if pair[0].key_bytes == pair[1].key_bytes {
                return Err(Error::DuplicateKey(pair[1].key.clone()));
            }
        }
        let mut out = Vec::new();
        out.push(TAG_MAP);
        write_varint(self.fields.len() as i64, &mut out);
        for field in &self.fields {
            out.extend_from_slice(&field.key_bytes);
            out.extend_from_slice(&field.value_bytes);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insertion_order_does_not_matter() {
        let mut a = Serializer::new();
        a.add_int("hp_cur", 20).add_int("hp_max", 20).add_int("str", 10);

        let mut b = Serializer::new();
        b.add_int("str", 10).add_int("hp_cur", 20).add_int("hp_max", 20);

        let mut c = Serializer::new();
        c.add_int("hp_max", 20).add_int("str", 10).add_int("hp_cur", 20);

        let bytes = a.finish().unwrap();
        assert_eq!(bytes, b.finish().unwrap());
        assert_eq!(bytes, c.finish().unwrap());
    }

    #[test]
    fn prefix_key_sorts_first() {
        let mut ser = Serializer::new();
        ser.add_int("ab", 2).add_int("a", 1);
        let bytes = ser.finish().unwrap();

        let mut cursor = crate::Cursor::new(&bytes).unwrap();
        assert_eq!(cursor.next_key().unwrap(), "a");
        assert_eq!(cursor.read_int().unwrap(), 1);
        assert_eq!(cursor.next_key().unwrap(), "ab");
        assert_eq!(cursor.read_int().unwrap(), 2);
        assert!(!cursor.has_next());
    }

    #[test]
    fn duplicate_key_is_rejected() {
        let mut ser = Serializer::new();
        ser.add_int("hp", 1).add_int("hp", 2);
        assert_eq!(ser.finish(), Err(Error::DuplicateKey("hp".into())));
    }

    #[test]
    fn empty_record_is_a_bare_map_header() {
        let bytes = Serializer::new().finish().unwrap();
        assert_eq!(bytes, [TAG_MAP, 0x00]);
    }

    #[test]
    fn wire_layout_is_bit_exact() {
        let mut ser = Serializer::new();
        ser.add_int("n", 5);
        // MAP, count=1, key "n" as BYTES, value INT 5.
        assert_eq!(
            ser.finish().unwrap(),
            [0x07, 0x01, 0x01, 0x05, 0x01, 0x01, 0x6e, 0x03, 0x01, 0x05]
        );
    }
}

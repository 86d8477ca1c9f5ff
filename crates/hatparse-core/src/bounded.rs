use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::eeprom::layout::{MAX_CUSTOM_DATA_SIZE, MAX_STRING_LENGTH};

/// Fixed-capacity, NUL-terminated text captured from an EEPROM image.
///
/// The backing buffer holds [`MAX_STRING_LENGTH`] bytes, so at most
/// `MAX_STRING_LENGTH - 1` bytes of text are kept and a terminating NUL is
/// always present. Capture follows C-string rules: it stops at the first NUL
/// in the source.
///
/// # Examples
/// ```
/// use hatparse_core::BoundedString;
///
/// let name = BoundedString::from_bytes(b"Acme\0junk");
/// assert_eq!(name, "Acme");
/// assert_eq!(name.as_bytes_with_nul(), b"Acme\0");
///
/// let long = BoundedString::from_bytes(&[b'x'; 300]);
/// assert_eq!(long.len(), BoundedString::CAPACITY - 1);
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BoundedString {
    buf: [u8; MAX_STRING_LENGTH],
    len: usize,
}

impl BoundedString {
    /// Buffer size in bytes, including the terminating NUL.
    pub const CAPACITY: usize = MAX_STRING_LENGTH;

    pub fn from_bytes(src: &[u8]) -> Self {
        let text = match src.iter().position(|&b| b == 0) {
            Some(nul) => &src[..nul],
            None => src,
        };
        let len = text.len().min(Self::CAPACITY - 1);
        let mut buf = [0u8; MAX_STRING_LENGTH];
        buf[..len].copy_from_slice(&text[..len]);
        Self { buf, len }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    pub fn as_bytes_with_nul(&self) -> &[u8] {
        &self.buf[..=self.len]
    }

    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.as_bytes())
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for BoundedString {
    fn default() -> Self {
        Self {
            buf: [0u8; MAX_STRING_LENGTH],
            len: 0,
        }
    }
}

impl fmt::Debug for BoundedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.to_string_lossy(), f)
    }
}

impl fmt::Display for BoundedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}

impl PartialEq<str> for BoundedString {
    fn eq(&self, other: &str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl PartialEq<&str> for BoundedString {
    fn eq(&self, other: &&str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Serialize for BoundedString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string_lossy())
    }
}

impl<'de> Deserialize<'de> for BoundedString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Ok(Self::from_bytes(text.as_bytes()))
    }
}

/// Custom data atom contents, held in a fixed [`MAX_CUSTOM_DATA_SIZE`] buffer.
///
/// Bytes past the capacity are dropped. `is_json` is derived from the first
/// kept byte (`{` or `[`), both on capture and on deserialization.
///
/// # Examples
/// ```
/// use hatparse_core::CustomData;
/// use hatparse_core::layout::MAX_CUSTOM_DATA_SIZE;
///
/// let custom = CustomData::from_bytes(b"{\"rev\":2}");
/// assert_eq!(custom.data_length(), 9);
/// assert!(custom.is_json());
///
/// let big = CustomData::from_bytes(&[0x55; MAX_CUSTOM_DATA_SIZE + 10]);
/// assert_eq!(big.data_length(), MAX_CUSTOM_DATA_SIZE);
/// ```
#[derive(Clone)]
pub struct CustomData {
    buf: Box<[u8; MAX_CUSTOM_DATA_SIZE]>,
    len: usize,
    is_json: bool,
}

impl CustomData {
    pub const CAPACITY: usize = MAX_CUSTOM_DATA_SIZE;

    pub fn from_bytes(src: &[u8]) -> Self {
        let len = src.len().min(Self::CAPACITY);
        let mut buf = Box::new([0u8; MAX_CUSTOM_DATA_SIZE]);
        buf[..len].copy_from_slice(&src[..len]);
        let is_json = matches!(src.first(), Some(b'{') | Some(b'['));
        Self { buf, len, is_json }
    }

    pub fn data(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    pub fn data_length(&self) -> usize {
        self.len
    }

    pub fn is_json(&self) -> bool {
        self.is_json
    }
}

impl Default for CustomData {
    fn default() -> Self {
        Self::from_bytes(&[])
    }
}

impl PartialEq for CustomData {
    fn eq(&self, other: &Self) -> bool {
        self.data() == other.data() && self.is_json == other.is_json
    }
}

impl Eq for CustomData {}

impl fmt::Debug for CustomData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomData")
            .field("data", &self.data())
            .field("is_json", &self.is_json)
            .finish()
    }
}

#[derive(Serialize)]
struct CustomDataRef<'a> {
    data: &'a [u8],
    is_json: bool,
}

#[derive(Deserialize)]
struct CustomDataOwned {
    data: Vec<u8>,
}

impl Serialize for CustomData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        CustomDataRef {
            data: self.data(),
            is_json: self.is_json,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CustomData {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let owned = CustomDataOwned::deserialize(deserializer)?;
        Ok(Self::from_bytes(&owned.data))
    }
}

#[cfg(test)]
mod tests {
    use super::{BoundedString, CustomData};

    #[test]
    fn default_is_empty_and_terminated() {
        let value = BoundedString::default();
        assert!(value.is_empty());
        assert_eq!(value.as_bytes_with_nul(), &[0]);
    }

    #[test]
    fn full_capacity_source_keeps_terminator() {
        let src = [b'a'; BoundedString::CAPACITY];
        let value = BoundedString::from_bytes(&src);
        assert_eq!(value.len(), BoundedString::CAPACITY - 1);
        assert_eq!(value.as_bytes_with_nul().last(), Some(&0));
    }

    #[test]
    fn stops_at_first_nul() {
        let value = BoundedString::from_bytes(b"overlay\0\0tail");
        assert_eq!(value, "overlay");
    }

    #[test]
    fn serializes_as_plain_string() {
        let value = BoundedString::from_bytes(b"Board1");
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, "\"Board1\"");
        let back: BoundedString = serde_json::from_str(&json).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn invalid_utf8_is_lossy() {
        let value = BoundedString::from_bytes(&[b'A', 0xff]);
        assert_eq!(value.len(), 2);
        assert_eq!(value.to_string_lossy(), "A\u{fffd}");
    }

    #[test]
    fn custom_data_caps_at_capacity() {
        let value = CustomData::from_bytes(&[0x42; CustomData::CAPACITY + 1]);
        assert_eq!(value.data_length(), CustomData::CAPACITY);
        assert!(!value.is_json());
    }

    #[test]
    fn custom_data_deserialize_is_capped() {
        let json = serde_json::json!({
            "data": vec![b'{'; 5000],
            "is_json": false,
        });
        let value: CustomData = serde_json::from_value(json).expect("custom data");
        assert_eq!(value.data_length(), CustomData::CAPACITY);
        assert!(value.is_json());
    }

    #[test]
    fn custom_data_serializes_bytes_and_flag() {
        let value = CustomData::from_bytes(b"[1]");
        let json = serde_json::to_string(&value).expect("json");
        assert_eq!(json, r#"{"data":[91,49,93],"is_json":true}"#);
        let back: CustomData = serde_json::from_str(&json).expect("parse");
        assert_eq!(back, value);
    }
}

use super::error::ReadError;
use super::layout;

pub struct EepromReader<'a> {
    data: &'a [u8],
}

impl<'a> EepromReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    pub fn require_len(&self, needed: usize) -> Result<(), ReadError> {
        if self.data.len() < needed {
            return Err(self.not_enough(needed));
        }
        Ok(())
    }

    pub fn read_u8(&self, offset: usize) -> Result<u8, ReadError> {
        self.data
            .get(offset)
            .copied()
            .ok_or_else(|| self.not_enough(offset.saturating_add(1)))
    }

    pub fn read_u16_le(&self, range: std::ops::Range<usize>) -> Result<u16, ReadError> {
        let bytes = self.read_slice(range)?;
        if bytes.len() != 2 {
            return Err(ReadError::NotEnoughData {
                needed: 2,
                actual: bytes.len(),
            });
        }
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    pub fn read_u32_le(&self, range: std::ops::Range<usize>) -> Result<u32, ReadError> {
        let bytes = self.read_slice(range)?;
        if bytes.len() != 4 {
            return Err(ReadError::NotEnoughData {
                needed: 4,
                actual: bytes.len(),
            });
        }
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn read_slice(&self, range: std::ops::Range<usize>) -> Result<&'a [u8], ReadError> {
        self.data
            .get(range.clone())
            .ok_or_else(|| self.not_enough(range.end))
    }

    /// Reads a field whose length is the byte at `length_at` and whose bytes
    /// start at `start`. The two need not be adjacent.
    pub fn read_length_prefixed(
        &self,
        length_at: usize,
        start: usize,
    ) -> Result<&'a [u8], ReadError> {
        let length = self.read_u8(length_at)? as usize;
        let end = start
            .checked_add(length)
            .ok_or_else(|| self.not_enough(usize::MAX))?;
        self.read_slice(start..end)
    }

    pub fn read_signature(&self) -> Result<&'a [u8], ReadError> {
        self.read_slice(layout::SIGNATURE_RANGE.clone())
    }

    /// Reads the 8-byte atom header starting at `offset`.
    pub fn read_atom_header(&self, offset: usize) -> Result<AtomHeader, ReadError> {
        let end = offset
            .checked_add(layout::ATOM_HEADER_LEN)
            .ok_or_else(|| self.not_enough(usize::MAX))?;
        let header = EepromReader::new(self.read_slice(offset..end)?);
        Ok(AtomHeader {
            atom_type: header.read_u16_le(layout::ATOM_TYPE_RANGE.clone())?,
            count: header.read_u16_le(layout::ATOM_COUNT_RANGE.clone())?,
            data_len: header.read_u32_le(layout::ATOM_DLEN_RANGE.clone())?,
        })
    }

    /// Reads `data_len` payload bytes starting at `start`.
    pub fn read_atom_payload(&self, start: usize, data_len: u32) -> Result<&'a [u8], ReadError> {
        let end = usize::try_from(data_len)
            .ok()
            .and_then(|len| start.checked_add(len))
            .ok_or_else(|| self.not_enough(usize::MAX))?;
        self.read_slice(start..end)
    }

    fn not_enough(&self, needed: usize) -> ReadError {
        ReadError::NotEnoughData {
            needed,
            actual: self.data.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtomHeader {
    pub atom_type: u16,
    pub count: u16,
    pub data_len: u32,
}

#[cfg(test)]
mod tests {
    use super::{AtomHeader, EepromReader};
    use crate::eeprom::error::ReadError;

    #[test]
    fn read_u16_and_u32_little_endian() {
        let data = [0x34, 0x12, 0x78, 0x56, 0x34, 0x12];
        let reader = EepromReader::new(&data);
        assert_eq!(reader.read_u16_le(0..2).unwrap(), 0x1234);
        assert_eq!(reader.read_u32_le(2..6).unwrap(), 0x1234_5678);
    }

    #[test]
    fn read_slice_past_end_is_not_enough_data() {
        let data = [0u8; 4];
        let reader = EepromReader::new(&data);
        let err = reader.read_slice(2..6).unwrap_err();
        assert_eq!(
            err,
            ReadError::NotEnoughData {
                needed: 6,
                actual: 4
            }
        );
    }

    #[test]
    fn read_length_prefixed_in_bounds() {
        let data = [3, b'a', b'b', b'c', b'd'];
        let reader = EepromReader::new(&data);
        assert_eq!(reader.read_length_prefixed(0, 1).unwrap(), b"abc");
    }

    #[test]
    fn read_length_prefixed_past_end() {
        let data = [9, b'a', b'b'];
        let reader = EepromReader::new(&data);
        let err = reader.read_length_prefixed(0, 1).unwrap_err();
        assert!(matches!(err, ReadError::NotEnoughData { needed: 10, .. }));
    }

    #[test]
    fn read_length_prefixed_missing_length_byte() {
        let data: [u8; 0] = [];
        let reader = EepromReader::new(&data);
        assert!(reader.read_length_prefixed(0, 1).is_err());
    }

    #[test]
    fn read_atom_header_fields() {
        let data = [0x03, 0x00, 0x01, 0x00, 0x10, 0x00, 0x00, 0x00];
        let reader = EepromReader::new(&data);
        assert_eq!(
            reader.read_atom_header(0).unwrap(),
            AtomHeader {
                atom_type: 3,
                count: 1,
                data_len: 16,
            }
        );
    }

    #[test]
    fn read_atom_payload_bounds() {
        let data = [0u8; 16];
        let reader = EepromReader::new(&data);
        assert_eq!(reader.read_atom_payload(8, 8).unwrap().len(), 8);
        assert!(reader.read_atom_payload(8, 9).is_err());
        assert!(reader.read_atom_payload(8, u32::MAX).is_err());
    }

    #[test]
    fn read_atom_header_short() {
        let data = [0u8; 7];
        let reader = EepromReader::new(&data);
        assert!(reader.read_atom_header(0).is_err());
        assert!(reader.read_atom_header(usize::MAX - 2).is_err());
    }
}

//! Atom checksum (CRC-16/ARC as written by the HAT image tooling).

use serde::{Deserialize, Serialize};

use super::layout;

/// Outcome of checking an atom's trailing CRC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrcStatus {
    Valid,
    Invalid,
    /// Payload too short to carry a checksum.
    Missing,
}

impl CrcStatus {
    pub fn label(self) -> &'static str {
        match self {
            CrcStatus::Valid => "valid",
            CrcStatus::Invalid => "invalid",
            CrcStatus::Missing => "missing",
        }
    }
}

pub fn crc16(data: &[u8]) -> u16 {
    let mut state = 0u16;
    for &byte in data {
        for bit in 0..8 {
            let carry = state & 0x8000 != 0;
            state = (state << 1) | u16::from((byte >> bit) & 1);
            if carry {
                state ^= layout::CRC16_POLY;
            }
        }
    }
    // Flush 16 zero bits through the register.
    for _ in 0..16 {
        let carry = state & 0x8000 != 0;
        state <<= 1;
        if carry {
            state ^= layout::CRC16_POLY;
        }
    }
    state.reverse_bits()
}

/// Checks the last two payload bytes (little-endian) against the CRC of the
/// bytes before them.
pub fn check_atom_crc(payload: &[u8]) -> CrcStatus {
    let Some(body_len) = payload.len().checked_sub(layout::ATOM_CRC_LEN) else {
        return CrcStatus::Missing;
    };
    let (body, trailer) = payload.split_at(body_len);
    let stored = u16::from_le_bytes([trailer[0], trailer[1]]);
    if crc16(body) == stored {
        CrcStatus::Valid
    } else {
        CrcStatus::Invalid
    }
}

#[cfg(test)]
mod tests {
    use super::{CrcStatus, check_atom_crc, crc16};

    #[test]
    fn crc16_check_value() {
        assert_eq!(crc16(b"123456789"), 0xBB3D);
    }

    #[test]
    fn crc16_empty_is_zero() {
        assert_eq!(crc16(&[]), 0);
    }

    #[test]
    fn atom_crc_valid() {
        let mut payload = b"R-Pi".to_vec();
        payload.extend_from_slice(&crc16(b"R-Pi").to_le_bytes());
        assert_eq!(check_atom_crc(&payload), CrcStatus::Valid);
    }

    #[test]
    fn atom_crc_invalid() {
        let payload = [b'R', b'-', b'P', b'i', 0x00, 0x00];
        assert_eq!(check_atom_crc(&payload), CrcStatus::Invalid);
    }

    #[test]
    fn atom_crc_missing() {
        assert_eq!(check_atom_crc(&[0x01]), CrcStatus::Missing);
        assert_eq!(check_atom_crc(&[]), CrcStatus::Missing);
    }

    #[test]
    fn atom_crc_of_empty_body() {
        assert_eq!(check_atom_crc(&[0x00, 0x00]), CrcStatus::Valid);
    }
}

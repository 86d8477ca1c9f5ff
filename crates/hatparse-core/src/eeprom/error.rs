use thiserror::Error;

use crate::status;

/// Structural errors that reject a whole image.
///
/// Each variant maps to a stable integer code (see [`DecodeError::code`]).
///
/// # Examples
/// ```
/// use hatparse_core::{DecodeError, decode};
///
/// let err = decode(b"R-Pi").unwrap_err();
/// assert_eq!(err, DecodeError::InvalidData { actual: 4 });
/// assert_eq!(err.code(), -2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("invalid signature (not a valid RPi HAT EEPROM)")]
    InvalidSignature,
    #[error("invalid data: image needs at least 12 bytes, got {actual}")]
    InvalidData { actual: usize },
    #[error(
        "buffer too small for specified EEPROM length: declared {declared} bytes, got {actual}"
    )]
    BufferTooSmall { declared: u32, actual: usize },
    #[error("unsupported version 0x{found:02x} (expected 0x02)")]
    UnsupportedVersion { found: u8 },
}

impl DecodeError {
    /// Stable status code for this error.
    pub const fn code(&self) -> i32 {
        match self {
            DecodeError::InvalidSignature => status::PARSE_ERROR_INVALID_SIG,
            DecodeError::InvalidData { .. } => status::PARSE_ERROR_INVALID_DATA,
            DecodeError::BufferTooSmall { .. } => status::PARSE_ERROR_BUFFER_TOO_SMALL,
            DecodeError::UnsupportedVersion { .. } => status::PARSE_ERROR_UNSUPPORTED_VERSION,
        }
    }

    /// Fixed human-readable message associated with [`Self::code`].
    pub fn message(&self) -> &'static str {
        status::error_message(self.code())
    }
}

impl From<ReadError> for DecodeError {
    fn from(value: ReadError) -> Self {
        match value {
            ReadError::NotEnoughData { actual, .. } => DecodeError::InvalidData { actual },
        }
    }
}

/// Bounds failures raised by the byte reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReadError {
    #[error("not enough data: need {needed} bytes, got {actual}")]
    NotEnoughData { needed: usize, actual: usize },
}

#[cfg(test)]
mod tests {
    use super::{DecodeError, ReadError};

    #[test]
    fn read_error_maps_to_invalid_data() {
        let err = ReadError::NotEnoughData {
            needed: 8,
            actual: 4,
        };
        assert_eq!(err.to_string(), "not enough data: need 8 bytes, got 4");
        assert_eq!(
            DecodeError::from(err),
            DecodeError::InvalidData { actual: 4 }
        );
    }

    #[test]
    fn codes_follow_status_contract() {
        assert_eq!(DecodeError::InvalidSignature.code(), -1);
        assert_eq!(DecodeError::UnsupportedVersion { found: 3 }.code(), -4);
        assert_eq!(
            DecodeError::InvalidSignature.message(),
            "Error: Invalid signature (not a valid RPi HAT EEPROM)"
        );
    }
}

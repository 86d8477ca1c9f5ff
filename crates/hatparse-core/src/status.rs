//! Stable integer status codes and their messages.
//!
//! Callers that predate the typed [`DecodeError`](crate::DecodeError) API
//! check these codes; the values and messages are a fixed contract.

use crate::DecodeError;

pub const PARSE_OK: i32 = 0;
pub const PARSE_ERROR_INVALID_SIG: i32 = -1;
pub const PARSE_ERROR_INVALID_DATA: i32 = -2;
pub const PARSE_ERROR_BUFFER_TOO_SMALL: i32 = -3;
pub const PARSE_ERROR_UNSUPPORTED_VERSION: i32 = -4;

/// Message for a status code; unknown codes get a generic message.
///
/// # Examples
/// ```
/// use hatparse_core::status::{PARSE_OK, error_message};
///
/// assert_eq!(error_message(PARSE_OK), "Success");
/// assert_eq!(error_message(42), "Error: Unknown error code");
/// ```
pub fn error_message(code: i32) -> &'static str {
    match code {
        PARSE_OK => "Success",
        PARSE_ERROR_INVALID_SIG => "Error: Invalid signature (not a valid RPi HAT EEPROM)",
        PARSE_ERROR_INVALID_DATA => "Error: Invalid data or NULL pointer",
        PARSE_ERROR_BUFFER_TOO_SMALL => "Error: Buffer too small for specified EEPROM length",
        PARSE_ERROR_UNSUPPORTED_VERSION => "Error: Unsupported version (expected 0x02)",
        _ => "Error: Unknown error code",
    }
}

pub fn status_code<T>(result: &Result<T, DecodeError>) -> i32 {
    match result {
        Ok(_) => PARSE_OK,
        Err(err) => err.code(),
    }
}

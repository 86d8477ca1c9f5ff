//! hatparse core library for Raspberry Pi HAT EEPROM images.
//!
//! A HAT EEPROM image is a fixed 12-byte header followed by a stream of
//! tagged records ("atoms"). This crate validates the header, walks the atom
//! stream and extracts vendor info, custom data and the device-tree overlay
//! into an [`EepromRecord`]. Decoding is byte-oriented and side-effect free;
//! file access lives in `source`, rendering to text lives in `render`.
//!
//! Invariants:
//! - Header validation is strict: the first failing check rejects the image.
//! - The atom walk is lenient: a truncated atom table yields a partial record.
//! - No read ever goes past the caller's buffer.
//! - Text and custom data captures keep the fixed capacities of the format.
//!
//! # Examples
//! ```no_run
//! use std::path::Path;
//!
//! use hatparse_core::decode_file;
//!
//! let record = decode_file(Path::new("board.eep"))?;
//! if let Some(info) = &record.vendor_info {
//!     println!("{} {}", info.vendor, info.product);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::{Deserialize, Serialize};

mod bounded;
mod eeprom;
mod load;
pub mod render;
mod source;
pub mod status;

pub use bounded::{BoundedString, CustomData};
pub use eeprom::{AtomKind, CrcStatus, DecodeError, decode, layout};
pub use load::{LoadError, decode_file, decode_source, report_file};
pub use source::{FileImageSource, ImageSource, SourceError};

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;

/// Decoded image header.
///
/// # Examples
/// ```
/// use hatparse_core::HeaderInfo;
///
/// let header = HeaderInfo {
///     signature: "R-Pi".to_string(),
///     version: 2,
///     reserved: 0,
///     numatoms: 3,
///     eeplen: 256,
/// };
/// assert_eq!(header.numatoms, 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderInfo {
    /// Four ASCII signature bytes (always `R-Pi` on success).
    pub signature: String,
    pub version: u8,
    /// Reserved byte, captured but not validated.
    pub reserved: u8,
    /// Number of atoms the header declares.
    pub numatoms: u16,
    /// Declared total EEPROM length in bytes.
    pub eeplen: u32,
}

/// Board identity from the vendor info atom.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorInfo {
    pub uuid: [u8; 16],
    pub product_id: u16,
    pub product_version: u16,
    pub vendor: BoundedString,
    pub product: BoundedString,
}

impl VendorInfo {
    /// UUID bytes as lowercase hex, in stored order.
    pub fn uuid_hex(&self) -> String {
        self.uuid.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

/// One atom consumed by the walk.
///
/// # Examples
/// ```
/// use hatparse_core::{AtomKind, AtomSummary, CrcStatus};
///
/// let atom = AtomSummary {
///     offset: 12,
///     atom_type: 3,
///     kind: AtomKind::DtOverlay,
///     count: 1,
///     data_len: 10,
///     crc: CrcStatus::Valid,
/// };
/// assert_eq!(atom.kind, AtomKind::DtOverlay);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtomSummary {
    /// Offset of the atom header within the image.
    pub offset: usize,
    /// Raw type tag.
    pub atom_type: u16,
    pub kind: AtomKind,
    /// Count field from the atom header (not interpreted).
    pub count: u16,
    /// Payload length, excluding the 8-byte atom header.
    pub data_len: u32,
    pub crc: CrcStatus,
}

/// Decoded EEPROM image.
///
/// Each optional sub-record is present only when its atom was decoded.
/// `has_gpio_map` is part of the record shape but GPIO map atoms are not
/// decoded yet, so it is always `false`.
///
/// # Examples
/// ```
/// use hatparse_core::EepromRecord;
///
/// let record = EepromRecord::default();
/// assert!(!record.has_vendor_info());
/// assert!(!record.has_gpio_map);
/// assert!(record.atoms.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EepromRecord {
    pub header: HeaderInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_info: Option<VendorInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_data: Option<CustomData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dt_overlay: Option<BoundedString>,
    pub has_gpio_map: bool,
    /// Atoms fully consumed by the walk, in image order.
    pub atoms: Vec<AtomSummary>,
    /// Offset where the walk stopped because the atom table ran past the
    /// end of the buffer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub truncated_at: Option<usize>,
}

impl EepromRecord {
    pub fn has_vendor_info(&self) -> bool {
        self.vendor_info.is_some()
    }

    pub fn has_custom_data(&self) -> bool {
        self.custom_data.is_some()
    }

    pub fn has_dt_overlay(&self) -> bool {
        self.dt_overlay.is_some()
    }

    /// True when the walk stopped early or any atom failed its CRC check.
    pub fn has_integrity_issues(&self) -> bool {
        self.truncated_at.is_some() || self.atoms.iter().any(|atom| atom.crc == CrcStatus::Invalid)
    }
}

/// Tool metadata embedded in reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInfo {
    /// Tool name (e.g., "hatparse").
    pub name: String,
    /// Tool version (semver).
    pub version: String,
}

/// Input image metadata embedded in reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputInfo {
    /// Input path as provided to the decoder.
    pub path: String,
    /// Input size in bytes.
    pub bytes: u64,
}

/// Versioned JSON report wrapping a decoded record.
///
/// # Examples
/// ```
/// use hatparse_core::{EepromRecord, make_report};
///
/// let report = make_report("board.eep", 128, EepromRecord::default());
/// assert_eq!(report.report_version, hatparse_core::REPORT_VERSION);
/// assert_eq!(report.input.bytes, 128);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    pub tool: ToolInfo,
    pub input: InputInfo,
    pub eeprom: EepromRecord,
}

pub fn make_report(input_path: &str, input_bytes: u64, eeprom: EepromRecord) -> Report {
    Report {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "hatparse".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        input: InputInfo {
            path: input_path.to_string(),
            bytes: input_bytes,
        },
        eeprom,
    }
}

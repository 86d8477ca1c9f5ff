use log::{debug, trace};

use super::atom::{self, AtomKind};
use super::crc::check_atom_crc;
use super::error::DecodeError;
use super::layout;
use super::reader::EepromReader;
use crate::{AtomSummary, EepromRecord, HeaderInfo};

/// Decodes a complete HAT EEPROM image.
///
/// Header validation is strict and short-circuits on the first failure.
/// The atom walk is lenient: when the atom table runs past the end of
/// `buffer`, the walk stops and the atoms consumed so far are returned with
/// [`EepromRecord::truncated_at`] set.
///
/// # Examples
/// ```
/// use hatparse_core::{DecodeError, decode};
///
/// let mut image = b"R-Pi".to_vec();
/// image.extend_from_slice(&[0x02, 0x00]); // version, reserved
/// image.extend_from_slice(&0u16.to_le_bytes()); // no atoms
/// image.extend_from_slice(&12u32.to_le_bytes()); // eeplen
///
/// let record = decode(&image)?;
/// assert_eq!(record.header.signature, "R-Pi");
/// assert!(record.vendor_info.is_none());
///
/// image[4] = 0x01;
/// assert_eq!(decode(&image), Err(DecodeError::UnsupportedVersion { found: 1 }));
/// # Ok::<(), DecodeError>(())
/// ```
pub fn decode(buffer: &[u8]) -> Result<EepromRecord, DecodeError> {
    let reader = EepromReader::new(buffer);
    let header = read_header(&reader, buffer.len())?;
    let mut record = EepromRecord {
        header,
        ..EepromRecord::default()
    };
    walk_atoms(&reader, &mut record);
    Ok(record)
}

fn read_header(reader: &EepromReader<'_>, actual: usize) -> Result<HeaderInfo, DecodeError> {
    reader.require_len(layout::HEADER_LEN)?;

    let signature = reader.read_signature()?;
    if signature != layout::SIGNATURE {
        return Err(DecodeError::InvalidSignature);
    }

    let version = reader.read_u8(layout::VERSION_OFFSET)?;
    if version != layout::SUPPORTED_VERSION {
        return Err(DecodeError::UnsupportedVersion { found: version });
    }

    let reserved = reader.read_u8(layout::RESERVED_OFFSET)?;
    let numatoms = reader.read_u16_le(layout::NUMATOMS_RANGE.clone())?;
    let eeplen = reader.read_u32_le(layout::EEPLEN_RANGE.clone())?;
    if usize::try_from(eeplen).map_or(true, |declared| declared > actual) {
        return Err(DecodeError::BufferTooSmall {
            declared: eeplen,
            actual,
        });
    }

    Ok(HeaderInfo {
        signature: String::from_utf8_lossy(signature).into_owned(),
        version,
        reserved,
        numatoms,
        eeplen,
    })
}

fn walk_atoms(reader: &EepromReader<'_>, record: &mut EepromRecord) {
    let mut offset = layout::FIRST_ATOM_OFFSET;

    for index in 0..record.header.numatoms {
        let atom = match reader.read_atom_header(offset) {
            Ok(atom) => atom,
            Err(err) => {
                debug!("atom table truncated at offset {offset} (atom {index}): {err}");
                record.truncated_at = Some(offset);
                return;
            }
        };

        let data_start = offset + layout::ATOM_HEADER_LEN;
        let payload = match reader.read_atom_payload(data_start, atom.data_len) {
            Ok(payload) => payload,
            Err(err) => {
                debug!(
                    "atom {index} at offset {offset} declares {} payload bytes past the end: {err}",
                    atom.data_len
                );
                record.truncated_at = Some(offset);
                return;
            }
        };

        let kind = AtomKind::from_type(atom.atom_type);
        trace!(
            "atom {index}: {} (type 0x{:04x}) at offset {offset}, {} bytes",
            kind.name(),
            atom.atom_type,
            payload.len()
        );

        match kind {
            AtomKind::VendorInfo => match atom::parse_vendor_info(payload) {
                Ok(info) => record.vendor_info = Some(info),
                Err(err) => debug!("skipping malformed vendor info atom at offset {offset}: {err}"),
            },
            AtomKind::CustomData => {
                if has_reserved_vendor(record) {
                    trace!("ignoring custom data atom for {}", layout::RESERVED_VENDOR);
                } else {
                    record.custom_data = Some(atom::parse_custom_data(payload));
                }
            }
            AtomKind::DtOverlay => record.dt_overlay = Some(atom::parse_dt_overlay(payload)),
            // GPIO map payloads are not decoded and has_gpio_map stays false.
            AtomKind::GpioMap
            | AtomKind::GpioMapBank1
            | AtomKind::PowerSupply
            | AtomKind::Unknown => {}
        }

        record.atoms.push(AtomSummary {
            offset,
            atom_type: atom.atom_type,
            kind,
            count: atom.count,
            data_len: atom.data_len,
            crc: check_atom_crc(payload),
        });
        offset = data_start + payload.len();
    }
}

fn has_reserved_vendor(record: &EepromRecord) -> bool {
    record
        .vendor_info
        .as_ref()
        .is_some_and(|info| info.vendor == layout::RESERVED_VENDOR)
}

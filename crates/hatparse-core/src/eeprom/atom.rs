use serde::{Deserialize, Serialize};

use super::error::ReadError;
use super::layout;
use super::reader::EepromReader;
use crate::{BoundedString, CustomData, VendorInfo};

/// Atom type tags known to the decoder.
///
/// Only vendor info, device-tree overlay and custom data carry extracted
/// payloads; the other kinds are named for listings only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AtomKind {
    VendorInfo,
    GpioMap,
    DtOverlay,
    CustomData,
    GpioMapBank1,
    PowerSupply,
    Unknown,
}

impl AtomKind {
    pub fn from_type(atom_type: u16) -> Self {
        match atom_type {
            layout::ATOM_TYPE_VENDOR_INFO => AtomKind::VendorInfo,
            layout::ATOM_TYPE_GPIO_MAP => AtomKind::GpioMap,
            layout::ATOM_TYPE_DT_OVERLAY => AtomKind::DtOverlay,
            layout::ATOM_TYPE_CUSTOM => AtomKind::CustomData,
            layout::ATOM_TYPE_GPIO_MAP_BANK1 => AtomKind::GpioMapBank1,
            layout::ATOM_TYPE_POWER_SUPPLY => AtomKind::PowerSupply,
            _ => AtomKind::Unknown,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AtomKind::VendorInfo => "vendor_info",
            AtomKind::GpioMap => "gpio_map",
            AtomKind::DtOverlay => "dt_overlay",
            AtomKind::CustomData => "custom_data",
            AtomKind::GpioMapBank1 => "gpio_map_bank1",
            AtomKind::PowerSupply => "power_supply",
            AtomKind::Unknown => "unknown",
        }
    }
}

/// Decodes a vendor info payload. Every read is bounded by `payload`.
pub fn parse_vendor_info(payload: &[u8]) -> Result<VendorInfo, ReadError> {
    let reader = EepromReader::new(payload);
    reader.require_len(layout::VENDOR_FIXED_LEN)?;

    let mut uuid = [0u8; 16];
    uuid.copy_from_slice(reader.read_slice(layout::VENDOR_UUID_RANGE.clone())?);
    let product_id = reader.read_u16_le(layout::VENDOR_PRODUCT_ID_RANGE.clone())?;
    let product_version = reader.read_u16_le(layout::VENDOR_PRODUCT_VERSION_RANGE.clone())?;

    let vendor =
        reader.read_length_prefixed(layout::VENDOR_NAME_LEN_OFFSET, layout::VENDOR_NAME_OFFSET)?;
    let product_start = layout::VENDOR_NAME_OFFSET + vendor.len();
    let product = reader.read_length_prefixed(layout::PRODUCT_NAME_LEN_OFFSET, product_start)?;

    Ok(VendorInfo {
        uuid,
        product_id,
        product_version,
        vendor: BoundedString::from_bytes(vendor),
        product: BoundedString::from_bytes(product),
    })
}

/// Captures a custom data payload, minus its trailing CRC, capped at
/// [`layout::MAX_CUSTOM_DATA_SIZE`].
pub fn parse_custom_data(payload: &[u8]) -> CustomData {
    CustomData::from_bytes(&payload[..captured_len(payload)])
}

pub fn parse_dt_overlay(payload: &[u8]) -> BoundedString {
    BoundedString::from_bytes(&payload[..captured_len(payload)])
}

// Payloads of 0 or 1 bytes capture nothing.
fn captured_len(payload: &[u8]) -> usize {
    payload.len().saturating_sub(layout::ATOM_CRC_LEN)
}

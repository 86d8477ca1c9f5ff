pub const SIGNATURE: &[u8; 4] = b"R-Pi";
pub const SUPPORTED_VERSION: u8 = 0x02;

pub const SIGNATURE_RANGE: std::ops::Range<usize> = 0..4;
pub const VERSION_OFFSET: usize = 4;
pub const RESERVED_OFFSET: usize = 5;
pub const NUMATOMS_RANGE: std::ops::Range<usize> = 6..8;
pub const EEPLEN_RANGE: std::ops::Range<usize> = 8..12;
pub const HEADER_LEN: usize = 12;
pub const FIRST_ATOM_OFFSET: usize = HEADER_LEN;

// Relative to the start of an atom.
pub const ATOM_TYPE_RANGE: std::ops::Range<usize> = 0..2;
pub const ATOM_COUNT_RANGE: std::ops::Range<usize> = 2..4;
pub const ATOM_DLEN_RANGE: std::ops::Range<usize> = 4..8;
pub const ATOM_HEADER_LEN: usize = 8;

pub const ATOM_TYPE_VENDOR_INFO: u16 = 0x0001;
pub const ATOM_TYPE_GPIO_MAP: u16 = 0x0002;
pub const ATOM_TYPE_DT_OVERLAY: u16 = 0x0003;
pub const ATOM_TYPE_CUSTOM: u16 = 0x0004;
pub const ATOM_TYPE_GPIO_MAP_BANK1: u16 = 0x0005;
pub const ATOM_TYPE_POWER_SUPPLY: u16 = 0x0006;

// Relative to the start of a vendor info payload.
pub const VENDOR_UUID_RANGE: std::ops::Range<usize> = 0..16;
pub const VENDOR_PRODUCT_ID_RANGE: std::ops::Range<usize> = 16..18;
pub const VENDOR_PRODUCT_VERSION_RANGE: std::ops::Range<usize> = 18..20;
pub const VENDOR_NAME_LEN_OFFSET: usize = 20;
pub const PRODUCT_NAME_LEN_OFFSET: usize = 21;
pub const VENDOR_NAME_OFFSET: usize = 22;
pub const VENDOR_FIXED_LEN: usize = VENDOR_NAME_OFFSET;

/// Trailing CRC-16 carried by every atom payload.
pub const ATOM_CRC_LEN: usize = 2;
pub const CRC16_POLY: u16 = 0x8005;

pub const MAX_STRING_LENGTH: usize = 256;
pub const MAX_CUSTOM_DATA_SIZE: usize = 4096;

/// Vendor whose boards ship custom-data atoms that must not be captured.
pub const RESERVED_VENDOR: &str = "Analog Devices Inc.";

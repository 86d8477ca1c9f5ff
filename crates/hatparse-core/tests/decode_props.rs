//! Property-based tests for the decoder.
//!
//! Uses `proptest` to feed arbitrary and near-valid images to `decode` and
//! check that it never panics, is deterministic, and keeps its capacity
//! bounds.

use hatparse_core::layout::{
    ATOM_TYPE_CUSTOM, ATOM_TYPE_VENDOR_INFO, EEPLEN_RANGE, MAX_CUSTOM_DATA_SIZE, SIGNATURE,
    SUPPORTED_VERSION,
};
use hatparse_core::{BoundedString, DecodeError, decode};
use proptest::prelude::*;

fn header(numatoms: u16) -> Vec<u8> {
    let mut image = SIGNATURE.to_vec();
    image.push(SUPPORTED_VERSION);
    image.push(0);
    image.extend_from_slice(&numatoms.to_le_bytes());
    image.extend_from_slice(&0u32.to_le_bytes());
    image
}

fn push_atom(image: &mut Vec<u8>, atom_type: u16, data_len: u32, payload: &[u8]) {
    image.extend_from_slice(&atom_type.to_le_bytes());
    image.extend_from_slice(&0u16.to_le_bytes());
    image.extend_from_slice(&data_len.to_le_bytes());
    image.extend_from_slice(payload);
}

fn fix_eeplen(image: &mut [u8]) {
    let len = image.len() as u32;
    image[EEPLEN_RANGE].copy_from_slice(&len.to_le_bytes());
}

/// A valid header followed by arbitrary atom-table bytes.
fn near_valid_image() -> impl Strategy<Value = Vec<u8>> {
    (any::<u16>(), prop::collection::vec(any::<u8>(), 0..512)).prop_map(|(numatoms, body)| {
        let mut image = header(numatoms);
        image.extend_from_slice(&body);
        fix_eeplen(&mut image);
        image
    })
}

proptest! {
    #[test]
    fn never_panics_on_arbitrary_bytes(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        let _ = decode(&bytes);
    }

    #[test]
    fn walk_is_bounded_and_deterministic(image in near_valid_image()) {
        let first = decode(&image).unwrap();
        let second = decode(&image).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert!(first.atoms.len() <= first.header.numatoms as usize);
        for atom in &first.atoms {
            prop_assert!(atom.offset + 8 + atom.data_len as usize <= image.len());
        }
        prop_assert!(!first.has_gpio_map);
    }

    #[test]
    fn short_inputs_are_invalid_data(bytes in prop::collection::vec(any::<u8>(), 0..12)) {
        prop_assert_eq!(
            decode(&bytes),
            Err(DecodeError::InvalidData { actual: bytes.len() })
        );
    }

    #[test]
    fn foreign_signatures_rejected(sig in prop::array::uniform4(any::<u8>())) {
        prop_assume!(&sig != SIGNATURE);
        let mut image = header(0);
        image[..4].copy_from_slice(&sig);
        fix_eeplen(&mut image);
        prop_assert_eq!(decode(&image), Err(DecodeError::InvalidSignature));
    }

    #[test]
    fn other_versions_rejected(version in any::<u8>()) {
        prop_assume!(version != SUPPORTED_VERSION);
        let mut image = header(0);
        image[4] = version;
        fix_eeplen(&mut image);
        prop_assert_eq!(decode(&image), Err(DecodeError::UnsupportedVersion { found: version }));
    }

    #[test]
    fn declared_length_past_buffer_rejected(extra in 1u32..10_000) {
        let mut image = header(0);
        let declared = image.len() as u32 + extra;
        image[EEPLEN_RANGE].copy_from_slice(&declared.to_le_bytes());
        let is_too_small = matches!(
            decode(&image),
            Err(DecodeError::BufferTooSmall { .. })
        );
        prop_assert!(is_too_small);
    }

    #[test]
    fn custom_data_capped(len in 0usize..(MAX_CUSTOM_DATA_SIZE + 600), first in any::<u8>()) {
        let mut payload = vec![b'x'; len];
        if let Some(byte) = payload.first_mut() {
            *byte = first;
        }
        let mut image = header(1);
        push_atom(&mut image, ATOM_TYPE_CUSTOM, len as u32, &payload);
        fix_eeplen(&mut image);

        let record = decode(&image).unwrap();
        let custom = record.custom_data.expect("custom data");
        let expected = len.saturating_sub(2).min(MAX_CUSTOM_DATA_SIZE);
        prop_assert_eq!(custom.data_length(), expected);
        let json_like = expected > 0 && (first == b'{' || first == b'[');
        prop_assert_eq!(custom.is_json(), json_like);
    }

    #[test]
    fn vendor_strings_always_terminated(
        vendor in prop::collection::vec(1u8..=255, 0..=255),
        product in prop::collection::vec(1u8..=255, 0..=255),
    ) {
        let mut payload = vec![0u8; 20];
        payload.push(vendor.len() as u8);
        payload.push(product.len() as u8);
        payload.extend_from_slice(&vendor);
        payload.extend_from_slice(&product);
        payload.extend_from_slice(&[0, 0]);

        let mut image = header(1);
        push_atom(&mut image, ATOM_TYPE_VENDOR_INFO, payload.len() as u32, &payload);
        fix_eeplen(&mut image);

        let record = decode(&image).unwrap();
        let info = record.vendor_info.expect("vendor info");
        for (field, source) in [(&info.vendor, &vendor), (&info.product, &product)] {
            prop_assert!(field.len() < BoundedString::CAPACITY);
            prop_assert_eq!(field.as_bytes(), source.as_slice());
            prop_assert_eq!(field.as_bytes_with_nul().last(), Some(&0u8));
        }
    }
}

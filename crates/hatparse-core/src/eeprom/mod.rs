//! HAT EEPROM image decoding.
//!
//! The parser validates the 12-byte header (signature, version, declared
//! length) and then walks the atom table. Vendor info, device-tree overlay
//! and custom data atoms are extracted; every other atom is listed and
//! skipped. A truncated atom table ends the walk without failing the parse.
//!
//! Layered like the other binary decoders in this workspace:
//! - `layout`: byte offsets, type tags and capacities (source of truth)
//! - `reader`: bounds-checked little-endian reads
//! - `atom`: per-atom payload extraction
//! - `crc`: atom checksum
//! - `parser`: header validation and the atom walk
//! - `error`: structural and read errors
//!
//! Version française (résumé):
//! Le module valide l'en-tête (signature, version, longueur déclarée) puis
//! parcourt les atomes. Une table d'atomes tronquée arrête le parcours sans
//! erreur. Les positions sont dans `layout`, les lectures sûres dans `reader`.

pub mod atom;
pub mod crc;
pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use atom::AtomKind;
pub use crc::CrcStatus;
pub use error::DecodeError;
pub use parser::decode;

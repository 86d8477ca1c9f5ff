//! Line-oriented text rendering of decoded records.
//!
//! Rendering never touches the decoder; it consumes an [`EepromRecord`] and
//! hands one line at a time to a [`LineSink`].

use crate::status::{error_message, status_code};
use crate::{EepromRecord, decode};

/// Number of custom data bytes shown in a hex dump.
pub const HEX_DUMP_LIMIT: usize = 64;
const HEX_DUMP_ROW: usize = 16;

/// Receives rendered output, one line per call (no trailing newline).
pub trait LineSink {
    fn line(&mut self, line: &str);
}

/// Default sink: one `println!` per line.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl LineSink for StdoutSink {
    fn line(&mut self, line: &str) {
        println!("{line}");
    }
}

impl LineSink for Vec<String> {
    fn line(&mut self, line: &str) {
        self.push(line.to_string());
    }
}

/// Adapts a closure into a [`LineSink`].
///
/// # Examples
/// ```
/// use hatparse_core::render::{FnSink, LineSink};
///
/// let mut count = 0;
/// let mut sink = FnSink(|_line: &str| count += 1);
/// sink.line("a");
/// sink.line("b");
/// drop(sink);
/// assert_eq!(count, 2);
/// ```
pub struct FnSink<F>(pub F);

impl<F: FnMut(&str)> LineSink for FnSink<F> {
    fn line(&mut self, line: &str) {
        (self.0)(line)
    }
}

pub fn render_record(record: &EepromRecord, sink: &mut dyn LineSink) {
    let header = &record.header;
    sink.line(&format!("EEPROM Signature: {}", header.signature));
    sink.line("Valid Raspberry Pi HAT EEPROM detected!");
    sink.line("");
    sink.line("Header Info:");
    sink.line(&format!("  Signature: {}", header.signature));
    sink.line(&format!("  Version: 0x{:02x}", header.version));
    sink.line(&format!("  Number of Atoms: {}", header.numatoms));
    sink.line(&format!("  EEPROM Length: {} bytes", header.eeplen));

    if let Some(info) = &record.vendor_info {
        sink.line("");
        sink.line("Vendor Information:");
        sink.line(&format!("  Product ID: {}", info.product_id));
        sink.line(&format!("  Product Version: {}", info.product_version));
        sink.line(&format!("  Vendor: {}", info.vendor));
        sink.line(&format!("  Board: {}", info.product));
        sink.line(&format!("  UUID: {}", info.uuid_hex()));
    }

    if let Some(custom) = &record.custom_data {
        sink.line("");
        sink.line(&format!("Custom Data ({} bytes):", custom.data_length()));
        if custom.is_json() {
            let end = custom
                .data()
                .iter()
                .rposition(|&b| b != 0)
                .map_or(0, |last| last + 1);
            let text = String::from_utf8_lossy(&custom.data()[..end]);
            sink.line(&format!("  JSON: {text}"));
        } else {
            sink.line(&format!("  Hex data (first {HEX_DUMP_LIMIT} bytes):"));
            let shown = &custom.data()[..custom.data_length().min(HEX_DUMP_LIMIT)];
            for row in shown.chunks(HEX_DUMP_ROW) {
                let hex: String = row.iter().map(|b| format!("{:02x} ", b)).collect();
                sink.line(&format!("    {hex}"));
            }
        }
    }

    if let Some(overlay) = &record.dt_overlay {
        sink.line(&format!("  Overlay: {overlay}"));
    }

    if !record.atoms.is_empty() || record.truncated_at.is_some() {
        sink.line("");
        sink.line("Atoms:");
        for (index, atom) in record.atoms.iter().enumerate() {
            sink.line(&format!(
                "  #{index} {} (type 0x{:04x}) at offset {}: {} bytes, crc {}",
                atom.kind.name(),
                atom.atom_type,
                atom.offset,
                atom.data_len,
                atom.crc.label()
            ));
        }
        if let Some(offset) = record.truncated_at {
            sink.line(&format!("  Atom table truncated at offset {offset}"));
        }
    }
}

/// Decodes `buffer` and renders the result, or the error message on
/// failure. Returns the status code. `None` renders to stdout.
///
/// # Examples
/// ```
/// use hatparse_core::render::print_decode;
/// use hatparse_core::status::PARSE_ERROR_INVALID_SIG;
///
/// let mut lines = Vec::new();
/// let code = print_decode(b"NOPE\x02\x00\x00\x00\x0c\x00\x00\x00", Some(&mut lines));
/// assert_eq!(code, PARSE_ERROR_INVALID_SIG);
/// assert_eq!(lines, ["Error: Invalid signature (not a valid RPi HAT EEPROM)"]);
/// ```
pub fn print_decode(buffer: &[u8], sink: Option<&mut dyn LineSink>) -> i32 {
    match sink {
        Some(sink) => decode_into(buffer, sink),
        None => decode_into(buffer, &mut StdoutSink),
    }
}

fn decode_into(buffer: &[u8], sink: &mut dyn LineSink) -> i32 {
    let result = decode(buffer);
    let code = status_code(&result);
    match result {
        Ok(record) => render_record(&record, sink),
        Err(_) => sink.line(error_message(code)),
    }
    code
}

mod file;

pub use file::FileImageSource;

use thiserror::Error;

/// Anything that can produce a raw EEPROM image.
///
/// Decoding never depends on where the bytes came from; hardware transports
/// plug in here.
pub trait ImageSource {
    fn read_image(&mut self) -> Result<Vec<u8>, SourceError>;
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

use std::path::Path;

use log::debug;
use thiserror::Error;

use crate::source::{FileImageSource, ImageSource, SourceError};
use crate::{DecodeError, EepromRecord, Report, decode, make_report};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),
}

pub fn decode_file(path: &Path) -> Result<EepromRecord, LoadError> {
    let source = FileImageSource::open(path)?;
    decode_source(source)
}

pub fn decode_source<S: ImageSource>(mut source: S) -> Result<EepromRecord, LoadError> {
    let image = source.read_image()?;
    Ok(decode(&image)?)
}

/// Decodes an image file and wraps the record in a versioned [`Report`].
pub fn report_file(path: &Path) -> Result<Report, LoadError> {
    let mut source = FileImageSource::open(path)?;
    let image = source.read_image()?;
    debug!(
        "read {} bytes from {}",
        image.len(),
        source.path().display()
    );
    let eeprom = decode(&image)?;
    Ok(make_report(
        &path.display().to_string(),
        image.len() as u64,
        eeprom,
    ))
}

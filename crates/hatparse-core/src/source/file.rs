use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use super::{ImageSource, SourceError};

/// Reads an image dumped to a file (e.g. an `.eep` produced by the image
/// tooling or a raw EEPROM read-back).
pub struct FileImageSource {
    path: PathBuf,
    file: File,
}

impl FileImageSource {
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let file = File::open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ImageSource for FileImageSource {
    fn read_image(&mut self) -> Result<Vec<u8>, SourceError> {
        let mut image = Vec::new();
        self.file.read_to_end(&mut image)?;
        Ok(image)
    }
}

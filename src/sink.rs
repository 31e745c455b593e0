//! Where a finished image goes.

use crate::error::{RenderError, Result};
use crate::geometry::Bound;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Accepts one finished image as its dimensions and a row-major RGB
/// byte buffer, three bytes per pixel.
pub trait ImageSink {
    /// Encode and store the image.
    fn write(&self, bound: Bound, rgb: &[u8]) -> Result<()>;
}

/// Writes the image to a file; the format follows the file extension.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    /// Constructor.
    pub fn new<P: AsRef<Path>>(path: P) -> FileSink {
        FileSink {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Destination path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ImageSink for FileSink {
    fn write(&self, bound: Bound, rgb: &[u8]) -> Result<()> {
        let buffer = image::RgbImage::from_raw(bound.width, bound.height, rgb.to_vec())
            .ok_or_else(|| {
                RenderError::Encode(format!(
                    "{} bytes do not make a {} RGB image",
                    rgb.len(),
                    bound
                ))
            })?;
        buffer
            .save(&self.path)
            .map_err(|err| RenderError::Encode(format!("{}: {}", self.path.display(), err)))?;
        info!("wrote {} image to {}", bound, self.path.display());
        Ok(())
    }
}

/// Keeps the last image written to it.
#[derive(Debug, Default)]
pub struct MemorySink {
    image: Mutex<Option<(Bound, Vec<u8>)>>,
}

impl MemorySink {
    /// An empty sink.
    pub fn new() -> MemorySink {
        MemorySink::default()
    }

    /// Remove and return the stored image, if any.
    pub fn take(&self) -> Option<(Bound, Vec<u8>)> {
        match self.image.lock() {
            Ok(mut image) => image.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        }
    }
}

impl ImageSink for MemorySink {
    fn write(&self, bound: Bound, rgb: &[u8]) -> Result<()> {
        let mut image = self
            .image
            .lock()
            .map_err(|_| RenderError::Encode("memory sink lock poisoned".to_string()))?;
        *image = Some((bound, rgb.to_vec()));
        Ok(())
    }
}

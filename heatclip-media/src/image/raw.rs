use anyhow::{Context, Result};
use image::RgbImage;
use std::path::Path;

/// Decoded 3-channel frame. Frames of one clip always share the same
/// spatial size once they leave the augmentation pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct RawImage {
    pub(crate) inner: RgbImage,
}

impl RawImage {
    pub fn open_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let decoded = image::open(path)
            .with_context(|| format!("failed to decode frame {}", path.display()))?;

        Ok(Self {
            inner: decoded.to_rgb8(),
        })
    }

    /// All-zero padding frame.
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            inner: RgbImage::new(width, height),
        }
    }

    pub fn from_rgb(inner: RgbImage) -> Self {
        Self { inner }
    }

    pub fn get_width(&self) -> u32 {
        self.inner.width()
    }

    pub fn get_height(&self) -> u32 {
        self.inner.height()
    }

    pub fn get_size(&self) -> (u32, u32) {
        (self.inner.width(), self.inner.height())
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        self.inner.get_pixel(x, y).0
    }

    pub fn raw_data(&self) -> &[u8] {
        self.inner.as_raw()
    }

    pub fn as_rgb(&self) -> &RgbImage {
        &self.inner
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.inner
            .save(path)
            .with_context(|| format!("failed to save image to {}", path.display()))
    }
}

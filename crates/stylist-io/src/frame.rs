//! Frame type — decoded RGBA photo, brightness check, pixel access for sampling.

use image::RgbaImage;
use std::path::Path;
use stylist_core::PixelSource;

/// Fraction of dark pixels above which a photo is flagged as too dark.
pub const DARK_FRAME_THRESHOLD: f32 = 0.95;

/// A decoded photo in natural pixel coordinates.
#[derive(Clone)]
pub struct Frame {
    /// RGBA pixel data, row-major (width * height * 4 bytes).
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl Frame {
    /// Decode an image file in any format the `image` crate understands.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, FrameError> {
        let path = path.as_ref();
        let decoded = image::open(path).map_err(|source| FrameError::Decode {
            path: path.display().to_string(),
            source,
        })?;
        let frame = Self::from_image(decoded.to_rgba8());
        tracing::debug!(
            path = %path.display(),
            width = frame.width,
            height = frame.height,
            "photo decoded"
        );
        Ok(frame)
    }

    /// Wrap raw RGBA bytes, checking the length against the dimensions.
    pub fn from_rgba(data: Vec<u8>, width: u32, height: u32) -> Result<Self, FrameError> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(FrameError::InvalidLength {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { data, width, height })
    }

    pub fn from_image(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            data: image.into_raw(),
            width,
            height,
        }
    }

    pub fn to_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| image::Rgba(self.pixel(x, y)))
    }

    /// Average Rec.601 luma (0.0–255.0), ignoring alpha.
    pub fn avg_brightness(&self) -> f32 {
        if self.data.is_empty() {
            return 0.0;
        }
        let total: f32 = self.data.chunks_exact(4).map(luma).sum();
        total / (self.data.len() / 4) as f32
    }

    /// Whether most of the photo is too dark to sample skin from.
    pub fn is_dark(&self) -> bool {
        is_dark_rgba(&self.data, DARK_FRAME_THRESHOLD)
    }
}

impl PixelSource for Frame {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }
}

fn luma(px: &[u8]) -> f32 {
    0.299 * px[0] as f32 + 0.587 * px[1] as f32 + 0.114 * px[2] as f32
}

/// Returns true if more than `threshold_pct` of pixels have luma below 32.
pub fn is_dark_rgba(rgba: &[u8], threshold_pct: f32) -> bool {
    let pixels = rgba.len() / 4;
    if pixels == 0 {
        return true;
    }
    let dark_count = rgba.chunks_exact(4).filter(|px| luma(px) < 32.0).count();
    (dark_count as f32 / pixels as f32) > threshold_pct
}

#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("invalid RGBA length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("cannot decode photo {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },
}

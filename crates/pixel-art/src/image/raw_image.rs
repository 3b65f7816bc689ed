//! Decoded bitmap type shared by every pipeline stage.

use std::collections::HashSet;

use super::error::PixelArtError;

/// Channel layout of a [`RawImage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    /// Three 8-bit samples per pixel
    Rgb,
    /// Four 8-bit samples per pixel, alpha last (straight, not premultiplied)
    Rgba,
}

impl ColorMode {
    /// Number of samples per pixel.
    #[inline]
    pub fn channels(self) -> usize {
        match self {
            ColorMode::Rgb => 3,
            ColorMode::Rgba => 4,
        }
    }
}

/// A decoded 8-bit bitmap.
///
/// Samples are stored row-major with no padding between rows. A `RawImage`
/// is never modified after construction; every transform in this crate
/// returns a new image.
///
/// # Example
///
/// ```
/// use pixel_art::{ColorMode, RawImage};
///
/// let image = RawImage::from_rgba(1, 1, vec![10, 20, 30, 128]).unwrap();
/// assert_eq!(image.mode(), ColorMode::Rgba);
/// assert_eq!(image.pixel(0, 0), [10, 20, 30, 128]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawImage {
    width: u32,
    height: u32,
    mode: ColorMode,
    data: Vec<u8>,
}

impl RawImage {
    /// Create an image from raw samples.
    ///
    /// # Errors
    ///
    /// - [`PixelArtError::ZeroDimensions`] if either dimension is zero
    /// - [`PixelArtError::BufferSize`] if `data` does not hold exactly
    ///   `width * height * mode.channels()` samples
    pub fn new(
        width: u32,
        height: u32,
        mode: ColorMode,
        data: Vec<u8>,
    ) -> Result<Self, PixelArtError> {
        if width == 0 || height == 0 {
            return Err(PixelArtError::ZeroDimensions { width, height });
        }
        let expected = width as usize * height as usize * mode.channels();
        if data.len() != expected {
            return Err(PixelArtError::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            mode,
            data,
        })
    }

    /// Build an image whose buffer is known to be consistent.
    ///
    /// # Panics (debug only)
    ///
    /// Debug-asserts the buffer length against the dimensions.
    pub(crate) fn from_parts(width: u32, height: u32, mode: ColorMode, data: Vec<u8>) -> Self {
        debug_assert!(width > 0 && height > 0);
        debug_assert_eq!(
            data.len(),
            width as usize * height as usize * mode.channels(),
            "buffer length must match {}x{} {:?}",
            width,
            height,
            mode,
        );
        Self {
            width,
            height,
            mode,
            data,
        }
    }

    /// Create an RGB image from `[R, G, B, R, G, B, ...]` samples.
    #[inline]
    pub fn from_rgb(width: u32, height: u32, data: Vec<u8>) -> Result<Self, PixelArtError> {
        Self::new(width, height, ColorMode::Rgb, data)
    }

    /// Create an RGBA image from `[R, G, B, A, ...]` samples.
    #[inline]
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self, PixelArtError> {
        Self::new(width, height, ColorMode::Rgba, data)
    }

    /// Create an image filled with one color.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self, PixelArtError> {
        let count = width as usize * height as usize;
        let data = rgba.iter().copied().cycle().take(count * 4).collect();
        Self::from_rgba(width, height, data)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn mode(&self) -> ColorMode {
        self.mode
    }

    #[inline]
    pub fn has_alpha(&self) -> bool {
        self.mode == ColorMode::Rgba
    }

    /// Raw samples in row-major order.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Number of pixels (`width * height`).
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Read one pixel as RGBA. RGB images report alpha 255.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        assert!(
            x < self.width && y < self.height,
            "pixel ({}, {}) outside {}x{} image",
            x,
            y,
            self.width,
            self.height
        );
        let channels = self.mode.channels();
        let offset = (y as usize * self.width as usize + x as usize) * channels;
        let px = &self.data[offset..offset + channels];
        match self.mode {
            ColorMode::Rgb => [px[0], px[1], px[2], 255],
            ColorMode::Rgba => [px[0], px[1], px[2], px[3]],
        }
    }

    /// Iterate over the RGB part of every pixel.
    pub fn rgb_pixels(&self) -> impl Iterator<Item = [u8; 3]> + '_ {
        self.data
            .chunks_exact(self.mode.channels())
            .map(|px| [px[0], px[1], px[2]])
    }

    /// Drop the alpha channel without blending. RGB images are copied as-is.
    pub fn to_rgb(&self) -> RawImage {
        let data = match self.mode {
            ColorMode::Rgb => self.data.clone(),
            ColorMode::Rgba => self.rgb_pixels().flatten().collect(),
        };
        RawImage {
            width: self.width,
            height: self.height,
            mode: ColorMode::Rgb,
            data,
        }
    }

    /// Convert to RGBA. RGB pixels become fully opaque.
    pub fn to_rgba(&self) -> RawImage {
        let data = match self.mode {
            ColorMode::Rgba => self.data.clone(),
            ColorMode::Rgb => self
                .data
                .chunks_exact(3)
                .flat_map(|px| [px[0], px[1], px[2], 255])
                .collect(),
        };
        RawImage {
            width: self.width,
            height: self.height,
            mode: ColorMode::Rgba,
            data,
        }
    }

    /// Number of distinct RGB tuples, ignoring alpha.
    pub fn distinct_rgb_count(&self) -> usize {
        self.rgb_pixels().collect::<HashSet<_>>().len()
    }
}

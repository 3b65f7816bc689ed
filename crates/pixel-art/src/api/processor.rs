//! PixelArtProcessor builder -- the primary entry point for the crate.

use crate::image::{ColorMode, PixelArtError, RawImage};
use crate::output::Sprite;
use crate::preprocess::resize_nearest;
use crate::quantize::median_cut;

/// Default palette size when `.colors()` is never called.
pub const DEFAULT_COLORS: u32 = 16;

/// Converts arbitrary images into pixel-art sprites.
///
/// # Design
///
/// - Configuration methods consume and return `self`
/// - [`process()`](Self::process) takes `&self`, so one processor can be
///   reused for many images
/// - The source image is only read; all work happens on copies
///
/// # Example
///
/// ```
/// use pixel_art::{PixelArtProcessor, RawImage};
///
/// let source = RawImage::filled(512, 512, [30, 60, 90, 255]).unwrap();
/// let sprite = PixelArtProcessor::new(32, 32).colors(8).process(&source).unwrap();
///
/// assert_eq!(sprite.width(), 32);
/// assert_eq!(sprite.pixel(0, 0), [30, 60, 90, 255]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelArtProcessor {
    width: u32,
    height: u32,
    colors: u32,
}

impl PixelArtProcessor {
    /// Create a processor for the given output size with a 16-color budget.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            colors: DEFAULT_COLORS,
        }
    }

    /// Set the palette budget. `0` disables quantization entirely.
    #[inline]
    pub fn colors(mut self, colors: u32) -> Self {
        self.colors = colors;
        self
    }

    /// Run the pipeline on `image`.
    ///
    /// 1. Nearest-neighbor resize to the target size
    /// 2. If the budget is non-zero, median-cut quantize the RGB channels.
    ///    RGBA sources lose their alpha here and come back fully opaque.
    /// 3. Normalize to RGBA
    ///
    /// # Errors
    ///
    /// [`PixelArtError::ZeroDimensions`] if the target width or height is 0.
    pub fn process(&self, image: &RawImage) -> Result<Sprite, PixelArtError> {
        if self.width == 0 || self.height == 0 {
            return Err(PixelArtError::ZeroDimensions {
                width: self.width,
                height: self.height,
            });
        }

        let resized = resize_nearest(image, self.width, self.height);

        if self.colors == 0 {
            return Ok(Sprite::new(resized, None));
        }

        // Alpha is intentionally not restored after quantization
        let rgb = match resized.mode() {
            ColorMode::Rgba => resized.to_rgb(),
            ColorMode::Rgb => resized,
        };
        let budget = (self.colors as usize).min(u16::MAX as usize + 1);
        let quantized = median_cut(&rgb, budget);
        let palette = quantized.palette().to_vec();

        Ok(Sprite::new(quantized.to_image(), Some(palette)))
    }
}

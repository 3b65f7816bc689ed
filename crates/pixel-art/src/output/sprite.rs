//! Sprite struct returned by [`PixelArtProcessor`](crate::PixelArtProcessor).

use crate::image::{ColorMode, RawImage};

/// The final low-resolution RGBA bitmap.
///
/// Stores the pixels together with the palette the quantizer selected, if
/// quantization ran.
///
/// # Example
///
/// ```
/// use pixel_art::{RawImage, Sprite};
///
/// let image = RawImage::from_rgb(1, 1, vec![1, 2, 3]).unwrap();
/// let sprite = Sprite::new(image, None);
///
/// assert_eq!(sprite.rgba(), &[1, 2, 3, 255]);
/// assert!(sprite.palette().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sprite {
    image: RawImage,
    palette: Option<Vec<[u8; 3]>>,
}

impl Sprite {
    /// Wrap an image, normalizing it to RGBA.
    pub fn new(image: RawImage, palette: Option<Vec<[u8; 3]>>) -> Self {
        let image = match image.mode() {
            ColorMode::Rgba => image,
            ColorMode::Rgb => image.to_rgba(),
        };
        Self { image, palette }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// RGBA samples, row-major, `width * height * 4` bytes.
    #[inline]
    pub fn rgba(&self) -> &[u8] {
        self.image.data()
    }

    /// Read one pixel as RGBA.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.image.pixel(x, y)
    }

    /// Palette chosen by the quantizer, `None` when quantization was skipped.
    #[inline]
    pub fn palette(&self) -> Option<&[[u8; 3]]> {
        self.palette.as_deref()
    }

    /// Number of distinct RGB tuples in the sprite.
    pub fn distinct_rgb_count(&self) -> usize {
        self.image.distinct_rgb_count()
    }

    /// Borrow the sprite as an RGBA [`RawImage`].
    #[inline]
    pub fn as_image(&self) -> &RawImage {
        &self.image
    }

    /// Consume the sprite and return its RGBA [`RawImage`].
    #[inline]
    pub fn into_image(self) -> RawImage {
        self.image
    }
}

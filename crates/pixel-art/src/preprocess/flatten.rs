//! Alpha-aware compositing onto a solid background.

use crate::image::{ColorMode, RawImage};

/// Blend one channel of a straight-alpha pixel over `bg`, rounding to nearest.
#[inline]
fn blend(c: u8, bg: u8, alpha: u8) -> u8 {
    let a = alpha as u32;
    ((c as u32 * a + bg as u32 * (255 - a) + 127) / 255) as u8
}

/// Composite an image onto a solid background color, returning RGB.
///
/// Each channel becomes `c * a/255 + bg * (1 - a/255)`. Fully transparent
/// pixels become exactly `background`; fully opaque pixels keep their RGB
/// unchanged. RGB input has no transparency and is returned as a copy.
///
/// # Example
///
/// ```
/// use pixel_art::{flatten_onto, RawImage};
///
/// let image = RawImage::from_rgba(2, 1, vec![200, 100, 50, 0, 200, 100, 50, 255]).unwrap();
/// let flat = flatten_onto(&image, [0, 0, 0]);
/// assert_eq!(flat.data(), &[0, 0, 0, 200, 100, 50]);
/// ```
pub fn flatten_onto(image: &RawImage, background: [u8; 3]) -> RawImage {
    if image.mode() == ColorMode::Rgb {
        return image.clone();
    }

    let [br, bg, bb] = background;
    let data = image
        .data()
        .chunks_exact(4)
        .flat_map(|px| {
            let a = px[3];
            [blend(px[0], br, a), blend(px[1], bg, a), blend(px[2], bb, a)]
        })
        .collect();

    RawImage::from_parts(image.width(), image.height(), ColorMode::Rgb, data)
}

//! Nearest-neighbor resampling.
//!
//! Output pixel `(x, y)` copies the source pixel whose center is closest to
//! the output pixel's center, i.e. `floor((x + 0.5) * src_w / dst_w)`. The
//! mapping is done in integer arithmetic so identical sizes map every pixel
//! onto itself.

use crate::image::RawImage;

/// Source coordinate sampled for output coordinate `dst` along one axis.
#[inline]
fn source_index(dst: u32, src_len: u32, dst_len: u32) -> usize {
    let src = (2 * dst as u64 + 1) * src_len as u64 / (2 * dst_len as u64);
    src.min(src_len as u64 - 1) as usize
}

/// Resize with nearest-neighbor sampling, keeping the color mode.
///
/// Never blends: every output pixel is a copy of exactly one source pixel,
/// alpha included.
///
/// # Panics
///
/// Panics if `new_width` or `new_height` is zero.
///
/// # Example
///
/// ```
/// use pixel_art::{resize_nearest, RawImage};
///
/// let image = RawImage::from_rgb(2, 1, vec![255, 0, 0, 0, 0, 255]).unwrap();
/// let wide = resize_nearest(&image, 4, 1);
/// assert_eq!(wide.data(), &[255, 0, 0, 255, 0, 0, 0, 0, 255, 0, 0, 255]);
/// ```
pub fn resize_nearest(image: &RawImage, new_width: u32, new_height: u32) -> RawImage {
    assert!(
        new_width > 0 && new_height > 0,
        "pixel-art: cannot resize to {}x{}",
        new_width,
        new_height
    );

    if image.width() == new_width && image.height() == new_height {
        return image.clone();
    }

    let channels = image.mode().channels();
    let src_width = image.width() as usize;
    let src = image.data();

    let columns: Vec<usize> = (0..new_width)
        .map(|x| source_index(x, image.width(), new_width))
        .collect();

    let mut data = Vec::with_capacity(new_width as usize * new_height as usize * channels);
    for y in 0..new_height {
        let row = source_index(y, image.height(), new_height) * src_width;
        for &col in &columns {
            let offset = (row + col) * channels;
            data.extend_from_slice(&src[offset..offset + channels]);
        }
    }

    RawImage::from_parts(new_width, new_height, image.mode(), data)
}

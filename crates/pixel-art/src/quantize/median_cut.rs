//! Median-cut palette reduction.
//!
//! The RGB histogram of the image is split into boxes. Each round picks the
//! most populated box that still holds more than one color, sorts it along
//! its widest channel and cuts it at the population-weighted median. When
//! there are `max_colors` boxes (or nothing left to split), every box is
//! replaced by its population-weighted mean color.

use std::collections::HashMap;

use crate::image::{ColorMode, RawImage};

/// Result of [`median_cut`]: a palette and one palette index per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quantized {
    palette: Vec<[u8; 3]>,
    indices: Vec<u16>,
    width: u32,
    height: u32,
}

impl Quantized {
    /// Palette entries. May contain duplicates when two boxes average to
    /// the same color; never more than the requested maximum.
    #[inline]
    pub fn palette(&self) -> &[[u8; 3]] {
        &self.palette
    }

    /// Palette index per pixel, row-major.
    #[inline]
    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    /// Expand the indices into an RGB image.
    pub fn to_image(&self) -> RawImage {
        let data = self
            .indices
            .iter()
            .flat_map(|&idx| self.palette[idx as usize])
            .collect();
        RawImage::from_parts(self.width, self.height, ColorMode::Rgb, data)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    #[inline]
    fn index(self) -> usize {
        match self {
            Channel::Red => 0,
            Channel::Green => 1,
            Channel::Blue => 2,
        }
    }
}

/// A set of histogram entries `(color, pixel count)`.
#[derive(Debug)]
struct ColorBox {
    colors: Vec<([u8; 3], u32)>,
    population: u64,
}

impl ColorBox {
    fn new(colors: Vec<([u8; 3], u32)>) -> Self {
        let population = colors.iter().map(|&(_, n)| n as u64).sum();
        Self { colors, population }
    }

    fn is_splittable(&self) -> bool {
        self.colors.len() > 1
    }

    /// Channel with the largest min..max spread. Ties prefer red, then green.
    fn widest_channel(&self) -> Channel {
        let mut min = [u8::MAX; 3];
        let mut max = [u8::MIN; 3];
        for (color, _) in &self.colors {
            for c in 0..3 {
                min[c] = min[c].min(color[c]);
                max[c] = max[c].max(color[c]);
            }
        }
        let range = |c: usize| max[c] - min[c];

        if range(0) >= range(1) && range(0) >= range(2) {
            Channel::Red
        } else if range(1) >= range(2) {
            Channel::Green
        } else {
            Channel::Blue
        }
    }

    /// Split at the population-weighted median of the widest channel.
    ///
    /// Both halves are non-empty. Only call on splittable boxes.
    fn split(mut self) -> (ColorBox, ColorBox) {
        let channel = self.widest_channel().index();
        self.colors.sort_unstable_by_key(|&(color, _)| {
            (color[channel], color[(channel + 1) % 3], color[(channel + 2) % 3])
        });

        let half = self.population / 2;
        let mut running = 0u64;
        let mut split_at = self.colors.len() / 2;
        for (i, &(_, count)) in self.colors.iter().enumerate() {
            running += count as u64;
            if running >= half {
                split_at = i + 1;
                break;
            }
        }
        let split_at = split_at.clamp(1, self.colors.len() - 1);

        let upper = self.colors.split_off(split_at);
        (ColorBox::new(self.colors), ColorBox::new(upper))
    }

    /// Population-weighted mean color, rounded to nearest.
    fn mean_color(&self) -> [u8; 3] {
        let total = self.population.max(1);
        let mut sums = [0u64; 3];
        for &(color, count) in &self.colors {
            for c in 0..3 {
                sums[c] += color[c] as u64 * count as u64;
            }
        }
        sums.map(|s| ((s + total / 2) / total) as u8)
    }
}

/// Reduce an image to at most `max_colors` RGB colors.
///
/// Alpha is ignored. When the image already has `max_colors` or fewer
/// distinct colors the palette is exactly those colors and no pixel
/// changes. Output is deterministic for a given input.
///
/// # Panics
///
/// Panics if `max_colors` is zero or greater than 65536.
///
/// # Example
///
/// ```
/// use pixel_art::{median_cut, RawImage};
///
/// let image = RawImage::from_rgb(4, 1, vec![
///     0, 0, 0,   10, 10, 10,   240, 240, 240,   255, 255, 255,
/// ]).unwrap();
///
/// let quantized = median_cut(&image, 2);
/// assert_eq!(quantized.palette().len(), 2);
/// assert_eq!(quantized.to_image().data(), &[
///     5, 5, 5,   5, 5, 5,   248, 248, 248,   248, 248, 248,
/// ]);
/// ```
pub fn median_cut(image: &RawImage, max_colors: usize) -> Quantized {
    assert!(
        (1..=u16::MAX as usize + 1).contains(&max_colors),
        "pixel-art: max_colors must be in 1..=65536, got {}",
        max_colors
    );

    let mut histogram: HashMap<[u8; 3], u32> = HashMap::new();
    for px in image.rgb_pixels() {
        *histogram.entry(px).or_insert(0) += 1;
    }
    let mut colors: Vec<([u8; 3], u32)> = histogram.into_iter().collect();
    colors.sort_unstable();

    // Each box becomes one palette entry; `lookup` maps source color -> entry
    let boxes = if colors.len() <= max_colors {
        colors
            .into_iter()
            .map(|entry| ColorBox::new(vec![entry]))
            .collect()
    } else {
        split_boxes(ColorBox::new(colors), max_colors)
    };

    let mut palette = Vec::with_capacity(boxes.len());
    let mut lookup: HashMap<[u8; 3], u16> = HashMap::new();
    for (idx, color_box) in boxes.iter().enumerate() {
        palette.push(color_box.mean_color());
        for &(color, _) in &color_box.colors {
            lookup.insert(color, idx as u16);
        }
    }

    let indices = image.rgb_pixels().map(|px| lookup[&px]).collect();

    Quantized {
        palette,
        indices,
        width: image.width(),
        height: image.height(),
    }
}

fn split_boxes(initial: ColorBox, max_colors: usize) -> Vec<ColorBox> {
    let mut boxes = vec![initial];

    while boxes.len() < max_colors {
        let candidate = boxes
            .iter()
            .enumerate()
            .filter(|(_, b)| b.is_splittable())
            .max_by(|(ia, a), (ib, b)| {
                // Most pixels first; on ties the earliest box wins
                a.population.cmp(&b.population).then(ib.cmp(ia))
            })
            .map(|(idx, _)| idx);

        let Some(idx) = candidate else {
            break;
        };

        let (lower, upper) = boxes.swap_remove(idx).split();
        boxes.push(lower);
        boxes.push(upper);
    }

    boxes
}

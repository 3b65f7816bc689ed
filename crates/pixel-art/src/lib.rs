//! pixel-art: turn high-resolution generated images into pixel-art sprites
//!
//! This library converts a decoded bitmap (typically a 1024x1024 render from
//! a cloud image-generation backend) into a small, palette-limited sprite
//! suitable for editing in a pixel-art editor.
//!
//! # Quick Start
//!
//! The [`PixelArtProcessor`] builder is the primary entry point:
//!
//! ```
//! use pixel_art::{PixelArtProcessor, RawImage};
//!
//! let source = RawImage::from_rgb(2, 2, vec![
//!     255, 0, 0,   0, 255, 0,
//!     0, 0, 255,   255, 255, 255,
//! ]).unwrap();
//!
//! let sprite = PixelArtProcessor::new(4, 4).colors(2).process(&source).unwrap();
//!
//! assert_eq!(sprite.width(), 4);
//! assert_eq!(sprite.height(), 4);
//! assert!(sprite.distinct_rgb_count() <= 2);
//! ```
//!
//! # Pipeline
//!
//! ```text
//! RawImage (RGB or RGBA, any size)
//!     |
//!     v
//! resize_nearest          (hard edges, no blended colors)
//!     |
//!     +-- colors == 0 --> Sprite (resized pixels, alpha kept)
//!     |
//!     v
//! drop alpha              (RGBA input only)
//!     |
//!     v
//! median_cut              (<= colors palette entries)
//!     |
//!     v
//! Sprite                  (always RGBA)
//! ```
//!
//! ## Resampling
//!
//! Only nearest-neighbor resampling is provided. Every output pixel is a
//! copy of one source pixel, so a resize never introduces new colors.
//!
//! ## Alpha and quantization
//!
//! When quantization is enabled, the alpha channel of an RGBA source is
//! discarded and the sprite comes back fully opaque. With `colors == 0` the
//! alpha channel passes through the resize untouched.

pub mod api;
pub mod image;
pub mod output;
pub mod preprocess;
pub mod quantize;


pub use api::PixelArtProcessor;
pub use image::{ColorMode, PixelArtError, RawImage};
pub use output::Sprite;
pub use preprocess::{flatten_onto, resize_nearest};
pub use quantize::{median_cut, Quantized};

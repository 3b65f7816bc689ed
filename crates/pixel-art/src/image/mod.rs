//! Bitmap type and crate error.
//!
//! [`RawImage`] is the input and intermediate currency of the pipeline.
//! Everything else in the crate takes a `&RawImage` and returns a new one.

mod error;
mod raw_image;

pub use error::PixelArtError;
pub use raw_image::{ColorMode, RawImage};

//! Error types for image construction and processing.

use std::fmt;

/// Error type for the pixel-art crate.
///
/// Returned when a bitmap is constructed with inconsistent dimensions or
/// when a processor is asked for an empty output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PixelArtError {
    /// Width or height is zero
    ZeroDimensions {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
    },
    /// Sample buffer length does not match `width * height * channels`
    BufferSize {
        /// Length implied by the dimensions and color mode
        expected: usize,
        /// Length actually supplied
        actual: usize,
    },
}

impl fmt::Display for PixelArtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PixelArtError::ZeroDimensions { width, height } => {
                write!(f, "image dimensions must be non-zero (got {}x{})", width, height)
            }
            PixelArtError::BufferSize { expected, actual } => {
                write!(f, "pixel buffer has {} bytes, expected {}", actual, expected)
            }
        }
    }
}

impl std::error::Error for PixelArtError {}

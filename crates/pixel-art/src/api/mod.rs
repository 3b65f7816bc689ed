//! Public API for the pixel-art crate.
//!
//! This module provides the high-level [`PixelArtProcessor`] builder.

mod processor;

pub use processor::PixelArtProcessor;

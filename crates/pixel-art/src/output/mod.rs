//! Output type of the processing pipeline.
//!
//! [`Sprite`] is always RGBA, whatever the source color mode was, so callers
//! can encode it without inspecting the mode.

mod sprite;

pub use sprite::Sprite;

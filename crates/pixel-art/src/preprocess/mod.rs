//! Geometry and alpha preprocessing.
//!
//! - [`resize_nearest`]: nearest-neighbor resampling, the only resampling
//!   filter this crate offers
//! - [`flatten_onto`]: composite straight alpha onto a solid color, used to
//!   prepare structure-guide images that backends expect without alpha

mod flatten;
mod resize;

pub use flatten::flatten_onto;
pub use resize::resize_nearest;

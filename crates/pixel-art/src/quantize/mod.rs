//! Color quantization.
//!
//! Only median cut is provided. It is deterministic, needs no random
//! seeding, and the box representatives are averages of colors that were
//! actually present, which keeps flat pixel-art regions flat.

mod median_cut;

pub use median_cut::{median_cut, Quantized};

//! PixelAI - pixel-art sprites from cloud image generation
//!
//! Local HTTP relay for pixel-art editor extensions. Prompts go to a cloud
//! backend; the returned image is turned into a small, palette-limited sprite.
//! This library exposes modules for integration testing.

pub mod api;
pub mod error;
pub mod models;
pub mod server;
pub mod services;

//! Test fixtures and constants.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use pixel_art::RawImage;
use pixelai::services::codec;

/// API keys the mock backends accept
pub mod keys {
    pub const OPENAI: &str = "sk-test-openai-0123456789";
    pub const STABILITY: &str = "sk-test-stability-0123456789";
}

/// A "photographic" RGB image: smooth gradients in every channel, so it has
/// far more colors than any sprite palette.
pub fn gradient_image(width: u32, height: u32) -> RawImage {
    let mut data = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height {
        for x in 0..width {
            data.push((x * 255 / (width - 1).max(1)) as u8);
            data.push((y * 255 / (height - 1).max(1)) as u8);
            data.push(((x + y) % 256) as u8);
        }
    }
    RawImage::from_rgb(width, height, data).unwrap()
}

/// Two-color checkerboard with square cells of `cell` pixels
pub fn checkerboard_image(width: u32, height: u32, cell: u32) -> RawImage {
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            let dark = ((x / cell) + (y / cell)) % 2 == 0;
            data.extend_from_slice(if dark {
                &[20, 20, 40, 255]
            } else {
                &[230, 200, 90, 255]
            });
        }
    }
    RawImage::from_rgba(width, height, data).unwrap()
}

/// Opaque RGB noise. Barely compresses, so the PNG stays close to the
/// raw size of `width * height * 3` bytes.
pub fn noise_image(width: u32, height: u32) -> RawImage {
    let mut state: u32 = 0x9e37_79b9;
    let data = (0..width * height * 3)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state >> 24) as u8
        })
        .collect();
    RawImage::from_rgb(width, height, data).unwrap()
}

/// RGBA guide with a transparent left half
pub fn half_transparent_guide(size: u32) -> RawImage {
    let mut data = Vec::with_capacity((size * size * 4) as usize);
    for _y in 0..size {
        for x in 0..size {
            if x < size / 2 {
                data.extend_from_slice(&[255, 255, 255, 0]);
            } else {
                data.extend_from_slice(&[0, 128, 255, 255]);
            }
        }
    }
    RawImage::from_rgba(size, size, data).unwrap()
}

pub fn png_bytes(image: &RawImage) -> Vec<u8> {
    codec::encode_png(image, false).unwrap()
}

pub fn png_base64(image: &RawImage) -> String {
    STANDARD.encode(png_bytes(image))
}

/// Decode the sprite from a successful `/generate` JSON body
pub fn decode_sprite(json: &serde_json::Value) -> RawImage {
    let encoded = json["image"]["base64"]
        .as_str()
        .expect("response has image.base64");
    codec::decode_base64(encoded).expect("sprite is a valid PNG")
}

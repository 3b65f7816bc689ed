//! PNG and base64 conversion between transport payloads and [`RawImage`].

use base64::{engine::general_purpose::STANDARD, Engine as _};
use pixel_art::{ColorMode, RawImage};
use std::io::Cursor;

use crate::error::CodecError;

/// Decode a PNG into an 8-bit RGB or RGBA image.
///
/// Indexed, grayscale and 16-bit inputs are normalized; palette
/// transparency becomes an alpha channel.
pub fn decode(bytes: &[u8]) -> Result<RawImage, CodecError> {
    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(png::Transformations::normalize_to_color8());

    let mut reader = decoder
        .read_info()
        .map_err(|e| CodecError::Decode(e.to_string()))?;
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| CodecError::Decode(e.to_string()))?;
    buf.truncate(info.buffer_size());

    let (width, height) = (info.width, info.height);
    let stride = info.line_size;
    let channels = info.color_type.samples();
    let row_bytes = width as usize * channels;

    // Rows may carry padding beyond width * channels
    let packed: Vec<u8> = if stride == row_bytes {
        buf
    } else {
        buf.chunks(stride)
            .flat_map(|row| row[..row_bytes].iter().copied())
            .collect()
    };

    let (mode, data) = match info.color_type {
        png::ColorType::Rgb => (ColorMode::Rgb, packed),
        png::ColorType::Rgba => (ColorMode::Rgba, packed),
        png::ColorType::Grayscale => (
            ColorMode::Rgb,
            packed.iter().flat_map(|&v| [v, v, v]).collect(),
        ),
        png::ColorType::GrayscaleAlpha => (
            ColorMode::Rgba,
            packed
                .chunks_exact(2)
                .flat_map(|px| [px[0], px[0], px[0], px[1]])
                .collect(),
        ),
        png::ColorType::Indexed => {
            return Err(CodecError::Decode(
                "indexed PNG was not expanded".to_string(),
            ))
        }
    };

    RawImage::new(width, height, mode, data).map_err(|e| CodecError::Decode(e.to_string()))
}

/// Decode base64 PNG data. Accepts plain base64 or a `data:` URL.
pub fn decode_base64(text: &str) -> Result<RawImage, CodecError> {
    let payload = match text.trim().split_once(";base64,") {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => text.trim(),
    };
    // Some clients wrap long base64 lines
    let compact: String = payload.split_whitespace().collect();
    let bytes = STANDARD.decode(compact)?;
    decode(&bytes)
}

/// Encode an image as an 8-bit RGBA PNG.
///
/// With `optimize`, the output is re-compressed losslessly by oxipng; if
/// that fails the unoptimized bytes are returned.
pub fn encode_png(image: &RawImage, optimize: bool) -> Result<Vec<u8>, CodecError> {
    let rgba;
    let image = if image.has_alpha() {
        image
    } else {
        rgba = image.to_rgba();
        &rgba
    };

    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, image.width(), image.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder
            .write_header()
            .map_err(|e| CodecError::Encode(e.to_string()))?;
        writer
            .write_image_data(image.data())
            .map_err(|e| CodecError::Encode(e.to_string()))?;
    }
    let png_bytes = buf.into_inner();

    if !optimize {
        return Ok(png_bytes);
    }

    Ok(oxipng::optimize_from_memory(
        &png_bytes,
        &oxipng::Options {
            strip: oxipng::StripChunks::Safe,
            optimize_alpha: false,
            ..Default::default()
        },
    )
    .unwrap_or(png_bytes))
}

/// Encode an image as base64 PNG (standard alphabet, padded).
pub fn encode_base64(image: &RawImage, optimize: bool) -> Result<String, CodecError> {
    Ok(STANDARD.encode(encode_png(image, optimize)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_raw(
        width: u32,
        height: u32,
        color: png::ColorType,
        depth: png::BitDepth,
        palette: Option<(&[u8], &[u8])>,
        data: &[u8],
    ) -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut buf, width, height);
            encoder.set_color(color);
            encoder.set_depth(depth);
            if let Some((plte, trns)) = palette {
                encoder.set_palette(plte.to_vec());
                encoder.set_trns(trns.to_vec());
            }
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(data).unwrap();
        }
        buf
    }

    fn sample_rgba() -> RawImage {
        RawImage::from_rgba(
            3,
            2,
            vec![
                255, 0, 0, 255, 0, 255, 0, 128, 0, 0, 255, 0, //
                10, 20, 30, 40, 50, 60, 70, 80, 90, 100, 110, 255,
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_round_trip_is_pixel_identical() {
        let image = sample_rgba();
        let decoded = decode(&encode_png(&image, false).unwrap()).unwrap();
        assert_eq!(decoded, image);
    }

    #[test]
    fn test_round_trip_with_optimization() {
        let image = sample_rgba();
        let decoded = decode(&encode_png(&image, true).unwrap()).unwrap();
        assert_eq!(decoded.width(), 3);
        assert_eq!(decoded.height(), 2);
        assert_eq!(decoded.to_rgba(), image);
    }

    #[test]
    fn test_rgb_is_encoded_as_rgba() {
        let image = RawImage::from_rgb(2, 1, vec![1, 2, 3, 4, 5, 6]).unwrap();
        let decoded = decode(&encode_png(&image, false).unwrap()).unwrap();
        assert_eq!(decoded.mode(), ColorMode::Rgba);
        assert_eq!(decoded.data(), &[1, 2, 3, 255, 4, 5, 6, 255]);
    }

    #[test]
    fn test_base64_round_trip() {
        let image = sample_rgba();
        let text = encode_base64(&image, false).unwrap();
        assert_eq!(decode_base64(&text).unwrap(), image);
    }

    #[test]
    fn test_decode_data_url() {
        let image = sample_rgba();
        let text = format!(
            "data:image/png;base64,{}",
            encode_base64(&image, false).unwrap()
        );
        assert_eq!(decode_base64(&text).unwrap(), image);
    }

    #[test]
    fn test_decode_grayscale() {
        let bytes = encode_raw(
            2,
            1,
            png::ColorType::Grayscale,
            png::BitDepth::Eight,
            None,
            &[0, 200],
        );
        let image = decode(&bytes).unwrap();
        assert_eq!(image.mode(), ColorMode::Rgb);
        assert_eq!(image.data(), &[0, 0, 0, 200, 200, 200]);
    }

    #[test]
    fn test_decode_grayscale_alpha() {
        let bytes = encode_raw(
            1,
            1,
            png::ColorType::GrayscaleAlpha,
            png::BitDepth::Eight,
            None,
            &[77, 10],
        );
        let image = decode(&bytes).unwrap();
        assert_eq!(image.data(), &[77, 77, 77, 10]);
    }

    #[test]
    fn test_decode_indexed_with_transparency() {
        let plte = [255, 0, 0, 0, 0, 255];
        let trns = [0, 255];
        let bytes = encode_raw(
            2,
            1,
            png::ColorType::Indexed,
            png::BitDepth::Eight,
            Some((&plte, &trns)),
            &[0, 1],
        );
        let image = decode(&bytes).unwrap();
        assert_eq!(image.mode(), ColorMode::Rgba);
        assert_eq!(image.data(), &[255, 0, 0, 0, 0, 0, 255, 255]);
    }

    #[test]
    fn test_decode_sixteen_bit_is_stripped() {
        let bytes = encode_raw(
            1,
            1,
            png::ColorType::Rgb,
            png::BitDepth::Sixteen,
            None,
            &[0xAB, 0xCD, 0x12, 0x34, 0xFF, 0xFF],
        );
        let image = decode(&bytes).unwrap();
        assert_eq!(image.data(), &[0xAB, 0x12, 0xFF]);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = decode(b"definitely not a png").unwrap_err();
        assert!(matches!(err, CodecError::Decode(_)));
    }

    #[test]
    fn test_decode_base64_rejects_invalid_text() {
        let err = decode_base64("%%% not base64 %%%").unwrap_err();
        assert!(matches!(err, CodecError::Base64(_)));
    }
}

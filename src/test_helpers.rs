//! Shared test fixtures: small images encoded in memory.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let png = create_test_image(ImageFormat::Png, 64, 48);
//! let gif = create_animated_gif(2, 500);
//! let webp = create_animated_webp(&[100, 150]);
//! ```

use image::codecs::gif::GifEncoder;
use image::codecs::webp::WebPEncoder;
use image::{Delay, DynamicImage, Frame, ImageFormat, RgbImage, RgbaImage};
use std::io::Cursor;

/// Side length of animation frames.
const FRAME_SIZE: u32 = 16;

/// Create a gradient image of the given format, in memory.
///
/// WebP and GIF are written from RGBA, the layout their encoders take.
pub fn create_test_image(format: ImageFormat, width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let dynamic = match format {
        ImageFormat::WebP | ImageFormat::Gif => {
            DynamicImage::ImageRgba8(DynamicImage::ImageRgb8(img).to_rgba8())
        }
        _ => DynamicImage::ImageRgb8(img),
    };
    let mut out = Cursor::new(Vec::new());
    dynamic.write_to(&mut out, format).unwrap();
    out.into_inner()
}

fn frame_pixels(index: u32) -> RgbaImage {
    RgbaImage::from_fn(FRAME_SIZE, FRAME_SIZE, |x, y| {
        image::Rgba([(index * 60) as u8, (x * 16) as u8, (y * 16) as u8, 255])
    })
}

/// Animated GIF with `frames` frames of `delay_ms` each.
pub fn create_animated_gif(frames: u32, delay_ms: u32) -> Vec<u8> {
    let mut out = Vec::new();
    {
        let mut encoder = GifEncoder::new(&mut out);
        let frames = (0..frames).map(|i| {
            Frame::from_parts(frame_pixels(i), 0, 0, Delay::from_numer_denom_ms(delay_ms, 1))
        });
        encoder.encode_frames(frames).unwrap();
    }
    out
}

/// Animated WebP with one frame per entry in `delays_ms`.
///
/// `image` only encodes still WebP, so each frame is a lossless still whose
/// `VP8L` chunk is wrapped in an `ANMF` chunk of a hand-built extended
/// container (`VP8X` with the animation flag, then `ANIM`).
pub fn create_animated_webp(delays_ms: &[u32]) -> Vec<u8> {
    fn u24(out: &mut Vec<u8>, value: u32) {
        out.extend_from_slice(&value.to_le_bytes()[..3]);
    }
    fn chunk(out: &mut Vec<u8>, fourcc: &[u8; 4], payload: &[u8]) {
        out.extend_from_slice(fourcc);
        out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        out.extend_from_slice(payload);
        if payload.len() % 2 == 1 {
            out.push(0);
        }
    }

    let mut body = b"WEBP".to_vec();

    let mut vp8x = vec![0b0001_0010, 0, 0, 0];
    u24(&mut vp8x, FRAME_SIZE - 1);
    u24(&mut vp8x, FRAME_SIZE - 1);
    chunk(&mut body, b"VP8X", &vp8x);

    // Background colour, then loop count (0 = forever).
    chunk(&mut body, b"ANIM", &[0, 0, 0, 0, 0, 0]);

    for (index, &delay) in delays_ms.iter().enumerate() {
        let mut still = Vec::new();
        WebPEncoder::new_lossless(&mut still)
            .encode(
                frame_pixels(index as u32).as_raw(),
                FRAME_SIZE,
                FRAME_SIZE,
                image::ExtendedColorType::Rgba8,
            )
            .unwrap();
        // Skip the 12-byte RIFF header; what follows is the VP8L chunk.
        let bitstream = &still[12..];
        assert_eq!(&bitstream[..4], b"VP8L");

        let mut anmf = Vec::new();
        u24(&mut anmf, 0);
        u24(&mut anmf, 0);
        u24(&mut anmf, FRAME_SIZE - 1);
        u24(&mut anmf, FRAME_SIZE - 1);
        u24(&mut anmf, delay);
        anmf.push(0);
        anmf.extend_from_slice(bitstream);
        chunk(&mut body, b"ANMF", &anmf);
    }

    let mut out = Vec::new();
    chunk(&mut out, b"RIFF", &body);
    out
}

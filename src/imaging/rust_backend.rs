//! Pure Rust image engine built on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Signature check | `image::guess_format` (magic bytes only) |
//! | Header | `ImageReader::into_decoder` + `ImageDecoder::dimensions` |
//! | Animation duration (GIF, WebP) | `AnimationDecoder::into_frames`, summed frame delays |
//! | Decode + orientation | `DynamicImage::from_decoder` + `apply_orientation` |
//! | Resize | `DynamicImage::resize_exact` with `Lanczos3` |
//! | Encode → JPEG / PNG / AVIF / GIF / TIFF / BMP | `image::codecs::*` |
//! | Encode → WebP | `webp` crate (lossy), `image` `WebPEncoder` (lossless) |

use super::backend::{EngineError, Header, ImageEngine, SourceDecoder};
use super::calculations::calculate_fit_dimensions;
use super::params::{EncodeOptions, EncodeParam, ResizeMethod, TransformOptions};
use image::codecs::avif::AvifEncoder;
use image::codecs::gif::GifDecoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder};
use image::codecs::webp::{WebPDecoder, WebPEncoder};
use image::imageops::FilterType;
use image::metadata::Orientation;
use image::{AnimationDecoder, DynamicImage, ImageDecoder, ImageError, ImageFormat, ImageReader};
use std::io::{Cursor, Seek, Write};
use std::time::Duration;

/// Largest output width or height accepted by default.
pub const DEFAULT_MAX_DIMENSION: u32 = 8192;

/// Largest width or height libwebp can encode.
const WEBP_MAX_DIMENSION: u32 = 16383;

const DEFAULT_JPEG_QUALITY: u32 = 75;
const DEFAULT_AVIF_QUALITY: u32 = 85;
const DEFAULT_AVIF_SPEED: u32 = 6;

/// Output formats with an encoder compiled in, keyed by extension.
const OUTPUT_FORMATS: &[(&str, ImageFormat)] = &[
    ("jpeg", ImageFormat::Jpeg),
    ("jpg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("webp", ImageFormat::WebP),
    ("gif", ImageFormat::Gif),
    ("tif", ImageFormat::Tiff),
    ("tiff", ImageFormat::Tiff),
    ("bmp", ImageFormat::Bmp),
    ("avif", ImageFormat::Avif),
];

/// Input formats with a decoder compiled in.
const INPUT_FORMATS: &[ImageFormat] = &[
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::WebP,
    ImageFormat::Gif,
    ImageFormat::Tiff,
    ImageFormat::Bmp,
];

/// Map an output identifier (`".png"`) to the encoder that handles it.
pub fn output_format(identifier: &str) -> Option<ImageFormat> {
    let ext = identifier.strip_prefix('.')?;
    OUTPUT_FORMATS
        .iter()
        .find(|(candidate, _)| *candidate == ext)
        .map(|(_, format)| *format)
}

/// Upper-case description reported in the header, e.g. `"JPEG"`.
fn format_description(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Jpeg => "JPEG",
        ImageFormat::Png => "PNG",
        ImageFormat::WebP => "WEBP",
        ImageFormat::Gif => "GIF",
        ImageFormat::Tiff => "TIFF",
        ImageFormat::Bmp => "BMP",
        ImageFormat::Avif => "AVIF",
        ImageFormat::Ico => "ICO",
        ImageFormat::Pnm => "PNM",
        ImageFormat::Tga => "TGA",
        ImageFormat::Dds => "DDS",
        ImageFormat::Hdr => "HDR",
        ImageFormat::OpenExr => "EXR",
        ImageFormat::Farbfeld => "FARBFELD",
        ImageFormat::Qoi => "QOI",
        _ => "UNKNOWN",
    }
}

/// Engine backed by the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
#[derive(Debug, Clone, Copy)]
pub struct RustEngine {
    max_dimension: u32,
}

impl RustEngine {
    pub fn new() -> Self {
        Self {
            max_dimension: DEFAULT_MAX_DIMENSION,
        }
    }

    pub fn with_max_dimension(max_dimension: u32) -> Self {
        Self { max_dimension }
    }

    pub fn max_dimension(&self) -> u32 {
        self.max_dimension
    }
}

impl Default for RustEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Decoder over borrowed input bytes whose signature has been recognized.
#[derive(Debug)]
pub struct RustDecoder<'a> {
    bytes: &'a [u8],
    format: ImageFormat,
}

impl<'a> RustDecoder<'a> {
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    fn reader(&self) -> ImageReader<Cursor<&'a [u8]>> {
        ImageReader::with_format(Cursor::new(self.bytes), self.format)
    }

    /// Fully decode the first frame, optionally applying EXIF orientation.
    fn decode(&self, normalize_orientation: bool) -> Result<DynamicImage, EngineError> {
        let mut decoder = self.reader().into_decoder()?;
        let orientation = if normalize_orientation {
            decoder.orientation()?
        } else {
            Orientation::NoTransforms
        };
        let mut image = DynamicImage::from_decoder(decoder)?;
        image.apply_orientation(orientation);
        Ok(image)
    }
}

impl SourceDecoder for RustDecoder<'_> {
    fn header(&mut self) -> Result<Header, EngineError> {
        let decoder = self.reader().into_decoder()?;
        let (width, height) = decoder.dimensions();
        if width == 0 || height == 0 {
            return Err(EngineError::ProcessingFailed(format!(
                "image reports empty dimensions {width}x{height}"
            )));
        }

        Ok(Header {
            description: format_description(self.format).to_string(),
            width,
            height,
            duration: animation_duration(self.bytes, self.format)?,
        })
    }
}

/// Sum of frame delays for animated GIF and WebP; zero for everything else.
fn animation_duration(bytes: &[u8], format: ImageFormat) -> Result<Duration, EngineError> {
    let frames = match format {
        ImageFormat::Gif => GifDecoder::new(Cursor::new(bytes))?.into_frames(),
        ImageFormat::WebP => {
            let decoder = WebPDecoder::new(Cursor::new(bytes))?;
            if !decoder.has_animation() {
                return Ok(Duration::ZERO);
            }
            decoder.into_frames()
        }
        _ => return Ok(Duration::ZERO),
    };

    let mut total = Duration::ZERO;
    for frame in frames {
        let (numer, denom) = frame?.delay().numer_denom_ms();
        total += Duration::from_secs_f64(numer as f64 / denom.max(1) as f64 / 1000.0);
    }
    Ok(total)
}

/// Output size for `source` scaled into the `(width, height)` box.
fn target_dimensions(
    source: (u32, u32),
    width: u32,
    height: u32,
    method: ResizeMethod,
) -> (u32, u32) {
    match method {
        ResizeMethod::Fit => calculate_fit_dimensions(source, (width, height)),
        ResizeMethod::Stretch => (width, height),
    }
}

/// Scale to `target`, skipping resampling when nothing changes.
fn resize_image(image: DynamicImage, target: (u32, u32)) -> DynamicImage {
    if target == (image.width(), image.height()) {
        image
    } else {
        image.resize_exact(target.0, target.1, FilterType::Lanczos3)
    }
}

/// PNG compression level 0-9 to the encoder's presets.
fn png_compression(level: Option<u32>) -> CompressionType {
    match level {
        None => CompressionType::Default,
        Some(0..=2) => CompressionType::Fast,
        Some(3..=6) => CompressionType::Default,
        Some(_) => CompressionType::Best,
    }
}

fn quality_u8(value: Option<u32>, default: u32) -> u8 {
    value.unwrap_or(default).clamp(1, 100) as u8
}

/// Encode `image` as `format` into `writer` with the given tuning.
fn encode<W: Write + Seek>(
    image: &DynamicImage,
    format: ImageFormat,
    options: &EncodeOptions,
    writer: &mut W,
) -> Result<(), EngineError> {
    match format {
        ImageFormat::Jpeg => {
            let quality = quality_u8(options.get(EncodeParam::JpegQuality), DEFAULT_JPEG_QUALITY);
            let encoder = JpegEncoder::new_with_quality(writer, quality);
            DynamicImage::ImageRgb8(image.to_rgb8()).write_with_encoder(encoder)?;
        }
        ImageFormat::Png => {
            let compression = png_compression(options.get(EncodeParam::PngCompression));
            let encoder =
                PngEncoder::new_with_quality(writer, compression, PngFilterType::Adaptive);
            image.write_with_encoder(encoder)?;
        }
        ImageFormat::WebP => match options.get(EncodeParam::WebpQuality) {
            Some(quality) if quality < 100 => {
                let rgba = image.to_rgba8();
                let encoded = webp::Encoder::from_rgba(rgba.as_raw(), rgba.width(), rgba.height())
                    .encode_simple(false, quality.max(1) as f32)
                    .map_err(|e| EngineError::ProcessingFailed(format!("webp encoding: {e:?}")))?;
                writer.write_all(&encoded).map_err(ImageError::IoError)?;
            }
            _ => {
                let encoder = WebPEncoder::new_lossless(writer);
                DynamicImage::ImageRgba8(image.to_rgba8()).write_with_encoder(encoder)?;
            }
        },
        ImageFormat::Avif => {
            let quality = quality_u8(options.get(EncodeParam::AvifQuality), DEFAULT_AVIF_QUALITY);
            let speed = options
                .get(EncodeParam::AvifSpeed)
                .unwrap_or(DEFAULT_AVIF_SPEED)
                .clamp(1, 10) as u8;
            let encoder = AvifEncoder::new_with_speed_quality(writer, speed, quality);
            image.write_with_encoder(encoder)?;
        }
        ImageFormat::Gif => {
            DynamicImage::ImageRgba8(image.to_rgba8()).write_to(writer, ImageFormat::Gif)?;
        }
        other => image.write_to(writer, other)?,
    }
    Ok(())
}

fn is_write_zero(err: &EngineError) -> bool {
    matches!(
        err,
        EngineError::Image(ImageError::IoError(e)) if e.kind() == std::io::ErrorKind::WriteZero
    )
}

impl ImageEngine for RustEngine {
    type Decoder<'a> = RustDecoder<'a>;

    fn open_decoder<'a>(&self, bytes: &'a [u8]) -> Result<RustDecoder<'a>, EngineError> {
        match image::guess_format(bytes) {
            Ok(format) if INPUT_FORMATS.contains(&format) => Ok(RustDecoder { bytes, format }),
            _ => Err(EngineError::UnknownSignature),
        }
    }

    fn transform(
        &self,
        decoder: &mut RustDecoder<'_>,
        options: &TransformOptions,
        buffer: &mut [u8],
    ) -> Result<usize, EngineError> {
        let (width, height) = (options.width, options.height);
        if width == 0 || height == 0 {
            return Err(EngineError::ProcessingFailed(format!(
                "target dimensions must be positive, got {width}x{height}"
            )));
        }
        let format = output_format(&options.format)
            .ok_or_else(|| EngineError::UnsupportedFormat(options.format.clone()))?;

        let image = decoder.decode(options.normalize_orientation)?;
        let source = (image.width(), image.height());
        let target = target_dimensions(source, width, height, options.method);

        // Limits apply to the scaled size, not the requested box.
        let max = match format {
            ImageFormat::WebP => self.max_dimension.min(WEBP_MAX_DIMENSION),
            _ => self.max_dimension,
        };
        if target.0 > max || target.1 > max {
            return Err(EngineError::DimensionsTooLarge {
                width: target.0,
                height: target.1,
                max,
            });
        }
        let resized = resize_image(image, target);

        let capacity = buffer.len();
        let mut cursor = Cursor::new(buffer);
        let result = encode(&resized, format, &options.encode, &mut cursor);
        let written = cursor.position() as usize;

        // A completely filled buffer can't be told apart from a truncated
        // encode, so it counts as overflow too.
        match result {
            Err(e) if is_write_zero(&e) || written >= capacity => {
                Err(EngineError::BufferTooSmall { capacity })
            }
            Err(e) => Err(e),
            Ok(()) if written >= capacity => Err(EngineError::BufferTooSmall { capacity }),
            Ok(()) => Ok(written),
        }
    }
}

//! Image engine trait and shared types.
//!
//! The [`ImageEngine`] trait defines the capabilities the resize pipeline
//! consumes: open a decoder over raw bytes, read its header through
//! [`SourceDecoder`], and run a combined resize + encode into a
//! caller-supplied buffer. Releasing a decoder is dropping it.
//!
//! The production implementation is
//! [`RustEngine`](super::rust_backend::RustEngine), built on the pure-Rust
//! `image` crate.

use super::params::TransformOptions;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("unrecognized image signature")]
    UnknownSignature,
    #[error(transparent)]
    Image(#[from] image::ImageError),
    #[error("unsupported output format: {0:?}")]
    UnsupportedFormat(String),
    #[error("output buffer too small ({capacity} bytes)")]
    BufferTooSmall { capacity: usize },
    #[error("dimensions {width}x{height} exceed the maximum of {max}px per side")]
    DimensionsTooLarge { width: u32, height: u32, max: u32 },
    #[error("processing failed: {0}")]
    ProcessingFailed(String),
}

/// Image header as read by [`SourceDecoder::header`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Detected format, upper-case (`"JPEG"`, `"PNG"`, `"WEBP"`, ...).
    pub description: String,
    pub width: u32,
    pub height: u32,
    /// Total animation length; zero for still images.
    pub duration: Duration,
}

impl Header {
    pub fn new(description: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            description: description.into(),
            width,
            height,
            duration: Duration::ZERO,
        }
    }

    pub fn is_animated(&self) -> bool {
        !self.duration.is_zero()
    }
}

/// An opened decoder over one input's bytes.
///
/// Opening only checks the signature; [`header`](Self::header) validates the
/// container and may reject inputs that opened fine.
pub trait SourceDecoder {
    fn header(&mut self) -> Result<Header, EngineError>;
}

/// Trait for image engines.
///
/// Everything outside this trait (format choice, dimensions, encoder tuning,
/// buffer sizing, file handling) is policy and lives in the pipeline.
pub trait ImageEngine {
    type Decoder<'a>: SourceDecoder;

    /// Open a decoder, failing fast if the bytes match no known format.
    fn open_decoder<'a>(&self, bytes: &'a [u8]) -> Result<Self::Decoder<'a>, EngineError>;

    /// Resize and encode into `buffer`, returning the number of bytes written.
    ///
    /// The buffer never grows: output that doesn't fit is an
    /// [`EngineError::BufferTooSmall`].
    fn transform(
        &self,
        decoder: &mut Self::Decoder<'_>,
        options: &TransformOptions,
        buffer: &mut [u8],
    ) -> Result<usize, EngineError>;
}

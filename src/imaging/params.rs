//! Parameter types for engine operations.
//!
//! These structs describe *what* the engine should do, not *how*. They are
//! the interface between the policy layer (which decides format, size and
//! encoder tuning) and the [`backend`](super::backend) (which does the pixel
//! work). Keeping them plain data lets the pipeline run against a mock
//! engine in tests.
//!
//! ## Types
//!
//! - [`ResizeMethod`]: `Fit` (aspect-preserving, within bounds) or `Stretch` (exact size).
//! - [`EncodeParam`]: Named per-format encoder knob (JPEG quality, PNG compression, ...).
//! - [`EncodeOptions`]: Ordered map of [`EncodeParam`] to integer value.
//! - [`TransformOptions`]: Everything one resize + encode call needs.

use std::collections::BTreeMap;
use std::fmt;

/// How the source is scaled into the requested box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResizeMethod {
    /// Scale to fit entirely inside the box, preserving aspect ratio.
    #[default]
    Fit,
    /// Scale to exactly the box, ignoring aspect ratio.
    Stretch,
}

impl fmt::Display for ResizeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResizeMethod::Fit => f.write_str("fit"),
            ResizeMethod::Stretch => f.write_str("stretch"),
        }
    }
}

/// Encoder tuning parameter, applied only at encode time.
///
/// Parameters that don't apply to the chosen output format are ignored by
/// the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EncodeParam {
    /// JPEG quality, 1-100.
    JpegQuality,
    /// PNG compression level, 0 (fastest) to 9 (smallest).
    PngCompression,
    /// WebP quality, 1-100. 100 selects lossless encoding.
    WebpQuality,
    /// AVIF quality, 1-100.
    AvifQuality,
    /// AVIF encoder speed, 1 (slowest) to 10 (fastest).
    AvifSpeed,
}

/// Set of encode parameters for one output format.
///
/// An empty set is valid: the engine then uses the format's defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodeOptions(BTreeMap<EncodeParam, u32>);

impl EncodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, param: EncodeParam, value: u32) -> Self {
        self.0.insert(param, value);
        self
    }

    pub fn get(&self, param: EncodeParam) -> Option<u32> {
        self.0.get(&param).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EncodeParam, u32)> + '_ {
        self.0.iter().map(|(p, v)| (*p, *v))
    }
}

impl<const N: usize> From<[(EncodeParam, u32); N]> for EncodeOptions {
    fn from(entries: [(EncodeParam, u32); N]) -> Self {
        Self(BTreeMap::from(entries))
    }
}

/// Parameters for a combined resize + encode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOptions {
    /// Output container identifier: lower-cased extension with leading dot.
    pub format: String,
    pub width: u32,
    pub height: u32,
    pub method: ResizeMethod,
    /// Apply embedded EXIF orientation before resizing.
    pub normalize_orientation: bool,
    pub encode: EncodeOptions,
}

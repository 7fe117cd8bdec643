//! Resize policy: what to produce from one input.
//!
//! Given the source header and what the user asked for, decides the output
//! format, the final dimensions, the resize method and the encoder tuning.
//! Nothing here touches pixels; the result is an immutable [`ResizePolicy`]
//! handed to the [`transform`](crate::transform) runner.
//!
//! ## Rules
//!
//! | Decision | Rule |
//! |---|---|
//! | Format | Output path extension, lower-cased with leading dot; else `"." + lowercase(source description)` |
//! | Width / height | Explicit values verbatim; `0` keeps the source dimension (each side independently) |
//! | Method | `Stretch` when requested, else `Fit` |
//! | Encode options | Lookup in [`ENCODE_OPTIONS`]; unknown formats get an empty set |
//!
//! Output extensions aren't validated here. An extension the engine can't
//! encode passes through and fails at transform time.

use crate::imaging::{
    EncodeOptions, EncodeParam, EngineError, Header, ResizeMethod, SourceDecoder, TransformOptions,
    resolve_dimension,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Encoder tuning per output format. Read-only after first use.
pub static ENCODE_OPTIONS: LazyLock<HashMap<&'static str, EncodeOptions>> = LazyLock::new(|| {
    let jpeg = EncodeOptions::from([(EncodeParam::JpegQuality, 85)]);
    HashMap::from([
        (".jpeg", jpeg.clone()),
        (".jpg", jpeg),
        (".png", EncodeOptions::from([(EncodeParam::PngCompression, 7)])),
        (".webp", EncodeOptions::from([(EncodeParam::WebpQuality, 85)])),
        (
            ".avif",
            EncodeOptions::from([(EncodeParam::AvifQuality, 85), (EncodeParam::AvifSpeed, 6)]),
        ),
    ])
});

/// Encode options for an output format; empty when the format has none.
pub fn encode_options_for(format: &str) -> EncodeOptions {
    ENCODE_OPTIONS.get(format).cloned().unwrap_or_default()
}

/// What the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeRequest {
    /// Target width, `0` for the source width.
    pub width: u32,
    /// Target height, `0` for the source height.
    pub height: u32,
    pub output: PathBuf,
    pub stretch: bool,
}

/// Resolved, immutable decisions for one transform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizePolicy {
    options: TransformOptions,
}

impl ResizePolicy {
    /// Build the policy from an already-read header.
    pub fn from_header(header: &Header, request: &ResizeRequest) -> Self {
        let format = output_format(&request.output, &header.description);
        let method = if request.stretch {
            ResizeMethod::Stretch
        } else {
            ResizeMethod::Fit
        };

        Self {
            options: TransformOptions {
                width: resolve_dimension(request.width, header.width),
                height: resolve_dimension(request.height, header.height),
                method,
                normalize_orientation: true,
                encode: encode_options_for(&format),
                format,
            },
        }
    }

    pub fn format(&self) -> &str {
        &self.options.format
    }

    pub fn width(&self) -> u32 {
        self.options.width
    }

    pub fn height(&self) -> u32 {
        self.options.height
    }

    pub fn method(&self) -> ResizeMethod {
        self.options.method
    }

    pub fn encode_options(&self) -> &EncodeOptions {
        &self.options.encode
    }

    pub fn transform_options(&self) -> &TransformOptions {
        &self.options
    }
}

/// Extension of the file name: the text after its last `.`.
///
/// Unlike [`Path::extension`], a dot-file name counts: `.png` has extension
/// `png`. A name ending in a bare `.` has none.
pub fn file_extension(path: &Path) -> Option<&str> {
    let name = path.file_name()?.to_str()?;
    let (_, ext) = name.rsplit_once('.')?;
    (!ext.is_empty()).then_some(ext)
}

/// Output format identifier for `output`, falling back to the source format.
///
/// ```
/// # use imgresize::policy::output_format;
/// # use std::path::Path;
/// assert_eq!(output_format(Path::new("thumb.PNG"), "JPEG"), ".png");
/// assert_eq!(output_format(Path::new("thumb"), "JPEG"), ".jpeg");
/// ```
pub fn output_format(output: &Path, source_description: &str) -> String {
    match file_extension(output) {
        Some(ext) => format!(".{}", ext.to_lowercase()),
        None => format!(".{}", source_description.to_lowercase()),
    }
}

/// Read the header through `decoder` and resolve the policy.
///
/// Header failures are returned untouched; the caller decides how to label
/// them. The decoder stays owned by the caller.
pub fn resolve(
    decoder: &mut impl SourceDecoder,
    request: &ResizeRequest,
) -> Result<(ResizePolicy, Header), EngineError> {
    let header = decoder.header()?;
    let policy = ResizePolicy::from_header(&header, request);
    Ok((policy, header))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::ImageEngine;
    use crate::imaging::backend::tests::{MockEngine, RecordedOp};

    fn request(output: &str, width: u32, height: u32, stretch: bool) -> ResizeRequest {
        ResizeRequest {
            width,
            height,
            output: output.into(),
            stretch,
        }
    }

    // =========================================================================
    // Output format
    // =========================================================================

    #[test]
    fn format_from_output_extension() {
        assert_eq!(output_format(Path::new("out/x.png"), "JPEG"), ".png");
    }

    #[test]
    fn format_extension_is_lowercased() {
        assert_eq!(output_format(Path::new("X.WebP"), "PNG"), ".webp");
    }

    #[test]
    fn format_falls_back_to_source_description() {
        assert_eq!(output_format(Path::new("resized"), "JPEG"), ".jpeg");
        assert_eq!(output_format(Path::new(""), "GIF"), ".gif");
        assert_eq!(output_format(Path::new("thumb."), "PNG"), ".png");
    }

    #[test]
    fn dot_file_name_is_an_extension() {
        assert_eq!(output_format(Path::new(".png"), "JPEG"), ".png");
        assert_eq!(output_format(Path::new("out/.WEBP"), "JPEG"), ".webp");
    }

    #[test]
    fn file_extension_uses_last_dot() {
        assert_eq!(file_extension(Path::new("a.tar.gz")), Some("gz"));
        assert_eq!(file_extension(Path::new(".png")), Some("png"));
        assert_eq!(file_extension(Path::new("dir.d/name")), None);
        assert_eq!(file_extension(Path::new("name.")), None);
    }

    #[test]
    fn unknown_extension_passes_through() {
        let header = Header::new("PNG", 10, 10);
        let policy = ResizePolicy::from_header(&header, &request("x.xyz", 0, 0, false));
        assert_eq!(policy.format(), ".xyz");
        assert!(policy.encode_options().is_empty());
    }

    // =========================================================================
    // Dimensions and method
    // =========================================================================

    #[test]
    fn zero_dimensions_use_source() {
        let header = Header::new("JPEG", 800, 600);
        let policy = ResizePolicy::from_header(&header, &request("x.jpeg", 0, 0, false));
        assert_eq!((policy.width(), policy.height()), (800, 600));
    }

    #[test]
    fn dimensions_resolve_independently() {
        let header = Header::new("JPEG", 800, 600);

        let policy = ResizePolicy::from_header(&header, &request("x.jpeg", 400, 0, false));
        assert_eq!((policy.width(), policy.height()), (400, 600));

        let policy = ResizePolicy::from_header(&header, &request("x.jpeg", 0, 100, false));
        assert_eq!((policy.width(), policy.height()), (800, 100));
    }

    #[test]
    fn stretch_flag_selects_method() {
        let header = Header::new("JPEG", 800, 600);
        let fit = ResizePolicy::from_header(&header, &request("x.jpeg", 400, 400, false));
        let stretch = ResizePolicy::from_header(&header, &request("x.jpeg", 400, 400, true));
        assert_eq!(fit.method(), ResizeMethod::Fit);
        assert_eq!(stretch.method(), ResizeMethod::Stretch);
    }

    #[test]
    fn orientation_is_always_normalized() {
        let header = Header::new("JPEG", 8, 8);
        let policy = ResizePolicy::from_header(&header, &request("x.png", 0, 0, true));
        assert!(policy.transform_options().normalize_orientation);
    }

    // =========================================================================
    // Encode options
    // =========================================================================

    #[test]
    fn encode_options_table_values() {
        assert_eq!(
            encode_options_for(".jpeg").get(EncodeParam::JpegQuality),
            Some(85)
        );
        assert_eq!(
            encode_options_for(".png").get(EncodeParam::PngCompression),
            Some(7)
        );
        assert_eq!(
            encode_options_for(".webp").get(EncodeParam::WebpQuality),
            Some(85)
        );
    }

    #[test]
    fn encode_options_missing_format_is_empty() {
        assert!(encode_options_for(".gif").is_empty());
        assert!(encode_options_for(".bmp").is_empty());
    }

    #[test]
    fn policy_carries_options_for_fallback_format() {
        let header = Header::new("WEBP", 10, 10);
        let policy = ResizePolicy::from_header(&header, &request("resized", 0, 0, false));
        assert_eq!(policy.format(), ".webp");
        assert_eq!(policy.encode_options().get(EncodeParam::WebpQuality), Some(85));
    }

    // =========================================================================
    // resolve()
    // =========================================================================

    #[test]
    fn resolve_reads_header_once() {
        let engine = MockEngine::with_header(Header::new("PNG", 640, 480));
        let mut decoder = engine.open_decoder(b"png").unwrap();

        let (policy, header) = resolve(&mut decoder, &request("x.jpeg", 320, 0, false)).unwrap();
        assert_eq!(header.width, 640);
        assert_eq!((policy.width(), policy.height()), (320, 480));
        assert_eq!(policy.format(), ".jpeg");

        let headers = engine
            .get_operations()
            .into_iter()
            .filter(|op| *op == RecordedOp::Header)
            .count();
        assert_eq!(headers, 1);
    }

    #[test]
    fn resolve_propagates_header_error() {
        let engine = MockEngine::malformed();
        let mut decoder = engine.open_decoder(b"bad").unwrap();

        assert!(resolve(&mut decoder, &request("x.png", 0, 0, false)).is_err());
    }
}

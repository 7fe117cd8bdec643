//! The single-image pipeline and its repeat loop.
//!
//! One run walks a fixed sequence and stops at the first failure:
//!
//! ```text
//! Start → Decoded → HeaderRead → PolicyResolved → Transformed → Written → Done
//! ```
//!
//! The decoder is a scoped value owned by [`resize`], so it is dropped on
//! every path out of the run, including header failures. Each run allocates
//! its own [`OutputBuffer`]; only the input bytes are shared between runs.

use crate::imaging::{EngineError, Header, ImageEngine};
use crate::output;
use crate::policy::{self, ResizePolicy, ResizeRequest};
use crate::transform::{self, OutputBuffer};
use crate::writer::{self, WriteError};
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResizeError {
    #[error("failed to read input file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("error decoding image")]
    Decode(#[source] EngineError),
    #[error("error reading image header")]
    Header(#[source] EngineError),
    #[error("error transforming image")]
    Transform(#[source] EngineError),
    #[error(transparent)]
    Output(#[from] WriteError),
}

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct ResizeOutcome {
    pub header: Header,
    pub policy: ResizePolicy,
    pub bytes_written: usize,
}

/// Read the whole input file; the decoder works on bytes.
pub fn read_input(path: &Path) -> Result<Vec<u8>, ResizeError> {
    std::fs::read(path).map_err(|source| ResizeError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Default destination: `"resized"` plus the input's extension.
///
/// ```
/// # use imgresize::resize::default_output_path;
/// # use std::path::{Path, PathBuf};
/// assert_eq!(default_output_path(Path::new("photos/cat.JPG")), PathBuf::from("resized.JPG"));
/// assert_eq!(default_output_path(Path::new("cat")), PathBuf::from("resized"));
/// assert_eq!(default_output_path(Path::new(".png")), PathBuf::from("resized.png"));
/// ```
pub fn default_output_path(input: &Path) -> PathBuf {
    match policy::file_extension(input) {
        Some(ext) => PathBuf::from(format!("resized.{ext}")),
        None => PathBuf::from("resized"),
    }
}

/// Run the full pipeline once.
pub fn resize<E: ImageEngine>(
    engine: &E,
    input: &[u8],
    request: &ResizeRequest,
    buffer_size: usize,
) -> Result<ResizeOutcome, ResizeError> {
    let mut decoder = engine.open_decoder(input).map_err(ResizeError::Decode)?;

    let (policy, header) = policy::resolve(&mut decoder, request).map_err(ResizeError::Header)?;
    output::print_header_summary(&header);
    tracing::debug!(
        format = policy.format(),
        width = policy.width(),
        height = policy.height(),
        method = %policy.method(),
        "resolved resize policy"
    );

    let mut buffer = OutputBuffer::with_capacity(buffer_size);
    let encoded = transform::transform(engine, &mut decoder, &policy, &mut buffer)
        .map_err(ResizeError::Transform)?;

    writer::write(&request.output, encoded)?;
    tracing::info!(path = %request.output.display(), bytes = encoded.len(), "image written");

    Ok(ResizeOutcome {
        header,
        policy,
        bytes_written: encoded.len(),
    })
}

/// Run the pipeline `iterations` times in sequence, stopping at the first
/// failure. Returns the outcome of the last run, or `None` for zero runs.
pub fn run_iterations<E: ImageEngine>(
    engine: &E,
    input: &[u8],
    request: &ResizeRequest,
    buffer_size: usize,
    iterations: u32,
) -> Result<Option<ResizeOutcome>, ResizeError> {
    let started = Instant::now();
    let mut last = None;

    for iteration in 1..=iterations {
        tracing::debug!(iteration, iterations, "starting run");
        last = Some(resize(engine, input, request, buffer_size)?);
    }

    if iterations > 1 {
        let elapsed = started.elapsed();
        tracing::info!(
            iterations,
            total_ms = elapsed.as_millis() as u64,
            avg_ms = (elapsed / iterations).as_secs_f64() * 1000.0,
            "iterations complete"
        );
    }
    Ok(last)
}

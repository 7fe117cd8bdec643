//! Transform runner: one resize + encode into a fixed-capacity buffer.
//!
//! The buffer is sized up front and never grows. If the encoded result
//! doesn't fit, the engine reports [`EngineError::BufferTooSmall`] and the
//! run fails; nothing is truncated silently and nothing is retried.

use crate::imaging::{EngineError, ImageEngine};
use crate::policy::ResizePolicy;

/// Default output capacity: 50 MiB.
pub const DEFAULT_OUTPUT_BUFFER_SIZE: usize = 50 * 1024 * 1024;

/// Pre-allocated scratch space for encoded output.
#[derive(Debug)]
pub struct OutputBuffer {
    bytes: Vec<u8>,
}

impl OutputBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: vec![0; capacity],
        }
    }

    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_OUTPUT_BUFFER_SIZE)
    }
}

/// Run the engine transform described by `policy`.
///
/// Returns the populated prefix of `buffer`.
pub fn transform<'b, E: ImageEngine>(
    engine: &E,
    decoder: &mut E::Decoder<'_>,
    policy: &ResizePolicy,
    buffer: &'b mut OutputBuffer,
) -> Result<&'b [u8], EngineError> {
    let written = engine.transform(decoder, policy.transform_options(), &mut buffer.bytes)?;
    Ok(&buffer.bytes[..written])
}

//! # imgresize
//!
//! Single-shot image resize and transcode. Give it one input image, and
//! optionally a target size and an output name; it writes one output image.
//!
//! # Architecture
//!
//! ```text
//! bytes → open decoder → resolve policy → transform → write
//!              │               │               │          │
//!          signature        header +        engine     remove, then
//!            check       format/size/     resize +     write 0o400
//!                          encoder         encode
//! ```
//!
//! Every stage either succeeds or ends the run; nothing is retried. A repeat
//! count runs the whole sequence again from the same input bytes, which is
//! useful for timing.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`policy`] | Output format, dimensions, resize method, encoder tuning table |
//! | [`transform`] | Runs the engine into a fixed-capacity [`transform::OutputBuffer`] |
//! | [`writer`] | Replaces the destination file, owner-read-only |
//! | [`resize`] | The per-run pipeline, error taxonomy, and repeat loop |
//! | [`imaging`] | Engine traits and the `image`-crate engine |
//! | [`config`] | Optional TOML resource limits (buffer size, max dimension) |
//! | [`output`] | User-facing summary lines |
//!
//! # Design Decisions
//!
//! ## Fixed Output Buffer
//!
//! The encoded result goes into a buffer whose size is chosen before the run
//! starts (50 MiB unless configured). It never grows. Output that doesn't fit
//! is an error, not a reallocation, so memory use per run is known up front.
//!
//! ## Remove, Then Write
//!
//! The destination is removed and recreated rather than staged through a
//! temporary file and renamed. A crash mid-write can leave a truncated or
//! missing file.
//!
//! ## Engine Behind a Trait
//!
//! Pixel work sits behind [`imaging::ImageEngine`]. The pipeline only makes
//! decisions and moves bytes, so its tests run against a recording mock and
//! never decode an image.

pub mod config;
pub mod imaging;
pub mod output;
pub mod policy;
pub mod resize;
pub mod transform;
pub mod writer;

#[cfg(test)]
pub(crate) mod test_helpers;

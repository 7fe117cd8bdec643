//! Image engine: pure Rust, statically linked.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Open** | `image::guess_format` (signature only) |
//! | **Header** | `image` decoders: format, dimensions, animation duration |
//! | **Transform** | Orientation + Lanczos3 resize + per-format encoder |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing engine operations
//! - **Backend**: [`ImageEngine`] / [`SourceDecoder`] traits + [`RustEngine`]

pub mod backend;
mod calculations;
mod params;
pub mod rust_backend;

pub use backend::{EngineError, Header, ImageEngine, SourceDecoder};
pub use calculations::{calculate_fit_dimensions, resolve_dimension};
pub use params::{EncodeOptions, EncodeParam, ResizeMethod, TransformOptions};
pub use rust_backend::RustEngine;

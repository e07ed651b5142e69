//! sketchbox runs untrusted procedural-drawing scripts and turns them into images.
//!
//! A script is plain text in a small JavaScript-like language. It runs inside a purpose-built
//! interpreter that can reach nothing but its own variables and a fixed drawing/math API, under
//! a wall-clock deadline and hard resource ceilings. The drawing calls accumulate into an SVG
//! document, which is rasterized to PNG.
//!
//! - [`render_sketch`] / [`render_sketch_blocking`]: script -> PNG bytes
//! - [`compile_sketch`]: script -> [`VectorDocument`] (SVG)
//! - [`rasterize`]: [`VectorDocument`] -> PNG bytes
//!
//! Same seed and same script give byte-identical output.
#![forbid(unsafe_code)]

mod foundation;

pub mod draw;
pub mod guard;
pub mod random;
pub mod raster;
pub mod render;
pub mod sandbox;
pub(crate) mod script;
pub mod svg;

pub use crate::foundation::core::{Affine, Canvas, DEFAULT_CANVAS_DIM, Point};
pub use crate::foundation::error::{ExecFailure, SketchError, SketchResult};
pub use crate::foundation::limits::{
    DEFAULT_TIMEOUT_MS, Limits, MAX_CANVAS_DIM, MAX_ELEMENTS, MAX_SOURCE_BYTES, MIN_CANVAS_DIM,
};

pub use crate::raster::rasterize;
pub use crate::render::{RenderOpts, compile_sketch, render_sketch, render_sketch_blocking};
pub use crate::svg::VectorDocument;

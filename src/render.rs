//! Orchestrator: script text in, PNG bytes (or a stable error) out.
//!
//! Every call builds all of its state fresh (canvas, drawing context, RNG, noise table,
//! interpreter), so concurrent renders share nothing mutable.

use anyhow::anyhow;

use crate::foundation::core::{Canvas, DEFAULT_CANVAS_DIM};
use crate::foundation::error::{SketchError, SketchResult};
use crate::foundation::limits::Limits;
use crate::guard;
use crate::random::clock_seed;
use crate::raster::rasterize;
use crate::sandbox;
use crate::svg::{VectorDocument, compile_document};

/// Options for one render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderOpts {
    /// Initial canvas width; clamped into `[1, 4096]`. Scripts may resize with `createCanvas`.
    pub width: u32,
    /// Initial canvas height; clamped into `[1, 4096]`.
    pub height: u32,
    /// Explicit seed, truncated to 32 bits. `None` derives one from the clock.
    pub seed: Option<u64>,
    pub limits: Limits,
}

impl Default for RenderOpts {
    fn default() -> Self {
        Self {
            width: DEFAULT_CANVAS_DIM,
            height: DEFAULT_CANVAS_DIM,
            seed: None,
            limits: Limits::default(),
        }
    }
}

impl RenderOpts {
    fn resolved_seed(&self) -> u32 {
        self.seed.map_or_else(clock_seed, |s| s as u32)
    }
}

/// Run `code` and stop after the vector compiler.
#[tracing::instrument(skip(code, opts), fields(bytes = code.len(), seed = tracing::field::Empty))]
pub fn compile_sketch(code: &str, opts: &RenderOpts) -> SketchResult<VectorDocument> {
    if code.len() > opts.limits.max_source_bytes {
        tracing::warn!(limit = opts.limits.max_source_bytes, "script rejected: too large");
        return Err(SketchError::InputTooLarge {
            size: code.len(),
            limit: opts.limits.max_source_bytes,
        });
    }
    guard::check(code)?;

    let canvas = Canvas::clamped(opts.width, opts.height);
    let seed = opts.resolved_seed();
    tracing::Span::current().record("seed", seed);

    let ctx = sandbox::execute(code, canvas, seed, &opts.limits)?;
    let (canvas, elements) = ctx.into_parts();
    tracing::debug!(
        elements = elements.len(),
        width = canvas.width,
        height = canvas.height,
        "sketch executed"
    );
    Ok(compile_document(canvas, &elements))
}

/// The full pipeline on the calling thread.
pub fn render_sketch_blocking(code: &str, opts: &RenderOpts) -> SketchResult<Vec<u8>> {
    let doc = compile_sketch(code, opts)?;
    rasterize(&doc)
}

/// Render `code` to PNG bytes.
///
/// Execution and rasterization run on tokio's blocking pool; the caller's runtime threads are
/// never tied up by a script.
#[tracing::instrument(skip(code, opts))]
pub async fn render_sketch(code: &str, opts: RenderOpts) -> SketchResult<Vec<u8>> {
    let code = code.to_owned();
    let span = tracing::Span::current();
    tokio::task::spawn_blocking(move || span.in_scope(|| render_sketch_blocking(&code, &opts)))
        .await
        .map_err(|e| SketchError::Other(anyhow!("render task failed: {e}")))?
}

#[cfg(test)]
#[path = "../tests/unit/render.rs"]
mod tests;

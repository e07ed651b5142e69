//! Execution sandbox: one script, one fresh drawing context, one deadline.

use anyhow::anyhow;

use crate::draw::DrawingContext;
use crate::foundation::core::Canvas;
use crate::foundation::error::{ExecFailure, SketchError, SketchResult};
use crate::foundation::limits::{Limits, SANDBOX_STACK_BYTES};
use crate::random::{NoiseField, SeededRng};
use crate::script::error::line_col;
use crate::script::{Host, Interpreter, Interrupt, parse_program};

/// Parse and run `src` against a fresh [`DrawingContext`] of the given size.
///
/// The script runs on its own thread with a large stack so that deeply nested (but still
/// within-ceiling) scripts cannot exhaust the caller's stack. Returns the context holding
/// every emitted element, or the first failure.
pub fn execute(src: &str, canvas: Canvas, seed: u32, limits: &Limits) -> SketchResult<DrawingContext> {
    let span = tracing::Span::current();
    std::thread::scope(|s| {
        let handle = std::thread::Builder::new()
            .name("sketch-sandbox".to_owned())
            .stack_size(SANDBOX_STACK_BYTES)
            .spawn_scoped(s, || span.in_scope(|| execute_here(src, canvas, seed, limits)))
            .map_err(|e| anyhow!("failed to spawn sandbox thread: {e}"))?;
        handle
            .join()
            .map_err(|_| SketchError::Other(anyhow!("sandbox thread panicked")))?
    })
}

/// Same as [`execute`], on the current thread.
fn execute_here(
    src: &str,
    canvas: Canvas,
    seed: u32,
    limits: &Limits,
) -> SketchResult<DrawingContext> {
    let program = parse_program(src)
        .map_err(|e| SketchError::Execution(ExecFailure::Syntax(e.describe(src))))?;

    let mut rng = SeededRng::new(seed);
    let noise = NoiseField::new(&mut rng);
    let host = Host {
        ctx: DrawingContext::new(canvas, limits.max_elements),
        rng,
        noise,
    };

    let mut interp = Interpreter::new(host, limits.timeout());
    let outcome = interp.run(&program);
    drop(program);
    match outcome {
        Ok(()) => {
            let ctx = interp.into_host().ctx;
            tracing::debug!(elements = ctx.elements().len(), "script finished");
            Ok(ctx)
        }
        Err(interrupt) => Err(to_sketch_error(interrupt, src, limits)),
    }
}

fn to_sketch_error(interrupt: Interrupt, src: &str, limits: &Limits) -> SketchError {
    match interrupt {
        Interrupt::Timeout => SketchError::ExecutionTimeout {
            limit_ms: limits.timeout_ms,
        },
        Interrupt::Failed {
            failure: ExecFailure::Script(message),
            offset: Some(offset),
        } => {
            let (line, col) = line_col(src, offset);
            SketchError::Execution(ExecFailure::Script(format!(
                "line {line}, column {col}: {message}"
            )))
        }
        Interrupt::Failed { failure, .. } => SketchError::Execution(failure),
    }
}

#[cfg(test)]
#[path = "../tests/unit/sandbox.rs"]
mod tests;

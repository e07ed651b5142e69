use std::time::Duration;

/// Largest accepted script, in bytes.
pub const MAX_SOURCE_BYTES: usize = 50 * 1024;
/// Largest number of drawing elements one render may emit.
pub const MAX_ELEMENTS: usize = 10_000;
/// Default wall-clock budget for script execution.
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;
/// Canvas dimensions are clamped into `[MIN_CANVAS_DIM, MAX_CANVAS_DIM]`.
pub const MIN_CANVAS_DIM: u32 = 1;
pub const MAX_CANVAS_DIM: u32 = 4096;

/// Syntactic nesting ceiling (blocks, parentheses, literals).
pub(crate) const MAX_NESTING_DEPTH: usize = 256;
/// Evaluator recursion ceiling: expression depth plus function calls.
pub(crate) const MAX_EVAL_DEPTH: usize = 2048;
pub(crate) const MAX_STRING_BYTES: usize = 1024 * 1024;
pub(crate) const MAX_ARRAY_LEN: usize = 1_000_000;
/// Color strings and font families are copied into every element that uses them.
pub(crate) const MAX_STYLE_STRING_BYTES: usize = 256;
/// Cumulative bytes of strings and array/object slots one run may allocate.
pub(crate) const MAX_HEAP_BYTES: usize = 64 * 1024 * 1024;
/// Stack for the thread that parses and runs a script.
pub(crate) const SANDBOX_STACK_BYTES: usize = 64 * 1024 * 1024;

/// Resource ceilings for one render.
///
/// Every field has a default, so a partial JSON object is a valid config:
///
/// ```json
/// { "timeout_ms": 2000 }
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Limits {
    /// Maximum script size in bytes.
    pub max_source_bytes: usize,
    /// Maximum number of emitted drawing elements.
    pub max_elements: usize,
    /// Wall-clock execution budget in milliseconds.
    pub timeout_ms: u64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_source_bytes: MAX_SOURCE_BYTES,
            max_elements: MAX_ELEMENTS,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl Limits {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

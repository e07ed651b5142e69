//! Pre-execution lexical scan.
//!
//! This is a fast-fail filter for scripts that were obviously written for a richer host
//! (module loading, process access, string evaluation, prototype tampering). It is trivially
//! bypassable by string concatenation and is not what keeps the host safe: the interpreter
//! simply has no way to reach any of those capabilities.

use crate::foundation::error::{SketchError, SketchResult};

/// Denylisted substrings, checked in this order.
pub const DENYLIST: &[&str] = &[
    "require(",
    "import(",
    "process.",
    "globalThis",
    "eval(",
    "Function(",
    "constructor",
    "__proto__",
    "prototype",
    "child_process",
];

/// Return the first denylisted token found in `src`.
pub fn find_forbidden(src: &str) -> Option<&'static str> {
    DENYLIST.iter().copied().find(|token| src.contains(token))
}

/// Reject `src` if it contains a denylisted token.
pub fn check(src: &str) -> SketchResult<()> {
    match find_forbidden(src) {
        Some(token) => {
            tracing::warn!(token, "script rejected by static guard");
            Err(SketchError::ForbiddenConstruct { token })
        }
        None => Ok(()),
    }
}

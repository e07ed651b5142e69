use std::fmt;

/// Lex/parse error anchored at a byte offset into the script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ScriptError {
    pub(crate) offset: usize,
    pub(crate) message: String,
}

impl ScriptError {
    pub(crate) fn new(offset: usize, message: impl Into<String>) -> Self {
        Self {
            offset,
            message: message.into(),
        }
    }

    /// Render as `line L, column C: message` against the original source.
    pub(crate) fn describe(&self, src: &str) -> String {
        let (line, col) = line_col(src, self.offset);
        format!("line {line}, column {col}: {}", self.message)
    }
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "script error at byte {}: {}", self.offset, self.message)
    }
}

impl std::error::Error for ScriptError {}

/// 1-based line and column (in chars) of a byte offset.
pub(crate) fn line_col(src: &str, offset: usize) -> (usize, usize) {
    let mut offset = offset.min(src.len());
    while !src.is_char_boundary(offset) {
        offset -= 1;
    }
    let before = &src[..offset];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let col = before[line_start..].chars().count() + 1;
    (line, col)
}

use crate::script::error::ScriptError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Span {
    pub(crate) start: usize,
    pub(crate) end: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub(crate) kind: TokenKind,
    pub(crate) span: Span,
    /// A line break separates this token from the previous one.
    pub(crate) newline_before: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    Ident(String),
    Number(f64),
    Str(String),

    // keywords
    Let,
    Const,
    Var,
    Function,
    Return,
    If,
    Else,
    While,
    For,
    Of,
    Break,
    Continue,
    True,
    False,
    Null,
    Undefined,

    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Dot,
    Semicolon,

    Plus,
    Minus,
    Star,
    StarStar,
    Slash,
    Percent,
    PlusPlus,
    MinusMinus,

    Assign,
    PlusAssign,
    MinusAssign,
    StarAssign,
    SlashAssign,
    PercentAssign,

    Bang,

    EqEq,
    EqEqEq,
    Ne,
    NeEq,
    Lt,
    Le,
    Gt,
    Ge,

    AndAnd,
    OrOr,

    Question,
    Colon,

    Eof,
}

fn keyword(s: &str) -> Option<TokenKind> {
    Some(match s {
        "let" => TokenKind::Let,
        "const" => TokenKind::Const,
        "var" => TokenKind::Var,
        "function" => TokenKind::Function,
        "return" => TokenKind::Return,
        "if" => TokenKind::If,
        "else" => TokenKind::Else,
        "while" => TokenKind::While,
        "for" => TokenKind::For,
        "of" => TokenKind::Of,
        "break" => TokenKind::Break,
        "continue" => TokenKind::Continue,
        "true" => TokenKind::True,
        "false" => TokenKind::False,
        "null" => TokenKind::Null,
        "undefined" => TokenKind::Undefined,
        _ => return None,
    })
}

fn is_ident_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_' || c == b'$'
}

fn is_ident_continue(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_' || c == b'$'
}

pub(crate) fn lex(input: &str) -> Result<Vec<Token>, ScriptError> {
    let mut out = Vec::new();
    let bytes = input.as_bytes();
    let mut i = 0usize;
    let mut newline_before = false;

    macro_rules! push {
        ($kind:expr, $start:expr) => {{
            out.push(Token {
                kind: $kind,
                span: Span {
                    start: $start,
                    end: i,
                },
                newline_before,
            });
            newline_before = false;
        }};
    }

    while i < bytes.len() {
        let c = bytes[i];

        if c == b'\n' {
            newline_before = true;
            i += 1;
            continue;
        }
        if c.is_ascii_whitespace() {
            i += 1;
            continue;
        }

        let start = i;

        // Comments.
        if c == b'/' && bytes.get(i + 1) == Some(&b'/') {
            while i < bytes.len() && bytes[i] != b'\n' {
                i += 1;
            }
            continue;
        }
        if c == b'/' && bytes.get(i + 1) == Some(&b'*') {
            let Some(end) = input[i + 2..].find("*/") else {
                return Err(ScriptError::new(start, "unterminated block comment"));
            };
            if input[i + 2..i + 2 + end].contains('\n') {
                newline_before = true;
            }
            i += 2 + end + 2;
            continue;
        }

        // Number: hex, or [0-9]+(.[0-9]*)?([eE][+-]?[0-9]+)? or .[0-9]+(...)
        if c.is_ascii_digit() || (c == b'.' && bytes.get(i + 1).is_some_and(u8::is_ascii_digit))
        {
            if c == b'0' && matches!(bytes.get(i + 1), Some(b'x' | b'X')) {
                i += 2;
                let digits_start = i;
                while i < bytes.len() && bytes[i].is_ascii_hexdigit() {
                    i += 1;
                }
                let v = u64::from_str_radix(&input[digits_start..i], 16)
                    .map_err(|_| ScriptError::new(start, "invalid hex literal"))?;
                push!(TokenKind::Number(v as f64), start);
                continue;
            }

            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            if i < bytes.len() && bytes[i] == b'.' {
                i += 1;
                while i < bytes.len() && bytes[i].is_ascii_digit() {
                    i += 1;
                }
            }
            if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
                let e_pos = i;
                i += 1;
                if i < bytes.len() && matches!(bytes[i], b'+' | b'-') {
                    i += 1;
                }
                let exp_start = i;
                while i < bytes.len() && bytes[i].is_ascii_digit() {
                    i += 1;
                }
                if exp_start == i {
                    return Err(ScriptError::new(
                        e_pos,
                        "invalid number exponent (expected digits)",
                    ));
                }
            }
            if i < bytes.len() && is_ident_start(bytes[i]) {
                return Err(ScriptError::new(i, "identifier directly after number"));
            }

            let v: f64 = input[start..i]
                .parse()
                .map_err(|_| ScriptError::new(start, "invalid number"))?;
            push!(TokenKind::Number(v), start);
            continue;
        }

        if is_ident_start(c) {
            i += 1;
            while i < bytes.len() && is_ident_continue(bytes[i]) {
                i += 1;
            }
            let s = &input[start..i];
            let kind = keyword(s).unwrap_or_else(|| TokenKind::Ident(s.to_owned()));
            push!(kind, start);
            continue;
        }

        if c == b'"' || c == b'\'' {
            let (s, end) = lex_string(input, start)?;
            i = end;
            push!(TokenKind::Str(s), start);
            continue;
        }
        if c == b'`' {
            return Err(ScriptError::new(start, "template literals are not supported"));
        }

        // Longest match first.
        let rest = &input[i..];
        let ops: &[(&str, TokenKind)] = &[
            ("===", TokenKind::EqEqEq),
            ("!==", TokenKind::NeEq),
            ("**", TokenKind::StarStar),
            ("++", TokenKind::PlusPlus),
            ("--", TokenKind::MinusMinus),
            ("+=", TokenKind::PlusAssign),
            ("-=", TokenKind::MinusAssign),
            ("*=", TokenKind::StarAssign),
            ("/=", TokenKind::SlashAssign),
            ("%=", TokenKind::PercentAssign),
            ("&&", TokenKind::AndAnd),
            ("||", TokenKind::OrOr),
            ("==", TokenKind::EqEq),
            ("!=", TokenKind::Ne),
            ("<=", TokenKind::Le),
            (">=", TokenKind::Ge),
        ];
        if let Some((op, kind)) = ops.iter().find(|(op, _)| rest.starts_with(op)) {
            i += op.len();
            push!(kind.clone(), start);
            continue;
        }

        let kind = match c {
            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            b'{' => TokenKind::LBrace,
            b'}' => TokenKind::RBrace,
            b'[' => TokenKind::LBracket,
            b']' => TokenKind::RBracket,
            b',' => TokenKind::Comma,
            b'.' => TokenKind::Dot,
            b';' => TokenKind::Semicolon,
            b'+' => TokenKind::Plus,
            b'-' => TokenKind::Minus,
            b'*' => TokenKind::Star,
            b'/' => TokenKind::Slash,
            b'%' => TokenKind::Percent,
            b'=' => TokenKind::Assign,
            b'!' => TokenKind::Bang,
            b'<' => TokenKind::Lt,
            b'>' => TokenKind::Gt,
            b'?' => TokenKind::Question,
            b':' => TokenKind::Colon,
            _ => {
                let ch = rest.chars().next().unwrap_or('\u{fffd}');
                return Err(ScriptError::new(
                    start,
                    format!("unexpected character '{ch}'"),
                ));
            }
        };
        i += 1;
        push!(kind, start);
    }

    out.push(Token {
        kind: TokenKind::Eof,
        span: Span {
            start: input.len(),
            end: input.len(),
        },
        newline_before,
    });

    Ok(out)
}

/// Lex a quoted string starting at `start`. Returns the decoded text and the offset after
/// the closing quote.
fn lex_string(input: &str, start: usize) -> Result<(String, usize), ScriptError> {
    let quote = input.as_bytes()[start] as char;
    let mut out = String::new();
    let mut chars = input[start + 1..].char_indices();

    while let Some((off, ch)) = chars.next() {
        let at = start + 1 + off;
        match ch {
            c if c == quote => return Ok((out, at + 1)),
            '\n' => return Err(ScriptError::new(start, "unterminated string literal")),
            '\\' => {
                let Some((_, esc)) = chars.next() else {
                    break;
                };
                match esc {
                    'n' => out.push('\n'),
                    't' => out.push('\t'),
                    'r' => out.push('\r'),
                    '0' => out.push('\0'),
                    'u' => {
                        let mut code = 0u32;
                        for _ in 0..4 {
                            let digit = chars
                                .next()
                                .and_then(|(_, d)| d.to_digit(16))
                                .ok_or_else(|| ScriptError::new(at, "invalid \\u escape"))?;
                            code = code * 16 + digit;
                        }
                        out.push(char::from_u32(code).unwrap_or('\u{fffd}'));
                    }
                    '\n' => {}
                    other => out.push(other),
                }
            }
            c => out.push(c),
        }
    }

    Err(ScriptError::new(start, "unterminated string literal"))
}

#[cfg(test)]
#[path = "../../tests/unit/script/lexer.rs"]
mod tests;

//! Color normalization.
//!
//! Scripts hand colors around as strings. Numeric forms are normalized into one canonical CSS
//! representation:
//!
//! - 1 channel (gray) -> `rgb(g,g,g)`
//! - 2 channels (gray, alpha) -> `rgba(g,g,g,a)`
//! - 3 channels -> `rgb(r,g,b)`
//! - 4 channels -> `rgba(r,g,b,a)`
//!
//! Channels are on `0..=255` (alpha included) and are clamped and rounded. The CSS alpha is
//! written as `alpha / 255` with at most three decimals.

use crate::svg::fmt_num;

/// Straight-alpha color with channels on `0..=255`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        fn ch(v: f64) -> f64 {
            if v.is_nan() {
                return 0.0;
            }
            // `+ 0.0` folds negative zero.
            v.clamp(0.0, 255.0).round() + 0.0
        }
        Self {
            r: ch(r),
            g: ch(g),
            b: ch(b),
            a: ch(a),
        }
    }

    /// Build from 1–4 numeric channels. `None` for any other count.
    pub fn from_channels(ch: &[f64]) -> Option<Self> {
        match *ch {
            [g] => Some(Self::new(g, g, g, 255.0)),
            [g, a] => Some(Self::new(g, g, g, a)),
            [r, g, b] => Some(Self::new(r, g, b, 255.0)),
            [r, g, b, a] => Some(Self::new(r, g, b, a)),
            _ => None,
        }
    }

    /// Canonical CSS string.
    pub fn to_css(self) -> String {
        if self.a >= 255.0 {
            format!("rgb({},{},{})", self.r, self.g, self.b)
        } else {
            format!(
                "rgba({},{},{},{})",
                self.r,
                self.g,
                self.b,
                fmt_num(self.a / 255.0)
            )
        }
    }

    /// Parse a hex (`#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`) or `rgb()`/`rgba()` string.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex);
        }
        parse_functional(s)
    }

    pub fn lerp(self, other: Self, t: f64) -> Self {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let mix = |a: f64, b: f64| a + (b - a) * t;
        Self::new(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
            mix(self.a, other.a),
        )
    }
}

/// Interpolate two color strings. `None` when either side is not parseable (e.g. a named
/// CSS color).
pub fn lerp_color(a: &str, b: &str, t: f64) -> Option<String> {
    let a = Rgba::parse(a)?;
    let b = Rgba::parse(b)?;
    Some(a.lerp(b, t).to_css())
}

fn parse_hex(s: &str) -> Option<Rgba> {
    fn nibble(c: u8) -> Option<f64> {
        (c as char).to_digit(16).map(|d| f64::from(d * 17))
    }
    fn byte(pair: &str) -> Option<f64> {
        u8::from_str_radix(pair, 16).ok().map(f64::from)
    }

    if !s.is_ascii() {
        return None;
    }
    let b = s.as_bytes();
    match s.len() {
        3 => Some(Rgba::new(nibble(b[0])?, nibble(b[1])?, nibble(b[2])?, 255.0)),
        4 => Some(Rgba::new(
            nibble(b[0])?,
            nibble(b[1])?,
            nibble(b[2])?,
            nibble(b[3])?,
        )),
        6 => Some(Rgba::new(byte(&s[0..2])?, byte(&s[2..4])?, byte(&s[4..6])?, 255.0)),
        8 => Some(Rgba::new(
            byte(&s[0..2])?,
            byte(&s[2..4])?,
            byte(&s[4..6])?,
            byte(&s[6..8])?,
        )),
        _ => None,
    }
}

fn parse_functional(s: &str) -> Option<Rgba> {
    let lower = s.to_ascii_lowercase();
    let (has_alpha, body) = if let Some(rest) = lower.strip_prefix("rgba(") {
        (true, rest)
    } else if let Some(rest) = lower.strip_prefix("rgb(") {
        (false, rest)
    } else {
        return None;
    };
    let body = body.strip_suffix(')')?;
    let parts: Vec<f64> = body
        .split(',')
        .map(|p| p.trim().parse::<f64>().ok())
        .collect::<Option<_>>()?;

    match (has_alpha, parts.as_slice()) {
        (false, [r, g, b]) => Some(Rgba::new(*r, *g, *b, 255.0)),
        (true, [r, g, b, a]) => Some(Rgba::new(*r, *g, *b, a * 255.0)),
        _ => None,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/draw/color.rs"]
mod tests;

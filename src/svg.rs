//! Vector compiler: element list + canvas -> one SVG document.
//!
//! Elements are written in emission order, so later elements paint over earlier ones.

use std::fmt::Write as _;

use crate::draw::element::{DrawingElement, Shape, Style};
use crate::foundation::core::{Affine, Canvas, Point};

/// A compiled sketch, ready for rasterization.
#[derive(Clone, Debug, PartialEq)]
pub struct VectorDocument {
    pub canvas: Canvas,
    /// SVG source.
    pub svg: String,
    pub element_count: usize,
}

/// Format a coordinate with at most three decimals and no trailing zeros.
pub fn fmt_num(v: f64) -> String {
    fmt_rounded(v, 1e3)
}

/// Matrix coefficients keep more precision: they multiply coordinates up to the canvas size.
fn fmt_coeff(v: f64) -> String {
    fmt_rounded(v, 1e6)
}

fn fmt_rounded(v: f64, scale: f64) -> String {
    // `+ 0.0` folds negative zero.
    let r = (v * scale).round() / scale + 0.0;
    if !r.is_finite() {
        return "0".to_owned();
    }
    format!("{r}")
}

/// Escape the five XML-significant characters.
pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

#[tracing::instrument(skip(elements), fields(elements = elements.len()))]
pub fn compile_document(canvas: Canvas, elements: &[DrawingElement]) -> VectorDocument {
    let (w, h) = (canvas.width, canvas.height);
    let mut svg = String::with_capacity(128 + elements.len() * 96);
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
    );
    for el in elements {
        svg.push('\n');
        write_element(&mut svg, el);
    }
    svg.push_str("\n</svg>\n");

    VectorDocument {
        canvas,
        svg,
        element_count: elements.len(),
    }
}

fn write_element(out: &mut String, el: &DrawingElement) {
    let transform = transform_attr(el.transform);
    match &el.shape {
        Shape::Rect { x, y, w, h, radius } => {
            let _ = write!(
                out,
                r#"<rect x="{}" y="{}" width="{}" height="{}""#,
                fmt_num(*x),
                fmt_num(*y),
                fmt_num(*w),
                fmt_num(*h)
            );
            if let Some(r) = radius {
                let r = fmt_num(*r);
                let _ = write!(out, r#" rx="{r}" ry="{r}""#);
            }
            write_paint(out, &el.style);
        }
        Shape::Ellipse { cx, cy, rx, ry } => {
            let _ = write!(
                out,
                r#"<ellipse cx="{}" cy="{}" rx="{}" ry="{}""#,
                fmt_num(*cx),
                fmt_num(*cy),
                fmt_num(*rx),
                fmt_num(*ry)
            );
            write_paint(out, &el.style);
        }
        Shape::Line { from, to } => {
            let _ = write!(
                out,
                r#"<line x1="{}" y1="{}" x2="{}" y2="{}""#,
                fmt_num(from.x),
                fmt_num(from.y),
                fmt_num(to.x),
                fmt_num(to.y)
            );
            write_paint(out, &el.style);
        }
        Shape::Polygon { points } => {
            let _ = write!(out, r#"<polygon points="{}""#, points_attr(points));
            write_paint(out, &el.style);
        }
        Shape::Polyline { points } => {
            let _ = write!(out, r#"<polyline points="{}""#, points_attr(points));
            write_paint(out, &el.style);
        }
        Shape::Point { at } => {
            // Painted with the stroke color; invisible under noStroke.
            let fill = el
                .style
                .stroke
                .as_deref()
                .map_or_else(|| "none".to_owned(), escape_xml);
            let _ = write!(
                out,
                r#"<circle cx="{}" cy="{}" r="{}" fill="{fill}""#,
                fmt_num(at.x),
                fmt_num(at.y),
                fmt_num(el.style.stroke_width / 2.0)
            );
        }
        Shape::Path { d } => {
            let _ = write!(out, r#"<path d="{}""#, escape_xml(d));
            write_paint(out, &el.style);
        }
        Shape::Text { at, content, style } => {
            let _ = write!(
                out,
                r#"<text x="{}" y="{}" font-size="{}" font-family="{}" text-anchor="{}" dominant-baseline="{}""#,
                fmt_num(at.x),
                fmt_num(at.y),
                fmt_num(style.size),
                escape_xml(&style.font_family),
                style.h_align.as_svg(),
                style.v_align.as_svg()
            );
            write_paint(out, &el.style);
            if let Some(t) = &transform {
                let _ = write!(out, r#" transform="{t}""#);
            }
            let _ = write!(out, ">{}</text>", escape_xml(content));
            return;
        }
    }
    if let Some(t) = &transform {
        let _ = write!(out, r#" transform="{t}""#);
    }
    out.push_str("/>");
}

fn write_paint(out: &mut String, style: &Style) {
    match &style.fill {
        Some(f) => {
            let _ = write!(out, r#" fill="{}""#, escape_xml(f));
        }
        None => out.push_str(r#" fill="none""#),
    }
    match &style.stroke {
        Some(s) => {
            let _ = write!(
                out,
                r#" stroke="{}" stroke-width="{}" stroke-linecap="{}" stroke-linejoin="{}""#,
                escape_xml(s),
                fmt_num(style.stroke_width),
                style.stroke_cap.as_svg(),
                style.stroke_join.as_svg()
            );
        }
        None => out.push_str(r#" stroke="none""#),
    }
}

fn points_attr(points: &[Point]) -> String {
    let mut s = String::with_capacity(points.len() * 12);
    for (i, p) in points.iter().enumerate() {
        if i > 0 {
            s.push(' ');
        }
        let _ = write!(s, "{},{}", fmt_num(p.x), fmt_num(p.y));
    }
    s
}

fn transform_attr(t: Affine) -> Option<String> {
    if t == Affine::IDENTITY {
        return None;
    }
    let c = t.as_coeffs();
    Some(format!(
        "matrix({} {} {} {} {} {})",
        fmt_coeff(c[0]),
        fmt_coeff(c[1]),
        fmt_coeff(c[2]),
        fmt_coeff(c[3]),
        fmt_num(c[4]),
        fmt_num(c[5])
    ))
}

#[cfg(test)]
#[path = "../tests/unit/svg.rs"]
mod tests;

use super::*;
use crate::draw::{ArcMode, DrawingContext, HAlign, VAlign};

fn compile(build: impl FnOnce(&mut DrawingContext)) -> VectorDocument {
    let mut ctx = DrawingContext::new(Canvas::clamped(120, 80), 10_000);
    build(&mut ctx);
    let (canvas, elements) = ctx.into_parts();
    compile_document(canvas, &elements)
}

#[test]
fn empty_document_is_well_formed() {
    let doc = compile(|_| {});
    assert_eq!(doc.element_count, 0);
    assert!(doc.svg.starts_with(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="120" height="80" viewBox="0 0 120 80">"#
    ));
    assert!(doc.svg.trim_end().ends_with("</svg>"));
    usvg::Tree::from_str(&doc.svg, &usvg::Options::default()).unwrap();
}

#[test]
fn document_uses_final_canvas_size() {
    let doc = compile(|c| {
        c.rect(0.0, 0.0, 1.0, 1.0, None).unwrap();
        c.create_canvas(300.0, 0.0);
    });
    assert_eq!(doc.canvas, Canvas::clamped(300, 1));
    assert!(doc.svg.contains(r#"width="300" height="1" viewBox="0 0 300 1""#));
}

#[test]
fn rect_default_style() {
    let doc = compile(|c| c.rect(10.0, 10.0, 20.0, 20.0, None).unwrap());
    assert!(doc.svg.contains(
        r#"<rect x="10" y="10" width="20" height="20" fill="rgb(255,255,255)" stroke="rgb(0,0,0)" stroke-width="1" stroke-linecap="round" stroke-linejoin="miter"/>"#
    ), "{}", doc.svg);
}

#[test]
fn elements_keep_emission_order() {
    let doc = compile(|c| {
        c.ellipse(1.0, 1.0, 2.0, 2.0).unwrap();
        c.line(0.0, 0.0, 5.0, 5.0).unwrap();
        c.rect(0.0, 0.0, 1.0, 1.0, Some(0.5)).unwrap();
    });
    let e = doc.svg.find("<ellipse").unwrap();
    let l = doc.svg.find("<line").unwrap();
    let r = doc.svg.find("<rect").unwrap();
    assert!(e < l && l < r);
    assert!(doc.svg.contains(r#"rx="0.5" ry="0.5""#));
}

#[test]
fn transform_written_only_when_not_identity() {
    let doc = compile(|c| {
        c.point(1.0, 1.0).unwrap();
        c.translate(10.0, 5.0).unwrap();
        c.scale(2.0, 2.0).unwrap();
        c.point(1.0, 1.0).unwrap();
    });
    assert_eq!(doc.svg.matches("transform=").count(), 1);
    assert!(doc.svg.contains(r#"transform="matrix(2 0 0 2 10 5)""#), "{}", doc.svg);
}

#[test]
fn point_uses_stroke_color_and_weight() {
    let doc = compile(|c| {
        c.stroke("#123456".to_owned());
        c.stroke_weight(6.0).unwrap();
        c.point(3.0, 4.0).unwrap();
    });
    assert!(doc.svg.contains(r##"<circle cx="3" cy="4" r="3" fill="#123456"/>"##));
}

#[test]
fn no_fill_no_stroke_emit_none() {
    let doc = compile(|c| {
        c.no_fill();
        c.no_stroke();
        c.triangle([Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(0.0, 1.0)])
            .unwrap();
    });
    assert!(doc.svg.contains(r#"<polygon points="0,0 1,0 0,1" fill="none" stroke="none"/>"#));
}

#[test]
fn text_is_escaped() {
    let doc = compile(|c| {
        c.text_align(HAlign::Center, Some(VAlign::Center));
        c.text(r#"<b>"Tom" & 'Jerry'</b>"#.to_owned(), 10.0, 20.0)
            .unwrap();
    });
    assert!(doc.svg.contains(
        ">&lt;b&gt;&quot;Tom&quot; &amp; &apos;Jerry&apos;&lt;/b&gt;</text>"
    ));
    assert!(doc.svg.contains(r#"text-anchor="middle" dominant-baseline="central""#));
    usvg::Tree::from_str(&doc.svg, &usvg::Options::default()).unwrap();
}

#[test]
fn hostile_color_strings_cannot_break_attributes() {
    let doc = compile(|c| {
        c.fill(r#"red" onload="x"#.to_owned());
        c.rect(0.0, 0.0, 1.0, 1.0, None).unwrap();
    });
    assert!(doc.svg.contains(r#"fill="red&quot; onload=&quot;x""#));
}

#[test]
fn arc_paths_are_embedded() {
    let doc = compile(|c| {
        c.arc(50.0, 50.0, 40.0, 40.0, 0.0, std::f64::consts::PI, ArcMode::Pie)
            .unwrap();
    });
    assert!(doc.svg.contains(r#"<path d="M 70 50 A 20 20 0 0 1 30 50 L 50 50 Z""#));
}

#[test]
fn fmt_num_rounds_and_trims() {
    assert_eq!(fmt_num(10.0), "10");
    assert_eq!(fmt_num(0.1 + 0.2), "0.3");
    assert_eq!(fmt_num(-0.0001), "0");
    assert_eq!(fmt_num(2.0 / 3.0), "0.667");
    assert_eq!(fmt_num(f64::NAN), "0");
}

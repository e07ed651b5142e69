use super::*;
use crate::foundation::core::Canvas;

fn doc(width: u32, height: u32, body: &str) -> VectorDocument {
    VectorDocument {
        canvas: Canvas::clamped(width, height),
        svg: format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">{body}</svg>"#
        ),
        element_count: 1,
    }
}

#[test]
fn png_has_declared_size_and_paints_shapes() {
    let png = rasterize(&doc(
        8,
        4,
        r#"<rect x="0" y="0" width="4" height="4" fill="rgb(255,0,0)"/>"#,
    ))
    .unwrap();
    let img = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (8, 4));
    assert_eq!(img.get_pixel(1, 1).0, [255, 0, 0, 255]);
    // Unpainted area stays transparent.
    assert_eq!(img.get_pixel(6, 1).0[3], 0);
}

#[test]
fn translucent_fill_is_demultiplied() {
    let png = rasterize(&doc(
        2,
        2,
        r#"<rect width="2" height="2" fill="rgba(0,0,255,0.502)"/>"#,
    ))
    .unwrap();
    let img = image::load_from_memory(&png).unwrap().to_rgba8();
    let [r, g, b, a] = img.get_pixel(0, 0).0;
    assert_eq!((r, g), (0, 0));
    assert!(b >= 250, "blue channel {b}");
    assert!((127..=129).contains(&a), "alpha {a}");
}

#[test]
fn output_is_deterministic() {
    let d = doc(
        16,
        16,
        r#"<ellipse cx="8" cy="8" rx="5" ry="3" fill="rgb(10,20,30)" stroke="rgb(0,0,0)"/>"#,
    );
    assert_eq!(rasterize(&d).unwrap(), rasterize(&d).unwrap());
}

#[test]
fn malformed_document_is_a_rasterization_error() {
    let bad = VectorDocument {
        canvas: Canvas::clamped(4, 4),
        svg: "<svg".to_owned(),
        element_count: 0,
    };
    let err = rasterize(&bad).unwrap_err();
    assert!(matches!(err, SketchError::Rasterization(_)));
    assert!(err.to_string().starts_with("rasterization error: parse svg"));
}

//! Rasterizer: SVG document -> PNG bytes.

use std::sync::{Arc, OnceLock};

use image::ImageEncoder as _;

use crate::foundation::error::{SketchError, SketchResult};
use crate::svg::VectorDocument;

/// System fonts, loaded on first use and shared read-only by every render afterwards.
fn shared_fontdb() -> Arc<usvg::fontdb::Database> {
    static FONTS: OnceLock<Arc<usvg::fontdb::Database>> = OnceLock::new();
    FONTS
        .get_or_init(|| {
            let mut db = usvg::fontdb::Database::new();
            db.load_system_fonts();
            tracing::debug!(faces = db.len(), "loaded system fonts");
            Arc::new(db)
        })
        .clone()
}

/// Map the requested families onto the database, falling back to the generic families and
/// finally to any face at all, so text never silently disappears when one font is missing.
fn font_resolver() -> usvg::FontResolver<'static> {
    use usvg::fontdb::{Family, Query, Stretch, Style, Weight};

    usvg::FontResolver {
        select_font: Box::new(|font, fontdb| {
            let mut families: Vec<Family<'_>> = font
                .families()
                .iter()
                .map(|family| match family {
                    usvg::FontFamily::Serif => Family::Serif,
                    usvg::FontFamily::SansSerif => Family::SansSerif,
                    usvg::FontFamily::Cursive => Family::Cursive,
                    usvg::FontFamily::Fantasy => Family::Fantasy,
                    usvg::FontFamily::Monospace => Family::Monospace,
                    usvg::FontFamily::Named(s) => Family::Name(s),
                })
                .collect();
            families.extend([Family::SansSerif, Family::Serif, Family::Monospace]);

            let style = match font.style() {
                usvg::FontStyle::Normal => Style::Normal,
                usvg::FontStyle::Italic => Style::Italic,
                usvg::FontStyle::Oblique => Style::Oblique,
            };
            let query = Query {
                families: &families,
                weight: Weight(font.weight()),
                stretch: Stretch::Normal,
                style,
            };
            fontdb
                .query(&query)
                .or_else(|| fontdb.faces().next().map(|f| f.id))
        }),
        select_fallback: usvg::FontResolver::default_fallback_selector(),
    }
}

/// Render a compiled document at its declared pixel size onto a transparent canvas and
/// encode it as PNG.
#[tracing::instrument(skip(doc), fields(width = doc.canvas.width, height = doc.canvas.height))]
pub fn rasterize(doc: &VectorDocument) -> SketchResult<Vec<u8>> {
    let opts = usvg::Options {
        fontdb: shared_fontdb(),
        font_resolver: font_resolver(),
        ..Default::default()
    };
    let tree = usvg::Tree::from_str(&doc.svg, &opts)
        .map_err(|e| SketchError::rasterization(format!("parse svg: {e}")))?;

    let (width, height) = (doc.canvas.width, doc.canvas.height);
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
        SketchError::rasterization(format!("failed to allocate {width}x{height} pixmap"))
    })?;
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::identity(),
        &mut pixmap.as_mut(),
    );

    let rgba = demultiply(&pixmap);
    let mut png = Vec::new();
    image::codecs::png::PngEncoder::new(&mut png)
        .write_image(&rgba, width, height, image::ExtendedColorType::Rgba8)
        .map_err(|e| SketchError::rasterization(format!("encode png: {e}")))?;

    tracing::debug!(bytes = png.len(), "rasterized");
    Ok(png)
}

/// tiny-skia stores premultiplied alpha; PNG wants straight alpha.
fn demultiply(pixmap: &resvg::tiny_skia::Pixmap) -> Vec<u8> {
    let mut out = Vec::with_capacity(pixmap.data().len());
    for px in pixmap.pixels() {
        let c = px.demultiply();
        out.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    out
}

#[cfg(test)]
#[path = "../tests/unit/raster.rs"]
mod tests;

use std::f64::consts::{PI, TAU};

use crate::draw::element::{DrawingElement, Shape, Style, TextStyle};
use crate::draw::state::{
    ArcMode, HAlign, RectMode, ShapeClose, StrokeCap, StrokeJoin, TransformState, VAlign,
};
use crate::foundation::core::{Affine, Canvas, Point};
use crate::svg::fmt_num;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DrawError {
    #[error("element limit of {limit} exceeded")]
    ElementLimit { limit: usize },

    #[error("{primitive}: arguments must be finite numbers")]
    NonFinite { primitive: &'static str },
}

pub type DrawResult<T = ()> = Result<T, DrawError>;

fn finite(primitive: &'static str, values: &[f64]) -> DrawResult {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(DrawError::NonFinite { primitive })
    }
}

/// The stateful drawing API a sketch talks to.
///
/// Owns the current [`TransformState`], the push/pop stack, the in-progress vertex list and
/// the append-only element list. One instance per render.
#[derive(Debug)]
pub struct DrawingContext {
    canvas: Canvas,
    state: TransformState,
    stack: Vec<TransformState>,
    elements: Vec<DrawingElement>,
    shape: Option<Vec<Point>>,
    max_elements: usize,
}

impl DrawingContext {
    pub fn new(canvas: Canvas, max_elements: usize) -> Self {
        Self {
            canvas,
            state: TransformState::default(),
            stack: Vec::new(),
            elements: Vec::new(),
            shape: None,
            max_elements,
        }
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn state(&self) -> &TransformState {
        &self.state
    }

    pub fn elements(&self) -> &[DrawingElement] {
        &self.elements
    }

    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    pub fn into_parts(self) -> (Canvas, Vec<DrawingElement>) {
        (self.canvas, self.elements)
    }

    fn emit(&mut self, shape: Shape, style: Style, transform: Affine) -> DrawResult {
        if self.elements.len() >= self.max_elements {
            return Err(DrawError::ElementLimit {
                limit: self.max_elements,
            });
        }
        self.elements.push(DrawingElement {
            shape,
            style,
            transform,
        });
        Ok(())
    }

    fn emit_styled(&mut self, shape: Shape) -> DrawResult {
        let style = Style::from_state(&self.state);
        let transform = self.state.affine();
        self.emit(shape, style, transform)
    }

    // ---- canvas ---------------------------------------------------------------------------

    pub fn create_canvas(&mut self, width: f64, height: f64) {
        self.canvas = Canvas::from_script(width, height);
    }

    /// Append a full-canvas filled rectangle. Earlier elements are kept, so translucent
    /// backgrounds layer.
    pub fn background(&mut self, color: String) -> DrawResult {
        let shape = Shape::Rect {
            x: 0.0,
            y: 0.0,
            w: f64::from(self.canvas.width),
            h: f64::from(self.canvas.height),
            radius: None,
        };
        self.emit(shape, Style::solid(color), Affine::IDENTITY)
    }

    // ---- style ----------------------------------------------------------------------------

    pub fn fill(&mut self, color: String) {
        self.state.fill = color;
        self.state.fill_enabled = true;
    }

    pub fn no_fill(&mut self) {
        self.state.fill_enabled = false;
    }

    pub fn stroke(&mut self, color: String) {
        self.state.stroke = color;
        self.state.stroke_enabled = true;
    }

    pub fn no_stroke(&mut self) {
        self.state.stroke_enabled = false;
    }

    pub fn stroke_weight(&mut self, w: f64) -> DrawResult {
        finite("strokeWeight", &[w])?;
        self.state.stroke_width = w.max(0.0);
        Ok(())
    }

    pub fn stroke_cap(&mut self, cap: StrokeCap) {
        self.state.stroke_cap = cap;
    }

    pub fn stroke_join(&mut self, join: StrokeJoin) {
        self.state.stroke_join = join;
    }

    pub fn rect_mode(&mut self, mode: RectMode) {
        self.state.rect_mode = mode;
    }

    // ---- transform ------------------------------------------------------------------------

    pub fn translate(&mut self, dx: f64, dy: f64) -> DrawResult {
        finite("translate", &[dx, dy])?;
        self.state.translate_x += dx;
        self.state.translate_y += dy;
        Ok(())
    }

    pub fn rotate(&mut self, radians: f64) -> DrawResult {
        finite("rotate", &[radians])?;
        self.state.rotation += radians;
        Ok(())
    }

    pub fn scale(&mut self, sx: f64, sy: f64) -> DrawResult {
        finite("scale", &[sx, sy])?;
        self.state.scale_x *= sx;
        self.state.scale_y *= sy;
        Ok(())
    }

    pub fn push(&mut self) {
        self.stack.push(self.state.clone());
    }

    /// Restore the last pushed state. No-op on an empty stack.
    pub fn pop(&mut self) {
        if let Some(st) = self.stack.pop() {
            self.state = st;
        }
    }

    // ---- shapes ---------------------------------------------------------------------------

    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, radius: Option<f64>) -> DrawResult {
        finite("rect", &[x, y, w, h, radius.unwrap_or(0.0)])?;
        let (mut x, mut y) = match self.state.rect_mode {
            RectMode::Corner => (x, y),
            RectMode::Center => (x - w / 2.0, y - h / 2.0),
        };
        if w < 0.0 {
            x += w;
        }
        if h < 0.0 {
            y += h;
        }
        self.emit_styled(Shape::Rect {
            x,
            y,
            w: w.abs(),
            h: h.abs(),
            radius: radius.map(f64::abs).filter(|r| *r > 0.0),
        })
    }

    /// `w`/`h` are diameters.
    pub fn ellipse(&mut self, x: f64, y: f64, w: f64, h: f64) -> DrawResult {
        finite("ellipse", &[x, y, w, h])?;
        self.emit_styled(Shape::Ellipse {
            cx: x,
            cy: y,
            rx: w.abs() / 2.0,
            ry: h.abs() / 2.0,
        })
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> DrawResult {
        finite("line", &[x1, y1, x2, y2])?;
        self.emit_styled(Shape::Line {
            from: Point::new(x1, y1),
            to: Point::new(x2, y2),
        })
    }

    pub fn triangle(&mut self, pts: [Point; 3]) -> DrawResult {
        finite("triangle", &flatten(&pts))?;
        self.emit_styled(Shape::Polygon {
            points: pts.to_vec(),
        })
    }

    pub fn quad(&mut self, pts: [Point; 4]) -> DrawResult {
        finite("quad", &flatten(&pts))?;
        self.emit_styled(Shape::Polygon {
            points: pts.to_vec(),
        })
    }

    pub fn point(&mut self, x: f64, y: f64) -> DrawResult {
        finite("point", &[x, y])?;
        self.emit_styled(Shape::Point {
            at: Point::new(x, y),
        })
    }

    /// Elliptical arc centered on `(x, y)` with diameters `w`/`h`, swept clockwise (in screen
    /// space) from `start` to `stop` radians.
    #[allow(clippy::too_many_arguments)]
    pub fn arc(
        &mut self,
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        start: f64,
        stop: f64,
        mode: ArcMode,
    ) -> DrawResult {
        finite("arc", &[x, y, w, h, start, stop])?;
        let Some(d) = arc_path(x, y, w.abs() / 2.0, h.abs() / 2.0, start, stop, mode) else {
            return Ok(());
        };
        self.emit_styled(Shape::Path { d })
    }

    pub fn begin_shape(&mut self) {
        self.shape = Some(Vec::new());
    }

    /// Ignored outside `beginShape`/`endShape`.
    pub fn vertex(&mut self, x: f64, y: f64) -> DrawResult {
        finite("vertex", &[x, y])?;
        if let Some(v) = self.shape.as_mut() {
            v.push(Point::new(x, y));
        }
        Ok(())
    }

    /// Finalize the vertex list. Fewer than two vertices emit nothing. The list is cleared
    /// either way.
    pub fn end_shape(&mut self, close: ShapeClose) -> DrawResult {
        let Some(points) = self.shape.take() else {
            return Ok(());
        };
        if points.len() < 2 {
            return Ok(());
        }
        let shape = match close {
            ShapeClose::Close => Shape::Polygon { points },
            ShapeClose::Open => Shape::Polyline { points },
        };
        self.emit_styled(shape)
    }

    pub fn pending_vertices(&self) -> usize {
        self.shape.as_ref().map_or(0, Vec::len)
    }

    // ---- text -----------------------------------------------------------------------------

    pub fn text_size(&mut self, size: f64) -> DrawResult {
        finite("textSize", &[size])?;
        self.state.text_size = size.max(0.0);
        Ok(())
    }

    pub fn text_align(&mut self, h: HAlign, v: Option<VAlign>) {
        self.state.h_align = h;
        if let Some(v) = v {
            self.state.v_align = v;
        }
    }

    pub fn text_font(&mut self, family: String) {
        self.state.font_family = family;
    }

    pub fn text(&mut self, content: String, x: f64, y: f64) -> DrawResult {
        finite("text", &[x, y])?;
        let style = TextStyle {
            size: self.state.text_size,
            h_align: self.state.h_align,
            v_align: self.state.v_align,
            font_family: self.state.font_family.clone(),
        };
        self.emit_styled(Shape::Text {
            at: Point::new(x, y),
            content,
            style,
        })
    }
}

fn flatten(pts: &[Point]) -> Vec<f64> {
    pts.iter().flat_map(|p| [p.x, p.y]).collect()
}

/// SVG path data for an arc, or `None` for an empty sweep.
fn arc_path(
    cx: f64,
    cy: f64,
    rx: f64,
    ry: f64,
    start: f64,
    stop: f64,
    mode: ArcMode,
) -> Option<String> {
    let mut sweep = stop - start;
    if sweep < 0.0 {
        sweep = sweep.rem_euclid(TAU);
    }
    if sweep == 0.0 {
        return None;
    }

    let at = |theta: f64| (cx + rx * theta.cos(), cy + ry * theta.sin());
    let (sx, sy) = at(start);
    let mut d = format!("M {} {}", fmt_num(sx), fmt_num(sy));

    let mut arc_to = |large: bool, (ex, ey): (f64, f64)| {
        d.push_str(&format!(
            " A {} {} 0 {} 1 {} {}",
            fmt_num(rx),
            fmt_num(ry),
            u8::from(large),
            fmt_num(ex),
            fmt_num(ey)
        ));
    };

    if sweep >= TAU {
        // A single SVG arc cannot end where it starts.
        arc_to(false, at(start + PI));
        arc_to(false, at(start));
    } else {
        arc_to(sweep > PI, at(start + sweep));
    }

    match mode {
        ArcMode::Open => {}
        ArcMode::Chord => d.push_str(" Z"),
        ArcMode::Pie => d.push_str(&format!(" L {} {} Z", fmt_num(cx), fmt_num(cy))),
    }
    Some(d)
}

#[cfg(test)]
#[path = "../../tests/unit/draw/context.rs"]
mod tests;

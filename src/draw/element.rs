use crate::draw::state::{HAlign, StrokeCap, StrokeJoin, TransformState, VAlign};
use crate::foundation::core::{Affine, Point};

/// Resolved paint for one element.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Style {
    /// `None` means no fill.
    pub fill: Option<String>,
    /// `None` means no stroke.
    pub stroke: Option<String>,
    pub stroke_width: f64,
    pub stroke_cap: StrokeCap,
    pub stroke_join: StrokeJoin,
}

impl Style {
    pub(crate) fn from_state(st: &TransformState) -> Self {
        Self {
            fill: st.fill_enabled.then(|| st.fill.clone()),
            stroke: st.stroke_enabled.then(|| st.stroke.clone()),
            stroke_width: st.stroke_width,
            stroke_cap: st.stroke_cap,
            stroke_join: st.stroke_join,
        }
    }

    /// Fill only, no stroke.
    pub(crate) fn solid(fill: String) -> Self {
        Self {
            fill: Some(fill),
            stroke: None,
            stroke_width: 0.0,
            stroke_cap: StrokeCap::default(),
            stroke_join: StrokeJoin::default(),
        }
    }
}

/// Text layout attributes captured at emission.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TextStyle {
    pub size: f64,
    pub h_align: HAlign,
    pub v_align: VAlign,
    pub font_family: String,
}

/// Shape geometry, in user space (before the element transform).
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    Rect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        radius: Option<f64>,
    },
    Ellipse {
        cx: f64,
        cy: f64,
        rx: f64,
        ry: f64,
    },
    Line {
        from: Point,
        to: Point,
    },
    /// Closed outline (triangle, quad, `endShape(CLOSE)`).
    Polygon { points: Vec<Point> },
    /// Open outline (`endShape()`).
    Polyline { points: Vec<Point> },
    /// A dot of diameter `stroke_width`, painted with the stroke color.
    Point { at: Point },
    /// Prebuilt SVG path data (arcs).
    Path { d: String },
    Text {
        at: Point,
        content: String,
        style: TextStyle,
    },
}

impl Shape {
    /// Short tag used in logs and diagnostics.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Rect { .. } => "rect",
            Self::Ellipse { .. } => "ellipse",
            Self::Line { .. } => "line",
            Self::Polygon { .. } => "polygon",
            Self::Polyline { .. } => "polyline",
            Self::Point { .. } => "point",
            Self::Path { .. } => "path",
            Self::Text { .. } => "text",
        }
    }
}

/// One emitted drawing call. Immutable once pushed onto the element list.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct DrawingElement {
    pub shape: Shape,
    pub style: Style,
    pub transform: Affine,
}

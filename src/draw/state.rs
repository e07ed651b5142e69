use crate::foundation::core::Affine;

/// Anchor interpretation for `rect`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RectMode {
    #[default]
    Corner,
    Center,
}

impl RectMode {
    pub fn from_symbol(s: &str) -> Self {
        match s.trim().to_ascii_uppercase().as_str() {
            "CENTER" => Self::Center,
            _ => Self::Corner,
        }
    }
}

/// SVG `stroke-linecap`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeCap {
    #[default]
    Round,
    Butt,
    Square,
}

impl StrokeCap {
    /// `SQUARE` means flat ends (SVG `butt`); `PROJECT` extends past the endpoint (SVG
    /// `square`).
    pub fn from_symbol(s: &str) -> Self {
        match s.trim().to_ascii_uppercase().as_str() {
            "SQUARE" | "BUTT" => Self::Butt,
            "PROJECT" => Self::Square,
            _ => Self::Round,
        }
    }

    pub fn as_svg(self) -> &'static str {
        match self {
            Self::Round => "round",
            Self::Butt => "butt",
            Self::Square => "square",
        }
    }
}

/// SVG `stroke-linejoin`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeJoin {
    #[default]
    Miter,
    Bevel,
    Round,
}

impl StrokeJoin {
    pub fn from_symbol(s: &str) -> Self {
        match s.trim().to_ascii_uppercase().as_str() {
            "BEVEL" => Self::Bevel,
            "ROUND" => Self::Round,
            _ => Self::Miter,
        }
    }

    pub fn as_svg(self) -> &'static str {
        match self {
            Self::Miter => "miter",
            Self::Bevel => "bevel",
            Self::Round => "round",
        }
    }
}

/// Horizontal text anchor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub enum HAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl HAlign {
    pub fn from_symbol(s: &str) -> Self {
        match s.trim().to_ascii_uppercase().as_str() {
            "CENTER" => Self::Center,
            "RIGHT" => Self::Right,
            _ => Self::Left,
        }
    }

    /// SVG `text-anchor`.
    pub fn as_svg(self) -> &'static str {
        match self {
            Self::Left => "start",
            Self::Center => "middle",
            Self::Right => "end",
        }
    }
}

/// Vertical text anchor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub enum VAlign {
    Top,
    Center,
    Bottom,
    #[default]
    Baseline,
}

impl VAlign {
    pub fn from_symbol(s: &str) -> Self {
        match s.trim().to_ascii_uppercase().as_str() {
            "TOP" => Self::Top,
            "CENTER" => Self::Center,
            "BOTTOM" => Self::Bottom,
            _ => Self::Baseline,
        }
    }

    /// SVG `dominant-baseline`.
    pub fn as_svg(self) -> &'static str {
        match self {
            Self::Top => "hanging",
            Self::Center => "central",
            Self::Bottom => "text-after-edge",
            Self::Baseline => "alphabetic",
        }
    }
}

/// How `arc` closes its outline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ArcMode {
    #[default]
    Open,
    Chord,
    Pie,
}

impl ArcMode {
    pub fn from_symbol(s: &str) -> Self {
        match s.trim().to_ascii_uppercase().as_str() {
            "CHORD" => Self::Chord,
            "PIE" => Self::Pie,
            _ => Self::Open,
        }
    }
}

/// How `endShape` finishes the vertex list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ShapeClose {
    #[default]
    Open,
    Close,
}

impl ShapeClose {
    pub fn from_symbol(s: &str) -> Self {
        match s.trim().to_ascii_uppercase().as_str() {
            "CLOSE" => Self::Close,
            _ => Self::Open,
        }
    }
}

/// Full style + transform state, snapshotted by `push` and restored by `pop`.
#[derive(Clone, Debug, PartialEq)]
pub struct TransformState {
    pub fill: String,
    pub stroke: String,
    pub fill_enabled: bool,
    pub stroke_enabled: bool,
    pub stroke_width: f64,
    pub stroke_cap: StrokeCap,
    pub stroke_join: StrokeJoin,
    pub text_size: f64,
    pub h_align: HAlign,
    pub v_align: VAlign,
    pub font_family: String,
    pub rect_mode: RectMode,
    pub translate_x: f64,
    pub translate_y: f64,
    /// Radians.
    pub rotation: f64,
    pub scale_x: f64,
    pub scale_y: f64,
}

impl Default for TransformState {
    fn default() -> Self {
        Self {
            fill: "rgb(255,255,255)".to_owned(),
            stroke: "rgb(0,0,0)".to_owned(),
            fill_enabled: true,
            stroke_enabled: true,
            stroke_width: 1.0,
            stroke_cap: StrokeCap::default(),
            stroke_join: StrokeJoin::default(),
            text_size: 12.0,
            h_align: HAlign::default(),
            v_align: VAlign::default(),
            font_family: "sans-serif".to_owned(),
            rect_mode: RectMode::default(),
            translate_x: 0.0,
            translate_y: 0.0,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }
}

impl TransformState {
    /// Translate, then rotate, then scale, composed into one affine.
    pub fn affine(&self) -> Affine {
        Affine::translate((self.translate_x, self.translate_y))
            * Affine::rotate(self.rotation)
            * Affine::scale_non_uniform(self.scale_x, self.scale_y)
    }
}

//! The stateful drawing API sketches talk to.

pub mod color;
pub mod context;
pub mod element;
pub mod state;

pub use color::{Rgba, lerp_color};
pub use context::{DrawError, DrawResult, DrawingContext};
pub use element::{DrawingElement, Shape, Style, TextStyle};
pub use state::{
    ArcMode, HAlign, RectMode, ShapeClose, StrokeCap, StrokeJoin, TransformState, VAlign,
};

//! The fixed set of names a script can reach beyond its own bindings.

use std::f64::consts::{E, FRAC_PI_2, FRAC_PI_4, PI, TAU};
use std::rc::Rc;

use crate::draw::{
    ArcMode, HAlign, RectMode, Rgba, ShapeClose, StrokeCap, StrokeJoin, VAlign, lerp_color,
};
use crate::foundation::core::Point;
use crate::foundation::limits::{MAX_ARRAY_LEN, MAX_STRING_BYTES, MAX_STYLE_STRING_BYTES};
use crate::script::interp::{Exec, Interpreter, fail, resource};
use crate::script::value::{Obj, TooLong, Value, format_number, to_display};

/// Containers nested deeper than this cannot be serialized (this also catches cycles).
const JSON_DEPTH: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Builtin {
    // canvas
    CreateCanvas,
    Background,
    // style
    Fill,
    NoFill,
    Stroke,
    NoStroke,
    StrokeWeight,
    StrokeCap,
    StrokeJoin,
    RectMode,
    // transform
    Push,
    Pop,
    Translate,
    Rotate,
    Scale,
    // shapes
    Rect,
    Ellipse,
    Circle,
    Line,
    Triangle,
    Quad,
    Point,
    Arc,
    BeginShape,
    Vertex,
    EndShape,
    // text
    Text,
    TextSize,
    TextAlign,
    TextFont,
    // color
    Color,
    LerpColor,
    // math
    Random,
    Noise,
    Map,
    Constrain,
    Dist,
    Lerp,
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Atan2,
    Log,
    Exp,
    Min,
    Max,
    Abs,
    Floor,
    Ceil,
    Round,
    Sqrt,
    Pow,
    Sign,
    Trunc,
    Hypot,
    MathRandom,
    // realm
    Number,
    String,
    Boolean,
    Array,
    JsonStringify,
    JsonParse,
    ConsoleLog,
    ConsoleWarn,
    ConsoleError,
}

const GLOBALS: &[(&str, Builtin)] = &[
    ("createCanvas", Builtin::CreateCanvas),
    ("background", Builtin::Background),
    ("fill", Builtin::Fill),
    ("noFill", Builtin::NoFill),
    ("stroke", Builtin::Stroke),
    ("noStroke", Builtin::NoStroke),
    ("strokeWeight", Builtin::StrokeWeight),
    ("strokeCap", Builtin::StrokeCap),
    ("strokeJoin", Builtin::StrokeJoin),
    ("rectMode", Builtin::RectMode),
    ("push", Builtin::Push),
    ("pop", Builtin::Pop),
    ("translate", Builtin::Translate),
    ("rotate", Builtin::Rotate),
    ("scale", Builtin::Scale),
    ("rect", Builtin::Rect),
    ("ellipse", Builtin::Ellipse),
    ("circle", Builtin::Circle),
    ("line", Builtin::Line),
    ("triangle", Builtin::Triangle),
    ("quad", Builtin::Quad),
    ("point", Builtin::Point),
    ("arc", Builtin::Arc),
    ("beginShape", Builtin::BeginShape),
    ("vertex", Builtin::Vertex),
    ("endShape", Builtin::EndShape),
    ("text", Builtin::Text),
    ("textSize", Builtin::TextSize),
    ("textAlign", Builtin::TextAlign),
    ("textFont", Builtin::TextFont),
    ("color", Builtin::Color),
    ("lerpColor", Builtin::LerpColor),
    ("random", Builtin::Random),
    ("noise", Builtin::Noise),
    ("map", Builtin::Map),
    ("constrain", Builtin::Constrain),
    ("dist", Builtin::Dist),
    ("lerp", Builtin::Lerp),
    ("sin", Builtin::Sin),
    ("cos", Builtin::Cos),
    ("tan", Builtin::Tan),
    ("asin", Builtin::Asin),
    ("acos", Builtin::Acos),
    ("atan", Builtin::Atan),
    ("atan2", Builtin::Atan2),
    ("log", Builtin::Log),
    ("exp", Builtin::Exp),
    ("min", Builtin::Min),
    ("max", Builtin::Max),
    ("abs", Builtin::Abs),
    ("floor", Builtin::Floor),
    ("ceil", Builtin::Ceil),
    ("round", Builtin::Round),
    ("sqrt", Builtin::Sqrt),
    ("pow", Builtin::Pow),
    ("Number", Builtin::Number),
    ("String", Builtin::String),
    ("Boolean", Builtin::Boolean),
    ("Array", Builtin::Array),
];

const MATH: &[(&str, Builtin)] = &[
    ("sin", Builtin::Sin),
    ("cos", Builtin::Cos),
    ("tan", Builtin::Tan),
    ("asin", Builtin::Asin),
    ("acos", Builtin::Acos),
    ("atan", Builtin::Atan),
    ("atan2", Builtin::Atan2),
    ("log", Builtin::Log),
    ("exp", Builtin::Exp),
    ("min", Builtin::Min),
    ("max", Builtin::Max),
    ("abs", Builtin::Abs),
    ("floor", Builtin::Floor),
    ("ceil", Builtin::Ceil),
    ("round", Builtin::Round),
    ("sqrt", Builtin::Sqrt),
    ("pow", Builtin::Pow),
    ("sign", Builtin::Sign),
    ("trunc", Builtin::Trunc),
    ("hypot", Builtin::Hypot),
    ("random", Builtin::MathRandom),
];

const JSON: &[(&str, Builtin)] = &[
    ("stringify", Builtin::JsonStringify),
    ("parse", Builtin::JsonParse),
];

const CONSOLE: &[(&str, Builtin)] = &[
    ("log", Builtin::ConsoleLog),
    ("warn", Builtin::ConsoleWarn),
    ("error", Builtin::ConsoleError),
];

/// Symbolic mode constants. Each evaluates to its own name.
pub(crate) const MODE_CONSTANTS: &[&str] = &[
    "CORNER", "CENTER", "CLOSE", "OPEN", "CHORD", "PIE", "ROUND", "SQUARE", "PROJECT", "BUTT",
    "MITER", "BEVEL", "LEFT", "RIGHT", "TOP", "BOTTOM", "BASELINE",
];

fn lookup(table: &[(&str, Builtin)], name: &str) -> Option<Builtin> {
    table.iter().find(|(n, _)| *n == name).map(|(_, b)| *b)
}

impl Builtin {
    pub(crate) fn name(self) -> &'static str {
        [GLOBALS, MATH, JSON, CONSOLE]
            .iter()
            .flat_map(|t| t.iter())
            .find(|(_, b)| *b == self)
            .map_or("?", |(n, _)| *n)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Namespace {
    Math,
    Json,
    Console,
}

impl Namespace {
    pub(crate) fn name(self) -> &'static str {
        match self {
            Self::Math => "Math",
            Self::Json => "JSON",
            Self::Console => "console",
        }
    }

    pub(crate) fn member(self, name: &str) -> Option<Value> {
        let table = match self {
            Self::Math => match name {
                "PI" => return Some(Value::Num(PI)),
                "E" => return Some(Value::Num(E)),
                _ => MATH,
            },
            Self::Json => JSON,
            Self::Console => CONSOLE,
        };
        lookup(table, name).map(Value::Builtin)
    }
}

fn constant(name: &str) -> Option<Value> {
    let v = match name {
        "PI" => PI,
        "TWO_PI" | "TAU" => TAU,
        "HALF_PI" => FRAC_PI_2,
        "QUARTER_PI" => FRAC_PI_4,
        _ => {
            return MODE_CONSTANTS
                .iter()
                .find(|c| **c == name)
                .map(|c| Value::from(*c));
        }
    };
    Some(Value::Num(v))
}

/// Resolve a global builtin name: constants, functions and namespaces.
pub(crate) fn global(name: &str) -> Option<Value> {
    if let Some(v) = constant(name) {
        return Some(v);
    }
    match name {
        "Math" => return Some(Value::Namespace(Namespace::Math)),
        "JSON" => return Some(Value::Namespace(Namespace::Json)),
        "console" => return Some(Value::Namespace(Namespace::Console)),
        _ => {}
    }
    lookup(GLOBALS, name).map(Value::Builtin)
}

/// Names a script may shadow with a declaration but never assign to directly.
pub(crate) fn is_reserved(name: &str) -> bool {
    matches!(name, "width" | "height") || global(name).is_some()
}

/// Positional access to call arguments.
struct Args<'a> {
    name: &'static str,
    values: &'a [Value],
}

impl Args<'_> {
    fn need(&self, n: usize) -> Exec<()> {
        if self.values.len() < n {
            return Err(fail(format!(
                "{}() expects at least {n} argument{}, got {}",
                self.name,
                if n == 1 { "" } else { "s" },
                self.values.len()
            )));
        }
        Ok(())
    }

    /// Present and not `undefined`.
    fn opt(&self, i: usize) -> Option<&Value> {
        self.values.get(i).filter(|v| !matches!(v, Value::Undefined))
    }

    fn num(&self, i: usize) -> f64 {
        self.values.get(i).map_or(f64::NAN, Value::to_number)
    }

    fn point(&self, i: usize) -> Point {
        Point::new(self.num(i), self.num(i + 1))
    }

    /// Symbolic mode argument; non-strings fall through to the mode's default.
    fn symbol(&self, i: usize) -> Option<&str> {
        match self.values.get(i) {
            Some(Value::Str(s)) => Some(&**s),
            Some(Value::Undefined) | None => None,
            Some(_) => Some(""),
        }
    }

    fn text(&self, i: usize) -> Exec<String> {
        Ok(to_display(self.values.get(i).unwrap_or(&Value::Undefined))?)
    }

    /// A string that every later element will carry a copy of.
    fn style_string(&self, s: &str, what: &str) -> Exec<String> {
        let s = s.trim();
        if s.len() > MAX_STYLE_STRING_BYTES {
            return Err(resource(format!(
                "{}(): {what} longer than {MAX_STYLE_STRING_BYTES} bytes",
                self.name
            )));
        }
        Ok(s.to_owned())
    }

    /// Color from 1–4 numeric channels, a `[r, g, b, a]` array, or a color string.
    fn color(&self) -> Exec<String> {
        let channels: Vec<f64> = match self.values {
            [Value::Str(s), ..] => return self.style_string(s, "color string"),
            [Value::Array(a)] => a.borrow().0.iter().map(Value::to_number).collect(),
            values => values.iter().take(4).map(Value::to_number).collect(),
        };
        Rgba::from_channels(&channels)
            .map(Rgba::to_css)
            .ok_or_else(|| {
                fail(format!(
                    "{}() expects 1-4 color channels or a color string",
                    self.name
                ))
            })
    }
}

fn math1(args: &Args<'_>, f: fn(f64) -> f64) -> Exec<Value> {
    Ok(Value::Num(f(args.num(0))))
}

/// Numbers from the arguments, or from a single array argument.
fn spread_numbers(values: &[Value]) -> Vec<f64> {
    match values {
        [Value::Array(a)] => a.borrow().0.iter().map(Value::to_number).collect(),
        _ => values.iter().map(Value::to_number).collect(),
    }
}

fn js_round(x: f64) -> f64 {
    (x + 0.5).floor()
}

impl Interpreter {
    pub(crate) fn call_builtin(&mut self, b: Builtin, values: Vec<Value>) -> Exec<Value> {
        self.tick(1)?;
        let args = Args {
            name: b.name(),
            values: &values,
        };
        let ctx = &mut self.host.ctx;

        match b {
            Builtin::CreateCanvas => {
                args.need(2)?;
                ctx.create_canvas(args.num(0), args.num(1));
            }
            Builtin::Background => {
                args.need(1)?;
                ctx.background(args.color()?)?;
            }
            Builtin::Fill => {
                args.need(1)?;
                ctx.fill(args.color()?);
            }
            Builtin::NoFill => ctx.no_fill(),
            Builtin::Stroke => {
                args.need(1)?;
                ctx.stroke(args.color()?);
            }
            Builtin::NoStroke => ctx.no_stroke(),
            Builtin::StrokeWeight => {
                args.need(1)?;
                ctx.stroke_weight(args.num(0))?;
            }
            Builtin::StrokeCap => {
                args.need(1)?;
                ctx.stroke_cap(StrokeCap::from_symbol(args.symbol(0).unwrap_or("")));
            }
            Builtin::StrokeJoin => {
                args.need(1)?;
                ctx.stroke_join(StrokeJoin::from_symbol(args.symbol(0).unwrap_or("")));
            }
            Builtin::RectMode => {
                args.need(1)?;
                ctx.rect_mode(RectMode::from_symbol(args.symbol(0).unwrap_or("")));
            }
            Builtin::Push => ctx.push(),
            Builtin::Pop => ctx.pop(),
            Builtin::Translate => {
                args.need(2)?;
                ctx.translate(args.num(0), args.num(1))?;
            }
            Builtin::Rotate => {
                args.need(1)?;
                ctx.rotate(args.num(0))?;
            }
            Builtin::Scale => {
                args.need(1)?;
                let sx = args.num(0);
                let sy = args.opt(1).map_or(sx, Value::to_number);
                ctx.scale(sx, sy)?;
            }
            Builtin::Rect => {
                args.need(4)?;
                let radius = args.opt(4).map(Value::to_number);
                ctx.rect(args.num(0), args.num(1), args.num(2), args.num(3), radius)?;
            }
            Builtin::Ellipse => {
                args.need(3)?;
                let w = args.num(2);
                let h = args.opt(3).map_or(w, Value::to_number);
                ctx.ellipse(args.num(0), args.num(1), w, h)?;
            }
            Builtin::Circle => {
                args.need(3)?;
                let d = args.num(2);
                ctx.ellipse(args.num(0), args.num(1), d, d)?;
            }
            Builtin::Line => {
                args.need(4)?;
                ctx.line(args.num(0), args.num(1), args.num(2), args.num(3))?;
            }
            Builtin::Triangle => {
                args.need(6)?;
                ctx.triangle([args.point(0), args.point(2), args.point(4)])?;
            }
            Builtin::Quad => {
                args.need(8)?;
                ctx.quad([args.point(0), args.point(2), args.point(4), args.point(6)])?;
            }
            Builtin::Point => {
                args.need(2)?;
                ctx.point(args.num(0), args.num(1))?;
            }
            Builtin::Arc => {
                args.need(6)?;
                let mode = args.symbol(6).map_or(ArcMode::Open, ArcMode::from_symbol);
                ctx.arc(
                    args.num(0),
                    args.num(1),
                    args.num(2),
                    args.num(3),
                    args.num(4),
                    args.num(5),
                    mode,
                )?;
            }
            Builtin::BeginShape => ctx.begin_shape(),
            Builtin::Vertex => {
                args.need(2)?;
                ctx.vertex(args.num(0), args.num(1))?;
            }
            Builtin::EndShape => {
                let close = args.symbol(0).map_or(ShapeClose::Open, ShapeClose::from_symbol);
                ctx.end_shape(close)?;
            }
            Builtin::Text => {
                args.need(3)?;
                let content = args.text(0)?;
                self.charge(content.len())?;
                self.host.ctx.text(content, args.num(1), args.num(2))?;
            }
            Builtin::TextSize => {
                args.need(1)?;
                ctx.text_size(args.num(0))?;
            }
            Builtin::TextAlign => {
                args.need(1)?;
                let h = HAlign::from_symbol(args.symbol(0).unwrap_or(""));
                let v = args.symbol(1).map(VAlign::from_symbol);
                ctx.text_align(h, v);
            }
            Builtin::TextFont => {
                args.need(1)?;
                let family = args.style_string(&args.text(0)?, "font family")?;
                ctx.text_font(family);
            }
            Builtin::Color => {
                args.need(1)?;
                let css = args.color()?;
                return self.make_str(css);
            }
            Builtin::LerpColor => {
                args.need(3)?;
                let (a, b) = (args.text(0)?, args.text(1)?);
                let Some(css) = lerp_color(&a, &b, args.num(2)) else {
                    return Err(fail(format!(
                        "lerpColor() cannot interpolate '{a}' and '{b}' (use hex or rgb()/rgba() colors)"
                    )));
                };
                return self.make_str(css);
            }
            _ => return self.call_value_builtin(b, &args),
        }
        Ok(Value::Undefined)
    }

    /// Builtins that compute a value rather than draw.
    fn call_value_builtin(&mut self, b: Builtin, args: &Args<'_>) -> Exec<Value> {
        let n = |i| args.num(i);
        match b {
            Builtin::Random => {
                let rng = &mut self.host.rng;
                Ok(match args.values {
                    [] => Value::Num(rng.next_f64()),
                    [Value::Array(a)] => {
                        let a = a.borrow();
                        if a.0.is_empty() {
                            Value::Undefined
                        } else {
                            a.0[rng.index(a.0.len())].clone()
                        }
                    }
                    [hi] => Value::Num(rng.range(0.0, hi.to_number())),
                    [lo, hi, ..] => Value::Num(rng.range(lo.to_number(), hi.to_number())),
                })
            }
            Builtin::MathRandom => Ok(Value::Num(self.host.rng.next_f64())),
            Builtin::Noise => {
                args.need(1)?;
                let y = args.opt(1).map_or(0.0, Value::to_number);
                Ok(Value::Num(self.host.noise.sample(n(0), y)))
            }
            Builtin::Map => {
                args.need(5)?;
                let (v, a1, a2, b1, b2) = (n(0), n(1), n(2), n(3), n(4));
                let mut out = b1 + (v - a1) * (b2 - b1) / (a2 - a1);
                if args.opt(5).is_some_and(Value::truthy) {
                    out = if b1 < b2 {
                        out.clamp(b1, b2)
                    } else {
                        out.clamp(b2, b1)
                    };
                }
                Ok(Value::Num(out))
            }
            Builtin::Constrain => {
                args.need(3)?;
                Ok(Value::Num(n(0).max(n(1)).min(n(2))))
            }
            Builtin::Dist => {
                args.need(4)?;
                Ok(Value::Num((n(2) - n(0)).hypot(n(3) - n(1))))
            }
            Builtin::Lerp => {
                args.need(3)?;
                Ok(Value::Num(n(0) + (n(1) - n(0)) * n(2)))
            }
            Builtin::Sin => math1(args, f64::sin),
            Builtin::Cos => math1(args, f64::cos),
            Builtin::Tan => math1(args, f64::tan),
            Builtin::Asin => math1(args, f64::asin),
            Builtin::Acos => math1(args, f64::acos),
            Builtin::Atan => math1(args, f64::atan),
            Builtin::Atan2 => Ok(Value::Num(n(0).atan2(n(1)))),
            Builtin::Log => math1(args, f64::ln),
            Builtin::Exp => math1(args, f64::exp),
            Builtin::Abs => math1(args, f64::abs),
            Builtin::Floor => math1(args, f64::floor),
            Builtin::Ceil => math1(args, f64::ceil),
            Builtin::Round => math1(args, js_round),
            Builtin::Sqrt => math1(args, f64::sqrt),
            Builtin::Trunc => math1(args, f64::trunc),
            Builtin::Sign => math1(args, |x| if x == 0.0 || x.is_nan() { x } else { x.signum() }),
            Builtin::Pow => Ok(Value::Num(n(0).powf(n(1)))),
            Builtin::Hypot => Ok(Value::Num(
                args.values
                    .iter()
                    .map(Value::to_number)
                    .fold(0.0, |acc: f64, x| acc.hypot(x)),
            )),
            Builtin::Min | Builtin::Max => {
                let nums = spread_numbers(args.values);
                self.tick(nums.len() as u64)?;
                let is_min = b == Builtin::Min;
                let init = if is_min { f64::INFINITY } else { f64::NEG_INFINITY };
                let out = nums.into_iter().fold(init, |acc, x| {
                    if acc.is_nan() || x.is_nan() {
                        f64::NAN
                    } else if is_min {
                        acc.min(x)
                    } else {
                        acc.max(x)
                    }
                });
                Ok(Value::Num(out))
            }
            Builtin::Number => Ok(Value::Num(args.values.first().map_or(0.0, Value::to_number))),
            Builtin::String => {
                let s = match args.values.first() {
                    Some(v) => to_display(v)?,
                    None => String::new(),
                };
                self.make_str(s)
            }
            Builtin::Boolean => Ok(Value::Bool(args.values.first().is_some_and(Value::truthy))),
            Builtin::Array => match args.values {
                [Value::Num(len)] => {
                    let len = *len;
                    if len < 0.0 || len.fract() != 0.0 || len > MAX_ARRAY_LEN as f64 {
                        return Err(fail(format!("invalid array length {}", format_number(len))));
                    }
                    self.tick(len as u64)?;
                    self.make_array(vec![Value::Undefined; len as usize])
                }
                values => self.make_array(values.to_vec()),
            },
            Builtin::JsonStringify => {
                let value = args.values.first().unwrap_or(&Value::Undefined);
                let Some(json) = self.to_json(value, 0, &mut 0)? else {
                    return Ok(Value::Undefined);
                };
                let pretty = args.opt(2).is_some_and(Value::truthy);
                let s = if pretty {
                    serde_json::to_string_pretty(&json)
                } else {
                    serde_json::to_string(&json)
                }
                .map_err(|e| fail(format!("JSON.stringify: {e}")))?;
                self.make_str(s)
            }
            Builtin::JsonParse => {
                args.need(1)?;
                let text = args.text(0)?;
                let json: serde_json::Value = serde_json::from_str(&text)
                    .map_err(|e| fail(format!("JSON.parse: {e}")))?;
                self.from_json(json)
            }
            Builtin::ConsoleLog | Builtin::ConsoleWarn | Builtin::ConsoleError => {
                let mut line = String::new();
                for (i, v) in args.values.iter().enumerate() {
                    if i > 0 {
                        line.push(' ');
                    }
                    line.push_str(&to_display(v)?);
                }
                tracing::trace!(target: "sketchbox::console", stream = b.name(), "{line}");
                Ok(Value::Undefined)
            }
            // Drawing builtins are handled by `call_builtin`.
            _ => Err(fail(format!("{}() cannot be called here", b.name()))),
        }
    }

    fn from_json(&mut self, json: serde_json::Value) -> Exec<Value> {
        use serde_json::Value as J;
        self.tick(1)?;
        Ok(match json {
            J::Null => Value::Null,
            J::Bool(b) => Value::Bool(b),
            J::Number(n) => Value::Num(n.as_f64().unwrap_or(f64::NAN)),
            J::String(s) => self.make_str(s)?,
            J::Array(items) => {
                let items = items
                    .into_iter()
                    .map(|j| self.from_json(j))
                    .collect::<Exec<Vec<_>>>()?;
                self.make_array(items)?
            }
            J::Object(map) => {
                let obj = map
                    .into_iter()
                    .map(|(k, j)| Ok((Rc::from(k), self.from_json(j)?)))
                    .collect::<Exec<Obj>>()?;
                self.make_object(obj)?
            }
        })
    }

    /// `None` for values JSON omits (`undefined`, functions). `size` accumulates a lower bound
    /// on the serialized length, so oversized output fails before it is built.
    fn to_json(
        &mut self,
        v: &Value,
        depth: usize,
        size: &mut usize,
    ) -> Exec<Option<serde_json::Value>> {
        use serde_json::Value as J;
        if depth > JSON_DEPTH {
            return Err(resource(
                "JSON.stringify: structure is nested too deeply or is cyclic",
            ));
        }
        self.tick(1)?;
        let (json, bytes) = match v {
            Value::Undefined | Value::Function(_) | Value::Builtin(_) => return Ok(None),
            Value::Null => (J::Null, 4),
            Value::Bool(b) => (J::Bool(*b), 4),
            Value::Num(n) => (number_json(*n), 1),
            Value::Str(s) => {
                self.tick_bytes(s.len())?;
                grow(size, s.len() + 2)?;
                (J::String(s.to_string()), 0)
            }
            Value::Array(a) => {
                grow(size, 2)?;
                let mut items = Vec::new();
                for item in a.borrow().0.iter() {
                    items.push(self.to_json(item, depth + 1, size)?.unwrap_or(J::Null));
                }
                (J::Array(items), 0)
            }
            Value::Object(o) => {
                grow(size, 2)?;
                let mut map = serde_json::Map::new();
                for (k, item) in o.borrow().0.iter() {
                    if let Some(j) = self.to_json(item, depth + 1, size)? {
                        grow(size, k.len() + 3)?;
                        map.insert(k.to_string(), j);
                    }
                }
                (J::Object(map), 0)
            }
            Value::Namespace(_) => (J::Object(serde_json::Map::new()), 2),
        };
        grow(size, bytes)?;
        Ok(Some(json))
    }
}

fn grow(size: &mut usize, bytes: usize) -> Exec<()> {
    *size = size.saturating_add(bytes);
    if *size > MAX_STRING_BYTES {
        return Err(TooLong.into());
    }
    Ok(())
}

/// Integral values serialize without a fractional part; non-finite ones become `null`.
fn number_json(n: f64) -> serde_json::Value {
    if n.fract() == 0.0 && n.abs() < 9.0e15 {
        serde_json::Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n).map_or(serde_json::Value::Null, serde_json::Value::Number)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/script/builtins.rs"]
mod tests;

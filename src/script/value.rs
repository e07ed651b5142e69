use std::cell::RefCell;
use std::fmt;
use std::fmt::Write as _;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::foundation::limits::MAX_STRING_BYTES;
use crate::script::ast::FunctionDecl;
use crate::script::builtins::{Builtin, Namespace};

/// Nested containers deeper than this print as `...`.
const DISPLAY_DEPTH: usize = 32;

/// A runtime value.
#[derive(Clone)]
pub(crate) enum Value {
    Undefined,
    Null,
    Bool(bool),
    Num(f64),
    Str(Rc<str>),
    Array(Rc<RefCell<List>>),
    Object(Rc<RefCell<Obj>>),
    Function(Rc<FunctionDecl>),
    Builtin(Builtin),
    Namespace(Namespace),
}

/// Array storage.
#[derive(Default)]
pub(crate) struct List(pub(crate) Vec<Value>);

/// Object storage: properties in insertion order, hashed by key.
#[derive(Default)]
pub(crate) struct Obj(pub(crate) IndexMap<Rc<str>, Value>);

impl Obj {
    pub(crate) fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns `true` when a new property was added. An existing key keeps its position.
    pub(crate) fn set(&mut self, key: Rc<str>, value: Value) -> bool {
        self.0.insert(key, value).is_none()
    }
}

impl FromIterator<(Rc<str>, Value)> for Obj {
    fn from_iter<I: IntoIterator<Item = (Rc<str>, Value)>>(iter: I) -> Self {
        let mut obj = Obj::default();
        for (k, v) in iter {
            obj.set(k, v);
        }
        obj
    }
}

// Containers may nest arbitrarily deep (`a = [a]` in a loop). Dropping them recursively would
// overflow the stack, so children are flattened onto a worklist instead.
impl Drop for List {
    fn drop(&mut self) {
        release(std::mem::take(&mut self.0));
    }
}

impl Drop for Obj {
    fn drop(&mut self) {
        release(self.0.drain(..).map(|(_, v)| v).collect());
    }
}

fn release(mut pending: Vec<Value>) {
    while let Some(v) = pending.pop() {
        match v {
            Value::Array(rc) => {
                if let Ok(cell) = Rc::try_unwrap(rc) {
                    pending.append(&mut cell.into_inner().0);
                }
            }
            Value::Object(rc) => {
                if let Ok(cell) = Rc::try_unwrap(rc) {
                    let mut obj = cell.into_inner();
                    pending.extend(obj.0.drain(..).map(|(_, v)| v));
                }
            }
            _ => {}
        }
    }
}

impl fmt::Debug for Value {
    // Containers may be cyclic; never recurse.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => f.write_str("Undefined"),
            Self::Null => f.write_str("Null"),
            Self::Bool(b) => write!(f, "Bool({b})"),
            Self::Num(n) => write!(f, "Num({n})"),
            Self::Str(s) => write!(f, "Str({s:?})"),
            Self::Array(a) => write!(f, "Array(len={})", a.borrow().0.len()),
            Self::Object(o) => write!(f, "Object(props={})", o.borrow().0.len()),
            Self::Function(func) => write!(f, "Function({:?})", func.name),
            Self::Builtin(b) => write!(f, "Builtin({})", b.name()),
            Self::Namespace(ns) => write!(f, "Namespace({})", ns.name()),
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Num(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(Rc::from(v))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(Rc::from(v))
    }
}

impl Value {
    pub(crate) fn array(items: Vec<Value>) -> Self {
        Self::Array(Rc::new(RefCell::new(List(items))))
    }

    #[cfg(test)]
    pub(crate) fn object(props: Vec<(Rc<str>, Value)>) -> Self {
        Self::Object(Rc::new(RefCell::new(props.into_iter().collect())))
    }

    pub(crate) fn type_name(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Num(_) => "number",
            Self::Str(_) => "string",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
            Self::Function(_) | Self::Builtin(_) => "function",
            Self::Namespace(_) => "object",
        }
    }

    pub(crate) fn truthy(&self) -> bool {
        match self {
            Self::Undefined | Self::Null => false,
            Self::Bool(b) => *b,
            Self::Num(n) => *n != 0.0 && !n.is_nan(),
            Self::Str(s) => !s.is_empty(),
            _ => true,
        }
    }

    /// Numeric coercion.
    pub(crate) fn to_number(&self) -> f64 {
        match self {
            Self::Num(n) => *n,
            Self::Bool(b) => f64::from(u8::from(*b)),
            Self::Null => 0.0,
            Self::Str(s) => parse_number(s),
            Self::Array(a) => {
                let a = a.borrow();
                match a.0.as_slice() {
                    [] => 0.0,
                    [only] if !matches!(only, Self::Array(_) | Self::Object(_)) => {
                        only.to_number()
                    }
                    _ => f64::NAN,
                }
            }
            _ => f64::NAN,
        }
    }
}

/// String to number, JS style: surrounding whitespace ignored, empty is zero.
pub(crate) fn parse_number(s: &str) -> f64 {
    let t = s.trim();
    if t.is_empty() {
        return 0.0;
    }
    match t {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    if let Some(hex) = t.strip_prefix("0x").or_else(|| t.strip_prefix("0X")) {
        return u64::from_str_radix(hex, 16).map_or(f64::NAN, |v| v as f64);
    }
    // Rust accepts "inf"/"nan" spellings that JS does not.
    if t.bytes().any(|b| b.is_ascii_alphabetic() && !matches!(b, b'e' | b'E')) {
        return f64::NAN;
    }
    t.parse().unwrap_or(f64::NAN)
}

pub(crate) fn format_number(v: f64) -> String {
    if v.is_nan() {
        return "NaN".to_owned();
    }
    if v.is_infinite() {
        return if v > 0.0 { "Infinity" } else { "-Infinity" }.to_owned();
    }
    if v == 0.0 {
        return "0".to_owned();
    }
    if v.abs() >= 1e21 {
        return format!("{v:e}").replace('e', "e+");
    }
    format!("{v}")
}

pub(crate) fn strict_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Num(x), Value::Num(y)) => x == y,
        (Value::Str(x), Value::Str(y)) => x == y,
        (Value::Array(x), Value::Array(y)) => Rc::ptr_eq(x, y),
        (Value::Object(x), Value::Object(y)) => Rc::ptr_eq(x, y),
        (Value::Function(x), Value::Function(y)) => Rc::ptr_eq(x, y),
        (Value::Builtin(x), Value::Builtin(y)) => x == y,
        (Value::Namespace(x), Value::Namespace(y)) => x == y,
        _ => false,
    }
}

pub(crate) fn loose_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Undefined | Value::Null, Value::Undefined | Value::Null) => true,
        (Value::Undefined | Value::Null, _) | (_, Value::Undefined | Value::Null) => false,
        (Value::Num(_), Value::Str(_) | Value::Bool(_))
        | (Value::Str(_) | Value::Bool(_), Value::Num(_))
        | (Value::Bool(_), Value::Str(_))
        | (Value::Str(_), Value::Bool(_)) => a.to_number() == b.to_number(),
        _ => strict_eq(a, b),
    }
}

/// The output would exceed [`MAX_STRING_BYTES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TooLong;

/// String conversion, as used by `+` concatenation and `String(x)`.
pub(crate) fn to_display(v: &Value) -> Result<String, TooLong> {
    let mut out = String::new();
    write_display(v, &mut out, 0)?;
    Ok(out)
}

fn write_display(v: &Value, out: &mut String, depth: usize) -> Result<(), TooLong> {
    match v {
        Value::Undefined => out.push_str("undefined"),
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Num(n) => out.push_str(&format_number(*n)),
        Value::Str(s) => out.push_str(s),
        Value::Array(a) => {
            if depth >= DISPLAY_DEPTH {
                out.push_str("...");
            } else {
                for (i, item) in a.borrow().0.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    // Holes and nullish entries print empty.
                    if !matches!(item, Value::Undefined | Value::Null) {
                        write_display(item, out, depth + 1)?;
                    }
                    if out.len() > MAX_STRING_BYTES {
                        return Err(TooLong);
                    }
                }
            }
        }
        Value::Object(_) => out.push_str("[object Object]"),
        Value::Function(f) => {
            let _ = write!(out, "function {}() {{ ... }}", f.name.as_deref().unwrap_or(""));
        }
        Value::Builtin(b) => {
            let _ = write!(out, "function {}() {{ [native code] }}", b.name());
        }
        Value::Namespace(ns) => {
            let _ = write!(out, "[object {}]", ns.name());
        }
    }
    if out.len() > MAX_STRING_BYTES {
        return Err(TooLong);
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/script/value.rs"]
mod tests;

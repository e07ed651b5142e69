//! Tree-walking evaluator.
//!
//! Name resolution only ever reaches the script's own bindings and the fixed set in
//! [`crate::script::builtins`]; there is nothing else to reach.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::draw::{DrawError, DrawingContext};
use crate::foundation::error::ExecFailure;
use crate::foundation::limits::{MAX_ARRAY_LEN, MAX_EVAL_DEPTH, MAX_HEAP_BYTES, MAX_STRING_BYTES};
use crate::random::{NoiseField, SeededRng};
use crate::script::ast::{
    BinaryOp, DeclKind, Expr, FunctionDecl, Lit, Program, Stmt, StmtKind, Target, UnaryOp,
};
use crate::script::builtins;
use crate::script::value::{List, Obj, TooLong, Value, loose_eq, strict_eq, to_display};

/// Steps between two reads of the clock.
pub(crate) const CHECK_INTERVAL: u64 = 256;
/// Bytes a string scan may cover for the price of one step.
const BYTES_PER_STEP: usize = 32;

/// Why evaluation stopped early.
#[derive(Debug)]
pub(crate) enum Interrupt {
    Timeout,
    Failed {
        failure: ExecFailure,
        /// Byte offset of the innermost statement that was running.
        offset: Option<usize>,
    },
}

impl Interrupt {
    fn at(self, offset: usize) -> Self {
        match self {
            Self::Failed {
                failure,
                offset: None,
            } => Self::Failed {
                failure,
                offset: Some(offset),
            },
            other => other,
        }
    }
}

impl From<DrawError> for Interrupt {
    fn from(e: DrawError) -> Self {
        let failure = match e {
            DrawError::ElementLimit { limit } => ExecFailure::ElementLimit { limit },
            other => ExecFailure::Script(other.to_string()),
        };
        Self::Failed {
            failure,
            offset: None,
        }
    }
}

impl From<TooLong> for Interrupt {
    fn from(_: TooLong) -> Self {
        resource(format!("string longer than {MAX_STRING_BYTES} bytes"))
    }
}

pub(crate) type Exec<T> = Result<T, Interrupt>;

pub(crate) fn fail(message: impl Into<String>) -> Interrupt {
    Interrupt::Failed {
        failure: ExecFailure::Script(message.into()),
        offset: None,
    }
}

pub(crate) fn resource(message: impl Into<String>) -> Interrupt {
    Interrupt::Failed {
        failure: ExecFailure::ResourceLimit(message.into()),
        offset: None,
    }
}

/// Everything a script can affect.
#[derive(Debug)]
pub(crate) struct Host {
    pub(crate) ctx: DrawingContext,
    pub(crate) rng: SeededRng,
    pub(crate) noise: NoiseField,
}

enum Flow {
    Normal,
    Break,
    Continue,
    Return(Value),
}

struct Binding {
    value: Value,
    mutable: bool,
}

type Scope = HashMap<Rc<str>, Binding>;

/// Cooperative wall-clock budget.
struct Budget {
    /// `None` when the timeout is too large to represent.
    deadline: Option<Instant>,
    until_check: u64,
}

impl Budget {
    fn new(timeout: Duration) -> Self {
        Self {
            deadline: Instant::now().checked_add(timeout),
            until_check: CHECK_INTERVAL,
        }
    }

    fn tick(&mut self, steps: u64) -> Exec<()> {
        if steps < self.until_check {
            self.until_check -= steps;
            return Ok(());
        }
        self.until_check = CHECK_INTERVAL;
        if self.deadline.is_some_and(|d| Instant::now() >= d) {
            return Err(Interrupt::Timeout);
        }
        Ok(())
    }
}

pub(crate) struct Interpreter {
    pub(crate) host: Host,
    globals: Scope,
    scopes: Vec<Scope>,
    /// First scope of the running function; lookups never go below it.
    frame_base: usize,
    /// Active user-function calls.
    calls: usize,
    depth: usize,
    heap: usize,
    budget: Budget,
}

impl Interpreter {
    pub(crate) fn new(host: Host, timeout: Duration) -> Self {
        Self {
            host,
            globals: HashMap::new(),
            scopes: Vec::new(),
            frame_base: 0,
            calls: 0,
            depth: 0,
            heap: 0,
            budget: Budget::new(timeout),
        }
    }

    pub(crate) fn into_host(self) -> Host {
        self.host
    }

    /// Run top-level code, then `setup()` and `draw()` when the script defines them.
    pub(crate) fn run(&mut self, program: &Program) -> Exec<()> {
        self.hoist(&program.body);
        for stmt in &program.body {
            match self.exec(stmt)? {
                Flow::Normal => {}
                Flow::Return(_) => return Ok(()),
                Flow::Break | Flow::Continue => {
                    return Err(fail("'break'/'continue' outside of a loop").at(stmt.offset));
                }
            }
        }

        for entry in ["setup", "draw"] {
            if let Some(Binding {
                value: Value::Function(f),
                ..
            }) = self.globals.get(entry)
            {
                let f = f.clone();
                tracing::debug!(entry, "calling sketch entry point");
                self.call_function(&f, Vec::new())?;
            }
        }
        Ok(())
    }

    // ---- resources ------------------------------------------------------------------------

    pub(crate) fn tick(&mut self, steps: u64) -> Exec<()> {
        self.budget.tick(steps)
    }

    /// Charge the clock for a linear pass over `bytes` of string data.
    pub(crate) fn tick_bytes(&mut self, bytes: usize) -> Exec<()> {
        self.tick((bytes / BYTES_PER_STEP) as u64)
    }

    pub(crate) fn charge(&mut self, bytes: usize) -> Exec<()> {
        self.heap = self.heap.saturating_add(bytes);
        if self.heap > MAX_HEAP_BYTES {
            return Err(resource(format!(
                "script allocated more than {} MiB",
                MAX_HEAP_BYTES / (1024 * 1024)
            )));
        }
        Ok(())
    }

    pub(crate) fn make_str(&mut self, s: String) -> Exec<Value> {
        if s.len() > MAX_STRING_BYTES {
            return Err(TooLong.into());
        }
        self.charge(s.len())?;
        Ok(Value::from(s))
    }

    pub(crate) fn make_array(&mut self, items: Vec<Value>) -> Exec<Value> {
        self.check_array_len(items.len())?;
        self.charge(32 + items.len() * 16)?;
        Ok(Value::array(items))
    }

    pub(crate) fn make_object(&mut self, obj: Obj) -> Exec<Value> {
        let keys: usize = obj.0.keys().map(|k| k.len()).sum();
        self.charge(32 + obj.0.len() * 32 + keys)?;
        Ok(Value::Object(Rc::new(RefCell::new(obj))))
    }

    pub(crate) fn check_array_len(&self, len: usize) -> Exec<()> {
        if len > MAX_ARRAY_LEN {
            return Err(resource(format!(
                "array longer than {MAX_ARRAY_LEN} elements"
            )));
        }
        Ok(())
    }

    fn descend(&mut self) -> Exec<()> {
        self.depth += 1;
        if self.depth > MAX_EVAL_DEPTH {
            return Err(resource(format!(
                "evaluation nested deeper than {MAX_EVAL_DEPTH} levels (runaway recursion?)"
            )));
        }
        Ok(())
    }

    // ---- bindings -------------------------------------------------------------------------

    /// Function declarations are visible throughout their enclosing block.
    fn hoist(&mut self, body: &[Stmt]) {
        for stmt in body {
            if let StmtKind::Function(f) = &stmt.kind
                && let Some(name) = &f.name
            {
                self.declare(DeclKind::Var, name.clone(), Value::Function(f.clone()), true);
            }
        }
    }

    fn declare(&mut self, kind: DeclKind, name: Rc<str>, value: Value, hoisted: bool) {
        let binding = Binding {
            value,
            mutable: kind != DeclKind::Const,
        };
        let function_scoped = kind == DeclKind::Var && !hoisted;
        let scope = if self.scopes.len() == self.frame_base || (function_scoped && self.calls == 0)
        {
            &mut self.globals
        } else if function_scoped {
            &mut self.scopes[self.frame_base]
        } else {
            let last = self.scopes.len() - 1;
            &mut self.scopes[last]
        };
        scope.insert(name, binding);
    }

    fn find_binding(&mut self, name: &str) -> Option<&mut Binding> {
        let base = self.frame_base;
        for scope in self.scopes[base..].iter_mut().rev() {
            if let Some(b) = scope.get_mut(name) {
                return Some(b);
            }
        }
        self.globals.get_mut(name)
    }

    fn lookup(&mut self, name: &str) -> Exec<Value> {
        if let Some(b) = self.find_binding(name) {
            return Ok(b.value.clone());
        }
        let canvas = self.host.ctx.canvas();
        match name {
            "width" => return Ok(Value::Num(f64::from(canvas.width))),
            "height" => return Ok(Value::Num(f64::from(canvas.height))),
            _ => {}
        }
        if let Some(v) = builtins::global(name) {
            return Ok(v);
        }
        Err(fail(format!("{name} is not defined")))
    }

    fn assign_name(&mut self, name: &Rc<str>, value: Value) -> Exec<()> {
        if let Some(b) = self.find_binding(name) {
            if !b.mutable {
                return Err(fail(format!("assignment to constant variable '{name}'")));
            }
            b.value = value;
            return Ok(());
        }
        if builtins::is_reserved(name) {
            return Err(fail(format!("cannot assign to read-only '{name}'")));
        }
        // Undeclared assignment creates a global.
        self.globals.insert(
            name.clone(),
            Binding {
                value,
                mutable: true,
            },
        );
        Ok(())
    }

    // ---- statements -----------------------------------------------------------------------

    fn exec(&mut self, stmt: &Stmt) -> Exec<Flow> {
        self.tick(1)?;
        self.exec_inner(stmt).map_err(|e| e.at(stmt.offset))
    }

    fn exec_inner(&mut self, stmt: &Stmt) -> Exec<Flow> {
        match &stmt.kind {
            StmtKind::Empty | StmtKind::Function(_) => Ok(Flow::Normal),
            StmtKind::Expr(e) => {
                self.eval(e)?;
                Ok(Flow::Normal)
            }
            StmtKind::Decl { kind, decls } => {
                for (name, init) in decls {
                    let value = match init {
                        Some(e) => self.eval(e)?,
                        None => Value::Undefined,
                    };
                    self.declare(*kind, name.clone(), value, false);
                }
                Ok(Flow::Normal)
            }
            StmtKind::Block(body) => self.exec_block(body),
            StmtKind::If {
                cond,
                then,
                otherwise,
            } => {
                if self.eval(cond)?.truthy() {
                    self.exec(then)
                } else if let Some(otherwise) = otherwise {
                    self.exec(otherwise)
                } else {
                    Ok(Flow::Normal)
                }
            }
            StmtKind::While { cond, body } => {
                while self.eval(cond)?.truthy() {
                    self.tick(1)?;
                    match self.exec(body)? {
                        Flow::Break => break,
                        Flow::Return(v) => return Ok(Flow::Return(v)),
                        Flow::Normal | Flow::Continue => {}
                    }
                }
                Ok(Flow::Normal)
            }
            StmtKind::For {
                init,
                cond,
                update,
                body,
            } => {
                self.scopes.push(Scope::new());
                let r = self.exec_for(init.as_deref(), cond.as_ref(), update.as_ref(), body);
                self.scopes.pop();
                r
            }
            StmtKind::ForOf {
                kind,
                name,
                iterable,
                body,
            } => self.exec_for_of(*kind, name, iterable, body),
            StmtKind::Return(e) => {
                let v = match e {
                    Some(e) => self.eval(e)?,
                    None => Value::Undefined,
                };
                Ok(Flow::Return(v))
            }
            StmtKind::Break => Ok(Flow::Break),
            StmtKind::Continue => Ok(Flow::Continue),
        }
    }

    fn exec_block(&mut self, body: &[Stmt]) -> Exec<Flow> {
        self.scopes.push(Scope::new());
        let r = self.exec_stmts(body);
        self.scopes.pop();
        r
    }

    fn exec_stmts(&mut self, body: &[Stmt]) -> Exec<Flow> {
        self.hoist(body);
        for stmt in body {
            match self.exec(stmt)? {
                Flow::Normal => {}
                other => return Ok(other),
            }
        }
        Ok(Flow::Normal)
    }

    fn exec_for(
        &mut self,
        init: Option<&Stmt>,
        cond: Option<&Expr>,
        update: Option<&Expr>,
        body: &Stmt,
    ) -> Exec<Flow> {
        if let Some(init) = init {
            self.exec(init)?;
        }
        loop {
            self.tick(1)?;
            if let Some(cond) = cond
                && !self.eval(cond)?.truthy()
            {
                break;
            }
            match self.exec(body)? {
                Flow::Break => break,
                Flow::Return(v) => return Ok(Flow::Return(v)),
                Flow::Normal | Flow::Continue => {}
            }
            if let Some(update) = update {
                self.eval(update)?;
            }
        }
        Ok(Flow::Normal)
    }

    fn exec_for_of(
        &mut self,
        kind: DeclKind,
        name: &Rc<str>,
        iterable: &Expr,
        body: &Stmt,
    ) -> Exec<Flow> {
        let next: Box<dyn Fn(usize) -> Option<Value>> = match self.eval(iterable)? {
            // Arrays are read live, so pushes during iteration are visited.
            Value::Array(a) => Box::new(move |i| a.borrow().0.get(i).cloned()),
            Value::Str(s) => {
                self.tick_bytes(s.len())?;
                self.charge(s.len() * 4)?;
                let chars: Vec<char> = s.chars().collect();
                Box::new(move |i| chars.get(i).map(|c| Value::from(c.to_string())))
            }
            other => return Err(fail(format!("{} is not iterable", other.type_name()))),
        };

        let mut i = 0;
        while let Some(item) = next(i) {
            i += 1;
            self.tick(1)?;
            self.scopes.push(Scope::new());
            self.declare(kind, name.clone(), item, false);
            let r = self.exec(body);
            self.scopes.pop();
            match r? {
                Flow::Break => break,
                Flow::Return(v) => return Ok(Flow::Return(v)),
                Flow::Normal | Flow::Continue => {}
            }
        }
        Ok(Flow::Normal)
    }

    // ---- calls ----------------------------------------------------------------------------

    pub(crate) fn call_value(&mut self, callee: &Value, args: Vec<Value>, what: &str) -> Exec<Value> {
        match callee {
            Value::Function(f) => {
                let f = f.clone();
                self.call_function(&f, args)
            }
            Value::Builtin(b) => self.call_builtin(*b, args),
            other => Err(fail(format!(
                "{what} is not a function (it is {})",
                other.type_name()
            ))),
        }
    }

    fn call_function(&mut self, f: &Rc<FunctionDecl>, args: Vec<Value>) -> Exec<Value> {
        self.tick(1)?;
        self.descend()?;

        let mut frame = Scope::new();
        let mut args = args.into_iter();
        for p in &f.params {
            frame.insert(
                p.clone(),
                Binding {
                    value: args.next().unwrap_or(Value::Undefined),
                    mutable: true,
                },
            );
        }

        let saved_base = self.frame_base;
        self.frame_base = self.scopes.len();
        self.scopes.push(frame);
        self.calls += 1;
        let r = self.exec_stmts(&f.body);
        self.calls -= 1;
        self.scopes.truncate(self.frame_base);
        self.frame_base = saved_base;
        self.depth -= 1;

        match r? {
            Flow::Return(v) => Ok(v),
            Flow::Normal => Ok(Value::Undefined),
            Flow::Break | Flow::Continue => Err(fail("'break'/'continue' outside of a loop")),
        }
    }

    fn eval_call(&mut self, callee: &Expr, args: &[Expr]) -> Exec<Value> {
        // Method calls: `arr.push(x)`, `Math.sin(x)`, `n.toFixed(2)`.
        if let Expr::Member { object, name } = callee {
            let recv = self.eval(object)?;
            let args = self.eval_args(args)?;
            return self.call_method(&recv, name, args);
        }

        let f = self.eval(callee)?;
        let args = self.eval_args(args)?;
        let what = match callee {
            Expr::Ident(name) => name.to_string(),
            _ => "expression".to_owned(),
        };
        self.call_value(&f, args, &what)
    }

    fn eval_args(&mut self, args: &[Expr]) -> Exec<Vec<Value>> {
        args.iter().map(|a| self.eval(a)).collect()
    }

    fn call_method(&mut self, recv: &Value, name: &Rc<str>, args: Vec<Value>) -> Exec<Value> {
        match recv {
            Value::Array(a) => self.call_array_method(a, name, args),
            Value::Num(n) if &**name == "toFixed" => {
                let digits = args.first().map_or(0.0, Value::to_number);
                if !(0.0..=100.0).contains(&digits) {
                    return Err(fail("toFixed() digits must be between 0 and 100"));
                }
                self.make_str(format!("{:.*}", digits as usize, n))
            }
            Value::Namespace(ns) => match ns.member(name) {
                Some(f) => self.call_value(&f, args, &format!("{}.{name}", ns.name())),
                None => Err(fail(format!("{}.{name} is not a function", ns.name()))),
            },
            Value::Object(o) => {
                let f = o.borrow().get(name).cloned().unwrap_or(Value::Undefined);
                self.call_value(&f, args, name)
            }
            Value::Undefined | Value::Null => Err(fail(format!(
                "cannot read property '{name}' of {}",
                recv.type_name()
            ))),
            other => Err(fail(format!(
                "{}.{name} is not a function",
                other.type_name()
            ))),
        }
    }

    fn call_array_method(
        &mut self,
        a: &Rc<RefCell<List>>,
        name: &str,
        args: Vec<Value>,
    ) -> Exec<Value> {
        match name {
            "push" => {
                let len = a.borrow().0.len() + args.len();
                self.check_array_len(len)?;
                self.charge(args.len() * 16)?;
                a.borrow_mut().0.extend(args);
                Ok(Value::Num(len as f64))
            }
            "pop" => Ok(a.borrow_mut().0.pop().unwrap_or(Value::Undefined)),
            "includes" | "indexOf" => {
                let needle = args.into_iter().next().unwrap_or(Value::Undefined);
                let len = a.borrow().0.len();
                self.tick(len as u64)?;
                let pos = a.borrow().0.iter().position(|v| strict_eq(v, &needle));
                Ok(if name == "includes" {
                    Value::Bool(pos.is_some())
                } else {
                    Value::Num(pos.map_or(-1.0, |p| p as f64))
                })
            }
            "join" => {
                let sep = match args.first() {
                    None | Some(Value::Undefined) => ",".to_owned(),
                    Some(v) => to_display(v)?,
                };
                let items = a.borrow().0.clone();
                self.tick(items.len() as u64)?;
                let mut out = String::new();
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push_str(&sep);
                    }
                    if !matches!(item, Value::Undefined | Value::Null) {
                        out.push_str(&to_display(item)?);
                    }
                    if out.len() > MAX_STRING_BYTES {
                        return Err(TooLong.into());
                    }
                }
                self.make_str(out)
            }
            "slice" => {
                let len = a.borrow().0.len();
                let bound = |v: Option<&Value>, default: usize| -> usize {
                    match v {
                        None | Some(Value::Undefined) => default,
                        Some(v) => {
                            let n = v.to_number();
                            let n = if n.is_nan() { 0.0 } else { n.trunc() };
                            let n = if n < 0.0 { len as f64 + n } else { n };
                            n.clamp(0.0, len as f64) as usize
                        }
                    }
                };
                let start = bound(args.first(), 0);
                let end = bound(args.get(1), len).max(start);
                self.tick((end - start) as u64)?;
                let items = a.borrow().0[start..end].to_vec();
                self.make_array(items)
            }
            _ => Err(fail(format!("array.{name} is not a function"))),
        }
    }

    // ---- expressions ----------------------------------------------------------------------

    pub(crate) fn eval(&mut self, expr: &Expr) -> Exec<Value> {
        self.descend()?;
        let r = self.eval_inner(expr);
        self.depth -= 1;
        r
    }

    fn eval_inner(&mut self, expr: &Expr) -> Exec<Value> {
        match expr {
            Expr::Lit(lit) => Ok(match lit {
                Lit::Num(n) => Value::Num(*n),
                Lit::Str(s) => Value::Str(s.clone()),
                Lit::Bool(b) => Value::Bool(*b),
                Lit::Null => Value::Null,
                Lit::Undefined => Value::Undefined,
            }),
            Expr::Ident(name) => self.lookup(name),
            Expr::Array(items) => {
                let items = self.eval_args(items)?;
                self.make_array(items)
            }
            Expr::Object(props) => {
                let mut obj = Obj::default();
                for (k, e) in props {
                    let v = self.eval(e)?;
                    obj.set(k.clone(), v);
                }
                self.make_object(obj)
            }
            Expr::Function(f) => Ok(Value::Function(f.clone())),
            Expr::Unary { op, expr } => {
                let v = self.eval(expr)?;
                Ok(match op {
                    UnaryOp::Neg => Value::Num(-v.to_number()),
                    UnaryOp::Plus => Value::Num(v.to_number()),
                    UnaryOp::Not => Value::Bool(!v.truthy()),
                })
            }
            Expr::Binary { op, left, right } => {
                let l = self.eval(left)?;
                let r = self.eval(right)?;
                self.binary(*op, &l, &r)
            }
            Expr::Logical { and, left, right } => {
                let l = self.eval(left)?;
                if l.truthy() == *and {
                    self.eval(right)
                } else {
                    Ok(l)
                }
            }
            Expr::Cond {
                cond,
                then,
                otherwise,
            } => {
                if self.eval(cond)?.truthy() {
                    self.eval(then)
                } else {
                    self.eval(otherwise)
                }
            }
            Expr::Member { object, name } => {
                let recv = self.eval(object)?;
                self.get_member(&recv, name)
            }
            Expr::Index { object, index } => {
                let recv = self.eval(object)?;
                let idx = self.eval(index)?;
                self.get_index(&recv, &idx)
            }
            Expr::Call { callee, args } => self.eval_call(callee, args),
            Expr::Assign { target, op, value } => self.eval_assign(target, *op, value),
            Expr::Update {
                target,
                delta,
                prefix,
            } => {
                let place = self.resolve(target)?;
                let old = self.read(&place)?.to_number();
                let new = old + delta;
                self.write(&place, Value::Num(new))?;
                Ok(Value::Num(if *prefix { new } else { old }))
            }
        }
    }

    pub(crate) fn binary(&mut self, op: BinaryOp, l: &Value, r: &Value) -> Exec<Value> {
        let num = |f: fn(f64, f64) -> f64| Value::Num(f(l.to_number(), r.to_number()));
        Ok(match op {
            BinaryOp::Add => {
                let concat = |v: &Value| {
                    matches!(v, Value::Str(_) | Value::Array(_) | Value::Object(_))
                };
                if concat(l) || concat(r) {
                    let mut s = to_display(l)?;
                    s.push_str(&to_display(r)?);
                    return self.make_str(s);
                }
                num(|a, b| a + b)
            }
            BinaryOp::Sub => num(|a, b| a - b),
            BinaryOp::Mul => num(|a, b| a * b),
            BinaryOp::Div => num(|a, b| a / b),
            BinaryOp::Mod => num(|a, b| a % b),
            BinaryOp::Pow => num(f64::powf),
            BinaryOp::Eq => Value::Bool(loose_eq(l, r)),
            BinaryOp::Ne => Value::Bool(!loose_eq(l, r)),
            BinaryOp::StrictEq => Value::Bool(strict_eq(l, r)),
            BinaryOp::StrictNe => Value::Bool(!strict_eq(l, r)),
            BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
                let ord = match (l, r) {
                    (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
                    _ => l.to_number().partial_cmp(&r.to_number()),
                };
                Value::Bool(ord.is_some_and(|o| match op {
                    BinaryOp::Lt => o.is_lt(),
                    BinaryOp::Le => o.is_le(),
                    BinaryOp::Gt => o.is_gt(),
                    _ => o.is_ge(),
                }))
            }
        })
    }

    fn get_member(&mut self, recv: &Value, name: &str) -> Exec<Value> {
        Ok(match recv {
            Value::Array(a) if name == "length" => Value::Num(a.borrow().0.len() as f64),
            Value::Str(s) if name == "length" => {
                self.tick_bytes(s.len())?;
                Value::Num(s.chars().count() as f64)
            }
            Value::Object(o) => o.borrow().get(name).cloned().unwrap_or(Value::Undefined),
            Value::Namespace(ns) => ns.member(name).unwrap_or(Value::Undefined),
            Value::Undefined | Value::Null => {
                return Err(fail(format!(
                    "cannot read property '{name}' of {}",
                    recv.type_name()
                )));
            }
            _ => Value::Undefined,
        })
    }

    fn get_index(&mut self, recv: &Value, idx: &Value) -> Exec<Value> {
        match recv {
            Value::Array(a) => Ok(array_index(idx)
                .and_then(|i| a.borrow().0.get(i).cloned())
                .unwrap_or(Value::Undefined)),
            Value::Str(s) => {
                let Some(i) = array_index(idx) else {
                    return Ok(Value::Undefined);
                };
                // `nth` walks the string from the start.
                self.tick_bytes(i.min(s.len()))?;
                Ok(s.chars()
                    .nth(i)
                    .map_or(Value::Undefined, |c| Value::from(c.to_string())))
            }
            Value::Object(_) | Value::Namespace(_) => {
                let key = to_display(idx)?;
                self.tick_bytes(key.len())?;
                self.get_member(recv, &key)
            }
            Value::Undefined | Value::Null => Err(fail(format!(
                "cannot read index of {}",
                recv.type_name()
            ))),
            _ => Ok(Value::Undefined),
        }
    }

    // ---- assignment -----------------------------------------------------------------------

    fn eval_assign(&mut self, target: &Target, op: Option<BinaryOp>, value: &Expr) -> Exec<Value> {
        let place = self.resolve(target)?;
        let v = match op {
            None => self.eval(value)?,
            Some(op) => {
                let old = self.read(&place)?;
                let rhs = self.eval(value)?;
                self.binary(op, &old, &rhs)?
            }
        };
        self.write(&place, v.clone())?;
        Ok(v)
    }

    /// Evaluate the object/index parts of a target once.
    fn resolve(&mut self, target: &Target) -> Exec<Place> {
        Ok(match target {
            Target::Name(name) => Place::Name(name.clone()),
            Target::Member { object, name } => Place::Member(self.eval(object)?, name.clone()),
            Target::Index { object, index } => {
                let obj = self.eval(object)?;
                let idx = self.eval(index)?;
                Place::Index(obj, idx)
            }
        })
    }

    fn read(&mut self, place: &Place) -> Exec<Value> {
        match place {
            Place::Name(name) => self.lookup(name),
            Place::Member(obj, name) => self.get_member(obj, name),
            Place::Index(obj, idx) => self.get_index(obj, idx),
        }
    }

    fn write(&mut self, place: &Place, value: Value) -> Exec<()> {
        match place {
            Place::Name(name) => self.assign_name(name, value),
            Place::Member(obj, name) => self.set_property(obj, name.clone(), value),
            Place::Index(Value::Array(a), idx) => {
                let Some(i) = array_index(idx) else {
                    return Err(fail(format!(
                        "array index must be a non-negative integer, got {}",
                        to_display(idx)?
                    )));
                };
                let len = a.borrow().0.len();
                if i < len {
                    a.borrow_mut().0[i] = value;
                    return Ok(());
                }
                self.check_array_len(i + 1)?;
                self.charge((i + 1 - len) * 16)?;
                self.tick((i + 1 - len) as u64)?;
                let mut list = a.borrow_mut();
                list.0.resize(i, Value::Undefined);
                list.0.push(value);
                Ok(())
            }
            Place::Index(obj @ Value::Object(_), idx) => {
                let key = to_display(idx)?;
                self.tick_bytes(key.len())?;
                self.set_property(obj, Rc::from(key), value)
            }
            Place::Index(other, _) => Err(fail(format!(
                "cannot assign by index into {}",
                other.type_name()
            ))),
        }
    }

    fn set_property(&mut self, obj: &Value, name: Rc<str>, value: Value) -> Exec<()> {
        match obj {
            Value::Object(o) => {
                let key_len = name.len();
                if o.borrow_mut().set(name, value) {
                    self.charge(32 + key_len)?;
                }
                Ok(())
            }
            other => Err(fail(format!(
                "cannot set property '{name}' on {}",
                other.type_name()
            ))),
        }
    }
}

enum Place {
    Name(Rc<str>),
    Member(Value, Rc<str>),
    Index(Value, Value),
}

/// A non-negative integral index, if `v` is one.
fn array_index(v: &Value) -> Option<usize> {
    let n = match v {
        Value::Num(n) => *n,
        Value::Str(s) => crate::script::value::parse_number(s),
        _ => return None,
    };
    (n >= 0.0 && n.fract() == 0.0 && n < MAX_ARRAY_LEN as f64 * 2.0).then_some(n as usize)
}

#[cfg(test)]
#[path = "../../tests/unit/script/interp.rs"]
mod tests;

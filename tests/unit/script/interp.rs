use crate::draw::Shape;
use crate::foundation::core::Canvas;
use crate::foundation::error::{ExecFailure, SketchError};
use crate::foundation::limits::Limits;
use crate::sandbox::execute;

/// Run a script and collect the content of every `text()` it emitted.
fn run(src: &str) -> Result<Vec<String>, SketchError> {
    let ctx = execute(src, Canvas::default(), 7, &Limits::default())?;
    Ok(ctx
        .elements()
        .iter()
        .filter_map(|e| match &e.shape {
            Shape::Text { content, .. } => Some(content.clone()),
            _ => None,
        })
        .collect())
}

fn out(src: &str) -> Vec<String> {
    run(src).unwrap()
}

fn script_error(src: &str) -> String {
    match run(src) {
        Err(SketchError::Execution(ExecFailure::Script(m))) => m,
        other => panic!("expected script error, got {other:?}"),
    }
}

fn resource_error(src: &str) -> String {
    match run(src) {
        Err(SketchError::Execution(ExecFailure::ResourceLimit(m))) => m,
        other => panic!("expected resource error, got {other:?}"),
    }
}

#[test]
fn arithmetic() {
    assert_eq!(
        out("text(1 + 2 * 3, 0, 0); text(2 ** 10, 0, 0); text(7 % 3, 0, 0); text(-2 ** 2, 0, 0)"),
        ["7", "1024", "1", "-4"]
    );
    assert_eq!(
        out("text(0.1 + 0.2, 0, 0); text(1 / 0, 0, 0); text(0 / 0, 0, 0)"),
        ["0.30000000000000004", "Infinity", "NaN"]
    );
}

#[test]
fn string_concatenation_is_left_to_right() {
    assert_eq!(
        out(r#"text("a" + 1 + 2, 0, 0); text(1 + 2 + "a", 0, 0); text("n=" + [1, 2], 0, 0)"#),
        ["a12", "3a", "n=1,2"]
    );
}

#[test]
fn block_scoping() {
    assert_eq!(
        out("let x = 1; { let x = 2; text(x, 0, 0) } text(x, 0, 0)"),
        ["2", "1"]
    );
}

#[test]
fn const_cannot_be_reassigned() {
    assert_eq!(
        script_error("const c = 1; c = 2"),
        "line 1, column 14: assignment to constant variable 'c'"
    );
}

#[test]
fn recursion_and_hoisting() {
    assert_eq!(
        out("text(fib(15), 0, 0)\nfunction fib(n) { return n < 2 ? n : fib(n - 1) + fib(n - 2) }"),
        ["610"]
    );
}

#[test]
fn functions_do_not_close_over_enclosing_locals() {
    let msg = script_error(
        "function outer() {\n  let secret = 1\n  function inner() { return secret }\n  return inner()\n}\nouter()",
    );
    assert_eq!(msg, "line 3, column 22: secret is not defined");
}

#[test]
fn functions_see_and_create_globals() {
    assert_eq!(
        out("let g = 5\nfunction f() { g = g + 1; h = 10 }\nf()\ntext(g, 0, 0)\ntext(h, 0, 0)"),
        ["6", "10"]
    );
}

#[test]
fn var_is_function_scoped() {
    assert_eq!(
        out("function f() { if (true) { var v = 3 } return v }\ntext(f(), 0, 0)"),
        ["3"]
    );
    assert_eq!(
        out("{ var g = 1 }\nfunction h() { return g }\ntext(h(), 0, 0)"),
        ["1"]
    );
}

#[test]
fn loops_with_break_and_continue() {
    assert_eq!(
        out("let s = 0\nfor (let i = 0; i < 10; i++) { if (i == 3) continue; if (i == 6) break; s += i }\ntext(s, 0, 0)"),
        ["12"]
    );
    assert_eq!(out("let n = 0; while (n < 5) n++; text(n, 0, 0)"), ["5"]);
}

#[test]
fn for_of_over_arrays_and_strings() {
    assert_eq!(
        out(r#"for (const v of [1, 2, 3]) text(v * 2, 0, 0); for (let c of "ab") text(c, 0, 0)"#),
        ["2", "4", "6", "a", "b"]
    );
    assert!(script_error("for (const v of 3) {}").contains("number is not iterable"));
}

#[test]
fn arrays() {
    assert_eq!(
        out(
            "let a = [1, 2]\na.push(3)\na[5] = 9\n\
             text(a.length, 0, 0)\ntext(a, 0, 0)\ntext(a.pop(), 0, 0)\n\
             text(a.indexOf(2), 0, 0)\ntext(a.includes(7), 0, 0)\n\
             text(a.slice(1, 3).join('-'), 0, 0)"
        ),
        ["6", "1,2,3,,,9", "9", "1", "false", "2-3"]
    );
    assert!(script_error("let a = []; a[-1] = 2").contains("non-negative integer"));
}

#[test]
fn objects() {
    assert_eq!(
        out(
            "let p = { x: 1, y: 2 }\np.x += 10\np['z'] = 3\n\
             text(p.x + p.y + p.z, 0, 0)\ntext(JSON.stringify(p), 0, 0)\ntext(p.missing, 0, 0)"
        ),
        ["16", r#"{"x":11,"y":2,"z":3}"#, "undefined"]
    );
    assert!(script_error("let u; u.x").contains("cannot read property 'x' of undefined"));
}

#[test]
fn objects_with_many_keys_stay_fast_and_ordered() {
    assert_eq!(
        out(
            "let o = {}\nfor (let i = 0; i < 100000; i++) o['k' + i] = i\n\
             o.k0 = -1\ntext(o.k99999, 0, 0)\ntext(o.k0, 0, 0)\n\
             text(JSON.stringify({ b: 1, a: 2, b: 3 }), 0, 0)"
        ),
        ["99999", "-1", r#"{"b":3,"a":2}"#]
    );
}

#[test]
fn function_values() {
    assert_eq!(
        out(
            "let add = function (a, b) { return a + b }\nlet o = { f: function (x) { return x * 2 } }\n\
             text(add(2, 3), 0, 0)\ntext(o.f(4), 0, 0)\nlet s = Math.sqrt\ntext(s(9), 0, 0)"
        ),
        ["5", "8", "3"]
    );
}

#[test]
fn setup_then_draw() {
    assert_eq!(
        out(r#"let log = []
function draw() { log.push("d"); text(log.join(""), 0, 0) }
function setup() { log.push("s") }
log.push("t")"#),
        ["tsd"]
    );
}

#[test]
fn update_expressions() {
    assert_eq!(
        out("let i = 5; text(i++, 0, 0); text(++i, 0, 0); let a = [1]; a[0]--; text(a[0], 0, 0)"),
        ["5", "7", "0"]
    );
}

#[test]
fn logical_operators_short_circuit() {
    assert_eq!(
        out(r#"let calls = 0
function f() { calls++; return true }
false && f(); true || f()
text(calls, 0, 0); text(null || "d", 0, 0); text(0 && 1, 0, 0)"#),
        ["0", "d", "0"]
    );
}

#[test]
fn equality() {
    assert_eq!(
        out(r#"text(1 == "1", 0, 0); text(1 === "1", 0, 0); text(null == undefined, 0, 0); text([] == [], 0, 0); text("b" > "a", 0, 0)"#),
        ["true", "false", "true", "false", "true"]
    );
}

#[test]
fn number_methods() {
    assert_eq!(out("text((3.14159).toFixed(2), 0, 0)"), ["3.14"]);
}

#[test]
fn unknown_names_and_non_functions() {
    assert_eq!(
        script_error("let a = 1\nfoo(a)"),
        "line 2, column 1: foo is not defined"
    );
    assert!(script_error("let x = 3; x()").contains("x is not a function (it is number)"));
    assert!(script_error("[1].map(1)").contains("array.map is not a function"));
}

#[test]
fn builtins_are_read_only_but_shadowable() {
    assert!(script_error("width = 5").contains("cannot assign to read-only 'width'"));
    assert!(script_error("PI = 3").contains("read-only 'PI'"));
    assert_eq!(out("let scale = 2; text(scale, 0, 0)"), ["2"]);
}

#[test]
fn stray_break_is_an_error() {
    assert!(script_error("break").contains("outside of a loop"));
    assert!(script_error("function f() { continue }\nf()").contains("outside of a loop"));
}

#[test]
fn runaway_recursion_hits_depth_ceiling() {
    assert!(resource_error("function f() { return f() }\nf()").contains("nested deeper"));
}

#[test]
fn deeply_nested_data_is_fine() {
    assert_eq!(
        out("let a = []\nfor (let i = 0; i < 100000; i++) a = [a]\ntext('ok', 0, 0)"),
        ["ok"]
    );
}

#[test]
fn string_growth_is_capped() {
    assert!(resource_error("let s = 'x'\nwhile (true) s = s + s").contains("string longer than"));
}

#[test]
fn allocation_is_budgeted() {
    assert!(
        resource_error("let keep = []\nfor (let i = 0; i < 100; i++) keep.push(Array(1000000))")
            .contains("allocated more than")
    );
    assert!(script_error("Array(1000001)").contains("invalid array length 1000001"));
    assert!(resource_error("let a = []; a[1500000] = 1").contains("array longer than"));
}

#[test]
fn cyclic_structures_do_not_hang() {
    assert_eq!(out("let a = [1]; a.push(a); text(a, 0, 0)").len(), 1);
    assert!(resource_error("let a = []; a.push(a); JSON.stringify(a)").contains("cyclic"));
}

use super::*;
use crate::svg::compile_document;

fn limits(f: impl FnOnce(&mut Limits)) -> Limits {
    let mut l = Limits::default();
    f(&mut l);
    l
}

fn run(src: &str, seed: u32, limits: &Limits) -> SketchResult<DrawingContext> {
    execute(src, Canvas::default(), seed, limits)
}

fn svg_of(src: &str, seed: u32) -> String {
    let ctx = run(src, seed, &Limits::default()).unwrap();
    let (canvas, elements) = ctx.into_parts();
    compile_document(canvas, &elements).svg
}

#[test]
fn syntax_errors_carry_position() {
    let err = run("let a = 1\nlet = 2", 0, &Limits::default()).unwrap_err();
    match err {
        SketchError::Execution(ExecFailure::Syntax(msg)) => {
            assert!(msg.starts_with("line 2, column 5:"), "{msg}");
        }
        other => panic!("expected syntax error, got {other:?}"),
    }
}

#[test]
fn runtime_errors_carry_position() {
    let err = run("background(0)\n\n  nope()", 0, &Limits::default()).unwrap_err();
    match err {
        SketchError::Execution(ExecFailure::Script(msg)) => {
            assert_eq!(msg, "line 3, column 3: nope is not defined");
        }
        other => panic!("expected script error, got {other:?}"),
    }
}

#[test]
fn infinite_loop_times_out() {
    let l = limits(|l| l.timeout_ms = 50);
    let err = run("while (true) {}", 0, &l).unwrap_err();
    assert!(matches!(err, SketchError::ExecutionTimeout { limit_ms: 50 }));
}

#[test]
fn draw_is_covered_by_the_deadline() {
    let l = limits(|l| l.timeout_ms = 200);
    let err = run("function draw() { for (;;) {} }", 0, &l).unwrap_err();
    assert!(matches!(err, SketchError::ExecutionTimeout { .. }));
}

#[test]
fn element_limit_is_enforced() {
    let l = limits(|l| l.max_elements = 5);
    let err = run("for (let i = 0; i < 6; i++) rect(i, 0, 1, 1)", 0, &l).unwrap_err();
    assert!(matches!(
        err,
        SketchError::Execution(ExecFailure::ElementLimit { limit: 5 })
    ));

    let ok = run("for (let i = 0; i < 5; i++) rect(i, 0, 1, 1)", 0, &l).unwrap();
    assert_eq!(ok.elements().len(), 5);
}

#[test]
fn default_element_limit() {
    let err = run(
        "for (let i = 0; i < 10001; i++) point(i, i)",
        0,
        &Limits::default(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        SketchError::Execution(ExecFailure::ElementLimit { limit: 10_000 })
    ));
}

#[test]
fn same_seed_same_output() {
    let src = "background(220)\nfor (let i = 0; i < 20; i++) circle(random(400), random(400), 5 + noise(i * 0.1) * 20)";
    assert_eq!(svg_of(src, 42), svg_of(src, 42));
    assert_ne!(svg_of(src, 42), svg_of(src, 43));
}

#[test]
fn runs_are_isolated() {
    let first = run("counter = 1\ntext(counter, 0, 0)", 0, &Limits::default()).unwrap();
    let second = run("text(counter, 0, 0)", 0, &Limits::default());
    assert_eq!(first.elements().len(), 1);
    assert!(second.is_err());
}

#[test]
fn deep_nesting_is_rejected_not_fatal() {
    let deep = format!("let x = {}1{}", "(".repeat(5000), ")".repeat(5000));
    let err = run(&deep, 0, &Limits::default()).unwrap_err();
    assert!(matches!(err, SketchError::Execution(ExecFailure::Syntax(_))));

    let fine = format!("let x = {}1{}", "(".repeat(200), ")".repeat(200));
    assert!(run(&fine, 0, &Limits::default()).is_ok());
}

#[test]
fn state_persists_into_setup_and_draw() {
    let ctx = run(
        "fill(10)\nfunction setup() { createCanvas(50, 60) }\nfunction draw() { rect(0, 0, width, height) }",
        0,
        &Limits::default(),
    )
    .unwrap();
    assert_eq!(ctx.canvas(), Canvas::clamped(50, 60));
    let el = &ctx.elements()[0];
    assert_eq!(el.style.fill.as_deref(), Some("rgb(10,10,10)"));
    assert!(matches!(el.shape, crate::draw::Shape::Rect { w, h, .. } if w == 50.0 && h == 60.0));
}

const MEGABYTE_STRING: &str = "let s = 'x'\nfor (let i = 0; i < 20; i++) s = s + s\n";

fn assert_bounded(err: &SketchError) {
    assert!(
        matches!(
            err,
            SketchError::ExecutionTimeout { .. }
                | SketchError::Execution(ExecFailure::ResourceLimit(_))
        ),
        "{err:?}"
    );
}

#[test]
fn stringify_of_shared_subtrees_is_bounded() {
    let l = limits(|l| l.timeout_ms = 50);
    let started = std::time::Instant::now();
    let err = run(
        "let a = [1]\nfor (let i = 0; i < 22; i++) a = [a, a]\nJSON.stringify(a)",
        0,
        &l,
    )
    .unwrap_err();
    assert!(started.elapsed() < std::time::Duration::from_secs(2));
    assert_bounded(&err);
}

#[test]
fn repeated_text_is_charged_against_the_heap() {
    let src = format!("{MEGABYTE_STRING}for (let i = 0; i < 200; i++) text(s, 0, 0)");
    let err = run(&src, 0, &Limits::default()).unwrap_err();
    match err {
        SketchError::Execution(ExecFailure::ResourceLimit(msg)) => {
            assert!(msg.contains("64 MiB"), "{msg}");
        }
        other => panic!("expected resource limit, got {other:?}"),
    }
}

#[test]
fn oversized_style_strings_are_rejected() {
    let long = "let c = ''\nfor (let i = 0; i < 300; i++) c += 'a'\n";
    for call in ["fill(c)", "stroke(c)", "background(c)", "textFont(c)"] {
        let err = run(&format!("{long}{call}"), 0, &Limits::default()).unwrap_err();
        assert!(
            matches!(err, SketchError::Execution(ExecFailure::ResourceLimit(_))),
            "{call}: {err:?}"
        );
    }
}

#[test]
fn scanning_a_large_string_respects_the_deadline() {
    let l = limits(|l| l.timeout_ms = 50);
    let started = std::time::Instant::now();
    for body in ["n += s.length", "n += s[s.length - 1].length"] {
        let src = format!("{MEGABYTE_STRING}let n = 0\nfor (let i = 0; i < 100000; i++) {body}");
        let err = run(&src, 0, &l).unwrap_err();
        assert!(matches!(err, SketchError::ExecutionTimeout { limit_ms: 50 }), "{err:?}");
    }
    assert!(started.elapsed() < std::time::Duration::from_secs(2));
}

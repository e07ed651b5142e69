use super::*;
use crate::foundation::error::ExecFailure;

fn seeded(seed: u64) -> RenderOpts {
    RenderOpts {
        seed: Some(seed),
        ..RenderOpts::default()
    }
}

#[test]
fn defaults() {
    let opts = RenderOpts::default();
    assert_eq!((opts.width, opts.height), (400, 400));
    assert_eq!(opts.seed, None);
    assert_eq!(opts.limits, Limits::default());
}

#[test]
fn wide_seeds_truncate_to_32_bits() {
    assert_eq!(seeded(0x1_0000_0007).resolved_seed(), 7);
    let src = "text(random(), 0, 0)";
    assert_eq!(
        compile_sketch(src, &seeded(0x1_0000_0007)).unwrap(),
        compile_sketch(src, &seeded(7)).unwrap()
    );
}

#[test]
fn oversized_source_is_rejected_before_execution() {
    let big = format!("// {}\nwhile (true) {{}}", "x".repeat(51_200));
    let err = compile_sketch(&big, &seeded(1)).unwrap_err();
    assert!(matches!(
        err,
        SketchError::InputTooLarge {
            limit: 51_200,
            ..
        }
    ));
}

#[test]
fn guard_runs_before_the_sandbox() {
    // The guard fires even though the script would also fail to parse.
    let err = compile_sketch("process.exit(", &seeded(1)).unwrap_err();
    assert!(matches!(
        err,
        SketchError::ForbiddenConstruct { token: "process." }
    ));
}

#[test]
fn canvas_is_clamped_from_options_and_script() {
    let opts = RenderOpts {
        width: 0,
        height: 100_000,
        ..seeded(1)
    };
    let doc = compile_sketch("", &opts).unwrap();
    assert_eq!((doc.canvas.width, doc.canvas.height), (1, 4096));

    let doc = compile_sketch("createCanvas(100000, 100000)", &seeded(1)).unwrap();
    assert_eq!((doc.canvas.width, doc.canvas.height), (4096, 4096));
    let doc = compile_sketch("createCanvas(0, 0)", &seeded(1)).unwrap();
    assert_eq!((doc.canvas.width, doc.canvas.height), (1, 1));
}

#[test]
fn execution_errors_pass_through() {
    let err = compile_sketch("rect(", &seeded(1)).unwrap_err();
    assert!(matches!(err, SketchError::Execution(ExecFailure::Syntax(_))));
}

#[test]
fn blocking_render_produces_png() {
    let png = render_sketch_blocking("background(255, 0, 0)", &seeded(3)).unwrap();
    assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
}

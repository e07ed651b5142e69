use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use sha2::Digest as _;

#[derive(Parser, Debug)]
#[command(name = "sketchbox", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a sketch and write the rasterized PNG.
    Render(SketchArgs),
    /// Run a sketch and write the SVG document without rasterizing.
    Svg(SketchArgs),
}

#[derive(Args, Debug)]
struct SketchArgs {
    /// Input sketch script.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output path.
    #[arg(long)]
    out: PathBuf,

    /// Initial canvas width in pixels.
    #[arg(long, default_value_t = sketchbox::DEFAULT_CANVAS_DIM)]
    width: u32,

    /// Initial canvas height in pixels.
    #[arg(long, default_value_t = sketchbox::DEFAULT_CANVAS_DIM)]
    height: u32,

    /// Seed for `random()` and `noise()`. Omit for a clock-derived seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Resource limits as a JSON file (missing fields keep their defaults).
    #[arg(long)]
    limits: Option<PathBuf>,

    /// Execution timeout in milliseconds. Overrides the limits file.
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Print the SHA-256 of the written bytes.
    #[arg(long)]
    digest: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args).await,
        Command::Svg(args) => cmd_svg(args),
    }
}

fn read_limits(path: &Path) -> anyhow::Result<sketchbox::Limits> {
    let f = File::open(path).with_context(|| format!("open limits '{}'", path.display()))?;
    let limits = serde_json::from_reader(BufReader::new(f)).with_context(|| "parse limits JSON")?;
    Ok(limits)
}

fn load(args: &SketchArgs) -> anyhow::Result<(String, sketchbox::RenderOpts)> {
    let code = std::fs::read_to_string(&args.in_path)
        .with_context(|| format!("read sketch '{}'", args.in_path.display()))?;

    let mut limits = match &args.limits {
        Some(p) => read_limits(p)?,
        None => sketchbox::Limits::default(),
    };
    if let Some(ms) = args.timeout_ms {
        limits.timeout_ms = ms;
    }

    let opts = sketchbox::RenderOpts {
        width: args.width,
        height: args.height,
        seed: args.seed,
        limits,
    };
    Ok((code, opts))
}

fn write_output(args: &SketchArgs, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, bytes)
        .with_context(|| format!("write '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    if args.digest {
        println!("{}", sha256_hex(bytes));
    }
    Ok(())
}

async fn cmd_render(args: SketchArgs) -> anyhow::Result<()> {
    let (code, opts) = load(&args)?;
    let png = sketchbox::render_sketch(&code, opts).await?;
    write_output(&args, &png)
}

fn cmd_svg(args: SketchArgs) -> anyhow::Result<()> {
    let (code, opts) = load(&args)?;
    let doc = sketchbox::compile_sketch(&code, &opts)?;
    write_output(&args, doc.svg.as_bytes())
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = sha2::Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        out.push_str(&format!("{:02x}", b));
    }
    out
}

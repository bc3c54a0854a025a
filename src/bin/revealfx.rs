use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "revealfx", version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one tick of every stage instance to PNGs.
    Frame(FrameArgs),
    /// Render successive ticks of every stage instance to numbered PNGs.
    Sequence(SequenceArgs),
    /// Print the marker and trail for one progress value as JSON.
    Trace(TraceArgs),
}

#[derive(Parser, Debug)]
struct StageArgs {
    /// Stage description JSON.
    #[arg(long)]
    config: PathBuf,

    /// Frame source as `name=image.png`; repeatable.
    #[arg(long = "source", value_parser = parse_source)]
    sources: Vec<(String, PathBuf)>,

    /// Output directory.
    #[arg(long)]
    out_dir: PathBuf,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    stage: StageArgs,

    /// Milliseconds after start.
    #[arg(long, default_value_t = 0.0)]
    at_ms: f64,
}

#[derive(Parser, Debug)]
struct SequenceArgs {
    #[command(flatten)]
    stage: StageArgs,

    /// Ticks per second.
    #[arg(long, default_value_t = 30.0)]
    fps: f64,

    /// Number of ticks to render.
    #[arg(long, default_value_t = 90)]
    frames: u32,
}

#[derive(Parser, Debug)]
struct TraceArgs {
    /// JSON array of vertices, as `[x, y]` pairs or `{"x": .., "y": ..}` objects.
    #[arg(long)]
    vertices: PathBuf,

    /// Normalized progress along the boundary.
    #[arg(long)]
    progress: f64,

    /// Trail length as a fraction of the loop.
    #[arg(long)]
    trail: Option<f64>,

    /// Trail resolution.
    #[arg(long, default_value_t = 32)]
    samples: u32,
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum VertexInput {
    Pair(f64, f64),
    Point(revealfx::Point),
}

#[derive(serde::Serialize)]
struct TraceOut<'a> {
    name: &'a str,
    #[serde(flatten)]
    frame: &'a revealfx::TraceFrame,
    svg_path: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Sequence(args) => cmd_sequence(args),
        Command::Trace(args) => cmd_trace(args),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_source(s: &str) -> Result<(String, PathBuf), String> {
    match s.split_once('=') {
        Some((name, path)) if !name.is_empty() && !path.is_empty() => {
            Ok((name.to_string(), PathBuf::from(path)))
        }
        _ => Err(format!("expected name=path, got '{s}'")),
    }
}

fn prepare_stage(args: &StageArgs) -> anyhow::Result<(revealfx::Stage, revealfx::SourceTable)> {
    let cfg = revealfx::StageConfig::from_path(&args.config)?;
    let stage = revealfx::Stage::from_config(&cfg);
    for s in stage.skipped() {
        eprintln!("skipped '{}': {}", s.name, s.reason);
    }

    let mut table = revealfx::SourceTable::new();
    for (name, path) in &args.sources {
        let img = revealfx::load_image(path)?;
        table.insert(name.clone(), Box::new(revealfx::StaticImage::new(img)));
    }

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;
    Ok((stage, table))
}

fn write_png(path: &Path, surface: &revealfx::Surface) -> anyhow::Result<()> {
    image::save_buffer_with_format(
        path,
        &surface.to_straight_rgba8(),
        surface.width(),
        surface.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))
}

fn write_outputs(
    stage: &revealfx::Stage,
    frame: &revealfx::StageFrame,
    out_dir: &Path,
    suffix: &str,
) -> anyhow::Result<()> {
    for inst in stage.effects() {
        let surface = inst.surface();
        if surface.is_empty() {
            tracing::warn!(name = inst.name(), "no source frame yet; nothing to write");
            continue;
        }
        write_png(&out_dir.join(format!("{}{suffix}.png", inst.name())), surface)?;
    }

    if !frame.traces.is_empty() {
        let out: Vec<TraceOut<'_>> = frame
            .traces
            .iter()
            .map(|(name, tf)| TraceOut {
                name,
                frame: tf,
                svg_path: tf.to_svg_path(),
            })
            .collect();
        let path = out_dir.join(format!("traces{suffix}.json"));
        let f = File::create(&path).with_context(|| format!("create '{}'", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(f), &out)
            .with_context(|| format!("write '{}'", path.display()))?;
    }
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let (mut stage, table) = prepare_stage(&args.stage)?;
    stage.start(0.0);
    let frame = stage.tick(args.at_ms, &table);
    for (name, outcome) in &frame.effects {
        tracing::info!(name = name.as_str(), ?outcome, "rendered");
    }
    write_outputs(&stage, &frame, &args.stage.out_dir, "")?;
    eprintln!("wrote {}", args.stage.out_dir.display());
    Ok(())
}

fn cmd_sequence(args: SequenceArgs) -> anyhow::Result<()> {
    if !args.fps.is_finite() || args.fps <= 0.0 {
        anyhow::bail!("--fps must be finite and > 0");
    }
    let (mut stage, table) = prepare_stage(&args.stage)?;
    let step_ms = 1000.0 / args.fps;
    stage.start(0.0);
    for i in 0..args.frames {
        let frame = stage.tick(f64::from(i) * step_ms, &table);
        write_outputs(&stage, &frame, &args.stage.out_dir, &format!("_{i:05}"))?;
    }
    eprintln!(
        "wrote {} ticks to {}",
        args.frames,
        args.stage.out_dir.display()
    );
    Ok(())
}

fn cmd_trace(args: TraceArgs) -> anyhow::Result<()> {
    let f = File::open(&args.vertices)
        .with_context(|| format!("open vertices '{}'", args.vertices.display()))?;
    let raw: Vec<VertexInput> =
        serde_json::from_reader(BufReader::new(f)).with_context(|| "parse vertices JSON")?;
    let vertices = raw
        .into_iter()
        .map(|v| match v {
            VertexInput::Pair(x, y) => revealfx::Point::new(x, y),
            VertexInput::Point(p) => p,
        })
        .collect();

    let opts = revealfx::TraceOpts {
        trail_fraction: args.trail.unwrap_or(0.0),
        trail_samples: args.samples,
    };
    let tracer = revealfx::PathTracer::with_polygon(opts, vertices)?;
    let marker = tracer
        .point_at_progress(args.progress)
        .context("tracer has no polygon")?;
    let trail = if args.trail.is_some() {
        tracer.gradient_trail(args.progress)
    } else {
        Vec::new()
    };
    let frame = revealfx::TraceFrame {
        progress: revealfx::wrap01(args.progress),
        marker,
        trail,
    };
    let out = TraceOut {
        name: "trace",
        frame: &frame,
        svg_path: frame.to_svg_path(),
    };
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

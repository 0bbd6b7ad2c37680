use std::{
    cell::Cell,
    path::{Path, PathBuf},
    rc::Rc,
    task::Poll,
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use fancy_captions::{
    BackendService, CaptionConfig, CaptionError, CaptionGenerator, CpuSurface, CpuTextBackend,
    DrawStatus, HighlightLevel, Interpolation, ProgressTimeline, Rgba8, StyleKind, TextStyleSpec,
    Timeline, Transcript, interpolate, parse_transcript_json,
};

const BACKGROUND: Rgba8 = Rgba8::opaque(18, 20, 28);

#[derive(Parser, Debug)]
#[command(name = "captions", version)]
struct Cli {
    /// Log at debug level.
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the caption at one time as a PNG.
    Frame(FrameArgs),
    /// Render a PNG sequence sampled at a fixed frame rate.
    Frames(FramesArgs),
}

#[derive(Args, Debug)]
struct CaptionArgs {
    /// Transcript JSON (scene groups or `{"words": [...]}`).
    #[arg(long)]
    transcript: PathBuf,

    /// TTF/OTF font file used for both text styles.
    #[arg(long)]
    font: PathBuf,

    /// Caption configuration JSON. Defaults to the transcript's time range.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Highlight style: `opacity` or `highlight`.
    #[arg(long)]
    style: Option<StyleKind>,

    /// Highlight level: `object`, `line` or `word`.
    #[arg(long)]
    level: Option<HighlightLevel>,

    /// Active word growth: `linear` or `stepped`.
    #[arg(long)]
    interpolation: Option<Interpolation>,

    /// Font size in pixels.
    #[arg(long, default_value_t = 32.0)]
    font_size: f64,

    /// Output height in pixels. The width follows the configured container width.
    #[arg(long, default_value_t = 160)]
    height: u32,

    /// Flatten frames over an opaque dark background.
    #[arg(long)]
    opaque: bool,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    caption: CaptionArgs,

    /// Playback time in milliseconds.
    #[arg(long)]
    time: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct FramesArgs {
    #[command(flatten)]
    caption: CaptionArgs,

    /// Output directory for `frame_NNNNN.png` files.
    #[arg(long)]
    out_dir: PathBuf,

    /// Frames per second.
    #[arg(long, default_value_t = 30.0)]
    fps: f64,

    /// Length of the sequence. Longer than the caption range loops back to its start.
    #[arg(long)]
    duration_ms: Option<f64>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();

    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Frames(args) => cmd_frames(args),
    }
}

fn read_transcript(path: &Path) -> anyhow::Result<Transcript> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("open transcript '{}'", path.display()))?;
    parse_transcript_json(&json).with_context(|| format!("parse transcript '{}'", path.display()))
}

fn read_config(args: &CaptionArgs, transcript: &Transcript) -> anyhow::Result<CaptionConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("open config '{}'", path.display()))?;
            CaptionConfig::from_json(&json)
                .with_context(|| format!("parse config '{}'", path.display()))?
        }
        None => CaptionConfig::spanning(transcript),
    };
    if let Some(style) = args.style {
        config.fancy_style.style = style;
    }
    if let Some(level) = args.level {
        config.fancy_style.level = level;
    }
    if let Some(interpolation) = args.interpolation {
        config.fancy_style.interpolation = interpolation;
    }
    config.validate()?;
    Ok(config)
}

/// Backend service that registers the font on first poll.
fn make_service(
    font_bytes: Vec<u8>,
    font_size: f64,
    style: StyleKind,
) -> BackendService<CpuTextBackend> {
    let normal_color = match style {
        StyleKind::Opacity => Rgba8::WHITE.with_alpha(110),
        StyleKind::Highlight => Rgba8::WHITE,
    };
    let normal = TextStyleSpec::new(font_size, normal_color);
    let highlight = TextStyleSpec::new(font_size, Rgba8::WHITE);

    let mut font_bytes = Some(font_bytes);
    BackendService::loading(move || {
        Poll::Ready(match font_bytes.take() {
            Some(bytes) => CpuTextBackend::new(bytes, normal, highlight),
            None => Err(CaptionError::backend("font bytes already consumed")),
        })
    })
}

fn make_generator(
    args: &CaptionArgs,
) -> anyhow::Result<(CaptionGenerator<CpuTextBackend>, CpuSurface)> {
    let transcript = read_transcript(&args.transcript)?;
    let config = read_config(args, &transcript)?;
    let font_bytes = std::fs::read(&args.font)
        .with_context(|| format!("open font '{}'", args.font.display()))?;

    let width = config.width.ceil().max(1.0) as u32;
    let surface = CpuSurface::new(width, args.height)?;
    let service = make_service(font_bytes, args.font_size, config.fancy_style.style);
    tracing::info!(
        words = transcript.len(),
        start = config.start_time,
        end = config.end_time,
        style = config.fancy_style.style.as_str(),
        level = config.fancy_style.level.as_str(),
        interpolation = config.fancy_style.interpolation.as_str(),
        "caption generator ready"
    );
    let generator = CaptionGenerator::new(transcript, config, service)?;
    Ok((generator, surface))
}

fn write_png(path: &Path, surface: &CpuSurface, opaque: bool) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let frame = surface
        .readback(opaque.then_some(BACKGROUND))
        .into_unpremultiplied();
    image::save_buffer_with_format(
        path,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let clock = Timeline::new();
    let (mut generator, mut surface) = make_generator(&args.caption)?;

    generator.set_current_time(args.time)?;
    let status = generator.draw(&mut surface)?;
    if status != DrawStatus::Drawn {
        tracing::warn!(time = args.time, ?status, "no caption drawn at this time");
    }

    write_png(&args.out, &surface, args.caption.opaque)?;
    tracing::info!(elapsed_ms = clock.current_time(), "frame rendered");
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_frames(args: FramesArgs) -> anyhow::Result<()> {
    anyhow::ensure!(
        args.fps.is_finite() && args.fps > 0.0,
        "fps must be finite and > 0"
    );
    let clock = Timeline::new();
    let (mut generator, mut surface) = make_generator(&args.caption)?;

    let (start, end) = (generator.config().start_time, generator.config().end_time);
    let range = (end - start).max(1.0);
    let duration = args.duration_ms.unwrap_or(range);
    anyhow::ensure!(
        duration.is_finite() && duration > 0.0,
        "duration must be finite and > 0"
    );

    let loops = Rc::new(Cell::new(0u32));
    let mut progress = ProgressTimeline::new(0.0, range)?.looping(true).on_loop({
        let loops = Rc::clone(&loops);
        move || loops.set(loops.get() + 1)
    });

    let frame_count = (duration / 1000.0 * args.fps).ceil() as u64;
    let mut drawn = 0u64;
    for index in 0..frame_count {
        let t = index as f64 * 1000.0 / args.fps;
        let time = interpolate(start, end, progress.value(t));
        generator.set_current_time(time)?;

        let path = args.out_dir.join(format!("frame_{index:05}.png"));
        if generator.draw(&mut surface)? == DrawStatus::Drawn {
            drawn += 1;
            write_png(&path, &surface, args.caption.opaque)?;
        } else {
            let blank = CpuSurface::new(surface.width(), surface.height())?;
            write_png(&path, &blank, args.caption.opaque)?;
        }
    }

    let stats = generator.stats();
    tracing::info!(
        frames = frame_count,
        drawn,
        loops = loops.get(),
        builds = stats.builds,
        handles_released = stats.handles_released,
        elapsed_ms = clock.current_time(),
        "sequence rendered"
    );
    eprintln!("wrote {} frames to {}", frame_count, args.out_dir.display());
    Ok(())
}

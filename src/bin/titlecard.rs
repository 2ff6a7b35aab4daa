use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

use titlecard::{
    BlockGlyphs, CancelToken, Canvas, CaptureOpts, FfmpegSink, FfmpegSinkOpts, FontBook,
    FrameIndex, GlyphSource, IntervalTicks, Layout, PlaybackController, PngSequenceSink,
    RenderEngine, RunOutcome, SeededGrain, Settings, SettingsUpdate,
};

#[derive(Parser, Debug)]
#[command(name = "titlecard", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Capture every frame to MP4/GIF (requires `ffmpeg` on PATH) or a PNG directory.
    Export(ExportArgs),
    /// Play the animation in realtime, printing progress to stderr.
    Play(PlayArgs),
    /// List the built-in style presets.
    Presets,
}

#[derive(Args, Debug)]
struct StyleArgs {
    /// Settings JSON (camelCase fields, all optional).
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Apply a named preset on top of the settings file.
    #[arg(long)]
    preset: Option<String>,

    /// Character name.
    #[arg(long)]
    name: Option<String>,

    /// `pieces` or `line`.
    #[arg(long)]
    layout: Option<Layout>,

    /// Frames per second.
    #[arg(long)]
    fps: Option<u32>,

    /// Duration in seconds.
    #[arg(long)]
    duration: Option<f64>,

    /// Canvas width in pixels.
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Canvas height in pixels.
    #[arg(long, default_value_t = 720)]
    height: u32,

    /// Font file to register (repeatable). Without any, a built-in block face is used.
    #[arg(long = "font")]
    fonts: Vec<PathBuf>,

    /// Seed for the grain effect; makes grain reproducible.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    style: StyleArgs,

    /// Frame index (0-based, clamped to the last frame).
    #[arg(long)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[command(flatten)]
    style: StyleArgs,

    /// Output `.mp4`/`.gif` file, or a directory for a PNG sequence.
    /// Defaults to `<NAME>_returning.gif` in the current directory.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Fail instead of replacing an existing `.mp4`/`.gif` output.
    #[arg(long)]
    no_overwrite: bool,
}

#[derive(Args, Debug)]
struct PlayArgs {
    #[command(flatten)]
    style: StyleArgs,

    /// Display refresh rate for ticks.
    #[arg(long, default_value_t = 60)]
    refresh_hz: u32,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Export(args) => cmd_export(args),
        Command::Play(args) => cmd_play(args),
        Command::Presets => cmd_presets(),
    }
}

fn load_settings(style: &StyleArgs) -> anyhow::Result<Settings> {
    let mut settings = match &style.settings {
        Some(path) => Settings::from_path(path)?,
        None => Settings::default(),
    };
    if let Some(name) = &style.preset {
        settings.merge(&titlecard::preset(name))?;
    }

    let mut update = SettingsUpdate::new();
    update.character_name = style.name.clone();
    update.layout = style.layout;
    update.fps = style.fps;
    update.duration = style.duration;
    settings.merge(&update)?;
    Ok(settings)
}

fn glyph_source(fonts: &[PathBuf]) -> anyhow::Result<Box<dyn GlyphSource>> {
    if fonts.is_empty() {
        tracing::warn!("no --font given, drawing text with the built-in block face");
        return Ok(Box::new(BlockGlyphs::new()));
    }
    let mut book = FontBook::new();
    for path in fonts {
        let families = book.register_font_file(path)?;
        tracing::info!(path = %path.display(), ?families, "registered font");
    }
    Ok(Box::new(book))
}

fn build_engine(style: &StyleArgs) -> anyhow::Result<RenderEngine> {
    let canvas = Canvas::new(style.width, style.height)?;
    let mut engine = RenderEngine::new(canvas, glyph_source(&style.fonts)?)?;
    if let Some(seed) = style.seed {
        engine.set_grain_source(SeededGrain::new(seed));
    }
    Ok(engine)
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let settings = load_settings(&args.style)?;
    let mut engine = build_engine(&args.style)?;
    let frame = FrameIndex(args.frame.min(settings.total_frames()));
    let rgba = engine.render(&settings, frame)?;

    titlecard::write_png(&args.out, &rgba)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let settings = load_settings(&args.style)?;
    let engine = build_engine(&args.style)?;
    let out = args.out.clone().unwrap_or_else(|| {
        PathBuf::from(titlecard::export_file_name(&settings.character_name, "gif"))
    });

    let mut controller = PlaybackController::new(engine, settings)?;
    let opts = CaptureOpts::default().on_progress(|p| {
        eprint!("\rcapturing {:>3.0}%", p * 100.0);
        let _ = std::io::stderr().flush();
    });

    let stats = if is_video_path(&out) {
        let mut sink = FfmpegSink::new(FfmpegSinkOpts {
            out_path: out.clone(),
            overwrite: !args.no_overwrite,
            bg_rgba: controller.settings().bg_color.to_rgba8(),
        })?;
        controller.export(&mut sink, opts)
    } else {
        let prefix = titlecard::export_file_name(&controller.settings().character_name, "png");
        let prefix = prefix.trim_end_matches(".png").to_owned();
        let mut sink = PngSequenceSink::new(&out, prefix);
        controller.export(&mut sink, opts)
    }
    .with_context(|| format!("export to '{}'", out.display()))?;

    eprintln!();
    eprintln!(
        "wrote {} ({} frames, {:.1} ms/frame)",
        out.display(),
        stats.frames,
        stats.frame_delay_ms
    );
    Ok(())
}

fn is_video_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("mp4") || e.eq_ignore_ascii_case("gif"))
}

fn cmd_play(args: PlayArgs) -> anyhow::Result<()> {
    let settings = load_settings(&args.style)?;
    let engine = build_engine(&args.style)?;
    let total = settings.total_frames();

    let mut controller = PlaybackController::new(engine, settings)?;
    controller.set_on_update(move |p| {
        eprint!("\r{:>5.1}% of {total} frames", p * 100.0);
        let _ = std::io::stderr().flush();
    });
    controller.set_on_complete(|| eprintln!("\ncomplete"));

    let mut ticks = IntervalTicks::from_hz(args.refresh_hz);
    // Bounded so a stalled clock cannot spin forever.
    let budget = Duration::from_secs_f64(controller.settings().duration * 2.0 + 5.0);
    let cancel = CancelToken::new();
    let watchdog = cancel.clone();
    std::thread::spawn(move || {
        std::thread::sleep(budget);
        watchdog.cancel();
    });

    match controller.run(&mut ticks, Some(&cancel))? {
        RunOutcome::Completed => Ok(()),
        other => anyhow::bail!("playback stopped early: {other:?}"),
    }
}

fn cmd_presets() -> anyhow::Result<()> {
    let mut out = std::io::stdout().lock();
    for name in titlecard::preset_names() {
        writeln!(out, "{name}")?;
    }
    Ok(())
}

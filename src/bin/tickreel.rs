use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "tickreel", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single tick as a PNG.
    Frame(FrameArgs),
    /// Record all scenes to an MP4 video (requires `ffmpeg` on PATH).
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Render config JSON. Built-in defaults when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Tick index (0-based).
    #[arg(long)]
    tick: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Font file for text, overriding the config.
    #[arg(long)]
    font: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Render config JSON. Built-in defaults when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Stop after this many ticks, overriding the config.
    #[arg(long)]
    max_ticks: Option<u64>,

    /// Never drop frames; stall rendering while the encoder catches up.
    #[arg(long)]
    no_drop: bool,

    /// Font file for text, overriding the config.
    #[arg(long)]
    font: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<tickreel::RenderConfig> {
    let cfg = match path {
        Some(p) => tickreel::RenderConfig::from_path(p)?,
        None => tickreel::RenderConfig::default(),
    };
    Ok(cfg)
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let mut cfg = load_config(args.config.as_deref())?;
    if let Some(font) = args.font {
        cfg.font_path = Some(font);
    }

    let mut session = tickreel::RenderSession::new(cfg)?;
    let frame = session.render_tick(args.tick)?;
    frame.save_png(&args.out)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut cfg = load_config(args.config.as_deref())?;
    if args.max_ticks.is_some() {
        cfg.max_ticks = args.max_ticks;
    }
    if args.no_drop {
        cfg.backpressure = tickreel::config::BackpressureConfig::Block;
    }
    if let Some(font) = args.font {
        cfg.font_path = Some(font);
    }
    cfg.validate()?;

    if !tickreel::is_ffmpeg_on_path() {
        anyhow::bail!("ffmpeg is required for `render`, but was not found on PATH");
    }

    let mut session = tickreel::RenderSession::new(cfg)?;
    let stats = session.render_to_mp4(&args.out)?;

    eprintln!(
        "wrote {} ({} ticks, {} frames dropped)",
        args.out.display(),
        stats.ticks,
        stats.pipeline.dropped
    );
    Ok(())
}

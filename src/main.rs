use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use worldview::config::ClientConfig;
use worldview::render::{PixelSurface, Renderer};
use worldview::replay::{replay, save_frames_to};
use worldview::Session;

/// Replay a recorded world server session and capture the rendered view
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Recorded server messages, one JSON object per line
    #[arg(long)]
    input: PathBuf,

    /// Output path for the final frame
    #[arg(long, default_value = "frame.png")]
    output: PathBuf,

    /// Surface width in pixels (default from config)
    #[arg(long)]
    width: Option<u32>,

    /// Surface height in pixels (default from config)
    #[arg(long)]
    height: Option<u32>,

    /// Also write one PNG per repaint into this directory
    #[arg(long)]
    every_frame: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = ClientConfig::load()?;

    let width = args.width.unwrap_or(config.surface.width);
    let height = args.height.unwrap_or(config.surface.height);
    log::info!("Replaying {} onto a {}x{} surface", args.input.display(), width, height);

    let mut session = Session::new(Renderer::new(config.render.style()));
    session.attach_surface(
        PixelSurface::new(width as usize, height as usize).with_background(config.render.background),
    );

    let file = File::open(&args.input)
        .with_context(|| format!("Failed to open {}", args.input.display()))?;
    let reader = BufReader::new(file);

    let summary = match &args.every_frame {
        Some(dir) => replay(&mut session, reader, save_frames_to(dir)?)?,
        None => replay(&mut session, reader, |_, _| Ok(()))?,
    };

    log::info!(
        "Processed {} messages ({} skipped), {} updates applied, {} repaints",
        summary.messages,
        summary.skipped,
        summary.stats.updates_applied,
        summary.stats.redraws
    );

    if summary.stats.redraws == 0 {
        log::warn!("No world size was received; the output frame is blank");
    }

    let surface = session
        .surface()
        .context("Replay surface was detached")?;
    surface.save_png(&args.output)?;
    log::info!("Frame saved to {}", args.output.display());

    Ok(())
}

//! Headless replay of a recorded message stream
//!
//! Feeds a line-delimited log of server messages through a [`Session`] backed
//! by a [`PixelSurface`], optionally capturing every repainted frame.

use std::io::BufRead;
use std::path::Path;

use anyhow::{Context, Result};

use crate::render::PixelSurface;
use crate::session::{Session, SessionStats};

/// Summary of one replay run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Non-blank lines read
    pub messages: usize,
    /// Lines that could not be decoded or applied
    pub skipped: usize,
    pub stats: SessionStats,
}

/// Replay every line of `reader` through `session`.
///
/// `on_frame` is called with the frame number and the surface after each
/// repaint. Lines that fail to decode or validate are logged and skipped.
pub fn replay<R, F>(
    session: &mut Session<PixelSurface>,
    reader: R,
    mut on_frame: F,
) -> Result<ReplaySummary>
where
    R: BufRead,
    F: FnMut(u64, &PixelSurface) -> Result<()>,
{
    let mut summary = ReplaySummary::default();

    for (index, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", index + 1))?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        summary.messages += 1;

        let redraws_before = session.stats().redraws;
        match session.on_message(line) {
            Ok(Some(request)) => {
                log::debug!("Line {}: reply would be {:?}", index + 1, request);
            }
            Ok(None) => {}
            Err(e) => {
                log::warn!("Skipping line {}: {}", index + 1, e);
                summary.skipped += 1;
                continue;
            }
        }

        let redraws = session.stats().redraws;
        if redraws > redraws_before {
            if let Some(surface) = session.surface() {
                on_frame(redraws, surface)?;
            }
        }
    }

    summary.stats = session.stats();
    Ok(summary)
}

/// Frame callback writing `frame_00001.png`, `frame_00002.png`, ... into `dir`.
pub fn save_frames_to(dir: &Path) -> Result<impl FnMut(u64, &PixelSurface) -> Result<()> + '_> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create frame directory {}", dir.display()))?;
    Ok(move |frame: u64, surface: &PixelSurface| {
        surface.save_png(dir.join(format!("frame_{:05}.png", frame)))
    })
}

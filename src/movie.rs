//! Timelapse assembly from a sequence of FITS frames.
//!
//! Each frame is rendered to a numbered PNG in a temporary staging directory
//! and the sequence is handed to an external `ffmpeg` encoder. Video encoding
//! stays delegated; this module only orchestrates.

use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Instant;
use thiserror::Error;

use crate::elapsed::format_elapsed;
use crate::fits::{load_frame, FitsError};
use crate::render::{render_frame_to, RenderError};
use crate::stats::{frame_stats, DisplayStretch, StatsError};

/// Errors from timelapse assembly
#[derive(Error, Debug)]
pub enum MovieError {
    /// Frame list was empty
    #[error("no frames to assemble")]
    NoFrames,
    /// A frame failed to load
    #[error("failed to load frame: {0}")]
    Fits(#[from] FitsError),
    /// A frame had unusable statistics
    #[error("failed to compute frame statistics: {0}")]
    Stats(#[from] StatsError),
    /// A frame failed to render
    #[error("failed to render frame: {0}")]
    Render(#[from] RenderError),
    /// Filesystem failure while staging frames
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// The encoder executable was not found on PATH
    #[error("encoder '{0}' not found")]
    EncoderNotFound(String),
    /// The encoder ran but exited with a failure status
    #[error("encoder exited with status {status}")]
    EncoderFailed { status: i32 },
}

/// Timelapse assembly configuration
#[derive(Debug, Clone)]
pub struct MovieConfig {
    /// Output frame rate
    pub fps: u32,
    /// Display stretch applied to every frame
    pub stretch: DisplayStretch,
    /// Encoder executable, normally just "ffmpeg"
    pub ffmpeg_path: String,
}

impl Default for MovieConfig {
    fn default() -> Self {
        Self {
            fps: 30,
            stretch: DisplayStretch::default(),
            ffmpeg_path: "ffmpeg".to_string(),
        }
    }
}

/// Assemble a sequence of FITS frames into an MP4 timelapse.
///
/// Frames are rendered in list order with a per-frame display stretch, so
/// sky brightness changes across the night stay visible rather than blowing
/// out the stretch window.
pub fn create_movie<P: AsRef<Path>>(
    frames: &[PathBuf],
    output: P,
    config: &MovieConfig,
) -> Result<(), MovieError> {
    if frames.is_empty() {
        return Err(MovieError::NoFrames);
    }

    let started = Instant::now();
    let staging = tempfile::tempdir()?;

    info!(
        "rendering {} frames for {}",
        frames.len(),
        output.as_ref().display()
    );

    let bar = ProgressBar::new(frames.len() as u64);
    bar.set_style(
        ProgressStyle::with_template("{msg} [{bar:40}] {pos}/{len}")
            .expect("static progress template")
            .progress_chars("=> "),
    );
    bar.set_message("rendering frames");

    for (index, frame_path) in frames.iter().enumerate() {
        let data = load_frame(frame_path)?;
        let stats = frame_stats(data.view())?;
        let png_path = staging.path().join(format!("frame_{index:05}.png"));
        render_frame_to(&png_path, data.view(), &stats, &config.stretch)?;
        bar.inc(1);
    }
    bar.finish_with_message("frames rendered");

    run_encoder(staging.path(), output.as_ref(), config)?;

    info!("{}", format_elapsed(started.elapsed()));
    Ok(())
}

fn run_encoder(staging: &Path, output: &Path, config: &MovieConfig) -> Result<(), MovieError> {
    let pattern = staging.join("frame_%05d.png");

    info!("encoding {} at {} fps", output.display(), config.fps);
    let status = Command::new(&config.ffmpeg_path)
        .arg("-r")
        .arg(config.fps.to_string())
        .arg("-i")
        .arg(&pattern)
        .arg("-b:v")
        .arg("20000k")
        .arg("-y")
        .arg(output)
        .status()
        .map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                MovieError::EncoderNotFound(config.ffmpeg_path.clone())
            } else {
                MovieError::Io(e)
            }
        })?;

    if !status.success() {
        return Err(MovieError::EncoderFailed {
            status: status.code().unwrap_or(-1),
        });
    }

    Ok(())
}

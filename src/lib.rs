//! All-sky camera image analysis and timelapse utilities.
//!
//! This crate collects the tools used to inspect and publish images from an
//! all-sky camera: FITS frame loading, robust display statistics, 2D Gaussian
//! PSF fitting, astrometric header checks, PNG frame rendering, and timelapse
//! assembly through an external `ffmpeg` encoder.

pub mod constants;
pub mod elapsed;
pub mod files;
pub mod fits;
pub mod movie;
pub mod psf;
pub mod render;
pub mod stats;

pub use fits::{has_astrometry, load_frame, write_frame, FitsError};
pub use movie::{create_movie, MovieConfig, MovieError};
pub use psf::{fit_gaussian, moments, FitError, GaussianParameters, PsfFit};
pub use render::{render_frame, render_frame_to};
pub use stats::{frame_stats, DisplayStretch, FrameStats, StatsError};

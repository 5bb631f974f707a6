//! Command-line front end for the all-sky camera utilities.

use clap::{Parser, Subcommand};
use log::error;
use std::path::PathBuf;
use std::process::ExitCode;

use allsky::files::find_frames;
use allsky::movie::{create_movie, MovieConfig};
use allsky::psf::fit_gaussian;
use allsky::render::render_frame_to;
use allsky::stats::{frame_stats, DisplayStretch};
use allsky::{has_astrometry, load_frame};

#[derive(Parser, Debug)]
#[command(
    name = "allsky",
    about = "All-sky camera image analysis and timelapse tools",
    long_about = None
)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print robust statistics for a FITS frame
    Stats {
        /// FITS file to inspect
        file: PathBuf,
    },
    /// Check whether a frame carries astrometric calibration headers
    CheckAst {
        /// FITS file to inspect
        file: PathBuf,
    },
    /// Fit a 2D Gaussian PSF to a frame or cutout
    Fit {
        /// FITS file containing a single star
        file: PathBuf,
    },
    /// Render a frame to a stretched grayscale PNG
    Render {
        /// FITS file to render
        file: PathBuf,
        /// Output image path
        #[arg(short, long)]
        output: PathBuf,
        /// Sigmas below the median mapped to black
        #[arg(long, default_value_t = 1.0)]
        low_sigma: f64,
        /// Sigmas above the median mapped to white
        #[arg(long, default_value_t = 4.0)]
        high_sigma: f64,
    },
    /// Assemble a directory of frames into an MP4 timelapse
    Movie {
        /// Directory containing the frames
        dir: PathBuf,
        /// Frame filename prefix
        #[arg(long, default_value = "")]
        prefix: String,
        /// Frame filename suffix
        #[arg(long, default_value = ".FIT")]
        suffix: String,
        /// Output frame rate
        #[arg(long, default_value_t = 30)]
        fps: u32,
        /// Output movie path
        #[arg(short, long, default_value = "AllSkyMovie.mp4")]
        output: PathBuf,
        /// Sigmas below the median mapped to black
        #[arg(long, default_value_t = 1.0)]
        low_sigma: f64,
        /// Sigmas above the median mapped to white
        #[arg(long, default_value_t = 4.0)]
        high_sigma: f64,
    },
}

fn run(command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Stats { file } => {
            let data = load_frame(&file)?;
            let stats = frame_stats(data.view())?;
            let (rows, cols) = data.dim();
            println!("{}: {} x {}", file.display(), rows, cols);
            println!("  median: {:.3}", stats.median);
            println!("  mean:   {:.3}", stats.mean);
            println!("  sigma:  {:.3}", stats.sigma);
        }
        Command::CheckAst { file } => {
            if has_astrometry(&file)? {
                println!("{}: astrometry present", file.display());
            } else {
                println!("{}: inadequate astrometry information", file.display());
            }
        }
        Command::Fit { file } => {
            let data = load_frame(&file)?;
            let fit = fit_gaussian(data.view())?;
            let p = fit.params;
            println!("fit converged in {} iterations", fit.iterations);
            println!("  height:   {:.4}", p.height);
            println!("  center:   ({:.4}, {:.4})", p.center_x, p.center_y);
            println!("  width:    ({:.4}, {:.4})", p.width_x, p.width_y);
            println!("  offset:   {:.4}", p.offset);
            println!("  residual: {:.6e}", fit.residual_ss);
        }
        Command::Render {
            file,
            output,
            low_sigma,
            high_sigma,
        } => {
            let data = load_frame(&file)?;
            let stats = frame_stats(data.view())?;
            let stretch = DisplayStretch {
                low_sigma,
                high_sigma,
            };
            render_frame_to(&output, data.view(), &stats, &stretch)?;
            println!("wrote {}", output.display());
        }
        Command::Movie {
            dir,
            prefix,
            suffix,
            fps,
            output,
            low_sigma,
            high_sigma,
        } => {
            let frames = find_frames(&dir, &prefix, &suffix)?;
            println!("found {} frames in {}", frames.len(), dir.display());
            let config = MovieConfig {
                fps,
                stretch: DisplayStretch {
                    low_sigma,
                    high_sigma,
                },
                ..MovieConfig::default()
            };
            create_movie(&frames, &output, &config)?;
            println!("wrote {}", output.display());
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();
    match run(args.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

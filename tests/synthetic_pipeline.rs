//! End-to-end pipeline checks on synthetic star frames: write a frame to
//! FITS, load it back, and run statistics, PSF fitting, and rendering on it.

use approx::assert_relative_eq;
use tempfile::tempdir;

use allsky::psf::{fit_gaussian, GaussianParameters};
use allsky::render::render_frame_to;
use allsky::stats::{frame_stats, DisplayStretch};
use allsky::{load_frame, write_frame};

fn synthetic_star() -> GaussianParameters {
    GaussianParameters {
        height: 1200.0,
        center_x: 21.4,
        center_y: 18.7,
        width_x: 2.8,
        width_y: 3.4,
        offset: 350.0,
    }
}

#[test]
fn fit_recovers_star_after_fits_roundtrip() {
    let truth = synthetic_star();
    let frame = truth.predict((48, 48));

    let dir = tempdir().unwrap();
    let path = dir.path().join("star.fits");
    write_frame(&path, &frame).unwrap();

    let loaded = load_frame(&path).unwrap();
    assert_eq!(loaded.dim(), (48, 48));

    let fit = fit_gaussian(loaded.view()).unwrap();
    assert_relative_eq!(fit.params.height, truth.height, max_relative = 1e-3);
    assert_relative_eq!(fit.params.center_x, truth.center_x, max_relative = 1e-3);
    assert_relative_eq!(fit.params.center_y, truth.center_y, max_relative = 1e-3);
    assert_relative_eq!(fit.params.width_x, truth.width_x, max_relative = 1e-3);
    assert_relative_eq!(fit.params.width_y, truth.width_y, max_relative = 1e-3);
    assert_relative_eq!(fit.params.offset, truth.offset, max_relative = 1e-3);
}

#[test]
fn stats_sit_on_the_background() {
    let truth = synthetic_star();
    let frame = truth.predict((64, 64));

    let stats = frame_stats(frame.view()).unwrap();
    // The star covers a small fraction of the frame; the median tracks the
    // constant background closely, the mean sits slightly above it.
    assert!((stats.median - truth.offset).abs() < 1.0);
    assert!(stats.mean > stats.median);
}

#[test]
fn rendered_star_is_brighter_than_background() {
    let truth = synthetic_star();
    let mut frame = truth.predict((48, 48));
    // A deterministic ripple gives the frame a realistic nonzero robust
    // sigma so the stretch window is meaningful.
    for ((i, j), v) in frame.indexed_iter_mut() {
        *v += 4.0 * ((i * 5 + j * 11) % 7) as f64 / 7.0;
    }

    let dir = tempdir().unwrap();
    let path = dir.path().join("star.png");

    let stats = frame_stats(frame.view()).unwrap();
    render_frame_to(&path, frame.view(), &stats, &DisplayStretch::default()).unwrap();

    let rendered = image::open(&path).unwrap().to_luma8();
    let peak = rendered.get_pixel(truth.center_y.round() as u32, truth.center_x.round() as u32);
    let corner = rendered.get_pixel(0, 0);
    assert!(peak.0[0] > corner.0[0]);
}

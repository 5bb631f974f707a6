//! FITS frame I/O and astrometry header checks.
//!
//! Frames come off the all-sky camera as single-image FITS files. Loading
//! scans the HDUs for the first two-dimensional image and returns it as an
//! `Array2<f64>` in `(rows, cols)` = `(NAXIS2, NAXIS1)` order.

use fitsio::compat::fitsfile::FitsFile;
use fitsio::compat::images::{ImageDescription, ImageType, ReadImage, WriteImage};
use log::debug;
use ndarray::Array2;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during FITS frame operations
#[derive(Error, Debug)]
pub enum FitsError {
    /// Underlying FITS I/O error
    #[error("FITS I/O error: {0}")]
    FitsIo(#[from] fitsio::compat::errors::Error),
    /// No HDU in the file holds a two-dimensional image
    #[error("no 2D image HDU found (last NAXIS seen: {last_naxis})")]
    NoImage { last_naxis: i64 },
    /// Pixel count disagrees with the NAXIS1/NAXIS2 headers
    #[error("image data does not match header shape ({rows} x {cols})")]
    ShapeMismatch { rows: usize, cols: usize },
}

/// Load the first 2D image HDU of a FITS file as an `Array2<f64>`.
pub fn load_frame<P: AsRef<Path>>(path: P) -> Result<Array2<f64>, FitsError> {
    let fptr = FitsFile::open(&path)?;

    let mut last_naxis = 0;
    let mut hdu_idx = 0;
    while let Ok(hdu) = fptr.hdu(hdu_idx) {
        let naxis = hdu.read_key::<i64>(&fptr, "NAXIS").unwrap_or(0);
        last_naxis = naxis;

        if naxis == 2 {
            let cols = hdu.read_key::<i64>(&fptr, "NAXIS1").unwrap_or(0) as usize;
            let rows = hdu.read_key::<i64>(&fptr, "NAXIS2").unwrap_or(0) as usize;
            let pixels = f64::read_image(&fptr, &hdu)?;

            debug!(
                "loaded {} x {} image from HDU {} of {}",
                rows,
                cols,
                hdu_idx,
                path.as_ref().display()
            );
            return Array2::from_shape_vec((rows, cols), pixels)
                .map_err(|_| FitsError::ShapeMismatch { rows, cols });
        }

        hdu_idx += 1;
    }

    Err(FitsError::NoImage { last_naxis })
}

/// Check whether a frame carries astrometric calibration.
///
/// A frame counts as calibrated when both CRVAL1 and CRVAL2 (the reference
/// world coordinates) are readable from one of its headers.
pub fn has_astrometry<P: AsRef<Path>>(path: P) -> Result<bool, FitsError> {
    let fptr = FitsFile::open(&path)?;

    let mut hdu_idx = 0;
    while let Ok(hdu) = fptr.hdu(hdu_idx) {
        let crval1 = hdu.read_key::<f64>(&fptr, "CRVAL1");
        let crval2 = hdu.read_key::<f64>(&fptr, "CRVAL2");
        if crval1.is_ok() && crval2.is_ok() {
            return Ok(true);
        }
        hdu_idx += 1;
    }

    Ok(false)
}

/// Write a 2D image as a double-precision FITS file.
pub fn write_frame<P: AsRef<Path>>(path: P, data: &Array2<f64>) -> Result<(), FitsError> {
    write_frame_impl(path, data, None)
}

/// Write a 2D image with CRVAL1/CRVAL2 reference coordinates (degrees).
pub fn write_frame_with_astrometry<P: AsRef<Path>>(
    path: P,
    data: &Array2<f64>,
    crval: (f64, f64),
) -> Result<(), FitsError> {
    write_frame_impl(path, data, Some(crval))
}

fn write_frame_impl<P: AsRef<Path>>(
    path: P,
    data: &Array2<f64>,
    crval: Option<(f64, f64)>,
) -> Result<(), FitsError> {
    let (rows, cols) = data.dim();
    let description = ImageDescription {
        data_type: ImageType::Double,
        dimensions: vec![cols, rows],
    };

    let mut fptr = FitsFile::create(&path).overwrite().open()?;
    let hdu = fptr.create_image("IMAGE", &description)?;

    let flat: Vec<f64> = data.iter().copied().collect();
    f64::write_image(&mut fptr, &hdu, &flat)?;

    if let Some((crval1, crval2)) = crval {
        hdu.write_key(&mut fptr, "CRVAL1", &crval1)?;
        hdu.write_key(&mut fptr, "CRVAL2", &crval2)?;
    }

    Ok(())
}

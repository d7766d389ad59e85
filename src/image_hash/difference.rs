//! Difference (gradient) image hash.
//!
//! The image is normalized to a `(width + 1) x height` grid; each bit
//! records the sign of one horizontal step, set when the right pixel is
//! at least as bright as the left. Adding a constant to every pixel or
//! scaling contrast leaves every comparison unchanged, which is the
//! variant's robustness claim. Bits are row-major across the
//! `width x height` differences.

use log::trace;

use crate::buffer::{normalize, RawImage};
use crate::config::DifferenceConfig;
use crate::error::Result;
use crate::hash::{HashValue, HashVariant};

/// Compute the difference hash of a raw image.
pub fn hash(img: &RawImage, config: &DifferenceConfig) -> Result<HashValue> {
    config.validate()?;
    let (w, h) = (config.width, config.height);
    let grid = normalize::to_luma_grid(img, w + 1, h);

    let mut bits = Vec::with_capacity(w * h);
    for y in 0..h {
        for x in 0..w {
            // Signed difference thresholded at zero; ties set the bit.
            bits.push(grid.get(x + 1, y) >= grid.get(x, y));
        }
    }
    trace!("difference hash: {w}x{h} gradient grid");
    Ok(HashValue::from_bits(HashVariant::Difference, &bits))
}

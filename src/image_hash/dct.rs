//! DCT image hash.
//!
//! The image is normalized to a square luma grid and run through a 2-D
//! DCT-II. Only the low-frequency block survives, taken at offset
//! (1, 1) so the DC row and column never enter the hash: the DC term is
//! flat luminance and would drag the median toward itself. The retained
//! coefficients are thresholded against their median, one bit each,
//! row-major.
//!
//! A uniform image has an all-zero AC spectrum; under the ties-set-bits
//! rule it hashes to the all-ones value. That constant is the
//! documented degenerate output, and all uniform images of a given
//! configuration share it.

use log::trace;
use rustdct::DctPlanner;

use crate::buffer::{normalize, RawImage};
use crate::config::DctConfig;
use crate::error::Result;
use crate::hash::{HashValue, HashVariant};
use crate::image_hash::{median, threshold_bits};

/// Compute the DCT hash of a raw image.
pub fn hash(img: &RawImage, config: &DctConfig) -> Result<HashValue> {
    config.validate()?;
    let n = config.grid_size;
    let grid = normalize::to_luma_grid(img, n, n);
    let coeffs = dct_2d(grid.data(), n);

    // Low-frequency block at offset (1, 1), skipping DC row and column.
    let block = config.block_size;
    let mut retained = Vec::with_capacity(block * block);
    for y in 1..=block {
        for x in 1..=block {
            retained.push(coeffs[y * n + x]);
        }
    }

    let threshold = median(&retained);
    let bits = threshold_bits(&retained, threshold);
    trace!(
        "dct hash: grid {n}x{n}, block {block}x{block}, median {threshold:.6}"
    );
    Ok(HashValue::from_bits(HashVariant::Dct, &bits))
}

/// Separable 2-D DCT-II over a row-major `n x n` buffer: transform
/// rows, transpose, transform again, transpose back.
fn dct_2d(data: &[f64], n: usize) -> Vec<f64> {
    let mut planner = DctPlanner::<f64>::new();
    let dct = planner.plan_dct2(n);
    let mut scratch = vec![0.0f64; dct.get_scratch_len()];

    let mut buffer = data.to_vec();
    for row in buffer.chunks_mut(n) {
        dct.process_dct2_with_scratch(row, &mut scratch);
    }
    let mut transposed = transpose(&buffer, n);
    for row in transposed.chunks_mut(n) {
        dct.process_dct2_with_scratch(row, &mut scratch);
    }
    transpose(&transposed, n)
}

fn transpose(data: &[f64], n: usize) -> Vec<f64> {
    let mut out = vec![0.0; n * n];
    for y in 0..n {
        for x in 0..n {
            out[x * n + y] = data[y * n + x];
        }
    }
    out
}

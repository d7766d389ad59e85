//! Radial-variance image hash.
//!
//! The image is normalized to a square grid; a set of lines through the
//! center, at evenly spaced angles over half a turn, each sample the
//! intensities along their length (a full line covers both directions,
//! so half a turn covers every orientation). Each line contributes the
//! population variance of its samples; the variances are thresholded
//! against their median, one bit per ray in ascending angle order.
//!
//! Because the projection set rotates with the image content, small
//! rotations permute ray variances only slightly, which is what makes
//! this variant the most rotation-tolerant of the three.

use std::f64::consts::PI;

use log::trace;

use crate::buffer::{normalize, LumaGrid, RawImage};
use crate::config::RadialConfig;
use crate::error::Result;
use crate::hash::{HashValue, HashVariant};
use crate::image_hash::{median, threshold_bits};

/// Compute the radial-variance hash of a raw image.
pub fn hash(img: &RawImage, config: &RadialConfig) -> Result<HashValue> {
    config.validate()?;
    let n = config.grid_size;
    let grid = normalize::to_luma_grid(img, n, n);

    let variances: Vec<f64> = (0..config.rays)
        .map(|ray| {
            let angle = PI * ray as f64 / config.rays as f64;
            ray_variance(&grid, angle)
        })
        .collect();

    let threshold = median(&variances);
    let bits = threshold_bits(&variances, threshold);
    trace!(
        "radial hash: grid {n}x{n}, {} rays, median variance {threshold:.6}",
        config.rays
    );
    Ok(HashValue::from_bits(HashVariant::RadialVariance, &bits))
}

/// Population variance of the intensities along the line through the
/// grid center at `angle`, sampled at unit steps with nearest-neighbor
/// lookup.
fn ray_variance(grid: &LumaGrid, angle: f64) -> f64 {
    let n = grid.width();
    let center = (n as f64 - 1.0) / 2.0;
    let (dy, dx) = angle.sin_cos();
    let half = (n / 2) as i64;

    let mut samples = Vec::with_capacity(n);
    for t in -half..=half {
        let x = (center + t as f64 * dx).round();
        let y = (center + t as f64 * dy).round();
        if x < 0.0 || y < 0.0 {
            continue;
        }
        let (x, y) = (x as usize, y as usize);
        if x < n && y < grid.height() {
            samples.push(grid.get(x, y));
        }
    }

    let count = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / count;
    samples.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count
}

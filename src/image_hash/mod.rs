//! Image hashing pipelines.
//!
//! Three variants share the same skeleton: normalize the pixels to a
//! small luma grid, run a deterministic transform, quantize the output
//! to bits. They differ in what structure the transform captures:
//!
//! - [`ImageAlgorithm::Dct`] keeps coarse frequency content, shrugging
//!   off high-frequency noise and compression artifacts.
//! - [`ImageAlgorithm::Difference`] keeps horizontal gradient signs,
//!   cheap and invariant to uniform brightness or contrast shifts.
//! - [`ImageAlgorithm::RadialVariance`] keeps the variance profile of
//!   radial projections, holding up better under small rotations.

pub mod dct;
pub mod difference;
pub mod radial;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::buffer::RawImage;
use crate::config::{DctConfig, DifferenceConfig, RadialConfig};
use crate::error::Result;
use crate::hash::{HashValue, HashVariant};

/// Selects one of the image hash pipelines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ImageAlgorithm {
    /// DCT hash, the most resilient to re-encoding.
    #[default]
    Dct,
    /// Difference (gradient) hash.
    Difference,
    /// Radial-variance hash.
    RadialVariance,
}

impl ImageAlgorithm {
    /// The variant tag hashes of this algorithm carry.
    pub fn variant(self) -> HashVariant {
        match self {
            Self::Dct => HashVariant::Dct,
            Self::Difference => HashVariant::Difference,
            Self::RadialVariance => HashVariant::RadialVariance,
        }
    }

    /// Default "likely duplicate" normalized-distance threshold.
    pub fn default_threshold(self) -> f64 {
        self.variant().default_threshold()
    }
}

impl std::fmt::Display for ImageAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dct => write!(f, "dct"),
            Self::Difference => write!(f, "difference"),
            Self::RadialVariance => write!(f, "radial-variance"),
        }
    }
}

/// Computes perceptual hashes for raw images under one algorithm.
#[derive(Debug, Clone, Default)]
pub struct ImageHasher {
    algorithm: ImageAlgorithm,
    dct: DctConfig,
    difference: DifferenceConfig,
    radial: RadialConfig,
}

impl ImageHasher {
    /// Create a hasher with the algorithm's default configuration.
    pub fn new(algorithm: ImageAlgorithm) -> Self {
        Self {
            algorithm,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_dct_config(mut self, config: DctConfig) -> Self {
        self.dct = config;
        self
    }

    #[must_use]
    pub fn with_difference_config(mut self, config: DifferenceConfig) -> Self {
        self.difference = config;
        self
    }

    #[must_use]
    pub fn with_radial_config(mut self, config: RadialConfig) -> Self {
        self.radial = config;
        self
    }

    pub fn algorithm(&self) -> ImageAlgorithm {
        self.algorithm
    }

    /// Compute the hash of a raw image.
    pub fn compute(&self, img: &RawImage) -> Result<HashValue> {
        match self.algorithm {
            ImageAlgorithm::Dct => dct::hash(img, &self.dct),
            ImageAlgorithm::Difference => difference::hash(img, &self.difference),
            ImageAlgorithm::RadialVariance => radial::hash(img, &self.radial),
        }
    }
}

/// Hash a batch of images in parallel, one rayon task per buffer.
///
/// Results keep the input order; a failing item does not affect its
/// neighbors.
pub fn hash_batch(hasher: &ImageHasher, images: &[RawImage]) -> Vec<Result<HashValue>> {
    images.par_iter().map(|img| hasher.compute(img)).collect()
}

/// Median of a value set; for an even count, the mean of the two middle
/// values. The quantizers threshold against this.
pub(crate) fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Quantize values against a threshold. Values exactly at the
/// threshold count as above it, so identical inputs always quantize
/// identically.
pub(crate) fn threshold_bits(values: &[f64], threshold: f64) -> Vec<bool> {
    values.iter().map(|&v| v >= threshold).collect()
}

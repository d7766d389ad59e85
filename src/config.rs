//! Per-variant configuration with documented defaults.
//!
//! Each hash variant carries a small config struct. Defaults follow the
//! classical perceptual-hash parameter choices; `validate` rejects
//! values the transforms cannot work with. Validation happens once at
//! the start of a hash computation, so downstream code can assume
//! in-bounds parameters.

use serde::{Deserialize, Serialize};

use crate::error::{HashError, Result};

/// Configuration for the DCT image hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DctConfig {
    /// Side length of the normalized grid the DCT runs over.
    pub grid_size: usize,
    /// Side length of the retained low-frequency block. The block is
    /// taken at offset (1, 1), skipping the DC row and column, so the
    /// hash is `block_size * block_size` bits.
    pub block_size: usize,
}

impl Default for DctConfig {
    fn default() -> Self {
        Self {
            grid_size: 32,
            block_size: 8,
        }
    }
}

impl DctConfig {
    /// Override the normalized grid size.
    #[must_use]
    pub fn with_grid_size(mut self, grid_size: usize) -> Self {
        self.grid_size = grid_size;
        self
    }

    /// Override the retained block size.
    #[must_use]
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.block_size < 2 {
            return Err(HashError::Configuration(format!(
                "DCT block size {} is below the minimum of 2",
                self.block_size
            )));
        }
        // The block sits at offset (1, 1) to skip the DC terms.
        if self.grid_size < self.block_size + 1 {
            return Err(HashError::Configuration(format!(
                "DCT grid size {} cannot fit an offset {}x{} block",
                self.grid_size, self.block_size, self.block_size
            )));
        }
        if self.grid_size > 256 {
            return Err(HashError::Configuration(format!(
                "DCT grid size {} exceeds the supported maximum of 256",
                self.grid_size
            )));
        }
        Ok(())
    }
}

/// Configuration for the difference (gradient) image hash.
///
/// The image is normalized to `(width + 1) x height` so that each row
/// yields `width` horizontal differences, for `width * height` bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifferenceConfig {
    /// Differences per row.
    pub width: usize,
    /// Number of rows.
    pub height: usize,
}

impl Default for DifferenceConfig {
    fn default() -> Self {
        Self {
            width: 8,
            height: 8,
        }
    }
}

impl DifferenceConfig {
    #[must_use]
    pub fn with_dimensions(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(HashError::Configuration(
                "difference hash dimensions must be positive".to_string(),
            ));
        }
        if self.width > 128 || self.height > 128 {
            return Err(HashError::Configuration(format!(
                "difference grid {}x{} exceeds the supported maximum of 128",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

/// Configuration for the radial-variance image hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RadialConfig {
    /// Side length of the normalized grid the projections sample.
    pub grid_size: usize,
    /// Number of radial lines, evenly spaced over half a turn. One bit
    /// per ray.
    pub rays: usize,
}

impl Default for RadialConfig {
    fn default() -> Self {
        Self {
            grid_size: 40,
            rays: 64,
        }
    }
}

impl RadialConfig {
    #[must_use]
    pub fn with_grid_size(mut self, grid_size: usize) -> Self {
        self.grid_size = grid_size;
        self
    }

    #[must_use]
    pub fn with_rays(mut self, rays: usize) -> Self {
        self.rays = rays;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.grid_size < 8 {
            return Err(HashError::Configuration(format!(
                "radial grid size {} is below the minimum of 8",
                self.grid_size
            )));
        }
        if self.grid_size > 256 {
            return Err(HashError::Configuration(format!(
                "radial grid size {} exceeds the supported maximum of 256",
                self.grid_size
            )));
        }
        if !(4..=256).contains(&self.rays) {
            return Err(HashError::Configuration(format!(
                "ray count {} is outside the supported range 4..=256",
                self.rays
            )));
        }
        Ok(())
    }
}

/// Configuration for the audio fingerprint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Target mono sample rate in Hz.
    pub sample_rate: u32,
    /// STFT window length in samples.
    pub frame_size: usize,
    /// Hop between window starts in samples.
    pub hop_size: usize,
    /// Number of equal frequency bands the spectrum is split into.
    pub bands: usize,
    /// Pre-emphasis coefficient, applied as `y[n] = x[n] - a * x[n-1]`
    /// when set.
    pub pre_emphasis: Option<f32>,
    /// Minimum overlapping windows required when aligning two
    /// fingerprints. Clamped to the shorter fingerprint.
    pub min_overlap: usize,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 8_000,
            frame_size: 1024,
            hop_size: 512,
            bands: 32,
            pre_emphasis: None,
            min_overlap: 4,
        }
    }
}

impl AudioConfig {
    #[must_use]
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    #[must_use]
    pub fn with_pre_emphasis(mut self, coefficient: f32) -> Self {
        self.pre_emphasis = Some(coefficient);
        self
    }

    #[must_use]
    pub fn with_min_overlap(mut self, min_overlap: usize) -> Self {
        self.min_overlap = min_overlap.max(1);
        self
    }

    /// Duration of one hop in seconds, the time resolution of the
    /// fingerprint and of alignment offsets.
    pub fn hop_seconds(&self) -> f64 {
        self.hop_size as f64 / self.sample_rate as f64
    }

    pub fn validate(&self) -> Result<()> {
        if !(1_000..=96_000).contains(&self.sample_rate) {
            return Err(HashError::Configuration(format!(
                "sample rate {} Hz is outside the supported range 1000..=96000",
                self.sample_rate
            )));
        }
        if self.frame_size < 64 || self.frame_size > 16_384 {
            return Err(HashError::Configuration(format!(
                "frame size {} is outside the supported range 64..=16384",
                self.frame_size
            )));
        }
        if self.hop_size == 0 || self.hop_size > self.frame_size {
            return Err(HashError::Configuration(format!(
                "hop size {} must be in 1..={}",
                self.hop_size, self.frame_size
            )));
        }
        // Bands partition the positive-frequency bins below Nyquist.
        if self.bands < 2 || self.bands > self.frame_size / 2 {
            return Err(HashError::Configuration(format!(
                "band count {} must be in 2..={}",
                self.bands,
                self.frame_size / 2
            )));
        }
        if let Some(a) = self.pre_emphasis {
            if !(0.0..1.0).contains(&a) {
                return Err(HashError::Configuration(format!(
                    "pre-emphasis coefficient {a} must be in [0, 1)"
                )));
            }
        }
        if self.min_overlap == 0 {
            return Err(HashError::Configuration(
                "minimum overlap must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration for the video aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoConfig {
    /// Every `frame_interval`-th pushed frame is hashed, starting with
    /// the first.
    pub frame_interval: u32,
    /// Image algorithm applied to each sampled frame.
    pub algorithm: crate::image_hash::ImageAlgorithm,
    /// Minimum aligned frames required when comparing two sequences.
    pub min_overlap: usize,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            frame_interval: 30,
            algorithm: crate::image_hash::ImageAlgorithm::default(),
            min_overlap: 1,
        }
    }
}

impl VideoConfig {
    #[must_use]
    pub fn with_frame_interval(mut self, frame_interval: u32) -> Self {
        self.frame_interval = frame_interval;
        self
    }

    #[must_use]
    pub fn with_algorithm(mut self, algorithm: crate::image_hash::ImageAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.frame_interval == 0 {
            return Err(HashError::Configuration(
                "frame interval must be at least 1".to_string(),
            ));
        }
        if self.min_overlap == 0 {
            return Err(HashError::Configuration(
                "minimum overlap must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

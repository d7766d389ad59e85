//! Audio fingerprinting.
//!
//! Audio is normalized to mono at a fixed rate, framed into overlapping
//! Hann windows, and transformed with an FFT per window. Each window
//! contributes one symbol: the index of the frequency band holding the
//! most energy. A clip therefore maps to a sequence of band indices
//! rather than a fixed-width hash — clips vary in length and must be
//! compared by alignment, not exact-length match.
//!
//! [`match_fingerprints`] slides one sequence against the other over
//! all integer window offsets and reports the best match fraction and
//! the offset achieving it.

use log::{debug, trace};
use rayon::prelude::*;
use rustfft::{num_complex::Complex, FftPlanner};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

use crate::buffer::{normalize, RawAudio};
use crate::config::AudioConfig;
use crate::error::{HashError, Result};

/// STFT parameters stamped onto a fingerprint. Two fingerprints are
/// comparable only when their stamps are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FingerprintParams {
    pub sample_rate: u32,
    pub frame_size: usize,
    pub hop_size: usize,
    pub bands: usize,
}

impl FingerprintParams {
    fn from_config(config: &AudioConfig) -> Self {
        Self {
            sample_rate: config.sample_rate,
            frame_size: config.frame_size,
            hop_size: config.hop_size,
            bands: config.bands,
        }
    }
}

/// A variable-length audio fingerprint: one dominant-band index per
/// STFT window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioFingerprint {
    params: FingerprintParams,
    bands: Vec<u16>,
}

impl AudioFingerprint {
    pub fn params(&self) -> &FingerprintParams {
        &self.params
    }

    /// Dominant-band index per window, in time order.
    pub fn bands(&self) -> &[u16] {
        &self.bands
    }

    /// Number of windows.
    pub fn len(&self) -> usize {
        self.bands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    /// Duration covered by one window hop, the resolution of alignment
    /// offsets.
    pub fn hop_seconds(&self) -> f64 {
        self.params.hop_size as f64 / self.params.sample_rate as f64
    }
}

/// Result of aligning two fingerprints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AudioMatch {
    /// Fraction of overlapping windows whose band indices agree at the
    /// best offset, in [0, 1].
    pub score: f64,
    /// Window offset achieving the best score. Positive means the
    /// second fingerprint leads the first: window `i` of the first
    /// aligns with window `i + offset` of the second.
    pub offset: i64,
    /// Number of windows compared at that offset.
    pub overlap: usize,
}

impl AudioMatch {
    /// The offset converted to seconds under the fingerprint's hop.
    pub fn offset_seconds(&self, fingerprint: &AudioFingerprint) -> f64 {
        self.offset as f64 * fingerprint.hop_seconds()
    }
}

/// Compute the fingerprint of a raw audio clip.
pub fn fingerprint(audio: &RawAudio, config: &AudioConfig) -> Result<AudioFingerprint> {
    config.validate()?;
    let mono = normalize::to_mono_samples(audio, config.sample_rate, config.pre_emphasis);
    let frames = frame_windows(mono.data(), config.frame_size, config.hop_size);
    let spectra = fft_magnitudes(frames);
    let bands: Vec<u16> = spectra
        .iter()
        .map(|spectrum| dominant_band(spectrum, config.bands))
        .collect();
    debug!(
        "audio fingerprint: {} windows at {} Hz ({} bands)",
        bands.len(),
        config.sample_rate,
        config.bands
    );
    Ok(AudioFingerprint {
        params: FingerprintParams::from_config(config),
        bands,
    })
}

/// Find the best alignment between two fingerprints.
///
/// Every integer offset leaving at least `min_overlap` overlapping
/// windows is scored by the fraction of agreeing band indices; the
/// earliest offset with the highest score wins. Fails with
/// [`HashError::VariantMismatch`] when the fingerprints were computed
/// under different parameters.
pub fn match_fingerprints(
    a: &AudioFingerprint,
    b: &AudioFingerprint,
    config: &AudioConfig,
) -> Result<AudioMatch> {
    config.validate()?;
    if a.params != b.params {
        return Err(HashError::VariantMismatch(format!(
            "fingerprint parameters differ: {:?} vs {:?}",
            a.params, b.params
        )));
    }
    if a.is_empty() || b.is_empty() {
        return Err(HashError::InvalidInput(
            "cannot align an empty fingerprint".to_string(),
        ));
    }

    let (la, lb) = (a.len() as i64, b.len() as i64);
    let min_overlap = config.min_overlap.min(a.len()).min(b.len()) as i64;

    let mut best: Option<AudioMatch> = None;
    // Offset o aligns a[i] with b[i + o].
    for offset in (min_overlap - la)..=(lb - min_overlap) {
        let start = 0.max(-offset);
        let end = la.min(lb - offset);
        let overlap = (end - start) as usize;

        let matches = (start..end)
            .filter(|&i| a.bands[i as usize] == b.bands[(i + offset) as usize])
            .count();
        let score = matches as f64 / overlap as f64;
        trace!("offset {offset}: {matches}/{overlap} windows agree");

        let improves = match &best {
            None => true,
            Some(current) => score > current.score,
        };
        if improves {
            best = Some(AudioMatch {
                score,
                offset,
                overlap,
            });
        }
    }

    // min_overlap is clamped to both lengths, so at least offset 0
    // produced a candidate.
    best.ok_or_else(|| HashError::InvalidInput("no alignment candidates".to_string()))
}

/// Split samples into overlapping Hann-windowed frames; the tail frame
/// is zero-padded to full length.
fn frame_windows(samples: &[f32], frame_size: usize, hop_size: usize) -> Vec<Vec<f32>> {
    let window = hann_window(frame_size);
    let mut frames = Vec::new();
    let mut position = 0;
    while position < samples.len() {
        let end = (position + frame_size).min(samples.len());
        let mut frame = vec![0.0f32; frame_size];
        frame[..end - position].copy_from_slice(&samples[position..end]);
        for (sample, w) in frame.iter_mut().zip(&window) {
            *sample *= w;
        }
        frames.push(frame);
        position += hop_size;
    }
    frames
}

fn hann_window(size: usize) -> Vec<f32> {
    let n = size as f32;
    (0..size)
        .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f32 / (n - 1.0)).cos()))
        .collect()
}

/// FFT magnitude spectra, keeping the bins below Nyquist.
fn fft_magnitudes(frames: Vec<Vec<f32>>) -> Vec<Vec<f32>> {
    if frames.is_empty() {
        return vec![];
    }
    let n = frames[0].len();
    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(n);

    frames
        .into_par_iter()
        .map(|frame| {
            let mut buffer: Vec<Complex<f32>> =
                frame.iter().map(|&v| Complex { re: v, im: 0.0 }).collect();
            fft.process(&mut buffer);
            buffer[..n / 2]
                .iter()
                .map(|c| (c.re * c.re + c.im * c.im).sqrt())
                .collect()
        })
        .collect()
}

/// Index of the band with the greatest energy. The DC bin is excluded;
/// the remaining bins split into `bands` equal ranges. Ties take the
/// lowest index, and an all-silent window lands on band 0.
fn dominant_band(spectrum: &[f32], bands: usize) -> u16 {
    let usable = &spectrum[1..];
    let band_width = usable.len().div_ceil(bands);

    let mut best_band = 0u16;
    let mut best_energy = f64::NEG_INFINITY;
    for band in 0..bands {
        let start = band * band_width;
        if start >= usable.len() {
            break;
        }
        let end = ((band + 1) * band_width).min(usable.len());
        let energy: f64 = usable[start..end].iter().map(|&m| (m as f64).powi(2)).sum();
        if energy > best_energy {
            best_energy = energy;
            best_band = band as u16;
        }
    }
    best_band
}

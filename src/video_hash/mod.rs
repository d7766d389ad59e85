//! Video fingerprinting.
//!
//! Video content runs per-frame through the full image pipeline. The
//! [`TemporalAggregator`] samples frames at a fixed interval rather
//! than hashing every frame, trading completeness for cost, and
//! assembles the per-frame hashes into a [`FrameHashSequence`].
//! Ordering is significant: two encodes of the same content rarely
//! agree on sampling phase, so sequence comparison searches over
//! temporal offsets just as audio alignment does.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::buffer::RawImage;
use crate::config::VideoConfig;
use crate::error::{HashError, Result};
use crate::hash::{hamming_distance, HashValue, HashVariant};
use crate::image_hash::ImageHasher;

/// An ordered sequence of per-frame hashes plus the sampling interval
/// that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameHashSequence {
    frame_interval: u32,
    hashes: Vec<HashValue>,
}

impl FrameHashSequence {
    /// Frames skipped between samples.
    pub fn frame_interval(&self) -> u32 {
        self.frame_interval
    }

    /// Per-frame hashes in sampling order.
    pub fn hashes(&self) -> &[HashValue] {
        &self.hashes
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    /// The overall video fingerprint: a per-bit majority vote across
    /// the frame hashes, tagged [`HashVariant::Video`]. An exact tie
    /// sets the bit, consistent with the quantizers' threshold rule.
    pub fn pooled(&self) -> Result<HashValue> {
        let first = self
            .hashes
            .first()
            .ok_or_else(|| HashError::InvalidInput("empty frame hash sequence".to_string()))?;
        let bit_len = first.bit_len();

        let mut bits = Vec::with_capacity(bit_len);
        for i in 0..bit_len {
            let ones = self.hashes.iter().filter(|h| h.bit(i)).count();
            bits.push(ones * 2 >= self.hashes.len());
        }
        Ok(HashValue::from_bits(HashVariant::Video, &bits))
    }
}

/// Result of aligning two frame hash sequences.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VideoMatch {
    /// Minimum mean normalized per-frame Hamming distance over the
    /// searched offsets, in [0, 1].
    pub distance: f64,
    /// Frame offset achieving the minimum. Positive means the second
    /// sequence leads the first: frame `i` of the first aligns with
    /// frame `i + offset` of the second.
    pub offset: i64,
    /// Number of frame pairs compared at that offset.
    pub overlap: usize,
}

impl VideoMatch {
    /// Whether the aligned distance falls at or below a threshold.
    pub fn is_within(&self, threshold: f64) -> bool {
        self.distance <= threshold
    }
}

/// Compare two frame hash sequences by sliding temporal alignment.
///
/// Fails with [`HashError::VariantMismatch`] when the sequences were
/// sampled at different intervals or hold hashes of different variants
/// or lengths.
pub fn compare_sequences(
    a: &FrameHashSequence,
    b: &FrameHashSequence,
    config: &VideoConfig,
) -> Result<VideoMatch> {
    config.validate()?;
    if a.is_empty() || b.is_empty() {
        return Err(HashError::InvalidInput(
            "cannot align an empty frame hash sequence".to_string(),
        ));
    }
    if a.frame_interval != b.frame_interval {
        return Err(HashError::VariantMismatch(format!(
            "sampling intervals differ: {} vs {}",
            a.frame_interval, b.frame_interval
        )));
    }

    let (la, lb) = (a.len() as i64, b.len() as i64);
    let min_overlap = config.min_overlap.min(a.len()).min(b.len()) as i64;

    let mut best: Option<VideoMatch> = None;
    // Offset o aligns a[i] with b[i + o].
    for offset in (min_overlap - la)..=(lb - min_overlap) {
        let start = 0.max(-offset);
        let end = la.min(lb - offset);
        let overlap = (end - start) as usize;

        let mut total = 0.0;
        for i in start..end {
            // Variant/length mismatches surface on the first pair.
            let d = hamming_distance(&a.hashes[i as usize], &b.hashes[(i + offset) as usize])?;
            total += d.normalized();
        }
        let distance = total / overlap as f64;

        let improves = match &best {
            None => true,
            Some(current) => distance < current.distance,
        };
        if improves {
            best = Some(VideoMatch {
                distance,
                offset,
                overlap,
            });
        }
    }

    best.ok_or_else(|| HashError::InvalidInput("no alignment candidates".to_string()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AggregatorState {
    Collecting,
    Finalized,
}

/// Accumulates sampled frame hashes as frames arrive.
///
/// Every `frame_interval`-th frame, starting with the first, is hashed
/// through the configured image pipeline. Once finalized the
/// aggregator refuses further frames.
pub struct TemporalAggregator {
    config: VideoConfig,
    hasher: ImageHasher,
    state: AggregatorState,
    frames_seen: u64,
    hashes: Vec<HashValue>,
}

impl TemporalAggregator {
    pub fn new(config: VideoConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            hasher: ImageHasher::new(config.algorithm),
            state: AggregatorState::Collecting,
            frames_seen: 0,
            hashes: Vec::new(),
        })
    }

    /// Offer the next frame in display order. Returns `true` when the
    /// frame was sampled and hashed, `false` when it was skipped.
    pub fn push_frame(&mut self, frame: &RawImage) -> Result<bool> {
        if self.state == AggregatorState::Finalized {
            return Err(HashError::InvalidInput(
                "aggregator is already finalized".to_string(),
            ));
        }
        let sampled = self.frames_seen % self.config.frame_interval as u64 == 0;
        self.frames_seen += 1;
        if !sampled {
            return Ok(false);
        }
        let hash = self.hasher.compute(frame)?;
        self.hashes.push(hash);
        Ok(true)
    }

    /// Number of frames offered so far.
    pub fn frames_seen(&self) -> u64 {
        self.frames_seen
    }

    /// Number of frames sampled and hashed so far.
    pub fn sampled(&self) -> usize {
        self.hashes.len()
    }

    /// Finish accumulation and hand back the sequence. The aggregator
    /// transitions to its terminal state and refuses further frames.
    ///
    /// Fails with [`HashError::InvalidInput`] when no frame was ever
    /// sampled or the aggregator was already finalized.
    pub fn finalize(&mut self) -> Result<FrameHashSequence> {
        if self.state == AggregatorState::Finalized {
            return Err(HashError::InvalidInput(
                "aggregator is already finalized".to_string(),
            ));
        }
        if self.hashes.is_empty() {
            return Err(HashError::InvalidInput(
                "no frames were sampled".to_string(),
            ));
        }
        self.state = AggregatorState::Finalized;
        debug!(
            "video fingerprint: {} of {} frames sampled at interval {}",
            self.hashes.len(),
            self.frames_seen,
            self.config.frame_interval
        );
        Ok(FrameHashSequence {
            frame_interval: self.config.frame_interval,
            hashes: std::mem::take(&mut self.hashes),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::PixelFormat;

    // Sawtooth whose spatial frequency depends on the phase, so
    // different phases hash to clearly different values.
    fn frame_with_phase(phase: u32) -> RawImage {
        let mut data = vec![0u8; 64 * 64];
        for y in 0..64u32 {
            for x in 0..64u32 {
                data[(y * 64 + x) as usize] = ((x * (phase + 1)) % 64 * 4) as u8;
            }
        }
        RawImage::new(64, 64, PixelFormat::Luma8, data).unwrap()
    }

    fn sequence_of(phases: impl Iterator<Item = u32>, interval: u32) -> FrameHashSequence {
        let config = VideoConfig::default().with_frame_interval(interval);
        let mut agg = TemporalAggregator::new(config).unwrap();
        for phase in phases {
            agg.push_frame(&frame_with_phase(phase)).unwrap();
        }
        agg.finalize().unwrap()
    }

    #[test]
    fn test_sampling_cadence() {
        let config = VideoConfig::default().with_frame_interval(3);
        let mut agg = TemporalAggregator::new(config).unwrap();
        let frame = frame_with_phase(0);
        let sampled: Vec<bool> = (0..7).map(|_| agg.push_frame(&frame).unwrap()).collect();
        assert_eq!(sampled, vec![true, false, false, true, false, false, true]);
        assert_eq!(agg.sampled(), 3);
        assert_eq!(agg.frames_seen(), 7);
    }

    #[test]
    fn test_finalize_without_frames_fails() {
        let mut agg = TemporalAggregator::new(VideoConfig::default()).unwrap();
        assert!(matches!(
            agg.finalize(),
            Err(HashError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_identical_sequences_align_at_zero() {
        let a = sequence_of(0..10, 1);
        let b = sequence_of(0..10, 1);
        let m = compare_sequences(&a, &b, &VideoConfig::default().with_frame_interval(1)).unwrap();
        assert_eq!(m.distance, 0.0);
        assert_eq!(m.offset, 0);
        assert_eq!(m.overlap, 10);
    }

    #[test]
    fn test_prefix_padding_recovers_offset() {
        // b is a with two unrelated frames prepended.
        let a = sequence_of(0..8, 1);
        let b = sequence_of([30, 45].into_iter().chain(0..8), 1);
        let config = VideoConfig {
            min_overlap: 4,
            ..VideoConfig::default().with_frame_interval(1)
        };
        let m = compare_sequences(&a, &b, &config).unwrap();
        assert_eq!(m.offset, 2);
        assert_eq!(m.distance, 0.0);
    }

    #[test]
    fn test_interval_mismatch_is_rejected() {
        let a = sequence_of(0..6, 1);
        let b = sequence_of(0..6, 2);
        assert!(matches!(
            compare_sequences(&a, &b, &VideoConfig::default()),
            Err(HashError::VariantMismatch(_))
        ));
    }

    #[test]
    fn test_pooled_hash_is_video_variant() {
        let seq = sequence_of(0..5, 1);
        let pooled = seq.pooled().unwrap();
        assert_eq!(pooled.variant(), HashVariant::Video);
        assert_eq!(pooled.bit_len(), seq.hashes()[0].bit_len());
    }

    #[test]
    fn test_pooled_of_identical_frames_matches_frame_bits() {
        let config = VideoConfig::default().with_frame_interval(1);
        let mut agg = TemporalAggregator::new(config).unwrap();
        for _ in 0..3 {
            agg.push_frame(&frame_with_phase(7)).unwrap();
        }
        let seq = agg.finalize().unwrap();
        let pooled = seq.pooled().unwrap();
        let frame_hash = &seq.hashes()[0];
        for i in 0..frame_hash.bit_len() {
            assert_eq!(pooled.bit(i), frame_hash.bit(i));
        }
    }

    #[test]
    fn test_push_after_finalize_is_rejected() {
        let config = VideoConfig::default().with_frame_interval(1);
        let mut agg = TemporalAggregator::new(config).unwrap();
        agg.push_frame(&frame_with_phase(0)).unwrap();
        agg.finalize().unwrap();
        assert!(matches!(
            agg.push_frame(&frame_with_phase(1)),
            Err(HashError::InvalidInput(_))
        ));
        assert!(matches!(agg.finalize(), Err(HashError::InvalidInput(_))));
    }
}

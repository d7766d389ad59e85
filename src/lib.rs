//! mediahash - Perceptual Media Fingerprinting
//!
//! A pure computation engine that turns decoded media buffers into
//! compact perceptual hashes and compares them: DCT, difference, and
//! radial-variance hashes for images, an STFT dominant-band fingerprint
//! for audio, and a temporal aggregator for video. Perceptually similar
//! inputs land at small distance; re-encoding, resizing, or minor edits
//! do not reset the fingerprint the way they reset a byte hash.
//!
//! Decoding media files, binding the engine to a host runtime, and
//! persisting hash indexes are the caller's concern: the engine
//! consumes [`buffer::RawImage`] / [`buffer::RawAudio`] values and
//! produces [`hash::HashValue`]s and distances. Every operation is a
//! pure synchronous function over immutable values, safe to run from
//! any number of threads at once.
//!
//! ```
//! use mediahash::{ImageAlgorithm, ImageHasher, RawImage, PixelFormat};
//!
//! let pixels = vec![0u8; 64 * 64];
//! let img = RawImage::new(64, 64, PixelFormat::Luma8, pixels)?;
//! let hasher = ImageHasher::new(ImageAlgorithm::Dct);
//! let hash = hasher.compute(&img)?;
//! let distance = hash.distance(&hash)?;
//! assert_eq!(distance.hamming(), 0);
//! # Ok::<(), mediahash::HashError>(())
//! ```

pub mod audio_hash;
pub mod buffer;
pub mod config;
pub mod error;
pub mod hash;
pub mod image_hash;
pub mod logging;
pub mod video_hash;

pub use audio_hash::{fingerprint, match_fingerprints, AudioFingerprint, AudioMatch};
pub use buffer::{PixelFormat, RawAudio, RawImage};
pub use config::{AudioConfig, DctConfig, DifferenceConfig, RadialConfig, VideoConfig};
pub use error::{HashError, Result};
pub use hash::{hamming_distance, Distance, HashValue, HashVariant, SimilarityIndex};
pub use image_hash::{hash_batch, ImageAlgorithm, ImageHasher};
pub use video_hash::{compare_sequences, FrameHashSequence, TemporalAggregator, VideoMatch};

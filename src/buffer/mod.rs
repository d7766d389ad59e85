//! Raw decoded-media input types.
//!
//! The engine never touches container or codec formats; an external
//! decoder hands it a [`RawImage`] (pixel grid) or [`RawAudio`]
//! (interleaved sample sequence). Both are validated on construction
//! and immutable afterwards, so every downstream computation is a pure
//! function over a well-formed value.

pub mod normalize;

pub use normalize::{LumaGrid, MonoSamples};

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::error::{HashError, Result};

/// Pixel layout of a [`RawImage`] payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PixelFormat {
    /// Single-channel 8-bit intensity.
    Luma8,
    /// Interleaved 8-bit RGB.
    Rgb8,
    /// Interleaved 8-bit RGBA. The alpha channel is ignored by the
    /// normalizer.
    Rgba8,
}

impl PixelFormat {
    /// Bytes per pixel.
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Luma8 => 1,
            Self::Rgb8 => 3,
            Self::Rgba8 => 4,
        }
    }
}

/// An owned, immutable grid of decoded pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawImage {
    width: u32,
    height: u32,
    format: PixelFormat,
    data: Vec<u8>,
}

impl RawImage {
    /// Wrap a decoded pixel buffer.
    ///
    /// Fails with [`HashError::InvalidInput`] when either dimension is
    /// zero or the payload length does not match
    /// `width * height * bytes_per_pixel`.
    pub fn new(width: u32, height: u32, format: PixelFormat, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(HashError::InvalidInput(format!(
                "image dimensions {width}x{height} must be positive"
            )));
        }
        let expected = width as usize * height as usize * format.bytes_per_pixel();
        if data.len() != expected {
            return Err(HashError::InvalidInput(format!(
                "pixel buffer holds {} bytes, expected {expected} for {width}x{height} {format:?}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            format,
            data,
        })
    }

    /// Convert an already-decoded [`DynamicImage`].
    pub fn from_dynamic(img: &DynamicImage) -> Result<Self> {
        let rgb = img.to_rgb8();
        Self::new(rgb.width(), rgb.height(), PixelFormat::Rgb8, rgb.into_raw())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// An owned, immutable sequence of decoded audio samples.
///
/// Samples are interleaved by channel, amplitudes nominally in
/// [-1.0, 1.0]; out-of-range amplitudes are accepted and survive
/// normalization unclamped.
#[derive(Debug, Clone, PartialEq)]
pub struct RawAudio {
    sample_rate: u32,
    channels: u16,
    samples: Vec<f32>,
}

impl RawAudio {
    /// Wrap a decoded sample buffer.
    ///
    /// Fails with [`HashError::InvalidInput`] when the rate or channel
    /// count is zero, the buffer is empty, or the buffer length is not
    /// a whole number of interleaved frames.
    pub fn new(sample_rate: u32, channels: u16, samples: Vec<f32>) -> Result<Self> {
        if sample_rate == 0 {
            return Err(HashError::InvalidInput(
                "sample rate must be positive".to_string(),
            ));
        }
        if channels == 0 {
            return Err(HashError::InvalidInput(
                "channel count must be positive".to_string(),
            ));
        }
        if samples.is_empty() {
            return Err(HashError::InvalidInput(
                "audio buffer is empty".to_string(),
            ));
        }
        if samples.len() % channels as usize != 0 {
            return Err(HashError::InvalidInput(format!(
                "{} samples do not divide into {} channels",
                samples.len(),
                channels
            )));
        }
        Ok(Self {
            sample_rate,
            channels,
            samples,
        })
    }

    /// Convenience constructor for single-channel input.
    pub fn mono(sample_rate: u32, samples: Vec<f32>) -> Result<Self> {
        Self::new(sample_rate, 1, samples)
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Number of interleaved frames.
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_image_rejects_zero_dimensions() {
        assert!(RawImage::new(0, 4, PixelFormat::Luma8, vec![]).is_err());
        assert!(RawImage::new(4, 0, PixelFormat::Luma8, vec![]).is_err());
    }

    #[test]
    fn test_raw_image_rejects_short_buffer() {
        let result = RawImage::new(4, 4, PixelFormat::Rgb8, vec![0u8; 15]);
        assert!(matches!(result, Err(HashError::InvalidInput(_))));
    }

    #[test]
    fn test_raw_image_accepts_exact_buffer() {
        let img = RawImage::new(4, 4, PixelFormat::Rgba8, vec![0u8; 64]).unwrap();
        assert_eq!(img.width(), 4);
        assert_eq!(img.format().bytes_per_pixel(), 4);
    }

    #[test]
    fn test_from_dynamic_matches_dimensions() {
        let dynamic = DynamicImage::ImageRgb8(image::RgbImage::new(10, 6));
        let raw = RawImage::from_dynamic(&dynamic).unwrap();
        assert_eq!((raw.width(), raw.height()), (10, 6));
        assert_eq!(raw.data().len(), 10 * 6 * 3);
    }

    #[test]
    fn test_raw_audio_rejects_empty_and_misaligned() {
        assert!(RawAudio::new(8_000, 2, vec![]).is_err());
        assert!(RawAudio::new(8_000, 2, vec![0.0; 5]).is_err());
        assert!(RawAudio::new(0, 1, vec![0.0; 8]).is_err());
    }

    #[test]
    fn test_raw_audio_frame_count() {
        let audio = RawAudio::new(8_000, 2, vec![0.0; 16]).unwrap();
        assert_eq!(audio.frames(), 8);
    }
}

//! Canonical forms fed to the transforms.
//!
//! Every hash variant starts by reducing its input to a fixed shape:
//! images become a small single-channel grid, audio becomes a mono
//! sequence at a fixed rate. Identical shapes for all inputs of a
//! variant are what let the transforms stay fixed-size.
//!
//! Resampling policy: area averaging when shrinking (each target pixel
//! integrates the source region it covers), bilinear when enlarging.
//! Inputs smaller than the target grid are upsampled, never cropped.

use crate::buffer::{PixelFormat, RawAudio, RawImage};

/// BT.601 luma weights, the fixed intensity conversion for all image
/// variants.
const LUMA_WEIGHTS: [f64; 3] = [0.299, 0.587, 0.114];

/// A fixed-shape grid of intensities in [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct LumaGrid {
    width: usize,
    height: usize,
    data: Vec<f64>,
}

impl LumaGrid {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Intensity at `(x, y)`. Row-major layout.
    pub fn get(&self, x: usize, y: usize) -> f64 {
        self.data[y * self.width + x]
    }
}

/// A mono sample sequence at a fixed rate.
#[derive(Debug, Clone, PartialEq)]
pub struct MonoSamples {
    sample_rate: u32,
    data: Vec<f32>,
}

impl MonoSamples {
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Normalize a raw image to a `width x height` luma grid.
pub fn to_luma_grid(img: &RawImage, width: usize, height: usize) -> LumaGrid {
    let luma = to_luma(img);
    let (sw, sh) = (img.width() as usize, img.height() as usize);
    let data = if width <= sw && height <= sh {
        area_average(&luma, sw, sh, width, height)
    } else {
        bilinear(&luma, sw, sh, width, height)
    };
    LumaGrid {
        width,
        height,
        data,
    }
}

/// Normalize raw audio to mono at `target_rate`, optionally applying a
/// one-pole pre-emphasis filter afterwards.
pub fn to_mono_samples(
    audio: &RawAudio,
    target_rate: u32,
    pre_emphasis: Option<f32>,
) -> MonoSamples {
    let mono = downmix(audio);
    let mut data = resample_linear(&mono, audio.sample_rate(), target_rate);
    if let Some(a) = pre_emphasis {
        // y[n] = x[n] - a * x[n-1]; the first sample passes through.
        for i in (1..data.len()).rev() {
            data[i] -= a * data[i - 1];
        }
    }
    MonoSamples {
        sample_rate: target_rate,
        data,
    }
}

fn to_luma(img: &RawImage) -> Vec<f64> {
    let data = img.data();
    let pixels = img.width() as usize * img.height() as usize;
    match img.format() {
        PixelFormat::Luma8 => data.iter().map(|&v| v as f64 / 255.0).collect(),
        PixelFormat::Rgb8 | PixelFormat::Rgba8 => {
            let step = img.format().bytes_per_pixel();
            (0..pixels)
                .map(|i| {
                    let p = &data[i * step..i * step + 3];
                    (LUMA_WEIGHTS[0] * p[0] as f64
                        + LUMA_WEIGHTS[1] * p[1] as f64
                        + LUMA_WEIGHTS[2] * p[2] as f64)
                        / 255.0
                })
                .collect()
        }
    }
}

/// Downscale by integrating the source area each target pixel covers,
/// with fractional weights at the region edges.
fn area_average(src: &[f64], sw: usize, sh: usize, tw: usize, th: usize) -> Vec<f64> {
    let x_ratio = sw as f64 / tw as f64;
    let y_ratio = sh as f64 / th as f64;
    let mut out = Vec::with_capacity(tw * th);

    for ty in 0..th {
        let y0 = ty as f64 * y_ratio;
        let y1 = (ty + 1) as f64 * y_ratio;
        for tx in 0..tw {
            let x0 = tx as f64 * x_ratio;
            let x1 = (tx + 1) as f64 * x_ratio;

            let mut sum = 0.0;
            let mut area = 0.0;
            let mut sy = y0.floor() as usize;
            while (sy as f64) < y1 && sy < sh {
                let wy = (y1.min((sy + 1) as f64) - y0.max(sy as f64)).max(0.0);
                let mut sx = x0.floor() as usize;
                while (sx as f64) < x1 && sx < sw {
                    let wx = (x1.min((sx + 1) as f64) - x0.max(sx as f64)).max(0.0);
                    sum += src[sy * sw + sx] * wx * wy;
                    area += wx * wy;
                    sx += 1;
                }
                sy += 1;
            }
            out.push(if area > 0.0 { sum / area } else { 0.0 });
        }
    }
    out
}

/// Upscale by interpolating between the four nearest source pixels at
/// each target pixel center.
fn bilinear(src: &[f64], sw: usize, sh: usize, tw: usize, th: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(tw * th);
    for ty in 0..th {
        let fy = ((ty as f64 + 0.5) * sh as f64 / th as f64 - 0.5).clamp(0.0, (sh - 1) as f64);
        let y0 = fy.floor() as usize;
        let y1 = (y0 + 1).min(sh - 1);
        let dy = fy - y0 as f64;
        for tx in 0..tw {
            let fx = ((tx as f64 + 0.5) * sw as f64 / tw as f64 - 0.5).clamp(0.0, (sw - 1) as f64);
            let x0 = fx.floor() as usize;
            let x1 = (x0 + 1).min(sw - 1);
            let dx = fx - x0 as f64;

            let top = src[y0 * sw + x0] * (1.0 - dx) + src[y0 * sw + x1] * dx;
            let bottom = src[y1 * sw + x0] * (1.0 - dx) + src[y1 * sw + x1] * dx;
            out.push(top * (1.0 - dy) + bottom * dy);
        }
    }
    out
}

fn downmix(audio: &RawAudio) -> Vec<f32> {
    let channels = audio.channels() as usize;
    if channels == 1 {
        return audio.samples().to_vec();
    }
    audio
        .samples()
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

fn resample_linear(samples: &[f32], src_rate: u32, dst_rate: u32) -> Vec<f32> {
    if src_rate == dst_rate {
        return samples.to_vec();
    }
    let out_len =
        ((samples.len() as u64 * dst_rate as u64) / src_rate as u64).max(1) as usize;
    let step = src_rate as f64 / dst_rate as f64;
    (0..out_len)
        .map(|i| {
            let pos = i as f64 * step;
            let i0 = pos.floor() as usize;
            if i0 + 1 >= samples.len() {
                samples[samples.len() - 1]
            } else {
                let frac = (pos - i0 as f64) as f32;
                samples[i0] * (1.0 - frac) + samples[i0 + 1] * frac
            }
        })
        .collect()
}

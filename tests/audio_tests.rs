use std::f32::consts::TAU;

use mediahash::{fingerprint, match_fingerprints, AudioConfig, HashError, RawAudio};

const RATE: u32 = 8_000;

fn tone(freq: f32, seconds: f32) -> Vec<f32> {
    let count = (RATE as f32 * seconds) as usize;
    (0..count)
        .map(|i| 0.8 * (TAU * freq * i as f32 / RATE as f32).sin())
        .collect()
}

/// A four-note sweep: enough spectral movement that alignment has a
/// unique best offset.
fn melody() -> Vec<f32> {
    let mut samples = tone(400.0, 0.5);
    samples.extend(tone(900.0, 0.5));
    samples.extend(tone(1_600.0, 0.5));
    samples.extend(tone(3_000.0, 0.5));
    samples
}

#[test]
fn test_fingerprint_is_deterministic() {
    let audio = RawAudio::mono(RATE, melody()).unwrap();
    let config = AudioConfig::default();
    let a = fingerprint(&audio, &config).unwrap();
    let b = fingerprint(&audio, &config).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_prepended_silence_recovers_offset() {
    let config = AudioConfig::default();
    let original = RawAudio::mono(RATE, melody()).unwrap();

    let mut padded_samples = vec![0.0f32; (RATE / 2) as usize]; // 500 ms
    padded_samples.extend(melody());
    let padded = RawAudio::mono(RATE, padded_samples).unwrap();

    let fp_original = fingerprint(&original, &config).unwrap();
    let fp_padded = fingerprint(&padded, &config).unwrap();

    let m = match_fingerprints(&fp_original, &fp_padded, &config).unwrap();
    println!(
        "best offset {} windows ({:.3} s), score {:.3}",
        m.offset,
        m.offset_seconds(&fp_original),
        m.score
    );

    // 500 ms at a 512-sample hop is 7.8 windows.
    assert!(
        (7..=9).contains(&m.offset),
        "expected an offset near 8 windows, got {}",
        m.offset
    );
    let seconds = m.offset_seconds(&fp_original);
    assert!(
        (0.40..=0.65).contains(&seconds),
        "offset {seconds:.3} s is not near the prepended 0.5 s"
    );
    assert!(
        m.score >= 0.6,
        "alignment score {:.3} is too low at the recovered offset",
        m.score
    );
}

#[test]
fn test_stereo_downmix_matches_mono() {
    let mono_samples = melody();
    let stereo_samples: Vec<f32> = mono_samples.iter().flat_map(|&s| [s, s]).collect();

    let config = AudioConfig::default();
    let fp_mono = fingerprint(&RawAudio::mono(RATE, mono_samples).unwrap(), &config).unwrap();
    let fp_stereo =
        fingerprint(&RawAudio::new(RATE, 2, stereo_samples).unwrap(), &config).unwrap();
    assert_eq!(fp_mono, fp_stereo);
}

#[test]
fn test_resampled_input_still_aligns() {
    // The same melody delivered at 16 kHz must land on the same bands
    // after normalization to the fingerprint rate.
    let config = AudioConfig::default();
    let count = (16_000.0 * 2.0) as usize;
    let hi_rate: Vec<f32> = (0..count)
        .map(|i| {
            let t = i as f32 / 16_000.0;
            let freq = if t < 1.0 { 500.0 } else { 1_250.0 };
            0.8 * (TAU * freq * t).sin()
        })
        .collect();
    let lo_rate: Vec<f32> = (0..(RATE as usize * 2))
        .map(|i| {
            let t = i as f32 / RATE as f32;
            let freq = if t < 1.0 { 500.0 } else { 1_250.0 };
            0.8 * (TAU * freq * t).sin()
        })
        .collect();

    let fp_hi = fingerprint(&RawAudio::mono(16_000, hi_rate).unwrap(), &config).unwrap();
    let fp_lo = fingerprint(&RawAudio::mono(RATE, lo_rate).unwrap(), &config).unwrap();

    let m = match_fingerprints(&fp_hi, &fp_lo, &config).unwrap();
    assert!(m.offset.abs() <= 1, "offset {} should be near zero", m.offset);
    assert!(
        m.score >= 0.8,
        "rate-normalized clips should align well, score was {:.3}",
        m.score
    );
}

#[test]
fn test_parameter_mismatch_is_rejected() {
    let audio = RawAudio::mono(RATE, melody()).unwrap();
    let config_a = AudioConfig::default();
    let config_b = AudioConfig::default().with_sample_rate(11_025);
    let a = fingerprint(&audio, &config_a).unwrap();
    let b = fingerprint(&audio, &config_b).unwrap();
    assert!(matches!(
        match_fingerprints(&a, &b, &config_a),
        Err(HashError::VariantMismatch(_))
    ));
}

#[test]
fn test_empty_audio_is_rejected() {
    assert!(matches!(
        RawAudio::mono(RATE, vec![]),
        Err(HashError::InvalidInput(_))
    ));
}

#[test]
fn test_pre_emphasis_changes_low_frequency_weighting() {
    // Pre-emphasis attenuates lows; a low tone plus high overtone tips
    // toward the overtone's band once the filter runs. The exact bands
    // are config-dependent; the fingerprints must simply differ while
    // each stays deterministic.
    let samples: Vec<f32> = (0..RATE as usize * 2)
        .map(|i| {
            let t = i as f32 / RATE as f32;
            0.7 * (TAU * 150.0 * t).sin() + 0.3 * (TAU * 2_800.0 * t).sin()
        })
        .collect();
    let audio = RawAudio::mono(RATE, samples).unwrap();

    let plain = fingerprint(&audio, &AudioConfig::default()).unwrap();
    let emphasized =
        fingerprint(&audio, &AudioConfig::default().with_pre_emphasis(0.97)).unwrap();
    assert_ne!(plain.bands(), emphasized.bands());
}

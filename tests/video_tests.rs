use image::{DynamicImage, RgbImage};
use mediahash::{
    compare_sequences, HashError, HashVariant, ImageAlgorithm, RawImage, TemporalAggregator,
    VideoConfig,
};

/// Build a synthetic frame; the scene index controls the spatial
/// frequency so consecutive scenes hash far apart.
fn scene_frame(scene: u32) -> RawImage {
    let mut img = RgbImage::new(64, 64);
    for y in 0..64u32 {
        for x in 0..64u32 {
            let value = ((x * (scene + 1)) % 64 * 4) as u8;
            img.put_pixel(x, y, image::Rgb([value, value, value]));
        }
    }
    RawImage::from_dynamic(&DynamicImage::ImageRgb8(img)).unwrap()
}

fn hash_scenes(scenes: &[u32], interval: u32) -> mediahash::FrameHashSequence {
    let config = VideoConfig::default().with_frame_interval(interval);
    let mut agg = TemporalAggregator::new(config).unwrap();
    for &scene in scenes {
        agg.push_frame(&scene_frame(scene)).unwrap();
    }
    agg.finalize().unwrap()
}

#[test]
fn test_aggregator_samples_at_interval() {
    let config = VideoConfig::default().with_frame_interval(5);
    let mut agg = TemporalAggregator::new(config).unwrap();
    for i in 0..23 {
        agg.push_frame(&scene_frame(i)).unwrap();
    }
    // Frames 0, 5, 10, 15, 20.
    assert_eq!(agg.sampled(), 5);
    let seq = agg.finalize().unwrap();
    assert_eq!(seq.len(), 5);
    assert_eq!(seq.frame_interval(), 5);
}

#[test]
fn test_same_content_different_start_aligns() {
    // The second encode carries three extra lead-in scenes, the analog
    // of a differing sampling phase between two encodes.
    let base: Vec<u32> = (0..10).collect();
    let mut padded: Vec<u32> = vec![90, 91, 92];
    padded.extend(&base);

    let a = hash_scenes(&base, 1);
    let b = hash_scenes(&padded, 1);

    let config = VideoConfig {
        min_overlap: 5,
        ..VideoConfig::default().with_frame_interval(1)
    };
    let m = compare_sequences(&a, &b, &config).unwrap();
    assert_eq!(m.offset, 3);
    assert_eq!(m.distance, 0.0);
    assert_eq!(m.overlap, 10);
}

#[test]
fn test_unrelated_videos_are_distant() {
    let a = hash_scenes(&[0, 1, 2, 3, 4, 5], 1);
    let b = hash_scenes(&[40, 47, 52, 33, 38, 59], 1);
    let config = VideoConfig {
        min_overlap: 4,
        ..VideoConfig::default().with_frame_interval(1)
    };
    let m = compare_sequences(&a, &b, &config).unwrap();
    assert!(
        m.distance > HashVariant::Video.default_threshold(),
        "unrelated sequences landed at {}",
        m.distance
    );
}

#[test]
fn test_pooled_hash_round_trip_and_isolation() {
    let seq = hash_scenes(&[1, 2, 3, 4], 1);
    let pooled = seq.pooled().unwrap();
    assert_eq!(pooled.variant(), HashVariant::Video);

    // A pooled video hash never compares against a per-frame image
    // hash, even at equal bit length.
    let frame_hash = &seq.hashes()[0];
    assert_eq!(frame_hash.variant(), HashVariant::Dct);
    assert!(matches!(
        mediahash::hamming_distance(&pooled, frame_hash),
        Err(HashError::VariantMismatch(_))
    ));
}

#[test]
fn test_sequences_with_different_algorithms_do_not_compare() {
    let base: Vec<u32> = (0..6).collect();
    let a = hash_scenes(&base, 1);

    let config = VideoConfig::default()
        .with_frame_interval(1)
        .with_algorithm(ImageAlgorithm::Difference);
    let mut agg = TemporalAggregator::new(config).unwrap();
    for &scene in &base {
        agg.push_frame(&scene_frame(scene)).unwrap();
    }
    let b = agg.finalize().unwrap();

    assert!(matches!(
        compare_sequences(&a, &b, &VideoConfig::default().with_frame_interval(1)),
        Err(HashError::VariantMismatch(_))
    ));
}

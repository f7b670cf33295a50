use face_palette_core::color::basic_variation;
use face_palette_core::features::{raw_descriptor, PHYSICAL_DIM};
use face_palette_core::{
    evaluate, generate_training_set, hex_to_rgb, log_dataset_summary, rgb_to_hex,
    AugmentationConfig, Augmenter, ColorCharacteristics, DatasetBuilder, DiversityLoss, Emotion,
    EmotionColorMapping, FeatureLayout, FeatureSynthesizer, PaletteError, PaletteLoss,
    PipelineConfig, Variant,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

const FIVE_EMOTIONS: [Emotion; 5] = [
    Emotion::Happy,
    Emotion::Sad,
    Emotion::Angry,
    Emotion::Fearful,
    Emotion::Surprised,
];

fn mean_and_std(values: &[f32]) -> (f32, f32) {
    let n = values.len() as f32;
    let mean = values.iter().sum::<f32>() / n;
    let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f32>() / n;
    (mean, var.sqrt())
}

#[test]
fn hex_conversion_fixed_points() {
    assert_eq!(hex_to_rgb("#FF0000").unwrap(), [1.0, 0.0, 0.0]);
    assert_eq!(hex_to_rgb("#000000").unwrap(), [0.0, 0.0, 0.0]);
    assert!(matches!(
        hex_to_rgb("#ZZZZZZ"),
        Err(PaletteError::InvalidColorFormat { .. })
    ));
    assert_eq!(rgb_to_hex([1.0, 0.0, 0.0]), "#FF0000");
}

#[test]
fn descriptors_are_standardized_for_every_emotion() {
    let mut rng = StdRng::seed_from_u64(2024);
    let synth = FeatureSynthesizer::new(FeatureLayout::Enhanced);
    for emotion in Emotion::ALL {
        for _ in 0..10 {
            let features = synth.synthesize(emotion, &mut rng);
            let (mean, std) = mean_and_std(&features.descriptor);
            assert!(mean.abs() < 1e-4, "{emotion}: mean {mean}");
            assert!((std - 1.0).abs() < 1e-3, "{emotion}: std {std}");

            let physical = features.physical().unwrap().to_array();
            assert_eq!(physical.len(), PHYSICAL_DIM);
            assert!(physical.iter().all(|v| (0.0..=1.0).contains(v)));
        }
    }
}

#[test]
fn happy_raw_descriptor_is_lifted() {
    let mut rng = StdRng::seed_from_u64(17);
    for _ in 0..20 {
        let raw = raw_descriptor(Emotion::Happy, &mut rng);
        assert!(raw.iter().all(|&x| x >= 0.2));
    }
}

#[test]
fn zero_brightness_hits_the_floor() {
    let mapping = EmotionColorMapping::builtin().unwrap();
    let characteristics = ColorCharacteristics::new(0.0, 0.9, 0.0).unwrap();
    for profile in mapping.profiles() {
        for palette in &profile.palettes {
            let out = basic_variation(palette.rgb(), &characteristics);
            assert!(out.iter().all(|v| (v - 0.1).abs() < 1e-6));
        }
    }
}

#[test]
fn five_emotions_forty_samples_factor_five() {
    let mapping = EmotionColorMapping::builtin()
        .unwrap()
        .restricted_to(&FIVE_EMOTIONS)
        .unwrap();
    let mut rng = StdRng::seed_from_u64(42);

    let base = DatasetBuilder::new(Variant::Enhanced, 40)
        .build(&mapping, &mut rng)
        .unwrap();
    assert_eq!(base.len(), 200);

    let augmented = Augmenter::new(AugmentationConfig::with_factor(5))
        .unwrap()
        .augment(&base, &mut rng)
        .unwrap();
    assert_eq!(augmented.len(), 1200);

    let (x, y) = augmented.to_arrays().unwrap();
    assert_eq!(x.nrows(), 1200);
    assert_eq!(y.nrows(), 1200);
    assert_eq!(x.ncols(), 148);
    assert!(y.iter().all(|v| (0.0..=1.0).contains(v)));

    let summary = augmented.summary();
    assert_eq!(summary.emotion_counts.len(), 5);
    assert!(summary.emotion_counts.values().all(|&count| count == 240));
}

#[test]
fn augmentation_size_law_holds_for_several_factors() {
    let mapping = EmotionColorMapping::builtin().unwrap();
    let base = DatasetBuilder::new(Variant::Basic, 2)
        .build(&mapping, &mut StdRng::seed_from_u64(5))
        .unwrap();

    for factor in 0..4 {
        let augmented = Augmenter::new(AugmentationConfig::with_factor(factor))
            .unwrap()
            .augment(&base, &mut StdRng::seed_from_u64(factor as u64))
            .unwrap();
        assert_eq!(augmented.len(), base.len() * (factor + 1));
        if factor == 0 {
            assert_eq!(augmented, base);
        }
    }
}

#[test]
fn configured_pipeline_is_reproducible() {
    let toml = r#"
        [generation]
        variant = "enhanced"
        samples_per_emotion = 3
        seed = 99
        emotions = ["happy", "neutral"]

        [augmentation]
        factor = 2
    "#;
    let config = PipelineConfig::from_str(toml).unwrap();
    let mapping = EmotionColorMapping::builtin().unwrap();

    let first = generate_training_set(&config, &mapping).unwrap();
    let second = generate_training_set(&config, &mapping).unwrap();
    assert_eq!(first.len(), 2 * 3 * 3);
    assert_eq!(first, second);
}

#[test]
fn configured_emotion_missing_from_mapping_is_an_error() {
    let config = PipelineConfig::from_str("[generation]\nemotions = [\"happy\"]").unwrap();
    let mapping = EmotionColorMapping::builtin()
        .unwrap()
        .restricted_to(&[Emotion::Sad])
        .unwrap();

    let err = generate_training_set(&config, &mapping).unwrap_err();
    assert!(matches!(
        err,
        PaletteError::EmotionNotInMapping {
            emotion: Emotion::Happy
        }
    ));
}

#[test]
fn loss_and_metrics_on_generated_targets() {
    let mapping = EmotionColorMapping::builtin().unwrap();
    let dataset = DatasetBuilder::new(Variant::Enhanced, 5)
        .build(&mapping, &mut StdRng::seed_from_u64(8))
        .unwrap();
    let (_, y) = dataset.to_arrays().unwrap();

    let loss = DiversityLoss::enhanced();
    let breakdown = loss.breakdown(y.view(), y.view()).unwrap();
    assert_eq!(breakdown.reconstruction, 0.0);
    assert!(breakdown.total > 0.0);

    let grey = y.mapv(|_| 0.5);
    let collapsed = loss.loss(y.view(), grey.view()).unwrap();
    assert!(collapsed > breakdown.total);

    let metrics = evaluate(y.view(), y.view()).unwrap();
    assert_eq!(metrics.mse, 0.0);
    assert!(metrics.unique_colors > 1);
}

#[test]
fn summaries_are_logged_as_json_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dataset.jsonl");
    let mapping = EmotionColorMapping::builtin().unwrap();
    let dataset = DatasetBuilder::new(Variant::Enhanced, 1)
        .build(&mapping, &mut StdRng::seed_from_u64(1))
        .unwrap();

    log_dataset_summary(&path, "generated", &dataset.summary()).unwrap();
    let contents = std::fs::read_to_string(&path).unwrap();
    let record: serde_json::Value = serde_json::from_str(contents.trim()).unwrap();
    assert_eq!(record["summary"]["feature_dim"], 148);
}

//! Performance benchmarks for dataset generation, augmentation and loss
//!
//! Run with: cargo bench --bench generation_benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use face_palette_core::{
    AugmentationConfig, Augmenter, DatasetBuilder, DiversityLoss, EmotionColorMapping,
    PaletteLoss, Variant,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn bench_build(c: &mut Criterion) {
    let mapping = EmotionColorMapping::builtin().unwrap();
    let mut group = c.benchmark_group("dataset_build");

    for samples in [10, 40, 160].iter() {
        for variant in [Variant::Basic, Variant::Enhanced] {
            group.bench_with_input(
                BenchmarkId::new(variant.as_str(), samples),
                samples,
                |b, &samples| {
                    let builder = DatasetBuilder::new(variant, samples);
                    b.iter(|| {
                        let mut rng = StdRng::seed_from_u64(42);
                        black_box(builder.build(&mapping, &mut rng).unwrap());
                    });
                },
            );
        }
    }

    group.finish();
}

fn bench_augment(c: &mut Criterion) {
    let mapping = EmotionColorMapping::builtin().unwrap();
    let base = DatasetBuilder::new(Variant::Enhanced, 40)
        .build(&mapping, &mut StdRng::seed_from_u64(42))
        .unwrap();
    let augmenter = Augmenter::new(AugmentationConfig::default()).unwrap();

    c.bench_function("augment_280x5", |b| {
        b.iter(|| {
            let mut rng = StdRng::seed_from_u64(7);
            black_box(augmenter.augment(&base, &mut rng).unwrap());
        });
    });
}

fn bench_loss(c: &mut Criterion) {
    let mapping = EmotionColorMapping::builtin().unwrap();
    let dataset = DatasetBuilder::new(Variant::Enhanced, 10)
        .build(&mapping, &mut StdRng::seed_from_u64(1))
        .unwrap();
    let (_, y) = dataset.to_arrays().unwrap();
    let prediction = y.mapv(|v| (v * 0.8 + 0.1).min(1.0));
    let loss = DiversityLoss::enhanced();

    let mut group = c.benchmark_group("diversity_loss");
    group.bench_function("value", |b| {
        b.iter(|| black_box(loss.loss(y.view(), prediction.view()).unwrap()));
    });
    group.bench_function("with_gradients", |b| {
        b.iter(|| black_box(loss.loss_with_gradients(y.view(), prediction.view()).unwrap()));
    });
    group.finish();
}

criterion_group!(benches, bench_build, bench_augment, bench_loss);
criterion_main!(benches);

//! Noise-based augmentation of generated examples.
//!
//! Every original example is kept and followed by `factor` noisy variants.
//! Descriptors get Gaussian noise clamped to [-3, 3], physical traits and
//! color targets get smaller noise clamped to [0, 1], and the random seed is
//! redrawn outright. Descriptors are not re-standardized afterwards.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::dataset::{Dataset, TrainingExample};
use crate::error::{PaletteError, PaletteResult};
use crate::features::{FeatureLayout, RandomSeed};

/// Bound applied to augmented descriptor values
pub const DESCRIPTOR_CLAMP: f32 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AugmentationConfig {
    /// Variants generated per original example
    pub factor: usize,
    pub descriptor_sigma: f32,
    pub physical_sigma: f32,
    pub color_sigma: f32,
}

impl Default for AugmentationConfig {
    fn default() -> Self {
        Self {
            factor: 5,
            descriptor_sigma: 0.1,
            physical_sigma: 0.05,
            color_sigma: 0.03,
        }
    }
}

impl AugmentationConfig {
    pub fn with_factor(factor: usize) -> Self {
        Self {
            factor,
            ..Self::default()
        }
    }
}

/// Applies an [`AugmentationConfig`] to datasets.
#[derive(Debug, Clone, Copy)]
pub struct Augmenter {
    config: AugmentationConfig,
    descriptor_noise: Normal<f32>,
    physical_noise: Normal<f32>,
    color_noise: Normal<f32>,
}

impl Augmenter {
    pub fn new(config: AugmentationConfig) -> PaletteResult<Self> {
        Ok(Self {
            config,
            descriptor_noise: noise("descriptor_sigma", config.descriptor_sigma)?,
            physical_noise: noise("physical_sigma", config.physical_sigma)?,
            color_noise: noise("color_sigma", config.color_sigma)?,
        })
    }

    pub fn config(&self) -> &AugmentationConfig {
        &self.config
    }

    /// Return the originals, each followed by its noisy variants.
    ///
    /// Every example is validated before any noise is drawn; a wrong-length
    /// feature vector or target aborts the whole call.
    pub fn augment<R: Rng + ?Sized>(&self, dataset: &Dataset, rng: &mut R) -> PaletteResult<Dataset> {
        dataset.validate()?;
        if self.config.factor == 0 {
            return Ok(dataset.clone());
        }

        let layout = dataset.layout();
        let seeds: Vec<u64> = (0..dataset.len()).map(|_| rng.gen::<u64>()).collect();

        let groups: Vec<Vec<TrainingExample>> = dataset
            .examples()
            .par_iter()
            .zip(seeds.par_iter())
            .map(|(example, &seed)| {
                let mut sample_rng = StdRng::seed_from_u64(seed);
                let mut group = Vec::with_capacity(self.config.factor + 1);
                group.push(example.clone());
                for _ in 0..self.config.factor {
                    group.push(self.variant_of(example, layout, &mut sample_rng));
                }
                group
            })
            .collect();

        let augmented =
            Dataset::from_examples(layout, groups.into_iter().flatten().collect())?;
        info!(
            "Augmented {} examples into {} (factor {})",
            dataset.len(),
            augmented.len(),
            self.config.factor
        );
        Ok(augmented)
    }

    /// One noisy copy of an already validated example.
    fn variant_of<R: Rng + ?Sized>(
        &self,
        example: &TrainingExample,
        layout: FeatureLayout,
        rng: &mut R,
    ) -> TrainingExample {
        let mut features = example.features.clone();

        for value in &mut features[layout.descriptor_range()] {
            *value = (*value + self.descriptor_noise.sample(rng))
                .clamp(-DESCRIPTOR_CLAMP, DESCRIPTOR_CLAMP);
        }
        if let Some(range) = layout.physical_range() {
            for value in &mut features[range] {
                *value = (*value + self.physical_noise.sample(rng)).clamp(0.0, 1.0);
            }
        }
        if let Some(range) = layout.seed_range() {
            features[range].copy_from_slice(&RandomSeed::generate(rng).0);
        }

        let target = example
            .target
            .iter()
            .map(|v| (v + self.color_noise.sample(rng)).clamp(0.0, 1.0))
            .collect();

        TrainingExample::new(features, target, example.emotion)
    }
}

fn noise(parameter: &str, sigma: f32) -> PaletteResult<Normal<f32>> {
    if !sigma.is_finite() || sigma < 0.0 {
        return Err(PaletteError::invalid_parameter(
            parameter,
            sigma,
            "must be finite and non-negative",
        ));
    }
    Normal::new(0.0, sigma)
        .map_err(|e| PaletteError::invalid_parameter(parameter, sigma, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::TARGET_DIM;
    use crate::data::DatasetBuilder;
    use crate::emotion::{Emotion, EmotionColorMapping};
    use crate::features::{DESCRIPTOR_DIM, ENHANCED_DIM};
    use crate::variant::Variant;

    fn generated(variant: Variant, samples: usize) -> Dataset {
        let mapping = EmotionColorMapping::builtin().unwrap();
        DatasetBuilder::new(variant, samples)
            .build(&mapping, &mut StdRng::seed_from_u64(11))
            .unwrap()
    }

    #[test]
    fn originals_are_followed_by_variants() {
        let dataset = generated(Variant::Enhanced, 2);
        let augmenter = Augmenter::new(AugmentationConfig::with_factor(3)).unwrap();
        let augmented = augmenter
            .augment(&dataset, &mut StdRng::seed_from_u64(5))
            .unwrap();

        assert_eq!(augmented.len(), dataset.len() * 4);
        for (i, original) in dataset.iter().enumerate() {
            let group = &augmented.examples()[i * 4..(i + 1) * 4];
            assert_eq!(&group[0], original);
            assert!(group.iter().all(|e| e.emotion == original.emotion));
            assert_ne!(group[1].features, original.features);
        }
    }

    #[test]
    fn values_stay_in_bounds() {
        let dataset = generated(Variant::Enhanced, 3);
        let config = AugmentationConfig {
            factor: 4,
            descriptor_sigma: 2.0,
            physical_sigma: 0.5,
            color_sigma: 0.5,
        };
        let augmented = Augmenter::new(config)
            .unwrap()
            .augment(&dataset, &mut StdRng::seed_from_u64(8))
            .unwrap();

        for example in augmented.iter() {
            assert!(example.features[..128].iter().all(|v| v.abs() <= DESCRIPTOR_CLAMP));
            assert!(example.features[128..].iter().all(|v| (0.0..=1.0).contains(v)));
            assert!(example.target.iter().all(|v| (0.0..=1.0).contains(v)));
        }
    }

    #[test]
    fn zero_factor_is_identity() {
        let dataset = generated(Variant::Basic, 2);
        let augmented = Augmenter::new(AugmentationConfig::with_factor(0))
            .unwrap()
            .augment(&dataset, &mut StdRng::seed_from_u64(1))
            .unwrap();
        assert_eq!(augmented, dataset);
    }

    #[test]
    fn zero_sigmas_only_redraw_the_seed() {
        let dataset = generated(Variant::Enhanced, 1);
        let config = AugmentationConfig {
            factor: 1,
            descriptor_sigma: 0.0,
            physical_sigma: 0.0,
            color_sigma: 0.0,
        };
        let augmented = Augmenter::new(config)
            .unwrap()
            .augment(&dataset, &mut StdRng::seed_from_u64(2))
            .unwrap();

        let (original, variant) = (&augmented.examples()[0], &augmented.examples()[1]);
        for (a, b) in original.features[..128].iter().zip(&variant.features[..128]) {
            assert_eq!(a.clamp(-DESCRIPTOR_CLAMP, DESCRIPTOR_CLAMP), *b);
        }
        assert_eq!(original.features[128..143], variant.features[128..143]);
        assert_ne!(original.features[143..], variant.features[143..]);
        assert_eq!(original.target, variant.target);
    }

    #[test]
    fn wrong_length_rows_fail_loudly() {
        // Bypass push validation the way a deserialized file would
        let json = serde_json::json!({
            "layout": "enhanced",
            "examples": [{
                "features": vec![0.0f32; DESCRIPTOR_DIM],
                "target": vec![0.5f32; TARGET_DIM],
                "emotion": "happy"
            }]
        });
        let dataset: Dataset = serde_json::from_value(json).unwrap();
        let err = Augmenter::new(AugmentationConfig::default())
            .unwrap()
            .augment(&dataset, &mut StdRng::seed_from_u64(0))
            .unwrap_err();
        assert!(matches!(
            err,
            PaletteError::DimensionMismatch {
                expected: ENHANCED_DIM,
                got: DESCRIPTOR_DIM,
                ..
            }
        ));
    }

    #[test]
    fn negative_sigma_is_rejected() {
        let config = AugmentationConfig {
            color_sigma: -0.1,
            ..AugmentationConfig::default()
        };
        assert!(matches!(
            Augmenter::new(config),
            Err(PaletteError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn labels_are_preserved() {
        let dataset = generated(Variant::Basic, 1);
        let augmented = Augmenter::new(AugmentationConfig::with_factor(2))
            .unwrap()
            .augment(&dataset, &mut StdRng::seed_from_u64(4))
            .unwrap();
        let happy = augmented
            .iter()
            .filter(|e| e.emotion == Emotion::Happy)
            .count();
        assert_eq!(happy, 3);
    }
}

//! Synthetic dataset generation: features + varied palette per sample.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::{debug, info};

use super::dataset::{Dataset, TrainingExample};
use crate::color::{basic_variation, enhanced_variation};
use crate::emotion::{EmotionColorMapping, EmotionProfile};
use crate::error::{PaletteError, PaletteResult};
use crate::features::{EnhancedFeatures, FeatureSynthesizer};
use crate::variant::Variant;

/// Generates `samples_per_emotion` examples for every emotion in a mapping.
///
/// Examples come out grouped by emotion in the mapping's canonical order.
/// Each sample gets its own seed drawn sequentially from the caller's RNG, so
/// the output is deterministic for a seeded RNG even though samples are
/// produced in parallel.
///
/// # Examples
///
/// ```
/// use face_palette_core::data::DatasetBuilder;
/// use face_palette_core::emotion::EmotionColorMapping;
/// use face_palette_core::Variant;
/// use rand::SeedableRng;
///
/// let mapping = EmotionColorMapping::builtin().unwrap();
/// let mut rng = rand::rngs::StdRng::seed_from_u64(7);
/// let dataset = DatasetBuilder::new(Variant::Enhanced, 3)
///     .build(&mapping, &mut rng)
///     .unwrap();
/// assert_eq!(dataset.len(), 3 * 7);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetBuilder {
    variant: Variant,
    samples_per_emotion: usize,
}

impl DatasetBuilder {
    pub fn new(variant: Variant, samples_per_emotion: usize) -> Self {
        Self {
            variant,
            samples_per_emotion,
        }
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn samples_per_emotion(&self) -> usize {
        self.samples_per_emotion
    }

    pub fn build<R: Rng + ?Sized>(
        &self,
        mapping: &EmotionColorMapping,
        rng: &mut R,
    ) -> PaletteResult<Dataset> {
        for profile in mapping.profiles() {
            if profile.palettes.is_empty() {
                return Err(PaletteError::EmptyCandidateSet {
                    emotion: profile.emotion,
                });
            }
        }

        info!(
            "Generating {} examples ({} emotions x {} samples, {} variant)",
            mapping.len() * self.samples_per_emotion,
            mapping.len(),
            self.samples_per_emotion,
            self.variant
        );

        let mut jobs = Vec::with_capacity(mapping.len() * self.samples_per_emotion);
        for profile in mapping.profiles() {
            debug!(
                "{}: {} base palettes",
                profile.emotion,
                profile.palettes.len()
            );
            for _ in 0..self.samples_per_emotion {
                jobs.push((profile, rng.gen::<u64>()));
            }
        }

        let examples = jobs
            .into_par_iter()
            .map(|(profile, seed)| {
                let mut sample_rng = StdRng::seed_from_u64(seed);
                self.generate_example(profile, &mut sample_rng)
            })
            .collect::<PaletteResult<Vec<_>>>()?;

        let dataset = Dataset::from_examples(self.variant.layout(), examples)?;
        info!("Generated {} examples", dataset.len());
        Ok(dataset)
    }

    /// Synthesize one example for a single emotion profile.
    ///
    /// RNG draws happen in a fixed order: descriptor, physical traits, seed,
    /// then the base palette choice.
    pub fn generate_example<R: Rng + ?Sized>(
        &self,
        profile: &EmotionProfile,
        rng: &mut R,
    ) -> PaletteResult<TrainingExample> {
        let features =
            FeatureSynthesizer::new(self.variant.layout()).synthesize(profile.emotion, rng);

        let palette = profile
            .palettes
            .choose(rng)
            .ok_or(PaletteError::EmptyCandidateSet {
                emotion: profile.emotion,
            })?;

        let target = match &features.enhanced {
            Some(EnhancedFeatures { physical, seed }) => {
                enhanced_variation(palette.rgb(), &profile.characteristics, physical, seed)
            }
            None => basic_variation(palette.rgb(), &profile.characteristics),
        };

        Ok(TrainingExample::new(
            features.to_flat(),
            target.to_vec(),
            profile.emotion,
        ))
    }
}

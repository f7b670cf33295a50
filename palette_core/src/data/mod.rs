//! Dataset generation, augmentation and bookkeeping.

pub mod augment;
pub mod builder;
pub mod dataset;

use rand::rngs::StdRng;
use rand::SeedableRng;

pub use augment::{AugmentationConfig, Augmenter, DESCRIPTOR_CLAMP};
pub use builder::DatasetBuilder;
pub use dataset::{Dataset, DatasetSummary, TrainingExample, ValueRange};

use crate::config::PipelineConfig;
use crate::emotion::EmotionColorMapping;
use crate::error::PaletteResult;

/// Build and augment a dataset exactly as a pipeline config describes.
///
/// A single `StdRng` seeded from `config.generation.seed` drives both stages.
/// Naming an emotion the mapping lacks is an
/// [`EmotionNotInMapping`](crate::error::PaletteError::EmotionNotInMapping) error.
pub fn generate_training_set(
    config: &PipelineConfig,
    mapping: &EmotionColorMapping,
) -> PaletteResult<Dataset> {
    let mapping = match &config.generation.emotions {
        Some(emotions) => mapping.restricted_to(emotions)?,
        None => mapping.clone(),
    };
    let mut rng = StdRng::seed_from_u64(config.generation.seed);

    let base = DatasetBuilder::new(config.generation.variant, config.generation.samples_per_emotion)
        .build(&mapping, &mut rng)?;
    Augmenter::new(config.augmentation)?.augment(&base, &mut rng)
}

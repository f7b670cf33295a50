//! # Face Palette Core
//!
//! Synthetic training data for a face → five-color palette regressor.
//! Emotion-conditioned face features (a 128-dim descriptor, optionally with
//! 15 physical traits and a 5-value random seed) are paired with palettes
//! derived from designer-chosen base palettes, then augmented with noise.
//! A diversity-aware loss with analytic gradients scores predictions so that
//! an external trainer does not collapse every palette to the same grey.
//!
//! ## Quick Start
//!
//! ```rust
//! use face_palette_core::{
//!     Augmenter, AugmentationConfig, DatasetBuilder, DiversityLoss, EmotionColorMapping,
//!     PaletteLoss, Variant,
//! };
//! use rand::SeedableRng;
//!
//! let mapping = EmotionColorMapping::builtin().unwrap();
//! let mut rng = rand::rngs::StdRng::seed_from_u64(42);
//!
//! let base = DatasetBuilder::new(Variant::Enhanced, 4).build(&mapping, &mut rng).unwrap();
//! let augmented = Augmenter::new(AugmentationConfig::with_factor(2))
//!     .unwrap()
//!     .augment(&base, &mut rng)
//!     .unwrap();
//! assert_eq!(augmented.len(), base.len() * 3);
//!
//! let (_x, y) = augmented.to_arrays().unwrap();
//! let loss = DiversityLoss::enhanced().loss(y.view(), y.view()).unwrap();
//! assert!(loss > 0.0);
//! ```
//!
//! ## Core Modules
//!
//! - [`color`] - Hex/RGB conversion and palette variation
//! - [`features`] - Descriptor, physical trait and seed synthesis
//! - [`data`] - Dataset generation and augmentation
//! - [`neural`] - Diversity-aware loss and evaluation metrics
//! - [`training`] - Trainer and exporter seams
//! - [`config`] - Pipeline configuration via TOML
//! - [`logging`] - JSON line-delimited run records

pub mod color;
pub mod config;
pub mod data;
pub mod emotion;
pub mod error;
pub mod features;
pub mod logging;
pub mod neural;
pub mod training;
pub mod variant;

pub use color::{hex_to_rgb, palette_to_rgb, rgb_to_hex, ColorTarget, VariationFactors};
pub use config::{ConfigError, GenerationConfig, PipelineConfig};
pub use data::{
    generate_training_set, AugmentationConfig, Augmenter, Dataset, DatasetBuilder,
    DatasetSummary, TrainingExample,
};
pub use emotion::{ColorCharacteristics, Emotion, EmotionColorMapping, EmotionProfile, Palette};
pub use error::{PaletteError, PaletteResult};
pub use features::{
    EnhancedFeatures, FeatureLayout, FeatureSynthesizer, FeatureVector, PhysicalFeatures,
    RandomSeed,
};
pub use logging::{log_dataset_summary, log_training_epoch};
pub use neural::{evaluate, DiversityLoss, DiversityLossConfig, LossBreakdown, PaletteLoss, PaletteMetrics};
pub use training::{train_and_export, InputBreakdown, ModelExporter, ModelInfo, PaletteTrainer};
pub use variant::Variant;

//! Pipeline configuration via TOML files.
//!
//! Every key is optional. Missing sections fall back to the enhanced
//! pipeline: 40 samples per emotion, seed 42, five augmented variants per
//! example and the variant's loss weights.
//!
//! ```toml
//! [generation]
//! variant = "enhanced"
//! samples_per_emotion = 40
//! seed = 42
//! emotions = ["happy", "sad"]   # optional subset
//!
//! [augmentation]
//! factor = 5
//! descriptor_sigma = 0.1
//! physical_sigma = 0.05
//! color_sigma = 0.03
//!
//! [loss]                        # each key overrides the variant default
//! diversity_sharpness = 2.0
//! diversity_weight = 0.15
//! contrast_weight = 0.1
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::AugmentationConfig;
use crate::emotion::Emotion;
use crate::neural::loss::{DiversityLoss, DiversityLossConfig};
use crate::variant::Variant;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Full pipeline configuration.
///
/// # Examples
///
/// ```
/// use face_palette_core::PipelineConfig;
///
/// let config = PipelineConfig::from_str("[generation]\nvariant = \"basic\"").unwrap();
/// assert_eq!(config.generation.samples_per_emotion, 40);
/// assert_eq!(config.loss.contrast_weight, 0.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineConfig {
    pub generation: GenerationConfig,
    pub augmentation: AugmentationConfig,
    pub loss: DiversityLossConfig,
}

/// What to generate before augmentation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationConfig {
    pub variant: Variant,
    pub samples_per_emotion: usize,
    /// Seed of the single RNG driving generation and augmentation
    pub seed: u64,
    /// Restrict generation to these emotions; `None` uses the whole mapping
    pub emotions: Option<Vec<Emotion>>,
}

impl PipelineConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_str(&contents)
    }

    pub fn from_str(toml_str: &str) -> Result<Self, ConfigError> {
        let raw: RawPipelineConfig =
            toml::from_str(toml_str).map_err(|err| ConfigError::Parse(err.to_string()))?;

        let generation = GenerationConfig::try_from(&raw.generation)?;
        let augmentation = augmentation_from(&raw.augmentation)?;
        let loss = loss_from(&raw.loss, generation.variant)?;

        Ok(Self {
            generation,
            augmentation,
            loss,
        })
    }

    pub fn diversity_loss(&self) -> DiversityLoss {
        DiversityLoss::new(self.loss)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let variant = Variant::default();
        Self {
            generation: GenerationConfig {
                variant,
                samples_per_emotion: default_samples_per_emotion(),
                seed: default_seed(),
                emotions: None,
            },
            augmentation: AugmentationConfig::default(),
            loss: variant.loss_config(),
        }
    }
}

impl GenerationConfig {
    fn try_from(raw: &RawGeneration) -> Result<Self, ConfigError> {
        if raw.samples_per_emotion == 0 {
            return Err(ConfigError::Parse(
                "generation.samples_per_emotion must be ≥ 1".into(),
            ));
        }
        if let Some(emotions) = &raw.emotions {
            if emotions.is_empty() {
                return Err(ConfigError::Parse(
                    "generation.emotions must name at least one emotion".into(),
                ));
            }
        }

        Ok(Self {
            variant: raw.variant,
            samples_per_emotion: raw.samples_per_emotion,
            seed: raw.seed,
            emotions: raw.emotions.clone(),
        })
    }
}

fn augmentation_from(raw: &RawAugmentation) -> Result<AugmentationConfig, ConfigError> {
    for (name, sigma) in [
        ("descriptor_sigma", raw.descriptor_sigma),
        ("physical_sigma", raw.physical_sigma),
        ("color_sigma", raw.color_sigma),
    ] {
        if !sigma.is_finite() || sigma < 0.0 {
            return Err(ConfigError::Parse(format!(
                "augmentation.{name} must be ≥ 0"
            )));
        }
    }

    Ok(AugmentationConfig {
        factor: raw.factor,
        descriptor_sigma: raw.descriptor_sigma,
        physical_sigma: raw.physical_sigma,
        color_sigma: raw.color_sigma,
    })
}

fn loss_from(raw: &RawLoss, variant: Variant) -> Result<DiversityLossConfig, ConfigError> {
    let defaults = variant.loss_config();
    let config = DiversityLossConfig {
        diversity_sharpness: raw
            .diversity_sharpness
            .unwrap_or(defaults.diversity_sharpness),
        diversity_weight: raw.diversity_weight.unwrap_or(defaults.diversity_weight),
        contrast_weight: raw.contrast_weight.unwrap_or(defaults.contrast_weight),
    };

    for (name, value) in [
        ("diversity_sharpness", config.diversity_sharpness),
        ("diversity_weight", config.diversity_weight),
        ("contrast_weight", config.contrast_weight),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(ConfigError::Parse(format!("loss.{name} must be ≥ 0")));
        }
    }
    Ok(config)
}

#[derive(Debug, Default, Deserialize)]
struct RawPipelineConfig {
    #[serde(default)]
    generation: RawGeneration,
    #[serde(default)]
    augmentation: RawAugmentation,
    #[serde(default)]
    loss: RawLoss,
}

#[derive(Debug, Deserialize)]
struct RawGeneration {
    #[serde(default)]
    variant: Variant,
    #[serde(default = "default_samples_per_emotion")]
    samples_per_emotion: usize,
    #[serde(default = "default_seed")]
    seed: u64,
    #[serde(default)]
    emotions: Option<Vec<Emotion>>,
}

impl Default for RawGeneration {
    fn default() -> Self {
        Self {
            variant: Variant::default(),
            samples_per_emotion: default_samples_per_emotion(),
            seed: default_seed(),
            emotions: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawAugmentation {
    #[serde(default = "default_factor")]
    factor: usize,
    #[serde(default = "default_descriptor_sigma")]
    descriptor_sigma: f32,
    #[serde(default = "default_physical_sigma")]
    physical_sigma: f32,
    #[serde(default = "default_color_sigma")]
    color_sigma: f32,
}

impl Default for RawAugmentation {
    fn default() -> Self {
        Self {
            factor: default_factor(),
            descriptor_sigma: default_descriptor_sigma(),
            physical_sigma: default_physical_sigma(),
            color_sigma: default_color_sigma(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawLoss {
    diversity_sharpness: Option<f32>,
    diversity_weight: Option<f32>,
    contrast_weight: Option<f32>,
}

fn default_samples_per_emotion() -> usize {
    40
}

fn default_seed() -> u64 {
    42
}

fn default_factor() -> usize {
    AugmentationConfig::default().factor
}

fn default_descriptor_sigma() -> f32 {
    AugmentationConfig::default().descriptor_sigma
}

fn default_physical_sigma() -> f32 {
    AugmentationConfig::default().physical_sigma
}

fn default_color_sigma() -> f32 {
    AugmentationConfig::default().color_sigma
}

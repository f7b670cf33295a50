//! Feature vector layouts: descriptor ‖ physical ‖ seed.

use std::ops::Range;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::descriptor::DESCRIPTOR_DIM;
use super::physical::{PhysicalFeatures, PHYSICAL_DIM};
use crate::error::{PaletteError, PaletteResult};

/// Length of the per-sample random seed
pub const SEED_DIM: usize = 5;
/// Length of the enhanced feature vector
pub const ENHANCED_DIM: usize = DESCRIPTOR_DIM + PHYSICAL_DIM + SEED_DIM;

/// Five uniform [0, 1) draws feeding the palette jitter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RandomSeed(pub [f32; SEED_DIM]);

impl RandomSeed {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(std::array::from_fn(|_| rng.gen::<f32>()))
    }
}

/// Shape of the network input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureLayout {
    /// 128 descriptor values
    DescriptorOnly,
    /// 128 descriptor + 15 physical + 5 seed values
    Enhanced,
}

impl FeatureLayout {
    pub fn dim(&self) -> usize {
        match self {
            FeatureLayout::DescriptorOnly => DESCRIPTOR_DIM,
            FeatureLayout::Enhanced => ENHANCED_DIM,
        }
    }

    pub fn from_dim(dim: usize) -> Option<Self> {
        match dim {
            DESCRIPTOR_DIM => Some(FeatureLayout::DescriptorOnly),
            ENHANCED_DIM => Some(FeatureLayout::Enhanced),
            _ => None,
        }
    }

    pub fn descriptor_range(&self) -> Range<usize> {
        0..DESCRIPTOR_DIM
    }

    pub fn physical_range(&self) -> Option<Range<usize>> {
        match self {
            FeatureLayout::DescriptorOnly => None,
            FeatureLayout::Enhanced => Some(DESCRIPTOR_DIM..DESCRIPTOR_DIM + PHYSICAL_DIM),
        }
    }

    pub fn seed_range(&self) -> Option<Range<usize>> {
        match self {
            FeatureLayout::DescriptorOnly => None,
            FeatureLayout::Enhanced => Some(DESCRIPTOR_DIM + PHYSICAL_DIM..ENHANCED_DIM),
        }
    }
}

/// Physical traits and random seed; the two extra parts of the enhanced layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnhancedFeatures {
    pub physical: PhysicalFeatures,
    pub seed: RandomSeed,
}

/// A structured feature vector. `enhanced` is present exactly for the
/// enhanced layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub descriptor: Vec<f32>,
    pub enhanced: Option<EnhancedFeatures>,
}

impl FeatureVector {
    pub fn layout(&self) -> FeatureLayout {
        match self.enhanced {
            Some(_) => FeatureLayout::Enhanced,
            None => FeatureLayout::DescriptorOnly,
        }
    }

    pub fn physical(&self) -> Option<&PhysicalFeatures> {
        self.enhanced.as_ref().map(|parts| &parts.physical)
    }

    pub fn seed(&self) -> Option<&RandomSeed> {
        self.enhanced.as_ref().map(|parts| &parts.seed)
    }

    /// Concatenate the parts in layout order.
    pub fn to_flat(&self) -> Vec<f32> {
        let mut flat = Vec::with_capacity(self.layout().dim());
        flat.extend_from_slice(&self.descriptor);
        if let Some(EnhancedFeatures { physical, seed }) = &self.enhanced {
            flat.extend_from_slice(&physical.to_array());
            flat.extend_from_slice(&seed.0);
        }
        flat
    }

    /// Split a flat row back into its parts.
    pub fn from_flat(values: &[f32]) -> PaletteResult<Self> {
        let layout = FeatureLayout::from_dim(values.len()).ok_or_else(|| {
            PaletteError::dimension_mismatch(ENHANCED_DIM, values.len(), "feature vector")
        })?;

        let descriptor = values[layout.descriptor_range()].to_vec();
        let enhanced = match (layout.physical_range(), layout.seed_range()) {
            (Some(physical), Some(seed_range)) => {
                let mut seed = [0.0; SEED_DIM];
                seed.copy_from_slice(&values[seed_range]);
                Some(EnhancedFeatures {
                    physical: PhysicalFeatures::from_slice(&values[physical])?,
                    seed: RandomSeed(seed),
                })
            }
            _ => None,
        };

        Ok(Self {
            descriptor,
            enhanced,
        })
    }
}

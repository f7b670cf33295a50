//! Emotion-conditioned feature synthesis.
//!
//! - [`descriptor`] - 128-dim standardized face descriptors
//! - [`physical`] - 15 named physical traits
//! - [`vector`] - layouts combining descriptor, traits and random seed

pub mod descriptor;
pub mod physical;
pub mod vector;

use rand::Rng;

use crate::emotion::Emotion;

pub use descriptor::{
    generate_descriptor, raw_descriptor, standardize, DescriptorTransform, DESCRIPTOR_DIM,
};
pub use physical::{
    generate_physical_features, FaceCharacteristics, FaceShape, Jawline, PhysicalFeatures,
    PhysicalProfile, PhysicalTrait, SizeClass, TraitRange, WidthClass, PHYSICAL_DIM,
};
pub use vector::{
    EnhancedFeatures, FeatureLayout, FeatureVector, RandomSeed, ENHANCED_DIM, SEED_DIM,
};

/// Produces feature vectors for a fixed layout.
///
/// # Examples
///
/// ```
/// use face_palette_core::emotion::Emotion;
/// use face_palette_core::features::{FeatureLayout, FeatureSynthesizer};
/// use rand::SeedableRng;
///
/// let mut rng = rand::rngs::StdRng::seed_from_u64(42);
/// let synth = FeatureSynthesizer::new(FeatureLayout::Enhanced);
/// let features = synth.synthesize(Emotion::Happy, &mut rng);
/// assert_eq!(features.to_flat().len(), 148);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureSynthesizer {
    layout: FeatureLayout,
}

impl FeatureSynthesizer {
    pub fn new(layout: FeatureLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> FeatureLayout {
        self.layout
    }

    pub fn synthesize<R: Rng + ?Sized>(&self, emotion: Emotion, rng: &mut R) -> FeatureVector {
        let descriptor = generate_descriptor(emotion, rng);
        match self.layout {
            FeatureLayout::DescriptorOnly => FeatureVector {
                descriptor,
                enhanced: None,
            },
            FeatureLayout::Enhanced => {
                let physical = generate_physical_features(emotion, rng);
                let seed = RandomSeed::generate(rng);
                FeatureVector {
                    descriptor,
                    enhanced: Some(EnhancedFeatures { physical, seed }),
                }
            }
        }
    }
}

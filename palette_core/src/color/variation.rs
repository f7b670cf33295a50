//! Palette variation: derive a perturbed RGB target from a base palette.
//!
//! Each of the five triples is processed independently in the fixed order
//! brightness → saturation → temperature → softness. Every step reads the
//! triple as left by the previous step. The result is clamped to [0, 1].

use super::transform::TARGET_DIM;
use crate::emotion::ColorCharacteristics;
use crate::features::{PhysicalFeatures, RandomSeed};

/// Flattened 5-color RGB target
pub type ColorTarget = [f32; TARGET_DIM];

/// Gray level that brightness scaling pulls toward
const BRIGHTNESS_FLOOR: f32 = 0.1;
/// Constant that the softness blend pulls every channel toward
const SOFTNESS_TARGET: f32 = 0.1;

/// Resolved per-sample adjustment factors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariationFactors {
    pub brightness: f32,
    pub saturation: f32,
    pub temperature: f32,
    /// Softness blend strength; only positive values have an effect
    pub softness: f32,
}

impl VariationFactors {
    /// Factors taken directly from the emotion's characteristics.
    pub fn basic(characteristics: &ColorCharacteristics) -> Self {
        Self {
            brightness: characteristics.brightness,
            saturation: characteristics.saturation,
            temperature: characteristics.temperature,
            softness: 0.0,
        }
    }

    /// Characteristics plus seed-driven jitter plus physical-feature bias.
    ///
    /// * brightness += seed\[0\]·0.3 − 0.15 + (eye_size − 0.5)·0.2
    /// * saturation += seed\[1\]·0.4 − 0.2 + (eye_size − 0.5)·0.2
    /// * temperature += seed\[2\]·0.4 − 0.2 + (mouth_width − 0.5)·0.1
    /// * softness = (face_aspect_ratio − 0.5)·0.1
    pub fn enhanced(
        characteristics: &ColorCharacteristics,
        physical: &PhysicalFeatures,
        seed: &RandomSeed,
    ) -> Self {
        let jitter_brightness = seed.0[0] * 0.3 - 0.15;
        let jitter_saturation = seed.0[1] * 0.4 - 0.2;
        let jitter_temperature = seed.0[2] * 0.4 - 0.2;

        let eye_enhancement = (physical.eye_size - 0.5) * 0.2;
        let mouth_warmth = (physical.mouth_width - 0.5) * 0.1;
        let face_softness = (physical.face_aspect_ratio - 0.5) * 0.1;

        Self {
            brightness: characteristics.brightness + jitter_brightness + eye_enhancement,
            saturation: characteristics.saturation + jitter_saturation + eye_enhancement,
            temperature: characteristics.temperature + jitter_temperature + mouth_warmth,
            softness: face_softness,
        }
    }
}

/// Apply the basic recipe to a flattened base palette.
pub fn basic_variation(base: &ColorTarget, characteristics: &ColorCharacteristics) -> ColorTarget {
    apply_factors(base, &VariationFactors::basic(characteristics))
}

/// Apply the enhanced recipe to a flattened base palette.
pub fn enhanced_variation(
    base: &ColorTarget,
    characteristics: &ColorCharacteristics,
    physical: &PhysicalFeatures,
    seed: &RandomSeed,
) -> ColorTarget {
    apply_factors(
        base,
        &VariationFactors::enhanced(characteristics, physical, seed),
    )
}

/// Run every triple through the adjustment chain and clamp to [0, 1].
pub fn apply_factors(base: &ColorTarget, factors: &VariationFactors) -> ColorTarget {
    let mut out = *base;
    for triple in out.chunks_exact_mut(3) {
        adjust_brightness(triple, factors.brightness);
        adjust_saturation(triple, factors.saturation);
        adjust_temperature(triple, factors.temperature);
        if factors.softness > 0.0 {
            soften(triple, factors.softness);
        }
    }
    for value in out.iter_mut() {
        *value = value.clamp(0.0, 1.0);
    }
    out
}

fn adjust_brightness(triple: &mut [f32], factor: f32) {
    for value in triple.iter_mut() {
        *value = *value * factor + (1.0 - factor) * BRIGHTNESS_FLOOR;
    }
}

/// Pull every channel toward the triple's current maximum.
fn adjust_saturation(triple: &mut [f32], factor: f32) {
    let max = triple.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    if max > 0.0 {
        for value in triple.iter_mut() {
            *value = *value * factor + (1.0 - factor) * max;
        }
    }
}

fn adjust_temperature(triple: &mut [f32], factor: f32) {
    // Negative temperatures mirror the warm shift: R down, B up.
    triple[0] += factor * 0.1;
    triple[1] += factor * 0.05;
    triple[2] -= factor * 0.1;
}

fn soften(triple: &mut [f32], softness: f32) {
    let weight = softness * 0.1;
    for value in triple.iter_mut() {
        *value = *value * (1.0 - weight) + weight * SOFTNESS_TARGET;
    }
}

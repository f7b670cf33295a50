//! Synthetic 128-dim face descriptors.
//!
//! A standard normal draw is shaped by a per-emotion transform and then
//! standardized to zero mean and unit variance.

use std::f32::consts::PI;

use rand::Rng;
use rand_distr::StandardNormal;

use crate::emotion::Emotion;

/// Length of the face descriptor
pub const DESCRIPTOR_DIM: usize = 128;

/// Added to the standard deviation before dividing
const STD_EPSILON: f32 = 1e-8;

/// Deterministic shaping applied to the normal base vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DescriptorTransform {
    /// `sign · |x| · scale + shift`
    Folded { sign: f32, scale: f32, shift: f32 },
    /// `sign(x) · |x|^exponent`
    SignedPower { exponent: f32 },
    /// Multiply the first `count` components by `factor`
    ScaleLeading { count: usize, factor: f32 },
    /// `tanh(x) · scale`
    Tanh { scale: f32 },
    /// Multiply by `sin` sampled evenly over `[0, span]`, endpoints included
    SineModulation { span: f32 },
    Identity,
}

impl DescriptorTransform {
    pub fn apply(&self, values: &mut [f32]) {
        match *self {
            DescriptorTransform::Folded { sign, scale, shift } => {
                for v in values.iter_mut() {
                    *v = sign * v.abs() * scale + shift;
                }
            }
            DescriptorTransform::SignedPower { exponent } => {
                for v in values.iter_mut() {
                    *v = v.signum() * v.abs().powf(exponent);
                }
            }
            DescriptorTransform::ScaleLeading { count, factor } => {
                for v in values.iter_mut().take(count) {
                    *v *= factor;
                }
            }
            DescriptorTransform::Tanh { scale } => {
                for v in values.iter_mut() {
                    *v = v.tanh() * scale;
                }
            }
            DescriptorTransform::SineModulation { span } => {
                let steps = values.len().saturating_sub(1).max(1) as f32;
                for (i, v) in values.iter_mut().enumerate() {
                    *v *= (span * i as f32 / steps).sin();
                }
            }
            DescriptorTransform::Identity => {}
        }
    }
}

impl Emotion {
    pub fn descriptor_transform(&self) -> DescriptorTransform {
        match self {
            Emotion::Happy => DescriptorTransform::Folded {
                sign: 1.0,
                scale: 0.8,
                shift: 0.2,
            },
            Emotion::Sad => DescriptorTransform::Folded {
                sign: -1.0,
                scale: 0.6,
                shift: -0.1,
            },
            Emotion::Angry => DescriptorTransform::SignedPower { exponent: 0.5 },
            Emotion::Fearful => DescriptorTransform::ScaleLeading {
                count: 32,
                factor: 1.5,
            },
            Emotion::Disgusted => DescriptorTransform::Tanh { scale: 0.5 },
            Emotion::Surprised => DescriptorTransform::SineModulation { span: 4.0 * PI },
            Emotion::Neutral => DescriptorTransform::Identity,
        }
    }
}

/// Emotion-shaped descriptor before standardization.
pub fn raw_descriptor<R: Rng + ?Sized>(emotion: Emotion, rng: &mut R) -> Vec<f32> {
    let mut values: Vec<f32> = (0..DESCRIPTOR_DIM)
        .map(|_| rng.sample::<f32, _>(StandardNormal))
        .collect();
    emotion.descriptor_transform().apply(&mut values);
    values
}

/// Emotion-shaped descriptor with zero mean and unit variance.
pub fn generate_descriptor<R: Rng + ?Sized>(emotion: Emotion, rng: &mut R) -> Vec<f32> {
    let mut values = raw_descriptor(emotion, rng);
    standardize(&mut values);
    values
}

/// `(x − mean) / (std + 1e-8)` with the population standard deviation.
pub fn standardize(values: &mut [f32]) {
    if values.is_empty() {
        return;
    }
    let n = values.len() as f32;
    let mean = values.iter().sum::<f32>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / n;
    let denom = variance.sqrt() + STD_EPSILON;
    for v in values.iter_mut() {
        *v = (*v - mean) / denom;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn mean_std(values: &[f32]) -> (f32, f32) {
        let n = values.len() as f32;
        let mean = values.iter().sum::<f32>() / n;
        let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / n;
        (mean, var.sqrt())
    }

    #[test]
    fn descriptors_are_standardized_for_every_emotion() {
        let mut rng = StdRng::seed_from_u64(42);
        for emotion in Emotion::ALL {
            for _ in 0..20 {
                let descriptor = generate_descriptor(emotion, &mut rng);
                assert_eq!(descriptor.len(), DESCRIPTOR_DIM);
                let (mean, std) = mean_std(&descriptor);
                assert!(mean.abs() < 1e-4, "{emotion} mean {mean}");
                assert!((std - 1.0).abs() < 1e-3, "{emotion} std {std}");
            }
        }
    }

    #[test]
    fn happy_raw_descriptor_is_bounded_below() {
        let mut rng = StdRng::seed_from_u64(1234);
        for _ in 0..50 {
            let raw = raw_descriptor(Emotion::Happy, &mut rng);
            assert!(raw.iter().all(|v| *v >= 0.2));
        }
    }

    #[test]
    fn sad_raw_descriptor_is_bounded_above() {
        let mut rng = StdRng::seed_from_u64(99);
        let raw = raw_descriptor(Emotion::Sad, &mut rng);
        assert!(raw.iter().all(|v| *v <= -0.1));
    }

    #[test]
    fn disgusted_raw_descriptor_is_squashed() {
        let mut rng = StdRng::seed_from_u64(5);
        let raw = raw_descriptor(Emotion::Disgusted, &mut rng);
        assert!(raw.iter().all(|v| v.abs() <= 0.5));
    }

    #[test]
    fn signed_power_keeps_sign() {
        let mut values = vec![-4.0, 0.0, 9.0];
        DescriptorTransform::SignedPower { exponent: 0.5 }.apply(&mut values);
        for (got, want) in values.iter().zip([-2.0f32, 0.0, 3.0]) {
            assert!((got - want).abs() < 1e-6);
        }
    }

    #[test]
    fn scale_leading_touches_prefix_only() {
        let mut values = vec![1.0; 40];
        DescriptorTransform::ScaleLeading {
            count: 32,
            factor: 1.5,
        }
        .apply(&mut values);
        assert!(values[..32].iter().all(|v| *v == 1.5));
        assert!(values[32..].iter().all(|v| *v == 1.0));
    }

    #[test]
    fn sine_modulation_spans_endpoints() {
        let mut values = vec![1.0; DESCRIPTOR_DIM];
        Emotion::Surprised.descriptor_transform().apply(&mut values);
        assert!(values[0].abs() < 1e-6);
        // sin(4π) at the last index
        assert!(values[DESCRIPTOR_DIM - 1].abs() < 1e-5);
        let expected = (4.0 * PI * 16.0 / 127.0).sin();
        assert!((values[16] - expected).abs() < 1e-6);
    }

    #[test]
    fn standardize_handles_constant_vectors() {
        let mut values = vec![3.0; 16];
        standardize(&mut values);
        assert!(values.iter().all(|v| v.is_finite() && v.abs() < 1e-6));
    }

    #[test]
    fn same_seed_same_descriptor() {
        let a = generate_descriptor(Emotion::Angry, &mut StdRng::seed_from_u64(3));
        let b = generate_descriptor(Emotion::Angry, &mut StdRng::seed_from_u64(3));
        assert_eq!(a, b);
    }
}

//! Paired (features, palette target) examples and dataset bookkeeping.

use std::collections::BTreeMap;

use ndarray::Array2;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::color::TARGET_DIM;
use crate::emotion::Emotion;
use crate::error::{PaletteError, PaletteResult};
use crate::features::FeatureLayout;
use crate::neural::loss::is_extreme;

/// One network input row and its 15-value RGB target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingExample {
    pub features: Vec<f32>,
    pub target: Vec<f32>,
    pub emotion: Emotion,
}

impl TrainingExample {
    pub fn new(features: Vec<f32>, target: Vec<f32>, emotion: Emotion) -> Self {
        Self {
            features,
            target,
            emotion,
        }
    }

    /// Check both lengths against a layout.
    pub fn validate(&self, layout: FeatureLayout) -> PaletteResult<()> {
        if self.features.len() != layout.dim() {
            return Err(PaletteError::dimension_mismatch(
                layout.dim(),
                self.features.len(),
                format!("{} feature vector", self.emotion),
            ));
        }
        if self.target.len() != TARGET_DIM {
            return Err(PaletteError::dimension_mismatch(
                TARGET_DIM,
                self.target.len(),
                format!("{} color target", self.emotion),
            ));
        }
        Ok(())
    }
}

/// Ordered collection of examples sharing one feature layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    layout: FeatureLayout,
    examples: Vec<TrainingExample>,
}

impl Dataset {
    pub fn new(layout: FeatureLayout) -> Self {
        Self {
            layout,
            examples: Vec::new(),
        }
    }

    pub fn with_capacity(layout: FeatureLayout, capacity: usize) -> Self {
        Self {
            layout,
            examples: Vec::with_capacity(capacity),
        }
    }

    /// Build from pre-made examples, rejecting any with the wrong shape.
    pub fn from_examples(
        layout: FeatureLayout,
        examples: Vec<TrainingExample>,
    ) -> PaletteResult<Self> {
        for example in &examples {
            example.validate(layout)?;
        }
        Ok(Self { layout, examples })
    }

    pub fn push(&mut self, example: TrainingExample) -> PaletteResult<()> {
        example.validate(self.layout)?;
        self.examples.push(example);
        Ok(())
    }

    /// Re-check every example; used after deserializing untrusted data.
    pub fn validate(&self) -> PaletteResult<()> {
        self.examples
            .iter()
            .try_for_each(|example| example.validate(self.layout))
    }

    pub fn layout(&self) -> FeatureLayout {
        self.layout
    }

    pub fn examples(&self) -> &[TrainingExample] {
        &self.examples
    }

    pub fn into_examples(self) -> Vec<TrainingExample> {
        self.examples
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TrainingExample> {
        self.examples.iter()
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    pub fn labels(&self) -> Vec<Emotion> {
        self.examples.iter().map(|e| e.emotion).collect()
    }

    /// Stack features and targets into `(N × dim, N × 15)` matrices.
    pub fn to_arrays(&self) -> PaletteResult<(Array2<f32>, Array2<f32>)> {
        let rows = self.examples.len();
        let dim = self.layout.dim();

        let mut features = Vec::with_capacity(rows * dim);
        let mut targets = Vec::with_capacity(rows * TARGET_DIM);
        for example in &self.examples {
            features.extend_from_slice(&example.features);
            targets.extend_from_slice(&example.target);
        }

        let x = Array2::from_shape_vec((rows, dim), features)
            .map_err(|_| PaletteError::dimension_mismatch(rows * dim, rows, "feature matrix"))?;
        let y = Array2::from_shape_vec((rows, TARGET_DIM), targets).map_err(|_| {
            PaletteError::dimension_mismatch(rows * TARGET_DIM, rows, "target matrix")
        })?;
        Ok((x, y))
    }

    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.examples.shuffle(rng);
    }

    /// Split into train and validation sets
    ///
    /// # Arguments
    /// * `train_ratio` - Fraction of data to use for training (e.g., 0.8)
    pub fn split(self, train_ratio: f32) -> (Dataset, Dataset) {
        let ratio = train_ratio.clamp(0.0, 1.0);
        let split_idx = (self.examples.len() as f32 * ratio) as usize;
        let mut train = self.examples;
        let val = train.split_off(split_idx);
        (
            Dataset {
                layout: self.layout,
                examples: train,
            },
            Dataset {
                layout: self.layout,
                examples: val,
            },
        )
    }

    /// Get examples by batch
    pub fn batch(&self, batch_size: usize, batch_idx: usize) -> &[TrainingExample] {
        let start = batch_idx.saturating_mul(batch_size).min(self.examples.len());
        let end = start.saturating_add(batch_size).min(self.examples.len());
        &self.examples[start..end]
    }

    /// Get number of batches for given batch size
    pub fn num_batches(&self, batch_size: usize) -> usize {
        if batch_size == 0 {
            return 0;
        }
        (self.examples.len() + batch_size - 1) / batch_size
    }

    pub fn summary(&self) -> DatasetSummary {
        let mut emotion_counts = BTreeMap::new();
        for example in &self.examples {
            *emotion_counts.entry(example.emotion).or_insert(0) += 1;
        }

        let slice_values = |range: std::ops::Range<usize>| {
            self.examples
                .iter()
                .flat_map(move |e| e.features[range.clone()].iter().copied())
        };

        let descriptor = ValueRange::of(slice_values(self.layout.descriptor_range()));
        let physical_range = self.layout.physical_range();
        let physical = physical_range
            .clone()
            .and_then(|range| ValueRange::of(slice_values(range)));
        let seed = self
            .layout
            .seed_range()
            .and_then(|range| ValueRange::of(slice_values(range)));
        let target = ValueRange::of(self.examples.iter().flat_map(|e| e.target.iter().copied()));

        let extreme_physical_ratio = physical_range.and_then(|range| {
            fraction(slice_values(range), |v| v <= 0.0 || v >= 1.0)
        });
        let extreme_target_ratio = fraction(
            self.examples.iter().flat_map(|e| e.target.iter().copied()),
            is_extreme,
        );

        DatasetSummary {
            examples: self.examples.len(),
            feature_dim: self.layout.dim(),
            descriptor,
            physical,
            seed,
            target,
            extreme_physical_ratio,
            extreme_target_ratio,
            emotion_counts,
        }
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a TrainingExample;
    type IntoIter = std::slice::Iter<'a, TrainingExample>;

    fn into_iter(self) -> Self::IntoIter {
        self.examples.iter()
    }
}

/// Observed minimum and maximum of a block of values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f32,
    pub max: f32,
}

impl ValueRange {
    fn of<I: IntoIterator<Item = f32>>(values: I) -> Option<Self> {
        values.into_iter().fold(None, |acc, v| match acc {
            None => Some(ValueRange { min: v, max: v }),
            Some(r) => Some(ValueRange {
                min: r.min.min(v),
                max: r.max.max(v),
            }),
        })
    }
}

fn fraction<I, F>(values: I, predicate: F) -> Option<f32>
where
    I: IntoIterator<Item = f32>,
    F: Fn(f32) -> bool,
{
    let (hits, total) = values.into_iter().fold((0usize, 0usize), |(hits, total), v| {
        (hits + usize::from(predicate(v)), total + 1)
    });
    (total > 0).then(|| hits as f32 / total as f32)
}

/// Value ranges and label balance of a dataset, for logging and sanity checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub examples: usize,
    pub feature_dim: usize,
    pub descriptor: Option<ValueRange>,
    pub physical: Option<ValueRange>,
    pub seed: Option<ValueRange>,
    pub target: Option<ValueRange>,
    /// Share of physical values sitting exactly on 0 or 1
    pub extreme_physical_ratio: Option<f32>,
    /// Share of target channels within tolerance of 0 or 1
    pub extreme_target_ratio: Option<f32>,
    pub emotion_counts: BTreeMap<Emotion, usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{DESCRIPTOR_DIM, ENHANCED_DIM};

    fn example(dim: usize, emotion: Emotion, fill: f32) -> TrainingExample {
        TrainingExample::new(vec![fill; dim], vec![fill; TARGET_DIM], emotion)
    }

    fn small_dataset() -> Dataset {
        let examples = (0..10)
            .map(|i| example(DESCRIPTOR_DIM, Emotion::ALL[i % 2], i as f32 / 10.0))
            .collect();
        Dataset::from_examples(FeatureLayout::DescriptorOnly, examples).unwrap()
    }

    #[test]
    fn push_rejects_wrong_feature_length() {
        let mut dataset = Dataset::new(FeatureLayout::Enhanced);
        let err = dataset
            .push(example(DESCRIPTOR_DIM, Emotion::Happy, 0.5))
            .unwrap_err();
        assert!(matches!(
            err,
            PaletteError::DimensionMismatch {
                expected: 148,
                got: 128,
                ..
            }
        ));
        assert!(dataset.is_empty());
    }

    #[test]
    fn push_rejects_wrong_target_length() {
        let mut dataset = Dataset::new(FeatureLayout::Enhanced);
        let bad = TrainingExample::new(vec![0.0; ENHANCED_DIM], vec![0.0; 12], Emotion::Sad);
        assert!(dataset.push(bad).is_err());
    }

    #[test]
    fn to_arrays_preserves_row_order() {
        let dataset = small_dataset();
        let (x, y) = dataset.to_arrays().unwrap();
        assert_eq!(x.dim(), (10, DESCRIPTOR_DIM));
        assert_eq!(y.dim(), (10, TARGET_DIM));
        assert_eq!(x[[3, 0]], 0.3);
        assert_eq!(y[[9, 14]], 0.9);
    }

    #[test]
    fn split_and_batching() {
        let dataset = small_dataset();
        assert_eq!(dataset.num_batches(4), 3);
        assert_eq!(dataset.batch(4, 2).len(), 2);
        assert!(dataset.batch(4, 5).is_empty());
        assert!(dataset.batch(usize::MAX, usize::MAX).is_empty());
        assert_eq!(dataset.batch(usize::MAX, 0).len(), 10);

        let (train, val) = dataset.split(0.8);
        assert_eq!(train.len(), 8);
        assert_eq!(val.len(), 2);
        assert_eq!(val.examples()[0].features[0], 0.8);
    }

    #[test]
    fn summary_counts_labels_and_ranges() {
        let summary = small_dataset().summary();
        assert_eq!(summary.examples, 10);
        assert_eq!(summary.emotion_counts[&Emotion::Happy], 5);
        assert_eq!(summary.emotion_counts[&Emotion::Sad], 5);
        let target = summary.target.unwrap();
        assert_eq!(target.min, 0.0);
        assert_eq!(target.max, 0.9);
        assert!(summary.physical.is_none());
        // Only the all-zero row is within tolerance of an extreme
        assert!((summary.extreme_target_ratio.unwrap() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn empty_summary_has_no_ranges() {
        let summary = Dataset::new(FeatureLayout::Enhanced).summary();
        assert_eq!(summary.examples, 0);
        assert!(summary.descriptor.is_none());
        assert!(summary.extreme_physical_ratio.is_none());
    }
}

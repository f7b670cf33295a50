//! Seams to the external regressor trainer and model exporter.
//!
//! The crate does not ship a network. A trainer receives the stacked feature
//! and target matrices together with the loss to minimise; an exporter then
//! persists whatever model the trainer produced alongside a [`ModelInfo`]
//! record describing the input layout.

use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::color::TARGET_DIM;
use crate::data::Dataset;
use crate::emotion::Emotion;
use crate::error::PaletteResult;
use crate::features::{FeatureLayout, PhysicalTrait, DESCRIPTOR_DIM, PHYSICAL_DIM, SEED_DIM};
use crate::neural::PaletteLoss;

/// Fits a palette regressor against a loss.
pub trait PaletteTrainer {
    type Model;

    fn fit(
        &mut self,
        x: ArrayView2<f32>,
        y: ArrayView2<f32>,
        loss: &dyn PaletteLoss,
    ) -> PaletteResult<Self::Model>;
}

/// Persists a trained model together with its metadata.
pub trait ModelExporter<M> {
    type Output;

    fn export(&self, model: &M, info: &ModelInfo) -> PaletteResult<Self::Output>;
}

/// Input sizes per block of the feature vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputBreakdown {
    pub face_descriptor: usize,
    pub physical_features: usize,
    pub random_seed: usize,
    pub total: usize,
}

/// Metadata written next to an exported model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub input_dim: usize,
    pub output_dim: usize,
    pub description: String,
    pub input_breakdown: InputBreakdown,
    /// Physical trait names in input order; empty for descriptor-only models
    pub physical_features: Vec<String>,
    pub emotions: Vec<Emotion>,
}

impl ModelInfo {
    pub fn for_layout(layout: FeatureLayout, emotions: &[Emotion]) -> Self {
        let (physical, seed) = match layout {
            FeatureLayout::DescriptorOnly => (0, 0),
            FeatureLayout::Enhanced => (PHYSICAL_DIM, SEED_DIM),
        };
        let description = match layout {
            FeatureLayout::DescriptorOnly => {
                format!("face descriptor ({DESCRIPTOR_DIM}) -> RGB palette ({TARGET_DIM})")
            }
            FeatureLayout::Enhanced => format!(
                "face descriptor ({DESCRIPTOR_DIM}) + physical features ({PHYSICAL_DIM}) + random seed ({SEED_DIM}) -> RGB palette ({TARGET_DIM})"
            ),
        };
        let physical_features = if physical > 0 {
            PhysicalTrait::ALL.iter().map(|t| t.name().to_string()).collect()
        } else {
            Vec::new()
        };

        Self {
            input_dim: layout.dim(),
            output_dim: TARGET_DIM,
            description,
            input_breakdown: InputBreakdown {
                face_descriptor: DESCRIPTOR_DIM,
                physical_features: physical,
                random_seed: seed,
                total: layout.dim(),
            },
            physical_features,
            emotions: emotions.to_vec(),
        }
    }
}

/// Fit a trainer on a dataset and hand the result to an exporter.
pub fn train_and_export<T, E>(
    trainer: &mut T,
    exporter: &E,
    dataset: &Dataset,
    emotions: &[Emotion],
    loss: &dyn PaletteLoss,
) -> PaletteResult<E::Output>
where
    T: PaletteTrainer,
    E: ModelExporter<T::Model>,
{
    let (x, y) = dataset.to_arrays()?;
    info!(
        "Training on {} examples ({} -> {})",
        dataset.len(),
        x.ncols(),
        y.ncols()
    );
    let model = trainer.fit(x.view(), y.view(), loss)?;
    let info = ModelInfo::for_layout(dataset.layout(), emotions);
    exporter.export(&model, &info)
}

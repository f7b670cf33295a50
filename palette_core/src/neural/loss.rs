//! Diversity-aware palette loss with analytic gradients.
//!
//! For a batch of `B` rows of 15 RGB values (five colors × RGB):
//!
//! ```text
//! L = R + α·D + β·C
//! R = mean over all B·15 entries of w·(p − t)²,  w = 1.5 where |t| < 0.01 or |t − 1| < 0.01, else 1
//! D = mean over rows of exp(−s · avg pairwise Euclidean distance among the 5 predicted colors)
//! C = exp(−3 · mean over rows and channels of the population std across the 5 colors)
//! ```
//!
//! The basic variant uses `s = 1, α = 0.1, β = 0`; the enhanced variant uses
//! `s = 2, α = 0.15, β = 0.1`. Where a distance or standard deviation is zero
//! its subgradient is taken as zero.

use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::color::{PALETTE_SIZE, TARGET_DIM};
use crate::error::{PaletteError, PaletteResult};

/// Distance from 0 or 1 within which a target channel counts as extreme
pub const EXTREME_TOLERANCE: f32 = 0.01;
/// Weight applied to squared errors on extreme target channels
pub const EXTREME_WEIGHT: f32 = 1.5;
/// Sharpness of the contrast penalty
pub const CONTRAST_SHARPNESS: f32 = 3.0;

/// Unordered color pairs in a five-color palette
const PAIR_COUNT: f32 = (PALETTE_SIZE * (PALETTE_SIZE - 1) / 2) as f32;

/// Whether a target channel lies strictly within tolerance of 0 or 1.
pub fn is_extreme(value: f32) -> bool {
    value.abs() < EXTREME_TOLERANCE || (value - 1.0).abs() < EXTREME_TOLERANCE
}

/// A loss over `(batch × 15)` target and prediction matrices.
pub trait PaletteLoss: Send + Sync {
    fn loss(&self, y_true: ArrayView2<f32>, y_pred: ArrayView2<f32>) -> PaletteResult<f32>;

    /// Loss value and its gradient with respect to `y_pred`.
    fn loss_with_gradients(
        &self,
        y_true: ArrayView2<f32>,
        y_pred: ArrayView2<f32>,
    ) -> PaletteResult<(f32, Array2<f32>)>;
}

/// Weights of the three loss terms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiversityLossConfig {
    /// `s`: how quickly the diversity penalty decays with distance
    pub diversity_sharpness: f32,
    /// `α`
    pub diversity_weight: f32,
    /// `β`; zero disables the contrast term
    pub contrast_weight: f32,
}

impl DiversityLossConfig {
    pub fn basic() -> Self {
        Self {
            diversity_sharpness: 1.0,
            diversity_weight: 0.1,
            contrast_weight: 0.0,
        }
    }

    pub fn enhanced() -> Self {
        Self {
            diversity_sharpness: 2.0,
            diversity_weight: 0.15,
            contrast_weight: 0.1,
        }
    }
}

impl Default for DiversityLossConfig {
    fn default() -> Self {
        Self::enhanced()
    }
}

/// Unweighted values of each term alongside the weighted total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LossBreakdown {
    pub reconstruction: f32,
    pub diversity: f32,
    pub contrast: f32,
    pub total: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DiversityLoss {
    config: DiversityLossConfig,
}

impl DiversityLoss {
    pub fn new(config: DiversityLossConfig) -> Self {
        Self { config }
    }

    pub fn basic() -> Self {
        Self::new(DiversityLossConfig::basic())
    }

    pub fn enhanced() -> Self {
        Self::new(DiversityLossConfig::enhanced())
    }

    pub fn config(&self) -> &DiversityLossConfig {
        &self.config
    }

    pub fn breakdown(
        &self,
        y_true: ArrayView2<f32>,
        y_pred: ArrayView2<f32>,
    ) -> PaletteResult<LossBreakdown> {
        self.evaluate(y_true, y_pred, None)
    }

    fn evaluate(
        &self,
        y_true: ArrayView2<f32>,
        y_pred: ArrayView2<f32>,
        mut gradient: Option<&mut Array2<f32>>,
    ) -> PaletteResult<LossBreakdown> {
        check_shapes(&y_true, &y_pred)?;
        let batch = y_pred.nrows();
        let batch_f = batch as f32;
        let entries = (batch * TARGET_DIM) as f32;
        let DiversityLossConfig {
            diversity_sharpness: sharpness,
            diversity_weight: alpha,
            contrast_weight: beta,
        } = self.config;

        // Weighted reconstruction
        let mut reconstruction = 0.0;
        for ((b, j), &p) in y_pred.indexed_iter() {
            let t = y_true[[b, j]];
            let w = if is_extreme(t) { EXTREME_WEIGHT } else { 1.0 };
            let diff = p - t;
            reconstruction += w * diff * diff;
            if let Some(grad) = gradient.as_deref_mut() {
                grad[[b, j]] = 2.0 * w * diff / entries;
            }
        }
        reconstruction /= entries;

        // Per-row diversity penalty and per-channel spread
        let mut diversity = 0.0;
        let mut spread_sum = 0.0;
        let mut spread_grads = Vec::with_capacity(if gradient.is_some() { batch } else { 0 });

        for (b, row) in y_pred.outer_iter().enumerate() {
            let colors = row_colors(row.iter().copied());

            let mut distance_sum = 0.0;
            let mut pull = [[0.0f32; 3]; PALETTE_SIZE];
            for i in 0..PALETTE_SIZE {
                for j in (i + 1)..PALETTE_SIZE {
                    let delta = [
                        colors[i][0] - colors[j][0],
                        colors[i][1] - colors[j][1],
                        colors[i][2] - colors[j][2],
                    ];
                    let distance = delta.iter().map(|d| d * d).sum::<f32>().sqrt();
                    distance_sum += distance;
                    if distance > 0.0 {
                        for ch in 0..3 {
                            let unit = delta[ch] / distance;
                            pull[i][ch] += unit;
                            pull[j][ch] -= unit;
                        }
                    }
                }
            }
            let penalty = (-sharpness * distance_sum / PAIR_COUNT).exp();
            diversity += penalty;

            if let Some(grad) = gradient.as_deref_mut() {
                let coeff = -alpha * sharpness * penalty / (batch_f * PAIR_COUNT);
                for (k, color_pull) in pull.iter().enumerate() {
                    for ch in 0..3 {
                        grad[[b, k * 3 + ch]] += coeff * color_pull[ch];
                    }
                }
            }

            let mut row_spread_grad = [[0.0f32; 3]; PALETTE_SIZE];
            for ch in 0..3 {
                let mean = colors.iter().map(|c| c[ch]).sum::<f32>() / PALETTE_SIZE as f32;
                let variance = colors
                    .iter()
                    .map(|c| (c[ch] - mean) * (c[ch] - mean))
                    .sum::<f32>()
                    / PALETTE_SIZE as f32;
                let std = variance.sqrt();
                spread_sum += std;
                if std > 0.0 {
                    for (k, color) in colors.iter().enumerate() {
                        row_spread_grad[k][ch] = (color[ch] - mean) / (PALETTE_SIZE as f32 * std);
                    }
                }
            }
            if gradient.is_some() {
                spread_grads.push(row_spread_grad);
            }
        }
        diversity /= batch_f;

        let contrast_spread = spread_sum / (batch_f * 3.0);
        let contrast = (-CONTRAST_SHARPNESS * contrast_spread).exp();

        if let Some(grad) = gradient.as_deref_mut() {
            let coeff = -beta * CONTRAST_SHARPNESS * contrast / (batch_f * 3.0);
            for (b, row_grad) in spread_grads.iter().enumerate() {
                for (k, color_grad) in row_grad.iter().enumerate() {
                    for ch in 0..3 {
                        grad[[b, k * 3 + ch]] += coeff * color_grad[ch];
                    }
                }
            }
        }

        Ok(LossBreakdown {
            reconstruction,
            diversity,
            contrast,
            total: reconstruction + alpha * diversity + beta * contrast,
        })
    }
}

impl PaletteLoss for DiversityLoss {
    fn loss(&self, y_true: ArrayView2<f32>, y_pred: ArrayView2<f32>) -> PaletteResult<f32> {
        Ok(self.breakdown(y_true, y_pred)?.total)
    }

    fn loss_with_gradients(
        &self,
        y_true: ArrayView2<f32>,
        y_pred: ArrayView2<f32>,
    ) -> PaletteResult<(f32, Array2<f32>)> {
        let mut gradient = Array2::zeros(y_pred.raw_dim());
        let breakdown = self.evaluate(y_true, y_pred, Some(&mut gradient))?;
        Ok((breakdown.total, gradient))
    }
}

fn check_shapes(y_true: &ArrayView2<f32>, y_pred: &ArrayView2<f32>) -> PaletteResult<()> {
    if y_pred.ncols() != TARGET_DIM {
        return Err(PaletteError::dimension_mismatch(
            TARGET_DIM,
            y_pred.ncols(),
            "prediction row",
        ));
    }
    if y_true.ncols() != TARGET_DIM {
        return Err(PaletteError::dimension_mismatch(
            TARGET_DIM,
            y_true.ncols(),
            "target row",
        ));
    }
    if y_true.nrows() != y_pred.nrows() {
        return Err(PaletteError::dimension_mismatch(
            y_pred.nrows(),
            y_true.nrows(),
            "target batch",
        ));
    }
    if y_pred.nrows() == 0 {
        return Err(PaletteError::EmptyBatch {
            context: "palette loss".to_string(),
        });
    }
    Ok(())
}

/// Split a 15-value row into five RGB triples.
pub(crate) fn row_colors<I: IntoIterator<Item = f32>>(row: I) -> [[f32; 3]; PALETTE_SIZE] {
    let mut colors = [[0.0f32; 3]; PALETTE_SIZE];
    for (i, value) in row.into_iter().take(TARGET_DIM).enumerate() {
        colors[i / 3][i % 3] = value;
    }
    colors
}

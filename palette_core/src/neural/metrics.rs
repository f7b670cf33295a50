//! Evaluation metrics for predicted palettes.

use std::collections::BTreeSet;

use ndarray::ArrayView2;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::loss::{is_extreme, row_colors};
use crate::color::{rgb_to_hex, PALETTE_SIZE, TARGET_DIM};
use crate::error::{PaletteError, PaletteResult};

/// Absolute error under which an extreme target counts as hit
pub const EXTREME_HIT_THRESHOLD: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaletteMetrics {
    pub mse: f32,
    pub mae: f32,
    /// Share of extreme target channels predicted within 0.1; `None` when
    /// the targets contain no extremes
    pub extreme_accuracy: Option<f32>,
    /// Mean Euclidean distance between predicted colors of the same palette
    pub mean_color_distance: f32,
    /// Distinct predicted hex colors
    pub unique_colors: usize,
    /// `unique_colors` over the number of predicted colors
    pub unique_color_ratio: f32,
}

/// Compare predictions against targets.
pub fn evaluate(y_true: ArrayView2<f32>, y_pred: ArrayView2<f32>) -> PaletteResult<PaletteMetrics> {
    if y_pred.ncols() != TARGET_DIM || y_true.ncols() != TARGET_DIM {
        return Err(PaletteError::dimension_mismatch(
            TARGET_DIM,
            y_pred.ncols().min(y_true.ncols()),
            "metric rows",
        ));
    }
    if y_true.nrows() != y_pred.nrows() {
        return Err(PaletteError::dimension_mismatch(
            y_pred.nrows(),
            y_true.nrows(),
            "metric batch",
        ));
    }
    if y_pred.nrows() == 0 {
        return Err(PaletteError::EmptyBatch {
            context: "palette metrics".to_string(),
        });
    }

    let pairs: Vec<(f32, f32)> = y_true.iter().copied().zip(y_pred.iter().copied()).collect();
    let entries = pairs.len() as f32;

    let (squared, absolute) = pairs
        .par_iter()
        .map(|&(t, p)| {
            let diff = p - t;
            (diff * diff, diff.abs())
        })
        .reduce(|| (0.0, 0.0), |a, b| (a.0 + b.0, a.1 + b.1));

    let (extreme_hits, extreme_total) = pairs
        .iter()
        .filter(|(t, _)| is_extreme(*t))
        .fold((0usize, 0usize), |(hits, total), (t, p)| {
            (
                hits + usize::from((t - p).abs() < EXTREME_HIT_THRESHOLD),
                total + 1,
            )
        });

    let palettes: Vec<[[f32; 3]; PALETTE_SIZE]> = y_pred
        .outer_iter()
        .map(|row| row_colors(row.iter().copied()))
        .collect();

    let (distance_sum, pair_count) = palettes
        .par_iter()
        .map(|colors| {
            let mut sum = 0.0f32;
            let mut count = 0usize;
            for i in 0..PALETTE_SIZE {
                for j in (i + 1)..PALETTE_SIZE {
                    sum += (0..3)
                        .map(|ch| (colors[i][ch] - colors[j][ch]).powi(2))
                        .sum::<f32>()
                        .sqrt();
                    count += 1;
                }
            }
            (sum, count)
        })
        .reduce(|| (0.0, 0), |a, b| (a.0 + b.0, a.1 + b.1));

    let unique: BTreeSet<String> = palettes
        .iter()
        .flat_map(|colors| colors.iter().map(|c| rgb_to_hex(*c)))
        .collect();
    let predicted_colors = palettes.len() * PALETTE_SIZE;

    Ok(PaletteMetrics {
        mse: squared / entries,
        mae: absolute / entries,
        extreme_accuracy: (extreme_total > 0)
            .then(|| extreme_hits as f32 / extreme_total as f32),
        mean_color_distance: distance_sum / pair_count as f32,
        unique_colors: unique.len(),
        unique_color_ratio: unique.len() as f32 / predicted_colors as f32,
    })
}

//! Training-side pieces: the palette loss and evaluation metrics.
//!
//! The regressor itself lives behind [`crate::training::PaletteTrainer`];
//! this module only defines what it is optimized against and how its
//! predictions are scored.

pub mod loss;
pub mod metrics;

pub use loss::{
    is_extreme, DiversityLoss, DiversityLossConfig, LossBreakdown, PaletteLoss,
    CONTRAST_SHARPNESS, EXTREME_TOLERANCE, EXTREME_WEIGHT,
};
pub use metrics::{evaluate, PaletteMetrics, EXTREME_HIT_THRESHOLD};

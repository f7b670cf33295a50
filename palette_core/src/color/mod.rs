//! Color conversions and palette variation.

pub mod transform;
pub mod variation;

pub use transform::{hex_to_rgb, palette_to_rgb, rgb_to_hex, PALETTE_SIZE, TARGET_DIM};
pub use variation::{
    apply_factors, basic_variation, enhanced_variation, ColorTarget, VariationFactors,
};

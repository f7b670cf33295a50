//! Hex ↔ normalized RGB conversions.

use crate::error::{PaletteError, PaletteResult};

/// Number of colors in a palette
pub const PALETTE_SIZE: usize = 5;
/// Length of a flattened palette (5 RGB triples)
pub const TARGET_DIM: usize = PALETTE_SIZE * 3;

/// Convert a 6-digit hex color (optionally `#`-prefixed) to RGB in [0, 1].
///
/// # Examples
///
/// ```
/// use face_palette_core::color::hex_to_rgb;
///
/// assert_eq!(hex_to_rgb("#FF0000").unwrap(), [1.0, 0.0, 0.0]);
/// assert!(hex_to_rgb("#ZZZZZZ").is_err());
/// ```
pub fn hex_to_rgb(color: &str) -> PaletteResult<[f32; 3]> {
    let digits = color.strip_prefix('#').unwrap_or(color);
    let invalid = || PaletteError::InvalidColorFormat {
        value: color.to_string(),
    };

    let mut bytes = [0u8; 3];
    hex::decode_to_slice(digits, &mut bytes).map_err(|_| invalid())?;

    Ok([
        bytes[0] as f32 / 255.0,
        bytes[1] as f32 / 255.0,
        bytes[2] as f32 / 255.0,
    ])
}

/// Convert an RGB triple in [0, 1] to an uppercase `#RRGGBB` string.
///
/// Channels are clamped and truncated (`value * 255` rounded toward zero).
pub fn rgb_to_hex(rgb: [f32; 3]) -> String {
    let bytes = rgb.map(|channel| (channel.clamp(0.0, 1.0) * 255.0) as u8);
    format!("#{}", hex::encode_upper(bytes))
}

/// Flatten a sequence of hex colors into consecutive RGB triples.
pub fn palette_to_rgb<S: AsRef<str>>(colors: &[S]) -> PaletteResult<Vec<f32>> {
    let mut rgb = Vec::with_capacity(colors.len() * 3);
    for color in colors {
        rgb.extend_from_slice(&hex_to_rgb(color.as_ref())?);
    }
    Ok(rgb)
}

//! Error types for palette synthesis, augmentation and loss evaluation.
//!
//! Every fallible operation in the crate returns [`PaletteResult`]. Nothing is
//! defaulted on failure: malformed colors, wrong vector lengths and empty
//! palette sets are reported to the caller as-is.

use std::path::PathBuf;

use thiserror::Error;

use crate::emotion::Emotion;

/// Result type alias for palette operations
pub type PaletteResult<T> = Result<T, PaletteError>;

/// Comprehensive error type for palette operations
#[derive(Debug, Error)]
pub enum PaletteError {
    /// Hex color string is not exactly six hex digits (after an optional `#`)
    #[error("Invalid color format '{value}': expected 6 hex digits with optional '#' prefix")]
    InvalidColorFormat { value: String },

    /// A feature vector, color target or batch has an unexpected length
    #[error("Dimension mismatch in {context}: expected {expected} values, got {got}")]
    DimensionMismatch {
        expected: usize,
        got: usize,
        context: String,
    },

    /// An emotion profile without candidate palettes reached dataset generation
    #[error("Emotion '{emotion}' has no candidate base palettes")]
    EmptyCandidateSet { emotion: Emotion },

    /// The emotion-color mapping file does not exist
    #[error("Emotion-color mapping not found at {}", path.display())]
    MappingNotFound { path: PathBuf },

    /// An emotion was requested that the mapping does not define
    #[error("Emotion '{emotion}' is not defined in the emotion-color mapping")]
    EmotionNotInMapping { emotion: Emotion },

    /// The mapping was readable but violates its schema
    #[error("Invalid emotion-color mapping: {0}")]
    InvalidMapping(String),

    /// A numeric parameter is outside its valid range
    #[error("Invalid parameter '{parameter}' = {value}: {constraint}")]
    InvalidParameter {
        parameter: String,
        value: f32,
        constraint: String,
    },

    /// A loss or metric was asked to reduce over zero rows
    #[error("Empty batch: {context} needs at least one row")]
    EmptyBatch { context: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PaletteError {
    /// Shorthand for building a [`PaletteError::DimensionMismatch`].
    pub fn dimension_mismatch(expected: usize, got: usize, context: impl Into<String>) -> Self {
        PaletteError::DimensionMismatch {
            expected,
            got,
            context: context.into(),
        }
    }

    pub fn invalid_parameter(
        parameter: impl Into<String>,
        value: f32,
        constraint: impl Into<String>,
    ) -> Self {
        PaletteError::InvalidParameter {
            parameter: parameter.into(),
            value,
            constraint: constraint.into(),
        }
    }
}

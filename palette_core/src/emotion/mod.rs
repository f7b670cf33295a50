//! Emotion labels and the emotion → color mapping they are paired with.

pub mod mapping;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use mapping::{ColorCharacteristics, EmotionColorMapping, EmotionProfile, Palette};

/// The seven facial emotion classes the synthesizer is conditioned on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(usize)]
pub enum Emotion {
    Happy = 0,
    Sad = 1,
    Angry = 2,
    Fearful = 3,
    Disgusted = 4,
    Surprised = 5,
    Neutral = 6,
}

impl Emotion {
    /// All emotions in canonical order
    pub const ALL: [Emotion; 7] = [
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Angry,
        Emotion::Fearful,
        Emotion::Disgusted,
        Emotion::Surprised,
        Emotion::Neutral,
    ];

    /// Wire identifier used by the mapping file and model metadata
    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Happy => "happy",
            Emotion::Sad => "sad",
            Emotion::Angry => "angry",
            Emotion::Fearful => "fearful",
            Emotion::Disgusted => "disgusted",
            Emotion::Surprised => "surprised",
            Emotion::Neutral => "neutral",
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(idx: usize) -> Option<Self> {
        Self::ALL.get(idx).copied()
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Emotion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|emotion| emotion.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown emotion '{s}'"))
    }
}

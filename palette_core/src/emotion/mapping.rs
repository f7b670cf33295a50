//! Emotion → base palette mapping source.
//!
//! The mapping is read once before generation and treated as immutable. Its
//! JSON shape is
//!
//! ```json
//! { "emotions": { "happy": {
//!     "name": "Happy",
//!     "basePalettes": [["#FFD93D", "#FF6B6B", "#FFA94D", "#6BCB77", "#FFF3B0"]],
//!     "colorCharacteristics": { "brightness": 0.9, "saturation": 0.8, "temperature": 0.7 }
//! } } }
//! ```
//!
//! A profile is allowed to carry zero palettes here; that condition is only
//! fatal once the profile reaches the dataset builder.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::Emotion;
use crate::color::transform::{hex_to_rgb, PALETTE_SIZE, TARGET_DIM};
use crate::error::{PaletteError, PaletteResult};

const BUILTIN_MAPPING: &str = include_str!("../../data/emotion-color-mapping.json");

/// Brightness, saturation and temperature bias of an emotion's palettes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorCharacteristics {
    /// Overall lightness in [0, 1]
    pub brightness: f32,
    /// Chroma strength in [0, 1]
    pub saturation: f32,
    /// Warm (+) / cool (−) bias in [-1, 1]
    pub temperature: f32,
}

impl ColorCharacteristics {
    pub fn new(brightness: f32, saturation: f32, temperature: f32) -> PaletteResult<Self> {
        let characteristics = Self {
            brightness,
            saturation,
            temperature,
        };
        characteristics.validate()?;
        Ok(characteristics)
    }

    fn validate(&self) -> PaletteResult<()> {
        let in_range = |value: f32, lo: f32, hi: f32| value.is_finite() && (lo..=hi).contains(&value);
        if !in_range(self.brightness, 0.0, 1.0) {
            return Err(PaletteError::InvalidMapping(format!(
                "brightness {} outside [0, 1]",
                self.brightness
            )));
        }
        if !in_range(self.saturation, 0.0, 1.0) {
            return Err(PaletteError::InvalidMapping(format!(
                "saturation {} outside [0, 1]",
                self.saturation
            )));
        }
        if !in_range(self.temperature, -1.0, 1.0) {
            return Err(PaletteError::InvalidMapping(format!(
                "temperature {} outside [-1, 1]",
                self.temperature
            )));
        }
        Ok(())
    }
}

/// A designer-chosen set of five colors, validated on construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<String>,
    rgb: [f32; TARGET_DIM],
}

impl Palette {
    pub fn new<S: Into<String>>(colors: Vec<S>) -> PaletteResult<Self> {
        let colors: Vec<String> = colors.into_iter().map(Into::into).collect();
        if colors.len() != PALETTE_SIZE {
            return Err(PaletteError::InvalidMapping(format!(
                "palette must contain {PALETTE_SIZE} colors, found {}",
                colors.len()
            )));
        }

        let mut rgb = [0.0f32; TARGET_DIM];
        for (slot, color) in rgb.chunks_exact_mut(3).zip(&colors) {
            slot.copy_from_slice(&hex_to_rgb(color)?);
        }

        Ok(Self { colors, rgb })
    }

    /// Hex colors as supplied
    pub fn colors(&self) -> &[String] {
        &self.colors
    }

    /// Flat 15-dim RGB vector (5 consecutive triples in [0, 1])
    pub fn rgb(&self) -> &[f32; TARGET_DIM] {
        &self.rgb
    }
}

/// Everything the generator needs to know about one emotion.
#[derive(Debug, Clone, PartialEq)]
pub struct EmotionProfile {
    pub emotion: Emotion,
    pub name: String,
    pub palettes: Vec<Palette>,
    pub characteristics: ColorCharacteristics,
}

impl EmotionProfile {
    pub fn new(
        emotion: Emotion,
        name: impl Into<String>,
        palettes: Vec<Palette>,
        characteristics: ColorCharacteristics,
    ) -> PaletteResult<Self> {
        characteristics.validate()?;
        Ok(Self {
            emotion,
            name: name.into(),
            palettes,
            characteristics,
        })
    }
}

/// Read-only emotion → profile table, iterated in canonical emotion order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EmotionColorMapping {
    profiles: BTreeMap<Emotion, EmotionProfile>,
}

impl EmotionColorMapping {
    /// Mapping shipped with the crate, covering all seven emotions.
    pub fn builtin() -> PaletteResult<Self> {
        Self::from_json_str(BUILTIN_MAPPING)
    }

    /// Load a mapping file; a missing file is reported as
    /// [`PaletteError::MappingNotFound`].
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> PaletteResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => PaletteError::MappingNotFound {
                path: path.to_path_buf(),
            },
            _ => PaletteError::Io(err),
        })?;
        let mapping = Self::from_json_str(&contents)?;
        tracing::info!(
            "Loaded emotion-color mapping from {} ({} emotions)",
            path.display(),
            mapping.len()
        );
        Ok(mapping)
    }

    pub fn from_json_str(json: &str) -> PaletteResult<Self> {
        let raw: RawMapping = serde_json::from_str(json)?;
        let mut profiles = BTreeMap::new();

        for (emotion, raw_profile) in raw.emotions {
            let palettes = raw_profile
                .base_palettes
                .into_iter()
                .map(Palette::new)
                .collect::<PaletteResult<Vec<_>>>()?;
            let profile = EmotionProfile::new(
                emotion,
                raw_profile.name,
                palettes,
                raw_profile.color_characteristics,
            )?;
            profiles.insert(emotion, profile);
        }

        if profiles.is_empty() {
            return Err(PaletteError::InvalidMapping(
                "mapping defines no emotions".into(),
            ));
        }

        Ok(Self { profiles })
    }

    pub fn from_profiles<I: IntoIterator<Item = EmotionProfile>>(profiles: I) -> Self {
        Self {
            profiles: profiles
                .into_iter()
                .map(|profile| (profile.emotion, profile))
                .collect(),
        }
    }

    /// Keep only the listed emotions; every one of them must be defined.
    pub fn restricted_to(&self, emotions: &[Emotion]) -> PaletteResult<Self> {
        if let Some(&emotion) = emotions.iter().find(|e| !self.profiles.contains_key(*e)) {
            return Err(PaletteError::EmotionNotInMapping { emotion });
        }
        Ok(Self {
            profiles: self
                .profiles
                .iter()
                .filter(|(emotion, _)| emotions.contains(emotion))
                .map(|(emotion, profile)| (*emotion, profile.clone()))
                .collect(),
        })
    }

    pub fn get(&self, emotion: Emotion) -> Option<&EmotionProfile> {
        self.profiles.get(&emotion)
    }

    pub fn profiles(&self) -> impl Iterator<Item = &EmotionProfile> {
        self.profiles.values()
    }

    pub fn emotions(&self) -> Vec<Emotion> {
        self.profiles.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct RawMapping {
    emotions: BTreeMap<Emotion, RawProfile>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProfile {
    name: String,
    #[serde(default)]
    base_palettes: Vec<Vec<String>>,
    color_characteristics: ColorCharacteristics,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_mapping_covers_all_emotions() {
        let mapping = EmotionColorMapping::builtin().unwrap();
        assert_eq!(mapping.emotions(), Emotion::ALL.to_vec());
        for profile in mapping.profiles() {
            assert!(!profile.palettes.is_empty(), "{} has palettes", profile.emotion);
        }
    }

    #[test]
    fn palette_rgb_is_flattened_in_order() {
        let palette = Palette::new(vec!["#FF0000", "#00FF00", "#0000FF", "#000000", "#FFFFFF"]).unwrap();
        let rgb = palette.rgb();
        assert_eq!(&rgb[0..3], &[1.0, 0.0, 0.0]);
        assert_eq!(&rgb[3..6], &[0.0, 1.0, 0.0]);
        assert_eq!(&rgb[6..9], &[0.0, 0.0, 1.0]);
        assert_eq!(&rgb[12..15], &[1.0, 1.0, 1.0]);
    }

    #[test]
    fn palette_rejects_wrong_color_count() {
        let result = Palette::new(vec!["#FF0000", "#00FF00"]);
        assert!(matches!(result, Err(PaletteError::InvalidMapping(_))));
    }

    #[test]
    fn malformed_color_fails_mapping_load() {
        let json = r##"{"emotions": {"happy": {
            "name": "Happy",
            "basePalettes": [["#FF0000", "#00FF00", "#0000FF", "#000000", "#GGGGGG"]],
            "colorCharacteristics": {"brightness": 0.9, "saturation": 0.8, "temperature": 0.7}
        }}}"##;
        let result = EmotionColorMapping::from_json_str(json);
        assert!(matches!(result, Err(PaletteError::InvalidColorFormat { .. })));
    }

    #[test]
    fn out_of_range_characteristics_are_rejected() {
        let json = r##"{"emotions": {"sad": {
            "name": "Sad",
            "basePalettes": [],
            "colorCharacteristics": {"brightness": 1.4, "saturation": 0.3, "temperature": -0.6}
        }}}"##;
        let result = EmotionColorMapping::from_json_str(json);
        assert!(matches!(result, Err(PaletteError::InvalidMapping(_))));
    }

    #[test]
    fn empty_palette_list_loads() {
        let json = r##"{"emotions": {"neutral": {
            "name": "Neutral",
            "colorCharacteristics": {"brightness": 0.6, "saturation": 0.2, "temperature": 0.0}
        }}}"##;
        let mapping = EmotionColorMapping::from_json_str(json).unwrap();
        assert!(mapping.get(Emotion::Neutral).unwrap().palettes.is_empty());
    }

    #[test]
    fn missing_file_is_reported_as_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("does-not-exist.json");
        let result = EmotionColorMapping::load_from_file(&path);
        match result {
            Err(PaletteError::MappingNotFound { path: reported }) => assert_eq!(reported, path),
            other => panic!("expected MappingNotFound, got {other:?}"),
        }
    }

    #[test]
    fn restricted_mapping_keeps_requested_emotions() {
        let mapping = EmotionColorMapping::builtin().unwrap();
        let subset = mapping
            .restricted_to(&[Emotion::Happy, Emotion::Neutral])
            .unwrap();
        assert_eq!(subset.emotions(), vec![Emotion::Happy, Emotion::Neutral]);
    }

    #[test]
    fn restricting_to_an_undefined_emotion_fails() {
        let sad_only = EmotionColorMapping::builtin()
            .unwrap()
            .restricted_to(&[Emotion::Sad])
            .unwrap();
        let err = sad_only
            .restricted_to(&[Emotion::Sad, Emotion::Happy])
            .unwrap_err();
        assert!(matches!(
            err,
            PaletteError::EmotionNotInMapping {
                emotion: Emotion::Happy
            }
        ));
    }
}

//! Named physical face traits and their emotion-conditioned generator.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::emotion::Emotion;
use crate::error::{PaletteError, PaletteResult};

/// Number of physical traits
pub const PHYSICAL_DIM: usize = 15;

/// A physical face trait. The discriminant is the trait's slot in the flat
/// feature vector, so downstream consumers can keep addressing by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(usize)]
pub enum PhysicalTrait {
    FaceAspectRatio = 0,
    JawAngle = 1,
    ForeheadWidth = 2,
    Symmetry = 3,
    EyeSize = 4,
    EyeDistance = 5,
    EyeHeight = 6,
    EyeAngle = 7,
    MouthWidth = 8,
    MouthHeight = 9,
    LipThickness = 10,
    NoseLength = 11,
    NoseWidth = 12,
    UpperFaceRatio = 13,
    LowerFaceRatio = 14,
}

impl PhysicalTrait {
    /// All traits in serialization order
    pub const ALL: [PhysicalTrait; PHYSICAL_DIM] = [
        PhysicalTrait::FaceAspectRatio,
        PhysicalTrait::JawAngle,
        PhysicalTrait::ForeheadWidth,
        PhysicalTrait::Symmetry,
        PhysicalTrait::EyeSize,
        PhysicalTrait::EyeDistance,
        PhysicalTrait::EyeHeight,
        PhysicalTrait::EyeAngle,
        PhysicalTrait::MouthWidth,
        PhysicalTrait::MouthHeight,
        PhysicalTrait::LipThickness,
        PhysicalTrait::NoseLength,
        PhysicalTrait::NoseWidth,
        PhysicalTrait::UpperFaceRatio,
        PhysicalTrait::LowerFaceRatio,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn name(&self) -> &'static str {
        match self {
            PhysicalTrait::FaceAspectRatio => "face_aspect_ratio",
            PhysicalTrait::JawAngle => "jaw_angle",
            PhysicalTrait::ForeheadWidth => "forehead_width",
            PhysicalTrait::Symmetry => "symmetry",
            PhysicalTrait::EyeSize => "eye_size",
            PhysicalTrait::EyeDistance => "eye_distance",
            PhysicalTrait::EyeHeight => "eye_height",
            PhysicalTrait::EyeAngle => "eye_angle",
            PhysicalTrait::MouthWidth => "mouth_width",
            PhysicalTrait::MouthHeight => "mouth_height",
            PhysicalTrait::LipThickness => "lip_thickness",
            PhysicalTrait::NoseLength => "nose_length",
            PhysicalTrait::NoseWidth => "nose_width",
            PhysicalTrait::UpperFaceRatio => "upper_face_ratio",
            PhysicalTrait::LowerFaceRatio => "lower_face_ratio",
        }
    }
}

/// Coarse facial geometry proxies, each nominally in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicalFeatures {
    pub face_aspect_ratio: f32,
    pub jaw_angle: f32,
    pub forehead_width: f32,
    pub symmetry: f32,
    pub eye_size: f32,
    pub eye_distance: f32,
    pub eye_height: f32,
    pub eye_angle: f32,
    pub mouth_width: f32,
    pub mouth_height: f32,
    pub lip_thickness: f32,
    pub nose_length: f32,
    pub nose_width: f32,
    pub upper_face_ratio: f32,
    pub lower_face_ratio: f32,
}

impl PhysicalFeatures {
    /// Every trait set to `value`
    pub fn splat(value: f32) -> Self {
        Self::from_array([value; PHYSICAL_DIM])
    }

    pub fn from_array(values: [f32; PHYSICAL_DIM]) -> Self {
        let mut features = Self {
            face_aspect_ratio: 0.0,
            jaw_angle: 0.0,
            forehead_width: 0.0,
            symmetry: 0.0,
            eye_size: 0.0,
            eye_distance: 0.0,
            eye_height: 0.0,
            eye_angle: 0.0,
            mouth_width: 0.0,
            mouth_height: 0.0,
            lip_thickness: 0.0,
            nose_length: 0.0,
            nose_width: 0.0,
            upper_face_ratio: 0.0,
            lower_face_ratio: 0.0,
        };
        for (feature, value) in PhysicalTrait::ALL.iter().zip(values) {
            features.set(*feature, value);
        }
        features
    }

    pub fn from_slice(values: &[f32]) -> PaletteResult<Self> {
        let array: [f32; PHYSICAL_DIM] = values.try_into().map_err(|_| {
            PaletteError::dimension_mismatch(PHYSICAL_DIM, values.len(), "physical features")
        })?;
        Ok(Self::from_array(array))
    }

    /// Flatten in serialization order
    pub fn to_array(&self) -> [f32; PHYSICAL_DIM] {
        PhysicalTrait::ALL.map(|feature| self.get(feature))
    }

    pub fn get(&self, feature: PhysicalTrait) -> f32 {
        match feature {
            PhysicalTrait::FaceAspectRatio => self.face_aspect_ratio,
            PhysicalTrait::JawAngle => self.jaw_angle,
            PhysicalTrait::ForeheadWidth => self.forehead_width,
            PhysicalTrait::Symmetry => self.symmetry,
            PhysicalTrait::EyeSize => self.eye_size,
            PhysicalTrait::EyeDistance => self.eye_distance,
            PhysicalTrait::EyeHeight => self.eye_height,
            PhysicalTrait::EyeAngle => self.eye_angle,
            PhysicalTrait::MouthWidth => self.mouth_width,
            PhysicalTrait::MouthHeight => self.mouth_height,
            PhysicalTrait::LipThickness => self.lip_thickness,
            PhysicalTrait::NoseLength => self.nose_length,
            PhysicalTrait::NoseWidth => self.nose_width,
            PhysicalTrait::UpperFaceRatio => self.upper_face_ratio,
            PhysicalTrait::LowerFaceRatio => self.lower_face_ratio,
        }
    }

    pub fn set(&mut self, feature: PhysicalTrait, value: f32) {
        let slot = match feature {
            PhysicalTrait::FaceAspectRatio => &mut self.face_aspect_ratio,
            PhysicalTrait::JawAngle => &mut self.jaw_angle,
            PhysicalTrait::ForeheadWidth => &mut self.forehead_width,
            PhysicalTrait::Symmetry => &mut self.symmetry,
            PhysicalTrait::EyeSize => &mut self.eye_size,
            PhysicalTrait::EyeDistance => &mut self.eye_distance,
            PhysicalTrait::EyeHeight => &mut self.eye_height,
            PhysicalTrait::EyeAngle => &mut self.eye_angle,
            PhysicalTrait::MouthWidth => &mut self.mouth_width,
            PhysicalTrait::MouthHeight => &mut self.mouth_height,
            PhysicalTrait::LipThickness => &mut self.lip_thickness,
            PhysicalTrait::NoseLength => &mut self.nose_length,
            PhysicalTrait::NoseWidth => &mut self.nose_width,
            PhysicalTrait::UpperFaceRatio => &mut self.upper_face_ratio,
            PhysicalTrait::LowerFaceRatio => &mut self.lower_face_ratio,
        };
        *slot = value;
    }

    /// Bucket the continuous traits into human-readable labels.
    pub fn characteristics(&self) -> FaceCharacteristics {
        let face_shape = if self.face_aspect_ratio > 0.7 {
            FaceShape::Round
        } else if self.face_aspect_ratio < 0.4 {
            FaceShape::Long
        } else {
            FaceShape::Oval
        };

        FaceCharacteristics {
            face_shape,
            eye_size: SizeClass::bucket(self.eye_size),
            mouth_width: WidthClass::bucket(self.mouth_width),
            nose_width: WidthClass::bucket(self.nose_width),
            jawline: if self.jaw_angle > 0.7 {
                Jawline::Angular
            } else if self.jaw_angle < 0.3 {
                Jawline::Soft
            } else {
                Jawline::Moderate
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaceShape {
    Round,
    Oval,
    Long,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeClass {
    Small,
    Medium,
    Large,
}

impl SizeClass {
    fn bucket(value: f32) -> Self {
        if value > 0.7 {
            SizeClass::Large
        } else if value < 0.3 {
            SizeClass::Small
        } else {
            SizeClass::Medium
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidthClass {
    Narrow,
    Medium,
    Wide,
}

impl WidthClass {
    fn bucket(value: f32) -> Self {
        if value > 0.7 {
            WidthClass::Wide
        } else if value < 0.3 {
            WidthClass::Narrow
        } else {
            WidthClass::Medium
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Jawline {
    Soft,
    Moderate,
    Angular,
}

/// Coarse labels derived from [`PhysicalFeatures`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceCharacteristics {
    pub face_shape: FaceShape,
    pub eye_size: SizeClass,
    pub mouth_width: WidthClass,
    pub nose_width: WidthClass,
    pub jawline: Jawline,
}

/// Uniform range a single trait is redrawn from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraitRange {
    pub feature: PhysicalTrait,
    pub low: f32,
    pub high: f32,
}

const fn range(feature: PhysicalTrait, low: f32, high: f32) -> TraitRange {
    TraitRange { feature, low, high }
}

/// How an emotion shapes the physical traits after the base uniform draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PhysicalProfile {
    /// Redraw the listed traits, in order, from narrower ranges
    Overrides(&'static [TraitRange]),
    /// Redraw every trait from `[low, high)`
    Band { low: f32, high: f32 },
}

use PhysicalTrait::{
    EyeDistance, EyeHeight, EyeSize, FaceAspectRatio, ForeheadWidth, JawAngle, MouthWidth,
    NoseWidth,
};

const HAPPY: &[TraitRange] = &[
    range(FaceAspectRatio, 0.6, 1.0),
    range(EyeSize, 0.7, 1.0),
    range(MouthWidth, 0.7, 1.0),
    range(ForeheadWidth, 0.6, 1.0),
];
const SAD: &[TraitRange] = &[
    range(FaceAspectRatio, 0.3, 0.7),
    range(EyeSize, 0.2, 0.6),
    range(MouthWidth, 0.2, 0.5),
    range(ForeheadWidth, 0.2, 0.6),
];
const ANGRY: &[TraitRange] = &[
    range(FaceAspectRatio, 0.2, 0.5),
    range(EyeSize, 0.3, 0.7),
    range(MouthWidth, 0.6, 1.0),
    range(JawAngle, 0.6, 1.0),
];
const FEARFUL: &[TraitRange] = &[
    range(FaceAspectRatio, 0.3, 0.6),
    range(EyeSize, 0.7, 1.0),
    range(MouthWidth, 0.2, 0.5),
    range(EyeDistance, 0.6, 1.0),
];
const DISGUSTED: &[TraitRange] = &[
    range(EyeSize, 0.2, 0.5),
    range(MouthWidth, 0.2, 0.4),
    range(NoseWidth, 0.2, 0.5),
];
const SURPRISED: &[TraitRange] = &[
    range(FaceAspectRatio, 0.6, 1.0),
    range(EyeSize, 0.8, 1.0),
    range(MouthWidth, 0.7, 1.0),
    range(EyeHeight, 0.7, 1.0),
];

impl Emotion {
    pub fn physical_profile(&self) -> PhysicalProfile {
        match self {
            Emotion::Happy => PhysicalProfile::Overrides(HAPPY),
            Emotion::Sad => PhysicalProfile::Overrides(SAD),
            Emotion::Angry => PhysicalProfile::Overrides(ANGRY),
            Emotion::Fearful => PhysicalProfile::Overrides(FEARFUL),
            Emotion::Disgusted => PhysicalProfile::Overrides(DISGUSTED),
            Emotion::Surprised => PhysicalProfile::Overrides(SURPRISED),
            Emotion::Neutral => PhysicalProfile::Band {
                low: 0.3,
                high: 0.7,
            },
        }
    }
}

/// Draw a physical feature record shaped by `emotion`.
pub fn generate_physical_features<R: Rng + ?Sized>(emotion: Emotion, rng: &mut R) -> PhysicalFeatures {
    match emotion.physical_profile() {
        PhysicalProfile::Overrides(ranges) => {
            let mut features = PhysicalFeatures::from_array(std::array::from_fn(|_| rng.gen::<f32>()));
            for TraitRange { feature, low, high } in ranges.iter().copied() {
                features.set(feature, rng.gen_range(low..high));
            }
            features
        }
        PhysicalProfile::Band { low, high } => {
            PhysicalFeatures::from_array(std::array::from_fn(|_| rng.gen_range(low..high)))
        }
    }
}

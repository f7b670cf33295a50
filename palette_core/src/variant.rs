//! Pipeline variants.
//!
//! The basic pipeline feeds the 128-dim descriptor alone and varies palettes
//! from the emotion characteristics only. The enhanced pipeline appends
//! physical traits and a random seed (148 dims), perturbs palettes with them
//! and trains against a sharper diversity loss with a contrast term.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::features::FeatureLayout;
use crate::neural::loss::DiversityLossConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Basic,
    #[default]
    Enhanced,
}

impl Variant {
    pub fn layout(&self) -> FeatureLayout {
        match self {
            Variant::Basic => FeatureLayout::DescriptorOnly,
            Variant::Enhanced => FeatureLayout::Enhanced,
        }
    }

    pub fn loss_config(&self) -> DiversityLossConfig {
        match self {
            Variant::Basic => DiversityLossConfig::basic(),
            Variant::Enhanced => DiversityLossConfig::enhanced(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Basic => "basic",
            Variant::Enhanced => "enhanced",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(Variant::Basic),
            "enhanced" => Ok(Variant::Enhanced),
            other => Err(format!("unknown variant '{other}'")),
        }
    }
}

//! Plant vocabulary shared by the store and the service layer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{STAGE_ANCIENT_AT, STAGE_MATURE_AT, STAGE_SAPLING_AT, STAGE_SPROUT_AT};

/// Maturity of a relationship, driven purely by how many interactions it has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthStage {
    #[default]
    Seed,
    Sprout,
    Sapling,
    Mature,
    Ancient,
}

impl GrowthStage {
    pub const ALL: [GrowthStage; 5] = [
        GrowthStage::Seed,
        GrowthStage::Sprout,
        GrowthStage::Sapling,
        GrowthStage::Mature,
        GrowthStage::Ancient,
    ];

    pub fn from_interactions(total: u32) -> Self {
        if total >= STAGE_ANCIENT_AT {
            GrowthStage::Ancient
        } else if total >= STAGE_MATURE_AT {
            GrowthStage::Mature
        } else if total >= STAGE_SAPLING_AT {
            GrowthStage::Sapling
        } else if total >= STAGE_SPROUT_AT {
            GrowthStage::Sprout
        } else {
            GrowthStage::Seed
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GrowthStage::Seed => "seed",
            GrowthStage::Sprout => "sprout",
            GrowthStage::Sapling => "sapling",
            GrowthStage::Mature => "mature",
            GrowthStage::Ancient => "ancient",
        }
    }
}

impl fmt::Display for GrowthStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GrowthStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GrowthStage::ALL
            .into_iter()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| format!("unknown growth stage: {s:?}"))
    }
}

/// How an interaction happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    Text,
    Call,
    Email,
    Meeting,
    Coffee,
    VideoCall,
    SocialMedia,
    Letter,
    Gift,
    #[default]
    Other,
}

impl InteractionKind {
    pub const ALL: [InteractionKind; 10] = [
        InteractionKind::Text,
        InteractionKind::Call,
        InteractionKind::Email,
        InteractionKind::Meeting,
        InteractionKind::Coffee,
        InteractionKind::VideoCall,
        InteractionKind::SocialMedia,
        InteractionKind::Letter,
        InteractionKind::Gift,
        InteractionKind::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            InteractionKind::Text => "text",
            InteractionKind::Call => "call",
            InteractionKind::Email => "email",
            InteractionKind::Meeting => "meeting",
            InteractionKind::Coffee => "coffee",
            InteractionKind::VideoCall => "video_call",
            InteractionKind::SocialMedia => "social_media",
            InteractionKind::Letter => "letter",
            InteractionKind::Gift => "gift",
            InteractionKind::Other => "other",
        }
    }
}

impl fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InteractionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InteractionKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("unknown interaction type: {s:?}"))
    }
}

use serde::{Deserialize, Serialize};

/// Time-of-day vocabulary shared by pose variations and backgrounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    Morning,
    Day,
    Sunset,
    Night,
}

impl TimeOfDay {
    /// The serialized name: "morning", "day", "sunset", "night".
    pub fn name(&self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Day => "day",
            Self::Sunset => "sunset",
            Self::Night => "night",
        }
    }

    /// Parse a serialized name back into a variant.
    pub fn from_name(name: &str) -> Option<TimeOfDay> {
        match name {
            "morning" => Some(Self::Morning),
            "day" => Some(Self::Day),
            "sunset" => Some(Self::Sunset),
            "night" => Some(Self::Night),
            _ => None,
        }
    }
}

/// How physically active a variation reads on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Energy {
    Low,
    Medium,
    High,
}

impl Default for Energy {
    fn default() -> Self {
        Self::Medium
    }
}

/// Coarse narrative-progress bucket a variation is drawn for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoryBeat {
    Introduction,
    Action,
    Climax,
    Resolution,
}

/// Whether a variation depicts the character alone or with their companion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionMode {
    Solo,
    WithCompanion,
}

/// Contextual tags attached to a concrete image variant.
///
/// An empty `time_of_day` list means the variation suits any time; an
/// absent `interaction` means it works both solo and accompanied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VariationContext {
    #[serde(default)]
    pub time_of_day: Vec<TimeOfDay>,
    #[serde(default)]
    pub energy: Energy,
    #[serde(default)]
    pub story_beats: Vec<StoryBeat>,
    #[serde(default)]
    pub interaction: Option<InteractionMode>,
}

/// A specific renderable asset for a pose or background subtype.
///
/// A bare path is a valid variation: tags default to empty and the
/// context to its neutral values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetVariation {
    pub path: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub context: VariationContext,
}

/// A named character stance with matchable keywords and its image variants.
///
/// Pose ids are unique across the catalog and each pose belongs to exactly
/// one character.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterPose {
    pub id: String,
    pub character: String,
    pub name: String,
    pub emotions: Vec<String>,
    pub actions: Vec<String>,
    pub variations: Vec<AssetVariation>,
}

//! Story-setting metadata — which settings exist, when they are valid,
//! and which of them can plausibly appear in the same story.

use super::pose::TimeOfDay;

/// Static description of one story setting, aligned with the built-in
/// backgrounds by id.
#[derive(Debug, Clone, Copy)]
pub struct SettingMetadata {
    pub id: &'static str,
    pub display_name: &'static str,
    pub indoor: bool,
    pub valid_time_of_day: &'static [TimeOfDay],
    pub common_activities: &'static [&'static str],
    /// Settings that can logically appear in the same story as this one.
    pub compatible: &'static [&'static str],
}

/// All settings a story request may name.
pub const VALID_SETTINGS: &[SettingMetadata] = &[
    SettingMetadata {
        id: "forest",
        display_name: "Forest",
        indoor: false,
        valid_time_of_day: &[TimeOfDay::Day],
        common_activities: &["hiking", "exploring", "observing nature"],
        compatible: &["park", "home"],
    },
    SettingMetadata {
        id: "park",
        display_name: "Park",
        indoor: false,
        valid_time_of_day: &[TimeOfDay::Day],
        common_activities: &["playing", "walking", "picnicking"],
        compatible: &["forest", "home"],
    },
    SettingMetadata {
        id: "home",
        display_name: "Home",
        indoor: true,
        valid_time_of_day: &[TimeOfDay::Day, TimeOfDay::Night],
        common_activities: &["playing", "resting", "family time"],
        compatible: &["forest", "park", "beach"],
    },
    SettingMetadata {
        id: "beach",
        display_name: "Beach",
        indoor: false,
        valid_time_of_day: &[TimeOfDay::Day, TimeOfDay::Sunset],
        common_activities: &["building sandcastles", "collecting shells", "paddling"],
        compatible: &["home"],
    },
];

/// Look up metadata for a setting id.
pub fn metadata(id: &str) -> Option<&'static SettingMetadata> {
    VALID_SETTINGS.iter().find(|setting| setting.id == id)
}

pub fn is_valid_setting(id: &str) -> bool {
    metadata(id).is_some()
}

/// Whether two settings can appear in the same story. Compatibility is
/// symmetric: a listing in either direction counts.
pub fn are_compatible(a: &str, b: &str) -> bool {
    let listed = |from: &str, to: &str| {
        metadata(from).is_some_and(|setting| setting.compatible.contains(&to))
    };
    listed(a, b) || listed(b, a)
}

pub fn indoor_settings() -> Vec<&'static str> {
    VALID_SETTINGS
        .iter()
        .filter(|setting| setting.indoor)
        .map(|setting| setting.id)
        .collect()
}

pub fn outdoor_settings() -> Vec<&'static str> {
    VALID_SETTINGS
        .iter()
        .filter(|setting| !setting.indoor)
        .map(|setting| setting.id)
        .collect()
}

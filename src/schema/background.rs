use serde::{Deserialize, Serialize};

use super::pose::{AssetVariation, TimeOfDay};

/// A named refinement of a background with its own keywords and variants
/// (e.g. a particular clearing within a forest).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackgroundSubtype {
    pub id: String,
    pub name: String,
    pub keywords: Vec<String>,
    #[serde(default)]
    pub variations: Vec<AssetVariation>,
}

/// A full scene backdrop with top-level setting keywords and an ordered
/// list of subtypes. Subtype order is meaningful: the first subtype is the
/// deterministic fallback when no subtype keyword matches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Background {
    pub id: String,
    pub name: String,
    pub settings: Vec<String>,
    #[serde(default)]
    pub time_of_day: Vec<TimeOfDay>,
    #[serde(default)]
    pub subtypes: Vec<BackgroundSubtype>,
}

impl Background {
    /// Look up a subtype by id.
    pub fn subtype(&self, id: &str) -> Option<&BackgroundSubtype> {
        self.subtypes.iter().find(|subtype| subtype.id == id)
    }

    /// Whether this background lists the given time of day. An empty list
    /// places no restriction.
    pub fn allows_time(&self, time: TimeOfDay) -> bool {
        self.time_of_day.is_empty() || self.time_of_day.contains(&time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_background() -> Background {
        ron::from_str(
            r#"(
                id: "forest",
                name: "Forest",
                settings: ["forest", "outdoor", "nature", "woods", "trees"],
                time_of_day: [day],
                subtypes: [
                    (
                        id: "dense_path",
                        name: "Dense Woodland Path",
                        keywords: ["path", "trail", "dense", "winding"],
                        variations: [(path: "assets/backgrounds/forest/dense_path/01.png")],
                    ),
                    (
                        id: "meadow_edge",
                        name: "Forest Meadow Edge",
                        keywords: ["meadow", "edge", "open", "sunny"],
                        variations: [(path: "assets/backgrounds/forest/meadow_edge/01.png")],
                    ),
                ],
            )"#,
        )
        .unwrap()
    }

    #[test]
    fn subtype_lookup() {
        let background = make_background();
        assert!(background.subtype("dense_path").is_some());
        assert!(background.subtype("meadow_edge").is_some());
        assert!(background.subtype("swamp").is_none());
    }

    #[test]
    fn subtype_order_is_preserved() {
        let background = make_background();
        assert_eq!(background.subtypes[0].id, "dense_path");
        assert_eq!(background.subtypes[1].id, "meadow_edge");
    }

    #[test]
    fn allows_listed_times_only() {
        let background = make_background();
        assert!(background.allows_time(TimeOfDay::Day));
        assert!(!background.allows_time(TimeOfDay::Night));
    }

    #[test]
    fn empty_time_list_allows_everything() {
        let mut background = make_background();
        background.time_of_day.clear();
        assert!(background.allows_time(TimeOfDay::Night));
    }
}

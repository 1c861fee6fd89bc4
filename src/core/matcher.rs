//! Entity matcher — scores catalog entries against a scene description.
//!
//! Matching is plain keyword-substring presence over the lower-cased
//! description; there is no grammar or semantic analysis. The matcher is
//! deterministic: on equal top scores the first-enumerated candidate wins,
//! and a description with no keyword overlap falls back to the first
//! candidate rather than failing.

use thiserror::Error;
use tracing::debug;

use crate::core::catalog::Catalog;
use crate::schema::background::{Background, BackgroundSubtype};
use crate::schema::pose::CharacterPose;

const EMOTION_WEIGHT: i32 = 2;
const ACTION_WEIGHT: i32 = 2;
const SETTING_WEIGHT: i32 = 2;
const SUBTYPE_KEYWORD_WEIGHT: i32 = 3;

#[derive(Debug, Error)]
pub enum MatchError {
    #[error("no poses in catalog for character '{0}'")]
    UnknownCharacter(String),
    #[error("catalog has no backgrounds")]
    NoBackgrounds,
}

/// A chosen pose with its score and the keywords that earned it.
#[derive(Debug, Clone)]
pub struct PoseMatch<'a> {
    pub pose: &'a CharacterPose,
    pub score: i32,
    pub matched_emotions: Vec<&'a str>,
    pub matched_actions: Vec<&'a str>,
}

/// The best-scoring subtype within one background.
#[derive(Debug, Clone)]
pub struct SubtypeMatch<'a> {
    pub subtype: &'a BackgroundSubtype,
    pub score: i32,
    pub matched_keywords: Vec<&'a str>,
}

/// A chosen background with its score, matched setting keywords, and the
/// winning subtype when any subtype keyword matched.
#[derive(Debug, Clone)]
pub struct BackgroundMatch<'a> {
    pub background: &'a Background,
    pub score: i32,
    pub matched_settings: Vec<&'a str>,
    pub subtype: Option<SubtypeMatch<'a>>,
}

fn contains_keyword(description: &str, keyword: &str) -> bool {
    description.contains(keyword.to_lowercase().as_str())
}

/// Find the best pose for `character`. The only failure is a character the
/// catalog knows nothing about; zero keyword overlap returns the first of
/// the character's poses with its zero score visible to the caller.
pub fn match_pose<'a>(
    catalog: &'a Catalog,
    description: &str,
    character: &str,
) -> Result<PoseMatch<'a>, MatchError> {
    let description = description.to_lowercase();
    let mut best: Option<PoseMatch<'a>> = None;

    for pose in catalog.poses_for(character) {
        let mut score = 0;
        let mut matched_emotions = Vec::new();
        let mut matched_actions = Vec::new();

        for emotion in &pose.emotions {
            if contains_keyword(&description, emotion) {
                score += EMOTION_WEIGHT;
                matched_emotions.push(emotion.as_str());
            }
        }
        for action in &pose.actions {
            if contains_keyword(&description, action) {
                score += ACTION_WEIGHT;
                matched_actions.push(action.as_str());
            }
        }

        debug!(pose = %pose.id, score, "scored pose");

        // First-enumerated candidate wins ties.
        if best.as_ref().is_none_or(|current| score > current.score) {
            best = Some(PoseMatch {
                pose,
                score,
                matched_emotions,
                matched_actions,
            });
        }
    }

    best.ok_or_else(|| MatchError::UnknownCharacter(character.to_string()))
}

fn best_subtype<'a>(background: &'a Background, description: &str) -> Option<SubtypeMatch<'a>> {
    let mut best: Option<SubtypeMatch<'a>> = None;

    for subtype in &background.subtypes {
        let mut score = 0;
        let mut matched_keywords = Vec::new();
        for keyword in &subtype.keywords {
            if contains_keyword(description, keyword) {
                score += SUBTYPE_KEYWORD_WEIGHT;
                matched_keywords.push(keyword.as_str());
            }
        }
        if best.as_ref().is_none_or(|current| score > current.score) {
            best = Some(SubtypeMatch {
                subtype,
                score,
                matched_keywords,
            });
        }
    }

    // A subtype is only reported when it actually matched something.
    best.filter(|subtype| subtype.score > 0)
}

/// Find the best background. Each background scores its setting keywords
/// plus the score of its single best subtype.
pub fn match_background<'a>(
    catalog: &'a Catalog,
    description: &str,
) -> Result<BackgroundMatch<'a>, MatchError> {
    let description = description.to_lowercase();
    let mut best: Option<BackgroundMatch<'a>> = None;

    for background in &catalog.backgrounds {
        let mut score = 0;
        let mut matched_settings = Vec::new();

        for setting in &background.settings {
            if contains_keyword(&description, setting) {
                score += SETTING_WEIGHT;
                matched_settings.push(setting.as_str());
            }
        }

        let subtype = best_subtype(background, &description);
        if let Some(subtype) = &subtype {
            score += subtype.score;
        }

        debug!(
            background = %background.id,
            score,
            subtype = subtype.as_ref().map(|s| s.subtype.id.as_str()),
            "scored background"
        );

        if best.as_ref().is_none_or(|current| score > current.score) {
            best = Some(BackgroundMatch {
                background,
                score,
                matched_settings,
                subtype,
            });
        }
    }

    best.ok_or(MatchError::NoBackgrounds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::pose::AssetVariation;

    fn make_pose(id: &str, character: &str, emotions: &[&str], actions: &[&str]) -> CharacterPose {
        CharacterPose {
            id: id.to_string(),
            character: character.to_string(),
            name: id.to_string(),
            emotions: emotions.iter().map(|s| s.to_string()).collect(),
            actions: actions.iter().map(|s| s.to_string()).collect(),
            variations: vec![AssetVariation {
                path: format!("assets/poses/{}/01.png", id),
                tags: Vec::new(),
                context: Default::default(),
            }],
        }
    }

    fn make_catalog() -> Catalog {
        Catalog {
            poses: vec![
                make_pose(
                    "ellie_standing",
                    "ellie",
                    &["neutral", "calm"],
                    &["standing", "observing"],
                ),
                make_pose(
                    "ellie_running",
                    "ellie",
                    &["energetic", "adventurous"],
                    &["running", "chasing", "exploring"],
                ),
                make_pose(
                    "biscuit_sitting",
                    "biscuit",
                    &["attentive", "relaxed"],
                    &["sitting", "waiting"],
                ),
            ],
            backgrounds: vec![
                ron::from_str(
                    r#"(
                        id: "forest",
                        name: "Forest",
                        settings: ["forest", "outdoor", "nature", "woods", "trees"],
                        subtypes: [
                            (
                                id: "dense_path",
                                name: "Dense Woodland Path",
                                keywords: ["path", "trail", "dense", "winding", "walking", "exploring"],
                                variations: [(path: "assets/backgrounds/forest/dense_path/01.png")],
                            ),
                            (
                                id: "meadow_edge",
                                name: "Forest Meadow Edge",
                                keywords: ["meadow", "edge", "open", "flowers", "grass", "sunny"],
                                variations: [(path: "assets/backgrounds/forest/meadow_edge/01.png")],
                            ),
                        ],
                    )"#,
                )
                .unwrap(),
                ron::from_str(
                    r#"(
                        id: "home",
                        name: "Home",
                        settings: ["home", "indoor", "house", "cozy"],
                        subtypes: [(
                            id: "bedroom",
                            name: "Bedroom",
                            keywords: ["bedroom", "bed", "sleeping", "rest"],
                            variations: [(path: "assets/backgrounds/home/bedroom/01.png")],
                        )],
                    )"#,
                )
                .unwrap(),
            ],
        }
    }

    #[test]
    fn matches_pose_by_action_keywords() {
        let catalog = make_catalog();
        let result = match_pose(&catalog, "Ellie is running and chasing butterflies", "ellie")
            .unwrap();
        assert_eq!(result.pose.id, "ellie_running");
        assert_eq!(result.score, 4);
        assert_eq!(result.matched_actions, vec!["running", "chasing"]);
        assert!(result.matched_emotions.is_empty());
    }

    #[test]
    fn no_overlap_falls_back_to_first_pose() {
        let catalog = make_catalog();
        let result = match_pose(&catalog, "a description with nothing familiar", "ellie").unwrap();
        assert_eq!(result.pose.id, "ellie_standing");
        assert_eq!(result.score, 0);
    }

    #[test]
    fn filters_to_requested_character() {
        let catalog = make_catalog();
        // "sitting" belongs to biscuit; ellie must not pick it up.
        let result = match_pose(&catalog, "sitting quietly", "ellie").unwrap();
        assert_eq!(result.pose.character, "ellie");
        let result = match_pose(&catalog, "sitting quietly", "biscuit").unwrap();
        assert_eq!(result.pose.id, "biscuit_sitting");
    }

    #[test]
    fn unknown_character_is_an_error() {
        let catalog = make_catalog();
        assert!(matches!(
            match_pose(&catalog, "anything", "nobody"),
            Err(MatchError::UnknownCharacter(name)) if name == "nobody"
        ));
    }

    #[test]
    fn score_grows_with_injected_keywords() {
        let catalog = make_catalog();
        let mut description = String::from("a quiet afternoon");
        let mut last_score = match_pose(&catalog, &description, "ellie").unwrap().score;
        for keyword in ["energetic", "running", "chasing", "exploring"] {
            description.push(' ');
            description.push_str(keyword);
            let score = match_pose(&catalog, &description, "ellie").unwrap().score;
            assert!(
                score >= last_score,
                "score dropped from {} to {} after adding '{}'",
                last_score,
                score,
                keyword
            );
            last_score = score;
        }
    }

    #[test]
    fn background_includes_best_subtype() {
        let catalog = make_catalog();
        let result = match_background(
            &catalog,
            "a winding path through dense trees leading to a sunny meadow",
        )
        .unwrap();
        assert_eq!(result.background.id, "forest");
        // "trees" from settings (+2); dense_path: path+winding+dense (+9)
        // beats meadow_edge: meadow+sunny (+6).
        let subtype = result.subtype.expect("a subtype should have matched");
        assert_eq!(subtype.subtype.id, "dense_path");
        assert_eq!(subtype.score, 9);
        assert_eq!(result.score, 2 + 9);
    }

    #[test]
    fn background_without_subtype_hit_reports_none() {
        let catalog = make_catalog();
        let result = match_background(&catalog, "a cozy house").unwrap();
        assert_eq!(result.background.id, "home");
        assert!(result.subtype.is_none());
    }

    #[test]
    fn background_no_overlap_falls_back_to_first() {
        let catalog = make_catalog();
        let result = match_background(&catalog, "somewhere entirely new").unwrap();
        assert_eq!(result.background.id, "forest");
        assert_eq!(result.score, 0);
    }

    #[test]
    fn keyword_matching_is_case_insensitive() {
        let catalog = make_catalog();
        let result = match_pose(&catalog, "RUNNING THROUGH THE FOREST", "ellie").unwrap();
        assert_eq!(result.pose.id, "ellie_running");
    }
}

//! Interaction classifier — infers the spatial relationship between two
//! characters from the scene description.
//!
//! A total function over keyword rules checked in fixed priority order;
//! with no recognized keyword it returns the documented defaults.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// What the characters are doing together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    None,
    Playing,
    Exploring,
    Talking,
    Resting,
}

/// How near the characters stand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Proximity {
    Close,
    Medium,
    Far,
}

/// Which way the characters face relative to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facing {
    SameDirection,
    TowardsEachOther,
    Away,
    Independent,
}

/// Horizontal bias of the scene on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenSide {
    Left,
    Right,
    Center,
}

/// The shape the pair makes when grouped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Arrangement {
    SideBySide,
    Diagonal,
    Staggered,
}

/// The inferred spatial/relational configuration between two characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionDescriptor {
    pub kind: InteractionKind,
    pub proximity: Proximity,
    pub facing: Facing,
    pub position: ScreenSide,
    pub arrangement: Arrangement,
}

impl Default for InteractionDescriptor {
    fn default() -> Self {
        Self {
            kind: InteractionKind::None,
            proximity: Proximity::Far,
            facing: Facing::Independent,
            position: ScreenSide::Center,
            arrangement: Arrangement::SideBySide,
        }
    }
}

fn any_of(description: &str, words: &[&str]) -> bool {
    words.iter().any(|word| description.contains(word))
}

/// An explicit "left"/"right" cue in the text.
fn explicit_side(description: &str) -> Option<ScreenSide> {
    if description.contains("left") {
        Some(ScreenSide::Left)
    } else if description.contains("right") {
        Some(ScreenSide::Right)
    } else {
        None
    }
}

/// Furniture cues bias the scene towards the side that furniture is drawn
/// on in the backgrounds.
fn furniture_side(description: &str, cues: &[(&str, ScreenSide)]) -> ScreenSide {
    cues.iter()
        .find(|(word, _)| description.contains(word))
        .map(|(_, side)| *side)
        .unwrap_or(ScreenSide::Left)
}

/// Classify the relationship between the primary and secondary character.
/// Always returns a descriptor; rules are checked in priority order and
/// the first hit wins.
pub fn classify_interaction<R: Rng>(description: &str, rng: &mut R) -> InteractionDescriptor {
    let description = description.to_lowercase();

    if any_of(&description, &["play", "chase", "game"]) {
        return InteractionDescriptor {
            kind: InteractionKind::Playing,
            proximity: Proximity::Close,
            facing: Facing::TowardsEachOther,
            position: explicit_side(&description).unwrap_or_else(|| {
                if rng.gen_bool(0.5) {
                    ScreenSide::Left
                } else {
                    ScreenSide::Right
                }
            }),
            arrangement: Arrangement::Diagonal,
        };
    }

    if any_of(&description, &["explore", "discover", "walk", "adventure"]) {
        return InteractionDescriptor {
            kind: InteractionKind::Exploring,
            proximity: Proximity::Medium,
            facing: Facing::SameDirection,
            position: explicit_side(&description).unwrap_or(if description.contains("towards") {
                ScreenSide::Center
            } else {
                ScreenSide::Left
            }),
            arrangement: if description.contains("together") {
                Arrangement::SideBySide
            } else {
                Arrangement::Staggered
            },
        };
    }

    if any_of(&description, &["talk", "chat", "discuss", "tell"]) {
        return InteractionDescriptor {
            kind: InteractionKind::Talking,
            proximity: Proximity::Close,
            facing: Facing::TowardsEachOther,
            position: furniture_side(
                &description,
                &[
                    ("bed", ScreenSide::Right),
                    ("window", ScreenSide::Left),
                    ("door", ScreenSide::Right),
                ],
            ),
            arrangement: Arrangement::SideBySide,
        };
    }

    if any_of(&description, &["rest", "sleep", "sit", "relax"]) {
        return InteractionDescriptor {
            kind: InteractionKind::Resting,
            proximity: Proximity::Close,
            facing: Facing::SameDirection,
            position: furniture_side(
                &description,
                &[
                    ("bed", ScreenSide::Right),
                    ("couch", ScreenSide::Left),
                    ("chair", ScreenSide::Right),
                ],
            ),
            arrangement: Arrangement::SideBySide,
        };
    }

    InteractionDescriptor::default()
}

//! Matcher integration tests over the built-in storybook catalog.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use scene_engine::core::catalog::Catalog;
use scene_engine::core::interaction::{classify_interaction, InteractionDescriptor, InteractionKind};
use scene_engine::core::matcher::{match_background, match_pose};
use std::path::Path;

fn load_catalog() -> Catalog {
    let catalog = Catalog::load_from_ron(Path::new("catalog_data/storybook/catalog.ron"))
        .expect("built-in catalog should load");
    catalog.validate().expect("built-in catalog should validate");
    catalog
}

#[test]
fn no_keyword_overlap_always_returns_the_same_fallback() {
    let catalog = load_catalog();
    let descriptions = [
        "zzz qqq xxx",
        "an unremarkable moment",
        "fog over the hills",
        "",
    ];

    let mut fallback = None;
    for description in descriptions {
        let result = match_pose(&catalog, description, "ellie").unwrap();
        assert_eq!(result.score, 0, "'{}' should match nothing", description);
        match &fallback {
            None => fallback = Some(result.pose.id.clone()),
            Some(expected) => assert_eq!(&result.pose.id, expected),
        }
    }
    // The fallback is the character's first pose in catalog order.
    assert_eq!(fallback.as_deref(), Some("ellie_standing"));
}

#[test]
fn score_is_monotonic_as_keywords_are_injected() {
    let catalog = load_catalog();
    let running = catalog
        .poses_for("ellie")
        .find(|pose| pose.id == "ellie_running")
        .unwrap();

    let mut description = String::from("somewhere in the distance");
    let mut last = match_pose(&catalog, &description, "ellie").unwrap().score;
    for keyword in running.emotions.iter().chain(running.actions.iter()) {
        description.push(' ');
        description.push_str(keyword);
        let score = match_pose(&catalog, &description, "ellie").unwrap().score;
        assert!(score >= last, "score decreased after injecting '{}'", keyword);
        last = score;
    }
    // Every keyword of the pose present: it must be the winner.
    let result = match_pose(&catalog, &description, "ellie").unwrap();
    assert_eq!(result.pose.id, "ellie_running");
    assert_eq!(
        result.score,
        2 * (running.emotions.len() + running.actions.len()) as i32
    );
}

#[test]
fn forest_subtypes_compete_and_the_higher_wins() {
    let catalog = load_catalog();

    let description = "a winding path through dense trees leading to a sunny meadow";
    let result = match_background(&catalog, description).unwrap();
    assert_eq!(result.background.id, "forest");

    // Both subtypes have hits in this description; dense_path has more.
    let subtype = result.subtype.expect("a subtype should have matched");
    assert_eq!(subtype.subtype.id, "dense_path");
    assert!(subtype.score > 0);
    assert_eq!(subtype.matched_keywords.len(), 3); // path, dense, winding

    // The meadow keywords alone do pick the other subtype.
    let meadow = match_background(&catalog, "a sunny open meadow full of flowers").unwrap();
    assert_eq!(meadow.background.id, "forest");
    assert_eq!(meadow.subtype.unwrap().subtype.id, "meadow_edge");
}

#[test]
fn background_fallback_is_first_entry() {
    let catalog = load_catalog();
    let result = match_background(&catalog, "qqq zzz").unwrap();
    assert_eq!(result.background.id, catalog.backgrounds[0].id);
    assert_eq!(result.score, 0);
    assert!(result.subtype.is_none());
}

#[test]
fn classifier_is_total_over_keyword_free_noise() {
    // Alphabet chosen so no classifier keyword can appear.
    const ALPHABET: &[char] = &['x', 'q', 'z', 'j', 'v', ' '];

    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..50 {
        let len = rng.gen_range(1..40);
        let description: String = (0..len)
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())])
            .collect();

        let result = classify_interaction(&description, &mut rng);
        assert_eq!(result, InteractionDescriptor::default(), "input: '{}'", description);
        assert_eq!(result.kind, InteractionKind::None);
    }
}

#[test]
fn playing_scenario_classifies_as_expected() {
    use scene_engine::core::interaction::{Arrangement, Facing, Proximity};

    let mut rng = StdRng::seed_from_u64(0);
    let result = classify_interaction("they play and chase each other near the swings", &mut rng);
    assert_eq!(result.kind, InteractionKind::Playing);
    assert_eq!(result.proximity, Proximity::Close);
    assert_eq!(result.facing, Facing::TowardsEachOther);
    assert_eq!(result.arrangement, Arrangement::Diagonal);
}

//! Storybook demo — composes a short three-page story end to end with an
//! in-memory asset source and a stub compositor, printing each page's
//! report.
//!
//! Run with: cargo run --example storybook

use scene_engine::core::pipeline::{
    page_requests, AssetSource, CollaboratorError, Compositor, Layer, SceneEngine,
};
use scene_engine::schema::pose::TimeOfDay;
use scene_engine::schema::story::{validate_request, Story, StoryPage, StoryRequest};

/// Pretends every background is 1024x768 and every character 320x600.
struct DemoAssets;

impl AssetSource for DemoAssets {
    fn dimensions(&self, path: &str) -> Result<(u32, u32), CollaboratorError> {
        if path.contains("backgrounds") {
            Ok((1024, 768))
        } else {
            Ok((320, 600))
        }
    }

    fn read(&self, path: &str) -> Result<Vec<u8>, CollaboratorError> {
        Ok(path.as_bytes().to_vec())
    }
}

/// Stands in for the real raster compositor: just echoes the background.
struct DemoCompositor;

impl Compositor for DemoCompositor {
    fn compose(&self, background: &[u8], layers: &[Layer]) -> Result<Vec<u8>, CollaboratorError> {
        println!("  compositing {} layer(s) onto the background:", layers.len());
        for layer in layers {
            println!(
                "    layer {}x{} at ({}, {})",
                layer.width, layer.height, layer.left, layer.top
            );
        }
        Ok(background.to_vec())
    }
}

fn main() {
    tracing_subscriber::fmt::init();

    let request = StoryRequest {
        main_character: "Ellie".to_string(),
        companion: Some("Biscuit".to_string()),
        setting: "park".to_string(),
        page_count: 3,
    };
    validate_request(&request).expect("story request should be valid");

    // A hand-written story standing in for the text-generation step.
    let story = Story {
        title: "The Lost Red Ball".to_string(),
        subtitle: "A park adventure for Ellie and Biscuit".to_string(),
        pages: vec![
            StoryPage {
                page_number: 1,
                text: "Ellie and Biscuit set off for the park on a sunny morning.".to_string(),
                image_description:
                    "Ellie walking along the peaceful park path with Biscuit, calm and curious"
                        .to_string(),
            },
            StoryPage {
                page_number: 2,
                text: "Biscuit spotted his red ball by the swings and raced after it.".to_string(),
                image_description:
                    "they play and chase each other near the swings on the playground, excited"
                        .to_string(),
            },
            StoryPage {
                page_number: 3,
                text: "Tired and happy, the two friends rested on the grass.".to_string(),
                image_description:
                    "Ellie and Biscuit sit and rest on the open grass, calm and peaceful"
                        .to_string(),
            },
        ],
    };

    let mut engine = SceneEngine::builder()
        .seed(1993)
        .catalog_path("catalog_data/storybook/catalog.ron")
        .build()
        .expect("failed to load the storybook catalog");

    let pages = page_requests(&story, "ellie", Some("biscuit"), Some(TimeOfDay::Day));

    println!("{}: {}\n", story.title, story.subtitle);
    let composed = engine
        .compose_story(&pages, &DemoAssets, &DemoCompositor)
        .expect("composition failed");

    for page in &composed {
        let report = &page.report;
        println!("\n--- Page {} ---", report.page_number);
        println!(
            "background: {} / {} ({})",
            report.background.background_id,
            report.background.subtype_id.as_deref().unwrap_or("-"),
            report.background.variation_path
        );
        println!(
            "{}: {} (score {}) -> {}",
            report.primary.character,
            report.primary.pose_name,
            report.primary.score,
            report.primary.variation_path
        );
        if let Some(secondary) = &report.secondary {
            println!(
                "{}: {} (score {}) -> {}",
                secondary.character, secondary.pose_name, secondary.score, secondary.variation_path
            );
        }
        println!(
            "interaction: {:?}/{:?}, position {:?}, arrangement {:?}",
            report.interaction.kind,
            report.interaction.proximity,
            report.interaction.position,
            report.interaction.arrangement
        );
    }
}

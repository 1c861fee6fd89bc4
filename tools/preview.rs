//! Preview — runs a scene description through the matcher, variation
//! selector, and interaction classifier, and prints the scored results.
//!
//! Usage: preview <description> [--catalog <path>] [--character <id>]...
//!                [--page <n>] [--pages <total>] [--time <time_of_day>]
//!                [--seed <n>]

use rand::rngs::StdRng;
use rand::SeedableRng;
use scene_engine::core::interaction::classify_interaction;
use scene_engine::core::pipeline::SceneEngine;
use scene_engine::core::variation::SceneContext;
use scene_engine::schema::pose::TimeOfDay;
use std::process;

const DEFAULT_CATALOG: &str = "catalog_data/storybook/catalog.ron";

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        println!(
            "Usage: preview <description> [--catalog <path>] [--character <id>]... \
             [--page <n>] [--pages <total>] [--time <time_of_day>] [--seed <n>]"
        );
        process::exit(0);
    }

    let description = args[1].clone();
    let mut catalog_path = DEFAULT_CATALOG.to_string();
    let mut characters: Vec<String> = Vec::new();
    let mut page_number = 1u32;
    let mut total_pages = 1u32;
    let mut time_of_day: Option<TimeOfDay> = None;
    let mut seed = 0u64;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--catalog" if i + 1 < args.len() => {
                i += 1;
                catalog_path = args[i].clone();
            }
            "--character" if i + 1 < args.len() => {
                i += 1;
                characters.push(args[i].clone());
            }
            "--page" if i + 1 < args.len() => {
                i += 1;
                page_number = args[i].parse().unwrap_or(1);
            }
            "--pages" if i + 1 < args.len() => {
                i += 1;
                total_pages = args[i].parse().unwrap_or(1);
            }
            "--time" if i + 1 < args.len() => {
                i += 1;
                time_of_day = TimeOfDay::from_name(&args[i]);
                if time_of_day.is_none() {
                    eprintln!("WARNING: unknown time of day '{}', ignoring", args[i]);
                }
            }
            "--seed" if i + 1 < args.len() => {
                i += 1;
                seed = args[i].parse().unwrap_or(0);
            }
            other => {
                eprintln!("WARNING: unrecognized argument '{}'", other);
            }
        }
        i += 1;
    }

    let mut engine = match SceneEngine::builder()
        .seed(seed)
        .catalog_path(&catalog_path)
        .build()
    {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("ERROR: Failed to load catalog '{}': {}", catalog_path, e);
            process::exit(1);
        }
    };

    if characters.is_empty() {
        characters = engine
            .catalog()
            .characters()
            .into_iter()
            .map(str::to_string)
            .collect();
    }

    println!("Description: {}", description);
    println!();

    match engine.match_background(&description) {
        Ok(result) => {
            println!("=== Background ===");
            println!(
                "  {} ({}), score {}",
                result.background.name, result.background.id, result.score
            );
            if result.matched_settings.is_empty() {
                println!("  matched settings: none (deterministic fallback)");
            } else {
                println!("  matched settings: {}", result.matched_settings.join(", "));
            }
            match result.subtype {
                Some(subtype) => println!(
                    "  subtype: {} ({}), score {}, keywords: {}",
                    subtype.subtype.name,
                    subtype.subtype.id,
                    subtype.score,
                    subtype.matched_keywords.join(", ")
                ),
                None => println!("  subtype: none matched"),
            }
        }
        Err(e) => {
            eprintln!("ERROR: {}", e);
            process::exit(1);
        }
    }

    let companion_present = characters.len() > 1;
    for character in &characters {
        println!();
        println!("=== Character '{}' ===", character);

        let (pose, score, emotions, actions) =
            match engine.match_pose(&description, character) {
                Ok(result) => (
                    result.pose.clone(),
                    result.score,
                    result.matched_emotions.join(", "),
                    result.matched_actions.join(", "),
                ),
                Err(e) => {
                    eprintln!("ERROR: {}", e);
                    continue;
                }
            };

        println!("  {} ({}), score {}", pose.name, pose.id, score);
        println!(
            "  matched emotions: {}",
            if emotions.is_empty() { "none" } else { emotions.as_str() }
        );
        println!(
            "  matched actions: {}",
            if actions.is_empty() { "none" } else { actions.as_str() }
        );

        let ctx = SceneContext {
            time_of_day,
            page_number,
            total_pages,
            companion_present,
            previous_variation: None,
        };
        match engine.select_variation(&pose, &description, &ctx) {
            Ok(path) => println!("  selected variation: {}", path),
            Err(e) => eprintln!("  ERROR selecting variation: {}", e),
        }
    }

    if companion_present {
        let mut rng = StdRng::seed_from_u64(seed);
        let interaction = classify_interaction(&description, &mut rng);
        println!();
        println!("=== Interaction ===");
        println!("  {:?}", interaction);
    }
}

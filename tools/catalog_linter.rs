//! Catalog Linter — validates catalog structure and keyword quality.
//!
//! Usage: catalog_linter <catalog.ron | catalog_dir>

use rustc_hash::FxHashSet;
use scene_engine::core::catalog::Catalog;
use std::path::Path;
use std::process;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        println!("Usage: catalog_linter <catalog.ron | catalog_dir>");
        process::exit(0);
    }

    let catalog_path = Path::new(&args[1]);
    let mut catalog = Catalog::default();

    if catalog_path.is_file() {
        match Catalog::load_from_ron(catalog_path) {
            Ok(loaded) => merge(&mut catalog, loaded),
            Err(e) => {
                eprintln!("ERROR: Failed to load catalog file: {}", e);
                process::exit(1);
            }
        }
    } else if catalog_path.is_dir() {
        load_catalogs_recursive(catalog_path, &mut catalog);
    } else {
        eprintln!("ERROR: Path '{}' does not exist", args[1]);
        process::exit(1);
    }

    println!(
        "Loaded {} poses and {} backgrounds",
        catalog.poses.len(),
        catalog.backgrounds.len()
    );

    let (errors, warnings) = lint_catalog(&catalog);

    println!("\n=== Catalog Lint Report ===\n");

    if errors.is_empty() && warnings.is_empty() {
        println!("All checks passed!");
    }

    for warning in &warnings {
        println!("WARNING: {}", warning);
    }

    for error in &errors {
        println!("ERROR: {}", error);
    }

    println!(
        "\nSummary: {} errors, {} warnings",
        errors.len(),
        warnings.len()
    );

    if errors.is_empty() {
        process::exit(0);
    } else {
        process::exit(1);
    }
}

fn merge(catalog: &mut Catalog, other: Catalog) {
    catalog.poses.extend(other.poses);
    catalog.backgrounds.extend(other.backgrounds);
}

fn load_catalogs_recursive(dir: &Path, catalog: &mut Catalog) {
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                load_catalogs_recursive(&path, catalog);
            } else if path.extension().and_then(|s| s.to_str()) == Some("ron") {
                match Catalog::load_from_ron(&path) {
                    Ok(loaded) => {
                        println!("  Loaded: {}", path.display());
                        merge(catalog, loaded);
                    }
                    Err(e) => {
                        eprintln!("  ERROR loading {}: {}", path.display(), e);
                    }
                }
            }
        }
    }
}

fn lint_keywords(owner: &str, kind: &str, keywords: &[String], warnings: &mut Vec<String>) {
    if keywords.is_empty() {
        warnings.push(format!("{} has no {} keywords", owner, kind));
    }
    let mut seen = FxHashSet::default();
    for keyword in keywords {
        if keyword != &keyword.to_lowercase() {
            warnings.push(format!(
                "{} {} keyword '{}' is not lowercase (matching compares lowercase)",
                owner, kind, keyword
            ));
        }
        if !seen.insert(keyword.as_str()) {
            warnings.push(format!(
                "{} lists {} keyword '{}' more than once",
                owner, kind, keyword
            ));
        }
    }
}

fn lint_catalog(catalog: &Catalog) -> (Vec<String>, Vec<String>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if catalog.poses.is_empty() {
        errors.push("catalog has no poses".to_string());
    }
    if catalog.backgrounds.is_empty() {
        errors.push("catalog has no backgrounds".to_string());
    }

    let mut seen_ids = FxHashSet::default();
    for pose in &catalog.poses {
        let owner = format!("pose '{}'", pose.id);

        if !seen_ids.insert(pose.id.as_str()) {
            errors.push(format!("duplicate pose id '{}'", pose.id));
        }
        if pose.variations.is_empty() {
            errors.push(format!("{} has no variations", owner));
        } else if pose.variations.len() < 2 {
            warnings.push(format!(
                "{} has only {} variation (minimum 2 recommended for variety)",
                owner,
                pose.variations.len()
            ));
        }

        lint_keywords(&owner, "emotion", &pose.emotions, &mut warnings);
        lint_keywords(&owner, "action", &pose.actions, &mut warnings);

        let mut seen_paths = FxHashSet::default();
        for variation in &pose.variations {
            if !seen_paths.insert(variation.path.as_str()) {
                errors.push(format!(
                    "{} lists variation path '{}' more than once",
                    owner, variation.path
                ));
            }
        }
    }

    for background in &catalog.backgrounds {
        let owner = format!("background '{}'", background.id);

        lint_keywords(&owner, "setting", &background.settings, &mut warnings);
        if background.time_of_day.is_empty() {
            warnings.push(format!("{} lists no valid times of day", owner));
        }
        if background.subtypes.is_empty() {
            errors.push(format!("{} has no subtypes", owner));
        }

        for subtype in &background.subtypes {
            let subtype_owner = format!("subtype '{}' of {}", subtype.id, owner);
            if subtype.variations.is_empty() {
                errors.push(format!("{} has no variations", subtype_owner));
            } else if subtype.variations.len() < 2 {
                warnings.push(format!(
                    "{} has only {} variation (minimum 2 recommended for variety)",
                    subtype_owner,
                    subtype.variations.len()
                ));
            }
            lint_keywords(&subtype_owner, "subtype", &subtype.keywords, &mut warnings);
        }
    }

    (errors, warnings)
}

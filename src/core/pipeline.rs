//! Composition pipeline — matches assets, selects variants, lays out the
//! scene, and drives the external compositor.
//!
//! Everything here is synchronous; the compositor call is the only
//! externally blocking step. Pages compose strictly in sequence so each
//! page sees the previous page's variation choices.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

use crate::core::catalog::{Catalog, CatalogError};
use crate::core::interaction::{classify_interaction, InteractionDescriptor};
use crate::core::layout::{layout, pct, Placement, Size};
use crate::core::matcher::{
    match_background, match_pose, BackgroundMatch, MatchError, PoseMatch,
};
use crate::core::variation::{select_variation, SceneContext};
use crate::schema::pose::{AssetVariation, CharacterPose, TimeOfDay};
use crate::schema::story::Story;

/// Characters occupy at most this share of the canvas.
const MAX_CHARACTER_WIDTH_PCT: u32 = 40;
const MAX_CHARACTER_HEIGHT_PCT: u32 = 80;

/// Errors produced by external collaborators are opaque to the engine.
pub type CollaboratorError = Box<dyn std::error::Error + Send + Sync>;

/// Supplies image bytes and pixel dimensions for catalog asset paths.
/// Decoding is a collaborator concern; the engine only consumes metadata
/// and opaque bytes.
pub trait AssetSource {
    fn dimensions(&self, path: &str) -> Result<(u32, u32), CollaboratorError>;
    fn read(&self, path: &str) -> Result<Vec<u8>, CollaboratorError>;
}

/// One layer handed to the compositor. Geometry is passed verbatim from
/// the layout engine.
#[derive(Debug, Clone)]
pub struct Layer {
    pub image: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub left: u32,
    pub top: u32,
}

/// Resizes and stacks layers onto the background and encodes the result.
pub trait Compositor {
    fn compose(&self, background: &[u8], layers: &[Layer]) -> Result<Vec<u8>, CollaboratorError>;
}

#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("match error: {0}")]
    Match(#[from] MatchError),
    #[error("invalid dimensions {width}x{height} for asset '{path}'")]
    InvalidDimensions {
        path: String,
        width: u32,
        height: u32,
    },
    #[error("failed to probe asset '{path}': {source}")]
    AssetProbe {
        path: String,
        source: CollaboratorError,
    },
    #[error("failed to read asset '{path}': {source}")]
    AssetRead {
        path: String,
        source: CollaboratorError,
    },
    #[error("compositor error: {0}")]
    Compositor(CollaboratorError),
}

/// One page's composition inputs, supplied by the calling pipeline.
#[derive(Debug, Clone)]
pub struct PageRequest {
    pub description: String,
    pub page_number: u32,
    pub total_pages: u32,
    /// Catalog id of the main character.
    pub primary: String,
    /// Catalog id of the companion, when the page has one.
    pub companion: Option<String>,
    pub time_of_day: Option<TimeOfDay>,
}

/// The previously selected variation path per character, threaded through
/// the pages of one story. Created fresh per story, never shared across
/// requests.
#[derive(Debug, Clone, Default)]
pub struct StoryHistory {
    previous: FxHashMap<String, String>,
}

impl StoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// The variation path this character used on the most recent page.
    pub fn previous_for(&self, character: &str) -> Option<&str> {
        self.previous.get(character).map(String::as_str)
    }

    fn record(&mut self, character: &str, path: &str) {
        self.previous.insert(character.to_string(), path.to_string());
    }
}

/// One character's selection, sized for the canvas and ready for logging.
#[derive(Debug, Clone, Serialize)]
pub struct CharacterReport {
    pub character: String,
    pub pose_id: String,
    pub pose_name: String,
    pub score: i32,
    pub matched_emotions: Vec<String>,
    pub matched_actions: Vec<String>,
    pub variation_path: String,
    pub placement: Placement,
}

/// The chosen background, for logging/metadata attachment.
#[derive(Debug, Clone, Serialize)]
pub struct BackgroundReport {
    pub background_id: String,
    pub background_name: String,
    pub score: i32,
    pub matched_settings: Vec<String>,
    pub subtype_id: Option<String>,
    pub subtype_keywords: Vec<String>,
    pub variation_path: String,
    pub width: u32,
    pub height: u32,
}

/// Everything a caller needs to log or attach as metadata for one page.
#[derive(Debug, Clone, Serialize)]
pub struct CompositionReport {
    pub page_number: u32,
    pub background: BackgroundReport,
    pub primary: CharacterReport,
    pub secondary: Option<CharacterReport>,
    pub interaction: InteractionDescriptor,
}

/// A composited page: encoded image bytes plus its report.
#[derive(Debug, Clone)]
pub struct ComposedPage {
    pub image: Vec<u8>,
    pub report: CompositionReport,
}

/// The scene composition engine. Built via [`SceneEngine::builder`]; holds
/// the immutable catalog and a seed for reproducible variation sampling.
pub struct SceneEngine {
    catalog: Catalog,
    seed: u64,
    composition_count: u64,
}

/// Builder for constructing a [`SceneEngine`].
pub struct SceneEngineBuilder {
    catalog_path: Option<PathBuf>,
    catalog: Option<Catalog>,
    seed: u64,
}

impl SceneEngine {
    pub fn builder() -> SceneEngineBuilder {
        SceneEngineBuilder {
            catalog_path: None,
            catalog: None,
            seed: 0,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Find the best pose for a character. See [`match_pose`].
    pub fn match_pose(
        &self,
        description: &str,
        character: &str,
    ) -> Result<PoseMatch<'_>, MatchError> {
        match_pose(&self.catalog, description, character)
    }

    /// Find the best background. See [`match_background`].
    pub fn match_background(&self, description: &str) -> Result<BackgroundMatch<'_>, MatchError> {
        match_background(&self.catalog, description)
    }

    /// Select a variation for an already-matched pose using the engine's
    /// seeded random source, returning the chosen asset path.
    pub fn select_variation(
        &mut self,
        pose: &CharacterPose,
        description: &str,
        ctx: &SceneContext,
    ) -> Result<String, CatalogError> {
        let mut rng = self.next_rng();
        select_variation(pose, description, ctx, &mut rng).map(|variation| variation.path.clone())
    }

    /// Compose one page: match, select, classify, lay out, and composite.
    /// Chosen variation paths are recorded in `history` only after the
    /// compositor succeeds.
    #[tracing::instrument(skip_all, fields(page = page.page_number))]
    pub fn compose_page(
        &mut self,
        page: &PageRequest,
        history: &mut StoryHistory,
        assets: &dyn AssetSource,
        compositor: &dyn Compositor,
    ) -> Result<ComposedPage, ComposeError> {
        let mut rng = self.next_rng();
        let catalog = &self.catalog;

        // Background first: its dimensions define the canvas.
        let background = match_background(catalog, &page.description)?;
        if let Some(time) = page.time_of_day {
            if !background.background.allows_time(time) {
                warn!(
                    background = %background.background.id,
                    time = time.name(),
                    "background does not list the requested time of day"
                );
            }
        }
        let subtype = match &background.subtype {
            Some(matched) => matched.subtype,
            None => background
                .background
                .subtypes
                .first()
                .ok_or_else(|| CatalogError::NoSubtypes(background.background.id.clone()))?,
        };
        if subtype.variations.is_empty() {
            return Err(CatalogError::EmptySubtype {
                background: background.background.id.clone(),
                subtype: subtype.id.clone(),
            }
            .into());
        }
        let background_variation = &subtype.variations[rng.gen_range(0..subtype.variations.len())];
        let canvas = probe_dimensions(assets, &background_variation.path)?;

        let companion_present = page.companion.is_some();
        let scene_ctx = |previous: Option<String>| SceneContext {
            time_of_day: page.time_of_day,
            page_number: page.page_number,
            total_pages: page.total_pages,
            companion_present,
            previous_variation: previous,
        };

        let primary_match = match_pose(catalog, &page.description, &page.primary)?;
        let primary_ctx = scene_ctx(history.previous_for(&page.primary).map(str::to_string));
        let primary_variation =
            select_variation(primary_match.pose, &page.description, &primary_ctx, &mut rng)?;
        let primary_size =
            fit_character(canvas, probe_dimensions(assets, &primary_variation.path)?);

        let secondary: Option<(PoseMatch<'_>, &AssetVariation, Size)> = match &page.companion {
            Some(companion) => {
                let pose_match = match_pose(catalog, &page.description, companion)?;
                let ctx = scene_ctx(history.previous_for(companion).map(str::to_string));
                let variation =
                    select_variation(pose_match.pose, &page.description, &ctx, &mut rng)?;
                let size = fit_character(canvas, probe_dimensions(assets, &variation.path)?);
                Some((pose_match, variation, size))
            }
            None => None,
        };

        let interaction = classify_interaction(&page.description, &mut rng);
        let scene = layout(
            canvas,
            primary_size,
            secondary.as_ref().map(|(_, _, size)| *size),
            &interaction,
        );

        let background_bytes = read_asset(assets, &background_variation.path)?;
        let mut layers = vec![make_layer(assets, &primary_variation.path, scene.primary)?];
        if let (Some((_, variation, _)), Some(placement)) = (&secondary, scene.secondary) {
            layers.push(make_layer(assets, &variation.path, placement)?);
        }
        let image = compositor
            .compose(&background_bytes, &layers)
            .map_err(ComposeError::Compositor)?;

        history.record(&page.primary, &primary_variation.path);
        if let (Some(companion), Some((_, variation, _))) = (&page.companion, &secondary) {
            history.record(companion, &variation.path);
        }

        let report = CompositionReport {
            page_number: page.page_number,
            background: BackgroundReport {
                background_id: background.background.id.clone(),
                background_name: background.background.name.clone(),
                score: background.score,
                matched_settings: owned(&background.matched_settings),
                subtype_id: background
                    .subtype
                    .as_ref()
                    .map(|matched| matched.subtype.id.clone()),
                subtype_keywords: background
                    .subtype
                    .as_ref()
                    .map(|matched| owned(&matched.matched_keywords))
                    .unwrap_or_default(),
                variation_path: background_variation.path.clone(),
                width: canvas.width,
                height: canvas.height,
            },
            primary: character_report(
                &page.primary,
                &primary_match,
                primary_variation,
                scene.primary,
            ),
            secondary: secondary.as_ref().zip(scene.secondary).map(
                |(&(ref pose_match, variation, _), placement)| {
                    let companion = page.companion.as_deref().unwrap_or_default();
                    character_report(companion, pose_match, variation, placement)
                },
            ),
            interaction,
        };

        Ok(ComposedPage { image, report })
    }

    /// Compose every page of a story in order, threading one history so
    /// page N+1 sees page N's choices. Pages are never composed
    /// concurrently; that would race on the history and defeat the
    /// anti-repetition guarantee.
    pub fn compose_story(
        &mut self,
        pages: &[PageRequest],
        assets: &dyn AssetSource,
        compositor: &dyn Compositor,
    ) -> Result<Vec<ComposedPage>, ComposeError> {
        let mut history = StoryHistory::new();
        let mut composed = Vec::with_capacity(pages.len());
        for page in pages {
            composed.push(self.compose_page(page, &mut history, assets, compositor)?);
        }
        Ok(composed)
    }

    fn next_rng(&mut self) -> StdRng {
        let rng = StdRng::seed_from_u64(self.seed.wrapping_add(self.composition_count));
        self.composition_count += 1;
        rng
    }
}

impl SceneEngineBuilder {
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn catalog_path(mut self, path: &str) -> Self {
        self.catalog_path = Some(PathBuf::from(path));
        self
    }

    /// Provide a catalog directly (for testing without files).
    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn build(self) -> Result<SceneEngine, CatalogError> {
        let catalog = match (self.catalog, self.catalog_path) {
            (Some(catalog), _) => catalog,
            (None, Some(path)) => Catalog::load_from_ron(Path::new(&path))?,
            (None, None) => Catalog::default(),
        };
        catalog.validate()?;

        Ok(SceneEngine {
            catalog,
            seed: self.seed,
            composition_count: 0,
        })
    }
}

/// Build per-page composition requests from a generated story.
pub fn page_requests(
    story: &Story,
    primary: &str,
    companion: Option<&str>,
    time_of_day: Option<TimeOfDay>,
) -> Vec<PageRequest> {
    let total_pages = story.pages.len() as u32;
    story
        .pages
        .iter()
        .map(|page| PageRequest {
            description: page.image_description.clone(),
            page_number: page.page_number,
            total_pages,
            primary: primary.to_string(),
            companion: companion.map(str::to_string),
            time_of_day,
        })
        .collect()
}

fn probe_dimensions(assets: &dyn AssetSource, path: &str) -> Result<Size, ComposeError> {
    let (width, height) = assets
        .dimensions(path)
        .map_err(|source| ComposeError::AssetProbe {
            path: path.to_string(),
            source,
        })?;
    if width == 0 || height == 0 {
        return Err(ComposeError::InvalidDimensions {
            path: path.to_string(),
            width,
            height,
        });
    }
    Ok(Size::new(width, height))
}

fn read_asset(assets: &dyn AssetSource, path: &str) -> Result<Vec<u8>, ComposeError> {
    assets.read(path).map_err(|source| ComposeError::AssetRead {
        path: path.to_string(),
        source,
    })
}

fn make_layer(
    assets: &dyn AssetSource,
    path: &str,
    placement: Placement,
) -> Result<Layer, ComposeError> {
    Ok(Layer {
        image: read_asset(assets, path)?,
        width: placement.width,
        height: placement.height,
        left: placement.left,
        top: placement.top,
    })
}

/// Scale a character's natural size to fit the canvas share reserved for
/// characters, preserving aspect and never enlarging.
fn fit_character(canvas: Size, natural: Size) -> Size {
    let max_width = pct(canvas.width, MAX_CHARACTER_WIDTH_PCT);
    let max_height = pct(canvas.height, MAX_CHARACTER_HEIGHT_PCT);
    if natural.width <= max_width && natural.height <= max_height {
        return natural;
    }

    let scale =
        (max_width as f64 / natural.width as f64).min(max_height as f64 / natural.height as f64);
    Size::new(
        ((natural.width as f64 * scale).floor() as u32).max(1),
        ((natural.height as f64 * scale).floor() as u32).max(1),
    )
}

fn character_report(
    character: &str,
    pose_match: &PoseMatch<'_>,
    variation: &AssetVariation,
    placement: Placement,
) -> CharacterReport {
    CharacterReport {
        character: character.to_string(),
        pose_id: pose_match.pose.id.clone(),
        pose_name: pose_match.pose.name.clone(),
        score: pose_match.score,
        matched_emotions: owned(&pose_match.matched_emotions),
        matched_actions: owned(&pose_match.matched_actions),
        variation_path: variation.path.clone(),
        placement,
    }
}

fn owned(keywords: &[&str]) -> Vec<String> {
    keywords.iter().map(|keyword| keyword.to_string()).collect()
}

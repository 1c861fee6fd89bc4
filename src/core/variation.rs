//! Variation selector — picks a concrete image variant within a matched
//! pose using narrative context, with bounded randomness among near-ties.

use rand::Rng;
use tracing::debug;

use crate::core::catalog::CatalogError;
use crate::schema::pose::{
    AssetVariation, CharacterPose, Energy, InteractionMode, StoryBeat, TimeOfDay,
};

const TIME_OF_DAY_BONUS: i32 = 2;
const STORY_BEAT_BONUS: i32 = 3;
const INTERACTION_BONUS: i32 = 2;
const ENERGY_BONUS: i32 = 2;
const TAG_BONUS: i32 = 1;
const REPEAT_PENALTY: i32 = 3;

/// Variations within this many points of the best score stay in the
/// candidate pool the final pick is sampled from.
const SCORE_WINDOW: i32 = 2;

const ENERGY_HIGH_WORDS: &[&str] = &["run", "jump", "play", "chase", "excited", "energetic"];
const ENERGY_MEDIUM_WORDS: &[&str] = &["walk", "explore", "discover", "curious", "interested"];
const ENERGY_LOW_WORDS: &[&str] = &["sit", "rest", "sleep", "calm", "quiet", "peaceful"];

fn energy_lexicon(energy: Energy) -> &'static [&'static str] {
    match energy {
        Energy::High => ENERGY_HIGH_WORDS,
        Energy::Medium => ENERGY_MEDIUM_WORDS,
        Energy::Low => ENERGY_LOW_WORDS,
    }
}

/// Narrative context for one character on one page. The previously chosen
/// variation path is threaded in explicitly; the engine keeps no global
/// selection state.
#[derive(Debug, Clone, Default)]
pub struct SceneContext {
    pub time_of_day: Option<TimeOfDay>,
    pub page_number: u32,
    pub total_pages: u32,
    pub companion_present: bool,
    pub previous_variation: Option<String>,
}

impl SceneContext {
    /// The narrative-progress bucket for the current page: the first fifth
    /// of the story introduces, the last fifth resolves, pages from 60%
    /// onward build the climax, and everything between is action.
    pub fn story_beat(&self) -> StoryBeat {
        if self.total_pages == 0 {
            return StoryBeat::Action;
        }
        let progress = self.page_number as f32 / self.total_pages as f32;
        if progress <= 0.2 {
            StoryBeat::Introduction
        } else if progress >= 0.8 {
            StoryBeat::Resolution
        } else if progress >= 0.6 {
            StoryBeat::Climax
        } else {
            StoryBeat::Action
        }
    }
}

/// Score one variation against the description and context. All additive;
/// `description` must already be lower-cased.
pub fn score_variation(variation: &AssetVariation, description: &str, ctx: &SceneContext) -> i32 {
    let mut score = 0;

    if let Some(time) = ctx.time_of_day {
        if variation.context.time_of_day.contains(&time) {
            score += TIME_OF_DAY_BONUS;
        }
    }

    if variation.context.story_beats.contains(&ctx.story_beat()) {
        score += STORY_BEAT_BONUS;
    }

    if let Some(mode) = variation.context.interaction {
        let wanted = if ctx.companion_present {
            InteractionMode::WithCompanion
        } else {
            InteractionMode::Solo
        };
        if mode == wanted {
            score += INTERACTION_BONUS;
        }
    }

    if energy_lexicon(variation.context.energy)
        .iter()
        .any(|word| description.contains(word))
    {
        score += ENERGY_BONUS;
    }

    for tag in &variation.tags {
        if description.contains(tag.as_str()) {
            score += TAG_BONUS;
        }
    }

    if ctx.previous_variation.as_deref() == Some(variation.path.as_str()) {
        score -= REPEAT_PENALTY;
    }

    score
}

/// Pick a variation for the matched pose: score all of them, keep every
/// candidate within [`SCORE_WINDOW`] of the best, and sample uniformly from
/// that pool. The sampling gives equally-good candidates a chance to vary
/// across pages while still respecting the ranking.
pub fn select_variation<'a, R: Rng>(
    pose: &'a CharacterPose,
    description: &str,
    ctx: &SceneContext,
    rng: &mut R,
) -> Result<&'a AssetVariation, CatalogError> {
    if pose.variations.is_empty() {
        return Err(CatalogError::NoVariations(pose.id.clone()));
    }

    let description = description.to_lowercase();
    let mut scored: Vec<(i32, &AssetVariation)> = pose
        .variations
        .iter()
        .map(|variation| (score_variation(variation, &description, ctx), variation))
        .collect();
    // Stable sort: catalog order is kept among equal scores.
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    let best = scored[0].0;
    let pool: Vec<&(i32, &AssetVariation)> = scored
        .iter()
        .take_while(|(score, _)| *score >= best - SCORE_WINDOW)
        .collect();
    let (score, variation) = *pool[rng.gen_range(0..pool.len())];

    debug!(
        pose = %pose.id,
        path = %variation.path,
        score,
        pool = pool.len(),
        "selected variation"
    );

    Ok(variation)
}

//! Layout engine — turns sizes and an interaction descriptor into final
//! placement geometry, respecting canvas bounds and grouping rules.
//!
//! Total: degenerate sizes produce clamped (possibly overlapping)
//! placements rather than errors.

use serde::{Deserialize, Serialize};

use crate::core::interaction::{
    Arrangement, InteractionDescriptor, InteractionKind, Proximity, ScreenSide,
};

/// Bottom padding, percent of canvas height.
const BOTTOM_PAD_PCT: u32 = 5;
/// Side padding, percent of canvas width.
const SIDE_PAD_PCT: u32 = 10;
/// Scale applied to the rear character in a staggered arrangement.
const STAGGER_DEPTH_PCT: u32 = 85;
/// How far into the primary's width a staggered secondary sits.
const STAGGER_OVERLAP_PCT: u32 = 70;
/// Vertical drop of a diagonal secondary, percent of primary height.
const DIAGONAL_DROP_PCT: u32 = 10;

/// A width/height pair in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Final size and position of one character layer on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub width: u32,
    pub height: u32,
    pub left: u32,
    pub top: u32,
}

/// Placements for the whole scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneLayout {
    pub primary: Placement,
    pub secondary: Option<Placement>,
}

pub(crate) fn pct(value: u32, percent: u32) -> u32 {
    (value as u64 * percent as u64 / 100) as u32
}

/// Gap between grouped characters, scaled from the primary's width.
fn spacing(primary_width: u32, proximity: Proximity) -> u32 {
    let percent = match proximity {
        Proximity::Close => 20,
        Proximity::Medium => 40,
        Proximity::Far => 80,
    };
    pct(primary_width, percent)
}

fn clamp_left(left: u32, width: u32, canvas_width: u32) -> u32 {
    left.min(canvas_width.saturating_sub(width))
}

fn bottom_anchored_top(canvas_height: u32, height: u32) -> u32 {
    canvas_height.saturating_sub(height.saturating_add(pct(canvas_height, BOTTOM_PAD_PCT)))
}

/// Grouped characters share one block of the canvas; ungrouped characters
/// take opposite thirds.
fn should_group(interaction: &InteractionDescriptor) -> bool {
    match interaction.kind {
        InteractionKind::Playing | InteractionKind::Talking => true,
        InteractionKind::Exploring => interaction.arrangement == Arrangement::SideBySide,
        InteractionKind::Resting => interaction.proximity == Proximity::Close,
        InteractionKind::None => false,
    }
}

/// Compute placements for one or two characters. Always returns
/// geometrically valid (clamped) placements; callers supply sane sizes.
pub fn layout(
    canvas: Size,
    primary: Size,
    secondary: Option<Size>,
    interaction: &InteractionDescriptor,
) -> SceneLayout {
    match secondary {
        None => SceneLayout {
            primary: place_single(canvas, primary, interaction.position),
            secondary: None,
        },
        Some(secondary) => {
            if should_group(interaction) {
                place_grouped(canvas, primary, secondary, interaction)
            } else {
                place_apart(canvas, primary, secondary, interaction.position)
            }
        }
    }
}

fn place_single(canvas: Size, size: Size, position: ScreenSide) -> Placement {
    let side_pad = pct(canvas.width, SIDE_PAD_PCT);
    let left = match position {
        ScreenSide::Left => side_pad,
        ScreenSide::Right => canvas.width.saturating_sub(size.width.saturating_add(side_pad)),
        ScreenSide::Center => canvas.width.saturating_sub(size.width) / 2,
    };

    // Clamp into the padded range, then into hard canvas bounds.
    let padded_max = canvas.width.saturating_sub(size.width.saturating_add(side_pad));
    let left = left.max(side_pad).min(padded_max.max(side_pad));
    let left = clamp_left(left, size.width, canvas.width);

    Placement {
        width: size.width,
        height: size.height,
        left,
        top: bottom_anchored_top(canvas.height, size.height),
    }
}

fn place_grouped(
    canvas: Size,
    primary: Size,
    secondary: Size,
    interaction: &InteractionDescriptor,
) -> SceneLayout {
    let side_pad = pct(canvas.width, SIDE_PAD_PCT);
    let gap = spacing(primary.width, interaction.proximity);

    // The rear character of a staggered pair reads as further away.
    let secondary = if interaction.arrangement == Arrangement::Staggered {
        Size {
            width: pct(secondary.width, STAGGER_DEPTH_PCT),
            height: pct(secondary.height, STAGGER_DEPTH_PCT),
        }
    } else {
        secondary
    };

    let combined = primary
        .width
        .saturating_add(secondary.width)
        .saturating_add(gap);
    let group_left = match interaction.position {
        ScreenSide::Left => side_pad,
        ScreenSide::Right => canvas.width.saturating_sub(combined.saturating_add(side_pad)),
        ScreenSide::Center => canvas.width.saturating_sub(combined) / 2,
    };

    let primary_left = clamp_left(group_left, primary.width, canvas.width);
    let primary_top = bottom_anchored_top(canvas.height, primary.height);

    let mut secondary_left = group_left.saturating_add(primary.width).saturating_add(gap);
    let mut secondary_top = bottom_anchored_top(canvas.height, secondary.height);

    match interaction.arrangement {
        Arrangement::SideBySide => {}
        Arrangement::Diagonal => {
            secondary_top = secondary_top
                .saturating_add(pct(primary.height, DIAGONAL_DROP_PCT))
                .min(canvas.height.saturating_sub(secondary.height));
        }
        Arrangement::Staggered => {
            secondary_left = group_left.saturating_add(pct(primary.width, STAGGER_OVERLAP_PCT));
        }
    }
    let secondary_left = clamp_left(secondary_left, secondary.width, canvas.width);

    SceneLayout {
        primary: Placement {
            width: primary.width,
            height: primary.height,
            left: primary_left,
            top: primary_top,
        },
        secondary: Some(Placement {
            width: secondary.width,
            height: secondary.height,
            left: secondary_left,
            top: secondary_top,
        }),
    }
}

fn place_apart(canvas: Size, primary: Size, secondary: Size, position: ScreenSide) -> SceneLayout {
    let third = canvas.width / 3;
    let centered_in_third = |index: u32, size: Size| {
        let base = third.saturating_mul(index);
        base.saturating_add(third.saturating_sub(size.width) / 2)
    };

    // A right bias swaps which third each character occupies.
    let (primary_third, secondary_third) = match position {
        ScreenSide::Right => (2, 0),
        _ => (0, 2),
    };

    SceneLayout {
        primary: Placement {
            width: primary.width,
            height: primary.height,
            left: clamp_left(centered_in_third(primary_third, primary), primary.width, canvas.width),
            top: bottom_anchored_top(canvas.height, primary.height),
        },
        secondary: Some(Placement {
            width: secondary.width,
            height: secondary.height,
            left: clamp_left(
                centered_in_third(secondary_third, secondary),
                secondary.width,
                canvas.width,
            ),
            top: bottom_anchored_top(canvas.height, secondary.height),
        }),
    }
}

//! Choosing a side of the anchor for the overlay.
//!
//! [`solve`] is a pure function. Sides are tried in a fixed priority order,
//! Above, Below, Left, Right, and the first side with enough room wins. There
//! is no scoring: above and below keep the overlay in the reading flow, and
//! the horizontal sides only come into play when the vertical ones are
//! exhausted.

use serde::{Deserialize, Serialize};

use crate::{Direction, Expanse, Point, Rect, host::WidthBounds};

/// A side of the anchor.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Overlay sits above the anchor.
    Above,
    /// Overlay sits below the anchor.
    Below,
    /// Overlay sits left of the anchor.
    Left,
    /// Overlay sits right of the anchor.
    Right,
}

impl Side {
    /// All sides, in the order they are tried.
    pub const PRIORITY: [Self; 4] = [Self::Above, Self::Below, Self::Left, Self::Right];

    /// The way the pointer indicator faces when the overlay is on this side.
    /// Both horizontal sides use a right-facing pointer.
    pub fn pointer_direction(&self) -> Direction {
        match self {
            Self::Above => Direction::Down,
            Self::Below => Direction::Up,
            Self::Left | Self::Right => Direction::Right,
        }
    }
}

/// Resolved overlay width.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Width {
    /// The overlay fits at its maximum width.
    Fit(u32),
    /// The overlay fills the whole available span, which is carried here.
    Full(u32),
}

impl Width {
    /// The width in pixels.
    pub fn px(&self) -> u32 {
        match self {
            Self::Fit(w) | Self::Full(w) => *w,
        }
    }
}

/// Everything the solver needs to know.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementInput {
    /// Absolute geometry of the anchor.
    pub anchor: Rect,
    /// Natural size of the overlay.
    pub overlay: Expanse,
    /// Configured width limits of the overlay.
    pub bounds: WidthBounds,
    /// Size of the pointer indicator.
    pub pointer: Expanse,
    /// Viewport size.
    pub viewport: Expanse,
    /// Signed horizontal offset requested by the caller.
    pub offset: i32,
    /// Separation between anchor and overlay.
    pub gap: i32,
    /// Margin kept from the right edge of the viewport.
    pub edge_margin: i32,
}

/// A successful placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Solution {
    /// The chosen side.
    pub side: Side,
    /// Overlay top-left, in page coordinates.
    pub overlay: Point,
    /// Pointer top-left, relative to the overlay.
    pub pointer: Point,
    /// Resolved overlay width.
    pub width: Width,
}

/// Solver output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// A side was found.
    Solved(Solution),
    /// No side has room for the overlay.
    NoFit,
}

impl Placement {
    /// The solution, if there is one.
    pub fn solution(&self) -> Option<Solution> {
        match self {
            Self::Solved(s) => Some(*s),
            Self::NoFit => None,
        }
    }
}

/// Resolve the overlay width against the available span. A maximum width that
/// fits is used as-is; failing that, a minimum width that fits stretches the
/// overlay across the whole span. When neither fits there is no placement.
pub fn resolve_width(natural: u32, bounds: WidthBounds, span: u32) -> Option<Width> {
    let max = bounds.max.unwrap_or(natural);
    let min = bounds.min.unwrap_or(0).min(max);
    if span >= max {
        Some(Width::Fit(max))
    } else if span >= min {
        Some(Width::Full(span))
    } else {
        None
    }
}

/// Solver arithmetic is done in `i64`, which cannot overflow for a handful of
/// `i32`/`u32` terms. Results are narrowed back by `point`.
fn point(x: i64, y: i64) -> Option<Point> {
    Some(Point::new(i32::try_from(x).ok()?, i32::try_from(y).ok()?))
}

/// Horizontal origin for the vertical sides. The overlay is pulled left when it
/// would cross the right edge of the viewport, but never past the page origin.
/// Overflow on the left edge is left alone.
fn clamp_right(x: i64, w: i64, input: &PlacementInput) -> i64 {
    let overflow = (x + w + i64::from(input.edge_margin) - i64::from(input.viewport.w)).max(0);
    x - overflow.min(x.max(0))
}

/// Pointer x for the vertical sides: the anchor's center measured from the
/// overlay's left edge, less the caller's offset.
fn pointer_x(overlay_x: i64, input: &PlacementInput) -> i64 {
    (i64::from(input.anchor.left()) - overlay_x).abs() + i64::from(input.anchor.w) / 2
        - i64::from(input.pointer.w) / 2
        - i64::from(input.offset)
}

/// Where the pointer sits, relative to the overlay, for a given side and
/// overlay origin.
fn pointer_position(
    side: Side,
    overlay_x: i64,
    w: i64,
    h: i64,
    input: &PlacementInput,
) -> (i64, i64) {
    match side {
        Side::Above => (pointer_x(overlay_x, input), h),
        Side::Below => (pointer_x(overlay_x, input), 0),
        Side::Left => (0, (h - i64::from(input.pointer.h)) / 2),
        // Derived from the anchor's right edge rather than the overlay height.
        Side::Right => (
            w,
            i64::from(input.anchor.left()) + i64::from(input.anchor.w) + i64::from(input.gap),
        ),
    }
}

/// The overlay origin for a side, if the side has room.
fn try_side(side: Side, w: i64, h: i64, input: &PlacementInput) -> Option<(i64, i64)> {
    let left = i64::from(input.anchor.left());
    let top = i64::from(input.anchor.top());
    let right = left + i64::from(input.anchor.w);
    let bottom = top + i64::from(input.anchor.h);
    let gap = i64::from(input.gap);
    let offset = i64::from(input.offset);
    match side {
        Side::Above if top > h => Some((clamp_right(left + offset, w, input), top - h - gap)),
        Side::Below if i64::from(input.viewport.h) - bottom > h => {
            Some((clamp_right(left + offset, w, input), bottom + gap))
        }
        Side::Left if left > w => Some((left - w - gap, top)),
        // The horizontal origin repeats the Left formula.
        Side::Right if i64::from(input.viewport.w) - right > w => Some((left - w - gap, top)),
        _ => None,
    }
}

/// Place an overlay next to an anchor. A placement whose coordinates leave the
/// `i32` range is reported as `NoFit`.
pub fn solve(input: &PlacementInput) -> Placement {
    let Some(width) = resolve_width(input.overlay.w, input.bounds, input.viewport.w) else {
        return Placement::NoFit;
    };
    let w = i64::from(width.px());
    let h = i64::from(input.overlay.h);
    let Some((side, (x, y))) = Side::PRIORITY
        .into_iter()
        .find_map(|side| try_side(side, w, h, input).map(|o| (side, o)))
    else {
        return Placement::NoFit;
    };
    let (px, py) = pointer_position(side, x, w, h, input);
    match (point(x, y), point(px, py)) {
        (Some(overlay), Some(pointer)) => Placement::Solved(Solution {
            side,
            overlay,
            pointer,
            width,
        }),
        _ => Placement::NoFit,
    }
}

/// Recompute the pointer for an existing solution after the overlay's size in
/// `input` has changed. The side and overlay origin are kept.
pub fn repoint(input: &PlacementInput, s: &Solution) -> Option<Point> {
    let (x, y) = pointer_position(
        s.side,
        i64::from(s.overlay.x),
        i64::from(s.width.px()),
        i64::from(input.overlay.h),
        input,
    );
    point(x, y)
}

//! Hit-testing the timeline strip.
//!
//! The strip has a ruler band on top and the board track below it. On the
//! track, a pointer within [`HANDLE_RADIUS_PX`] of a board's edge grabs the
//! edge instead of the body. The first board has no left edge: there is no
//! predecessor to trade time with.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::consts::{HANDLE_RADIUS_PX, RULER_HEIGHT_PX};
use crate::layout::BoardLayout;
use crate::viewport::{Point, Viewport};

/// Which board edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Left,
    Right,
}

/// Which part of a board was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    Edge(Edge),
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    /// The ruler band above the track.
    Ruler,
    Board { index: usize, part: HitPart },
    /// Track area with no board under it.
    Empty,
}

/// Find what lies under the screen-space point `pt`.
#[must_use]
pub fn hit_test(pt: Point, layouts: &[BoardLayout], viewport: &Viewport) -> Hit {
    if pt.y < RULER_HEIGHT_PX {
        return Hit::Ruler;
    }
    let x = viewport.screen_to_content(pt.x);

    if let Some(last) = layouts.last() {
        let right = last.right_px();
        if x >= right && x - right <= HANDLE_RADIUS_PX {
            return Hit::Board { index: last.index, part: HitPart::Edge(Edge::Right) };
        }
    }

    let Some(block) = layouts.iter().find(|b| b.left_px <= x && x < b.right_px()) else {
        return Hit::Empty;
    };

    let part = if block.index > 0 && x - block.left_px <= HANDLE_RADIUS_PX {
        HitPart::Edge(Edge::Left)
    } else if block.right_px() - x <= HANDLE_RADIUS_PX {
        HitPart::Edge(Edge::Right)
    } else {
        HitPart::Body
    };
    Hit::Board { index: block.index, part }
}

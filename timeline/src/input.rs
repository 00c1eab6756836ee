//! Input model: pointer buttons, keys, and the gesture state machine.
//!
//! `InputState` is the gesture tracked between pointer-down and pointer-up.
//! Each variant carries what is needed to finish the gesture on release.
//! Resize and reorder arithmetic lives here as pure functions so the engine
//! only decides *when* to apply them.
//!
//! Resizing is always computed from the values captured at pointer-down,
//! never from the previous frame. The drag delta is snapped to hundredths of
//! a second, not the resulting durations, so an edge that has not moved
//! leaves off-grid durations untouched. A board that already sits below the floor when the drag starts
//! uses its starting duration as its floor, so a drag never makes it jump.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::consts::DURATION_PRECISION;
use crate::hit::Edge;
use crate::layout::BoardLayout;
use crate::viewport::Point;

/// A keyboard key, named as the host reports it (e.g. `"ArrowLeft"`, `" "`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self(name.to_owned())
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    Middle,
    Secondary,
}

/// Gesture in progress.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum InputState {
    /// No gesture; waiting for the next pointer-down.
    #[default]
    Idle,
    /// Dragging on the ruler to seek.
    Scrubbing {
        /// Whether playback was running when the scrub began.
        was_playing: bool,
    },
    /// Dragging a board edge.
    Resizing {
        edge: Edge,
        /// Board that owns the grabbed edge.
        index: usize,
        /// Screen x at pointer-down.
        start_x: f64,
        start_duration: f64,
        /// Duration of the board before `index` at pointer-down (left edge only).
        start_prev_duration: Option<f64>,
    },
    /// Pressed on a board body; not yet moved far enough to drag.
    Pressed { index: usize, origin: Point },
    /// Dragging a board to a new position.
    Reordering {
        from: usize,
        /// Insertion point among the current boards, `0..=len`.
        insert_index: Option<usize>,
    },
}

impl InputState {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

// =============================================================
// Resize
// =============================================================

/// Round to the duration grid.
#[must_use]
pub fn snap_duration(duration: f64) -> f64 {
    (duration * DURATION_PRECISION).round() / DURATION_PRECISION
}

/// New duration for a board whose right edge moved by `delta` seconds.
#[must_use]
pub fn resize_right(start_duration: f64, delta: f64, floor: f64) -> f64 {
    (start_duration + snap_duration(delta)).max(floor.min(start_duration))
}

/// New `(previous, this)` durations after this board's left edge moved by
/// `delta` seconds. Positive `delta` moves the edge right, growing the
/// previous board. The pair's total is conserved and `delta` is clamped so
/// neither board crosses its floor.
#[must_use]
pub fn resize_left(start_prev: f64, start_this: f64, delta: f64, floor: f64) -> (f64, f64) {
    let prev_floor = floor.min(start_prev);
    let this_floor = floor.min(start_this);
    let delta = snap_duration(delta).max(prev_floor - start_prev).min(start_this - this_floor);
    (start_prev + delta, start_this - delta)
}

// =============================================================
// Reorder
// =============================================================

/// Insertion point for a pointer at content x: before the hovered board on
/// its left half, after it on its right half.
#[must_use]
pub fn insert_index_at(x: f64, layouts: &[BoardLayout]) -> usize {
    match layouts.iter().find(|b| x < b.right_px()) {
        Some(block) if x < block.center_px() => block.index,
        Some(block) => block.index + 1,
        None => layouts.len(),
    }
}

/// Final index of a board dragged from `from` and dropped at `insert_index`.
///
/// Moving forward shifts the target down by one because the board is
/// removed from in front of it first.
#[must_use]
pub fn drop_target(from: usize, insert_index: usize) -> usize {
    if from < insert_index { insert_index - 1 } else { insert_index }
}

/// Horizontal shift for board `index` while a drag is in flight, opening a
/// gap at the insertion point.
#[must_use]
pub fn reorder_offset(index: usize, from: usize, insert_index: usize, gap: f64) -> f64 {
    if index == from {
        return 0.0;
    }
    let shifted = if from < insert_index {
        index == insert_index
    } else {
        index >= insert_index && index < from
    };
    if shifted { gap } else { 0.0 }
}

/// Whether a drop marker should be drawn before board `index`.
#[must_use]
pub fn shows_space_before(index: usize, from: usize, insert_index: usize) -> bool {
    index == insert_index && index != from && index != from + 1
}

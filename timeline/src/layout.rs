//! Pixel geometry for drawing the strip: board blocks, ruler ticks, and the
//! add button. Everything here is in content space.

#[cfg(test)]
#[path = "layout_test.rs"]
mod layout_test;

use crate::consts::{ADD_BUTTON_GAP_PX, RULER_STEP_SECS};
use crate::doc::BoardId;
use crate::ranges::TimeRange;
use crate::viewport::Viewport;

/// Where one board sits on the strip.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardLayout {
    pub index: usize,
    pub board_id: BoardId,
    pub start: f64,
    pub duration: f64,
    pub left_px: f64,
    pub width_px: f64,
}

impl BoardLayout {
    #[must_use]
    pub fn right_px(&self) -> f64 {
        self.left_px + self.width_px
    }

    #[must_use]
    pub fn center_px(&self) -> f64 {
        self.left_px + self.width_px / 2.0
    }
}

/// A labelled ruler mark.
#[derive(Debug, Clone, PartialEq)]
pub struct RulerTick {
    pub time: f64,
    pub left_px: f64,
    pub label: String,
}

#[must_use]
pub fn board_layouts(ranges: &[TimeRange], pixels_per_second: f64) -> Vec<BoardLayout> {
    ranges
        .iter()
        .enumerate()
        .map(|(index, range)| BoardLayout {
            index,
            board_id: range.board_id.clone(),
            start: range.start,
            duration: range.duration(),
            left_px: range.start * pixels_per_second,
            width_px: range.duration() * pixels_per_second,
        })
        .collect()
}

/// Left edge of the "add board" button, just past the last board.
#[must_use]
pub fn add_button_left_px(layouts: &[BoardLayout]) -> f64 {
    layouts.last().map_or(0.0, BoardLayout::right_px) + ADD_BUTTON_GAP_PX
}

/// Ticks every [`RULER_STEP_SECS`] across the whole scrollable width.
#[must_use]
pub fn ruler_ticks(viewport: &Viewport, total: f64) -> Vec<RulerTick> {
    let step_px = RULER_STEP_SECS * viewport.pixels_per_second;
    if step_px <= 0.0 {
        return Vec::new();
    }
    let width = viewport.content_width(total);
    let mut ticks = Vec::new();
    let mut left_px = 0.0;
    let mut time = 0.0;
    while left_px < width {
        ticks.push(RulerTick { time, left_px, label: format_time(time, false) });
        time += RULER_STEP_SECS;
        left_px = time * viewport.pixels_per_second;
    }
    ticks
}

/// `m:ss`, or `m:ss.hh` with `hundredths`. Negative input reads as zero.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_time(seconds: f64, hundredths: bool) -> String {
    let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
    let minutes = (seconds / 60.0).floor() as u64;
    let secs = (seconds % 60.0).floor() as u64;
    if !hundredths {
        return format!("{minutes}:{secs:02}");
    }
    let cents = ((seconds % 1.0) * 100.0).floor() as u64;
    format!("{minutes}:{secs:02}.{cents:02}")
}

//! Tunables for the timeline core.
//!
//! Every field has a default taken from [`crate::consts`]; hosts override
//! the ones they expose (for example from environment variables).

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::time::Duration;

use crate::consts;

#[derive(Debug, Clone, PartialEq)]
pub struct TimelineConfig {
    /// Horizontal zoom of the strip.
    pub pixels_per_second: f64,
    /// Floor for stored durations.
    pub min_duration_secs: f64,
    /// Floor for durations produced by edge-drag resizing.
    pub resize_min_duration_secs: f64,
    /// Quiet period for coalesced drawing/note saves.
    pub autosave_quiet: Duration,
    /// Fraction of the viewport kept as margin while following the playhead.
    pub follow_margin: f64,
    /// Pointer travel before a press becomes a reorder drag.
    pub drag_threshold_px: f64,
    /// Width of the reorder insertion gap.
    pub reorder_gap_px: f64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            pixels_per_second: consts::PIXELS_PER_SECOND,
            min_duration_secs: consts::MIN_DURATION_SECS,
            resize_min_duration_secs: consts::RESIZE_MIN_DURATION_SECS,
            autosave_quiet: Duration::from_millis(consts::AUTOSAVE_QUIET_MS),
            follow_margin: consts::FOLLOW_MARGIN,
            drag_threshold_px: consts::DRAG_THRESHOLD_PX,
            reorder_gap_px: consts::REORDER_GAP_PX,
        }
    }
}

impl TimelineConfig {
    /// Return a copy with the zoom replaced. Non-finite or non-positive
    /// values keep the current zoom.
    #[must_use]
    pub fn with_pixels_per_second(mut self, pixels_per_second: f64) -> Self {
        if pixels_per_second.is_finite() && pixels_per_second > 0.0 {
            self.pixels_per_second = pixels_per_second;
        }
        self
    }

    /// The resize floor never drops below the stored-duration floor.
    #[must_use]
    pub fn effective_resize_floor(&self) -> f64 {
        self.resize_min_duration_secs.max(self.min_duration_secs)
    }
}

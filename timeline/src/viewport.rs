//! The visible window onto the timeline strip.
//!
//! Two coordinate spaces are in play. *Screen* x is relative to the left
//! edge of the visible strip; *content* x is relative to time zero, so
//! `content = screen + scroll_left`. Time maps to content x linearly via
//! `pixels_per_second`.

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use crate::consts::{CONTENT_TAIL_SECS, MIN_CONTENT_WIDTH_PX};

/// A pointer position in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub pixels_per_second: f64,
    pub scroll_left: f64,
    pub width: f64,
}

impl Viewport {
    #[must_use]
    pub fn new(pixels_per_second: f64, width: f64) -> Self {
        Self { pixels_per_second, scroll_left: 0.0, width }
    }

    /// Content x of a time.
    #[must_use]
    pub fn time_to_x(&self, time: f64) -> f64 {
        time * self.pixels_per_second
    }

    /// Time at a content x.
    #[must_use]
    pub fn x_to_time(&self, x: f64) -> f64 {
        x / self.pixels_per_second
    }

    /// Time under a screen x.
    #[must_use]
    pub fn screen_x_to_time(&self, screen_x: f64) -> f64 {
        self.x_to_time(self.screen_to_content(screen_x))
    }

    #[must_use]
    pub fn screen_to_content(&self, screen_x: f64) -> f64 {
        screen_x + self.scroll_left
    }

    #[must_use]
    pub fn content_to_screen(&self, content_x: f64) -> f64 {
        content_x - self.scroll_left
    }

    /// Scrollable width of the strip for a timeline of `total` seconds.
    #[must_use]
    pub fn content_width(&self, total: f64) -> f64 {
        ((total + CONTENT_TAIL_SECS) * self.pixels_per_second).max(MIN_CONTENT_WIDTH_PX)
    }

    #[must_use]
    pub fn max_scroll(&self, total: f64) -> f64 {
        (self.content_width(total) - self.width).max(0.0)
    }

    /// Scroll to `scroll_left`, clamped to the content. Returns the applied value.
    pub fn scroll_to(&mut self, scroll_left: f64, total: f64) -> f64 {
        self.scroll_left = scroll_left.clamp(0.0, self.max_scroll(total));
        self.scroll_left
    }

    /// Keep the playhead inside the middle band of the viewport.
    ///
    /// `margin` is the fraction of the width left free on each side. When
    /// the playhead leaves the band the view re-centers on it. Returns the
    /// new scroll offset if it changed.
    pub fn follow_playhead(&mut self, time: f64, total: f64, margin: f64) -> Option<f64> {
        if self.width <= 0.0 {
            return None;
        }
        let x = self.time_to_x(time);
        let low = self.scroll_left + margin * self.width;
        let high = self.scroll_left + (1.0 - margin) * self.width;
        if (low..=high).contains(&x) {
            return None;
        }
        let before = self.scroll_left;
        let after = self.scroll_to(x - self.width / 2.0, total);
        if (after - before).abs() < f64::EPSILON {
            return None;
        }
        Some(after)
    }
}

//! Shared numeric constants for the timeline crate.

// ── Boards ──────────────────────────────────────────────────────

/// Duration given to a board when nothing better is known, in seconds.
pub const DEFAULT_DURATION_SECS: f64 = 3.0;

/// Background color for boards created without a predecessor.
pub const DEFAULT_BACKGROUND: &str = "#ffffff";

/// Hard floor for any stored board duration, in seconds.
pub const MIN_DURATION_SECS: f64 = 0.1;

/// Floor applied by edge-drag resizing, in seconds.
pub const RESIZE_MIN_DURATION_SECS: f64 = 0.5;

/// Durations produced by drag gestures are snapped to 1 / this many seconds.
pub const DURATION_PRECISION: f64 = 100.0;

// ── Layout ──────────────────────────────────────────────────────

/// Default horizontal zoom of the timeline strip.
pub const PIXELS_PER_SECOND: f64 = 50.0;

/// Height of the ruler band at the top of the strip, in CSS pixels.
pub const RULER_HEIGHT_PX: f64 = 24.0;

/// Spacing between ruler ticks, in seconds.
pub const RULER_STEP_SECS: f64 = 5.0;

/// Empty tail appended after the last board so there is room to drop.
pub const CONTENT_TAIL_SECS: f64 = 5.0;

/// The strip is never narrower than this, in CSS pixels.
pub const MIN_CONTENT_WIDTH_PX: f64 = 800.0;

/// Gap between the last board and the add button, in CSS pixels.
pub const ADD_BUTTON_GAP_PX: f64 = 8.0;

// ── Interaction ─────────────────────────────────────────────────

/// Screen-space hit slop in pixels for board edges.
pub const HANDLE_RADIUS_PX: f64 = 6.0;

/// Pointer travel before a board press turns into a reorder drag.
pub const DRAG_THRESHOLD_PX: f64 = 4.0;

/// Width of the visual gap opened at the reorder insertion point.
pub const REORDER_GAP_PX: f64 = 20.0;

/// Fraction of the viewport kept as margin on each side while following the playhead.
pub const FOLLOW_MARGIN: f64 = 0.2;

/// Quiet period before a coalesced drawing/note save is written, in milliseconds.
pub const AUTOSAVE_QUIET_MS: u64 = 300;

/// How far into a board `step_back` must be before it rewinds to that board's start.
pub const STEP_BACK_EPSILON_SECS: f64 = 0.05;

#![allow(clippy::float_cmp)]

use super::*;

#[test]
fn default_uses_crate_constants() {
    let config = TimelineConfig::default();
    assert_eq!(config.pixels_per_second, consts::PIXELS_PER_SECOND);
    assert_eq!(config.min_duration_secs, consts::MIN_DURATION_SECS);
    assert_eq!(config.autosave_quiet, Duration::from_millis(300));
}

#[test]
fn with_pixels_per_second_ignores_invalid_values() {
    let config = TimelineConfig::default().with_pixels_per_second(0.0);
    assert_eq!(config.pixels_per_second, consts::PIXELS_PER_SECOND);

    let config = TimelineConfig::default().with_pixels_per_second(f64::NAN);
    assert_eq!(config.pixels_per_second, consts::PIXELS_PER_SECOND);

    let config = TimelineConfig::default().with_pixels_per_second(120.0);
    assert_eq!(config.pixels_per_second, 120.0);
}

#[test]
fn resize_floor_never_below_store_floor() {
    let config = TimelineConfig { resize_min_duration_secs: 0.01, ..TimelineConfig::default() };
    assert_eq!(config.effective_resize_floor(), config.min_duration_secs);
}

#![allow(clippy::float_cmp)]

use super::*;

// =============================================================================
// env_parse
// =============================================================================

#[test]
fn env_parse_missing_returns_default() {
    let val: u64 = env_parse("__QB_TEST_MISSING_KEY__", 42);
    assert_eq!(val, 42);
}

#[test]
fn env_parse_present_valid() {
    unsafe { std::env::set_var("__QB_TEST_VALID__", " 99 ") };
    let val: u64 = env_parse("__QB_TEST_VALID__", 0);
    assert_eq!(val, 99);
    unsafe { std::env::remove_var("__QB_TEST_VALID__") };
}

#[test]
fn env_parse_present_invalid_returns_default() {
    unsafe { std::env::set_var("__QB_TEST_INVALID__", "fast") };
    let val: f64 = env_parse("__QB_TEST_INVALID__", 50.0);
    assert!((val - 50.0).abs() < f64::EPSILON);
    unsafe { std::env::remove_var("__QB_TEST_INVALID__") };
}

// =============================================================================
// HostConfig
// =============================================================================

fn sample() -> HostConfig {
    HostConfig {
        frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,
        pixels_per_second: 80.0,
        settings_path: PathBuf::from("/tmp/qb/settings.json"),
        documents_dir: PathBuf::from("/tmp/qb"),
    }
}

#[test]
fn valid_config_passes() {
    assert_eq!(sample().validate(), Ok(()));
    assert_eq!(sample().frame_interval(), Duration::from_millis(16));
}

#[test]
fn zero_interval_is_rejected() {
    let config = HostConfig { frame_interval_ms: 0, ..sample() };
    assert_eq!(config.validate(), Err(ConfigError::ZeroFrameInterval));
}

#[test]
fn non_positive_zoom_is_rejected() {
    let config = HostConfig { pixels_per_second: -1.0, ..sample() };
    assert_eq!(config.validate(), Err(ConfigError::InvalidPixelsPerSecond(-1.0)));
}

#[test]
fn timeline_config_carries_zoom() {
    let timeline = sample().timeline();
    assert!((timeline.pixels_per_second - 80.0).abs() < f64::EPSILON);
    assert_eq!(timeline.drag_threshold_px, TimelineConfig::default().drag_threshold_px);
}

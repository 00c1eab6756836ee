#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-10;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn view() -> Viewport {
    Viewport::new(50.0, 400.0)
}

// --- Point ---

#[test]
fn point_new() {
    let p = Point::new(3.0, 4.0);
    assert_eq!(p.x, 3.0);
    assert_eq!(p.y, 4.0);
}

// --- Conversions ---

#[test]
fn time_and_x_are_inverse() {
    let v = view();
    assert_eq!(v.time_to_x(2.0), 100.0);
    assert_eq!(v.x_to_time(100.0), 2.0);
    assert!(approx_eq(v.x_to_time(v.time_to_x(3.37)), 3.37));
}

#[test]
fn screen_x_accounts_for_scroll() {
    let mut v = view();
    v.scroll_left = 150.0;
    assert_eq!(v.screen_to_content(50.0), 200.0);
    assert_eq!(v.content_to_screen(200.0), 50.0);
    assert_eq!(v.screen_x_to_time(50.0), 4.0);
}

// --- Content width ---

#[test]
fn content_width_has_floor() {
    let v = view();
    assert_eq!(v.content_width(3.0), 800.0);
}

#[test]
fn content_width_adds_tail() {
    let v = view();
    assert_eq!(v.content_width(20.0), 1250.0);
}

#[test]
fn scroll_is_clamped_to_content() {
    let mut v = view();
    assert_eq!(v.scroll_to(-10.0, 20.0), 0.0);
    assert_eq!(v.scroll_to(5000.0, 20.0), 850.0);
    assert_eq!(v.scroll_to(300.0, 20.0), 300.0);
}

#[test]
fn scroll_is_zero_when_content_fits() {
    let mut v = Viewport::new(50.0, 2000.0);
    assert_eq!(v.max_scroll(3.0), 0.0);
    assert_eq!(v.scroll_to(100.0, 3.0), 0.0);
}

// --- Follow ---

#[test]
fn follow_ignores_playhead_inside_band() {
    let mut v = view();
    // Band is [80, 320] px, i.e. [1.6 s, 6.4 s].
    assert_eq!(v.follow_playhead(1.6, 30.0, 0.2), None);
    assert_eq!(v.follow_playhead(6.4, 30.0, 0.2), None);
    assert_eq!(v.scroll_left, 0.0);
}

#[test]
fn follow_recenters_when_playhead_exits_right() {
    let mut v = view();
    let scroll = v.follow_playhead(7.0, 30.0, 0.2);
    assert_eq!(scroll, Some(150.0));
    assert_eq!(v.scroll_left, 150.0);
}

#[test]
fn follow_recenters_when_playhead_exits_left() {
    let mut v = view();
    v.scroll_left = 600.0;
    let scroll = v.follow_playhead(10.0, 30.0, 0.2);
    assert_eq!(scroll, Some(300.0));
}

#[test]
fn follow_clamps_to_start() {
    let mut v = view();
    v.scroll_left = 600.0;
    assert_eq!(v.follow_playhead(0.5, 30.0, 0.2), Some(0.0));
}

#[test]
fn follow_clamps_to_end() {
    let mut v = view();
    // The width floor makes the content 800 px, so at most 100 px of scroll.
    v.width = 700.0;
    assert_eq!(v.follow_playhead(12.0, 2.0, 0.2), Some(v.max_scroll(2.0)));
    assert_eq!(v.scroll_left, 100.0);
}

#[test]
fn follow_reports_nothing_when_clamp_prevents_movement() {
    let mut v = view();
    // Left of the band at scroll 0; re-centering would clamp back to 0.
    assert_eq!(v.follow_playhead(0.2, 30.0, 0.2), None);
}

#[test]
fn follow_is_noop_with_zero_width() {
    let mut v = Viewport::new(50.0, 0.0);
    assert_eq!(v.follow_playhead(10.0, 30.0, 0.2), None);
}

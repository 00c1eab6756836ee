#![allow(clippy::float_cmp)]

use super::*;
use crate::doc::Board;
use crate::layout::board_layouts;
use crate::ranges::build_ranges;

const FLOOR: f64 = 0.5;

fn strip(durations: &[f64]) -> Vec<BoardLayout> {
    let boards: Vec<Board> = durations.iter().map(|d| Board::with_presentation("#fff", *d)).collect();
    board_layouts(&build_ranges(&boards), 50.0)
}

// --- InputState ---

#[test]
fn default_state_is_idle() {
    assert!(InputState::default().is_idle());
    assert!(!InputState::Scrubbing { was_playing: false }.is_idle());
}

#[test]
fn key_keeps_host_name() {
    assert_eq!(Key::new("ArrowLeft"), Key("ArrowLeft".into()));
}

// --- snap_duration ---

#[test]
fn snap_rounds_to_hundredths() {
    assert_eq!(snap_duration(1.234), 1.23);
    assert_eq!(snap_duration(1.235_000_1), 1.24);
    assert_eq!(snap_duration(0.1 + 0.2), 0.3);
}

// --- resize_right ---

#[test]
fn right_edge_changes_only_by_delta() {
    assert_eq!(resize_right(3.0, 1.2, FLOOR), 4.2);
    assert_eq!(resize_right(3.0, -1.0, FLOOR), 2.0);
}

#[test]
fn right_edge_keeps_off_grid_duration() {
    assert_eq!(resize_right(1.006, 0.0, FLOOR), 1.006);
    assert!((resize_right(1.006, 0.123, FLOOR) - 1.126).abs() < 1e-9);
}

#[test]
fn right_edge_stops_at_floor() {
    assert_eq!(resize_right(3.0, -10.0, FLOOR), FLOOR);
}

#[test]
fn right_edge_below_floor_does_not_jump() {
    assert_eq!(resize_right(0.2, 0.0, FLOOR), 0.2);
    assert_eq!(resize_right(0.2, -1.0, FLOOR), 0.2);
}

// --- resize_left ---

#[test]
fn left_edge_trades_time_with_previous_board() {
    let (prev, this) = resize_left(2.0, 3.0, 0.5, FLOOR);
    assert_eq!(prev, 2.5);
    assert_eq!(this, 2.5);

    let (prev, this) = resize_left(2.0, 3.0, -0.75, FLOOR);
    assert_eq!(prev, 1.25);
    assert_eq!(this, 3.75);
}

#[test]
fn left_edge_conserves_total_for_any_delta() {
    for delta in [-50.0, -3.3, -1.0, -0.01, 0.0, 0.37, 1.9, 2.5, 7.0, 100.0] {
        let (prev, this) = resize_left(2.0, 3.0, delta, FLOOR);
        assert!((prev + this - 5.0).abs() < 1e-9, "delta {delta}");
        assert!(prev >= FLOOR, "delta {delta}");
        assert!(this >= FLOOR, "delta {delta}");
    }
}

#[test]
fn left_edge_clamps_at_previous_floor() {
    let (prev, this) = resize_left(2.0, 3.0, -10.0, FLOOR);
    assert_eq!(prev, FLOOR);
    assert_eq!(this, 4.5);
}

#[test]
fn left_edge_clamps_at_own_floor() {
    let (prev, this) = resize_left(2.0, 3.0, 10.0, FLOOR);
    assert_eq!(prev, 4.5);
    assert_eq!(this, FLOOR);
}

#[test]
fn left_edge_with_both_boards_at_floor_cannot_move() {
    assert_eq!(resize_left(FLOOR, FLOOR, 3.0, FLOOR), (FLOOR, FLOOR));
    assert_eq!(resize_left(FLOOR, FLOOR, -3.0, FLOOR), (FLOOR, FLOOR));
}

#[test]
fn left_edge_snaps_delta() {
    let (prev, this) = resize_left(2.0, 3.0, 0.123_456, FLOOR);
    assert!((prev - 2.12).abs() < 1e-9);
    assert!((this - 2.88).abs() < 1e-9);
}

#[test]
fn left_edge_keeps_off_grid_durations() {
    let (prev, this) = resize_left(1.006, 2.0, 0.37, FLOOR);
    assert!((prev - 1.376).abs() < 1e-9);
    assert!((this - 1.63).abs() < 1e-9);
    assert!((prev + this - 3.006).abs() < 1e-9);

    assert_eq!(resize_left(1.006, 2.0, 0.0, FLOOR), (1.006, 2.0));
}

#[test]
fn left_edge_conserves_off_grid_total_at_floors() {
    for delta in [-9.0, -0.506, -0.004, 0.004, 1.503, 9.0] {
        let (prev, this) = resize_left(1.006, 2.003, delta, FLOOR);
        assert!((prev + this - 3.009).abs() < 1e-9, "delta {delta}");
        assert!(prev >= FLOOR - 1e-9, "delta {delta}");
        assert!(this >= FLOOR - 1e-9, "delta {delta}");
    }
}

// --- Reorder ---

#[test]
fn insert_index_uses_block_midpoints() {
    // Blocks [0,100), [100,250), [250,300).
    let layouts = strip(&[2.0, 3.0, 1.0]);
    assert_eq!(insert_index_at(10.0, &layouts), 0);
    assert_eq!(insert_index_at(60.0, &layouts), 1);
    assert_eq!(insert_index_at(170.0, &layouts), 1);
    assert_eq!(insert_index_at(180.0, &layouts), 2);
    assert_eq!(insert_index_at(290.0, &layouts), 3);
    assert_eq!(insert_index_at(900.0, &layouts), 3);
    assert_eq!(insert_index_at(-20.0, &layouts), 0);
}

#[test]
fn drop_target_adjusts_forward_moves() {
    assert_eq!(drop_target(0, 3), 2);
    assert_eq!(drop_target(0, 1), 0);
    assert_eq!(drop_target(2, 0), 0);
    assert_eq!(drop_target(2, 2), 2);
}

#[test]
fn offset_when_dragging_right() {
    // Board 0 dragged toward insertion point 2.
    let offsets: Vec<f64> = (0..4).map(|i| reorder_offset(i, 0, 2, 20.0)).collect();
    assert_eq!(offsets, vec![0.0, 0.0, 20.0, 0.0]);
}

#[test]
fn offset_when_dragging_left() {
    // Board 3 dragged toward insertion point 1.
    let offsets: Vec<f64> = (0..4).map(|i| reorder_offset(i, 3, 1, 20.0)).collect();
    assert_eq!(offsets, vec![0.0, 20.0, 20.0, 0.0]);
}

#[test]
fn space_before_skips_no_op_positions() {
    assert!(!shows_space_before(1, 1, 1));
    assert!(!shows_space_before(2, 1, 2));
    assert!(shows_space_before(3, 1, 3));
    assert!(shows_space_before(0, 2, 0));
}

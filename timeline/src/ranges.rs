//! Time-range index: which board owns a given transport time.
//!
//! DESIGN
//! ======
//! Ranges are a pure projection of the board list: board `i` owns
//! `[start_i, start_i + duration_i)`, with `start_0 = 0`. The last range is
//! also closed at its upper end so `time == total` maps to the last board.
//!
//! `locate` keeps the last resolved index and tries, in order: the cached
//! range (scrubbing within a board), the next range (forward playback),
//! then a binary search (arbitrary seeks). Out-of-range times clamp to the
//! first or last board; scrubbing and float drift produce them routinely.

#[cfg(test)]
#[path = "ranges_test.rs"]
mod ranges_test;

use crate::doc::{Board, BoardId};
use crate::store::BoardStore;

/// One board's slot on the timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeRange {
    pub board_id: BoardId,
    pub start: f64,
    pub end: f64,
}

impl TimeRange {
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Partition the timeline into contiguous per-board ranges.
#[must_use]
pub fn build_ranges(boards: &[Board]) -> Vec<TimeRange> {
    let mut start = 0.0;
    boards
        .iter()
        .map(|board| {
            let end = start + board.duration;
            let range = TimeRange { board_id: board.id.clone(), start, end };
            start = end;
            range
        })
        .collect()
}

/// Cached ranges plus the last resolved index.
#[derive(Debug, Default)]
pub struct RangeIndex {
    ranges: Vec<TimeRange>,
    revision: Option<u64>,
    cursor: usize,
}

impl RangeIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index directly from a board list.
    #[must_use]
    pub fn from_boards(boards: &[Board]) -> Self {
        Self { ranges: build_ranges(boards), revision: None, cursor: 0 }
    }

    /// Rebuild from the store if its revision moved since the last sync.
    pub fn sync(&mut self, store: &BoardStore) {
        if self.revision == Some(store.revision()) {
            return;
        }
        self.ranges = build_ranges(store.boards());
        self.revision = Some(store.revision());
        self.cursor = self.cursor.min(self.ranges.len().saturating_sub(1));
    }

    #[must_use]
    pub fn ranges(&self) -> &[TimeRange] {
        &self.ranges
    }

    #[must_use]
    pub fn range(&self, index: usize) -> Option<&TimeRange> {
        self.ranges.get(index)
    }

    /// Start time of board `index`, if it exists.
    #[must_use]
    pub fn start_of(&self, index: usize) -> Option<f64> {
        self.ranges.get(index).map(|r| r.start)
    }

    #[must_use]
    pub fn total(&self) -> f64 {
        self.ranges.last().map_or(0.0, |r| r.end)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Index of the board that owns `time`, or `None` when there are no boards.
    pub fn locate(&mut self, time: f64) -> Option<usize> {
        let last = self.ranges.len().checked_sub(1)?;
        let time = if time.is_nan() { 0.0 } else { time };

        if time < 0.0 {
            self.cursor = 0;
            return Some(0);
        }
        if time >= self.ranges[last].end {
            self.cursor = last;
            return Some(last);
        }

        if self.contains(self.cursor, time) {
            return Some(self.cursor);
        }
        if self.contains(self.cursor + 1, time) {
            self.cursor += 1;
            return Some(self.cursor);
        }

        let found = self.ranges.partition_point(|r| r.end <= time).min(last);
        self.cursor = found;
        Some(found)
    }

    fn contains(&self, index: usize, time: f64) -> bool {
        self.ranges.get(index).is_some_and(|r| r.start <= time && time < r.end)
    }
}

//! Board store: the single source of truth for boards and transport fields.
//!
//! DESIGN
//! ======
//! The store owns the ordered board list, the current selection, and the
//! playback fields (`is_playing`, `current_time`, `loop`). All writes go
//! through the command methods below, which keep the invariants:
//!
//! - the board list is never empty,
//! - `current_board_id` always names a board in the list,
//! - `current_time` stays within `[0, total_duration]`,
//! - no duration drops below the configured floor.
//!
//! Components that need to react to changes call [`BoardStore::subscribe`]
//! and drain the returned channel; nothing observes the store implicitly.
//!
//! ERROR HANDLING
//! ==============
//! Commands that would break an invariant (deleting the last board, an
//! unknown id, a non-positive duration) are refused and return `false`.
//! Only document loading can fail with an error, and a failed load leaves
//! the store untouched.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use tokio::sync::mpsc;
use tracing::debug;

use crate::consts::MIN_DURATION_SECS;
use crate::doc::{Board, BoardId, Document, DocumentError};

/// Change notification broadcast to subscribers.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    /// Boards were added, removed, or reordered.
    BoardsChanged,
    /// A board's duration changed; time ranges must be recomputed.
    DurationChanged(BoardId),
    /// A board's drawing, notes, preview, or background changed.
    BoardUpdated(BoardId),
    /// The selected board changed.
    CurrentBoardChanged { from: BoardId, to: BoardId },
    /// The play/pause intent flipped.
    PlayingChanged(bool),
    /// Loop mode flipped.
    LoopChanged(bool),
    /// A whole document replaced the previous contents.
    DocumentLoaded,
}

/// Ordered boards plus selection and playback fields.
#[derive(Debug)]
pub struct BoardStore {
    boards: Vec<Board>,
    current_board_id: BoardId,
    is_playing: bool,
    current_time: f64,
    loop_enabled: bool,
    min_duration: f64,
    revision: u64,
    subscribers: Vec<mpsc::UnboundedSender<StoreEvent>>,
}

impl BoardStore {
    /// Create a store holding one default board.
    #[must_use]
    pub fn new() -> Self {
        Self::with_min_duration(MIN_DURATION_SECS)
    }

    /// Create a store holding one default board, with a custom duration floor.
    #[must_use]
    pub fn with_min_duration(min_duration: f64) -> Self {
        let board = Board::new();
        Self {
            current_board_id: board.id.clone(),
            boards: vec![board],
            is_playing: false,
            current_time: 0.0,
            loop_enabled: false,
            min_duration,
            revision: 0,
            subscribers: Vec::new(),
        }
    }

    // --- Subscriptions ---

    /// Register a new subscriber. Dropping the receiver unsubscribes it.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<StoreEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    fn emit(&mut self, event: StoreEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    // --- Queries ---

    #[must_use]
    pub fn boards(&self) -> &[Board] {
        &self.boards
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.boards.len()
    }

    /// Always `false` once constructed; present for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.boards.is_empty()
    }

    #[must_use]
    pub fn board(&self, id: &BoardId) -> Option<&Board> {
        self.boards.iter().find(|b| &b.id == id)
    }

    #[must_use]
    pub fn index_of(&self, id: &BoardId) -> Option<usize> {
        self.boards.iter().position(|b| &b.id == id)
    }

    #[must_use]
    pub fn current_board_id(&self) -> &BoardId {
        &self.current_board_id
    }

    /// The selected board.
    #[must_use]
    pub fn current_board(&self) -> Option<&Board> {
        self.board(&self.current_board_id)
    }

    /// Position of the selected board. Falls back to 0.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.index_of(&self.current_board_id).unwrap_or(0)
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    #[must_use]
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    #[must_use]
    pub fn loop_enabled(&self) -> bool {
        self.loop_enabled
    }

    #[must_use]
    pub fn min_duration(&self) -> f64 {
        self.min_duration
    }

    /// Sum of all board durations.
    #[must_use]
    pub fn total_duration(&self) -> f64 {
        self.boards.iter().map(|b| b.duration).sum()
    }

    /// Bumped by every change that can move time ranges.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    // --- Selection and transport fields ---

    /// Select a board. Unknown ids are refused.
    pub fn set_current_board(&mut self, id: &BoardId) -> bool {
        if self.index_of(id).is_none() {
            debug!(board_id = %id, "select refused: unknown board");
            return false;
        }
        if &self.current_board_id != id {
            let from = std::mem::replace(&mut self.current_board_id, id.clone());
            self.emit(StoreEvent::CurrentBoardChanged { from, to: id.clone() });
        }
        true
    }

    /// Set the playhead, clamped to `[0, total_duration]`.
    pub fn set_current_time(&mut self, time: f64) {
        let time = if time.is_finite() { time } else { 0.0 };
        self.current_time = time.clamp(0.0, self.total_duration());
    }

    pub fn set_is_playing(&mut self, playing: bool) {
        if self.is_playing != playing {
            self.is_playing = playing;
            self.emit(StoreEvent::PlayingChanged(playing));
        }
    }

    pub fn set_loop(&mut self, enabled: bool) {
        if self.loop_enabled != enabled {
            self.loop_enabled = enabled;
            self.emit(StoreEvent::LoopChanged(enabled));
        }
    }

    // --- Board commands ---

    /// Append a board that inherits background and duration from the
    /// selected board, then select it.
    pub fn add_board(&mut self) -> BoardId {
        let board = match self.current_board() {
            Some(current) => Board::with_presentation(&current.background_color, current.duration),
            None => Board::new(),
        };
        let id = board.id.clone();
        self.boards.push(board);
        self.revision += 1;
        self.emit(StoreEvent::BoardsChanged);
        self.set_current_board(&id);
        debug!(board_id = %id, count = self.boards.len(), "board added");
        id
    }

    /// Remove a board. Refused for unknown ids and for the last board.
    ///
    /// If the removed board was selected, the board now at
    /// `max(deleted_index - 1, 0)` becomes selected.
    pub fn delete_board(&mut self, id: &BoardId) -> bool {
        if self.boards.len() <= 1 {
            debug!(board_id = %id, "delete refused: last board");
            return false;
        }
        let Some(index) = self.index_of(id) else {
            debug!(board_id = %id, "delete refused: unknown board");
            return false;
        };

        let was_current = &self.current_board_id == id;
        self.boards.remove(index);
        self.revision += 1;
        self.set_current_time(self.current_time);
        self.emit(StoreEvent::BoardsChanged);

        if was_current {
            let next = index.saturating_sub(1).min(self.boards.len() - 1);
            let next_id = self.boards[next].id.clone();
            self.set_current_board(&next_id);
        }
        debug!(board_id = %id, count = self.boards.len(), "board deleted");
        true
    }

    /// Move the board at `from` so it ends up at index `to`.
    ///
    /// Board count, durations, and content are unchanged. Out-of-range
    /// indices are refused; `from == to` is a successful no-op.
    pub fn reorder_boards(&mut self, from: usize, to: usize) -> bool {
        let len = self.boards.len();
        if from >= len || to >= len {
            debug!(from, to, len, "reorder refused: index out of range");
            return false;
        }
        if from == to {
            return true;
        }
        let board = self.boards.remove(from);
        self.boards.insert(to, board);
        self.revision += 1;
        self.emit(StoreEvent::BoardsChanged);
        true
    }

    /// Set a board's duration, floored at the store minimum.
    ///
    /// Non-finite and non-positive values are refused.
    pub fn update_duration(&mut self, id: &BoardId, duration: f64) -> bool {
        if !duration.is_finite() || duration <= 0.0 {
            debug!(board_id = %id, duration, "duration refused: not a positive number");
            return false;
        }
        let floor = self.min_duration;
        let Some(board) = self.boards.iter_mut().find(|b| &b.id == id) else {
            return false;
        };
        let duration = duration.max(floor);
        if (board.duration - duration).abs() > f64::EPSILON {
            board.duration = duration;
            self.revision += 1;
            self.set_current_time(self.current_time);
            self.emit(StoreEvent::DurationChanged(id.clone()));
        }
        true
    }

    pub fn update_background_color(&mut self, id: &BoardId, color: &str) -> bool {
        self.update_board(id, |board| board.background_color = color.to_owned())
    }

    /// Replace a board's drawing snapshot.
    pub fn update_canvas_data(&mut self, id: &BoardId, data: serde_json::Value) -> bool {
        self.update_board(id, |board| board.canvas_data = data)
    }

    /// Replace a board's note data.
    pub fn update_script_data(&mut self, id: &BoardId, data: serde_json::Value) -> bool {
        self.update_board(id, |board| board.script_data = data)
    }

    pub fn update_preview(&mut self, id: &BoardId, preview_url: Option<String>) -> bool {
        self.update_board(id, |board| board.preview_url = preview_url)
    }

    fn update_board<F>(&mut self, id: &BoardId, apply: F) -> bool
    where
        F: FnOnce(&mut Board),
    {
        let Some(board) = self.boards.iter_mut().find(|b| &b.id == id) else {
            debug!(board_id = %id, "update refused: unknown board");
            return false;
        };
        apply(board);
        self.emit(StoreEvent::BoardUpdated(id.clone()));
        true
    }

    // --- Persistence ---

    /// Snapshot the boards and selection as a persisted document.
    #[must_use]
    pub fn to_document(&self) -> Document {
        Document { boards: self.boards.clone(), current_board_id: Some(self.current_board_id.clone()) }
    }

    /// Serialize the store to the persisted JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Serialize`] if opaque board data cannot be encoded.
    pub fn export_as_json(&self) -> Result<String, DocumentError> {
        self.to_document().to_json()
    }

    /// Replace the store contents from persisted JSON.
    ///
    /// All-or-nothing: on error the store is unchanged. On success the
    /// playhead rewinds to 0 and the play intent is cleared; loop mode is kept.
    ///
    /// # Errors
    ///
    /// Returns the [`DocumentError`] produced by [`Document::parse`].
    pub fn load_from_json(&mut self, raw: &str) -> Result<(), DocumentError> {
        let document = Document::parse(raw, self.min_duration)?;
        self.load_document(document);
        Ok(())
    }

    /// Replace the store contents with an already-parsed document.
    ///
    /// Durations are normalized, an empty board list is seeded with one
    /// default board, and a dangling selection falls back to the first board.
    pub fn load_document(&mut self, document: Document) {
        let Document { mut boards, current_board_id } = document;
        if boards.is_empty() {
            boards.push(Board::new());
        }
        for board in &mut boards {
            board.normalize(self.min_duration);
        }
        let current = current_board_id
            .filter(|id| boards.iter().any(|b| &b.id == id))
            .unwrap_or_else(|| boards[0].id.clone());

        self.boards = boards;
        self.current_board_id = current;
        self.current_time = 0.0;
        self.revision += 1;
        self.set_is_playing(false);
        self.emit(StoreEvent::DocumentLoaded);
        debug!(count = self.boards.len(), current = %self.current_board_id, "document loaded");
    }
}

impl Default for BoardStore {
    fn default() -> Self {
        Self::new()
    }
}

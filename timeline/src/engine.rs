//! Timeline engine: one object the host drives with pointer events, keys,
//! transport commands, and fired frames.
//!
//! DESIGN
//! ======
//! `EngineCore` owns the board store, the playback engine, the viewport, and
//! the gesture state. Handlers return `Vec<Action>` describing what the host
//! should do next (redraw, change the cursor, scroll). They never perform
//! I/O.
//!
//! Play/pause intent lives in the store's `is_playing` flag. Anything may
//! flip it (a key, a menu, the end of a scrub); [`EngineCore::converge`] is
//! the single place that turns intent into a running or paused transport.
//! Board edits made through the engine re-sync the clock and selection
//! immediately; edits made directly on `store` are picked up by `converge`.
//!
//! ERROR HANDLING
//! ==============
//! Only two things fail: starting the clock ([`TransportError`], intent is
//! rolled back) and loading a malformed document ([`DocumentError`], state is
//! untouched). Pointer and board commands clamp or refuse instead.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::config::TimelineConfig;
use crate::doc::{BoardId, Document, DocumentError};
use crate::hit::{Edge, Hit, HitPart, hit_test};
use crate::input::{self, Button, InputState, Key};
use crate::layout::{self, BoardLayout, RulerTick};
use crate::playback::{PlaybackEngine, TickOutcome, TransportState};
use crate::store::{BoardStore, StoreEvent};
use crate::transport::{FrameScheduler, TickToken, TransportClock, TransportError};
use crate::viewport::{Point, Viewport};

const CURSOR_DEFAULT: &str = "default";
const CURSOR_RESIZE: &str = "col-resize";
const CURSOR_GRABBING: &str = "grabbing";
const CURSOR_SCRUB: &str = "ew-resize";

/// Actions returned from handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    RenderNeeded,
    SetCursor(String),
    /// Scroll the strip so its left edge sits at this content x.
    ScrollTo(f64),
    BoardSelected(BoardId),
    DurationChanged { id: BoardId, duration: f64 },
    BoardsReordered { from: usize, to: usize },
}

pub struct EngineCore<C, S> {
    pub store: BoardStore,
    pub playback: PlaybackEngine<C, S>,
    pub viewport: Viewport,
    pub config: TimelineConfig,
    pub input: InputState,
    events: mpsc::UnboundedReceiver<StoreEvent>,
    cursor: &'static str,
}

impl<C: TransportClock, S: FrameScheduler> EngineCore<C, S> {
    #[must_use]
    pub fn new(clock: C, scheduler: S, config: TimelineConfig, viewport_width: f64) -> Self {
        let mut store = BoardStore::with_min_duration(config.min_duration_secs);
        let events = store.subscribe();
        Self {
            store,
            playback: PlaybackEngine::new(clock, scheduler),
            viewport: Viewport::new(config.pixels_per_second, viewport_width),
            config,
            input: InputState::Idle,
            events,
            cursor: CURSOR_DEFAULT,
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn transport_state(&self) -> TransportState {
        self.playback.state()
    }

    #[must_use]
    pub fn total_duration(&self) -> f64 {
        self.store.total_duration()
    }

    /// Screen x of the playhead.
    #[must_use]
    pub fn playhead_x(&self) -> f64 {
        self.viewport.content_to_screen(self.viewport.time_to_x(self.store.current_time()))
    }

    pub fn layouts(&mut self) -> Vec<BoardLayout> {
        let ranges = self.playback.ranges(&self.store);
        layout::board_layouts(ranges.ranges(), self.viewport.pixels_per_second)
    }

    #[must_use]
    pub fn ruler_ticks(&self) -> Vec<RulerTick> {
        layout::ruler_ticks(&self.viewport, self.store.total_duration())
    }

    pub fn add_button_left_px(&mut self) -> f64 {
        layout::add_button_left_px(&self.layouts())
    }

    #[must_use]
    pub fn content_width(&self) -> f64 {
        self.viewport.content_width(self.store.total_duration())
    }

    /// Gap offset for board `index` while a reorder drag is in flight.
    #[must_use]
    pub fn reorder_offset(&self, index: usize) -> f64 {
        match self.input {
            InputState::Reordering { from, insert_index: Some(insert) } => {
                input::reorder_offset(index, from, insert, self.config.reorder_gap_px)
            }
            _ => 0.0,
        }
    }

    /// Whether the drop marker goes before board `index`.
    #[must_use]
    pub fn shows_space_before(&self, index: usize) -> bool {
        match self.input {
            InputState::Reordering { from, insert_index: Some(insert) } => {
                input::shows_space_before(index, from, insert)
            }
            _ => false,
        }
    }

    // --- Viewport ---

    pub fn set_viewport_width(&mut self, width: f64) {
        self.viewport.width = width.max(0.0);
        self.viewport.scroll_to(self.viewport.scroll_left, self.store.total_duration());
    }

    /// Change the zoom. Non-finite or non-positive values are ignored.
    pub fn set_pixels_per_second(&mut self, pixels_per_second: f64) -> Vec<Action> {
        self.config = self.config.clone().with_pixels_per_second(pixels_per_second);
        self.viewport.pixels_per_second = self.config.pixels_per_second;
        self.viewport.scroll_to(self.viewport.scroll_left, self.store.total_duration());
        vec![Action::RenderNeeded]
    }

    // --- Transport ---

    /// Set the play intent and converge on it.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if the clock refuses to start.
    pub async fn play(&mut self) -> Result<Vec<Action>, TransportError> {
        self.store.set_is_playing(true);
        self.converge().await
    }

    pub fn pause(&mut self) -> Vec<Action> {
        let before = self.store.current_board_id().clone();
        self.playback.pause(&mut self.store);
        self.selection_actions(&before)
    }

    pub fn stop(&mut self) -> Vec<Action> {
        let before = self.store.current_board_id().clone();
        self.playback.stop(&mut self.store);
        let mut actions = self.selection_actions(&before);
        self.follow_playhead(&mut actions);
        actions
    }

    /// Flip the play intent. The transport follows on the next `converge`.
    pub fn toggle_playback(&mut self) {
        let playing = self.store.is_playing();
        self.store.set_is_playing(!playing);
    }

    pub fn seek(&mut self, time: f64) -> Vec<Action> {
        self.transport_command(|playback, store| playback.seek(store, time))
    }

    pub fn set_loop(&mut self, enabled: bool) {
        self.playback.set_loop(&mut self.store, enabled);
    }

    pub fn step_forward(&mut self) -> Vec<Action> {
        self.transport_command(PlaybackEngine::step_forward)
    }

    pub fn step_back(&mut self) -> Vec<Action> {
        self.transport_command(PlaybackEngine::step_back)
    }

    pub fn go_to_start(&mut self) -> Vec<Action> {
        self.transport_command(PlaybackEngine::go_to_start)
    }

    pub fn go_to_end(&mut self) -> Vec<Action> {
        self.transport_command(PlaybackEngine::go_to_end)
    }

    /// Drain store notifications and bring the transport in line with the
    /// play intent.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if the intent is "playing" and the clock
    /// refuses to start. The intent is reset to "not playing" first.
    pub async fn converge(&mut self) -> Result<Vec<Action>, TransportError> {
        let before = self.store.current_board_id().clone();

        let mut boards_moved = false;
        while let Ok(event) = self.events.try_recv() {
            boards_moved |= matches!(
                event,
                StoreEvent::BoardsChanged | StoreEvent::DurationChanged(_) | StoreEvent::DocumentLoaded
            );
        }
        if boards_moved {
            self.playback.resync(&mut self.store);
        }

        let intent = self.store.is_playing();
        if intent && !self.playback.is_playing() {
            self.playback.play(&mut self.store).await?;
        } else if !intent && self.playback.is_playing() {
            self.playback.pause(&mut self.store);
        }
        Ok(self.selection_actions(&before))
    }

    /// Deliver a fired frame from the host's scheduler.
    pub fn tick(&mut self, token: TickToken) -> Vec<Action> {
        let before = self.store.current_board_id().clone();
        let outcome = self.playback.tick(&mut self.store, token);
        if outcome == TickOutcome::Stale {
            return Vec::new();
        }
        if outcome == TickOutcome::Finished {
            info!(total = self.store.total_duration(), "playback finished");
        }
        let mut actions = self.selection_actions(&before);
        if !matches!(self.input, InputState::Scrubbing { .. }) {
            self.follow_playhead(&mut actions);
        }
        actions
    }

    // --- Board commands ---

    /// Append a board after the others and select it.
    pub fn add_board(&mut self) -> BoardId {
        let id = self.store.add_board();
        self.playback.resync(&mut self.store);
        id
    }

    pub fn select_board(&mut self, id: &BoardId) -> bool {
        self.store.set_current_board(id)
    }

    pub fn delete_board(&mut self, id: &BoardId) -> bool {
        if !self.store.delete_board(id) {
            return false;
        }
        self.playback.resync(&mut self.store);
        true
    }

    pub fn reorder_board(&mut self, from: usize, to: usize) -> bool {
        if !self.store.reorder_boards(from, to) {
            return false;
        }
        self.playback.resync(&mut self.store);
        true
    }

    /// Set a board's duration from the numeric field; floored at the minimum.
    pub fn set_duration(&mut self, id: &BoardId, duration: f64) -> bool {
        if !self.store.update_duration(id, duration) {
            return false;
        }
        self.playback.resync(&mut self.store);
        true
    }

    pub fn set_background_color(&mut self, id: &BoardId, color: &str) -> bool {
        self.store.update_background_color(id, color)
    }

    // --- Documents ---

    /// Stop playback and replace the boards from persisted JSON.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError`] for malformed input; nothing changes then.
    pub fn load_document(&mut self, raw: &str) -> Result<(), DocumentError> {
        let document = Document::parse(raw, self.store.min_duration())?;
        self.cancel_gesture();
        self.playback.stop(&mut self.store);
        self.store.load_document(document);
        self.playback.resync(&mut self.store);
        self.viewport.scroll_to(0.0, self.store.total_duration());
        info!(boards = self.store.len(), total = self.store.total_duration(), "document loaded");
        Ok(())
    }

    /// Serialize the boards and selection.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Serialize`] if opaque board data cannot be encoded.
    pub fn export_document(&self) -> Result<String, DocumentError> {
        self.store.export_as_json()
    }

    /// Stop everything outstanding before the host drops the engine.
    pub fn shutdown(&mut self) {
        self.cancel_gesture();
        self.playback.shutdown(&mut self.store);
    }

    // --- Pointer input ---

    pub fn on_pointer_down(&mut self, pt: Point, button: Button) -> Vec<Action> {
        let mut actions = Vec::new();
        if button != Button::Primary || !self.input.is_idle() {
            return actions;
        }
        let layouts = self.layouts();

        match hit_test(pt, &layouts, &self.viewport) {
            Hit::Ruler => {
                let was_playing = self.playback.is_playing();
                self.playback.pause(&mut self.store);
                self.playback.begin_scrub();
                self.input = InputState::Scrubbing { was_playing };
                debug!(was_playing, "scrub started");
                self.set_cursor(CURSOR_SCRUB, &mut actions);
                actions.extend(self.seek(self.viewport.screen_x_to_time(pt.x)));
            }
            Hit::Board { index, part: HitPart::Edge(edge) } => {
                let Some(block) = layouts.get(index) else {
                    return actions;
                };
                let start_prev_duration = index.checked_sub(1).and_then(|i| layouts.get(i)).map(|b| b.duration);
                if edge == Edge::Left && start_prev_duration.is_none() {
                    return actions;
                }
                self.input = InputState::Resizing {
                    edge,
                    index,
                    start_x: pt.x,
                    start_duration: block.duration,
                    start_prev_duration,
                };
                self.set_cursor(CURSOR_RESIZE, &mut actions);
            }
            Hit::Board { index, part: HitPart::Body } => {
                self.input = InputState::Pressed { index, origin: pt };
            }
            Hit::Empty => {}
        }
        actions
    }

    pub fn on_pointer_move(&mut self, pt: Point) -> Vec<Action> {
        let mut actions = Vec::new();
        match self.input.clone() {
            InputState::Idle => {
                let layouts = self.layouts();
                let cursor = match hit_test(pt, &layouts, &self.viewport) {
                    Hit::Board { part: HitPart::Edge(_), .. } => CURSOR_RESIZE,
                    _ => CURSOR_DEFAULT,
                };
                self.set_cursor(cursor, &mut actions);
            }
            InputState::Scrubbing { .. } => {
                actions.extend(self.seek(self.viewport.screen_x_to_time(pt.x)));
            }
            InputState::Resizing { edge, index, start_x, start_duration, start_prev_duration } => {
                let delta = (pt.x - start_x) / self.viewport.pixels_per_second;
                actions.extend(self.apply_resize(edge, index, delta, start_duration, start_prev_duration));
            }
            InputState::Pressed { index, origin } => {
                if (pt.x - origin.x).hypot(pt.y - origin.y) > self.config.drag_threshold_px {
                    self.input = InputState::Reordering { from: index, insert_index: None };
                    self.set_cursor(CURSOR_GRABBING, &mut actions);
                    actions.extend(self.track_reorder(pt));
                }
            }
            InputState::Reordering { .. } => {
                actions.extend(self.track_reorder(pt));
            }
        }
        actions
    }

    /// Finish the gesture at `pt`; the release position counts as a final move.
    pub fn on_pointer_up(&mut self, pt: Point, button: Button) -> Vec<Action> {
        if button != Button::Primary || self.input.is_idle() {
            return Vec::new();
        }
        let mut actions = self.on_pointer_move(pt);

        match std::mem::take(&mut self.input) {
            InputState::Idle => {}
            InputState::Scrubbing { was_playing } => {
                self.playback.end_scrub();
                if was_playing {
                    self.store.set_is_playing(true);
                }
                debug!(resume = was_playing, "scrub ended");
            }
            InputState::Resizing { .. } => {}
            InputState::Pressed { index, .. } => {
                let id = self.store.boards().get(index).map(|b| b.id.clone());
                if let Some(id) = id {
                    if self.select_board(&id) {
                        actions.push(Action::BoardSelected(id));
                    }
                }
            }
            InputState::Reordering { from, insert_index } => {
                if let Some(insert) = insert_index {
                    let to = input::drop_target(from, insert);
                    if to != from && self.reorder_board(from, to) {
                        actions.push(Action::BoardsReordered { from, to });
                    }
                }
            }
        }
        self.set_cursor(CURSOR_DEFAULT, &mut actions);
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Abandon the gesture in progress without applying it.
    ///
    /// A scrub keeps the position it reached; its resume intent is honored.
    pub fn cancel_gesture(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        match std::mem::take(&mut self.input) {
            InputState::Idle => return actions,
            InputState::Scrubbing { was_playing } => {
                self.playback.end_scrub();
                if was_playing {
                    self.store.set_is_playing(true);
                }
            }
            InputState::Resizing { .. } | InputState::Pressed { .. } | InputState::Reordering { .. } => {}
        }
        self.set_cursor(CURSOR_DEFAULT, &mut actions);
        actions.push(Action::RenderNeeded);
        actions
    }

    // --- Keyboard input ---

    /// Transport shortcuts. Play/pause only flips the intent; call
    /// `converge` afterwards.
    pub fn on_key_down(&mut self, key: &Key) -> Vec<Action> {
        match key.0.as_str() {
            " " => {
                self.toggle_playback();
                Vec::new()
            }
            "ArrowRight" => self.step_forward(),
            "ArrowLeft" => self.step_back(),
            "Home" => self.go_to_start(),
            "End" => self.go_to_end(),
            "Escape" => self.cancel_gesture(),
            _ => Vec::new(),
        }
    }

    // --- Internals ---

    fn transport_command<F>(&mut self, command: F) -> Vec<Action>
    where
        F: FnOnce(&mut PlaybackEngine<C, S>, &mut BoardStore),
    {
        let before = self.store.current_board_id().clone();
        command(&mut self.playback, &mut self.store);
        let mut actions = self.selection_actions(&before);
        if !matches!(self.input, InputState::Scrubbing { .. }) {
            self.follow_playhead(&mut actions);
        }
        actions
    }

    fn apply_resize(
        &mut self,
        edge: Edge,
        index: usize,
        delta: f64,
        start_duration: f64,
        start_prev_duration: Option<f64>,
    ) -> Vec<Action> {
        let before = self.store.current_board_id().clone();
        let floor = self.config.effective_resize_floor();
        let mut changes = Vec::new();

        match (edge, start_prev_duration) {
            (Edge::Right, _) => {
                changes.push((index, input::resize_right(start_duration, delta, floor)));
            }
            (Edge::Left, Some(start_prev)) => {
                let (prev, this) = input::resize_left(start_prev, start_duration, delta, floor);
                changes.push((index - 1, prev));
                changes.push((index, this));
            }
            (Edge::Left, None) => {}
        }

        let mut actions = Vec::new();
        for (i, duration) in changes {
            let Some(id) = self.store.boards().get(i).map(|b| b.id.clone()) else {
                continue;
            };
            let changed = self.store.board(&id).is_some_and(|b| (b.duration - duration).abs() > f64::EPSILON);
            if changed && self.store.update_duration(&id, duration) {
                actions.push(Action::DurationChanged { id, duration });
            }
        }
        if !actions.is_empty() {
            self.playback.resync(&mut self.store);
        }
        actions.extend(self.selection_actions(&before));
        actions
    }

    fn track_reorder(&mut self, pt: Point) -> Vec<Action> {
        let InputState::Reordering { from, insert_index } = self.input else {
            return Vec::new();
        };
        let layouts = self.layouts();
        let insert = input::insert_index_at(self.viewport.screen_to_content(pt.x), &layouts);
        if insert_index == Some(insert) {
            return Vec::new();
        }
        self.input = InputState::Reordering { from, insert_index: Some(insert) };
        vec![Action::RenderNeeded]
    }

    fn selection_actions(&self, before: &BoardId) -> Vec<Action> {
        let mut actions = Vec::new();
        let current = self.store.current_board_id();
        if current != before {
            actions.push(Action::BoardSelected(current.clone()));
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    fn follow_playhead(&mut self, actions: &mut Vec<Action>) {
        let total = self.store.total_duration();
        if let Some(scroll) = self.viewport.follow_playhead(self.store.current_time(), total, self.config.follow_margin) {
            actions.push(Action::ScrollTo(scroll));
        }
    }

    fn set_cursor(&mut self, cursor: &'static str, actions: &mut Vec<Action>) {
        if self.cursor != cursor {
            self.cursor = cursor;
            actions.push(Action::SetCursor(cursor.to_owned()));
        }
    }
}

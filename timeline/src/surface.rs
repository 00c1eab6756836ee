//! Drawing and note capabilities, and the binding that keeps them in step
//! with the selected board.
//!
//! DESIGN
//! ======
//! The core never sees a concrete canvas or editor. It talks to them
//! through [`DrawingSurface`] and [`NoteEditor`] and treats their data as
//! opaque JSON.
//!
//! [`SurfaceBinding`] shows one board at a time. Edits are reported with
//! `drawing_changed`/`notes_changed` and written back to the store after a
//! quiet period. When the selection moves, pending edits are written to the
//! board that was showing *before* the incoming board is loaded, so content
//! never bleeds across boards. `teardown` writes whatever is still pending and returns the surfaces.
//!
//! ERROR HANDLING
//! ==============
//! A failed note save is logged at `warn` and skipped. The store keeps the
//! last good data; the binding keeps running.

#[cfg(test)]
#[path = "surface_test.rs"]
mod surface_test;

use std::future::Future;
use std::time::{Duration, Instant};

use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::autosave::Debouncer;
use crate::doc::BoardId;
use crate::store::{BoardStore, StoreEvent};

/// The note editor could not produce its data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SurfaceError {
    #[error("note editor save failed: {0}")]
    SaveFailed(String),
}

/// Drawing tools a surface can switch between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawTool {
    #[default]
    Pencil,
    Brush,
    Eraser,
}

/// A freehand drawing canvas.
pub trait DrawingSurface {
    /// Replace the canvas contents. A null snapshot means an empty canvas.
    fn load_snapshot(&mut self, snapshot: &Value);

    fn get_snapshot(&self) -> Value;

    /// A thumbnail of the current contents, if the surface can render one.
    fn get_image_preview(&self) -> Option<String>;

    fn set_tool(&mut self, tool: DrawTool);

    fn set_color(&mut self, color: &str);

    fn clear(&mut self);
}

/// A block-based rich-text editor.
pub trait NoteEditor {
    fn render(&mut self, data: &Value);

    /// Produce the editor's current data.
    fn save(&mut self) -> impl Future<Output = Result<Value, SurfaceError>>;

    fn destroy(&mut self);
}

pub struct SurfaceBinding<D, N> {
    drawing: D,
    notes: N,
    events: mpsc::UnboundedReceiver<StoreEvent>,
    bound: BoardId,
    drawing_save: Debouncer,
    notes_save: Debouncer,
}

impl<D: DrawingSurface, N: NoteEditor> SurfaceBinding<D, N> {
    /// Subscribe to `store` and show its selected board.
    pub fn new(mut drawing: D, mut notes: N, store: &mut BoardStore, quiet: Duration) -> Self {
        let events = store.subscribe();
        let bound = store.current_board_id().clone();
        if let Some(board) = store.current_board() {
            drawing.load_snapshot(&board.canvas_data);
            notes.render(&board.script_data);
        }
        Self {
            drawing,
            notes,
            events,
            bound,
            drawing_save: Debouncer::new(quiet),
            notes_save: Debouncer::new(quiet),
        }
    }

    /// The board whose content is currently shown.
    #[must_use]
    pub fn bound_board(&self) -> &BoardId {
        &self.bound
    }

    #[must_use]
    pub fn drawing(&self) -> &D {
        &self.drawing
    }

    pub fn drawing_mut(&mut self) -> &mut D {
        &mut self.drawing
    }

    #[must_use]
    pub fn notes(&self) -> &N {
        &self.notes
    }

    pub fn notes_mut(&mut self) -> &mut N {
        &mut self.notes
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.drawing_save.is_pending() || self.notes_save.is_pending()
    }

    /// Earliest pending save deadline, for hosts that sleep until it.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.drawing_save.deadline(), self.notes_save.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    // --- Edits ---

    /// The drawing surface changed at `now`.
    pub fn drawing_changed(&mut self, now: Instant) {
        self.drawing_save.schedule(now);
    }

    /// The note editor changed at `now`.
    pub fn notes_changed(&mut self, now: Instant) {
        self.notes_save.schedule(now);
    }

    pub fn set_tool(&mut self, tool: DrawTool) {
        self.drawing.set_tool(tool);
    }

    pub fn set_color(&mut self, color: &str) {
        self.drawing.set_color(color);
    }

    /// Wipe the drawing and schedule the empty canvas for saving.
    pub fn clear_drawing(&mut self, now: Instant) {
        self.drawing.clear();
        self.drawing_save.schedule(now);
    }

    // --- Driving ---

    /// Write due saves, then react to store changes.
    pub async fn poll(&mut self, store: &mut BoardStore, now: Instant) {
        if self.drawing_save.take_due(now) {
            self.write_drawing(store);
        }
        if self.notes_save.take_due(now) {
            self.write_notes(store).await;
        }

        let mut reload = false;
        while let Ok(event) = self.events.try_recv() {
            match event {
                StoreEvent::CurrentBoardChanged { .. } | StoreEvent::BoardsChanged => {
                    reload |= store.current_board_id() != &self.bound;
                }
                StoreEvent::DocumentLoaded => {
                    if self.drawing_save.cancel() | self.notes_save.cancel() {
                        debug!(board_id = %self.bound, "dropping unsaved edits from the replaced document");
                    }
                    reload = true;
                }
                StoreEvent::DurationChanged(_)
                | StoreEvent::BoardUpdated(_)
                | StoreEvent::PlayingChanged(_)
                | StoreEvent::LoopChanged(_) => {}
            }
        }

        if reload {
            self.flush(store).await;
            self.bind_current(store);
        }
    }

    /// Write every pending edit to the shown board right now.
    pub async fn flush(&mut self, store: &mut BoardStore) {
        if self.drawing_save.flush() {
            self.write_drawing(store);
        }
        if self.notes_save.flush() {
            self.write_notes(store).await;
        }
    }

    /// Flush pending edits, release the editor, and hand both surfaces back.
    pub async fn teardown(mut self, store: &mut BoardStore) -> (D, N) {
        self.flush(store).await;
        self.notes.destroy();
        debug!(board_id = %self.bound, "surface binding torn down");
        (self.drawing, self.notes)
    }

    // --- Internals ---

    fn bind_current(&mut self, store: &BoardStore) {
        let Some(board) = store.current_board() else {
            return;
        };
        self.drawing.load_snapshot(&board.canvas_data);
        self.notes.render(&board.script_data);
        self.bound = board.id.clone();
        debug!(board_id = %self.bound, "surfaces bound to board");
    }

    fn write_drawing(&mut self, store: &mut BoardStore) {
        let snapshot = self.drawing.get_snapshot();
        if !store.update_canvas_data(&self.bound, snapshot) {
            debug!(board_id = %self.bound, "drawing save skipped: board is gone");
            return;
        }
        store.update_preview(&self.bound, self.drawing.get_image_preview());
    }

    async fn write_notes(&mut self, store: &mut BoardStore) {
        match self.notes.save().await {
            Ok(data) => {
                if !store.update_script_data(&self.bound, data) {
                    debug!(board_id = %self.bound, "note save skipped: board is gone");
                }
            }
            Err(err) => {
                warn!(board_id = %self.bound, error = %err, "note save failed");
            }
        }
    }
}

//! Deterministic stand-ins for the clock, the frame scheduler, and the
//! drawing/note surfaces.

use serde_json::{Value, json};

use crate::store::BoardStore;
use crate::surface::{DrawTool, DrawingSurface, NoteEditor, SurfaceError};
use crate::transport::{ClockError, FrameScheduler, TickToken, TransportClock};

// =============================================================
// Clock
// =============================================================

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct FakeClock {
    pub started: bool,
    pub running: bool,
    pub position: f64,
    pub start_calls: usize,
    pub reject_start: Option<String>,
}

impl FakeClock {
    pub fn rejecting(reason: &str) -> Self {
        Self { reject_start: Some(reason.to_owned()), ..Self::default() }
    }

    /// Advance transport time if the clock is running.
    pub fn advance(&mut self, seconds: f64) {
        if self.running {
            self.position += seconds;
        }
    }
}

impl TransportClock for FakeClock {
    fn is_started(&self) -> bool {
        self.started
    }

    async fn start(&mut self) -> Result<(), ClockError> {
        self.start_calls += 1;
        if let Some(reason) = &self.reject_start {
            return Err(ClockError::Rejected(reason.clone()));
        }
        self.started = true;
        Ok(())
    }

    fn resume(&mut self) {
        self.running = true;
    }

    fn pause(&mut self) {
        self.running = false;
    }

    fn stop(&mut self) {
        self.running = false;
        self.position = 0.0;
    }

    fn seconds(&self) -> f64 {
        self.position
    }

    fn set_seconds(&mut self, seconds: f64) {
        self.position = seconds;
    }
}

// =============================================================
// Scheduler
// =============================================================

/// Hands out sequential tokens and remembers which are outstanding.
#[derive(Debug, Default)]
pub struct FakeScheduler {
    next: u64,
    pub pending: Vec<TickToken>,
    pub cancelled: Vec<TickToken>,
}

impl FakeScheduler {
    pub fn scheduled_count(&self) -> u64 {
        self.next
    }

    /// Simulate the host firing the oldest outstanding frame.
    pub fn fire(&mut self) -> Option<TickToken> {
        if self.pending.is_empty() {
            return None;
        }
        Some(self.pending.remove(0))
    }
}

impl FrameScheduler for FakeScheduler {
    fn schedule_tick(&mut self) -> TickToken {
        self.next += 1;
        let token = TickToken(self.next);
        self.pending.push(token);
        token
    }

    fn cancel(&mut self, token: TickToken) {
        self.pending.retain(|t| *t != token);
        self.cancelled.push(token);
    }
}

// =============================================================
// Surfaces
// =============================================================

#[derive(Debug, Default)]
pub struct FakeDrawing {
    pub contents: Value,
    pub loads: Vec<Value>,
    pub tool: DrawTool,
    pub color: String,
}

impl DrawingSurface for FakeDrawing {
    fn load_snapshot(&mut self, snapshot: &Value) {
        self.contents = snapshot.clone();
        self.loads.push(snapshot.clone());
    }

    fn get_snapshot(&self) -> Value {
        self.contents.clone()
    }

    fn get_image_preview(&self) -> Option<String> {
        if self.contents.is_null() {
            return None;
        }
        Some(format!("preview:{}", self.contents))
    }

    fn set_tool(&mut self, tool: DrawTool) {
        self.tool = tool;
    }

    fn set_color(&mut self, color: &str) {
        color.clone_into(&mut self.color);
    }

    fn clear(&mut self) {
        self.contents = json!({ "shapes": [] });
    }
}

#[derive(Debug, Default)]
pub struct FakeNotes {
    pub contents: Value,
    pub renders: Vec<Value>,
    pub saves: usize,
    pub fail_saves: bool,
    pub destroyed: bool,
}

impl NoteEditor for FakeNotes {
    fn render(&mut self, data: &Value) {
        self.contents = data.clone();
        self.renders.push(data.clone());
    }

    async fn save(&mut self) -> Result<Value, SurfaceError> {
        self.saves += 1;
        if self.fail_saves {
            return Err(SurfaceError::SaveFailed("editor detached".into()));
        }
        Ok(self.contents.clone())
    }

    fn destroy(&mut self) {
        self.destroyed = true;
    }
}

// =============================================================
// Stores
// =============================================================

/// A store whose boards are `b0`, `b1`, ... with the given durations.
pub fn store_with(durations: &[f64]) -> BoardStore {
    let boards: Vec<Value> = durations
        .iter()
        .enumerate()
        .map(|(i, d)| json!({ "id": format!("b{i}"), "duration": d }))
        .collect();
    let mut store = BoardStore::new();
    if let Err(err) = store.load_from_json(&json!({ "boards": boards }).to_string()) {
        panic!("fixture document failed to load: {err}");
    }
    store
}

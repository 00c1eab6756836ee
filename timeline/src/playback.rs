//! Playback engine: transport state, the per-frame sync loop, and seeking.
//!
//! DESIGN
//! ======
//! `PlaybackEngine` is the only owner of the clock and the frame scheduler.
//! It keeps three states:
//!
//! ```text
//!   Stopped --play--> Playing --pause--> Paused --play--> Playing
//!   Playing/Paused --stop--> Stopped
//!   Playing --reaches end--> Playing (loop) | Stopped (no loop)
//! ```
//!
//! The store is passed into every command rather than owned, so the engine
//! writes `is_playing`, `current_time`, and the selection only through store
//! commands. At most one tick is pending; `tick` ignores any token other
//! than the one it scheduled last.
//!
//! ERROR HANDLING
//! ==============
//! A clock that fails to start rolls the play intent back to `false` and
//! returns [`TransportError`]. Every other command is infallible: times are
//! clamped by the store and missing ranges are treated as "nothing to do".

#[cfg(test)]
#[path = "playback_test.rs"]
mod playback_test;

use tracing::{debug, warn};

use crate::consts::STEP_BACK_EPSILON_SECS;
use crate::ranges::RangeIndex;
use crate::store::BoardStore;
use crate::transport::{FrameScheduler, TickToken, TransportClock, TransportError};

/// Transport state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// What a delivered tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not the pending token, or not playing. Nothing changed.
    Stale,
    /// Time advanced and the next frame was scheduled.
    Continued,
    /// The end was reached in loop mode; time wrapped to zero.
    Looped,
    /// The end was reached without loop mode; the transport stopped.
    Finished,
}

pub struct PlaybackEngine<C, S> {
    clock: C,
    scheduler: S,
    state: TransportState,
    pending: Option<TickToken>,
    ranges: RangeIndex,
    scrubbing: bool,
}

impl<C: TransportClock, S: FrameScheduler> PlaybackEngine<C, S> {
    #[must_use]
    pub fn new(clock: C, scheduler: S) -> Self {
        Self {
            clock,
            scheduler,
            state: TransportState::Stopped,
            pending: None,
            ranges: RangeIndex::new(),
            scrubbing: false,
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn state(&self) -> TransportState {
        self.state
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.state == TransportState::Playing
    }

    /// The tick the engine is waiting for, if any.
    #[must_use]
    pub fn pending_tick(&self) -> Option<TickToken> {
        self.pending
    }

    #[must_use]
    pub fn is_scrubbing(&self) -> bool {
        self.scrubbing
    }

    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    #[must_use]
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// The range index, rebuilt from `store` if it changed.
    pub fn ranges(&mut self, store: &BoardStore) -> &mut RangeIndex {
        self.ranges.sync(store);
        &mut self.ranges
    }

    // --- Transport ---

    /// Start or resume playback. A no-op while already playing.
    ///
    /// Starts the clock first if needed; playback that already reached the
    /// end restarts from zero.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::ClockStart`] if the clock refuses to start.
    /// The store's play intent is reset to `false` in that case.
    pub async fn play(&mut self, store: &mut BoardStore) -> Result<(), TransportError> {
        if self.state == TransportState::Playing {
            return Ok(());
        }
        if !self.clock.is_started() {
            if let Err(err) = self.clock.start().await {
                warn!(error = %err, "transport clock failed to start");
                store.set_is_playing(false);
                return Err(err.into());
            }
        }

        self.ranges.sync(store);
        if store.current_time() >= self.ranges.total() {
            store.set_current_time(0.0);
        }
        self.clock.set_seconds(store.current_time());
        self.clock.resume();
        self.state = TransportState::Playing;
        store.set_is_playing(true);
        self.sync_selection(store);
        self.schedule();
        debug!(time = store.current_time(), total = self.ranges.total(), "playback started");
        Ok(())
    }

    /// Freeze playback, keeping the current time. A no-op unless playing.
    pub fn pause(&mut self, store: &mut BoardStore) {
        if self.state != TransportState::Playing {
            return;
        }
        self.clock.pause();
        self.cancel_pending();
        self.state = TransportState::Paused;
        if !self.scrubbing {
            store.set_current_time(self.clock.seconds());
        }
        store.set_is_playing(false);
        debug!(time = store.current_time(), "playback paused");
    }

    /// Halt playback, rewind to zero, and select the first board.
    pub fn stop(&mut self, store: &mut BoardStore) {
        self.clock.stop();
        self.cancel_pending();
        self.state = TransportState::Stopped;
        store.set_is_playing(false);
        store.set_current_time(0.0);
        if let Some(first) = store.boards().first().map(|b| b.id.clone()) {
            store.set_current_board(&first);
        }
        debug!("playback stopped");
    }

    /// Jump to `time` (clamped) and re-sync the selection. Valid in any state.
    pub fn seek(&mut self, store: &mut BoardStore, time: f64) {
        self.ranges.sync(store);
        store.set_current_time(time);
        self.clock.set_seconds(store.current_time());
        self.sync_selection(store);
    }

    /// Deliver a fired frame.
    pub fn tick(&mut self, store: &mut BoardStore, token: TickToken) -> TickOutcome {
        if self.pending != Some(token) {
            return TickOutcome::Stale;
        }
        self.pending = None;
        if self.state != TransportState::Playing {
            return TickOutcome::Stale;
        }

        self.ranges.sync(store);
        let total = self.ranges.total();
        let elapsed = self.clock.seconds();

        if elapsed >= total {
            if store.loop_enabled() {
                self.clock.set_seconds(0.0);
                store.set_current_time(0.0);
                self.sync_selection(store);
                self.schedule();
                debug!(total, "playback looped");
                return TickOutcome::Looped;
            }
            self.pause(store);
            self.seek(store, total);
            self.stop(store);
            debug!(total, "playback reached the end");
            return TickOutcome::Finished;
        }

        if !self.scrubbing {
            store.set_current_time(elapsed);
            self.sync_selection(store);
        }
        self.schedule();
        TickOutcome::Continued
    }

    pub fn set_loop(&mut self, store: &mut BoardStore, enabled: bool) {
        store.set_loop(enabled);
    }

    /// Mark a scrub gesture as in progress. The sync loop stops writing time.
    pub fn begin_scrub(&mut self) {
        self.scrubbing = true;
    }

    pub fn end_scrub(&mut self) {
        self.scrubbing = false;
    }

    // --- Stepping ---

    /// Seek to the start of the next board, or of the last board at the end.
    pub fn step_forward(&mut self, store: &mut BoardStore) {
        self.ranges.sync(store);
        let Some(index) = self.ranges.locate(store.current_time()) else {
            return;
        };
        let next = (index + 1).min(self.ranges.len().saturating_sub(1));
        if let Some(start) = self.ranges.start_of(next) {
            self.seek(store, start);
        }
    }

    /// Seek to the start of the current board, or of the previous board when
    /// already at (or within a hair of) the current board's start.
    pub fn step_back(&mut self, store: &mut BoardStore) {
        self.ranges.sync(store);
        let time = store.current_time();
        let Some(index) = self.ranges.locate(time) else {
            return;
        };
        let Some(start) = self.ranges.start_of(index) else {
            return;
        };
        let target = if time - start > STEP_BACK_EPSILON_SECS {
            start
        } else {
            self.ranges.start_of(index.saturating_sub(1)).unwrap_or(0.0)
        };
        self.seek(store, target);
    }

    pub fn go_to_start(&mut self, store: &mut BoardStore) {
        self.seek(store, 0.0);
    }

    pub fn go_to_end(&mut self, store: &mut BoardStore) {
        self.ranges.sync(store);
        let total = self.ranges.total();
        self.seek(store, total);
    }

    // --- Coordination with board edits ---

    /// Realign the clock and selection after the board list changed.
    ///
    /// A running clock keeps its position, clamped to the new total, and the
    /// selection follows it. Paused or stopped, time is only clamped and the
    /// selection is left to the store.
    pub fn resync(&mut self, store: &mut BoardStore) {
        self.ranges.sync(store);
        match self.state {
            TransportState::Stopped => {}
            TransportState::Paused => {
                store.set_current_time(store.current_time());
                self.clock.set_seconds(store.current_time());
            }
            TransportState::Playing => {
                store.set_current_time(self.clock.seconds());
                self.clock.set_seconds(store.current_time());
                if !self.scrubbing {
                    self.sync_selection(store);
                }
            }
        }
    }

    /// Cancel everything outstanding. Used on teardown.
    pub fn shutdown(&mut self, store: &mut BoardStore) {
        self.stop(store);
        self.scrubbing = false;
    }

    // --- Internals ---

    fn schedule(&mut self) {
        self.cancel_pending();
        self.pending = Some(self.scheduler.schedule_tick());
    }

    fn cancel_pending(&mut self) {
        if let Some(token) = self.pending.take() {
            self.scheduler.cancel(token);
        }
    }

    fn sync_selection(&mut self, store: &mut BoardStore) {
        let Some(index) = self.ranges.locate(store.current_time()) else {
            return;
        };
        let Some(id) = self.ranges.range(index).map(|r| r.board_id.clone()) else {
            return;
        };
        if store.current_board_id() != &id {
            store.set_current_board(&id);
        }
    }
}

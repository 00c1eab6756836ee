//! Real-time playback for the host: a wall clock, a frame ticker, and the
//! loop that drives an engine until playback ends or the caller stops it.
//!
//! DESIGN
//! ======
//! `TickerScheduler` keeps the single outstanding frame token in a slot.
//! `run_playback` polls that slot on a `tokio::time::interval` and hands the
//! token back to the engine, which is what a browser's animation-frame
//! callback would do. Missed ticks are skipped rather than bunched, so a
//! stalled runtime never replays a burst of stale frames.

#[cfg(test)]
#[path = "player_test.rs"]
mod player_test;

use std::future::Future;
use std::time::Duration;

use timeline::doc::BoardId;
use timeline::engine::{Action, EngineCore};
use timeline::transport::{ClockError, FrameScheduler, TickToken, TransportClock, TransportError};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::config::HostConfig;

/// Strip width assumed when nothing is on screen.
const HEADLESS_VIEWPORT_WIDTH: f64 = 800.0;

pub type HostEngine = EngineCore<WallClock, TickerScheduler>;

#[must_use]
pub fn new_engine(config: &HostConfig) -> HostEngine {
    EngineCore::new(
        WallClock::default(),
        TickerScheduler::default(),
        config.timeline(),
        HEADLESS_VIEWPORT_WIDTH,
    )
}

// =============================================================================
// Clock
// =============================================================================

/// Transport clock backed by the runtime's monotonic time.
#[derive(Debug, Default)]
pub struct WallClock {
    started: bool,
    /// Set while running: the instant `offset` was last valid.
    anchor: Option<Instant>,
    offset: f64,
}

impl TransportClock for WallClock {
    fn is_started(&self) -> bool {
        self.started
    }

    async fn start(&mut self) -> Result<(), ClockError> {
        self.started = true;
        Ok(())
    }

    fn resume(&mut self) {
        if self.anchor.is_none() {
            self.anchor = Some(Instant::now());
        }
    }

    fn pause(&mut self) {
        self.offset = self.seconds();
        self.anchor = None;
    }

    fn stop(&mut self) {
        self.anchor = None;
        self.offset = 0.0;
    }

    fn seconds(&self) -> f64 {
        self.offset + self.anchor.map_or(0.0, |anchor| anchor.elapsed().as_secs_f64())
    }

    fn set_seconds(&mut self, seconds: f64) {
        self.offset = seconds;
        if self.anchor.is_some() {
            self.anchor = Some(Instant::now());
        }
    }
}

// =============================================================================
// Scheduler
// =============================================================================

/// Frame scheduler with one pending slot, drained by [`run_playback`].
#[derive(Debug, Default)]
pub struct TickerScheduler {
    next: u64,
    pending: Option<TickToken>,
}

impl TickerScheduler {
    /// Take the outstanding frame, if any.
    pub fn take_pending(&mut self) -> Option<TickToken> {
        self.pending.take()
    }
}

impl FrameScheduler for TickerScheduler {
    fn schedule_tick(&mut self) -> TickToken {
        self.next += 1;
        let token = TickToken(self.next);
        self.pending = Some(token);
        token
    }

    fn cancel(&mut self, token: TickToken) {
        if self.pending == Some(token) {
            self.pending = None;
        }
    }
}

// =============================================================================
// Runner
// =============================================================================

/// What happened during a [`run_playback`] call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaybackReport {
    /// Boards in the order they came on screen, starting with the first.
    pub shown: Vec<BoardId>,
    /// Playback ran to the end (as opposed to being interrupted).
    pub finished: bool,
    /// Transport time when the runner returned.
    pub position: f64,
}

/// Play `engine` in real time until it stops or `shutdown` resolves.
///
/// An interrupted run is paused, not stopped, so the position survives.
///
/// # Errors
///
/// Returns [`TransportError`] if the clock refuses to start.
pub async fn run_playback<F>(
    engine: &mut HostEngine,
    frame_interval: Duration,
    shutdown: F,
) -> Result<PlaybackReport, TransportError>
where
    F: Future<Output = ()>,
{
    let mut report = PlaybackReport::default();
    engine.play().await?;
    report.shown.push(engine.store.current_board_id().clone());
    info!(
        boards = engine.store.len(),
        total = engine.total_duration(),
        from = engine.store.current_time(),
        "playback running"
    );

    let mut ticker = tokio::time::interval(frame_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            () = &mut shutdown => {
                engine.pause();
                info!(time = engine.store.current_time(), "playback interrupted");
                break;
            }
            _ = ticker.tick() => {
                let Some(token) = engine.playback.scheduler_mut().take_pending() else {
                    break;
                };
                for action in engine.tick(token) {
                    if let Action::BoardSelected(id) = action {
                        if engine.playback.is_playing() {
                            info!(board_id = %id, time = engine.store.current_time(), "showing board");
                            report.shown.push(id);
                        }
                    }
                }
                if !engine.playback.is_playing() {
                    report.finished = true;
                    break;
                }
            }
        }
    }

    report.position = engine.store.current_time();
    debug!(finished = report.finished, shown = report.shown.len(), "playback runner returned");
    Ok(report)
}

/// Resolves on Ctrl-C. A failed signal hookup never resolves.
pub async fn ctrl_c() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "cannot listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

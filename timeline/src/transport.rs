//! Capabilities the playback engine drives: a timing clock and a frame scheduler.
//!
//! DESIGN
//! ======
//! The engine never touches a platform timer directly. A host supplies a
//! [`TransportClock`] (the source of elapsed transport time) and a
//! [`FrameScheduler`] (requests one callback per animation frame). Fired
//! frames come back into the engine as [`TickToken`]s; the engine only acts
//! on the token it is currently waiting for, so at most one frame is ever
//! in flight.
//!
//! ERROR HANDLING
//! ==============
//! Starting a clock may fail (for example when the host refuses to open an
//! audio device). That surfaces as [`ClockError`], which the engine wraps in
//! [`TransportError`] after rolling back the play intent.

use std::future::Future;

/// The clock could not be started.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClockError {
    #[error("clock start rejected: {0}")]
    Rejected(String),
}

/// A transport command failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("playback could not start: {0}")]
    ClockStart(#[from] ClockError),
}

/// A real-time transport clock.
///
/// `start` readies the clock once (it may suspend); `resume`/`pause`/`stop`
/// then control whether transport time advances.
pub trait TransportClock {
    /// Whether `start` has already succeeded.
    fn is_started(&self) -> bool;

    /// Ready the clock. Called at most once per successful start.
    fn start(&mut self) -> impl Future<Output = Result<(), ClockError>>;

    /// Let transport time advance from its current position.
    fn resume(&mut self);

    /// Freeze transport time in place.
    fn pause(&mut self);

    /// Freeze transport time and rewind it to zero.
    fn stop(&mut self);

    /// Current transport position in seconds.
    fn seconds(&self) -> f64;

    /// Jump the transport position without ramping.
    fn set_seconds(&mut self, seconds: f64);
}

/// Identifies one requested animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickToken(pub u64);

/// Requests per-frame callbacks.
///
/// The host must later deliver each scheduled token back to the engine
/// unless it was cancelled first.
pub trait FrameScheduler {
    fn schedule_tick(&mut self) -> TickToken;

    fn cancel(&mut self, token: TickToken);
}

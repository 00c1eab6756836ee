//! Storyboard timeline core: boards with durations, a transport that plays
//! them back in order, and the strip editor that drives both.
//!
//! Nothing in this crate touches a window, a file, or a wall clock. Hosts
//! supply a [`transport::TransportClock`] and a [`transport::FrameScheduler`],
//! feed pointer and key events into [`engine::EngineCore`], and act on the
//! [`engine::Action`]s it returns. Drawing and note content stay opaque JSON
//! behind the traits in [`surface`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level [`engine::EngineCore`]: input, transport commands, board commands |
//! | [`store`] | Board list, selection, playback fields, change notifications |
//! | [`doc`] | Board and document types, JSON persistence format |
//! | [`ranges`] | Cumulative time ranges and time-to-board lookup |
//! | [`playback`] | Transport state machine and the single-flight frame loop |
//! | [`transport`] | Clock and frame-scheduler capabilities |
//! | [`surface`] | Drawing/note capabilities and the board binding |
//! | [`autosave`] | Debounce timer for surface saves |
//! | [`viewport`] | Zoom, scroll, and coordinate conversions for the strip |
//! | [`layout`] | Board blocks, ruler ticks, time labels |
//! | [`hit`] | Hit-testing the ruler, board bodies, and edges |
//! | [`input`] | Input types, gesture state, resize and reorder math |
//! | [`config`] | Tunables with defaults |
//! | [`consts`] | Shared numeric constants |

pub mod autosave;
pub mod config;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod hit;
pub mod input;
pub mod layout;
pub mod playback;
pub mod ranges;
pub mod store;
pub mod surface;
pub mod transport;
pub mod viewport;

#[cfg(test)]
mod test_helpers;

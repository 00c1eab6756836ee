//! Host services around the timeline core.
//!
//! ARCHITECTURE
//! ============
//! The core is pure; everything that touches the filesystem, the wall clock,
//! or process signals lives here so command bodies stay focused on driving
//! the engine.

pub mod fileio;
pub mod player;

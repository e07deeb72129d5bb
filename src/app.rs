//! Application module: the orchestrator used by the TUI and runtime.
//!
//! `App` lives in `app::model` and ties the playback session to the page
//! transition sequencer. The landing scene's hotspots live in
//! `app::hotspots`.

mod hotspots;
mod model;

pub use hotspots::*;
pub use model::*;

//! Track catalog: the fixed song list, theme colors and display helpers.
//!
//! Tracks are static fixtures. They are defined once at startup (built in,
//! or replaced wholesale from config) and never mutated afterwards.

mod display;
mod fixtures;
mod model;

pub use display::*;
pub use fixtures::default_tracks;
pub use model::*;

#[cfg(test)]
mod tests;

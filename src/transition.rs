//! Page transitions: the current page, the click origin and the overlay.
//!
//! `TransitionSequencer` owns `TransitionState` and swaps the page partway
//! into the ripple animation. `effects` turns the time since a request into
//! the frame a renderer draws.

mod effects;
mod page;
mod sequencer;

pub use effects::*;
pub use page::*;
pub use sequencer::*;

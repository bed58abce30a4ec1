//! # wheel-stage: Spin lifecycle stages
//!
//! Defines the moments of a wheel spin that sound and UI layers react to.
//! The engine never plays audio; it only emits stages.
//!
//! - Spin starts → pointer clicks past segments → wheel settles → result delivered

pub mod cue;
pub mod event;
pub mod stage;
pub mod trace;

pub use cue::*;
pub use event::*;
pub use stage::*;
pub use trace::*;

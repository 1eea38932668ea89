//! Burnt Beats domain logic.
//!
//! Everything here is HTTP-agnostic: request/result types, output naming,
//! subprocess management and the three generation services that wrap the
//! external MIDI, RVC and AudioLDM2 scripts.

pub mod catalog;
pub mod error;
pub mod generation;
pub mod naming;
pub mod scripting;
pub mod services;

//! Models module for the TJA chart core
//!
//! This module contains the value types shared by the timing model
//! and the chart codec: fixed-point beats, tempo, time signatures,
//! complex scroll values and beat-keyed timeline events.

pub mod beat;
pub mod complex;
pub mod events;

// Re-export commonly used types
pub use beat::*;
pub use complex::Complex;
pub use events::{BeatEvent, TempoChange, TimeSignatureChange};

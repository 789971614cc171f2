//! Timing model: beat-sorted event lists and Beat <-> Time conversion
//!
//! - `sorted_list` - generic container kept strictly sorted by beat, plus a forward scan cursor
//! - `acceleration` - precomputed per-tick time and HBSCROLL tables
//! - `tempo_map` - tempo/signature lists of a course and bar enumeration

pub mod acceleration;
pub mod sorted_list;
pub mod tempo_map;

pub use acceleration::TempoMapAccelerationStructure;
pub use sorted_list::{BeatSortedForwardIterator, BeatSortedList};
pub use tempo_map::{BarFlow, ForEachBeatBarData, SortedSignatureChangesList, SortedTempoChangesList, SortedTempoMap};

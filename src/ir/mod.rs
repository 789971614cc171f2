//! Intermediate Representation (IR) Module
//!
//! Measure-based view of a chart, used by editors and players that need
//! absolute positions instead of the flat command list of a TJA file.
//!
//! # Architecture
//!
//! ```text
//! ParsedTja (flat commands per course)
//!     ↓
//! builder (split at `,`, assign note slots and command anchors)
//!     ↓
//! ConvertedCourse (measures with offset-tagged events)
//!     ↓
//! measurization (common grid, blank padding, run coalescing)
//!     ↓
//! ParsedChartCommand list, ready for the TJA emitter
//! ```
//!
//! # Modules
//!
//! - **types**: measure and event types
//! - **builder**: parsed course to measures
//! - **measurization**: measures back to parsed commands

pub mod builder;
pub mod measurization;
pub mod types;

pub use builder::{
    convert_all_courses, convert_parsed_to_converted_course, convert_parsed_to_converted_course_with, import_tja_text,
};
pub use measurization::{convert_converted_measures_to_parsed_commands, find_subdivision_ticks};
pub use types::*;

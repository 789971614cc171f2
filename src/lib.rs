//! TJA Chart WASM Module
//!
//! Timing model and text codec for TJA rhythm-game charts: a fixed-point
//! beat/tempo timeline with fast Beat <-> Time conversion, a diagnosing
//! TJA parser, a measure-based view of each course and a quantizing
//! re-serializer back to TJA text.

pub mod api;
pub mod diagnostics;
pub mod ir;
pub mod models;
pub mod parse;
pub mod renderers;
pub mod timing;
pub mod utils;

// Re-export commonly used types
pub use diagnostics::{Diagnostic, Diagnostics};
pub use ir::{import_tja_text, ConvertOptions, ConvertedCourse, ConvertedMeasure};
pub use models::{Beat, Complex, Tempo, Time, TimeSignature};
pub use parse::{parse_tja, ParsedChartCommand, ParsedCourse, ParsedTja};
pub use renderers::{convert_parsed_to_text, TextEncoding};
pub use timing::{BeatSortedList, SortedTempoMap};

use wasm_bindgen::prelude::*;

#[cfg(feature = "console_log")]
fn init_logging() {
    if console_log::init_with_level(log::Level::Debug).is_err() {
        crate::wasm_warn!("logger was already initialized");
    }
}

#[cfg(not(feature = "console_log"))]
fn init_logging() {}

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    init_logging();

    log::info!("TJA chart WASM module initialized");
}

//! TJA chart WASM API
//!
//! JavaScript-facing functions. Charts cross the boundary as JSON strings;
//! format problems come back as diagnostics inside the JSON, and only
//! boundary failures (unreadable JSON, bad indices) become `Err`.
//!
//! # Module Structure
//!
//! - `helpers`: console logging macros, `ApiError`, JSON conversion
//! - `import`: `parseTja`, `importTja`, `tokenizeTja`, `convertedCourseJson`
//! - `export`: `exportTja`, `exportConvertedCourses`
//! - `tempo_map`: `TempoMapHandle`

pub mod export;
pub mod helpers;
pub mod import;
pub mod tempo_map;

pub use export::{export_converted_courses, export_converted_json, export_parsed_json, export_tja};
pub use helpers::ApiError;
pub use import::{
    converted_course_json, converted_course_to_json, import_tja_js, import_tja_to_json, parse_tja_js, parse_tja_to_json,
    tokenize_tja,
};
pub use tempo_map::TempoMapHandle;

//! Renderers module for the TJA chart core
//!
//! Export logic that turns the parsed representation back into chart
//! text. TJA is currently the only output format.

pub mod tja;

// Re-export commonly used types
pub use tja::{convert_parsed_to_text, TextEncoding, PROVENANCE_COMMENT_PREFIX};

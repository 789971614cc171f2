//! Utility modules for the TJA chart core
//!
//! Integer/float helpers used by the timing model and text emitter,
//! and ASCII helpers used by the tokenizer and value parsers.

pub mod ascii;
pub mod numeric;

// Re-export commonly used helpers
pub use numeric::{format_g, format_g32, gcd, lcm};

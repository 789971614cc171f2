//! TJA text parsing
//!
//! Text is split into lines, each line is classified into tokens, and the
//! token stream is parsed into metadata plus one flat command list per
//! course. Problems are collected as diagnostics instead of failing.

pub mod grammar;
pub mod keys;
pub mod tokens;
pub mod types;
pub mod values;

pub use grammar::parse_tokens;
pub use keys::{Key, KeyCategory, LOCALES};
pub use tokens::{split_lines, tokenize, tokenize_lines, Token, TokenType};
pub use types::*;
pub use values::ValueError;

use crate::diagnostics::Diagnostics;

/// Tokenize and parse a whole TJA file
pub fn parse_tja(text: &str) -> (ParsedTja, Diagnostics) {
    let mut diagnostics = Diagnostics::new();
    let parsed = parse_tokens(&tokenize(text), &mut diagnostics);
    (parsed, diagnostics)
}

//! ASCII text helpers for the TJA tokenizer and value parsers

/// Case-insensitive ASCII comparison
pub fn matches_insensitive(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

/// Whitespace as understood by the TJA format (ASCII only, full-width spaces are data)
pub fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n' | '\x0B' | '\x0C')
}

/// Trim ASCII whitespace from both ends
pub fn trim(s: &str) -> &str {
    s.trim_matches(is_whitespace)
}

/// Iterate the items of a comma separated list; an empty input yields nothing
pub fn comma_separated(s: &str) -> impl Iterator<Item = &str> {
    let items = if s.is_empty() { None } else { Some(s.split(',')) };
    items.into_iter().flatten()
}

/// Iterate the non-empty words of a space separated list
pub fn space_separated(s: &str) -> impl Iterator<Item = &str> {
    s.split(is_whitespace).filter(|word| !word.is_empty())
}

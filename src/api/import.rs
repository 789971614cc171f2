//! Import operations for the WASM API
//!
//! TJA text in, JSON out. Diagnostics are always part of the result so the
//! host can show them next to the source.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use super::helpers::{to_js_value, to_json, ApiError};
use crate::diagnostics::Diagnostics;
use crate::ir::{convert_parsed_to_converted_course_with, import_tja_text, ConvertOptions, ConvertedCourse};
use crate::parse::{parse_tja, tokenize, ParsedTja};
use crate::{wasm_info, wasm_log};

#[derive(Serialize)]
pub struct ParseResult {
    pub parsed: ParsedTja,
    pub diagnostics: Diagnostics,
}

#[derive(Serialize)]
pub struct ImportResult {
    pub parsed: ParsedTja,
    pub courses: Vec<ConvertedCourse>,
    pub diagnostics: Diagnostics,
}

pub fn parse_tja_to_json(text: &str) -> Result<String, ApiError> {
    let (parsed, diagnostics) = parse_tja(text);
    wasm_log!("  {} course(s), {} diagnostic(s)", parsed.courses.len(), diagnostics.len());
    to_json(&ParseResult { parsed, diagnostics }, "Failed to serialize parsed chart")
}

pub fn import_tja_to_json(text: &str, keep_placeholder_notes: bool) -> Result<String, ApiError> {
    let (parsed, courses, diagnostics) = import_tja_text(text, ConvertOptions { keep_placeholder_notes });
    wasm_log!("  {} course(s) converted, {} diagnostic(s)", courses.len(), diagnostics.len());
    to_json(&ImportResult { parsed, courses, diagnostics }, "Failed to serialize converted chart")
}

pub fn converted_course_to_json(text: &str, course_index: usize) -> Result<String, ApiError> {
    let (parsed, _) = parse_tja(text);
    let course = parsed
        .courses
        .get(course_index)
        .ok_or(ApiError::CourseIndex { index: course_index, count: parsed.courses.len() })?;
    let converted = convert_parsed_to_converted_course_with(&parsed, course, ConvertOptions::default());
    to_json(&converted, "Failed to serialize converted course")
}

/// Parse TJA text into `{ parsed, diagnostics }` JSON
#[wasm_bindgen(js_name = parseTja)]
pub fn parse_tja_js(text: &str) -> Result<String, JsValue> {
    wasm_info!("parseTja called ({} bytes)", text.len());
    Ok(parse_tja_to_json(text)?)
}

/// Parse and convert every course into `{ parsed, courses, diagnostics }` JSON
#[wasm_bindgen(js_name = importTja)]
pub fn import_tja_js(text: &str, keep_placeholder_notes: Option<bool>) -> Result<String, JsValue> {
    wasm_info!("importTja called ({} bytes)", text.len());
    Ok(import_tja_to_json(text, keep_placeholder_notes.unwrap_or(false))?)
}

/// Classified lines for syntax highlighting, as an array of token objects
#[wasm_bindgen(js_name = tokenizeTja)]
pub fn tokenize_tja(text: &str) -> Result<JsValue, JsValue> {
    let tokens = tokenize(text);
    wasm_log!("tokenizeTja: {} token(s)", tokens.len());
    Ok(to_js_value(&tokens, "Failed to convert tokens")?)
}

/// JSON of one converted course
#[wasm_bindgen(js_name = convertedCourseJson)]
pub fn converted_course_json(text: &str, course_index: usize) -> Result<String, JsValue> {
    wasm_info!("convertedCourseJson called for course {}", course_index);
    Ok(converted_course_to_json(text, course_index)?)
}

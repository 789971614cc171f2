//! Export operations for the WASM API
//!
//! - TJA from parsed JSON (as produced by `parseTja`)
//! - TJA from converted courses (as produced by `importTja`), re-quantized

use wasm_bindgen::prelude::*;

use super::helpers::{from_json, ApiError};
use crate::ir::ConvertedCourse;
use crate::parse::ParsedTja;
use crate::renderers::{convert_parsed_to_text, TextEncoding};
use crate::{wasm_info, wasm_log};

fn encoding(with_bom: bool) -> TextEncoding {
    if with_bom {
        TextEncoding::Utf8Bom
    } else {
        TextEncoding::Utf8
    }
}

pub fn export_parsed_json(parsed_json: &str, with_bom: bool) -> Result<String, ApiError> {
    let parsed: ParsedTja = from_json(parsed_json, "Failed to read parsed chart")?;
    Ok(convert_parsed_to_text(&parsed, encoding(with_bom)))
}

/// Rebuild a file from converted courses; song metadata comes from the first course
pub fn export_converted_json(courses_json: &str, with_bom: bool) -> Result<String, ApiError> {
    let courses: Vec<ConvertedCourse> = from_json(courses_json, "Failed to read converted courses")?;
    let parsed = ParsedTja {
        metadata: courses.first().map(|course| course.main_metadata.clone()).unwrap_or_default(),
        courses: courses.iter().map(ConvertedCourse::to_parsed_course).collect(),
        ..Default::default()
    };
    wasm_log!("  re-quantized {} course(s)", parsed.courses.len());
    Ok(convert_parsed_to_text(&parsed, encoding(with_bom)))
}

/// Export parsed JSON to TJA text
#[wasm_bindgen(js_name = exportTja)]
pub fn export_tja(parsed_json: &str, with_bom: bool) -> Result<String, JsValue> {
    wasm_info!("exportTja called");
    let text = export_parsed_json(parsed_json, with_bom)?;
    wasm_info!("  TJA generated: {} bytes", text.len());
    Ok(text)
}

/// Export a JSON array of converted courses to TJA text
#[wasm_bindgen(js_name = exportConvertedCourses)]
pub fn export_converted_courses(courses_json: &str, with_bom: bool) -> Result<String, JsValue> {
    wasm_info!("exportConvertedCourses called");
    let text = export_converted_json(courses_json, with_bom)?;
    wasm_info!("  TJA generated: {} bytes", text.len());
    Ok(text)
}

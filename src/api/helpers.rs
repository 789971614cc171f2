//! Shared helpers for WASM API operations
//!
//! Console logging macros, the API error type and JSON conversion used by
//! every exported function.

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use wasm_bindgen::prelude::*;

// ============================================================================
// Console Logging Functions
// ============================================================================

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);

    #[wasm_bindgen(js_namespace = console)]
    fn info(s: &str);

    #[wasm_bindgen(js_namespace = console)]
    fn warn(s: &str);

    #[wasm_bindgen(js_namespace = console)]
    fn error(s: &str);
}

// Native builds (tests, tools) have no console; go through the `log` facade instead
#[cfg(not(target_arch = "wasm32"))]
fn log(s: &str) {
    log::debug!("{}", s);
}

#[cfg(not(target_arch = "wasm32"))]
fn info(s: &str) {
    log::info!("{}", s);
}

#[cfg(not(target_arch = "wasm32"))]
fn warn(s: &str) {
    log::warn!("{}", s);
}

#[cfg(not(target_arch = "wasm32"))]
fn error(s: &str) {
    log::error!("{}", s);
}

// ============================================================================
// Logging Macros
// ============================================================================

/// Log a debug message with [WASM] prefix
#[macro_export]
macro_rules! wasm_log {
    ($($arg:tt)*) => {
        $crate::api::helpers::log_debug(&format!($($arg)*))
    };
}

/// Log an info message with [WASM] prefix
#[macro_export]
macro_rules! wasm_info {
    ($($arg:tt)*) => {
        $crate::api::helpers::log_info(&format!($($arg)*))
    };
}

/// Log a warning message with [WASM] ⚠️ prefix
#[macro_export]
macro_rules! wasm_warn {
    ($($arg:tt)*) => {
        $crate::api::helpers::log_warn(&format!($($arg)*))
    };
}

/// Log an error message with [WASM] ❌ prefix
#[macro_export]
macro_rules! wasm_error {
    ($($arg:tt)*) => {
        $crate::api::helpers::log_error(&format!($($arg)*))
    };
}

pub fn log_debug(msg: &str) {
    log(&format!("[WASM] {}", msg));
}

pub fn log_info(msg: &str) {
    info(&format!("[WASM] {}", msg));
}

pub fn log_warn(msg: &str) {
    warn(&format!("[WASM] ⚠️ {}", msg));
}

pub fn log_error(msg: &str) {
    error(&format!("[WASM] ❌ {}", msg));
}

// ============================================================================
// Errors
// ============================================================================

/// Failures at the host boundary
///
/// Chart format problems are never errors; they travel as diagnostics
/// inside successful results.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{context}: {source}")]
    Json {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{context}: {message}")]
    JsConversion { context: &'static str, message: String },

    #[error("Course index {index} out of range ({count} courses)")]
    CourseIndex { index: usize, count: usize },

    #[error("Unsupported time signature {numerator}/{denominator}")]
    UnsupportedSignature { numerator: i32, denominator: i32 },

    #[error("Negative beat {0} ticks")]
    NegativeBeat(i32),
}

impl From<ApiError> for JsValue {
    fn from(err: ApiError) -> Self {
        let msg = err.to_string();
        log_error(&msg);
        JsValue::from_str(&msg)
    }
}

// ============================================================================
// JSON Helpers
// ============================================================================

/// Deserialize a JSON document coming from the host
pub fn from_json<T: DeserializeOwned>(json: &str, context: &'static str) -> Result<T, ApiError> {
    serde_json::from_str(json).map_err(|source| ApiError::Json { context, source })
}

/// Serialize a value into the JSON handed back to the host
pub fn to_json<T: Serialize>(value: &T, context: &'static str) -> Result<String, ApiError> {
    serde_json::to_string(value).map_err(|source| ApiError::Json { context, source })
}

/// Serialize straight into a JavaScript value
pub fn to_js_value<T: Serialize>(value: &T, context: &'static str) -> Result<JsValue, ApiError> {
    serde_wasm_bindgen::to_value(value).map_err(|err| ApiError::JsConversion { context, message: err.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::ParsedTja;

    #[test]
    fn test_bad_json_names_its_context() {
        let err = from_json::<ParsedTja>("{not json", "Failed to read parsed chart").unwrap_err();
        assert!(err.to_string().starts_with("Failed to read parsed chart: "));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ApiError::CourseIndex { index: 3, count: 1 }.to_string(),
            "Course index 3 out of range (1 courses)"
        );
        assert_eq!(
            ApiError::UnsupportedSignature { numerator: 4, denominator: 0 }.to_string(),
            "Unsupported time signature 4/0"
        );
    }
}

//! Tempo map handle for the WASM API
//!
//! Lets the host keep a tempo/signature timeline alive between calls and
//! convert between beats (ticks) and seconds. Edits only take effect for
//! conversions after `rebuild()`.

use wasm_bindgen::prelude::*;

use super::helpers::{from_json, ApiError};
use crate::ir::ConvertedCourse;
use crate::models::{is_time_signature_supported, Beat, Tempo, TempoChange, Time, TimeSignature, TimeSignatureChange};
use crate::timing::{BarFlow, SortedTempoMap};
use crate::wasm_info;

#[wasm_bindgen]
pub struct TempoMapHandle {
    map: SortedTempoMap,
}

impl Default for TempoMapHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl TempoMapHandle {
    pub fn map(&self) -> &SortedTempoMap {
        &self.map
    }

    fn checked_beat(ticks: i32) -> Result<Beat, ApiError> {
        if ticks < 0 {
            Err(ApiError::NegativeBeat(ticks))
        } else {
            Ok(Beat::from_ticks(ticks))
        }
    }
}

#[wasm_bindgen]
impl TempoMapHandle {
    /// Empty map answering with 120 BPM and 4/4
    #[wasm_bindgen(constructor)]
    pub fn new() -> TempoMapHandle {
        TempoMapHandle { map: SortedTempoMap::new() }
    }

    /// Build from one converted course as returned by `convertedCourseJson`
    #[wasm_bindgen(js_name = fromConvertedCourse)]
    pub fn from_converted_course(course_json: &str) -> Result<TempoMapHandle, JsValue> {
        let course: ConvertedCourse = from_json(course_json, "Failed to read converted course")?;
        let map = course.build_tempo_map();
        wasm_info!("TempoMapHandle: {} tempo change(s), {} signature change(s)", map.tempo.len(), map.signature.len());
        Ok(TempoMapHandle { map })
    }

    /// Insert or replace the tempo change at `ticks`
    #[wasm_bindgen(js_name = setTempo)]
    pub fn set_tempo(&mut self, ticks: i32, bpm: f32) -> Result<(), JsValue> {
        let beat = Self::checked_beat(ticks)?;
        self.map.tempo.insert_or_update(TempoChange::new(beat, Tempo::new(bpm)));
        Ok(())
    }

    /// Insert or replace the signature change at `ticks`
    #[wasm_bindgen(js_name = setSignature)]
    pub fn set_signature(&mut self, ticks: i32, numerator: i32, denominator: i32) -> Result<(), JsValue> {
        let beat = Self::checked_beat(ticks)?;
        let signature = TimeSignature::new(numerator, denominator);
        if !is_time_signature_supported(signature) {
            return Err(ApiError::UnsupportedSignature { numerator, denominator }.into());
        }
        self.map.signature.insert_or_update(TimeSignatureChange::new(beat, signature));
        Ok(())
    }

    #[wasm_bindgen(js_name = removeTempoAt)]
    pub fn remove_tempo_at(&mut self, ticks: i32) {
        self.map.tempo.remove_at_beat(Beat::from_ticks(ticks));
    }

    pub fn rebuild(&mut self) {
        self.map.rebuild_acceleration_structure();
    }

    /// Seconds at `ticks`
    #[wasm_bindgen(js_name = beatToTime)]
    pub fn beat_to_time(&self, ticks: i32) -> f64 {
        self.map.beat_to_time(Beat::from_ticks(ticks)).to_sec()
    }

    /// Ticks at `seconds`, rounded down
    #[wasm_bindgen(js_name = timeToBeat)]
    pub fn time_to_beat(&self, seconds: f64) -> i32 {
        self.map.time_to_beat(Time::from_sec(seconds)).ticks
    }

    /// Tick position of every bar line before `until_ticks`
    #[wasm_bindgen(js_name = barLines)]
    pub fn bar_lines(&self, until_ticks: i32) -> Vec<i32> {
        let end = Beat::from_ticks(until_ticks);
        let mut bars = Vec::new();
        self.map.for_each_beat_bar(|data| {
            if data.beat >= end {
                return BarFlow::Break;
            }
            bars.push(data.beat.ticks);
            BarFlow::Continue
        });
        bars
    }
}

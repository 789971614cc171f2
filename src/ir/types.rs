//! Measure-based chart representation
//!
//! One `ConvertedMeasure` per TJA measure. Every event carries its offset
//! from the start of its measure; the measure itself carries its absolute
//! start beat and active time signature.

use serde::{Deserialize, Serialize};

use crate::models::{Beat, Complex, Tempo, TempoChange, Time, TimeSignature, TimeSignatureChange};
use crate::parse::{NoteType, ParsedCourse, ParsedCourseMetadata, ParsedMainMetadata, ScrollMethod};
use crate::timing::{BeatSortedList, SortedTempoMap};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertedNote {
    pub time_within_measure: Beat,
    pub note_type: NoteType,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConvertedTempoChange {
    pub time_within_measure: Beat,
    pub tempo: Tempo,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConvertedDelayChange {
    pub time_within_measure: Beat,
    pub delay: Time,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConvertedScrollChange {
    pub time_within_measure: Beat,
    pub scroll_speed: Complex,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertedBarLineChange {
    pub time_within_measure: Beat,
    pub visible: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertedLyricChange {
    pub time_within_measure: Beat,
    pub lyric: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertedGoGoChange {
    pub time_within_measure: Beat,
    pub is_gogo: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertedScrollType {
    pub time_within_measure: Beat,
    pub method: ScrollMethod,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConvertedJposScroll {
    pub time_within_measure: Beat,
    pub movement: Complex,
    pub duration: Time,
}

/// One measure of a chart
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertedMeasure {
    /// Absolute beat of the first tick of the measure
    pub start_time: Beat,
    pub time_signature: TimeSignature,
    /// Sorted by `time_within_measure`
    pub notes: Vec<ConvertedNote>,
    pub tempo_changes: Vec<ConvertedTempoChange>,
    pub delay_changes: Vec<ConvertedDelayChange>,
    pub scroll_changes: Vec<ConvertedScrollChange>,
    pub scroll_types: Vec<ConvertedScrollType>,
    pub jpos_scroll_changes: Vec<ConvertedJposScroll>,
    pub bar_line_changes: Vec<ConvertedBarLineChange>,
    pub lyric_changes: Vec<ConvertedLyricChange>,
    pub gogo_changes: Vec<ConvertedGoGoChange>,
}

impl ConvertedMeasure {
    pub fn new(start_time: Beat, time_signature: TimeSignature) -> Self {
        Self { start_time, time_signature, ..Default::default() }
    }

    /// Length of the measure; negative signatures still take up time
    pub fn bar_duration(&self) -> Beat {
        self.time_signature.duration_per_bar().abs()
    }

    /// True when the measure holds neither notes nor commands
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
            && self.tempo_changes.is_empty()
            && self.delay_changes.is_empty()
            && self.scroll_changes.is_empty()
            && self.scroll_types.is_empty()
            && self.jpos_scroll_changes.is_empty()
            && self.bar_line_changes.is_empty()
            && self.lyric_changes.is_empty()
            && self.gogo_changes.is_empty()
    }
}

/// Absolute go-go section, `end_time == start_time` while still open
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertedGoGoRange {
    pub start_time: Beat,
    pub end_time: Beat,
}

/// A whole course in measure form
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertedCourse {
    pub main_metadata: ParsedMainMetadata,
    pub course_metadata: ParsedCourseMetadata,
    pub measures: Vec<ConvertedMeasure>,
    pub gogo_ranges: Vec<ConvertedGoGoRange>,
}

impl ConvertedCourse {
    /// Re-serialize the measures into a parsed course with the same metadata
    pub fn to_parsed_course(&self) -> ParsedCourse {
        ParsedCourse {
            metadata: self.course_metadata.clone(),
            chart_commands: super::measurization::convert_converted_measures_to_parsed_commands(&self.measures),
        }
    }

    /// Absolute tempo and signature timeline of the course
    ///
    /// Returned already rebuilt. Where several tempo changes share a beat
    /// the last one wins.
    pub fn build_tempo_map(&self) -> SortedTempoMap {
        let mut tempo = BeatSortedList::new();
        let mut signature = BeatSortedList::new();

        for measure in &self.measures {
            signature.insert_or_update(TimeSignatureChange::new(measure.start_time, measure.time_signature));
            for change in &measure.tempo_changes {
                tempo.insert_or_update(TempoChange::new(measure.start_time.saturating_add(change.time_within_measure), change.tempo));
            }
        }

        SortedTempoMap::from_lists(tempo, signature)
    }

    /// Absolute beat just past the last measure
    pub fn end_time(&self) -> Beat {
        self.measures.last().map_or(Beat::ZERO, |measure| measure.start_time.saturating_add(measure.bar_duration()))
    }
}

/// Import-time options
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Keep `NoteType::None` placeholders instead of stripping them
    pub keep_placeholder_notes: bool,
}

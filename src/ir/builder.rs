//! Flat parsed commands -> measure-based course (import direction)
//!
//! A measure with N note characters splits its bar into N equal parts.
//! Commands between note characters are anchored at the position of the
//! next note slot, so a `#BPMCHANGE` line between `10` and `10,` lands
//! halfway through the bar. Placeholder notes are dropped once every
//! command has its position.

use crate::diagnostics::Diagnostics;
use crate::models::{Beat, TimeSignature, FALLBACK_TIME_SIGNATURE};
use crate::parse::{parse_tja, NoteType, ParsedChartCommand, ParsedCourse, ParsedTja, ScrollMethod};

use super::types::*;

/// Offset of note slot `consumed` out of `note_count` in a bar
fn slot_offset(consumed: usize, note_count: usize, bar_duration: Beat) -> Beat {
    if note_count == 0 {
        return Beat::ZERO;
    }
    Beat::from_ticks((consumed as i64 * bar_duration.ticks as i64 / note_count as i64) as i32)
}

fn note_count(commands: &[ParsedChartCommand]) -> usize {
    commands
        .iter()
        .map(|command| match command {
            ParsedChartCommand::MeasureNotes(notes) => notes.len(),
            _ => 0,
        })
        .sum()
}

/// Signature in effect for a measure; a change anywhere inside it applies to the whole measure
fn measure_signature(commands: &[ParsedChartCommand], previous: TimeSignature) -> TimeSignature {
    commands.iter().fold(previous, |signature, command| match command {
        ParsedChartCommand::ChangeTimeSignature(value) => *value,
        _ => signature,
    })
}

/// Convert one parsed course with default options
pub fn convert_parsed_to_converted_course(parsed: &ParsedTja, course: &ParsedCourse) -> ConvertedCourse {
    convert_parsed_to_converted_course_with(parsed, course, ConvertOptions::default())
}

pub fn convert_parsed_to_converted_course_with(
    parsed: &ParsedTja,
    course: &ParsedCourse,
    options: ConvertOptions,
) -> ConvertedCourse {
    let mut out = ConvertedCourse {
        main_metadata: parsed.metadata.clone(),
        course_metadata: course.metadata.clone(),
        measures: Vec::new(),
        gogo_ranges: Vec::new(),
    };

    let segments: Vec<&[ParsedChartCommand]> =
        course.chart_commands.split(|command| *command == ParsedChartCommand::MeasureEnd).collect();
    let closed_measures = segments.len() - 1;
    out.measures.reserve(segments.len());

    let mut signature = FALLBACK_TIME_SIGNATURE;
    let mut start_time = Beat::ZERO;

    for (index, commands) in segments.into_iter().enumerate() {
        // Only keep the part after the last `,` when something was written there
        if index == closed_measures && commands.is_empty() {
            break;
        }

        signature = measure_signature(commands, signature);
        let mut measure = ConvertedMeasure::new(start_time, signature);
        let bar_duration = measure.bar_duration();
        let total_notes = note_count(commands);

        let mut consumed = 0;
        for command in commands {
            let offset = slot_offset(consumed, total_notes, bar_duration);
            match command {
                ParsedChartCommand::MeasureNotes(notes) => {
                    for &note_type in notes {
                        let time_within_measure = slot_offset(consumed, total_notes, bar_duration);
                        measure.notes.push(ConvertedNote { time_within_measure, note_type });
                        consumed += 1;
                    }
                }
                ParsedChartCommand::ChangeTempo(tempo) => {
                    measure.tempo_changes.push(ConvertedTempoChange { time_within_measure: offset, tempo: *tempo })
                }
                ParsedChartCommand::ChangeDelay(delay) => {
                    measure.delay_changes.push(ConvertedDelayChange { time_within_measure: offset, delay: *delay })
                }
                ParsedChartCommand::ChangeScrollSpeed(scroll_speed) => measure
                    .scroll_changes
                    .push(ConvertedScrollChange { time_within_measure: offset, scroll_speed: *scroll_speed }),
                ParsedChartCommand::ChangeBarLine { visible } => measure
                    .bar_line_changes
                    .push(ConvertedBarLineChange { time_within_measure: offset, visible: *visible }),
                ParsedChartCommand::SetLyricLine(lyric) => measure
                    .lyric_changes
                    .push(ConvertedLyricChange { time_within_measure: offset, lyric: lyric.clone() }),
                ParsedChartCommand::GoGoStart => {
                    measure.gogo_changes.push(ConvertedGoGoChange { time_within_measure: offset, is_gogo: true });
                    let absolute = start_time.saturating_add(offset);
                    out.gogo_ranges.push(ConvertedGoGoRange { start_time: absolute, end_time: absolute });
                }
                ParsedChartCommand::GoGoEnd => {
                    measure.gogo_changes.push(ConvertedGoGoChange { time_within_measure: offset, is_gogo: false });
                    if let Some(range) = out.gogo_ranges.last_mut() {
                        range.end_time = start_time.saturating_add(offset);
                    }
                }
                ParsedChartCommand::NmScroll => measure
                    .scroll_types
                    .push(ConvertedScrollType { time_within_measure: offset, method: ScrollMethod::Normal }),
                ParsedChartCommand::HbScroll => measure
                    .scroll_types
                    .push(ConvertedScrollType { time_within_measure: offset, method: ScrollMethod::HbScroll }),
                ParsedChartCommand::BmScroll => measure
                    .scroll_types
                    .push(ConvertedScrollType { time_within_measure: offset, method: ScrollMethod::BmScroll }),
                ParsedChartCommand::SetJposScroll { duration, movement } => {
                    measure.jpos_scroll_changes.push(ConvertedJposScroll {
                        time_within_measure: offset,
                        movement: *movement,
                        duration: *duration,
                    })
                }
                ParsedChartCommand::ChangeTimeSignature(_) | ParsedChartCommand::MeasureEnd => {}
                other => log::trace!("measure {}: {:?} has no measure representation", index, other),
            }
        }

        if !options.keep_placeholder_notes {
            measure.notes.retain(|note| note.note_type != NoteType::None);
        }

        start_time = start_time.checked_add(bar_duration).unwrap_or_else(|| {
            log::warn!("measure {}: chart runs past the last representable beat", index);
            Beat::from_ticks(i32::MAX)
        });
        out.measures.push(measure);
    }

    if out.measures.is_empty() {
        out.measures.push(ConvertedMeasure::new(Beat::ZERO, FALLBACK_TIME_SIGNATURE));
    }

    let first_measure = &mut out.measures[0];
    if first_measure.tempo_changes.is_empty() {
        first_measure
            .tempo_changes
            .insert(0, ConvertedTempoChange { time_within_measure: Beat::ZERO, tempo: parsed.metadata.bpm });
    }

    log::debug!(
        "converted course {:?} into {} measures, {} go-go ranges",
        out.course_metadata.course,
        out.measures.len(),
        out.gogo_ranges.len()
    );
    out
}

/// Convert every course of a parsed file
pub fn convert_all_courses(parsed: &ParsedTja, options: ConvertOptions) -> Vec<ConvertedCourse> {
    parsed
        .courses
        .iter()
        .map(|course| convert_parsed_to_converted_course_with(parsed, course, options))
        .collect()
}

/// Tokenize, parse and convert every course of a TJA text
pub fn import_tja_text(text: &str, options: ConvertOptions) -> (ParsedTja, Vec<ConvertedCourse>, Diagnostics) {
    let (parsed, diagnostics) = parse_tja(text);
    let courses = convert_all_courses(&parsed, options);
    (parsed, courses, diagnostics)
}

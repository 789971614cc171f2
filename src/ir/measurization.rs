//! Measure-based course -> flat parsed commands (export direction)
//!
//! TJA can only place events on equal subdivisions of a bar, so each
//! measure is quantized onto the coarsest tick grid that every event lands
//! on:
//!
//! ```text
//! tick_per_note = gcd(bar_duration, offset_1, offset_2, ...)
//! ```
//!
//! Empty grid slots are filled with `NoteType::None` placeholders, the real
//! events are merged in by offset and adjacent notes are joined into one
//! `MeasureNotes` run. Offsets that are almost but not quite equal can drive
//! the grid down to single ticks and produce very long note lines; that is
//! accepted and only logged.

use crate::models::{Beat, FALLBACK_TIME_SIGNATURE};
use crate::parse::{NoteType, ParsedChartCommand, ScrollMethod};
use crate::utils::gcd;

use super::types::ConvertedMeasure;

/// A command waiting to be placed on the measure grid
#[derive(Debug)]
struct TempCommand {
    time_within_measure: Beat,
    command: ParsedChartCommand,
}

impl TempCommand {
    fn new(time_within_measure: Beat, command: ParsedChartCommand) -> Self {
        Self { time_within_measure, command }
    }

    fn note(time_within_measure: Beat, note_type: NoteType) -> Self {
        Self::new(time_within_measure, ParsedChartCommand::MeasureNotes(vec![note_type]))
    }
}

/// Coarsest grid (in ticks) that divides the bar and every positive offset
///
/// Stops early once the grid reaches a single tick.
pub fn find_subdivision_ticks(bar_duration: Beat, offsets: impl IntoIterator<Item = Beat>) -> i32 {
    let mut tick_per_note = bar_duration.ticks;
    for offset in offsets {
        if offset.ticks <= 0 {
            continue;
        }
        tick_per_note = gcd(tick_per_note, offset.ticks);
        if tick_per_note <= 1 {
            break;
        }
    }
    tick_per_note
}

/// Merge two runs sorted by offset; on equal offsets `left` goes first
fn merge_by_time(left: Vec<TempCommand>, right: Vec<TempCommand>) -> Vec<TempCommand> {
    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut right = right.into_iter().peekable();
    for command in left {
        while let Some(blank) = right.next_if(|blank| blank.time_within_measure < command.time_within_measure) {
            merged.push(blank);
        }
        merged.push(command);
    }
    merged.extend(right);
    merged
}

/// Append, joining consecutive note runs
fn push_coalesced(out: &mut Vec<ParsedChartCommand>, command: ParsedChartCommand) {
    if let ParsedChartCommand::MeasureNotes(notes) = &command {
        if let Some(ParsedChartCommand::MeasureNotes(run)) = out.last_mut() {
            run.extend_from_slice(notes);
            return;
        }
    }
    out.push(command);
}

/// Collect every event of a measure in emission order for equal offsets
///
/// Returns the index range of the real notes within the buffer.
fn collect_measure_events(
    measure: &ConvertedMeasure,
    signature_changed: bool,
    temp: &mut Vec<TempCommand>,
) -> std::ops::Range<usize> {
    if signature_changed {
        temp.push(TempCommand::new(Beat::ZERO, ParsedChartCommand::ChangeTimeSignature(measure.time_signature)));
    }
    for change in &measure.gogo_changes {
        let command = if change.is_gogo { ParsedChartCommand::GoGoStart } else { ParsedChartCommand::GoGoEnd };
        temp.push(TempCommand::new(change.time_within_measure, command));
    }
    for change in &measure.bar_line_changes {
        let command = ParsedChartCommand::ChangeBarLine { visible: change.visible };
        temp.push(TempCommand::new(change.time_within_measure, command));
    }
    for change in &measure.tempo_changes {
        temp.push(TempCommand::new(change.time_within_measure, ParsedChartCommand::ChangeTempo(change.tempo)));
    }
    for change in &measure.scroll_changes {
        let command = ParsedChartCommand::ChangeScrollSpeed(change.scroll_speed);
        temp.push(TempCommand::new(change.time_within_measure, command));
    }
    for change in &measure.scroll_types {
        let command = match change.method {
            ScrollMethod::Normal => ParsedChartCommand::NmScroll,
            ScrollMethod::HbScroll => ParsedChartCommand::HbScroll,
            ScrollMethod::BmScroll => ParsedChartCommand::BmScroll,
        };
        temp.push(TempCommand::new(change.time_within_measure, command));
    }
    for change in &measure.jpos_scroll_changes {
        let command = ParsedChartCommand::SetJposScroll { duration: change.duration, movement: change.movement };
        temp.push(TempCommand::new(change.time_within_measure, command));
    }
    for change in &measure.lyric_changes {
        let command = ParsedChartCommand::SetLyricLine(change.lyric.clone());
        temp.push(TempCommand::new(change.time_within_measure, command));
    }
    for change in &measure.delay_changes {
        temp.push(TempCommand::new(change.time_within_measure, ParsedChartCommand::ChangeDelay(change.delay)));
    }

    let note_start = temp.len();
    temp.extend(measure.notes.iter().map(|note| TempCommand::note(note.time_within_measure, note.note_type)));
    note_start..temp.len()
}

/// Re-serialize measures into a flat command list ending every measure with `MeasureEnd`
///
/// The notes of each measure must already be sorted by offset.
pub fn convert_converted_measures_to_parsed_commands(measures: &[ConvertedMeasure]) -> Vec<ParsedChartCommand> {
    let mut out = Vec::with_capacity(measures.len() * 4);
    let mut temp: Vec<TempCommand> = Vec::with_capacity(64);
    let mut last_signature = FALLBACK_TIME_SIGNATURE;

    for (measure_index, measure) in measures.iter().enumerate() {
        debug_assert!(measure.notes.windows(2).all(|pair| pair[0].time_within_measure <= pair[1].time_within_measure));

        let signature_changed = measure.time_signature != last_signature;
        last_signature = measure.time_signature;
        let notes = collect_measure_events(measure, signature_changed, &mut temp);

        if !temp.is_empty() {
            let bar_duration = last_signature.duration_per_bar().abs();
            let tick_per_note = find_subdivision_ticks(bar_duration, temp.iter().map(|c| c.time_within_measure));
            let slot_count = if tick_per_note == 0 { 0 } else { bar_duration.ticks / tick_per_note };

            if tick_per_note == 1 && bar_duration.ticks > 1 {
                log::warn!("measure {}: subdivision collapsed to single ticks ({} slots)", measure_index, slot_count);
            }

            // Placeholders for every slot without a real note, already in order
            let mut matched_notes = 0;
            let mut search_from = notes.start;
            for slot in 0..slot_count {
                let beat = Beat::from_ticks(slot * tick_per_note);
                search_from += temp[search_from..notes.end].partition_point(|c| c.time_within_measure < beat);
                if search_from < notes.end && temp[search_from].time_within_measure == beat {
                    matched_notes += 1;
                } else {
                    temp.push(TempCommand::note(beat, NoteType::None));
                }
            }

            if slot_count > 0 && matched_notes != notes.len() {
                log::warn!(
                    "measure {}: {} of {} notes did not land on their own subdivision slot",
                    measure_index,
                    notes.len() - matched_notes,
                    notes.len()
                );
            }

            let blanks = temp.split_off(notes.end);
            temp.sort_by_key(|c| c.time_within_measure);
            for command in merge_by_time(std::mem::take(&mut temp), blanks) {
                push_coalesced(&mut out, command.command);
            }
            log::trace!("measure {}: {} ticks per note, {} slots", measure_index, tick_per_note, slot_count);
        }

        out.push(ParsedChartCommand::MeasureEnd);
    }

    log::debug!("re-serialized {} measures into {} commands", measures.len(), out.len());
    out
}

//! Tempo and time signature timeline of one chart course

use serde::{Deserialize, Serialize};

use super::acceleration::TempoMapAccelerationStructure;
use super::sorted_list::{BeatSortedForwardIterator, BeatSortedList};
use crate::models::{
    Beat, Tempo, TempoChange, Time, TimeSignature, TimeSignatureChange, FALLBACK_TEMPO, FALLBACK_TIME_SIGNATURE,
};

pub type SortedTempoChangesList = BeatSortedList<TempoChange>;
pub type SortedSignatureChangesList = BeatSortedList<TimeSignatureChange>;

/// What [`SortedTempoMap::for_each_beat_bar`] does after a bar callback
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BarFlow {
    /// Skip the beats inside this bar and move on to the next bar
    Continue,
    /// Stop the sweep
    Break,
    /// Also visit the beat positions inside this bar
    Fallthrough,
}

/// One position visited by [`SortedTempoMap::for_each_beat_bar`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForEachBeatBarData {
    pub signature: TimeSignature,
    pub beat: Beat,
    pub bar_index: i32,
    pub is_bar: bool,
}

/// Tempo/signature lists plus the derived Beat <-> Time tables
///
/// Both lists must stay sorted with all beats at or after zero. The
/// acceleration structure is NOT updated by edits to `tempo`; call
/// [`rebuild_acceleration_structure`](Self::rebuild_acceleration_structure)
/// after changing it.
#[derive(Clone, Debug)]
pub struct SortedTempoMap {
    pub tempo: SortedTempoChangesList,
    pub signature: SortedSignatureChangesList,
    acceleration_structure: TempoMapAccelerationStructure,
}

impl Default for SortedTempoMap {
    fn default() -> Self {
        Self::new()
    }
}

impl SortedTempoMap {
    pub fn new() -> Self {
        let mut map = Self {
            tempo: BeatSortedList::new(),
            signature: BeatSortedList::new(),
            acceleration_structure: TempoMapAccelerationStructure::new(),
        };
        map.rebuild_acceleration_structure();
        map
    }

    /// Build from existing lists and rebuild once
    pub fn from_lists(tempo: SortedTempoChangesList, signature: SortedSignatureChangesList) -> Self {
        let mut map = Self { tempo, signature, acceleration_structure: TempoMapAccelerationStructure::new() };
        map.rebuild_acceleration_structure();
        map
    }

    pub fn rebuild_acceleration_structure(&mut self) {
        self.acceleration_structure.rebuild(self.tempo.as_slice());
    }

    pub fn acceleration_structure(&self) -> &TempoMapAccelerationStructure {
        &self.acceleration_structure
    }

    pub fn beat_to_time(&self, beat: Beat) -> Time {
        self.acceleration_structure.convert_beat_to_time(beat)
    }

    pub fn time_to_beat(&self, time: Time) -> Beat {
        self.time_to_beat_trunc(time, false)
    }

    pub fn time_to_beat_trunc(&self, time: Time, trunc_to_0: bool) -> Beat {
        self.acceleration_structure.convert_time_to_beat(time, trunc_to_0)
    }

    pub fn beat_and_time_to_hbscroll_beat_tick(&self, beat: Beat, time: Time) -> f64 {
        self.acceleration_structure.convert_beat_and_time_to_hbscroll_beat_tick(beat, time)
    }

    /// Tempo in effect at `beat`
    pub fn tempo_at(&self, beat: Beat) -> Tempo {
        self.tempo
            .try_find_last_at_beat(beat)
            .map_or(FALLBACK_TEMPO, |index| self.tempo[index].tempo)
    }

    /// Time signature in effect at `beat`
    pub fn signature_at(&self, beat: Beat) -> TimeSignature {
        self.signature
            .try_find_last_at_beat(beat)
            .map_or(FALLBACK_TIME_SIGNATURE, |index| self.signature[index].signature)
    }

    /// Sweep bars, and optionally the beats inside them, in increasing beat order
    ///
    /// There is no built-in end: the callback must eventually return
    /// [`BarFlow::Break`] (typically once past the chart duration). The sweep
    /// also stops before stepping past `i32::MAX` ticks.
    /// Degenerate signatures are clamped so every bar lasts at least one tick.
    pub fn for_each_beat_bar<F>(&self, mut per_beat_bar: F)
    where
        F: FnMut(ForEachBeatBarData) -> BarFlow,
    {
        let mut signature_it = BeatSortedForwardIterator::new();
        let mut beat_it = Beat::ZERO;

        for bar_index in 0.. {
            let signature = signature_it
                .next(self.signature.as_slice(), beat_it)
                .map_or(FALLBACK_TIME_SIGNATURE, |index| self.signature[index].signature);
            let signature = clamp_signature(signature);

            let duration_per_bar = signature.duration_per_bar().abs().max(Beat::from_ticks(1));
            let bar = ForEachBeatBarData { signature, beat: beat_it, bar_index, is_bar: true };
            match per_beat_bar(bar) {
                BarFlow::Break => return,
                BarFlow::Continue => {
                    match beat_it.checked_add(duration_per_bar) {
                        Some(next) => beat_it = next,
                        None => return,
                    }
                    continue;
                }
                BarFlow::Fallthrough => {}
            }

            let beats_per_bar = signature.beats_per_bar().abs();
            let duration_per_beat = signature.duration_per_beat().abs();
            let mut beat_within_bar = beat_it;
            for _ in 1..beats_per_bar {
                beat_within_bar = match beat_within_bar.checked_add(duration_per_beat) {
                    Some(next) => next,
                    None => return,
                };
                let beat = ForEachBeatBarData { signature, beat: beat_within_bar, bar_index, is_bar: false };
                if per_beat_bar(beat) == BarFlow::Break {
                    return;
                }
            }
            beat_it = match beat_it.checked_add(duration_per_bar) {
                Some(next) => next,
                None => return,
            };
        }
    }
}

/// Keep the overall sign but force both magnitudes to at least one
fn clamp_signature(signature: TimeSignature) -> TimeSignature {
    let is_negative = (signature.numerator < 0) != (signature.denominator < 0);
    let numerator = signature.numerator.saturating_abs().max(1);
    TimeSignature::new(
        if is_negative { -numerator } else { numerator },
        signature.denominator.saturating_abs().max(1),
    )
}

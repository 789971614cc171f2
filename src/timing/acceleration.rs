//! Precomputed Beat <-> Time lookup tables
//!
//! The structure stores the playback time of every tick from beat zero up to
//! the last tempo change, so beat-to-time is a plain index and time-to-beat a
//! binary search. Past either end of the table, conversions extrapolate with
//! the first (before zero) or last tempo.
//!
//! The tables are a cache of the tempo list they were built from. Nothing
//! tracks edits to that list: after any change the owner has to call
//! [`TempoMapAccelerationStructure::rebuild`], otherwise conversions keep
//! answering for the old tempo list.

use crate::models::{Beat, Tempo, TempoChange, Time, FALLBACK_TEMPO, TICKS_PER_BEAT};

#[derive(Clone, Debug)]
pub struct TempoMapAccelerationStructure {
    beat_tick_to_times: Vec<Time>,
    beat_tick_to_hbscroll_beat_ticks: Vec<i32>,
    tempo_buffer: Vec<TempoChange>,
    first_tempo_bpm: f64,
    last_tempo_bpm: f64,
}

impl Default for TempoMapAccelerationStructure {
    fn default() -> Self {
        Self {
            beat_tick_to_times: Vec::new(),
            beat_tick_to_hbscroll_beat_ticks: Vec::new(),
            tempo_buffer: Vec::new(),
            first_tempo_bpm: FALLBACK_TEMPO.bpm as f64,
            last_tempo_bpm: FALLBACK_TEMPO.bpm as f64,
        }
    }
}

/// Duration of `ticks` ticks; dividing last keeps whole-beat results exact
fn ticks_to_seconds(ticks: f64, bpm: f64) -> f64 {
    ticks * 60.0 / (bpm.abs() * TICKS_PER_BEAT as f64)
}

fn ticks_per_second(bpm: f64) -> f64 {
    bpm * TICKS_PER_BEAT as f64 / 60.0
}

impl TempoMapAccelerationStructure {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute all tables from a beat-sorted tempo list
    ///
    /// An empty list, or one whose first change is after beat zero, gets an
    /// implicit [`FALLBACK_TEMPO`] at beat zero. Tempos are safety-clamped.
    pub fn rebuild(&mut self, tempo_changes: &[TempoChange]) {
        debug_assert!(tempo_changes.iter().all(|c| c.beat.ticks >= 0), "tempo changes must not precede beat zero");

        self.tempo_buffer.clear();
        self.tempo_buffer.extend(
            tempo_changes
                .iter()
                .filter(|c| c.beat.ticks >= 0)
                .map(|c| TempoChange::new(c.beat, c.tempo.safety_checked())),
        );
        if self.tempo_buffer.first().map_or(true, |first| first.beat != Beat::ZERO) {
            self.tempo_buffer.insert(0, TempoChange::new(Beat::ZERO, FALLBACK_TEMPO));
        }

        let last_tick = self.tempo_buffer.last().map_or(0, |c| c.beat.ticks);
        let table_len = last_tick as usize + 1;

        self.beat_tick_to_times.clear();
        self.beat_tick_to_times.reserve(table_len);
        self.beat_tick_to_hbscroll_beat_ticks.clear();
        self.beat_tick_to_hbscroll_beat_ticks.reserve(table_len);

        let mut segment_start_time = 0.0_f64;
        let mut segment_start_hbscroll = 0_i32;
        for (index, change) in self.tempo_buffer.iter().enumerate() {
            let bpm = change.tempo.bpm as f64;
            let direction = if change.tempo.bpm < 0.0 { -1 } else { 1 };

            let start = change.beat.ticks;
            // The last segment only contributes its own tick
            let end = self.tempo_buffer.get(index + 1).map_or(start + 1, |next| next.beat.ticks);

            for tick in start..end {
                let offset = tick - start;
                self.beat_tick_to_times
                    .push(Time::from_sec(segment_start_time + ticks_to_seconds(offset as f64, bpm)));
                self.beat_tick_to_hbscroll_beat_ticks
                    .push(segment_start_hbscroll + offset * direction);
            }

            let length = (end - start).max(0);
            segment_start_time += ticks_to_seconds(length as f64, bpm);
            segment_start_hbscroll += length * direction;
        }

        self.first_tempo_bpm = self.tempo_buffer.first().map_or(FALLBACK_TEMPO, |c| c.tempo).bpm as f64;
        self.last_tempo_bpm = self.tempo_buffer.last().map_or(FALLBACK_TEMPO, |c| c.tempo).bpm as f64;

        log::trace!(
            "rebuilt tempo acceleration structure: {} tempo changes, {} ticks",
            self.tempo_buffer.len(),
            self.beat_tick_to_times.len()
        );
    }

    pub fn convert_beat_to_time(&self, beat: Beat) -> Time {
        if beat.ticks < 0 {
            return Time::from_sec(ticks_to_seconds(beat.ticks as f64, self.first_tempo_bpm));
        }

        if let Some(&time) = self.beat_tick_to_times.get(beat.ticks as usize) {
            return time;
        }

        let last_tick = self.beat_tick_to_times.len().saturating_sub(1) as i32;
        let extra_ticks = if self.beat_tick_to_times.is_empty() { beat.ticks } else { beat.ticks - last_tick };
        self.last_calculated_time() + Time::from_sec(ticks_to_seconds(extra_ticks as f64, self.last_tempo_bpm))
    }

    /// Beat at `time`, interpolating between table entries
    ///
    /// The fractional tick is floored, or truncated towards zero when
    /// `trunc_to_0` is set so that times just before zero still read as beat zero.
    pub fn convert_time_to_beat(&self, time: Time, trunc_to_0: bool) -> Beat {
        let ticks = self.time_to_fractional_ticks(time);
        // Absorb float noise so exact tick times map back onto their tick
        let ticks = if (ticks - ticks.round()).abs() < 1e-6 { ticks.round() } else { ticks };
        let ticks = if trunc_to_0 { ticks.trunc() } else { ticks.floor() };
        Beat::from_ticks(ticks as i32)
    }

    fn time_to_fractional_ticks(&self, time: Time) -> f64 {
        let seconds = time.to_sec();
        let table = &self.beat_tick_to_times;

        let (Some(first), Some(last)) = (table.first(), table.last()) else {
            let bpm = if seconds < 0.0 { self.first_tempo_bpm } else { self.last_tempo_bpm };
            return seconds * ticks_per_second(bpm.abs());
        };

        if seconds < first.to_sec() {
            return (seconds - first.to_sec()) * ticks_per_second(self.first_tempo_bpm.abs());
        }
        if seconds >= last.to_sec() {
            let last_tick = (table.len() - 1) as f64;
            return last_tick + (seconds - last.to_sec()) * ticks_per_second(self.last_tempo_bpm.abs());
        }

        // first <= seconds < last, so `upper` is in 1..len
        let upper = table.partition_point(|t| t.to_sec() <= seconds);
        let lower = upper - 1;
        let (t0, t1) = (table[lower].to_sec(), table[upper].to_sec());
        let fraction = if t1 > t0 { (seconds - t0) / (t1 - t0) } else { 0.0 };
        lower as f64 + fraction
    }

    /// Virtual HBSCROLL tick for a position given both as beat and time
    ///
    /// Within the table the value is indexed by beat; before zero it follows
    /// the first tempo's direction; past the table it advances with the time
    /// elapsed since the last entry at the last tempo.
    pub fn convert_beat_and_time_to_hbscroll_beat_tick(&self, beat: Beat, time: Time) -> f64 {
        if beat.ticks < 0 {
            let direction = if self.first_tempo_bpm < 0.0 { -1.0 } else { 1.0 };
            return beat.ticks as f64 * direction;
        }

        if let Some(&tick) = self.beat_tick_to_hbscroll_beat_ticks.get(beat.ticks as usize) {
            return tick as f64;
        }

        let elapsed = (time - self.last_calculated_time()).to_sec();
        self.last_calculated_hbscroll_beat_tick() + elapsed * ticks_per_second(self.last_tempo_bpm)
    }

    pub fn last_calculated_time(&self) -> Time {
        self.beat_tick_to_times.last().copied().unwrap_or(Time::ZERO)
    }

    pub fn last_calculated_hbscroll_beat_tick(&self) -> f64 {
        self.beat_tick_to_hbscroll_beat_ticks.last().copied().unwrap_or(0) as f64
    }

    /// Tempo changes the tables were last built from (safety-clamped, with the implicit zero entry)
    pub fn tempo_buffer(&self) -> &[TempoChange] {
        &self.tempo_buffer
    }

    pub fn first_tempo(&self) -> Tempo {
        Tempo::new(self.first_tempo_bpm as f32)
    }

    pub fn last_tempo(&self) -> Tempo {
        Tempo::new(self.last_tempo_bpm as f32)
    }
}

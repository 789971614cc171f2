//! Beat-keyed timeline events

use serde::{Deserialize, Serialize};

use super::beat::{Beat, Tempo, TimeSignature};

/// An item that lives at a position on the beat timeline
///
/// Implemented by every event type stored in a
/// [`BeatSortedList`](crate::timing::BeatSortedList).
pub trait BeatEvent {
    fn beat(&self) -> Beat;

    /// Length of the event; zero for point events
    fn beat_duration(&self) -> Beat {
        Beat::ZERO
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TempoChange {
    pub beat: Beat,
    pub tempo: Tempo,
}

impl TempoChange {
    pub const fn new(beat: Beat, tempo: Tempo) -> Self {
        Self { beat, tempo }
    }
}

impl BeatEvent for TempoChange {
    fn beat(&self) -> Beat {
        self.beat
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSignatureChange {
    pub beat: Beat,
    pub signature: TimeSignature,
}

impl TimeSignatureChange {
    pub const fn new(beat: Beat, signature: TimeSignature) -> Self {
        Self { beat, signature }
    }
}

impl BeatEvent for TimeSignatureChange {
    fn beat(&self) -> Beat {
        self.beat
    }
}

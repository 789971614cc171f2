//! Beat-sorted event container
//!
//! Every event list of a chart (tempo changes, signatures, notes, ...) is a
//! `BeatSortedList`: strictly increasing by beat, at most one event per beat.
//! Finders hand out indices rather than references so callers can keep a
//! position across later mutations of the list.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

use crate::models::{Beat, BeatEvent};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BeatSortedList<T> {
    sorted: Vec<T>,
}

impl<T> Default for BeatSortedList<T> {
    fn default() -> Self {
        Self { sorted: Vec::new() }
    }
}

impl<T: BeatEvent> BeatSortedList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from arbitrary events; later events win on duplicate beats
    pub fn from_unsorted(values: impl IntoIterator<Item = T>) -> Self {
        let mut list = Self::new();
        for value in values {
            list.insert_or_update(value);
        }
        list
    }

    /// Index of the last event at or before `beat`
    pub fn try_find_last_at_beat(&self, beat: Beat) -> Option<usize> {
        let count = self.sorted.partition_point(|v| v.beat() <= beat);
        count.checked_sub(1)
    }

    /// Index of the event exactly at `beat`
    pub fn try_find_exact_at_beat(&self, beat: Beat) -> Option<usize> {
        self.sorted.binary_search_by(|v| v.beat().cmp(&beat)).ok()
    }

    /// Index of the last event whose `[beat, beat + duration]` span intersects `[start, end]`
    ///
    /// Inclusive checks let touching spans count as overlapping, which is what
    /// long notes (that need a gap after their tail) and cursor hit tests want.
    pub fn try_find_overlapping_beat(&self, start: Beat, end: Beat, inclusive: bool) -> Option<usize> {
        debug_assert!(end >= start, "overlap query end must not precede its start");
        self.try_find_overlapping_beat_untrusted(start, end, inclusive)
    }

    /// Same as [`try_find_overlapping_beat`](Self::try_find_overlapping_beat) without the range sanity check
    pub fn try_find_overlapping_beat_untrusted(&self, start: Beat, end: Beat, inclusive: bool) -> Option<usize> {
        let mut found = None;
        for (index, v) in self.sorted.iter().enumerate() {
            let v_start = v.beat();
            let v_end = v_start + v.beat_duration();
            let overlaps = if inclusive {
                v_start <= end && start <= v_end
            } else {
                v_start < end && start < v_end
            };

            // Keep scanning past long events so notes "inside" them are still found
            if overlaps {
                found = Some(index);
            } else if v_end > end {
                break;
            }
        }
        found
    }

    /// First index whose beat is not before `beat`
    fn insertion_index(&self, beat: Beat) -> usize {
        self.sorted.partition_point(|v| v.beat() < beat)
    }

    /// Insert `value`, or hand the event already at its beat to `on_existing`
    ///
    /// Returns the index the value was inserted at (or the index of the existing event).
    pub fn insert_or_func<F>(&mut self, value: T, on_existing: F) -> usize
    where
        F: FnOnce(&mut T, T),
    {
        let beat = value.beat();
        let index = self.insertion_index(beat);
        let exists = self.sorted.get(index).map_or(false, |existing| existing.beat() == beat);
        if exists {
            on_existing(&mut self.sorted[index], value);
        } else {
            self.sorted.insert(index, value);
        }

        debug_assert!(beat.ticks >= 0, "events must not be placed before beat zero");
        debug_assert!(self.validate_is_sorted());
        index
    }

    /// Insert unless an event already exists at the same beat; returns `(index, inserted)`
    pub fn insert_or_ignore(&mut self, value: T) -> (usize, bool) {
        let mut inserted = true;
        let index = self.insert_or_func(value, |_, _| inserted = false);
        (index, inserted)
    }

    /// Insert, overwriting any event at the same beat
    pub fn insert_or_update(&mut self, value: T) -> usize {
        self.insert_or_func(value, |existing, value| *existing = value)
    }

    pub fn remove_at_beat(&mut self, beat: Beat) {
        if let Some(index) = self.try_find_exact_at_beat(beat) {
            self.remove_at_index(index);
        }
    }

    /// Out of bounds indices are ignored
    pub fn remove_at_index(&mut self, index: usize) {
        if index < self.sorted.len() {
            self.sorted.remove(index);
        }
    }

    pub fn count_if(&self, predicate: impl Fn(&T) -> bool) -> usize {
        self.sorted.iter().filter(|v| predicate(v)).count()
    }

    pub fn filter(&self, predicate: impl Fn(&T) -> bool) -> Vec<T>
    where
        T: Clone,
    {
        self.sorted.iter().filter(|v| predicate(v)).cloned().collect()
    }

    pub fn validate_is_sorted(&self) -> bool {
        self.sorted.windows(2).all(|pair| pair[0].beat() < pair[1].beat())
    }
}

impl<T> BeatSortedList<T> {
    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.sorted.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.sorted
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.sorted.get(index)
    }

    /// Mutable access; changing the beat of an event is the caller's responsibility to keep sorted
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.sorted.get_mut(index)
    }

    pub fn last(&self) -> Option<&T> {
        self.sorted.last()
    }
}

impl<T> Index<usize> for BeatSortedList<T> {
    type Output = T;
    fn index(&self, index: usize) -> &T {
        &self.sorted[index]
    }
}

impl<T> IndexMut<usize> for BeatSortedList<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.sorted[index]
    }
}

impl<'a, T> IntoIterator for &'a BeatSortedList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.sorted.iter()
    }
}

/// Forward-only cursor for sweeping a sorted list with non-decreasing beats
///
/// The cursor remembers where the previous lookup ended and only ever scans
/// forward from there, giving linear total cost over one sweep. Queries
/// within one sweep MUST use non-decreasing beats; querying an earlier beat
/// does not rewind and yields stale results. Start a new sweep with a fresh
/// cursor (or [`reset`](Self::reset)).
#[derive(Clone, Copy, Debug, Default)]
pub struct BeatSortedForwardIterator {
    last_index: usize,
}

impl BeatSortedForwardIterator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.last_index = 0;
    }

    /// Index of the last event at or before `beat`, scanning forward from the previous result
    pub fn next<T: BeatEvent>(&mut self, sorted: &[T], beat: Beat) -> Option<usize> {
        let mut next = None;
        for (index, v) in sorted.iter().enumerate().skip(self.last_index) {
            if v.beat() <= beat {
                next = Some(index);
            } else {
                break;
            }
        }
        if let Some(index) = next {
            self.last_index = index;
        }
        next
    }
}
